use crate::core::value::Value;
use crate::runtime::event::KeyEvent;
use crate::ui::document::{Document, ElementId};
use thiserror::Error;
use unicode_width::UnicodeWidthStr;

/// Why a widget could not turn its draft into a value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WidgetError {
    #[error("`{input}` is not a number")]
    NotANumber { input: String },
    #[error("`{input}` is not a whole number")]
    NotAnInteger { input: String },
    #[error("`{input}` is not a hexadecimal number")]
    NotHex { input: String },
    #[error("`{input}` is not one of the allowed values")]
    NotAllowed { input: String },
}

/// An input control hosted by the inline edit surface.
///
/// Widgets own only their draft; the edit controller decides when the draft
/// is extracted and where the result is written.
pub trait EditWidget: Send {
    /// Short name, rendered as the `widget-<kind>` class of the control.
    fn kind(&self) -> &'static str;

    /// Current draft as shown to the user.
    fn draft(&self) -> String;

    /// Applies a key press. Returns `false` when the key is not for the widget.
    fn on_key(&mut self, key: KeyEvent) -> bool;

    /// Replaces the whole draft.
    fn set_text(&mut self, text: &str);

    /// Parses the draft into a storable value. `Null` means "no value".
    fn extract(&self) -> Result<Value, WidgetError>;

    /// Builds the control markup under `parent` and returns its element.
    fn draw(&self, doc: &mut Document, parent: ElementId) -> ElementId {
        draw_line_input(doc, parent, self.kind(), &self.draft())
    }
}

/// Single-line `<input>` sized to its content.
pub fn draw_line_input(doc: &mut Document, parent: ElementId, kind: &str, draft: &str) -> ElementId {
    let input = doc.create_in(parent, "input");
    doc.set_attr(input, "type", "text");
    doc.set_attr(input, "value", draft);
    doc.set_attr(input, "size", UnicodeWidthStr::width(draft).max(4).to_string());
    doc.add_class(input, &format!("widget-{kind}"));
    input
}
