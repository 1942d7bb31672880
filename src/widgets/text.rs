use crate::core::value::Value;
use crate::runtime::event::KeyEvent;
use crate::ui::document::{Document, ElementId};
use crate::widgets::text_edit::LineBuffer;
use crate::widgets::traits::{EditWidget, WidgetError, draw_line_input};

/// Free text. Multi-line inputs draw as a `<textarea>`.
pub struct TextInput {
    buffer: LineBuffer,
    multiline: bool,
}

impl TextInput {
    pub fn new(value: &Value) -> Self {
        Self {
            buffer: LineBuffer::new(value.to_string()),
            multiline: false,
        }
    }

    pub fn multiline(mut self) -> Self {
        self.multiline = true;
        self
    }
}

impl EditWidget for TextInput {
    fn kind(&self) -> &'static str {
        if self.multiline { "textarea" } else { "text" }
    }

    fn draft(&self) -> String {
        self.buffer.text().to_string()
    }

    fn on_key(&mut self, key: KeyEvent) -> bool {
        self.buffer.apply_key(key)
    }

    fn set_text(&mut self, text: &str) {
        self.buffer.set_text(text);
    }

    fn extract(&self) -> Result<Value, WidgetError> {
        let text = self.buffer.text();
        if text.is_empty() {
            Ok(Value::Null)
        } else {
            Ok(Value::Text(text.to_string()))
        }
    }

    fn draw(&self, doc: &mut Document, parent: ElementId) -> ElementId {
        if !self.multiline {
            return draw_line_input(doc, parent, self.kind(), self.buffer.text());
        }
        let area = doc.create_in(parent, "textarea");
        doc.add_class(area, "widget-textarea");
        doc.append_text(area, self.buffer.text());
        area
    }
}
