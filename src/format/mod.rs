//! Formatter and edit-widget registries.
//!
//! A leaf's `format` names one [`FormatEntry`]: a pure display formatter plus
//! the constructor of the widget used to edit it. Unknown names resolve to
//! the registry's explicit default entry; `Null` values always go through the
//! empty-value formatter.

pub mod display;

use std::collections::HashMap;
use std::sync::Arc;

use crate::core::value::Value;
use crate::schema::{LeafSpec, ValueKind};
use crate::ui::span::SpanLine;
use crate::widgets::{ArrayInput, EditWidget, HexInput, NumberInput, SelectInput, TextInput};

pub type Formatter = Arc<dyn Fn(&Value, &LeafSpec) -> SpanLine + Send + Sync>;
pub type WidgetFactory = Arc<dyn Fn(&LeafSpec, &Value) -> Box<dyn EditWidget> + Send + Sync>;

#[derive(Clone)]
pub struct FormatEntry {
    pub render: Formatter,
    pub widget: WidgetFactory,
    /// Rendered cells get the `numeric` class.
    pub numeric: bool,
}

impl FormatEntry {
    pub fn new<R, W>(render: R, widget: W) -> Self
    where
        R: Fn(&Value, &LeafSpec) -> SpanLine + Send + Sync + 'static,
        W: Fn(&LeafSpec, &Value) -> Box<dyn EditWidget> + Send + Sync + 'static,
    {
        Self {
            render: Arc::new(render),
            widget: Arc::new(widget),
            numeric: false,
        }
    }

    pub fn numeric(mut self) -> Self {
        self.numeric = true;
        self
    }
}

impl std::fmt::Debug for FormatEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormatEntry")
            .field("numeric", &self.numeric)
            .finish_non_exhaustive()
    }
}

fn text_widget(_leaf: &LeafSpec, value: &Value) -> Box<dyn EditWidget> {
    Box::new(TextInput::new(value))
}

fn number_widget(leaf: &LeafSpec, value: &Value) -> Box<dyn EditWidget> {
    Box::new(NumberInput::new(value, leaf.storage()))
}

#[derive(Clone, Debug)]
pub struct FormatRegistry {
    entries: HashMap<String, FormatEntry>,
    default: FormatEntry,
    empty: FormatEntry,
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl FormatRegistry {
    /// Registry with only the default (raw text) and empty-value entries.
    pub fn bare() -> Self {
        Self {
            entries: HashMap::new(),
            default: FormatEntry::new(|value, _leaf| display::raw(value, None), text_widget),
            empty: FormatEntry::new(display::empty, text_widget),
        }
    }

    /// Registry with every built-in format.
    pub fn new() -> Self {
        Self::bare()
            .with_format("string", FormatEntry::new(display::text, text_widget))
            .with_format(
                "text",
                FormatEntry::new(display::text, |_leaf, value| {
                    Box::new(TextInput::new(value).multiline())
                }),
            )
            .with_format("int", FormatEntry::new(display::int, number_widget).numeric())
            .with_format("float", FormatEntry::new(display::float, number_widget).numeric())
            .with_format(
                "siprefix",
                FormatEntry::new(display::siprefix, number_widget).numeric(),
            )
            .with_format("degrees", FormatEntry::new(display::degrees, number_widget).numeric())
            .with_format(
                "percent",
                FormatEntry::new(display::percent, |leaf, value| {
                    Box::new(NumberInput::percent(value, leaf.value_kind.unwrap_or(ValueKind::Float)))
                })
                .numeric(),
            )
            .with_format(
                "hex",
                FormatEntry::new(display::hex, |_leaf, value| Box::new(HexInput::new(value)))
                    .numeric(),
            )
            .with_format(
                "enum",
                FormatEntry::new(display::enumeration, |leaf, value| {
                    Box::new(SelectInput::new(value, &leaf.enumvals))
                }),
            )
            .with_format(
                "valarray",
                FormatEntry::new(display::valarray, |leaf, value| {
                    Box::new(ArrayInput::new(value, leaf.item.as_ref()))
                }),
            )
    }

    pub fn with_format(mut self, name: impl Into<String>, entry: FormatEntry) -> Self {
        self.register(name, entry);
        self
    }

    pub fn with_default(mut self, entry: FormatEntry) -> Self {
        self.default = entry;
        self
    }

    pub fn with_empty(mut self, entry: FormatEntry) -> Self {
        self.empty = entry;
        self
    }

    pub fn register(&mut self, name: impl Into<String>, entry: FormatEntry) {
        self.entries.insert(name.into(), entry);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Entry for `name`, or the default entry.
    pub fn entry(&self, name: &str) -> &FormatEntry {
        self.entries.get(name).unwrap_or(&self.default)
    }

    /// Display content of `value` under `leaf`'s format.
    pub fn render(&self, leaf: &LeafSpec, value: &Value) -> SpanLine {
        let entry = if value.is_null() {
            &self.empty
        } else {
            self.entry(&leaf.format)
        };
        (entry.render)(value, leaf)
    }

    /// Fresh edit widget for `leaf`, seeded with `value`.
    pub fn widget(&self, leaf: &LeafSpec, value: &Value) -> Box<dyn EditWidget> {
        (self.entry(&leaf.format).widget)(leaf, value)
    }

    pub fn is_numeric(&self, leaf: &LeafSpec) -> bool {
        self.entry(&leaf.format).numeric
    }
}
