pub mod core;
pub mod edit;
pub mod error;
pub mod files;
pub mod format;
pub mod grid;
pub mod render;
pub mod runtime;
pub mod schema;
pub mod ui;
pub mod widgets;

pub use self::core::value;
pub use self::core::value_path;

pub use edit::{CommitOutcome, EditController, EditError, EditState};
pub use error::CliError;
pub use format::{FormatEntry, FormatRegistry};
pub use render::{GridView, RenderRequest, render};
pub use runtime::event::{EventOutcome, UiEvent};
pub use runtime::key_bindings::EditKeyBindings;
pub use schema::{SchemaError, SchemaMap};
