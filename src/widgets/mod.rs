pub mod array;
pub mod hex;
pub mod number;
pub mod select;
pub mod text;
pub mod text_edit;
pub mod traits;
pub mod validators;

pub use array::ArrayInput;
pub use hex::HexInput;
pub use number::NumberInput;
pub use select::SelectInput;
pub use text::TextInput;
pub use traits::{EditWidget, WidgetError};
