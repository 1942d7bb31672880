pub mod document;
pub mod span;
pub mod style;
