//! Section renderer, subsection controller and the `GridView` container.

pub mod binding;
pub mod cell;
mod section;
mod subsection;
mod view;

pub use binding::{Binding, Bindings};
pub use view::{GridView, RenderRequest, SelectHandler, render};
