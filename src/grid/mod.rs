//! Cell layout: the sparse merge grid and the header/body builders on top of
//! it. Nothing here knows about markup.

pub mod body;
pub mod header;
pub mod merge_grid;

pub use body::{BodyCell, BodyUnit, layout_record};
pub use header::{HeaderCell, HeaderLayout, build_header};
pub use merge_grid::{MergeRule, Placed, SparseGrid};
