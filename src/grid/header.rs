use crate::grid::merge_grid::{MergeRule, SparseGrid};
use crate::schema::walk::{SchemaVisitor, walk};
use crate::schema::{GroupSpec, LeafSpec, SchemaNode, leaf_count};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderCell {
    pub title: String,
    pub col: usize,
    pub rowspan: usize,
    pub colspan: usize,
}

/// Merged header rows for one schema tree.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HeaderLayout {
    /// Full-width title row, when a title was supplied.
    pub title: Option<HeaderCell>,
    /// One entry per populated grid row, cells left to right.
    pub rows: Vec<Vec<HeaderCell>>,
    pub column_count: usize,
}

impl HeaderLayout {
    /// Title row (if any) followed by the column rows.
    pub fn all_rows(&self) -> Vec<Vec<HeaderCell>> {
        let mut rows = Vec::with_capacity(self.rows.len() + 1);
        if let Some(title) = &self.title {
            rows.push(vec![title.clone()]);
        }
        rows.extend(self.rows.iter().cloned());
        rows
    }
}

#[derive(Default)]
struct HeaderBuilder {
    grid: SparseGrid<String>,
    row: usize,
    col: usize,
}

impl<'s> SchemaVisitor<'s> for HeaderBuilder {
    fn terminal(&mut self, leaf: &'s LeafSpec) {
        self.grid.set(self.row, self.col, leaf.title.clone());
        self.col += 1;
    }

    fn enter_group(&mut self, group: &'s GroupSpec) {
        // a group without leaves owns no column; its title would land on the next sibling's cell
        if leaf_count(&group.children) > 0 {
            self.grid.set(self.row, self.col, group.title.clone());
        }
        self.row += 1;
    }

    fn exit_group(&mut self, _group: &'s GroupSpec) {
        self.row -= 1;
    }
}

pub fn build_header(columns: &[SchemaNode], title: Option<&str>) -> HeaderLayout {
    let mut builder = HeaderBuilder::default();
    walk(columns, &mut builder);

    let column_count = builder.grid.col_count().max(builder.col);
    let mut rows: Vec<Vec<HeaderCell>> = vec![Vec::new(); builder.grid.row_count()];
    for placed in builder.grid.merged(MergeRule::Header, column_count) {
        rows[placed.row].push(HeaderCell {
            title: placed.value.clone(),
            col: placed.col,
            rowspan: placed.rowspan,
            colspan: placed.colspan,
        });
    }
    rows.retain(|row| !row.is_empty());

    HeaderLayout {
        title: title.map(|title| HeaderCell {
            title: title.to_string(),
            col: 0,
            rowspan: 1,
            colspan: column_count.max(1),
        }),
        rows,
        column_count,
    }
}
