/// Sparse 2-D layout grid. Writing outside the current bounds grows it; rows
/// and columns never shrink.
#[derive(Debug, Clone)]
pub struct SparseGrid<T> {
    rows: Vec<Vec<Option<T>>>,
    cols: usize,
}

/// How empty neighbours are folded into a populated cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeRule {
    /// Rowspan over empty cells below; colspan only over columns that are
    /// empty from row 0 through the cell's own row, so a header group never
    /// swallows a column that a sibling opened higher up.
    Header,
    /// Rowspan over empty cells below, then colspan over columns empty for
    /// every spanned row. Cells already claimed by an earlier merge are not
    /// reused.
    Adjacent,
}

/// A populated cell with its computed spans.
#[derive(Debug, Clone, PartialEq)]
pub struct Placed<T> {
    pub row: usize,
    pub col: usize,
    pub rowspan: usize,
    pub colspan: usize,
    pub value: T,
}

impl<T> Default for SparseGrid<T> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            cols: 0,
        }
    }
}

impl<T> SparseGrid<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, row: usize, col: usize, value: T) {
        if self.rows.len() <= row {
            self.rows.resize_with(row + 1, Vec::new);
        }
        let cells = &mut self.rows[row];
        if cells.len() <= col {
            cells.resize_with(col + 1, || None);
        }
        cells[col] = Some(value);
        self.cols = self.cols.max(col + 1);
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&T> {
        self.rows.get(row)?.get(col)?.as_ref()
    }

    pub fn is_empty_at(&self, row: usize, col: usize) -> bool {
        self.get(row, col).is_none()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Highest column index ever written, plus one.
    pub fn col_count(&self) -> usize {
        self.cols
    }

    /// True when column `col` holds nothing in rows `0..=row`.
    pub fn is_empty_above(&self, row: usize, col: usize) -> bool {
        (0..=row).all(|r| self.is_empty_at(r, col))
    }

    /// Number of consecutive empty cells directly below `(row, col)`.
    pub fn empty_run_below(&self, row: usize, col: usize) -> usize {
        (row + 1..self.row_count())
            .take_while(|&r| self.is_empty_at(r, col))
            .count()
    }

    /// Every populated cell in row-major order with its spans. `width` bounds
    /// the horizontal merge and may exceed [`Self::col_count`].
    pub fn merged(&self, rule: MergeRule, width: usize) -> Vec<Placed<&T>> {
        let width = width.max(self.cols);
        let height = self.row_count();
        let mut claimed = vec![vec![false; width]; height];
        let mut out = Vec::new();

        for row in 0..height {
            for col in 0..width {
                let Some(value) = self.get(row, col) else {
                    continue;
                };
                let (rowspan, colspan) = match rule {
                    MergeRule::Header => {
                        let rowspan = 1 + self.empty_run_below(row, col);
                        let colspan = 1 + (col + 1..width)
                            .take_while(|&c| self.is_empty_above(row, c))
                            .count();
                        (rowspan, colspan)
                    }
                    MergeRule::Adjacent => {
                        let free = |r: usize, c: usize| self.is_empty_at(r, c) && !claimed[r][c];
                        let rowspan = 1 + (row + 1..height).take_while(|&r| free(r, col)).count();
                        let colspan = 1 + (col + 1..width)
                            .take_while(|&c| (row..row + rowspan).all(|r| free(r, c)))
                            .count();
                        (rowspan, colspan)
                    }
                };
                for claimed_row in claimed.iter_mut().skip(row).take(rowspan) {
                    for cell in claimed_row.iter_mut().skip(col).take(colspan) {
                        *cell = true;
                    }
                }
                out.push(Placed {
                    row,
                    col,
                    rowspan,
                    colspan,
                    value,
                });
            }
        }
        out
    }
}
