use std::collections::HashMap;

use crate::core::value_path::ValuePath;
use crate::edit::EditTarget;
use crate::ui::document::ElementId;

/// What a click on a bound element does.
#[derive(Debug, Clone, PartialEq)]
pub enum Binding {
    /// Fires the selection callback with the record at `record`.
    SelectRow { record: ValuePath },
    /// Shows or hides the nested subsection rows of one parent row.
    Toggle { rows: Vec<ElementId>, expanded: bool },
    /// Opens an edit session on the cell.
    EditCell(EditTarget),
}

#[derive(Debug, Clone, Default)]
pub struct Bindings {
    by_element: HashMap<ElementId, Binding>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(&mut self, element: ElementId, binding: Binding) {
        self.by_element.insert(element, binding);
    }

    pub fn get(&self, element: ElementId) -> Option<&Binding> {
        self.by_element.get(&element)
    }

    pub fn get_mut(&mut self, element: ElementId) -> Option<&mut Binding> {
        self.by_element.get_mut(&element)
    }

    pub fn clear(&mut self) {
        self.by_element.clear();
    }

    pub fn len(&self) -> usize {
        self.by_element.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_element.is_empty()
    }

    /// Bound elements matching `pred`, in no particular order.
    pub fn elements_where(&self, pred: impl Fn(&Binding) -> bool) -> Vec<ElementId> {
        self.by_element
            .iter()
            .filter(|(_, binding)| pred(binding))
            .map(|(element, _)| *element)
            .collect()
    }
}
