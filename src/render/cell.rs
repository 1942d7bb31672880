use crate::core::value::Value;
use crate::format::FormatRegistry;
use crate::render::subsection::TOGGLE_CLASS;
use crate::schema::LeafSpec;
use crate::ui::document::{Document, ElementId};

/// `fmt-<format>` class of a leaf's cells; `fmt-default` when unset.
pub fn format_class(leaf: &LeafSpec) -> String {
    if leaf.format.is_empty() {
        "fmt-default".to_string()
    } else {
        format!("fmt-{}", leaf.format)
    }
}

/// Replaces the display content of `cell` with `value` formatted for
/// `leaf`. Used for the first render and for in-place redraws after a commit.
/// A subsection toggle living in the cell is kept in front of the content.
pub fn fill_cell(
    doc: &mut Document,
    cell: ElementId,
    registry: &FormatRegistry,
    leaf: &LeafSpec,
    value: &Value,
) {
    let toggles: Vec<ElementId> = doc
        .child_elements(cell)
        .into_iter()
        .filter(|child| doc.has_class(*child, TOGGLE_CLASS))
        .collect();
    doc.clear_children(cell);
    for toggle in toggles {
        doc.append(cell, toggle);
    }
    doc.add_class(cell, &format_class(leaf));
    if registry.is_numeric(leaf) {
        doc.add_class(cell, "numeric");
    }
    if value.is_null() {
        doc.add_class(cell, "empty");
    } else {
        doc.remove_class(cell, "empty");
    }
    for span in registry.render(leaf, value) {
        doc.append_span(cell, span);
    }
}

/// Sets `rowspan`/`colspan` when they differ from 1.
pub fn set_spans(doc: &mut Document, cell: ElementId, rowspan: usize, colspan: usize) {
    if rowspan > 1 {
        doc.set_attr(cell, "rowspan", rowspan.to_string());
    }
    if colspan > 1 {
        doc.set_attr(cell, "colspan", colspan.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::fill_cell;
    use crate::core::value::Value;
    use crate::render::subsection::TOGGLE_CLASS;
    use crate::format::FormatRegistry;
    use crate::schema::LeafSpec;
    use crate::ui::document::Document;

    #[test]
    fn refill_replaces_content_and_empty_class() {
        let mut doc = Document::new();
        let root = doc.root();
        let cell = doc.create_in(root, "td");
        let registry = FormatRegistry::new();
        let leaf = LeafSpec::new("a", "A", "int");

        fill_cell(&mut doc, cell, &registry, &leaf, &Value::Null);
        assert!(doc.has_class(cell, "empty"));
        assert!(doc.has_class(cell, "fmt-int"));

        fill_cell(&mut doc, cell, &registry, &leaf, &Value::Int(7));
        assert!(!doc.has_class(cell, "empty"));
        assert!(doc.has_class(cell, "numeric"));
        assert_eq!(doc.text_content(cell), "7");
    }

    #[test]
    fn refill_keeps_a_subsection_toggle() {
        let mut doc = Document::new();
        let root = doc.root();
        let cell = doc.create_in(root, "td");
        let registry = FormatRegistry::new();
        let leaf = LeafSpec::new("name", "Name", "string");

        fill_cell(&mut doc, cell, &registry, &leaf, &Value::Text("Sol".into()));
        let toggle = doc.create("button");
        doc.add_class(toggle, TOGGLE_CLASS);
        doc.append_text(toggle, "+");
        doc.prepend(cell, toggle);

        fill_cell(&mut doc, cell, &registry, &leaf, &Value::Text("Sun".into()));
        assert!(doc.is_attached(toggle));
        assert_eq!(doc.child_elements(cell), vec![toggle]);
        assert_eq!(doc.text_content(cell), "+Sun");
    }
}
