use tracing::{debug, debug_span, warn};

use crate::core::value::Value;
use crate::core::value_path::ValuePath;
use crate::edit::EditTarget;
use crate::format::FormatRegistry;
use crate::grid::{BodyUnit, HeaderLayout, build_header, layout_record};
use crate::render::binding::{Binding, Bindings};
use crate::render::cell::{fill_cell, set_spans};
use crate::schema::{
    FieldsSection, GroupSpec, LeafSpec, Options, SchemaMap, SchemaNode, SectionSchema,
    TableSection,
};
use crate::ui::document::{Document, ElementId};

/// One synchronous render pass over a schema map.
///
/// Sections and their subsections recurse through `render_section`. Depth is
/// bounded by the data rather than by the schema graph: a subsection only
/// renders when its row carries data for it.
pub(crate) struct SectionRenderer<'a> {
    pub doc: &'a mut Document,
    pub bindings: &'a mut Bindings,
    pub registry: &'a FormatRegistry,
    pub schema: &'a SchemaMap,
    pub data: &'a Value,
    /// A selection callback is configured.
    pub selectable: bool,
}

/// Rows emitted for one table record.
pub(crate) struct RecordRows {
    pub tbody: ElementId,
    pub rows: Vec<ElementId>,
    /// Column count reported by the body layout.
    pub column_count: usize,
}

impl SectionRenderer<'_> {
    /// Renders section `id` with the data found at `path` into `parent`.
    /// Returns `false` when nothing was emitted.
    pub fn render_section(
        &mut self,
        parent: ElementId,
        id: &str,
        path: &ValuePath,
        inherited: &Options,
    ) -> bool {
        let _span = debug_span!("render_section", section = id, path = %path).entered();

        let schema = self.schema;
        let Some(section) = schema.section(id) else {
            warn!(section = id, "no section with this id");
            return false;
        };
        if let SectionSchema::Unknown { type_name, title } = section {
            warn!(section = id, type_name = type_name.as_str(), "unknown schema type");
            let container = self.section_container(parent, id, "unknown");
            if let Some(title) = title {
                let heading = self.doc.create_in(container, "h3");
                self.doc.append_text(heading, title.as_str());
            }
            let note = self.doc.create_in(container, "p");
            self.doc.add_class(note, "placeholder");
            self.doc
                .append_text(note, format!("unknown schema type `{type_name}`"));
            return true;
        }

        let data = self.data;
        let Some(records) = data.get_path(path).filter(|value| !value.is_empty()) else {
            debug!(section = id, "no data, section skipped");
            return false;
        };
        let options = section.options().inherit(inherited);
        match section {
            SectionSchema::Table(table) => {
                self.render_table(parent, id, table, records, path, &options);
            }
            SectionSchema::Fields(fields) => {
                self.render_fields(parent, id, fields, records, path, &options);
            }
            SectionSchema::Unknown { .. } => return false,
        }
        true
    }

    fn section_container(&mut self, parent: ElementId, id: &str, kind: &str) -> ElementId {
        let container = self.doc.create_in(parent, "div");
        self.doc.add_class(container, "section");
        self.doc.add_class(container, kind);
        self.doc.set_attr(container, "data-section", id);
        container
    }

    fn render_table(
        &mut self,
        parent: ElementId,
        id: &str,
        table: &TableSection,
        records: &Value,
        path: &ValuePath,
        options: &Options,
    ) {
        let container = self.section_container(parent, id, "table");
        let grid = self.doc.create_in(container, "table");
        let header = build_header(&table.columns, table.title.as_deref());
        self.emit_header(grid, &header);

        // a lone object is treated as a one-record table
        let rows: Vec<(ValuePath, &Value)> = match records {
            Value::List(items) => items
                .iter()
                .enumerate()
                .map(|(idx, record)| (path.index(idx), record))
                .collect(),
            record => vec![(path.clone(), record)],
        };

        for (record_path, record) in rows {
            let tbody = self.doc.create_in(grid, "tbody");
            let unit = layout_record(&table.columns, record, &record_path);
            let emitted = RecordRows {
                tbody,
                rows: self.emit_body(tbody, &unit, options),
                column_count: unit.column_count,
            };

            if options.is_clickable() && self.selectable {
                for row in &emitted.rows {
                    self.doc.add_class(*row, "clickable");
                    self.bindings.bind(
                        *row,
                        Binding::SelectRow {
                            record: record_path.clone(),
                        },
                    );
                }
            }
            if !table.subsections.is_empty() {
                self.render_subsections(&emitted, &table.subsections, record, &record_path, options);
            }
        }
    }

    fn render_fields(
        &mut self,
        parent: ElementId,
        id: &str,
        fields: &FieldsSection,
        record: &Value,
        path: &ValuePath,
        options: &Options,
    ) {
        let container = self.section_container(parent, id, "fields");
        let grid = self.doc.create_in(container, "table");
        if let Some(title) = &fields.title {
            let thead = self.doc.create_in(grid, "thead");
            let row = self.doc.create_in(thead, "tr");
            let cell = self.doc.create_in(row, "th");
            self.doc.add_class(cell, "section-title");
            set_spans(self.doc, cell, 1, 2);
            self.doc.append_text(cell, title.as_str());
        }

        let tbody = self.doc.create_in(grid, "tbody");
        for node in &fields.fields {
            let row = self.doc.create_in(tbody, "tr");
            let label = self.doc.create_in(row, "th");
            self.doc.append_text(label, node.title());
            let cell = self.doc.create_in(row, "td");
            match node {
                SchemaNode::Leaf(leaf) => {
                    let value = record.get(leaf.id.as_str()).cloned().unwrap_or_default();
                    self.emit_leaf(cell, leaf, &value, path.key(leaf.id.as_str()), options);
                }
                SchemaNode::Group(group) => {
                    self.emit_embedded(cell, group, record, path, options);
                }
            }
        }
    }

    /// A `subfields` group of a field list: header plus one body unit, in a
    /// table of its own.
    fn emit_embedded(
        &mut self,
        cell: ElementId,
        group: &GroupSpec,
        record: &Value,
        path: &ValuePath,
        options: &Options,
    ) {
        let null = Value::Null;
        let value = record.get(group.id.as_str()).unwrap_or(&null);
        let embedded = self.doc.create_in(cell, "table");
        self.doc.add_class(embedded, "embedded");
        let header = build_header(&group.children, None);
        self.emit_header(embedded, &header);
        let tbody = self.doc.create_in(embedded, "tbody");
        let unit = layout_record(&group.children, value, &path.key(group.id.as_str()));
        self.emit_body(tbody, &unit, options);
    }

    fn emit_header(&mut self, table: ElementId, header: &HeaderLayout) {
        let thead = self.doc.create_in(table, "thead");
        if let Some(title) = &header.title {
            let row = self.doc.create_in(thead, "tr");
            let cell = self.doc.create_in(row, "th");
            self.doc.add_class(cell, "section-title");
            set_spans(self.doc, cell, title.rowspan, title.colspan);
            self.doc.append_text(cell, title.title.as_str());
        }
        for cells in &header.rows {
            let row = self.doc.create_in(thead, "tr");
            for header_cell in cells {
                let cell = self.doc.create_in(row, "th");
                set_spans(self.doc, cell, header_cell.rowspan, header_cell.colspan);
                self.doc.append_text(cell, header_cell.title.as_str());
            }
        }
    }

    /// Emits the rows of one body unit and returns their elements.
    fn emit_body(&mut self, tbody: ElementId, unit: &BodyUnit<'_>, options: &Options) -> Vec<ElementId> {
        let mut rows = Vec::with_capacity(unit.rows.len());
        for cells in &unit.rows {
            let row = self.doc.create_in(tbody, "tr");
            for body_cell in cells {
                let cell = self.doc.create_in(row, "td");
                set_spans(self.doc, cell, body_cell.rowspan, body_cell.colspan);
                self.emit_leaf(cell, body_cell.leaf, &body_cell.value, body_cell.path.clone(), options);
            }
            rows.push(row);
        }
        rows
    }

    fn emit_leaf(
        &mut self,
        cell: ElementId,
        leaf: &LeafSpec,
        value: &Value,
        path: ValuePath,
        options: &Options,
    ) {
        fill_cell(self.doc, cell, self.registry, leaf, value);
        if options.is_editable() {
            self.doc.add_class(cell, "editable");
            self.bindings.bind(
                cell,
                Binding::EditCell(EditTarget {
                    leaf: leaf.clone(),
                    path,
                    cell,
                }),
            );
        }
    }
}
