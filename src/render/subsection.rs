use tracing::debug;

use crate::core::value::Value;
use crate::core::value_path::ValuePath;
use crate::render::binding::Binding;
use crate::render::section::{RecordRows, SectionRenderer};
use crate::schema::{Options, SubsectionRef};

pub const COLLAPSED_LABEL: &str = "+";
pub const EXPANDED_LABEL: &str = "−";
pub const TOGGLE_CLASS: &str = "toggle";

impl SectionRenderer<'_> {
    /// Renders the subsections of one table record beneath its rows, each in
    /// a full-width cell, and adds the collapse toggle when asked to.
    pub(crate) fn render_subsections(
        &mut self,
        emitted: &RecordRows,
        subsections: &[SubsectionRef],
        record: &Value,
        record_path: &ValuePath,
        options: &Options,
    ) {
        let mut nested_rows = Vec::new();
        for sub in subsections {
            let present = record
                .get(sub.id.as_str())
                .is_some_and(|nested| !nested.is_empty());
            if !present {
                continue;
            }

            let row = self.doc.create_in(emitted.tbody, "tr");
            self.doc.add_class(row, "subsection");
            let cell = self.doc.create_in(row, "td");
            self.doc.set_attr(cell, "colspan", emitted.column_count.max(1).to_string());
            let produced =
                self.render_section(cell, sub.section.as_str(), &record_path.key(sub.id.as_str()), options);
            if produced {
                nested_rows.push(row);
            } else {
                self.doc.detach(row);
            }
        }

        if !options.is_collapsible() || nested_rows.is_empty() {
            return;
        }
        let Some(anchor) = emitted
            .rows
            .first()
            .and_then(|row| self.doc.child_elements(*row).first().copied())
        else {
            return;
        };
        for row in &nested_rows {
            self.doc.set_hidden(*row, true);
        }
        let toggle = self.doc.create("button");
        self.doc.add_class(toggle, TOGGLE_CLASS);
        self.doc.append_text(toggle, COLLAPSED_LABEL);
        self.doc.prepend(anchor, toggle);
        debug!(path = %record_path, nested = nested_rows.len(), "collapsible subsections");
        self.bindings.bind(
            toggle,
            Binding::Toggle {
                rows: nested_rows,
                expanded: false,
            },
        );
    }
}
