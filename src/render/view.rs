use tracing::{debug, warn};

use crate::core::value::Value;
use crate::core::value_path::ValuePath;
use crate::edit::{EditContext, EditController, EditStep};
use crate::format::FormatRegistry;
use crate::render::binding::{Binding, Bindings};
use crate::render::section::SectionRenderer;
use crate::render::subsection::{COLLAPSED_LABEL, EXPANDED_LABEL};
use crate::runtime::event::{EventOutcome, UiEvent};
use crate::runtime::key_bindings::EditKeyBindings;
use crate::schema::{Options, SchemaMap};
use crate::ui::document::{Document, ElementId};

/// Receives the full record of a clicked row.
pub type SelectHandler = Box<dyn FnMut(&Value)>;

pub struct RenderRequest<'a> {
    pub schema: &'a SchemaMap,
    /// Section id -> section data.
    pub data: Value,
    pub on_select: Option<SelectHandler>,
}

impl<'a> RenderRequest<'a> {
    pub fn new(schema: &'a SchemaMap, data: Value) -> Self {
        Self {
            schema,
            data,
            on_select: None,
        }
    }

    pub fn with_on_select(mut self, handler: impl FnMut(&Value) + 'static) -> Self {
        self.on_select = Some(Box::new(handler));
        self
    }
}

/// Render container: owns the markup, the data being edited, the click
/// bindings and the edit controller.
pub struct GridView {
    doc: Document,
    data: Value,
    bindings: Bindings,
    registry: FormatRegistry,
    editor: EditController,
    on_select: Option<SelectHandler>,
    modified: Vec<ValuePath>,
}

impl Default for GridView {
    fn default() -> Self {
        Self::new()
    }
}

/// Clears `view` and renders every section of `request.schema`'s order into
/// it. Returns once the whole tree, subsections included, is built.
pub fn render(view: &mut GridView, request: RenderRequest<'_>) {
    view.render(request);
}

impl GridView {
    pub fn new() -> Self {
        Self {
            doc: Document::new(),
            data: Value::Null,
            bindings: Bindings::new(),
            registry: FormatRegistry::new(),
            editor: EditController::new(),
            on_select: None,
            modified: Vec::new(),
        }
    }

    pub fn with_registry(mut self, registry: FormatRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_key_bindings(mut self, key_bindings: EditKeyBindings) -> Self {
        self.editor = EditController::new().with_key_bindings(key_bindings);
        self
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn data(&self) -> &Value {
        &self.data
    }

    pub fn into_data(self) -> Value {
        self.data
    }

    pub fn editor(&self) -> &EditController {
        &self.editor
    }

    pub fn bindings(&self) -> &Bindings {
        &self.bindings
    }

    /// Paths written by commits since the last render, oldest first.
    pub fn modified_paths(&self) -> &[ValuePath] {
        self.modified.as_slice()
    }

    pub fn to_html(&self) -> String {
        self.doc.to_html()
    }

    pub fn render(&mut self, request: RenderRequest<'_>) {
        self.editor.cancel(&mut self.doc);
        self.doc.reset();
        self.bindings.clear();
        self.modified.clear();
        self.data = request.data;
        self.on_select = request.on_select;

        let root = self.doc.root();
        let mut renderer = SectionRenderer {
            doc: &mut self.doc,
            bindings: &mut self.bindings,
            registry: &self.registry,
            schema: request.schema,
            data: &self.data,
            selectable: self.on_select.is_some(),
        };
        let inherited = Options::default();
        for id in request.schema.order() {
            let path = ValuePath::root().key(id.as_str());
            renderer.render_section(root, id.as_str(), &path, &inherited);
        }
        debug!(bindings = self.bindings.len(), "render finished");
    }

    pub fn handle(&mut self, event: UiEvent) -> EventOutcome {
        match event {
            UiEvent::Click { target } => self.handle_click(target),
            UiEvent::Key(key) => {
                let (editor, ctx) = self.edit_context();
                let step = editor.on_key(ctx, key);
                self.finish_step(step)
            }
            UiEvent::Input { text } => {
                let (editor, ctx) = self.edit_context();
                let step = editor.on_input(ctx, &text);
                self.finish_step(step)
            }
        }
    }

    fn edit_context(&mut self) -> (&mut EditController, EditContext<'_>) {
        (
            &mut self.editor,
            EditContext {
                doc: &mut self.doc,
                data: &mut self.data,
                registry: &self.registry,
            },
        )
    }

    fn handle_click(&mut self, target: ElementId) -> EventOutcome {
        if self.editor.is_editing() {
            let (editor, ctx) = self.edit_context();
            let step = editor.on_click(ctx, target);
            if step != EditStep::Ignored {
                return self.finish_step(step);
            }
        }

        let chain: Vec<ElementId> = self.doc.ancestors(target).collect();
        let Some(bound) = chain
            .into_iter()
            .find(|element| self.bindings.get(*element).is_some())
        else {
            return EventOutcome::ignored();
        };

        match self.bindings.get(bound).cloned() {
            Some(Binding::SelectRow { record }) => {
                let Some(handler) = self.on_select.as_mut() else {
                    return EventOutcome::ignored();
                };
                match self.data.get_path(&record) {
                    Some(value) => {
                        debug!(record = %record, "row selected");
                        handler(value);
                        EventOutcome::consumed()
                    }
                    None => {
                        warn!(record = %record, "selected row has no record");
                        EventOutcome::ignored()
                    }
                }
            }
            Some(Binding::Toggle { .. }) => {
                self.toggle(bound);
                EventOutcome::handled()
            }
            Some(Binding::EditCell(edit_target)) => {
                let (editor, ctx) = self.edit_context();
                editor.open(ctx, edit_target);
                EventOutcome::handled()
            }
            None => EventOutcome::ignored(),
        }
    }

    fn toggle(&mut self, button: ElementId) {
        let Some(Binding::Toggle { rows, expanded }) = self.bindings.get_mut(button) else {
            return;
        };
        *expanded = !*expanded;
        for row in rows.iter() {
            self.doc.set_hidden(*row, !*expanded);
        }
        self.doc.clear_children(button);
        let label = if *expanded { EXPANDED_LABEL } else { COLLAPSED_LABEL };
        self.doc.append_text(button, label);
        debug!(expanded = *expanded, "subsections toggled");
    }

    fn finish_step(&mut self, step: EditStep) -> EventOutcome {
        match step {
            EditStep::Ignored => EventOutcome::ignored(),
            EditStep::Consumed => EventOutcome::consumed(),
            EditStep::Rejected(err) => {
                debug!(error = %err, "commit rejected");
                if let Some(surface) = self.editor.surface() {
                    self.doc.add_class(surface, "invalid");
                }
                EventOutcome::handled()
            }
            EditStep::Committed(outcome) => {
                self.modified.push(outcome.path);
                EventOutcome::handled()
            }
            EditStep::Updated | EditStep::Cancelled => EventOutcome::handled(),
        }
    }
}
