use thiserror::Error;
use tracing::debug;

use crate::core::value::Value;
use crate::core::value_path::ValuePath;
use crate::edit::listeners::{DocumentListeners, ListenerKind, Subscription};
use crate::format::FormatRegistry;
use crate::render::cell::fill_cell;
use crate::runtime::event::KeyEvent;
use crate::runtime::key_bindings::{EditCommand, EditKeyBindings};
use crate::schema::LeafSpec;
use crate::ui::document::{Document, ElementId};
use crate::widgets::{EditWidget, WidgetError};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EditError {
    #[error("no edit session is open")]
    NotEditing,
    #[error("invalid value for `{path}`: {source}")]
    Invalid {
        path: ValuePath,
        #[source]
        source: WidgetError,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditState {
    Closed,
    Editing,
}

/// The cell an edit session writes back to.
#[derive(Debug, Clone, PartialEq)]
pub struct EditTarget {
    pub leaf: LeafSpec,
    pub path: ValuePath,
    pub cell: ElementId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CommitOutcome {
    pub path: ValuePath,
    pub value: Value,
}

/// Result of routing one event through the controller.
#[derive(Debug, Clone, PartialEq)]
pub enum EditStep {
    /// Not for the edit surface; let the view handle it.
    Ignored,
    /// Swallowed without a state change.
    Consumed,
    /// The draft changed and the control was redrawn.
    Updated,
    Committed(CommitOutcome),
    Cancelled,
    /// Commit was requested but the draft did not parse; still editing.
    Rejected(EditError),
}

/// Borrowed view state the controller works on.
pub struct EditContext<'a> {
    pub doc: &'a mut Document,
    pub data: &'a mut Value,
    pub registry: &'a FormatRegistry,
}

struct EditSession {
    target: EditTarget,
    widget: Box<dyn EditWidget>,
    surface: ElementId,
    control: ElementId,
    confirm: ElementId,
    cancel: ElementId,
    subscriptions: Vec<Subscription>,
}

/// Owner of the single open edit session.
///
/// Document listeners are subscribed when a session opens and released on
/// every way out of it, so with no session open nothing is listening.
pub struct EditController {
    session: Option<EditSession>,
    listeners: DocumentListeners,
    key_bindings: EditKeyBindings,
}

impl Default for EditController {
    fn default() -> Self {
        Self::new()
    }
}

impl EditController {
    pub fn new() -> Self {
        Self {
            session: None,
            listeners: DocumentListeners::new(),
            key_bindings: EditKeyBindings::new(),
        }
    }

    pub fn with_key_bindings(mut self, key_bindings: EditKeyBindings) -> Self {
        self.key_bindings = key_bindings;
        self
    }

    pub fn key_bindings(&self) -> &EditKeyBindings {
        &self.key_bindings
    }

    pub fn state(&self) -> EditState {
        if self.session.is_some() {
            EditState::Editing
        } else {
            EditState::Closed
        }
    }

    pub fn is_editing(&self) -> bool {
        self.session.is_some()
    }

    pub fn editing_path(&self) -> Option<&ValuePath> {
        self.session.as_ref().map(|session| &session.target.path)
    }

    pub fn draft(&self) -> Option<String> {
        self.session.as_ref().map(|session| session.widget.draft())
    }

    pub fn surface(&self) -> Option<ElementId> {
        self.session.as_ref().map(|session| session.surface)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.listener_count()
    }

    /// Opens a session on `target`. An already open session is cancelled
    /// first, leaving its record untouched.
    pub fn open(&mut self, ctx: EditContext<'_>, target: EditTarget) {
        if self.session.is_some() {
            debug!("cancelling open edit session before opening another");
            self.cancel(ctx.doc);
        }

        let value = ctx.data.get_path(&target.path).cloned().unwrap_or_default();
        let widget = ctx.registry.widget(&target.leaf, &value);
        let doc = ctx.doc;

        let surface = doc.create_in(target.cell, "div");
        doc.add_class(surface, "edit-surface");
        doc.set_attr(surface, "data-path", target.path.to_string());
        if let Some(label) = &target.leaf.edit_label {
            let node = doc.create_in(surface, "label");
            doc.add_class(node, "edit-label");
            doc.append_text(node, label.as_str());
        }
        let control = doc.create_in(surface, "span");
        doc.add_class(control, "edit-control");
        widget.draw(doc, control);
        if let Some(suffix) = &target.leaf.edit_suffix {
            let node = doc.create_in(surface, "span");
            doc.add_class(node, "edit-suffix");
            doc.append_text(node, suffix.as_str());
        }
        let confirm = doc.create_in(surface, "button");
        doc.add_class(confirm, "edit-confirm");
        doc.append_text(confirm, "OK");
        let cancel = doc.create_in(surface, "button");
        doc.add_class(cancel, "edit-cancel");
        doc.append_text(cancel, "Cancel");

        let subscriptions = vec![
            self.listeners.subscribe(ListenerKind::OutsideClick),
            self.listeners.subscribe(ListenerKind::KeyPress),
        ];
        debug!(path = %target.path, format = %target.leaf.format, "edit session opened");
        self.session = Some(EditSession {
            target,
            widget,
            surface,
            control,
            confirm,
            cancel,
            subscriptions,
        });
    }

    pub fn on_click(&mut self, ctx: EditContext<'_>, target: ElementId) -> EditStep {
        let Some((surface, confirm, cancel)) = self
            .session
            .as_ref()
            .map(|session| (session.surface, session.confirm, session.cancel))
        else {
            return EditStep::Ignored;
        };
        if ctx.doc.contains(confirm, target) {
            return self.commit_step(ctx);
        }
        if ctx.doc.contains(cancel, target) {
            self.cancel(ctx.doc);
            return EditStep::Cancelled;
        }
        if ctx.doc.contains(surface, target) {
            return EditStep::Consumed;
        }
        if !self.listeners.is_listening(ListenerKind::OutsideClick) {
            return EditStep::Ignored;
        }
        debug!("click outside edit surface");
        self.cancel(ctx.doc);
        EditStep::Cancelled
    }

    pub fn on_key(&mut self, ctx: EditContext<'_>, key: KeyEvent) -> EditStep {
        if self.session.is_none() || !self.listeners.is_listening(ListenerKind::KeyPress) {
            return EditStep::Ignored;
        }
        match self.key_bindings.resolve(key) {
            Some(EditCommand::Commit) => self.commit_step(ctx),
            Some(EditCommand::Cancel) => {
                self.cancel(ctx.doc);
                EditStep::Cancelled
            }
            None => {
                let Some(session) = self.session.as_mut() else {
                    return EditStep::Ignored;
                };
                if !session.widget.on_key(key) {
                    return EditStep::Consumed;
                }
                redraw_control(ctx.doc, session);
                EditStep::Updated
            }
        }
    }

    /// Replaces the whole draft, as typing into the control would.
    pub fn on_input(&mut self, ctx: EditContext<'_>, text: &str) -> EditStep {
        let Some(session) = self.session.as_mut() else {
            return EditStep::Ignored;
        };
        session.widget.set_text(text);
        redraw_control(ctx.doc, session);
        EditStep::Updated
    }

    fn commit_step(&mut self, ctx: EditContext<'_>) -> EditStep {
        match self.commit(ctx) {
            Ok(outcome) => EditStep::Committed(outcome),
            Err(err) => EditStep::Rejected(err),
        }
    }

    /// Writes the draft into the record and redraws that one cell. On a
    /// parse failure nothing is written and the session stays open.
    pub fn commit(&mut self, ctx: EditContext<'_>) -> Result<CommitOutcome, EditError> {
        let session = self.session.as_ref().ok_or(EditError::NotEditing)?;
        let value = session.widget.extract().map_err(|source| {
            debug!(path = %session.target.path, error = %source, "edit rejected");
            EditError::Invalid {
                path: session.target.path.clone(),
                source,
            }
        })?;

        let Some(session) = self.close(ctx.doc) else {
            return Err(EditError::NotEditing);
        };
        let EditTarget { leaf, path, cell } = session.target;
        ctx.data.set_path(&path, value.clone());
        fill_cell(ctx.doc, cell, ctx.registry, &leaf, &value);
        ctx.doc.add_class(cell, "modified");
        debug!(path = %path, "edit committed");

        Ok(CommitOutcome { path, value })
    }

    /// Discards the draft. Returns `false` when no session was open.
    pub fn cancel(&mut self, doc: &mut Document) -> bool {
        let closed = self.close(doc);
        if let Some(session) = &closed {
            debug!(path = %session.target.path, "edit cancelled");
        }
        closed.is_some()
    }

    fn close(&mut self, doc: &mut Document) -> Option<EditSession> {
        let mut session = self.session.take()?;
        doc.detach(session.surface);
        for subscription in session.subscriptions.drain(..) {
            self.listeners.unsubscribe(subscription);
        }
        Some(session)
    }
}

fn redraw_control(doc: &mut Document, session: &EditSession) {
    doc.clear_children(session.control);
    session.widget.draw(doc, session.control);
}

#[cfg(test)]
mod tests {
    use super::{EditContext, EditController, EditError, EditStep, EditTarget};
    use crate::core::value::Value;
    use crate::core::value_path::ValuePath;
    use crate::format::FormatRegistry;
    use crate::render::cell::fill_cell;
    use crate::runtime::event::{KeyCode, KeyEvent};
    use crate::schema::LeafSpec;
    use crate::ui::document::{Document, ElementId};
    use crate::widgets::WidgetError;
    use serde_json::json;

    struct Fixture {
        doc: Document,
        data: Value,
        registry: FormatRegistry,
        editor: EditController,
    }

    impl Fixture {
        fn new(data: serde_json::Value) -> Self {
            Self {
                doc: Document::new(),
                data: Value::from_json(data),
                registry: FormatRegistry::new(),
                editor: EditController::new(),
            }
        }

        fn ctx(&mut self) -> (&mut EditController, EditContext<'_>) {
            (
                &mut self.editor,
                EditContext {
                    doc: &mut self.doc,
                    data: &mut self.data,
                    registry: &self.registry,
                },
            )
        }

        fn cell(&mut self, leaf: &LeafSpec, path: &ValuePath) -> ElementId {
            let root = self.doc.root();
            let cell = self.doc.create_in(root, "td");
            let value = self.data.get_path(path).cloned().unwrap_or_default();
            fill_cell(&mut self.doc, cell, &self.registry, leaf, &value);
            cell
        }

        fn open(&mut self, leaf: LeafSpec, path: ValuePath) -> ElementId {
            let cell = self.cell(&leaf, &path);
            let (editor, ctx) = self.ctx();
            editor.open(ctx, EditTarget { leaf, path, cell });
            cell
        }
    }

    #[test]
    fn percent_edit_shows_scaled_value_and_commits_fraction() {
        let mut fx = Fixture::new(json!({"rows": [{"albedo": 0.5}]}));
        let path = ValuePath::root().key("rows").index(0).key("albedo");
        let cell = fx.open(LeafSpec::new("albedo", "Albedo", "percent"), path.clone());

        assert_eq!(fx.editor.draft().as_deref(), Some("50"));
        assert_eq!(fx.editor.listener_count(), 2);

        let (editor, ctx) = fx.ctx();
        editor.on_input(ctx, "75");
        let (editor, ctx) = fx.ctx();
        let outcome = editor.commit(ctx).expect("commit");

        assert_eq!(outcome.value, Value::Float(0.75));
        assert_eq!(fx.data.get_path(&path), Some(&Value::Float(0.75)));
        assert_eq!(fx.doc.text_content(cell), "75%");
        assert!(fx.doc.has_class(cell, "modified"));
        assert_eq!(fx.editor.listener_count(), 0);
    }

    #[test]
    fn empty_numeric_commit_writes_null() {
        let mut fx = Fixture::new(json!({"mass": 3.5}));
        let path = ValuePath::root().key("mass");
        let cell = fx.open(LeafSpec::new("mass", "Mass", "float"), path.clone());

        let (editor, ctx) = fx.ctx();
        editor.on_input(ctx, "");
        let (editor, ctx) = fx.ctx();
        editor.commit(ctx).expect("commit");

        assert_eq!(fx.data.get_path(&path), Some(&Value::Null));
        assert!(fx.doc.has_class(cell, "empty"));
    }

    #[test]
    fn escape_cancels_without_touching_the_record() {
        let mut fx = Fixture::new(json!({"name": "Sol"}));
        let before = fx.data.clone();
        let cell = fx.open(LeafSpec::new("name", "Name", "string"), ValuePath::root().key("name"));

        let (editor, ctx) = fx.ctx();
        assert_eq!(editor.on_key(ctx, KeyEvent::new(KeyCode::Char('x'))), EditStep::Updated);
        let (editor, ctx) = fx.ctx();
        assert_eq!(editor.on_key(ctx, KeyEvent::new(KeyCode::Esc)), EditStep::Cancelled);

        assert_eq!(fx.data, before);
        assert_eq!(fx.editor.listener_count(), 0);
        assert_eq!(fx.doc.text_content(cell), "Sol");
    }

    #[test]
    fn invalid_input_keeps_session_open() {
        let mut fx = Fixture::new(json!({"seed": 4660}));
        let before = fx.data.clone();
        fx.open(LeafSpec::new("seed", "Seed", "hex"), ValuePath::root().key("seed"));

        let (editor, ctx) = fx.ctx();
        editor.on_input(ctx, "xyz");
        let (editor, ctx) = fx.ctx();
        let step = editor.on_key(ctx, KeyEvent::new(KeyCode::Enter));

        assert_eq!(
            step,
            EditStep::Rejected(EditError::Invalid {
                path: ValuePath::root().key("seed"),
                source: WidgetError::NotHex { input: "xyz".into() },
            })
        );
        assert!(fx.editor.is_editing());
        assert_eq!(fx.data, before);
    }

    #[test]
    fn opening_a_second_session_cancels_the_first() {
        let mut fx = Fixture::new(json!({"a": 1, "b": 2}));
        fx.open(LeafSpec::new("a", "A", "int"), ValuePath::root().key("a"));
        let (editor, ctx) = fx.ctx();
        editor.on_input(ctx, "10");
        fx.open(LeafSpec::new("b", "B", "int"), ValuePath::root().key("b"));

        assert_eq!(fx.editor.editing_path(), Some(&ValuePath::root().key("b")));
        assert_eq!(fx.editor.listener_count(), 2);
        assert_eq!(fx.data.get_path(&ValuePath::root().key("a")), Some(&Value::Int(1)));
        assert_eq!(fx.doc.find_by_class("edit-surface").len(), 1);
    }

    #[test]
    fn click_outside_cancels_and_inside_is_consumed() {
        let mut fx = Fixture::new(json!({"a": 1}));
        fx.open(LeafSpec::new("a", "A", "int"), ValuePath::root().key("a"));
        let surface = fx.editor.surface().expect("surface");

        let (editor, ctx) = fx.ctx();
        assert_eq!(editor.on_click(ctx, surface), EditStep::Consumed);

        let root = fx.doc.root();
        let elsewhere = fx.doc.create_in(root, "p");
        let (editor, ctx) = fx.ctx();
        assert_eq!(editor.on_click(ctx, elsewhere), EditStep::Cancelled);
        assert!(!fx.editor.is_editing());

        let (editor, ctx) = fx.ctx();
        assert_eq!(editor.on_click(ctx, elsewhere), EditStep::Ignored);
    }

    #[test]
    fn commit_without_session_is_an_error() {
        let mut fx = Fixture::new(json!({}));
        let (editor, ctx) = fx.ctx();
        assert_eq!(editor.commit(ctx), Err(EditError::NotEditing));
    }

    #[test]
    fn edit_label_and_suffix_surround_the_control() {
        let mut fx = Fixture::new(json!({"radius": 1.0}));
        let mut leaf = LeafSpec::new("radius", "Radius", "float");
        leaf.edit_label = Some("Relative to Earth".into());
        leaf.edit_suffix = Some("R⊕".into());
        let cell = fx.open(leaf, ValuePath::root().key("radius"));

        let text = fx.doc.text_content(cell);
        assert!(text.contains("Relative to Earth"));
        assert!(text.contains("R⊕"));
        assert_eq!(fx.doc.find_by_tag(cell, "input").len(), 1);
    }
}
