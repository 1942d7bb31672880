use crate::runtime::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;

/// Commands the edit surface reacts to at document level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditCommand {
    Commit,
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyBinding {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBinding {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    pub fn key(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    pub fn ctrl(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::CONTROL)
    }

    pub fn from_event(event: KeyEvent) -> Self {
        Self {
            code: event.code,
            modifiers: event.modifiers,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct EditKeyBindings {
    bindings: HashMap<KeyBinding, EditCommand>,
}

impl EditKeyBindings {
    /// Enter confirms, Escape cancels.
    pub fn new() -> Self {
        let mut bindings = Self::default();
        bindings.bind(KeyBinding::key(KeyCode::Enter), EditCommand::Commit);
        bindings.bind(KeyBinding::key(KeyCode::Esc), EditCommand::Cancel);
        bindings
    }

    pub fn bind(&mut self, key: KeyBinding, command: EditCommand) {
        self.bindings.insert(key, command);
    }

    pub fn unbind(&mut self, key: &KeyBinding) {
        self.bindings.remove(key);
    }

    pub fn with_binding(mut self, key: KeyBinding, command: EditCommand) -> Self {
        self.bind(key, command);
        self
    }

    pub fn resolve(&self, event: KeyEvent) -> Option<EditCommand> {
        self.bindings.get(&KeyBinding::from_event(event)).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::{EditCommand, EditKeyBindings, KeyBinding};
    use crate::runtime::event::{KeyCode, KeyEvent, KeyModifiers};

    #[test]
    fn defaults_confirm_on_enter_and_cancel_on_escape() {
        let bindings = EditKeyBindings::new();
        assert_eq!(
            bindings.resolve(KeyEvent::new(KeyCode::Enter)),
            Some(EditCommand::Commit)
        );
        assert_eq!(
            bindings.resolve(KeyEvent::new(KeyCode::Esc)),
            Some(EditCommand::Cancel)
        );
        assert_eq!(bindings.resolve(KeyEvent::new(KeyCode::Char('a'))), None);
    }

    #[test]
    fn modifiers_are_part_of_the_binding() {
        let bindings = EditKeyBindings::new()
            .with_binding(KeyBinding::ctrl(KeyCode::Char('s')), EditCommand::Commit);
        let ctrl_s = KeyEvent::new(KeyCode::Char('s')).with_modifiers(KeyModifiers::CONTROL);

        assert_eq!(bindings.resolve(ctrl_s), Some(EditCommand::Commit));
        assert_eq!(bindings.resolve(KeyEvent::new(KeyCode::Char('s'))), None);
    }
}
