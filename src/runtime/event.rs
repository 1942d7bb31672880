use crate::ui::document::ElementId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Char(char),
    Enter,
    Tab,
    Esc,
    Backspace,
    Delete,
    Home,
    End,
    Left,
    Right,
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyModifiers(u8);

impl KeyModifiers {
    pub const NONE: Self = Self(0);
    pub const SHIFT: Self = Self(1 << 0);
    pub const CONTROL: Self = Self(1 << 1);
    pub const ALT: Self = Self(1 << 2);

    pub fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyEvent {
    pub fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::NONE,
        }
    }

    pub fn with_modifiers(mut self, modifiers: KeyModifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

/// Interaction delivered to a rendered view by its host.
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    /// Pointer activation on an element; bubbles to its ancestors.
    Click { target: ElementId },
    /// Key press at document level.
    Key(KeyEvent),
    /// Whole-text replacement of the focused input, as a browser `input`
    /// event would report it.
    Input { text: String },
}

impl UiEvent {
    pub fn click(target: ElementId) -> Self {
        Self::Click { target }
    }

    pub fn key(code: KeyCode) -> Self {
        Self::Key(KeyEvent::new(code))
    }

    pub fn input(text: impl Into<String>) -> Self {
        Self::Input { text: text.into() }
    }
}

/// What handling an event did, reported back to the host.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EventOutcome {
    pub handled: bool,
    /// The document changed and should be repainted.
    pub request_render: bool,
}

impl EventOutcome {
    pub fn ignored() -> Self {
        Self::default()
    }

    pub fn consumed() -> Self {
        Self {
            handled: true,
            request_render: false,
        }
    }

    pub fn handled() -> Self {
        Self {
            handled: true,
            request_render: true,
        }
    }
}
