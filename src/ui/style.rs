/// Semantic tone of a piece of display text. Mapped to a CSS class when the
/// document is serialised; the renderer never deals in concrete colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tone {
    Numeric,
    Enum,
    Muted,
    Error,
}

impl Tone {
    pub fn class_name(self) -> &'static str {
        match self {
            Self::Numeric => "numeric",
            Self::Enum => "enum",
            Self::Muted => "muted",
            Self::Error => "error",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Style {
    pub tone: Option<Tone>,
    pub bold: bool,
}

impl Style {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tone(mut self, tone: Tone) -> Self {
        self.tone = Some(tone);
        self
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn is_plain(&self) -> bool {
        self.tone.is_none() && !self.bold
    }

    /// Space separated CSS classes for this style.
    pub fn classes(&self) -> String {
        let mut classes = Vec::new();
        if let Some(tone) = self.tone {
            classes.push(tone.class_name());
        }
        if self.bold {
            classes.push("bold");
        }
        classes.join(" ")
    }
}
