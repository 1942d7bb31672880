use crate::core::value::Value;
use crate::runtime::event::{KeyCode, KeyEvent};
use crate::ui::document::{Document, ElementId};
use crate::widgets::traits::{EditWidget, WidgetError};
use crate::widgets::validators::{Validator, one_of, run_validators};

/// Choice among `""` and the leaf's enumerated values.
pub struct SelectInput {
    options: Vec<String>,
    selected: usize,
    /// Text set from outside that matched no option; rejected on extract.
    typed: Option<String>,
    validators: Vec<Validator>,
}

impl SelectInput {
    pub fn new(value: &Value, enumvals: &[String]) -> Self {
        let mut options = Vec::with_capacity(enumvals.len() + 1);
        options.push(String::new());
        options.extend(enumvals.iter().cloned());

        let current = value.to_string();
        let (selected, typed) = match options.iter().position(|option| *option == current) {
            Some(idx) => (idx, None),
            None => (0, Some(current)),
        };
        Self {
            validators: vec![one_of(options.clone())],
            options,
            selected,
            typed,
        }
    }

    pub fn options(&self) -> &[String] {
        self.options.as_slice()
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    fn step(&mut self, forward: bool) {
        let len = self.options.len();
        self.selected = if forward {
            (self.selected + 1) % len
        } else {
            (self.selected + len - 1) % len
        };
        self.typed = None;
    }
}

impl EditWidget for SelectInput {
    fn kind(&self) -> &'static str {
        "select"
    }

    fn draft(&self) -> String {
        match &self.typed {
            Some(text) => text.clone(),
            None => self.options[self.selected].clone(),
        }
    }

    fn on_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Down | KeyCode::Tab => {
                self.step(true);
                true
            }
            KeyCode::Up => {
                self.step(false);
                true
            }
            _ => false,
        }
    }

    fn set_text(&mut self, text: &str) {
        match self.options.iter().position(|option| option == text) {
            Some(idx) => {
                self.selected = idx;
                self.typed = None;
            }
            None => self.typed = Some(text.to_string()),
        }
    }

    fn extract(&self) -> Result<Value, WidgetError> {
        let draft = self.draft();
        run_validators(&self.validators, &draft)?;
        if draft.is_empty() {
            Ok(Value::Null)
        } else {
            Ok(Value::Text(draft))
        }
    }

    fn draw(&self, doc: &mut Document, parent: ElementId) -> ElementId {
        let select = doc.create_in(parent, "select");
        doc.add_class(select, "widget-select");
        for (idx, option) in self.options.iter().enumerate() {
            let item = doc.create_in(select, "option");
            doc.set_attr(item, "value", option.as_str());
            if idx == self.selected && self.typed.is_none() {
                doc.set_attr(item, "selected", "selected");
            }
            doc.append_text(item, option.as_str());
        }
        select
    }
}

#[cfg(test)]
mod tests {
    use super::SelectInput;
    use crate::core::value::Value;
    use crate::runtime::event::{KeyCode, KeyEvent};
    use crate::widgets::traits::{EditWidget, WidgetError};

    fn kinds() -> Vec<String> {
        vec!["STAR".into(), "PLANET".into()]
    }

    #[test]
    fn starts_on_current_value_and_cycles() {
        let mut input = SelectInput::new(&Value::Text("PLANET".into()), &kinds());
        assert_eq!(input.selected(), 2);
        input.on_key(KeyEvent::new(KeyCode::Down));
        assert_eq!(input.extract(), Ok(Value::Null));
        input.on_key(KeyEvent::new(KeyCode::Up));
        assert_eq!(input.extract(), Ok(Value::Text("PLANET".into())));
    }

    #[test]
    fn rejects_values_outside_the_options() {
        let mut input = SelectInput::new(&Value::Null, &kinds());
        assert_eq!(input.options().len(), 3);
        input.set_text("MOON");
        assert_eq!(
            input.extract(),
            Err(WidgetError::NotAllowed { input: "MOON".into() })
        );
        input.set_text("STAR");
        assert_eq!(input.extract(), Ok(Value::Text("STAR".into())));
    }
}
