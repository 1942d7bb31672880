use crate::core::value::Value;
use crate::format::display::trim_float;
use crate::runtime::event::KeyEvent;
use crate::schema::ValueKind;
use crate::widgets::text_edit::LineBuffer;
use crate::widgets::traits::{EditWidget, WidgetError};

/// Numeric entry for `int`, `float`, `siprefix`, `degrees` and, with a
/// scale of 100, `percent`. The draft shows `stored * scale`; commits store
/// `input / scale` as the leaf's storage kind. Confirming an untouched draft
/// gives back the original number.
pub struct NumberInput {
    buffer: LineBuffer,
    kind: ValueKind,
    scale: f64,
    original: Option<(String, Value)>,
}

impl NumberInput {
    pub fn new(value: &Value, kind: ValueKind) -> Self {
        Self::scaled(value, kind, 1.0)
    }

    pub fn percent(value: &Value, kind: ValueKind) -> Self {
        Self::scaled(value, kind, 100.0)
    }

    fn scaled(value: &Value, kind: ValueKind, scale: f64) -> Self {
        let text = match value {
            Value::Int(number) if scale == 1.0 => number.to_string(),
            // shortest form that parses back to the same f64
            Value::Float(number) if scale == 1.0 => format!("{number}"),
            other => match other.as_f64() {
                Some(number) => trim_float(number * scale),
                None => other.to_string(),
            },
        };
        let original = matches!(value, Value::Int(_) | Value::Float(_))
            .then(|| (text.clone(), value.clone()));
        Self {
            buffer: LineBuffer::new(text),
            kind,
            scale,
            original,
        }
    }
}

impl EditWidget for NumberInput {
    fn kind(&self) -> &'static str {
        "number"
    }

    fn draft(&self) -> String {
        self.buffer.text().to_string()
    }

    fn on_key(&mut self, key: KeyEvent) -> bool {
        self.buffer.apply_key(key)
    }

    fn set_text(&mut self, text: &str) {
        self.buffer.set_text(text);
    }

    fn extract(&self) -> Result<Value, WidgetError> {
        let input = self.buffer.text().trim();
        if input.is_empty() {
            return Ok(Value::Null);
        }
        if let Some((draft, value)) = &self.original {
            if draft == input {
                return Ok(value.clone());
            }
        }
        if self.kind == ValueKind::Int && self.scale == 1.0 {
            if let Ok(number) = input.parse::<i64>() {
                return Ok(Value::Int(number));
            }
        }

        let parsed = input
            .parse::<f64>()
            .ok()
            .filter(|number| number.is_finite())
            .ok_or_else(|| WidgetError::NotANumber {
                input: input.to_string(),
            })?;
        let stored = parsed / self.scale;
        match self.kind {
            ValueKind::Float => Ok(Value::Float(stored)),
            ValueKind::Int if stored.fract() == 0.0 && stored.abs() < i64::MAX as f64 => {
                Ok(Value::Int(stored as i64))
            }
            ValueKind::Int => Err(WidgetError::NotAnInteger {
                input: input.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::NumberInput;
    use crate::core::value::Value;
    use crate::schema::ValueKind;
    use crate::widgets::traits::{EditWidget, WidgetError};

    #[test]
    fn percent_round_trips_through_scale() {
        let mut input = NumberInput::percent(&Value::Float(0.5), ValueKind::Float);
        assert_eq!(input.draft(), "50");
        input.set_text("75");
        assert_eq!(input.extract(), Ok(Value::Float(0.75)));
    }

    #[test]
    fn empty_numeric_input_is_null() {
        let mut input = NumberInput::new(&Value::Int(3), ValueKind::Int);
        input.set_text("  ");
        assert_eq!(input.extract(), Ok(Value::Null));
    }

    #[test]
    fn storage_kind_decides_int_or_float() {
        let mut input = NumberInput::new(&Value::Null, ValueKind::Int);
        input.set_text("-12");
        assert_eq!(input.extract(), Ok(Value::Int(-12)));
        input.set_text("4.0");
        assert_eq!(input.extract(), Ok(Value::Int(4)));
        input.set_text("4.5");
        assert_eq!(
            input.extract(),
            Err(WidgetError::NotAnInteger { input: "4.5".into() })
        );

        let mut input = NumberInput::new(&Value::Int(2), ValueKind::Float);
        input.set_text("2");
        assert_eq!(input.extract(), Ok(Value::Float(2.0)));
    }

    #[test]
    fn rejects_text_and_non_finite_numbers() {
        let mut input = NumberInput::new(&Value::Null, ValueKind::Float);
        for bad in ["abc", "NaN", "inf"] {
            input.set_text(bad);
            assert_eq!(
                input.extract(),
                Err(WidgetError::NotANumber { input: bad.into() })
            );
        }
    }

    #[test]
    fn untouched_float_draft_commits_the_exact_value() {
        for number in [0.0167086342, 6.674e-11, 1.0 / 3.0, 5.97e24] {
            let input = NumberInput::new(&Value::Float(number), ValueKind::Float);
            assert_eq!(input.draft().parse::<f64>(), Ok(number));
            assert_eq!(input.extract(), Ok(Value::Float(number)));
        }
    }

    #[test]
    fn untouched_percent_draft_keeps_tiny_values() {
        let input = NumberInput::percent(&Value::Float(1e-12), ValueKind::Float);
        assert_eq!(input.draft(), "0");
        assert_eq!(input.extract(), Ok(Value::Float(1e-12)));

        let mut input = NumberInput::percent(&Value::Float(1e-12), ValueKind::Float);
        input.set_text("2");
        assert_eq!(input.extract(), Ok(Value::Float(0.02)));
    }
}
