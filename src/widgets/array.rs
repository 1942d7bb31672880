use crate::core::value::Value;
use crate::runtime::event::KeyEvent;
use crate::schema::ItemSpec;
use crate::widgets::text_edit::LineBuffer;
use crate::widgets::traits::{EditWidget, WidgetError};
use crate::widgets::validators::{Validator, one_of, run_validators};

/// Comma separated list entry for `valarray` leaves.
pub struct ArrayInput {
    buffer: LineBuffer,
    item_format: String,
    validators: Vec<Validator>,
}

impl ArrayInput {
    pub fn new(value: &Value, item: Option<&ItemSpec>) -> Self {
        let text = match value.as_list() {
            Some(items) => items
                .iter()
                .map(Value::to_string)
                .collect::<Vec<_>>()
                .join(", "),
            None => value.to_string(),
        };
        let (item_format, enumvals) = item
            .map(|item| (item.format.clone(), item.enumvals.clone()))
            .unwrap_or_default();
        Self {
            buffer: LineBuffer::new(text),
            item_format,
            validators: vec![one_of(enumvals)],
        }
    }

    fn parse_item(&self, item: &str) -> Result<Value, WidgetError> {
        run_validators(&self.validators, item)?;
        match self.item_format.as_str() {
            "int" => item.parse::<i64>().map(Value::Int).map_err(|_| WidgetError::NotAnInteger {
                input: item.to_string(),
            }),
            "float" => item
                .parse::<f64>()
                .ok()
                .filter(|number| number.is_finite())
                .map(Value::Float)
                .ok_or_else(|| WidgetError::NotANumber {
                    input: item.to_string(),
                }),
            _ => Ok(Value::Text(item.to_string())),
        }
    }
}

impl EditWidget for ArrayInput {
    fn kind(&self) -> &'static str {
        "valarray"
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
        let items = self
            .buffer
            .text()
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(|item| self.parse_item(item))
            .collect::<Result<Vec<_>, _>>()?;
        if items.is_empty() {
            Ok(Value::Null)
        } else {
            Ok(Value::List(items))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ArrayInput;
    use crate::core::value::Value;
    use crate::schema::ItemSpec;
    use crate::widgets::traits::{EditWidget, WidgetError};
    use serde_json::json;

    fn economy() -> ItemSpec {
        ItemSpec {
            format: "enum".into(),
            enumvals: vec!["Agricultural".into(), "Industrial".into(), "Mining".into()],
        }
    }

    #[test]
    fn splits_and_validates_items() {
        let value = Value::from_json(json!(["Mining"]));
        let mut input = ArrayInput::new(&value, Some(&economy()));
        assert_eq!(input.draft(), "Mining");

        input.set_text("Mining,  Industrial ,");
        assert_eq!(
            input.extract(),
            Ok(Value::from_json(json!(["Mining", "Industrial"])))
        );

        input.set_text("Mining, Tourism");
        assert_eq!(
            input.extract(),
            Err(WidgetError::NotAllowed { input: "Tourism".into() })
        );
    }

    #[test]
    fn blank_list_is_null_and_numbers_parse() {
        let item = ItemSpec {
            format: "int".into(),
            enumvals: Vec::new(),
        };
        let mut input = ArrayInput::new(&Value::Null, Some(&item));
        input.set_text(" , ");
        assert_eq!(input.extract(), Ok(Value::Null));
        input.set_text("1, 2");
        assert_eq!(input.extract(), Ok(Value::from_json(json!([1, 2]))));
    }
}
