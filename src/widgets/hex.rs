use std::sync::LazyLock;

use crate::core::value::Value;
use crate::runtime::event::KeyEvent;
use crate::widgets::text_edit::LineBuffer;
use crate::widgets::traits::{EditWidget, WidgetError};
use crate::widgets::validators::{Validator, matches, run_validators};
use regex::Regex;

static HEX_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(0[xX])?[0-9a-fA-F]+$").expect("hex pattern is valid"));

/// Integer entry in hexadecimal, with or without a `0x` prefix.
pub struct HexInput {
    buffer: LineBuffer,
    validators: Vec<Validator>,
}

impl HexInput {
    pub fn new(value: &Value) -> Self {
        let text = match value.as_i64() {
            Some(number) => format!("{number:X}"),
            None => value.to_string(),
        };
        Self {
            buffer: LineBuffer::new(text),
            validators: vec![matches(HEX_PATTERN.clone(), |input| WidgetError::NotHex {
                input,
            })],
        }
    }
}

impl EditWidget for HexInput {
    fn kind(&self) -> &'static str {
        "hex"
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
        run_validators(&self.validators, input)?;
        let digits = input
            .strip_prefix("0x")
            .or_else(|| input.strip_prefix("0X"))
            .unwrap_or(input);
        i64::from_str_radix(digits, 16)
            .map(Value::Int)
            .map_err(|_| WidgetError::NotHex {
                input: input.to_string(),
            })
    }
}
