//! Display formatters: pure `Value -> SpanLine` functions keyed by format
//! name in the [`FormatRegistry`](super::FormatRegistry).

use crate::core::value::Value;
use crate::schema::LeafSpec;
use crate::ui::span::{Span, SpanLine};
use crate::ui::style::{Style, Tone};

const SI_PREFIXES: [(i32, &str); 8] = [
    (-3, "n"),
    (-2, "µ"),
    (-1, "m"),
    (0, ""),
    (1, "k"),
    (2, "M"),
    (3, "G"),
    (4, "T"),
];

fn numeric(text: String) -> SpanLine {
    vec![Span::styled(text, Style::new().tone(Tone::Numeric))]
}

/// Falls back to the raw form for values that are not numbers.
fn with_number(value: &Value, f: impl FnOnce(f64) -> String) -> SpanLine {
    match value.as_f64() {
        Some(number) => numeric(f(number)),
        None => raw(value, None),
    }
}

/// Shortest decimal form, with float noise below 1e-9 rounded away.
pub fn trim_float(value: f64) -> String {
    let rounded = if value.abs() < 1e6 {
        (value * 1e9).round() / 1e9
    } else {
        value
    };
    if rounded == 0.0 {
        return "0".to_string();
    }
    format!("{rounded}")
}

/// Three significant digits with an SI prefix: `1500` -> `1.5k`. Values
/// outside the prefix range use scientific notation: `6.67e-11`.
pub fn si_prefix(value: f64) -> String {
    if value == 0.0 || !value.is_finite() {
        return trim_float(value);
    }
    let mut exponent = (value.abs().log10() / 3.0).floor() as i32;
    let mut text = three_digits(value / 1000f64.powi(exponent));
    // 999.6 rounds to 1000: carry into the next prefix
    if text.parse::<f64>().is_ok_and(|rounded| rounded.abs() >= 1000.0) {
        exponent += 1;
        text = three_digits(value / 1000f64.powi(exponent));
    }
    let Some((_, prefix)) = SI_PREFIXES.iter().find(|(exp, _)| *exp == exponent) else {
        return scientific(value);
    };
    format!("{text}{prefix}")
}

fn three_digits(scaled: f64) -> String {
    let magnitude = scaled.abs().log10().floor() as i32;
    let decimals = (2 - magnitude).clamp(0, 2) as usize;
    trim_zeros(format!("{scaled:.decimals$}"))
}

fn scientific(value: f64) -> String {
    let text = format!("{value:.2e}");
    match text.split_once('e') {
        Some((mantissa, exp)) => format!("{}e{exp}", trim_zeros(mantissa.to_string())),
        None => text,
    }
}

fn trim_zeros(text: String) -> String {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        text
    }
}

/// Raw string form; the registry's default entry.
pub fn raw(value: &Value, _leaf: Option<&LeafSpec>) -> SpanLine {
    vec![Span::new(value.to_string())]
}

pub fn empty(_value: &Value, _leaf: &LeafSpec) -> SpanLine {
    vec![Span::styled("—", Style::new().tone(Tone::Muted))]
}

pub fn text(value: &Value, _leaf: &LeafSpec) -> SpanLine {
    raw(value, None)
}

pub fn int(value: &Value, _leaf: &LeafSpec) -> SpanLine {
    match value {
        Value::Int(number) => numeric(number.to_string()),
        Value::Float(number) if number.fract() == 0.0 => numeric(format!("{}", *number as i64)),
        other => with_number(other, trim_float),
    }
}

pub fn float(value: &Value, _leaf: &LeafSpec) -> SpanLine {
    with_number(value, trim_float)
}

pub fn percent(value: &Value, _leaf: &LeafSpec) -> SpanLine {
    with_number(value, |number| format!("{}%", trim_float(number * 100.0)))
}

pub fn degrees(value: &Value, _leaf: &LeafSpec) -> SpanLine {
    with_number(value, |number| format!("{}°", trim_float(number)))
}

pub fn siprefix(value: &Value, _leaf: &LeafSpec) -> SpanLine {
    with_number(value, si_prefix)
}

pub fn hex(value: &Value, _leaf: &LeafSpec) -> SpanLine {
    match value.as_i64() {
        Some(number) => numeric(format!("0x{number:X}")),
        None => raw(value, None),
    }
}

pub fn enumeration(value: &Value, _leaf: &LeafSpec) -> SpanLine {
    vec![Span::styled(value.to_string(), Style::new().tone(Tone::Enum))]
}

pub fn valarray(value: &Value, _leaf: &LeafSpec) -> SpanLine {
    match value.as_list() {
        Some(items) => vec![Span::new(
            items
                .iter()
                .map(Value::to_string)
                .collect::<Vec<_>>()
                .join(", "),
        )],
        None => raw(value, None),
    }
}
