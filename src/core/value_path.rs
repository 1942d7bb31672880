use crate::core::value::Value;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

/// Absolute address of a node inside the data tree handed to the renderer,
/// e.g. `bodies[2].rings.red`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ValuePath {
    segments: Vec<PathSegment>,
}

impl ValuePath {
    pub fn new(segments: Vec<PathSegment>) -> Self {
        Self { segments }
    }

    pub fn root() -> Self {
        Self::default()
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[PathSegment] {
        self.segments.as_slice()
    }

    pub fn key(&self, key: impl Into<String>) -> Self {
        let mut next = self.clone();
        next.segments.push(PathSegment::Key(key.into()));
        next
    }

    pub fn index(&self, index: usize) -> Self {
        let mut next = self.clone();
        next.segments.push(PathSegment::Index(index));
        next
    }

    /// The last key segment, i.e. the field a leaf path points at.
    pub fn last_key(&self) -> Option<&str> {
        match self.segments.last() {
            Some(PathSegment::Key(key)) => Some(key.as_str()),
            _ => None,
        }
    }

    pub fn parse(input: &str) -> Result<Self, ValuePathParseError> {
        let chars: Vec<char> = input.trim().chars().collect();
        let mut idx = 0usize;
        let mut segments = Vec::<PathSegment>::new();

        while idx < chars.len() {
            match chars[idx] {
                '.' if segments.is_empty() => {
                    return Err(ValuePathParseError::LeadingSeparator);
                }
                '.' => {
                    idx += 1;
                    segments.push(PathSegment::Key(read_key(&chars, &mut idx)?));
                }
                '[' => segments.push(read_bracket(&chars, &mut idx)?),
                _ if segments.is_empty() => {
                    segments.push(PathSegment::Key(read_key(&chars, &mut idx)?));
                }
                ch => {
                    return Err(ValuePathParseError::Unexpected { ch, position: idx });
                }
            }
        }

        Ok(Self::new(segments))
    }
}

impl fmt::Display for ValuePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Key(key) if is_identifier(key) => {
                    if idx > 0 {
                        f.write_str(".")?;
                    }
                    f.write_str(key)?;
                }
                PathSegment::Key(key) => {
                    write!(f, "[\"{}\"]", key.replace('\\', "\\\\").replace('"', "\\\""))?;
                }
                PathSegment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValuePathParseError {
    #[error("path cannot start with '.'")]
    LeadingSeparator,
    #[error("unexpected character '{ch}' at position {position}")]
    Unexpected { ch: char, position: usize },
    #[error("expected key at position {0}")]
    MissingKey(usize),
    #[error("unterminated '[' segment")]
    Unterminated,
    #[error("empty bracket segment")]
    EmptyBracket,
}

fn read_key(chars: &[char], idx: &mut usize) -> Result<String, ValuePathParseError> {
    let start = *idx;
    while *idx < chars.len() && !matches!(chars[*idx], '.' | '[' | ']') {
        *idx += 1;
    }
    if *idx == start {
        return Err(ValuePathParseError::MissingKey(start));
    }
    Ok(chars[start..*idx].iter().collect())
}

fn read_bracket(chars: &[char], idx: &mut usize) -> Result<PathSegment, ValuePathParseError> {
    // skip '['
    *idx += 1;
    let Some(&first) = chars.get(*idx) else {
        return Err(ValuePathParseError::Unterminated);
    };

    if first == '"' {
        *idx += 1;
        let mut key = String::new();
        loop {
            let Some(&ch) = chars.get(*idx) else {
                return Err(ValuePathParseError::Unterminated);
            };
            *idx += 1;
            match ch {
                '\\' => {
                    let Some(&escaped) = chars.get(*idx) else {
                        return Err(ValuePathParseError::Unterminated);
                    };
                    key.push(escaped);
                    *idx += 1;
                }
                '"' => break,
                other => key.push(other),
            }
        }
        if chars.get(*idx) != Some(&']') {
            return Err(ValuePathParseError::Unterminated);
        }
        *idx += 1;
        return Ok(PathSegment::Key(key));
    }

    let start = *idx;
    while *idx < chars.len() && chars[*idx] != ']' {
        *idx += 1;
    }
    if *idx >= chars.len() {
        return Err(ValuePathParseError::Unterminated);
    }
    let raw: String = chars[start..*idx].iter().collect();
    *idx += 1;

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValuePathParseError::EmptyBracket);
    }
    Ok(match trimmed.parse::<usize>() {
        Ok(index) => PathSegment::Index(index),
        Err(_) => PathSegment::Key(trimmed.to_string()),
    })
}

fn is_identifier(input: &str) -> bool {
    let mut chars = input.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_ascii_alphabetic() || first == '_')
        && chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
}

impl Value {
    pub fn get_path(&self, path: &ValuePath) -> Option<&Value> {
        path.segments()
            .iter()
            .try_fold(self, |current, segment| match (segment, current) {
                (PathSegment::Key(key), Value::Object(map)) => map.get(key.as_str()),
                (PathSegment::Index(index), Value::List(list)) => list.get(*index),
                _ => None,
            })
    }

    pub fn get_path_mut(&mut self, path: &ValuePath) -> Option<&mut Value> {
        let mut current = self;
        for segment in path.segments() {
            current = match (segment, current) {
                (PathSegment::Key(key), Value::Object(map)) => map.get_mut(key.as_str())?,
                (PathSegment::Index(index), Value::List(list)) => list.get_mut(*index)?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Writes `value` at `path`, creating intermediate objects and lists
    /// (padded with `Null`) where they are missing.
    pub fn set_path(&mut self, path: &ValuePath, value: Value) {
        *ensure_path_mut(self, path) = value;
    }
}

fn ensure_path_mut<'a>(root: &'a mut Value, path: &ValuePath) -> &'a mut Value {
    let mut current = root;
    for segment in path.segments() {
        current = match segment {
            PathSegment::Key(key) => {
                if !matches!(current, Value::Object(_)) {
                    *current = Value::Object(Default::default());
                }
                match current {
                    Value::Object(map) => map.entry(key.clone()).or_insert(Value::Null),
                    _ => unreachable!("replaced with an object above"),
                }
            }
            PathSegment::Index(index) => {
                if !matches!(current, Value::List(_)) {
                    *current = Value::List(Vec::new());
                }
                match current {
                    Value::List(list) => {
                        if list.len() <= *index {
                            list.resize(index + 1, Value::Null);
                        }
                        &mut list[*index]
                    }
                    _ => unreachable!("replaced with a list above"),
                }
            }
        };
    }
    current
}
