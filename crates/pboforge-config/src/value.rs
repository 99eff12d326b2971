//! Config values.

use std::fmt;

/// Right-hand side of a variable or an element of an array.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    String(String),
    Int(i32),
    Float(f32),
    Array(Vec<ConfigValue>),
}

impl ConfigValue {
    /// Parse a numeric literal: 32-bit integer first, then 32-bit float.
    pub fn parse_number(text: &str) -> Option<Self> {
        if let Ok(value) = text.parse::<i32>() {
            return Some(ConfigValue::Int(value));
        }
        text.parse::<f32>().ok().filter(|value| value.is_finite()).map(ConfigValue::Float)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::String(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            ConfigValue::Int(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f32> {
        match self {
            ConfigValue::Float(value) => Some(*value),
            ConfigValue::Int(value) => Some(*value as f32),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[ConfigValue]> {
        match self {
            ConfigValue::Array(values) => Some(values),
            _ => None,
        }
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        ConfigValue::String(value.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(value: String) -> Self {
        ConfigValue::String(value)
    }
}

impl From<i32> for ConfigValue {
    fn from(value: i32) -> Self {
        ConfigValue::Int(value)
    }
}

impl From<f32> for ConfigValue {
    fn from(value: f32) -> Self {
        ConfigValue::Float(value)
    }
}

impl From<Vec<ConfigValue>> for ConfigValue {
    fn from(values: Vec<ConfigValue>) -> Self {
        ConfigValue::Array(values)
    }
}

/// Source form: strings quoted and escaped, floats always with a `.`.
impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigValue::String(value) => write!(f, "\"{}\"", value.replace('"', "\\\"")),
            ConfigValue::Int(value) => write!(f, "{value}"),
            ConfigValue::Float(value) => {
                let text = value.to_string();
                if text.contains('.') || !value.is_finite() {
                    f.write_str(&text)
                } else {
                    write!(f, "{text}.0")
                }
            }
            ConfigValue::Array(values) => write_array(f, values),
        }
    }
}

/// Write `{a, b, c}`.
pub(crate) fn write_array(f: &mut impl fmt::Write, values: &[ConfigValue]) -> fmt::Result {
    f.write_char('{')?;
    for (index, value) in values.iter().enumerate() {
        if index > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{value}")?;
    }
    f.write_char('}')
}
