//! Raw keyframe values.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A property value as written in a keyframe: either a bare number or a
/// style string such as `"10px"`, `"#ff0000"` or `"scale(2)"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KeyframeValue {
    Number(f64),
    Text(String),
}

impl KeyframeValue {
    /// Numeric value, parsing text when the whole string is a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            Self::Text(text) => text.trim().parse::<f64>().ok(),
        }
    }

    /// Text form, as a style sink would receive it.
    pub fn to_style_string(&self) -> String {
        match self {
            Self::Number(value) => format_number(*value),
            Self::Text(text) => text.trim().to_string(),
        }
    }
}

impl fmt::Display for KeyframeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_style_string())
    }
}

impl From<f64> for KeyframeValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for KeyframeValue {
    fn from(value: i32) -> Self {
        Self::Number(value as f64)
    }
}

impl From<&str> for KeyframeValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for KeyframeValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Format a number the way style values are written: shortest decimal form,
/// no trailing `.0`, and never `-0`.
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    format!("{}", value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(50.0), "50");
        assert_eq!(format_number(0.5), "0.5");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(-12.25), "-12.25");
    }

    #[test]
    fn test_as_f64() {
        assert_eq!(KeyframeValue::from(3).as_f64(), Some(3.0));
        assert_eq!(KeyframeValue::from(" 0.25 ").as_f64(), Some(0.25));
        assert_eq!(KeyframeValue::from("10px").as_f64(), None);
    }

    #[test]
    fn test_untagged_deserialization() {
        let values: Vec<KeyframeValue> = serde_json::from_str(r#"[1, "2px", 0.5]"#).unwrap();
        assert_eq!(
            values,
            vec![
                KeyframeValue::Number(1.0),
                KeyframeValue::Text("2px".to_string()),
                KeyframeValue::Number(0.5),
            ]
        );
    }

    #[test]
    fn test_style_string() {
        assert_eq!(KeyframeValue::from(100).to_style_string(), "100");
        assert_eq!(KeyframeValue::from(" red ").to_string(), "red");
    }
}
