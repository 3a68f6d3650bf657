//! Unit-suffixed properties (`width: 10px`, `rotate: 45deg`).
//!
//! Every keyframe of a property must use the same unit; a bare number takes
//! the calculator's default unit.

use crate::error::{AnimationError, Result};
use crate::spectrum::StyleValueEntry;

use super::numeric::NumericCalculator;
use super::StyleCalculator;

pub const DEFAULT_UNIT: &str = "px";

/// Split `"-12.5px"` into `(-12.5, "px")`.
///
/// The number is an optional sign followed by digits and at most one decimal
/// point; whatever follows is the unit.
pub fn split_dimension(value: &str) -> Option<(f64, &str)> {
    let value = value.trim();
    let bytes = value.as_bytes();

    let mut end = 0;
    if matches!(bytes.first(), Some(b'-' | b'+')) {
        end = 1;
    }
    let mut seen_point = false;
    let mut seen_digit = false;
    while let Some(&byte) = bytes.get(end) {
        match byte {
            b'0'..=b'9' => seen_digit = true,
            b'.' if !seen_point => seen_point = true,
            _ => break,
        }
        end += 1;
    }
    if !seen_digit {
        return None;
    }

    let number = value[..end].parse::<f64>().ok()?;
    Some((number, value[end..].trim()))
}

/// Linear interpolation between values sharing one unit.
#[derive(Debug, Clone, PartialEq)]
pub struct DimensionalCalculator {
    numeric: NumericCalculator,
    default_unit: String,
    unit: String,
}

impl DimensionalCalculator {
    pub fn new(property: impl Into<String>) -> Self {
        Self::with_default_unit(property, DEFAULT_UNIT)
    }

    /// Calculator where unit-less values mean `unit`.
    pub fn with_default_unit(property: impl Into<String>, unit: impl Into<String>) -> Self {
        let unit = unit.into();
        Self {
            numeric: NumericCalculator::new(property),
            default_unit: unit.clone(),
            unit,
        }
    }

    /// Unit shared by every keyframe.
    pub fn unit(&self) -> &str {
        &self.unit
    }

    pub fn numeric(&self) -> &NumericCalculator {
        &self.numeric
    }
}

impl StyleCalculator for DimensionalCalculator {
    fn set_range(&mut self, values: &[StyleValueEntry]) -> Result<()> {
        let property = self.numeric.property().to_string();
        let mut numbers = Vec::with_capacity(values.len());
        let mut shared: Option<(String, String)> = None;

        for entry in values {
            let text = entry.value.to_style_string();
            let (number, unit) = split_dimension(&text)
                .ok_or_else(|| AnimationError::invalid_value(&property, text.as_str()))?;
            let unit = if unit.is_empty() {
                self.default_unit.as_str()
            } else {
                unit
            };

            match &shared {
                Some((shared_unit, first)) if shared_unit != unit => {
                    return Err(AnimationError::UnitMismatch {
                        property,
                        from: first.clone(),
                        to: text,
                    });
                }
                Some(_) => {}
                None => shared = Some((unit.to_string(), text.clone())),
            }
            numbers.push(number);
        }

        self.numeric.set_numbers(&numbers)?;
        if let Some((unit, _)) = shared {
            self.unit = unit;
        }
        Ok(())
    }

    fn calculate(&self, index: usize, p: f64) -> String {
        format!("{}{}", self.numeric.calculate(index, p), self.unit)
    }

    fn segment_count(&self) -> usize {
        self.numeric.segment_count()
    }
}
