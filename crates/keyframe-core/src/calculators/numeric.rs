//! Unit-less numeric properties (`opacity`, `zIndex`).

use crate::error::{AnimationError, Result};
use crate::spectrum::StyleValueEntry;
use crate::value::format_number;

use super::StyleCalculator;

/// One interpolation segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericRangeEntry {
    pub from: f64,
    pub to: f64,
    pub diff: f64,
}

impl NumericRangeEntry {
    pub fn new(from: f64, to: f64) -> Self {
        Self {
            from,
            to,
            diff: to - from,
        }
    }

    #[inline]
    pub fn at(&self, p: f64) -> f64 {
        self.diff * p + self.from
    }
}

/// How interpolated numbers are rounded before formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rounding {
    #[default]
    Exact,
    /// Round to a whole number; halves go towards positive infinity.
    Nearest,
}

/// Linear interpolation between numeric keyframe values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NumericCalculator {
    property: String,
    rounding: Rounding,
    range: Vec<NumericRangeEntry>,
}

impl NumericCalculator {
    pub fn new(property: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            ..Self::default()
        }
    }

    /// Calculator whose output is rounded to whole numbers.
    pub fn rounded(property: impl Into<String>) -> Self {
        Self {
            rounding: Rounding::Nearest,
            ..Self::new(property)
        }
    }

    pub fn property(&self) -> &str {
        &self.property
    }

    pub fn rounding(&self) -> Rounding {
        self.rounding
    }

    pub fn range(&self) -> &[NumericRangeEntry] {
        &self.range
    }

    /// Build segments directly from parsed numbers.
    pub fn set_numbers(&mut self, numbers: &[f64]) -> Result<()> {
        if numbers.len() < 2 {
            return Err(AnimationError::partial(format!(
                "{} needs at least two keyframe values",
                self.property
            )));
        }
        self.range = numbers
            .windows(2)
            .map(|pair| NumericRangeEntry::new(pair[0], pair[1]))
            .collect();
        Ok(())
    }

    /// Interpolated number inside segment `index`, before rounding.
    pub fn calc_number(&self, index: usize, p: f64) -> f64 {
        self.range
            .get(index)
            .or(self.range.last())
            .map_or(0.0, |entry| entry.at(p))
    }
}

impl StyleCalculator for NumericCalculator {
    fn set_range(&mut self, values: &[StyleValueEntry]) -> Result<()> {
        let numbers = values
            .iter()
            .map(|entry| {
                entry
                    .value
                    .as_f64()
                    .filter(|number| number.is_finite())
                    .ok_or_else(|| {
                        AnimationError::invalid_value(&self.property, entry.value.to_style_string())
                    })
            })
            .collect::<Result<Vec<f64>>>()?;
        self.set_numbers(&numbers)
    }

    fn calculate(&self, index: usize, p: f64) -> String {
        let value = self.calc_number(index, p);
        match self.rounding {
            Rounding::Exact => format_number(value),
            Rounding::Nearest => format_number((value + 0.5).floor()),
        }
    }

    fn segment_count(&self) -> usize {
        self.range.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculators::entries;
    use crate::spectrum::StyleValueEntry;

    #[test]
    fn test_numeric_interpolation() {
        let mut calculator = NumericCalculator::new("opacity");
        calculator
            .set_range(&entries(&[("0", 0), ("1", 50), ("0.5", 100)]))
            .unwrap();

        assert_eq!(calculator.segment_count(), 2);
        assert_eq!(calculator.calculate(0, 0.0), "0");
        assert_eq!(calculator.calculate(0, 0.5), "0.5");
        assert_eq!(calculator.calculate(1, 0.5), "0.75");
        assert_eq!(calculator.final_value(), "0.5");
    }

    #[test]
    fn test_accepts_bare_numbers() {
        let values = vec![
            StyleValueEntry::new(2.0.into(), 0),
            StyleValueEntry::new(4.0.into(), 100),
        ];
        let mut calculator = NumericCalculator::new("flexGrow");
        calculator.set_range(&values).unwrap();
        assert_eq!(calculator.calculate(0, 0.25), "2.5");
        assert_eq!(
            calculator.range()[0],
            NumericRangeEntry {
                from: 2.0,
                to: 4.0,
                diff: 2.0
            }
        );
    }

    #[test]
    fn test_rounded_numeric() {
        let mut calculator = NumericCalculator::rounded("zIndex");
        calculator.set_range(&entries(&[("0", 0), ("10", 100)])).unwrap();
        assert_eq!(calculator.calculate(0, 0.26), "3");
        assert_eq!(calculator.calculate(0, 0.25), "3");
        assert_eq!(calculator.calculate(0, 0.24), "2");
        assert_eq!(calculator.final_value(), "10");
    }

    #[test]
    fn test_negative_values_never_print_negative_zero() {
        let mut calculator = NumericCalculator::rounded("order");
        calculator.set_range(&entries(&[("-1", 0), ("1", 100)])).unwrap();
        assert_eq!(calculator.calculate(0, 0.4), "0");
    }

    #[test]
    fn test_negative_halves_round_up() {
        let mut calculator = NumericCalculator::rounded("zIndex");
        calculator.set_range(&entries(&[("-5", 0), ("0", 100)])).unwrap();
        assert_eq!(calculator.calculate(0, 0.5), "-2");
        assert_eq!(calculator.calculate(0, 0.1), "-4");
    }

    #[test]
    fn test_rejects_text() {
        let mut calculator = NumericCalculator::new("opacity");
        let error = calculator
            .set_range(&entries(&[("0", 0), ("half", 100)]))
            .unwrap_err();
        assert_eq!(
            error,
            AnimationError::InvalidValue {
                property: "opacity".to_string(),
                value: "half".to_string()
            }
        );
    }

    #[test]
    fn test_needs_two_values() {
        let mut calculator = NumericCalculator::new("opacity");
        let error = calculator.set_range(&entries(&[("1", 0)])).unwrap_err();
        assert!(matches!(error, AnimationError::PartialKeyframes(_)));
    }
}
