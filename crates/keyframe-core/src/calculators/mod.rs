//! Per-property value calculators.
//!
//! A calculator is built once from a property's keyframe values and then maps
//! `(segment index, local progress)` to the style string for that instant.
//! Segment `i` runs from value `i` to value `i + 1`.
//!
//! ```text
//! Calculator
//!   ├── Numeric        opacity: 0.5
//!   ├── Dimensional    width: 50px
//!   ├── Color          color: rgba(0,255,0,0.5)
//!   └── Transform      transform: scale(2, 1) rotate(45deg)
//! ```

pub mod color;
pub mod dimensional;
pub mod numeric;
pub mod transform;

use std::rc::Rc;

pub use color::ColorCalculator;
pub use dimensional::{split_dimension, DimensionalCalculator};
pub use numeric::{NumericCalculator, NumericRangeEntry, Rounding};
pub use transform::TransformCalculator;

use crate::env::ColorResolver;
use crate::error::Result;
use crate::properties::PropertyClass;
use crate::spectrum::StyleValueEntry;

/// Interpolates one property between consecutive keyframe values.
pub trait StyleCalculator {
    /// Prepare segments from the property's keyframe values.
    fn set_range(&mut self, values: &[StyleValueEntry]) -> Result<()>;

    /// Style string at local progress `p` (0.0 to 1.0) inside segment `index`.
    fn calculate(&self, index: usize, p: f64) -> String;

    /// Number of interpolation segments.
    fn segment_count(&self) -> usize;

    /// Value of the last keyframe.
    fn final_value(&self) -> String {
        self.calculate(self.segment_count().saturating_sub(1), 1.0)
    }
}

/// Calculator of any supported property class.
#[derive(Debug, Clone)]
pub enum Calculator {
    Numeric(NumericCalculator),
    Dimensional(DimensionalCalculator),
    Color(ColorCalculator),
    Transform(TransformCalculator),
}

impl Calculator {
    /// Build and prime the calculator for `property`.
    pub fn resolve(
        property: &str,
        class: PropertyClass,
        values: &[StyleValueEntry],
        colors: &Rc<dyn ColorResolver>,
    ) -> Result<Self> {
        let mut calculator = match class {
            PropertyClass::Numeric => Self::Numeric(NumericCalculator::new(property)),
            PropertyClass::RoundedNumeric => Self::Numeric(NumericCalculator::rounded(property)),
            PropertyClass::Dimensional => Self::Dimensional(DimensionalCalculator::new(property)),
            PropertyClass::Color => {
                Self::Color(ColorCalculator::new(property, Rc::clone(colors)))
            }
            PropertyClass::Transform => Self::Transform(TransformCalculator::new(property)),
        };
        calculator.set_range(values)?;
        Ok(calculator)
    }

    pub fn class(&self) -> PropertyClass {
        match self {
            Self::Numeric(numeric) => match numeric.rounding() {
                Rounding::Exact => PropertyClass::Numeric,
                Rounding::Nearest => PropertyClass::RoundedNumeric,
            },
            Self::Dimensional(_) => PropertyClass::Dimensional,
            Self::Color(_) => PropertyClass::Color,
            Self::Transform(_) => PropertyClass::Transform,
        }
    }

    fn inner(&self) -> &dyn StyleCalculator {
        match self {
            Self::Numeric(inner) => inner,
            Self::Dimensional(inner) => inner,
            Self::Color(inner) => inner,
            Self::Transform(inner) => inner,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn StyleCalculator {
        match self {
            Self::Numeric(inner) => inner,
            Self::Dimensional(inner) => inner,
            Self::Color(inner) => inner,
            Self::Transform(inner) => inner,
        }
    }
}

impl StyleCalculator for Calculator {
    fn set_range(&mut self, values: &[StyleValueEntry]) -> Result<()> {
        self.inner_mut().set_range(values)
    }

    fn calculate(&self, index: usize, p: f64) -> String {
        self.inner().calculate(index, p)
    }

    fn segment_count(&self) -> usize {
        self.inner().segment_count()
    }

    fn final_value(&self) -> String {
        self.inner().final_value()
    }
}

#[cfg(test)]
pub(crate) fn entries(values: &[(&str, u32)]) -> Vec<StyleValueEntry> {
    values
        .iter()
        .map(|(value, offset)| StyleValueEntry::new((*value).into(), *offset))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::CssColorResolver;
    use crate::error::AnimationError;

    fn colors() -> Rc<dyn ColorResolver> {
        Rc::new(CssColorResolver)
    }

    #[test]
    fn test_resolve_picks_calculator_family() {
        let values = entries(&[("1", 0), ("3", 100)]);
        let calculator =
            Calculator::resolve("zIndex", PropertyClass::RoundedNumeric, &values, &colors())
                .unwrap();
        assert_eq!(calculator.class(), PropertyClass::RoundedNumeric);
        assert_eq!(calculator.calculate(0, 0.3), "2");

        let values = entries(&[("0px", 0), ("100px", 100)]);
        let calculator =
            Calculator::resolve("width", PropertyClass::Dimensional, &values, &colors()).unwrap();
        assert_eq!(calculator.class(), PropertyClass::Dimensional);
        assert_eq!(calculator.calculate(0, 0.5), "50px");
    }

    #[test]
    fn test_resolve_propagates_range_errors() {
        let values = entries(&[("100px", 0), ("50%", 100)]);
        let error = Calculator::resolve("width", PropertyClass::Dimensional, &values, &colors())
            .unwrap_err();
        assert!(matches!(error, AnimationError::UnitMismatch { .. }));
    }

    #[test]
    fn test_final_value_matches_end_of_last_segment() {
        let cases = [
            (PropertyClass::Numeric, "opacity", entries(&[("0", 0), ("0.4", 50), ("1", 100)])),
            (PropertyClass::Dimensional, "width", entries(&[("0em", 0), ("4em", 100)])),
            (PropertyClass::Color, "color", entries(&[("red", 0), ("blue", 100)])),
            (
                PropertyClass::Transform,
                "transform",
                entries(&[("scale(1)", 0), ("scale(2) rotate(90deg)", 100)]),
            ),
        ];

        for (class, property, values) in cases {
            let calculator = Calculator::resolve(property, class, &values, &colors()).unwrap();
            let last = calculator.segment_count() - 1;
            assert_eq!(calculator.final_value(), calculator.calculate(last, 1.0));
        }
    }
}
