//! Color properties.
//!
//! Interpolation runs on premultiplied channels so that fading from a
//! transparent color does not drag its RGB through the result. Output is
//! un-premultiplied and written as `rgba(r,g,b,a)` with whole-number channels.

use std::fmt;
use std::rc::Rc;

use crate::env::ColorResolver;
use crate::error::{AnimationError, Result};
use crate::spectrum::StyleValueEntry;
use crate::value::format_number;

use super::StyleCalculator;

/// One interpolation segment over premultiplied `[r, g, b, a]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorRangeEntry {
    pub from: [f64; 4],
    pub to: [f64; 4],
    pub diff: [f64; 4],
}

impl ColorRangeEntry {
    pub fn new(from: [f64; 4], to: [f64; 4]) -> Self {
        let mut diff = [0.0; 4];
        for (channel, delta) in diff.iter_mut().enumerate() {
            *delta = to[channel] - from[channel];
        }
        Self { from, to, diff }
    }

    /// Premultiplied channels at progress `p`.
    pub fn at(&self, p: f64) -> [f64; 4] {
        let mut channels = [0.0; 4];
        for (channel, value) in channels.iter_mut().enumerate() {
            *value = self.diff[channel] * p + self.from[channel];
        }
        channels
    }
}

#[derive(Clone)]
pub struct ColorCalculator {
    property: String,
    resolver: Rc<dyn ColorResolver>,
    range: Vec<ColorRangeEntry>,
}

impl ColorCalculator {
    pub fn new(property: impl Into<String>, resolver: Rc<dyn ColorResolver>) -> Self {
        Self {
            property: property.into(),
            resolver,
            range: Vec::new(),
        }
    }

    pub fn range(&self) -> &[ColorRangeEntry] {
        &self.range
    }
}

impl fmt::Debug for ColorCalculator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColorCalculator")
            .field("property", &self.property)
            .field("range", &self.range)
            .finish_non_exhaustive()
    }
}

impl StyleCalculator for ColorCalculator {
    fn set_range(&mut self, values: &[StyleValueEntry]) -> Result<()> {
        let colors = values
            .iter()
            .map(|entry| {
                let text = entry.value.to_style_string();
                self.resolver
                    .resolve(&text)
                    .map(|color| color.channels())
                    .ok_or_else(|| AnimationError::InvalidColor {
                        property: self.property.clone(),
                        value: text,
                    })
            })
            .collect::<Result<Vec<[f64; 4]>>>()?;

        if colors.len() < 2 {
            return Err(AnimationError::partial(format!(
                "{} needs at least two keyframe values",
                self.property
            )));
        }
        self.range = colors
            .windows(2)
            .map(|pair| ColorRangeEntry::new(pair[0], pair[1]))
            .collect();
        Ok(())
    }

    fn calculate(&self, index: usize, p: f64) -> String {
        let Some(entry) = self.range.get(index).or(self.range.last()) else {
            return String::new();
        };
        let [r, g, b, alpha] = entry.at(p);
        let channel = |value: f64| {
            let straight = if alpha != 1.0 && value > 0.0 {
                value / alpha
            } else {
                value
            };
            format_number(straight.round().clamp(0.0, 255.0))
        };

        format!(
            "rgba({},{},{},{})",
            channel(r),
            channel(g),
            channel(b),
            format_number(alpha)
        )
    }

    fn segment_count(&self) -> usize {
        self.range.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculators::entries;
    use crate::env::{CssColorResolver, PremultipliedColor};

    fn calculator(values: &[(&str, u32)]) -> Result<ColorCalculator> {
        let mut calculator = ColorCalculator::new("color", Rc::new(CssColorResolver));
        calculator.set_range(&entries(values))?;
        Ok(calculator)
    }

    #[test]
    fn test_fades_in_from_transparent() {
        let calculator = calculator(&[("rgba(0,255,0,0)", 0), ("rgba(0,255,0,1)", 100)]).unwrap();
        assert_eq!(calculator.calculate(0, 0.0), "rgba(0,0,0,0)");
        assert_eq!(calculator.calculate(0, 0.5), "rgba(0,255,0,0.5)");
        assert_eq!(calculator.final_value(), "rgba(0,255,0,1)");
    }

    #[test]
    fn test_opaque_interpolation() {
        let calculator = calculator(&[("red", 0), ("blue", 50), ("#00ff00", 100)]).unwrap();
        assert_eq!(calculator.segment_count(), 2);
        assert_eq!(calculator.calculate(0, 0.5), "rgba(128,0,128,1)");
        assert_eq!(calculator.calculate(1, 0.0), "rgba(0,0,255,1)");
        assert_eq!(calculator.final_value(), "rgba(0,255,0,1)");
    }

    #[test]
    fn test_premultiplied_range() {
        let calculator = calculator(&[("rgba(255,0,0,0.5)", 0), ("white", 100)]).unwrap();
        assert_eq!(calculator.range()[0].from, [127.5, 0.0, 0.0, 0.5]);
        assert_eq!(calculator.range()[0].to, [255.0, 255.0, 255.0, 1.0]);
    }

    #[test]
    fn test_invalid_color() {
        let error = calculator(&[("red", 0), ("bogus", 100)]).unwrap_err();
        assert_eq!(
            error,
            AnimationError::InvalidColor {
                property: "color".to_string(),
                value: "bogus".to_string()
            }
        );
    }

    struct FixedResolver;

    impl ColorResolver for FixedResolver {
        fn resolve(&self, _color: &str) -> Option<PremultipliedColor> {
            Some(PremultipliedColor::from_straight(10.0, 20.0, 30.0, 1.0))
        }
    }

    #[test]
    fn test_uses_injected_resolver() {
        let mut calculator = ColorCalculator::new("outlineColor", Rc::new(FixedResolver));
        calculator
            .set_range(&entries(&[("anything", 0), ("at all", 100)]))
            .unwrap();
        assert_eq!(calculator.calculate(0, 0.7), "rgba(10,20,30,1)");
    }
}
