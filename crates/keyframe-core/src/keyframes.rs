//! Keyframe input and normalization.
//!
//! This module provides:
//! - `Keyframe`: a single point in the timeline with property values
//! - `normalize_offsets`: completes and validates raw offsets
//! - `normalize`: full validation producing `CanonicalKeyframes`
//!
//! # Offsets
//!
//! Offsets are fractions in `[0, 1]`. The canonical form scales them to whole
//! percentages (`0..=100`) so the spectrum can be built on an integer grid.
//! Fractions that do not land on a whole percent are rounded to the nearest
//! one (`1/3` becomes `33`); two offsets rounding to the same percent are
//! rejected as overlapping.
//!
//! # Example
//!
//! ```
//! use keyframe_core::keyframes::{normalize, Keyframe};
//!
//! let canonical = normalize(&[
//!     Keyframe::new().set("width", "0px"),
//!     Keyframe::new().set("width", "50px"),
//!     Keyframe::new().set("width", "100px"),
//! ])
//! .unwrap();
//!
//! assert_eq!(canonical.offsets, vec![0, 50, 100]);
//! assert_eq!(canonical.lowest_common_offset, 50);
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{AnimationError, Result};
use crate::value::KeyframeValue;

/// Scaled offset of the first keyframe.
pub const MIN_OFFSET: u32 = 0;
/// Scaled offset of the last keyframe.
pub const MAX_OFFSET: u32 = 100;

/// Property values keyed by property name.
pub type StyleMap = BTreeMap<String, KeyframeValue>;

/// A single keyframe as supplied by the caller.
///
/// Deserializes from the flat object form used by style animation APIs:
/// `{ "width": "10px", "opacity": 0.5, "offset": 0.25 }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    /// Position in the timeline (0.0 to 1.0). Filled in during normalization
    /// when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<f64>,
    /// Property values at this keyframe.
    #[serde(flatten)]
    pub values: StyleMap,
}

impl Keyframe {
    /// Create an empty keyframe without an explicit offset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty keyframe pinned at `offset`.
    pub fn at(offset: f64) -> Self {
        Self {
            offset: Some(offset),
            values: StyleMap::new(),
        }
    }

    /// Set a property value for this keyframe.
    pub fn set(mut self, property: impl Into<String>, value: impl Into<KeyframeValue>) -> Self {
        self.values.insert(property.into(), value.into());
        self
    }

    /// Get a property value from this keyframe.
    pub fn get(&self, property: &str) -> Option<&KeyframeValue> {
        self.values.get(property)
    }
}

/// Validated keyframes with offsets split out and scaled to percentages.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalKeyframes {
    /// Property values per keyframe, in timeline order.
    pub entries: Vec<StyleMap>,
    /// Scaled offsets (`0..=100`), strictly ascending, parallel to `entries`.
    pub offsets: Vec<u32>,
    /// Greatest common divisor of every scaled offset.
    pub lowest_common_offset: u32,
}

impl CanonicalKeyframes {
    /// Build the canonical form from keyframes whose offsets are all present.
    pub fn new(keyframes: Vec<Keyframe>) -> Result<Self> {
        let mut entries = Vec::with_capacity(keyframes.len());
        let mut offsets: Vec<u32> = Vec::with_capacity(keyframes.len());

        for keyframe in keyframes {
            let offset = keyframe
                .offset
                .ok_or_else(|| AnimationError::partial("keyframe is missing an offset"))?;
            let scaled = scale_offset(offset)?;
            if let Some(&previous) = offsets.last() {
                if scaled <= previous {
                    return Err(AnimationError::partial(format!(
                        "offsets must be strictly ascending ({}% follows {}%)",
                        scaled, previous
                    )));
                }
            }
            offsets.push(scaled);
            entries.push(keyframe.values);
        }

        if offsets.first() != Some(&MIN_OFFSET) || offsets.last() != Some(&MAX_OFFSET) {
            return Err(AnimationError::partial("timeline must span offsets 0 to 1"));
        }

        let lowest_common_offset = offsets.iter().copied().fold(0, gcd);

        Ok(Self {
            entries,
            offsets,
            lowest_common_offset,
        })
    }

    /// Number of keyframes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false for validated keyframes; provided for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Normalized offset (0.0 to 1.0) of keyframe `index`.
    pub fn offset(&self, index: usize) -> f64 {
        self.offsets[index] as f64 / MAX_OFFSET as f64
    }

    /// Property names animated by this timeline (those of the first keyframe).
    pub fn properties(&self) -> impl Iterator<Item = &str> {
        self.entries
            .first()
            .into_iter()
            .flat_map(|entry| entry.keys().map(String::as_str))
    }
}

/// Complete the offsets of a raw keyframe list.
///
/// The first and last keyframes default to offsets 0 and 1. Middle offsets
/// must be either all present or all absent; when absent they are spread
/// evenly (`i / (n - 1)`).
pub fn normalize_offsets(keyframes: &[Keyframe]) -> Result<Vec<Keyframe>> {
    match keyframes.len() {
        0 => return Err(AnimationError::NoKeyframes),
        1 => return Err(AnimationError::partial("an animation needs at least two keyframes")),
        _ => {}
    }

    let total = keyframes.len();
    let limit = total - 1;
    let mut normalized: Vec<Keyframe> = keyframes.to_vec();

    let first_offset = *normalized[0].offset.get_or_insert(0.0);
    let last_offset = *normalized[limit].offset.get_or_insert(1.0);

    let max_middle_offsets = total - 2;
    let middle_offsets = normalized[1..limit]
        .iter()
        .filter(|kf| kf.offset.is_some())
        .count();

    if middle_offsets > 0 && middle_offsets < max_middle_offsets {
        return Err(AnimationError::partial(format!(
            "{} of {} middle keyframes carry an offset",
            middle_offsets, max_middle_offsets
        )));
    }
    if first_offset != 0.0 {
        return Err(AnimationError::partial("first keyframe offset must be 0"));
    }
    if last_offset != 1.0 {
        return Err(AnimationError::partial("last keyframe offset must be 1"));
    }

    if middle_offsets == 0 {
        let margin = 1.0 / limit as f64;
        for (i, keyframe) in normalized.iter_mut().enumerate().take(limit).skip(1) {
            keyframe.offset = Some(i as f64 * margin);
        }
    }

    Ok(normalized)
}

/// Check that the keyframes describe every property at both ends.
///
/// The first and last keyframes must name the same properties; middle
/// keyframes may omit properties but may not introduce new ones.
pub fn validate_keyframe_styles(keyframes: &[Keyframe]) -> Result<()> {
    let (Some(first), Some(last)) = (keyframes.first(), keyframes.last()) else {
        return Err(AnimationError::NoKeyframes);
    };

    if !first.values.keys().eq(last.values.keys()) {
        return Err(AnimationError::partial(
            "first and last keyframes must animate the same properties",
        ));
    }

    for keyframe in keyframes {
        if let Some(property) = keyframe
            .values
            .keys()
            .find(|property| !first.values.contains_key(*property))
        {
            return Err(AnimationError::partial(format!(
                "`{}` is not defined on the first and last keyframes",
                property
            )));
        }
    }

    Ok(())
}

/// Normalize and validate raw keyframes.
pub fn normalize(keyframes: &[Keyframe]) -> Result<CanonicalKeyframes> {
    let normalized = normalize_offsets(keyframes)?;
    validate_keyframe_styles(&normalized)?;
    CanonicalKeyframes::new(normalized)
}

fn scale_offset(offset: f64) -> Result<u32> {
    if !offset.is_finite() || !(0.0..=1.0).contains(&offset) {
        return Err(AnimationError::partial(format!(
            "offset {} is outside the range [0, 1]",
            offset
        )));
    }
    Ok((offset * MAX_OFFSET as f64).round() as u32)
}

fn gcd(a: u32, b: u32) -> u32 {
    if b == 0 { a } else { gcd(b, a % b) }
}
