//! Timing options.
//!
//! Timing arrives either as a bare duration in milliseconds or as a record:
//!
//! ```json
//! 1000
//! { "duration": 1000, "delay": 200, "easing": "ease-in", "fill": "forwards" }
//! ```

use serde::{Deserialize, Serialize};

use crate::easing::{EasingFunction, DEFAULT_EASING};
use crate::error::{AnimationError, Result};
use crate::types::FillMode;
use crate::value::KeyframeValue;

/// How unrecognized fill tokens are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillValidation {
    /// Reject with [`AnimationError::InvalidFillMode`].
    #[default]
    Strict,
    /// Fall back to [`FillMode::None`].
    Lenient,
}

/// Timing record as written by the caller. Every field is optional.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingRecord {
    pub duration: Option<KeyframeValue>,
    pub delay: Option<KeyframeValue>,
    pub easing: Option<String>,
    #[serde(alias = "fillMode")]
    pub fill: Option<String>,
}

impl TimingRecord {
    pub fn new(duration: impl Into<KeyframeValue>) -> Self {
        Self {
            duration: Some(duration.into()),
            ..Self::default()
        }
    }

    pub fn delay(mut self, delay: impl Into<KeyframeValue>) -> Self {
        self.delay = Some(delay.into());
        self
    }

    pub fn easing(mut self, easing: impl Into<String>) -> Self {
        self.easing = Some(easing.into());
        self
    }

    pub fn fill(mut self, fill: impl Into<String>) -> Self {
        self.fill = Some(fill.into());
        self
    }
}

/// Raw timing input: a duration or a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TimingInput {
    Duration(f64),
    Record(TimingRecord),
}

impl From<f64> for TimingInput {
    fn from(duration: f64) -> Self {
        Self::Duration(duration)
    }
}

impl From<u32> for TimingInput {
    fn from(duration: u32) -> Self {
        Self::Duration(duration as f64)
    }
}

impl From<TimingRecord> for TimingInput {
    fn from(record: TimingRecord) -> Self {
        Self::Record(record)
    }
}

/// Validated timing.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerOptions {
    /// Whole milliseconds.
    pub duration: u64,
    /// Whole milliseconds before the first keyframe applies.
    pub delay: u64,
    pub easing: EasingFunction,
    pub fill: FillMode,
}

impl PlayerOptions {
    /// Validate with strict fill checking and linear default easing.
    pub fn new(input: impl Into<TimingInput>) -> Result<Self> {
        Self::with_policy(input, FillValidation::Strict, DEFAULT_EASING)
    }

    /// Validate with an explicit fill policy and fallback easing.
    pub fn with_policy(
        input: impl Into<TimingInput>,
        fill_validation: FillValidation,
        default_easing: &str,
    ) -> Result<Self> {
        let record = match input.into() {
            TimingInput::Duration(duration) => TimingRecord::new(duration),
            TimingInput::Record(record) => record,
        };

        let duration = match &record.duration {
            Some(value) => {
                parse_millis(value).ok_or_else(|| AnimationError::InvalidDuration(value.to_string()))?
            }
            None => return Err(AnimationError::InvalidDuration("missing".to_string())),
        };
        let delay = match &record.delay {
            Some(value) => {
                parse_millis(value).ok_or_else(|| AnimationError::InvalidDelay(value.to_string()))?
            }
            None => 0,
        };
        let easing = EasingFunction::parse(record.easing.as_deref().unwrap_or(default_easing))?;
        let fill = match record.fill.as_deref() {
            None => FillMode::None,
            Some(token) => match (FillMode::parse(token), fill_validation) {
                (Some(fill), _) => fill,
                (None, FillValidation::Lenient) => FillMode::None,
                (None, FillValidation::Strict) => {
                    return Err(AnimationError::InvalidFillMode(token.to_string()));
                }
            },
        };

        Ok(Self {
            duration,
            delay,
            easing,
            fill,
        })
    }
}

/// Non-negative finite milliseconds, truncated to a whole number.
fn parse_millis(value: &KeyframeValue) -> Option<u64> {
    value
        .as_f64()
        .filter(|millis| millis.is_finite() && *millis >= 0.0)
        .map(|millis| millis.trunc() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_duration() {
        let options = PlayerOptions::new(1000.0).unwrap();
        assert_eq!(options.duration, 1000);
        assert_eq!(options.delay, 0);
        assert_eq!(options.easing, EasingFunction::Linear);
        assert_eq!(options.fill, FillMode::None);
    }

    #[test]
    fn test_record() {
        let options = PlayerOptions::new(
            TimingRecord::new(500)
                .delay(250.7)
                .easing("ease-in")
                .fill("forwards"),
        )
        .unwrap();
        assert_eq!(options.duration, 500);
        assert_eq!(options.delay, 250);
        assert_eq!(options.easing, EasingFunction::EaseIn);
        assert_eq!(options.fill, FillMode::Forwards);
    }

    #[test]
    fn test_durations_are_truncated() {
        assert_eq!(PlayerOptions::new(999.9).unwrap().duration, 999);
        assert_eq!(PlayerOptions::new(0.0).unwrap().duration, 0);
    }

    #[test]
    fn test_invalid_duration() {
        assert_eq!(
            PlayerOptions::new(-1.0).unwrap_err(),
            AnimationError::InvalidDuration("-1".to_string())
        );
        assert_eq!(
            PlayerOptions::new(TimingRecord::new("soon")).unwrap_err(),
            AnimationError::InvalidDuration("soon".to_string())
        );
        assert!(matches!(
            PlayerOptions::new(TimingRecord::default()),
            Err(AnimationError::InvalidDuration(_))
        ));
        assert!(matches!(
            PlayerOptions::new(f64::NAN),
            Err(AnimationError::InvalidDuration(_))
        ));
    }

    #[test]
    fn test_numeric_text_duration() {
        let options = PlayerOptions::new(TimingRecord::new("1200")).unwrap();
        assert_eq!(options.duration, 1200);
    }

    #[test]
    fn test_invalid_delay() {
        assert_eq!(
            PlayerOptions::new(TimingRecord::new(100).delay(-5)).unwrap_err(),
            AnimationError::InvalidDelay("-5".to_string())
        );
    }

    #[test]
    fn test_invalid_easing() {
        assert!(matches!(
            PlayerOptions::new(TimingRecord::new(100).easing("wobbly")),
            Err(AnimationError::InvalidEasing(_))
        ));
    }

    #[test]
    fn test_fill_validation() {
        let record = TimingRecord::new(100).fill("sideways");
        assert_eq!(
            PlayerOptions::new(record.clone()).unwrap_err(),
            AnimationError::InvalidFillMode("sideways".to_string())
        );

        let lenient =
            PlayerOptions::with_policy(record, FillValidation::Lenient, DEFAULT_EASING).unwrap();
        assert_eq!(lenient.fill, FillMode::None);
    }

    #[test]
    fn test_default_easing_policy() {
        let options =
            PlayerOptions::with_policy(100.0, FillValidation::Strict, "ease-out").unwrap();
        assert_eq!(options.easing, EasingFunction::EaseOut);
    }

    #[test]
    fn test_deserialize_timing_input() {
        let bare: TimingInput = serde_json::from_str("750").unwrap();
        assert_eq!(bare, TimingInput::Duration(750.0));

        let record: TimingInput =
            serde_json::from_str(r#"{"duration": 300, "fillMode": "both", "easing": "steps(4)"}"#)
                .unwrap();
        let options = PlayerOptions::new(record).unwrap();
        assert_eq!(options.duration, 300);
        assert_eq!(options.fill, FillMode::Both);
    }
}
