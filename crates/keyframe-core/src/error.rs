//! Error types for keyframe animations.
//!
//! Every variant is raised while an animation is being constructed. A player
//! that was built successfully never fails during playback.

use thiserror::Error;

/// Result type for keyframe engine operations.
pub type Result<T> = std::result::Result<T, AnimationError>;

/// Errors that can occur while building an animation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnimationError {
    /// No keyframes were supplied.
    #[error("argument 1 must be a list of keyframe objects")]
    NoKeyframes,

    /// Offsets or property sets do not describe a complete timeline.
    #[error("partial keyframes are not supported: {0}")]
    PartialKeyframes(String),

    /// Duration is missing, negative or not a number.
    #[error("duration must be a non-negative number (got {0})")]
    InvalidDuration(String),

    /// Delay is negative or not a number.
    #[error("delay must be a non-negative number (got {0})")]
    InvalidDelay(String),

    /// Fill token is not one of `none`, `forwards`, `backwards`, `both`.
    #[error("invalid fill mode `{0}`")]
    InvalidFillMode(String),

    /// Easing identifier is not recognized.
    #[error("invalid easing `{0}`")]
    InvalidEasing(String),

    /// Two keyframes of a dimensional property use different units.
    #[error("only values sharing one unit can be animated ({property}: `{from}` and `{to}`)")]
    UnitMismatch {
        property: String,
        from: String,
        to: String,
    },

    /// A color value could not be resolved to channels.
    #[error("unable to parse color `{value}` for {property}")]
    InvalidColor { property: String, value: String },

    /// A keyframe value cannot be interpolated by the property's calculator.
    #[error("invalid value `{value}` for {property}")]
    InvalidValue { property: String, value: String },
}

impl AnimationError {
    pub(crate) fn partial(reason: impl Into<String>) -> Self {
        Self::PartialKeyframes(reason.into())
    }

    pub(crate) fn invalid_value(property: &str, value: impl Into<String>) -> Self {
        Self::InvalidValue {
            property: property.to_string(),
            value: value.into(),
        }
    }
}
