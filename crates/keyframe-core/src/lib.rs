//! Keyframe timeline engine.
//!
//! Takes a list of keyframes (style property maps at offsets between 0 and 1)
//! plus timing, validates them, precomputes per-property lookup tables and
//! drives a per-element player that writes interpolated style values on every
//! tick.
//!
//! # Architecture
//!
//! ```text
//! Keyframe[] ──normalize──▶ CanonicalKeyframes ──▶ Spectrum (grid lookup)
//!                                                     │
//! TimingInput ──▶ PlayerOptions                        ▼
//!                      │          PropertyRegistry ──▶ Calculator per property
//!                      ▼                               │
//!                  Animation ──create/start──▶ Player ◀┘
//!                                                │
//!                      Clock ──tick──▶ Player ──write_style──▶ StyleSink
//! ```
//!
//! Hosts provide the [`Clock`], [`StyleSink`], [`ColorResolver`] and
//! [`Logger`] through an [`Environment`]; [`mock`] holds in-memory versions.

pub mod animation;
pub mod calculators;
pub mod easing;
pub mod env;
pub mod error;
pub mod events;
pub mod keyframes;
pub mod mock;
pub mod options;
pub mod player;
pub mod properties;
pub mod spectrum;
pub mod types;
pub mod value;

pub use animation::{Animation, AnimationDocument};
pub use calculators::{
    Calculator, ColorCalculator, DimensionalCalculator, NumericCalculator, StyleCalculator,
    TransformCalculator,
};
pub use easing::{EasingFunction, StepPosition};
pub use env::{
    Clock, ColorResolver, CssColorResolver, Environment, Logger, ManualClock, NoopLogger,
    PremultipliedColor, StyleSink, SystemClock, TracingLogger,
};
pub use error::{AnimationError, Result};
pub use events::{EventQueue, PlayerEvent};
pub use keyframes::{normalize, CanonicalKeyframes, Keyframe};
pub use options::{FillValidation, PlayerOptions, TimingInput, TimingRecord};
pub use player::{AnimationPropertyEntry, Player};
pub use properties::{PropertyClass, PropertyRegistry};
pub use spectrum::Spectrum;
pub use types::{FillMode, PlayState, PlayerId};
pub use value::KeyframeValue;

pub use keyframe_config::KeyframeConfig;
