//! Timing curves.
//!
//! An easing maps linear progress to eased progress. Every curve here maps
//! `[0, 1]` onto `[0, 1]`, keeps `f(0) = 0` and `f(1) = 1` and never
//! decreases, which the spectrum lookup relies on.
//!
//! ```
//! use keyframe_core::easing::EasingFunction;
//!
//! let curve = EasingFunction::parse("cubic-bezier(0.4, 0, 0.2, 1)").unwrap();
//! assert_eq!(curve.evaluate(1.0), 1.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{AnimationError, Result};

/// Identifier used when no easing is specified.
pub const DEFAULT_EASING: &str = "linear";

/// Where the jumps of a `steps()` curve happen.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepPosition {
    /// `start`, `jump-start`
    Start,
    /// `end`, `jump-end`
    #[default]
    End,
    /// `jump-both`
    Both,
    /// `jump-none`
    None,
}

impl StepPosition {
    fn parse(token: &str) -> Option<Self> {
        match token {
            "start" | "jump-start" => Some(Self::Start),
            "end" | "jump-end" => Some(Self::End),
            "jump-both" => Some(Self::Both),
            "jump-none" => Some(Self::None),
            _ => None,
        }
    }
}

/// A resolved easing identifier.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EasingFunction {
    #[default]
    Linear,
    Ease,
    EaseIn,
    EaseOut,
    EaseInOut,
    /// Control points `(x1, y1)` and `(x2, y2)`, all within `[0, 1]`.
    CubicBezier { x1: f64, y1: f64, x2: f64, y2: f64 },
    Steps { count: u32, position: StepPosition },
}

impl EasingFunction {
    /// Resolve an easing identifier.
    ///
    /// Accepts `linear`, `ease`, `ease-in`, `ease-out`, `ease-in-out`,
    /// `step-start`, `step-end`, `cubic-bezier(x1, y1, x2, y2)` and
    /// `steps(n[, position])`. Anything else fails with `InvalidEasing`.
    pub fn parse(identifier: &str) -> Result<Self> {
        let normalized = identifier.trim().to_ascii_lowercase();
        let invalid = || AnimationError::InvalidEasing(identifier.to_string());

        match normalized.as_str() {
            "linear" => return Ok(Self::Linear),
            "ease" => return Ok(Self::Ease),
            "ease-in" => return Ok(Self::EaseIn),
            "ease-out" => return Ok(Self::EaseOut),
            "ease-in-out" => return Ok(Self::EaseInOut),
            "step-start" => return Self::steps(1, StepPosition::Start),
            "step-end" => return Self::steps(1, StepPosition::End),
            _ => {}
        }

        let (name, args) = split_call(&normalized).ok_or_else(invalid)?;
        match name {
            "cubic-bezier" => {
                let points = args
                    .iter()
                    .map(|arg| arg.parse::<f64>())
                    .collect::<std::result::Result<Vec<_>, _>>()
                    .map_err(|_| invalid())?;
                match points.as_slice() {
                    [x1, y1, x2, y2] => Self::cubic_bezier(*x1, *y1, *x2, *y2),
                    _ => Err(invalid()),
                }
            }
            "steps" => {
                let (count, position) = match args.as_slice() {
                    [count] => (*count, StepPosition::End),
                    [count, position] => (*count, StepPosition::parse(position).ok_or_else(invalid)?),
                    _ => return Err(invalid()),
                };
                let count = count.parse::<u32>().map_err(|_| invalid())?;
                Self::steps(count, position)
            }
            _ => Err(invalid()),
        }
    }

    /// Eased progress for `progress`, clamped to `[0, 1]` first.
    pub fn evaluate(&self, progress: f64) -> f64 {
        let progress = progress.clamp(0.0, 1.0);
        match *self {
            Self::Linear => progress,
            Self::Steps { count, position } => stepped(count, position, progress),
            curve => {
                let [x1, y1, x2, y2] = curve.control_points();
                bezier(x1, y1, x2, y2, progress)
            }
        }
    }

    /// Control points of the bezier curves; the identity curve otherwise.
    fn control_points(&self) -> [f64; 4] {
        match *self {
            Self::Ease => [0.25, 0.1, 0.25, 1.0],
            Self::EaseIn => [0.42, 0.0, 1.0, 1.0],
            Self::EaseOut => [0.0, 0.0, 0.58, 1.0],
            Self::EaseInOut => [0.42, 0.0, 0.58, 1.0],
            Self::CubicBezier { x1, y1, x2, y2 } => [x1, y1, x2, y2],
            Self::Linear | Self::Steps { .. } => [0.0, 0.0, 1.0, 1.0],
        }
    }

    /// Bezier curve from control points in `[0, 1]`. Y values outside that
    /// range would overshoot the timeline and are rejected.
    pub fn cubic_bezier(x1: f64, y1: f64, x2: f64, y2: f64) -> Result<Self> {
        let unit = 0.0..=1.0;
        if [x1, y1, x2, y2].iter().all(|v| unit.contains(v)) {
            Ok(Self::CubicBezier { x1, y1, x2, y2 })
        } else {
            Err(AnimationError::InvalidEasing(format!(
                "cubic-bezier({}, {}, {}, {})",
                x1, y1, x2, y2
            )))
        }
    }

    /// Stepped curve; `jump-none` needs at least two steps.
    pub fn steps(count: u32, position: StepPosition) -> Result<Self> {
        let minimum = if position == StepPosition::None { 2 } else { 1 };
        if count < minimum {
            return Err(AnimationError::InvalidEasing(format!("steps({})", count)));
        }
        Ok(Self::Steps { count, position })
    }
}

/// Split `name(a, b, c)` into its name and trimmed arguments.
fn split_call(input: &str) -> Option<(&str, Vec<&str>)> {
    let open = input.find('(')?;
    let inner = input[open + 1..].strip_suffix(')')?;
    let name = input[..open].trim();
    let args = inner.split(',').map(str::trim).collect();
    Some((name, args))
}

/// Y on the curve at the parameter whose x equals `progress`.
fn bezier(x1: f64, y1: f64, x2: f64, y2: f64, progress: f64) -> f64 {
    if progress <= 0.0 {
        return 0.0;
    }
    if progress >= 1.0 {
        return 1.0;
    }
    let parameter = solve_parameter(x1, x2, progress);
    cubic(y1, y2, parameter)
}

/// Parameter `s` with `cubic(x1, x2, s) == target`. Newton steps first;
/// bisection when the slope flattens out.
fn solve_parameter(x1: f64, x2: f64, target: f64) -> f64 {
    const TOLERANCE: f64 = 1e-7;

    let mut s = target;
    for _ in 0..8 {
        let error = cubic(x1, x2, s) - target;
        if error.abs() < TOLERANCE {
            return s;
        }
        let slope = cubic_slope(x1, x2, s);
        if slope.abs() < 1e-6 {
            break;
        }
        s = (s - error / slope).clamp(0.0, 1.0);
    }

    let (mut low, mut high) = (0.0, 1.0);
    s = target;
    for _ in 0..32 {
        let x = cubic(x1, x2, s);
        if (x - target).abs() < TOLERANCE {
            break;
        }
        if x < target {
            low = s;
        } else {
            high = s;
        }
        s = (low + high) / 2.0;
    }
    s
}

/// One coordinate of a bezier anchored at 0 and 1 with inner control
/// coordinates `a` and `b`.
#[inline]
fn cubic(a: f64, b: f64, s: f64) -> f64 {
    let inv = 1.0 - s;
    3.0 * inv * inv * s * a + 3.0 * inv * s * s * b + s * s * s
}

#[inline]
fn cubic_slope(a: f64, b: f64, s: f64) -> f64 {
    let inv = 1.0 - s;
    3.0 * inv * inv * a + 6.0 * inv * s * (b - a) + 3.0 * s * s * (1.0 - b)
}

/// Endpoints stay pinned to 0 and 1 for every position.
fn stepped(count: u32, position: StepPosition, progress: f64) -> f64 {
    if count == 0 || progress <= 0.0 || progress >= 1.0 {
        return progress;
    }

    let count = count as f64;
    let step = (progress * count).floor();
    match position {
        StepPosition::Start => ((step + 1.0) / count).min(1.0),
        StepPosition::End => step / count,
        StepPosition::Both => (step + 1.0) / (count + 1.0),
        StepPosition::None => (step / (count - 1.0)).min(1.0),
    }
}
