//! Host collaborators.
//!
//! The engine never touches a real frame scheduler, style system or color
//! parser directly. Hosts hand it implementations of these traits, bundled in
//! an [`Environment`]:
//!
//! - [`Clock`]: current time in milliseconds and frame requests
//! - [`StyleSink`]: reads and writes inline style properties of an element
//! - [`ColorResolver`]: turns a color string into premultiplied channels
//! - [`Logger`]: receives configuration warnings
//!
//! Everything runs on one thread, so collaborators are shared through `Rc`.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;
use std::time::Instant;

use csscolorparser::Color as CssColor;
use keyframe_config::KeyframeConfig;

use crate::easing::DEFAULT_EASING;
use crate::options::FillValidation;
use crate::properties::PropertyRegistry;

/// Source of time and frame callbacks.
pub trait Clock {
    /// Current time in milliseconds.
    fn now(&self) -> f64;

    /// Ask the host to tick again on its next frame.
    fn request_frame(&self) {}
}

/// Inline style access for elements of type `E`.
pub trait StyleSink<E: ?Sized> {
    /// Current inline value of `property`, or an empty string when unset.
    fn read_style(&self, element: &E, property: &str) -> String;

    fn write_style(&self, element: &E, property: &str, value: &str);
}

/// RGBA color whose RGB channels are already multiplied by alpha.
///
/// Channels are in `0..=255`, alpha in `0..=1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PremultipliedColor {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl PremultipliedColor {
    /// Premultiply straight (non-premultiplied) channels.
    pub fn from_straight(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self {
            r: r * a,
            g: g * a,
            b: b * a,
            a,
        }
    }

    pub fn channels(&self) -> [f64; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Resolves color strings to premultiplied channels.
pub trait ColorResolver {
    fn resolve(&self, color: &str) -> Option<PremultipliedColor>;
}

/// Resolver for CSS color syntax (`#rgb`, `rgb()`, `hsl()`, named colors).
#[derive(Debug, Clone, Copy, Default)]
pub struct CssColorResolver;

impl ColorResolver for CssColorResolver {
    fn resolve(&self, color: &str) -> Option<PremultipliedColor> {
        let parsed = CssColor::from_str(color.trim()).ok()?;
        let channel = |value: f64| (value * 255.0).round().clamp(0.0, 255.0);
        Some(PremultipliedColor::from_straight(
            channel(parsed.r),
            channel(parsed.g),
            channel(parsed.b),
            parsed.a.clamp(0.0, 1.0),
        ))
    }
}

/// Sink for configuration warnings.
pub trait Logger {
    fn warn(&self, message: &str);

    fn log(&self, _message: &str) {}
}

/// Logger that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLogger;

impl Logger for NoopLogger {
    fn warn(&self, _message: &str) {}
}

/// Logger that forwards to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn warn(&self, message: &str) {
        tracing::warn!("{}", message);
    }

    fn log(&self, message: &str) {
        tracing::info!("{}", message);
    }
}

/// Wall clock measured from its creation.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// Clock advanced by hand.
///
/// Used by hosts that drive frames at a fixed step and by tests. Frame
/// requests are counted, not scheduled.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<f64>,
    frame_requests: Cell<usize>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(now: f64) -> Self {
        let clock = Self::default();
        clock.now.set(now);
        clock
    }

    /// Advance the clock by `ms` milliseconds.
    pub fn fast_forward(&self, ms: f64) {
        self.now.set(self.now.get() + ms);
    }

    pub fn set(&self, now: f64) {
        self.now.set(now);
    }

    /// Number of frames requested so far.
    pub fn frame_requests(&self) -> usize {
        self.frame_requests.get()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> f64 {
        self.now.get()
    }

    fn request_frame(&self) {
        self.frame_requests.set(self.frame_requests.get() + 1);
    }
}

/// Collaborators and policies shared by every player of an animation.
pub struct Environment<E: ?Sized> {
    pub clock: Rc<dyn Clock>,
    pub styles: Rc<dyn StyleSink<E>>,
    pub colors: Rc<dyn ColorResolver>,
    pub logger: Rc<dyn Logger>,
    pub properties: Rc<PropertyRegistry>,
    pub fill_validation: FillValidation,
    /// Easing used when the timing input names none.
    pub default_easing: String,
}

impl<E: ?Sized> Environment<E> {
    /// Environment with the built-in property tables, CSS colors, strict fill
    /// validation and a silent logger.
    pub fn new(clock: Rc<dyn Clock>, styles: Rc<dyn StyleSink<E>>) -> Self {
        Self {
            clock,
            styles,
            colors: Rc::new(CssColorResolver),
            logger: Rc::new(NoopLogger),
            properties: Rc::new(PropertyRegistry::default()),
            fill_validation: FillValidation::Strict,
            default_easing: DEFAULT_EASING.to_string(),
        }
    }

    /// Environment whose property tables and player policy come from `config`.
    pub fn from_config(
        clock: Rc<dyn Clock>,
        styles: Rc<dyn StyleSink<E>>,
        config: &KeyframeConfig,
    ) -> Self {
        let fill_validation = if config.player.strict_fill {
            FillValidation::Strict
        } else {
            FillValidation::Lenient
        };

        Self {
            properties: Rc::new(PropertyRegistry::from_config(&config.properties)),
            fill_validation,
            default_easing: config.player.default_easing.clone(),
            ..Self::new(clock, styles)
        }
    }

    pub fn with_logger(mut self, logger: Rc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn with_color_resolver(mut self, colors: Rc<dyn ColorResolver>) -> Self {
        self.colors = colors;
        self
    }

    pub fn with_properties(mut self, properties: PropertyRegistry) -> Self {
        self.properties = Rc::new(properties);
        self
    }

    pub fn with_fill_validation(mut self, fill_validation: FillValidation) -> Self {
        self.fill_validation = fill_validation;
        self
    }

    pub fn with_default_easing(mut self, easing: impl Into<String>) -> Self {
        self.default_easing = easing.into();
        self
    }
}

impl<E: ?Sized> Clone for Environment<E> {
    fn clone(&self) -> Self {
        Self {
            clock: Rc::clone(&self.clock),
            styles: Rc::clone(&self.styles),
            colors: Rc::clone(&self.colors),
            logger: Rc::clone(&self.logger),
            properties: Rc::clone(&self.properties),
            fill_validation: self.fill_validation,
            default_easing: self.default_easing.clone(),
        }
    }
}

impl<E: ?Sized> fmt::Debug for Environment<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Environment")
            .field("properties", &self.properties)
            .field("fill_validation", &self.fill_validation)
            .field("default_easing", &self.default_easing)
            .finish_non_exhaustive()
    }
}
