//! Keyframe player.
//!
//! A player drives one element through a validated keyframe timeline. Each
//! tick computes the eased progress, resolves every property's segment through
//! the spectrum and writes the interpolated values to the style sink.
//!
//! ```text
//! now ──▶ elapsed ──▶ progress ──easing──▶ eased
//!                                            │
//!                       spectrum.grid_index ◀┘
//!                               │
//!          lookup ──▶ (segment, lower, upper) ──▶ calculator ──▶ write_style
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use tracing::{debug, trace};

use crate::calculators::{Calculator, StyleCalculator};
use crate::env::{Clock, Environment, StyleSink};
use crate::error::Result;
use crate::events::{EventQueue, PlayerEvent};
use crate::keyframes::CanonicalKeyframes;
use crate::options::PlayerOptions;
use crate::spectrum::{Lookup, Spectrum};
use crate::types::{PlayState, PlayerId};

/// A property and the calculator that animates it.
#[derive(Debug, Clone)]
pub struct AnimationPropertyEntry {
    /// Property name as written in the keyframes, used for style I/O.
    pub property: String,
    pub calculator: Calculator,
}

/// Build calculators for every classified property of `spectrum`.
///
/// Properties the registry cannot classify are skipped.
pub fn resolve_animators<E: ?Sized>(
    spectrum: &Spectrum,
    env: &Environment<E>,
) -> Result<Vec<AnimationPropertyEntry>> {
    let mut animators = Vec::with_capacity(spectrum.values.len());
    for (property, values) in &spectrum.values {
        let Some(class) = env.properties.classify(property, env.logger.as_ref()) else {
            debug!(property = %property, "skipping property with no calculator");
            continue;
        };
        let calculator = Calculator::resolve(property, class, values, &env.colors)?;
        animators.push(AnimationPropertyEntry {
            property: property.clone(),
            calculator,
        });
    }
    Ok(animators)
}

/// Per-element timeline state machine that writes interpolated styles on each tick.
pub struct Player<E> {
    id: PlayerId,
    element: E,
    options: PlayerOptions,
    spectrum: Rc<Spectrum>,
    animators: Rc<Vec<AnimationPropertyEntry>>,
    clock: Rc<dyn Clock>,
    styles: Rc<dyn StyleSink<E>>,
    state: PlayState,
    starting_timestamp: f64,
    current_time: f64,
    initial_values: Option<BTreeMap<String, String>>,
    on_finish: Option<Box<dyn FnMut()>>,
    events: EventQueue,
}

impl<E> Player<E> {
    /// Build a player for `element`, validating every property of the
    /// keyframes against the environment's calculators.
    pub fn new(
        element: E,
        keyframes: &CanonicalKeyframes,
        options: PlayerOptions,
        env: &Environment<E>,
    ) -> Result<Self> {
        let spectrum = Spectrum::build(keyframes);
        let animators = resolve_animators(&spectrum, env)?;
        Ok(Self::from_parts(
            element,
            options,
            Rc::new(spectrum),
            Rc::new(animators),
            env,
        ))
    }

    /// Assemble a player from prebuilt, validated parts.
    pub(crate) fn from_parts(
        element: E,
        options: PlayerOptions,
        spectrum: Rc<Spectrum>,
        animators: Rc<Vec<AnimationPropertyEntry>>,
        env: &Environment<E>,
    ) -> Self {
        Self {
            id: PlayerId::new(),
            element,
            options,
            spectrum,
            animators,
            clock: Rc::clone(&env.clock),
            styles: Rc::clone(&env.styles),
            state: PlayState::Idle,
            starting_timestamp: 0.0,
            current_time: 0.0,
            initial_values: None,
            on_finish: None,
            events: EventQueue::new(),
        }
    }

    pub fn id(&self) -> PlayerId {
        self.id
    }

    pub fn element(&self) -> &E {
        &self.element
    }

    pub fn options(&self) -> &PlayerOptions {
        &self.options
    }

    pub fn spectrum(&self) -> &Spectrum {
        &self.spectrum
    }

    pub fn state(&self) -> PlayState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlayState::Playing
    }

    /// Milliseconds elapsed past the delay at the last tick.
    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    /// Duration in milliseconds.
    pub fn total_time(&self) -> u64 {
        self.options.duration
    }

    /// Names of the animated properties.
    pub fn properties(&self) -> impl Iterator<Item = &str> {
        self.animators.iter().map(|entry| entry.property.as_str())
    }

    /// Register a callback run once when the timeline completes.
    pub fn set_on_finish(&mut self, callback: impl FnMut() + 'static) {
        self.on_finish = Some(Box::new(callback));
    }

    /// Remove and return queued lifecycle events.
    pub fn drain_events(&mut self) -> Vec<PlayerEvent> {
        self.events.drain()
    }

    /// Start playback: capture initial values, record the start time and
    /// apply the first frame. Does nothing while already playing; a finished
    /// or cancelled player restarts from the beginning.
    pub fn play(&mut self) {
        if self.is_playing() {
            return;
        }

        let initial_values = self
            .animators
            .iter()
            .map(|entry| {
                let value = self.styles.read_style(&self.element, &entry.property);
                (entry.property.clone(), value)
            })
            .collect();
        self.initial_values = Some(initial_values);
        self.state = PlayState::Playing;
        self.starting_timestamp = self.clock.now();
        self.current_time = 0.0;
        self.events.push(PlayerEvent::Started { player_id: self.id });
        debug!(
            player = %self.id,
            duration = self.options.duration,
            delay = self.options.delay,
            "player started"
        );

        self.tick();
    }

    /// Advance to the clock's current time.
    pub fn tick(&mut self) -> PlayState {
        let now = self.clock.now();
        self.tick_at(now)
    }

    /// Advance to `now` (milliseconds on the clock's timeline).
    pub fn tick_at(&mut self, now: f64) -> PlayState {
        if !self.is_playing() {
            return self.state;
        }

        let elapsed = now - self.starting_timestamp - self.options.delay as f64;
        if elapsed < 0.0 {
            if self.options.fill.applies_backwards() {
                self.apply(0.0);
            }
            self.clock.request_frame();
            return self.state;
        }

        self.current_time = elapsed;
        self.apply(elapsed);

        if elapsed >= self.options.duration as f64 {
            self.finish();
        } else {
            self.clock.request_frame();
        }
        self.state
    }

    /// Stop playback and restore the values captured by `play`, regardless
    /// of fill mode.
    pub fn cancel(&mut self) {
        if !self.is_playing() {
            return;
        }
        self.restore_initial_values();
        self.state = PlayState::Cancelled;
        self.events.push(PlayerEvent::Cancelled { player_id: self.id });
        debug!(player = %self.id, elapsed = self.current_time, "player cancelled");
    }

    /// Style values at `elapsed` milliseconds past the delay.
    pub fn compute_properties(&self, elapsed: f64) -> Vec<(String, String)> {
        let duration = self.options.duration as f64;
        let percentage = if duration <= 0.0 {
            1.0
        } else {
            (elapsed.max(0.0) / duration).min(1.0)
        };
        let eased = self.options.easing.evaluate(percentage);
        let grid_index = self.spectrum.grid_index(eased);

        self.animators
            .iter()
            .map(|entry| {
                let value = match self.spectrum.lookup(&entry.property, grid_index) {
                    Some(Lookup::Segment {
                        value_index,
                        lower,
                        upper,
                    }) => {
                        let local = if elapsed <= 0.0 || upper <= lower {
                            0.0
                        } else {
                            (eased - lower) / (upper - lower)
                        };
                        entry.calculator.calculate(value_index, local)
                    }
                    Some(Lookup::Final) | None => entry.calculator.final_value(),
                };
                (entry.property.clone(), value)
            })
            .collect()
    }

    fn apply(&self, elapsed: f64) {
        for (property, value) in self.compute_properties(elapsed) {
            trace!(player = %self.id, property = %property, value = %value, "write style");
            self.styles.write_style(&self.element, &property, &value);
        }
    }

    fn finish(&mut self) {
        self.state = PlayState::Finished;
        if !self.options.fill.applies_forwards() {
            self.restore_initial_values();
        }
        self.events.push(PlayerEvent::Finished { player_id: self.id });
        debug!(player = %self.id, fill = ?self.options.fill, "player finished");

        if let Some(on_finish) = self.on_finish.as_mut() {
            on_finish();
        }
    }

    fn restore_initial_values(&mut self) {
        let Some(initial_values) = self.initial_values.take() else {
            return;
        };
        for (property, value) in &initial_values {
            self.styles.write_style(&self.element, property, value);
        }
    }
}

impl<E: fmt::Debug> fmt::Debug for Player<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Player")
            .field("id", &self.id)
            .field("element", &self.element)
            .field("state", &self.state)
            .field("options", &self.options)
            .field("current_time", &self.current_time)
            .finish_non_exhaustive()
    }
}
