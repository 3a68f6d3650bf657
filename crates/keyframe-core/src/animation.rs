//! Animation definitions.
//!
//! An [`Animation`] is a validated keyframe timeline plus timing. It is built
//! once and stamps out a [`Player`] per element; every player shares the same
//! spectrum and calculators.
//!
//! ```ignore
//! let animation = Animation::new(&keyframes, 1000.0, env)?;
//! let mut player = animation.start(element);
//! while player.is_playing() {
//!     player.tick();
//! }
//! ```

use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::env::Environment;
use crate::error::Result;
use crate::keyframes::{normalize, CanonicalKeyframes, Keyframe};
use crate::options::{PlayerOptions, TimingInput};
use crate::player::{resolve_animators, AnimationPropertyEntry, Player};
use crate::spectrum::Spectrum;

/// Keyframes and timing as a serializable document.
///
/// ```json
/// {
///   "keyframes": [{ "width": "0px" }, { "width": "100px" }],
///   "timing": { "duration": 1000, "fill": "forwards" }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationDocument {
    pub keyframes: Vec<Keyframe>,
    pub timing: TimingInput,
}

impl AnimationDocument {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// A validated animation, ready to create players.
pub struct Animation<E> {
    keyframes: CanonicalKeyframes,
    options: PlayerOptions,
    spectrum: Rc<Spectrum>,
    animators: Rc<Vec<AnimationPropertyEntry>>,
    env: Environment<E>,
}

impl<E> Animation<E> {
    /// Validate keyframes and timing and build every calculator.
    ///
    /// All construction errors surface here; creating and playing players
    /// afterwards cannot fail.
    pub fn new(
        keyframes: &[Keyframe],
        timing: impl Into<TimingInput>,
        env: Environment<E>,
    ) -> Result<Self> {
        let options =
            PlayerOptions::with_policy(timing, env.fill_validation, &env.default_easing)?;
        let keyframes = normalize(keyframes)?;
        let spectrum = Spectrum::build(&keyframes);
        let animators = resolve_animators(&spectrum, &env)?;

        debug!(
            keyframes = keyframes.len(),
            properties = animators.len(),
            grid = spectrum.total_cells,
            duration = options.duration,
            "animation built"
        );

        Ok(Self {
            keyframes,
            options,
            spectrum: Rc::new(spectrum),
            animators: Rc::new(animators),
            env,
        })
    }

    pub fn from_document(document: &AnimationDocument, env: Environment<E>) -> Result<Self> {
        Self::new(&document.keyframes, document.timing.clone(), env)
    }

    /// Create an idle player for `element`.
    pub fn create(&self, element: E) -> Player<E> {
        Player::from_parts(
            element,
            self.options.clone(),
            Rc::clone(&self.spectrum),
            Rc::clone(&self.animators),
            &self.env,
        )
    }

    /// Create a player for `element` and start it.
    pub fn start(&self, element: E) -> Player<E> {
        let mut player = self.create(element);
        player.play();
        player
    }

    pub fn keyframes(&self) -> &CanonicalKeyframes {
        &self.keyframes
    }

    pub fn options(&self) -> &PlayerOptions {
        &self.options
    }

    pub fn spectrum(&self) -> &Spectrum {
        &self.spectrum
    }

    /// Names of the properties that will be animated.
    pub fn animated_properties(&self) -> Vec<&str> {
        self.animators
            .iter()
            .map(|entry| entry.property.as_str())
            .collect()
    }
}
