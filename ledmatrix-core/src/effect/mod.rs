//! LED matrix animations
//!
//! Every effect renders exactly one frame per `step` and returns the delay in
//! milliseconds before the next frame should be rendered. Randomness is
//! injected so that the firmware can use the ring oscillator and tests can
//! use a seeded generator.

use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::matrix::LedMatrix;
use crate::settings::Settings;

mod burst;
mod drift;
mod pulse;

pub use burst::Burst;
pub use drift::Drift;
pub use pulse::Pulse;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(rename_all = "snake_case")]
pub enum EffectKind {
    /// A few LEDs flash up together and fade out
    Burst,
    /// LEDs light up one by one and wander in brightness
    Drift,
    /// LEDs follow a fixed pulse curve
    Pulse,
}

/// The currently selected effect
pub enum EffectRunner {
    Burst(Burst),
    Drift(Drift),
    Pulse(Pulse),
}

impl EffectRunner {
    /// Create the effect selected in `settings`
    pub fn new(settings: &Settings) -> Self {
        match settings.effect {
            EffectKind::Burst => Self::Burst(Burst::new()),
            EffectKind::Drift => Self::Drift(Drift::new(settings.max_lit.into())),
            EffectKind::Pulse => Self::Pulse(Pulse::new(
                settings.max_lit.into(),
                settings.brightness_scale(),
            )),
        }
    }

    pub fn kind(&self) -> EffectKind {
        match self {
            Self::Burst(_) => EffectKind::Burst,
            Self::Drift(_) => EffectKind::Drift,
            Self::Pulse(_) => EffectKind::Pulse,
        }
    }

    /// Apply new settings. The effect restarts only when its kind changes.
    /// Returns true if it restarted.
    pub fn configure(&mut self, settings: &Settings) -> bool {
        match self {
            Self::Drift(drift) if settings.effect == EffectKind::Drift => {
                drift.set_max_lit(settings.max_lit.into());
                false
            }
            Self::Pulse(pulse) if settings.effect == EffectKind::Pulse => {
                pulse.set_max_lit(settings.max_lit.into());
                pulse.set_brightness_scale(settings.brightness_scale());
                false
            }
            Self::Burst(_) if settings.effect == EffectKind::Burst => false,
            _ => {
                *self = Self::new(settings);
                true
            }
        }
    }

    /// Render one frame, returning the delay before the next one in ms
    pub fn step<R: RngCore>(&mut self, matrix: &mut LedMatrix, rng: &mut R) -> u32 {
        match self {
            Self::Burst(burst) => burst.step(matrix, rng),
            Self::Drift(drift) => drift.step(matrix, rng),
            Self::Pulse(pulse) => pulse.step(matrix, rng),
        }
    }
}
