use rand::{Rng, RngCore};
use smart_leds::RGB8;

use crate::board::LED_COUNT;
use crate::color::{scale, wheel, BLACK};
use crate::matrix::LedMatrix;

/// Brightness cap of a lit LED
pub const MAX_BRIGHTNESS: f32 = 0.1;
/// Brightness a newly lit LED starts at
pub const START_BRIGHTNESS: f32 = 0.01;
/// Chance per frame that a lit LED dims
pub const DIM_CHANCE: f32 = 0.05;
/// Brightness removed when dimming
pub const DIM_STEP: f32 = 0.01;
/// Random walk amplitude of a lit LED
pub const JITTER: f32 = 0.005;
/// Chance per frame that a dark LED lights up
pub const LIGHT_CHANCE: f32 = 0.01;
pub const FRAME_DELAY_MS: u32 = 20;

/// LEDs light up at random, wander in brightness and eventually dim out
pub struct Drift {
    max_lit: usize,
    /// (brightness, color) per LED
    leds: [(f32, RGB8); LED_COUNT],
}

impl Drift {
    pub fn new(max_lit: usize) -> Self {
        Self {
            max_lit,
            leds: [(0.0, BLACK); LED_COUNT],
        }
    }

    pub fn set_max_lit(&mut self, max_lit: usize) {
        self.max_lit = max_lit;
    }

    /// LEDs with a non-zero brightness
    pub fn active_count(&self) -> usize {
        self.leds.iter().filter(|(b, _)| *b > 0.0).count()
    }

    pub fn brightness(&self, index: usize) -> Option<f32> {
        self.leds.get(index).map(|(b, _)| *b)
    }

    pub fn step<R: RngCore>(&mut self, matrix: &mut LedMatrix, rng: &mut R) -> u32 {
        let mut lit = self.active_count();

        for (index, (brightness, color)) in self.leds.iter_mut().enumerate() {
            if *brightness > 0.0 {
                if rng.gen::<f32>() < DIM_CHANCE {
                    *brightness -= DIM_STEP;
                    if *brightness <= 0.0 {
                        lit = lit.saturating_sub(1);
                    }
                } else {
                    *brightness =
                        (*brightness + rng.gen_range(-JITTER..JITTER)).min(MAX_BRIGHTNESS);
                }
                *brightness = brightness.max(0.0);
            } else if lit < self.max_lit && rng.gen::<f32>() < LIGHT_CHANCE {
                *color = wheel(rng.gen());
                *brightness = START_BRIGHTNESS;
                lit += 1;
            }

            matrix.set(index, scale(*color, *brightness));
        }

        FRAME_DELAY_MS
    }
}
