use rand::{Rng, RngCore};
use smart_leds::RGB8;

use crate::board::LED_COUNT;
use crate::color::{scale, wheel, BLACK};
use crate::matrix::LedMatrix;

/// Brightness of the selected LEDs for each frame of a cycle
pub const POWER_BRIGHTNESS_STEPS: [f32; 17] = [
    0.01, 0.05, 0.05, 0.045, 0.04, 0.035, 0.03, 0.02, 0.02, 0.02, 0.02, 0.018, 0.018, 0.015, 0.015,
    0.015, 0.0,
];
/// Maximum LEDs selected per cycle
pub const MAX_TWINKLES: usize = 4;
/// Delay between frames of a cycle
pub const STEP_DELAY_MS: u32 = 40;
/// Extra pause after the last frame of a cycle
pub const CYCLE_PAUSE_MS: u32 = 1000;

/// Picks a handful of LEDs, fades them through the power steps, pauses, repeats
pub struct Burst {
    selected: [(usize, RGB8); MAX_TWINKLES],
    num_selected: usize,
    step: usize,
}

impl Default for Burst {
    fn default() -> Self {
        Self::new()
    }
}

impl Burst {
    pub fn new() -> Self {
        Self {
            selected: [(0, BLACK); MAX_TWINKLES],
            num_selected: 0,
            step: 0,
        }
    }

    fn select<R: RngCore>(&mut self, rng: &mut R) {
        self.num_selected = rng.gen_range(1..=MAX_TWINKLES);
        for slot in self.selected.iter_mut().take(self.num_selected) {
            let index = rng.gen_range(0..LED_COUNT);
            // hue follows the position on the matrix
            let color = wheel(((index * 256 / LED_COUNT) & 0xff) as u8);
            *slot = (index, color);
        }
    }

    pub fn step<R: RngCore>(&mut self, matrix: &mut LedMatrix, rng: &mut R) -> u32 {
        if self.step == 0 {
            matrix.clear();
            self.select(rng);
        }

        let brightness = POWER_BRIGHTNESS_STEPS[self.step];
        for &(index, color) in &self.selected[..self.num_selected] {
            matrix.set(index, scale(color, brightness));
        }

        self.step += 1;
        if self.step == POWER_BRIGHTNESS_STEPS.len() {
            self.step = 0;
            STEP_DELAY_MS + CYCLE_PAUSE_MS
        } else {
            STEP_DELAY_MS
        }
    }

    /// LEDs chosen for the current cycle
    pub fn selected(&self) -> &[(usize, RGB8)] {
        &self.selected[..self.num_selected]
    }
}
