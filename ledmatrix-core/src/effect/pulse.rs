use rand::{Rng, RngCore};
use smart_leds::RGB8;

use crate::board::LED_COUNT;
use crate::color::{scale, wheel, BLACK};
use crate::matrix::LedMatrix;

/// Brightness per animation frame
pub const PULSE_CURVE: [f32; 33] = [
    0.0, 0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.5, 0.4, 0.7, 0.8, 0.9, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0,
    1.0, 1.0, 1.0, 1.0, 1.0, 0.8, 0.7, 0.5, 0.4, 0.3, 0.2, 0.1, 0.1, 0.0,
];
/// Chance per frame that an idle LED starts a pulse
pub const START_CHANCE: f32 = 0.0005;
pub const FRAME_DELAY_MS: u32 = 20;

/// LEDs start at random and play the pulse curve once
pub struct Pulse {
    max_lit: usize,
    brightness_scale: f32,
    /// 0 = idle, n = showing PULSE_CURVE[n - 1]
    frames: [u8; LED_COUNT],
    colors: [RGB8; LED_COUNT],
}

impl Pulse {
    pub fn new(max_lit: usize, brightness_scale: f32) -> Self {
        Self {
            max_lit,
            brightness_scale,
            frames: [0; LED_COUNT],
            colors: [BLACK; LED_COUNT],
        }
    }

    pub fn set_max_lit(&mut self, max_lit: usize) {
        self.max_lit = max_lit;
    }

    pub fn set_brightness_scale(&mut self, brightness_scale: f32) {
        self.brightness_scale = brightness_scale;
    }

    /// LEDs currently playing the curve
    pub fn active_count(&self) -> usize {
        self.frames.iter().filter(|f| **f != 0).count()
    }

    pub fn frame(&self, index: usize) -> Option<u8> {
        self.frames.get(index).copied()
    }

    pub fn step<R: RngCore>(&mut self, matrix: &mut LedMatrix, rng: &mut R) -> u32 {
        let mut active = self.active_count();

        for (index, (frame, color)) in self
            .frames
            .iter_mut()
            .zip(self.colors.iter_mut())
            .enumerate()
        {
            if *frame == 0 {
                if active < self.max_lit && rng.gen::<f32>() < START_CHANCE {
                    *color = wheel(rng.gen());
                    *frame = 1;
                    active += 1;
                }
            } else if usize::from(*frame) == PULSE_CURVE.len() {
                *frame = 0;
            } else {
                *frame += 1;
            }

            let brightness = match *frame {
                0 => 0.0,
                n => PULSE_CURVE[usize::from(n) - 1],
            };
            matrix.set(index, scale(*color, brightness * self.brightness_scale));
        }

        FRAME_DELAY_MS
    }
}
