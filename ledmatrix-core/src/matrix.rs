use smart_leds::RGB8;

use crate::board::{LEDS_PER_STRIP, LED_COUNT, LED_STRIP_COUNT};
use crate::color::BLACK;

/// Frame buffer for the whole LED matrix, kept per strip in output order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedMatrix {
    strips: [[RGB8; LEDS_PER_STRIP]; LED_STRIP_COUNT],
}

impl Default for LedMatrix {
    fn default() -> Self {
        Self::new()
    }
}

impl LedMatrix {
    /// Create a dark matrix
    pub const fn new() -> Self {
        Self {
            strips: [[BLACK; LEDS_PER_STRIP]; LED_STRIP_COUNT],
        }
    }

    /// Map a linear LED index to (strip, led)
    pub const fn locate(index: usize) -> Option<(usize, usize)> {
        let strip = index / LEDS_PER_STRIP;
        if strip < LED_STRIP_COUNT {
            Some((strip, index % LEDS_PER_STRIP))
        } else {
            None
        }
    }

    /// Set one LED. Indices past the last strip are ignored.
    pub fn set(&mut self, index: usize, color: RGB8) -> bool {
        match Self::locate(index) {
            Some((strip, led)) => {
                self.strips[strip][led] = color;
                true
            }
            None => false,
        }
    }

    pub fn get(&self, index: usize) -> Option<RGB8> {
        Self::locate(index).map(|(strip, led)| self.strips[strip][led])
    }

    pub fn fill(&mut self, color: RGB8) {
        for strip in self.strips.iter_mut() {
            strip.fill(color);
        }
    }

    pub fn clear(&mut self) {
        self.fill(BLACK);
    }

    pub fn strip(&self, strip: usize) -> Option<&[RGB8; LEDS_PER_STRIP]> {
        self.strips.get(strip)
    }

    pub fn strips(&self) -> impl Iterator<Item = &[RGB8; LEDS_PER_STRIP]> {
        self.strips.iter()
    }

    pub fn as_strips(&self) -> &[[RGB8; LEDS_PER_STRIP]; LED_STRIP_COUNT] {
        &self.strips
    }

    /// Number of LEDs currently showing any color
    pub fn lit_count(&self) -> usize {
        self.strips
            .iter()
            .flatten()
            .filter(|c| **c != BLACK)
            .count()
    }

    pub const fn len(&self) -> usize {
        LED_COUNT
    }

    pub const fn is_empty(&self) -> bool {
        LED_COUNT == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::WHITE;
    use rstest::rstest;

    #[rstest]
    #[case(0, Some((0, 0)))]
    #[case(35, Some((0, 35)))]
    #[case(36, Some((1, 0)))]
    #[case(287, Some((7, 35)))]
    #[case(288, None)]
    fn test_locate(#[case] index: usize, #[case] expected: Option<(usize, usize)>) {
        assert_eq!(LedMatrix::locate(index), expected);
    }

    #[test]
    fn test_set_get() {
        let mut matrix = LedMatrix::new();
        let color = RGB8::new(1, 2, 3);
        assert!(matrix.set(40, color));
        assert_eq!(matrix.get(40), Some(color));
        assert_eq!(matrix.strip(1).map(|s| s[4]), Some(color));
        assert_eq!(matrix.lit_count(), 1);
    }

    #[test]
    fn test_set_out_of_range_is_ignored() {
        let mut matrix = LedMatrix::new();
        assert!(!matrix.set(LED_COUNT, WHITE));
        assert_eq!(matrix, LedMatrix::new());
        assert_eq!(matrix.get(LED_COUNT), None);
    }

    #[test]
    fn test_fill_clear() {
        let mut matrix = LedMatrix::new();
        matrix.fill(WHITE);
        assert_eq!(matrix.lit_count(), LED_COUNT);
        assert_eq!(matrix.strips().count(), LED_STRIP_COUNT);
        matrix.clear();
        assert_eq!(matrix.lit_count(), 0);
    }
}
