use serde::{Deserialize, Serialize};

use crate::effect::EffectKind;

/// Upper bound of `Settings::brightness` (percent)
pub const MAX_BRIGHTNESS_PERCENT: u8 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SettingsError {
    /// brightness above 100 %
    BrightnessOutOfRange { brightness: u8 },
}

/// Runtime settings, persisted in the flash storage region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Settings {
    /// Active animation
    pub effect: EffectKind,
    /// Maximum number of LEDs twinkling at once (drift, pulse)
    pub max_lit: u8,
    /// Peak brightness in percent (pulse)
    pub brightness: u8,
}

impl Default for Settings {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl Settings {
    pub const DEFAULT: Self = Self {
        effect: EffectKind::Pulse,
        max_lit: 5,
        brightness: 8,
    };

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.brightness > MAX_BRIGHTNESS_PERCENT {
            return Err(SettingsError::BrightnessOutOfRange {
                brightness: self.brightness,
            });
        }
        Ok(())
    }

    /// Brightness as a scale factor (0.0 ~ 1.0)
    pub fn brightness_scale(&self) -> f32 {
        f32::from(self.brightness) / f32::from(MAX_BRIGHTNESS_PERCENT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let settings = Settings::default();
        assert_eq!(settings.effect, EffectKind::Pulse);
        assert_eq!(settings.max_lit, 5);
        assert_eq!(settings.brightness_scale(), 0.08);
        assert_eq!(settings.validate(), Ok(()));
    }

    #[test]
    fn test_validate_brightness() {
        let settings = Settings {
            brightness: 101,
            ..Settings::DEFAULT
        };
        assert_eq!(
            settings.validate(),
            Err(SettingsError::BrightnessOutOfRange { brightness: 101 })
        );
    }

    #[test]
    fn test_json_layout() {
        let mut buf = [0u8; 64];
        let len = serde_json_core::to_slice(&Settings::DEFAULT, &mut buf).unwrap();
        assert_eq!(
            &buf[..len],
            br#"{"effect":"pulse","max_lit":5,"brightness":8}"#
        );
    }
}
