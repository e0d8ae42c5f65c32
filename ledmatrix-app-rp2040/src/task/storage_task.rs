use defmt::Debug2Format;
use embassy_rp::flash::{Blocking, Flash};
use embassy_rp::peripherals::FLASH;
use embassy_time::Timer;

use ledmatrix_core::board::FLASH_SIZE_BYTES;
use ledmatrix_core::flash::{FlashRegion, SettingsStore, StorageError};
use ledmatrix_core::settings::Settings;

use crate::shared::constant::STORAGE_WRITE_DELAY_MS;
use crate::shared::resource::CHANNEL_SETTINGS_TO_STORAGE;

pub type StorageFlash = Flash<'static, FLASH, Blocking, FLASH_SIZE_BYTES>;
pub type StorageRegion = FlashRegion<StorageFlash>;

/// Read stored settings, falling back to defaults
pub fn load_settings(store: &mut SettingsStore<StorageRegion>) -> Settings {
    match store.load() {
        Ok(settings) => {
            defmt::info!("settings loaded: {}", settings);
            settings
        }
        Err(StorageError::NotFound) => {
            defmt::info!("no stored settings, using defaults");
            Settings::DEFAULT
        }
        Err(e) => {
            defmt::warn!("settings unreadable, using defaults: {}", Debug2Format(&e));
            Settings::DEFAULT
        }
    }
}

#[embassy_executor::task]
pub async fn main_task(mut store: SettingsStore<StorageRegion>) {
    loop {
        let mut settings = CHANNEL_SETTINGS_TO_STORAGE.receive().await;

        // keep only the last of a burst
        Timer::after_millis(STORAGE_WRITE_DELAY_MS).await;
        while let Ok(newer) = CHANNEL_SETTINGS_TO_STORAGE.try_receive() {
            settings = newer;
        }

        match store.save(&settings) {
            Ok(()) => defmt::info!("settings saved: {}", settings),
            Err(e) => defmt::error!("settings save failed: {}", Debug2Format(&e)),
        }
    }
}
