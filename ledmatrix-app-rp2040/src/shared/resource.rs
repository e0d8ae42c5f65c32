use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::mutex::Mutex;
use embassy_sync::signal::Signal;

use ledmatrix_core::settings::Settings;

use crate::shared::constant::CHANNEL_SETTINGS_TO_STORAGE_N;

/// Settings in effect. USB commands modify it.
pub static CURRENT_SETTINGS: Mutex<CriticalSectionRawMutex, Settings> =
    Mutex::new(Settings::DEFAULT);

/// Latest settings -> render task (core1)
pub static SIGNAL_SETTINGS_TO_RENDER: Signal<CriticalSectionRawMutex, Settings> = Signal::new();

/// Settings changes -> storage task
pub static CHANNEL_SETTINGS_TO_STORAGE: Channel<
    CriticalSectionRawMutex,
    Settings,
    CHANNEL_SETTINGS_TO_STORAGE_N,
> = Channel::new();
