#![cfg_attr(not(test), no_std)]
#![cfg_attr(not(test), no_main)]

mod led;
mod shared;
mod task;

use defmt::*;
use embassy_executor::{Executor, Spawner};
use embassy_rp::bind_interrupts;
use embassy_rp::flash::Flash;
use embassy_rp::multicore::{spawn_core1, Stack};
use embassy_rp::peripherals::{PIO0, PIO1, USB};
use embassy_rp::{pio, usb};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use ledmatrix_core::board::{BOARD, FLASH_STORAGE_BYTES, FLASH_STORAGE_OFFSET};
use ledmatrix_core::flash::{FlashRegion, SettingsStore};

use crate::shared::constant::CORE1_STACK_SIZE;
use crate::shared::resource::{CURRENT_SETTINGS, SIGNAL_SETTINGS_TO_RENDER};
use crate::task::{render_task, storage_task, usb_task};

bind_interrupts!(struct Irqs {
    USBCTRL_IRQ => usb::InterruptHandler<USB>;
    PIO0_IRQ_0 => pio::InterruptHandler<PIO0>;
    PIO1_IRQ_0 => pio::InterruptHandler<PIO1>;
});

static mut CORE1_STACK: Stack<CORE1_STACK_SIZE> = Stack::new();
static EXECUTOR1: StaticCell<Executor> = StaticCell::new();

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("{}", BOARD);

    let p = embassy_rp::init(Default::default());

    // Settings from the storage region at the top of flash
    let flash: storage_task::StorageFlash = Flash::new_blocking(p.FLASH);
    let region = unwrap!(FlashRegion::new(
        flash,
        FLASH_STORAGE_OFFSET,
        FLASH_STORAGE_BYTES
    ));
    let mut store = SettingsStore::new(region);
    let settings = storage_task::load_settings(&mut store);
    unwrap!(spawner.spawn(storage_task::main_task(store)));
    *CURRENT_SETTINGS.lock().await = settings;
    SIGNAL_SETTINGS_TO_RENDER.signal(settings);

    // Rendering on core1
    let strips = crate::init_led_strips!(p, Irqs);
    spawn_core1(
        p.CORE1,
        unsafe { &mut *core::ptr::addr_of_mut!(CORE1_STACK) },
        move || {
            let executor1 = EXECUTOR1.init(Executor::new());
            executor1.run(|spawner| unwrap!(spawner.spawn(render_task::main_task(strips))));
        },
    );

    // USB on core0
    let driver = usb::Driver::new(p.USB, Irqs);
    unwrap!(spawner.spawn(usb_task::main_task(driver)));
}
