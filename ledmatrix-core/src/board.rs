use serde::Serialize;

/* Board identity */

/// Human readable board identifier
pub const BOARD_NAME: &str = "Framework 16 LED Matrix Input Module (Joe Schroedl)";
/// USB device manufacturer string
pub const USB_MANUFACTURER_STRING: &str = "Joe Schroedl";
/// USB device product string (full-speed)
pub const USB_PRODUCT_FS_STRING: &str = "LED Matrix Module";

/* Flash Setup */

/// Total QSPI flash size (W25Q16, 2 MiB)
pub const FLASH_SIZE_BYTES: usize = 2 * 1024 * 1024;
/// Flash sector size, smallest erasable unit
pub const FLASH_ERASE_SIZE: u32 = 4096;
/// Usable storage region size, located at the top of flash
pub const FLASH_STORAGE_BYTES: u32 = 1408 * 1024;
/// Storage region start offset from the flash base (640 KiB, firmware image lives below)
pub const FLASH_STORAGE_OFFSET: u32 = FLASH_SIZE_BYTES as u32 - FLASH_STORAGE_BYTES;

const _: () = assert!(FLASH_STORAGE_BYTES as usize <= FLASH_SIZE_BYTES);
const _: () = assert!(FLASH_STORAGE_BYTES % FLASH_ERASE_SIZE == 0);
const _: () = assert!(FLASH_STORAGE_OFFSET % FLASH_ERASE_SIZE == 0);

/* LED Matrix Setup */

/// Number of WS2812 strips
pub const LED_STRIP_COUNT: usize = 8;
/// LEDs on each strip
pub const LEDS_PER_STRIP: usize = 36;
/// Total LEDs (8 * 36 = 288)
pub const LED_COUNT: usize = LED_STRIP_COUNT * LEDS_PER_STRIP;
/// Lowest GPIO used by the strips. Strip 0 sits on the highest pin, strip 7 on this one.
pub const LED_STRIP_FIRST_GPIO: u8 = 8;

/// Board identity as reported to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BoardInfo {
    pub name: &'static str,
    pub manufacturer: &'static str,
    pub product: &'static str,
    pub flash_storage_bytes: u32,
}

pub const BOARD: BoardInfo = BoardInfo {
    name: BOARD_NAME,
    manufacturer: USB_MANUFACTURER_STRING,
    product: USB_PRODUCT_FS_STRING,
    flash_storage_bytes: FLASH_STORAGE_BYTES,
};

/// GPIO number driving the given strip
pub const fn strip_gpio(strip: usize) -> u8 {
    LED_STRIP_FIRST_GPIO + (LED_STRIP_COUNT - 1 - strip) as u8
}
