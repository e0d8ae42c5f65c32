/* System Setup */

/// Core1 (render) stack size
pub const CORE1_STACK_SIZE: usize = 16 * 1024;
/// Settings change -> storage channel size
pub const CHANNEL_SETTINGS_TO_STORAGE_N: usize = 2;
/// Quiet time before a settings change is written, so bursts of changes cost one erase
pub const STORAGE_WRITE_DELAY_MS: u64 = 500;

/* USB Setup */

/// USB device vendor ID
pub const USB_VID: u16 = 0xc0de;
/// USB device product ID
pub const USB_PID: u16 = 0xcafe;
/// USB device serial number string
pub const USB_SERIAL_NUMBER: &str = "ledmatrix";
/// USB device maximum power consumption in mA
pub const USB_MAX_POWER: u16 = 500;
/// USB device maximum packet size (full-speed)
pub const USB_MAX_PACKET_SIZE: u16 = 64;
/// WinUSB interface GUID for the vendor command interface
pub const DEVICE_INTERFACE_GUIDS: &[&str] = &["{5C1B0E3A-4F2D-4E8B-9A61-7D3C2B8E0F14}"];

/* LED Setup */

/// WS2812 bit rate in kHz
pub const WS2812_BIT_FREQ_KHZ: u32 = 800;
/// WS2812 reset (latch) time, > 50us
pub const WS2812_LATCH_US: u64 = 55;
