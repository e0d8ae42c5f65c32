pub mod strips;
pub mod ws2812;
