use smart_leds::RGB8;

pub const BLACK: RGB8 = RGB8 { r: 0, g: 0, b: 0 };
pub const WHITE: RGB8 = RGB8 { r: 255, g: 255, b: 255 };

/// Rainbow color wheel
///
/// | pos      | r         | g         | b         |
/// | -------- | --------- | --------- | --------- |
/// | 0..85    | 3p        | 255 - 3p  | 0         |
/// | 85..170  | 255 - 3q  | 0         | 3q        |
/// | 170..256 | 0         | 3q        | 255 - 3q  |
pub fn wheel(pos: u8) -> RGB8 {
    match pos {
        0..=84 => RGB8::new(pos * 3, 255 - pos * 3, 0),
        85..=169 => {
            let q = pos - 85;
            RGB8::new(255 - q * 3, 0, q * 3)
        }
        _ => {
            let q = pos - 170;
            RGB8::new(0, q * 3, 255 - q * 3)
        }
    }
}

/// Scale every channel by `factor`, truncating toward zero
pub fn scale(color: RGB8, factor: f32) -> RGB8 {
    let ch = |c: u8| (c as f32 * factor) as u8;
    RGB8::new(ch(color.r), ch(color.g), ch(color.b))
}

/// WS2812 wire word: GRB packed into the upper 24 bits, shifted out MSB first
pub fn grb_word(color: RGB8) -> u32 {
    (u32::from(color.g) << 24) | (u32::from(color.r) << 16) | (u32::from(color.b) << 8)
}
