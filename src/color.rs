//! B/W/Yellow/Red Color Support
//!
//! Pixels are 2 bits wide and packed four to a byte, most significant pixel first.
//! The index a pixel holds in a frame buffer is its *logical* color; the panel
//! expects a different 2 bit code for the same color, so every pixel field goes
//! through [`encode`] on its way to the controller.

use bit_field::BitField;

#[cfg(feature = "graphics")]
use embedded_graphics_core::pixelcolor::{
    raw::{RawData, RawU2},
    BinaryColor, PixelColor,
};

/// Native panel code for black
pub const BLACK_CODE: u8 = 0b00;
/// Native panel code for white
pub const WHITE_CODE: u8 = 0b01;
/// Native panel code for yellow
pub const YELLOW_CODE: u8 = 0b10;
/// Native panel code for red
pub const RED_CODE: u8 = 0b11;

/// Logical index -> panel code
const ENCODE: [u8; 4] = [WHITE_CODE, YELLOW_CODE, RED_CODE, BLACK_CODE];
/// Panel code -> logical index
const DECODE: [u8; 4] = [3, 0, 1, 2];

/// The four colors of the panel, ordered by their logical index
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Hash)]
pub enum QuadColor {
    /// Logical index 0
    #[default]
    White = 0,
    /// Logical index 1
    Yellow = 1,
    /// Logical index 2
    Red = 2,
    /// Logical index 3
    Black = 3,
}

impl QuadColor {
    /// Logical index of the color (`0..=3`)
    pub fn index(self) -> u8 {
        self as u8
    }

    /// Color for a logical index, only the lowest two bits are looked at
    pub fn from_index(index: u8) -> Self {
        match index & 0b11 {
            0 => QuadColor::White,
            1 => QuadColor::Yellow,
            2 => QuadColor::Red,
            _ => QuadColor::Black,
        }
    }

    /// Native 2 bit code the controller uses for this color
    pub fn panel_code(self) -> u8 {
        encode(self.index())
    }

    /// Color for a native panel code, only the lowest two bits are looked at
    pub fn from_panel_code(code: u8) -> Self {
        QuadColor::from_index(decode(code))
    }

    /// A full byte of four pixels of this color, as stored in a frame buffer
    pub fn byte(self) -> u8 {
        self.index() * 0x55
    }

    /// A full byte of four pixels of this color, as sent to the controller
    pub fn panel_byte(self) -> u8 {
        self.panel_code() * 0x55
    }
}

impl From<u8> for QuadColor {
    fn from(value: u8) -> Self {
        match value {
            0..=3 => QuadColor::from_index(value),
            e => panic!("QuadColor only parses logical indices 0 to 3 and not `{}`", e),
        }
    }
}

#[cfg(feature = "graphics")]
impl PixelColor for QuadColor {
    type Raw = RawU2;
}

#[cfg(feature = "graphics")]
impl From<RawU2> for QuadColor {
    fn from(raw: RawU2) -> Self {
        QuadColor::from_index(raw.into_inner())
    }
}

#[cfg(feature = "graphics")]
impl From<BinaryColor> for QuadColor {
    fn from(b: BinaryColor) -> QuadColor {
        match b {
            BinaryColor::On => QuadColor::Black,
            BinaryColor::Off => QuadColor::White,
        }
    }
}

/// Translates a logical color index into the panel's native 2 bit code.
///
/// Only the lowest two bits of `index` are looked at.
pub fn encode(index: u8) -> u8 {
    ENCODE[usize::from(index & 0b11)]
}

/// Inverse of [`encode`]
pub fn decode(code: u8) -> u8 {
    DECODE[usize::from(code & 0b11)]
}

/// Recodes a byte of four packed logical pixels into four packed panel codes.
///
/// Each 2 bit field is encoded on its own and put back at its position (6, 4, 2, 0).
pub fn encode_byte(packed: u8) -> u8 {
    let mut out = 0u8;
    for shift in [6usize, 4, 2, 0] {
        let field = packed.get_bits(shift..shift + 2);
        out.set_bits(shift..shift + 2, encode(field));
    }
    out
}

/// Inverse of [`encode_byte`]
pub fn decode_byte(packed: u8) -> u8 {
    let mut out = 0u8;
    for shift in [6usize, 4, 2, 0] {
        let field = packed.get_bits(shift..shift + 2);
        out.set_bits(shift..shift + 2, decode(field));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_table() {
        assert_eq!(encode(0), 0b01);
        assert_eq!(encode(1), 0b10);
        assert_eq!(encode(2), 0b11);
        assert_eq!(encode(3), 0b00);
    }

    #[test]
    fn encode_is_a_bijection() {
        let mut seen = [false; 4];
        for index in 0..4u8 {
            let code = encode(index);
            assert!(!seen[code as usize]);
            seen[code as usize] = true;
            assert_eq!(decode(code), index);
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn colors_keep_their_meaning_on_the_wire() {
        assert_eq!(QuadColor::Black.panel_code(), BLACK_CODE);
        assert_eq!(QuadColor::White.panel_code(), WHITE_CODE);
        assert_eq!(QuadColor::Yellow.panel_code(), YELLOW_CODE);
        assert_eq!(QuadColor::Red.panel_code(), RED_CODE);
        for code in 0..4u8 {
            assert_eq!(QuadColor::from_panel_code(code).panel_code(), code);
        }
    }

    #[test]
    fn white_fill_byte() {
        // clearing the frame memory sends four native white pixels per byte
        assert_eq!(QuadColor::White.panel_byte(), 0x55);
        assert_eq!(QuadColor::White.byte(), 0x00);
        assert_eq!(encode_byte(QuadColor::White.byte()), 0x55);
    }

    #[test]
    fn encode_byte_per_field() {
        // fields (high to low): 0, 1, 2, 3 -> 01, 10, 11, 00
        assert_eq!(encode_byte(0b00_01_10_11), 0b01_10_11_00);
        assert_eq!(encode_byte(0xFF), 0x00);
        for byte in 0..=255u8 {
            assert_eq!(decode_byte(encode_byte(byte)), byte);
        }
    }

    #[test]
    fn from_u8() {
        assert_eq!(QuadColor::White, QuadColor::from(0u8));
        assert_eq!(QuadColor::Black, QuadColor::from(3u8));
    }

    // test all values aside from 0 to 3 which all should panic
    #[test]
    fn from_u8_panic() {
        for val in 4..=u8::MAX {
            extern crate std;
            let result = std::panic::catch_unwind(|| QuadColor::from(val));
            assert!(result.is_err());
        }
    }
}
