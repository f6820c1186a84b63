use crate::screen::Glyph;

pub const GLYPH_SIZE: i32 = 8;

// 8x8 bitmaps, one byte per row, MSB is the leftmost pixel.
const WIFI: [u8; 8] = [0x00, 0x3c, 0x42, 0x99, 0x24, 0x00, 0x18, 0x18];
const PROCESSOR: [u8; 8] = [0x54, 0xfe, 0x82, 0xba, 0xba, 0x82, 0xfe, 0x54];
const THERMOMETER: [u8; 8] = [0x18, 0x24, 0x24, 0x2c, 0x2c, 0x5e, 0x5e, 0x3c];
const ANTENNA: [u8; 8] = [0x81, 0x42, 0x24, 0x18, 0x18, 0x18, 0x18, 0x3c];
const MICROPHONE: [u8; 8] = [0x18, 0x3c, 0x3c, 0x3c, 0x5a, 0x42, 0x3c, 0x18];
const TRANSMIT: [u8; 8] = [0x18, 0x3c, 0x7e, 0xdb, 0x18, 0x18, 0x18, 0x18];
const RECEIVE: [u8; 8] = [0x18, 0x18, 0x18, 0x18, 0xdb, 0x7e, 0x3c, 0x18];

pub fn bitmap(glyph: Glyph) -> &'static [u8; 8] {
    match glyph {
        Glyph::Wifi => &WIFI,
        Glyph::Processor => &PROCESSOR,
        Glyph::Thermometer => &THERMOMETER,
        Glyph::Antenna => &ANTENNA,
        Glyph::Microphone => &MICROPHONE,
        Glyph::Transmit => &TRANSMIT,
        Glyph::Receive => &RECEIVE,
    }
}
