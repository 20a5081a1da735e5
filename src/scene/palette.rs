use crate::foundation::core::Rgb8;

pub const LIGHT_PALETTE: [Rgb8; 10] = [
    Rgb8::new(0x3B, 0x82, 0xF6),
    Rgb8::new(0x8B, 0x5C, 0xF6),
    Rgb8::new(0x10, 0xB9, 0x81),
    Rgb8::new(0xF5, 0x9E, 0x0B),
    Rgb8::new(0xEF, 0x44, 0x44),
    Rgb8::new(0x06, 0xB6, 0xD4),
    Rgb8::new(0x8B, 0x5C, 0xF6),
    Rgb8::new(0xEC, 0x48, 0x99),
    Rgb8::new(0x63, 0x66, 0xF1),
    Rgb8::new(0x84, 0xCC, 0x16),
];

pub const DARK_PALETTE: [Rgb8; 10] = [
    Rgb8::new(0x60, 0xA5, 0xFA),
    Rgb8::new(0xA7, 0x8B, 0xFA),
    Rgb8::new(0x34, 0xD3, 0x99),
    Rgb8::new(0xFB, 0xBF, 0x24),
    Rgb8::new(0xF8, 0x71, 0x71),
    Rgb8::new(0x22, 0xD3, 0xEE),
    Rgb8::new(0xC0, 0x84, 0xFC),
    Rgb8::new(0xF4, 0x72, 0xB6),
    Rgb8::new(0x81, 0x8C, 0xF8),
    Rgb8::new(0xA3, 0xE6, 0x35),
];

/// Color for the `index`-th placed word. Keyed by list position, not by word, so a word's
/// color can change between passes.
pub fn color_at(palette: &[Rgb8], index: usize) -> Rgb8 {
    if palette.is_empty() {
        return Rgb8::new(0, 0, 0);
    }
    palette[index % palette.len()]
}
