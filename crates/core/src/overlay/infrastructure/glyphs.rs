use crate::schedule::domain::control_key::ControlKey;

pub const GLYPH_COLS: usize = 5;
pub const GLYPH_ROWS: usize = 7;

/// 5x7 bitmap for an icon letter; bit 4 is the leftmost column.
pub fn glyph(key: ControlKey) -> [u8; GLYPH_ROWS] {
    match key {
        ControlKey::Up => [
            0b10001, 0b10001, 0b10001, 0b10101, 0b10101, 0b11011, 0b10001,
        ],
        ControlKey::Left => [
            0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001,
        ],
        ControlKey::Down => [
            0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110,
        ],
        ControlKey::Right => [
            0b11110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b11110,
        ],
    }
}

/// Iterates the `(col, row)` cells that are lit in a glyph.
pub fn lit_cells(rows: [u8; GLYPH_ROWS]) -> impl Iterator<Item = (usize, usize)> {
    (0..GLYPH_ROWS).flat_map(move |row| {
        (0..GLYPH_COLS)
            .filter(move |col| rows[row] & (1 << (GLYPH_COLS - 1 - col)) != 0)
            .map(move |col| (col, row))
    })
}
