// Copyright (c) 2026 rezky_nightky

use crossterm::style::Color;

/// Which halves of a cell a stroke passed through.
pub const COVER_UPPER: u8 = 0b01;
pub const COVER_LOWER: u8 = 0b10;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub fg: Option<Color>,
    pub bg: Option<Color>,
}

impl Cell {
    pub fn blank(bg: Option<Color>) -> Self {
        Self { ch: ' ', fg: None, bg }
    }

    pub fn stroke(cover: u8, fg: Option<Color>, bg: Option<Color>) -> Self {
        Self {
            ch: glyph_for(cover),
            fg,
            bg,
        }
    }
}

pub fn glyph_for(cover: u8) -> char {
    match cover & (COVER_UPPER | COVER_LOWER) {
        COVER_UPPER => '╵',
        COVER_LOWER => '╷',
        0 => ' ',
        _ => '│',
    }
}

/// Inverse of [`glyph_for`]; anything that is not a rain glyph covers nothing.
pub fn cover_of(ch: char) -> u8 {
    match ch {
        '╵' => COVER_UPPER,
        '╷' => COVER_LOWER,
        '│' => COVER_UPPER | COVER_LOWER,
        _ => 0,
    }
}
