// Copyright (c) 2026 rezky_nightky

//! Mapping of RGB(A) colors onto what the terminal can display.

use crossterm::style::Color;

use crate::runtime::ColorMode;

pub const BACKGROUND_RGB: (u8, u8, u8) = (0, 0, 0);

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Source-over compositing onto an opaque backdrop.
    pub fn over(self, backdrop: (u8, u8, u8)) -> (u8, u8, u8) {
        let a = if self.a.is_finite() {
            self.a.clamp(0.0, 1.0)
        } else {
            1.0
        };
        let mix = |src: u8, dst: u8| -> u8 {
            let v = src as f32 * a + dst as f32 * (1.0 - a);
            v.round().clamp(0.0, 255.0) as u8
        };
        (
            mix(self.r, backdrop.0),
            mix(self.g, backdrop.1),
            mix(self.b, backdrop.2),
        )
    }
}

fn dist2(a: (u8, u8, u8), b: (u8, u8, u8)) -> i32 {
    let dr = a.0 as i32 - b.0 as i32;
    let dg = a.1 as i32 - b.1 as i32;
    let db = a.2 as i32 - b.2 as i32;
    dr * dr + dg * dg + db * db
}

fn rgb_to_ansi256(rgb: (u8, u8, u8)) -> u8 {
    const LEVELS: [u8; 6] = [0, 95, 135, 175, 215, 255];
    let step = |v: u8| ((v as u16 * 5 + 127) / 255) as u8;

    let (ri, gi, bi) = (step(rgb.0), step(rgb.1), step(rgb.2));
    let cube = (
        LEVELS[ri as usize],
        LEVELS[gi as usize],
        LEVELS[bi as usize],
    );
    let cube_idx = 16 + 36 * ri + 6 * gi + bi;

    let avg = ((rgb.0 as u16 + rgb.1 as u16 + rgb.2 as u16) / 3) as u8;
    let (gray_idx, gray) = match avg {
        0..=7 => (16, (0, 0, 0)),
        239..=255 => (231, (255, 255, 255)),
        _ => {
            let i = (avg - 8) / 10;
            let v = 8 + 10 * i;
            (232 + i, (v, v, v))
        }
    };

    if dist2(rgb, gray) < dist2(rgb, cube) {
        gray_idx
    } else {
        cube_idx
    }
}

fn rgb_to_color16(rgb: (u8, u8, u8)) -> Color {
    const TABLE: [(Color, (u8, u8, u8)); 16] = [
        (Color::Black, (0, 0, 0)),
        (Color::DarkGrey, (128, 128, 128)),
        (Color::Grey, (192, 192, 192)),
        (Color::White, (255, 255, 255)),
        (Color::DarkRed, (128, 0, 0)),
        (Color::Red, (255, 0, 0)),
        (Color::DarkGreen, (0, 128, 0)),
        (Color::Green, (0, 255, 0)),
        (Color::DarkBlue, (0, 0, 128)),
        (Color::Blue, (0, 0, 255)),
        (Color::DarkCyan, (0, 128, 128)),
        (Color::Cyan, (0, 255, 255)),
        (Color::DarkMagenta, (128, 0, 128)),
        (Color::Magenta, (255, 0, 255)),
        (Color::DarkYellow, (128, 128, 0)),
        (Color::Yellow, (255, 255, 0)),
    ];

    TABLE
        .iter()
        .min_by_key(|(_, ref_rgb)| dist2(rgb, *ref_rgb))
        .map(|(c, _)| *c)
        .unwrap_or(Color::White)
}

/// Terminal color for an opaque RGB value. Mono leaves the foreground alone.
pub fn terminal_color(mode: ColorMode, rgb: (u8, u8, u8)) -> Option<Color> {
    match mode {
        ColorMode::Mono => None,
        ColorMode::TrueColor => Some(Color::Rgb {
            r: rgb.0,
            g: rgb.1,
            b: rgb.2,
        }),
        ColorMode::Color256 => Some(Color::AnsiValue(rgb_to_ansi256(rgb))),
        ColorMode::Color16 => Some(rgb_to_color16(rgb)),
    }
}

/// Stroke color as it appears over the background.
pub fn stroke_color(mode: ColorMode, style: Rgba) -> Option<Color> {
    terminal_color(mode, style.over(BACKGROUND_RGB))
}

pub fn background(mode: ColorMode) -> Option<Color> {
    match mode {
        ColorMode::Mono => None,
        ColorMode::Color16 => Some(Color::Black),
        ColorMode::Color256 => Some(Color::AnsiValue(16)),
        ColorMode::TrueColor => Some(Color::Rgb { r: 0, g: 0, b: 0 }),
    }
}
