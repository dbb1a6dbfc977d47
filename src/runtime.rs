// Copyright (c) 2026 rezky_nightky

use std::env;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorMode {
    Mono,
    Color16,
    Color256,
    TrueColor,
}

impl ColorMode {
    pub fn label(self) -> &'static str {
        match self {
            ColorMode::TrueColor => "24-bit truecolor",
            ColorMode::Color256 => "8-bit (256-color)",
            ColorMode::Color16 => "16-color",
            ColorMode::Mono => "mono",
        }
    }

    pub fn from_depth(depth: u16) -> Result<Self, String> {
        match depth {
            0 => Ok(ColorMode::Mono),
            16 => Ok(ColorMode::Color16),
            8 | 256 => Ok(ColorMode::Color256),
            24 | 32 => Ok(ColorMode::TrueColor),
            _ => Err(format!(
                "invalid --colormode: {} (allowed: 0,16,8/256,24/32)",
                depth
            )),
        }
    }
}

/// Color depth from `COLORTERM`/`TERM`, falling back to 16 colors.
pub fn detect_color_mode_auto() -> ColorMode {
    detect_from(
        &env::var("COLORTERM").unwrap_or_default(),
        &env::var("TERM").unwrap_or_default(),
    )
}

fn detect_from(colorterm: &str, term: &str) -> ColorMode {
    let colorterm = colorterm.to_ascii_lowercase();
    if colorterm.contains("truecolor") || colorterm.contains("24bit") {
        return ColorMode::TrueColor;
    }

    let term = term.to_ascii_lowercase();
    if term == "dumb" {
        return ColorMode::Mono;
    }
    if term.contains("256color") {
        return ColorMode::Color256;
    }

    ColorMode::Color16
}

pub fn resolve_color_mode(forced: Option<u16>) -> Result<ColorMode, String> {
    match forced {
        Some(depth) => ColorMode::from_depth(depth),
        None => Ok(detect_color_mode_auto()),
    }
}
