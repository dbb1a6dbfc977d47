// Copyright (c) 2026 rezky_nightky

use std::time::Duration;

use crate::error::{Error, Result};
use crate::frame::Frame;

/// Pixel size assumed for one cell when the terminal does not report one.
pub const DEFAULT_CELL_PX: (u32, u32) = (8, 16);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub cols: u16,
    pub rows: u16,
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    /// `pixels` is the terminal's own report; zero means unknown.
    pub fn from_cells(cols: u16, rows: u16, pixels: Option<(u16, u16)>) -> Result<Self> {
        if cols == 0 || rows == 0 {
            return Err(Error::unavailable("viewport size"));
        }
        let (width, height) = match pixels {
            Some((w, h)) if w >= cols && h >= rows => (w as u32, h as u32),
            _ => (
                cols as u32 * DEFAULT_CELL_PX.0,
                rows as u32 * DEFAULT_CELL_PX.1,
            ),
        };
        Ok(Self {
            cols,
            rows,
            width,
            height,
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HostEvent {
    Resize(Viewport),
    Quit,
}

/// What the frame loop needs from the environment it runs in.
pub trait Host {
    fn viewport(&mut self) -> Result<Viewport>;

    /// Waits at most `timeout` for the next event.
    fn poll(&mut self, timeout: Duration) -> Result<Option<HostEvent>>;

    fn present(&mut self, frame: &mut Frame) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reported_pixels_are_used() {
        let vp = Viewport::from_cells(100, 30, Some((800, 600))).unwrap();
        assert_eq!((vp.width, vp.height), (800, 600));
    }

    #[test]
    fn missing_pixels_fall_back_to_cell_metrics() {
        let vp = Viewport::from_cells(100, 30, None).unwrap();
        assert_eq!((vp.width, vp.height), (800, 480));
        let vp = Viewport::from_cells(100, 30, Some((0, 0))).unwrap();
        assert_eq!((vp.width, vp.height), (800, 480));
    }

    #[test]
    fn empty_terminal_is_unavailable() {
        let err = Viewport::from_cells(0, 24, None).unwrap_err();
        assert!(err.is_environment_unavailable());
        assert!(Viewport::from_cells(80, 0, Some((640, 0))).is_err());
    }
}
