// Copyright (c) 2026 rezky_nightky

//! The 2D drawing commands the rain is expressed in.
//!
//! Coordinates are viewport pixels with the origin in the top-left corner
//! and `y` growing downwards.

use crate::host::Viewport;
use crate::palette::Rgba;

pub trait Surface {
    fn clear_rect(&mut self, x: f64, y: f64, w: f64, h: f64);
    fn set_stroke_style(&mut self, style: Rgba);
    fn set_line_width(&mut self, width: f64);
    fn begin_path(&mut self);
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    /// Paints every segment of the current path once.
    fn stroke(&mut self);
    /// Matches the surface to a new viewport, dropping its contents.
    fn resize(&mut self, viewport: Viewport);
}

#[cfg(test)]
pub mod recording {
    use super::Surface;
    use crate::host::Viewport;
    use crate::palette::Rgba;

    #[derive(Clone, Debug, PartialEq)]
    pub enum Command {
        ClearRect(f64, f64, f64, f64),
        StrokeStyle(Rgba),
        LineWidth(f64),
        BeginPath,
        MoveTo(f64, f64),
        LineTo(f64, f64),
        Stroke,
        Resize(u32, u32),
    }

    /// Surface that remembers what it was asked to do.
    #[derive(Default)]
    pub struct RecordingSurface {
        pub commands: Vec<Command>,
    }

    impl RecordingSurface {
        pub fn count(&self, pred: impl Fn(&Command) -> bool) -> usize {
            self.commands.iter().filter(|c| pred(c)).count()
        }
    }

    impl Surface for RecordingSurface {
        fn clear_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
            self.commands.push(Command::ClearRect(x, y, w, h));
        }

        fn set_stroke_style(&mut self, style: Rgba) {
            self.commands.push(Command::StrokeStyle(style));
        }

        fn set_line_width(&mut self, width: f64) {
            self.commands.push(Command::LineWidth(width));
        }

        fn begin_path(&mut self) {
            self.commands.push(Command::BeginPath);
        }

        fn move_to(&mut self, x: f64, y: f64) {
            self.commands.push(Command::MoveTo(x, y));
        }

        fn line_to(&mut self, x: f64, y: f64) {
            self.commands.push(Command::LineTo(x, y));
        }

        fn stroke(&mut self) {
            self.commands.push(Command::Stroke);
        }

        fn resize(&mut self, viewport: Viewport) {
            self.commands
                .push(Command::Resize(viewport.width, viewport.height));
        }
    }
}
