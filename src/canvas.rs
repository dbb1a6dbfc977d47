// Copyright (c) 2026 rezky_nightky

use crossterm::style::Color;

use crate::{
    cell::{cover_of, Cell, COVER_LOWER, COVER_UPPER},
    frame::Frame,
    host::Viewport,
    palette::{self, Rgba},
    runtime::ColorMode,
    surface::Surface,
};

type Point = (f64, f64);

/// Pixel-addressed drawing surface backed by a terminal cell grid.
///
/// Strokes are sampled at half-cell vertical resolution so a line can end
/// in the middle of a cell.
pub struct Canvas {
    frame: Frame,
    width: u32,
    height: u32,
    cell_w: f64,
    half_h: f64,

    color_mode: ColorMode,
    stroke_fg: Option<Color>,
    line_width: f64,

    path: Vec<(Point, Point)>,
    pen: Option<Point>,
    cover: Vec<u8>,
}

impl Canvas {
    pub fn new(viewport: Viewport, color_mode: ColorMode) -> Self {
        let mut canvas = Self {
            frame: Frame::new(
                viewport.cols,
                viewport.rows,
                palette::background(color_mode),
            ),
            width: 0,
            height: 0,
            cell_w: 1.0,
            half_h: 0.5,
            color_mode,
            stroke_fg: None,
            line_width: 1.0,
            path: Vec::new(),
            pen: None,
            cover: Vec::new(),
        };
        canvas.set_metrics(viewport);
        canvas
    }

    fn set_metrics(&mut self, viewport: Viewport) {
        self.width = viewport.width;
        self.height = viewport.height;
        self.cell_w = viewport.width as f64 / viewport.cols.max(1) as f64;
        self.half_h = viewport.height as f64 / viewport.rows.max(1) as f64 / 2.0;
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    #[cfg(test)]
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn frame_mut(&mut self) -> &mut Frame {
        &mut self.frame
    }

    fn cover_point(&mut self, x: f64, y: f64, half_width: f64) {
        if !x.is_finite() || !y.is_finite() || y < 0.0 || y >= self.height as f64 {
            return;
        }
        let half_row = (y / self.half_h).floor() as i64;
        let row = half_row / 2;
        if row >= self.frame.height as i64 {
            return;
        }
        let bit = if half_row % 2 == 0 {
            COVER_UPPER
        } else {
            COVER_LOWER
        };

        // The centre column is always painted; a neighbour only once the
        // stroke covers at least half of it.
        let centre = (x / self.cell_w).floor() as i64;
        let lo = (((x - half_width) / self.cell_w - 0.5).ceil() as i64).min(centre);
        let hi = (((x + half_width) / self.cell_w - 0.5).floor() as i64).max(centre);
        let cols = self.frame.width as i64;
        for col in lo.max(0)..=hi.min(cols - 1) {
            self.cover[(row * cols + col) as usize] |= bit;
        }
    }
}

impl Surface for Canvas {
    fn clear_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        let (x0, x1) = if w < 0.0 { (x + w, x) } else { (x, x + w) };
        let (y0, y1) = if h < 0.0 { (y + h, y) } else { (y, y + h) };
        let cell_h = self.half_h * 2.0;
        let cell = |v: f64| v.clamp(0.0, u16::MAX as f64) as u16;

        let cols = cell((x0 / self.cell_w).floor())..cell((x1 / self.cell_w).ceil());
        let rows = cell((y0 / cell_h).floor())..cell((y1 / cell_h).ceil());
        self.frame.clear_cells(cols, rows);
    }

    fn set_stroke_style(&mut self, style: Rgba) {
        self.stroke_fg = palette::stroke_color(self.color_mode, style);
    }

    fn set_line_width(&mut self, width: f64) {
        if width.is_finite() && width > 0.0 {
            self.line_width = width;
        }
    }

    fn begin_path(&mut self) {
        self.path.clear();
        self.pen = None;
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.pen = Some((x, y));
    }

    fn line_to(&mut self, x: f64, y: f64) {
        if let Some(from) = self.pen {
            self.path.push((from, (x, y)));
        }
        self.pen = Some((x, y));
    }

    fn stroke(&mut self) {
        let cols = self.frame.width as usize;
        let rows = self.frame.height as usize;
        self.cover.clear();
        self.cover.resize(cols * rows, 0);

        let half_width = self.line_width / 2.0;
        let path = std::mem::take(&mut self.path);
        for &((ax, ay), (bx, by)) in &path {
            let (dx, dy) = (bx - ax, by - ay);
            // at least two samples per half-cell crossed
            let span = (dx.abs() / self.cell_w).max(dy.abs() / self.half_h) * 2.0;
            let steps = if span.is_finite() {
                span.ceil().clamp(1.0, 1_000_000.0) as usize
            } else {
                1
            };
            for i in 0..steps {
                let t = (i as f64 + 0.5) / steps as f64;
                self.cover_point(ax + dx * t, ay + dy * t, half_width);
            }
        }
        self.path = path;

        let bg = self.frame.blank().bg;
        for (i, &bits) in self.cover.iter().enumerate() {
            if bits == 0 {
                continue;
            }
            let x = (i % cols) as u16;
            let y = (i / cols) as u16;
            let merged = self
                .frame
                .get(x, y)
                .map(|c| cover_of(c.ch))
                .unwrap_or(0)
                | bits;
            self.frame.set(x, y, Cell::stroke(merged, self.stroke_fg, bg));
        }
    }

    fn resize(&mut self, viewport: Viewport) {
        self.frame.resize(viewport.cols, viewport.rows);
        self.set_metrics(viewport);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 8x16 px cells, 10x5 cells
    fn canvas() -> Canvas {
        let vp = Viewport::from_cells(10, 5, Some((80, 80))).unwrap();
        Canvas::new(vp, ColorMode::TrueColor)
    }

    fn column(c: &Canvas, x: u16) -> String {
        (0..c.frame().height)
            .map(|y| c.frame().get(x, y).unwrap().ch)
            .collect()
    }

    fn line(c: &mut Canvas, x: f64, y0: f64, y1: f64) {
        c.begin_path();
        c.move_to(x, y0);
        c.line_to(x, y1);
        c.stroke();
    }

    #[test]
    fn vertical_line_uses_half_cell_glyphs() {
        let mut c = canvas();
        line(&mut c, 4.0, 8.0, 40.0);
        assert_eq!(column(&c, 0), "╷│╵  ");
        assert_eq!(column(&c, 1), "     ");
    }

    #[test]
    fn stroke_uses_composited_style() {
        let mut c = canvas();
        c.set_stroke_style(Rgba::new(173, 216, 230, 0.3));
        line(&mut c, 20.0, 0.0, 16.0);
        let cell = c.frame().get(2, 0).unwrap();
        assert_eq!(cell.ch, '│');
        assert_eq!(
            cell.fg,
            Some(Color::Rgb {
                r: 52,
                g: 65,
                b: 69
            })
        );
        assert_eq!(cell.bg, palette::background(ColorMode::TrueColor));
    }

    #[test]
    fn segments_outside_are_clipped() {
        let mut c = canvas();
        line(&mut c, 4.0, -30.0, 8.0);
        assert_eq!(column(&c, 0), "╵    ");

        let mut c = canvas();
        line(&mut c, 4.0, 72.0, 100.0);
        assert_eq!(column(&c, 0), "    ╷");

        let mut c = canvas();
        line(&mut c, 500.0, 0.0, 40.0);
        line(&mut c, -20.0, 0.0, 40.0);
        for x in 0..10 {
            assert_eq!(column(&c, x), "     ");
        }
    }

    #[test]
    fn one_stroke_paints_the_whole_path() {
        let mut c = canvas();
        c.begin_path();
        c.move_to(4.0, 0.0);
        c.line_to(4.0, 8.0);
        c.move_to(4.0, 8.0);
        c.line_to(4.0, 16.0);
        c.move_to(60.0, 64.0);
        c.line_to(60.0, 80.0);
        c.stroke();
        assert_eq!(column(&c, 0), "│    ");
        assert_eq!(column(&c, 7), "    │");
    }

    #[test]
    fn begin_path_forgets_old_segments() {
        let mut c = canvas();
        c.begin_path();
        c.move_to(4.0, 0.0);
        c.line_to(4.0, 16.0);
        c.begin_path();
        c.move_to(12.0, 0.0);
        c.line_to(12.0, 16.0);
        c.stroke();
        assert_eq!(column(&c, 0), "     ");
        assert_eq!(column(&c, 1), "│    ");
    }

    #[test]
    fn wide_lines_span_columns() {
        let mut c = canvas();
        c.set_line_width(10.0);
        line(&mut c, 8.0, 0.0, 16.0);
        assert_eq!(column(&c, 0), "│    ");
        assert_eq!(column(&c, 1), "│    ");
        assert_eq!(column(&c, 2), "     ");
    }

    #[test]
    fn thin_line_near_a_cell_edge_stays_in_one_column() {
        let mut c = canvas();
        line(&mut c, 8.3, 0.0, 16.0);
        assert_eq!(column(&c, 0), "     ");
        assert_eq!(column(&c, 1), "│    ");
        assert_eq!(column(&c, 2), "     ");

        let mut c = canvas();
        line(&mut c, 7.8, 0.0, 16.0);
        assert_eq!(column(&c, 0), "│    ");
        assert_eq!(column(&c, 1), "     ");
    }

    #[test]
    fn clear_rect_over_everything_blanks_the_frame() {
        let mut c = canvas();
        line(&mut c, 4.0, 0.0, 80.0);
        c.clear_rect(0.0, 0.0, 80.0, 80.0);
        assert_eq!(column(&c, 0), "     ");
    }

    #[test]
    fn clear_rect_partial() {
        let mut c = canvas();
        line(&mut c, 4.0, 0.0, 80.0);
        c.clear_rect(0.0, 16.0, 8.0, 16.0);
        assert_eq!(column(&c, 0), "│ │││");
    }

    #[test]
    fn resize_replaces_grid_and_metrics() {
        let mut c = canvas();
        line(&mut c, 4.0, 0.0, 80.0);
        c.resize(Viewport::from_cells(4, 2, None).unwrap());
        assert_eq!(c.size(), (32, 32));
        assert_eq!((c.frame().width, c.frame().height), (4, 2));
        assert!(c.frame().needs_full_redraw());
        assert_eq!(column(&c, 0), "  ");
        line(&mut c, 12.0, 16.0, 32.0);
        assert_eq!(column(&c, 1), " │");
    }
}
