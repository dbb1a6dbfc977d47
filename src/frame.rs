// Copyright (c) 2026 rezky_nightky

use crossterm::style::Color;

use crate::cell::Cell;

/// Cell grid the canvas paints into and the terminal presents.
///
/// A full clear only bumps a generation counter; cells written under an
/// older generation read back as blank.
#[derive(Clone, Debug)]
pub struct Frame {
    pub width: u16,
    pub height: u16,
    cells: Vec<Cell>,
    gen: u32,
    cell_gen: Vec<u32>,
    blank: Cell,
    full_redraw: bool,
}

impl Frame {
    pub fn new(width: u16, height: u16, bg: Option<Color>) -> Self {
        let len = width as usize * height as usize;
        let blank = Cell::blank(bg);
        Self {
            width,
            height,
            cells: vec![blank; len],
            gen: 1,
            cell_gen: vec![1; len],
            blank,
            full_redraw: true,
        }
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        *self = Frame::new(width, height, self.blank.bg);
    }

    pub fn clear(&mut self) {
        self.gen = self.gen.wrapping_add(1);
        if self.gen == 0 {
            self.cell_gen.fill(0);
            self.gen = 1;
        }
    }

    /// Blanks the cells in `cols` x `rows`, clipped to the grid.
    pub fn clear_cells(&mut self, cols: std::ops::Range<u16>, rows: std::ops::Range<u16>) {
        let cols = cols.start.min(self.width)..cols.end.min(self.width);
        let rows = rows.start.min(self.height)..rows.end.min(self.height);
        if cols.start == 0 && cols.end == self.width && rows.start == 0 && rows.end == self.height
        {
            self.clear();
            return;
        }
        for y in rows {
            for x in cols.clone() {
                if let Some(i) = self.index(x, y) {
                    self.cells[i] = self.blank;
                    self.cell_gen[i] = self.gen;
                }
            }
        }
    }

    pub fn needs_full_redraw(&self) -> bool {
        self.full_redraw
    }

    pub fn mark_presented(&mut self) {
        self.full_redraw = false;
    }

    pub fn index(&self, x: u16, y: u16) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    pub fn get(&self, x: u16, y: u16) -> Option<Cell> {
        self.index(x, y).map(|i| self.cell_at_index(i))
    }

    pub fn cell_at_index(&self, i: usize) -> Cell {
        if self.cell_gen.get(i).copied() == Some(self.gen) {
            self.cells[i]
        } else {
            self.blank
        }
    }

    pub fn set(&mut self, x: u16, y: u16, cell: Cell) {
        if let Some(i) = self.index(x, y) {
            self.cells[i] = cell;
            self.cell_gen[i] = self.gen;
        }
    }

    pub fn blank(&self) -> Cell {
        self.blank
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mark(ch: char) -> Cell {
        Cell { ch, fg: None, bg: None }
    }

    #[test]
    fn clear_makes_cells_effectively_blank() {
        let mut f = Frame::new(2, 2, None);
        f.set(0, 0, mark('x'));
        assert_eq!(f.get(0, 0).unwrap().ch, 'x');
        f.clear();
        assert_eq!(f.get(0, 0).unwrap().ch, ' ');
    }

    #[test]
    fn clear_cells_only_touches_the_rectangle() {
        let mut f = Frame::new(3, 3, None);
        for y in 0..3 {
            for x in 0..3 {
                f.set(x, y, mark('x'));
            }
        }
        f.clear_cells(1..3, 0..1);
        assert_eq!(f.get(0, 0).unwrap().ch, 'x');
        assert_eq!(f.get(1, 0).unwrap().ch, ' ');
        assert_eq!(f.get(2, 0).unwrap().ch, ' ');
        assert_eq!(f.get(1, 1).unwrap().ch, 'x');
    }

    #[test]
    fn out_of_bounds_writes_are_dropped() {
        let mut f = Frame::new(2, 1, None);
        f.set(5, 0, mark('x'));
        f.set(0, 3, mark('x'));
        assert!(f.get(5, 0).is_none());
        assert_eq!(f.get(0, 0).unwrap().ch, ' ');
    }

    #[test]
    fn resize_requests_full_redraw() {
        let mut f = Frame::new(2, 2, None);
        f.mark_presented();
        assert!(!f.needs_full_redraw());
        f.resize(4, 3);
        assert!(f.needs_full_redraw());
        assert_eq!((f.width, f.height), (4, 3));
        assert_eq!(f.get(3, 2).unwrap().ch, ' ');
    }
}
