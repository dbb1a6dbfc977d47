// Copyright (c) 2026 rezky_nightky

use std::io::{stdout, IsTerminal, Stdout, Write};
use std::time::Duration;

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor},
    terminal, ExecutableCommand, QueueableCommand,
};

use crate::cell::Cell;
use crate::error::{Error, Result};
use crate::frame::Frame;
use crate::host::{Host, HostEvent, Viewport};

// Never produced by the canvas, so every cell differs from it.
const UNKNOWN: Cell = Cell {
    ch: '\0',
    fg: None,
    bg: None,
};

/// Full-screen crossterm host. Owns raw mode and the alternate screen
/// until dropped.
pub struct Terminal {
    out: Presenter<Stdout>,
}

/// Keeps what is on screen and turns a frame into the commands that bring
/// the screen up to date.
struct Presenter<W: Write> {
    stdout: W,
    last: Vec<Cell>,
    last_size: (u16, u16),
    run_buf: String,
}

impl Terminal {
    pub fn new() -> Result<Self> {
        let mut out = stdout();
        if !out.is_terminal() {
            return Err(Error::unavailable("stdout is not a terminal"));
        }
        terminal::enable_raw_mode().map_err(|e| Error::unavailable_io("drawing context", e))?;

        let init_res: std::io::Result<()> = (|| {
            out.execute(terminal::EnterAlternateScreen)?;
            out.execute(cursor::Hide)?;
            let _ = out.execute(terminal::DisableLineWrap);
            out.execute(SetAttribute(Attribute::Reset))?;
            out.execute(ResetColor)?;
            out.execute(terminal::Clear(terminal::ClearType::All))?;
            out.flush()
        })();
        if let Err(e) = init_res {
            restore_terminal_best_effort();
            return Err(Error::unavailable_io("drawing context", e));
        }

        Ok(Self {
            out: Presenter::new(out),
        })
    }

    fn viewport_for(cols: u16, rows: u16) -> Result<Viewport> {
        let pixels = terminal::window_size().ok().map(|ws| (ws.width, ws.height));
        if !matches!(pixels, Some((w, h)) if w > 0 && h > 0) {
            log::debug!("terminal reports no pixel size, assuming default cell metrics");
        }
        Viewport::from_cells(cols, rows, pixels)
    }

    fn translate(ev: Event) -> Option<HostEvent> {
        match ev {
            Event::Resize(cols, rows) => match Self::viewport_for(cols, rows) {
                Ok(vp) => Some(HostEvent::Resize(vp)),
                Err(e) => {
                    log::warn!("ignoring resize to {}x{}: {}", cols, rows, e);
                    None
                }
            },
            Event::Key(k) if k.kind == KeyEventKind::Press => match (k.code, k.modifiers) {
                (KeyCode::Esc, _) | (KeyCode::Char('q'), _) => Some(HostEvent::Quit),
                (KeyCode::Char('c'), m) if m.contains(KeyModifiers::CONTROL) => {
                    Some(HostEvent::Quit)
                }
                _ => None,
            },
            _ => None,
        }
    }
}

impl Host for Terminal {
    fn viewport(&mut self) -> Result<Viewport> {
        let (cols, rows) =
            terminal::size().map_err(|e| Error::unavailable_io("viewport size", e))?;
        Self::viewport_for(cols, rows)
    }

    fn poll(&mut self, timeout: Duration) -> Result<Option<HostEvent>> {
        if !event::poll(timeout)? {
            return Ok(None);
        }
        Ok(Self::translate(event::read()?))
    }

    fn present(&mut self, frame: &mut Frame) -> Result<()> {
        let written = self.out.present(frame)?;
        log::trace!("presented {} cells", written);
        Ok(())
    }
}

impl<W: Write> Presenter<W> {
    fn new(stdout: W) -> Self {
        Self {
            stdout,
            last: Vec::new(),
            last_size: (0, 0),
            run_buf: String::with_capacity(64),
        }
    }

    fn present(&mut self, frame: &mut Frame) -> std::io::Result<usize> {
        let size = (frame.width, frame.height);
        if frame.needs_full_redraw() || self.last_size != size {
            self.stdout.queue(ResetColor)?;
            self.stdout
                .queue(terminal::Clear(terminal::ClearType::All))?;
            self.last.clear();
            self.last
                .resize(size.0 as usize * size.1 as usize, UNKNOWN);
            self.last_size = size;
        }

        let written = self.write_changes(frame)?;

        self.stdout.queue(SetAttribute(Attribute::Reset))?;
        self.stdout.queue(ResetColor)?;
        self.stdout.flush()?;
        frame.mark_presented();
        Ok(written)
    }

    fn set_colors(&mut self, cell: Cell, cur: &mut Option<(Option<Color>, Option<Color>)>) -> std::io::Result<()> {
        let (fg_changed, bg_changed) = match *cur {
            Some((fg, bg)) => (fg != cell.fg, bg != cell.bg),
            None => (true, true),
        };
        if fg_changed {
            self.stdout
                .queue(SetForegroundColor(cell.fg.unwrap_or(Color::Reset)))?;
        }
        if bg_changed {
            self.stdout
                .queue(SetBackgroundColor(cell.bg.unwrap_or(Color::Reset)))?;
        }
        *cur = Some((cell.fg, cell.bg));
        Ok(())
    }

    /// Writes every cell that changed since the last present, batching
    /// neighbours with the same colors into one print.
    fn write_changes(&mut self, frame: &Frame) -> std::io::Result<usize> {
        let width = frame.width as usize;
        let mut cur_colors = None;
        let mut cur_pos: Option<(u16, u16)> = None;
        let mut written = 0usize;

        for y in 0..frame.height {
            let row = y as usize * width;
            let mut x = 0usize;
            while x < width {
                let cell = frame.cell_at_index(row + x);
                if self.last[row + x] == cell {
                    x += 1;
                    continue;
                }

                self.run_buf.clear();
                self.run_buf.push(cell.ch);
                self.last[row + x] = cell;
                let start = x;
                x += 1;
                while x < width {
                    let next = frame.cell_at_index(row + x);
                    if self.last[row + x] == next || next.fg != cell.fg || next.bg != cell.bg {
                        break;
                    }
                    self.run_buf.push(next.ch);
                    self.last[row + x] = next;
                    x += 1;
                }

                let x0 = start as u16;
                if cur_pos != Some((x0, y)) {
                    self.stdout.queue(cursor::MoveTo(x0, y))?;
                }
                self.set_colors(cell, &mut cur_colors)?;
                self.stdout.queue(Print(self.run_buf.as_str()))?;
                written += x - start;
                cur_pos = (x < width).then_some((x as u16, y));
            }
        }
        Ok(written)
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        restore_terminal_best_effort();
    }
}

pub fn restore_terminal_best_effort() {
    let mut out = stdout();
    let _ = out.execute(SetAttribute(Attribute::Reset));
    let _ = out.execute(ResetColor);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::EnableLineWrap);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
    let _ = out.flush();
}
