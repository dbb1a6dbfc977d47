// Copyright (c) 2026 rezky_nightky

use rand::{distr::Uniform, rngs::StdRng};

use crate::{
    host::Viewport,
    palette::Rgba,
    particle::Particle,
    surface::Surface,
};

pub const PARTICLE_COUNT: usize = 400;
pub const LENGTH_RANGE: (f64, f64) = (10.0, 30.0);
pub const VELOCITY_RANGE: (f64, f64) = (4.0, 8.0);
pub const RAIN_STROKE: Rgba = Rgba::new(173, 216, 230, 0.3);
pub const RAIN_LINE_WIDTH: f64 = 1.0;

/// The rain simulation: a fixed set of drops plus the viewport size they
/// fall through.
///
/// `width`/`height` only change in [`Rain::resize`]. Drops are never
/// rescaled or reclamped when that happens; after a shrink they can sit
/// outside the viewport until their next wrap.
pub struct Rain {
    width: u32,
    height: u32,
    particles: Vec<Particle>,
    mt: StdRng,
    wraps: u64,
}

impl Rain {
    pub fn new(width: u32, height: u32, mut mt: StdRng) -> Self {
        let rand_len = Uniform::new(LENGTH_RANGE.0, LENGTH_RANGE.1).expect("valid range");
        let rand_speed = Uniform::new(VELOCITY_RANGE.0, VELOCITY_RANGE.1).expect("valid range");

        let particles = (0..PARTICLE_COUNT)
            .map(|_| Particle::spawn(&mut mt, width, height, &rand_len, &rand_speed))
            .collect();

        Self {
            width,
            height,
            particles,
            mt,
            wraps: 0,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Total wraps since startup.
    pub fn wraps(&self) -> u64 {
        self.wraps
    }

    /// One frame: clear, draw every drop as a single batched path, advance.
    pub fn render<S: Surface + ?Sized>(&mut self, surface: &mut S) {
        self.draw(surface);
        self.advance();
    }

    fn draw<S: Surface + ?Sized>(&self, surface: &mut S) {
        surface.clear_rect(0.0, 0.0, self.width as f64, self.height as f64);
        surface.set_stroke_style(RAIN_STROKE);
        surface.set_line_width(RAIN_LINE_WIDTH);
        surface.begin_path();
        for p in &self.particles {
            surface.move_to(p.x, p.y);
            surface.line_to(p.x, p.y + p.length);
        }
        surface.stroke();
    }

    fn advance(&mut self) {
        let (w, h) = (self.width, self.height);
        for p in &mut self.particles {
            if p.advance(&mut self.mt, w, h) {
                self.wraps += 1;
            }
        }
    }

    pub fn resize<S: Surface + ?Sized>(&mut self, surface: &mut S, viewport: Viewport) {
        log::debug!(
            "resize {}x{} -> {}x{} ({}x{} cells)",
            self.width,
            self.height,
            viewport.width,
            viewport.height,
            viewport.cols,
            viewport.rows
        );
        self.width = viewport.width;
        self.height = viewport.height;
        surface.resize(viewport);
    }

    #[cfg(test)]
    fn particles_mut(&mut self) -> &mut Vec<Particle> {
        &mut self.particles
    }
}
