// Copyright (c) 2026 rezky_nightky

use rand::{distr::Distribution, Rng};

/// One raindrop: a vertical segment from `(x, y)` to `(x, y + length)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub length: f64,
    pub velocity_y: f64,
}

/// Uniform sample from `[0, bound)`; an empty range yields `0.0`.
pub fn sample_below<R: Rng + ?Sized>(rng: &mut R, bound: f64) -> f64 {
    if bound > 0.0 && bound.is_finite() {
        rng.random_range(0.0..bound)
    } else {
        0.0
    }
}

impl Particle {
    pub fn spawn<R, D>(rng: &mut R, width: u32, height: u32, length: &D, velocity: &D) -> Self
    where
        R: Rng + ?Sized,
        D: Distribution<f64>,
    {
        Self {
            x: sample_below(rng, width as f64),
            y: sample_below(rng, height as f64),
            length: length.sample(rng),
            velocity_y: velocity.sample(rng),
        }
    }

    /// Moves one step down. Past the bottom edge the drop re-enters just
    /// above the top at a fresh column. Returns whether it wrapped.
    pub fn advance<R: Rng + ?Sized>(&mut self, rng: &mut R, width: u32, height: u32) -> bool {
        self.y += self.velocity_y;
        if self.y > height as f64 {
            self.y = -self.length;
            self.x = sample_below(rng, width as f64);
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    fn drop_at(y: f64) -> Particle {
        Particle {
            x: 123.0,
            y,
            length: 10.0,
            velocity_y: 5.0,
        }
    }

    #[test]
    fn steps_down_without_wrapping() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut p = drop_at(100.0);
        assert!(!p.advance(&mut rng, 800, 600));
        assert_eq!(p.y, 105.0);
        assert_eq!(p.x, 123.0);
    }

    #[test]
    fn exactly_on_the_edge_does_not_wrap() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut p = drop_at(595.0);
        assert!(!p.advance(&mut rng, 800, 600));
        assert_eq!(p.y, 600.0);
    }

    #[test]
    fn past_the_edge_wraps_above_the_top() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut p = drop_at(597.0);
        assert!(p.advance(&mut rng, 800, 600));
        assert_eq!(p.y, -10.0);
        assert!((0.0..800.0).contains(&p.x));
        assert_eq!(p.length, 10.0);
        assert_eq!(p.velocity_y, 5.0);
    }

    #[test]
    fn empty_ranges_sample_zero() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(sample_below(&mut rng, 0.0), 0.0);
        assert_eq!(sample_below(&mut rng, -3.0), 0.0);
        assert_eq!(sample_below(&mut rng, f64::NAN), 0.0);
        let v = sample_below(&mut rng, 2.0);
        assert!((0.0..2.0).contains(&v));
    }
}
