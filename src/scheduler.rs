// Copyright (c) 2026 rezky_nightky

//! The frame loop. Resizes and frames are handled one at a time on the
//! calling thread, each running to completion before the next.

use std::time::{Duration, Instant};

use crate::{
    canvas::Canvas,
    error::Result,
    host::{Host, HostEvent},
    rain::Rain,
};

#[derive(Clone, Copy, Debug)]
pub struct Options {
    pub fps: f64,
    pub duration: Option<Duration>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            fps: 60.0,
            duration: None,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct RunStats {
    pub frames: u64,
    pub resizes: u64,
    pub elapsed: Duration,
    pub work_sum: Duration,
    pub work_max: Duration,
    pub overshoot_frames: u64,
}

impl RunStats {
    fn record(&mut self, work: Duration, period: Duration) {
        self.frames = self.frames.saturating_add(1);
        self.work_sum += work;
        self.work_max = self.work_max.max(work);
        if work > period {
            self.overshoot_frames = self.overshoot_frames.saturating_add(1);
        }
    }

    pub fn avg_fps(&self) -> f64 {
        self.frames as f64 / self.elapsed.as_secs_f64().max(0.000_001)
    }

    pub fn avg_work_ms(&self) -> f64 {
        self.work_sum.as_secs_f64() * 1000.0 / self.frames.max(1) as f64
    }
}

/// Runs frames until the host asks to quit or `duration` runs out.
///
/// Resize events that arrive between two frames are coalesced; only the
/// last one reaches [`Rain::resize`], and always before the next render.
/// Nothing is delayed past that frame, and since the handler only
/// overwrites the stored size the result matches dispatching every event.
pub fn run<H: Host + ?Sized>(
    host: &mut H,
    canvas: &mut Canvas,
    rain: &mut Rain,
    opts: &Options,
) -> Result<RunStats> {
    let start_time = Instant::now();
    let end_time = opts.duration.map(|d| start_time + d);
    let period = Duration::from_secs_f64(1.0 / opts.fps);
    let mut next_frame = start_time;
    let mut stats = RunStats::default();

    'frames: loop {
        let mut pending_resize = None;

        loop {
            let now = Instant::now();
            let mut timeout = next_frame.saturating_duration_since(now);
            if let Some(end) = end_time {
                if now >= end {
                    break 'frames;
                }
                timeout = timeout.min(end - now);
            }

            match host.poll(timeout)? {
                Some(HostEvent::Quit) => break 'frames,
                Some(HostEvent::Resize(vp)) => {
                    pending_resize = Some(vp);
                    continue;
                }
                None => {}
            }

            if Instant::now() >= next_frame {
                break;
            }
        }

        if let Some(vp) = pending_resize {
            rain.resize(canvas, vp);
            stats.resizes += 1;
        }

        let work_start = Instant::now();
        rain.render(canvas);
        host.present(canvas.frame_mut())?;
        stats.record(work_start.elapsed(), period);

        next_frame += period;
        let now = Instant::now();
        if now > next_frame {
            next_frame = now;
        }
    }

    stats.elapsed = start_time.elapsed();
    let (w, h) = canvas.size();
    log::info!(
        "stopped after {} frames ({} resizes, {} wraps), surface {}x{}, rain {}x{}",
        stats.frames,
        stats.resizes,
        rain.wraps(),
        w,
        h,
        rain.width(),
        rain.height()
    );
    Ok(stats)
}
