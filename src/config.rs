// Copyright (c) 2026 rezky_nightky

use std::io::IsTerminal;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::scheduler::Options;

pub const DEFAULT_PARAMS_USAGE: &str =
    "DEFAULT PARAMS USAGE:\n  rainstorm --duration 0";

/// Fall speed is per frame, so the frame rate is fixed.
pub const FRAME_RATE: f64 = 60.0;
pub const DURATION_RANGE: (f64, f64) = (0.1, 86400.0);

pub fn color_enabled_stdout() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if matches!(std::env::var("CLICOLOR").ok().as_deref(), Some("0")) {
        return false;
    }
    std::io::stdout().is_terminal()
}

pub fn default_params_usage_for_help() -> String {
    if !color_enabled_stdout() {
        return DEFAULT_PARAMS_USAGE.to_string();
    }
    let mut out = String::with_capacity(DEFAULT_PARAMS_USAGE.len() + 32);
    for (i, line) in DEFAULT_PARAMS_USAGE.lines().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        match line.strip_prefix("  rainstorm") {
            Some(rest) => {
                out.push_str("  \x1b[1;34mrainstorm\x1b[0m");
                out.push_str(rest);
            }
            None if line.ends_with(':') => {
                out.push_str("\x1b[1;36m");
                out.push_str(line);
                out.push_str("\x1b[0m");
            }
            None => out.push_str(line),
        }
    }
    out
}

#[derive(Parser, Debug, Clone)]
#[command(name = "rainstorm", version, disable_version_flag = true)]
pub struct Args {
    #[arg(
        long = "duration",
        allow_negative_numbers = true,
        help_heading = "GENERAL",
        help = "Stop after N seconds (min 0.1 max 86400; <=0 disables)"
    )]
    pub duration: Option<f64>,

    #[arg(
        long = "seed",
        help_heading = "GENERAL",
        help = "Seed for a reproducible run (default: random)"
    )]
    pub seed: Option<u64>,

    #[arg(
        long = "colormode",
        help_heading = "TERMINAL",
        help = "Force color mode (allowed: 0,16,8/256,24/32). Default: 24-bit if supported (COLORTERM), else 8-bit (TERM=...256color), else 16-color"
    )]
    pub colormode: Option<u16>,

    #[arg(
        long = "check-bitcolor",
        help_heading = "TERMINAL",
        help = "Print detected terminal color capability and exit"
    )]
    pub check_bitcolor: bool,

    #[arg(
        long = "perf-stats",
        help_heading = "DIAGNOSTICS",
        help = "Print performance statistics summary on exit"
    )]
    pub perf_stats: bool,

    #[arg(
        long = "log-file",
        value_name = "PATH",
        help_heading = "DIAGNOSTICS",
        help = "Write logs to PATH (level from RUST_LOG, default info)"
    )]
    pub log_file: Option<PathBuf>,

    #[arg(
        long = "info",
        short = 'i',
        help_heading = "HELP",
        help = "Print version info and exit"
    )]
    pub info: bool,

    #[arg(
        long = "version",
        short = 'v',
        help_heading = "HELP",
        help = "Print version and exit"
    )]
    pub version: bool,
}

fn require_f64_range(name: &str, v: f64, min: f64, max: f64) -> Result<f64, String> {
    if !v.is_finite() {
        return Err(format!("failed to apply {} {} (must be a finite number)", name, v));
    }
    if v < min || v > max {
        return Err(format!("failed to apply {} {} (min {} max {})", name, v, min, max));
    }
    Ok(v)
}

impl Args {
    /// Validated frame loop options.
    pub fn loop_options(&self) -> Result<Options, String> {
        let duration = match self.duration {
            Some(s) if !s.is_finite() => {
                return Err(format!(
                    "failed to apply --duration {} (must be a finite number)",
                    s
                ))
            }
            Some(s) if s > 0.0 => Some(Duration::from_secs_f64(require_f64_range(
                "--duration",
                s,
                DURATION_RANGE.0,
                DURATION_RANGE.1,
            )?)),
            _ => None,
        };
        Ok(Options {
            fps: FRAME_RATE,
            duration,
        })
    }
}
