// Copyright (c) 2026 rezky_nightky

mod canvas;
mod cell;
mod config;
mod error;
mod frame;
mod host;
mod palette;
mod particle;
mod rain;
mod runtime;
mod scheduler;
mod surface;
mod terminal;

use std::env;
use std::fs::File;
use std::path::Path;
use std::process::ExitCode;

#[cfg(unix)]
use std::thread;

use clap::builder::styling::{AnsiColor as ClapAnsiColor, Color as ClapColor};
use clap::builder::styling::{Effects as ClapEffects, Style as ClapStyle};
use clap::builder::Styles as ClapStyles;
use clap::{CommandFactory, FromArgMatches};
use rand::{rngs::StdRng, SeedableRng};

#[cfg(unix)]
use signal_hook::consts::{SIGHUP, SIGINT, SIGTERM};
#[cfg(unix)]
use signal_hook::iterator::Signals;

use crate::canvas::Canvas;
use crate::config::{color_enabled_stdout, default_params_usage_for_help, Args};
use crate::host::Host;
use crate::rain::Rain;
use crate::runtime::{detect_color_mode_auto, resolve_color_mode, ColorMode};
use crate::scheduler::{Options, RunStats};
use crate::terminal::{restore_terminal_best_effort, Terminal};

const HELP_TEMPLATE_PLAIN: &str = "\
{before-help}{about-with-newline}
USAGE:
  {usage}

{all-args}{after-help}";

const HELP_TEMPLATE_COLOR: &str = "\
{before-help}{about-with-newline}
\x1b[1;36mUSAGE:\x1b[0m
  {usage}

{all-args}{after-help}";

fn clap_styles() -> ClapStyles {
    ClapStyles::styled()
        .header(
            ClapStyle::new()
                .effects(ClapEffects::BOLD)
                .fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Cyan))),
        )
        .usage(
            ClapStyle::new()
                .effects(ClapEffects::BOLD)
                .fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Green))),
        )
        .literal(ClapStyle::new().fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Yellow))))
        .placeholder(ClapStyle::new().fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Magenta))))
}

fn parse_args() -> Args {
    let mut cmd = Args::command()
        .styles(clap_styles())
        .before_help(default_params_usage_for_help())
        .help_template(if color_enabled_stdout() {
            HELP_TEMPLATE_COLOR
        } else {
            HELP_TEMPLATE_PLAIN
        });
    cmd.build();
    if cmd.get_arguments().any(|a| a.get_id().as_str() == "help") {
        cmd = cmd.mut_arg("help", |a| a.help_heading("HELP"));
    }

    let matches = cmd.get_matches();
    Args::from_arg_matches(&matches).unwrap_or_else(|e| e.exit())
}

fn install_exit_handlers() {
    std::panic::set_hook(Box::new(|info| {
        restore_terminal_best_effort();
        eprintln!("{}", info);
    }));

    #[cfg(unix)]
    {
        if let Ok(mut signals) = Signals::new([SIGINT, SIGTERM, SIGHUP]) {
            thread::spawn(move || {
                if let Some(sig) = signals.forever().next() {
                    restore_terminal_best_effort();
                    std::process::exit(128 + sig);
                }
            });
        }
    }

    #[cfg(windows)]
    {
        if let Err(e) = ctrlc::set_handler(|| {
            restore_terminal_best_effort();
            std::process::exit(130);
        }) {
            eprintln!("failed to install Ctrl-C handler: {}", e);
        }
    }
}

/// Logs go to `path` when given. Otherwise they stay off unless `RUST_LOG`
/// asks for them, since the alternate screen owns the terminal.
fn init_logging(path: Option<&Path>) -> std::io::Result<()> {
    let mut builder = match path {
        Some(path) => {
            let file = File::create(path)?;
            let mut b =
                env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
            b.target(env_logger::Target::Pipe(Box::new(file)));
            b
        }
        None => env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("off")),
    };
    builder.format_timestamp_millis();
    builder.init();
    Ok(())
}

fn print_bitcolor(args: &Args, effective: ColorMode) {
    let colorterm = env::var("COLORTERM").unwrap_or_default();
    let term = env::var("TERM").unwrap_or_default();
    let unset = |v: &str| if v.is_empty() { "(unset)".to_string() } else { v.to_string() };

    println!("BITCOLOR CHECK:");
    println!("  COLORTERM: {}", unset(&colorterm));
    println!("  TERM: {}", unset(&term));
    println!("  auto_detected: {}", detect_color_mode_auto().label());
    if args.colormode.is_some() {
        println!("  forced: {}", effective.label());
    }
    println!("  effective: {}", effective.label());
}

fn print_info() {
    println!("Version: v{}", env!("CARGO_PKG_VERSION"));
    println!("Build: {}", env!("RAINSTORM_BUILD"));
    let sha = env!("RAINSTORM_GIT_SHA");
    if !sha.is_empty() {
        println!("Commit: {}", sha);
    }
    println!("Copyright: (c) 2026 {}", env!("CARGO_PKG_AUTHORS"));
    println!("License: {}", env!("CARGO_PKG_LICENSE"));
}

fn print_perf_stats(stats: &RunStats, opts: &Options) {
    let frames = stats.frames.max(1) as f64;
    println!("PERF STATS:");
    println!("  elapsed_s: {:.3}", stats.elapsed.as_secs_f64());
    println!("  target_fps: {:.3}", opts.fps);
    println!("  avg_fps: {:.3}", stats.avg_fps());
    println!("  frames: {}", stats.frames);
    println!("  resizes: {}", stats.resizes);
    println!("  avg_work_ms: {:.3}", stats.avg_work_ms());
    println!("  max_work_ms: {:.3}", stats.work_max.as_secs_f64() * 1000.0);
    println!(
        "  overshoot_frames: {} ({:.1}%)",
        stats.overshoot_frames,
        stats.overshoot_frames as f64 / frames * 100.0
    );
}

fn report(err: &error::Error) {
    use std::error::Error as _;

    eprintln!("rainstorm: {}", err);
    let mut source = err.source();
    while let Some(cause) = source {
        eprintln!("  caused by: {}", cause);
        source = cause.source();
    }
    if err.is_environment_unavailable() {
        eprintln!("rainstorm must run in an interactive terminal");
    }
}

/// Everything between host-ready and teardown. The terminal is restored
/// when this returns, before anything is printed.
fn rain_until_stopped(
    opts: &Options,
    color_mode: ColorMode,
    seed: Option<u64>,
) -> error::Result<RunStats> {
    let mut term = Terminal::new()?;
    let viewport = term.viewport()?;
    let mt = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let mut canvas = Canvas::new(viewport, color_mode);
    let mut rain = Rain::new(viewport.width, viewport.height, mt);
    log::info!(
        "viewport {}x{} px ({}x{} cells), {} drops, seed {}, color mode {}",
        viewport.width,
        viewport.height,
        viewport.cols,
        viewport.rows,
        rain.particles().len(),
        seed.map_or_else(|| "random".to_string(), |s| s.to_string()),
        color_mode.label()
    );

    scheduler::run(&mut term, &mut canvas, &mut rain, opts)
}

fn main() -> ExitCode {
    install_exit_handlers();
    let args = parse_args();

    if args.version {
        println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        return ExitCode::SUCCESS;
    }

    if args.info {
        print_info();
        return ExitCode::SUCCESS;
    }

    let color_mode = match resolve_color_mode(args.colormode) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    if args.check_bitcolor {
        print_bitcolor(&args, color_mode);
        return ExitCode::SUCCESS;
    }

    let opts = match args.loop_options() {
        Ok(o) => o,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = init_logging(args.log_file.as_deref()) {
        eprintln!(
            "failed to open log file {}: {}",
            args.log_file.as_deref().unwrap_or(Path::new("")).display(),
            e
        );
        return ExitCode::FAILURE;
    }

    match rain_until_stopped(&opts, color_mode, args.seed) {
        Ok(stats) => {
            if args.perf_stats {
                print_perf_stats(&stats, &opts);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{}", e);
            report(&e);
            ExitCode::FAILURE
        }
    }
}
