use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::{
    cursor,
    event::{self, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    terminal, ExecutableCommand,
};
use rand::thread_rng;
use tracing::info;
use tracing_subscriber::EnvFilter;

use evil_clutches::assets::Assets;
use evil_clutches::compute::{animate, check_collisions, init_state, update};
use evil_clutches::config::Config;
use evil_clutches::display;
use evil_clutches::entities::GameStatus;
use evil_clutches::input::KeyTracker;

// ── Logging ───────────────────────────────────────────────────────────────────

/// The terminal belongs to the game, so log lines go to a file.
fn init_logging(config: &Config) -> Result<()> {
    let file = File::create(&config.log_file)
        .with_context(|| format!("creating log file {}", config.log_file.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Runs until a close request.  Each tick: drain input, update, render,
/// resolve collisions, animate, then sleep out the rest of the frame.
fn game_loop<W: Write>(out: &mut W, assets: Arc<Assets>, config: &Config) -> Result<()> {
    let clock = Instant::now();
    let millis = || clock.elapsed().as_millis() as u64;
    let frame_length = config.frame_duration();

    let mut rng = thread_rng();
    let mut keys = KeyTracker::new(config.hold_window);
    let mut state = init_state(assets, millis());

    while state.status == GameStatus::Running {
        let frame_start = Instant::now();

        // ── Drain all pending input events (non-blocking) ─────────────────────
        keys.begin_frame();
        while event::poll(Duration::ZERO)? {
            keys.handle_event(&event::read()?);
        }
        let input = keys.snapshot();
        let now = millis();

        state = update(&state, &input, now, &mut rng);
        if state.status == GameStatus::Stopped {
            break;
        }

        display::render(out, &state, terminal::size()?)?;
        state = check_collisions(&state);
        state = animate(&state, now);

        let elapsed = frame_start.elapsed();
        if elapsed < frame_length {
            std::thread::sleep(frame_length - elapsed);
        }
    }

    info!(frames = state.frame, "close requested");
    Ok(())
}

/// Terminal setup followed by the game loop.  Everything after raw mode is
/// switched on goes through here so `main` can always restore the terminal.
fn run<W: Write>(
    out: &mut W,
    assets: Arc<Assets>,
    config: &Config,
    keyboard_enhanced: &mut bool,
) -> Result<()> {
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Kitty-protocol terminals support this; others fall back to hold windows.
    *keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    game_loop(out, assets, config)
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let config = Config::load()?;
    init_logging(&config)?;
    info!(?config, "starting");

    // Load everything before touching the terminal so failures print cleanly.
    let assets = Arc::new(
        Assets::load(&config.asset_dir)
            .with_context(|| format!("loading assets from {}", config.asset_dir.display()))?,
    );

    let mut out = BufWriter::new(stdout());

    terminal::enable_raw_mode()?;
    let mut keyboard_enhanced = false;
    let result = run(&mut out, assets, &config, &mut keyboard_enhanced);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    info!("shutdown");
    result
}
