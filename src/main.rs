/// Entry point and frame loop.
///
/// Usage:
///   raymaze                       first map in the maps directory, or a
///                                 generated maze when there is none
///   raymaze MAP_FILE              play a grid file
///   raymaze --generate [COLS ROWS]
///   raymaze --list                list maps in the maps directory

mod config;
mod domain;
mod error;
mod sim;
mod ui;

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crossterm::event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags};
use crossterm::{execute, terminal};

use config::GameConfig;
use sim::event::GameEvent;
use sim::level::{scan_maps, MapSource};
use sim::session::Session;
use ui::gamepad::GamepadState;
use ui::input::InputState;
use ui::renderer::Renderer;

enum Command {
    Play(MapSource),
    List,
}

fn main() {
    let config = GameConfig::load();
    init_logging(&config);

    let command = match parse_args(std::env::args().skip(1).collect(), &config) {
        Ok(c) => c,
        Err(msg) => {
            eprintln!("{msg}");
            eprintln!("usage: raymaze [MAP_FILE | --generate [COLS ROWS] | --list]");
            std::process::exit(2);
        }
    };

    let source = match command {
        Command::List => {
            list_maps(&config);
            return;
        }
        Command::Play(source) => source,
    };

    let mut session = match Session::from_source(&source, &config) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "could not start session");
            eprintln!("raymaze: {e}");
            std::process::exit(1);
        }
    };

    let mut renderer = Renderer::new();
    if let Err(e) = renderer.init() {
        eprintln!("Terminal init failed: {e}");
        return;
    }

    let enhanced = matches!(terminal::supports_keyboard_enhancement(), Ok(true))
        && execute!(
            std::io::stdout(),
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
        )
        .is_ok();

    let result = game_loop(&mut session, &mut renderer, &config, enhanced);

    if enhanced {
        let _ = execute!(std::io::stdout(), PopKeyboardEnhancementFlags);
    }
    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }
    if let Err(e) = result {
        eprintln!("Game error: {e}");
    }

    if session.is_won() {
        println!("You beat the maze in {:.2}s!", session.elapsed_clear_time());
    }
}

fn game_loop(
    session: &mut Session,
    renderer: &mut Renderer,
    config: &GameConfig,
    enhanced: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut kb = InputState::new();
    kb.honor_release = enhanced;
    let mut gp = GamepadState::new();
    gp.load_button_config(&config.gamepad);

    let frame_time = Duration::from_secs_f64(1.0 / config.general.frame_rate as f64);
    let mut last_frame = Instant::now();

    while !session.is_finished() {
        let frame_start = Instant::now();

        kb.drain_events();
        gp.update();
        let intent = kb.intent().merge(gp.intent());

        let dt = frame_start.duration_since(last_frame).as_secs_f64();
        last_frame = frame_start;

        for event in session.update(&intent, dt) {
            match event {
                GameEvent::GoalReached { elapsed } => {
                    tracing::debug!(elapsed, "leaving loop on goal");
                }
                GameEvent::QuitRequested => {
                    tracing::info!(elapsed = session.elapsed_clear_time(), "quit");
                }
            }
        }

        renderer.render(session)?;

        if let Some(rest) = frame_time.checked_sub(frame_start.elapsed()) {
            std::thread::sleep(rest);
        }
    }

    Ok(())
}

fn parse_args(args: Vec<String>, config: &GameConfig) -> Result<Command, String> {
    let generated = |cols, rows| MapSource::Generated { cols, rows, seed: config.maze.seed };

    match args.first().map(String::as_str) {
        None => {
            let first = scan_maps(&config.general.maps_dir).into_iter().next();
            Ok(Command::Play(match first {
                Some(info) => MapSource::File(info.path),
                None => generated(config.maze.cols, config.maze.rows),
            }))
        }
        Some("--list") => Ok(Command::List),
        Some("--generate") => match &args[1..] {
            [] => Ok(Command::Play(generated(config.maze.cols, config.maze.rows))),
            [cols, rows] => {
                let parse = |s: &str| s.parse::<usize>().map_err(|_| format!("not a size: {s:?}"));
                Ok(Command::Play(generated(parse(cols.as_str())?, parse(rows.as_str())?)))
            }
            _ => Err("--generate takes either no sizes or COLS ROWS".to_string()),
        },
        Some(flag) if flag.starts_with("--") => Err(format!("unknown option {flag}")),
        Some(path) => {
            if args.len() > 1 {
                return Err("expected a single map file".to_string());
            }
            Ok(Command::Play(MapSource::File(PathBuf::from(path))))
        }
    }
}

fn list_maps(config: &GameConfig) {
    let maps = scan_maps(&config.general.maps_dir);
    if maps.is_empty() {
        println!("no maps in {}", config.general.maps_dir.display());
        return;
    }
    for map in maps {
        match map.dims {
            Some((w, h)) => println!("{:<24} {:>4}x{:<4} {}", map.name, w, h, map.path.display()),
            None => println!("{:<24} {:>9} {}", map.name, "?", map.path.display()),
        }
    }
}

/// Route tracing events to the configured log file. The terminal belongs to
/// the renderer, so nothing is installed without one.
fn init_logging(config: &GameConfig) {
    let Some(path) = &config.general.log_file else { return };

    match OpenOptions::new().create(true).append(true).open(path) {
        Ok(file) => {
            tracing_subscriber::fmt()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_max_level(tracing::Level::INFO)
                .init();
        }
        Err(e) => eprintln!("Warning: could not open log file {}: {e}", path.display()),
    }
}
