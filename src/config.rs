/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete.

use serde::Deserialize;
use std::path::PathBuf;

// ── Public Config Struct ──

#[derive(Clone, Debug, Default)]
pub struct GameConfig {
    pub camera: CameraConfig,
    pub maze: MazeConfig,
    pub general: GeneralConfig,
    pub gamepad: GamepadConfig,
}

#[derive(Clone, Debug)]
pub struct CameraConfig {
    pub move_speed: f64,   // cells / second
    pub rotate_speed: f64, // radians / second
    pub pitch_speed: f64,  // screen rows / second
    pub depth: f64,        // distance at which walls fade out
    pub fov_plane: f64,    // camera plane magnitude
}

#[derive(Clone, Debug)]
pub struct MazeConfig {
    pub cols: usize,
    pub rows: usize,
    pub seed: Option<u64>,
}

#[derive(Clone, Debug)]
pub struct GeneralConfig {
    pub maps_dir: PathBuf,
    pub frame_rate: u32,
    pub log_file: Option<PathBuf>,
}

#[derive(Clone, Debug)]
pub struct GamepadConfig {
    pub rotate_left: Vec<String>,
    pub rotate_right: Vec<String>,
    pub look_up: Vec<String>,
    pub look_down: Vec<String>,
    pub quit: Vec<String>,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    camera: TomlCamera,
    #[serde(default)]
    maze: TomlMaze,
    #[serde(default)]
    general: TomlGeneral,
    #[serde(default)]
    gamepad: TomlGamepad,
}

#[derive(Deserialize, Debug)]
struct TomlCamera {
    #[serde(default = "default_move_speed")]
    move_speed: f64,
    #[serde(default = "default_rotate_speed")]
    rotate_speed: f64,
    #[serde(default = "default_pitch_speed")]
    pitch_speed: f64,
    #[serde(default = "default_depth")]
    depth: f64,
    #[serde(default = "default_fov_plane")]
    fov_plane: f64,
}

#[derive(Deserialize, Debug)]
struct TomlMaze {
    #[serde(default = "default_maze_cols")]
    cols: usize,
    #[serde(default = "default_maze_rows")]
    rows: usize,
    #[serde(default)]
    seed: Option<u64>,
}

#[derive(Deserialize, Debug)]
struct TomlGeneral {
    #[serde(default = "default_maps_dir")]
    maps_dir: String,
    #[serde(default = "default_frame_rate")]
    frame_rate: u32,
    #[serde(default)]
    log_file: Option<String>,
}

#[derive(Deserialize, Debug)]
struct TomlGamepad {
    #[serde(default = "default_rotate_left")]
    rotate_left: Vec<String>,
    #[serde(default = "default_rotate_right")]
    rotate_right: Vec<String>,
    #[serde(default = "default_look_up")]
    look_up: Vec<String>,
    #[serde(default = "default_look_down")]
    look_down: Vec<String>,
    #[serde(default = "default_quit")]
    quit: Vec<String>,
}

// ── Defaults ──

fn default_move_speed() -> f64 { 4.0 }
fn default_rotate_speed() -> f64 { 2.5 }
fn default_pitch_speed() -> f64 { 120.0 }
fn default_depth() -> f64 { 16.0 }
fn default_fov_plane() -> f64 { 0.66 }

fn default_maze_cols() -> usize { 10 }
fn default_maze_rows() -> usize { 10 }

fn default_maps_dir() -> String { "maps".into() }
fn default_frame_rate() -> u32 { 60 }

fn default_rotate_left() -> Vec<String> { vec!["L1".into()] }
fn default_rotate_right() -> Vec<String> { vec!["R1".into()] }
fn default_look_up() -> Vec<String> { vec!["Y".into()] }
fn default_look_down() -> Vec<String> { vec!["A".into()] }
fn default_quit() -> Vec<String> { vec!["Select".into()] }

impl Default for TomlCamera {
    fn default() -> Self {
        TomlCamera {
            move_speed: default_move_speed(),
            rotate_speed: default_rotate_speed(),
            pitch_speed: default_pitch_speed(),
            depth: default_depth(),
            fov_plane: default_fov_plane(),
        }
    }
}

impl Default for TomlMaze {
    fn default() -> Self {
        TomlMaze {
            cols: default_maze_cols(),
            rows: default_maze_rows(),
            seed: None,
        }
    }
}

impl Default for TomlGeneral {
    fn default() -> Self {
        TomlGeneral {
            maps_dir: default_maps_dir(),
            frame_rate: default_frame_rate(),
            log_file: None,
        }
    }
}

impl Default for TomlGamepad {
    fn default() -> Self {
        TomlGamepad {
            rotate_left: default_rotate_left(),
            rotate_right: default_rotate_right(),
            look_up: default_look_up(),
            look_down: default_look_down(),
            quit: default_quit(),
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        TomlCamera::default().into()
    }
}

impl Default for MazeConfig {
    fn default() -> Self {
        TomlMaze::default().into()
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        GeneralConfig {
            maps_dir: PathBuf::from(default_maps_dir()),
            frame_rate: default_frame_rate(),
            log_file: None,
        }
    }
}

impl Default for GamepadConfig {
    fn default() -> Self {
        TomlGamepad::default().into()
    }
}

impl From<TomlCamera> for CameraConfig {
    fn from(t: TomlCamera) -> Self {
        CameraConfig {
            move_speed: t.move_speed,
            rotate_speed: t.rotate_speed,
            pitch_speed: t.pitch_speed,
            depth: t.depth,
            fov_plane: t.fov_plane,
        }
    }
}

impl From<TomlMaze> for MazeConfig {
    fn from(t: TomlMaze) -> Self {
        MazeConfig { cols: t.cols, rows: t.rows, seed: t.seed }
    }
}

impl From<TomlGamepad> for GamepadConfig {
    fn from(t: TomlGamepad) -> Self {
        GamepadConfig {
            rotate_left: t.rotate_left,
            rotate_right: t.rotate_right,
            look_up: t.look_up,
            look_down: t.look_down,
            quit: t.quit,
        }
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory,
    /// (3) XDG data home, (4) system data directory.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        let search_dirs = candidate_dirs();
        let toml_cfg = load_toml(&search_dirs);
        Self::resolve(toml_cfg, &search_dirs)
    }

    /// Parse config text directly. Relative paths are kept as written.
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        let toml_cfg = toml::from_str::<TomlConfig>(text)?;
        Ok(Self::resolve(toml_cfg, &[]))
    }

    fn resolve(toml_cfg: TomlConfig, search_dirs: &[PathBuf]) -> Self {
        // Resolve maps directory: first candidate dir that already has it
        let maps_dir_str = &toml_cfg.general.maps_dir;
        let maps_dir = if PathBuf::from(maps_dir_str).is_absolute() {
            PathBuf::from(maps_dir_str)
        } else {
            search_dirs.iter()
                .map(|d| d.join(maps_dir_str))
                .find(|p| p.is_dir())
                .unwrap_or_else(|| PathBuf::from(maps_dir_str))
        };

        GameConfig {
            camera: toml_cfg.camera.into(),
            maze: toml_cfg.maze.into(),
            general: GeneralConfig {
                maps_dir,
                frame_rate: toml_cfg.general.frame_rate.max(1),
                log_file: toml_cfg.general.log_file.map(PathBuf::from),
            },
            gamepad: toml_cfg.gamepad.into(),
        }
    }
}

/// Candidate directories to search: exe dir + CWD + data paths (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    // 1. Directory of the running executable
    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    // 2. Current working directory
    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    // 3. XDG data home (~/.local/share/raymaze)
    if let Ok(home) = std::env::var("HOME") {
        let xdg = PathBuf::from(&home).join(".local/share/raymaze");
        if xdg.is_dir() && !dirs.iter().any(|d| d == &xdg) {
            dirs.push(xdg);
        }
    }

    // 4. System data directory (/usr/share/raymaze)
    let sys = PathBuf::from("/usr/share/raymaze");
    if sys.is_dir() && !dirs.iter().any(|d| d == &sys) {
        dirs.push(sys);
    }

    // 5. Fallback
    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Search for config.toml in candidate directories.
fn load_toml(search_dirs: &[PathBuf]) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(text) => match toml::from_str::<TomlConfig>(&text) {
                    Ok(cfg) => return cfg,
                    Err(e) => {
                        eprintln!("Warning: config.toml parse error: {e}");
                        eprintln!("Using default settings.");
                        return TomlConfig::default();
                    }
                },
                Err(e) => {
                    eprintln!("Warning: could not read {}: {e}", path.display());
                }
            }
        }
    }
    TomlConfig::default()
}
