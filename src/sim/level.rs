/// Map sources and discovery.
///
/// ## Sources
///   1. A grid file on disk (`*.map`)
///   2. A freshly generated maze, written to `<maps_dir>/generated.map`
///      and loaded back, so play normally goes through the file encoding.
///      If the file cannot be written the maze is played from memory.
///
/// ## Discovery
///   `scan_maps` walks the maps directory (subdirectories included) for
///   `*.map` files, sorted by relative path, with the `W H` header read from
///   each file when it passes the loader's header check.

use std::path::{Path, PathBuf};

use crate::domain::grid::{self, Grid};
use crate::error::SessionError;
use crate::sim::maze::Maze;

/// File name used for generated mazes inside the maps directory.
pub const GENERATED_FILE: &str = "generated.map";
pub const MAP_EXTENSION: &str = "map";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MapSource {
    File(PathBuf),
    Generated { cols: usize, rows: usize, seed: Option<u64> },
}

/// Listing entry for one map file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MapInfo {
    pub name: String,
    pub path: PathBuf,
    /// `(width, height)` from the header, if readable.
    pub dims: Option<(usize, usize)>,
}

/// A loaded grid plus the name to show for it.
pub struct LoadedMap {
    pub name: String,
    pub grid: Grid,
}

// ══════════════════════════════════════════════════════════════
// Public API
// ══════════════════════════════════════════════════════════════

/// Resolve a source into a grid. Generated mazes are written under `maps_dir`.
pub fn load(source: &MapSource, maps_dir: &Path) -> Result<LoadedMap, SessionError> {
    match source {
        MapSource::File(path) => {
            let grid = Grid::load(path)?;
            Ok(LoadedMap { name: display_name(path), grid })
        }
        MapSource::Generated { cols, rows, seed } => {
            let maze = match seed {
                Some(seed) => Maze::generate_seeded(*cols, *rows, *seed)?,
                None => Maze::generate(*cols, *rows, &mut rand::thread_rng())?,
            };
            let path = maps_dir.join(GENERATED_FILE);
            let grid = match maze.write_to_file(&path) {
                Ok(()) => Grid::load(&path)?,
                Err(e) => {
                    tracing::warn!(error = %e, "playing generated maze from memory");
                    maze.to_grid()?
                }
            };
            Ok(LoadedMap { name: format!("generated {}x{}", cols, rows), grid })
        }
    }
}

/// List `*.map` files under `dir`, subdirectories included, sorted by path.
/// A missing directory yields an empty list.
pub fn scan_maps(dir: &Path) -> Vec<MapInfo> {
    let mut paths = vec![];
    collect_maps(dir, &mut paths);
    paths.sort();

    paths
        .into_iter()
        .map(|path| MapInfo {
            name: display_name(&path),
            dims: read_dims(&path),
            path,
        })
        .collect()
}

// ══════════════════════════════════════════════════════════════
// Helpers
// ══════════════════════════════════════════════════════════════

fn display_name(path: &Path) -> String {
    path.file_stem()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string()
}

fn collect_maps(dir: &Path, out: &mut Vec<PathBuf>) {
    let entries = match std::fs::read_dir(dir) {
        Ok(e) => e,
        Err(_) => return,
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_maps(&path, out);
        } else if path.extension().map_or(false, |e| e == MAP_EXTENSION) {
            out.push(path);
        }
    }
}

fn read_dims(path: &Path) -> Option<(usize, usize)> {
    let content = std::fs::read_to_string(path).ok()?;
    grid::read_header(&content).ok()
}
