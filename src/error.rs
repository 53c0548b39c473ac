/// Error types for map loading, maze generation and session setup.
///
/// Ray escapes are not here: they are a per-frame condition owned by
/// `domain::raycast` and never abort a session.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure to turn a grid file (or grid text) into a `Grid`.
#[derive(Error, Debug)]
pub enum MapLoadError {
    #[error("could not read map {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("map is empty (missing `W H` header)")]
    MissingHeader,

    #[error("malformed header {0:?}: expected two positive integers `W H`")]
    BadHeader(String),

    #[error("line {line}: token {token:?} is not an integer")]
    BadToken { line: usize, token: String },

    #[error("line {line}: expected {expected} cells, found {found}")]
    WrongTokenCount { line: usize, expected: usize, found: usize },

    #[error("expected {expected} rows, found {found}")]
    RowCountMismatch { expected: usize, found: usize },

    #[error("line {line}, column {column}: unknown cell code {code}")]
    UnknownCellCode { line: usize, column: usize, code: i64 },

    #[error("map has no player spawn (code 1)")]
    NoSpawn,

    #[error("map has more than one player spawn: ({}, {}) and ({}, {})", first.0, first.1, second.0, second.1)]
    MultipleSpawns { first: (usize, usize), second: (usize, usize) },
}

/// Failure in the procedural maze generator.
#[derive(Error, Debug)]
pub enum MazeError {
    #[error("invalid maze dimensions {cols}x{rows}: both must be at least 1")]
    InvalidDimensions { cols: usize, rows: usize },

    #[error("could not write maze to {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Failure to build a session from a map source.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Map(#[from] MapLoadError),

    #[error(transparent)]
    Maze(#[from] MazeError),
}
