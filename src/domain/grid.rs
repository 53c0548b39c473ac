/// Occupancy grid: the parsed map the camera moves through and rays march over.
///
/// ## Grid file format
///   ```
///   W H
///   <H rows of W whitespace-separated cell codes>
///   ```
///   0 = Empty, 1 = Player spawn (exactly one), 2 = Wall, 3 = Flag (goal).
///
/// Row index grows top-to-bottom in file order, column index left-to-right.
/// Blank lines are ignored. The spawn cell is recorded separately and
/// rewritten to Empty, so a loaded grid never contains `PlayerSpawn`.

use std::path::Path;

use crate::domain::cell::CellKind;
use crate::error::MapLoadError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    /// `cells[row][col]`
    cells: Vec<Vec<CellKind>>,
    width: usize,
    height: usize,
    spawn: (usize, usize),
}

impl Grid {
    /// Read and parse a grid file.
    pub fn load(path: &Path) -> Result<Grid, MapLoadError> {
        let text = std::fs::read_to_string(path).map_err(|source| MapLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let grid = Grid::parse(&text)?;
        tracing::info!(
            path = %path.display(),
            width = grid.width,
            height = grid.height,
            spawn_col = grid.spawn.0,
            spawn_row = grid.spawn.1,
            "map loaded"
        );
        Ok(grid)
    }

    /// Parse grid text.
    pub fn parse(text: &str) -> Result<Grid, MapLoadError> {
        let mut lines = text
            .lines()
            .enumerate()
            .map(|(i, l)| (i + 1, l.trim()))
            .filter(|(_, l)| !l.is_empty());

        let (_, header) = lines.next().ok_or(MapLoadError::MissingHeader)?;
        let (width, height) = parse_header(header)?;

        // Rows are pushed as read; `height` is untrusted until counted.
        let mut cells = Vec::new();
        let mut spawn: Option<(usize, usize)> = None;
        let mut found_rows = 0;

        for (line_no, line) in lines {
            found_rows += 1;
            if found_rows > height {
                continue; // counted for the mismatch error below
            }
            let row_idx = cells.len();
            let row = parse_row(line_no, line, width, row_idx, &mut spawn)?;
            cells.push(row);
        }

        if found_rows != height {
            return Err(MapLoadError::RowCountMismatch { expected: height, found: found_rows });
        }

        let spawn = spawn.ok_or(MapLoadError::NoSpawn)?;
        Ok(Grid { cells, width, height, spawn })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Spawn coordinate `(column, row)` discovered at load time.
    pub fn spawn(&self) -> (usize, usize) {
        self.spawn
    }

    /// Cell at integer coordinates. `None` outside the grid.
    #[inline]
    pub fn cell(&self, col: i64, row: i64) -> Option<CellKind> {
        if col < 0 || row < 0 {
            return None;
        }
        self.cells
            .get(row as usize)
            .and_then(|r| r.get(col as usize))
            .copied()
    }

    /// Cell containing the continuous point `(x, y)`.
    #[inline]
    pub fn cell_at(&self, x: f64, y: f64) -> Option<CellKind> {
        if !x.is_finite() || !y.is_finite() {
            return None;
        }
        self.cell(x.floor() as i64, y.floor() as i64)
    }

    /// Does the point `(x, y)` lie in a wall? Outside the grid counts as wall.
    #[inline]
    pub fn is_wall_at(&self, x: f64, y: f64) -> bool {
        self.cell_at(x, y).map_or(true, CellKind::is_wall)
    }
}

/// `(width, height)` from the header of grid text, without reading rows.
pub fn read_header(text: &str) -> Result<(usize, usize), MapLoadError> {
    let header = text
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .ok_or(MapLoadError::MissingHeader)?;
    parse_header(header)
}

fn parse_header(line: &str) -> Result<(usize, usize), MapLoadError> {
    let bad = || MapLoadError::BadHeader(line.to_string());
    let mut parts = line.split_whitespace();
    let w = parts.next().and_then(|t| t.parse::<usize>().ok()).ok_or_else(bad)?;
    let h = parts.next().and_then(|t| t.parse::<usize>().ok()).ok_or_else(bad)?;
    if parts.next().is_some() || w == 0 || h == 0 {
        return Err(bad());
    }
    Ok((w, h))
}

fn parse_row(
    line_no: usize,
    line: &str,
    width: usize,
    row_idx: usize,
    spawn: &mut Option<(usize, usize)>,
) -> Result<Vec<CellKind>, MapLoadError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() != width {
        return Err(MapLoadError::WrongTokenCount {
            line: line_no,
            expected: width,
            found: tokens.len(),
        });
    }

    let mut row = Vec::with_capacity(width);
    for (x, token) in tokens.iter().enumerate() {
        let code: i64 = token.parse().map_err(|_| MapLoadError::BadToken {
            line: line_no,
            token: token.to_string(),
        })?;
        let kind = CellKind::try_from(code).map_err(|e| MapLoadError::UnknownCellCode {
            line: line_no,
            column: x,
            code: e.0,
        })?;

        if kind == CellKind::PlayerSpawn {
            if let Some(first) = *spawn {
                return Err(MapLoadError::MultipleSpawns { first, second: (x, row_idx) });
            }
            *spawn = Some((x, row_idx));
            row.push(CellKind::Empty);
        } else {
            row.push(kind);
        }
    }
    Ok(row)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TINY: &str = "3 3\n2 2 2\n2 1 0\n2 0 3\n";

    #[test]
    fn tiny_map_spawn_and_flag() {
        let g = Grid::parse(TINY).unwrap();
        assert_eq!((g.width(), g.height()), (3, 3));
        assert_eq!(g.spawn(), (1, 1));
        assert_eq!(g.cell(2, 2), Some(CellKind::Flag));
        assert_eq!(g.cell(1, 1), Some(CellKind::Empty));
        assert_eq!(g.cell(2, 1), Some(CellKind::Empty));
        assert_eq!(g.cell(1, 2), Some(CellKind::Empty));
        for (x, y) in [(0, 0), (1, 0), (2, 0), (0, 1), (0, 2)] {
            assert_eq!(g.cell(x, y), Some(CellKind::Wall), "({x},{y})");
        }
    }

    #[test]
    fn loaded_grid_has_no_spawn_cells() {
        let g = Grid::parse(TINY).unwrap();
        for row in 0..3 {
            for col in 0..3 {
                assert_ne!(g.cell(col, row), Some(CellKind::PlayerSpawn));
            }
        }
    }

    #[test]
    fn non_square_indexing_is_column_row() {
        let g = Grid::parse("4 2\n1 0 0 3\n2 2 2 2\n").unwrap();
        assert_eq!(g.cell(3, 0), Some(CellKind::Flag));
        assert_eq!(g.cell(0, 1), Some(CellKind::Wall));
        assert_eq!(g.cell(4, 0), None);
        assert_eq!(g.cell(0, 2), None);
    }

    #[test]
    fn point_queries_floor_coordinates() {
        let g = Grid::parse(TINY).unwrap();
        assert_eq!(g.cell_at(2.99, 2.01), Some(CellKind::Flag));
        assert!(g.is_wall_at(0.5, 1.5));
        assert!(!g.is_wall_at(1.5, 1.5));
        assert!(g.is_wall_at(-0.1, 1.5));
        assert!(g.is_wall_at(1.5, 3.0));
        assert!(g.is_wall_at(f64::NAN, 1.0));
    }

    #[test]
    fn blank_lines_are_ignored() {
        let g = Grid::parse("\n3 3\n\n2 2 2\n2 1 0\n2 0 3\n\n\n").unwrap();
        assert_eq!(g.spawn(), (1, 1));
    }

    #[test]
    fn huge_header_height_with_few_rows_is_mismatch() {
        assert!(matches!(
            Grid::parse("1 100000000000000\n1\n"),
            Err(MapLoadError::RowCountMismatch { expected: 100000000000000, found: 1 })
        ));
    }

    #[test]
    fn header_only_read() {
        assert_eq!(read_header("\n 5 3 \n garbage").unwrap(), (5, 3));
        assert!(matches!(read_header("0 3\n"), Err(MapLoadError::BadHeader(_))));
        assert!(matches!(read_header("\n\n"), Err(MapLoadError::MissingHeader)));
    }

    #[test]
    fn empty_input_is_missing_header() {
        assert!(matches!(Grid::parse(""), Err(MapLoadError::MissingHeader)));
        assert!(matches!(Grid::parse("  \n\n"), Err(MapLoadError::MissingHeader)));
    }

    #[test]
    fn malformed_headers() {
        for text in ["3\n", "3 x\n", "0 3\n", "3 0\n", "3 3 3\n", "-1 3\n"] {
            assert!(
                matches!(Grid::parse(text), Err(MapLoadError::BadHeader(_))),
                "{text:?}"
            );
        }
    }

    #[test]
    fn wrong_token_count() {
        let err = Grid::parse("3 2\n1 0 0\n2 2\n").unwrap_err();
        assert!(matches!(
            err,
            MapLoadError::WrongTokenCount { line: 3, expected: 3, found: 2 }
        ));
    }

    #[test]
    fn non_numeric_token() {
        let err = Grid::parse("2 1\n1 z\n").unwrap_err();
        assert!(matches!(err, MapLoadError::BadToken { line: 2, .. }));
    }

    #[test]
    fn row_count_mismatch_too_few_and_too_many() {
        assert!(matches!(
            Grid::parse("2 2\n1 0\n").unwrap_err(),
            MapLoadError::RowCountMismatch { expected: 2, found: 1 }
        ));
        assert!(matches!(
            Grid::parse("2 1\n1 0\n0 0\n").unwrap_err(),
            MapLoadError::RowCountMismatch { expected: 1, found: 2 }
        ));
    }

    #[test]
    fn unknown_code_rejected() {
        let err = Grid::parse("2 1\n1 7\n").unwrap_err();
        assert!(matches!(err, MapLoadError::UnknownCellCode { column: 1, code: 7, .. }));
    }

    #[test]
    fn spawn_count_enforced() {
        assert!(matches!(Grid::parse("2 1\n0 0\n").unwrap_err(), MapLoadError::NoSpawn));
        assert!(matches!(
            Grid::parse("2 2\n1 0\n0 1\n").unwrap_err(),
            MapLoadError::MultipleSpawns { first: (0, 0), second: (1, 1) }
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let path = std::env::temp_dir().join("raymaze-definitely-missing.map");
        assert!(matches!(Grid::load(&path), Err(MapLoadError::Io { .. })));
    }
}
