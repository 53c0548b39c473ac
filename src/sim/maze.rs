/// Procedural maze generator: randomized depth-first backtracker.
///
/// ## Lattice
///
/// `cols × rows` logical cells, each a 4-bit passage mask (N/S/E/W). A cell
/// with a zero mask has not been visited yet. Carving sets the bit toward the
/// neighbour on the current cell and the opposite bit on the neighbour, so
/// the passage graph is a spanning tree: connected, acyclic, exactly
/// `cols·rows − 1` passages.
///
/// The walk uses an explicit stack of `(cell, shuffled directions, next)`
/// frames instead of recursion, so large mazes do not exhaust the call stack.
///
/// ## Grid encoding
///
/// Logical cell `(j, i)` lands on grid cell `(2j+1, 2i+1)`; the cells
/// between them are passages or walls. The grid is `(2·cols+1)×(2·rows+1)`,
/// bordered with walls. Spawn is logical `(0,0)`, the flag is logical
/// `(cols−1, rows−1)`. On a 1×1 lattice the spawn wins and there is no flag.

use std::path::Path;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::domain::grid::Grid;
use crate::error::{MapLoadError, MazeError};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Dir {
    N,
    S,
    E,
    W,
}

impl Dir {
    pub const ALL: [Dir; 4] = [Dir::N, Dir::S, Dir::E, Dir::W];

    pub fn bit(self) -> u8 {
        match self {
            Dir::N => 1,
            Dir::S => 2,
            Dir::E => 4,
            Dir::W => 8,
        }
    }

    pub fn opposite(self) -> Dir {
        match self {
            Dir::N => Dir::S,
            Dir::S => Dir::N,
            Dir::E => Dir::W,
            Dir::W => Dir::E,
        }
    }

    fn offset(self) -> (i64, i64) {
        match self {
            Dir::N => (0, -1),
            Dir::S => (0, 1),
            Dir::E => (1, 0),
            Dir::W => (-1, 0),
        }
    }
}

/// One pending cell of the depth-first walk.
struct Frame {
    cell: (usize, usize),
    dirs: [Dir; 4],
    next: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Maze {
    cols: usize,
    rows: usize,
    /// `cells[row][col]` passage masks
    cells: Vec<Vec<u8>>,
}

impl Maze {
    /// Carve a maze with the given random source.
    pub fn generate<R: Rng + ?Sized>(cols: usize, rows: usize, rng: &mut R) -> Result<Maze, MazeError> {
        if cols == 0 || rows == 0 {
            return Err(MazeError::InvalidDimensions { cols, rows });
        }

        let mut maze = Maze { cols, rows, cells: vec![vec![0; cols]; rows] };
        maze.carve_from((0, 0), rng);

        tracing::info!(cols, rows, passages = maze.passage_count(), "maze generated");
        Ok(maze)
    }

    /// Deterministic maze for a given seed.
    pub fn generate_seeded(cols: usize, rows: usize, seed: u64) -> Result<Maze, MazeError> {
        let mut rng = StdRng::seed_from_u64(seed);
        Self::generate(cols, rows, &mut rng)
    }

    fn carve_from<R: Rng + ?Sized>(&mut self, start: (usize, usize), rng: &mut R) {
        let mut stack = vec![Frame { cell: start, dirs: shuffled(rng), next: 0 }];

        while let Some(top) = stack.last_mut() {
            if top.next == top.dirs.len() {
                stack.pop();
                continue;
            }
            let dir = top.dirs[top.next];
            top.next += 1;
            let (cx, cy) = top.cell;

            let Some((nx, ny)) = self.neighbour(cx, cy, dir) else { continue };
            if self.cells[ny][nx] != 0 {
                continue;
            }

            self.cells[cy][cx] |= dir.bit();
            self.cells[ny][nx] |= dir.opposite().bit();
            stack.push(Frame { cell: (nx, ny), dirs: shuffled(rng), next: 0 });
        }
    }

    fn neighbour(&self, x: usize, y: usize, dir: Dir) -> Option<(usize, usize)> {
        let (dx, dy) = dir.offset();
        let nx = x as i64 + dx;
        let ny = y as i64 + dy;
        if nx < 0 || ny < 0 || nx >= self.cols as i64 || ny >= self.rows as i64 {
            return None;
        }
        Some((nx as usize, ny as usize))
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Passage mask of logical cell `(col, row)`.
    pub fn mask(&self, col: usize, row: usize) -> u8 {
        self.cells[row][col]
    }

    pub fn has_passage(&self, col: usize, row: usize, dir: Dir) -> bool {
        self.mask(col, row) & dir.bit() != 0
    }

    /// Number of carved passages (each counted once).
    pub fn passage_count(&self) -> usize {
        let mut count = 0;
        for row in 0..self.rows {
            for col in 0..self.cols {
                if self.has_passage(col, row, Dir::E) { count += 1; }
                if self.has_passage(col, row, Dir::S) { count += 1; }
            }
        }
        count
    }

    /// Serialize in the grid file format.
    pub fn to_grid_text(&self) -> String {
        let mut out = format!("{} {}\n", self.cols * 2 + 1, self.rows * 2 + 1);

        for i in 0..self.rows {
            // north edge
            for j in 0..self.cols {
                out.push_str(if self.has_passage(j, i, Dir::N) { "2 0 " } else { "2 2 " });
            }
            out.push_str("2\n");

            // west edge + cell
            for j in 0..self.cols {
                let open_west = self.has_passage(j, i, Dir::W);
                let pair = if i == 0 && j == 0 {
                    "2 1 "
                } else if i == self.rows - 1 && j == self.cols - 1 {
                    if open_west { "0 3 " } else { "2 3 " }
                } else if open_west {
                    "0 0 "
                } else {
                    "2 0 "
                };
                out.push_str(pair);
            }
            out.push_str("2\n");
        }

        // bottom edge
        for _ in 0..self.cols {
            out.push_str("2 2 ");
        }
        out.push_str("2\n");

        out
    }

    /// Serialize and parse back into an occupancy grid.
    pub fn to_grid(&self) -> Result<Grid, MapLoadError> {
        Grid::parse(&self.to_grid_text())
    }

    /// Write the grid file, creating parent directories as needed.
    pub fn write_to_file(&self, path: &Path) -> Result<(), MazeError> {
        let io_err = |source| MazeError::Io { path: path.to_path_buf(), source };
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(io_err)?;
            }
        }
        std::fs::write(path, self.to_grid_text()).map_err(io_err)?;
        tracing::info!(path = %path.display(), "maze written");
        Ok(())
    }
}

fn shuffled<R: Rng + ?Sized>(rng: &mut R) -> [Dir; 4] {
    let mut dirs = Dir::ALL;
    dirs.shuffle(rng);
    dirs
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cell::CellKind;

    /// Union-find over logical cells; `union` returns false when the two
    /// cells were already connected (i.e. the edge closes a cycle).
    struct Dsu {
        parent: Vec<usize>,
    }

    impl Dsu {
        fn new(n: usize) -> Self {
            Dsu { parent: (0..n).collect() }
        }
        fn find(&mut self, x: usize) -> usize {
            let mut root = x;
            while self.parent[root] != root { root = self.parent[root]; }
            let mut cur = x;
            while self.parent[cur] != root {
                let next = self.parent[cur];
                self.parent[cur] = root;
                cur = next;
            }
            root
        }
        fn union(&mut self, a: usize, b: usize) -> bool {
            let (ra, rb) = (self.find(a), self.find(b));
            if ra == rb { return false; }
            self.parent[ra] = rb;
            true
        }
    }

    fn assert_spanning_tree(m: &Maze) {
        let n = m.cols() * m.rows();
        let idx = |c: usize, r: usize| r * m.cols() + c;
        let mut dsu = Dsu::new(n);

        for r in 0..m.rows() {
            for c in 0..m.cols() {
                if m.has_passage(c, r, Dir::E) {
                    assert!(c + 1 < m.cols());
                    assert!(m.has_passage(c + 1, r, Dir::W), "E/W mismatch at ({c},{r})");
                    assert!(dsu.union(idx(c, r), idx(c + 1, r)), "cycle at ({c},{r})");
                }
                if m.has_passage(c, r, Dir::S) {
                    assert!(r + 1 < m.rows());
                    assert!(m.has_passage(c, r + 1, Dir::N), "S/N mismatch at ({c},{r})");
                    assert!(dsu.union(idx(c, r), idx(c, r + 1)), "cycle at ({c},{r})");
                }
            }
        }

        assert_eq!(m.passage_count(), n - 1);
        let root = dsu.find(0);
        for i in 0..n {
            assert_eq!(dsu.find(i), root, "cell {i} unreachable");
        }
    }

    #[test]
    fn perfect_maze_for_many_sizes_and_seeds() {
        for (cols, rows) in [(1, 1), (1, 7), (7, 1), (2, 2), (5, 3), (10, 10), (17, 9)] {
            for seed in 0..8 {
                let m = Maze::generate_seeded(cols, rows, seed).unwrap();
                assert_spanning_tree(&m);
            }
        }
    }

    #[test]
    fn large_maze_does_not_overflow_stack() {
        let m = Maze::generate_seeded(300, 300, 99).unwrap();
        assert_spanning_tree(&m);
    }

    #[test]
    fn zero_dimensions_rejected() {
        assert!(matches!(
            Maze::generate_seeded(0, 5, 1),
            Err(MazeError::InvalidDimensions { cols: 0, rows: 5 })
        ));
        assert!(matches!(
            Maze::generate_seeded(5, 0, 1),
            Err(MazeError::InvalidDimensions { cols: 5, rows: 0 })
        ));
    }

    #[test]
    fn same_seed_same_maze() {
        assert_eq!(
            Maze::generate_seeded(8, 6, 1234).unwrap(),
            Maze::generate_seeded(8, 6, 1234).unwrap()
        );
    }

    #[test]
    fn two_by_one_is_exact() {
        let m = Maze::generate_seeded(2, 1, 5).unwrap();
        assert_eq!(m.to_grid_text(), "5 3\n2 2 2 2 2\n2 1 0 3 2\n2 2 2 2 2\n");
    }

    #[test]
    fn one_by_one_has_spawn_and_no_flag() {
        let m = Maze::generate_seeded(1, 1, 0).unwrap();
        assert_eq!(m.to_grid_text(), "3 3\n2 2 2\n2 1 2\n2 2 2\n");
    }

    #[test]
    fn header_and_line_shapes() {
        let m = Maze::generate_seeded(4, 3, 42).unwrap();
        let text = m.to_grid_text();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "9 7");
        assert_eq!(lines.len(), 1 + 7);
        for line in &lines[1..] {
            assert_eq!(line.split(' ').count(), 9);
            assert!(line.ends_with(" 2"));
        }
        assert!(text.ends_with("2 2 2 2 2 2 2 2 2\n"));
    }

    #[test]
    fn round_trip_matches_passage_bits() {
        for seed in 0..5 {
            let m = Maze::generate_seeded(6, 4, seed).unwrap();
            let text = m.to_grid_text();

            let body: Vec<&str> = text.lines().skip(1).flat_map(|l| l.split(' ')).collect();
            assert_eq!(body.iter().filter(|t| **t == "1").count(), 1);
            assert_eq!(body.iter().filter(|t| **t == "3").count(), 1);

            let g = m.to_grid().unwrap();
            assert_eq!((g.width(), g.height()), (13, 9));
            assert_eq!(g.spawn(), (1, 1));
            assert_eq!(g.cell(11, 7), Some(CellKind::Flag));

            for i in 0..m.rows() {
                for j in 0..m.cols() {
                    let (gx, gy) = (2 * j as i64 + 1, 2 * i as i64 + 1);
                    assert_ne!(g.cell(gx, gy), Some(CellKind::Wall));
                    let north = if m.has_passage(j, i, Dir::N) { CellKind::Empty } else { CellKind::Wall };
                    assert_eq!(g.cell(gx, gy - 1), Some(north), "north of ({j},{i})");
                    let west = if m.has_passage(j, i, Dir::W) { CellKind::Empty } else { CellKind::Wall };
                    assert_eq!(g.cell(gx - 1, gy), Some(west), "west of ({j},{i})");
                    // Lattice corners are always wall
                    assert_eq!(g.cell(gx - 1, gy - 1), Some(CellKind::Wall));
                }
            }

            // East and south borders
            for y in 0..g.height() as i64 {
                assert_eq!(g.cell(g.width() as i64 - 1, y), Some(CellKind::Wall));
            }
            for x in 0..g.width() as i64 {
                assert_eq!(g.cell(x, g.height() as i64 - 1), Some(CellKind::Wall));
            }
        }
    }

    #[test]
    fn write_creates_directories() {
        let dir = std::env::temp_dir()
            .join(format!("raymaze-maze-{}", std::process::id()))
            .join("nested");
        let path = dir.join("generated.map");
        let m = Maze::generate_seeded(3, 3, 3).unwrap();
        m.write_to_file(&path).unwrap();
        let loaded = Grid::load(&path).unwrap();
        assert_eq!(loaded, m.to_grid().unwrap());
        let _ = std::fs::remove_dir_all(dir.parent().unwrap());
    }
}
