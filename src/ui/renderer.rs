/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. The session draws the 3D view into a `Surface` sized to the terminal
///      minus the HUD row
///   2. Surface glyphs are coloured and copied into the `front` buffer, with
///      the HUD on the last row
///   3. Each cell is compared with the `back` buffer (previous frame) and
///      only changed cells are emitted, batched with `queue!`
///   4. Swap front/back
///
/// This eliminates flicker caused by full-screen redraws.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::shade::{GOAL_GLYPH, WALL_FAR, WALL_FULL, WALL_MID, WALL_NEAR};
use crate::sim::frame::FrameReport;
use crate::sim::session::Session;
use crate::sim::surface::Surface;

/// Rows reserved below the 3D view.
const HUD_ROWS: usize = 1;

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Cell {
    /// Explicit dark background for every cell. Using the same RGB for
    /// `Clear(ClearType::All)` and each cell keeps inter-row gaps invisible
    /// on VTE-based terminals.
    const BASE_BG: Color = Color::Rgb { r: 22, g: 22, b: 35 };

    const BLANK: Cell = Cell { ch: ' ', fg: Color::White, bg: Cell::BASE_BG };

    /// Sentinel used to invalidate the back buffer so every cell is diff'd.
    const INVALID: Cell = Cell { ch: '?', fg: Color::Magenta, bg: Color::Magenta };

    fn glyph(ch: char) -> Cell {
        Cell { ch, fg: glyph_color(ch), bg: Cell::BASE_BG }
    }
}

/// Foreground for a view glyph: walls in grey steps, goal green, floor dim.
fn glyph_color(ch: char) -> Color {
    match ch {
        c if c == WALL_FULL => Color::Rgb { r: 230, g: 230, b: 230 },
        c if c == WALL_NEAR => Color::Rgb { r: 190, g: 190, b: 195 },
        c if c == WALL_MID => Color::Rgb { r: 140, g: 140, b: 150 },
        c if c == WALL_FAR => Color::Rgb { r: 95, g: 95, b: 110 },
        c if c == GOAL_GLYPH => Color::Rgb { r: 80, g: 220, b: 100 },
        '#' => Color::Rgb { r: 120, g: 105, b: 85 },
        'x' => Color::Rgb { r: 100, g: 90, b: 75 },
        '-' => Color::Rgb { r: 80, g: 72, b: 62 },
        '.' => Color::Rgb { r: 60, g: 55, b: 50 },
        _ => Color::White,
    }
}

// ── FrameBuffer: a 2D grid of Cells ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer { width: w, height: h, cells: vec![Cell::BLANK; w * h] }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![Cell::BLANK; w * h];
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Cell::BLANK
        }
    }

    /// Write a string at (x, y). Each char occupies 1 column.
    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color) {
        for (i, ch) in s.chars().enumerate() {
            if x + i >= self.width { break; }
            self.set(x + i, y, Cell { ch, fg, bg: Cell::BASE_BG });
        }
    }

    /// Copy a rendered view into the top rows.
    fn blit(&mut self, surface: &Surface) {
        for (ch, x, y) in surface.writes() {
            self.set(x, y, Cell::glyph(ch));
        }
    }
}

/// One-line status text.
fn hud_text(session: &Session) -> String {
    let pos = session.camera().position;
    format!(
        " {}  {:6.1}s  x {:5.2}  y {:5.2}   [wasd] move  [jl] turn  [ik] look  [q] quit",
        session.name(),
        session.elapsed_clear_time(),
        pos.x,
        pos.y,
    )
}

// ── Renderer ──

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    view: Surface,
    term_w: usize,
    term_h: usize,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            view: Surface::new(0, 0),
            term_w: 0,
            term_h: 0,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            SetBackgroundColor(Cell::BASE_BG),
            Clear(ClearType::All)
        )?;

        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.resize(tw as usize, th as usize);
        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(
            self.writer,
            ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    fn resize(&mut self, w: usize, h: usize) {
        self.term_w = w;
        self.term_h = h;
        self.front.resize(w, h);
        self.back.resize(w, h);
        self.view.resize(w, h.saturating_sub(HUD_ROWS));
        // Force full repaint: back differs from front everywhere.
        self.back.cells.fill(Cell::INVALID);
    }

    pub fn render(&mut self, session: &Session) -> io::Result<FrameReport> {
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.resize(tw as usize, th as usize);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
        }

        let report = self.compose(session);

        self.flush_diff()?;
        std::mem::swap(&mut self.front, &mut self.back);

        Ok(report)
    }

    fn compose(&mut self, session: &Session) -> FrameReport {
        self.front.clear();
        let report = session.render_into(&mut self.view);
        self.front.blit(&self.view);

        if self.term_h >= HUD_ROWS {
            let hud = hud_text(session);
            self.front.put_str(0, self.term_h - HUD_ROWS, &hud, Color::Rgb { r: 200, g: 200, b: 120 });
        }
        report
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = Cell::BASE_BG;
        let mut need_move = true;
        let mut last_x: usize = 0;
        let mut last_y: usize = 0;

        // Explicit base colors; ResetColor would fall back to the terminal default.
        queue!(self.writer,
            SetForegroundColor(Color::White),
            SetBackgroundColor(Cell::BASE_BG),
        )?;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let cell = self.front.get(x, y);
                if cell == self.back.get(x, y) {
                    need_move = true;
                    continue;
                }

                if need_move || x != last_x + 1 || y != last_y {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                    need_move = false;
                }

                if cell.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = cell.fg;
                }
                if cell.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    last_bg = cell.bg;
                }

                queue!(self.writer, Print(cell.ch))?;
                last_x = x;
                last_y = y;
            }
        }

        self.writer.flush()
    }
}
