/// Surface: the character grid a frame is drawn into.
///
/// One glyph per cell, row-major. The terminal renderer copies it into its
/// own colored frame buffer; tests read it back with `get` / `row_string`.

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Surface {
    width: usize,
    height: usize,
    glyphs: Vec<char>,
}

impl Surface {
    pub fn new(width: usize, height: usize) -> Self {
        Surface { width, height, glyphs: vec![' '; width * height] }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Resize, clearing contents only when dimensions change.
    pub fn resize(&mut self, width: usize, height: usize) {
        if self.width != width || self.height != height {
            self.width = width;
            self.height = height;
            self.glyphs = vec![' '; width * height];
        }
    }

    #[inline]
    pub fn set(&mut self, col: usize, row: usize, glyph: char) {
        if col < self.width && row < self.height {
            self.glyphs[row * self.width + col] = glyph;
        }
    }

    #[inline]
    pub fn get(&self, col: usize, row: usize) -> Option<char> {
        if col < self.width && row < self.height {
            Some(self.glyphs[row * self.width + col])
        } else {
            None
        }
    }

    /// Fill rows `[from, to)` of one column. Out-of-range rows are skipped.
    pub fn fill_column(&mut self, col: usize, from: usize, to: usize, glyph: char) {
        for row in from..to.min(self.height) {
            self.set(col, row, glyph);
        }
    }

    /// Every cell as `(glyph, column, row)`, row-major.
    pub fn writes(&self) -> impl Iterator<Item = (char, usize, usize)> + '_ {
        self.glyphs
            .iter()
            .enumerate()
            .map(move |(i, &g)| (g, i % self.width, i / self.width))
    }

    /// One row as a string.
    #[cfg(test)]
    pub fn row_string(&self, row: usize) -> String {
        if row >= self.height {
            return String::new();
        }
        self.glyphs[row * self.width..(row + 1) * self.width].iter().collect()
    }

    /// One column top-to-bottom as a string.
    #[cfg(test)]
    pub fn column_string(&self, col: usize) -> String {
        (0..self.height).filter_map(|row| self.get(col, row)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_get_and_bounds() {
        let mut s = Surface::new(3, 2);
        s.set(2, 1, '#');
        s.set(3, 0, '!'); // ignored
        assert_eq!(s.get(2, 1), Some('#'));
        assert_eq!(s.get(3, 0), None);
        assert_eq!(s.row_string(1), "  #");
    }

    #[test]
    fn fill_column_clips() {
        let mut s = Surface::new(2, 4);
        s.fill_column(1, 2, 10, 'x');
        assert_eq!(s.column_string(1), "  xx");
    }

    #[test]
    fn writes_cover_every_cell() {
        let mut s = Surface::new(4, 3);
        s.set(1, 2, 'a');
        let all: Vec<_> = s.writes().collect();
        assert_eq!(all.len(), 12);
        assert!(all.contains(&('a', 1, 2)));
    }

    #[test]
    fn resize_clears_only_on_change() {
        let mut s = Surface::new(2, 2);
        s.set(0, 0, 'q');
        s.resize(2, 2);
        assert_eq!(s.get(0, 0), Some('q'));
        s.resize(3, 2);
        assert_eq!(s.get(0, 0), Some(' '));
    }
}
