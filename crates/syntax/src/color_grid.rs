// Chunk: docs/chunks/color_grid - Per-character color annotations parallel to the buffer

//! The color grid: one `ColorId` per buffer character.
//!
//! Row `i` of the grid has exactly as many cells as line `i` of the buffer
//! once an edit completes. The splice methods mirror the raw `LineBuffer`
//! mutations one-for-one so the editing layer can keep the shape aligned
//! before the highlighter recolors anything.

/// Opaque identifier of a display color bucket. Resolved through a
/// [`SyntaxTheme`](crate::SyntaxTheme).
pub type ColorId = i16;

/// Cell value meaning "no color resolved, use the default style".
pub const UNRESOLVED: ColorId = -1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorGrid {
    rows: Vec<Vec<ColorId>>,
}

impl ColorGrid {
    /// Creates an unresolved grid shaped like `text` split on `\n`.
    pub fn for_text(text: &str) -> Self {
        Self::with_shape(text.split('\n').map(|l| l.chars().count()))
    }

    /// Creates an unresolved grid with the given row lengths. An empty
    /// iterator yields a single empty row, matching an empty buffer.
    pub fn with_shape(lens: impl IntoIterator<Item = usize>) -> Self {
        let mut rows: Vec<Vec<ColorId>> = lens.into_iter().map(|n| vec![UNRESOLVED; n]).collect();
        if rows.is_empty() {
            rows.push(Vec::new());
        }
        Self { rows }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn row(&self, row: usize) -> &[ColorId] {
        self.rows.get(row).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn row_len(&self, row: usize) -> usize {
        self.rows.get(row).map_or(0, Vec::len)
    }

    /// Returns the color at (row, col), or `UNRESOLVED` when out of range.
    pub fn get(&self, row: usize, col: usize) -> ColorId {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .copied()
            .unwrap_or(UNRESOLVED)
    }

    /// Sets one cell. Out-of-range writes are ignored.
    pub fn set(&mut self, row: usize, col: usize, id: ColorId) {
        if let Some(cell) = self.rows.get_mut(row).and_then(|r| r.get_mut(col)) {
            *cell = id;
        }
    }

    /// Returns the row lengths.
    pub fn shape(&self) -> Vec<usize> {
        self.rows.iter().map(Vec::len).collect()
    }

    /// Returns true if the row lengths equal `lens`.
    pub fn matches_shape<I>(&self, lens: I) -> bool
    where
        I: IntoIterator<Item = usize>,
    {
        let mut rows = self.rows.iter();
        for len in lens {
            match rows.next() {
                Some(r) if r.len() == len => {}
                _ => return false,
            }
        }
        rows.next().is_none()
    }

    // ==================== Splices ====================

    /// Mirrors `LineBuffer::insert_char`: a new unresolved cell at (row, col).
    pub fn insert_cell(&mut self, row: usize, col: usize) {
        if let Some(r) = self.rows.get_mut(row) {
            let col = col.min(r.len());
            r.insert(col, UNRESOLVED);
        }
    }

    /// Mirrors `LineBuffer::remove_char`.
    pub fn remove_cell(&mut self, row: usize, col: usize) {
        if let Some(r) = self.rows.get_mut(row) {
            if col < r.len() {
                r.remove(col);
            }
        }
    }

    /// Mirrors `LineBuffer::split_line`.
    pub fn split_row(&mut self, row: usize, col: usize) {
        if let Some(r) = self.rows.get_mut(row) {
            let col = col.min(r.len());
            let tail = r.split_off(col);
            self.rows.insert(row + 1, tail);
        }
    }

    /// Mirrors `LineBuffer::join_line`: row `row` is appended to `row - 1`.
    pub fn join_row(&mut self, row: usize) {
        if row == 0 || row >= self.rows.len() {
            return;
        }
        let tail = self.rows.remove(row);
        self.rows[row - 1].extend(tail);
    }

    /// Mirrors `LineBuffer::insert_line`.
    pub fn insert_row(&mut self, row: usize, len: usize) {
        let row = row.min(self.rows.len());
        self.rows.insert(row, vec![UNRESOLVED; len]);
    }

    /// Mirrors `LineBuffer::remove_line`, including the single-row case.
    pub fn remove_row(&mut self, row: usize) {
        if row >= self.rows.len() {
            return;
        }
        if self.rows.len() == 1 {
            self.rows[0].clear();
        } else {
            self.rows.remove(row);
        }
    }
}

impl Default for ColorGrid {
    fn default() -> Self {
        Self::with_shape(std::iter::empty())
    }
}
