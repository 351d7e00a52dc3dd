//
// Copyright 2017-2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//


use crate::cell::Cell;
use crate::types::{CursorPosition, TerminalSize};
use tracing::debug;

/// Which part of the screen an erase touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EraseMode {
    /// From the cursor to the end, cursor included.
    ToEnd,
    /// From the start to the cursor, cursor included.
    ToStart,
    /// Everything.
    All,
}

/// Virtual Screen Buffer
///
/// A row-major grid of [`Cell`]s with a cursor that always lies inside the grid. Writing at
/// the last column sets a pending wrap instead of moving off screen; the next printable
/// character then wraps to the start of the following line, scrolling when the cursor is
/// on the last row. Any explicit cursor movement cancels a pending wrap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenBuffer {
    /// Grid dimensions
    size: TerminalSize,
    /// Cells, `size.rows` rows of `size.cols` cells each
    cells: Vec<Cell>,
    /// Current cursor position (column, row) - 0-indexed
    cursor: CursorPosition,
    /// Position stored by `ESC 7` / `CSI s`
    saved_cursor: CursorPosition,
    /// The last write filled the right margin
    pending_wrap: bool,
}

impl ScreenBuffer {
    /// Creates a blank 80×24 screen.
    pub fn new() -> Self {
        Self::new_with_size(80, 24)
    }

    /// Creates a blank screen; dimensions below 1 become 1.
    pub fn new_with_size(cols: usize, rows: usize) -> Self {
        let size = TerminalSize::new(cols, rows);
        ScreenBuffer {
            size,
            cells: vec![Cell::blank(); size.area()],
            cursor: CursorPosition::default(),
            saved_cursor: CursorPosition::default(),
            pending_wrap: false,
        }
    }

    // ===== Size Management =====

    pub fn size(&self) -> TerminalSize {
        self.size
    }

    pub fn width(&self) -> usize {
        self.size.cols
    }

    pub fn height(&self) -> usize {
        self.size.rows
    }

    /// Resizes the grid, keeping the top-left content.
    ///
    /// New cells are blank, cells outside the new bounds are dropped. The cursor and the
    /// saved cursor are clamped into the new grid.
    pub fn resize(&mut self, cols: usize, rows: usize) {
        let size = TerminalSize::new(cols, rows);
        if size == self.size {
            return;
        }
        debug!(
            "Resizing screen from {}x{} to {}x{}",
            self.size.cols, self.size.rows, size.cols, size.rows
        );
        let mut cells = vec![Cell::blank(); size.area()];
        for row in 0..size.rows.min(self.size.rows) {
            let keep = size.cols.min(self.size.cols);
            let from = row * self.size.cols;
            let to = row * size.cols;
            cells[to..to + keep].copy_from_slice(&self.cells[from..from + keep]);
        }
        self.cells = cells;
        self.size = size;
        self.cursor = size.clamp_position(self.cursor);
        self.saved_cursor = size.clamp_position(self.saved_cursor);
        self.pending_wrap = false;
    }

    /// Blanks every cell and homes the cursor. Dimensions are unchanged.
    pub fn clear(&mut self) {
        self.cells.fill(Cell::blank());
        self.cursor = CursorPosition::default();
        self.saved_cursor = CursorPosition::default();
        self.pending_wrap = false;
    }

    // ===== Cell Access =====

    /// The cell at (`col`, `row`), or `None` outside the grid.
    pub fn cell(&self, col: usize, row: usize) -> Option<&Cell> {
        if col < self.size.cols && row < self.size.rows {
            self.cells.get(self.index(col, row))
        } else {
            None
        }
    }

    /// The cells of one row.
    pub fn row(&self, row: usize) -> Option<&[Cell]> {
        if row < self.size.rows {
            let start = row * self.size.cols;
            Some(&self.cells[start..start + self.size.cols])
        } else {
            None
        }
    }

    /// The characters of one row, trailing blanks included. Empty for rows outside the grid.
    pub fn line(&self, row: usize) -> String {
        self.row(row)
            .map(|cells| cells.iter().map(|cell| cell.character).collect())
            .unwrap_or_default()
    }

    /// Every row as a string, top to bottom.
    pub fn lines(&self) -> Vec<String> {
        (0..self.size.rows).map(|row| self.line(row)).collect()
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    fn index(&self, col: usize, row: usize) -> usize {
        row * self.size.cols + col
    }

    // ===== Cursor Management =====

    pub fn cursor_position(&self) -> CursorPosition {
        self.cursor
    }

    /// Sets the cursor position (clamped to the grid) and cancels a pending wrap.
    pub fn set_cursor_position(&mut self, col: usize, row: usize) {
        self.cursor = self.size.clamp_position(CursorPosition::new(col, row));
        self.pending_wrap = false;
    }

    /// Moves the cursor by a relative offset; the result is clamped to the grid.
    ///
    /// Negative values move left/up, positive values move right/down.
    pub fn move_cursor(&mut self, col: isize, row: isize) -> CursorPosition {
        let new_col = self.cursor.col.saturating_add_signed(col);
        let new_row = self.cursor.row.saturating_add_signed(row);
        self.set_cursor_position(new_col, new_row);
        self.cursor
    }

    pub fn save_cursor(&mut self) {
        self.saved_cursor = self.cursor;
    }

    pub fn restore_cursor(&mut self) {
        let saved = self.saved_cursor;
        self.set_cursor_position(saved.col, saved.row);
    }

    pub fn saved_cursor_position(&self) -> CursorPosition {
        self.saved_cursor
    }

    pub fn is_wrap_pending(&self) -> bool {
        self.pending_wrap
    }

    // ===== Writing =====

    /// Writes `cell` at the cursor and advances it, wrapping first if a wrap is pending.
    pub fn put(&mut self, cell: Cell) {
        if self.pending_wrap {
            self.pending_wrap = false;
            self.cursor.col = 0;
            self.line_feed();
        }
        let index = self.index(self.cursor.col, self.cursor.row);
        self.cells[index] = cell;
        if self.cursor.col + 1 >= self.size.cols {
            self.pending_wrap = true;
        } else {
            self.cursor.col += 1;
        }
    }

    /// Moves to column 0.
    pub fn carriage_return(&mut self) {
        self.cursor.col = 0;
        self.pending_wrap = false;
    }

    /// Moves down one row, scrolling the grid up when already on the last row.
    pub fn line_feed(&mut self) {
        self.pending_wrap = false;
        if self.cursor.row + 1 >= self.size.rows {
            self.scroll_up(1);
        } else {
            self.cursor.row += 1;
        }
    }

    /// Moves up one row, scrolling the grid down when already on the first row.
    pub fn reverse_line_feed(&mut self) {
        self.pending_wrap = false;
        if self.cursor.row == 0 {
            self.scroll_down(1);
        } else {
            self.cursor.row -= 1;
        }
    }

    /// Moves one column left, stopping at column 0.
    pub fn backspace(&mut self) {
        self.move_cursor(-1, 0);
    }

    /// Moves to the next multiple-of-8 tab stop, stopping at the last column.
    pub fn tab(&mut self) {
        let next = (self.cursor.col / 8 + 1) * 8;
        self.set_cursor_position(next, self.cursor.row);
    }

    /// Discards the top `count` rows and appends blank rows at the bottom.
    pub fn scroll_up(&mut self, count: usize) {
        let count = count.min(self.size.rows);
        let shift = count * self.size.cols;
        self.cells.rotate_left(shift);
        let len = self.cells.len();
        self.cells[len - shift..].fill(Cell::blank());
    }

    /// Discards the bottom `count` rows and inserts blank rows at the top.
    pub fn scroll_down(&mut self, count: usize) {
        let count = count.min(self.size.rows);
        let shift = count * self.size.cols;
        self.cells.rotate_right(shift);
        self.cells[..shift].fill(Cell::blank());
    }

    // ===== Erasing =====

    /// Blanks part of the screen with default attributes. The cursor does not move.
    pub fn erase_display(&mut self, mode: EraseMode) {
        let cursor = self.index(self.cursor.col, self.cursor.row);
        let range = match mode {
            EraseMode::ToEnd => cursor..self.cells.len(),
            EraseMode::ToStart => 0..cursor + 1,
            EraseMode::All => 0..self.cells.len(),
        };
        self.cells[range].fill(Cell::blank());
    }

    /// Blanks part of the cursor row with default attributes. The cursor does not move.
    pub fn erase_line(&mut self, mode: EraseMode) {
        let start = self.index(0, self.cursor.row);
        let cursor = start + self.cursor.col;
        let end = start + self.size.cols;
        let range = match mode {
            EraseMode::ToEnd => cursor..end,
            EraseMode::ToStart => start..cursor + 1,
            EraseMode::All => start..end,
        };
        self.cells[range].fill(Cell::blank());
    }
}

impl Default for ScreenBuffer {
    fn default() -> Self {
        Self::new()
    }
}
