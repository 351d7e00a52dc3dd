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


/// Dimensions of the character grid. Never smaller than 1×1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TerminalSize {
    pub cols: usize,
    pub rows: usize,
}

impl TerminalSize {
    /// Creates a size, raising either dimension to 1 if it is 0.
    pub fn new(cols: usize, rows: usize) -> Self {
        Self {
            cols: cols.max(1),
            rows: rows.max(1),
        }
    }

    /// Number of cells in the grid.
    pub fn area(&self) -> usize {
        self.cols * self.rows
    }

    /// Moves `position` inside these bounds.
    pub fn clamp_position(&self, position: CursorPosition) -> CursorPosition {
        CursorPosition::new(
            position.col.min(self.cols - 1),
            position.row.min(self.rows - 1),
        )
    }
}

impl Default for TerminalSize {
    fn default() -> Self {
        Self::new(80, 24)
    }
}

/// A 0-indexed (column, row) position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CursorPosition {
    pub col: usize,
    pub row: usize,
}

impl CursorPosition {
    pub fn new(col: usize, row: usize) -> Self {
        Self { col, row }
    }
}

impl From<CursorPosition> for (usize, usize) {
    fn from(position: CursorPosition) -> Self {
        (position.col, position.row)
    }
}
