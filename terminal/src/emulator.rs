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


use crate::buffer::{EraseMode, ScreenBuffer};
use crate::cell::{Cell, Color};
use crate::ice::IceColorFilter;
use crate::parser::{Action, ControlSequence, Parser};
use crate::types::{CursorPosition, TerminalSize};
use tracing::trace;

/// Settings for a [`TerminalEmulator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmulatorConfig {
    /// Grid width in characters
    pub columns: usize,
    /// Grid height in characters
    pub rows: usize,
    /// Treat blink as a bright background bit
    pub ice_colors: bool,
}

impl EmulatorConfig {
    pub fn new(columns: usize, rows: usize) -> Self {
        EmulatorConfig {
            columns,
            rows,
            ..EmulatorConfig::default()
        }
    }

    pub fn with_ice_colors(mut self, ice_colors: bool) -> Self {
        self.ice_colors = ice_colors;
        self
    }
}

impl Default for EmulatorConfig {
    fn default() -> Self {
        EmulatorConfig {
            columns: 80,
            rows: 24,
            ice_colors: true,
        }
    }
}

/// An immutable copy of the screen handed to renderers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenSnapshot {
    pub size: TerminalSize,
    pub cursor: CursorPosition,
    pub cells: Vec<Cell>,
}

impl ScreenSnapshot {
    /// The cell at (`col`, `row`), or `None` outside the grid.
    pub fn cell(&self, col: usize, row: usize) -> Option<&Cell> {
        if col < self.size.cols && row < self.size.rows {
            self.cells.get(row * self.size.cols + col)
        } else {
            None
        }
    }

    /// Every row as a string, top to bottom.
    pub fn lines(&self) -> Vec<String> {
        self.cells
            .chunks(self.size.cols)
            .map(|row| row.iter().map(|cell| cell.character).collect())
            .collect()
    }
}

impl Default for ScreenSnapshot {
    fn default() -> Self {
        let size = TerminalSize::default();
        ScreenSnapshot {
            size,
            cursor: CursorPosition::default(),
            cells: vec![Cell::blank(); size.area()],
        }
    }
}

///
/// ANSI screen emulator.
///
/// Text is fed in arbitrary chunks; escape sequences may be split anywhere. Each chunk
/// passes through the [`IceColorFilter`] (when enabled), then through the [`Parser`], and
/// the resulting actions are applied to the [`ScreenBuffer`].
///
/// Unsupported sequences are ignored, so feeding never fails.
///
#[derive(Debug, Clone)]
pub struct TerminalEmulator {
    buffer: ScreenBuffer,
    parser: Parser,
    filter: IceColorFilter,
    ice_colors: bool,
    /// Attributes applied to the next printed character
    pen: Cell,
    bell_count: u64,
}

impl TerminalEmulator {
    pub fn new(config: EmulatorConfig) -> Self {
        TerminalEmulator {
            buffer: ScreenBuffer::new_with_size(config.columns, config.rows),
            parser: Parser::new(),
            filter: IceColorFilter::new(),
            ice_colors: config.ice_colors,
            pen: Cell::blank(),
            bell_count: 0,
        }
    }

    /// Interprets a chunk of decoded text.
    pub fn feed(&mut self, text: &str) {
        if self.ice_colors {
            let filtered = self.filter.filter(text);
            self.interpret(&filtered);
        } else {
            self.interpret(text);
        }
    }

    fn interpret(&mut self, text: &str) {
        for character in text.chars() {
            match self.parser.next(character) {
                Some(Action::Print(character)) => self.buffer.put(self.pen.with_character(character)),
                Some(Action::Control(character)) => self.control(character),
                Some(Action::Escape(character)) => self.escape(character),
                Some(Action::Csi(sequence)) => self.csi(&sequence),
                None => {}
            }
        }
    }

    fn control(&mut self, character: char) {
        match character {
            '\r' => self.buffer.carriage_return(),
            '\n' | '\u{0b}' | '\u{0c}' => self.buffer.line_feed(),
            '\u{08}' => self.buffer.backspace(),
            '\t' => self.buffer.tab(),
            '\u{07}' => self.bell_count += 1,
            _ => {}
        }
    }

    fn escape(&mut self, character: char) {
        match character {
            '7' => self.buffer.save_cursor(),
            '8' => self.buffer.restore_cursor(),
            'c' => self.reset(),
            'D' => self.buffer.line_feed(),
            'E' => {
                self.buffer.carriage_return();
                self.buffer.line_feed();
            }
            'M' => self.buffer.reverse_line_feed(),
            _ => trace!("Ignoring escape sequence ESC {:?}", character),
        }
    }

    fn csi(&mut self, sequence: &ControlSequence) {
        if sequence.private || sequence.intermediate {
            trace!("Ignoring private control sequence {:?}", sequence);
            return;
        }
        let cursor = self.buffer.cursor_position();
        let count = isize::try_from(sequence.count(0)).unwrap_or(isize::MAX);
        match sequence.final_char {
            'm' => self.select_graphic_rendition(sequence),
            'H' | 'f' => {
                let row = usize::from(sequence.count(0)) - 1;
                let col = usize::from(sequence.count(1)) - 1;
                self.buffer.set_cursor_position(col, row);
            }
            'A' => {
                self.buffer.move_cursor(0, -count);
            }
            'B' => {
                self.buffer.move_cursor(0, count);
            }
            'C' => {
                self.buffer.move_cursor(count, 0);
            }
            'D' => {
                self.buffer.move_cursor(-count, 0);
            }
            'E' => {
                self.buffer.move_cursor(0, count);
                self.buffer.carriage_return();
            }
            'F' => {
                self.buffer.move_cursor(0, -count);
                self.buffer.carriage_return();
            }
            'G' => {
                let col = usize::from(sequence.count(0)) - 1;
                self.buffer.set_cursor_position(col, cursor.row);
            }
            'd' => {
                let row = usize::from(sequence.count(0)) - 1;
                self.buffer.set_cursor_position(cursor.col, row);
            }
            's' => self.buffer.save_cursor(),
            'u' => self.buffer.restore_cursor(),
            'J' => match sequence.params.first().copied().flatten() {
                Some(0) => self.buffer.erase_display(EraseMode::ToEnd),
                Some(1) => self.buffer.erase_display(EraseMode::ToStart),
                None | Some(2 | 3) => self.buffer.erase_display(EraseMode::All),
                Some(mode) => trace!("Ignoring erase display mode {}", mode),
            },
            'K' => match sequence.param(0, 0) {
                0 => self.buffer.erase_line(EraseMode::ToEnd),
                1 => self.buffer.erase_line(EraseMode::ToStart),
                2 => self.buffer.erase_line(EraseMode::All),
                mode => trace!("Ignoring erase line mode {}", mode),
            },
            other => trace!("Ignoring control sequence with final {:?}", other),
        }
    }

    fn select_graphic_rendition(&mut self, sequence: &ControlSequence) {
        if sequence.params.is_empty() {
            self.reset_pen();
            return;
        }
        for param in sequence.params.iter().copied() {
            match param.unwrap_or(0) {
                0 => self.reset_pen(),
                1 => self.pen.bold = true,
                22 => self.pen.bold = false,
                7 => self.pen.reverse = true,
                27 => self.pen.reverse = false,
                code @ 30..=37 => self.pen.foreground = color(code - 30),
                39 => self.pen.foreground = Cell::DEFAULT_FOREGROUND,
                code @ 40..=47 => self.pen.background = color(code - 40),
                49 => self.pen.background = Cell::DEFAULT_BACKGROUND,
                code @ 90..=97 => self.pen.foreground = color(code - 90).brighten(),
                code @ 100..=107 => self.pen.background = color(code - 100).brighten(),
                _ => {}
            }
        }
    }

    fn reset_pen(&mut self) {
        self.pen = Cell::blank();
    }

    fn reset(&mut self) {
        self.buffer.clear();
        self.parser.clear();
        self.filter.reset();
        self.reset_pen();
    }

    // ===== Queries =====

    /// Every row as a string of cell characters.
    pub fn get_display(&self) -> Vec<String> {
        self.buffer.lines()
    }

    /// One row as a string; empty when `row` is outside the grid.
    pub fn get_line(&self, row: usize) -> String {
        self.buffer.line(row)
    }

    /// The cursor as (column, row), 0-indexed.
    pub fn get_cursor_position(&self) -> (usize, usize) {
        self.buffer.cursor_position().into()
    }

    pub fn cell(&self, col: usize, row: usize) -> Option<Cell> {
        self.buffer.cell(col, row).copied()
    }

    pub fn columns(&self) -> usize {
        self.buffer.width()
    }

    pub fn rows(&self) -> usize {
        self.buffer.height()
    }

    /// Number of BEL characters received.
    pub fn bell_count(&self) -> u64 {
        self.bell_count
    }

    pub fn ice_colors(&self) -> bool {
        self.ice_colors
    }

    /// Turns iCE color rewriting on or off. A held back sequence is released unchanged.
    pub fn set_ice_colors(&mut self, enabled: bool) {
        if self.ice_colors && !enabled {
            let pending = self.filter.pending().to_string();
            self.filter.reset();
            self.interpret(&pending);
        }
        self.ice_colors = enabled;
    }

    /// The attributes applied to the next printed character.
    pub fn pen(&self) -> Cell {
        self.pen
    }

    pub fn buffer(&self) -> &ScreenBuffer {
        &self.buffer
    }

    pub fn snapshot(&self) -> ScreenSnapshot {
        ScreenSnapshot {
            size: self.buffer.size(),
            cursor: self.buffer.cursor_position(),
            cells: self.buffer.cells().to_vec(),
        }
    }

    // ===== Mutation =====

    /// Changes the grid size, keeping the top-left content. Dimensions below 1 become 1.
    pub fn resize(&mut self, columns: usize, rows: usize) {
        self.buffer.resize(columns, rows);
    }

    /// Blanks the screen and resets cursor, pen, parser and filter. The size is kept.
    pub fn clear(&mut self) {
        self.reset();
    }
}

impl Default for TerminalEmulator {
    fn default() -> Self {
        TerminalEmulator::new(EmulatorConfig::default())
    }
}

fn color(index: u16) -> Color {
    Color::new(index as u8)
}
