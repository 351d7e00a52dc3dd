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


/// A 16 color palette index. 0–7 are the normal ANSI colors, 8–15 their bright variants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Color(u8);

impl Color {
    pub const BLACK: Color = Color(0);
    pub const RED: Color = Color(1);
    pub const GREEN: Color = Color(2);
    pub const YELLOW: Color = Color(3);
    pub const BLUE: Color = Color(4);
    pub const MAGENTA: Color = Color(5);
    pub const CYAN: Color = Color(6);
    pub const WHITE: Color = Color(7);
    pub const BRIGHT_BLACK: Color = Color(8);
    pub const BRIGHT_RED: Color = Color(9);
    pub const BRIGHT_GREEN: Color = Color(10);
    pub const BRIGHT_YELLOW: Color = Color(11);
    pub const BRIGHT_BLUE: Color = Color(12);
    pub const BRIGHT_MAGENTA: Color = Color(13);
    pub const BRIGHT_CYAN: Color = Color(14);
    pub const BRIGHT_WHITE: Color = Color(15);

    /// Creates a color from a palette index; only the low four bits are kept.
    pub const fn new(index: u8) -> Color {
        Color(index & 0x0F)
    }

    /// The palette index, 0–15.
    pub const fn index(self) -> u8 {
        self.0
    }

    pub const fn is_bright(self) -> bool {
        self.0 >= 8
    }

    /// The high intensity variant of a normal color. Bright colors are returned unchanged.
    pub const fn brighten(self) -> Color {
        Color(self.0 | 0x08)
    }
}

impl From<Color> for u8 {
    fn from(color: Color) -> Self {
        color.index()
    }
}

///
/// A single character cell of the screen.
///
/// Colors are stored as written by SGR. Bold brightening and reverse video are applied on
/// read through [`Cell::effective_foreground`] and [`Cell::effective_colors`].
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    pub character: char,
    pub foreground: Color,
    pub background: Color,
    pub bold: bool,
    pub reverse: bool,
}

impl Cell {
    /// The default foreground, light grey.
    pub const DEFAULT_FOREGROUND: Color = Color::WHITE;
    /// The default background, black.
    pub const DEFAULT_BACKGROUND: Color = Color::BLACK;

    /// A blank cell with default attributes.
    pub const fn blank() -> Cell {
        Cell {
            character: ' ',
            foreground: Self::DEFAULT_FOREGROUND,
            background: Self::DEFAULT_BACKGROUND,
            bold: false,
            reverse: false,
        }
    }

    /// This cell's attributes with a different character.
    pub const fn with_character(self, character: char) -> Cell {
        Cell { character, ..self }
    }

    /// The displayed foreground: bold lifts a normal color to its bright variant.
    pub const fn effective_foreground(&self) -> Color {
        if self.bold && !self.foreground.is_bright() {
            self.foreground.brighten()
        } else {
            self.foreground
        }
    }

    /// The displayed (foreground, background) pair, swapped when reverse video is set.
    pub const fn effective_colors(&self) -> (Color, Color) {
        let foreground = self.effective_foreground();
        if self.reverse {
            (self.background, foreground)
        } else {
            (foreground, self.background)
        }
    }

    /// True when the cell shows nothing but the default background.
    pub fn is_blank(&self) -> bool {
        *self == Cell::blank()
    }
}

impl Default for Cell {
    fn default() -> Self {
        Cell::blank()
    }
}
