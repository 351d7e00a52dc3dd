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


//! Inbound 8-bit code pages.
//!
//! BBS output mixes 7-bit ANSI escape sequences with high-half graphics characters.
//! Decoding keeps bytes below 0x80 as ASCII so the escape grammar survives, and maps only
//! the high half through the selected table. Decoding is total: every byte maps to a char.

/// CP437 characters for bytes `0x80..=0xFF`.
const CP437_HIGH: [char; 128] = [
    'Ç', 'ü', 'é', 'â', 'ä', 'à', 'å', 'ç', 'ê', 'ë', 'è', 'ï', 'î', 'ì', 'Ä', 'Å', //
    'É', 'æ', 'Æ', 'ô', 'ö', 'ò', 'û', 'ù', 'ÿ', 'Ö', 'Ü', '¢', '£', '¥', '₧', 'ƒ', //
    'á', 'í', 'ó', 'ú', 'ñ', 'Ñ', 'ª', 'º', '¿', '⌐', '¬', '½', '¼', '¡', '«', '»', //
    '░', '▒', '▓', '│', '┤', '╡', '╢', '╖', '╕', '╣', '║', '╗', '╝', '╜', '╛', '┐', //
    '└', '┴', '┬', '├', '─', '┼', '╞', '╟', '╚', '╔', '╩', '╦', '╠', '═', '╬', '╧', //
    '╨', '╤', '╥', '╙', '╘', '╒', '╓', '╫', '╪', '┘', '┌', '█', '▄', '▌', '▐', '▀', //
    'α', 'ß', 'Γ', 'π', 'Σ', 'σ', 'µ', 'τ', 'Φ', 'Θ', 'Ω', 'δ', '∞', 'φ', 'ε', '∩', //
    '≡', '±', '≥', '≤', '⌠', '⌡', '÷', '≈', '°', '∙', '·', '√', 'ⁿ', '²', '■', '\u{A0}',
];

/// An 8-bit inbound character encoding.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Codepage {
    /// IBM PC code page 437, box drawing and shading blocks in the high half.
    #[default]
    Cp437,
    /// ISO 8859-1, every byte maps to the code point of the same value.
    Latin1,
}

impl Codepage {
    /// True when bytes `0x00..=0x7F` decode as ASCII.
    ///
    /// Selective decoding relies on this; both supported code pages qualify.
    pub fn is_ascii_compatible(&self) -> bool {
        match self {
            Codepage::Cp437 | Codepage::Latin1 => true,
        }
    }

    /// Decodes a single byte.
    pub fn decode_byte(&self, byte: u8) -> char {
        if byte < 0x80 {
            return byte as char;
        }
        match self {
            Codepage::Cp437 => CP437_HIGH[usize::from(byte - 0x80)],
            Codepage::Latin1 => char::from(byte),
        }
    }

    /// Decodes a byte slice. Bytes below 0x80 pass through unchanged.
    pub fn decode(&self, bytes: &[u8]) -> String {
        bytes.iter().map(|byte| self.decode_byte(*byte)).collect()
    }

    /// Encodes a character, returning `None` when this code page cannot represent it.
    pub fn encode_char(&self, character: char) -> Option<u8> {
        if character.is_ascii() {
            return Some(character as u8);
        }
        match self {
            Codepage::Cp437 => CP437_HIGH
                .iter()
                .position(|candidate| *candidate == character)
                .and_then(|index| u8::try_from(index + 0x80).ok()),
            Codepage::Latin1 => u8::try_from(u32::from(character)).ok(),
        }
    }
}

impl std::fmt::Display for Codepage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Codepage::Cp437 => write!(f, "CP437"),
            Codepage::Latin1 => write!(f, "ISO-8859-1"),
        }
    }
}
