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


use tracing::trace;

/// Upper bound on bytes buffered for one control sequence.
pub const MAX_SEQUENCE_LENGTH: usize = 256;

/// Upper bound on numeric parameters kept for one control sequence.
pub const MAX_PARAMETERS: usize = 32;

const ESC: char = '\u{1b}';

/// A complete unit recognised by the [`Parser`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    /// A printable character.
    Print(char),
    /// A C0 control character or DEL.
    Control(char),
    /// `ESC <final>` for a final other than `[`.
    Escape(char),
    /// `ESC [ <params> <final>`.
    Csi(ControlSequence),
}

/// A parsed CSI sequence.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ControlSequence {
    /// Numeric parameters; `None` where the parameter was empty.
    pub params: Vec<Option<u16>>,
    /// The sequence carried a private marker (`?`, `<`, `=`, `>`).
    pub private: bool,
    /// The sequence carried intermediate bytes (0x20–0x2F).
    pub intermediate: bool,
    /// The final character.
    pub final_char: char,
}

impl ControlSequence {
    /// Parameter `index`, or `default` when it is absent or empty.
    pub fn param(&self, index: usize, default: u16) -> u16 {
        self.params.get(index).copied().flatten().unwrap_or(default)
    }

    /// Parameter `index` as a count: absent, empty, and zero all mean `1`.
    pub fn count(&self, index: usize) -> u16 {
        match self.param(index, 1) {
            0 => 1,
            value => value,
        }
    }
}

/// Internal state machine states.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    /// Printable characters and control codes.
    Ground,
    /// After ESC, waiting for the byte that selects the sequence type.
    Escape,
    /// After `ESC <intermediate>`, such as `ESC #` or `ESC (`; the sequence is discarded.
    EscapeIntermediate,
    /// Inside `ESC [`, accumulating parameters until a final byte.
    Csi,
    /// Inside an over-long `ESC [`; everything up to the final byte is discarded.
    CsiIgnore,
}

/// A streaming parser for the escape grammar used by BBS output.
///
/// `Parser` consumes one character at a time and keeps its state between calls, so
/// sequences split across chunks are completed by later input. Malformed input never
/// produces an error: the partial sequence is dropped and the parser returns to ground.
#[derive(Clone, Debug)]
pub struct Parser {
    state: State,
    sequence: ControlSequence,
    current: Option<u16>,
    length: usize,
}

impl Parser {
    pub fn new() -> Self {
        Parser {
            state: State::Ground,
            sequence: ControlSequence::default(),
            current: None,
            length: 0,
        }
    }

    /// Discards any partial sequence and returns to ground.
    pub fn clear(&mut self) {
        self.state = State::Ground;
        self.sequence = ControlSequence::default();
        self.current = None;
        self.length = 0;
    }

    /// True when no sequence is in progress.
    pub fn is_ground(&self) -> bool {
        self.state == State::Ground
    }

    /// Processes the next character.
    ///
    /// Returns `None` when more input is needed or the character completed a sequence
    /// that is discarded.
    pub fn next(&mut self, character: char) -> Option<Action> {
        match self.state {
            State::Ground => self.process_ground(character),
            State::Escape => self.process_escape(character),
            State::EscapeIntermediate => self.process_escape_intermediate(character),
            State::Csi => self.process_csi(character),
            State::CsiIgnore => self.process_csi_ignore(character),
        }
    }

    fn process_ground(&mut self, character: char) -> Option<Action> {
        match character {
            ESC => {
                self.state = State::Escape;
                None
            }
            '\u{00}'..='\u{1f}' | '\u{7f}' => Some(Action::Control(character)),
            // C1 controls never come out of the code page decoder; ignore stray ones.
            '\u{80}'..='\u{9f}' => None,
            _ => Some(Action::Print(character)),
        }
    }

    fn process_escape(&mut self, character: char) -> Option<Action> {
        match character {
            '[' => {
                self.begin_sequence();
                None
            }
            ESC => None,
            '\u{20}'..='\u{2f}' => {
                self.state = State::EscapeIntermediate;
                None
            }
            '\u{30}'..='\u{7e}' => {
                self.state = State::Ground;
                Some(Action::Escape(character))
            }
            _ => {
                trace!("Dropping malformed escape sequence at {:?}", character);
                self.state = State::Ground;
                self.process_ground(character)
            }
        }
    }

    fn process_escape_intermediate(&mut self, character: char) -> Option<Action> {
        match character {
            '\u{20}'..='\u{2f}' => None,
            '\u{30}'..='\u{7e}' => {
                trace!("Ignoring escape sequence ending in {:?}", character);
                self.state = State::Ground;
                None
            }
            ESC => {
                self.state = State::Escape;
                None
            }
            _ => {
                self.state = State::Ground;
                self.process_ground(character)
            }
        }
    }

    fn process_csi(&mut self, character: char) -> Option<Action> {
        self.length += 1;
        if self.length > MAX_SEQUENCE_LENGTH {
            trace!("Dropping control sequence longer than {}", MAX_SEQUENCE_LENGTH);
            self.clear();
            self.state = State::CsiIgnore;
            return self.process_csi_ignore(character);
        }
        match character {
            '0'..='9' => {
                let digit = u16::from(character as u8 - b'0');
                let value = self.current.unwrap_or(0);
                self.current = Some(value.saturating_mul(10).saturating_add(digit));
                None
            }
            ';' | ':' => {
                self.push_param(true);
                None
            }
            '?' | '<' | '=' | '>' => {
                self.sequence.private = true;
                None
            }
            '\u{20}'..='\u{2f}' => {
                self.sequence.intermediate = true;
                None
            }
            '\u{40}'..='\u{7e}' => {
                self.push_param(false);
                let mut sequence = std::mem::take(&mut self.sequence);
                sequence.final_char = character;
                self.clear();
                Some(Action::Csi(sequence))
            }
            ESC => {
                trace!("Control sequence interrupted by ESC");
                self.clear();
                self.state = State::Escape;
                None
            }
            _ => {
                trace!("Dropping malformed control sequence at {:?}", character);
                self.clear();
                self.process_ground(character)
            }
        }
    }

    fn process_csi_ignore(&mut self, character: char) -> Option<Action> {
        match character {
            '\u{40}'..='\u{7e}' => {
                self.state = State::Ground;
                None
            }
            ESC => {
                self.state = State::Escape;
                None
            }
            '\u{20}'..='\u{3f}' => None,
            _ => {
                self.state = State::Ground;
                self.process_ground(character)
            }
        }
    }

    fn begin_sequence(&mut self) {
        self.state = State::Csi;
        self.sequence = ControlSequence::default();
        self.current = None;
        self.length = 0;
    }

    fn push_param(&mut self, separator: bool) {
        // `ESC[m` has no parameters at all; `ESC[;m` has two empty ones.
        let present = separator || self.current.is_some() || !self.sequence.params.is_empty();
        if present && self.sequence.params.len() < MAX_PARAMETERS {
            self.sequence.params.push(self.current);
        }
        self.current = None;
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> Vec<Action> {
        let mut parser = Parser::new();
        input.chars().filter_map(|c| parser.next(c)).collect()
    }

    fn csi(params: &[Option<u16>], final_char: char) -> Action {
        Action::Csi(ControlSequence {
            params: params.to_vec(),
            private: false,
            intermediate: false,
            final_char,
        })
    }

    #[test]
    fn test_printable_and_controls() {
        assert_eq!(
            parse("a\r\n\u{7}"),
            vec![
                Action::Print('a'),
                Action::Control('\r'),
                Action::Control('\n'),
                Action::Control('\u{7}'),
            ]
        );
    }

    #[test]
    fn test_non_ascii_prints() {
        assert_eq!(parse("░é"), vec![Action::Print('░'), Action::Print('é')]);
    }

    #[test]
    fn test_csi_without_params() {
        assert_eq!(parse("\u{1b}[m"), vec![csi(&[], 'm')]);
        assert_eq!(parse("\u{1b}[H"), vec![csi(&[], 'H')]);
    }

    #[test]
    fn test_csi_with_params() {
        assert_eq!(
            parse("\u{1b}[1;33m"),
            vec![csi(&[Some(1), Some(33)], 'm')]
        );
        assert_eq!(
            parse("\u{1b}[;5H"),
            vec![csi(&[None, Some(5)], 'H')]
        );
        assert_eq!(parse("\u{1b}[5;H"), vec![csi(&[Some(5), None], 'H')]);
    }

    #[test]
    fn test_csi_param_saturates() {
        assert_eq!(
            parse("\u{1b}[99999999A"),
            vec![csi(&[Some(u16::MAX)], 'A')]
        );
    }

    #[test]
    fn test_private_marker() {
        let actions = parse("\u{1b}[?25l");
        assert_eq!(actions.len(), 1);
        match &actions[0] {
            Action::Csi(sequence) => {
                assert!(sequence.private);
                assert_eq!(sequence.final_char, 'l');
                assert_eq!(sequence.params, vec![Some(25)]);
            }
            other => panic!("unexpected action {other:?}"),
        }
    }

    #[test]
    fn test_escape_finals() {
        assert_eq!(
            parse("\u{1b}7\u{1b}8\u{1b}c"),
            vec![Action::Escape('7'), Action::Escape('8'), Action::Escape('c')]
        );
    }

    #[test]
    fn test_escape_with_intermediate_is_discarded() {
        assert_eq!(parse("\u{1b}#8A\u{1b}(BC"), vec![Action::Print('A'), Action::Print('C')]);
    }

    #[test]
    fn test_sequence_split_across_calls() {
        let mut parser = Parser::new();
        assert_eq!(parser.next('\u{1b}'), None);
        assert_eq!(parser.next('['), None);
        assert_eq!(parser.next('3'), None);
        assert!(!parser.is_ground());
        assert_eq!(parser.next('2'), None);
        assert_eq!(parser.next('m'), Some(csi(&[Some(32)], 'm')));
        assert!(parser.is_ground());
    }

    #[test]
    fn test_malformed_sequence_returns_to_ground() {
        assert_eq!(
            parse("\u{1b}[1\rX"),
            vec![Action::Control('\r'), Action::Print('X')]
        );
        assert_eq!(parse("\u{1b}[1é"), vec![Action::Print('é')]);
    }

    #[test]
    fn test_esc_restarts_sequence() {
        assert_eq!(parse("\u{1b}[1\u{1b}[2J"), vec![csi(&[Some(2)], 'J')]);
    }

    #[test]
    fn test_overlong_sequence_is_dropped() {
        let mut input = String::from("\u{1b}[");
        input.push_str(&"1;".repeat(MAX_SEQUENCE_LENGTH));
        input.push_str("mZ");
        assert_eq!(parse(&input), vec![Action::Print('Z')]);
    }

    #[test]
    fn test_overlong_sequence_parameters_are_not_printed() {
        let mut parser = Parser::new();
        let mut input = String::from("\u{1b}[");
        input.push_str(&"12;".repeat(MAX_SEQUENCE_LENGTH));
        let actions: Vec<Action> = input.chars().filter_map(|c| parser.next(c)).collect();
        assert!(actions.is_empty());
        assert!(!parser.is_ground());
        assert_eq!(parser.next('H'), None);
        assert!(parser.is_ground());
        assert_eq!(parser.next('x'), Some(Action::Print('x')));
    }

    #[test]
    fn test_count_and_param_defaults() {
        let sequence = ControlSequence {
            params: vec![Some(0), None, Some(7)],
            ..ControlSequence::default()
        };
        assert_eq!(sequence.count(0), 1);
        assert_eq!(sequence.count(1), 1);
        assert_eq!(sequence.count(2), 7);
        assert_eq!(sequence.count(3), 1);
        assert_eq!(sequence.param(0, 1), 0);
        assert_eq!(sequence.param(1, 9), 9);
    }

    #[test]
    fn test_clear_drops_partial() {
        let mut parser = Parser::new();
        parser.next('\u{1b}');
        parser.next('[');
        parser.clear();
        assert_eq!(parser.next('A'), Some(Action::Print('A')));
    }
}
