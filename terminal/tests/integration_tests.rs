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


use bbsterm_terminal::{Cell, Color, EmulatorConfig, TerminalEmulator};

fn blank_display(emulator: &TerminalEmulator) -> bool {
    emulator
        .get_display()
        .iter()
        .all(|line| line.chars().all(|c| c == ' '))
}

// ===== Display =====

#[test]
fn test_printable_ascii_fills_row_zero() {
    let mut emulator = TerminalEmulator::default();
    emulator.feed("Welcome to the BBS");
    assert_eq!(emulator.get_line(0), format!("{:<80}", "Welcome to the BBS"));
    assert_eq!(emulator.get_display().len(), 24);
    assert!(emulator.get_display().iter().all(|line| line.chars().count() == 80));
}

#[test]
fn test_get_line_out_of_range() {
    let emulator = TerminalEmulator::default();
    assert_eq!(emulator.get_line(24), "");
    assert_eq!(emulator.get_line(usize::MAX), "");
    assert!(emulator.cell(0, 24).is_none());
}

#[test]
fn test_long_line_wraps_to_next_row() {
    let mut emulator = TerminalEmulator::new(EmulatorConfig::new(10, 3));
    emulator.feed("0123456789AB");
    assert_eq!(emulator.get_line(0), "0123456789");
    assert_eq!(emulator.get_line(1), "AB        ");
    assert_eq!(emulator.get_cursor_position(), (2, 1));
}

#[test]
fn test_exact_width_line_then_crlf_does_not_skip_a_row() {
    let mut emulator = TerminalEmulator::new(EmulatorConfig::new(5, 3));
    emulator.feed("abcde\r\nfghij\r\nk");
    assert_eq!(emulator.get_display(), vec!["abcde", "fghij", "k    "]);
}

#[test]
fn test_scrolls_at_bottom() {
    let mut emulator = TerminalEmulator::new(EmulatorConfig::new(4, 2));
    emulator.feed("one\r\ntwo\r\nsix");
    assert_eq!(emulator.get_display(), vec!["two ", "six "]);
}

// ===== Clear =====

#[test]
fn test_clear_blanks_everything() {
    let mut emulator = TerminalEmulator::default();
    emulator.feed("\u{1b}[1;33;44mLots of text\r\nand more");
    emulator.clear();
    assert!(blank_display(&emulator));
    assert_eq!(emulator.get_cursor_position(), (0, 0));
    assert_eq!(emulator.columns(), 80);
    assert_eq!(emulator.rows(), 24);

    emulator.feed("X");
    assert_eq!(emulator.cell(0, 0), Some(Cell::blank().with_character('X')));
}

#[test]
fn test_clear_is_idempotent() {
    let mut once = TerminalEmulator::default();
    once.feed("data\u{1b}[5;41m");
    once.clear();

    let mut twice = TerminalEmulator::default();
    twice.feed("data\u{1b}[5;41m");
    twice.clear();
    twice.clear();

    assert_eq!(once.snapshot(), twice.snapshot());
    assert_eq!(once.pen(), twice.pen());
}

// ===== SGR =====

#[test]
fn test_bold_green_is_bright_green() {
    let mut emulator = TerminalEmulator::default();
    emulator.feed("\u{1b}[1m\u{1b}[32mX");
    let cell = emulator.cell(0, 0).unwrap();
    assert_eq!(cell.foreground, Color::GREEN);
    assert_eq!(cell.effective_foreground(), Color::new(10));

    emulator.feed("\u{1b}[0mY");
    let cell = emulator.cell(1, 0).unwrap();
    assert_eq!(cell.effective_foreground(), Color::new(7));
    assert_eq!(cell.background, Color::new(0));
    assert!(!cell.bold);
}

#[test]
fn test_bold_is_sticky_across_color_changes() {
    let mut emulator = TerminalEmulator::default();
    emulator.feed("\u{1b}[1;31mA\u{1b}[34mB");
    assert_eq!(
        emulator.cell(1, 0).unwrap().effective_foreground(),
        Color::BRIGHT_BLUE
    );
}

#[test]
fn test_reverse_swaps_on_read() {
    let mut emulator = TerminalEmulator::default();
    emulator.feed("\u{1b}[7;31;42mR");
    let cell = emulator.cell(0, 0).unwrap();
    assert_eq!(cell.effective_colors(), (Color::GREEN, Color::RED));
}

// ===== iCE colors =====

#[test]
fn test_blink_blue_background_is_bright_blue() {
    let mut emulator = TerminalEmulator::default();
    emulator.feed("\u{1b}[5m\u{1b}[44mX");
    let cell = emulator.cell(0, 0).unwrap();
    assert_eq!(cell.background, Color::new(12));
}

#[test]
fn test_blink_order_does_not_matter() {
    for input in ["\u{1b}[44;5mX", "\u{1b}[5;44mX", "\u{1b}[44m\u{1b}[5mX"] {
        let mut emulator = TerminalEmulator::default();
        emulator.feed(input);
        assert_eq!(emulator.cell(0, 0).unwrap().background, Color::BRIGHT_BLUE, "{input:?}");
    }
}

#[test]
fn test_lone_blink_does_not_reset_attributes() {
    let mut emulator = TerminalEmulator::default();
    emulator.feed("\u{1b}[1;36m\u{1b}[5mX");
    let cell = emulator.cell(0, 0).unwrap();
    assert!(cell.bold);
    assert_eq!(cell.foreground, Color::CYAN);
}

#[test]
fn test_ice_sequence_split_across_feeds() {
    let mut emulator = TerminalEmulator::default();
    for chunk in ["\u{1b}", "[", "5", ";4", "1", "m", "Z"] {
        emulator.feed(chunk);
    }
    assert_eq!(emulator.cell(0, 0).unwrap().background, Color::BRIGHT_RED);
    assert_eq!(emulator.get_cursor_position(), (1, 0));
}

#[test]
fn test_reset_ends_ice_background() {
    let mut emulator = TerminalEmulator::default();
    emulator.feed("\u{1b}[5;44mA\u{1b}[0m\u{1b}[44mB");
    assert_eq!(emulator.cell(0, 0).unwrap().background, Color::BRIGHT_BLUE);
    assert_eq!(emulator.cell(1, 0).unwrap().background, Color::BLUE);
}

// ===== Cursor =====

#[test]
fn test_cursor_position_is_clamped() {
    let mut emulator = TerminalEmulator::default();
    emulator.feed("\u{1b}[999;999H");
    assert_eq!(emulator.get_cursor_position(), (79, 23));
    emulator.feed("\u{1b}[999A\u{1b}[999D");
    assert_eq!(emulator.get_cursor_position(), (0, 0));
}

#[test]
fn test_cursor_addressed_drawing() {
    let mut emulator = TerminalEmulator::default();
    emulator.feed("\u{1b}[2J\u{1b}[3;10HTitle\u{1b}[1;1H>");
    assert_eq!(emulator.get_line(2).trim_end(), "         Title");
    assert_eq!(emulator.get_line(0).trim_end(), ">");
}

// ===== Erase =====

#[test]
fn test_erase_display_modes() {
    let mut emulator = TerminalEmulator::new(EmulatorConfig::new(3, 3));
    emulator.feed("abcdefghi\u{1b}[2;2H\u{1b}[0J");
    assert_eq!(emulator.get_display(), vec!["abc", "d  ", "   "]);

    emulator.feed("\u{1b}[Habcdefghi\u{1b}[2;2H\u{1b}[1J");
    assert_eq!(emulator.get_display(), vec!["   ", "  f", "ghi"]);

    emulator.feed("\u{1b}[2J");
    assert!(blank_display(&emulator));
    assert_eq!(emulator.get_cursor_position(), (1, 1));
}

#[test]
fn test_erased_cells_use_default_attributes() {
    let mut emulator = TerminalEmulator::new(EmulatorConfig::new(4, 1));
    emulator.feed("\u{1b}[41mabcd\u{1b}[1G\u{1b}[2K");
    for col in 0..4 {
        assert_eq!(emulator.cell(col, 0), Some(Cell::blank()));
    }
}

// ===== Resize =====

#[test]
fn test_resize_preserves_content_and_clamps_cursor() {
    let mut emulator = TerminalEmulator::default();
    emulator.feed("keep me\u{1b}[24;80H");
    emulator.resize(40, 10);
    assert_eq!(emulator.columns(), 40);
    assert_eq!(emulator.rows(), 10);
    assert_eq!(emulator.get_line(0).trim_end(), "keep me");
    assert_eq!(emulator.get_cursor_position(), (39, 9));

    emulator.resize(100, 30);
    assert_eq!(emulator.get_line(0).trim_end(), "keep me");
    assert_eq!(emulator.get_line(29).len(), 100);
}

#[test]
fn test_resize_to_zero_is_one_by_one() {
    let mut emulator = TerminalEmulator::default();
    emulator.resize(0, 0);
    assert_eq!((emulator.columns(), emulator.rows()), (1, 1));
    emulator.feed("xyz");
    assert_eq!(emulator.get_line(0), "z");
}

// ===== Robustness =====

#[test]
fn test_unsupported_sequences_are_invisible() {
    let mut emulator = TerminalEmulator::default();
    emulator.feed("\u{1b}[6n\u{1b}[c\u{1b}[?7h\u{1b}[=1;2q\u{1b}[ q\u{1b}#8ok");
    assert_eq!(emulator.get_line(0).trim_end(), "ok");
}

#[test]
fn test_cp437_art_lands_in_cells() {
    let mut emulator = TerminalEmulator::default();
    emulator.feed("\u{1b}[1;34m╔══╗\r\n║░▓║\r\n╚══╝");
    assert_eq!(emulator.get_line(1).trim_end(), "║░▓║");
    assert_eq!(
        emulator.cell(1, 1).unwrap().effective_foreground(),
        Color::BRIGHT_BLUE
    );
}

#[test]
fn test_snapshot_is_detached() {
    let mut emulator = TerminalEmulator::default();
    emulator.feed("before");
    let snapshot = emulator.snapshot();
    emulator.feed("\r\u{1b}[Kafter");
    assert_eq!(snapshot.lines()[0].trim_end(), "before");
    assert_eq!(emulator.get_line(0).trim_end(), "after");
}
