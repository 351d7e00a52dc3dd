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


//! ANSI screen emulation for BBS output: a streaming escape sequence parser, the iCE color
//! filter, and a fixed size grid of colored cells.

mod buffer;
mod cell;
mod emulator;
mod ice;
mod parser;
mod types;

pub use self::buffer::{EraseMode, ScreenBuffer};
pub use self::cell::{Cell, Color};
pub use self::emulator::{EmulatorConfig, ScreenSnapshot, TerminalEmulator};
pub use self::ice::IceColorFilter;
pub use self::parser::{Action, ControlSequence, MAX_PARAMETERS, MAX_SEQUENCE_LENGTH, Parser};
pub use self::types::{CursorPosition, TerminalSize};
