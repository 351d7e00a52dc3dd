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


//! Terminal identification probes

use bbsterm_telnetcodec::naws::WindowSize;
use tracing::debug;

const ESC: u8 = 0x1B;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum ProbeState {
    #[default]
    Ground,
    Escape,
    Csi,
    CsiSix,
    CsiZero,
}

///
/// Watches forwarded display bytes for the queries BBS software sends to size up a terminal.
///
/// The scanner only observes; the bytes are forwarded unchanged and the replies are
/// returned for the caller to write back. State carries across calls, so a probe split
/// between reads is still answered.
///
/// | Query     | Reply                  |
/// |-----------|------------------------|
/// | `ESC[6n`  | `ESC[<rows>;<cols>R`   |
/// | `ESC[c`   | `ESC[?1;0c`            |
/// | `ESC[0c`  | `ESC[?1;0c`            |
///
#[derive(Clone, Debug)]
pub struct ProbeScanner {
    window_size: WindowSize,
    state: ProbeState,
}

impl ProbeScanner {
    pub fn new(window_size: WindowSize) -> Self {
        Self {
            window_size,
            state: ProbeState::Ground,
        }
    }

    /// Size reported in cursor position replies.
    pub fn set_window_size(&mut self, window_size: WindowSize) {
        self.window_size = window_size;
    }

    pub fn reset(&mut self) {
        self.state = ProbeState::Ground;
    }

    /// Scans a chunk and returns the replies for every probe completed in it.
    pub fn scan(&mut self, bytes: &[u8]) -> Vec<Vec<u8>> {
        let mut replies = Vec::new();
        for &byte in bytes {
            self.state = match (self.state, byte) {
                (_, ESC) => ProbeState::Escape,
                (ProbeState::Escape, b'[') => ProbeState::Csi,
                (ProbeState::Csi, b'6') => ProbeState::CsiSix,
                (ProbeState::Csi, b'0') => ProbeState::CsiZero,
                (ProbeState::CsiSix, b'n') => {
                    debug!("Answering cursor position report");
                    replies.push(self.cursor_position_report());
                    ProbeState::Ground
                }
                (ProbeState::Csi | ProbeState::CsiZero, b'c') => {
                    debug!("Answering device attributes query");
                    replies.push(b"\x1b[?1;0c".to_vec());
                    ProbeState::Ground
                }
                _ => ProbeState::Ground,
            };
        }
        replies
    }

    fn cursor_position_report(&self) -> Vec<u8> {
        format!("\x1b[{};{}R", self.window_size.rows, self.window_size.cols).into_bytes()
    }
}

impl Default for ProbeScanner {
    fn default() -> Self {
        Self::new(WindowSize::new(80, 24))
    }
}
