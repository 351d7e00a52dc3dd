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


//! Fixed client-side option negotiation policy.

use crate::args::TelnetArgument;
use crate::args::naws::WindowSize;
use crate::args::ttype::TerminalType;
use crate::{TelnetEvent, TelnetFrame, TelnetOption};
use std::collections::HashSet;
use tracing::debug;

/// Per connection record of negotiated options.
///
/// `offered` holds options we agreed to perform (we sent `WILL`), `accepted` holds options
/// the peer performs with our consent (we sent `DO`).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NegotiationState {
    offered: HashSet<TelnetOption>,
    accepted: HashSet<TelnetOption>,
}

impl NegotiationState {
    /// True when we answered `DO <option>` with `WILL`.
    pub fn is_offered(&self, option: TelnetOption) -> bool {
        self.offered.contains(&option)
    }

    /// True when we answered `WILL <option>` with `DO`.
    pub fn is_accepted(&self, option: TelnetOption) -> bool {
        self.accepted.contains(&option)
    }

    /// Options we currently perform.
    pub fn offered(&self) -> impl Iterator<Item = TelnetOption> + '_ {
        self.offered.iter().copied()
    }

    /// Options the peer currently performs.
    pub fn accepted(&self) -> impl Iterator<Item = TelnetOption> + '_ {
        self.accepted.iter().copied()
    }

    /// Forget everything; used when a connection ends.
    pub fn reset(&mut self) {
        self.offered.clear();
        self.accepted.clear();
    }
}

///
/// Answers negotiation from a BBS server.
///
/// | Received          | Reply                                      |
/// |-------------------|--------------------------------------------|
/// | `DO TTYPE`        | `WILL TTYPE`                               |
/// | `DO NAWS`         | `WILL NAWS`, `SB NAWS <cols> <rows> SE`    |
/// | `DO` other        | `WONT`                                     |
/// | `DONT x`          | `WONT x`                                   |
/// | `WILL ECHO`/`SGA` | `DO`                                       |
/// | `WILL` other      | `DONT`                                     |
/// | `WONT x`          | `DONT x`                                   |
/// | `SB TTYPE SEND`   | `SB TTYPE IS <terminal type>`              |
///
/// Everything else produces no reply.
///
#[derive(Clone, Debug)]
pub struct Negotiator {
    terminal_type: String,
    window_size: WindowSize,
    state: NegotiationState,
}

impl Negotiator {
    /// Creates a responder that announces `terminal_type` and `window_size`.
    pub fn new(terminal_type: impl Into<String>, window_size: WindowSize) -> Self {
        Negotiator {
            terminal_type: terminal_type.into(),
            window_size,
            state: NegotiationState::default(),
        }
    }

    /// The terminal type sent in reply to `SB TTYPE SEND`.
    pub fn terminal_type(&self) -> &str {
        &self.terminal_type
    }

    /// The window size sent after `WILL NAWS`.
    pub fn window_size(&self) -> WindowSize {
        self.window_size
    }

    /// Changes the window size reported by later NAWS replies.
    pub fn set_window_size(&mut self, window_size: WindowSize) {
        self.window_size = window_size;
    }

    /// Options negotiated so far.
    pub fn state(&self) -> &NegotiationState {
        &self.state
    }

    /// Clears the negotiation record.
    pub fn reset(&mut self) {
        self.state.reset();
    }

    /// Produces the frames to write in reply to `event`, in wire order.
    pub fn respond(&mut self, event: &TelnetEvent) -> Vec<TelnetFrame> {
        match event {
            TelnetEvent::Do(option) => self.on_do(*option),
            TelnetEvent::Dont(option) => {
                debug!("Server sent DONT {}", option);
                self.state.offered.remove(option);
                vec![TelnetFrame::Wont(*option)]
            }
            TelnetEvent::Will(option) => match option {
                TelnetOption::Echo | TelnetOption::SuppressGoAhead => {
                    debug!("Server sent WILL {}, accepting", option);
                    self.state.accepted.insert(*option);
                    vec![TelnetFrame::Do(*option)]
                }
                _ => {
                    debug!("Server sent WILL {}, refusing", option);
                    vec![TelnetFrame::Dont(*option)]
                }
            },
            TelnetEvent::Wont(option) => {
                debug!("Server sent WONT {}", option);
                self.state.accepted.remove(option);
                vec![TelnetFrame::Dont(*option)]
            }
            TelnetEvent::Subnegotiate(TelnetArgument::TerminalType(TerminalType::Send)) => {
                debug!("Server requested terminal type, sending {}", self.terminal_type);
                vec![TelnetFrame::Subnegotiate(TelnetArgument::TerminalType(
                    TerminalType::Is(self.terminal_type.clone()),
                ))]
            }
            TelnetEvent::Subnegotiate(argument) => {
                debug!("Ignoring subnegotiation for {}", argument.option());
                Vec::new()
            }
            TelnetEvent::Data(_) | TelnetEvent::Command(_) => Vec::new(),
        }
    }

    fn on_do(&mut self, option: TelnetOption) -> Vec<TelnetFrame> {
        match option {
            TelnetOption::TTYPE => {
                debug!("Server sent DO TTYPE");
                self.state.offered.insert(option);
                vec![TelnetFrame::Will(option)]
            }
            TelnetOption::NAWS => {
                debug!("Server sent DO NAWS, reporting {}", self.window_size);
                self.state.offered.insert(option);
                vec![
                    TelnetFrame::Will(option),
                    TelnetFrame::Subnegotiate(TelnetArgument::NAWSWindowSize(self.window_size)),
                ]
            }
            _ => {
                debug!("Server sent DO {}, refusing", option);
                vec![TelnetFrame::Wont(option)]
            }
        }
    }
}

impl Default for Negotiator {
    fn default() -> Self {
        Negotiator::new("ANSI", WindowSize::default())
    }
}
