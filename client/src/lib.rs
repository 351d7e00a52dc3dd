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


//! # BBSTerm Client
//!
//! Telnet client engine for ANSI bulletin board systems.
//!
//! ## Features
//!
//! - **Automatic Negotiation** - Answers TTYPE, NAWS, ECHO and SGA and refuses the rest
//! - **Terminal Probes** - Replies to cursor position and device attribute queries
//! - **Code Pages** - Decodes CP437 or Latin-1 art; encodes outbound text in UTF-8, CP437 or Latin-1
//! - **Event-Driven** - Connection and data notifications through a synchronous [`EventBus`]
//! - **Screen Emulation** - [`TerminalSession`] keeps an ANSI screen and streams snapshots
//!
//! ## Quick Start
//!
//! ```no_run
//! use bbsterm_client::{ClientConfig, TerminalSession};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let session = TerminalSession::new(ClientConfig::new("bbs.example.org", 23));
//!     let mut screen = session.screen_updates();
//!
//!     if session.connect().await {
//!         while screen.changed().await.is_ok() {
//!             for line in screen.borrow_and_update().lines() {
//!                 println!("{}", line.trim_end());
//!             }
//!         }
//!     }
//!     Ok(())
//! }
//! ```

mod charset;
mod config;
mod error;
mod event;
mod probe;
mod session;
mod transport;

pub use self::charset::Charset;
pub use self::config::ClientConfig;
pub use self::error::{ClientError, Result};
pub use self::event::{Event, EventBus, EventKind, Listener, ListenerId};
pub use self::probe::ProbeScanner;
pub use self::session::TerminalSession;
pub use self::transport::{ConnectionState, TelnetTransport};

pub use bbsterm_telnetcodec::naws::WindowSize;
pub use bbsterm_telnetcodec::{Codepage, NegotiationState, TelnetOption};
pub use bbsterm_terminal::{Cell, Color, ScreenSnapshot, TerminalEmulator};
