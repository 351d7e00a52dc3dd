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


//! # BBSTerm Telnet Codec
//!
//! Byte level Telnet ([RFC854](https://tools.ietf.org/html/rfc854)) support for a BBS client.
//!
//! ## Core Components
//!
//! ### [`TelnetCodec`]
//!
//! Implements [`Decoder`](tokio_util::codec::Decoder) and
//! [`Encoder`](tokio_util::codec::Encoder) from `tokio_util::codec`. The decoder splits the
//! inbound stream into display data runs and commands; its state survives between reads so
//! sequences split across TCP segments are reassembled.
//!
//! ### [`Negotiator`]
//!
//! The fixed negotiation policy of the client: terminal type and window size are offered,
//! echo and suppress-go-ahead are accepted from the server, everything else is refused.
//! Options agreed so far are recorded in a [`NegotiationState`].
//!
//! ### [`Codepage`]
//!
//! Selective decoding of inbound bytes: ASCII stays ASCII, the high half maps through CP437
//! (or Latin-1), so ANSI escape sequences reach the terminal untouched.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use bbsterm_telnetcodec::{Negotiator, TelnetCodec, TelnetEvent};
//! use bytes::BytesMut;
//! use tokio_util::codec::{Decoder, Encoder};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut codec = TelnetCodec::new();
//! let mut negotiator = Negotiator::default();
//! let mut input = BytesMut::from(&b"Hello\xFF\xFD\x1F"[..]); // Data + DO NAWS
//! let mut output = BytesMut::new();
//! while let Some(event) = codec.decode(&mut input)? {
//!     match event {
//!         TelnetEvent::Data(bytes) => println!("Received: {:?}", bytes),
//!         other => {
//!             for reply in negotiator.respond(&other) {
//!                 codec.encode(reply, &mut output)?;
//!             }
//!         }
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## IAC Escaping
//!
//! 0xFF is sent twice when it is data: `IAC IAC` is a literal 0xFF. The decoder collapses
//! it, the encoder doubles it, including inside subnegotiation payloads.

#![warn(
    clippy::cargo,
    missing_docs,
    clippy::pedantic,
    future_incompatible,
    rust_2018_idioms
)]
#![allow(
    clippy::option_if_let_else,
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::len_without_is_empty
)]

mod args;
mod codec;
mod codepage;
pub mod consts;
mod event;
mod frame;
mod negotiation;
mod options;
mod result;

pub use self::args::{TelnetArgument, naws, ttype};
pub use self::codec::{MAX_SUBNEGOTIATION_LENGTH, TelnetCodec};
pub use self::codepage::Codepage;
pub use self::event::TelnetEvent;
pub use self::frame::{TelnetCommand, TelnetFrame};
pub use self::negotiation::{NegotiationState, Negotiator};
pub use self::options::TelnetOption;
pub use self::result::{CodecError, CodecResult, SubnegotiationErrorKind};
