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


use crate::TelnetOption;
use crate::args::naws::WindowSize;
use crate::args::ttype::TerminalType;
use crate::result::CodecResult;
use bytes::{BufMut, BytesMut};
use tracing::warn;

pub mod naws;
pub mod ttype;

///
/// Telnet Subnegotiation Argument
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TelnetArgument {
    /// A subnegotiation for the window size, where the first value is the width
    /// and the second value is the height. The values are in characters.
    NAWSWindowSize(WindowSize),
    /// A terminal type request or announcement.
    TerminalType(TerminalType),
    /// A subnegotiation for an option we do not interpret, or one whose payload was malformed.
    Unknown(TelnetOption, BytesMut),
}

impl TelnetArgument {
    /// Interprets a complete subnegotiation payload (IAC escapes already removed).
    ///
    /// Malformed payloads for known options are logged and returned as
    /// [`TelnetArgument::Unknown`] so the caller can ignore them.
    pub fn parse(option: TelnetOption, payload: BytesMut) -> TelnetArgument {
        let mut cursor = payload.clone().freeze();
        let parsed = match option {
            TelnetOption::NAWS => WindowSize::decode(&mut cursor).map(TelnetArgument::NAWSWindowSize),
            TelnetOption::TTYPE => {
                TerminalType::decode(&mut cursor).map(TelnetArgument::TerminalType)
            }
            _ => return TelnetArgument::Unknown(option, payload),
        };
        parsed.unwrap_or_else(|error| {
            warn!("Failed to parse {} subnegotiation: {}", option, error);
            TelnetArgument::Unknown(option, payload)
        })
    }

    /// The option this argument belongs to.
    pub fn option(&self) -> TelnetOption {
        match self {
            TelnetArgument::NAWSWindowSize(_) => TelnetOption::NAWS,
            TelnetArgument::TerminalType(_) => TelnetOption::TTYPE,
            TelnetArgument::Unknown(option, _) => *option,
        }
    }

    /// Returns the encoded byte length of this `TelnetArgument`, before IAC escaping.
    pub fn len(&self) -> usize {
        match self {
            TelnetArgument::NAWSWindowSize(inner) => inner.len(),
            TelnetArgument::TerminalType(inner) => inner.len(),
            TelnetArgument::Unknown(_option, inner) => inner.len(),
        }
    }

    /// Encodes the unescaped payload of this argument into `dst`.
    pub fn encode<T: BufMut>(&self, dst: &mut T) -> CodecResult<usize> {
        match self {
            TelnetArgument::NAWSWindowSize(inner) => inner.encode(dst),
            TelnetArgument::TerminalType(inner) => inner.encode(dst),
            TelnetArgument::Unknown(_option, inner) => {
                dst.put_slice(inner);
                Ok(inner.len())
            }
        }
    }
}
