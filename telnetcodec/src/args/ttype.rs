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


//! Terminal Type
//!

use crate::{CodecError, CodecResult, SubnegotiationErrorKind, consts};
use bytes::{Buf, BufMut};

/// A Terminal Type ([RFC1091](https://tools.ietf.org/html/rfc1091)) subnegotiation payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TerminalType {
    /// The server asks for our terminal type: `SEND`
    Send,
    /// A terminal type announcement: `IS <name>`
    Is(String),
}

impl TerminalType {
    /// Encoded length of the payload in bytes.
    pub fn len(&self) -> usize {
        match self {
            TerminalType::Send => 1,
            TerminalType::Is(name) => 1 + name.len(),
        }
    }

    /// Encodes the payload (without the option byte or `IAC SB`/`IAC SE` framing).
    pub fn encode<T: BufMut>(&self, dst: &mut T) -> CodecResult<usize> {
        match self {
            TerminalType::Send => dst.put_u8(consts::ttype::SEND),
            TerminalType::Is(name) => {
                dst.put_u8(consts::ttype::IS);
                dst.put_slice(name.as_bytes());
            }
        }
        Ok(self.len())
    }

    /// Decodes a terminal type payload.
    ///
    /// # Errors
    /// Fails with [`SubnegotiationErrorKind::InsufficientData`] on an empty payload and
    /// [`SubnegotiationErrorKind::InvalidCommand`] on anything but `IS` or `SEND`.
    pub fn decode<T: Buf>(src: &mut T) -> CodecResult<TerminalType> {
        if !src.has_remaining() {
            return Err(CodecError::Subnegotiation {
                option: consts::option::TTYPE,
                reason: SubnegotiationErrorKind::InsufficientData {
                    required: 1,
                    available: 0,
                },
            });
        }
        match src.get_u8() {
            consts::ttype::SEND => Ok(TerminalType::Send),
            consts::ttype::IS => {
                let name = src.copy_to_bytes(src.remaining());
                Ok(TerminalType::Is(String::from_utf8_lossy(&name).into_owned()))
            }
            command => Err(CodecError::Subnegotiation {
                option: consts::option::TTYPE,
                reason: SubnegotiationErrorKind::InvalidCommand { command },
            }),
        }
    }
}
