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

//! Negotiate About Window Size
//!

use crate::{CodecError, CodecResult, SubnegotiationErrorKind, consts};
use byteorder::{BigEndian, WriteBytesExt};
use bytes::{Buf, BufMut};

/// Represents the Negotiate About Window Size (NAWS) option data.
///
/// The window size is encoded as four bytes in big-endian format:
/// - 2 bytes for columns (width)
/// - 2 bytes for rows (height)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WindowSize {
    /// The number of columns (characters) in the terminal window
    pub cols: u16,
    /// The number of rows (lines) in the terminal window
    pub rows: u16,
}

impl WindowSize {
    /// Creates a new `WindowSize` with the specified columns and rows.
    pub fn new(cols: u16, rows: u16) -> Self {
        WindowSize { cols, rows }
    }

    /// The NAWS subnegotiation data always occupies exactly 4 bytes.
    pub fn len(&self) -> usize {
        4
    }

    /// Encodes this `WindowSize` into a byte buffer using big-endian format.
    ///
    /// Returns the number of bytes written. A byte equal to IAC is *not* doubled here;
    /// escaping the payload is the frame encoder's job.
    pub fn encode<T: BufMut>(&self, dst: &mut T) -> CodecResult<usize> {
        Ok(self.write(&mut dst.writer())?)
    }

    /// Writes this `WindowSize` to a writer using big-endian format.
    pub fn write<W: std::io::Write>(&self, writer: &mut W) -> std::io::Result<usize> {
        writer.write_u16::<BigEndian>(self.cols)?;
        writer.write_u16::<BigEndian>(self.rows)?;
        Ok(4)
    }

    /// Decodes a `WindowSize` from a byte buffer in big-endian format.
    ///
    /// # Errors
    /// Returns [`CodecError::Subnegotiation`] with `InsufficientData` if fewer than 4 bytes
    /// are available in the buffer.
    pub fn decode<T: Buf>(src: &mut T) -> CodecResult<WindowSize> {
        if src.remaining() >= 4 {
            Ok(WindowSize {
                cols: src.get_u16(),
                rows: src.get_u16(),
            })
        } else {
            Err(CodecError::Subnegotiation {
                option: consts::option::NAWS,
                reason: SubnegotiationErrorKind::InsufficientData {
                    required: 4,
                    available: src.remaining(),
                },
            })
        }
    }
}

impl Default for WindowSize {
    /// The traditional 80x24 terminal.
    fn default() -> Self {
        WindowSize { cols: 80, rows: 24 }
    }
}

impl std::fmt::Display for WindowSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{})", self.cols, self.rows)
    }
}
