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


//! Client error types

use bbsterm_telnetcodec::CodecError;
use thiserror::Error;

/// Client result type
pub type Result<T> = std::result::Result<T, ClientError>;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server could not be reached (DNS failure, refused, unreachable)
    #[error("Connection failed: {0}")]
    Connection(String),

    /// The connection was not established within the configured timeout
    #[error("Connection timeout")]
    ConnectionTimeout,

    /// The server closed the stream
    #[error("Connection closed by server")]
    StreamClosed,

    /// An operation needed an open connection
    #[error("Not connected")]
    NotConnected,

    /// The outbound character set cannot represent a character
    #[error("Cannot encode character {character:?}")]
    Encoding {
        /// The offending character
        character: char,
    },

    /// I/O error while writing to the server
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Telnet encoding failed
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),
}
