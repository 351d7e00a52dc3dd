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


//! Outbound character sets

use crate::{ClientError, Result};
use bbsterm_telnetcodec::Codepage;

/// The encoding applied to text passed to `send`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Charset {
    /// UTF-8; every character is representable
    #[default]
    Utf8,
    /// IBM PC code page 437
    Cp437,
    /// ISO 8859-1
    Latin1,
}

impl Charset {
    /// Encodes `text`, failing on the first character the charset cannot represent.
    pub fn encode(&self, text: &str) -> Result<Vec<u8>> {
        let codepage = match self {
            Charset::Utf8 => return Ok(text.as_bytes().to_vec()),
            Charset::Cp437 => Codepage::Cp437,
            Charset::Latin1 => Codepage::Latin1,
        };
        text.chars()
            .map(|character| {
                codepage
                    .encode_char(character)
                    .ok_or(ClientError::Encoding { character })
            })
            .collect()
    }
}
