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


//! Client configuration

use crate::Charset;
use bbsterm_telnetcodec::Codepage;
use bbsterm_telnetcodec::naws::WindowSize;
use bbsterm_terminal::EmulatorConfig;
use std::time::Duration;

/// Telnet client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server hostname or IP address
    pub host: String,

    /// Server port
    pub port: u16,

    /// Terminal type reported in reply to `SB TTYPE SEND`
    pub terminal_type: String,

    /// Window size reported through NAWS and cursor position reports
    pub window_size: WindowSize,

    /// Connection timeout
    pub connect_timeout: Duration,

    /// Read chunk size for incoming data
    pub buffer_size: usize,

    /// Encoding of outbound text
    pub charset: Charset,

    /// Decoding of inbound bytes
    pub codepage: Codepage,

    /// Interpret blink as a bright background
    pub ice_colors: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 23,
            terminal_type: "ANSI".to_string(),
            window_size: WindowSize::new(80, 24),
            connect_timeout: Duration::from_secs(30),
            buffer_size: 4096,
            charset: Charset::Utf8,
            codepage: Codepage::Cp437,
            ice_colors: true,
        }
    }
}

impl ClientConfig {
    /// Create a new client configuration with the given host and port
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    /// Set the terminal type
    pub fn with_terminal_type(mut self, terminal_type: impl Into<String>) -> Self {
        self.terminal_type = terminal_type.into();
        self
    }

    /// Set the terminal size
    pub fn with_window_size(mut self, cols: u16, rows: u16) -> Self {
        self.window_size = WindowSize::new(cols, rows);
        self
    }

    /// Set the connection timeout
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the read chunk size; values below 1 become 1
    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size.max(1);
        self
    }

    /// Set the outbound character set
    pub fn with_charset(mut self, charset: Charset) -> Self {
        self.charset = charset;
        self
    }

    /// Set the inbound code page
    pub fn with_codepage(mut self, codepage: Codepage) -> Self {
        self.codepage = codepage;
        self
    }

    /// Enable or disable iCE colors
    pub fn with_ice_colors(mut self, enabled: bool) -> Self {
        self.ice_colors = enabled;
        self
    }

    /// Get the server address as a string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Emulator settings matching this configuration
    pub fn emulator_config(&self) -> EmulatorConfig {
        EmulatorConfig::new(
            usize::from(self.window_size.cols),
            usize::from(self.window_size.rows),
        )
        .with_ice_colors(self.ice_colors)
    }
}
