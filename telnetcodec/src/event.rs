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


use super::TelnetOption;
use crate::args::TelnetArgument;
use crate::frame::TelnetCommand;
use bytes::Bytes;

///
/// `TelnetEvent` represents what the decoder found in the inbound stream.
///
/// Display data is delivered in runs: every `Data` event holds the longest stretch of
/// plain bytes the decoder could take before reaching a command or the end of the buffer.
///
#[derive(Clone, Debug, PartialEq)]
pub enum TelnetEvent {
    /// Display data, with `IAC IAC` already collapsed to a single 255
    Data(Bytes),
    /// A two byte command such as `IAC GA`
    Command(TelnetCommand),
    /// The peer asks us to perform an option
    Do(TelnetOption),
    /// The peer asks us not to perform an option
    Dont(TelnetOption),
    /// The peer offers to perform an option
    Will(TelnetOption),
    /// The peer refuses to perform an option
    Wont(TelnetOption),
    /// Subnegotiation Payload
    Subnegotiate(TelnetArgument),
}
