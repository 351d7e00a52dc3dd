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
use crate::args::TelnetArgument;
use crate::consts;

/// Two byte `IAC <command>` sequences that carry no option.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TelnetCommand {
    /// No Operation
    NoOperation,
    /// End of urgent Data Stream
    DataMark,
    /// Operator pressed the Break key or the Attention key.
    Break,
    /// Interrupt current process.
    InterruptProcess,
    /// Cancel output from the current process.
    AbortOutput,
    /// Request acknowledgment.
    AreYouThere,
    /// Request that the operator erase the previous character.
    EraseCharacter,
    /// Request that the operator erase the previous line.
    EraseLine,
    /// End of input for half-duplex connections.
    GoAhead,
    /// End of Record - marks the end of a prompt
    EndOfRecord,
    /// A command byte this codec does not know
    Unknown(u8),
}

impl TelnetCommand {
    /// Maps a command byte to its `TelnetCommand`.
    pub fn from_u8(byte: u8) -> Self {
        match byte {
            consts::NOP => TelnetCommand::NoOperation,
            consts::DM => TelnetCommand::DataMark,
            consts::BRK => TelnetCommand::Break,
            consts::IP => TelnetCommand::InterruptProcess,
            consts::AO => TelnetCommand::AbortOutput,
            consts::AYT => TelnetCommand::AreYouThere,
            consts::EC => TelnetCommand::EraseCharacter,
            consts::EL => TelnetCommand::EraseLine,
            consts::GA => TelnetCommand::GoAhead,
            consts::EOR => TelnetCommand::EndOfRecord,
            byte => TelnetCommand::Unknown(byte),
        }
    }

    /// The wire byte following IAC.
    pub fn to_u8(&self) -> u8 {
        match self {
            TelnetCommand::NoOperation => consts::NOP,
            TelnetCommand::DataMark => consts::DM,
            TelnetCommand::Break => consts::BRK,
            TelnetCommand::InterruptProcess => consts::IP,
            TelnetCommand::AbortOutput => consts::AO,
            TelnetCommand::AreYouThere => consts::AYT,
            TelnetCommand::EraseCharacter => consts::EC,
            TelnetCommand::EraseLine => consts::EL,
            TelnetCommand::GoAhead => consts::GA,
            TelnetCommand::EndOfRecord => consts::EOR,
            TelnetCommand::Unknown(byte) => *byte,
        }
    }
}

///
/// Outbound Telnet frames accepted by the [`TelnetCodec`](crate::TelnetCodec) encoder.
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TelnetFrame {
    /// A single data byte; IAC is doubled on the wire.
    Data(u8),
    /// A two byte command
    Command(TelnetCommand),
    /// Request the peer perform an option
    Do(TelnetOption),
    /// Request the peer stop performing an option
    Dont(TelnetOption),
    /// Offer to perform an option
    Will(TelnetOption),
    /// Refuse to perform an option
    Wont(TelnetOption),
    /// `IAC SB <option> <payload> IAC SE`
    Subnegotiate(TelnetArgument),
}
