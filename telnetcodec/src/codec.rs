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


use super::{CodecError, TelnetEvent, TelnetFrame, TelnetOption, consts};
use crate::args::TelnetArgument;
use crate::frame::TelnetCommand;
use bytes::{Buf, BufMut, BytesMut};
use tokio_util::codec::{Decoder, Encoder};
use tracing::{trace, warn};

/// Upper bound on a buffered subnegotiation payload. Longer payloads are dropped.
pub const MAX_SUBNEGOTIATION_LENGTH: usize = 8192;

/// A codec for the Telnet protocol.
///
/// `TelnetCodec` separates display data from `IAC` command sequences. The decoder is a
/// byte-level state machine whose state survives between calls, so a command split
/// across two reads (`IAC` in one, `DO NAWS` in the next) is reassembled rather than
/// leaking into the data stream. An unterminated subnegotiation simply waits for more
/// input; nothing of it is forwarded.
///
/// The codec does not answer negotiation on its own; pair it with a
/// [`Negotiator`](crate::Negotiator).
#[derive(Debug)]
pub struct TelnetCodec {
    decoder_buffer: BytesMut,
    decoder_state: DecoderState,
}

impl TelnetCodec {
    /// Creates a new `TelnetCodec` in the plain data state.
    pub fn new() -> TelnetCodec {
        TelnetCodec::default()
    }

    /// Returns true when the decoder sits between two complete frames.
    pub fn is_idle(&self) -> bool {
        self.decoder_state == DecoderState::NormalData
    }

    /// Drops any partially decoded command and returns to the plain data state.
    pub fn reset(&mut self) {
        self.decoder_buffer.clear();
        self.decoder_state = DecoderState::NormalData;
    }

    fn finish_subnegotiation(&mut self, option: u8) -> TelnetEvent {
        self.decoder_state = DecoderState::NormalData;
        let option = TelnetOption::from_u8(option);
        let payload = self.decoder_buffer.split();
        trace!("Received subnegotiation for {} ({} bytes)", option, payload.len());
        TelnetEvent::Subnegotiate(TelnetArgument::parse(option, payload))
    }
}

impl Default for TelnetCodec {
    fn default() -> Self {
        TelnetCodec {
            decoder_buffer: BytesMut::new(),
            decoder_state: DecoderState::NormalData,
        }
    }
}

impl Decoder for TelnetCodec {
    type Item = TelnetEvent;
    type Error = CodecError;

    /// Decodes the next [`TelnetEvent`] from `src`.
    ///
    /// # States
    /// - `NormalData`: takes every byte up to the next IAC as one `Data` run.
    /// - `InterpretAsCommand`: `IAC IAC` yields a literal 255; `DO`/`DONT`/`WILL`/`WONT`
    ///   wait for an option byte; `SB` starts a subnegotiation; anything else is a
    ///   two byte command.
    /// - `Subnegotiate*`: collects the payload until `IAC SE`, collapsing `IAC IAC`.
    ///   Any other byte after IAC aborts the subnegotiation.
    ///
    /// Returns `Ok(None)` once `src` is exhausted; partial state is retained.
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<TelnetEvent>, Self::Error> {
        while src.has_remaining() {
            if self.decoder_state == DecoderState::NormalData {
                let run = src
                    .iter()
                    .position(|byte| *byte == consts::IAC)
                    .unwrap_or(src.len());
                if run > 0 {
                    return Ok(Some(TelnetEvent::Data(src.split_to(run).freeze())));
                }
            }

            let byte = src.get_u8();
            match (self.decoder_state, byte) {
                (DecoderState::NormalData, _) => {
                    // Only reachable for IAC, every other byte was taken as a run above.
                    self.decoder_state = DecoderState::InterpretAsCommand;
                }
                (DecoderState::InterpretAsCommand, consts::IAC) => {
                    self.decoder_state = DecoderState::NormalData;
                    return Ok(Some(TelnetEvent::Data(bytes::Bytes::from_static(&[
                        consts::IAC,
                    ]))));
                }
                (DecoderState::InterpretAsCommand, consts::DO) => {
                    self.decoder_state = DecoderState::NegotiateDo;
                }
                (DecoderState::InterpretAsCommand, consts::DONT) => {
                    self.decoder_state = DecoderState::NegotiateDont;
                }
                (DecoderState::InterpretAsCommand, consts::WILL) => {
                    self.decoder_state = DecoderState::NegotiateWill;
                }
                (DecoderState::InterpretAsCommand, consts::WONT) => {
                    self.decoder_state = DecoderState::NegotiateWont;
                }
                (DecoderState::InterpretAsCommand, consts::SB) => {
                    self.decoder_state = DecoderState::Subnegotiate;
                }
                (DecoderState::InterpretAsCommand, _) => {
                    self.decoder_state = DecoderState::NormalData;
                    let command = TelnetCommand::from_u8(byte);
                    if let TelnetCommand::Unknown(_) = command {
                        warn!("Received Unknown Command {:#X}", byte);
                    }
                    return Ok(Some(TelnetEvent::Command(command)));
                }
                (DecoderState::NegotiateDo, _) => {
                    self.decoder_state = DecoderState::NormalData;
                    return Ok(Some(TelnetEvent::Do(byte.into())));
                }
                (DecoderState::NegotiateDont, _) => {
                    self.decoder_state = DecoderState::NormalData;
                    return Ok(Some(TelnetEvent::Dont(byte.into())));
                }
                (DecoderState::NegotiateWill, _) => {
                    self.decoder_state = DecoderState::NormalData;
                    return Ok(Some(TelnetEvent::Will(byte.into())));
                }
                (DecoderState::NegotiateWont, _) => {
                    self.decoder_state = DecoderState::NormalData;
                    return Ok(Some(TelnetEvent::Wont(byte.into())));
                }
                (DecoderState::Subnegotiate, _) => {
                    self.decoder_buffer.clear();
                    self.decoder_state = DecoderState::SubnegotiateArgument(byte);
                }
                (DecoderState::SubnegotiateArgument(option), consts::IAC) => {
                    self.decoder_state = DecoderState::SubnegotiateArgumentIAC(option);
                }
                (DecoderState::SubnegotiateArgument(option), _) => {
                    if self.decoder_buffer.len() >= MAX_SUBNEGOTIATION_LENGTH {
                        warn!(
                            "Subnegotiation for option {} exceeded {} bytes. Aborting",
                            option, MAX_SUBNEGOTIATION_LENGTH
                        );
                        self.reset();
                        continue;
                    }
                    self.decoder_buffer.put_u8(byte);
                }
                (DecoderState::SubnegotiateArgumentIAC(option), consts::IAC) => {
                    self.decoder_state = DecoderState::SubnegotiateArgument(option);
                    self.decoder_buffer.put_u8(consts::IAC);
                }
                (DecoderState::SubnegotiateArgumentIAC(option), consts::SE) => {
                    return Ok(Some(self.finish_subnegotiation(option)));
                }
                (DecoderState::SubnegotiateArgumentIAC(_), _) => {
                    warn!(
                        "Received Unknown or invalid Command during Subnegotiation {:#X}. Aborting",
                        byte
                    );
                    self.reset();
                }
            }
        }
        Ok(None)
    }
}

impl Encoder<&[u8]> for TelnetCodec {
    type Error = CodecError;

    /// Encodes raw display bytes, doubling every IAC.
    fn encode(&mut self, item: &[u8], dst: &mut BytesMut) -> Result<(), Self::Error> {
        dst.reserve(item.len());
        for byte in item {
            if *byte == consts::IAC {
                dst.put_u8(consts::IAC);
            }
            dst.put_u8(*byte);
        }
        Ok(())
    }
}

impl Encoder<TelnetFrame> for TelnetCodec {
    type Error = CodecError;

    /// Encodes a `TelnetFrame` into its wire bytes.
    ///
    /// Subnegotiation payloads are IAC-escaped and wrapped in `IAC SB <option>` ... `IAC SE`.
    fn encode(&mut self, item: TelnetFrame, dst: &mut BytesMut) -> Result<(), Self::Error> {
        match item {
            TelnetFrame::Data(byte) => {
                dst.reserve(2);
                if byte == consts::IAC {
                    dst.put_u8(consts::IAC);
                }
                dst.put_u8(byte);
            }
            TelnetFrame::Command(command) => {
                dst.reserve(2);
                dst.put_u8(consts::IAC);
                dst.put_u8(command.to_u8());
            }
            TelnetFrame::Do(option) => put_negotiation(dst, consts::DO, option),
            TelnetFrame::Dont(option) => put_negotiation(dst, consts::DONT, option),
            TelnetFrame::Will(option) => put_negotiation(dst, consts::WILL, option),
            TelnetFrame::Wont(option) => put_negotiation(dst, consts::WONT, option),
            TelnetFrame::Subnegotiate(argument) => {
                let mut payload = BytesMut::with_capacity(argument.len());
                argument.encode(&mut payload)?;
                dst.reserve(payload.len() + 5);
                dst.put_u8(consts::IAC);
                dst.put_u8(consts::SB);
                dst.put_u8(argument.option().to_u8());
                for byte in payload {
                    if byte == consts::IAC {
                        dst.put_u8(consts::IAC);
                    }
                    dst.put_u8(byte);
                }
                dst.put_u8(consts::IAC);
                dst.put_u8(consts::SE);
            }
        }
        Ok(())
    }
}

fn put_negotiation(dst: &mut BytesMut, verb: u8, option: TelnetOption) {
    dst.reserve(3);
    dst.put_u8(consts::IAC);
    dst.put_u8(verb);
    dst.put_u8(option.to_u8());
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum DecoderState {
    NormalData,
    InterpretAsCommand,
    NegotiateDo,
    NegotiateDont,
    NegotiateWill,
    NegotiateWont,
    Subnegotiate,
    SubnegotiateArgument(u8),
    SubnegotiateArgumentIAC(u8),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::naws::WindowSize;
    use crate::args::ttype::TerminalType;
    use bytes::Bytes;
    use tracing_test::traced_test;

    fn collect_all(codec: &mut TelnetCodec, src: &mut BytesMut) -> Vec<TelnetEvent> {
        let mut events = Vec::new();
        while let Some(event) = codec.decode(src).unwrap() {
            events.push(event);
        }
        events
    }

    fn encode_frame(frame: TelnetFrame) -> BytesMut {
        let mut codec = TelnetCodec::new();
        let mut dst = BytesMut::new();
        codec.encode(frame, &mut dst).unwrap();
        dst
    }

    // ===== Decoding =====

    #[test]
    fn decode_plain_data_as_one_run() {
        let mut codec = TelnetCodec::new();
        let mut src = BytesMut::from(&b"Login:\r\n"[..]);
        let events = collect_all(&mut codec, &mut src);
        assert_eq!(events, vec![TelnetEvent::Data(Bytes::from_static(b"Login:\r\n"))]);
        assert!(src.is_empty());
    }

    #[test]
    fn decode_empty_buffer() {
        let mut codec = TelnetCodec::new();
        let mut src = BytesMut::new();
        assert_eq!(codec.decode(&mut src).unwrap(), None);
    }

    #[test]
    fn decode_iac_iac_as_data() {
        let mut codec = TelnetCodec::new();
        let mut src = BytesMut::from(&[b'a', consts::IAC, consts::IAC, b'b'][..]);
        let events = collect_all(&mut codec, &mut src);
        assert_eq!(
            events,
            vec![
                TelnetEvent::Data(Bytes::from_static(b"a")),
                TelnetEvent::Data(Bytes::from_static(&[255])),
                TelnetEvent::Data(Bytes::from_static(b"b")),
            ]
        );
    }

    #[test]
    fn decode_negotiation_verbs() {
        let mut codec = TelnetCodec::new();
        let mut src = BytesMut::from(
            &[
                consts::IAC,
                consts::DO,
                consts::option::NAWS,
                consts::IAC,
                consts::DONT,
                consts::option::ECHO,
                consts::IAC,
                consts::WILL,
                consts::option::SGA,
                consts::IAC,
                consts::WONT,
                42,
            ][..],
        );
        assert_eq!(
            collect_all(&mut codec, &mut src),
            vec![
                TelnetEvent::Do(TelnetOption::NAWS),
                TelnetEvent::Dont(TelnetOption::Echo),
                TelnetEvent::Will(TelnetOption::SuppressGoAhead),
                TelnetEvent::Wont(TelnetOption::Unknown(42)),
            ]
        );
    }

    #[test]
    fn decode_two_byte_commands() {
        let mut codec = TelnetCodec::new();
        let mut src = BytesMut::from(&[consts::IAC, consts::GA, consts::IAC, consts::NOP][..]);
        assert_eq!(
            collect_all(&mut codec, &mut src),
            vec![
                TelnetEvent::Command(TelnetCommand::GoAhead),
                TelnetEvent::Command(TelnetCommand::NoOperation),
            ]
        );
    }

    #[test]
    #[traced_test]
    fn decode_unknown_command_is_logged() {
        let mut codec = TelnetCodec::new();
        let mut src = BytesMut::from(&[consts::IAC, 0x10, b'x'][..]);
        assert_eq!(
            collect_all(&mut codec, &mut src),
            vec![
                TelnetEvent::Command(TelnetCommand::Unknown(0x10)),
                TelnetEvent::Data(Bytes::from_static(b"x")),
            ]
        );
        assert!(logs_contain("Received Unknown Command"));
    }

    #[test]
    fn decode_data_with_interspersed_commands() {
        let mut codec = TelnetCodec::new();
        let mut src = BytesMut::from(
            &[
                b'H',
                b'i',
                consts::IAC,
                consts::WILL,
                consts::option::ECHO,
                b'!',
            ][..],
        );
        assert_eq!(
            collect_all(&mut codec, &mut src),
            vec![
                TelnetEvent::Data(Bytes::from_static(b"Hi")),
                TelnetEvent::Will(TelnetOption::Echo),
                TelnetEvent::Data(Bytes::from_static(b"!")),
            ]
        );
    }

    #[test]
    fn decode_subnegotiation_ttype_send() {
        let mut codec = TelnetCodec::new();
        let mut src = BytesMut::from(
            &[
                consts::IAC,
                consts::SB,
                consts::option::TTYPE,
                consts::ttype::SEND,
                consts::IAC,
                consts::SE,
            ][..],
        );
        assert_eq!(
            collect_all(&mut codec, &mut src),
            vec![TelnetEvent::Subnegotiate(TelnetArgument::TerminalType(
                TerminalType::Send
            ))]
        );
        assert!(codec.is_idle());
    }

    #[test]
    fn decode_subnegotiation_with_escaped_iac() {
        let mut codec = TelnetCodec::new();
        let mut src = BytesMut::from(
            &[
                consts::IAC,
                consts::SB,
                200,
                1,
                consts::IAC,
                consts::IAC,
                2,
                consts::IAC,
                consts::SE,
            ][..],
        );
        assert_eq!(
            collect_all(&mut codec, &mut src),
            vec![TelnetEvent::Subnegotiate(TelnetArgument::Unknown(
                TelnetOption::Unknown(200),
                BytesMut::from(&[1, consts::IAC, 2][..])
            ))]
        );
    }

    #[test]
    #[traced_test]
    fn decode_subnegotiation_invalid_command_aborts() {
        let mut codec = TelnetCodec::new();
        let mut src = BytesMut::from(
            &[
                consts::IAC,
                consts::SB,
                consts::option::NAWS,
                0,
                consts::IAC,
                consts::NOP,
                b'o',
                b'k',
            ][..],
        );
        assert_eq!(
            collect_all(&mut codec, &mut src),
            vec![TelnetEvent::Data(Bytes::from_static(b"ok"))]
        );
        assert!(logs_contain("Aborting"));
    }

    #[test]
    fn decode_oversized_subnegotiation_is_dropped() {
        let mut codec = TelnetCodec::new();
        let mut src = BytesMut::new();
        src.put_slice(&[consts::IAC, consts::SB, 200]);
        src.put_bytes(b'z', MAX_SUBNEGOTIATION_LENGTH + 1);
        assert!(collect_all(&mut codec, &mut src).is_empty());
        assert!(codec.is_idle());
    }

    // ===== Streaming =====

    #[test]
    fn decode_negotiation_split_across_reads() {
        let mut codec = TelnetCodec::new();
        let mut first = BytesMut::from(&[b'a', consts::IAC][..]);
        assert_eq!(
            collect_all(&mut codec, &mut first),
            vec![TelnetEvent::Data(Bytes::from_static(b"a"))]
        );
        assert!(!codec.is_idle());

        let mut second = BytesMut::from(&[consts::DO][..]);
        assert!(collect_all(&mut codec, &mut second).is_empty());

        let mut third = BytesMut::from(&[consts::option::NAWS, b'b'][..]);
        assert_eq!(
            collect_all(&mut codec, &mut third),
            vec![
                TelnetEvent::Do(TelnetOption::NAWS),
                TelnetEvent::Data(Bytes::from_static(b"b")),
            ]
        );
    }

    #[test]
    fn decode_unterminated_subnegotiation_waits() {
        let mut codec = TelnetCodec::new();
        let mut first = BytesMut::from(&[consts::IAC, consts::SB, consts::option::NAWS, 0, 80][..]);
        assert!(collect_all(&mut codec, &mut first).is_empty());

        let mut second = BytesMut::from(&[0, 24, consts::IAC][..]);
        assert!(collect_all(&mut codec, &mut second).is_empty());

        let mut third = BytesMut::from(&[consts::SE, b'!'][..]);
        assert_eq!(
            collect_all(&mut codec, &mut third),
            vec![
                TelnetEvent::Subnegotiate(TelnetArgument::NAWSWindowSize(WindowSize::new(80, 24))),
                TelnetEvent::Data(Bytes::from_static(b"!")),
            ]
        );
    }

    #[test]
    fn reset_discards_partial_state() {
        let mut codec = TelnetCodec::new();
        let mut src = BytesMut::from(&[consts::IAC, consts::SB, 1, 2][..]);
        collect_all(&mut codec, &mut src);
        codec.reset();
        let mut src = BytesMut::from(&b"clean"[..]);
        assert_eq!(
            collect_all(&mut codec, &mut src),
            vec![TelnetEvent::Data(Bytes::from_static(b"clean"))]
        );
    }

    // ===== Encoding =====

    #[test]
    fn encode_data_iac_is_escaped() {
        assert_eq!(&encode_frame(TelnetFrame::Data(consts::IAC))[..], &[255, 255]);
        assert_eq!(&encode_frame(TelnetFrame::Data(b'A'))[..], b"A");
    }

    #[test]
    fn encode_raw_slice_escapes_iac() {
        let mut codec = TelnetCodec::new();
        let mut dst = BytesMut::new();
        codec.encode(&[b'x', 255, b'y'][..], &mut dst).unwrap();
        assert_eq!(&dst[..], &[b'x', 255, 255, b'y']);
    }

    #[test]
    fn encode_negotiation() {
        assert_eq!(
            &encode_frame(TelnetFrame::Will(TelnetOption::NAWS))[..],
            &[consts::IAC, consts::WILL, consts::option::NAWS]
        );
        assert_eq!(
            &encode_frame(TelnetFrame::Dont(TelnetOption::Unknown(7)))[..],
            &[consts::IAC, consts::DONT, 7]
        );
    }

    #[test]
    fn encode_command() {
        assert_eq!(
            &encode_frame(TelnetFrame::Command(TelnetCommand::AreYouThere))[..],
            &[consts::IAC, consts::AYT]
        );
    }

    #[test]
    fn encode_naws_subnegotiation() {
        let frame = TelnetFrame::Subnegotiate(TelnetArgument::NAWSWindowSize(WindowSize::default()));
        assert_eq!(
            &encode_frame(frame)[..],
            &[
                consts::IAC,
                consts::SB,
                consts::option::NAWS,
                0,
                80,
                0,
                24,
                consts::IAC,
                consts::SE
            ]
        );
    }

    #[test]
    fn encode_subnegotiation_escapes_iac_in_payload() {
        let frame = TelnetFrame::Subnegotiate(TelnetArgument::NAWSWindowSize(WindowSize::new(
            255, 24,
        )));
        assert_eq!(
            &encode_frame(frame)[..],
            &[
                consts::IAC,
                consts::SB,
                consts::option::NAWS,
                0,
                255,
                255,
                0,
                24,
                consts::IAC,
                consts::SE
            ]
        );
    }

    #[test]
    fn encode_then_decode_subnegotiation() {
        let argument = TelnetArgument::TerminalType(TerminalType::Is("ANSI".to_string()));
        let mut wire = encode_frame(TelnetFrame::Subnegotiate(argument.clone()));
        let mut codec = TelnetCodec::new();
        assert_eq!(
            collect_all(&mut codec, &mut wire),
            vec![TelnetEvent::Subnegotiate(argument)]
        );
    }
}
