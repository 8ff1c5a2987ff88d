//! Newline-delimited framing
//!
//! Wraps `LinesCodec` so that every frame is decoded into a protocol
//! message. A line that fails to decode is handed up as `Err(ProtocolError)`
//! instead of failing the stream; only I/O errors and over-long lines end it.

use std::fmt::Display;
use std::io;
use std::marker::PhantomData;
use std::str::FromStr;

use bytes::BytesMut;
use tokio_util::codec::{Decoder, Encoder, LinesCodec, LinesCodecError};

use crate::error::{CodecError, ProtocolError};
use crate::message::{ClientMessage, ServerMessage};

/// Longest line either side will buffer
pub const MAX_LINE_LENGTH: usize = 4096;

/// Line codec decoding frames as `D` and encoding `E`
#[derive(Debug)]
pub struct LineCodec<D, E> {
    lines: LinesCodec,
    _messages: PhantomData<fn(E) -> D>,
}

/// Codec used by the server: reads client messages, writes server messages
pub type ServerCodec = LineCodec<ClientMessage, ServerMessage>;

/// Codec used by the player client: reads server messages, writes client messages
pub type ClientCodec = LineCodec<ServerMessage, ClientMessage>;

impl<D, E> LineCodec<D, E> {
    pub fn new() -> Self {
        Self {
            lines: LinesCodec::new_with_max_length(MAX_LINE_LENGTH),
            _messages: PhantomData,
        }
    }
}

impl<D, E> Default for LineCodec<D, E> {
    fn default() -> Self {
        Self::new()
    }
}

/// Turn one `LinesCodec` result into a decoded frame
///
/// `LinesCodec` has already consumed a line that is not UTF-8, so it is
/// reported as a protocol error and the stream carries on.
fn parse_line<D>(
    line: Result<Option<String>, LinesCodecError>,
) -> Result<Option<Result<D, ProtocolError>>, CodecError>
where
    D: FromStr<Err = ProtocolError>,
{
    match line {
        Ok(line) => Ok(line.map(|line| line.parse())),
        Err(LinesCodecError::Io(e)) if e.kind() == io::ErrorKind::InvalidData => {
            Ok(Some(Err(ProtocolError::InvalidUtf8)))
        }
        Err(e) => Err(e.into()),
    }
}

impl<D, E> Decoder for LineCodec<D, E>
where
    D: FromStr<Err = ProtocolError>,
{
    type Item = Result<D, ProtocolError>;
    type Error = CodecError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        parse_line(self.lines.decode(src))
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        parse_line(self.lines.decode_eof(src))
    }
}

impl<D, E> Encoder<E> for LineCodec<D, E>
where
    E: Display,
{
    type Error = CodecError;

    fn encode(&mut self, item: E, dst: &mut BytesMut) -> Result<(), Self::Error> {
        self.lines.encode(item.to_string(), dst)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Ball;

    #[test]
    fn test_decode_strips_carriage_return() {
        let mut codec = ServerCodec::new();
        let mut buf = BytesMut::from("HELLO|Ana\r\n");
        let msg = codec.decode(&mut buf).unwrap().unwrap().unwrap();
        assert_eq!(
            msg,
            ClientMessage::Hello {
                name: "Ana".to_string()
            }
        );
    }

    #[test]
    fn test_decode_waits_for_newline() {
        let mut codec = ServerCodec::new();
        let mut buf = BytesMut::from("BINGO_CL");
        assert!(codec.decode(&mut buf).unwrap().is_none());
        buf.extend_from_slice(b"AIM|Ana\n");
        assert!(codec.decode(&mut buf).unwrap().unwrap().is_ok());
    }

    #[test]
    fn test_malformed_line_is_item_not_error() {
        let mut codec = ServerCodec::new();
        let mut buf = BytesMut::from("what is this\nHELLO|Bo\n");
        let first = codec.decode(&mut buf).unwrap().unwrap();
        assert!(first.is_err());
        let second = codec.decode(&mut buf).unwrap().unwrap();
        assert!(second.is_ok());
    }

    #[test]
    fn test_invalid_utf8_line_is_item_not_error() {
        let mut codec = ServerCodec::new();
        let mut buf = BytesMut::from(&b"\xff\xfe garbage\nBINGO_CLAIM|Bo\n"[..]);
        let first = codec.decode(&mut buf).unwrap().unwrap();
        assert_eq!(first, Err(ProtocolError::InvalidUtf8));
        let second = codec.decode(&mut buf).unwrap().unwrap();
        assert_eq!(
            second,
            Ok(ClientMessage::BingoClaim {
                name: "Bo".to_string()
            })
        );
    }

    #[test]
    fn test_overlong_line_is_error() {
        let mut codec = ServerCodec::new();
        let mut buf = BytesMut::from("x".repeat(MAX_LINE_LENGTH + 10).as_str());
        assert!(matches!(
            codec.decode(&mut buf),
            Err(CodecError::LineTooLong)
        ));
    }

    #[test]
    fn test_encode_appends_newline() {
        let mut codec = ServerCodec::new();
        let mut buf = BytesMut::new();
        codec
            .encode(ServerMessage::Ball(Ball::new(61).unwrap()), &mut buf)
            .unwrap();
        assert_eq!(&buf[..], b"BALL|O61\n");
    }
}
