use bytes::{BufMut, Bytes, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use crate::{
    constants::{COMMAND_LEN, IAC, WILL_ECHO},
    encoding::{decode_text, encode_text},
    error::SessionError,
    Result,
};

/// The negotiation message sent once after connecting: `IAC WILL ECHO`.
#[must_use]
pub fn build_negotiation() -> Bytes {
    Bytes::from_static(&WILL_ECHO)
}

/// Removes every embedded command sequence from `raw`.
///
/// An `IAC` byte followed by at least two more bytes starts a command, and all
/// three bytes are skipped. An `IAC` closer than that to the end of the buffer
/// is kept as data. Skipped bytes are never inspected again, so `IAC IAC x`
/// is consumed as one command.
#[must_use]
pub fn strip_commands(raw: &[u8]) -> Bytes {
    let mut output = BytesMut::with_capacity(raw.len());
    let mut byte_index = 0;

    while byte_index < raw.len() {
        if raw[byte_index] == IAC && byte_index + 2 < raw.len() {
            byte_index += COMMAND_LEN;
        } else {
            output.put_u8(raw[byte_index]);
            byte_index += 1;
        }
    }

    output.freeze()
}

/// Outbound items understood by [`MudCodec`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientMessage {
    /// Tell the server the client will echo locally.
    Negotiate,
    /// A command line; the codec appends CR LF.
    Command(String),
}

/// Implements a Tokio codec for the MUD session protocol. Inbound bytes come out
/// as text with command sequences removed; outbound items are written as
/// negotiation bytes or EUC-KR lines.
///
/// Each call to `decode` consumes the whole buffer. A command sequence split
/// across two reads is not reassembled.
#[derive(Debug, Default, Clone, Copy)]
pub struct MudCodec;

impl MudCodec {
    #[must_use]
    pub fn new() -> Self {
        MudCodec
    }
}

impl Decoder for MudCodec {
    type Item = String;
    type Error = SessionError;

    fn decode(&mut self, buffer: &mut BytesMut) -> Result<Option<Self::Item>> {
        if buffer.is_empty() {
            return Ok(None);
        }

        let raw = buffer.split();
        let data = strip_commands(&raw);
        tracing::trace!(received = raw.len(), data = data.len(), "stripped command sequences");

        if data.is_empty() {
            return Ok(None);
        }

        Ok(Some(decode_text(&data)))
    }
}

impl Encoder<ClientMessage> for MudCodec {
    type Error = SessionError;

    fn encode(&mut self, message: ClientMessage, buffer: &mut BytesMut) -> Result<()> {
        match message {
            ClientMessage::Negotiate => buffer.extend_from_slice(&build_negotiation()),
            ClientMessage::Command(command) => buffer.extend_from_slice(&encode_text(&command)?),
        }

        Ok(())
    }
}
