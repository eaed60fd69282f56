#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]

// RFC 854 https://tools.ietf.org/html/rfc854
//
// Only the subset MUD servers in the EUC-KR world actually need: one WILL ECHO
// on connect, and three-byte command sequences dropped from the data stream.

/// Strips command sequences and builds negotiation bytes; also a Tokio codec.
pub mod codec;
/// Connection target and tuning, loadable from TOML.
pub mod config;
/// Various byte or byte sequences used in the Telnet protocol.
pub mod constants;
/// EUC-KR text conversion.
pub mod encoding;
/// Errors raised by the session, its transport and its codec.
pub mod error;
/// The connect / send / receive / disconnect API front-ends bind to.
pub mod session;
/// Raw byte stream I/O.
pub mod transport;

pub use codec::{build_negotiation, strip_commands, ClientMessage, MudCodec};
pub use config::SessionConfig;
pub use encoding::{decode_text, encode_text};
pub use error::SessionError;
pub use session::{ConnectionState, Session};
pub use transport::{Connector, TcpConnector, Transport};

type Result<T> = std::result::Result<T, SessionError>;
