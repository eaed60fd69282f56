use std::io;

use thiserror::Error;

use crate::constants::MAX_READ_SIZE;

/// Every failure a session, its transport or its codec can report.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The TCP connection could not be established (unreachable host, refused
    /// connection, name resolution, connect timeout).
    #[error("could not connect to {host}:{port}: {source}")]
    ConnectionFailure {
        host: String,
        port: u16,
        #[source]
        source: io::Error,
    },
    /// An operation that needs a live connection was called while disconnected.
    #[error("not connected to a server")]
    NotConnected,
    /// `connect` was called on a session that is already connected.
    #[error("already connected to a server")]
    AlreadyConnected,
    #[error("write to server failed: {0}")]
    WriteFailure(#[source] io::Error),
    #[error("read from server failed: {0}")]
    ReadFailure(#[source] io::Error),
    /// The text contains a character EUC-KR has no mapping for.
    #[error("cannot encode {character:?} as EUC-KR")]
    EncodingFailure { character: char },
    /// A read size of zero would read nothing from a live stream, and the
    /// buffer for one above the cap is never allocated.
    #[error("read size must be between 1 and {max} bytes, got {0}", max = MAX_READ_SIZE)]
    InvalidReadSize(usize),
    #[error("invalid session configuration: {0}")]
    Config(#[from] toml::de::Error),
    /// Raised by `tokio_util::codec::Framed` when `MudCodec` is driven through
    /// it rather than through a `Session`.
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl SessionError {
    pub(crate) fn connection_failure(host: &str, port: u16, source: io::Error) -> Self {
        Self::ConnectionFailure { host: host.to_string(), port, source }
    }

    /// Whether the error came from the network rather than from misuse of the
    /// session or from unencodable input.
    #[must_use]
    pub fn is_io(&self) -> bool {
        matches!(
            self,
            Self::ConnectionFailure { .. }
                | Self::WriteFailure(_)
                | Self::ReadFailure(_)
                | Self::Io(_)
        )
    }
}
