use std::fmt;

use bytes::BytesMut;
use tokio_util::codec::{Decoder, Encoder};

use crate::{
    codec::{ClientMessage, MudCodec},
    config::{check_read_size, SessionConfig},
    constants::DEFAULT_READ_SIZE,
    error::SessionError,
    transport::{Connector, TcpConnector, Transport},
    Result,
};

/// Whether a [`Session`] currently holds an open transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connected,
}

/// A single connection to a MUD server.
///
/// Every operation that touches the network takes `&mut self`, so calls on one
/// session can never overlap. A caller that shares a session between tasks has
/// to wrap it in a mutex, which serialises the calls.
///
/// I/O failures are handed back unchanged. The session never reconnects or
/// disconnects on its own; after a failed `send` or `receive` it is still
/// `Connected` until the caller calls [`Session::disconnect`].
pub struct Session<C: Connector = TcpConnector> {
    connector: C,
    codec: MudCodec,
    transport: Option<Transport<C::Stream>>,
    read_size: usize,
}

impl<C: Connector> fmt::Debug for Session<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("state", &self.state())
            .field("peer", &self.peer())
            .field("read_size", &self.read_size)
            .finish_non_exhaustive()
    }
}

impl Session<TcpConnector> {
    #[must_use]
    pub fn new() -> Self {
        Session::with_connector(TcpConnector::default())
    }

    /// A TCP session using the timeout, `TCP_NODELAY` and read size from
    /// `config`. The target host and port are still passed to `connect`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidReadSize`] if `config.read_size` is
    /// unusable.
    pub fn with_config(config: &SessionConfig) -> Result<Self> {
        let connector = TcpConnector::new(config.connect_timeout(), config.nodelay);
        Session::with_connector(connector).read_size(config.read_size)
    }
}

impl Default for Session<TcpConnector> {
    fn default() -> Self {
        Session::new()
    }
}

impl<C: Connector> Session<C> {
    #[must_use]
    pub fn with_connector(connector: C) -> Self {
        Session { connector, codec: MudCodec::new(), transport: None, read_size: DEFAULT_READ_SIZE }
    }

    /// Sets how many bytes [`Session::receive`] asks for.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidReadSize`] if `read_size` is zero or
    /// above [`crate::constants::MAX_READ_SIZE`].
    pub fn read_size(mut self, read_size: usize) -> Result<Self> {
        self.read_size = check_read_size(read_size)?;
        Ok(self)
    }

    #[must_use]
    pub fn state(&self) -> ConnectionState {
        match self.transport {
            Some(_) => ConnectionState::Connected,
            None => ConnectionState::Disconnected,
        }
    }

    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.state() == ConnectionState::Connected
    }

    /// The `host:port` of the current connection.
    #[must_use]
    pub fn peer(&self) -> Option<&str> {
        self.transport.as_ref().map(Transport::peer)
    }

    /// Connects and announces that the client echoes locally (`IAC WILL ECHO`).
    ///
    /// If the announcement cannot be written the new connection is closed
    /// again, so the session is either connected and negotiated or
    /// disconnected.
    ///
    /// # Errors
    ///
    /// [`SessionError::AlreadyConnected`] if a connection is open,
    /// [`SessionError::ConnectionFailure`] if the server cannot be reached and
    /// [`SessionError::WriteFailure`] if the negotiation write fails.
    pub async fn connect(&mut self, host: &str, port: u16) -> Result<()> {
        if self.is_connected() {
            return Err(SessionError::AlreadyConnected);
        }

        let mut transport = Transport::open(&self.connector, host, port).await?;

        let mut negotiation = BytesMut::new();
        self.codec.encode(ClientMessage::Negotiate, &mut negotiation)?;

        if let Err(err) = transport.write(&negotiation).await {
            tracing::debug!(host, port, error = %err, "negotiation failed, closing connection");
            transport.close().await;
            return Err(err);
        }

        self.transport = Some(transport);
        tracing::debug!(host, port, "session connected");

        Ok(())
    }

    /// Closes the connection. Disconnecting a disconnected session does
    /// nothing.
    pub async fn disconnect(&mut self) -> Result<()> {
        if let Some(transport) = self.transport.take() {
            transport.close().await;
            tracing::debug!("session disconnected");
        }

        Ok(())
    }

    /// Sends one command line, terminated with CR LF.
    ///
    /// # Errors
    ///
    /// [`SessionError::NotConnected`] without a connection,
    /// [`SessionError::EncodingFailure`] if `command` has a character EUC-KR
    /// cannot represent (nothing is written) and
    /// [`SessionError::WriteFailure`] if the write fails.
    pub async fn send(&mut self, command: &str) -> Result<()> {
        let transport = self.transport.as_mut().ok_or(SessionError::NotConnected)?;

        let mut line = BytesMut::new();
        self.codec.encode(ClientMessage::Command(command.to_string()), &mut line)?;

        transport.write(&line).await
    }

    /// Reads whatever the server has sent, up to the configured read size.
    ///
    /// # Errors
    ///
    /// See [`Session::receive_up_to`].
    pub async fn receive(&mut self) -> Result<String> {
        self.receive_up_to(self.read_size).await
    }

    /// Reads at most `max_bytes`, drops command sequences and decodes the rest.
    ///
    /// An empty string means either that the server closed the connection or
    /// that the read held nothing but command sequences.
    ///
    /// # Errors
    ///
    /// [`SessionError::InvalidReadSize`] if `max_bytes` is zero or above
    /// [`crate::constants::MAX_READ_SIZE`] (checked before anything else),
    /// [`SessionError::NotConnected`] without a connection and
    /// [`SessionError::ReadFailure`] if the read fails.
    pub async fn receive_up_to(&mut self, max_bytes: usize) -> Result<String> {
        let max_bytes = check_read_size(max_bytes)?;
        let transport = self.transport.as_mut().ok_or(SessionError::NotConnected)?;

        let mut raw = transport.read(max_bytes).await?;
        if raw.is_empty() {
            return Ok(String::new());
        }

        Ok(self.codec.decode(&mut raw)?.unwrap_or_default())
    }
}
