use std::{future::Future, io, time::Duration};

use bytes::BytesMut;
use tokio::{
    io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt},
    net::TcpStream,
};

use crate::{config::check_read_size, error::SessionError, Result};

/// Opens byte streams to a remote host. `Session` goes through this seam so a
/// scripted stream can stand in for a socket.
pub trait Connector {
    type Stream: AsyncRead + AsyncWrite + Unpin + Send;

    /// Establishes a stream to `host:port`.
    ///
    /// # Errors
    ///
    /// Any network-level failure is reported as
    /// [`SessionError::ConnectionFailure`].
    fn open(&self, host: &str, port: u16) -> impl Future<Output = Result<Self::Stream>> + Send;
}

/// Plain TCP connector.
#[derive(Debug, Clone)]
pub struct TcpConnector {
    pub connect_timeout: Option<Duration>,
    pub nodelay: bool,
}

impl TcpConnector {
    #[must_use]
    pub fn new(connect_timeout: Option<Duration>, nodelay: bool) -> Self {
        TcpConnector { connect_timeout, nodelay }
    }
}

impl Default for TcpConnector {
    fn default() -> Self {
        let config = crate::config::SessionConfig::default();
        TcpConnector::new(config.connect_timeout(), config.nodelay)
    }
}

impl Connector for TcpConnector {
    type Stream = TcpStream;

    async fn open(&self, host: &str, port: u16) -> Result<TcpStream> {
        let connect = TcpStream::connect((host, port));

        let stream = match self.connect_timeout {
            Some(limit) => tokio::time::timeout(limit, connect).await.map_err(|_| {
                io::Error::new(io::ErrorKind::TimedOut, format!("no answer within {limit:?}"))
            }),
            None => Ok(connect.await),
        }
        .and_then(|connected| connected)
        .map_err(|err| SessionError::connection_failure(host, port, err))?;

        if self.nodelay {
            stream
                .set_nodelay(true)
                .map_err(|err| SessionError::connection_failure(host, port, err))?;
        }

        Ok(stream)
    }
}

/// An open byte stream to the server. Closing consumes the transport, so a
/// stream can only be closed once.
#[derive(Debug)]
pub struct Transport<S> {
    stream: S,
    peer: String,
    buffer: BytesMut,
}

impl<S> Transport<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    /// Opens a stream through `connector`.
    ///
    /// # Errors
    ///
    /// Propagates the connector's [`SessionError::ConnectionFailure`].
    pub async fn open<C>(connector: &C, host: &str, port: u16) -> Result<Self>
    where
        C: Connector<Stream = S>,
    {
        let stream = connector.open(host, port).await?;
        tracing::debug!(host, port, "transport opened");

        Ok(Transport::from_stream(stream, format!("{host}:{port}")))
    }

    fn from_stream(stream: S, peer: String) -> Self {
        Transport { stream, peer, buffer: BytesMut::new() }
    }

    /// The `host:port` this transport was opened to.
    #[must_use]
    pub fn peer(&self) -> &str {
        &self.peer
    }

    /// Writes and flushes every byte.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::WriteFailure`] if the stream rejects the write.
    pub async fn write(&mut self, bytes: &[u8]) -> Result<()> {
        self.stream.write_all(bytes).await.map_err(SessionError::WriteFailure)?;
        self.stream.flush().await.map_err(SessionError::WriteFailure)?;
        tracing::trace!(peer = %self.peer, len = bytes.len(), "wrote bytes");

        Ok(())
    }

    /// Reads at most `max_bytes`. An empty buffer means the peer closed its
    /// side of the stream. The read buffer is reused between calls.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidReadSize`] if `max_bytes` is zero or
    /// above [`crate::constants::MAX_READ_SIZE`], and
    /// [`SessionError::ReadFailure`] for any I/O error other than an orderly
    /// close.
    pub async fn read(&mut self, max_bytes: usize) -> Result<BytesMut> {
        let max_bytes = check_read_size(max_bytes)?;

        self.buffer.clear();
        self.buffer.resize(max_bytes, 0);
        let read =
            self.stream.read(&mut self.buffer[..]).await.map_err(SessionError::ReadFailure)?;
        self.buffer.truncate(read);
        tracing::trace!(peer = %self.peer, len = read, "read bytes");

        Ok(self.buffer.split())
    }

    /// Shuts the stream down and releases it. A failed shutdown is logged; the
    /// stream is dropped either way.
    pub async fn close(mut self) {
        if let Err(err) = self.stream.shutdown().await {
            tracing::debug!(peer = %self.peer, error = %err, "shutdown failed while closing");
        }
        tracing::debug!(peer = %self.peer, "transport closed");
    }
}
