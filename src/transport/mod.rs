//! Connection sources for the coordinator and the player client.
//!
//! Every turn-exchange uses a fresh connection, so the seam is "give me the
//! next stream" rather than a message pipe.

use std::io;

use tokio::io::{AsyncRead, AsyncWrite};

/// Byte stream for one handshake or one turn-exchange.
pub trait Connection: AsyncRead + AsyncWrite + Unpin + Send {}

impl<T: AsyncRead + AsyncWrite + Unpin + Send> Connection for T {}

/// Server side: yields inbound connections in arrival order.
#[async_trait::async_trait]
pub trait Listener: Send {
    type Conn: Connection;

    /// Wait for the next connection. Returns the stream and a peer label for
    /// logging.
    async fn accept(&mut self) -> io::Result<(Self::Conn, String)>;
}

/// Client side: opens a new connection to the coordinator.
#[async_trait::async_trait]
pub trait Connector: Send + Sync {
    type Conn: Connection;

    async fn connect(&self) -> io::Result<Self::Conn>;
}

pub mod in_memory;
pub mod tcp;
