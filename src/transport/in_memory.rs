use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::io::{duplex, DuplexStream};
use tokio::sync::mpsc;

use crate::transport::{Connector, Listener};

const BUFFER_SIZE: usize = 64 * 1024;

/// Listener half of an in-process connection source.
pub struct InMemoryListener {
    incoming: mpsc::UnboundedReceiver<DuplexStream>,
    accepted: usize,
}

/// Connector half; cheap to clone, one per simulated client.
#[derive(Clone)]
pub struct InMemoryConnector {
    outgoing: mpsc::UnboundedSender<DuplexStream>,
    dialed: Arc<AtomicUsize>,
    buffer: usize,
}

/// Create a connected listener/connector pair.
pub fn pair() -> (InMemoryListener, InMemoryConnector) {
    pair_with_buffer(BUFFER_SIZE)
}

/// Like [`pair`], with `buffer` bytes of in-flight capacity per direction.
/// Writes past that block until the peer reads.
pub fn pair_with_buffer(buffer: usize) -> (InMemoryListener, InMemoryConnector) {
    let (tx, rx) = mpsc::unbounded_channel();
    (
        InMemoryListener {
            incoming: rx,
            accepted: 0,
        },
        InMemoryConnector {
            outgoing: tx,
            dialed: Arc::new(AtomicUsize::new(0)),
            buffer,
        },
    )
}

#[async_trait::async_trait]
impl Listener for InMemoryListener {
    type Conn = DuplexStream;

    async fn accept(&mut self) -> io::Result<(DuplexStream, String)> {
        let stream = self.incoming.recv().await.ok_or_else(|| {
            io::Error::new(io::ErrorKind::ConnectionAborted, "all connectors dropped")
        })?;
        self.accepted += 1;
        Ok((stream, format!("memory#{}", self.accepted)))
    }
}

impl InMemoryConnector {
    /// Connections opened through this connector and its clones.
    pub fn dialed(&self) -> usize {
        self.dialed.load(Ordering::SeqCst)
    }

    /// True once the listener has been dropped.
    pub fn is_closed(&self) -> bool {
        self.outgoing.is_closed()
    }
}

#[async_trait::async_trait]
impl Connector for InMemoryConnector {
    type Conn = DuplexStream;

    async fn connect(&self) -> io::Result<DuplexStream> {
        let (client, server) = duplex(self.buffer);
        self.outgoing
            .send(server)
            .map_err(|_| io::Error::new(io::ErrorKind::ConnectionRefused, "listener closed"))?;
        self.dialed.fetch_add(1, Ordering::SeqCst);
        Ok(client)
    }
}
