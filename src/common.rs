//! Error types shared across the engine, the wire codec and the coordinator.

use std::io;

use thiserror::Error;

use crate::game::PlayerId;

/// Errors raised while turning host input into a [`crate::MatchConfig`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid port number: {0:?}")]
    InvalidPort(String),
    #[error("board dimension {value} exceeds the maximum of {max}")]
    DimensionTooLarge { value: u32, max: u32 },
}

/// Errors returned by board operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BoardError {
    /// A ship could not be fitted anywhere, even after restarting the fleet.
    #[error("unable to place ship of length {length} after {restarts} fleet restarts")]
    UnableToPlaceShip { length: usize, restarts: usize },
    #[error("board dimension {0} is out of range")]
    DimensionOutOfRange(u32),
}

/// Errors raised while encoding or decoding a wire payload.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
    #[error("serialization error: {0}")]
    Bincode(#[from] bincode::Error),
    #[error("message too large: {len} bytes (max: {max})")]
    MessageTooLarge { len: u32, max: u32 },
    #[error("invalid message length: 0")]
    EmptyFrame,
    #[error("unknown status code {0}")]
    UnknownStatus(i32),
    #[error("unknown player id {0}")]
    UnknownPlayer(i32),
    #[error("board dimension {0} is out of range")]
    InvalidDimension(i32),
}

impl ProtocolError {
    /// True when the peer hung up rather than sending garbage.
    pub fn is_disconnect(&self) -> bool {
        matches!(
            self,
            ProtocolError::Io(e) if matches!(
                e.kind(),
                io::ErrorKind::UnexpectedEof
                    | io::ErrorKind::ConnectionReset
                    | io::ErrorKind::BrokenPipe
            )
        )
    }
}

/// Errors that end a match.
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("failed to bind listener: {0}")]
    Bind(#[source] io::Error),
    #[error("failed to accept connection: {0}")]
    Accept(#[source] io::Error),
    #[error("handshake with player {player} failed: {source}")]
    Setup {
        player: PlayerId,
        #[source]
        source: ProtocolError,
    },
    #[error(transparent)]
    Placement(#[from] BoardError),
    /// A client broke the exchange mid-match: disconnect, malformed stream, or
    /// write failure. Distinct from an out-of-turn shot, which is answered.
    #[error("session fault on turn {turn}: {source}")]
    SessionFault {
        turn: u32,
        #[source]
        source: ProtocolError,
    },
    #[error("connection timed out on turn {turn}")]
    Timeout { turn: u32 },
    #[error("handshake with player {player} timed out")]
    SetupTimeout { player: PlayerId },
    /// Another match already holds the session guard.
    #[error("a session is already in progress")]
    SessionBusy,
}
