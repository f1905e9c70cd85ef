mod board;
mod client;
mod common;
mod config;
mod coordinate;
pub mod coordinator;
mod game;
mod logging;
pub mod protocol;
mod ship;
pub mod transport;
mod ui;

pub use board::*;
pub use client::PlayerClient;
pub use common::*;
pub use config::*;
pub use coordinate::{Coordinate, ParseCoordinateError};
pub use coordinator::{MatchCoordinator, MatchSummary, Phase};
pub use game::*;
pub use logging::{init_logging, LOG_ENV};
pub use protocol::{Handshake, ResolvedShot, TurnRequest, TurnResponse};
pub use ship::{Orientation, Ship};
pub use transport::in_memory::{InMemoryConnector, InMemoryListener};
pub use transport::tcp::{TcpConnector, TcpMatchListener};
pub use transport::{Connection, Connector, Listener};
pub use ui::*;
