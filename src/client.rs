//! Remote player side of the wire contract.

use log::debug;
use tokio::io::AsyncWriteExt;

use crate::common::ProtocolError;
use crate::coordinate::Coordinate;
use crate::game::PlayerId;
use crate::protocol::{Handshake, TurnRequest, TurnResponse};
use crate::transport::Connector;

/// Speaks to a coordinator through `C`, one connection per call.
pub struct PlayerClient<C: Connector> {
    connector: C,
}

impl<C: Connector> PlayerClient<C> {
    pub fn new(connector: C) -> Self {
        Self { connector }
    }

    /// Connect during setup and receive this player's handshake.
    pub async fn join(&self) -> Result<Handshake, ProtocolError> {
        let mut conn = self.connector.connect().await?;
        let handshake = Handshake::read_from(&mut conn).await?;
        debug!(
            "joined as player {} on dimension {}",
            handshake.player, handshake.dimension
        );
        Ok(handshake)
    }

    /// Fire at `coordinate` on `target`'s board.
    pub async fn fire(
        &self,
        target: PlayerId,
        coordinate: Coordinate,
    ) -> Result<TurnResponse, ProtocolError> {
        self.send(&TurnRequest::new(target, coordinate)).await
    }

    /// Send an arbitrary request, e.g. one carrying an unvalidated coordinate.
    pub async fn send(&self, request: &TurnRequest) -> Result<TurnResponse, ProtocolError> {
        let mut conn = self.connector.connect().await?;
        request.write_to(&mut conn).await?;
        let response = TurnResponse::read_from(&mut conn).await?;
        let _ = conn.shutdown().await;
        Ok(response)
    }
}
