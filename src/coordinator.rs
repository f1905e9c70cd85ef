//! The host side of a match: handshakes, then one connection per shot.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use log::{debug, error, info, warn};
use rand::Rng;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::Semaphore;
use tokio::time::{error::Elapsed, timeout};

use crate::board::{generate_fleet, place_fleet, Fleet};
use crate::common::{MatchError, ProtocolError};
use crate::config::MatchConfig;
use crate::coordinate::Coordinate;
use crate::game::{MatchState, PlayerId, TurnOutcome};
use crate::protocol::{Handshake, TurnRequest, TurnResponse};
use crate::transport::tcp::TcpMatchListener;
use crate::transport::Listener;
use crate::ui::Reporter;

/// Where a match stands.
#[derive(Debug)]
pub enum Phase {
    /// Both fleets are placed; waiting for two players to connect.
    AwaitingPlayers { first: Fleet, second: Fleet },
    InProgress(MatchState),
    GameOver { winner: PlayerId, state: MatchState },
}

/// How a finished match went.
#[derive(Debug, Clone)]
pub struct MatchSummary {
    pub winner: PlayerId,
    /// Turn-exchanges served, rejected ones included.
    pub exchanges: u32,
    pub rejected: u32,
    pub final_state: MatchState,
}

pub struct MatchCoordinator<L: Listener> {
    listener: L,
    config: MatchConfig,
    reporter: Box<dyn Reporter>,
    /// Single-session guard. Its one permit is held for the whole match, so
    /// coordinators sharing a guard never run matches at the same time.
    session: Arc<Semaphore>,
}

impl MatchCoordinator<TcpMatchListener> {
    /// Bind the listening socket described by `config`.
    pub async fn bind(
        config: MatchConfig,
        reporter: Box<dyn Reporter>,
    ) -> Result<Self, MatchError> {
        let listener = TcpMatchListener::bind(config.bind)
            .await
            .map_err(MatchError::Bind)?;
        if let Ok(addr) = listener.local_addr() {
            info!("listening on {addr}");
        }
        Ok(Self::new(listener, config, reporter))
    }
}

impl<L: Listener> MatchCoordinator<L> {
    pub fn new(listener: L, config: MatchConfig, reporter: Box<dyn Reporter>) -> Self {
        Self {
            listener,
            config,
            reporter,
            session: Arc::new(Semaphore::new(1)),
        }
    }

    /// Share a session guard with other coordinators.
    pub fn with_session(mut self, session: Arc<Semaphore>) -> Self {
        self.session = session;
        self
    }

    pub fn listener(&self) -> &L {
        &self.listener
    }

    /// Play one match to completion.
    ///
    /// Fails with [`MatchError::SessionBusy`] if the session guard is already
    /// held. The listener is dropped when this returns, whether the match
    /// finished or failed. Errors are also passed to the reporter.
    pub async fn run<R: Rng>(mut self, rng: &mut R) -> Result<MatchSummary, MatchError> {
        let result = match Arc::clone(&self.session).try_acquire_owned() {
            Ok(_permit) => self.drive(rng).await,
            Err(_) => Err(MatchError::SessionBusy),
        };
        if let Err(e) = &result {
            error!("match aborted: {e}");
            self.reporter.error(e);
        }
        info!("releasing listener");
        result
    }

    async fn drive<R: Rng>(&mut self, rng: &mut R) -> Result<MatchSummary, MatchError> {
        let dimension = self.config.dimension;
        let first = place_fleet(generate_fleet(dimension, rng), dimension, rng)?;
        let second = place_fleet(generate_fleet(dimension, rng), dimension, rng)?;
        info!(
            "fleets ready: {} ships per side on a {size}x{size} grid",
            first.len(),
            size = self.config.grid_size()
        );

        let mut exchanges = 0u32;
        let mut rejected = 0u32;
        let mut phase = Phase::AwaitingPlayers { first, second };
        loop {
            phase = match phase {
                Phase::AwaitingPlayers { first, second } => {
                    self.handshake(PlayerId::First, &first, &second).await?;
                    self.handshake(PlayerId::Second, &second, &first).await?;
                    self.reporter
                        .status("Both players have connected. Let the battle begin!");
                    Phase::InProgress(MatchState::new(dimension, first, second))
                }
                Phase::InProgress(state) => {
                    exchanges += 1;
                    let (state, outcome) = self.exchange(state, exchanges).await?;
                    match outcome {
                        TurnOutcome::Rejected => {
                            rejected += 1;
                            Phase::InProgress(state)
                        }
                        TurnOutcome::Resolved(res) => match res.winner {
                            Some(winner) => Phase::GameOver { winner, state },
                            None => Phase::InProgress(state),
                        },
                    }
                }
                Phase::GameOver { winner, state } => {
                    info!("player {winner} wins after {exchanges} exchanges ({rejected} rejected)");
                    self.reporter.game_over(winner);
                    return Ok(MatchSummary {
                        winner,
                        exchanges,
                        rejected,
                        final_state: state,
                    });
                }
            };
        }
    }

    /// Accept one player and send them both layouts, the dimension and their id.
    async fn handshake(
        &mut self,
        player: PlayerId,
        own: &Fleet,
        opponent: &Fleet,
    ) -> Result<(), MatchError> {
        let (mut conn, peer) = self.listener.accept().await.map_err(MatchError::Accept)?;
        info!("player {player} connected from {peer}");

        let payload = Handshake {
            own_fleet: own.ships().to_vec(),
            opponent_fleet: opponent.ships().to_vec(),
            dimension: self.config.dimension,
            player,
        };
        let io = async {
            payload.write_to(&mut conn).await?;
            close(&mut conn).await;
            Ok::<_, ProtocolError>(())
        };
        match bounded(self.config.io_timeout, io).await {
            Ok(Ok(())) => {}
            Ok(Err(source)) => return Err(MatchError::Setup { player, source }),
            Err(_) => return Err(MatchError::SetupTimeout { player }),
        }
        self.reporter
            .status(&format!("Player {player} has joined the match."));
        Ok(())
    }

    /// Serve one shot request on a fresh connection.
    async fn exchange(
        &mut self,
        state: MatchState,
        turn: u32,
    ) -> Result<(MatchState, TurnOutcome), MatchError> {
        let (mut conn, peer) = self.listener.accept().await.map_err(MatchError::Accept)?;
        debug!("turn {turn}: connection from {peer}");

        let io = async move {
            let request = TurnRequest::read_from(&mut conn).await?;
            let (state, outcome) = apply(state, &request, &peer);
            let response = match &outcome {
                TurnOutcome::Rejected => TurnResponse::Invalid,
                TurnOutcome::Resolved(res) => TurnResponse::from(res.clone()),
            };
            response.write_to(&mut conn).await?;
            close(&mut conn).await;
            Ok::<_, ProtocolError>((state, outcome))
        };
        match bounded(self.config.io_timeout, io).await {
            Ok(Ok(done)) => Ok(done),
            Ok(Err(source)) => {
                if source.is_disconnect() {
                    warn!("turn {turn}: client disconnected mid-exchange");
                }
                Err(MatchError::SessionFault { turn, source })
            }
            Err(_) => Err(MatchError::Timeout { turn }),
        }
    }
}

/// Validate a raw request against the match and resolve it.
fn apply(state: MatchState, request: &TurnRequest, peer: &str) -> (MatchState, TurnOutcome) {
    let target = match PlayerId::try_from(request.target) {
        Ok(t) if t == state.current_target() => t,
        _ => {
            warn!(
                "{peer}: out-of-turn shot at player {} (current target is {})",
                request.target,
                state.current_target()
            );
            return (state, TurnOutcome::Rejected);
        }
    };
    let coordinate = match request.coordinate.parse::<Coordinate>() {
        Ok(c) if c.within(state.dimension()) => c,
        _ => {
            warn!("{peer}: rejected coordinate {:?}", request.coordinate);
            return (state, TurnOutcome::Rejected);
        }
    };

    let (state, outcome) = state.fire(target, coordinate);
    if let TurnOutcome::Resolved(res) = &outcome {
        debug!(
            "player {} fired at {coordinate}: {:?}, health {}% / {}%",
            target.opponent(),
            res.status,
            res.target_health,
            res.firing_health
        );
    }
    (state, outcome)
}

/// Half-close after the payload is flushed. The payload has already been
/// delivered, so a peer that hung up first is not an error.
async fn close<C: AsyncWrite + Unpin>(conn: &mut C) {
    if let Err(e) = conn.shutdown().await {
        debug!("shutdown after response: {e}");
    }
}

async fn bounded<F: Future>(limit: Option<Duration>, fut: F) -> Result<F::Output, Elapsed> {
    match limit {
        Some(limit) => timeout(limit, fut).await,
        None => Ok(fut.await),
    }
}
