//! Match rules: turn order, shot resolution against both fleets, and the log.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::board::{board_health_percent, Fleet};
use crate::common::ProtocolError;
use crate::coordinate::Coordinate;
use crate::ship::Ship;

/// One of the two sides. Also the board id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerId {
    First,
    Second,
}

impl PlayerId {
    pub fn opponent(self) -> Self {
        match self {
            PlayerId::First => PlayerId::Second,
            PlayerId::Second => PlayerId::First,
        }
    }

    /// Wire value: 1 or 2.
    pub fn as_i32(self) -> i32 {
        match self {
            PlayerId::First => 1,
            PlayerId::Second => 2,
        }
    }

    fn index(self) -> usize {
        self.as_i32() as usize - 1
    }
}

impl TryFrom<i32> for PlayerId {
    type Error = ProtocolError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(PlayerId::First),
            2 => Ok(PlayerId::Second),
            other => Err(ProtocolError::UnknownPlayer(other)),
        }
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_i32())
    }
}

/// Status code carried at the head of every turn response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShotStatus {
    Invalid,
    Hit,
    Missed,
}

impl ShotStatus {
    pub fn code(self) -> i32 {
        match self {
            ShotStatus::Invalid => 0,
            ShotStatus::Hit => 1,
            ShotStatus::Missed => 2,
        }
    }

    pub fn from_code(code: i32) -> Result<Self, ProtocolError> {
        match code {
            0 => Ok(ShotStatus::Invalid),
            1 => Ok(ShotStatus::Hit),
            2 => Ok(ShotStatus::Missed),
            other => Err(ProtocolError::UnknownStatus(other)),
        }
    }
}

/// A resolved shot, as remembered for the delayed echo and the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShotRecord {
    pub shooter: PlayerId,
    pub coordinate: Coordinate,
    pub hit: bool,
}

impl fmt::Display for ShotRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self.shooter {
            PlayerId::First => "FIRST PLAYER",
            PlayerId::Second => "SECOND PLAYER",
        };
        let outcome = if self.hit { "HIT" } else { "MISSED" };
        write!(f, "{}: {} ({})", name, self.coordinate, outcome)
    }
}

/// Everything the firing player learns from a valid shot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub status: ShotStatus,
    pub ship: Option<Ship>,
    /// The shot resolved on the exchange before this one.
    pub previous: Option<ShotRecord>,
    pub target_health: i32,
    pub firing_health: i32,
    pub log: String,
    pub winner: Option<PlayerId>,
}

/// Result of applying a shot request to the match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// Out of turn, or a coordinate off the board. Nothing changed.
    Rejected,
    Resolved(Resolution),
}

/// Authoritative state of a match in progress.
///
/// Owned by the coordinator; every shot consumes the state and hands back the
/// next one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchState {
    dimension: u32,
    fleets: [Fleet; 2],
    remaining: [usize; 2],
    max_ships: usize,
    current_target: PlayerId,
    pending_echo: Option<ShotRecord>,
    history: Vec<ShotRecord>,
}

impl MatchState {
    /// Start a match with player 1 to fire first.
    pub fn new(dimension: u32, first: Fleet, second: Fleet) -> Self {
        let max_ships = first.len().max(second.len());
        let remaining = [first.afloat(), second.afloat()];
        Self {
            dimension,
            fleets: [first, second],
            remaining,
            max_ships,
            current_target: PlayerId::Second,
            pending_echo: None,
            history: Vec::new(),
        }
    }

    pub fn dimension(&self) -> u32 {
        self.dimension
    }

    pub fn fleet(&self, player: PlayerId) -> &Fleet {
        &self.fleets[player.index()]
    }

    /// The player about to be fired upon.
    pub fn current_target(&self) -> PlayerId {
        self.current_target
    }

    pub fn remaining_ships(&self, player: PlayerId) -> usize {
        self.remaining[player.index()]
    }

    pub fn max_ships(&self) -> usize {
        self.max_ships
    }

    pub fn health(&self, player: PlayerId) -> i32 {
        board_health_percent(self.remaining[player.index()], self.max_ships)
    }

    /// The shot that the next valid exchange will echo back.
    pub fn pending_echo(&self) -> Option<ShotRecord> {
        self.pending_echo
    }

    /// Shots resolved so far, oldest first.
    pub fn history(&self) -> &[ShotRecord] {
        &self.history
    }

    /// Cumulative text log, newest shot first.
    pub fn log(&self) -> String {
        self.history
            .iter()
            .rev()
            .map(ShotRecord::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// The side whose opponent has no health left.
    pub fn winner(&self) -> Option<PlayerId> {
        [PlayerId::First, PlayerId::Second]
            .into_iter()
            .find(|p| self.health(p.opponent()) == 0)
    }

    /// Apply a shot claimed to target `target` at `coordinate`.
    ///
    /// Rejected when `target` is not the current target or the cell is off the
    /// board. Otherwise the target fleet is resolved, the turn passes to the
    /// other side, and this shot becomes the echo for the next exchange.
    pub fn fire(mut self, target: PlayerId, coordinate: Coordinate) -> (Self, TurnOutcome) {
        if target != self.current_target || !coordinate.within(self.dimension) {
            return (self, TurnOutcome::Rejected);
        }
        let shooter = target.opponent();

        let idx = target.index();
        let fleet = core::mem::take(&mut self.fleets[idx]);
        let (fleet, shot) = fleet.resolve_shot(&coordinate);
        self.fleets[idx] = fleet;
        if shot.sunk {
            self.remaining[idx] -= 1;
        }

        let record = ShotRecord {
            shooter,
            coordinate,
            hit: shot.hit,
        };
        self.history.push(record);

        let resolution = Resolution {
            status: if shot.hit {
                ShotStatus::Hit
            } else {
                ShotStatus::Missed
            },
            ship: shot.ship,
            previous: self.pending_echo,
            target_health: self.health(target),
            firing_health: self.health(shooter),
            log: self.log(),
            winner: self.winner(),
        };

        self.current_target = shooter;
        self.pending_echo = Some(record);
        (self, TurnOutcome::Resolved(resolution))
    }
}
