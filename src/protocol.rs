//! Wire format shared by the coordinator and player clients.
//!
//! Integers are 4-byte big-endian, booleans a single byte, and objects a
//! 4-byte big-endian length followed by a bincode payload.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::common::ProtocolError;
use crate::config::{MAX_DIMENSION, MAX_MESSAGE_SIZE};
use crate::coordinate::Coordinate;
use crate::game::{PlayerId, Resolution, ShotStatus};
use crate::ship::Ship;

/// Serialize `value` and write it as a length-prefixed frame.
pub async fn write_object<W, T>(writer: &mut W, value: &T) -> Result<(), ProtocolError>
where
    W: AsyncWrite + Unpin,
    T: Serialize + ?Sized,
{
    let data = bincode::serialize(value)?;
    if data.len() as u64 > MAX_MESSAGE_SIZE as u64 {
        return Err(ProtocolError::MessageTooLarge {
            len: data.len() as u32,
            max: MAX_MESSAGE_SIZE,
        });
    }
    writer.write_u32(data.len() as u32).await?;
    writer.write_all(&data).await?;
    Ok(())
}

/// Read one length-prefixed frame and deserialize it.
pub async fn read_object<R, T>(reader: &mut R) -> Result<T, ProtocolError>
where
    R: AsyncRead + Unpin,
    T: DeserializeOwned,
{
    let len = reader.read_u32().await?;
    if len > MAX_MESSAGE_SIZE {
        return Err(ProtocolError::MessageTooLarge {
            len,
            max: MAX_MESSAGE_SIZE,
        });
    }
    if len == 0 {
        return Err(ProtocolError::EmptyFrame);
    }
    let mut buf = vec![0u8; len as usize];
    reader.read_exact(&mut buf).await?;
    Ok(bincode::deserialize(&buf)?)
}

/// Payload sent once to each player while the match is being set up.
///
/// Carries the opponent's complete layout as well as the player's own. This
/// gives the client everything it needs to render both boards, at the cost of
/// any secrecy about the opponent's fleet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Handshake {
    pub own_fleet: Vec<Ship>,
    pub opponent_fleet: Vec<Ship>,
    pub dimension: u32,
    pub player: PlayerId,
}

impl Handshake {
    pub async fn write_to<W: AsyncWrite + Unpin>(&self, writer: &mut W) -> Result<(), ProtocolError> {
        write_object(writer, &self.own_fleet).await?;
        write_object(writer, &self.opponent_fleet).await?;
        writer.write_i32(self.dimension as i32).await?;
        writer.write_i32(self.player.as_i32()).await?;
        writer.flush().await?;
        Ok(())
    }

    pub async fn read_from<R: AsyncRead + Unpin>(reader: &mut R) -> Result<Self, ProtocolError> {
        let own_fleet = read_object(reader).await?;
        let opponent_fleet = read_object(reader).await?;
        let raw = reader.read_i32().await?;
        let dimension = u32::try_from(raw)
            .ok()
            .filter(|d| (1..=MAX_DIMENSION).contains(d))
            .ok_or(ProtocolError::InvalidDimension(raw))?;
        let player = PlayerId::try_from(reader.read_i32().await?)?;
        Ok(Self {
            own_fleet,
            opponent_fleet,
            dimension,
            player,
        })
    }
}

/// A shot request. `target` is the id of the player being fired upon, kept
/// raw so that garbage ids are answered rather than treated as a fault.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnRequest {
    pub target: i32,
    pub coordinate: String,
}

impl TurnRequest {
    pub fn new(target: PlayerId, coordinate: Coordinate) -> Self {
        Self {
            target: target.as_i32(),
            coordinate: coordinate.to_string(),
        }
    }

    pub async fn write_to<W: AsyncWrite + Unpin>(&self, writer: &mut W) -> Result<(), ProtocolError> {
        writer.write_i32(self.target).await?;
        write_object(writer, &self.coordinate).await?;
        writer.flush().await?;
        Ok(())
    }

    pub async fn read_from<R: AsyncRead + Unpin>(reader: &mut R) -> Result<Self, ProtocolError> {
        let target = reader.read_i32().await?;
        let coordinate = read_object(reader).await?;
        Ok(Self { target, coordinate })
    }
}

/// Body of a response to a valid shot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedShot {
    pub status: ShotStatus,
    pub ship: Option<Ship>,
    /// Coordinate of the shot resolved on the previous exchange.
    pub previous: Option<Coordinate>,
    pub previous_hit: bool,
    pub target_health: i32,
    pub firing_health: i32,
    pub log: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnResponse {
    Invalid,
    Resolved(ResolvedShot),
}

impl TurnResponse {
    pub fn status(&self) -> ShotStatus {
        match self {
            TurnResponse::Invalid => ShotStatus::Invalid,
            TurnResponse::Resolved(shot) => shot.status,
        }
    }

    pub async fn write_to<W: AsyncWrite + Unpin>(&self, writer: &mut W) -> Result<(), ProtocolError> {
        writer.write_i32(self.status().code()).await?;
        if let TurnResponse::Resolved(shot) = self {
            write_object(writer, &shot.ship).await?;
            write_object(writer, &shot.previous).await?;
            writer.write_u8(shot.previous_hit as u8).await?;
            writer.write_i32(shot.target_health).await?;
            writer.write_i32(shot.firing_health).await?;
            write_object(writer, &shot.log).await?;
        }
        writer.flush().await?;
        Ok(())
    }

    pub async fn read_from<R: AsyncRead + Unpin>(reader: &mut R) -> Result<Self, ProtocolError> {
        let status = ShotStatus::from_code(reader.read_i32().await?)?;
        if status == ShotStatus::Invalid {
            return Ok(TurnResponse::Invalid);
        }
        let ship = read_object(reader).await?;
        let previous = read_object(reader).await?;
        let previous_hit = reader.read_u8().await? != 0;
        let target_health = reader.read_i32().await?;
        let firing_health = reader.read_i32().await?;
        let log = read_object(reader).await?;
        Ok(TurnResponse::Resolved(ResolvedShot {
            status,
            ship,
            previous,
            previous_hit,
            target_health,
            firing_health,
            log,
        }))
    }
}

impl From<Resolution> for TurnResponse {
    fn from(res: Resolution) -> Self {
        TurnResponse::Resolved(ResolvedShot {
            status: res.status,
            ship: res.ship,
            previous: res.previous.map(|p| p.coordinate),
            previous_hit: res.previous.is_some_and(|p| p.hit),
            target_health: res.target_health,
            firing_health: res.firing_health,
            log: res.log,
        })
    }
}
