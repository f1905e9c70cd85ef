//! Match constants and the host configuration.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use log::warn;

use crate::common::ConfigError;

/// Column letters, 1-indexed. Position 0 is never addressed.
pub const ALPHABET: [char; 27] = [
    '|', 'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M', 'N', 'O', 'P', 'Q',
    'R', 'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z',
];

/// Dimension used when the host leaves it unset.
pub const DEFAULT_DIMENSION: u32 = 1;

/// Largest dimension whose `2D` columns still fit in [`ALPHABET`].
pub const MAX_DIMENSION: u32 = ((ALPHABET.len() - 1) / 2) as u32;

/// Default timeout for reads and writes on an accepted connection.
pub const DEFAULT_IO_TIMEOUT: Duration = Duration::from_secs(30);

/// Maximum serialized object size (10 MB).
pub const MAX_MESSAGE_SIZE: u32 = 10_000_000;

/// Random anchors tried per ship before falling back to a scan of free runs.
pub const MAX_PLACEMENT_ATTEMPTS: usize = 1_000;

/// Full re-placements of a fleet before giving up.
pub const MAX_FLEET_RESTARTS: usize = 8;

/// Number of ships in a fleet of the given dimension.
pub const fn fleet_size(dimension: u32) -> usize {
    let d = dimension as usize;
    d * (d + 1) / 2
}

/// Everything the host needs to run one match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchConfig {
    pub bind: SocketAddr,
    pub dimension: u32,
    /// `None` blocks forever on a silent client.
    pub io_timeout: Option<Duration>,
    pub seed: Option<u64>,
}

impl MatchConfig {
    pub fn new(bind: SocketAddr, dimension: u32) -> Result<Self, ConfigError> {
        Ok(Self {
            bind,
            dimension: check_dimension(dimension)?,
            io_timeout: Some(DEFAULT_IO_TIMEOUT),
            seed: None,
        })
    }

    /// Build a config from the two values a host types in: board dimension and
    /// listen port. An empty, `0` or unparseable dimension falls back to
    /// [`DEFAULT_DIMENSION`].
    pub fn from_raw(dimension: &str, port: &str) -> Result<Self, ConfigError> {
        let dimension = parse_dimension(dimension)?;
        let port: u16 = port
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidPort(port.to_string()))?;
        Self::new(
            SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), port),
            dimension,
        )
    }

    pub fn with_io_timeout(mut self, io_timeout: Option<Duration>) -> Self {
        self.io_timeout = io_timeout;
        self
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Width and height of the playable grid.
    pub fn grid_size(&self) -> u32 {
        self.dimension * 2
    }
}

/// Parse a raw dimension string. Anything unset or unparseable falls back to
/// [`DEFAULT_DIMENSION`]; only values above [`MAX_DIMENSION`] are rejected.
pub fn parse_dimension(raw: &str) -> Result<u32, ConfigError> {
    match raw.trim().parse::<u32>() {
        Ok(value) => check_dimension(value),
        Err(_) => {
            if !raw.trim().is_empty() {
                warn!("unparseable dimension {raw:?}, using {DEFAULT_DIMENSION}");
            }
            Ok(DEFAULT_DIMENSION)
        }
    }
}

fn check_dimension(value: u32) -> Result<u32, ConfigError> {
    match value {
        0 => Ok(DEFAULT_DIMENSION),
        d if d > MAX_DIMENSION => Err(ConfigError::DimensionTooLarge {
            value: d,
            max: MAX_DIMENSION,
        }),
        d => Ok(d),
    }
}
