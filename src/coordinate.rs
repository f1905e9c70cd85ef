//! Board addresses in `<letter><row>` form, e.g. `C5`.

use core::fmt;
use core::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::config::ALPHABET;

/// A single cell. Both axes are 1-based; `col` indexes [`ALPHABET`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coordinate {
    col: u8,
    row: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed coordinate {0:?}")]
pub struct ParseCoordinateError(pub String);

impl Coordinate {
    /// Returns `None` when either axis is zero or the column has no letter.
    pub fn new(col: u8, row: u8) -> Option<Self> {
        if col == 0 || row == 0 || col as usize >= ALPHABET.len() {
            return None;
        }
        Some(Self { col, row })
    }

    pub fn col(&self) -> u8 {
        self.col
    }

    pub fn row(&self) -> u8 {
        self.row
    }

    /// Whether the cell lies on the `(2D) × (2D)` grid.
    pub fn within(&self, dimension: u32) -> bool {
        let size = dimension * 2;
        u32::from(self.col) <= size && u32::from(self.row) <= size
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", ALPHABET[self.col as usize], self.row)
    }
}

impl FromStr for Coordinate {
    type Err = ParseCoordinateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseCoordinateError(s.to_string());
        let mut chars = s.chars();
        let letter = chars.next().ok_or_else(err)?;
        let digits = chars.as_str();

        let col = ALPHABET
            .iter()
            .skip(1)
            .position(|&c| c == letter)
            .map(|i| i + 1)
            .ok_or_else(err)?;

        if digits.is_empty()
            || digits.starts_with('0')
            || !digits.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(err());
        }
        let row: u8 = digits.parse().map_err(|_| err())?;
        Coordinate::new(col as u8, row).ok_or_else(err)
    }
}

impl Serialize for Coordinate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Coordinate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

