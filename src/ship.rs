//! Ships and their placement on the board.

use serde::{Deserialize, Serialize};

use crate::coordinate::Coordinate;

/// Orientation of a ship on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

impl Orientation {
    pub fn flipped(self) -> Self {
        match self {
            Orientation::Horizontal => Orientation::Vertical,
            Orientation::Vertical => Orientation::Horizontal,
        }
    }
}

/// A ship and everything a client needs to draw it.
///
/// The anchor is `(0, 0)` and `coordinates` is empty until the ship is placed.
/// `health` counts hits remaining and `destroyed` flips exactly when it
/// reaches zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ship {
    length: usize,
    orientation: Orientation,
    row: u8,
    col: u8,
    coordinates: Vec<Coordinate>,
    health: usize,
    destroyed: bool,
}

impl Ship {
    /// Create an unplaced ship.
    pub fn new(length: usize, orientation: Orientation) -> Self {
        Self {
            length,
            orientation,
            row: 0,
            col: 0,
            coordinates: Vec::new(),
            health: length,
            destroyed: false,
        }
    }

    /// Create a ship already anchored at (`row`, `col`), or `None` if its
    /// `length` cells do not all land on the grid.
    pub fn placed(length: usize, orientation: Orientation, row: u8, col: u8) -> Option<Self> {
        let mut ship = Self::new(length, orientation);
        ship.set_anchor(row, col, orientation).then_some(ship)
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn is_horizontal(&self) -> bool {
        self.orientation == Orientation::Horizontal
    }

    /// Anchor cell as `(row, col)`.
    pub fn origin(&self) -> (u8, u8) {
        (self.row, self.col)
    }

    pub fn coordinates(&self) -> &[Coordinate] {
        &self.coordinates
    }

    pub fn health(&self) -> usize {
        self.health
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn is_placed(&self) -> bool {
        !self.coordinates.is_empty()
    }

    pub fn occupies(&self, coordinate: &Coordinate) -> bool {
        self.coordinates.contains(coordinate)
    }

    /// Cells covered when anchored at (`row`, `col`) in the given orientation.
    ///
    /// `None` if any cell would fall off the lettered grid.
    pub fn cells(
        length: usize,
        orientation: Orientation,
        row: u8,
        col: u8,
    ) -> Option<Vec<Coordinate>> {
        if length == 0 {
            return None;
        }
        (0..length)
            .map(|i| {
                let i = u8::try_from(i).ok()?;
                let (r, c) = match orientation {
                    Orientation::Horizontal => (row, col.checked_add(i)?),
                    Orientation::Vertical => (row.checked_add(i)?, col),
                };
                Coordinate::new(c, r)
            })
            .collect()
    }

    /// Anchor the ship at (`row`, `col`) and derive its coordinates. Returns
    /// `false`, leaving the ship untouched, if the run does not fit.
    pub(crate) fn set_anchor(&mut self, row: u8, col: u8, orientation: Orientation) -> bool {
        let Some(coordinates) = Ship::cells(self.length, orientation, row, col) else {
            return false;
        };
        self.row = row;
        self.col = col;
        self.orientation = orientation;
        self.coordinates = coordinates;
        self.health = self.length;
        self.destroyed = false;
        true
    }

    /// Take one hit. Returns `true` if this hit destroyed the ship.
    pub(crate) fn take_hit(&mut self) -> bool {
        if self.health == 0 {
            return false;
        }
        self.health -= 1;
        if self.health == 0 {
            self.destroyed = true;
            return true;
        }
        false
    }
}

