//! Fleet generation, randomized placement and shot resolution.
//!
//! Nothing here knows about sockets or players; a [`Fleet`] goes in and a
//! [`Fleet`] comes out.

use log::{debug, warn};
use rand::Rng;

use crate::common::BoardError;
use crate::config::{fleet_size, MAX_DIMENSION, MAX_FLEET_RESTARTS, MAX_PLACEMENT_ATTEMPTS};
use crate::coordinate::Coordinate;
use crate::ship::{Orientation, Ship};

/// All ships belonging to one player, in generation order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fleet {
    ships: Vec<Ship>,
}

/// Outcome of a single shot against a fleet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShotResult {
    pub hit: bool,
    /// The ship that was struck, after the hit was applied.
    pub ship: Option<Ship>,
    /// Whether this shot took the ship's last point of health.
    pub sunk: bool,
}

impl ShotResult {
    fn miss() -> Self {
        Self {
            hit: false,
            ship: None,
            sunk: false,
        }
    }
}

impl Fleet {
    pub fn from_ships(ships: Vec<Ship>) -> Self {
        Self { ships }
    }

    pub fn ships(&self) -> &[Ship] {
        &self.ships
    }

    pub fn into_ships(self) -> Vec<Ship> {
        self.ships
    }

    pub fn len(&self) -> usize {
        self.ships.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ships.is_empty()
    }

    /// Ships not yet destroyed.
    pub fn afloat(&self) -> usize {
        self.ships.iter().filter(|s| !s.is_destroyed()).count()
    }

    /// Fire at `coordinate`. The first ship covering the cell loses one point
    /// of health; a miss leaves the fleet untouched.
    pub fn resolve_shot(mut self, coordinate: &Coordinate) -> (Self, ShotResult) {
        if let Some(ship) = self.ships.iter_mut().find(|s| s.occupies(coordinate)) {
            let sunk = ship.take_hit();
            let result = ShotResult {
                hit: true,
                ship: Some(ship.clone()),
                sunk,
            };
            return (self, result);
        }
        (self, ShotResult::miss())
    }
}

/// Build an unplaced fleet: for `i` from `D` down to 1, `D - i + 1` ships of
/// length `i`, each with a random orientation.
pub fn generate_fleet<R: Rng>(dimension: u32, rng: &mut R) -> Fleet {
    let d = dimension as usize;
    let mut ships = Vec::with_capacity(fleet_size(dimension));
    for length in (1..=d).rev() {
        for _ in 0..(d - length + 1) {
            let orientation = if rng.random() {
                Orientation::Horizontal
            } else {
                Orientation::Vertical
            };
            ships.push(Ship::new(length, orientation));
        }
    }
    Fleet { ships }
}

/// Occupancy map used while placing one fleet. Indexed 1..=2D on both axes;
/// each occupied cell holds the length of the ship sitting on it.
#[derive(Debug, Clone)]
pub struct PlacementGrid {
    size: usize,
    cells: Vec<Option<usize>>,
}

impl PlacementGrid {
    pub fn new(dimension: u32) -> Self {
        let size = dimension as usize * 2;
        Self {
            size,
            cells: vec![None; (size + 1) * (size + 1)],
        }
    }

    /// Playable cells per axis (`2D`).
    pub fn size(&self) -> usize {
        self.size
    }

    /// Row/column extent of the backing map, including the unused index 0.
    pub fn width(&self) -> usize {
        self.size + 1
    }

    pub fn get(&self, row: usize, col: usize) -> Option<usize> {
        if row >= self.width() || col >= self.width() {
            return None;
        }
        self.cells[row * self.width() + col]
    }

    fn mark(&mut self, ship: &Ship) {
        let width = self.width();
        for c in ship.coordinates() {
            self.cells[c.row() as usize * width + c.col() as usize] = Some(ship.length());
        }
    }
}

/// Whether `ship` fits at (`row`, `col`) in its own orientation without
/// leaving the grid or touching an occupied cell.
pub fn is_suitable(grid: &PlacementGrid, ship: &Ship, row: usize, col: usize) -> bool {
    fits(grid, ship.length(), ship.orientation(), row, col)
}

fn fits(
    grid: &PlacementGrid,
    length: usize,
    orientation: Orientation,
    row: usize,
    col: usize,
) -> bool {
    if row == 0 || col == 0 || row > grid.size() || col > grid.size() {
        return false;
    }
    match orientation {
        Orientation::Horizontal => {
            if col + length > grid.width() {
                return false;
            }
            (col..col + length).all(|c| grid.get(row, c).is_none())
        }
        Orientation::Vertical => {
            if row + length > grid.width() {
                return false;
            }
            (row..row + length).all(|r| grid.get(r, col).is_none())
        }
    }
}

/// Place every ship of `fleet` at a random non-overlapping anchor.
///
/// Each ship gets [`MAX_PLACEMENT_ATTEMPTS`] uniformly random anchors; after
/// that every free run is enumerated (own orientation first, then flipped)
/// and one is chosen at random. If a ship fits nowhere the whole fleet is
/// re-placed, at most [`MAX_FLEET_RESTARTS`] times.
pub fn place_fleet<R: Rng>(
    fleet: Fleet,
    dimension: u32,
    rng: &mut R,
) -> Result<Fleet, BoardError> {
    if dimension == 0 || dimension > MAX_DIMENSION {
        return Err(BoardError::DimensionOutOfRange(dimension));
    }
    let mut ships = fleet.into_ships();
    let mut stuck = 0;
    for restart in 0..=MAX_FLEET_RESTARTS {
        match try_place(&mut ships, dimension, rng) {
            Ok(()) => {
                debug!("placed {} ships after {} restarts", ships.len(), restart);
                return Ok(Fleet { ships });
            }
            Err(length) => {
                warn!("no free run for ship of length {length}; restarting placement");
                stuck = length;
            }
        }
    }
    Err(BoardError::UnableToPlaceShip {
        length: stuck,
        restarts: MAX_FLEET_RESTARTS,
    })
}

/// Returns the length of the first ship that could not be placed.
fn try_place<R: Rng>(ships: &mut [Ship], dimension: u32, rng: &mut R) -> Result<(), usize> {
    let mut grid = PlacementGrid::new(dimension);
    for ship in ships.iter_mut() {
        let (row, col, orientation) = sample_anchor(&grid, ship, rng)
            .or_else(|| scan_anchor(&grid, ship, rng))
            .ok_or(ship.length())?;
        if !ship.set_anchor(row as u8, col as u8, orientation) {
            return Err(ship.length());
        }
        grid.mark(ship);
    }
    Ok(())
}

fn sample_anchor<R: Rng>(
    grid: &PlacementGrid,
    ship: &Ship,
    rng: &mut R,
) -> Option<(usize, usize, Orientation)> {
    for _ in 0..MAX_PLACEMENT_ATTEMPTS {
        let row = rng.random_range(1..=grid.size());
        let col = rng.random_range(1..=grid.size());
        if is_suitable(grid, ship, row, col) {
            return Some((row, col, ship.orientation()));
        }
    }
    None
}

fn scan_anchor<R: Rng>(
    grid: &PlacementGrid,
    ship: &Ship,
    rng: &mut R,
) -> Option<(usize, usize, Orientation)> {
    let size = grid.size();
    for orientation in [ship.orientation(), ship.orientation().flipped()] {
        let free: Vec<(usize, usize)> = (1..=size)
            .flat_map(|r| (1..=size).map(move |c| (r, c)))
            .filter(|&(r, c)| fits(grid, ship.length(), orientation, r, c))
            .collect();
        if !free.is_empty() {
            let (row, col) = free[rng.random_range(0..free.len())];
            return Some((row, col, orientation));
        }
    }
    None
}

/// Percentage of a side's ships still afloat, truncated toward zero.
pub fn board_health_percent(remaining: usize, max: usize) -> i32 {
    if max == 0 {
        return 0;
    }
    (remaining * 100 / max) as i32
}
