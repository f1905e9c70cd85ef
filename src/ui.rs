//! Console presentation: status reporting and board rendering.

use core::fmt;

use log::{error, info};

use crate::config::{ALPHABET, MAX_DIMENSION};
use crate::game::PlayerId;
use crate::protocol::{ResolvedShot, TurnResponse};
use crate::ship::Ship;

/// Presentation layer notified by the coordinator.
///
/// Purely a sink: nothing reported here flows back into the game.
pub trait Reporter: Send {
    /// Human-readable progress message.
    fn status(&mut self, message: &str);

    /// Something went wrong and the host should know.
    fn error(&mut self, error: &dyn fmt::Display);

    /// The match ended with `winner` sinking the other fleet.
    fn game_over(&mut self, winner: PlayerId);
}

/// [`Reporter`] that prints to stdout and mirrors every event into the log.
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn status(&mut self, message: &str) {
        info!("{message}");
        std::println!("{message}");
    }

    fn error(&mut self, error: &dyn fmt::Display) {
        error!("{error}");
        std::eprintln!("Error: {error}");
    }

    fn game_over(&mut self, winner: PlayerId) {
        info!("game over, player {winner} wins");
        std::println!("\n=== GAME OVER ===");
        std::println!("Player {winner} has sunk the entire enemy fleet!");
    }
}

/// [`Reporter`] that discards everything.
pub struct SilentReporter;

impl Reporter for SilentReporter {
    fn status(&mut self, _message: &str) {}
    fn error(&mut self, _error: &dyn fmt::Display) {}
    fn game_over(&mut self, _winner: PlayerId) {}
}

/// Render a fleet on a `(2D) × (2D)` grid. Each cell shows the length of the
/// ship on it, `X` for a destroyed ship, or `.` for open water. Dimensions
/// past [`MAX_DIMENSION`] are drawn at that size.
pub fn render_fleet(ships: &[Ship], dimension: u32) -> String {
    let size = dimension.min(MAX_DIMENSION) as usize * 2;
    let mut grid = vec![vec!['.'; size + 1]; size + 1];
    for ship in ships {
        let mark = if ship.is_destroyed() {
            'X'
        } else {
            char::from_digit(ship.length() as u32 % 36, 36).unwrap_or('#')
        };
        for c in ship.coordinates() {
            let (r, col) = (c.row() as usize, c.col() as usize);
            if r <= size && col <= size {
                grid[r][col] = mark;
            }
        }
    }

    let mut out = String::from("   ");
    for col in 1..=size {
        out.push(' ');
        out.push(ALPHABET[col]);
    }
    out.push('\n');
    for (r, row) in grid.iter().enumerate().skip(1) {
        out.push_str(&format!("{r:2} "));
        for cell in row.iter().skip(1) {
            out.push(' ');
            out.push(*cell);
        }
        out.push('\n');
    }
    out
}

/// One-paragraph summary of a turn response for the CLI.
pub fn describe_response(response: &TurnResponse) -> String {
    match response {
        TurnResponse::Invalid => "Invalid shot: it is not your turn.".to_string(),
        TurnResponse::Resolved(shot) => describe_shot(shot),
    }
}

fn describe_shot(shot: &ResolvedShot) -> String {
    let mut out = format!("Result: {:?}\n", shot.status);
    if let Some(ship) = &shot.ship {
        out.push_str(&format!(
            "Struck a ship of length {} ({} health left{})\n",
            ship.length(),
            ship.health(),
            if ship.is_destroyed() { ", destroyed" } else { "" }
        ));
    }
    match shot.previous {
        Some(prev) => out.push_str(&format!(
            "Opponent's last shot: {} ({})\n",
            prev,
            if shot.previous_hit { "HIT" } else { "MISSED" }
        )),
        None => out.push_str("Opponent has not fired yet\n"),
    }
    out.push_str(&format!(
        "Target health: {}%  Your health: {}%\n",
        shot.target_health, shot.firing_health
    ));
    out.push_str("Log:\n");
    out.push_str(&shot.log);
    out
}
