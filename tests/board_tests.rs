use std::collections::HashSet;

use naval_duel::{
    board_health_percent, fleet_size, generate_fleet, is_suitable, place_fleet, BoardError,
    Coordinate, Fleet, Orientation, PlacementGrid, Ship,
};
use rand::rngs::SmallRng;
use rand::SeedableRng;

fn coord(s: &str) -> Coordinate {
    s.parse().unwrap()
}

#[test]
fn test_generate_fleet_schedule() {
    let mut rng = SmallRng::seed_from_u64(1);
    let fleet = generate_fleet(4, &mut rng);
    let lengths: Vec<usize> = fleet.ships().iter().map(Ship::length).collect();
    assert_eq!(lengths, vec![4, 3, 3, 2, 2, 2, 1, 1, 1, 1]);
    assert_eq!(fleet.len(), fleet_size(4));
    assert!(fleet.ships().iter().all(|s| !s.is_placed()));
    assert!(fleet.ships().iter().all(|s| s.health() == s.length()));
}

#[test]
fn test_single_ship_fleet() {
    let mut rng = SmallRng::seed_from_u64(2);
    let fleet = place_fleet(generate_fleet(1, &mut rng), 1, &mut rng).unwrap();
    assert_eq!(fleet.len(), 1);
    let ship = &fleet.ships()[0];
    assert_eq!(ship.length(), 1);
    assert_eq!(ship.coordinates().len(), 1);
    assert!(ship.coordinates()[0].within(1));
}

#[test]
fn test_placed_ship_coordinates() {
    let ship = Ship::placed(3, Orientation::Horizontal, 2, 1).unwrap();
    let cells: Vec<String> = ship.coordinates().iter().map(|c| c.to_string()).collect();
    assert_eq!(cells, ["A2", "B2", "C2"]);
    assert_eq!(ship.origin(), (2, 1));

    let ship = Ship::placed(3, Orientation::Vertical, 1, 4).unwrap();
    let cells: Vec<String> = ship.coordinates().iter().map(|c| c.to_string()).collect();
    assert_eq!(cells, ["D1", "D2", "D3"]);
    assert!(ship.occupies(&coord("D2")));
    assert!(!ship.occupies(&coord("D4")));
}

#[test]
fn test_placed_rejects_runs_off_the_grid() {
    // Would need a column past Z.
    assert!(Ship::placed(3, Orientation::Horizontal, 1, 25).is_none());
    assert!(Ship::placed(2, Orientation::Horizontal, 1, 25).is_some());
    // Row arithmetic would overflow.
    assert!(Ship::placed(3, Orientation::Vertical, 255, 1).is_none());
    assert!(Ship::placed(3, Orientation::Vertical, 0, 1).is_none());
    assert!(Ship::placed(0, Orientation::Vertical, 1, 1).is_none());

    let cells = Ship::cells(2, Orientation::Vertical, 254, 3).unwrap();
    assert_eq!(cells.len(), 2);
    assert!(Ship::cells(3, Orientation::Vertical, 254, 3).is_none());
}

#[test]
fn test_is_suitable_bounds() {
    let grid = PlacementGrid::new(2);
    assert_eq!(grid.size(), 4);
    assert_eq!(grid.width(), 5);

    let horizontal = Ship::new(2, Orientation::Horizontal);
    assert!(is_suitable(&grid, &horizontal, 1, 3));
    assert!(!is_suitable(&grid, &horizontal, 1, 4));
    assert!(is_suitable(&grid, &horizontal, 4, 1));

    let vertical = Ship::new(2, Orientation::Vertical);
    assert!(is_suitable(&grid, &vertical, 3, 4));
    assert!(!is_suitable(&grid, &vertical, 4, 4));

    assert!(!is_suitable(&grid, &horizontal, 0, 1));
    assert!(!is_suitable(&grid, &horizontal, 5, 1));
}

#[test]
fn test_place_fleet_no_overlap() {
    let mut rng = SmallRng::seed_from_u64(42);
    for dimension in 1..=13 {
        let fleet = place_fleet(generate_fleet(dimension, &mut rng), dimension, &mut rng).unwrap();
        let mut seen = HashSet::new();
        let mut cells = 0;
        for ship in fleet.ships() {
            assert_eq!(ship.coordinates().len(), ship.length());
            for c in ship.coordinates() {
                assert!(c.within(dimension), "{c} outside D={dimension}");
                assert!(seen.insert(*c), "{c} used twice at D={dimension}");
                cells += 1;
            }
        }
        let d = dimension as usize;
        assert_eq!(cells, d * (d + 1) * (d + 2) / 6);
    }
}

#[test]
fn test_place_fleet_rejects_bad_dimension() {
    let mut rng = SmallRng::seed_from_u64(3);
    assert_eq!(
        place_fleet(Fleet::default(), 0, &mut rng).unwrap_err(),
        BoardError::DimensionOutOfRange(0)
    );
    assert_eq!(
        place_fleet(Fleet::default(), 14, &mut rng).unwrap_err(),
        BoardError::DimensionOutOfRange(14)
    );
}

#[test]
fn test_resolve_shot_hit_and_sink() {
    let fleet = Fleet::from_ships(vec![
        Ship::placed(2, Orientation::Horizontal, 1, 1).unwrap(),
        Ship::placed(1, Orientation::Vertical, 3, 3).unwrap(),
    ]);

    let (fleet, shot) = fleet.resolve_shot(&coord("A1"));
    assert!(shot.hit);
    assert!(!shot.sunk);
    assert_eq!(shot.ship.as_ref().unwrap().health(), 1);

    let (fleet, shot) = fleet.resolve_shot(&coord("B1"));
    assert!(shot.hit);
    assert!(shot.sunk);
    assert!(shot.ship.as_ref().unwrap().is_destroyed());
    assert_eq!(fleet.afloat(), 1);

    // A destroyed ship is still struck but never drops below zero.
    let (fleet, shot) = fleet.resolve_shot(&coord("B1"));
    assert!(shot.hit);
    assert!(!shot.sunk);
    assert_eq!(fleet.ships()[0].health(), 0);
    assert_eq!(fleet.afloat(), 1);
}

#[test]
fn test_resolve_shot_miss_leaves_fleet_untouched() {
    let fleet = Fleet::from_ships(vec![Ship::placed(2, Orientation::Vertical, 1, 1).unwrap()]);
    let before = fleet.clone();
    let (fleet, shot) = fleet.resolve_shot(&coord("B1"));
    assert!(!shot.hit);
    assert!(shot.ship.is_none());
    assert_eq!(fleet, before);
}

#[test]
fn test_board_health_percent() {
    assert_eq!(board_health_percent(3, 3), 100);
    assert_eq!(board_health_percent(2, 3), 66);
    assert_eq!(board_health_percent(1, 3), 33);
    assert_eq!(board_health_percent(0, 3), 0);
    assert_eq!(board_health_percent(7, 10), 70);
    assert_eq!(board_health_percent(0, 0), 0);
}
