use std::collections::HashSet;

use naval_duel::{generate_fleet, place_fleet, Coordinate, Fleet};
use proptest::prelude::*;
use rand::rngs::SmallRng;
use rand::SeedableRng;

fn placed_fleet(dimension: u32, seed: u64) -> Fleet {
    let mut rng = SmallRng::seed_from_u64(seed);
    place_fleet(generate_fleet(dimension, &mut rng), dimension, &mut rng).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn fleet_follows_length_schedule(dimension in 1u32..=13, seed in any::<u64>()) {
        let mut rng = SmallRng::seed_from_u64(seed);
        let fleet = generate_fleet(dimension, &mut rng);
        let d = dimension as usize;
        prop_assert_eq!(fleet.len(), d * (d + 1) / 2);
        for length in 1..=d {
            let count = fleet.ships().iter().filter(|s| s.length() == length).count();
            prop_assert_eq!(count, d - length + 1);
        }
    }

    #[test]
    fn placement_is_disjoint_and_in_bounds(dimension in 1u32..=13, seed in any::<u64>()) {
        let fleet = placed_fleet(dimension, seed);
        let mut seen = HashSet::new();
        for ship in fleet.ships() {
            prop_assert_eq!(ship.coordinates().len(), ship.length());
            for c in ship.coordinates() {
                prop_assert!(c.within(dimension));
                prop_assert!(seen.insert(*c));
            }
        }
    }

    #[test]
    fn miss_is_idempotent(dimension in 1u32..=6, seed in any::<u64>(), row in 1u8..=12, col in 1u8..=12) {
        let fleet = placed_fleet(dimension, seed);
        let target = Coordinate::new(col, row).unwrap();
        prop_assume!(!fleet.ships().iter().any(|s| s.occupies(&target)));

        let before = fleet.clone();
        let (fleet, first) = fleet.resolve_shot(&target);
        let (fleet, second) = fleet.resolve_shot(&target);
        prop_assert!(!first.hit && !second.hit);
        prop_assert_eq!(fleet, before);
    }

    #[test]
    fn hit_costs_exactly_one_health(dimension in 1u32..=6, seed in any::<u64>(), pick in any::<prop::sample::Index>()) {
        let fleet = placed_fleet(dimension, seed);
        let cells: Vec<(usize, Coordinate)> = fleet
            .ships()
            .iter()
            .enumerate()
            .flat_map(|(i, s)| s.coordinates().iter().map(move |c| (i, *c)))
            .collect();
        let (idx, target) = cells[pick.index(cells.len())];
        let before = fleet.ships()[idx].health();

        let (fleet, shot) = fleet.resolve_shot(&target);
        prop_assert!(shot.hit);
        let after = fleet.ships()[idx].health();
        prop_assert_eq!(after, before - 1);
        prop_assert_eq!(fleet.ships()[idx].is_destroyed(), after == 0);
        prop_assert_eq!(shot.sunk, after == 0);

        // Keep firing at the same cell: health bottoms out at zero.
        let mut fleet = fleet;
        for _ in 0..before + 1 {
            let (next, _) = fleet.resolve_shot(&target);
            fleet = next;
        }
        prop_assert_eq!(fleet.ships()[idx].health(), 0);
        prop_assert!(fleet.ships()[idx].is_destroyed());
    }
}
