//! Carry resolution: a full rod is traded for the equivalent number of beads
//! on the next more significant rod, cascading upward.
//!
//! The exchange rate is `capacity * mult[rod] / mult[rod + 1]` with integer
//! truncation. Both built-in modes divide exactly; for other multiplier
//! tables the remainder is dropped, so a carry can lose score.

use super::models::{Multipliers, RodSet, ROD_CAPACITY, ROD_COUNT};

/// What a carry did to a rod set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CarryOutcome {
    /// Beads placed on the rod directly above the source rod.
    pub beads_moved: u32,
    /// Beads that did not fit on the top rod and were discarded.
    pub discarded: u32,
}

/// Beads on `rod + 1` worth one full `rod`. Zero for the top rod.
pub fn carry_unit(multipliers: &Multipliers, rod: usize) -> u32 {
    if rod + 1 >= ROD_COUNT || multipliers[rod + 1] == 0 {
        return 0;
    }
    (ROD_CAPACITY as u32 * multipliers[rod]) / multipliers[rod + 1]
}

/// Empty a full `from_rod` into the rod above it.
///
/// Returns `None` (and leaves the rods untouched) for the top rod or when the
/// exchange rate truncates to zero.
pub fn perform_carry(
    rods: &mut RodSet,
    multipliers: &Multipliers,
    from_rod: usize,
) -> Option<CarryOutcome> {
    if from_rod + 1 >= ROD_COUNT {
        return None;
    }
    let beads_to_move = carry_unit(multipliers, from_rod);
    if beads_to_move == 0 {
        return None;
    }

    rods.set(from_rod, 0);
    let discarded = add_beads_with_carry(rods, multipliers, from_rod + 1, beads_to_move);
    Some(CarryOutcome {
        beads_moved: beads_to_move,
        discarded,
    })
}

/// Add `beads` to `rod`, wrapping every full ten into the rod above.
/// The top rod clamps at capacity; returns how many beads were clamped away.
pub fn add_beads_with_carry(
    rods: &mut RodSet,
    multipliers: &Multipliers,
    rod: usize,
    beads: u32,
) -> u32 {
    let capacity = ROD_CAPACITY as u32;
    let mut rod = rod;
    let mut beads = beads;

    while beads > 0 && rod < ROD_COUNT {
        let value = rods.get(rod) as u32 + beads;

        if rod == ROD_COUNT - 1 {
            rods.set(rod, value.min(capacity) as u8);
            return value.saturating_sub(capacity);
        }

        let overflow = value / capacity;
        rods.set(rod, (value % capacity) as u8);
        beads = overflow * carry_unit(multipliers, rod);
        rod += 1;
    }
    0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::models::GameMode;
    use crate::engine::scoring::compute_score;

    const M365: Multipliers = [5, 10, 100];
    const M101: Multipliers = [1, 10, 100];

    #[test]
    fn test_carry_units_for_builtin_modes() {
        assert_eq!(carry_unit(&M365, 0), 5);
        assert_eq!(carry_unit(&M365, 1), 1);
        assert_eq!(carry_unit(&M101, 0), 1);
        assert_eq!(carry_unit(&M101, 1), 1);
        assert_eq!(carry_unit(&M101, 2), 0);
    }

    #[test]
    fn test_carry_from_bottom_rod_365() {
        let mut rods = RodSet::from_values([10, 2, 0]);
        let before = compute_score(&rods, &M365);
        let outcome = perform_carry(&mut rods, &M365, 0).unwrap();
        assert_eq!(outcome.beads_moved, 5);
        assert_eq!(outcome.discarded, 0);
        assert_eq!(rods.values(), [0, 7, 0]);
        assert_eq!(compute_score(&rods, &M365), before);
    }

    #[test]
    fn test_carry_cascades_through_middle_rod() {
        // 5 beads onto a middle rod at 8 -> 13: keep 3, push one ten upward.
        let mut rods = RodSet::from_values([10, 8, 2]);
        let before = compute_score(&rods, &M365);
        perform_carry(&mut rods, &M365, 0).unwrap();
        assert_eq!(rods.values(), [0, 3, 3]);
        assert_eq!(compute_score(&rods, &M365), before);
    }

    #[test]
    fn test_carry_into_top_rod_clamps() {
        let mut rods = RodSet::from_values([0, 10, 9]);
        let outcome = perform_carry(&mut rods, &M365, 1).unwrap();
        assert_eq!(rods.values(), [0, 0, 10]);
        assert_eq!(outcome.discarded, 0);

        // A full top rod swallows the carried bead.
        let mut rods = RodSet::from_values([0, 10, 10]);
        let outcome = perform_carry(&mut rods, &M365, 1).unwrap();
        assert_eq!(rods.values(), [0, 0, 10]);
        assert_eq!(outcome.discarded, 1);
    }

    #[test]
    fn test_top_rod_never_carries_out() {
        let mut rods = RodSet::from_values([1, 2, 10]);
        assert_eq!(perform_carry(&mut rods, &M365, 2), None);
        assert_eq!(perform_carry(&mut rods, &M365, 9), None);
        assert_eq!(rods.values(), [1, 2, 10]);
    }

    #[test]
    fn test_zero_exchange_rate_is_noop() {
        // 10 * 1 / 20 truncates to zero.
        let mut rods = RodSet::from_values([10, 4, 0]);
        assert_eq!(perform_carry(&mut rods, &[1, 20, 100], 0), None);
        assert_eq!(rods.values(), [10, 4, 0]);
    }

    #[test]
    fn test_inexact_ratio_truncates_score() {
        // 10 * 5 / 20 = 2.5 -> 2 beads; half a bead (10 points) is lost.
        let mults: Multipliers = [5, 20, 100];
        let mut rods = RodSet::from_values([10, 0, 0]);
        let before = compute_score(&rods, &mults);
        let outcome = perform_carry(&mut rods, &mults, 0).unwrap();
        assert_eq!(outcome.beads_moved, 2);
        assert_eq!(rods.values(), [0, 2, 0]);
        assert_eq!(before - compute_score(&rods, &mults), 10);
    }

    #[test]
    fn test_carry_conserves_score_for_every_builtin_state() {
        for mode in GameMode::ALL {
            let mults = mode.multipliers();
            for from in 0..ROD_COUNT - 1 {
                for a in 0..=ROD_CAPACITY {
                    for b in 0..ROD_CAPACITY {
                        let mut values = [a, b, 0];
                        values[from] = ROD_CAPACITY;
                        let mut rods = RodSet::from_values(values);
                        let before = compute_score(&rods, &mults);
                        perform_carry(&mut rods, &mults, from).unwrap();
                        assert_eq!(compute_score(&rods, &mults), before, "{mode:?} {values:?}");
                        assert!(rods.values().iter().all(|&v| v <= ROD_CAPACITY));
                    }
                }
            }
        }
    }

    #[test]
    fn test_add_beads_zero_is_noop() {
        let mut rods = RodSet::from_values([3, 3, 3]);
        assert_eq!(add_beads_with_carry(&mut rods, &M101, 1, 0), 0);
        assert_eq!(rods.values(), [3, 3, 3]);
    }
}
