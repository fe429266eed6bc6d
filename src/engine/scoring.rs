//! Score calculation: bead counts weighted by the mode's rod multipliers.

use super::models::{GameMode, Multipliers, RodSet, ROD_CAPACITY};

/// Sum of `rod[i] * multipliers[i]`.
pub fn compute_score(rods: &RodSet, multipliers: &Multipliers) -> u32 {
    rods.values()
        .iter()
        .zip(multipliers)
        .map(|(&count, &mult)| count as u32 * mult)
        .sum()
}

/// Score of every entrant under `mode`, in entrant order.
pub fn entrant_scores(rod_sets: &[RodSet], mode: GameMode) -> Vec<u32> {
    let multipliers = mode.multipliers();
    rod_sets.iter().map(|r| compute_score(r, &multipliers)).collect()
}

/// Highest score a single rod set can show under `mode`.
pub fn max_score(mode: GameMode) -> u32 {
    mode.multipliers().iter().sum::<u32>() * ROD_CAPACITY as u32
}
