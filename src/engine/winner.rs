//! Win evaluation over a list of entrant scores.

use super::models::GameMode;

pub fn is_winning_score(mode: GameMode, score: u32) -> bool {
    mode.win_rule().is_met(score)
}

/// Authoritative winner: the highest eligible score, lowest index on ties.
/// `None` when nobody has crossed the mode's threshold.
pub fn determine_winner(scores: &[u32], mode: GameMode) -> Option<usize> {
    let mut best: Option<(usize, u32)> = None;
    for (idx, &score) in scores.iter().enumerate() {
        if !is_winning_score(mode, score) {
            continue;
        }
        match best {
            Some((_, top)) if score <= top => {}
            _ => best = Some((idx, score)),
        }
    }
    best.map(|(idx, _)| idx)
}

/// Entrant to highlight while play is ongoing: an eligible entrant whose
/// score is strictly above every other eligible score. A tie at the top
/// highlights nobody.
pub fn live_leader(scores: &[u32], mode: GameMode) -> Option<usize> {
    let eligible: Vec<(usize, u32)> = scores
        .iter()
        .copied()
        .enumerate()
        .filter(|&(_, s)| is_winning_score(mode, s))
        .collect();

    eligible
        .iter()
        .find(|&&(idx, score)| {
            eligible
                .iter()
                .all(|&(other, other_score)| other == idx || score > other_score)
        })
        .map(|&(idx, _)| idx)
}

/// Entrants tied at the highest positive win count across a series.
pub fn series_leaders(total_wins: &[u32]) -> Vec<usize> {
    let top = total_wins.iter().copied().max().unwrap_or(0);
    if top == 0 {
        return Vec::new();
    }
    total_wins
        .iter()
        .enumerate()
        .filter(|(_, &w)| w == top)
        .map(|(i, _)| i)
        .collect()
}
