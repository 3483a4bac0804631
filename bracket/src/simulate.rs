use crate::{BracketError, BracketResult, Tournament};
use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// What a simulation run decided.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationReport {
    /// Matches completed by this run, byes included.
    pub resolved: usize,
    /// Matches completed because only one side was present.
    pub byes: usize,
}

/// Play out every outstanding match.
///
/// Rounds are walked in ascending order since a round is only filled by the
/// one before it. A match with one participant is a bye, two participants are
/// decided by a fair coin, and an empty match is left pending.
pub fn simulate<R: Rng + ?Sized>(
    tournament: &mut Tournament,
    rng: &mut R,
) -> BracketResult<SimulationReport> {
    if tournament.is_complete() {
        return Err(BracketError::AlreadyComplete);
    }

    let mut report = SimulationReport::default();
    for round in 0..tournament.total_rounds() {
        for slot in 0..tournament.rounds()[round].len() {
            let m = &tournament.rounds()[round].matches[slot];
            if !m.is_pending() {
                continue;
            }
            let winner = match (&m.player1, &m.player2) {
                (Some(p1), Some(p2)) => {
                    if rng.random_bool(0.5) {
                        p1.clone()
                    } else {
                        p2.clone()
                    }
                }
                (Some(p), None) | (None, Some(p)) => {
                    report.byes += 1;
                    p.clone()
                }
                (None, None) => continue,
            };
            tournament.complete(round, slot, winner);
            report.resolved += 1;
        }
    }

    debug!(
        "simulated {} matches ({} byes) in '{}'",
        report.resolved,
        report.byes,
        tournament.name()
    );
    Ok(report)
}
