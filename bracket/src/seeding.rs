//! Placement order for the first round.
//!
//! A placement is a flat list of `bracket_size(n)` slots; slots `2k` and
//! `2k + 1` meet in first-round match `k`. `None` is a bye.

use crate::{BracketError, Participant};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// 1-indexed seeds in placement order. Top seeds sit in opposite halves so
// they can only meet late.
const STANDARD_2: [usize; 2] = [1, 2];
const STANDARD_4: [usize; 4] = [1, 4, 2, 3];
const STANDARD_8: [usize; 8] = [1, 8, 4, 5, 3, 6, 2, 7];
const STANDARD_16: [usize; 16] = [1, 16, 8, 9, 5, 12, 4, 13, 6, 11, 3, 14, 7, 10, 2, 15];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeedingMode {
    #[default]
    Standard,
    Random,
}

impl SeedingMode {
    pub fn label(&self) -> &'static str {
        match self {
            SeedingMode::Standard => "standard",
            SeedingMode::Random => "random",
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            SeedingMode::Standard => SeedingMode::Random,
            SeedingMode::Random => SeedingMode::Standard,
        }
    }
}

impl fmt::Display for SeedingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SeedingMode {
    type Err = BracketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" | "seeded" => Ok(SeedingMode::Standard),
            "random" | "shuffle" => Ok(SeedingMode::Random),
            other => Err(BracketError::UnknownSeedingMode(other.to_string())),
        }
    }
}

/// Number of first-round slots for `count` participants. Never below 2, so a
/// lone participant still gets a (bye) match.
pub fn bracket_size(count: usize) -> usize {
    count.max(2).next_power_of_two()
}

/// Rounds needed for a bracket of `size` slots (`size` is a power of two).
pub fn total_rounds(size: usize) -> usize {
    size.trailing_zeros() as usize
}

/// The fixed interleaving table for `count`, if there is one.
pub fn standard_order(count: usize) -> Option<&'static [usize]> {
    match count {
        2 => Some(&STANDARD_2),
        4 => Some(&STANDARD_4),
        8 => Some(&STANDARD_8),
        16 => Some(&STANDARD_16),
        _ => None,
    }
}

/// Compute the first-round placement for `participants`, which must be
/// ordered by seed.
///
/// Standard mode only knows the tables for 2, 4, 8 and 16 entrants. Every
/// other count falls back to sequential pairing (1 v 2, 3 v 4, ...), which does
/// not keep top seeds apart.
pub fn seed<R: Rng + ?Sized>(
    participants: &[Participant],
    mode: SeedingMode,
    rng: &mut R,
) -> Vec<Option<Participant>> {
    match mode {
        SeedingMode::Standard => match standard_order(participants.len()) {
            Some(order) => order
                .iter()
                .map(|&seed| participants.get(seed - 1).cloned())
                .collect(),
            None => sequential(participants.to_vec()),
        },
        SeedingMode::Random => {
            let mut shuffled = participants.to_vec();
            shuffled.shuffle(rng);
            sequential(shuffled)
        }
    }
}

/// Pair entrants in order and pad with byes. With `b` byes to hand out, the
/// last `b` entrants each get one so no pairing is left without a participant.
fn sequential(participants: Vec<Participant>) -> Vec<Option<Participant>> {
    let size = bracket_size(participants.len());
    let byes = size - participants.len().min(size);
    let paired = participants.len().saturating_sub(byes);

    let mut placement = Vec::with_capacity(size);
    let mut entrants = participants.into_iter();
    placement.extend(entrants.by_ref().take(paired).map(Some));
    for entrant in entrants {
        placement.push(Some(entrant));
        placement.push(None);
    }
    placement.resize(size, None);
    placement
}
