pub mod builder;
pub mod error;
pub mod seeding;
pub mod simulate;
pub mod stats;
mod tournament;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use error::{BracketError, BracketResult};
pub use seeding::SeedingMode;
pub use simulate::SimulationReport;
pub use stats::{ProgressBand, Stats};
pub use tournament::{
    DEFAULT_TOURNAMENT_NAME, MAX_PARTICIPANTS, STRICT_PARTICIPANT_COUNTS, Tournament,
    validate_participant_count,
};

// ---------------------------------------------------------------------------
// Domain types
// ---------------------------------------------------------------------------

/// One entrant. Seeded participants carry `id == seed`; entrants typed into an
/// empty slot after generation get a fresh id and no seed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Participant {
    pub id: Option<u32>,
    pub name: String,
    pub seed: Option<u32>,
}

impl Participant {
    pub fn seeded(seed: u32) -> Self {
        Self {
            id: Some(seed),
            name: format!("Player {seed}"),
            seed: Some(seed),
        }
    }

    pub fn unseeded(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            seed: None,
        }
    }

    /// Same entrant as `other`: equal ids when both have one, otherwise
    /// equal in every field.
    pub fn is_same_entrant(&self, other: &Participant) -> bool {
        match (self.id, other.id) {
            (Some(a), Some(b)) => a == b,
            _ => self == other,
        }
    }

    /// `"Player 3 (Seed 3)"`, or just the name for unseeded entrants.
    pub fn label(&self) -> String {
        match self.seed {
            Some(seed) => format!("{} (Seed {seed})", self.name),
            None => self.name.clone(),
        }
    }
}

/// `Player 1..=count`, ordered by seed.
pub fn default_participants(count: usize) -> Vec<Participant> {
    (1..=count as u32).map(Participant::seeded).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Player1,
    Player2,
}

impl Side {
    /// Position a winner from slot `slot` takes in the next round.
    pub fn for_slot(slot: usize) -> Self {
        if slot % 2 == 0 {
            Side::Player1
        } else {
            Side::Player2
        }
    }

    pub fn other(self) -> Self {
        match self {
            Side::Player1 => Side::Player2,
            Side::Player2 => Side::Player1,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Player1 => write!(f, "player1"),
            Side::Player2 => write!(f, "player2"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    #[default]
    Pending,
    Completed,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub player1: Option<Participant>,
    pub player2: Option<Participant>,
    pub winner: Option<Participant>,
    pub status: MatchStatus,
    pub is_bye: bool,
}

impl Match {
    pub fn new(player1: Option<Participant>, player2: Option<Participant>) -> Self {
        let mut m = Self {
            player1,
            player2,
            ..Self::default()
        };
        m.refresh_bye();
        m
    }

    pub fn player(&self, side: Side) -> Option<&Participant> {
        match side {
            Side::Player1 => self.player1.as_ref(),
            Side::Player2 => self.player2.as_ref(),
        }
    }

    pub(crate) fn slot_mut(&mut self, side: Side) -> &mut Option<Participant> {
        match side {
            Side::Player1 => &mut self.player1,
            Side::Player2 => &mut self.player2,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == MatchStatus::Pending
    }

    pub fn is_completed(&self) -> bool {
        self.status == MatchStatus::Completed
    }

    /// The only participant present, if exactly one side is filled.
    pub fn lone_participant(&self) -> Option<(Side, &Participant)> {
        match (&self.player1, &self.player2) {
            (Some(p), None) => Some((Side::Player1, p)),
            (None, Some(p)) => Some((Side::Player2, p)),
            _ => None,
        }
    }

    pub fn winning_side(&self) -> Option<Side> {
        let winner = self.winner.as_ref()?;
        [Side::Player1, Side::Player2]
            .into_iter()
            .find(|&side| self.player(side).is_some_and(|p| p.is_same_entrant(winner)))
    }

    pub fn loser(&self) -> Option<&Participant> {
        self.player(self.winning_side()?.other())
    }

    pub fn refresh_bye(&mut self) {
        self.is_bye = self.player1.is_some() != self.player2.is_some();
    }
}

/// One elimination stage; match index is the slot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Round {
    pub matches: Vec<Match>,
}

impl Round {
    /// `count` pending placeholder matches, filled only by propagation.
    pub fn empty(count: usize) -> Self {
        Self {
            matches: vec![Match::default(); count],
        }
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn completed(&self) -> usize {
        self.matches.iter().filter(|m| m.is_completed()).count()
    }

    /// Column header for round `index` of `total`.
    pub fn label(index: usize, total: usize) -> String {
        if index == 0 {
            "Round 1".to_string()
        } else if index + 1 == total {
            "Final".to_string()
        } else if index + 2 == total && total > 2 {
            "Semi Final".to_string()
        } else if index + 3 == total && total > 3 {
            "Quarter Final".to_string()
        } else {
            format!("Round {}", index + 1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn side_for_slot_alternates() {
        assert_eq!(Side::for_slot(0), Side::Player1);
        assert_eq!(Side::for_slot(1), Side::Player2);
        assert_eq!(Side::for_slot(6), Side::Player1);
        assert_eq!(Side::for_slot(7), Side::Player2);
    }

    #[test]
    fn match_new_flags_byes() {
        let p = Participant::seeded(1);
        assert!(Match::new(Some(p.clone()), None).is_bye);
        assert!(Match::new(None, Some(p.clone())).is_bye);
        assert!(!Match::new(Some(p.clone()), Some(Participant::seeded(2))).is_bye);
        assert!(!Match::new(None, None).is_bye);
    }

    #[test]
    fn loser_is_the_other_side() {
        let mut m = Match::new(Some(Participant::seeded(1)), Some(Participant::seeded(8)));
        assert_eq!(m.loser(), None);
        m.winner = m.player2.clone();
        m.status = MatchStatus::Completed;
        assert_eq!(m.winning_side(), Some(Side::Player2));
        assert_eq!(m.loser().and_then(|p| p.seed), Some(1));
    }

    #[test]
    fn same_named_walk_ins_are_told_apart_by_id() {
        let first = Participant {
            id: Some(9),
            ..Participant::unseeded("Late")
        };
        let second = Participant {
            id: Some(10),
            ..Participant::unseeded("Late")
        };
        assert!(!first.is_same_entrant(&second));
        assert!(first.is_same_entrant(&Participant {
            name: "Renamed".into(),
            ..first.clone()
        }));

        let mut m = Match::new(Some(first), Some(second.clone()));
        m.winner = Some(second);
        m.status = MatchStatus::Completed;
        assert_eq!(m.winning_side(), Some(Side::Player2));
        assert_eq!(m.loser().and_then(|p| p.id), Some(9));
    }

    #[test]
    fn round_labels_follow_distance_from_final() {
        let labels: Vec<String> = (0..4).map(|i| Round::label(i, 4)).collect();
        assert_eq!(labels, ["Round 1", "Quarter Final", "Semi Final", "Final"]);

        let labels: Vec<String> = (0..3).map(|i| Round::label(i, 3)).collect();
        assert_eq!(labels, ["Round 1", "Semi Final", "Final"]);

        assert_eq!(Round::label(0, 1), "Round 1");
        assert_eq!(Round::label(1, 2), "Final");
        assert_eq!(Round::label(1, 6), "Round 2");
    }

    #[test]
    fn participant_label_includes_seed_when_present() {
        assert_eq!(Participant::seeded(4).label(), "Player 4 (Seed 4)");
        assert_eq!(Participant::unseeded("Walk-in").label(), "Walk-in");
    }

    #[test]
    fn default_participants_are_seeded_in_order() {
        let players = default_participants(3);
        let seeds: Vec<Option<u32>> = players.iter().map(|p| p.seed).collect();
        assert_eq!(seeds, [Some(1), Some(2), Some(3)]);
        assert_eq!(players[2].name, "Player 3");
    }
}
