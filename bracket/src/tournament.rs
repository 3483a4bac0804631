use crate::seeding::{self, SeedingMode};
use crate::simulate::{self, SimulationReport};
use crate::stats::{self, Stats};
use crate::{
    BracketError, BracketResult, Match, MatchStatus, Participant, Round, Side, builder,
    default_participants,
};
use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Largest bracket the engine will generate.
pub const MAX_PARTICIPANTS: usize = 64;

/// Counts accepted when strict validation is on.
pub const STRICT_PARTICIPANT_COUNTS: [usize; 4] = [2, 4, 8, 16];

pub const DEFAULT_TOURNAMENT_NAME: &str = "Championship Bracket";

pub fn validate_participant_count(count: usize, strict: bool) -> BracketResult<usize> {
    let supported = if strict {
        STRICT_PARTICIPANT_COUNTS.contains(&count)
    } else {
        (1..=MAX_PARTICIPANTS).contains(&count)
    };
    if supported {
        Ok(count)
    } else {
        Err(BracketError::InvalidParticipantCount { count })
    }
}

/// A single-elimination bracket and its progress.
///
/// The winner of round `r`, slot `i` moves to round `r + 1`, slot `i / 2`,
/// as player1 when `i` is even and player2 when odd. The champion is set
/// exactly when the last round's only match is completed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tournament {
    name: String,
    participant_count: usize,
    max_participants: usize,
    mode: SeedingMode,
    rounds: Vec<Round>,
    champion: Option<Participant>,
}

impl Tournament {
    /// Seed `participant_count` default players and build the bracket.
    pub fn generate<R: Rng + ?Sized>(
        name: impl Into<String>,
        participant_count: usize,
        mode: SeedingMode,
        rng: &mut R,
    ) -> BracketResult<Self> {
        Self::generate_with(name.into(), participant_count, mode, false, rng)
    }

    /// Like [`Tournament::generate`], but only accepts 2, 4, 8 or 16 entrants.
    pub fn generate_strict<R: Rng + ?Sized>(
        name: impl Into<String>,
        participant_count: usize,
        mode: SeedingMode,
        rng: &mut R,
    ) -> BracketResult<Self> {
        Self::generate_with(name.into(), participant_count, mode, true, rng)
    }

    fn generate_with<R: Rng + ?Sized>(
        name: String,
        participant_count: usize,
        mode: SeedingMode,
        strict: bool,
        rng: &mut R,
    ) -> BracketResult<Self> {
        validate_participant_count(participant_count, strict)?;
        let name = checked_name(&name)?;
        let rounds = seed_and_build(participant_count, mode, rng)?;
        debug!("generated {participant_count}-player {mode} bracket '{name}'");
        Ok(Self {
            name,
            participant_count,
            max_participants: seeding::bracket_size(participant_count),
            mode,
            rounds,
            champion: None,
        })
    }

    /// Reseed from the current count and mode, dropping every result and edit.
    pub fn reset<R: Rng + ?Sized>(&mut self, rng: &mut R) -> BracketResult<()> {
        let rounds = seed_and_build(self.participant_count, self.mode, rng)?;
        self.rounds = rounds;
        self.champion = None;
        debug!("reset bracket '{}'", self.name);
        Ok(())
    }

    /// Wipe results but keep the first-round pairings.
    pub fn clear(&mut self) {
        for (index, round) in self.rounds.iter_mut().enumerate() {
            for m in &mut round.matches {
                m.winner = None;
                m.status = MatchStatus::Pending;
                if index == 0 {
                    m.refresh_bye();
                } else {
                    m.player1 = None;
                    m.player2 = None;
                    m.is_bye = false;
                }
            }
        }
        self.champion = None;
        debug!("cleared results of '{}'", self.name);
    }

    /// Decide a pending match in favour of `side` and advance the winner.
    pub fn select_winner(
        &mut self,
        round: usize,
        slot: usize,
        side: Side,
    ) -> BracketResult<Participant> {
        let current = self
            .get_match(round, slot)
            .ok_or(BracketError::MatchNotFound { round, slot })?;
        if current.is_completed() {
            return Err(BracketError::AlreadyDecided { round, slot });
        }
        let winner = current
            .player(side)
            .cloned()
            .ok_or(BracketError::EmptySlot { round, slot, side })?;

        self.complete(round, slot, winner.clone());
        Ok(winner)
    }

    /// Resolve every pending first-round bye. Returns how many were resolved.
    pub fn advance_byes(&mut self) -> usize {
        let Some(first) = self.rounds.first() else {
            return 0;
        };
        let byes: Vec<(usize, Participant)> = first
            .matches
            .iter()
            .enumerate()
            .filter(|(_, m)| m.is_pending())
            .filter_map(|(slot, m)| m.lone_participant().map(|(_, p)| (slot, p.clone())))
            .collect();

        let resolved = byes.len();
        for (slot, participant) in byes {
            self.complete(0, slot, participant);
        }
        if resolved > 0 {
            debug!("advanced {resolved} first-round byes");
        }
        resolved
    }

    pub fn simulate<R: Rng + ?Sized>(&mut self, rng: &mut R) -> BracketResult<SimulationReport> {
        simulate::simulate(self, rng)
    }

    /// Rename whoever sits in `side` of the addressed match, everywhere they
    /// appear. An empty side of a pending match takes a new unseeded entrant.
    pub fn rename_participant(
        &mut self,
        round: usize,
        slot: usize,
        side: Side,
        name: &str,
    ) -> BracketResult<Participant> {
        let name = checked_name(name)?;
        let current = self
            .get_match(round, slot)
            .ok_or(BracketError::MatchNotFound { round, slot })?;

        match current.player(side).cloned() {
            Some(previous) => {
                let renamed = Participant {
                    name,
                    ..previous.clone()
                };
                self.replace_everywhere(&previous, &renamed);
                Ok(renamed)
            }
            None => {
                if current.is_completed() {
                    return Err(BracketError::AlreadyDecided { round, slot });
                }
                let entrant = Participant {
                    id: Some(self.next_entrant_id()),
                    ..Participant::unseeded(name)
                };
                let m = &mut self.rounds[round].matches[slot];
                *m.slot_mut(side) = Some(entrant.clone());
                m.refresh_bye();
                Ok(entrant)
            }
        }
    }

    pub fn set_name(&mut self, name: &str) -> BracketResult<()> {
        self.name = checked_name(name)?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Read accessors
    // -----------------------------------------------------------------------

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn participant_count(&self) -> usize {
        self.participant_count
    }

    pub fn max_participants(&self) -> usize {
        self.max_participants
    }

    pub fn mode(&self) -> SeedingMode {
        self.mode
    }

    pub fn rounds(&self) -> &[Round] {
        &self.rounds
    }

    pub fn round(&self, index: usize) -> Option<&Round> {
        self.rounds.get(index)
    }

    pub fn get_match(&self, round: usize, slot: usize) -> Option<&Match> {
        self.rounds.get(round)?.matches.get(slot)
    }

    pub fn total_rounds(&self) -> usize {
        self.rounds.len()
    }

    pub fn champion(&self) -> Option<&Participant> {
        self.champion.as_ref()
    }

    pub fn is_complete(&self) -> bool {
        self.champion.is_some()
    }

    pub fn stats(&self) -> Stats {
        stats::compute(&self.rounds)
    }

    // -----------------------------------------------------------------------
    // Propagation
    // -----------------------------------------------------------------------

    /// Mark `(round, slot)` won by `winner` and move the winner on. A filled
    /// position in the next round is never overwritten.
    pub(crate) fn complete(&mut self, round: usize, slot: usize, winner: Participant) {
        let last = self.rounds.len() - 1;
        let m = &mut self.rounds[round].matches[slot];
        m.winner = Some(winner.clone());
        m.status = MatchStatus::Completed;

        if round == last {
            debug!("{} is champion", winner.label());
            self.champion = Some(winner);
            return;
        }

        let side = Side::for_slot(slot);
        let next = &mut self.rounds[round + 1].matches[slot / 2];
        let target = next.slot_mut(side);
        if target.is_none() {
            debug!(
                "{} advances to round {} match {} as {side}",
                winner.label(),
                round + 2,
                slot / 2 + 1
            );
            *target = Some(winner);
        } else {
            debug!("round {} match {} {side} already filled", round + 2, slot / 2 + 1);
        }
        next.refresh_bye();
    }

    /// One past the highest id in use, never below the seeded range.
    fn next_entrant_id(&self) -> u32 {
        self.rounds
            .iter()
            .flat_map(|r| &r.matches)
            .flat_map(|m| [&m.player1, &m.player2, &m.winner])
            .chain([&self.champion])
            .flatten()
            .filter_map(|p| p.id)
            .fold(self.participant_count as u32, u32::max)
            + 1
    }

    fn replace_everywhere(&mut self, previous: &Participant, renamed: &Participant) {
        for m in self.rounds.iter_mut().flat_map(|r| r.matches.iter_mut()) {
            for entrant in [&mut m.player1, &mut m.player2, &mut m.winner]
                .into_iter()
                .flatten()
            {
                if entrant.is_same_entrant(previous) {
                    *entrant = renamed.clone();
                }
            }
        }
        if let Some(champion) = self.champion.as_mut()
            && champion.is_same_entrant(previous)
        {
            *champion = renamed.clone();
        }
    }
}

fn seed_and_build<R: Rng + ?Sized>(
    participant_count: usize,
    mode: SeedingMode,
    rng: &mut R,
) -> BracketResult<Vec<Round>> {
    let participants = default_participants(participant_count);
    let placement = seeding::seed(&participants, mode, rng);
    builder::build(&placement)
}

fn checked_name(name: &str) -> BracketResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        Err(BracketError::InvalidName)
    } else {
        Ok(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn eight() -> Tournament {
        let mut rng = StdRng::seed_from_u64(3);
        Tournament::generate("Cup", 8, SeedingMode::Standard, &mut rng).unwrap()
    }

    fn seed_at(t: &Tournament, round: usize, slot: usize, side: Side) -> Option<u32> {
        t.get_match(round, slot)?.player(side)?.seed
    }

    #[test]
    fn generate_sets_sizes() {
        let mut rng = StdRng::seed_from_u64(3);
        let t = Tournament::generate("Cup", 5, SeedingMode::Standard, &mut rng).unwrap();
        assert_eq!(t.participant_count(), 5);
        assert_eq!(t.max_participants(), 8);
        assert_eq!(t.total_rounds(), 3);
        assert_eq!(t.champion(), None);
    }

    #[test]
    fn generate_rejects_bad_counts() {
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(
            Tournament::generate("Cup", 0, SeedingMode::Standard, &mut rng).unwrap_err(),
            BracketError::InvalidParticipantCount { count: 0 }
        );
        assert_eq!(
            Tournament::generate("Cup", 65, SeedingMode::Random, &mut rng).unwrap_err(),
            BracketError::InvalidParticipantCount { count: 65 }
        );
        assert!(Tournament::generate("Cup", 6, SeedingMode::Standard, &mut rng).is_ok());
        assert_eq!(
            Tournament::generate_strict("Cup", 6, SeedingMode::Standard, &mut rng).unwrap_err(),
            BracketError::InvalidParticipantCount { count: 6 }
        );
        assert_eq!(
            Tournament::generate("  ", 8, SeedingMode::Standard, &mut rng).unwrap_err(),
            BracketError::InvalidName
        );
    }

    #[test]
    fn winners_propagate_by_slot_parity() {
        let mut t = eight();
        t.select_winner(0, 0, Side::Player1).unwrap();
        t.select_winner(0, 1, Side::Player1).unwrap();
        assert_eq!(seed_at(&t, 1, 0, Side::Player1), Some(1));
        assert_eq!(seed_at(&t, 1, 0, Side::Player2), Some(4));
        assert!(!t.get_match(1, 0).unwrap().is_bye);
    }

    #[test]
    fn half_filled_next_match_reads_as_bye() {
        let mut t = eight();
        t.select_winner(0, 3, Side::Player2).unwrap();
        let next = t.get_match(1, 1).unwrap();
        assert_eq!(next.player2.as_ref().and_then(|p| p.seed), Some(7));
        assert!(next.is_bye);
    }

    #[test]
    fn half_filled_match_can_be_decided_before_its_feeder() {
        let mut t = eight();
        t.select_winner(0, 0, Side::Player1).unwrap();
        let winner = t.select_winner(1, 0, Side::Player1).unwrap();
        assert_eq!(winner.seed, Some(1));

        // The late feeder still lands in the empty side but changes nothing else.
        t.select_winner(0, 1, Side::Player1).unwrap();
        let m = t.get_match(1, 0).unwrap();
        assert_eq!(m.player1.as_ref().and_then(|p| p.seed), Some(1));
        assert_eq!(m.player2.as_ref().and_then(|p| p.seed), Some(4));
        assert_eq!(m.winner.as_ref().and_then(|p| p.seed), Some(1));
        assert!(m.is_completed());
        assert_eq!(seed_at(&t, 2, 0, Side::Player1), Some(1));
    }

    #[test]
    fn decided_match_is_rejected_without_change() {
        let mut t = eight();
        t.select_winner(0, 0, Side::Player2).unwrap();
        let before = t.clone();
        assert_eq!(
            t.select_winner(0, 0, Side::Player1).unwrap_err(),
            BracketError::AlreadyDecided { round: 0, slot: 0 }
        );
        assert_eq!(t, before);
    }

    #[test]
    fn empty_side_is_rejected() {
        let mut t = eight();
        assert_eq!(
            t.select_winner(1, 0, Side::Player1).unwrap_err(),
            BracketError::EmptySlot {
                round: 1,
                slot: 0,
                side: Side::Player1
            }
        );
        assert_eq!(
            t.select_winner(0, 9, Side::Player1).unwrap_err(),
            BracketError::MatchNotFound { round: 0, slot: 9 }
        );
    }

    #[test]
    fn final_sets_champion() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut t = Tournament::generate("Cup", 2, SeedingMode::Standard, &mut rng).unwrap();
        let winner = t.select_winner(0, 0, Side::Player2).unwrap();
        assert_eq!(winner.seed, Some(2));
        assert_eq!(t.champion(), Some(&winner));
        assert!(t.is_complete());
    }

    #[test]
    fn occupied_next_slot_is_not_overwritten() {
        let mut t = eight();
        t.rename_participant(1, 0, Side::Player1, "Wildcard").unwrap();
        t.select_winner(0, 0, Side::Player1).unwrap();
        let next = t.get_match(1, 0).unwrap();
        assert_eq!(next.player1.as_ref().map(|p| p.name.as_str()), Some("Wildcard"));
        assert_eq!(next.player1.as_ref().and_then(|p| p.seed), None);
        assert_eq!(next.player1.as_ref().and_then(|p| p.id), Some(9));
    }

    #[test]
    fn advance_byes_resolves_first_round_only() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut t = Tournament::generate("Cup", 5, SeedingMode::Standard, &mut rng).unwrap();
        assert_eq!(t.advance_byes(), 3);
        assert_eq!(t.advance_byes(), 0);
        assert_eq!(t.stats().completed, 3);
        assert_eq!(seed_at(&t, 1, 1, Side::Player1), Some(4));
        assert_eq!(seed_at(&t, 1, 1, Side::Player2), Some(5));
        assert_eq!(seed_at(&t, 1, 0, Side::Player2), Some(3));
    }

    #[test]
    fn lone_participant_is_crowned_by_bye() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut t = Tournament::generate("Solo", 1, SeedingMode::Standard, &mut rng).unwrap();
        assert_eq!(t.total_rounds(), 1);
        t.advance_byes();
        assert_eq!(t.champion().and_then(|p| p.seed), Some(1));
    }

    #[test]
    fn rename_follows_participant_through_bracket() {
        let mut t = eight();
        t.select_winner(0, 0, Side::Player1).unwrap();
        let renamed = t.rename_participant(0, 0, Side::Player1, " Ace ").unwrap();
        assert_eq!(renamed.name, "Ace");
        assert_eq!(renamed.seed, Some(1));
        let m = t.get_match(0, 0).unwrap();
        assert_eq!(m.winner.as_ref().map(|p| p.name.as_str()), Some("Ace"));
        let next = t.get_match(1, 0).unwrap();
        assert_eq!(next.player1.as_ref().map(|p| p.name.as_str()), Some("Ace"));
    }

    #[test]
    fn rename_into_empty_slot_adds_unseeded_entrant() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut t = Tournament::generate("Cup", 3, SeedingMode::Standard, &mut rng).unwrap();
        assert!(t.get_match(0, 1).unwrap().is_bye);
        let entrant = t.rename_participant(0, 1, Side::Player2, "Late").unwrap();
        assert_eq!(entrant.name, "Late");
        assert_eq!(entrant.seed, None);
        assert_eq!(entrant.id, Some(4));
        assert!(!t.get_match(0, 1).unwrap().is_bye);
    }

    #[test]
    fn same_named_walk_ins_stay_separate() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut t = Tournament::generate("Cup", 5, SeedingMode::Standard, &mut rng).unwrap();
        let first = t.rename_participant(0, 2, Side::Player2, "Late").unwrap();
        let second = t.rename_participant(0, 3, Side::Player2, "Late").unwrap();
        assert_ne!(first.id, second.id);

        t.select_winner(0, 2, Side::Player2).unwrap();
        t.select_winner(0, 3, Side::Player2).unwrap();
        t.rename_participant(0, 2, Side::Player2, "Alice").unwrap();

        let name_at = |t: &Tournament, round, slot, side| {
            t.get_match(round, slot)
                .and_then(|m| m.player(side))
                .map(|p| p.name.clone())
        };
        assert_eq!(name_at(&t, 0, 3, Side::Player2).as_deref(), Some("Late"));
        assert_eq!(name_at(&t, 1, 1, Side::Player1).as_deref(), Some("Alice"));
        assert_eq!(name_at(&t, 1, 1, Side::Player2).as_deref(), Some("Late"));

        t.select_winner(1, 1, Side::Player2).unwrap();
        let m = t.get_match(1, 1).unwrap();
        assert_eq!(m.winning_side(), Some(Side::Player2));
        assert_eq!(m.loser().map(|p| p.name.as_str()), Some("Alice"));
    }

    #[test]
    fn rename_rejects_blank_and_decided_empty_slot() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut t = Tournament::generate("Cup", 3, SeedingMode::Standard, &mut rng).unwrap();
        assert_eq!(
            t.rename_participant(0, 0, Side::Player1, "   ").unwrap_err(),
            BracketError::InvalidName
        );
        t.advance_byes();
        assert_eq!(
            t.rename_participant(0, 1, Side::Player2, "Late").unwrap_err(),
            BracketError::AlreadyDecided { round: 0, slot: 1 }
        );
    }

    #[test]
    fn clear_keeps_first_round_pairings() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut t = Tournament::generate("Cup", 6, SeedingMode::Standard, &mut rng).unwrap();
        let pairings = t.rounds()[0].clone();
        t.simulate(&mut rng).unwrap();
        t.clear();
        assert_eq!(t.rounds()[0], pairings);
        assert!(t.rounds()[1..]
            .iter()
            .flat_map(|r| &r.matches)
            .all(|m| *m == Match::default()));
        assert_eq!(t.champion(), None);
        assert_eq!(t.stats().completed, 0);
    }

    #[test]
    fn reset_reseeds_and_drops_edits() {
        let mut t = eight();
        t.rename_participant(0, 0, Side::Player1, "Ace").unwrap();
        t.select_winner(0, 0, Side::Player1).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        t.reset(&mut rng).unwrap();
        assert_eq!(t, eight());
    }

    #[test]
    fn set_name_trims() {
        let mut t = eight();
        t.set_name("  Spring Open ").unwrap();
        assert_eq!(t.name(), "Spring Open");
        assert_eq!(t.set_name(""), Err(BracketError::InvalidName));
        assert_eq!(t.name(), "Spring Open");
    }
}
