use crate::seeding::total_rounds;
use crate::{BracketError, BracketResult, Match, Participant, Round};
use log::debug;

/// Build the round tree from a first-round placement.
///
/// Round 0 pairs `placement[2k]` with `placement[2k + 1]`; every later round
/// holds `ceil(prev / 2)` empty pending matches.
pub fn build(placement: &[Option<Participant>]) -> BracketResult<Vec<Round>> {
    let size = placement.len();
    if size < 2 || !size.is_power_of_two() {
        return Err(BracketError::InvalidPlacement { len: size });
    }

    let first = placement
        .chunks(2)
        .enumerate()
        .map(|(slot, pair)| match (&pair[0], &pair[1]) {
            (None, None) => Err(BracketError::EmptyPairing { slot }),
            (p1, p2) => Ok(Match::new(p1.clone(), p2.clone())),
        })
        .collect::<BracketResult<Vec<Match>>>()?;

    let total = total_rounds(size);
    let mut rounds = Vec::with_capacity(total);
    rounds.push(Round { matches: first });
    while rounds.len() < total {
        let prev = rounds.last().map(Round::len).unwrap_or_default();
        rounds.push(Round::empty(prev.div_ceil(2)));
    }

    debug!("built {} rounds for {size} slots", rounds.len());
    Ok(rounds)
}
