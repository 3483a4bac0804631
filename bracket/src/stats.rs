use crate::Round;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub total: usize,
    pub completed: usize,
    pub remaining: usize,
    /// Whole percent, rounded half up.
    pub completion_rate: u8,
}

/// Coarse progress level: below 30%, below 70%, and the rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressBand {
    Low,
    Mid,
    High,
}

impl Stats {
    pub fn band(&self) -> ProgressBand {
        match self.completion_rate {
            0..30 => ProgressBand::Low,
            30..70 => ProgressBand::Mid,
            _ => ProgressBand::High,
        }
    }
}

pub fn compute(rounds: &[Round]) -> Stats {
    let total: usize = rounds.iter().map(Round::len).sum();
    let completed: usize = rounds.iter().map(Round::completed).sum();
    Stats {
        total,
        completed,
        remaining: total - completed,
        completion_rate: percent(completed, total),
    }
}

fn percent(part: usize, whole: usize) -> u8 {
    if whole == 0 {
        return 0;
    }
    ((part * 200 + whole) / (2 * whole)) as u8
}
