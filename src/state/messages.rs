use bracket_engine::Side;
use crossterm::event::KeyEvent;

#[derive(Debug, Clone)]
pub enum UiEvent {
    KeyPressed(KeyEvent),
    Resize,
    Tick,
}

/// Every operation that mutates the tournament.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Rebuild from the current settings.
    Generate,
    SetParticipantCount(usize),
    ToggleMode,
    SelectWinner { round: usize, slot: usize, side: Side },
    Simulate,
    Reset,
    Clear,
    RenameParticipant {
        round: usize,
        slot: usize,
        side: Side,
        name: String,
    },
    RenameTournament(String),
}
