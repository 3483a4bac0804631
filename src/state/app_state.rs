use crate::app::MenuItem;
use bracket_engine::{Match, Side, Tournament};
use chrono::Local;

/// Ticks a notification stays on screen (tick interval is 100ms).
pub const NOTIFICATION_TICKS: u64 = 30;

const MAX_NOTIFICATIONS: usize = 5;

// ---------------------------------------------------------------------------
// Banner animation state
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct AnimationState {
    /// Current frame index into the banner frames array, wraps at FRAME_COUNT.
    pub frame: usize,
    /// Monotonic tick counter. Also the clock for notification expiry.
    pub tick: u64,
}

impl AnimationState {
    pub fn advance(&mut self, frame_count: usize) {
        self.tick = self.tick.wrapping_add(1);
        self.frame = (self.frame + 1) % frame_count.max(1);
    }
}

// ---------------------------------------------------------------------------
// Bracket state
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct BracketState {
    pub tournament: Tournament,
    pub selected_round: usize,
    pub selected_slot: usize,
    /// Side targeted by Enter and by name edits.
    pub selected_side: Side,
}

impl BracketState {
    pub fn new(tournament: Tournament) -> Self {
        Self {
            tournament,
            selected_round: 0,
            selected_slot: 0,
            selected_side: Side::Player1,
        }
    }

    /// Swap in a rebuilt tournament, keeping the cursor inside the new tree.
    pub fn replace(&mut self, tournament: Tournament) {
        self.tournament = tournament;
        self.clamp_selection();
    }

    pub fn navigate_round_next(&mut self) {
        if self.selected_round + 1 < self.tournament.total_rounds() {
            self.selected_round += 1;
            self.selected_slot /= 2;
        }
    }

    pub fn navigate_round_prev(&mut self) {
        if self.selected_round > 0 {
            self.selected_round -= 1;
            self.selected_slot *= 2;
        }
    }

    pub fn navigate_match_down(&mut self) {
        if self.selected_slot + 1 < self.matches_in_round() {
            self.selected_slot += 1;
        }
    }

    pub fn navigate_match_up(&mut self) {
        self.selected_slot = self.selected_slot.saturating_sub(1);
    }

    pub fn toggle_side(&mut self) {
        self.selected_side = self.selected_side.other();
    }

    pub fn selected_match(&self) -> Option<&Match> {
        self.tournament
            .get_match(self.selected_round, self.selected_slot)
    }

    pub fn clamp_selection(&mut self) {
        let rounds = self.tournament.total_rounds();
        self.selected_round = self.selected_round.min(rounds.saturating_sub(1));
        self.selected_slot = self
            .selected_slot
            .min(self.matches_in_round().saturating_sub(1));
    }

    fn matches_in_round(&self) -> usize {
        self.tournament
            .round(self.selected_round)
            .map(|r| r.len())
            .unwrap_or(0)
    }
}

// ---------------------------------------------------------------------------
// Notifications
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub body: String,
    pub timestamp: String,
    expires_at: u64,
}

#[derive(Debug, Default)]
pub struct NotificationState {
    pub items: Vec<Notification>,
}

impl NotificationState {
    pub fn push(&mut self, kind: NotificationKind, body: impl Into<String>, now: u64) {
        let body = body.into();
        let expires_at = now + NOTIFICATION_TICKS;
        if let Some(last) = self.items.last_mut()
            && last.kind == kind
            && last.body == body
        {
            last.expires_at = expires_at;
            return;
        }
        self.items.push(Notification {
            kind,
            body,
            timestamp: Local::now().format("%H:%M:%S").to_string(),
            expires_at,
        });
        if self.items.len() > MAX_NOTIFICATIONS {
            let excess = self.items.len() - MAX_NOTIFICATIONS;
            self.items.drain(0..excess);
        }
    }

    /// Drop expired notifications. Returns true if any were removed.
    pub fn expire(&mut self, now: u64) -> bool {
        let before = self.items.len();
        self.items.retain(|n| n.expires_at > now);
        self.items.len() != before
    }

    pub fn latest(&self) -> Option<&Notification> {
        self.items.last()
    }
}

// ---------------------------------------------------------------------------
// Modal input
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditTarget {
    Participant { round: usize, slot: usize, side: Side },
    TournamentName,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EditState {
    pub target: EditTarget,
    pub input: String,
}

/// Destructive operations waiting for a yes/no answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Reset,
    Clear,
}

impl Confirmation {
    pub fn prompt(&self) -> &'static str {
        match self {
            Confirmation::Reset => {
                "Reset the tournament? All results and names will be lost. (y/n)"
            }
            Confirmation::Clear => "Clear all match results? (y/n)",
        }
    }
}

// ---------------------------------------------------------------------------
// Root app state
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct AppState {
    pub active_tab: MenuItem,
    pub previous_tab: MenuItem,
    pub show_intro: bool,
    pub show_logs: bool,
    pub bracket: BracketState,
    pub notifications: NotificationState,
    pub editing: Option<EditState>,
    pub confirming: Option<Confirmation>,
    pub animation: AnimationState,
}

impl AppState {
    pub fn new(tournament: Tournament) -> Self {
        Self {
            active_tab: MenuItem::default(),
            previous_tab: MenuItem::default(),
            show_intro: true,
            show_logs: false,
            bracket: BracketState::new(tournament),
            notifications: NotificationState::default(),
            editing: None,
            confirming: None,
            animation: AnimationState::default(),
        }
    }
}
