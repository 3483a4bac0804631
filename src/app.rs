use crate::state::app_settings::AppSettings;
use crate::state::app_state::{
    AppState, Confirmation, EditState, EditTarget, NotificationKind,
};
use crate::state::messages::Command;
use bracket_engine::{
    BracketError, MAX_PARTICIPANTS, STRICT_PARTICIPANT_COUNTS, Tournament,
    validate_participant_count,
};
use log::{info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Longest name accepted from the edit prompt.
pub const MAX_NAME_LEN: usize = 40;

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum MenuItem {
    #[default]
    Bracket,
    Matches,
    Help,
}

pub struct App {
    pub settings: AppSettings,
    pub state: AppState,
    pub should_quit: bool,
    rng: StdRng,
}

impl App {
    pub fn new(settings: AppSettings) -> anyhow::Result<Self> {
        if let Some(level) = settings.log_level {
            log::set_max_level(level);
            tui_logger::set_default_level(level);
        }
        Self::with_rng(settings, StdRng::from_os_rng())
    }

    pub fn with_rng(settings: AppSettings, mut rng: StdRng) -> anyhow::Result<Self> {
        let tournament = build_tournament(&settings, &mut rng)?;
        let mut app = Self {
            state: AppState::new(tournament),
            settings,
            should_quit: false,
            rng,
        };
        app.auto_advance_byes();
        Ok(app)
    }

    pub fn tournament(&self) -> &Tournament {
        &self.state.bracket.tournament
    }

    // -----------------------------------------------------------------------
    // Commands: the only path that mutates the tournament
    // -----------------------------------------------------------------------

    /// Run `command`, reporting the outcome as a notification. Returns true
    /// when the screen needs a redraw.
    pub fn apply(&mut self, command: Command) -> bool {
        match self.execute(&command) {
            Ok(message) => {
                info!("{message}");
                self.notify(NotificationKind::Info, message);
            }
            Err(e) => {
                warn!("{command:?} rejected: {e}");
                self.notify(NotificationKind::Error, capitalize(&e.to_string()));
            }
        }
        true
    }

    fn execute(&mut self, command: &Command) -> Result<String, BracketError> {
        match command {
            Command::Generate => self.regenerate(),
            Command::SetParticipantCount(count) => {
                validate_participant_count(*count, self.settings.strict)?;
                self.settings.participants = *count;
                self.regenerate()
            }
            Command::ToggleMode => {
                self.settings.mode = self.settings.mode.toggle();
                self.regenerate()
            }
            Command::SelectWinner { round, slot, side } => {
                let tournament = &mut self.state.bracket.tournament;
                let winner = tournament.select_winner(*round, *slot, *side)?;
                Ok(with_champion(
                    format!("{} won the match!", winner.label()),
                    tournament,
                ))
            }
            Command::Simulate => {
                let tournament = &mut self.state.bracket.tournament;
                let report = tournament.simulate(&mut self.rng)?;
                Ok(with_champion(
                    format!("Simulated {} matches", report.resolved),
                    tournament,
                ))
            }
            Command::Reset => {
                self.state.bracket.tournament.reset(&mut self.rng)?;
                self.state.bracket.clamp_selection();
                self.auto_advance_byes();
                Ok("Tournament has been reset".to_string())
            }
            Command::Clear => {
                self.state.bracket.tournament.clear();
                self.auto_advance_byes();
                Ok("All results cleared".to_string())
            }
            Command::RenameParticipant {
                round,
                slot,
                side,
                name,
            } => {
                let renamed = self
                    .state
                    .bracket
                    .tournament
                    .rename_participant(*round, *slot, *side, name)?;
                Ok(format!("Renamed to {}", renamed.label()))
            }
            Command::RenameTournament(name) => {
                let tournament = &mut self.state.bracket.tournament;
                tournament.set_name(name)?;
                self.settings.tournament_name = tournament.name().to_string();
                Ok(format!("Tournament renamed to {}", tournament.name()))
            }
        }
    }

    fn regenerate(&mut self) -> Result<String, BracketError> {
        let tournament = build_tournament(&self.settings, &mut self.rng)?;
        self.state.bracket.replace(tournament);
        self.auto_advance_byes();
        Ok(format!(
            "Generated a {}-player {} bracket",
            self.settings.participants, self.settings.mode
        ))
    }

    fn auto_advance_byes(&mut self) {
        if self.settings.auto_advance_byes {
            self.state.bracket.tournament.advance_byes();
        }
    }

    fn notify(&mut self, kind: NotificationKind, body: impl Into<String>) {
        let now = self.state.animation.tick;
        self.state.notifications.push(kind, body, now);
    }

    // -----------------------------------------------------------------------
    // Bracket actions bound to keys
    // -----------------------------------------------------------------------

    pub fn pick(&mut self, side: bracket_engine::Side) -> bool {
        let bracket = &self.state.bracket;
        let command = Command::SelectWinner {
            round: bracket.selected_round,
            slot: bracket.selected_slot,
            side,
        };
        self.apply(command)
    }

    pub fn pick_selected_side(&mut self) -> bool {
        self.pick(self.state.bracket.selected_side)
    }

    /// Move the participant count one step up or down. Strict mode walks the
    /// supported sizes only.
    pub fn step_participants(&mut self, up: bool) -> bool {
        let current = self.settings.participants;
        let next = if self.settings.strict {
            let index = STRICT_PARTICIPANT_COUNTS
                .iter()
                .position(|&c| c >= current)
                .unwrap_or(STRICT_PARTICIPANT_COUNTS.len() - 1);
            let index = if up {
                (index + 1).min(STRICT_PARTICIPANT_COUNTS.len() - 1)
            } else {
                index.saturating_sub(1)
            };
            STRICT_PARTICIPANT_COUNTS[index]
        } else if up {
            (current + 1).min(MAX_PARTICIPANTS)
        } else {
            current.saturating_sub(1).max(1)
        };

        if next == current {
            return false;
        }
        self.apply(Command::SetParticipantCount(next))
    }

    pub fn request_confirmation(&mut self, confirmation: Confirmation) {
        self.state.confirming = Some(confirmation);
    }

    pub fn confirm(&mut self) -> bool {
        match self.state.confirming.take() {
            Some(Confirmation::Reset) => self.apply(Command::Reset),
            Some(Confirmation::Clear) => self.apply(Command::Clear),
            None => false,
        }
    }

    pub fn cancel_confirmation(&mut self) {
        self.state.confirming = None;
    }

    // -----------------------------------------------------------------------
    // Name editing
    // -----------------------------------------------------------------------

    pub fn begin_participant_edit(&mut self) {
        let bracket = &self.state.bracket;
        let target = EditTarget::Participant {
            round: bracket.selected_round,
            slot: bracket.selected_slot,
            side: bracket.selected_side,
        };
        self.state.editing = Some(EditState {
            input: self.current_name(target),
            target,
        });
    }

    pub fn begin_tournament_edit(&mut self) {
        self.state.editing = Some(EditState {
            target: EditTarget::TournamentName,
            input: self.tournament().name().to_string(),
        });
    }

    pub fn edit_push(&mut self, c: char) {
        if let Some(edit) = self.state.editing.as_mut()
            && edit.input.chars().count() < MAX_NAME_LEN
        {
            edit.input.push(c);
        }
    }

    pub fn edit_pop(&mut self) {
        if let Some(edit) = self.state.editing.as_mut() {
            edit.input.pop();
        }
    }

    /// Retarget a participant edit at the other side of the same match.
    pub fn edit_switch_side(&mut self) {
        let Some(EditTarget::Participant { round, slot, side }) =
            self.state.editing.as_ref().map(|e| e.target)
        else {
            return;
        };
        let target = EditTarget::Participant {
            round,
            slot,
            side: side.other(),
        };
        self.state.bracket.selected_side = side.other();
        self.state.editing = Some(EditState {
            input: self.current_name(target),
            target,
        });
    }

    pub fn submit_edit(&mut self) -> bool {
        let Some(edit) = self.state.editing.take() else {
            return false;
        };
        let command = match edit.target {
            EditTarget::Participant { round, slot, side } => Command::RenameParticipant {
                round,
                slot,
                side,
                name: edit.input,
            },
            EditTarget::TournamentName => Command::RenameTournament(edit.input),
        };
        self.apply(command)
    }

    pub fn cancel_edit(&mut self) {
        self.state.editing = None;
    }

    fn current_name(&self, target: EditTarget) -> String {
        match target {
            EditTarget::Participant { round, slot, side } => self
                .tournament()
                .get_match(round, slot)
                .and_then(|m| m.player(side))
                .map(|p| p.name.clone())
                .unwrap_or_default(),
            EditTarget::TournamentName => self.tournament().name().to_string(),
        }
    }

    // -----------------------------------------------------------------------
    // Tab management
    // -----------------------------------------------------------------------

    pub fn update_tab(&mut self, next: MenuItem) {
        if self.state.active_tab == next {
            return;
        }
        self.state.previous_tab = self.state.active_tab;
        self.state.active_tab = next;
    }

    pub fn exit_help(&mut self) {
        if self.state.active_tab == MenuItem::Help {
            self.state.active_tab = self.state.previous_tab;
        }
    }

    pub fn toggle_show_logs(&mut self) {
        self.state.show_logs = !self.state.show_logs;
    }

    pub fn toggle_full_screen(&mut self) {
        self.settings.full_screen = !self.settings.full_screen;
    }

    pub fn dismiss_intro(&mut self) {
        self.state.show_intro = false;
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    // -----------------------------------------------------------------------
    // Tick: called every 100ms
    // -----------------------------------------------------------------------

    /// Advance the animation and expire notifications. Returns true when the
    /// screen changed.
    pub fn on_tick(&mut self, frame_count: usize) -> bool {
        self.state.animation.advance(frame_count);
        let now = self.state.animation.tick;
        let expired = self.state.notifications.expire(now);
        self.state.show_intro || expired
    }
}

fn build_tournament(settings: &AppSettings, rng: &mut StdRng) -> Result<Tournament, BracketError> {
    let name = settings.tournament_name.as_str();
    if settings.strict {
        Tournament::generate_strict(name, settings.participants, settings.mode, rng)
    } else {
        Tournament::generate(name, settings.participants, settings.mode, rng)
    }
}

fn with_champion(message: String, tournament: &Tournament) -> String {
    match tournament.champion() {
        Some(champion) => format!("{message} {} is the champion!", champion.label()),
        None => message,
    }
}

fn capitalize(message: &str) -> String {
    let mut chars = message.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bracket_engine::{SeedingMode, Side};

    fn app_with(settings: AppSettings) -> App {
        App::with_rng(settings, StdRng::seed_from_u64(5)).unwrap()
    }

    fn app() -> App {
        app_with(AppSettings::default())
    }

    fn last_note(app: &App) -> (NotificationKind, String) {
        let n = app.state.notifications.latest().expect("a notification");
        (n.kind, n.body.clone())
    }

    #[test]
    fn picking_a_winner_announces_it() {
        let mut app = app();
        app.pick(Side::Player1);
        assert_eq!(
            last_note(&app),
            (
                NotificationKind::Info,
                "Player 1 (Seed 1) won the match!".to_string()
            )
        );
        let next = app.tournament().get_match(1, 0).unwrap();
        assert_eq!(next.player1.as_ref().and_then(|p| p.seed), Some(1));
    }

    #[test]
    fn rejected_pick_leaves_tournament_untouched() {
        let mut app = app();
        app.pick(Side::Player2);
        let before = app.tournament().clone();
        app.pick(Side::Player1);
        assert_eq!(app.tournament(), &before);
        let (kind, body) = last_note(&app);
        assert_eq!(kind, NotificationKind::Error);
        assert!(body.starts_with("Match 1 of round 1"), "{body}");
    }

    #[test]
    fn byes_advance_on_start_when_enabled() {
        let app = app_with(AppSettings {
            participants: 5,
            ..AppSettings::default()
        });
        assert_eq!(app.tournament().stats().completed, 3);

        let app = app_with(AppSettings {
            participants: 5,
            auto_advance_byes: false,
            ..AppSettings::default()
        });
        assert_eq!(app.tournament().stats().completed, 0);
    }

    #[test]
    fn simulate_crowns_a_champion() {
        let mut app = app();
        app.apply(Command::Simulate);
        assert!(app.tournament().is_complete());
        let (_, body) = last_note(&app);
        assert!(body.contains("is the champion!"), "{body}");

        app.apply(Command::Simulate);
        assert_eq!(last_note(&app).0, NotificationKind::Error);
    }

    #[test]
    fn participant_steps_respect_strict_mode() {
        let mut app = app_with(AppSettings {
            strict: true,
            ..AppSettings::default()
        });
        assert!(app.step_participants(true));
        assert_eq!(app.tournament().participant_count(), 16);
        assert!(!app.step_participants(true));
        app.step_participants(false);
        app.step_participants(false);
        assert_eq!(app.settings.participants, 4);
    }

    #[test]
    fn participant_steps_stay_in_range() {
        let mut app = app_with(AppSettings {
            participants: 1,
            ..AppSettings::default()
        });
        assert!(!app.step_participants(false));
        assert!(app.step_participants(true));
        assert_eq!(app.tournament().participant_count(), 2);
        assert_eq!(app.tournament().total_rounds(), 1);
    }

    #[test]
    fn toggling_mode_regenerates() {
        let mut app = app();
        app.apply(Command::ToggleMode);
        assert_eq!(app.tournament().mode(), SeedingMode::Random);
        assert_eq!(app.settings.mode, SeedingMode::Random);
    }

    #[test]
    fn cancelled_confirmation_keeps_results() {
        let mut app = app();
        app.pick(Side::Player1);
        app.request_confirmation(Confirmation::Clear);
        app.cancel_confirmation();
        assert!(!app.confirm());
        assert_eq!(app.tournament().stats().completed, 1);

        app.request_confirmation(Confirmation::Clear);
        assert!(app.confirm());
        assert_eq!(app.tournament().stats().completed, 0);
        assert_eq!(last_note(&app).1, "All results cleared");
    }

    #[test]
    fn editing_renames_the_selected_participant() {
        let mut app = app();
        app.begin_participant_edit();
        assert_eq!(app.state.editing.as_ref().unwrap().input, "Player 1");
        for _ in 0.."Player 1".len() {
            app.edit_pop();
        }
        "Alice".chars().for_each(|c| app.edit_push(c));
        app.submit_edit();
        assert!(app.state.editing.is_none());
        let m = app.tournament().get_match(0, 0).unwrap();
        assert_eq!(m.player1.as_ref().map(|p| p.name.as_str()), Some("Alice"));
    }

    #[test]
    fn edit_switches_to_the_other_side() {
        let mut app = app();
        app.begin_participant_edit();
        app.edit_switch_side();
        let edit = app.state.editing.as_ref().unwrap();
        assert_eq!(edit.input, "Player 8");
        assert_eq!(app.state.bracket.selected_side, Side::Player2);
    }

    #[test]
    fn blank_tournament_name_is_rejected() {
        let mut app = app();
        app.begin_tournament_edit();
        app.state.editing.as_mut().unwrap().input = "   ".to_string();
        app.submit_edit();
        assert_eq!(app.tournament().name(), bracket_engine::DEFAULT_TOURNAMENT_NAME);
        assert_eq!(last_note(&app).0, NotificationKind::Error);
    }

    #[test]
    fn tick_expires_notifications() {
        let mut app = app();
        app.dismiss_intro();
        app.apply(Command::Clear);
        let mut redraws = 0;
        for _ in 0..crate::state::app_state::NOTIFICATION_TICKS {
            if app.on_tick(4) {
                redraws += 1;
            }
        }
        assert_eq!(redraws, 1);
        assert!(app.state.notifications.latest().is_none());
    }
}
