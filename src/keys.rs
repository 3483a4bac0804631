use crate::app::{App, MenuItem};
use crate::state::app_state::Confirmation;
use crate::state::messages::Command;
use bracket_engine::Side;
use crossterm::event::KeyCode::Char;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Translate a key press into app actions. Returns true when the screen needs
/// a redraw.
pub fn handle_key_bindings(key_event: KeyEvent, app: &mut App) -> bool {
    if key_event.kind == KeyEventKind::Release {
        return false;
    }

    if let (Char('c'), KeyModifiers::CONTROL) = (key_event.code, key_event.modifiers) {
        app.quit();
        return false;
    }

    if app.state.show_intro {
        match key_event.code {
            KeyCode::Enter | Char(' ') => app.dismiss_intro(),
            Char('q') => app.quit(),
            _ => return false,
        }
        return true;
    }

    if app.state.editing.is_some() {
        match key_event.code {
            KeyCode::Enter => return app.submit_edit(),
            KeyCode::Esc => app.cancel_edit(),
            KeyCode::Backspace => app.edit_pop(),
            KeyCode::Tab => app.edit_switch_side(),
            Char(c) => app.edit_push(c),
            _ => return false,
        }
        return true;
    }

    if app.state.confirming.is_some() {
        return match key_event.code {
            Char('y') | Char('Y') => app.confirm(),
            _ => {
                app.cancel_confirmation();
                true
            }
        };
    }

    match (app.state.active_tab, key_event.code, key_event.modifiers) {
        (_, Char('q'), _) => {
            app.quit();
            return false;
        }

        // Tab switching
        (_, Char('b'), _) => app.update_tab(MenuItem::Bracket),
        (_, Char('t'), _) => app.update_tab(MenuItem::Matches),
        (_, Char('?'), _) => app.update_tab(MenuItem::Help),
        (MenuItem::Help, KeyCode::Esc, _) => app.exit_help(),
        (MenuItem::Help, _, _) => return false,

        // Navigation
        (_, Char('l') | KeyCode::Right, _) => app.state.bracket.navigate_round_next(),
        (_, Char('h') | KeyCode::Left, _) => app.state.bracket.navigate_round_prev(),
        (_, Char('j') | KeyCode::Down, _) => app.state.bracket.navigate_match_down(),
        (_, Char('k') | KeyCode::Up, _) => app.state.bracket.navigate_match_up(),
        (_, KeyCode::Tab, _) => app.state.bracket.toggle_side(),

        // Results
        (_, Char('1'), _) => return app.pick(Side::Player1),
        (_, Char('2'), _) => return app.pick(Side::Player2),
        (_, KeyCode::Enter, _) => return app.pick_selected_side(),
        (_, Char('s'), _) => return app.apply(Command::Simulate),
        (_, Char('R'), _) => app.request_confirmation(Confirmation::Reset),
        (_, Char('c'), _) => app.request_confirmation(Confirmation::Clear),

        // Setup
        (_, Char('+') | Char('='), _) => return app.step_participants(true),
        (_, Char('-'), _) => return app.step_participants(false),
        (_, Char('m'), _) => return app.apply(Command::ToggleMode),
        (_, Char('e'), _) => app.begin_participant_edit(),
        (_, Char('n'), _) => app.begin_tournament_edit(),

        // Global
        (_, Char('f'), _) => app.toggle_full_screen(),
        (_, Char('"'), _) => app.toggle_show_logs(),

        _ => return false,
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::app_settings::AppSettings;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn app() -> App {
        let mut app = App::with_rng(AppSettings::default(), StdRng::seed_from_u64(9)).unwrap();
        app.dismiss_intro();
        app
    }

    fn press(app: &mut App, code: KeyCode) -> bool {
        handle_key_bindings(KeyEvent::new(code, KeyModifiers::NONE), app)
    }

    #[test]
    fn intro_swallows_keys_until_enter() {
        let mut app = App::with_rng(AppSettings::default(), StdRng::seed_from_u64(9)).unwrap();
        assert!(!press(&mut app, Char('s')));
        assert_eq!(app.tournament().stats().completed, 0);
        assert!(press(&mut app, KeyCode::Enter));
        assert!(!app.state.show_intro);
    }

    #[test]
    fn number_keys_pick_the_selected_match() {
        let mut app = app();
        press(&mut app, Char('j'));
        press(&mut app, Char('2'));
        let m = app.tournament().get_match(0, 1).unwrap();
        assert_eq!(m.winner.as_ref().and_then(|p| p.seed), Some(5));
    }

    #[test]
    fn reset_requires_confirmation() {
        let mut app = app();
        press(&mut app, Char('s'));
        assert!(app.tournament().is_complete());

        press(&mut app, Char('R'));
        press(&mut app, Char('n'));
        assert!(app.tournament().is_complete());
        assert!(app.state.confirming.is_none());

        press(&mut app, Char('R'));
        press(&mut app, Char('y'));
        assert!(!app.tournament().is_complete());
    }

    #[test]
    fn edit_mode_captures_text() {
        let mut app = app();
        press(&mut app, Char('n'));
        for _ in 0..app.tournament().name().len() {
            press(&mut app, KeyCode::Backspace);
        }
        for c in "Club Cup".chars() {
            press(&mut app, Char(c));
        }
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.tournament().name(), "Club Cup");
        assert_eq!(app.settings.tournament_name, "Club Cup");
    }

    #[test]
    fn quit_sets_flag() {
        let mut app = app();
        press(&mut app, Char('q'));
        assert!(app.should_quit);
    }

    #[test]
    fn help_tab_ignores_bracket_keys() {
        let mut app = app();
        press(&mut app, Char('?'));
        assert!(!press(&mut app, Char('s')));
        assert!(!app.tournament().is_complete());
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.state.active_tab, MenuItem::Bracket);
    }
}
