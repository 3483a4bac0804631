use std::io::{self, Stdout};

use tui::backend::CrosstermBackend;
use tui::layout::{Alignment, Constraint, Layout, Rect};
use tui::style::{Color, Modifier, Style};
use tui::text::{Line, Span};
use tui::widgets::{Block, BorderType, Borders, Clear, Gauge, Paragraph, Tabs, Wrap};
use tui::{Frame, Terminal};
use tui_logger::TuiLoggerWidget;

use crate::app::{App, MenuItem};
use crate::components::banner::AnimatedBanner;
use crate::components::banner_frames::BannerTheme;
use crate::components::bracket::{BracketGrid, BracketView, ChampionView};
use crate::state::app_state::{EditTarget, NotificationKind};
use crate::ui::layout::LayoutAreas;
use bracket_engine::{Match, ProgressBand, Round, Side};

static TABS: &[&str; 2] = &["Bracket", "Matches"];

const SIDE_PANEL_WIDTH: u16 = 36;

pub fn draw(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &App) -> io::Result<()> {
    let current_size = terminal.size()?;
    if current_size.width <= 10 || current_size.height <= 10 {
        return Ok(());
    }

    let mut layout = LayoutAreas::new(current_size);

    terminal.draw(|f| {
        if app.state.show_intro {
            draw_intro(f, f.area(), app);
            return;
        }

        layout.update(f.area(), app.settings.full_screen, app.state.show_logs);

        if !app.settings.full_screen {
            draw_tabs(f, layout.tab_bar, app);
        }

        match app.state.active_tab {
            MenuItem::Bracket => draw_bracket(f, layout.main, app),
            MenuItem::Matches => draw_matches(f, layout.main, app),
            MenuItem::Help => draw_help(f, layout.main),
        }

        if let Some(logs) = layout.logs {
            draw_logs(f, logs);
        }

        draw_toast(f, layout.main, app);
        draw_confirmation(f, f.area(), app);
        draw_edit_prompt(f, f.area(), app);
    })?;
    Ok(())
}

pub fn default_border<'a>(color: Color) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
}

fn draw_intro(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::DarkGray).title(" Tournament Bracket ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let [_top_pad, banner_area, prompt_area, _bottom_pad] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(8),
        Constraint::Length(1),
        Constraint::Fill(1),
    ])
    .areas(inner);

    let tournament = app.tournament();
    f.render_widget(
        AnimatedBanner {
            frame: app.state.animation.frame,
            tick: app.state.animation.tick,
            theme: BannerTheme::Dark,
            tournament_name: tournament.name().to_string(),
            subtitle: format!(
                "{} players | {} seeding",
                tournament.participant_count(),
                tournament.mode()
            ),
        },
        banner_area,
    );
    f.render_widget(
        Paragraph::new("Press Enter to open the bracket")
            .style(Style::default().fg(Color::Gray))
            .alignment(Alignment::Center),
        prompt_area,
    );
}

fn draw_tabs(f: &mut Frame, tab_bar: [Rect; 2], app: &App) {
    let style = Style::default().fg(Color::White);
    let border_type = BorderType::Rounded;

    let tab_index = match app.state.active_tab {
        MenuItem::Bracket | MenuItem::Help => 0,
        MenuItem::Matches => 1,
    };

    let titles: Vec<Line> = TABS.iter().map(|t| Line::from(*t)).collect();
    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::LEFT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .highlight_style(Style::default().add_modifier(Modifier::UNDERLINED))
        .select(tab_index)
        .style(style);
    f.render_widget(tabs, tab_bar[0]);

    let help = Paragraph::new("Help: ? ")
        .alignment(Alignment::Right)
        .block(
            Block::default()
                .borders(Borders::RIGHT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .style(style);
    f.render_widget(help, tab_bar[1]);
}

// ---------------------------------------------------------------------------
// Bracket tab
// ---------------------------------------------------------------------------

fn draw_bracket(f: &mut Frame, area: Rect, app: &App) {
    let tournament = app.tournament();
    let block = default_border(Color::White).title(format!(" {} ", tournament.name()));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let [header, key_legend, content] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Fill(1),
    ])
    .areas(inner);

    f.render_widget(Paragraph::new(header_text(app)), header);
    f.render_widget(
        Paragraph::new(
            "Keys: h/l=round  j/k=match  Tab=side  1/2/Enter=winner  s=simulate  e/n=rename  +/-=players  m=mode  R=reset  c=clear",
        )
        .style(Style::default().fg(Color::DarkGray)),
        key_legend,
    );

    let (bracket_area, side_area) = if content.width >= 100 {
        let [left, right] =
            Layout::horizontal([Constraint::Fill(1), Constraint::Length(SIDE_PANEL_WIDTH)])
                .areas(content);
        (left, Some(right))
    } else if content.height >= 24 {
        let [top, bottom] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(10)]).areas(content);
        (top, Some(bottom))
    } else {
        (content, None)
    };

    let bracket = &app.state.bracket;
    let grid = BracketGrid::compute(tournament.total_rounds(), bracket_area.width);
    f.render_widget(
        BracketView {
            rounds: tournament.rounds(),
            grid: &grid,
            selected_round: bracket.selected_round,
            selected_slot: bracket.selected_slot,
            selected_side: bracket.selected_side,
            theme: BannerTheme::Dark,
        },
        bracket_area,
    );

    if let Some(side) = side_area {
        draw_side_panel(f, side, app);
    }
}

fn header_text(app: &App) -> String {
    let tournament = app.tournament();
    let bracket = &app.state.bracket;
    let total = tournament.total_rounds();
    let matches = tournament
        .round(bracket.selected_round)
        .map(Round::len)
        .unwrap_or(0);
    let strict = if app.settings.strict { " | strict" } else { "" };
    let status = match bracket.selected_match() {
        Some(m) if m.is_completed() => "decided",
        Some(m) if m.is_bye => "bye",
        Some(_) => "pending",
        None => "-",
    };
    format!(
        "{} players ({}-slot bracket) | {} seeding{strict} | {}: match {}/{} ({status}) | {}",
        tournament.participant_count(),
        tournament.max_participants(),
        tournament.mode(),
        Round::label(bracket.selected_round, total),
        bracket.selected_slot + 1,
        matches,
        side_label(bracket.selected_side),
    )
}

fn draw_side_panel(f: &mut Frame, area: Rect, app: &App) {
    let tournament = app.tournament();
    let stats = tournament.stats();

    let [stats_area, champion_area, notes_area] = Layout::vertical([
        Constraint::Length(6),
        Constraint::Length(5),
        Constraint::Fill(1),
    ])
    .areas(area);

    let block = default_border(Color::DarkGray).title(" Progress ");
    let inner = block.inner(stats_area);
    f.render_widget(block, stats_area);
    let [counts, gauge_area] =
        Layout::vertical([Constraint::Length(3), Constraint::Length(1)]).areas(inner);

    let count_line = |label: &'static str, value: usize| {
        Line::from(vec![
            Span::styled(format!("{label:<11}"), Style::default().fg(Color::Gray)),
            Span::raw(value.to_string()),
        ])
    };
    f.render_widget(
        Paragraph::new(vec![
            count_line("Matches", stats.total),
            count_line("Completed", stats.completed),
            count_line("Remaining", stats.remaining),
        ]),
        counts,
    );

    let color = match stats.band() {
        ProgressBand::Low => Color::Red,
        ProgressBand::Mid => Color::Yellow,
        ProgressBand::High => Color::Green,
    };
    f.render_widget(
        Gauge::default()
            .gauge_style(Style::default().fg(color).bg(Color::Indexed(236)))
            .percent(u16::from(stats.completion_rate))
            .label(format!("{}%", stats.completion_rate)),
        gauge_area,
    );

    f.render_widget(
        ChampionView {
            champion: tournament.champion(),
            theme: BannerTheme::Dark,
        },
        champion_area,
    );

    draw_notification_history(f, notes_area, app);
}

fn draw_notification_history(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::DarkGray).title(" Notices ");
    let inner = block.inner(area);
    f.render_widget(block, area);
    if inner.height == 0 {
        return;
    }

    let lines: Vec<Line> = app
        .state
        .notifications
        .items
        .iter()
        .rev()
        .map(|n| {
            Line::from(vec![
                Span::styled(format!("{} ", n.timestamp), Style::default().fg(Color::DarkGray)),
                Span::styled(n.body.as_str(), notification_style(n.kind)),
            ])
        })
        .collect();
    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner);
}

// ---------------------------------------------------------------------------
// Matches tab
// ---------------------------------------------------------------------------

fn draw_matches(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::White).title(" Matches ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let tournament = app.tournament();
    let bracket = &app.state.bracket;
    let total = tournament.total_rounds();

    let mut lines = Vec::new();
    let mut selected_line = 0usize;
    for (r, round) in tournament.rounds().iter().enumerate() {
        lines.push(Line::from(Span::styled(
            format!("{} ({}/{} decided)", Round::label(r, total), round.completed(), round.len()),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )));
        for (slot, m) in round.matches.iter().enumerate() {
            let selected = r == bracket.selected_round && slot == bracket.selected_slot;
            if selected {
                selected_line = lines.len();
            }
            lines.push(match_line(slot, m, selected, r == 0));
        }
        lines.push(Line::from(""));
    }

    let offset = selected_line.saturating_sub(inner.height as usize / 2) as u16;
    f.render_widget(Paragraph::new(lines).scroll((offset, 0)), inner);
}

fn match_line(slot: usize, m: &Match, selected: bool, first_round: bool) -> Line<'static> {
    let placeholder = if first_round { "BYE" } else { "TBD" };
    let winner = m.winning_side();
    let entrant = |side: Side| {
        let text = m
            .player(side)
            .map(|p| p.label())
            .unwrap_or_else(|| placeholder.to_string());
        let style = match winner {
            Some(w) if w == side => Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            Some(_) => Style::default().fg(Color::DarkGray),
            None => Style::default().fg(Color::White),
        };
        Span::styled(text, style)
    };
    let status = match (m.is_completed(), m.is_bye) {
        (true, true) => "[bye]",
        (true, false) => "[completed]",
        (false, _) => "[pending]",
    };
    let marker = if selected { "> " } else { "  " };

    Line::from(vec![
        Span::raw(format!("{marker}M{:<3}", slot + 1)),
        entrant(Side::Player1),
        Span::styled("  vs  ", Style::default().fg(Color::DarkGray)),
        entrant(Side::Player2),
        Span::styled(format!("  {status}"), Style::default().fg(Color::DarkGray)),
    ])
}

// ---------------------------------------------------------------------------
// Help, logs and overlays
// ---------------------------------------------------------------------------

fn draw_help(f: &mut Frame, area: Rect) {
    let block = default_border(Color::White).title(" Help ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = [
        ("h / l", "previous / next round"),
        ("j / k", "next / previous match"),
        ("Tab", "switch the highlighted side"),
        ("1 / 2", "player 1 / player 2 wins the selected match"),
        ("Enter", "highlighted side wins"),
        ("s", "simulate every remaining match"),
        ("e", "rename the highlighted participant"),
        ("n", "rename the tournament"),
        ("+ / -", "more / fewer players (rebuilds the bracket)"),
        ("m", "toggle standard / random seeding (rebuilds)"),
        ("R", "reset: reseed and drop all results"),
        ("c", "clear all results, keep pairings"),
        ("b / t", "bracket / matches tab"),
        ("\"", "toggle log pane"),
        ("f", "toggle full screen"),
        ("Esc", "leave help"),
        ("q", "quit"),
    ];
    let lines: Vec<Line> = rows
        .iter()
        .map(|(key, what)| {
            Line::from(vec![
                Span::styled(format!("{key:>8}  "), Style::default().fg(Color::Yellow)),
                Span::raw(*what),
            ])
        })
        .collect();
    f.render_widget(Paragraph::new(lines), inner);
}

fn draw_logs(f: &mut Frame, area: Rect) {
    f.render_widget(
        TuiLoggerWidget::default()
            .block(default_border(Color::DarkGray).title(" Logs "))
            .style_error(Style::default().fg(Color::Red))
            .style_warn(Style::default().fg(Color::Yellow))
            .style_info(Style::default().fg(Color::Gray))
            .style_debug(Style::default().fg(Color::DarkGray)),
        area,
    );
}

fn draw_toast(f: &mut Frame, area: Rect, app: &App) {
    let Some(note) = app.state.notifications.latest() else {
        return;
    };
    if area.height < 3 || area.width < 10 {
        return;
    }
    let text = format!(" {} ", note.body);
    let width = (text.chars().count() as u16).min(area.width.saturating_sub(2));
    let toast = Rect::new(
        area.x + area.width.saturating_sub(width + 1),
        area.y + area.height.saturating_sub(2),
        width,
        1,
    );
    f.render_widget(Clear, toast);
    f.render_widget(
        Paragraph::new(text).style(notification_style(note.kind).add_modifier(Modifier::REVERSED)),
        toast,
    );
}

fn draw_confirmation(f: &mut Frame, area: Rect, app: &App) {
    let Some(confirmation) = app.state.confirming else {
        return;
    };
    let popup = centered_rect(area, 60, 3);
    f.render_widget(Clear, popup);
    f.render_widget(
        Paragraph::new(confirmation.prompt())
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Yellow))
            .block(default_border(Color::Yellow).title(" Confirm ")),
        popup,
    );
}

fn draw_edit_prompt(f: &mut Frame, area: Rect, app: &App) {
    let Some(edit) = app.state.editing.as_ref() else {
        return;
    };
    let title = match edit.target {
        EditTarget::Participant { round, slot, side } => format!(
            " {} match {} {} (Tab: other side) ",
            Round::label(round, app.tournament().total_rounds()),
            slot + 1,
            side_label(side),
        ),
        EditTarget::TournamentName => " Tournament name ".to_string(),
    };
    let popup = centered_rect(area, 56, 3);
    f.render_widget(Clear, popup);
    f.render_widget(
        Paragraph::new(format!("> {}_", edit.input))
            .style(Style::default().fg(Color::Yellow))
            .block(default_border(Color::Yellow).title(title)),
        popup,
    );
}

fn notification_style(kind: NotificationKind) -> Style {
    match kind {
        NotificationKind::Info => Style::default().fg(Color::Green),
        NotificationKind::Error => Style::default().fg(Color::Red),
    }
}

fn side_label(side: Side) -> &'static str {
    match side {
        Side::Player1 => "player 1",
        Side::Player2 => "player 2",
    }
}

fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}
