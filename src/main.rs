mod app;
mod cli;
mod components;
mod draw;
mod keys;
mod state;
mod ui;

use crate::app::App;
use crate::cli::{CliAction, CliArgs};
use crate::state::app_settings::AppSettings;
use crate::state::messages::UiEvent;
use bracket_engine::{SimulationReport, Stats, Tournament};
use crossterm::event::{self as crossterm_event, Event};
use crossterm::{cursor, execute, terminal};
use log::{error, info};
use serde::Serialize;
use std::io::Stdout;
use std::{io, panic};
use tokio::sync::mpsc;
use tokio::time::Duration;
use tui::{Terminal, backend::CrosstermBackend};

const TICK_RATE: Duration = Duration::from_millis(100);
const INPUT_POLL: Duration = Duration::from_millis(50);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = match cli::parse_args(std::env::args().skip(1)) {
        Ok(CliAction::Help) => {
            println!("{}", cli::usage_text());
            return Ok(());
        }
        Ok(CliAction::Version) => {
            println!("bracket-tui {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        Ok(CliAction::Run(args)) => args,
        Err(e) => exit_with_usage(&e),
    };

    let settings = match load_settings(&args) {
        Ok(settings) => settings,
        Err(e) => exit_with_usage(&e),
    };

    if args.simulate {
        return run_headless(settings);
    }

    better_panic::install();

    let level = settings.log_level.unwrap_or(log::LevelFilter::Info);
    tui_logger::init_logger(level)?;
    tui_logger::set_default_level(level);

    let app = App::new(settings)?;
    info!(
        "started '{}' with {} players",
        app.tournament().name(),
        app.tournament().participant_count()
    );

    let backend = CrosstermBackend::new(io::stdout());
    let terminal = Terminal::new(backend)?;

    setup_panic_hook();
    setup_terminal()?;

    let (ui_event_tx, ui_event_rx) = mpsc::channel::<UiEvent>(100);

    // Input handler thread
    let input_tx = ui_event_tx.clone();
    let input_handler = tokio::task::spawn_blocking(move || input_handler_task(input_tx));

    // Tick thread: animation frames and notification expiry
    let tick_tx = ui_event_tx.clone();
    let tick_task = tokio::spawn(async move {
        let mut interval = tokio::time::interval(TICK_RATE);
        loop {
            interval.tick().await;
            if tick_tx.send(UiEvent::Tick).await.is_err() {
                break;
            }
        }
    });

    drop(ui_event_tx);
    main_ui_loop(terminal, app, ui_event_rx).await;

    tick_task.abort();
    // The receiver is gone, so the reader stops at its next poll timeout.
    if let Err(e) = input_handler.await {
        error!("input handler failed: {e}");
    }
    cleanup_terminal()?;

    Ok(())
}

fn load_settings(args: &CliArgs) -> anyhow::Result<AppSettings> {
    let mut settings = AppSettings::load()?;
    settings.apply_cli(args)?;
    Ok(settings)
}

fn exit_with_usage(e: &anyhow::Error) -> ! {
    eprintln!("{e:#}\n\n{}", cli::usage_text());
    std::process::exit(2);
}

#[derive(Serialize)]
struct HeadlessResult<'a> {
    tournament: &'a Tournament,
    stats: Stats,
    simulation: SimulationReport,
}

/// Build the bracket, play it out and print the final state as JSON.
fn run_headless(settings: AppSettings) -> anyhow::Result<()> {
    let mut rng = rand::rng();
    let mut tournament = if settings.strict {
        Tournament::generate_strict(
            settings.tournament_name.as_str(),
            settings.participants,
            settings.mode,
            &mut rng,
        )?
    } else {
        Tournament::generate(
            settings.tournament_name.as_str(),
            settings.participants,
            settings.mode,
            &mut rng,
        )?
    };
    let simulation = tournament.simulate(&mut rng)?;
    let result = HeadlessResult {
        tournament: &tournament,
        stats: tournament.stats(),
        simulation,
    };
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

async fn main_ui_loop(
    mut terminal: Terminal<CrosstermBackend<Stdout>>,
    mut app: App,
    mut ui_events: mpsc::Receiver<UiEvent>,
) {
    redraw(&mut terminal, &app);

    while let Some(ui_event) = ui_events.recv().await {
        let should_redraw = handle_ui_event(ui_event, &mut app);
        if app.should_quit {
            info!("quit requested");
            break;
        }
        if should_redraw {
            redraw(&mut terminal, &app);
        }
    }
}

fn handle_ui_event(ui_event: UiEvent, app: &mut App) -> bool {
    match ui_event {
        UiEvent::KeyPressed(key_event) => keys::handle_key_bindings(key_event, app),
        UiEvent::Resize => true,
        UiEvent::Tick => app.on_tick(crate::components::banner::FRAME_COUNT),
    }
}

fn redraw(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &App) {
    if let Err(e) = draw::draw(terminal, app) {
        error!("draw failed: {e}");
    }
}

/// Blocking terminal reader; runs on tokio's blocking pool until the UI loop
/// drops its receiver.
fn input_handler_task(ui_events: mpsc::Sender<UiEvent>) {
    while !ui_events.is_closed() {
        match crossterm_event::poll(INPUT_POLL) {
            Ok(true) => {}
            Ok(false) => continue,
            Err(e) => {
                error!("terminal input failed: {e}");
                break;
            }
        }

        let ui_event = match crossterm_event::read() {
            Ok(Event::Key(key_event)) => Some(UiEvent::KeyPressed(key_event)),
            Ok(Event::Resize(_, _)) => Some(UiEvent::Resize),
            Ok(_) => None,
            Err(e) => {
                error!("terminal input failed: {e}");
                break;
            }
        };

        if let Some(ui_event) = ui_event
            && ui_events.blocking_send(ui_event).is_err()
        {
            break;
        }
    }
}

fn setup_terminal() -> io::Result<()> {
    let mut stdout = io::stdout();
    execute!(stdout, cursor::Hide)?;
    execute!(stdout, terminal::EnterAlternateScreen)?;
    execute!(stdout, terminal::Clear(terminal::ClearType::All))?;
    terminal::enable_raw_mode()
}

fn cleanup_terminal() -> io::Result<()> {
    let mut stdout = io::stdout();
    execute!(stdout, cursor::MoveTo(0, 0))?;
    execute!(stdout, terminal::Clear(terminal::ClearType::All))?;
    execute!(stdout, terminal::LeaveAlternateScreen)?;
    execute!(stdout, cursor::Show)?;
    terminal::disable_raw_mode()
}

fn setup_panic_hook() {
    panic::set_hook(Box::new(|panic_info| {
        let _ = cleanup_terminal();
        better_panic::Settings::auto().create_panic_handler()(panic_info);
    }));
}
