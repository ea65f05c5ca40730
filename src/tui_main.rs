use anyhow::Result;
use crossterm::{
    event::{KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{io, path::Path, sync::Arc};
use tokio::sync::Mutex;

use club_leaderboard::{
    config::Settings,
    leaderboard::LeaderboardService,
    tui::{app::Screen, ui, App, Event as TuiEvent, EventHandler},
    CategorizationScheme,
};

pub async fn run_tui(
    service: LeaderboardService,
    settings: &Settings,
    contest_name: &str,
    scheme: CategorizationScheme,
) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let app = Arc::new(Mutex::new(App::new(
        contest_name,
        scheme,
        settings.leaderboard.top_n,
        settings.leaderboard.export_file.clone(),
    )));
    let events = EventHandler::new(250);

    spawn_load(&service, &app).await;
    let res = run_app(&mut terminal, app, events, service).await;

    // Always restore terminal state, even if there was an error
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Application error: {}", err);
        Err(err)
    } else {
        Ok(())
    }
}

async fn spawn_load(service: &LeaderboardService, app: &Arc<Mutex<App>>) {
    let contest_name = {
        let mut guard = app.lock().await;
        let contest_name = guard.contest_name.clone();
        guard.set_loading(&format!("Fetching results for {}...", contest_name));
        contest_name
    };

    let service = service.clone();
    let app = Arc::clone(app);
    tokio::spawn(async move {
        let view = service.load(&contest_name).await;
        app.lock().await.set_view(view);
    });
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: Arc<Mutex<App>>,
    events: EventHandler,
    service: LeaderboardService,
) -> Result<()> {
    loop {
        {
            let app = app.lock().await;
            if app.should_quit {
                return Ok(());
            }
            terminal.draw(|f| ui::draw(f, &app))?;
        }

        let event = match events.next() {
            Ok(event) => event,
            Err(e) => return Err(anyhow::anyhow!("Input channel closed: {}", e)),
        };

        let key = match event {
            TuiEvent::Key(key) => key,
            _ => continue,
        };

        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Ok(());
        }

        let mut app_guard = app.lock().await;
        if app_guard.current_screen == Screen::Loading {
            continue;
        }

        match key.code {
            KeyCode::Char('q') => app_guard.should_quit = true,
            KeyCode::Right => app_guard.next_group(),
            KeyCode::Left => app_guard.previous_group(),
            KeyCode::Tab | KeyCode::Down => app_guard.next_bucket(),
            KeyCode::BackTab | KeyCode::Up => app_guard.previous_bucket(),
            KeyCode::Char('s') => app_guard.cycle_scheme(),
            KeyCode::Char('r') => {
                drop(app_guard);
                spawn_load(&service, &app).await;
            }
            KeyCode::Char('e') => {
                let export = match &app_guard.view {
                    Some(view) => Some(service.export(
                        view,
                        app_guard.scheme,
                        Path::new(&app_guard.export_file),
                    )),
                    None => None,
                };
                match export {
                    Some(Ok(summary)) => {
                        let message = format!(
                            "Saved {} ({} sheets, {} rows)",
                            summary.path.display(),
                            summary.sheets,
                            summary.rows
                        );
                        app_guard.set_info(&message);
                    }
                    Some(Err(e)) => app_guard.set_error(&format!("Export failed: {}", e)),
                    None => app_guard.set_error("Nothing to export yet"),
                }
            }
            _ => {}
        }
    }
}
