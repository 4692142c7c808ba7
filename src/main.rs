use std::io;
use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::Receiver;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};

use study_buddy::ai_worker::{GenerationResponse, WorkerContext, spawn_generation_worker};
use study_buddy::app::{App, AppControl, DocumentPicker};
use study_buddy::config::AppConfig;
use study_buddy::intake::PlaceholderExtractor;
use study_buddy::{logger, ui};

const TICK: Duration = Duration::from_millis(200);

fn main() -> io::Result<()> {
    // A missing .env is fine; the environment may already be set.
    let _ = dotenv::dotenv();
    let config =
        AppConfig::from_env().map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    if let Err(e) = logger::init(&config.log_file, config.log_level) {
        eprintln!("could not open log file {}: {}", config.log_file.display(), e);
    }
    log::info!(
        "starting with {:?} provider, model {}",
        config.provider,
        config.model
    );

    let (request_tx, request_rx) = crossbeam_channel::unbounded();
    let (response_tx, response_rx) = crossbeam_channel::unbounded();
    let worker = spawn_generation_worker(
        WorkerContext {
            client: config.build_client(),
            extractor: Arc::new(PlaceholderExtractor),
            timeout: config.timeout,
        },
        response_tx,
        request_rx,
    )?;

    let mut app = App::new(DocumentPicker::new(config.documents_dir.clone()), request_tx)
        .with_ai_status(config.generation_enabled(), config.status_line());

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut app, &response_rx);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // The worker may be mid-request; it exits once the request channel closes.
    drop(worker);
    log::info!("exiting");
    result
}

fn run<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    responses: &Receiver<GenerationResponse>,
) -> io::Result<()> {
    loop {
        while let Ok(response) = responses.try_recv() {
            app.apply_response(response);
        }

        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(TICK)?
            && let Event::Key(key) = event::read()?
            && app.handle_key(key) == AppControl::Quit
        {
            return Ok(());
        }
    }
}
