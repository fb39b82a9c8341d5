use std::fs;
use std::path::Path;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use anyhow::{anyhow, bail, Context};
use engine_logging::{engine_error, engine_info, engine_warn};
use monitor_core::{update, AppState, Msg, Page};
use monitor_engine::{EngineEvent, EngineHandle};

use super::config::{AppConfig, CONFIG_FILENAME};
use super::console::{spawn_stdin_reader, Command, Console, ConsoleOutcome};
use super::effects::EffectRunner;
use super::logging;
use super::snapshot::SnapshotSink;

/// How long the loop waits for engine events before checking the console.
const TICK: Duration = Duration::from_millis(50);
const PAGE_TIMEOUT: Duration = Duration::from_secs(30);

pub fn run_app() -> anyhow::Result<()> {
    let config = AppConfig::load(Path::new(CONFIG_FILENAME))?;
    logging::initialize(config.log_destination);

    let settings = config.client_settings()?;
    let engine =
        EngineHandle::new(config.fetch_settings()).context("failed to start fetch engine")?;
    let html = load_page(&config, &engine)?;
    let page = Page::parse(&html).context("dashboard page is unusable")?;
    let state = AppState::new(page, settings).context("failed to set up dashboard")?;
    let sink = SnapshotSink::new(config.output_dir.clone(), config.snapshot_filename.clone())?;

    let (line_tx, line_rx) = mpsc::channel();
    spawn_stdin_reader(line_tx);

    let mut session = Session {
        state: Some(state),
        runner: EffectRunner::new(engine),
        sink,
        console: Console::default(),
    };
    session.dispatch(Msg::PageLoaded);
    engine_info!("Dashboard running; type `list` to see interactive elements");

    loop {
        if let Some(msg) = session.runner.next_msg(TICK) {
            session.dispatch(msg);
        }
        while let Ok(line) = line_rx.try_recv() {
            if session.handle_line(&line) {
                session.dispatch(Msg::StopPolling);
                engine_info!("Shutting down");
                return Ok(());
            }
        }
    }
}

fn load_page(config: &AppConfig, engine: &EngineHandle) -> anyhow::Result<String> {
    if let Some(path) = &config.page_file {
        engine_info!("Reading page shell from {}", path.display());
        return fs::read_to_string(path)
            .with_context(|| format!("failed to read page file {}", path.display()));
    }

    engine_info!("Fetching page shell from {}", config.base_url);
    engine.fetch_page(config.base_url.clone());
    let deadline = Instant::now() + PAGE_TIMEOUT;
    while Instant::now() < deadline {
        match engine.recv_timeout(TICK) {
            Some(EngineEvent::PageFetched(result)) => {
                return result.map_err(|err| anyhow!("failed to fetch {}: {err}", config.base_url))
            }
            Some(other) => engine_warn!("Ignoring {:?} before page load", other),
            None => {}
        }
    }
    bail!("timed out fetching {}", config.base_url)
}

struct Session {
    /// `None` only while `update` holds the state.
    state: Option<AppState>,
    runner: EffectRunner,
    sink: SnapshotSink,
    console: Console,
}

impl Session {
    fn dispatch(&mut self, msg: Msg) {
        let Some(state) = self.state.take() else {
            return;
        };
        let (mut state, effects) = update(state, msg);
        if state.consume_dirty() {
            if let Err(err) = self.sink.write(&state.view()) {
                engine_error!("Snapshot not written: {:#}", err);
            }
        }
        self.state = Some(state);
        self.runner.enqueue(effects);
    }

    /// Handles one console line. Returns true when the user asked to quit.
    fn handle_line(&mut self, line: &str) -> bool {
        let command = match Command::parse(line) {
            Ok(Some(command)) => command,
            Ok(None) => return false,
            Err(err) => {
                println!("{err}");
                return false;
            }
        };
        let Some(state) = self.state.as_ref() else {
            return false;
        };
        match self.console.handle(command, state) {
            ConsoleOutcome::Dispatch(msg) => self.dispatch(msg),
            ConsoleOutcome::Print(text) => print!("{text}"),
            ConsoleOutcome::Quit => return true,
        }
        false
    }
}
