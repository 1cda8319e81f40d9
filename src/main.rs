use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use rand::Rng;
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
    time::{Duration, Instant},
};
use tracing::{debug, warn};

use swiftkeys::{
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore},
    engine::{EngineEvent, SessionEngine},
    history::{record_finished, HistoryDb},
    mission::{MissionCatalog, MissionRun},
    runtime::{decode_key, AppEvent, CrosstermEventSource, Input, Runner},
    session::{Mode, SessionConfig, Status},
    timer::ThreadScheduler,
    ui::View,
    word_generator::{TextGenerator, TextRequest},
};

/// typing trainer with timed, word-count, quote, zen, custom and mission tests
#[derive(Parser, Debug, Clone)]
#[clap(version, about)]
pub struct Cli {
    /// kind of test to run
    #[clap(short = 'm', long, value_enum)]
    mode: Option<Mode>,

    /// seconds for time tests, word count for words tests
    #[clap(short = 'v', long)]
    value: Option<u32>,

    /// sprinkle punctuation after some words
    #[clap(long)]
    punctuation: bool,

    /// mix numbers into the word list
    #[clap(long)]
    numbers: bool,

    /// custom text to type (implies --mode custom)
    #[clap(short = 'p', long)]
    prompt: Option<String>,

    /// start the mission with this id
    #[clap(long)]
    mission: Option<u32>,

    /// list available missions and exit
    #[clap(long)]
    list_missions: bool,

    /// print history statistics and exit
    #[clap(long)]
    history: bool,

    /// write result history as CSV to this path and exit
    #[clap(long)]
    export_csv: Option<PathBuf>,

    /// tick interval in milliseconds for live stats
    #[clap(long)]
    tick_ms: Option<u64>,
}

impl Cli {
    fn apply_to(&self, config: &mut Config) {
        if let Some(mode) = self.mode {
            config.mode = mode;
        }
        if let Some(value) = self.value {
            config.value = value;
        }
        if self.punctuation {
            config.punctuation = true;
        }
        if self.numbers {
            config.numbers = true;
        }
        if let Some(prompt) = &self.prompt {
            config.mode = Mode::Custom;
            config.custom_text = Some(prompt.clone());
        }
        if let Some(tick_ms) = self.tick_ms {
            config.tick_rate_ms = tick_ms.max(1);
        }
    }
}

struct App {
    config: Config,
    generator: TextGenerator,
    catalog: MissionCatalog,
    mission: Option<MissionRun>,
    engine: SessionEngine,
    history: Option<HistoryDb>,
}

impl App {
    fn new(
        config: Config,
        mission: Option<MissionRun>,
        catalog: MissionCatalog,
        scheduler: ThreadScheduler<AppEvent>,
    ) -> Self {
        let generator = TextGenerator::embedded();
        let (session_config, text) = session_source(&config, mission.as_ref(), &generator);
        let engine = SessionEngine::new(session_config, &text, Box::new(scheduler))
            .with_tick_interval(Duration::from_millis(config.tick_rate_ms));

        let history = match HistoryDb::open(AppDirs::db_path()) {
            Ok(db) => Some(db),
            Err(e) => {
                warn!(error = %e, "history unavailable, results will not be saved");
                None
            }
        };

        Self {
            config,
            generator,
            catalog,
            mission,
            engine,
            history,
        }
    }

    /// Fresh text for the same settings. Missions keep their exercise.
    fn restart(&mut self) {
        let (session_config, text) =
            session_source(&self.config, self.mission.as_ref(), &self.generator);
        self.engine.restart(session_config, &text);
    }

    /// Same text again.
    fn retry(&mut self) {
        let session = self.engine.session();
        let (session_config, text) = (session.config(), session.text_string());
        self.engine.restart(session_config, &text);
    }

    /// New text, or the next mission when running one.
    fn next(&mut self) {
        let Some(run) = &self.mission else {
            self.restart();
            return;
        };
        if let Some(next) = next_mission_run(&self.catalog, run, &mut rand::thread_rng()) {
            self.mission = Some(next);
            self.restart();
        }
    }

    /// Returns false when the user asked to quit.
    fn handle(&mut self, input: Input, now: Instant) -> bool {
        match input {
            Input::Quit => return false,
            Input::Restart => self.restart(),
            Input::Keystroke(c) => match self.engine.status() {
                Status::Finished if c == 'r' => self.retry(),
                Status::Finished if c == 'n' => self.next(),
                _ => self.engine.submit_keystroke(c, now),
            },
            Input::Backspace => self.engine.submit_backspace(now),
        }
        self.process_events();
        true
    }

    fn tick(&mut self, now: Instant) {
        self.engine.tick(now);
        self.process_events();
    }

    fn process_events(&mut self) {
        let events = self.engine.drain_events();
        report_feedback(&events);

        let Some(db) = self.history.as_mut() else {
            return;
        };
        match record_finished(&events, db) {
            Ok(0) => {}
            Ok(_) => {
                if let Some(run) = &self.mission {
                    if let Err(e) = db.mark_mission_completed(run.mission_id) {
                        warn!(error = %e, "unable to mark mission completed");
                    }
                }
            }
            Err(e) => warn!(error = %e, "unable to record result"),
        }
    }

    fn view(&self, now: Instant) -> View<'_> {
        let view = View::new(&self.engine, now);
        let current = self
            .mission
            .as_ref()
            .and_then(|run| self.catalog.get(run.mission_id));
        match current {
            Some(mission) => view.with_mission(mission, self.catalog.next_after(mission.id)),
            None => view,
        }
    }
}

/// Logs per-keystroke judgments; returns how many there were.
fn report_feedback(events: &[EngineEvent]) -> usize {
    events
        .iter()
        .filter_map(|event| match event {
            EngineEvent::Judged { index, outcome, .. } => Some((index, outcome)),
            _ => None,
        })
        .inspect(|(index, outcome)| debug!(index, ?outcome, "feedback"))
        .count()
}

/// Starts the mission after `current` in catalog order, if there is one.
fn next_mission_run<R: Rng + ?Sized>(
    catalog: &MissionCatalog,
    current: &MissionRun,
    rng: &mut R,
) -> Option<MissionRun> {
    let next = catalog.next_after(current.mission_id)?;
    match catalog.start(next.id, rng) {
        Ok(run) => Some(run),
        Err(e) => {
            warn!(mission = next.id, error = %e, "unable to start next mission");
            None
        }
    }
}

fn session_source(
    config: &Config,
    mission: Option<&MissionRun>,
    generator: &TextGenerator,
) -> (SessionConfig, String) {
    let mut rng = rand::thread_rng();

    if let Some(run) = mission {
        let request = TextRequest::new(Mode::Mission, run.target_value).with_supplied(run.text.clone());
        return (
            SessionConfig::new(Mode::Mission, run.target_value),
            generator.generate(&request, &mut rng),
        );
    }

    let mut request =
        TextRequest::new(config.mode, config.value).with_options(config.generator_options());
    if let Some(text) = &config.custom_text {
        request = request.with_supplied(text.clone());
    }
    (
        SessionConfig::new(config.mode, config.value),
        generator.generate(&request, &mut rng),
    )
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let catalog = MissionCatalog::embedded();

    if cli.list_missions {
        let completed = HistoryDb::open(AppDirs::db_path())
            .and_then(|db| db.completed_missions())
            .unwrap_or_default();
        for m in catalog.all() {
            let mark = if completed.contains(&m.id) { "x" } else { " " };
            println!(
                "[{mark}] {:>3}  {:<20} {:<12} {:<10} {:>3}s  {}",
                m.id, m.name, m.level, m.language, m.time, m.description
            );
        }
        return Ok(());
    }

    if cli.history || cli.export_csv.is_some() {
        let db = HistoryDb::open(AppDirs::db_path())?;
        if let Some(path) = &cli.export_csv {
            db.export_csv(std::fs::File::create(path)?)?;
        }
        if cli.history {
            let stats = db.user_stats()?;
            println!(
                "tests: {}  avg wpm: {}  best wpm: {}  avg acc: {}%",
                stats.total_tests, stats.average_wpm, stats.best_wpm, stats.average_accuracy
            );
            for s in db.recent(10)? {
                println!(
                    "{}  {:<8} {:>4}  {:>4} wpm  {:>4} raw  {:>3}% acc  {:>3}% cons",
                    s.finished_at.format("%Y-%m-%d %H:%M"),
                    s.mode,
                    s.target_value,
                    s.wpm,
                    s.raw_wpm,
                    s.accuracy,
                    s.consistency
                );
            }
        }
        return Ok(());
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let store = FileConfigStore::new();
    let mut config = store.load();
    cli.apply_to(&mut config);
    if let Err(e) = store.save(&config) {
        warn!(error = %e, "unable to save config");
    }

    let mission = match cli.mission {
        Some(id) => Some(catalog.start(id, &mut rand::thread_rng())?),
        None => None,
    };

    let events = CrosstermEventSource::new();
    let scheduler = ThreadScheduler::new(events.sender(), AppEvent::Tick);
    let runner = Runner::new(events, Duration::from_millis(config.tick_rate_ms));
    let mut app = App::new(config, mission, catalog, scheduler);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &runner, &mut app);

    app.engine.discard();
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run<B: Backend>(
    terminal: &mut Terminal<B>,
    runner: &Runner<CrosstermEventSource>,
    app: &mut App,
) -> Result<(), Box<dyn Error>> {
    terminal.draw(|f| f.render_widget(&app.view(Instant::now()), f.area()))?;

    loop {
        let now = Instant::now();
        match runner.step() {
            Some(AppEvent::Key(key)) => {
                if let Some(input) = decode_key(key) {
                    if !app.handle(input, now) {
                        break;
                    }
                }
            }
            Some(AppEvent::Tick) => app.tick(now),
            Some(AppEvent::Resize) | None => {}
        }
        terminal.draw(|f| f.render_widget(&app.view(now), f.area()))?;
    }

    Ok(())
}
