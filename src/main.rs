use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use routerboard::app::{App, StatusLevel};
use routerboard::config::{self, Config};
use routerboard::controller::{DashboardController, Timings};
use routerboard::domain::seed::mock_state;
use routerboard::domain::RoutingTarget;
use routerboard::infrastructure::{Clock, StdRandom, SystemClock};
use routerboard::store::PreferenceStore;
use routerboard::{input, ui};

#[derive(Debug, Parser)]
#[command(
    name = "routerboard",
    version,
    about = "Routerboard: a terminal dashboard for your AI router"
)]
struct Args {
    /// Config file (defaults to ~/.config/routerboard/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for simulated test outcomes and chat replies
    #[arg(long)]
    seed: Option<u64>,

    /// Do not start the background activity feed
    #[arg(long)]
    no_activity: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = match args.config.as_deref() {
        Some(path) => config::load_from(path),
        None => config::load(),
    };
    let logging = init_logging();
    info!(seed = ?args.seed.or(config.seed), "starting");

    let mut app = build_app(&args, &config);
    if let Err(err) = logging {
        app.set_status(format!("Logging disabled: {err:#}"), StatusLevel::Warn);
    }

    let mut stdout = io::stdout();
    enable_raw_mode()?;
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app, config.tick_rate());
    app.controller.shutdown();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("{err:?}");
    }
    info!("exited");

    Ok(())
}

/// Log to a file in the data dir; the terminal belongs to the UI.
fn init_logging() -> Result<()> {
    let Some(path) = config::log_path() else {
        return Ok(());
    };
    let file = config::create_log_file(&path)?;
    let filter =
        EnvFilter::try_from_env("ROUTERBOARD_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|err| anyhow::anyhow!("installing log subscriber: {err}"))
}

fn build_app(args: &Args, config: &Config) -> App {
    let clock = SystemClock;
    let state = mock_state(clock.now());
    let timings = Timings {
        activity_interval: config.activity_interval(),
        ..Timings::default()
    };
    let seed = args.seed.or(config.seed);
    let mut controller =
        DashboardController::new(state, Box::new(clock), Box::new(StdRandom::new(seed)))
            .with_timings(timings);

    if let Some(model) = config.default_model.as_deref() {
        controller.select_routing_target(RoutingTarget::parse(model));
    }
    if !args.no_activity {
        controller.start_activity_updates();
    }

    let mut app = App::new(controller).with_routing_targets(config.routing_targets());
    match open_prefs() {
        Ok(Some(store)) => app.attach_prefs(store),
        Ok(None) => {}
        Err(err) => {
            warn!(error = %err, "preferences disabled");
            app.set_status(format!("Preferences disabled: {err}"), StatusLevel::Warn);
        }
    }
    app
}

fn open_prefs() -> Result<Option<PreferenceStore>> {
    let Some(db_path) = config::prefs_db_path() else {
        return Ok(None);
    };
    if let Some(parent) = db_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    PreferenceStore::open(&db_path).map(Some)
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    tick_rate: Duration,
) -> Result<()> {
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|f| ui::draw(f, &*app))?;
        if app.should_quit {
            return Ok(());
        }

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                input::handle_key(app, key);
            }
        }

        let elapsed = last_tick.elapsed();
        if elapsed >= tick_rate {
            app.on_tick(elapsed);
            last_tick = Instant::now();
        }
    }
}
