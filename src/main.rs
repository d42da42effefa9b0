use lxc_top::config::{AppConfig, LoggingConfig};
use lxc_top::error::MonitorError;
use lxc_top::lxc_repo::{LxcCommandSource, Sampler};
use lxc_top::render::CrosstermCanvas;
use lxc_top::snapshot_store::SnapshotStore;
use lxc_top::terminal::TerminalSession;
use lxc_top::version::{NAME, VERSION};
use lxc_top::{input, worker};
use std::fs::OpenOptions;
use std::io::BufWriter;
use std::process::ExitCode;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

/// The dashboard owns the terminal, so logs go to a file or nowhere.
fn init_tracing(logging: &LoggingConfig) -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&logging.level))?;
    let writer = match &logging.file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| anyhow::anyhow!("opening log file {}: {}", path, e))?;
            BoxMakeWriter::new(Mutex::new(file))
        }
        None => BoxMakeWriter::new(std::io::sink),
    };
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(writer)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let app_config = match AppConfig::load() {
        Ok(c) => c,
        Err(e) => return fatal(e),
    };
    if let Err(e) = init_tracing(&app_config.logging) {
        return fatal(e);
    }
    tracing::info!(name = NAME, version = VERSION, "starting");

    match run(&app_config).await {
        Ok(()) => {
            tracing::info!("exiting on user request");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "fatal");
            fatal(e)
        }
    }
}

/// Single exit path for fatal conditions. The terminal session has already
/// been dropped by the time this runs.
fn fatal(err: impl std::fmt::Display) -> ExitCode {
    println!("{}", err);
    ExitCode::from(1)
}

async fn run(app_config: &AppConfig) -> Result<(), MonitorError> {
    println!("{} initializing...", NAME);
    let source = Arc::new(LxcCommandSource::new(&app_config.commands));
    let sampler = Sampler::new(source, SnapshotStore::new());
    // Fails on a plain terminal when there are no containers or no privilege.
    let names = sampler.list_names().await?;
    tracing::info!(containers = names.len(), "containers found");

    let _session = TerminalSession::enter().map_err(MonitorError::Terminal)?;
    let (tx, rx) = mpsc::channel(16);
    let listener = input::spawn(tx);
    let canvas = CrosstermCanvas::new(BufWriter::new(std::io::stdout()));
    let mut control = worker::ControlLoop::new(sampler, canvas, rx);
    let result = control.run().await;
    listener.abort();
    result
}
