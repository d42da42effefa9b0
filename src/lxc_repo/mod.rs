// LXC container counters via lxc-ls / lxc-info

pub mod parse;

use crate::config::CommandsConfig;
use crate::error::{MonitorError, Result};
use crate::models::{ContainerSample, RawSample};
use crate::snapshot_store::SnapshotStore;
use std::future::Future;
use std::process::ExitStatus;
use std::sync::Arc;
use std::time::Duration;
use tokio::process::Command;
use tokio::task::JoinSet;
use tracing::{debug, instrument};

/// Upper bound for a single container fetch. Exceeding it is fatal.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// The two external collaborators: container enumeration and per-container
/// counter retrieval. Both hand back free-form text.
pub trait ContainerSource: Send + Sync + 'static {
    /// Name of the enumeration program, used in diagnostics.
    fn list_program(&self) -> &str;

    /// Newline-separated container names. Fails on a non-zero exit or empty output.
    fn list(&self) -> impl Future<Output = Result<String>> + Send;

    /// Info text for one container. Fails on a non-zero exit.
    fn info(&self, name: &str) -> impl Future<Output = Result<String>> + Send;
}

/// Runs the real LXC tools as child processes.
#[derive(Debug, Clone)]
pub struct LxcCommandSource {
    list_program: String,
    info_program: String,
    info_args: Vec<String>,
}

impl LxcCommandSource {
    pub fn new(config: &CommandsConfig) -> Self {
        Self {
            list_program: config.list_program.clone(),
            info_program: config.info_program.clone(),
            info_args: config.info_args.clone(),
        }
    }
}

impl ContainerSource for LxcCommandSource {
    fn list_program(&self) -> &str {
        &self.list_program
    }

    async fn list(&self) -> Result<String> {
        let (status, output) = run_combined(&self.list_program, &[]).await?;
        if !status.success() {
            return Err(MonitorError::ListFailed {
                program: self.list_program.clone(),
                status: status.to_string(),
                output,
            });
        }
        if output.trim().is_empty() {
            return Err(MonitorError::NoContainers {
                program: self.list_program.clone(),
            });
        }
        Ok(output)
    }

    async fn info(&self, name: &str) -> Result<String> {
        let mut args: Vec<&str> = self.info_args.iter().map(String::as_str).collect();
        args.push(name);
        let (status, output) = run_combined(&self.info_program, &args).await?;
        if !status.success() {
            return Err(MonitorError::FetchFailed {
                name: name.to_string(),
                status: status.to_string(),
                output,
            });
        }
        Ok(output)
    }
}

/// Runs `program` and returns its exit status with stdout and stderr joined.
/// The child is killed if the returned future is dropped (timeout or abort).
async fn run_combined(program: &str, args: &[&str]) -> Result<(ExitStatus, String)> {
    let out = Command::new(program)
        .args(args)
        .kill_on_drop(true)
        .output()
        .await
        .map_err(|source| MonitorError::Spawn {
            program: program.to_string(),
            source,
        })?;
    let mut text = String::from_utf8_lossy(&out.stdout).into_owned();
    text.push_str(&String::from_utf8_lossy(&out.stderr));
    Ok((out.status, text))
}

/// Fans out one bounded fetch per container and records results in the store.
pub struct Sampler<S> {
    source: Arc<S>,
    store: SnapshotStore,
    fetch_timeout: Duration,
}

impl<S: ContainerSource> Sampler<S> {
    pub fn new(source: Arc<S>, store: SnapshotStore) -> Self {
        Self {
            source,
            store,
            fetch_timeout: FETCH_TIMEOUT,
        }
    }

    pub fn store(&self) -> &SnapshotStore {
        &self.store
    }

    /// Enumerates containers once.
    #[instrument(skip(self), fields(repo = "lxc", operation = "list_names"))]
    pub async fn list_names(&self) -> Result<Vec<String>> {
        let output = self.source.list().await?;
        let names = parse::parse_names(&output);
        if names.is_empty() {
            return Err(MonitorError::NoContainers {
                program: self.source.list_program().to_string(),
            });
        }
        Ok(names)
    }

    /// One collection cycle. Returns the snapshots recorded this cycle, once
    /// every fetch has finished. Stopped containers are left out; any other
    /// per-container fault aborts the remaining fetches and is returned.
    #[instrument(skip(self), fields(repo = "lxc", operation = "collect"))]
    pub async fn collect(&self) -> Result<Vec<ContainerSample>> {
        let names = self.list_names().await?;
        let mut tasks = JoinSet::new();
        for name in names {
            let source = self.source.clone();
            let store = self.store.clone();
            let timeout = self.fetch_timeout;
            tasks.spawn(async move {
                let Some(raw) = fetch_one(source.as_ref(), name, timeout).await? else {
                    return Ok(None);
                };
                store.record(raw).map(Some)
            });
        }

        let mut current = Vec::with_capacity(tasks.len());
        while let Some(joined) = tasks.join_next().await {
            // Returning early drops the JoinSet, which aborts the other fetches.
            if let Some(sample) = joined?? {
                current.push(sample);
            }
        }
        debug!(containers = current.len(), "collection cycle complete");
        Ok(current)
    }
}

async fn fetch_one<S: ContainerSource>(
    source: &S,
    name: String,
    timeout: Duration,
) -> Result<Option<RawSample>> {
    let fetched = tokio::time::timeout(timeout, source.info(&name)).await;
    let output = match fetched {
        Ok(output) => output?,
        Err(_) => return Err(MonitorError::FetchTimeout { name, timeout }),
    };
    let observed_at = tokio::time::Instant::now().into_std();
    let Some(counters) = parse::parse_info(&name, &output)? else {
        return Ok(None);
    };
    Ok(Some(RawSample {
        name,
        observed_at,
        cpu_time_ns: counters.cpu_time_ns,
        memory_bytes: counters.memory_bytes,
    }))
}
