// Fatal conditions raised by the monitor. Every variant ends the process
// after the terminal has been restored; a stopped container is not an error.

use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum MonitorError {
    #[error("Unable to execute {program} ({status}):\n{output}")]
    ListFailed {
        program: String,
        status: String,
        output: String,
    },

    #[error(
        "{program} produced no output. Either no containers are running or you forgot to 'sudo lxc-top'"
    )]
    NoContainers { program: String },

    #[error("Unable to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Timed out after {timeout:?} getting lxc-info for container {name}")]
    FetchTimeout { name: String, timeout: Duration },

    #[error("Unable to get lxc-info for {name} ({status}):\n{output}")]
    FetchFailed {
        name: String,
        status: String,
        output: String,
    },

    #[error("Unable to find mem use in output for {name}:\n{output}")]
    MalformedInfo { name: String, output: String },

    #[error("Terminal input failed: {0}")]
    Input(#[source] std::io::Error),

    #[error("Terminal input listener stopped unexpectedly")]
    InputClosed,

    #[error("Unable to set up the terminal: {0}")]
    Terminal(#[source] std::io::Error),

    #[error("Unable to draw the container table: {0}")]
    Render(#[source] std::io::Error),

    #[error("Snapshot store lock poisoned")]
    LockPoisoned,

    #[error("Collection task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, MonitorError>;
