use serde::Deserialize;
use std::path::Path;

/// Used when `LXC_TOP_CONFIG` is not set. Missing is fine; defaults apply.
pub const DEFAULT_CONFIG_FILE: &str = "lxc-top.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub commands: CommandsConfig,
    pub logging: LoggingConfig,
}

/// External programs used to enumerate containers and read their counters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CommandsConfig {
    pub list_program: String,
    pub info_program: String,
    /// Arguments placed before the container name.
    pub info_args: Vec<String>,
}

impl Default for CommandsConfig {
    fn default() -> Self {
        Self {
            list_program: "lxc-ls".into(),
            info_program: "lxc-info".into(),
            info_args: vec!["-H".into(), "-n".into()],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset.
    pub level: String,
    /// Log file; logs are discarded when unset since the terminal is in use.
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            file: None,
        }
    }
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        match std::env::var("LXC_TOP_CONFIG") {
            Ok(path) => Self::load_from_file(&path),
            Err(_) if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::load_from_file(DEFAULT_CONFIG_FILE)
            }
            Err(_) => Ok(Self::default()),
        }
    }

    pub fn load_from_file(path: &str) -> anyhow::Result<Self> {
        let s = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("reading config {}: {}", path, e))?;
        Self::load_from_str(&s)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            !self.commands.list_program.trim().is_empty(),
            "commands.list_program must be non-empty"
        );
        anyhow::ensure!(
            !self.commands.info_program.trim().is_empty(),
            "commands.info_program must be non-empty"
        );
        anyhow::ensure!(
            !self.logging.level.trim().is_empty(),
            "logging.level must be non-empty"
        );
        anyhow::ensure!(
            self.logging.file.as_deref().is_none_or(|f| !f.is_empty()),
            "logging.file must be non-empty when set"
        );
        Ok(())
    }
}
