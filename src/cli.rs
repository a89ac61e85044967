//! Command-line interface.

use std::path::PathBuf;

use clap::Parser;

use shhttp_config::{Config, ConfigError, ConfigLoader};

/// shhttp CLI.
#[derive(Debug, Parser)]
#[command(name = "shhttp")]
#[command(about = "Run shell commands and persisted command jobs over HTTP")]
#[command(version)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "SHHTTP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Hostname to listen on
    #[arg(long)]
    pub hostname: Option<String>,

    /// Port to listen on
    #[arg(long)]
    pub port: Option<u16>,

    /// Interval (hours) after which finished jobs are cleaned; negative disables
    #[arg(long, allow_negative_numbers = true)]
    pub clean_interval: Option<i64>,

    /// Location to store the job data
    #[arg(long)]
    pub dir: Option<String>,

    /// Revive jobs left running or queued by a previous run
    #[arg(long)]
    pub revive: bool,
}

impl Cli {
    /// Load the config file if one was given, else start from defaults,
    /// then apply command-line overrides.
    pub fn resolve_config(&self) -> Result<Config, ConfigError> {
        let mut config = match &self.config {
            Some(path) => ConfigLoader::load(path)?,
            None => Config::default(),
        };
        self.apply(&mut config);
        Ok(config)
    }

    fn apply(&self, config: &mut Config) {
        if let Some(host) = &self.hostname {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(dir) = &self.dir {
            config.storage.dir = PathBuf::from(ConfigLoader::expand_path(dir));
        }
        if let Some(hours) = self.clean_interval {
            config.engine.clean_interval_hours = u64::try_from(hours).ok().filter(|h| *h > 0);
        }
        if self.revive {
            config.engine.revive = true;
        }
    }
}
