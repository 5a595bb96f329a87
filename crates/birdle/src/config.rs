use anyhow::{anyhow, Context};
use clap::Parser;
use fern::colors::{Color, ColoredLevelConfig};
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::{
    env, fs,
    net::{Ipv4Addr, SocketAddr},
    path::{Path, PathBuf},
};
use time::{format_description::well_known::Iso8601, OffsetDateTime};

/// Settings file used when `--config` is not given, created on first run
pub const DEFAULT_CONFIG_PATH: &str = "./config/local.toml";

#[derive(Parser, Debug, Default)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// TOML settings file (default: ./config/local.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log level, overrides the settings file and RUST_LOG
    #[arg(short, long)]
    pub level: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub level: Option<String>,
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub ui: UiSettings,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub bind: SocketAddr,
    /// Origins allowed to call the JSON API from a browser
    pub origins: Vec<String>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from((Ipv4Addr::LOCALHOST, 9100)),
            origins: vec![String::from("http://localhost:9100")],
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    pub data_folder: PathBuf,
    pub name: String,
    /// Keep the sightings in a shared in-memory database instead of a file
    pub in_memory: bool,
    pub busy_timeout_ms: u64,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub readers: PoolSize,
    pub writers: PoolSize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolSize {
    pub min: u32,
    pub max: u32,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            data_folder: PathBuf::from("./data"),
            name: String::from("birds"),
            in_memory: false,
            busy_timeout_ms: 5_000,
            acquire_timeout_secs: 15,
            idle_timeout_secs: 600,
            readers: PoolSize { min: 2, max: 12 },
            writers: PoolSize { min: 1, max: 2 },
        }
    }
}

impl DatabaseSettings {
    /// Small pools over a named in-memory database, one per `name`
    pub fn in_memory(name: &str) -> Self {
        Self {
            name: name.to_string(),
            in_memory: true,
            busy_timeout_ms: 1_000,
            acquire_timeout_secs: 5,
            readers: PoolSize { min: 1, max: 2 },
            writers: PoolSize { min: 1, max: 1 },
            ..Default::default()
        }
    }

    pub fn database_path(&self) -> PathBuf {
        self.data_folder.join(format!("{}.db", self.name))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// Shown in the browser tab and as the page heading
    pub title: String,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            title: String::from("Birdle"),
        }
    }
}

impl Settings {
    /// Reads the settings named on the command line, or the default file.
    /// A missing default file is written out with default values; a missing
    /// explicit file is an error.
    pub fn load(cli: Cli) -> Result<Self, anyhow::Error> {
        let mut settings = match &cli.config {
            Some(path) => Self::from_file(path)?,
            None => Self::from_file_or_default(Path::new(DEFAULT_CONFIG_PATH))?,
        };

        if cli.level.is_some() {
            settings.level = cli.level;
        }

        Ok(settings)
    }

    pub fn from_file(path: &Path) -> Result<Self, anyhow::Error> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;

        toml::from_str(&content)
            .map_err(|e| anyhow!("Invalid settings in {}: {}", path.display(), e))
    }

    pub fn from_file_or_default(path: &Path) -> Result<Self, anyhow::Error> {
        if path.exists() {
            return Self::from_file(path);
        }

        let settings = Self::default();
        if let Some(folder) = path.parent() {
            fs::create_dir_all(folder)
                .with_context(|| format!("Failed to create {}", folder.display()))?;
        }
        let content = toml::to_string_pretty(&settings)?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write default settings to {}", path.display()))?;

        Ok(settings)
    }

    /// `level`, then RUST_LOG, then info
    pub fn log_level(&self) -> LevelFilter {
        self.level
            .clone()
            .or_else(|| env::var("RUST_LOG").ok())
            .and_then(|level| level.parse().ok())
            .unwrap_or(LevelFilter::Info)
    }
}

/// Colored stdout logging, dropping records whose target starts with any of `quiet_targets`
pub fn setup_logger(
    level: LevelFilter,
    quiet_targets: &'static [&'static str],
) -> Result<(), fern::InitError> {
    let colors = ColoredLevelConfig::new()
        .trace(Color::White)
        .debug(Color::Cyan)
        .info(Color::Green)
        .warn(Color::Yellow)
        .error(Color::Red);

    fern::Dispatch::new()
        .level(level)
        .filter(move |metadata| {
            !quiet_targets
                .iter()
                .any(|target| metadata.target().starts_with(target))
        })
        .format(move |out, message, record| {
            let now = OffsetDateTime::now_utc()
                .format(&Iso8601::DEFAULT)
                .unwrap_or_default();
            out.finish(format_args!(
                "{} {} [{}] {}",
                now,
                colors.color(record.level()),
                record.target(),
                message
            ))
        })
        .chain(std::io::stdout())
        .apply()?;

    Ok(())
}
