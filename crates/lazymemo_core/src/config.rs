//! Startup configuration.
//!
//! # Responsibility
//! - Read connection and logging settings once, at process start.
//! - Hand an explicit `DbConfig` to the store; operations never consult the
//!   environment.
//!
//! # Invariants
//! - The password never appears in `Display`/log output.
//! - `DB_NAME` is a plain file stem and cannot escape `DB_DATA_DIR`.

use log::{debug, error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_DB_HOST: &str = "localhost";
pub const DEFAULT_DB_USER: &str = "root";
pub const DEFAULT_DB_PASSWORD: &str = "your_default_password";
pub const DEFAULT_DB_NAME: &str = "test_db";
pub const DEFAULT_DB_TIMEOUT_MS: u64 = 5_000;

const DATA_DIR_NAME: &str = "lazymemo";
const DOTENV_FILE_NAME: &str = ".env";
const DB_FILE_EXTENSION: &str = "sqlite3";

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidValue {
        key: &'static str,
        value: String,
        reason: &'static str,
    },
    /// A `.env` file exists but could not be read or parsed.
    EnvFile { path: String, reason: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue { key, value, reason } => {
                write!(f, "invalid value `{value}` for {key}: {reason}")
            }
            Self::EnvFile { path, reason } => {
                write!(f, "cannot load env file {path}: {reason}")
            }
        }
    }
}

impl Error for ConfigError {}

/// Connection parameters for the backing store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbConfig {
    pub host: String,
    pub user: String,
    pub password: String,
    pub name: String,
    pub data_dir: PathBuf,
    /// Upper bound on how long a call waits for a locked store.
    pub busy_timeout: Duration,
}

impl DbConfig {
    /// Local config rooted at `data_dir`, defaults elsewhere.
    pub fn local(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            host: DEFAULT_DB_HOST.to_string(),
            user: DEFAULT_DB_USER.to_string(),
            password: DEFAULT_DB_PASSWORD.to_string(),
            name: DEFAULT_DB_NAME.to_string(),
            data_dir: data_dir.into(),
            busy_timeout: Duration::from_millis(DEFAULT_DB_TIMEOUT_MS),
        }
    }

    /// Database file backing `name`.
    pub fn database_path(&self) -> PathBuf {
        self.data_dir
            .join(format!("{}.{DB_FILE_EXTENSION}", self.name))
    }

    pub fn uses_default_password(&self) -> bool {
        self.password == DEFAULT_DB_PASSWORD
    }
}

impl Display for DbConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "host={} user={} db_name={} data_dir={} busy_timeout_ms={}",
            self.host,
            self.user,
            self.name,
            self.data_dir.display(),
            self.busy_timeout.as_millis()
        )
    }
}

/// Everything the process reads at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db: DbConfig,
    pub log_level: Option<String>,
    /// Absolute directory for rolling log files; stderr when unset.
    pub log_dir: Option<String>,
}

impl AppConfig {
    /// Loads `.env` from the working directory, then reads the process
    /// environment.
    ///
    /// Variables already present in the environment take precedence over
    /// `.env` entries. A missing `.env` is fine; an unreadable or malformed
    /// one fails the whole load.
    pub fn from_env() -> ConfigResult<Self> {
        check_dotenv(dotenvy::dotenv(), Path::new(DOTENV_FILE_NAME))?;
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|raw| !raw.is_empty())
        };

        let name = value("DB_NAME").unwrap_or_else(|| DEFAULT_DB_NAME.to_string());
        validate_db_name(&name)?;

        let busy_timeout = match value("DB_TIMEOUT_MS") {
            Some(raw) => parse_timeout(&raw)?,
            None => Duration::from_millis(DEFAULT_DB_TIMEOUT_MS),
        };

        let data_dir = value("DB_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(default_data_dir);

        Ok(Self {
            db: DbConfig {
                host: value("DB_HOST").unwrap_or_else(|| DEFAULT_DB_HOST.to_string()),
                user: value("DB_USER").unwrap_or_else(|| DEFAULT_DB_USER.to_string()),
                // Passwords keep surrounding whitespace.
                password: lookup("DB_PASSWORD")
                    .filter(|raw| !raw.is_empty())
                    .unwrap_or_else(|| DEFAULT_DB_PASSWORD.to_string()),
                name,
                data_dir,
                busy_timeout,
            },
            log_level: value("LAZYMEMO_LOG_LEVEL"),
            log_dir: value("LAZYMEMO_LOG_DIR"),
        })
    }

    /// Emits the redacted startup summary.
    pub fn log_summary(&self) {
        info!(
            "event=config_summary module=app status=ok {} default_password={}",
            self.db,
            self.db.uses_default_password()
        );
    }
}

fn check_dotenv(
    outcome: Result<PathBuf, dotenvy::Error>,
    searched: &Path,
) -> ConfigResult<()> {
    match outcome {
        Ok(path) => {
            debug!(
                "event=config_load module=app status=ok source=dotenv path={}",
                path.display()
            );
            Ok(())
        }
        Err(err) if err.not_found() => {
            debug!("event=config_load module=app status=ok source=env_only");
            Ok(())
        }
        Err(err) => {
            error!(
                "event=config_load module=app status=error source=dotenv error_code=env_file_invalid error={}",
                err
            );
            Err(ConfigError::EnvFile {
                path: searched.display().to_string(),
                reason: err.to_string(),
            })
        }
    }
}

fn validate_db_name(name: &str) -> ConfigResult<()> {
    let is_plain_stem = !name.contains(['/', '\\'])
        && name != "."
        && name != ".."
        && !name.contains('\0');
    if is_plain_stem {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            key: "DB_NAME",
            value: name.to_string(),
            reason: "must be a plain name without path separators",
        })
    }
}

fn parse_timeout(raw: &str) -> ConfigResult<Duration> {
    match raw.parse::<u64>() {
        Ok(0) | Err(_) => Err(ConfigError::InvalidValue {
            key: "DB_TIMEOUT_MS",
            value: raw.to_string(),
            reason: "expected a positive number of milliseconds",
        }),
        Ok(millis) => Ok(Duration::from_millis(millis)),
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(DATA_DIR_NAME)
}
