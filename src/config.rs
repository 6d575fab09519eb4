use std::{env, fmt, fs, path::Path};

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::error::Error;

pub const HOST_VAR: &str = "HOST";
pub const USER_VAR: &str = "USER";
pub const PASSWORD_VAR: &str = "PASSWORD_TO_DB";
pub const DATABASE_VAR: &str = "DATABASE";
pub const SQLITE_PATH_VAR: &str = "NAME_DB";

#[derive(Parser, Debug)]
#[command(name = "outlay", about = "Command line expense tracker", version)]
pub struct Cli {
    /// Path to the settings file that records the active backend
    #[arg(short, long, default_value = "outlay.toml")]
    pub config: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Choose and bootstrap a database backend
    Configuration,
    /// Record a new expense
    Add {
        #[arg(allow_negative_numbers = true)]
        amount: f64,
        description: String,
    },
    /// Delete the expense with the given id
    Delete { id: i64 },
    /// Print a table of all expenses with a total
    Report,
    /// Print all expenses as one debug-formatted list
    PythonExport,
    /// Insert every valid row of a CSV file as an expense
    ImportCsv { file: String },
    /// Destroy the active database after confirmation
    DropDatabase,
}

/// Which storage backend domain operations run against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    Sqlite,
    Postgres,
    Unset,
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Backend::Sqlite => "sqlite",
            Backend::Postgres => "postgres",
            Backend::Unset => "unset",
        };
        write!(f, "{name}")
    }
}

/// The persisted backend slot. One key, overwritten in place; racing
/// writers are last-writer-wins, which is fine for a single-user tool.
#[derive(Debug, Serialize, Deserialize)]
pub struct Settings {
    pub backend: Backend,
}

impl Settings {
    /// Reads the active backend. A slot that has never been written reads
    /// as `Unset` without error; nothing is created until `store` runs.
    pub fn load(path: &str) -> Result<Backend, Error> {
        if !Path::new(path).exists() {
            return Ok(Backend::Unset);
        }
        let contents = fs::read_to_string(path)?;
        let settings: Settings = match toml::from_str(&contents) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!(path, "could not parse settings file: {e}");
                Settings {
                    backend: Backend::Unset,
                }
            }
        };
        Ok(settings.backend)
    }

    /// Overwrites the slot and returns the new value for confirmation.
    pub fn store(path: &str, backend: Backend) -> Result<Backend, Error> {
        let contents = toml::to_string(&Settings { backend })?;
        fs::write(path, contents)?;
        Ok(backend)
    }
}

/// PostgreSQL connection parameters, read from the environment when a
/// connector is about to be built.
#[derive(Debug, Clone)]
pub struct PostgresParams {
    pub host: String,
    pub user: String,
    pub password: String,
    pub database: String,
}

impl PostgresParams {
    pub fn from_env() -> Result<Self, Error> {
        Ok(Self {
            host: require_env(HOST_VAR)?,
            user: require_env(USER_VAR)?,
            password: require_env(PASSWORD_VAR)?,
            database: require_env(DATABASE_VAR)?,
        })
    }
}

/// The SQLite database file path, read from the environment.
pub fn sqlite_path() -> Result<String, Error> {
    require_env(SQLITE_PATH_VAR)
}

fn require_env(name: &'static str) -> Result<String, Error> {
    env::var(name).map_err(|_| Error::MissingEnv(name))
}
