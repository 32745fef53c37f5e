use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{Error, Result};

/// Family of environment variable names holding the credentials.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EnvScheme {
    /// `DB_HOST`, `DB_PORT`, `DB_NAME`, `DB_USER`, `DB_PASSWORD`.
    Standard,
    /// `BUILD_DB_HOST`, `BUILD_DB_PORT`, ... as used by the build tasks.
    #[default]
    Build,
}

impl EnvScheme {
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Standard => "DB_",
            Self::Build => "BUILD_DB_",
        }
    }

    /// Full variable name for a field suffix such as `HOST`.
    pub fn var_name(self, suffix: &str) -> String {
        format!("{}{suffix}", self.prefix())
    }
}

impl FromStr for EnvScheme {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.to_ascii_lowercase().as_str() {
            "standard" => Ok(Self::Standard),
            "build" => Ok(Self::Build),
            other => Err(Error::Config(format!("unknown env scheme '{other}'"))),
        }
    }
}

/// Connection parameters read from the environment.
///
/// Fields are not validated here; an absent value only surfaces when the
/// connection is opened.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ConnectionConfig {
    pub host: Option<String>,
    pub port: Option<String>,
    pub database: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
}

impl ConnectionConfig {
    /// Read the five variables of `scheme` from the process environment.
    pub fn from_env(scheme: EnvScheme) -> Self {
        Self::from_lookup(scheme, |key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(scheme: EnvScheme, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |suffix: &str| lookup(&scheme.var_name(suffix));
        Self {
            host: read("HOST"),
            port: read("PORT"),
            database: read("NAME"),
            user: read("USER"),
            password: read("PASSWORD"),
        }
    }

    /// Names of required fields that are absent. The password may be omitted
    /// for trust-authenticated servers.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("host", &self.host),
            ("port", &self.port),
            ("database", &self.database),
            ("user", &self.user),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_none())
        .map(|(name, _)| name)
        .collect()
    }

    /// Connection URL with the password masked, for log output.
    pub fn redacted_url(&self) -> String {
        let user = self.user.as_deref().unwrap_or("");
        let auth = match (&self.user, &self.password) {
            (Some(_), Some(_)) => format!("{user}:***@"),
            (Some(_), None) => format!("{user}@"),
            (None, _) => String::new(),
        };
        let port = self
            .port
            .as_deref()
            .map(|port| format!(":{port}"))
            .unwrap_or_default();
        format!(
            "postgres://{auth}{}{port}/{}",
            self.host.as_deref().unwrap_or(""),
            self.database.as_deref().unwrap_or("")
        )
    }
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "********"))
            .finish()
    }
}

/// Load an environment file into the process environment.
///
/// Variables already set are left untouched, so calling this repeatedly is
/// harmless. Without an explicit path a missing `.env` is not an error.
pub fn load_env_file(path: Option<&Path>) -> Result<Option<PathBuf>> {
    match path {
        Some(path) => {
            dotenvy::from_path(path).map_err(|err| {
                Error::Config(format!("cannot load env file {}: {err}", path.display()))
            })?;
            Ok(Some(path.to_path_buf()))
        }
        None => match dotenvy::dotenv() {
            Ok(found) => Ok(Some(found)),
            Err(err) if err.not_found() => Ok(None),
            Err(err) => Err(Error::Config(format!("cannot load .env: {err}"))),
        },
    }
}
