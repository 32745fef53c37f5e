use sqlx::postgres::{PgConnectOptions, PgConnection};
use sqlx::Connection;

use dbtask_core::{ConnectionConfig, Error, Result};

use crate::session::PgSession;

/// Translate a [`ConnectionConfig`] into driver options.
///
/// Host, port, database and user are required; the port must be a valid TCP
/// port number.
pub fn connect_options(config: &ConnectionConfig) -> Result<PgConnectOptions> {
    let (Some(host), Some(port), Some(database), Some(user)) =
        (&config.host, &config.port, &config.database, &config.user)
    else {
        return Err(Error::Connection(format!(
            "missing connection parameter(s): {}",
            config.missing_fields().join(", ")
        )));
    };

    let port = port
        .trim()
        .parse::<u16>()
        .map_err(|err| Error::Connection(format!("invalid port '{port}': {err}")))?;

    let options = PgConnectOptions::new_without_pgpass()
        .host(host)
        .port(port)
        .database(database)
        .username(user);

    Ok(match &config.password {
        Some(password) => options.password(password),
        None => options,
    })
}

/// Open a single connection with one blocking attempt.
pub async fn connect(config: &ConnectionConfig) -> Result<PgSession> {
    let options = connect_options(config)?;

    tracing::debug!(event = "connecting", url = %config.redacted_url());

    let conn = PgConnection::connect_with(&options)
        .await
        .map_err(|err| Error::Connection(err.to_string()))?;

    tracing::info!(event = "connected", url = %config.redacted_url());

    Ok(PgSession::new(conn))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(port: &str) -> ConnectionConfig {
        ConnectionConfig {
            host: Some("localhost".to_string()),
            port: Some(port.to_string()),
            database: Some("testdb".to_string()),
            user: Some("admin".to_string()),
            password: Some("secret".to_string()),
        }
    }

    #[test]
    fn builds_options_from_complete_config() {
        let options = connect_options(&config("5433")).unwrap();
        assert_eq!(options.get_host(), "localhost");
        assert_eq!(options.get_port(), 5433);
        assert_eq!(options.get_database(), Some("testdb"));
        assert_eq!(options.get_username(), "admin");
    }

    #[test]
    fn rejects_non_numeric_port() {
        let err = connect_options(&config("five")).unwrap_err();
        assert!(matches!(err, Error::Connection(ref msg) if msg.contains("invalid port")));
    }

    #[test]
    fn reports_every_missing_field() {
        let config = ConnectionConfig {
            host: Some("localhost".to_string()),
            ..ConnectionConfig::default()
        };
        let err = connect_options(&config).unwrap_err();
        assert!(
            matches!(err, Error::Connection(ref msg) if msg.contains("port, database, user"))
        );
    }
}
