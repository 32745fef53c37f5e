use std::path::Path;

use async_trait::async_trait;
use sqlx::postgres::PgConnection;
use sqlx::{Connection, Executor};

use dbtask_core::{Error, QueryResult, Result};

use crate::decode::decode_row;

/// An open database session that runs SQL text.
#[async_trait]
pub trait Session: Send {
    /// Run `sql`, which may hold several `;`-separated statements, and commit.
    ///
    /// Returns `None` when no rows were produced. A query that matches no rows
    /// cannot be told apart from a statement without a result set.
    async fn execute(&mut self, sql: &str) -> Result<QueryResult>;

    /// Release the session. Calling it again is a no-op.
    async fn close(&mut self) -> Result<()>;

    fn is_closed(&self) -> bool;

    /// Read a whole SQL file and run it through [`Session::execute`].
    async fn execute_script(&mut self, path: &Path) -> Result<()> {
        let script = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(event = "script_loaded", path = %path.display(), bytes = script.len());
        self.execute(&script).await?;
        Ok(())
    }
}

/// Session over a single Postgres connection.
#[derive(Debug)]
pub struct PgSession {
    conn: Option<PgConnection>,
}

impl PgSession {
    pub fn new(conn: PgConnection) -> Self {
        Self { conn: Some(conn) }
    }

    fn connection(&mut self) -> Result<&mut PgConnection> {
        self.conn
            .as_mut()
            .ok_or_else(|| Error::Connection("session is closed".to_string()))
    }
}

#[async_trait]
impl Session for PgSession {
    async fn execute(&mut self, sql: &str) -> Result<QueryResult> {
        let conn = self.connection()?;

        // Dropping the guard uncommitted rolls the statement back.
        let mut tx = conn.begin().await.map_err(query_error)?;
        let rows = Executor::fetch_all(&mut *tx, sqlx::raw_sql(sql))
            .await
            .map_err(query_error)?;
        tx.commit().await.map_err(query_error)?;

        tracing::debug!(event = "statement_executed", rows = rows.len());

        if rows.is_empty() {
            return Ok(None);
        }
        let rows = rows.iter().map(decode_row).collect::<Result<Vec<_>>>()?;
        Ok(Some(rows))
    }

    async fn close(&mut self) -> Result<()> {
        if let Some(conn) = self.conn.take() {
            conn.close()
                .await
                .map_err(|err| Error::Connection(err.to_string()))?;
            tracing::info!(event = "disconnected");
        }
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.conn.is_none()
    }
}

fn query_error(err: sqlx::Error) -> Error {
    Error::Query(err.to_string())
}
