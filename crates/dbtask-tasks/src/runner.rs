use std::io::Write;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use dbtask_core::{MemberSchema, Result};
use dbtask_exec::Session;

use crate::{create_tables, delete_tables, populate_tables};

/// One schema management task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Task {
    CreateTables { schema: MemberSchema },
    DeleteTables,
    /// `None` runs the bundled dummy data.
    PopulateTables { script: Option<PathBuf> },
}

impl Task {
    pub fn name(&self) -> &'static str {
        match self {
            Self::CreateTables { .. } => "create-tables",
            Self::DeleteTables => "delete-tables",
            Self::PopulateTables { .. } => "populate-tables",
        }
    }

    /// Leading text of the diagnostic line printed when the task fails.
    pub fn failure_prefix(&self) -> &'static str {
        match self {
            Self::CreateTables { .. } => "Creation of database tables failed",
            Self::DeleteTables => "Deletion of database tables failed",
            Self::PopulateTables { .. } => "Population of database tables failed",
        }
    }
}

/// Summary of a successful task run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskReport {
    pub task: &'static str,
    pub dropped_tables: Vec<String>,
    pub duration: Duration,
}

/// Run `task` on `session`, then close the session.
///
/// On failure, including a failed close after a successful task, exactly one
/// line `<prefix>: <error>` is written to `out` and the error is returned. The
/// session is closed on both paths.
pub async fn run_task<S, W>(session: &mut S, task: &Task, out: &mut W) -> Result<TaskReport>
where
    S: Session + ?Sized,
    W: Write + ?Sized,
{
    let timer = Instant::now();
    tracing::info!(event = "task_started", task = task.name());

    let outcome = match task {
        Task::CreateTables { schema } => create_tables(&mut *session, *schema)
            .await
            .map(|()| Vec::new()),
        Task::DeleteTables => delete_tables(&mut *session, &mut *out).await,
        Task::PopulateTables { script } => populate_tables(&mut *session, script.as_deref())
            .await
            .map(|()| Vec::new()),
    };

    let closed = session.close().await;

    let result = match (outcome, closed) {
        (Ok(dropped_tables), Ok(())) => Ok(dropped_tables),
        (Ok(_), Err(close_err)) => Err(close_err),
        (Err(err), closed) => {
            if let Err(close_err) = closed {
                tracing::warn!(event = "close_failed", error = %close_err);
            }
            Err(err)
        }
    };

    match result {
        Ok(dropped_tables) => {
            let duration = timer.elapsed();
            tracing::info!(
                event = "task_finished",
                task = task.name(),
                status = "success",
                duration_ms = duration.as_millis() as u64
            );
            Ok(TaskReport {
                task: task.name(),
                dropped_tables,
                duration,
            })
        }
        Err(err) => {
            tracing::error!(event = "task_failed", task = task.name(), error = %err);
            if let Err(write_err) = writeln!(out, "{}: {err}", task.failure_prefix()) {
                tracing::warn!(event = "diagnostic_write_failed", error = %write_err);
            }
            Err(err)
        }
    }
}
