mod logging;

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use dbtask_core::{load_env_file, ConnectionConfig, EnvScheme, Error as CoreError, MemberSchema};
use dbtask_exec::connect;
use dbtask_tasks::{run_task, Task};
use logging::{init_logging, LogFormat};
use thiserror::Error;
use tracing_subscriber::util::TryInitError;

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error("logging error: {0}")]
    Logging(#[from] TryInitError),
}

impl CliError {
    /// Process exit status for each error kind. `2` stays with clap usage errors.
    fn exit_code(&self) -> u8 {
        match self {
            Self::Core(CoreError::Connection(_)) => 3,
            Self::Core(CoreError::Query(_)) => 4,
            Self::Core(CoreError::Io { .. }) => 5,
            Self::Core(CoreError::Config(_)) => 6,
            Self::Core(CoreError::Output(_)) => 7,
            Self::Logging(_) => 1,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "dbtask", version, about = "Database schema management tasks")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,
    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct GlobalArgs {
    /// Environment variable family holding the credentials: `build`
    /// (BUILD_DB_*) or `standard` (DB_*).
    #[arg(long, value_name = "SCHEME", default_value = "build", global = true)]
    env_scheme: EnvScheme,
    /// Environment file to load instead of the nearest `.env`.
    #[arg(long, value_name = "PATH", global = true)]
    env_file: Option<PathBuf>,
    /// Log event format on stderr.
    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
    log_format: LogFormat,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create the Member table if it does not exist.
    CreateTables(CreateArgs),
    /// Drop every base table in the public schema.
    DeleteTables,
    /// Run the dummy data script.
    PopulateTables(PopulateArgs),
}

#[derive(Args, Debug)]
struct CreateArgs {
    /// Member table definition to create: `current` or `extended`.
    #[arg(long, value_name = "SCHEMA", default_value = "current")]
    schema: MemberSchema,
}

#[derive(Args, Debug)]
struct PopulateArgs {
    /// SQL script to run instead of the bundled dummy data.
    #[arg(long, value_name = "PATH")]
    script: Option<PathBuf>,
}

impl Command {
    fn into_task(self) -> Task {
        match self {
            Self::CreateTables(args) => Task::CreateTables {
                schema: args.schema,
            },
            Self::DeleteTables => Task::DeleteTables,
            Self::PopulateTables(args) => Task::PopulateTables {
                script: args.script,
            },
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!(event = "exit", error = %err, code = err.exit_code());
            ExitCode::from(err.exit_code())
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let Cli { global, command } = cli;
    init_logging(global.log_format)?;

    let task = command.into_task();
    let mut stdout = io::stdout();

    if let Some(path) = load_env_file(global.env_file.as_deref())
        .map_err(|err| report_failure(&mut stdout, &task, err))?
    {
        tracing::debug!(event = "env_file_loaded", path = %path.display());
    }

    let config = ConnectionConfig::from_env(global.env_scheme);
    tracing::info!(event = "config_loaded", url = %config.redacted_url());

    let mut session = connect(&config)
        .await
        .map_err(|err| report_failure(&mut stdout, &task, err))?;

    let report = run_task(&mut session, &task, &mut stdout).await?;
    tracing::info!(
        event = "run_finished",
        task = report.task,
        dropped = report.dropped_tables.len(),
        duration_ms = report.duration.as_millis() as u64
    );

    Ok(())
}

/// Print the task's diagnostic line for a failure that happened before the
/// task itself could run.
fn report_failure<W: Write>(out: &mut W, task: &Task, err: CoreError) -> CliError {
    tracing::error!(event = "task_failed", task = task.name(), error = %err);
    match writeln!(out, "{}: {err}", task.failure_prefix()) {
        Ok(()) => CliError::Core(err),
        Err(io_err) => CliError::Core(CoreError::Output(io_err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_build_scheme_and_current_schema() {
        let cli = Cli::try_parse_from(["dbtask", "create-tables"]).unwrap();
        assert_eq!(cli.global.env_scheme, EnvScheme::Build);
        assert_eq!(cli.global.log_format, LogFormat::Text);
        assert_eq!(
            cli.command.into_task(),
            Task::CreateTables {
                schema: MemberSchema::Current
            }
        );
    }

    #[test]
    fn global_flags_follow_the_subcommand() {
        let cli = Cli::try_parse_from([
            "dbtask",
            "populate-tables",
            "--script",
            "seed.sql",
            "--env-scheme",
            "standard",
            "--env-file",
            "local.env",
        ])
        .unwrap();

        assert_eq!(cli.global.env_scheme, EnvScheme::Standard);
        assert_eq!(cli.global.env_file, Some(PathBuf::from("local.env")));
        assert_eq!(
            cli.command.into_task(),
            Task::PopulateTables {
                script: Some(PathBuf::from("seed.sql"))
            }
        );
    }

    #[test]
    fn populate_defaults_to_bundled_script() {
        let cli = Cli::try_parse_from(["dbtask", "populate-tables"]).unwrap();
        assert_eq!(cli.command.into_task(), Task::PopulateTables { script: None });
    }

    #[test]
    fn parses_schema_through_core_names() {
        let cli =
            Cli::try_parse_from(["dbtask", "create-tables", "--schema", "extended"]).unwrap();
        assert_eq!(
            cli.command.into_task(),
            Task::CreateTables {
                schema: MemberSchema::Extended
            }
        );
    }

    #[test]
    fn rejects_unknown_schema_and_scheme() {
        assert!(Cli::try_parse_from(["dbtask", "create-tables", "--schema", "legacy"]).is_err());
        assert!(Cli::try_parse_from(["dbtask", "delete-tables", "--env-scheme", "prod"]).is_err());
    }

    #[test]
    fn error_kinds_map_to_distinct_exit_codes() {
        let codes = [
            CliError::Core(CoreError::Connection("refused".to_string())).exit_code(),
            CliError::Core(CoreError::Query("syntax".to_string())).exit_code(),
            CliError::Core(CoreError::Io {
                path: PathBuf::from("seed.sql"),
                source: io::Error::from(io::ErrorKind::NotFound),
            })
            .exit_code(),
            CliError::Core(CoreError::Config("bad env file".to_string())).exit_code(),
        ];
        assert_eq!(codes, [3, 4, 5, 6]);
    }

    #[test]
    fn early_failure_prints_one_prefixed_line() {
        let mut out = Vec::new();
        let err = report_failure(
            &mut out,
            &Task::DeleteTables,
            CoreError::Connection("connection refused".to_string()),
        );

        assert_eq!(err.exit_code(), 3);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Deletion of database tables failed: connection error: connection refused\n"
        );
    }
}
