use std::path::Path;

use dbtask_core::Result;
use dbtask_exec::Session;

/// Dummy data compiled into the binary, used when no script path is given.
pub const BUNDLED_SCRIPT: &str = include_str!("../resources/dummy_data.sql");

/// Run a seed script as one call: the file at `script`, or the bundled data.
pub async fn populate_tables<S>(session: &mut S, script: Option<&Path>) -> Result<()>
where
    S: Session + ?Sized,
{
    match script {
        Some(path) => {
            session.execute_script(path).await?;
            tracing::info!(event = "tables_populated", script = %path.display());
        }
        None => {
            session.execute(BUNDLED_SCRIPT).await?;
            tracing::info!(event = "tables_populated", script = "bundled");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_script_seeds_members() {
        assert_eq!(BUNDLED_SCRIPT.matches("INSERT INTO Member").count(), 5);
    }
}
