use dbtask_core::{MemberSchema, Result};
use dbtask_exec::Session;

/// Create the `Member` table if it does not exist yet.
pub async fn create_tables<S>(session: &mut S, schema: MemberSchema) -> Result<()>
where
    S: Session + ?Sized,
{
    session.execute(schema.create_table_sql()).await?;
    tracing::info!(event = "table_created", table = "member", schema = %schema);
    Ok(())
}
