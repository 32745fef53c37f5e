use std::io::Write;

use dbtask_core::{Error, Result, Value};
use dbtask_exec::Session;

const SCHEMA: &str = "public";

const LIST_BASE_TABLES: &str = "
    SELECT table_name::text
    FROM information_schema.tables
    WHERE table_schema = 'public'
        AND table_type = 'BASE TABLE'
    ORDER BY table_name;
";

/// Names of all base tables in the `public` schema.
pub async fn list_base_tables<S>(session: &mut S) -> Result<Vec<String>>
where
    S: Session + ?Sized,
{
    let rows = session.execute(LIST_BASE_TABLES).await?.unwrap_or_default();
    rows.into_iter()
        .map(|row| match row.get(0) {
            Some(Value::Text(name)) => Ok(name.clone()),
            other => Err(Error::Query(format!(
                "unexpected table name in catalog: {other:?}"
            ))),
        })
        .collect()
}

/// Quote `name` as a SQL identifier.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Drop statement for a `public` table, schema-qualified so `search_path`
/// cannot redirect it to a same-named table elsewhere.
pub fn drop_table_sql(table: &str) -> String {
    format!(
        "DROP TABLE IF EXISTS {}.{} CASCADE;",
        quote_ident(SCHEMA),
        quote_ident(table)
    )
}

/// Drop every base table in `public`, announcing each one on `out` first.
///
/// Returns the dropped table names in drop order.
pub async fn delete_tables<S, W>(session: &mut S, out: &mut W) -> Result<Vec<String>>
where
    S: Session + ?Sized,
    W: Write + ?Sized,
{
    let tables = list_base_tables(&mut *session).await?;

    for table in &tables {
        writeln!(out, "Drop table {table}")?;
        session.execute(&drop_table_sql(table)).await?;
        tracing::info!(event = "table_dropped", table = %table);
    }

    Ok(tables)
}
