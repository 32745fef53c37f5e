//! The schema management tasks: create, delete and populate tables.
//!
//! Each task runs on one [`Session`](dbtask_exec::Session) through
//! [`run_task`], which prints a single diagnostic line on failure and always
//! closes the session.

pub mod create;
pub mod delete;
pub mod populate;
pub mod runner;

pub use create::create_tables;
pub use delete::{delete_tables, drop_table_sql, list_base_tables, quote_ident};
pub use populate::{populate_tables, BUNDLED_SCRIPT};
pub use runner::{run_task, Task, TaskReport};
