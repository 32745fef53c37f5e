//! Postgres connection factory and query executor.

pub mod connection;
pub mod decode;
pub mod session;

pub use connection::{connect, connect_options};
pub use session::{PgSession, Session};

pub use dbtask_core::{Error, QueryResult, Result, Row, Value};
