//! Core contracts shared by the dbtask crates.
//!
//! Holds the connection configuration, the error taxonomy, the untyped query
//! result model and the `Member` table definitions.

pub mod config;
pub mod error;
pub mod member;
pub mod value;

pub use config::{load_env_file, ConnectionConfig, EnvScheme};
pub use error::{Error, Result};
pub use member::MemberSchema;
pub use value::{QueryResult, Row, Value};
