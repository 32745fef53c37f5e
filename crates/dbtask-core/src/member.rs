use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

const CURRENT_DDL: &str = include_str!("sql/member_current.sql");
const EXTENDED_DDL: &str = include_str!("sql/member_extended.sql");

/// Which definition of the `Member` table to create.
///
/// Both statements use `CREATE TABLE IF NOT EXISTS`, so re-running them never
/// fails on an existing table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MemberSchema {
    /// Trimmed column set without date fields.
    #[default]
    Current,
    /// Column set with birthday, join/exit and mandate dates.
    Extended,
}

impl MemberSchema {
    pub fn create_table_sql(self) -> &'static str {
        match self {
            Self::Current => CURRENT_DDL,
            Self::Extended => EXTENDED_DDL,
        }
    }
}

impl fmt::Display for MemberSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Current => "current",
            Self::Extended => "extended",
        })
    }
}

impl FromStr for MemberSchema {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.to_ascii_lowercase().as_str() {
            "current" => Ok(Self::Current),
            "extended" => Ok(Self::Extended),
            other => Err(Error::Config(format!("unknown member schema '{other}'"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_variants_are_idempotent_creates() {
        for schema in [MemberSchema::Current, MemberSchema::Extended] {
            let sql = schema.create_table_sql();
            assert!(
                sql.contains("CREATE TABLE IF NOT EXISTS Member"),
                "{schema} must not fail on an existing table"
            );
        }
    }

    #[test]
    fn variants_differ_in_name_and_date_columns() {
        let current = MemberSchema::Current.create_table_sql();
        let extended = MemberSchema::Extended.create_table_sql();

        assert!(current.contains("surname"));
        assert!(!current.contains("birthday"));
        assert!(extended.contains("lastname"));
        assert!(extended.contains("joinDate"));
        assert!(extended.contains("mandateSince"));
    }

    #[test]
    fn parses_schema_names() {
        assert_eq!("Extended".parse::<MemberSchema>().unwrap(), MemberSchema::Extended);
        assert!("legacy".parse::<MemberSchema>().is_err());
    }
}
