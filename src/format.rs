//! Placeholder rendering.
//!
//! The scanner does not know any database syntax. Each recognized
//! placeholder is rendered by a [`PlaceholderFormat`], called once per
//! occurrence with the 1-based index assigned to its name.

use alloc::format;
use alloc::string::{String, ToString};
use core::fmt::{self, Display};
use core::str::FromStr;

use crate::errors::{Error, ParseError};
use crate::parsed::ParsedSql;

/// Renders the native placeholder for a 1-based parameter index.
///
/// Implemented for every `Fn(usize) -> String`, so closures can be passed
/// directly:
///
/// ```
/// use sql_named_params::PlaceholderFormat;
///
/// let pg = |i: usize| format!("${i}");
/// assert_eq!(pg.format_placeholder(2), "$2");
/// ```
pub trait PlaceholderFormat {
    /// Render the placeholder for `index`.
    fn format_placeholder(&self, index: usize) -> String;
}

impl<F> PlaceholderFormat for F
where
    F: Fn(usize) -> String,
{
    fn format_placeholder(&self, index: usize) -> String {
        self(index)
    }
}

/// Placeholder syntaxes of the common database engines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Dialect {
    /// PostgreSQL: `$1`, `$2`, ...
    Postgres,
    /// MySQL: an anonymous `?` per occurrence.
    MySql,
    /// SQLite: numbered `?1`, `?2`, ...
    Sqlite,
    /// SQL Server: `@p1`, `@p2`, ...
    SqlServer,
    /// Oracle: `:1`, `:2`, ...
    Oracle,
}

impl Dialect {
    /// All supported dialects.
    pub const ALL: [Dialect; 5] = [
        Dialect::Postgres,
        Dialect::MySql,
        Dialect::Sqlite,
        Dialect::SqlServer,
        Dialect::Oracle,
    ];

    /// Canonical lowercase name of the dialect.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Dialect::Postgres => "postgres",
            Dialect::MySql => "mysql",
            Dialect::Sqlite => "sqlite",
            Dialect::SqlServer => "sqlserver",
            Dialect::Oracle => "oracle",
        }
    }

    /// Whether the rendered placeholder carries the parameter index.
    ///
    /// When it does not, values are bound once per occurrence instead of
    /// once per distinct parameter.
    #[must_use]
    pub fn is_numbered(self) -> bool {
        !matches!(self, Dialect::MySql)
    }

    /// Rewrite the named placeholders of `sql` for this dialect.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::InvalidPlaceholderName`] if a placeholder name is
    /// malformed.
    pub fn parse_sql(self, sql: &str) -> Result<ParsedSql, ParseError> {
        crate::scanner::parse_sql(sql, Some(&self))
    }
}

impl PlaceholderFormat for Dialect {
    fn format_placeholder(&self, index: usize) -> String {
        match self {
            Dialect::Postgres => format!("${index}"),
            Dialect::MySql => "?".to_string(),
            Dialect::Sqlite => format!("?{index}"),
            Dialect::SqlServer => format!("@p{index}"),
            Dialect::Oracle => format!(":{index}"),
        }
    }
}

impl Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Dialect {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" | "pg" => Ok(Dialect::Postgres),
            "mysql" | "mariadb" => Ok(Dialect::MySql),
            "sqlite" | "sqlite3" => Ok(Dialect::Sqlite),
            "sqlserver" | "mssql" => Ok(Dialect::SqlServer),
            "oracle" => Ok(Dialect::Oracle),
            _ => Err(Error::UnknownDialect(s.into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dialect_rendering() {
        assert_eq!(Dialect::Postgres.format_placeholder(3), "$3");
        assert_eq!(Dialect::MySql.format_placeholder(3), "?");
        assert_eq!(Dialect::Sqlite.format_placeholder(3), "?3");
        assert_eq!(Dialect::SqlServer.format_placeholder(3), "@p3");
        assert_eq!(Dialect::Oracle.format_placeholder(3), ":3");
    }

    #[test]
    fn test_dialect_names_roundtrip() {
        for dialect in Dialect::ALL {
            assert_eq!(dialect.to_string().parse::<Dialect>(), Ok(dialect));
        }
        assert_eq!("PostgreSQL".parse::<Dialect>(), Ok(Dialect::Postgres));
        assert_eq!("MSSQL".parse::<Dialect>(), Ok(Dialect::SqlServer));
        assert_eq!(
            "db2".parse::<Dialect>(),
            Err(Error::UnknownDialect("db2".into()))
        );
    }

    #[test]
    fn test_closure_format() {
        let named = |i: usize| format!("@arg{i}");
        assert_eq!(named.format_placeholder(7), "@arg7");
    }
}
