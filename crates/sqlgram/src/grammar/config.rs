use super::Dialect;
use crate::error::{GrammarError, GrammarResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub(crate) const DEFAULT_LOG_MAX_SQL_LENGTH: usize = 200;

/// Grammar settings, usually read from a TOML file:
///
/// ```toml
/// dialect = "postgres"
/// table_prefix = "app_"
/// log_max_sql_length = 500
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GrammarConfig {
    pub dialect: Dialect,
    #[serde(default)]
    pub table_prefix: String,
    /// Truncate logged SQL to this many chars; `0` disables truncation.
    #[serde(default = "default_log_max_sql_length")]
    pub log_max_sql_length: usize,
}

fn default_log_max_sql_length() -> usize {
    DEFAULT_LOG_MAX_SQL_LENGTH
}

impl Default for GrammarConfig {
    fn default() -> Self {
        Self {
            dialect: Dialect::Generic,
            table_prefix: String::new(),
            log_max_sql_length: DEFAULT_LOG_MAX_SQL_LENGTH,
        }
    }
}

impl GrammarConfig {
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            ..Self::default()
        }
    }

    /// Parse and validate TOML text.
    pub fn from_toml_str(raw: &str) -> GrammarResult<Self> {
        let config: GrammarConfig = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> GrammarResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            GrammarError::config(format!("failed to read config file {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&raw).map_err(|e| match e {
            GrammarError::Config(msg) => {
                GrammarError::config(format!("failed to parse config file {}: {msg}", path.display()))
            }
            other => other,
        })
    }

    /// The prefix is spliced inside identifier quotes, so it may not contain
    /// quote characters or whitespace.
    pub fn validate(&self) -> GrammarResult<()> {
        if let Some(c) = self
            .table_prefix
            .chars()
            .find(|c| matches!(c, '"' | '`' | '[' | ']') || c.is_whitespace())
        {
            return Err(GrammarError::config(format!(
                "table_prefix contains invalid character {c:?}"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_toml() {
        let config = GrammarConfig::from_toml_str(r#"dialect = "postgresql""#).unwrap();
        assert_eq!(config.dialect, Dialect::Postgres);
        assert_eq!(config.table_prefix, "");
        assert_eq!(config.log_max_sql_length, 200);
    }

    #[test]
    fn parses_full_toml() {
        let raw = r#"
            dialect = "mssql"
            table_prefix = "app_"
            log_max_sql_length = 0
        "#;
        let config = GrammarConfig::from_toml_str(raw).unwrap();
        assert_eq!(config.dialect, Dialect::SqlServer);
        assert_eq!(config.table_prefix, "app_");
        assert_eq!(config.log_max_sql_length, 0);
    }

    #[test]
    fn rejects_unknown_dialect_and_bad_prefix() {
        let err = GrammarConfig::from_toml_str(r#"dialect = "oracle""#).unwrap_err();
        assert!(matches!(err, GrammarError::Config(_)));

        let err = GrammarConfig::from_toml_str("dialect = \"mysql\"\ntable_prefix = \"a`b\"")
            .unwrap_err();
        assert!(err.to_string().contains("table_prefix"));
    }

    #[test]
    fn load_reports_missing_file() {
        let err = GrammarConfig::load("/nonexistent/sqlgram.toml").unwrap_err();
        assert!(err.to_string().contains("failed to read config file"));
    }

    #[test]
    fn dialect_from_str_accepts_aliases() {
        assert_eq!("PgSQL".parse::<Dialect>().unwrap(), Dialect::Postgres);
        assert_eq!("sqlite3".parse::<Dialect>().unwrap(), Dialect::Sqlite);
        assert!("db2".parse::<Dialect>().is_err());
    }
}
