use crate::statement::Statement;
use crate::value::Value;

/// Literal SQL supplied by the caller.
///
/// Raw fragments are spliced verbatim: they are never wrapped or escaped, and
/// they carry the bindings for whatever `?` placeholders they contain.
#[derive(Debug, Clone, PartialEq)]
pub struct Raw {
    pub sql: String,
    pub bindings: Vec<Value>,
}

impl Raw {
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            bindings: Vec::new(),
        }
    }

    pub fn with_bindings(sql: impl Into<String>, bindings: Vec<Value>) -> Self {
        Self {
            sql: sql.into(),
            bindings,
        }
    }

    pub(crate) fn to_statement(&self) -> Statement {
        Statement::with_bindings(self.sql.clone(), self.bindings.clone())
    }
}

/// Shorthand for [`Raw::new`].
pub fn raw(sql: impl Into<String>) -> Raw {
    Raw::new(sql)
}

impl From<&str> for Raw {
    fn from(sql: &str) -> Self {
        Raw::new(sql)
    }
}

impl From<String> for Raw {
    fn from(sql: String) -> Self {
        Raw::new(sql)
    }
}
