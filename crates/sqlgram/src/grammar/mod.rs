//! Dialect grammars.
//!
//! A [`Grammar`] compiles a [`Query`] for one [`Dialect`]. Each dialect is a
//! static dialect spec: quote characters, the allowed comparison
//! operators, a few behavior flags, and an override table. Override slots left
//! as `None` fall back to the baseline compilers in `clauses` and
//! `statements`, so a dialect only spells out where its SQL diverges.

mod clauses;
mod config;
mod mysql;
mod postgres;
mod sqlite;
mod sqlserver;
mod statements;


pub use config::GrammarConfig;

use crate::error::{GrammarError, GrammarResult};
use crate::ident::{Quote, Wrapper};
use crate::query::{AggregateFn, DatePart, Filter, Query, Row};
use crate::statement::Statement;
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Target SQL dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Dialect {
    /// ANSI baseline
    #[default]
    #[serde(rename = "generic", alias = "ansi")]
    Generic,
    #[serde(rename = "mysql", alias = "mariadb")]
    MySql,
    #[serde(rename = "postgres", alias = "postgresql", alias = "pgsql")]
    Postgres,
    #[serde(rename = "sqlite", alias = "sqlite3")]
    Sqlite,
    #[serde(rename = "sqlserver", alias = "mssql", alias = "sqlsrv")]
    SqlServer,
}

impl Dialect {
    pub const ALL: [Dialect; 5] = [
        Dialect::Generic,
        Dialect::MySql,
        Dialect::Postgres,
        Dialect::Sqlite,
        Dialect::SqlServer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Dialect::Generic => "generic",
            Dialect::MySql => "mysql",
            Dialect::Postgres => "postgres",
            Dialect::Sqlite => "sqlite",
            Dialect::SqlServer => "sqlserver",
        }
    }

    fn spec(self) -> &'static DialectSpec {
        match self {
            Dialect::Generic => &GENERIC,
            Dialect::MySql => &mysql::SPEC,
            Dialect::Postgres => &postgres::SPEC,
            Dialect::Sqlite => &sqlite::SPEC,
            Dialect::SqlServer => &sqlserver::SPEC,
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dialect {
    type Err = GrammarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "generic" | "ansi" => Ok(Dialect::Generic),
            "mysql" | "mariadb" => Ok(Dialect::MySql),
            "postgres" | "postgresql" | "pgsql" => Ok(Dialect::Postgres),
            "sqlite" | "sqlite3" => Ok(Dialect::Sqlite),
            "sqlserver" | "mssql" | "sqlsrv" => Ok(Dialect::SqlServer),
            other => Err(GrammarError::config(format!("unknown dialect '{other}'"))),
        }
    }
}

/// Where a query's own order, limit and offset go when it has unions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnionOrdering {
    /// Emitted once, after the last union member, applying to the whole set.
    Deferred,
    /// Every member is parenthesized and keeps its own order and limit.
    PerMember,
}

/// How an insert exposes the generated key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertId {
    /// Append `returning <column>`.
    Returning,
    /// No SQL change; the driver reports the last insert id.
    LastInsertId,
}

/// Clauses of a select, in the order the baseline emits them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clause {
    Columns,
    From,
    Joins,
    Wheres,
    Groups,
    Havings,
    Orders,
    Limit,
    Offset,
    Lock,
    Unions,
}

/// Statement kinds a grammar compiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Select,
    Exists,
    Insert,
    InsertGetId,
    Update,
    Delete,
    Truncate,
}

impl StatementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatementKind::Select => "select",
            StatementKind::Exists => "exists",
            StatementKind::Insert => "insert",
            StatementKind::InsertGetId => "insert_get_id",
            StatementKind::Update => "update",
            StatementKind::Delete => "delete",
            StatementKind::Truncate => "truncate",
        }
    }
}

pub(crate) type ClauseFn = fn(&Grammar, &Query) -> GrammarResult<Statement>;
pub(crate) type InsertFn = fn(&Grammar, &Query, &[Row]) -> GrammarResult<Statement>;
pub(crate) type UpdateFn = fn(&Grammar, &Query, &Row) -> GrammarResult<Statement>;
pub(crate) type TruncateFn = fn(&Grammar, &Query) -> GrammarResult<Vec<Statement>>;
pub(crate) type DatePartFn = fn(&Grammar, DatePart, &str) -> String;

/// Per-dialect replacements for baseline compilers. `None` inherits.
#[derive(Clone, Copy)]
pub(crate) struct Overrides {
    pub select: Option<ClauseFn>,
    pub columns: Option<ClauseFn>,
    pub from: Option<ClauseFn>,
    pub limit: Option<ClauseFn>,
    pub offset: Option<ClauseFn>,
    pub lock: Option<ClauseFn>,
    pub date_part: Option<DatePartFn>,
    pub insert: Option<InsertFn>,
    pub update: Option<UpdateFn>,
    pub delete: Option<ClauseFn>,
    pub truncate: Option<TruncateFn>,
}

impl Overrides {
    pub const NONE: Overrides = Overrides {
        select: None,
        columns: None,
        from: None,
        limit: None,
        offset: None,
        lock: None,
        date_part: None,
        insert: None,
        update: None,
        delete: None,
        truncate: None,
    };
}

pub(crate) struct DialectSpec {
    pub quote: Quote,
    pub operators: &'static [&'static str],
    pub union_ordering: UnionOrdering,
    pub insert_id: InsertId,
    pub overrides: Overrides,
}

static GENERIC: DialectSpec = DialectSpec {
    quote: Quote::DOUBLE,
    operators: &[
        "=", "<", ">", "<=", ">=", "<>", "!=", "like", "not like", "between", "ilike", "&", "|",
        "^", "<<", ">>", "rlike", "regexp", "not regexp",
    ],
    union_ordering: UnionOrdering::Deferred,
    insert_id: InsertId::LastInsertId,
    overrides: Overrides::NONE,
};

/// Compiles queries for one dialect.
///
/// A grammar is immutable while compiling and can be shared freely across
/// threads.
#[derive(Debug, Clone)]
pub struct Grammar {
    dialect: Dialect,
    table_prefix: String,
    log_max_sql_length: usize,
}

impl Default for Grammar {
    fn default() -> Self {
        Self::new(Dialect::Generic)
    }
}

impl Grammar {
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            table_prefix: String::new(),
            log_max_sql_length: config::DEFAULT_LOG_MAX_SQL_LENGTH,
        }
    }

    /// Build a grammar from validated configuration.
    pub fn from_config(config: &GrammarConfig) -> GrammarResult<Self> {
        config.validate()?;
        Ok(Self {
            dialect: config.dialect,
            table_prefix: config.table_prefix.clone(),
            log_max_sql_length: config.log_max_sql_length,
        })
    }

    pub fn with_table_prefix(mut self, prefix: &str) -> Self {
        self.table_prefix = prefix.to_string();
        self
    }

    pub fn set_table_prefix(&mut self, prefix: &str) {
        self.table_prefix = prefix.to_string();
    }

    /// Truncate logged SQL to `len` chars. `0` disables truncation.
    pub fn with_log_max_sql_length(mut self, len: usize) -> Self {
        self.log_max_sql_length = len;
        self
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn table_prefix(&self) -> &str {
        &self.table_prefix
    }

    pub fn quote(&self) -> Quote {
        self.dialect.spec().quote
    }

    /// Comparison operators this dialect accepts.
    pub fn operators(&self) -> &'static [&'static str] {
        self.dialect.spec().operators
    }

    pub fn union_ordering(&self) -> UnionOrdering {
        self.dialect.spec().union_ordering
    }

    pub fn insert_id_strategy(&self) -> InsertId {
        self.dialect.spec().insert_id
    }

    /// Whether this dialect replaces the baseline compiler for `clause`.
    pub fn overrides_clause(&self, clause: Clause) -> bool {
        let o = &self.dialect.spec().overrides;
        match clause {
            Clause::Columns => o.columns.is_some(),
            Clause::From => o.from.is_some(),
            Clause::Limit => o.limit.is_some(),
            Clause::Offset => o.offset.is_some(),
            Clause::Lock => o.lock.is_some(),
            Clause::Joins
            | Clause::Wheres
            | Clause::Groups
            | Clause::Havings
            | Clause::Orders
            | Clause::Unions => false,
        }
    }

    /// Whether this dialect replaces the baseline assembler for `kind`.
    pub fn overrides_statement(&self, kind: StatementKind) -> bool {
        let o = &self.dialect.spec().overrides;
        match kind {
            StatementKind::Select => o.select.is_some(),
            StatementKind::Insert | StatementKind::InsertGetId => o.insert.is_some(),
            StatementKind::Update => o.update.is_some(),
            StatementKind::Delete => o.delete.is_some(),
            StatementKind::Truncate => o.truncate.is_some(),
            StatementKind::Exists => false,
        }
    }

    // ==================== Identifiers ====================

    fn wrapper(&self) -> Wrapper<'_> {
        Wrapper::new(self.quote(), &self.table_prefix)
    }

    /// Quote a column reference such as `users.id` or `email as e`.
    pub fn wrap(&self, name: &str) -> String {
        self.wrapper().wrap(name)
    }

    /// Quote a table reference, applying the table prefix.
    pub fn wrap_table(&self, name: &str) -> String {
        self.wrapper().wrap_table(name)
    }

    /// Quote a single identifier without splitting on `.`.
    pub fn wrap_value(&self, segment: &str) -> String {
        self.wrapper().wrap_value(segment)
    }

    // ==================== Compile ====================

    /// Compile a select statement.
    pub fn compile_select(&self, query: &Query) -> GrammarResult<Statement> {
        self.traced(StatementKind::Select, self.select_statement(query))
    }

    /// Compile `select exists(<query>) as "exists"`.
    pub fn compile_exists(&self, query: &Query) -> GrammarResult<Statement> {
        let result = check_built(query).and_then(|_| statements::compile_exists(self, query));
        self.traced(StatementKind::Exists, result)
    }

    /// Compile an insert of one or more rows into the query's table.
    ///
    /// Every row must assign the same columns in the same order.
    pub fn compile_insert(&self, query: &Query, rows: &[Row]) -> GrammarResult<Statement> {
        let result = check_built(query).and_then(|_| self.insert_fn()(self, query, rows));
        self.traced(StatementKind::Insert, result)
    }

    /// Compile an insert of one row that yields its generated key, read from
    /// `sequence` (default `id`).
    pub fn compile_insert_get_id(
        &self,
        query: &Query,
        row: &Row,
        sequence: Option<&str>,
    ) -> GrammarResult<Statement> {
        let result = check_built(query)
            .and_then(|_| statements::compile_insert_get_id(self, query, row, sequence));
        self.traced(StatementKind::InsertGetId, result)
    }

    /// Compile an update of the query's table, filtered by its wheres.
    pub fn compile_update(&self, query: &Query, row: &Row) -> GrammarResult<Statement> {
        let update = self.dialect.spec().overrides.update;
        let result = check_built(query)
            .and_then(|_| update.unwrap_or(statements::compile_update)(self, query, row));
        self.traced(StatementKind::Update, result)
    }

    /// Compile a delete from the query's table, filtered by its wheres.
    pub fn compile_delete(&self, query: &Query) -> GrammarResult<Statement> {
        self.traced(StatementKind::Delete, self.delete_statement(query))
    }

    /// Compile a delete of the row whose `id` equals `id`.
    pub fn compile_delete_by_id(
        &self,
        query: &Query,
        id: impl Into<Value>,
    ) -> GrammarResult<Statement> {
        self.compile_delete_by_key(query, "id", id)
    }

    /// Compile a delete of the row whose `key` column equals `id`, in
    /// addition to any existing wheres.
    pub fn compile_delete_by_key(
        &self,
        query: &Query,
        key: &str,
        id: impl Into<Value>,
    ) -> GrammarResult<Statement> {
        let query = query.clone().eq(key, id);
        self.compile_delete(&query)
    }

    /// Compile statements that empty the query's table. Some dialects need
    /// more than one statement.
    pub fn compile_truncate(&self, query: &Query) -> GrammarResult<Vec<Statement>> {
        let truncate = self.dialect.spec().overrides.truncate;
        let result = check_built(query)
            .and_then(|_| truncate.unwrap_or(statements::compile_truncate)(self, query));
        match &result {
            Ok(stmts) => stmts
                .iter()
                .for_each(|s| self.log_compiled(StatementKind::Truncate, s)),
            Err(err) => self.log_rejected(StatementKind::Truncate, err),
        }
        result
    }

    // ==================== Dispatch ====================

    /// Compile a select without logging; used for sub-queries as well.
    pub(crate) fn select_statement(&self, query: &Query) -> GrammarResult<Statement> {
        check_built(query)?;
        if let Some(aggregate) = &query.aggregate {
            if aggregate.function == AggregateFn::Exists {
                return statements::compile_exists(self, &query.without_aggregate());
            }
        }
        let select = self.dialect.spec().overrides.select;
        select.unwrap_or(statements::compile_select)(self, query)
    }

    fn delete_statement(&self, query: &Query) -> GrammarResult<Statement> {
        check_built(query)?;
        let delete = self.dialect.spec().overrides.delete;
        delete.unwrap_or(statements::compile_delete)(self, query)
    }

    pub(crate) fn insert_fn(&self) -> InsertFn {
        self.dialect
            .spec()
            .overrides
            .insert
            .unwrap_or(statements::compile_insert)
    }

    /// Run the compiler registered for `clause`.
    pub(crate) fn compile_clause(&self, clause: Clause, query: &Query) -> GrammarResult<Statement> {
        let o = &self.dialect.spec().overrides;
        let compile: ClauseFn = match clause {
            Clause::Columns => o.columns.unwrap_or(clauses::compile_columns),
            Clause::From => o.from.unwrap_or(clauses::compile_from),
            Clause::Joins => clauses::compile_joins,
            Clause::Wheres => clauses::compile_wheres,
            Clause::Groups => clauses::compile_groups,
            Clause::Havings => clauses::compile_havings,
            Clause::Orders => clauses::compile_orders,
            Clause::Limit => o.limit.unwrap_or(clauses::compile_limit),
            Clause::Offset => o.offset.unwrap_or(clauses::compile_offset),
            Clause::Lock => o.lock.unwrap_or(clauses::compile_lock),
            Clause::Unions => clauses::compile_unions,
        };
        compile(self, query)
    }

    pub(crate) fn date_part(&self, part: DatePart, column: &str) -> String {
        let date_part = self.dialect.spec().overrides.date_part;
        date_part.unwrap_or(clauses::compile_date_part)(self, part, column)
    }

    /// Validate `op` against the dialect's operator set.
    pub(crate) fn check_operator<'a>(&self, op: &'a str) -> GrammarResult<&'a str> {
        let op = op.trim();
        let lower = op.to_ascii_lowercase();
        if self.operators().contains(&lower.as_str()) {
            return Ok(op);
        }
        Err(GrammarError::invalid_operator(op, self.dialect))
    }

    // ==================== Logging ====================

    fn traced(&self, kind: StatementKind, result: GrammarResult<Statement>) -> GrammarResult<Statement> {
        match &result {
            Ok(stmt) => self.log_compiled(kind, stmt),
            Err(err) => self.log_rejected(kind, err),
        }
        result
    }

    #[cfg(feature = "tracing")]
    fn log_compiled(&self, kind: StatementKind, stmt: &Statement) {
        tracing::debug!(
            target: "sqlgram.compile",
            dialect = %self.dialect,
            kind = kind.as_str(),
            bindings = stmt.bindings().len(),
            sql = %truncate_sql(stmt.sql(), self.log_max_sql_length),
            "statement compiled"
        );
    }

    #[cfg(not(feature = "tracing"))]
    fn log_compiled(&self, _kind: StatementKind, _stmt: &Statement) {}

    #[cfg(feature = "tracing")]
    fn log_rejected(&self, kind: StatementKind, err: &GrammarError) {
        tracing::warn!(
            target: "sqlgram.compile",
            dialect = %self.dialect,
            kind = kind.as_str(),
            error = %err,
            "query rejected"
        );
    }

    #[cfg(not(feature = "tracing"))]
    fn log_rejected(&self, _kind: StatementKind, _err: &GrammarError) {}
}

/// Surface builder misuse recorded on the query.
fn check_built(query: &Query) -> GrammarResult<()> {
    match &query.build_error {
        Some(message) => Err(GrammarError::invalid_argument(message.clone())),
        None => Ok(()),
    }
}

/// Cut `sql` to `max` chars on a char boundary. `0` keeps everything.
#[cfg_attr(not(feature = "tracing"), allow(dead_code))]
fn truncate_sql(sql: &str, max: usize) -> std::borrow::Cow<'_, str> {
    if max == 0 {
        return sql.into();
    }
    match sql.char_indices().nth(max) {
        Some((end, _)) => format!("{}...", &sql[..end]).into(),
        None => sql.into(),
    }
}

impl Query {
    /// Compile this query as a select for `grammar`.
    pub fn to_statement(&self, grammar: &Grammar) -> GrammarResult<Statement> {
        grammar.compile_select(self)
    }
}
