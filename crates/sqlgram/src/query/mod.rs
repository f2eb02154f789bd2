//! Dialect-agnostic query representation and its fluent builder.
//!
//! A [`Query`] only records clause data. Nothing is quoted or validated until
//! a [`Grammar`](crate::Grammar) compiles it, so the same query can be
//! compiled for several dialects.
//!
//! ```ignore
//! use sqlgram::{table, Dialect, Filter, Grammar};
//!
//! let query = table("users")
//!     .select(&["id", "email"])
//!     .eq("status", "active")
//!     .nested(|c| c.eq("role", "admin").or_eq("role", "owner"))
//!     .order_by_desc("created_at")
//!     .for_page(2, 15);
//!
//! let stmt = Grammar::new(Dialect::Postgres).compile_select(&query)?;
//! ```

mod join;
mod predicate;
mod row;

#[cfg(test)]
mod tests;

pub use join::{JoinClause, JoinKind};
pub use predicate::{
    Boolean, Conditions, DatePart, Filter, Operand, Predicate, PredicateKind,
};
pub use row::{Row, SetField};

use crate::raw::Raw;
use crate::value::Value;

/// Start a query against `table`.
pub fn table(name: &str) -> Query {
    Query::table(name)
}

/// The statement's source relation.
#[derive(Debug, Clone, PartialEq)]
pub enum Source {
    Table(String),
    Raw(Raw),
    Sub { query: Box<Query>, alias: String },
}

/// One entry of the select list or the group-by list.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Name(String),
    Raw(Raw),
    Sub { query: Box<Query>, alias: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Asc => "asc",
            Direction::Desc => "desc",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Order {
    Column { column: String, direction: Direction },
    Raw(Raw),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Union {
    pub query: Box<Query>,
    pub all: bool,
}

/// Row locking requested for a select.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lock {
    /// Exclusive lock (`for update`)
    Exclusive,
    /// Shared lock
    Shared,
    /// Dialect-specific lock text, emitted verbatim
    Raw(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateFn {
    Count,
    Sum,
    Min,
    Max,
    Avg,
    Exists,
}

impl AggregateFn {
    pub fn as_str(&self) -> &'static str {
        match self {
            AggregateFn::Count => "count",
            AggregateFn::Sum => "sum",
            AggregateFn::Min => "min",
            AggregateFn::Max => "max",
            AggregateFn::Avg => "avg",
            AggregateFn::Exists => "exists",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Aggregate {
    pub function: AggregateFn,
    pub column: String,
}

/// Uncompiled statement data, assembled through the builder methods.
#[derive(Debug, Clone, Default, PartialEq)]
#[must_use]
pub struct Query {
    pub(crate) source: Option<Source>,
    pub(crate) columns: Vec<Column>,
    pub(crate) distinct: bool,
    pub(crate) joins: Vec<JoinClause>,
    pub(crate) wheres: Vec<Predicate>,
    pub(crate) groups: Vec<Column>,
    pub(crate) havings: Vec<Predicate>,
    pub(crate) orders: Vec<Order>,
    pub(crate) limit: Option<u64>,
    pub(crate) offset: Option<u64>,
    pub(crate) unions: Vec<Union>,
    pub(crate) lock: Option<Lock>,
    pub(crate) aggregate: Option<Aggregate>,
    /// First builder misuse, reported when the query is compiled.
    pub(crate) build_error: Option<String>,
}

impl Query {
    /// Create an empty query with no source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a query against `name`.
    pub fn table(name: &str) -> Self {
        Self::new().from(name)
    }

    // ==================== Read access ====================

    pub fn source(&self) -> Option<&Source> {
        self.source.as_ref()
    }

    /// The source table name, when the source is a plain table.
    pub fn table_name(&self) -> Option<&str> {
        match &self.source {
            Some(Source::Table(name)) => Some(name),
            _ => None,
        }
    }

    pub fn wheres(&self) -> &[Predicate] {
        &self.wheres
    }

    pub fn joins(&self) -> &[JoinClause] {
        &self.joins
    }

    pub fn limit_value(&self) -> Option<u64> {
        self.limit
    }

    pub fn offset_value(&self) -> Option<u64> {
        self.offset
    }

    pub fn is_distinct(&self) -> bool {
        self.distinct
    }

    pub(crate) fn set_error(&mut self, message: String) {
        if self.build_error.is_none() {
            self.build_error = Some(message);
        }
    }

    // ==================== FROM ====================

    pub fn from(mut self, name: &str) -> Self {
        self.source = Some(Source::Table(name.to_string()));
        self
    }

    /// Use literal SQL as the source.
    pub fn from_raw(mut self, expr: impl Into<Raw>) -> Self {
        self.source = Some(Source::Raw(expr.into()));
        self
    }

    /// `from (select ...) as alias`
    pub fn from_sub(mut self, query: Query, alias: &str) -> Self {
        self.source = Some(Source::Sub {
            query: Box::new(query),
            alias: alias.to_string(),
        });
        self
    }

    // ==================== SELECT ====================

    /// Replace the select list.
    pub fn select(mut self, columns: &[&str]) -> Self {
        self.columns = columns.iter().map(|c| Column::Name(c.to_string())).collect();
        self
    }

    pub fn add_select(mut self, column: &str) -> Self {
        self.columns.push(Column::Name(column.to_string()));
        self
    }

    /// Add a literal select expression with its bindings.
    pub fn select_raw(mut self, sql: &str, bindings: Vec<Value>) -> Self {
        self.columns.push(Column::Raw(Raw::with_bindings(sql, bindings)));
        self
    }

    /// `(select ...) as alias` in the select list.
    pub fn select_sub(mut self, query: Query, alias: &str) -> Self {
        self.columns.push(Column::Sub {
            query: Box::new(query),
            alias: alias.to_string(),
        });
        self
    }

    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    // ==================== JOIN ====================

    /// `inner join table on first <op> second`
    pub fn join(self, table: &str, first: &str, op: &str, second: &str) -> Self {
        self.push_join(JoinClause::new(JoinKind::Inner, table).on(first, op, second))
    }

    pub fn left_join(self, table: &str, first: &str, op: &str, second: &str) -> Self {
        self.push_join(JoinClause::new(JoinKind::Left, table).on(first, op, second))
    }

    pub fn right_join(self, table: &str, first: &str, op: &str, second: &str) -> Self {
        self.push_join(JoinClause::new(JoinKind::Right, table).on(first, op, second))
    }

    pub fn cross_join(self, table: &str) -> Self {
        self.push_join(JoinClause::new(JoinKind::Cross, table))
    }

    /// Join with predicates built by `f`.
    pub fn join_with(
        self,
        kind: JoinKind,
        table: &str,
        f: impl FnOnce(JoinClause) -> JoinClause,
    ) -> Self {
        self.push_join(f(JoinClause::new(kind, table)))
    }

    /// Cross joins take no predicates; adding any is recorded as misuse.
    fn push_join(mut self, join: JoinClause) -> Self {
        if join.kind == JoinKind::Cross && !join.conditions.is_empty() {
            self.set_error(format!("cross join to {} cannot carry predicates", join.table));
            return self;
        }
        self.joins.push(join);
        self
    }

    // ==================== WHERE ====================

    /// Equality predicates for several fields at once, each carrying its own
    /// connector, bound positionally to `values`.
    ///
    /// A length mismatch is recorded and reported when the query is compiled.
    pub fn dynamic_where<V: Into<Value>>(
        mut self,
        fields: &[(&str, Boolean)],
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        if values.len() != fields.len() {
            self.set_error(format!(
                "dynamic where expects {} values, got {}",
                fields.len(),
                values.len()
            ));
            return self;
        }
        fields
            .iter()
            .zip(values)
            .fold(self, |q, ((column, boolean), value)| {
                q.compare(*boolean, column, "=", value)
            })
    }

    // ==================== GROUP BY / HAVING ====================

    pub fn group_by(mut self, columns: &[&str]) -> Self {
        self.groups
            .extend(columns.iter().map(|c| Column::Name(c.to_string())));
        self
    }

    pub fn group_by_raw(mut self, sql: &str, bindings: Vec<Value>) -> Self {
        self.groups.push(Column::Raw(Raw::with_bindings(sql, bindings)));
        self
    }

    /// `having column <op> ?`
    pub fn having(self, column: &str, op: &str, value: impl Into<Value>) -> Self {
        self.push_having(Boolean::And, column, op, value.into())
    }

    pub fn or_having(self, column: &str, op: &str, value: impl Into<Value>) -> Self {
        self.push_having(Boolean::Or, column, op, value.into())
    }

    pub fn having_raw(mut self, sql: &str, bindings: Vec<Value>) -> Self {
        self.havings.push(Predicate {
            boolean: Boolean::And,
            kind: PredicateKind::Raw(Raw::with_bindings(sql, bindings)),
        });
        self
    }

    pub fn or_having_raw(mut self, sql: &str, bindings: Vec<Value>) -> Self {
        self.havings.push(Predicate {
            boolean: Boolean::Or,
            kind: PredicateKind::Raw(Raw::with_bindings(sql, bindings)),
        });
        self
    }

    fn push_having(mut self, boolean: Boolean, column: &str, op: &str, value: Value) -> Self {
        self.havings.push(Predicate {
            boolean,
            kind: PredicateKind::Basic {
                column: column.to_string(),
                operator: op.to_string(),
                operand: Operand::Value(value),
            },
        });
        self
    }

    // ==================== ORDER BY ====================

    pub fn order_by(mut self, column: &str, direction: Direction) -> Self {
        self.orders.push(Order::Column {
            column: column.to_string(),
            direction,
        });
        self
    }

    pub fn order_by_asc(self, column: &str) -> Self {
        self.order_by(column, Direction::Asc)
    }

    pub fn order_by_desc(self, column: &str) -> Self {
        self.order_by(column, Direction::Desc)
    }

    pub fn order_by_raw(mut self, sql: &str, bindings: Vec<Value>) -> Self {
        self.orders.push(Order::Raw(Raw::with_bindings(sql, bindings)));
        self
    }

    // ==================== Pagination ====================

    /// Set the row limit. Values below one clear it.
    pub fn limit(mut self, n: i64) -> Self {
        self.limit = u64::try_from(n).ok().filter(|n| *n > 0);
        self
    }

    /// Set the row offset. Negative values clamp to zero.
    pub fn offset(mut self, n: i64) -> Self {
        self.offset = Some(u64::try_from(n).unwrap_or(0));
        self
    }

    /// Alias for [`Query::limit`].
    pub fn take(self, n: i64) -> Self {
        self.limit(n)
    }

    /// Alias for [`Query::offset`].
    pub fn skip(self, n: i64) -> Self {
        self.offset(n)
    }

    /// Limit to one page of `per_page` rows. Pages start at 1; anything lower
    /// is treated as the first page.
    pub fn for_page(self, page: i64, per_page: i64) -> Self {
        let page = page.max(1);
        let per_page = per_page.max(0);
        self.offset((page - 1).saturating_mul(per_page)).limit(per_page)
    }

    // ==================== UNION ====================

    pub fn union(mut self, query: Query) -> Self {
        self.unions.push(Union {
            query: Box::new(query),
            all: false,
        });
        self
    }

    pub fn union_all(mut self, query: Query) -> Self {
        self.unions.push(Union {
            query: Box::new(query),
            all: true,
        });
        self
    }

    // ==================== Locking ====================

    pub fn lock(mut self, lock: Lock) -> Self {
        self.lock = Some(lock);
        self
    }

    pub fn lock_for_update(self) -> Self {
        self.lock(Lock::Exclusive)
    }

    pub fn shared_lock(self) -> Self {
        self.lock(Lock::Shared)
    }

    // ==================== Aggregates ====================

    /// Replace the select list with `function(column) as aggregate`.
    pub fn aggregate(mut self, function: AggregateFn, column: &str) -> Self {
        self.aggregate = Some(Aggregate {
            function,
            column: column.to_string(),
        });
        self
    }

    pub(crate) fn without_aggregate(&self) -> Query {
        let mut query = self.clone();
        query.aggregate = None;
        query
    }
}

impl Filter for Query {
    fn predicates_mut(&mut self) -> &mut Vec<Predicate> {
        &mut self.wheres
    }
}
