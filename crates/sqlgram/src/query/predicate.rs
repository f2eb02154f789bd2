//! Filter predicates shared by `where`, `having` and join `on` clauses.

use super::Query;
use crate::raw::Raw;
use crate::value::Value;

/// Boolean connector joining a predicate to the one before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Boolean {
    #[default]
    And,
    Or,
}

impl Boolean {
    pub fn as_str(&self) -> &'static str {
        match self {
            Boolean::And => "and",
            Boolean::Or => "or",
        }
    }
}

/// Date component extracted by a date-part predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatePart {
    Day,
    Month,
    Year,
}

impl DatePart {
    pub fn as_str(&self) -> &'static str {
        match self {
            DatePart::Day => "day",
            DatePart::Month => "month",
            DatePart::Year => "year",
        }
    }
}

/// Right-hand side of a comparison.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// Bound as a `?` placeholder.
    Value(Value),
    /// Inlined verbatim.
    Raw(Raw),
    /// Compiled as a parenthesized sub-select.
    Query(Box<Query>),
}

impl From<Value> for Operand {
    fn from(value: Value) -> Self {
        Operand::Value(value)
    }
}

impl From<Raw> for Operand {
    fn from(raw: Raw) -> Self {
        Operand::Raw(raw)
    }
}

impl From<Query> for Operand {
    fn from(query: Query) -> Self {
        Operand::Query(Box::new(query))
    }
}

/// One filter condition.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub boolean: Boolean,
    pub kind: PredicateKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PredicateKind {
    /// `column <op> operand`
    Basic {
        column: String,
        operator: String,
        operand: Operand,
    },
    /// `first <op> second`, both identifiers
    Column {
        first: String,
        operator: String,
        second: String,
    },
    /// `column [not] between ? and ?`
    Between {
        column: String,
        low: Value,
        high: Value,
        negated: bool,
    },
    /// `column [not] in (?, ...)`
    In {
        column: String,
        values: Vec<Value>,
        negated: bool,
    },
    /// `column [not] in (select ...)`
    InSub {
        column: String,
        query: Box<Query>,
        negated: bool,
    },
    /// `column is [not] null`
    Null { column: String, negated: bool },
    /// `[not] exists (select ...)`
    Exists { query: Box<Query>, negated: bool },
    /// `day(column) <op> ?` and friends
    Date {
        part: DatePart,
        column: String,
        operator: String,
        value: Value,
    },
    /// Parenthesized sub-tree
    Nested(Vec<Predicate>),
    /// Literal fragment with its own bindings
    Raw(Raw),
    /// `(raw) <op> operand`
    RawCompare {
        raw: Raw,
        operator: String,
        operand: Operand,
    },
}

/// A standalone predicate list, used for nested groups.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Conditions {
    predicates: Vec<Predicate>,
}

impl Conditions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn into_predicates(self) -> Vec<Predicate> {
        self.predicates
    }
}

impl Filter for Conditions {
    fn predicates_mut(&mut self) -> &mut Vec<Predicate> {
        &mut self.predicates
    }
}

/// Predicate-building methods shared by every clause that holds a predicate
/// list.
///
/// Implementors only expose their list; all builder methods are provided.
/// Operators are checked against the dialect at compile time, not here.
pub trait Filter: Sized {
    /// The predicate list new conditions are appended to.
    fn predicates_mut(&mut self) -> &mut Vec<Predicate>;

    /// Append a predicate with an explicit connector.
    fn push_predicate(mut self, boolean: Boolean, kind: PredicateKind) -> Self {
        self.predicates_mut().push(Predicate { boolean, kind });
        self
    }

    /// Append a comparison. Comparing to `Value::Null` with `=` becomes
    /// `is null`; with `!=` or `<>` it becomes `is not null`.
    fn compare(self, boolean: Boolean, column: &str, op: &str, value: Value) -> Self {
        let column = column.to_string();
        if value.is_null() {
            match op.trim() {
                "=" => return self.push_predicate(boolean, PredicateKind::Null { column, negated: false }),
                "!=" | "<>" => {
                    return self.push_predicate(boolean, PredicateKind::Null { column, negated: true });
                }
                _ => {}
            }
        }
        self.push_predicate(
            boolean,
            PredicateKind::Basic {
                column,
                operator: op.to_string(),
                operand: Operand::Value(value),
            },
        )
    }

    // ==================== Comparison ====================

    /// `column <op> ?`
    fn filter(self, column: &str, op: &str, value: impl Into<Value>) -> Self {
        self.compare(Boolean::And, column, op, value.into())
    }

    /// `or column <op> ?`
    fn or_filter(self, column: &str, op: &str, value: impl Into<Value>) -> Self {
        self.compare(Boolean::Or, column, op, value.into())
    }

    fn eq(self, column: &str, value: impl Into<Value>) -> Self {
        self.filter(column, "=", value)
    }

    fn or_eq(self, column: &str, value: impl Into<Value>) -> Self {
        self.or_filter(column, "=", value)
    }

    fn ne(self, column: &str, value: impl Into<Value>) -> Self {
        self.filter(column, "!=", value)
    }

    fn gt(self, column: &str, value: impl Into<Value>) -> Self {
        self.filter(column, ">", value)
    }

    fn gte(self, column: &str, value: impl Into<Value>) -> Self {
        self.filter(column, ">=", value)
    }

    fn lt(self, column: &str, value: impl Into<Value>) -> Self {
        self.filter(column, "<", value)
    }

    fn lte(self, column: &str, value: impl Into<Value>) -> Self {
        self.filter(column, "<=", value)
    }

    fn like(self, column: &str, pattern: impl Into<Value>) -> Self {
        self.filter(column, "like", pattern)
    }

    /// `column <op> <raw sql>`, with the raw side inlined.
    fn filter_raw(self, column: &str, op: &str, expr: impl Into<Raw>) -> Self {
        self.push_predicate(Boolean::And, basic(column, op, Operand::Raw(expr.into())))
    }

    fn or_filter_raw(self, column: &str, op: &str, expr: impl Into<Raw>) -> Self {
        self.push_predicate(Boolean::Or, basic(column, op, Operand::Raw(expr.into())))
    }

    /// `column <op> (select ...)`
    fn filter_sub(self, column: &str, op: &str, query: Query) -> Self {
        self.push_predicate(Boolean::And, basic(column, op, query.into()))
    }

    fn or_filter_sub(self, column: &str, op: &str, query: Query) -> Self {
        self.push_predicate(Boolean::Or, basic(column, op, query.into()))
    }

    /// `first <op> second`, comparing two columns.
    fn where_column(self, first: &str, op: &str, second: &str) -> Self {
        self.push_predicate(
            Boolean::And,
            PredicateKind::Column {
                first: first.to_string(),
                operator: op.to_string(),
                second: second.to_string(),
            },
        )
    }

    fn or_where_column(self, first: &str, op: &str, second: &str) -> Self {
        self.push_predicate(
            Boolean::Or,
            PredicateKind::Column {
                first: first.to_string(),
                operator: op.to_string(),
                second: second.to_string(),
            },
        )
    }

    // ==================== Range ====================

    fn between(self, column: &str, low: impl Into<Value>, high: impl Into<Value>) -> Self {
        self.push_predicate(Boolean::And, between(column, low.into(), high.into(), false))
    }

    fn not_between(self, column: &str, low: impl Into<Value>, high: impl Into<Value>) -> Self {
        self.push_predicate(Boolean::And, between(column, low.into(), high.into(), true))
    }

    fn or_between(self, column: &str, low: impl Into<Value>, high: impl Into<Value>) -> Self {
        self.push_predicate(Boolean::Or, between(column, low.into(), high.into(), false))
    }

    fn or_not_between(self, column: &str, low: impl Into<Value>, high: impl Into<Value>) -> Self {
        self.push_predicate(Boolean::Or, between(column, low.into(), high.into(), true))
    }

    // ==================== Set membership ====================

    fn in_list<V: Into<Value>>(self, column: &str, values: impl IntoIterator<Item = V>) -> Self {
        self.push_predicate(Boolean::And, in_list(column, values, false))
    }

    fn not_in<V: Into<Value>>(self, column: &str, values: impl IntoIterator<Item = V>) -> Self {
        self.push_predicate(Boolean::And, in_list(column, values, true))
    }

    fn or_in_list<V: Into<Value>>(self, column: &str, values: impl IntoIterator<Item = V>) -> Self {
        self.push_predicate(Boolean::Or, in_list(column, values, false))
    }

    fn or_not_in<V: Into<Value>>(self, column: &str, values: impl IntoIterator<Item = V>) -> Self {
        self.push_predicate(Boolean::Or, in_list(column, values, true))
    }

    fn in_sub(self, column: &str, query: Query) -> Self {
        self.push_predicate(Boolean::And, in_sub(column, query, false))
    }

    fn not_in_sub(self, column: &str, query: Query) -> Self {
        self.push_predicate(Boolean::And, in_sub(column, query, true))
    }

    fn or_in_sub(self, column: &str, query: Query) -> Self {
        self.push_predicate(Boolean::Or, in_sub(column, query, false))
    }

    fn or_not_in_sub(self, column: &str, query: Query) -> Self {
        self.push_predicate(Boolean::Or, in_sub(column, query, true))
    }

    // ==================== Null ====================

    fn is_null(self, column: &str) -> Self {
        self.push_predicate(Boolean::And, null_check(column, false))
    }

    fn is_not_null(self, column: &str) -> Self {
        self.push_predicate(Boolean::And, null_check(column, true))
    }

    fn or_is_null(self, column: &str) -> Self {
        self.push_predicate(Boolean::Or, null_check(column, false))
    }

    fn or_is_not_null(self, column: &str) -> Self {
        self.push_predicate(Boolean::Or, null_check(column, true))
    }

    // ==================== Exists ====================

    fn exists(self, query: Query) -> Self {
        self.push_predicate(Boolean::And, exists(query, false))
    }

    fn not_exists(self, query: Query) -> Self {
        self.push_predicate(Boolean::And, exists(query, true))
    }

    fn or_exists(self, query: Query) -> Self {
        self.push_predicate(Boolean::Or, exists(query, false))
    }

    fn or_not_exists(self, query: Query) -> Self {
        self.push_predicate(Boolean::Or, exists(query, true))
    }

    // ==================== Date parts ====================

    fn where_date_part(self, part: DatePart, column: &str, op: &str, value: impl Into<Value>) -> Self {
        self.push_predicate(
            Boolean::And,
            PredicateKind::Date {
                part,
                column: column.to_string(),
                operator: op.to_string(),
                value: value.into(),
            },
        )
    }

    fn where_day(self, column: &str, op: &str, value: impl Into<Value>) -> Self {
        self.where_date_part(DatePart::Day, column, op, value)
    }

    fn where_month(self, column: &str, op: &str, value: impl Into<Value>) -> Self {
        self.where_date_part(DatePart::Month, column, op, value)
    }

    fn where_year(self, column: &str, op: &str, value: impl Into<Value>) -> Self {
        self.where_date_part(DatePart::Year, column, op, value)
    }

    // ==================== Groups & raw ====================

    /// `(...)`, built by `f`. Empty groups are dropped.
    fn nested(self, f: impl FnOnce(Conditions) -> Conditions) -> Self {
        nest(self, Boolean::And, f)
    }

    /// `or (...)`, built by `f`. Empty groups are dropped.
    fn or_nested(self, f: impl FnOnce(Conditions) -> Conditions) -> Self {
        nest(self, Boolean::Or, f)
    }

    /// Literal predicate SQL carrying its own bindings.
    fn where_raw(self, sql: &str, bindings: Vec<Value>) -> Self {
        self.push_predicate(Boolean::And, PredicateKind::Raw(Raw::with_bindings(sql, bindings)))
    }

    fn or_where_raw(self, sql: &str, bindings: Vec<Value>) -> Self {
        self.push_predicate(Boolean::Or, PredicateKind::Raw(Raw::with_bindings(sql, bindings)))
    }

    /// `(raw) <op> operand`
    fn where_raw_compare(self, expr: impl Into<Raw>, op: &str, operand: impl Into<Operand>) -> Self {
        self.push_predicate(
            Boolean::And,
            PredicateKind::RawCompare {
                raw: expr.into(),
                operator: op.to_string(),
                operand: operand.into(),
            },
        )
    }
}

fn basic(column: &str, op: &str, operand: Operand) -> PredicateKind {
    PredicateKind::Basic {
        column: column.to_string(),
        operator: op.to_string(),
        operand,
    }
}

fn between(column: &str, low: Value, high: Value, negated: bool) -> PredicateKind {
    PredicateKind::Between {
        column: column.to_string(),
        low,
        high,
        negated,
    }
}

fn in_list<V: Into<Value>>(
    column: &str,
    values: impl IntoIterator<Item = V>,
    negated: bool,
) -> PredicateKind {
    PredicateKind::In {
        column: column.to_string(),
        values: values.into_iter().map(Into::into).collect(),
        negated,
    }
}

fn in_sub(column: &str, query: Query, negated: bool) -> PredicateKind {
    PredicateKind::InSub {
        column: column.to_string(),
        query: Box::new(query),
        negated,
    }
}

fn null_check(column: &str, negated: bool) -> PredicateKind {
    PredicateKind::Null {
        column: column.to_string(),
        negated,
    }
}

fn exists(query: Query, negated: bool) -> PredicateKind {
    PredicateKind::Exists {
        query: Box::new(query),
        negated,
    }
}

fn nest<F: Filter>(target: F, boolean: Boolean, f: impl FnOnce(Conditions) -> Conditions) -> F {
    let group = f(Conditions::new());
    if group.is_empty() {
        return target;
    }
    target.push_predicate(boolean, PredicateKind::Nested(group.into_predicates()))
}
