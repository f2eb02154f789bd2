use super::predicate::{Boolean, Filter, Predicate, PredicateKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    Left,
    Right,
    Cross,
}

impl JoinKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            JoinKind::Inner => "inner",
            JoinKind::Left => "left",
            JoinKind::Right => "right",
            JoinKind::Cross => "cross",
        }
    }
}

/// A join target and its `on` predicates.
///
/// `on` compares two columns; the [`Filter`] methods add value predicates
/// that bind like any `where` condition.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinClause {
    pub kind: JoinKind,
    pub table: String,
    pub conditions: Vec<Predicate>,
}

impl JoinClause {
    pub fn new(kind: JoinKind, table: &str) -> Self {
        Self {
            kind,
            table: table.to_string(),
            conditions: Vec::new(),
        }
    }

    /// `on first <op> second`
    pub fn on(self, first: &str, op: &str, second: &str) -> Self {
        self.where_column(first, op, second)
    }

    /// `or first <op> second`
    pub fn or_on(self, first: &str, op: &str, second: &str) -> Self {
        self.push_predicate(
            Boolean::Or,
            PredicateKind::Column {
                first: first.to_string(),
                operator: op.to_string(),
                second: second.to_string(),
            },
        )
    }
}

impl Filter for JoinClause {
    fn predicates_mut(&mut self) -> &mut Vec<Predicate> {
        &mut self.conditions
    }
}
