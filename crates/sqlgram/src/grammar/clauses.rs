//! Baseline clause compilers.
//!
//! Every function here renders one clause of a select and returns an empty
//! statement when the clause has nothing to say, so the assemblers can append
//! clauses unconditionally. Dialects replace individual functions through
//! their override table.

use super::{Clause, Grammar, UnionOrdering};
use crate::error::{GrammarError, GrammarResult};
use crate::query::{
    Aggregate, Column, DatePart, Lock, Operand, Order, Predicate,
    PredicateKind, Query, Source,
};
use crate::statement::Statement;

// ==================== SELECT list ====================

pub(crate) fn compile_columns(g: &Grammar, q: &Query) -> GrammarResult<Statement> {
    if let Some(aggregate) = &q.aggregate {
        return Ok(compile_aggregate(g, q, aggregate));
    }
    let mut stmt = Statement::raw(if q.distinct { "select distinct" } else { "select" });
    stmt.append(column_list(g, &q.columns)?);
    Ok(stmt)
}

/// `func(column) as aggregate`, with `distinct` folded into the argument.
pub(crate) fn compile_aggregate(g: &Grammar, q: &Query, aggregate: &Aggregate) -> Statement {
    let mut column = g.wrap(&aggregate.column);
    if q.distinct && aggregate.column != "*" {
        column = format!("distinct {column}");
    }
    Statement::raw(format!(
        "select {}({}) as aggregate",
        aggregate.function.as_str(),
        column
    ))
}

/// Comma separated select list, `*` when empty.
pub(crate) fn column_list(g: &Grammar, columns: &[Column]) -> GrammarResult<Statement> {
    if columns.is_empty() {
        return Ok(Statement::raw("*"));
    }
    let parts = columns
        .iter()
        .map(|c| compile_column(g, c))
        .collect::<GrammarResult<Vec<_>>>()?;
    Ok(Statement::join(parts, ", "))
}

fn compile_column(g: &Grammar, column: &Column) -> GrammarResult<Statement> {
    Ok(match column {
        Column::Name(name) => Statement::raw(g.wrap(name)),
        Column::Raw(raw) => raw.to_statement(),
        Column::Sub { query, alias } => {
            let mut stmt = g.select_statement(query)?.parenthesized();
            stmt.push(" as ").push(&g.wrap_value(alias));
            stmt
        }
    })
}

// ==================== FROM ====================

pub(crate) fn compile_from(g: &Grammar, q: &Query) -> GrammarResult<Statement> {
    let Some(source) = &q.source else {
        return Ok(Statement::new());
    };
    let mut stmt = Statement::raw("from ");
    stmt.push_statement(compile_source(g, source)?);
    Ok(stmt)
}

pub(crate) fn compile_source(g: &Grammar, source: &Source) -> GrammarResult<Statement> {
    Ok(match source {
        Source::Table(name) => Statement::raw(g.wrap_table(name)),
        Source::Raw(raw) => raw.to_statement(),
        Source::Sub { query, alias } => {
            let mut stmt = g.select_statement(query)?.parenthesized();
            stmt.push(" as ").push(&g.wrap_value(alias));
            stmt
        }
    })
}

// ==================== JOIN ====================

pub(crate) fn compile_joins(g: &Grammar, q: &Query) -> GrammarResult<Statement> {
    let mut parts = Vec::with_capacity(q.joins.len());
    for join in &q.joins {
        let mut stmt = Statement::raw(format!(
            "{} join {}",
            join.kind.as_str(),
            g.wrap_table(&join.table)
        ));
        if !join.conditions.is_empty() {
            stmt.push(" on ");
            stmt.push_statement(compile_chain(g, &join.conditions, false)?);
        }
        parts.push(stmt);
    }
    Ok(Statement::join(parts, " "))
}

// ==================== WHERE / HAVING ====================

pub(crate) fn compile_wheres(g: &Grammar, q: &Query) -> GrammarResult<Statement> {
    prefixed(g, "where ", &q.wheres)
}

pub(crate) fn compile_havings(g: &Grammar, q: &Query) -> GrammarResult<Statement> {
    prefixed(g, "having ", &q.havings)
}

fn prefixed(g: &Grammar, keyword: &str, predicates: &[Predicate]) -> GrammarResult<Statement> {
    if predicates.is_empty() {
        return Ok(Statement::new());
    }
    let mut stmt = Statement::raw(keyword);
    stmt.push_statement(compile_chain(g, predicates, false)?);
    Ok(stmt)
}

/// Render predicates as `a and b or c`.
///
/// With `keep_leading` the first predicate keeps its connector too, for
/// chains that are appended after an existing condition.
pub(crate) fn compile_chain<'a>(
    g: &Grammar,
    predicates: impl IntoIterator<Item = &'a Predicate>,
    keep_leading: bool,
) -> GrammarResult<Statement> {
    let mut out = Statement::new();
    for (i, predicate) in predicates.into_iter().enumerate() {
        let fragment = compile_predicate(g, predicate)?;
        if i > 0 {
            out.push(" ");
        }
        if i > 0 || keep_leading {
            out.push(predicate.boolean.as_str()).push(" ");
        }
        out.push_statement(fragment);
    }
    Ok(out)
}

pub(crate) fn compile_predicate(g: &Grammar, predicate: &Predicate) -> GrammarResult<Statement> {
    match &predicate.kind {
        PredicateKind::Basic {
            column,
            operator,
            operand,
        } => {
            let op = g.check_operator(operator)?;
            let mut stmt = Statement::raw(format!("{} {} ", g.wrap(column), op));
            stmt.push_statement(compile_operand(g, operand)?);
            Ok(stmt)
        }
        PredicateKind::Column {
            first,
            operator,
            second,
        } => {
            let op = g.check_operator(operator)?;
            Ok(Statement::raw(format!(
                "{} {} {}",
                g.wrap(first),
                op,
                g.wrap(second)
            )))
        }
        PredicateKind::Between {
            column,
            low,
            high,
            negated,
        } => {
            let mut stmt = Statement::raw(format!("{} {}between ", g.wrap(column), not(*negated)));
            stmt.push_bind(low.clone()).push(" and ").push_bind(high.clone());
            Ok(stmt)
        }
        PredicateKind::In {
            column,
            values,
            negated,
        } => {
            if values.is_empty() {
                return Ok(Statement::raw(if *negated { "1 = 1" } else { "0 = 1" }));
            }
            let mut stmt = Statement::raw(format!("{} {}in (", g.wrap(column), not(*negated)));
            stmt.push_bind_list(values.iter().cloned()).push(")");
            Ok(stmt)
        }
        PredicateKind::InSub {
            column,
            query,
            negated,
        } => {
            let mut stmt = Statement::raw(format!("{} {}in ", g.wrap(column), not(*negated)));
            stmt.push_statement(g.select_statement(query)?.parenthesized());
            Ok(stmt)
        }
        PredicateKind::Null { column, negated } => Ok(Statement::raw(format!(
            "{} is {}null",
            g.wrap(column),
            not(*negated)
        ))),
        PredicateKind::Exists { query, negated } => {
            let mut stmt = Statement::raw(format!("{}exists ", not(*negated)));
            stmt.push_statement(g.select_statement(query)?.parenthesized());
            Ok(stmt)
        }
        PredicateKind::Date {
            part,
            column,
            operator,
            value,
        } => {
            let op = g.check_operator(operator)?;
            let mut stmt = Statement::raw(format!("{} {} ", g.date_part(*part, column), op));
            stmt.push_bind(value.clone());
            Ok(stmt)
        }
        PredicateKind::Nested(predicates) => Ok(compile_chain(g, predicates, false)?.parenthesized()),
        PredicateKind::Raw(raw) => Ok(raw.to_statement()),
        PredicateKind::RawCompare {
            raw,
            operator,
            operand,
        } => {
            let op = g.check_operator(operator)?;
            let mut stmt = raw.to_statement().parenthesized();
            stmt.push(" ").push(op).push(" ");
            stmt.push_statement(compile_operand(g, operand)?);
            Ok(stmt)
        }
    }
}

fn compile_operand(g: &Grammar, operand: &Operand) -> GrammarResult<Statement> {
    Ok(match operand {
        Operand::Value(value) => {
            let mut stmt = Statement::new();
            stmt.push_bind(value.clone());
            stmt
        }
        Operand::Raw(raw) => raw.to_statement(),
        Operand::Query(query) => g.select_statement(query)?.parenthesized(),
    })
}

fn not(negated: bool) -> &'static str {
    if negated { "not " } else { "" }
}

/// `day("created_at")`
pub(crate) fn compile_date_part(g: &Grammar, part: DatePart, column: &str) -> String {
    format!("{}({})", part.as_str(), g.wrap(column))
}

// ==================== GROUP / ORDER ====================

pub(crate) fn compile_groups(g: &Grammar, q: &Query) -> GrammarResult<Statement> {
    if q.groups.is_empty() {
        return Ok(Statement::new());
    }
    let mut stmt = Statement::raw("group by ");
    stmt.push_statement(column_list(g, &q.groups)?);
    Ok(stmt)
}

pub(crate) fn compile_orders(g: &Grammar, q: &Query) -> GrammarResult<Statement> {
    if q.orders.is_empty() {
        return Ok(Statement::new());
    }
    let parts = q.orders.iter().map(|order| match order {
        Order::Column { column, direction } => {
            Statement::raw(format!("{} {}", g.wrap(column), direction.as_str()))
        }
        Order::Raw(raw) => raw.to_statement(),
    });
    let mut stmt = Statement::raw("order by ");
    stmt.push_statement(Statement::join(parts, ", "));
    Ok(stmt)
}

// ==================== LIMIT / OFFSET ====================

pub(crate) fn compile_limit(_g: &Grammar, q: &Query) -> GrammarResult<Statement> {
    Ok(match q.limit {
        Some(limit) => Statement::raw(format!("limit {limit}")),
        None => Statement::new(),
    })
}

pub(crate) fn compile_offset(_g: &Grammar, q: &Query) -> GrammarResult<Statement> {
    Ok(match q.offset {
        Some(offset) => Statement::raw(format!("offset {offset}")),
        None => Statement::new(),
    })
}

// ==================== LOCK / UNION ====================

/// Only literal lock text is emitted; the baseline has no row-lock syntax.
pub(crate) fn compile_lock(_g: &Grammar, q: &Query) -> GrammarResult<Statement> {
    Ok(match &q.lock {
        Some(Lock::Raw(sql)) => Statement::raw(sql.clone()),
        _ => Statement::new(),
    })
}

/// Union members, each prefixed with `union` or `union all`.
///
/// With deferred ordering the outer statement owns the only tail, so a member
/// carrying its own order, limit, offset or lock is rejected.
pub(crate) fn compile_unions(g: &Grammar, q: &Query) -> GrammarResult<Statement> {
    let parenthesize = g.union_ordering() == UnionOrdering::PerMember;
    let mut parts = Vec::with_capacity(q.unions.len());
    for union in &q.unions {
        if !parenthesize && has_tail(&union.query) {
            return Err(GrammarError::unsupported(
                g.dialect(),
                "union member with its own order, limit, offset or lock",
            ));
        }
        let mut stmt = Statement::raw(if union.all { "union all" } else { "union" });
        let member = g.select_statement(&union.query)?;
        stmt.append(if parenthesize {
            member.parenthesized()
        } else {
            member
        });
        parts.push(stmt);
    }
    Ok(Statement::join(parts, " "))
}

fn has_tail(q: &Query) -> bool {
    !q.orders.is_empty() || q.limit.is_some() || q.offset.is_some() || q.lock.is_some()
}

/// Compile the listed clauses of `q` in order.
pub(crate) fn compile_components(
    g: &Grammar,
    q: &Query,
    clauses: &[Clause],
) -> GrammarResult<Statement> {
    let mut stmt = Statement::new();
    for clause in clauses {
        stmt.append(g.compile_clause(*clause, q)?);
    }
    Ok(stmt)
}

