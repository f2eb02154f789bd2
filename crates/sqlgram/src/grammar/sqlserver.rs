//! SQL Server: bracket quoting, `top` instead of `limit`, `row_number()`
//! paging for offsets, and locks expressed as table hints.

use super::clauses::{self, compile_components};
use super::statements::{self, compile_delete_qualified, target_table};
use super::{Clause, DialectSpec, Grammar, InsertId, Overrides, UnionOrdering};
use crate::error::{GrammarError, GrammarResult};
use crate::ident::Quote;
use crate::query::{Lock, Query};
use crate::statement::Statement;

pub(super) static SPEC: DialectSpec = DialectSpec {
    quote: Quote::BRACKET,
    operators: &[
        "=", "<", ">", "<=", ">=", "!<", "!>", "<>", "!=", "like", "not like", "between", "ilike",
        "&", "&=", "|", "|=", "^", "^=",
    ],
    union_ordering: UnionOrdering::Deferred,
    insert_id: InsertId::LastInsertId,
    overrides: Overrides {
        select: Some(compile_select),
        columns: Some(compile_columns),
        from: Some(compile_from),
        limit: Some(compile_empty),
        offset: Some(compile_empty),
        lock: Some(compile_empty),
        delete: Some(compile_delete_qualified),
        truncate: Some(compile_truncate),
        ..Overrides::NONE
    },
};

/// Offsets need a `row_number()` table expression; everything else is the
/// baseline select. A limit becomes `top` on the first member, so it cannot
/// scope a union.
fn compile_select(g: &Grammar, q: &Query) -> GrammarResult<Statement> {
    if !q.unions.is_empty() && q.limit.is_some() && q.aggregate.is_none() {
        return Err(GrammarError::unsupported(g.dialect(), "union with limit"));
    }
    match q.offset {
        Some(offset) if offset > 0 && q.aggregate.is_none() => compile_ansi_offset(g, q, offset),
        _ => statements::compile_select(g, q),
    }
}

/// `select * from (select ..., row_number() over (order by ...) as row_num
/// from ...) as temp_table where row_num <constraint>`
fn compile_ansi_offset(g: &Grammar, q: &Query, offset: u64) -> GrammarResult<Statement> {
    if !q.unions.is_empty() {
        return Err(GrammarError::unsupported(g.dialect(), "union with offset"));
    }

    let mut orders = g.compile_clause(Clause::Orders, q)?;
    if orders.is_empty() {
        orders = Statement::raw("order by (select 0)");
    }

    let mut inner = g.compile_clause(Clause::Columns, q)?;
    inner.push(", row_number() over (");
    inner.push_statement(orders);
    inner.push(") as row_num");
    inner.append(compile_components(
        g,
        q,
        &[
            Clause::From,
            Clause::Joins,
            Clause::Wheres,
            Clause::Groups,
            Clause::Havings,
        ],
    )?);

    let start = offset + 1;
    let constraint = match q.limit {
        Some(limit) => format!("between {} and {}", start, offset + limit),
        None => format!(">= {start}"),
    };

    let mut stmt = Statement::raw("select * from ");
    stmt.push_statement(inner.parenthesized());
    stmt.push(&format!(" as temp_table where row_num {constraint}"));
    Ok(stmt)
}

/// `select top <n>` when limiting without an offset.
fn compile_columns(g: &Grammar, q: &Query) -> GrammarResult<Statement> {
    if let Some(aggregate) = &q.aggregate {
        return Ok(clauses::compile_aggregate(g, q, aggregate));
    }
    let mut stmt = Statement::raw(if q.distinct { "select distinct" } else { "select" });
    if let Some(limit) = q.limit {
        if q.offset.unwrap_or(0) == 0 {
            stmt.push(&format!(" top {limit}"));
        }
    }
    stmt.append(clauses::column_list(g, &q.columns)?);
    Ok(stmt)
}

/// Locks become table hints right after the table reference.
fn compile_from(g: &Grammar, q: &Query) -> GrammarResult<Statement> {
    let mut stmt = clauses::compile_from(g, q)?;
    if stmt.is_empty() {
        return Ok(stmt);
    }
    match &q.lock {
        None => {}
        Some(Lock::Exclusive) => {
            stmt.push(" with(rowlock,updlock,holdlock)");
        }
        Some(Lock::Shared) => {
            stmt.push(" with(rowlock,holdlock)");
        }
        Some(Lock::Raw(sql)) => {
            stmt.push(" ").push(sql);
        }
    }
    Ok(stmt)
}

/// Limit, offset and lock are folded into other clauses.
fn compile_empty(_g: &Grammar, _q: &Query) -> GrammarResult<Statement> {
    Ok(Statement::new())
}

fn compile_truncate(g: &Grammar, q: &Query) -> GrammarResult<Vec<Statement>> {
    Ok(vec![Statement::raw(format!(
        "truncate table {}",
        target_table(g, q, "truncate")?
    ))])
}
