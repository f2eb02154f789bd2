//! MySQL: backtick quoting, parenthesized union members, tail row locks,
//! ordered and limited writes, and `delete t from t join ...`.

use super::clauses::compile_components;
use super::statements::{self, compile_delete_qualified};
use super::{Clause, DialectSpec, Grammar, InsertId, Overrides, UnionOrdering};
use crate::error::GrammarResult;
use crate::ident::Quote;
use crate::query::{Lock, Query, Row};
use crate::statement::Statement;

pub(super) static SPEC: DialectSpec = DialectSpec {
    quote: Quote::BACKTICK,
    operators: &[
        "=", "<", ">", "<=", ">=", "<>", "!=", "like", "not like", "between", "ilike", "&", "|",
        "^", "<<", ">>", "rlike", "regexp", "not regexp",
    ],
    union_ordering: UnionOrdering::PerMember,
    insert_id: InsertId::LastInsertId,
    overrides: Overrides {
        lock: Some(compile_lock),
        update: Some(compile_update),
        delete: Some(compile_delete),
        ..Overrides::NONE
    },
};

fn compile_lock(_g: &Grammar, q: &Query) -> GrammarResult<Statement> {
    Ok(match &q.lock {
        None => Statement::new(),
        Some(Lock::Exclusive) => Statement::raw("for update"),
        Some(Lock::Shared) => Statement::raw("lock in share mode"),
        Some(Lock::Raw(sql)) => Statement::raw(sql.clone()),
    })
}

/// Baseline update followed by `order by` and `limit`.
fn compile_update(g: &Grammar, q: &Query, row: &Row) -> GrammarResult<Statement> {
    let stmt = statements::compile_update(g, q, row)?;
    Ok(stmt.concat(compile_components(g, q, &[Clause::Orders, Clause::Limit])?))
}

/// Joined deletes name their target; plain deletes accept `order by` and
/// `limit`.
fn compile_delete(g: &Grammar, q: &Query) -> GrammarResult<Statement> {
    if !q.joins.is_empty() {
        return compile_delete_qualified(g, q);
    }
    let stmt = statements::compile_delete(g, q)?;
    Ok(stmt.concat(compile_components(g, q, &[Clause::Orders, Clause::Limit])?))
}
