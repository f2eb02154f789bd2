//! PostgreSQL: `returning` for generated keys, `update ... from` and
//! `delete ... using` for joined writes, and identity-resetting truncate.

use super::statements::{compile_delete_using, compile_update_from, target_table};
use super::{DialectSpec, Grammar, InsertId, Overrides, UnionOrdering};
use crate::error::GrammarResult;
use crate::ident::Quote;
use crate::query::{Lock, Query};
use crate::statement::Statement;

pub(super) static SPEC: DialectSpec = DialectSpec {
    quote: Quote::DOUBLE,
    operators: &[
        "=", "<", ">", "<=", ">=", "<>", "!=", "like", "not like", "between", "ilike", "&", "|",
        "#", "<<", ">>",
    ],
    union_ordering: UnionOrdering::Deferred,
    insert_id: InsertId::Returning,
    overrides: Overrides {
        lock: Some(compile_lock),
        update: Some(compile_update_from),
        delete: Some(compile_delete_using),
        truncate: Some(compile_truncate),
        ..Overrides::NONE
    },
};

fn compile_lock(_g: &Grammar, q: &Query) -> GrammarResult<Statement> {
    Ok(match &q.lock {
        None => Statement::new(),
        Some(Lock::Exclusive) => Statement::raw("for update"),
        Some(Lock::Shared) => Statement::raw("for share"),
        Some(Lock::Raw(sql)) => Statement::raw(sql.clone()),
    })
}

fn compile_truncate(g: &Grammar, q: &Query) -> GrammarResult<Vec<Statement>> {
    Ok(vec![Statement::raw(format!(
        "truncate {} restart identity",
        target_table(g, q, "truncate")?
    ))])
}
