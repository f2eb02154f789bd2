//! SQLite: `strftime` date parts, union-select multi-row inserts,
//! `update ... from` for joined updates, and truncate emulated with deletes.

use super::statements::{self, check_rows, columnize, compile_update_from, set_value, target_table};
use super::{DialectSpec, Grammar, InsertId, Overrides, UnionOrdering};
use crate::error::{GrammarError, GrammarResult};
use crate::ident::Quote;
use crate::query::{DatePart, Query, Row};
use crate::statement::Statement;

pub(super) static SPEC: DialectSpec = DialectSpec {
    quote: Quote::DOUBLE,
    operators: &[
        "=", "<", ">", "<=", ">=", "<>", "!=", "like", "not like", "between", "ilike", "&", "|",
        "<<", ">>",
    ],
    union_ordering: UnionOrdering::Deferred,
    insert_id: InsertId::LastInsertId,
    overrides: Overrides {
        date_part: Some(compile_date_part),
        insert: Some(compile_insert),
        update: Some(compile_update_from),
        delete: Some(compile_delete),
        truncate: Some(compile_truncate),
        ..Overrides::NONE
    },
};

fn compile_date_part(g: &Grammar, part: DatePart, column: &str) -> String {
    let format = match part {
        DatePart::Day => "%d",
        DatePart::Month => "%m",
        DatePart::Year => "%Y",
    };
    format!("strftime('{}', {})", format, g.wrap(column))
}

/// Several rows become `select ? as "a", ? as "b" union select ...`.
fn compile_insert(g: &Grammar, q: &Query, rows: &[Row]) -> GrammarResult<Statement> {
    if rows.len() <= 1 {
        return statements::compile_insert(g, q, rows);
    }
    let table = target_table(g, q, "insert")?;
    let first = check_rows(rows)?;

    let selects = rows.iter().map(|row| {
        let columns = row.fields().iter().map(|(column, field)| {
            let mut stmt = set_value(field);
            stmt.push(" as ").push(&g.wrap(column));
            stmt
        });
        let mut stmt = Statement::raw("select ");
        stmt.push_statement(Statement::join(columns, ", "));
        stmt
    });

    let mut stmt = Statement::raw(format!("insert into {} ({}) ", table, columnize(g, first)));
    stmt.push_statement(Statement::join(selects, " union "));
    Ok(stmt)
}

fn compile_delete(g: &Grammar, q: &Query) -> GrammarResult<Statement> {
    if !q.joins.is_empty() {
        return Err(GrammarError::unsupported(g.dialect(), "delete with joins"));
    }
    statements::compile_delete(g, q)
}

/// Clear the rows, then reset the table's autoincrement counter.
fn compile_truncate(g: &Grammar, q: &Query) -> GrammarResult<Vec<Statement>> {
    let table = target_table(g, q, "truncate")?;
    let name = format!("{}{}", g.table_prefix(), q.table_name().unwrap_or_default());

    let mut reset = Statement::raw("delete from sqlite_sequence where name = ");
    reset.push_bind(name);
    Ok(vec![Statement::raw(format!("delete from {table}")), reset])
}
