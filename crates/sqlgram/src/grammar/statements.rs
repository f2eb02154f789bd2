//! Baseline statement assemblers.

use super::clauses::{compile_chain, compile_components};
use super::{Clause, Grammar, InsertId, UnionOrdering};
use crate::error::{GrammarError, GrammarResult};
use crate::query::{Query, Row, SetField, Source};
use crate::statement::Statement;

/// Clauses of a select body, before ordering and paging.
pub(crate) const SELECT_BODY: [Clause; 6] = [
    Clause::Columns,
    Clause::From,
    Clause::Joins,
    Clause::Wheres,
    Clause::Groups,
    Clause::Havings,
];

const SELECT_TAIL: [Clause; 4] = [Clause::Orders, Clause::Limit, Clause::Offset, Clause::Lock];

// ==================== SELECT ====================

pub(crate) fn compile_select(g: &Grammar, q: &Query) -> GrammarResult<Statement> {
    let mut stmt = compile_components(g, q, &SELECT_BODY)?;
    if q.unions.is_empty() {
        stmt.append(compile_components(g, q, &SELECT_TAIL)?);
        return Ok(stmt);
    }

    match g.union_ordering() {
        UnionOrdering::Deferred => {
            stmt.append(g.compile_clause(Clause::Unions, q)?);
            stmt.append(compile_components(g, q, &SELECT_TAIL)?);
        }
        UnionOrdering::PerMember => {
            stmt.append(compile_components(g, q, &SELECT_TAIL)?);
            stmt = stmt.parenthesized();
            stmt.append(g.compile_clause(Clause::Unions, q)?);
        }
    }
    Ok(stmt)
}

/// `select exists(<select>) as "exists"`
pub(crate) fn compile_exists(g: &Grammar, q: &Query) -> GrammarResult<Statement> {
    let mut stmt = Statement::raw("select exists");
    stmt.push_statement(g.select_statement(q)?.parenthesized());
    stmt.push(" as ").push(&g.wrap_value("exists"));
    Ok(stmt)
}

// ==================== INSERT ====================

/// `insert into t (a, b) values (?, ?), (?, ?)`
pub(crate) fn compile_insert(g: &Grammar, q: &Query, rows: &[Row]) -> GrammarResult<Statement> {
    let table = target_table(g, q, "insert")?;
    let first = check_rows(rows)?;

    let mut stmt = Statement::raw(format!(
        "insert into {} ({}) values ",
        table,
        columnize(g, first)
    ));
    let tuples = rows.iter().map(|row| value_tuple(row).parenthesized());
    stmt.push_statement(Statement::join(tuples, ", "));
    Ok(stmt)
}

/// Insert a single row and expose its generated key.
pub(crate) fn compile_insert_get_id(
    g: &Grammar,
    q: &Query,
    row: &Row,
    sequence: Option<&str>,
) -> GrammarResult<Statement> {
    let mut stmt = g.insert_fn()(g, q, std::slice::from_ref(row))?;
    if g.insert_id_strategy() == InsertId::Returning {
        stmt.push(" returning ").push(&g.wrap(sequence.unwrap_or("id")));
    }
    Ok(stmt)
}

/// The first row, after checking every row assigns the same columns.
pub(crate) fn check_rows(rows: &[Row]) -> GrammarResult<&Row> {
    let first = rows
        .first()
        .filter(|row| !row.is_empty())
        .ok_or_else(|| GrammarError::invalid_argument("insert requires at least one column value"))?;
    if let Some(pos) = rows.iter().position(|row| !row.same_columns(first)) {
        return Err(GrammarError::invalid_argument(format!(
            "insert row {pos} does not match the columns of the first row"
        )));
    }
    Ok(first)
}

pub(crate) fn columnize(g: &Grammar, row: &Row) -> String {
    g.wrapper().columnize(&row.columns().collect::<Vec<_>>())
}

/// `?, ?, raw` for one row, without parentheses.
fn value_tuple(row: &Row) -> Statement {
    Statement::join(row.fields().iter().map(|(_, f)| set_value(f)), ", ")
}

pub(crate) fn set_value(field: &SetField) -> Statement {
    match field {
        SetField::Value(value) => {
            let mut stmt = Statement::new();
            stmt.push_bind(value.clone());
            stmt
        }
        SetField::Raw(raw) => raw.to_statement(),
    }
}

// ==================== UPDATE ====================

/// `update t [joins] set a = ? [where]`
pub(crate) fn compile_update(g: &Grammar, q: &Query, row: &Row) -> GrammarResult<Statement> {
    let mut stmt = Statement::raw(format!("update {}", target_table(g, q, "update")?));
    stmt.append(g.compile_clause(Clause::Joins, q)?);
    stmt.append(set_clause(g, row)?);
    stmt.append(g.compile_clause(Clause::Wheres, q)?);
    Ok(stmt)
}

/// `update t set a = ? from j1, j2 where ...`, with join predicates folded
/// into the where clause.
pub(crate) fn compile_update_from(g: &Grammar, q: &Query, row: &Row) -> GrammarResult<Statement> {
    let mut stmt = Statement::raw(format!("update {}", target_table(g, q, "update")?));
    stmt.append(set_clause(g, row)?);
    stmt.append(join_tables(g, q, "from"));
    stmt.append(folded_wheres(g, q)?);
    Ok(stmt)
}

pub(crate) fn set_clause(g: &Grammar, row: &Row) -> GrammarResult<Statement> {
    if row.is_empty() {
        return Err(GrammarError::invalid_argument(
            "update requires at least one column value",
        ));
    }
    let assignments = row.fields().iter().map(|(column, field)| {
        let mut stmt = Statement::raw(format!("{} = ", g.wrap(column)));
        stmt.push_statement(set_value(field));
        stmt
    });
    let mut stmt = Statement::raw("set ");
    stmt.push_statement(Statement::join(assignments, ", "));
    Ok(stmt)
}

/// `<keyword> j1, j2` listing every join target.
fn join_tables(g: &Grammar, q: &Query, keyword: &str) -> Statement {
    if q.joins.is_empty() {
        return Statement::new();
    }
    let tables = q
        .joins
        .iter()
        .map(|j| g.wrap_table(&j.table))
        .collect::<Vec<_>>()
        .join(", ");
    Statement::raw(format!("{keyword} {tables}"))
}

/// The where clause followed by every join predicate, connectors kept.
///
/// Without a base where clause the join predicates start the clause and the
/// first connector is dropped.
fn folded_wheres(g: &Grammar, q: &Query) -> GrammarResult<Statement> {
    let base = g.compile_clause(Clause::Wheres, q)?;
    let join_predicates = || q.joins.iter().flat_map(|j| j.conditions.iter());
    if join_predicates().next().is_none() {
        return Ok(base);
    }

    if base.is_empty() {
        let mut stmt = Statement::raw("where ");
        stmt.push_statement(compile_chain(g, join_predicates(), false)?);
        Ok(stmt)
    } else {
        Ok(base.concat(compile_chain(g, join_predicates(), true)?))
    }
}

// ==================== DELETE ====================

/// `delete from t [joins] [where]`
pub(crate) fn compile_delete(g: &Grammar, q: &Query) -> GrammarResult<Statement> {
    let mut stmt = Statement::raw(format!("delete from {}", target_table(g, q, "delete")?));
    stmt.append(g.compile_clause(Clause::Joins, q)?);
    stmt.append(g.compile_clause(Clause::Wheres, q)?);
    Ok(stmt)
}

/// `delete t from t <joins> [where]` when joins are present.
pub(crate) fn compile_delete_qualified(g: &Grammar, q: &Query) -> GrammarResult<Statement> {
    if q.joins.is_empty() {
        return compile_delete(g, q);
    }
    let table = target_table(g, q, "delete")?;
    let mut stmt = Statement::raw(format!("delete {table} from {table}"));
    stmt.append(g.compile_clause(Clause::Joins, q)?);
    stmt.append(g.compile_clause(Clause::Wheres, q)?);
    Ok(stmt)
}

/// `delete from t using j1, j2 where ...`, join predicates folded like
/// [`compile_update_from`].
pub(crate) fn compile_delete_using(g: &Grammar, q: &Query) -> GrammarResult<Statement> {
    let mut stmt = Statement::raw(format!("delete from {}", target_table(g, q, "delete")?));
    stmt.append(join_tables(g, q, "using"));
    stmt.append(folded_wheres(g, q)?);
    Ok(stmt)
}

// ==================== TRUNCATE ====================

pub(crate) fn compile_truncate(g: &Grammar, q: &Query) -> GrammarResult<Vec<Statement>> {
    Ok(vec![Statement::raw(format!(
        "truncate {}",
        target_table(g, q, "truncate")?
    ))])
}

/// The wrapped target table of a write statement.
pub(crate) fn target_table(g: &Grammar, q: &Query, statement: &str) -> GrammarResult<String> {
    match &q.source {
        Some(Source::Table(name)) => Ok(g.wrap_table(name)),
        _ => Err(GrammarError::invalid_argument(format!(
            "{statement} requires a table source"
        ))),
    }
}
