//! # sqlgram
//!
//! Compile a dialect-agnostic query model into parameterized SQL.
//!
//! ## Features
//!
//! - **One model, many dialects**: the same [`Query`] compiles for a generic
//!   ANSI baseline, MySQL, PostgreSQL, SQLite and SQL Server
//! - **Values never inlined**: every value becomes a `?` placeholder, with
//!   bindings kept in placeholder order
//! - **Identifiers always quoted**: per-dialect quoting and escaping, with an
//!   optional table prefix
//! - **Dialect-aware writes**: joined updates and deletes, multi-row inserts,
//!   generated keys and truncation, each in the dialect's own syntax
//!
//! ## Usage
//!
//! ```ignore
//! use sqlgram::{table, Dialect, Filter, Grammar, Row};
//!
//! let grammar = Grammar::new(Dialect::MySql);
//!
//! // SELECT
//! let stmt = grammar.compile_select(
//!     &table("users")
//!         .select(&["id", "email"])
//!         .eq("status", "active")
//!         .order_by_desc("created_at")
//!         .limit(10),
//! )?;
//! assert_eq!(
//!     stmt.sql(),
//!     "select `id`, `email` from `users` where `status` = ? order by `created_at` desc limit 10"
//! );
//!
//! // UPDATE
//! let stmt = grammar.compile_update(
//!     &table("users").eq("id", 1),
//!     &Row::new().set("status", "inactive"),
//! )?;
//! ```

pub mod error;
pub mod grammar;
pub mod ident;
pub mod query;
pub mod raw;
pub mod statement;
pub mod value;

pub use error::{GrammarError, GrammarResult};
pub use grammar::{
    Clause, Dialect, Grammar, GrammarConfig, InsertId, StatementKind, UnionOrdering,
};
pub use ident::Quote;
pub use query::{
    table, Aggregate, AggregateFn, Boolean, Column, Conditions, DatePart, Direction, Filter,
    JoinClause, JoinKind, Lock, Operand, Order, Predicate, PredicateKind, Query, Row, SetField,
    Source, Union,
};
pub use raw::{raw, Raw};
pub use statement::Statement;
pub use value::Value;
