//! Compiled SQL text paired with its positional bindings.

use crate::value::Value;

/// A compiled statement: SQL text with `?` placeholders and the values that
/// fill them, in placeholder order.
#[derive(Debug, Clone, Default, PartialEq)]
#[must_use]
pub struct Statement {
    sql: String,
    bindings: Vec<Value>,
}

impl Statement {
    /// Create an empty statement.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a statement from literal SQL without bindings.
    pub fn raw(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            bindings: Vec::new(),
        }
    }

    /// Create a statement from SQL and the bindings its placeholders consume.
    pub fn with_bindings(sql: impl Into<String>, bindings: Vec<Value>) -> Self {
        Self {
            sql: sql.into(),
            bindings,
        }
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn bindings(&self) -> &[Value] {
        &self.bindings
    }

    pub fn is_empty(&self) -> bool {
        self.sql.is_empty()
    }

    pub fn into_parts(self) -> (String, Vec<Value>) {
        (self.sql, self.bindings)
    }

    /// Append raw SQL directly, without a separating space.
    pub fn push(&mut self, sql: &str) -> &mut Self {
        self.sql.push_str(sql);
        self
    }

    /// Append a `?` placeholder and its value.
    pub fn push_bind(&mut self, value: impl Into<Value>) -> &mut Self {
        self.sql.push('?');
        self.bindings.push(value.into());
        self
    }

    /// Append a comma separated placeholder list for `values`.
    pub fn push_bind_list<I>(&mut self, values: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        for (i, value) in values.into_iter().enumerate() {
            if i > 0 {
                self.sql.push_str(", ");
            }
            self.push_bind(value);
        }
        self
    }

    /// Append another statement's text and bindings directly, without a space.
    pub fn push_statement(&mut self, other: Statement) -> &mut Self {
        self.sql.push_str(&other.sql);
        self.bindings.extend(other.bindings);
        self
    }

    /// Append another statement separated by a single space.
    ///
    /// The space is skipped when either side is empty, so empty clauses can be
    /// appended unconditionally.
    pub fn append(&mut self, other: Statement) -> &mut Self {
        if other.sql.is_empty() {
            self.bindings.extend(other.bindings);
            return self;
        }
        if !self.sql.is_empty() {
            self.sql.push(' ');
        }
        self.push_statement(other)
    }

    /// Consuming form of [`Statement::append`].
    pub fn concat(mut self, other: Statement) -> Self {
        self.append(other);
        self
    }

    /// Join statements with `separator`, skipping empty ones.
    pub fn join<I>(parts: I, separator: &str) -> Statement
    where
        I: IntoIterator<Item = Statement>,
    {
        let mut out = Statement::new();
        for part in parts {
            if part.is_empty() {
                out.bindings.extend(part.bindings);
                continue;
            }
            if !out.sql.is_empty() {
                out.sql.push_str(separator);
            }
            out.push_statement(part);
        }
        out
    }

    /// Wrap the current text in parentheses.
    pub fn parenthesized(self) -> Self {
        Self {
            sql: format!("({})", self.sql),
            bindings: self.bindings,
        }
    }

    /// Number of `?` placeholders outside quoted literals and identifiers.
    pub fn placeholder_count(&self) -> usize {
        let mut count = 0;
        scan_placeholders(&self.sql, |_| count += 1);
        count
    }

    /// Render the SQL with numbered placeholders (`$1, $2, ...` for prefix
    /// `"$"`, `@p1, @p2, ...` for prefix `"@p"`).
    ///
    /// Question marks inside quoted literals or identifiers are left alone.
    pub fn to_numbered_sql(&self, prefix: &str) -> String {
        let mut out = String::with_capacity(self.sql.len() + 8);
        let mut n = 0;
        let mut last = 0;
        scan_placeholders(&self.sql, |pos| {
            n += 1;
            out.push_str(&self.sql[last..pos]);
            out.push_str(prefix);
            out.push_str(&n.to_string());
            last = pos + 1;
        });
        out.push_str(&self.sql[last..]);
        out
    }
}

/// Call `f` with the byte offset of every placeholder outside quotes.
fn scan_placeholders(sql: &str, mut f: impl FnMut(usize)) {
    let mut closing: Option<char> = None;
    for (pos, c) in sql.char_indices() {
        match closing {
            // A doubled quote closes and immediately reopens, which nets out.
            Some(close) if c == close => closing = None,
            Some(_) => {}
            None => match c {
                '\'' | '"' | '`' => closing = Some(c),
                '[' => closing = Some(']'),
                '?' => f(pos),
                _ => {}
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_skips_space_around_empty_sides() {
        let mut stmt = Statement::new();
        stmt.append(Statement::raw("select *"));
        stmt.append(Statement::new());
        stmt.append(Statement::with_bindings("where a = ?", vec![Value::Int(1)]));
        assert_eq!(stmt.sql(), "select * where a = ?");
        assert_eq!(stmt.bindings(), &[Value::Int(1)]);
    }

    #[test]
    fn concat_preserves_binding_order() {
        let a = Statement::with_bindings("a = ?", vec![Value::Int(1)]);
        let b = Statement::with_bindings("b = ?", vec![Value::Int(2)]);
        let c = Statement::with_bindings("c = ?", vec![Value::Int(3)]);

        let left = a.clone().concat(b.clone()).concat(c.clone());
        let right = a.concat(b.concat(c));
        assert_eq!(left, right);
        assert_eq!(left.bindings(), &[Value::Int(1), Value::Int(2), Value::Int(3)]);
    }

    #[test]
    fn join_skips_empty_parts() {
        let joined = Statement::join(
            vec![Statement::raw("a"), Statement::new(), Statement::raw("b")],
            ", ",
        );
        assert_eq!(joined.sql(), "a, b");
    }

    #[test]
    fn bind_list() {
        let mut stmt = Statement::raw("in (");
        stmt.push_bind_list([1, 2, 3]).push(")");
        assert_eq!(stmt.sql(), "in (?, ?, ?)");
        assert_eq!(stmt.bindings().len(), 3);
    }

    #[test]
    fn numbered_placeholders_skip_quoted_text() {
        let stmt = Statement::with_bindings(
            "select '?' as \"a?\", [b?] from t where x = ? and y = ?",
            vec![Value::Int(1), Value::Int(2)],
        );
        assert_eq!(stmt.placeholder_count(), 2);
        assert_eq!(
            stmt.to_numbered_sql("$"),
            "select '?' as \"a?\", [b?] from t where x = $1 and y = $2"
        );
        assert_eq!(
            Statement::raw("a = ? or b = ?").to_numbered_sql("@p"),
            "a = @p1 or b = @p2"
        );
    }
}
