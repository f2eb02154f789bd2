//! Identifier quoting.
//!
//! Table and column names never reach the SQL text unquoted. A name is split
//! on `.` into segments and each segment is quoted on its own, so
//! `users.id` becomes `"users"."id"`. The `expr as alias` form wraps the left
//! side recursively and the alias as a single identifier. `*` is left bare.

/// Identifier quote characters for a dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quote {
    pub open: char,
    pub close: char,
}

impl Quote {
    /// ANSI double quotes.
    pub const DOUBLE: Quote = Quote {
        open: '"',
        close: '"',
    };
    /// MySQL backticks.
    pub const BACKTICK: Quote = Quote {
        open: '`',
        close: '`',
    };
    /// SQL Server square brackets.
    pub const BRACKET: Quote = Quote {
        open: '[',
        close: ']',
    };

    /// Quote a single identifier segment, doubling any embedded close char.
    pub fn quote(&self, segment: &str) -> String {
        if segment == "*" {
            return segment.to_string();
        }
        let mut out = String::with_capacity(segment.len() + 2);
        out.push(self.open);
        for c in segment.chars() {
            if c == self.close {
                out.push(c);
            }
            out.push(c);
        }
        out.push(self.close);
        out
    }
}

/// Identifier wrapper bound to a quote style and a table prefix.
#[derive(Debug, Clone, Copy)]
pub struct Wrapper<'a> {
    quote: Quote,
    prefix: &'a str,
}

impl<'a> Wrapper<'a> {
    pub fn new(quote: Quote, prefix: &'a str) -> Self {
        Self { quote, prefix }
    }

    /// Wrap a column reference. In a qualified name the first segment is a
    /// table and receives the prefix.
    pub fn wrap(&self, name: &str) -> String {
        self.wrap_name(name, false)
    }

    /// Wrap a table reference, prefixing the table segment.
    pub fn wrap_table(&self, name: &str) -> String {
        self.wrap_name(name, true)
    }

    /// Quote a single identifier without splitting on `.`.
    pub fn wrap_value(&self, segment: &str) -> String {
        self.quote.quote(segment)
    }

    /// Wrap and comma-join a list of column names.
    pub fn columnize<S: AsRef<str>>(&self, columns: &[S]) -> String {
        columns
            .iter()
            .map(|c| self.wrap(c.as_ref()))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn wrap_name(&self, name: &str, is_table: bool) -> String {
        if let Some((expr, alias)) = split_alias(name) {
            return format!(
                "{} as {}",
                self.wrap_name(expr, is_table),
                self.wrap_value(alias)
            );
        }

        let segments: Vec<&str> = name.split('.').collect();
        let qualified = segments.len() > 1;
        segments
            .iter()
            .enumerate()
            .map(|(i, segment)| {
                let names_table = i == 0 && (qualified || is_table);
                if names_table && *segment != "*" && !self.prefix.is_empty() {
                    self.wrap_value(&format!("{}{}", self.prefix, segment))
                } else {
                    self.wrap_value(segment)
                }
            })
            .collect::<Vec<_>>()
            .join(".")
    }
}

/// Split `expr as alias` (case-insensitive keyword) at its first occurrence.
fn split_alias(name: &str) -> Option<(&str, &str)> {
    let lower = name.to_ascii_lowercase();
    let pos = lower.find(" as ")?;
    let expr = name[..pos].trim();
    let alias = name[pos + 4..].trim();
    if expr.is_empty() || alias.is_empty() {
        return None;
    }
    Some((expr, alias))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ansi() -> Wrapper<'static> {
        Wrapper::new(Quote::DOUBLE, "")
    }

    #[test]
    fn wraps_qualified_names() {
        assert_eq!(ansi().wrap("users.id"), r#""users"."id""#);
        assert_eq!(ansi().wrap_table("public.users"), r#""public"."users""#);
        assert_eq!(ansi().wrap("users.*"), r#""users".*"#);
        assert_eq!(ansi().wrap("*"), "*");
    }

    #[test]
    fn doubles_embedded_quotes() {
        assert_eq!(ansi().wrap_table("some\"table"), r#""some""table""#);
        assert_eq!(
            Wrapper::new(Quote::BACKTICK, "").wrap_table("some`table"),
            "`some``table`"
        );
        assert_eq!(
            Wrapper::new(Quote::BRACKET, "").wrap_table("odd]name"),
            "[odd]]name]"
        );
    }

    #[test]
    fn alias_wraps_right_side_whole() {
        assert_eq!(ansi().wrap("x.y as foo.bar"), r#""x"."y" as "foo.bar""#);
        assert_eq!(ansi().wrap("email AS e"), r#""email" as "e""#);
    }

    #[test]
    fn prefix_applies_to_tables_only() {
        let w = Wrapper::new(Quote::DOUBLE, "prefix_");
        assert_eq!(w.wrap_table("users"), r#""prefix_users""#);
        assert_eq!(w.wrap("users.id"), r#""prefix_users"."id""#);
        assert_eq!(w.wrap("email"), r#""email""#);
        assert_eq!(w.wrap_table("users as u"), r#""prefix_users" as "u""#);
    }

    #[test]
    fn columnize_joins_with_commas() {
        assert_eq!(ansi().columnize(&["foo", "bar"]), r#""foo", "bar""#);
    }
}
