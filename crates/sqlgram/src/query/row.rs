use crate::raw::Raw;
use crate::value::Value;

/// The value assigned to one column of an insert or update.
#[derive(Debug, Clone, PartialEq)]
pub enum SetField {
    /// Bound as `?`
    Value(Value),
    /// Inlined verbatim
    Raw(Raw),
}

/// Ordered column assignments for insert and update statements.
///
/// Column order is preserved, and it is the order placeholders and bindings
/// appear in the compiled statement.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    fields: Vec<(String, SetField)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign a bound value.
    pub fn set(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.fields.push((column.to_string(), SetField::Value(value.into())));
        self
    }

    /// Assign a raw SQL expression.
    pub fn set_raw(mut self, column: &str, expr: impl Into<Raw>) -> Self {
        self.fields.push((column.to_string(), SetField::Raw(expr.into())));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(c, _)| c.as_str())
    }

    pub fn fields(&self) -> &[(String, SetField)] {
        &self.fields
    }

    /// True when both rows assign the same columns in the same order.
    pub(crate) fn same_columns(&self, other: &Row) -> bool {
        self.columns().eq(other.columns())
    }
}

impl<K, V> FromIterator<(K, V)> for Row
where
    K: AsRef<str>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Row::new(), |row, (k, v)| row.set(k.as_ref(), v))
    }
}
