use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// A raw cell of a table row: either a number (continuous column) or a string (discrete column).
///
/// Values are totally ordered (all numbers before all strings, numbers by [`f64::total_cmp`]),
/// which is what allows rows to be deduplicated and distinct column values to be sorted.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Value {
    Number(f64),
    Text(String),
}
impl Value {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(v) => Some(*v),
            Value::Text(_) => None,
        }
    }
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Number(_) => None,
            Value::Text(s) => Some(s),
        }
    }
}
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}
impl Eq for Value {}
impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a.total_cmp(b),
            (Value::Text(a), Value::Text(b)) => a.cmp(b),
            (Value::Number(_), Value::Text(_)) => Ordering::Less,
            (Value::Text(_), Value::Number(_)) => Ordering::Greater,
        }
    }
}
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(v) => write!(f, "{}", v),
            Value::Text(s) => f.write_str(s),
        }
    }
}
impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Number(v)
    }
}
impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_owned())
    }
}
impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

/// One table row, as an ordered sequence of raw values aligned with the table's columns.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Example {
    values: Vec<Value>,
}
impl Example {
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }
    pub fn len(&self) -> usize {
        self.values.len()
    }
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
    pub fn get(&self, i: usize) -> Option<&Value> {
        self.values.get(i)
    }
    pub fn values(&self) -> &[Value] {
        &self.values
    }
}
impl<V: Into<Value>> FromIterator<V> for Example {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(Into::into).collect())
    }
}
impl fmt::Display for Example {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for v in &self.values {
            write!(f, "{} ", v)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_sort_before_text() {
        let mut values = vec![Value::from("b"), Value::from(2.0), Value::from("a"), Value::from(-1.0)];
        values.sort();
        assert_eq!(values, vec![Value::from(-1.0), Value::from(2.0), Value::from("a"), Value::from("b")]);
    }

    #[test]
    fn example_display_is_space_separated() {
        let example: Example = vec![Value::from("sunny"), Value::from(30.5)].into_iter().collect();
        assert_eq!(example.to_string(), "sunny 30.5 ");
    }
}
