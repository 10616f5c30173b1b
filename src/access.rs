//! Defensive traversal of loosely-typed NBA API JSON.
//!
//! Every lookup resolves to `Option<&Value>`: `None` means the path could not be
//! followed, the value was `null`, or the final value was an empty string.
//! Conversion to the `"N/A"` display sentinel happens only in [`text`].

use serde_json::Value;

pub const NOT_AVAILABLE: &str = "N/A";

/// One step of a traversal path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step<'a> {
    Key(&'a str),
    Index(i64),
}

impl<'a> From<&'a str> for Step<'a> {
    fn from(key: &'a str) -> Self {
        Step::Key(key)
    }
}

impl<'a> From<&'a String> for Step<'a> {
    fn from(key: &'a String) -> Self {
        Step::Key(key.as_str())
    }
}

impl From<i64> for Step<'_> {
    fn from(index: i64) -> Self {
        Step::Index(index)
    }
}

impl From<i32> for Step<'_> {
    fn from(index: i32) -> Self {
        Step::Index(i64::from(index))
    }
}

impl From<usize> for Step<'_> {
    fn from(index: usize) -> Self {
        Step::Index(i64::try_from(index).unwrap_or(i64::MAX))
    }
}

/// Builds a path from mixed keys and indices and runs [`lookup`] on it.
///
/// `at!(&data, "resultSets", 0, "rowSet")`
macro_rules! at {
    ($root:expr $(, $step:expr)* $(,)?) => {
        $crate::access::lookup($root, &[$($crate::access::Step::from($step)),*])
    };
}
pub(crate) use at;

pub fn lookup<'v>(root: &'v Value, path: &[Step<'_>]) -> Option<&'v Value> {
    let mut current = root;
    for step in path {
        current = match (current, *step) {
            (Value::Object(map), Step::Key(key)) => map.get(key)?,
            (Value::Array(items), Step::Index(index)) => {
                let index = usize::try_from(index).ok()?;
                items.get(index)?
            }
            _ => return None,
        };
    }
    match current {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        found => Some(found),
    }
}

/// [`lookup`] with a caller-supplied fallback in place of a miss.
pub fn access<'v>(root: &'v Value, path: &[Step<'_>], default: &'v Value) -> &'v Value {
    lookup(root, path).unwrap_or(default)
}

/// Renders a value for display: strings unquoted, everything else in its JSON form.
pub fn display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => NOT_AVAILABLE.to_owned(),
        other => other.to_string(),
    }
}

/// Elements of an array value; empty for a miss or any non-array value.
pub fn items(value: Option<&Value>) -> &[Value] {
    value
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

pub fn text(value: Option<&Value>) -> String {
    text_or(value, NOT_AVAILABLE)
}

pub fn text_or(value: Option<&Value>, default: &str) -> String {
    value.map_or_else(|| default.to_owned(), display)
}

/// A `resultSets` table from stats.nba.com.
pub struct ResultSet<'v> {
    headers: &'v [Value],
    rows: &'v [Value],
}

impl<'v> ResultSet<'v> {
    pub fn at(data: &'v Value, index: usize) -> Self {
        Self::from_set(at!(data, "resultSets", index))
    }

    pub fn named(data: &'v Value, name: &str) -> Option<Self> {
        at!(data, "resultSets")?
            .as_array()?
            .iter()
            .find(|set| at!(set, "name").and_then(Value::as_str) == Some(name))
            .map(|set| Self::from_set(Some(set)))
    }

    fn from_set(set: Option<&'v Value>) -> Self {
        Self {
            headers: items(set.and_then(|s| at!(s, "headers"))),
            rows: items(set.and_then(|s| at!(s, "rowSet"))),
        }
    }

    pub fn rows(&self) -> &'v [Value] {
        self.rows
    }

    pub fn has_headers(&self) -> bool {
        !self.headers.is_empty()
    }

    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h.as_str() == Some(name))
    }

    /// Header position for `name`, or the documented fixed offset when the
    /// response carries no usable header row.
    pub fn column_or(&self, name: &str, fallback: usize) -> usize {
        self.column(name).unwrap_or(fallback)
    }
}
