// src/query.rs

// raw, already-decoded query string parameters

// dependencies
use crate::validator::ValidationErrors;
use std::collections::HashMap;

/// Decoded query-string key/value pairs as handed over by the HTTP layer.
///
/// When a key repeats, the first value wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    values: HashMap<String, String>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut values = HashMap::new();
        for (key, value) in pairs {
            values.entry(key.into()).or_insert_with(|| value.into());
        }
        Self { values }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// The value for `key`, or `default` when absent or empty.
    pub fn string(&self, key: &str, default: &str) -> String {
        match self.get(key) {
            Some(value) if !value.is_empty() => value.to_owned(),
            _ => default.to_owned(),
        }
    }

    /// The integer value for `key`, or `default` when absent or empty.
    ///
    /// A value that is present but not an integer is recorded in `errors`
    /// against `key` and `default` is returned in its place.
    pub fn integer(&self, key: &str, default: i64, errors: &mut ValidationErrors) -> i64 {
        match self.get(key) {
            Some(value) if !value.is_empty() => match value.parse::<i64>() {
                Ok(parsed) => parsed,
                Err(_) => {
                    errors.add(key, "must be an integer value");
                    default
                }
            },
            _ => default,
        }
    }
}

impl<K, V> FromIterator<(K, V)> for QueryParams
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from_pairs(iter)
    }
}
