//! URL locations: a normalized path plus a query map

use std::collections::BTreeMap;
use std::fmt;

use url::form_urlencoded;

/// Query parameters; one value per key
pub type Query = BTreeMap<String, String>;

/// Route parameters extracted from `:name` segments
pub type Params = BTreeMap<String, String>;

/// A client-side location
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub path: String,
    pub query: Query,
}

impl Default for Location {
    fn default() -> Self {
        Self::new("/")
    }
}

impl Location {
    pub fn new(path: &str) -> Self {
        Self {
            path: normalize_path(path),
            query: Query::new(),
        }
    }

    /// Parse `/path?key=value#fragment`; the fragment is dropped.
    /// Repeated query keys keep the last value.
    pub fn parse(input: &str) -> Self {
        let without_fragment = input.split('#').next().unwrap_or_default();
        let (path, query) = match without_fragment.split_once('?') {
            Some((path, query)) => (path, parse_query(query)),
            None => (without_fragment, Query::new()),
        };
        Self {
            path: normalize_path(path),
            query,
        }
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    /// A query value, treating empty strings as absent
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)?;
        if !self.query.is_empty() {
            write!(f, "?{}", format_query(&self.query))?;
        }
        Ok(())
    }
}

pub fn parse_query(query: &str) -> Query {
    form_urlencoded::parse(query.as_bytes())
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

pub fn format_query(query: &Query) -> String {
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(query.iter())
        .finish()
}

/// Leading slash, no empty segments, no trailing slash (except the root)
pub fn normalize_path(path: &str) -> String {
    let segments = split_segments(path);
    if segments.is_empty() {
        return "/".to_string();
    }
    format!("/{}", segments.join("/"))
}

pub fn split_segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}
