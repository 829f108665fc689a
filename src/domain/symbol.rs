//! Token ticker symbol.

use core::borrow::Borrow;
use core::fmt;

use serde::{Deserialize, Serialize};

/// Ticker symbol identifying a token within a pool and within a feed.
///
/// Symbols are the unique key of a pool's token set.  `Symbol` borrows
/// as `str`, so maps keyed by `Symbol` can be queried with `&str`.
///
/// # Examples
///
/// ```
/// use index_backtest::domain::Symbol;
///
/// let s = Symbol::from("WETH");
/// assert_eq!(s.as_str(), "WETH");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(String);

impl Symbol {
    /// Creates a symbol from any string-like value.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the symbol text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Symbol {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for Symbol {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl Borrow<str> for Symbol {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn map_lookup_by_str() {
        let mut m = HashMap::new();
        m.insert(Symbol::from("UNI"), 3u64);
        assert_eq!(m.get("UNI"), Some(&3));
    }

    #[test]
    fn serializes_as_plain_string() {
        let json = serde_json::to_string(&Symbol::from("AAVE")).ok();
        assert_eq!(json.as_deref(), Some("\"AAVE\""));
    }
}
