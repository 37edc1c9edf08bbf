//! Regular expression filter over tag names.
//!
//! A pattern must match the whole tag, not a substring of it: `\d+\.\d+`
//! keeps `1.2` but drops `1.2-alpine`.

use crate::error::{ImageTagError, Result};
use regex::Regex;

#[cfg(test)]
mod tests;

/// Pattern applied when the caller gives none.
pub const MATCH_ALL: &str = ".*";

/// A compiled, fully anchored tag filter.
#[derive(Debug, Clone)]
pub struct TagFilter {
    pattern: String,
    regex: Regex,
}

impl TagFilter {
    /// Compiles a filter. An empty pattern matches everything; any other
    /// pattern, whitespace included, is used as given.
    ///
    /// # Errors
    ///
    /// Returns `MalformedFilterPattern` if the pattern is not a valid regex.
    ///
    /// # Examples
    ///
    /// ```
    /// use libimagetag::filter::TagFilter;
    ///
    /// let filter = TagFilter::new(r"\d+\.\d+\.\d+").unwrap();
    /// assert!(filter.is_match("1.10.0"));
    /// assert!(!filter.is_match("1.10.0-rc1"));
    /// assert!(TagFilter::new("[").is_err());
    /// ```
    pub fn new(pattern: &str) -> Result<Self> {
        let pattern = if pattern.is_empty() {
            MATCH_ALL
        } else {
            pattern
        };

        let regex = Regex::new(&format!("^(?:{})$", pattern))
            .map_err(|e| ImageTagError::malformed_filter(pattern, e))?;

        Ok(Self {
            pattern: pattern.to_string(),
            regex,
        })
    }

    /// The pattern as given (or [`MATCH_ALL`]).
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Whether `tag` matches the pattern in its entirety.
    pub fn is_match(&self, tag: &str) -> bool {
        self.regex.is_match(tag)
    }

    /// Keeps the matching tags, preserving their order.
    pub fn apply(&self, tags: impl IntoIterator<Item = String>) -> Vec<String> {
        tags.into_iter().filter(|tag| self.is_match(tag)).collect()
    }
}

impl Default for TagFilter {
    fn default() -> Self {
        Self {
            pattern: MATCH_ALL.to_string(),
            regex: Regex::new("^(?:.*)$").expect("match-all pattern is valid"),
        }
    }
}
