//! Ordering of version-like tag strings.
//!
//! A tag is split on `.` and `-` into components. Numeric components compare
//! as integers of any length, text components compare lexicographically, and
//! a number always ranks above text in the same position. When one tag is a
//! prefix of the other, the shorter one is lower.
//!
//! A tag is a version when at least one component is numeric, so
//! `alpine-3.18` and `jdk-11` are compared component by component too. A `v`
//! prefix directly before a digit (`v1.2`) is ignored. Text ranks below a
//! number in the same position, which keeps `alpine-*` below `1.*`. Tags
//! with no numeric component (`latest`, `stable`) rank below every version
//! and compare lexicographically among themselves.
//!
//! Two different strings never compare equal: when their components match
//! (`1.02` and `1.2`), the raw strings decide. This makes the ascending and
//! descending orders exact reverses of each other.

use crate::error::ImageTagError;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;


/// Direction in which tags are presented.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagOrder {
    /// Highest version first
    #[default]
    Descending,
    /// Lowest version first
    Ascending,
}

impl TagOrder {
    /// Maps the `reverse_order` flag of a query onto an order.
    ///
    /// The natural presentation is newest first, so reversing it yields
    /// ascending order.
    pub fn from_reverse(reverse: bool) -> Self {
        if reverse {
            Self::Ascending
        } else {
            Self::Descending
        }
    }

    pub fn is_reversed(&self) -> bool {
        matches!(self, Self::Ascending)
    }
}

impl fmt::Display for TagOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Descending => f.write_str("descending"),
            Self::Ascending => f.write_str("ascending"),
        }
    }
}

/// A non-negative integer of arbitrary length, held as its digits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Numeric(String);

impl Numeric {
    fn new(digits: &str) -> Self {
        let trimmed = digits.trim_start_matches('0');
        Self(trimmed.to_string())
    }
}

impl Ord for Numeric {
    fn cmp(&self, other: &Self) -> Ordering {
        // Leading zeros are gone, so more digits means a larger number.
        self.0
            .len()
            .cmp(&other.0.len())
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for Numeric {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// One `.`/`-` delimited piece of a version.
///
/// Variant order matters: the derived `Ord` ranks `Text` below `Number`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Component {
    Text(String),
    Number(Numeric),
}

impl Component {
    fn parse(piece: &str) -> Self {
        if piece.bytes().all(|b| b.is_ascii_digit()) {
            Self::Number(Numeric::new(piece))
        } else {
            Self::Text(piece.to_string())
        }
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Self::Number(_))
    }
}

/// A tag read as a version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Version {
    raw: String,
    components: Vec<Component>,
}

impl Version {
    /// Reads a tag as a version, or `None` when it is not one.
    ///
    /// # Examples
    ///
    /// ```
    /// use libimagetag::version::Version;
    ///
    /// assert!(Version::parse("1.10.0").is_some());
    /// assert!(Version::parse("v2-alpine").is_some());
    /// assert!(Version::parse("alpine-3.18").is_some());
    /// assert!(Version::parse("latest").is_none());
    /// ```
    pub fn parse(tag: &str) -> Option<Self> {
        let body = match tag.strip_prefix(['v', 'V']) {
            Some(rest) if rest.starts_with(|c: char| c.is_ascii_digit()) => rest,
            _ => tag,
        };

        let components: Vec<Component> = body
            .split(['.', '-'])
            .filter(|piece| !piece.is_empty())
            .map(Component::parse)
            .collect();

        if !components.iter().any(Component::is_number) {
            return None;
        }

        Some(Self {
            raw: tag.to_string(),
            components,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Sort key of a tag. `None` (not a version) sorts below every `Some`.
fn sort_key(tag: &str) -> (Option<Vec<Component>>, &str) {
    (Version::parse(tag).map(|v| v.components), tag)
}

/// Compares two tags in ascending version order.
///
/// # Examples
///
/// ```
/// use libimagetag::version::compare;
/// use std::cmp::Ordering;
///
/// assert_eq!(compare("1.2.0", "1.10.0"), Ordering::Less);
/// assert_eq!(compare("latest", "0.1"), Ordering::Less);
/// assert_eq!(compare("1.0", "1.0"), Ordering::Equal);
/// ```
pub fn compare(a: &str, b: &str) -> Ordering {
    sort_key(a).cmp(&sort_key(b))
}

/// Sorts tags in place in the requested order.
///
/// Tags that are not versions are kept (and logged at debug level); with
/// [`TagOrder::Descending`] they end up after every version. Among
/// themselves they follow the same rule as versions: ascending string order,
/// reversed for [`TagOrder::Descending`] (`stable` before `latest`). The two
/// orders are exact reverses of each other, and that takes precedence over
/// keeping non-version tags in their input order.
pub fn sort_tags(tags: &mut [String], order: TagOrder) {
    let mut keyed: Vec<(Option<Vec<Component>>, String)> = tags
        .iter_mut()
        .map(|tag| {
            let components = Version::parse(tag.as_str()).map(|v| v.components);
            if components.is_none() {
                let skipped = ImageTagError::version_skipped(tag.as_str());
                tracing::debug!(tag = %tag, "{}", skipped);
            }
            (components, std::mem::take(tag))
        })
        .collect();

    keyed.sort();
    if order == TagOrder::Descending {
        keyed.reverse();
    }

    for (slot, (_, tag)) in tags.iter_mut().zip(keyed) {
        *slot = tag;
    }
}
