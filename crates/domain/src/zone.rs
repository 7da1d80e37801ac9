//! Watched zones and suffix matching.
//!
//! Names are compared on DNS label boundaries: `www.example.com.` is inside
//! `example.com.`, `evilexample.com.` is not.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Lowercases `name` and makes it fully qualified.
pub fn normalize(name: &str) -> String {
    let mut normalized = name.trim().to_ascii_lowercase();
    if !normalized.ends_with('.') {
        normalized.push('.');
    }
    normalized
}

/// A normalized, fully-qualified domain suffix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Zone(String);

impl Zone {
    pub fn new(name: &str) -> Self {
        Self(normalize(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when `candidate` equals this zone or sits below it.
    ///
    /// `candidate` must already be normalized.
    pub fn contains(&self, candidate: &str) -> bool {
        if self.0 == "." {
            return true;
        }
        if candidate.len() < self.0.len() || !candidate.ends_with(self.0.as_str()) {
            return false;
        }

        let boundary = candidate.len() - self.0.len();
        boundary == 0 || candidate.as_bytes()[boundary - 1] == b'.'
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Zone {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Zone::new(&raw))
    }
}

/// An ordered list of watched zones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ZoneSet(Vec<Zone>);

impl ZoneSet {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(names.into_iter().map(|n| Zone::new(n.as_ref())).collect())
    }

    /// Returns the most specific zone containing `qname`, or `None`.
    ///
    /// List order does not matter; when two zones of equal length match the
    /// first one listed wins.
    pub fn matches(&self, qname: &str) -> Option<&Zone> {
        let candidate = normalize(qname);
        let mut best: Option<&Zone> = None;

        for zone in &self.0 {
            if !zone.contains(&candidate) {
                continue;
            }
            // Longest match, otherwise a parent zone could shadow a child.
            if best.is_none_or(|b| zone.as_str().len() > b.as_str().len()) {
                best = Some(zone);
            }
        }

        best
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Zone> {
        self.0.iter()
    }
}

impl<S: AsRef<str>> FromIterator<S> for ZoneSet {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self::new(iter)
    }
}
