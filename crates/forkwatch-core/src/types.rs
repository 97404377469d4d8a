//! Shared types for the fork-detection pipeline.

use serde::{Deserialize, Serialize};

// ─── Header ──────────────────────────────────────────────────────────────────

/// A minimal block header summary — enough to link blocks into a chain.
///
/// Identity is `(height, hash)`; two headers at the same height with
/// different hashes represent competing chain tips.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    /// Block height.
    pub height: u64,
    /// Block hash (`0x…`).
    pub hash: String,
    /// Parent block hash (`0x…`).
    pub parent_hash: String,
}

impl Header {
    /// Returns `true` if `parent` is the direct parent of `self`.
    pub fn extends(&self, parent: &Header) -> bool {
        self.height == parent.height + 1 && self.parent_hash == parent.hash
    }
}

// ─── ForkPair / ForkReport ───────────────────────────────────────────────────

/// One replaced height in a reconstructed divergence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForkPair {
    /// The header the monitor previously accepted at this height.
    pub old: Header,
    /// The header that replaced it on the new canonical chain.
    pub new: Header,
}

/// The reconstructed extent of a fork.
///
/// Pairs are ordered in discovery order of the backward walk: the highest
/// replaced height first, down toward the common ancestor. An empty report
/// is a valid outcome — the suspected fork turned out not to be one.
#[derive(Debug, Clone, Default)]
pub struct ForkReport {
    pairs: Vec<ForkPair>,
    truncated: bool,
}

impl ForkReport {
    pub(crate) fn new(pairs: Vec<ForkPair>, truncated: bool) -> Self {
        Self { pairs, truncated }
    }

    /// Number of replaced heights (the fork size).
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Returns `true` if no height was actually replaced.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Returns `true` if the walk hit the edge of the cache window before
    /// finding a common ancestor; the report covers only the cached part.
    pub fn truncated(&self) -> bool {
        self.truncated
    }

    /// Replaced heights, highest first.
    pub fn pairs(&self) -> &[ForkPair] {
        &self.pairs
    }

    /// The lowest replaced height (reached last by the walk).
    pub fn start(&self) -> Option<&ForkPair> {
        self.pairs.last()
    }

    /// The highest replaced height (where the fork was detected).
    pub fn end(&self) -> Option<&ForkPair> {
        self.pairs.first()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn h(height: u64, hash: &str, parent: &str) -> Header {
        Header {
            height,
            hash: hash.into(),
            parent_hash: parent.into(),
        }
    }

    #[test]
    fn header_extends_parent() {
        let parent = h(100, "0xaaa", "0x000");
        let child = h(101, "0xbbb", "0xaaa");
        assert!(child.extends(&parent));
        assert!(!parent.extends(&child));
    }

    #[test]
    fn header_extends_false_on_gap() {
        let a = h(100, "0xaaa", "0x000");
        let b = h(102, "0xccc", "0xaaa"); // gap
        assert!(!b.extends(&a));
    }

    #[test]
    fn report_range_endpoints() {
        let pairs = vec![
            ForkPair { old: h(12, "0xa12", "0xa11"), new: h(12, "0xb12", "0xb11") },
            ForkPair { old: h(11, "0xa11", "0xa10"), new: h(11, "0xb11", "0xa10") },
        ];
        let report = ForkReport::new(pairs, false);
        assert_eq!(report.len(), 2);
        assert_eq!(report.start().unwrap().new.height, 11);
        assert_eq!(report.end().unwrap().new.height, 12);
    }

    #[test]
    fn empty_report_is_valid() {
        let report = ForkReport::default();
        assert!(report.is_empty());
        assert!(report.start().is_none());
        assert!(report.end().is_none());
    }
}
