//! Core type definitions shared by the graph, builder and ratio modules.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Level assigned to emotions with no combination path back to the base
/// layer. Real levels in authored tables run past 10, so the sentinel sits
/// at the top of the range where no combination chain can reach it.
pub const UNREACHABLE_LEVEL: u32 = u32::MAX;

/// The six base emotions of the shipped rule table, in display order.
pub const DEFAULT_BASE_EMOTIONS: [&str; 6] =
    ["Joy", "Fear", "Sadness", "Disgust", "Anger", "Surprise"];

/// Whether `level` is the unreachable sentinel.
#[must_use]
pub fn is_unreachable(level: u32) -> bool {
    level == UNREACHABLE_LEVEL
}

// ---------------------------------------------------------------------------
// Pair keys
// ---------------------------------------------------------------------------

/// Normalized, unordered pair of parent emotions.
///
/// The two names are stored in lexicographic order so that `A + B` and
/// `B + A` resolve to the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PairKey {
    first: String,
    second: String,
}

impl PairKey {
    /// Build the normalized key for two emotion names.
    #[must_use]
    pub fn new(a: &str, b: &str) -> Self {
        let (first, second) = if a <= b { (a, b) } else { (b, a) };
        Self {
            first: first.to_string(),
            second: second.to_string(),
        }
    }

    /// Lexicographically smaller name.
    #[must_use]
    pub fn first(&self) -> &str {
        &self.first
    }

    /// Lexicographically larger name.
    #[must_use]
    pub fn second(&self) -> &str {
        &self.second
    }

    /// Whether `emotion` is one of the two parents.
    #[must_use]
    pub fn contains(&self, emotion: &str) -> bool {
        self.first == emotion || self.second == emotion
    }
}

impl fmt::Display for PairKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}+{}", self.first, self.second)
    }
}

// ---------------------------------------------------------------------------
// Nodes
// ---------------------------------------------------------------------------

/// One emotion in the combination graph, base or derived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmotionNode {
    /// Display name, the node's identity.
    pub name: String,
    /// Combination steps from the base layer (0 for base emotions).
    /// `None` until the node's properties have been computed.
    pub level: Option<u32>,
    /// Sorted base emotions this node is ultimately built from.
    pub base_components: Vec<String>,
}

impl EmotionNode {
    /// A base emotion: level 0, composed of itself.
    #[must_use]
    pub fn base(name: &str) -> Self {
        Self {
            name: name.to_string(),
            level: Some(0),
            base_components: vec![name.to_string()],
        }
    }

    /// A lazily inserted node whose properties are not yet known.
    #[must_use]
    pub fn placeholder(name: &str) -> Self {
        Self {
            name: name.to_string(),
            level: None,
            base_components: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Ratios
// ---------------------------------------------------------------------------

/// Share of one base emotion in a derived emotion's composition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseRatio {
    /// Base emotion name.
    pub emotion: String,
    /// Proportion in `[0, 1]`; all ratios of one emotion sum to 1.
    pub ratio: f64,
}

impl BaseRatio {
    /// Create a ratio entry.
    #[must_use]
    pub fn new(emotion: impl Into<String>, ratio: f64) -> Self {
        Self {
            emotion: emotion.into(),
            ratio,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pair_key_is_order_independent() {
        assert_eq!(PairKey::new("Joy", "Anger"), PairKey::new("Anger", "Joy"));
        assert_eq!(PairKey::new("Joy", "Anger").first(), "Anger");
        assert!(PairKey::new("Joy", "Anger").contains("Joy"));
        assert!(!PairKey::new("Joy", "Anger").contains("Fear"));
    }

    #[test]
    fn pair_key_display_joins_sorted_names() {
        assert_eq!(PairKey::new("Sadness", "Fear").to_string(), "Fear+Sadness");
    }

    #[test]
    fn sentinel_threshold() {
        assert!(!is_unreachable(9));
        assert!(!is_unreachable(10));
        assert!(!is_unreachable(12));
        assert!(is_unreachable(UNREACHABLE_LEVEL));
    }
}
