//! Player discovery progress.
//!
//! Tracks which emotions a player has discovered (seeded with the base
//! emotions) and which pairings they have already tried. The graph is only
//! queried, never mutated. Tried pairings are stored as `"A+B"` strings in
//! both orders so snapshots stay readable by older saves.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::combine::combine_multiple;
use crate::error::Result;
use crate::graph::CombinationGraph;

/// A successful combine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discovery {
    /// The crafted emotion.
    pub emotion: String,
    /// Whether it was not discovered before this attempt.
    pub is_new: bool,
}

/// Emotions that combine with a given selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Combinable {
    /// Every discovered emotion that yields a result.
    pub combinable: BTreeSet<String>,
    /// The subset involving a pairing the player has not tried yet.
    pub unexplored: BTreeSet<String>,
}

/// Serializable progress state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    /// Discovered emotion names.
    pub discovered: Vec<String>,
    /// Tried pairings as `"A+B"`.
    pub tried: Vec<String>,
}

impl ProgressSnapshot {
    /// Serialize to JSON.
    ///
    /// # Errors
    /// Returns [`crate::EmocraftError::Serialization`] on failure.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Deserialize from JSON.
    ///
    /// # Errors
    /// Returns [`crate::EmocraftError::Serialization`] if the JSON is invalid.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Discovered emotions and tried pairings for one player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryProgress {
    base_emotions: Vec<String>,
    discovered: BTreeSet<String>,
    tried: BTreeSet<String>,
}

impl DiscoveryProgress {
    /// Fresh progress with only the base emotions discovered.
    #[must_use]
    pub fn new(base_emotions: &[String]) -> Self {
        Self {
            base_emotions: base_emotions.to_vec(),
            discovered: base_emotions.iter().cloned().collect(),
            tried: BTreeSet::new(),
        }
    }

    /// Fresh progress for the bases of `graph`.
    #[must_use]
    pub fn for_graph(graph: &CombinationGraph) -> Self {
        Self::new(graph.base_emotions())
    }

    /// Whether `emotion` has been discovered.
    #[must_use]
    pub fn is_discovered(&self, emotion: &str) -> bool {
        self.discovered.contains(emotion)
    }

    /// Discovered emotions, sorted.
    #[must_use]
    pub fn discovered(&self) -> &BTreeSet<String> {
        &self.discovered
    }

    /// Whether the pairing `a + b` has been tried, in either order.
    #[must_use]
    pub fn has_tried(&self, a: &str, b: &str) -> bool {
        self.tried.contains(&tried_key(a, b)) || self.tried.contains(&tried_key(b, a))
    }

    /// Number of tried pairing keys (both orders counted).
    #[must_use]
    pub fn tried_count(&self) -> usize {
        self.tried.len()
    }

    /// Combine the crafting `slots`; on success record the result and mark
    /// every slot pairing as tried.
    pub fn attempt<S: AsRef<str>>(&mut self, graph: &CombinationGraph, slots: &[S]) -> Option<Discovery> {
        let emotion = combine_multiple(graph, slots)?;
        let is_new = self.discovered.insert(emotion.clone());

        for (i, a) in slots.iter().enumerate() {
            for b in &slots[i + 1..] {
                self.tried.insert(tried_key(a.as_ref(), b.as_ref()));
                self.tried.insert(tried_key(b.as_ref(), a.as_ref()));
            }
        }
        let inferred = infer_tried_combinations(graph, &self.discovered);
        self.tried.extend(inferred);

        debug!(emotion = %emotion, is_new, discovered = self.discovered.len(), "Combination crafted");
        Some(Discovery { emotion, is_new })
    }

    /// Discovered emotions that combine with `emotion`.
    #[must_use]
    pub fn combinable_with(&self, graph: &CombinationGraph, emotion: &str) -> Combinable {
        let mut out = Combinable::default();
        for other in &self.discovered {
            if other == emotion || graph.get_combination(emotion, other).is_none() {
                continue;
            }
            out.combinable.insert(other.clone());
            if !self.has_tried(emotion, other) {
                out.unexplored.insert(other.clone());
            }
        }
        out
    }

    /// Discovered emotions that, appended to `slots`, yield a valid
    /// (non-circular) multi-emotion result.
    #[must_use]
    pub fn combinable_with_all<S: AsRef<str>>(&self, graph: &CombinationGraph, slots: &[S]) -> Combinable {
        let mut out = Combinable::default();
        if slots.is_empty() {
            return out;
        }
        let mut candidate: Vec<&str> = slots.iter().map(AsRef::as_ref).collect();
        for other in &self.discovered {
            if candidate.contains(&other.as_str()) {
                continue;
            }
            candidate.push(other);
            let result = combine_multiple(graph, &candidate);
            candidate.pop();
            if result.is_none() {
                continue;
            }
            out.combinable.insert(other.clone());
            if candidate.iter().any(|slot| !self.has_tried(slot, other)) {
                out.unexplored.insert(other.clone());
            }
        }
        out
    }

    /// Forget everything except the base emotions.
    pub fn reset(&mut self) {
        self.discovered = self.base_emotions.iter().cloned().collect();
        self.tried.clear();
    }

    /// Current state as a serializable snapshot.
    #[must_use]
    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            discovered: self.discovered.iter().cloned().collect(),
            tried: self.tried.iter().cloned().collect(),
        }
    }

    /// Restore from a snapshot, merging in the pairings implied by the
    /// discovered set. Base emotions are always discovered.
    #[must_use]
    pub fn restore(graph: &CombinationGraph, snapshot: ProgressSnapshot) -> Self {
        let mut progress = Self::for_graph(graph);
        progress.discovered.extend(snapshot.discovered);
        progress.tried.extend(snapshot.tried);
        let inferred = infer_tried_combinations(graph, &progress.discovered);
        progress.tried.extend(inferred);
        progress
    }
}

/// Pairings a player must have tried to hold `discovered`: for each
/// discovered derived emotion, every pair of discovered emotions that
/// combines into it (both orders).
#[must_use]
pub fn infer_tried_combinations(graph: &CombinationGraph, discovered: &BTreeSet<String>) -> BTreeSet<String> {
    let all: Vec<&String> = discovered.iter().collect();
    let mut inferred = BTreeSet::new();
    for (i, a) in all.iter().enumerate() {
        for b in &all[i + 1..] {
            let Some(result) = graph.get_combination(a, b) else {
                continue;
            };
            if !graph.is_base(result) && discovered.contains(result) {
                inferred.insert(tried_key(a, b));
                inferred.insert(tried_key(b, a));
            }
        }
    }
    inferred
}

fn tried_key(a: &str, b: &str) -> String {
    format!("{a}+{b}")
}
