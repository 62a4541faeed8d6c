//! Weighted base-emotion composition of derived emotions.
//!
//! Starting with weight 1.0 at the queried emotion, weight flows up the
//! parent edges: it is split evenly across the emotion's parent pairs, then
//! evenly between the two parents of each pair. Weight reaching a base
//! emotion accumulates there; weight still travelling past the depth bound
//! is dropped. The accumulated weights are normalized to sum to 1.
//!
//! Shallow ancestry therefore outweighs distant ancestry. This is an
//! intentional approximation for color blending, not an exact path count.
//!
//! The traversal is linear in the weight, so each `(emotion, depth)`
//! contribution is computed once per unit weight and scaled, which keeps
//! wide rule tables cheap without changing the result.

use std::collections::{BTreeMap, HashMap};

use crate::graph::CombinationGraph;
use crate::logging::spans;
use crate::types::BaseRatio;

/// Per-unit-weight contribution of each base emotion.
type Contribution = BTreeMap<String, f64>;

/// Base-emotion proportions of `emotion`, sorted by descending ratio (ties
/// by name).
///
/// Base emotions return `[(emotion, 1.0)]`. When no weight reaches the base
/// layer (no recorded parents), the result falls back to an equal split over
/// [`CombinationGraph::get_base_components`], which may be empty. Results
/// are cached on the graph until it is mutated or finalized again.
#[must_use]
pub fn compute_base_ratios(graph: &CombinationGraph, emotion: &str) -> Vec<BaseRatio> {
    if graph.is_base(emotion) {
        return vec![BaseRatio::new(emotion, 1.0)];
    }
    if let Some(cached) = graph.cached_ratios(emotion) {
        return cached;
    }

    let _span = tracing::trace_span!(spans::RATIOS, emotion).entered();
    let mut memo = HashMap::new();
    let weights = contributions(graph, emotion, 0, graph.max_ratio_depth(), &mut memo);
    let total: f64 = weights.values().sum();

    let mut ratios: Vec<BaseRatio> = if total > 0.0 {
        weights
            .into_iter()
            .filter(|(_, weight)| *weight > 0.0)
            .map(|(base, weight)| BaseRatio::new(base, weight / total))
            .collect()
    } else {
        let components = graph.get_base_components(emotion);
        #[allow(clippy::cast_precision_loss)]
        let share = 1.0 / components.len().max(1) as f64;
        components
            .into_iter()
            .map(|base| BaseRatio::new(base, share))
            .collect()
    };
    ratios.sort_by(|a, b| b.ratio.total_cmp(&a.ratio).then_with(|| a.emotion.cmp(&b.emotion)));

    graph.store_ratios(emotion, &ratios);
    ratios
}

fn contributions(
    graph: &CombinationGraph,
    emotion: &str,
    depth: u32,
    max_depth: u32,
    memo: &mut HashMap<(String, u32), Contribution>,
) -> Contribution {
    if depth > max_depth {
        return Contribution::new();
    }
    if graph.is_base(emotion) {
        return Contribution::from([(emotion.to_string(), 1.0)]);
    }
    let memo_key = (emotion.to_string(), depth);
    if let Some(done) = memo.get(&memo_key) {
        return done.clone();
    }

    let pairs = graph.parent_keys(emotion);
    let mut total = Contribution::new();
    if !pairs.is_empty() {
        #[allow(clippy::cast_precision_loss)]
        let parent_share = 1.0 / pairs.len() as f64 * 0.5;
        for key in pairs {
            for parent in [key.first(), key.second()] {
                for (base, weight) in contributions(graph, parent, depth + 1, max_depth, memo) {
                    *total.entry(base).or_insert(0.0) += weight * parent_share;
                }
            }
        }
    }

    memo.insert(memo_key, total.clone());
    total
}
