//! One-shot construction of a finalized [`CombinationGraph`].
//!
//! The builder applies a [`RuleTable`] in authored order with deferred
//! property updates, finalizes once, and collects data-quality diagnostics
//! instead of failing:
//!
//! - **duplicate pairs**: a later rule redefined an unordered pair with a
//!   different child (the later rule wins);
//! - **unreachable emotions**: nodes the level BFS never reaches from the
//!   base layer (reported with the [`crate::types::UNREACHABLE_LEVEL`] sentinel);
//! - **cycles**: rule chains leading back to one of their own inputs.
//!
//! Only structural problems (empty or duplicate base list, unreadable rule
//! data) are errors.

use tracing::{info, warn};

use crate::config::EmocraftConfig;
use crate::error::Result;
use crate::graph::{CombinationGraph, DEFAULT_RATIO_DEPTH, PropertyUpdate};
use crate::logging::spans;
use crate::rules::RuleTable;
use crate::types::PairKey;

/// A rule that overrode an earlier rule for the same unordered pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicatePair {
    /// The normalized pair.
    pub key: PairKey,
    /// Child the pair mapped to before.
    pub previous: String,
    /// Child the pair maps to now.
    pub incoming: String,
}

/// Diagnostics gathered while building a graph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    /// Overridden pair definitions, in the order they were hit.
    pub duplicates: Vec<DuplicatePair>,
    /// Emotions with no path from the base layer, in graph order.
    pub unreachable: Vec<String>,
    /// Directed cycles found by finalize.
    pub cycles: Vec<Vec<String>>,
    /// `X + X → X` rules that were ignored.
    pub skipped_self_rules: usize,
    /// Rules passed to the graph.
    pub rules_applied: usize,
}

impl BuildReport {
    /// Whether the rule table produced no diagnostics at all.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.duplicates.is_empty()
            && self.unreachable.is_empty()
            && self.cycles.is_empty()
            && self.skipped_self_rules == 0
    }
}

/// A finalized graph plus the diagnostics from building it.
#[derive(Debug)]
pub struct BuildOutput {
    /// The finalized, read-only graph.
    pub graph: CombinationGraph,
    /// Data-quality diagnostics.
    pub report: BuildReport,
}

/// Builder for a finalized [`CombinationGraph`].
///
/// ```
/// use emocraft_core::builder::GraphBuilder;
/// use emocraft_core::rules::RuleTable;
///
/// let rules = RuleTable::from_rules([("Joy", "Anger", "Pride")]);
/// let out = GraphBuilder::new(["Joy", "Anger"]).with_rules(rules).build()?;
/// assert_eq!(out.graph.get_combination("Anger", "Joy"), Some("Pride"));
/// assert!(out.report.is_clean());
/// # Ok::<(), emocraft_core::error::EmocraftError>(())
/// ```
#[derive(Debug, Clone)]
pub struct GraphBuilder {
    base_emotions: Vec<String>,
    rules: Option<RuleTable>,
    max_ratio_depth: u32,
}

impl GraphBuilder {
    /// Start a build over the given base emotions. Without
    /// [`Self::with_rules`] the embedded rule table is used.
    pub fn new<I, S>(base_emotions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            base_emotions: base_emotions.into_iter().map(Into::into).collect(),
            rules: None,
            max_ratio_depth: DEFAULT_RATIO_DEPTH,
        }
    }

    /// Use `rules` instead of the embedded table.
    #[must_use]
    pub fn with_rules(mut self, rules: RuleTable) -> Self {
        self.rules = Some(rules);
        self
    }

    /// Depth bound for ratio computation on the built graph.
    #[must_use]
    pub fn with_max_ratio_depth(mut self, depth: u32) -> Self {
        self.max_ratio_depth = depth;
        self
    }

    /// Apply every rule, finalize, and collect diagnostics.
    ///
    /// # Errors
    /// Returns [`crate::EmocraftError::InvalidInput`] for an empty or
    /// duplicated base list, or [`crate::EmocraftError::RuleTable`] if the
    /// embedded table fails to parse.
    pub fn build(self) -> Result<BuildOutput> {
        let _span = tracing::info_span!(spans::BUILD).entered();

        let mut graph = CombinationGraph::new(&self.base_emotions)?;
        graph.set_max_ratio_depth(self.max_ratio_depth);
        let rules = match self.rules {
            Some(rules) => rules,
            None => RuleTable::embedded()?,
        };

        let mut report = BuildReport::default();
        for rule in rules.rules() {
            if rule.is_degenerate() {
                warn!(emotion = %rule.first, "Skipping self-combination rule");
                report.skipped_self_rules += 1;
                continue;
            }

            let key = PairKey::new(&rule.first, &rule.second);
            if let Some(existing) = graph.rule_for(&key) {
                if existing != rule.child {
                    report.duplicates.push(DuplicatePair {
                        key: key.clone(),
                        previous: existing.to_string(),
                        incoming: rule.child.clone(),
                    });
                }
            }

            graph.add_combination(&rule.first, &rule.second, &rule.child, PropertyUpdate::Deferred)?;
            report.rules_applied += 1;
        }

        graph.finalize();

        report.unreachable = graph
            .all_emotions()
            .iter()
            .filter(|emotion| !graph.is_reachable(emotion))
            .cloned()
            .collect();
        report.cycles = graph.cycles().to_vec();

        for dup in &report.duplicates {
            warn!(
                pair = %dup.key,
                previous = %dup.previous,
                incoming = %dup.incoming,
                "Duplicate parent-pair definition (last wins)"
            );
        }
        if !report.unreachable.is_empty() {
            warn!(
                count = report.unreachable.len(),
                emotions = ?report.unreachable,
                "Unreachable emotions (no base path)"
            );
        }
        if !report.cycles.is_empty() {
            warn!(count = report.cycles.len(), cycles = ?report.cycles, "Combination rules contain cycles");
        }

        info!(
            rules = report.rules_applied,
            pairs = graph.rule_count(),
            emotions = graph.all_emotions().len(),
            duplicates = report.duplicates.len(),
            unreachable = report.unreachable.len(),
            "Combination graph built"
        );

        Ok(BuildOutput { graph, report })
    }
}

/// Build a finalized graph from the embedded rule table.
///
/// # Errors
/// See [`GraphBuilder::build`].
pub fn build_graph<I, S>(base_emotions: I) -> Result<BuildOutput>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    GraphBuilder::new(base_emotions).build()
}

/// Build a finalized graph as described by `config`.
///
/// # Errors
/// Returns an error if the configured rule file cannot be loaded, or see
/// [`GraphBuilder::build`].
pub fn build_from_config(config: &EmocraftConfig) -> Result<BuildOutput> {
    let mut builder = GraphBuilder::new(config.graph.base_emotions.iter().cloned())
        .with_max_ratio_depth(config.ratios.max_depth);
    if let Some(path) = &config.graph.rules_path {
        builder = builder.with_rules(RuleTable::from_file(path)?);
    }
    builder.build()
}
