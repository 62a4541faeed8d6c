//! The emotion combination graph.
//!
//! Nodes are emotions keyed by display name. Each combination rule is an
//! edge from an unordered parent pair to a child emotion:
//!
//! ```text
//!   {Anger, Joy} ──► Pride
//!   {Joy, Pride} ──► Triumph
//! ```
//!
//! Construction is two-phase: rules are bulk-inserted with
//! [`PropertyUpdate::Deferred`] in whatever order the rule table lists them,
//! then [`CombinationGraph::finalize`] computes every node's level and base
//! components in one level-ordered pass. Reads take `&self`; memoized
//! results live in lock-guarded caches owned by the graph, so a finalized
//! graph can be shared across threads without external locking.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};

use parking_lot::RwLock;
use tracing::debug;

use crate::error::{EmocraftError, Result};
use crate::logging::spans;
use crate::types::{BaseRatio, EmotionNode, PairKey, UNREACHABLE_LEVEL, is_unreachable};

/// Depth bound of the weighted ratio traversal unless configured otherwise.
pub const DEFAULT_RATIO_DEPTH: u32 = 10;

/// When a node's level and base components are recomputed after a rule is
/// inserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PropertyUpdate {
    /// Leave node properties to [`CombinationGraph::finalize`]. Required for
    /// bulk loading, since rule tables are not in dependency order.
    #[default]
    Deferred,
    /// Recompute the child's properties immediately. Only correct when rules
    /// arrive parents-first (interactive edits).
    Immediate,
}

/// Directed acyclic (by intent) graph of emotion combinations.
#[derive(Debug)]
pub struct CombinationGraph {
    base_emotions: Vec<String>,
    base_set: HashSet<String>,
    /// Node names in insertion order.
    order: Vec<String>,
    nodes: HashMap<String, EmotionNode>,
    /// Normalized parent pair → child.
    combinations: HashMap<PairKey, String>,
    /// Child → every parent pair producing it, in insertion order.
    parents: HashMap<String, Vec<PairKey>>,
    /// Emotion → every pair it takes part in, in insertion order.
    participants: HashMap<String, Vec<PairKey>>,
    level_cache: RwLock<HashMap<String, u32>>,
    components_cache: RwLock<HashMap<String, Vec<String>>>,
    ratio_cache: RwLock<HashMap<String, Vec<BaseRatio>>>,
    max_ratio_depth: u32,
    cycles: Vec<Vec<String>>,
    finalized: bool,
}

impl CombinationGraph {
    /// Create a graph holding only the given base emotions.
    ///
    /// # Errors
    /// Returns [`EmocraftError::InvalidInput`] if the list is empty, contains
    /// an empty name, or contains duplicates.
    pub fn new<I, S>(base_emotions: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut base = Vec::new();
        let mut base_set = HashSet::new();
        for emotion in base_emotions {
            let emotion = emotion.as_ref();
            ensure_name(emotion)?;
            if !base_set.insert(emotion.to_string()) {
                return Err(EmocraftError::InvalidInput(format!(
                    "duplicate base emotion: {emotion}"
                )));
            }
            base.push(emotion.to_string());
        }
        if base.is_empty() {
            return Err(EmocraftError::InvalidInput(
                "base emotion list is empty".to_string(),
            ));
        }

        let nodes = base
            .iter()
            .map(|name| (name.clone(), EmotionNode::base(name)))
            .collect();
        let level_cache = base.iter().map(|name| (name.clone(), 0)).collect();
        let components_cache = base
            .iter()
            .map(|name| (name.clone(), vec![name.clone()]))
            .collect();

        Ok(Self {
            order: base.clone(),
            base_emotions: base,
            base_set,
            nodes,
            combinations: HashMap::new(),
            parents: HashMap::new(),
            participants: HashMap::new(),
            level_cache: RwLock::new(level_cache),
            components_cache: RwLock::new(components_cache),
            ratio_cache: RwLock::new(HashMap::new()),
            max_ratio_depth: DEFAULT_RATIO_DEPTH,
            cycles: Vec::new(),
            finalized: false,
        })
    }

    // -----------------------------------------------------------------------
    // Mutation
    // -----------------------------------------------------------------------

    /// Record the rule `parent_a + parent_b → child`.
    ///
    /// Unknown names are inserted as placeholder nodes. A rule for an
    /// already-known pair replaces the previous child (last write wins) and
    /// the pair is dropped from the previous child's parent list, so the
    /// old child no longer inherits levels or components through it. A plain
    /// reverse multimap would keep that stale entry; this graph does not.
    ///
    /// # Errors
    /// Returns [`EmocraftError::InvalidInput`] if any name is empty.
    pub fn add_combination(
        &mut self,
        parent_a: &str,
        parent_b: &str,
        child: &str,
        update: PropertyUpdate,
    ) -> Result<()> {
        ensure_name(parent_a)?;
        ensure_name(parent_b)?;
        ensure_name(child)?;

        for name in [parent_a, parent_b, child] {
            self.ensure_node(name);
        }

        let key = PairKey::new(parent_a, parent_b);
        if let Some(previous) = self.combinations.insert(key.clone(), child.to_string()) {
            if previous != child {
                if let Some(pairs) = self.parents.get_mut(&previous) {
                    pairs.retain(|pair| *pair != key);
                }
            }
        }

        let pairs = self.parents.entry(child.to_string()).or_default();
        if !pairs.contains(&key) {
            pairs.push(key.clone());
        }
        for participant in [key.first().to_string(), key.second().to_string()] {
            let keys = self.participants.entry(participant).or_default();
            if !keys.contains(&key) {
                keys.push(key.clone());
            }
        }

        self.invalidate();
        if update == PropertyUpdate::Immediate {
            self.update_node_properties(child);
        }
        Ok(())
    }

    /// Set the depth bound of the weighted ratio traversal.
    pub fn set_max_ratio_depth(&mut self, depth: u32) {
        self.max_ratio_depth = depth;
        self.ratio_cache.write().clear();
    }

    fn ensure_node(&mut self, name: &str) {
        if !self.nodes.contains_key(name) {
            self.nodes
                .insert(name.to_string(), EmotionNode::placeholder(name));
            self.order.push(name.to_string());
        }
    }

    /// Drop every memoized result. Base emotions stay seeded.
    fn invalidate(&mut self) {
        let levels = self.level_cache.get_mut();
        levels.clear();
        levels.extend(self.base_emotions.iter().map(|b| (b.clone(), 0)));

        let components = self.components_cache.get_mut();
        components.clear();
        components.extend(self.base_emotions.iter().map(|b| (b.clone(), vec![b.clone()])));

        self.ratio_cache.get_mut().clear();
        self.cycles.clear();
        self.finalized = false;
    }

    fn update_node_properties(&mut self, emotion: &str) {
        let components = self.get_base_components(emotion);
        let level = self.get_level(emotion);
        if let Some(node) = self.nodes.get_mut(emotion) {
            node.base_components = components;
            node.level = Some(level);
        }
    }

    // -----------------------------------------------------------------------
    // Finalize
    // -----------------------------------------------------------------------

    /// Recompute every node's level and base components from scratch.
    ///
    /// Levels come from one breadth-first expansion out of the base layer
    /// (see `bfs_levels`); nodes it never reaches get [`UNREACHABLE_LEVEL`]. Base components are
    /// then computed in ascending level order so each node mostly reuses its
    /// parents' finished sets. Directed cycles are detected and kept for
    /// [`Self::cycles`]. Calling this twice yields identical results.
    pub fn finalize(&mut self) {
        let _span = tracing::debug_span!(spans::FINALIZE).entered();
        self.invalidate();

        let levels: HashMap<String, u32> = self
            .bfs_levels()
            .into_iter()
            .map(|(name, level)| (name.to_string(), level))
            .collect();

        let mut by_level: BTreeMap<u32, Vec<String>> = BTreeMap::new();
        for name in &self.order {
            let level = levels.get(name).copied().unwrap_or(UNREACHABLE_LEVEL);
            by_level.entry(level).or_default().push(name.clone());
        }

        let mut finished: HashMap<String, Vec<String>> = HashMap::with_capacity(self.order.len());
        for names in by_level.values() {
            for name in names {
                let components = if self.base_set.contains(name) {
                    vec![name.clone()]
                } else {
                    let mut set = BTreeSet::new();
                    for key in self.parents.get(name).into_iter().flatten() {
                        for parent in [key.first(), key.second()] {
                            match finished.get(parent) {
                                Some(done) => set.extend(done.iter().cloned()),
                                None => set.extend(self.compute_base_components(parent)),
                            }
                        }
                    }
                    set.into_iter().collect()
                };
                finished.insert(name.clone(), components);
            }
        }

        for (level, names) in &by_level {
            for name in names {
                if let Some(node) = self.nodes.get_mut(name) {
                    node.level = Some(*level);
                    node.base_components = finished.get(name).cloned().unwrap_or_default();
                }
            }
        }

        let level_cache = self.level_cache.get_mut();
        for (level, names) in &by_level {
            level_cache.extend(names.iter().map(|name| (name.clone(), *level)));
        }
        self.components_cache.get_mut().extend(finished);

        self.cycles = self.detect_cycles();
        self.finalized = true;

        debug!(
            nodes = self.order.len(),
            rules = self.combinations.len(),
            max_level = by_level.keys().filter(|l| **l < UNREACHABLE_LEVEL).max().copied().unwrap_or(0),
            unreachable = by_level.get(&UNREACHABLE_LEVEL).map_or(0, Vec::len),
            cycles = self.cycles.len(),
            "Combination graph finalized"
        );
    }

    /// Breadth-first levels of every node reachable from the base layer.
    ///
    /// A child is reached through a pair only once both parents have been
    /// dequeued. The queue is in non-decreasing level order, so the first
    /// time a child is reached gives `min over pairs of 1 + max(parents)`.
    fn bfs_levels(&self) -> HashMap<&str, u32> {
        let mut levels: HashMap<&str, u32> = HashMap::new();
        let mut expanded: HashSet<&str> = HashSet::new();
        let mut queue = VecDeque::new();
        for base in &self.base_emotions {
            levels.insert(base.as_str(), 0);
            queue.push_back((base.as_str(), 0));
        }

        while let Some((current, level)) = queue.pop_front() {
            expanded.insert(current);
            for key in self.participants.get(current).into_iter().flatten() {
                let partner = if key.first() == current { key.second() } else { key.first() };
                if !expanded.contains(partner) {
                    continue;
                }
                if let Some(child) = self.combinations.get(key) {
                    if !levels.contains_key(child.as_str()) {
                        levels.insert(child.as_str(), level + 1);
                        queue.push_back((child.as_str(), level + 1));
                    }
                }
            }
        }
        levels
    }

    /// Every directed cycle closed by a back edge, as the node sequence
    /// from the re-entered node to the node whose child closes the loop.
    fn detect_cycles(&self) -> Vec<Vec<String>> {
        let mut marks = HashMap::new();
        let mut stack = Vec::new();
        let mut cycles = Vec::new();
        for name in &self.order {
            if !marks.contains_key(name.as_str()) {
                self.visit_for_cycles(name, &mut marks, &mut stack, &mut cycles);
            }
        }
        cycles
    }

    fn visit_for_cycles<'a>(
        &'a self,
        node: &'a str,
        marks: &mut HashMap<&'a str, Mark>,
        stack: &mut Vec<&'a str>,
        cycles: &mut Vec<Vec<String>>,
    ) {
        marks.insert(node, Mark::Active);
        stack.push(node);
        for child in self.get_children(node) {
            match marks.get(child).copied() {
                Some(Mark::Active) => {
                    if let Some(start) = stack.iter().rposition(|n| *n == child) {
                        cycles.push(stack[start..].iter().map(|n| (*n).to_string()).collect());
                    }
                }
                Some(Mark::Done) => {}
                None => self.visit_for_cycles(child, marks, stack, cycles),
            }
        }
        stack.pop();
        marks.insert(node, Mark::Done);
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Result of combining two emotions, in either order.
    ///
    /// Self-combination always yields `None`.
    #[must_use]
    pub fn get_combination(&self, emotion_a: &str, emotion_b: &str) -> Option<&str> {
        if emotion_a == emotion_b {
            return None;
        }
        self.combinations
            .get(&PairKey::new(emotion_a, emotion_b))
            .map(String::as_str)
    }

    /// Child recorded for a normalized pair, self-pairs included.
    #[must_use]
    pub fn rule_for(&self, key: &PairKey) -> Option<&str> {
        self.combinations.get(key).map(String::as_str)
    }

    /// Every parent pair producing `emotion`, in insertion order.
    #[must_use]
    pub fn get_parents(&self, emotion: &str) -> Vec<(&str, &str)> {
        self.parent_keys(emotion)
            .iter()
            .map(|key| (key.first(), key.second()))
            .collect()
    }

    /// Normalized parent pairs producing `emotion`.
    #[must_use]
    pub fn parent_keys(&self, emotion: &str) -> &[PairKey] {
        self.parents.get(emotion).map(Vec::as_slice).unwrap_or_default()
    }

    /// Distinct children obtainable by combining `emotion` with any other
    /// single emotion.
    #[must_use]
    pub fn get_children(&self, emotion: &str) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.participants
            .get(emotion)
            .into_iter()
            .flatten()
            .filter_map(|key| self.combinations.get(key))
            .map(String::as_str)
            .filter(|child| seen.insert(*child))
            .collect()
    }

    /// Sorted base emotions that `emotion` is ultimately built from.
    ///
    /// Empty for unknown names and for derived emotions without parents.
    #[must_use]
    pub fn get_base_components(&self, emotion: &str) -> Vec<String> {
        if self.base_set.contains(emotion) {
            return vec![emotion.to_string()];
        }
        if let Some(cached) = self.components_cache.read().get(emotion) {
            return cached.clone();
        }
        let computed = self.compute_base_components(emotion);
        if self.nodes.contains_key(emotion) {
            self.components_cache
                .write()
                .insert(emotion.to_string(), computed.clone());
        }
        computed
    }

    fn compute_base_components(&self, emotion: &str) -> Vec<String> {
        if self.base_set.contains(emotion) {
            return vec![emotion.to_string()];
        }
        let mut components = BTreeSet::new();
        let mut visited = HashSet::new();
        let mut queue = VecDeque::from([emotion]);
        while let Some(current) = queue.pop_front() {
            if !visited.insert(current) {
                continue;
            }
            if self.base_set.contains(current) {
                components.insert(current.to_string());
                continue;
            }
            for key in self.parent_keys(current) {
                for parent in [key.first(), key.second()] {
                    if !visited.contains(parent) {
                        queue.push_back(parent);
                    }
                }
            }
        }
        components.into_iter().collect()
    }

    /// Shortest number of combination steps from the base layer, or
    /// [`UNREACHABLE_LEVEL`] when no path exists. Real levels have no fixed
    /// ceiling; use [`Self::is_reachable`] rather than comparing levels.
    #[must_use]
    pub fn get_level(&self, emotion: &str) -> u32 {
        if self.base_set.contains(emotion) {
            return 0;
        }
        if let Some(level) = self.level_cache.read().get(emotion) {
            return *level;
        }
        let level = self
            .bfs_levels()
            .get(emotion)
            .copied()
            .unwrap_or(UNREACHABLE_LEVEL);
        if self.nodes.contains_key(emotion) {
            self.level_cache.write().insert(emotion.to_string(), level);
        }
        level
    }

    /// Whether `emotion` has a combination path from the base layer.
    #[must_use]
    pub fn is_reachable(&self, emotion: &str) -> bool {
        !is_unreachable(self.get_level(emotion))
    }

    /// Every other known emotion that combines with `emotion`.
    #[must_use]
    pub fn get_combinable_emotions(&self, emotion: &str) -> Vec<&str> {
        self.order
            .iter()
            .map(String::as_str)
            .filter(|other| *other != emotion && self.get_combination(emotion, other).is_some())
            .collect()
    }

    /// Every simple path of child edges from `from` to `to`, endpoints
    /// included.
    #[must_use]
    pub fn get_all_paths(&self, from: &str, to: &str) -> Vec<Vec<String>> {
        let mut paths = Vec::new();
        if let Some((start, _)) = self.nodes.get_key_value(from) {
            let mut path = Vec::new();
            let mut on_path = HashSet::new();
            self.collect_paths(start, to, &mut path, &mut on_path, &mut paths);
        }
        paths
    }

    fn collect_paths<'a>(
        &'a self,
        current: &'a str,
        to: &str,
        path: &mut Vec<&'a str>,
        on_path: &mut HashSet<&'a str>,
        paths: &mut Vec<Vec<String>>,
    ) {
        path.push(current);
        if current == to {
            paths.push(path.iter().map(|n| (*n).to_string()).collect());
        } else {
            on_path.insert(current);
            for child in self.get_children(current) {
                if !on_path.contains(child) {
                    self.collect_paths(child, to, path, on_path, paths);
                }
            }
            on_path.remove(current);
        }
        path.pop();
    }

    /// Fewest-step path from `from` to `to`; the first found on ties.
    #[must_use]
    pub fn get_shortest_path(&self, from: &str, to: &str) -> Option<Vec<String>> {
        self.get_all_paths(from, to).into_iter().min_by_key(Vec::len)
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    /// Base emotions in construction order.
    #[must_use]
    pub fn base_emotions(&self) -> &[String] {
        &self.base_emotions
    }

    /// Whether `emotion` is one of the base emotions.
    #[must_use]
    pub fn is_base(&self, emotion: &str) -> bool {
        self.base_set.contains(emotion)
    }

    /// Every known emotion in insertion order.
    #[must_use]
    pub fn all_emotions(&self) -> &[String] {
        &self.order
    }

    /// Whether `emotion` is a node of the graph.
    #[must_use]
    pub fn has_emotion(&self, emotion: &str) -> bool {
        self.nodes.contains_key(emotion)
    }

    /// Stored node data. Level and components are authoritative only after
    /// [`Self::finalize`] (or an immediate update of that node).
    #[must_use]
    pub fn node(&self, emotion: &str) -> Option<&EmotionNode> {
        self.nodes.get(emotion)
    }

    /// Number of distinct parent pairs with a rule.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.combinations.len()
    }

    /// Whether [`Self::finalize`] ran after the last mutation.
    #[must_use]
    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// Directed cycles found by the last [`Self::finalize`].
    #[must_use]
    pub fn cycles(&self) -> &[Vec<String>] {
        &self.cycles
    }

    /// Depth bound of the weighted ratio traversal.
    #[must_use]
    pub fn max_ratio_depth(&self) -> u32 {
        self.max_ratio_depth
    }

    pub(crate) fn cached_ratios(&self, emotion: &str) -> Option<Vec<BaseRatio>> {
        self.ratio_cache.read().get(emotion).cloned()
    }

    pub(crate) fn store_ratios(&self, emotion: &str, ratios: &[BaseRatio]) {
        if self.nodes.contains_key(emotion) {
            self.ratio_cache
                .write()
                .insert(emotion.to_string(), ratios.to_vec());
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Mark {
    Active,
    Done,
}

fn ensure_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(EmocraftError::InvalidInput(
            "emotion name must not be empty".to_string(),
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
