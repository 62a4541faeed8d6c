//! Property-Based Tests for the Combination Graph
//!
//! Uses `proptest` to check the graph invariants over random rule tables:
//! duplicates, self-pairs, cycles and unreachable islands included.

use proptest::prelude::*;

use emocraft_core::builder::GraphBuilder;
use emocraft_core::combine::combine_multiple;
use emocraft_core::ratios::compute_base_ratios;
use emocraft_core::rules::RuleTable;
use emocraft_core::types::{BaseRatio, UNREACHABLE_LEVEL};
use emocraft_core::CombinationGraph;

const BASES: [&str; 3] = ["Joy", "Fear", "Anger"];
const NAMES: [&str; 8] = ["Joy", "Fear", "Anger", "Hope", "Dread", "Pride", "Awe", "Envy"];

// ---------------------------------------------------------------------------
// Strategy helpers
// ---------------------------------------------------------------------------

fn arb_rules() -> impl Strategy<Value = Vec<(usize, usize, usize)>> {
    prop::collection::vec((0..NAMES.len(), 0..NAMES.len(), 0..NAMES.len()), 0..24)
}

fn build(rules: &[(usize, usize, usize)]) -> CombinationGraph {
    let table = RuleTable::from_rules(rules.iter().map(|&(a, b, c)| (NAMES[a], NAMES[b], NAMES[c])));
    GraphBuilder::new(BASES)
        .with_rules(table)
        .build()
        .expect("base list is valid")
        .graph
}

// ---------------------------------------------------------------------------
// Rule lookup
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn combination_is_commutative(rules in arb_rules()) {
        let graph = build(&rules);
        for a in NAMES {
            for b in NAMES {
                prop_assert_eq!(graph.get_combination(a, b), graph.get_combination(b, a));
            }
        }
    }

    #[test]
    fn nothing_combines_with_itself(rules in arb_rules()) {
        let graph = build(&rules);
        for a in NAMES {
            prop_assert_eq!(graph.get_combination(a, a), None);
        }
    }

    #[test]
    fn last_rule_for_a_pair_wins(rules in arb_rules()) {
        let graph = build(&rules);
        let mut expected = std::collections::HashMap::new();
        for &(a, b, c) in &rules {
            if a == b && b == c {
                continue;
            }
            let key = if NAMES[a] <= NAMES[b] { (NAMES[a], NAMES[b]) } else { (NAMES[b], NAMES[a]) };
            expected.insert(key, NAMES[c]);
        }
        for ((a, b), child) in expected {
            if a != b {
                prop_assert_eq!(graph.get_combination(a, b), Some(child));
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Levels and components
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn bases_are_pure_level_zero(rules in arb_rules()) {
        let graph = build(&rules);
        for base in BASES {
            prop_assert_eq!(graph.get_level(base), 0);
            prop_assert_eq!(graph.get_base_components(base), vec![base.to_string()]);
            prop_assert_eq!(compute_base_ratios(&graph, base), vec![BaseRatio::new(base, 1.0)]);
        }
    }

    #[test]
    fn child_level_is_bounded_by_its_parents(rules in arb_rules()) {
        let graph = build(&rules);
        for a in NAMES {
            for b in NAMES {
                if let Some(child) = graph.get_combination(a, b) {
                    if graph.is_base(child) {
                        continue;
                    }
                    let bound = graph.get_level(a).max(graph.get_level(b)).saturating_add(1);
                    prop_assert!(graph.get_level(child) <= bound);
                }
            }
        }
    }

    #[test]
    fn children_contain_parent_components(rules in arb_rules()) {
        let graph = build(&rules);
        for a in NAMES {
            for b in NAMES {
                let Some(child) = graph.get_combination(a, b) else { continue };
                if graph.is_base(child) {
                    continue;
                }
                let components = graph.get_base_components(child);
                for parent in [a, b] {
                    for base in graph.get_base_components(parent) {
                        prop_assert!(components.contains(&base), "{} lacks {}", child, base);
                    }
                }
            }
        }
    }

    #[test]
    fn finalize_is_idempotent(rules in arb_rules()) {
        let mut graph = build(&rules);
        let snapshot = |g: &CombinationGraph| -> Vec<(String, u32, Vec<String>)> {
            g.all_emotions()
                .iter()
                .map(|e| (e.clone(), g.get_level(e), g.get_base_components(e)))
                .collect()
        };
        let before = snapshot(&graph);
        let cycles = graph.cycles().to_vec();
        graph.finalize();
        prop_assert_eq!(snapshot(&graph), before);
        prop_assert_eq!(graph.cycles().to_vec(), cycles);
    }

    #[test]
    fn reachable_emotions_have_components(rules in arb_rules()) {
        let graph = build(&rules);
        for emotion in graph.all_emotions() {
            if graph.is_reachable(emotion) {
                prop_assert!(graph.get_level(emotion) < UNREACHABLE_LEVEL);
                prop_assert!(!graph.get_base_components(emotion).is_empty(), "{} has no components", emotion);
            } else {
                prop_assert_eq!(graph.get_level(emotion), UNREACHABLE_LEVEL);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Deep chains: real levels are not bounded by any small constant
// ---------------------------------------------------------------------------

fn chain_rules(length: usize) -> RuleTable {
    RuleTable::from_rules((1..=length).map(|i| {
        let previous = if i == 1 { "Fear".to_string() } else { format!("Link{}", i - 1) };
        (previous, "Joy".to_string(), format!("Link{i}"))
    }))
}

proptest! {
    #[test]
    fn chain_levels_match_their_depth(length in 1usize..40) {
        let graph = GraphBuilder::new(BASES)
            .with_rules(chain_rules(length))
            .build()
            .expect("base list is valid")
            .graph;
        for (depth, i) in (1u32..).zip(1..=length) {
            let name = format!("Link{i}");
            prop_assert_eq!(graph.get_level(&name), depth);
            prop_assert!(graph.is_reachable(&name));
        }
    }
}

#[test]
fn twelve_step_chain_has_no_unreachable_nodes() {
    let out = GraphBuilder::new(BASES)
        .with_rules(chain_rules(12))
        .build()
        .expect("base list is valid");
    assert!(out.report.unreachable.is_empty());
    assert_eq!(out.graph.get_level("Link10"), 10);
    assert_eq!(out.graph.get_level("Link12"), 12);
}

// ---------------------------------------------------------------------------
// Ratios and multi-emotion folds
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn ratios_sum_to_one_over_components(rules in arb_rules()) {
        let graph = build(&rules);
        for emotion in graph.all_emotions() {
            let ratios = compute_base_ratios(&graph, emotion);
            if ratios.is_empty() {
                continue;
            }
            let sum: f64 = ratios.iter().map(|r| r.ratio).sum();
            prop_assert!((sum - 1.0).abs() < 1e-9, "{} sums to {}", emotion, sum);
            let components = graph.get_base_components(emotion);
            for r in &ratios {
                prop_assert!(components.contains(&r.emotion));
                prop_assert!(r.ratio > 0.0);
            }
        }
    }

    #[test]
    fn fold_never_returns_an_input(rules in arb_rules(), picks in prop::collection::vec(0..NAMES.len(), 2..5)) {
        let graph = build(&rules);
        let slots: Vec<&str> = picks.iter().map(|&i| NAMES[i]).collect();
        if let Some(result) = combine_multiple(&graph, &slots) {
            prop_assert!(!slots.contains(&result.as_str()));
        }
    }
}
