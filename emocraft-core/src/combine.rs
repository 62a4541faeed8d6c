//! Combining more than two emotions at once.

use crate::graph::CombinationGraph;

/// Fold `emotions` left to right through [`CombinationGraph::get_combination`].
///
/// Returns `None` for fewer than two inputs, when any step has no rule, or
/// when an intermediate or final result equals one of the inputs. The graph
/// may hold rules like `Fear + Disgust → Fear`; this is where they are kept
/// from ever surfacing as a crafted result.
#[must_use]
pub fn combine_multiple<S: AsRef<str>>(graph: &CombinationGraph, emotions: &[S]) -> Option<String> {
    let (first, rest) = emotions.split_first()?;
    if rest.is_empty() {
        return None;
    }
    let is_input = |name: &str| emotions.iter().any(|e| e.as_ref() == name);

    let mut current = first.as_ref();
    for next in rest {
        let result = graph.get_combination(current, next.as_ref())?;
        if is_input(result) {
            return None;
        }
        current = result;
    }
    Some(current.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::GraphBuilder;
    use crate::rules::RuleTable;
    use crate::types::DEFAULT_BASE_EMOTIONS;

    fn graph(rules: &[(&str, &str, &str)]) -> CombinationGraph {
        GraphBuilder::new(DEFAULT_BASE_EMOTIONS)
            .with_rules(RuleTable::from_rules(rules.iter().copied()))
            .build()
            .expect("build succeeds")
            .graph
    }

    #[test]
    fn pair_combines() {
        let g = graph(&[("Joy", "Fear", "Nervous Excitement")]);
        assert_eq!(combine_multiple(&g, &["Joy", "Fear"]).as_deref(), Some("Nervous Excitement"));
        assert_eq!(combine_multiple(&g, &["Fear", "Joy"]).as_deref(), Some("Nervous Excitement"));
    }

    #[test]
    fn too_few_inputs() {
        let g = graph(&[("Joy", "Fear", "Nervous Excitement")]);
        let none: [&str; 0] = [];
        assert_eq!(combine_multiple(&g, &none), None);
        assert_eq!(combine_multiple(&g, &["Joy"]), None);
    }

    #[test]
    fn circular_result_is_rejected() {
        let g = graph(&[("Fear", "Disgust", "Fear")]);
        assert_eq!(g.get_combination("Fear", "Disgust"), Some("Fear"));
        assert_eq!(combine_multiple(&g, &["Fear", "Disgust"]), None);
    }

    #[test]
    fn three_way_fold() {
        let g = graph(&[("Joy", "Anger", "Pride"), ("Pride", "Fear", "Humility")]);
        assert_eq!(combine_multiple(&g, &["Joy", "Anger", "Fear"]).as_deref(), Some("Humility"));
        // Order matters: Joy + Fear has no rule.
        assert_eq!(combine_multiple(&g, &["Joy", "Fear", "Anger"]), None);
    }

    #[test]
    fn intermediate_equal_to_later_input_is_rejected() {
        let g = graph(&[("Joy", "Anger", "Pride"), ("Pride", "Fear", "Humility")]);
        assert_eq!(combine_multiple(&g, &["Joy", "Anger", "Pride"]), None);
    }

    #[test]
    fn self_pair_never_combines() {
        let g = graph(&[("Joy", "Anger", "Pride")]);
        assert_eq!(combine_multiple(&g, &["Joy", "Joy"]), None);
    }
}
