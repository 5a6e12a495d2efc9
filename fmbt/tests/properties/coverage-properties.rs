//! Properties of coverage accounting and best path search.

use crate::{arbitrary_criteria, arbitrary_edges, graph_model, STATES};
use fmbt::{Coverer, Criterion, Walkable};
use proptest::prelude::*;

fn coverer_for(criteria: &[Criterion]) -> Coverer<u8> {
    let mut coverer = Coverer::new();
    for criterion in criteria {
        coverer.cover(*criterion).unwrap();
    }
    coverer
}

proptest! {
    #[test]
    fn executing_a_best_path_gains_its_estimate(
        edges in arbitrary_edges(),
        criteria in arbitrary_criteria(),
        root in 0..STATES,
        depth in 1usize..4
    ) {
        let model = graph_model(edges);
        let mut coverer = coverer_for(&criteria);
        let mut state = root;

        for _ in 0..50 {
            let Some((path, stats)) = coverer.best_path(&model, &state, depth) else {
                break;
            };
            prop_assert!(stats.max_increase > 0);
            prop_assert!(stats.first_step <= stats.max_step);
            prop_assert!(stats.first_increase <= stats.max_increase);
            prop_assert!(stats.max_step < path.len());

            let before = coverer.coverage();
            coverer.mark_covered(&path[..=stats.max_step]);
            coverer.update_coverage();
            prop_assert_eq!(coverer.coverage(), before + stats.max_increase);
            state = *path[stats.max_step].end_state();
        }
    }

    #[test]
    fn exhaustion_means_no_path_increases_coverage(
        edges in arbitrary_edges(),
        criteria in arbitrary_criteria(),
        root in 0..STATES,
        depth in 1usize..4
    ) {
        let model = graph_model(edges);
        let mut coverer = coverer_for(&criteria);
        let mut state = root;

        while let Some((path, stats)) = coverer.best_path(&model, &state, depth) {
            coverer.mark_covered(&path[..=stats.first_step]);
            coverer.update_coverage();
            state = *path[stats.first_step].end_state();
        }

        for path in model.paths(&state, depth) {
            prop_assert!(coverer.estimate_increase(&path).is_none(), "{} still increases", path);
        }
    }

    #[test]
    fn coverage_only_grows(
        edges in arbitrary_edges(),
        criteria in arbitrary_criteria(),
        root in 0..STATES
    ) {
        let model = graph_model(edges);
        let mut coverer = coverer_for(&criteria);
        let mut covered = coverer.covered_items();

        let paths = model.paths(&root, 4);
        let longest = paths.iter().max_by_key(|path| path.len()).cloned().unwrap_or_default();
        for step in longest.iter() {
            coverer.mark_covered(std::slice::from_ref(step));
            coverer.update_coverage();
            let now = coverer.covered_items();
            prop_assert!(now.is_superset(&covered));
            covered = now;
        }
    }

    #[test]
    fn updating_twice_changes_nothing(
        edges in arbitrary_edges(),
        criteria in arbitrary_criteria(),
        root in 0..STATES
    ) {
        let model = graph_model(edges);
        let mut coverer = coverer_for(&criteria);
        if let Some(path) = model.paths(&root, 3).into_iter().next() {
            coverer.mark_covered(&path);
        }

        coverer.update_coverage();
        let once = coverer.covered_items();
        coverer.update_coverage();
        prop_assert_eq!(coverer.covered_items(), once);
        prop_assert_eq!(coverer.coverage(), coverer.covered_items().len());
    }
}
