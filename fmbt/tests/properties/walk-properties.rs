//! Properties of bounded path enumeration.

use crate::{arbitrary_edges, graph_model, STATES};
use fmbt::{Walkable, Walker};
use proptest::prelude::*;
use std::ops::ControlFlow;

proptest! {
    #[test]
    fn paths_chain_from_the_root(
        edges in arbitrary_edges(),
        root in 0..STATES,
        depth in 0usize..5
    ) {
        let model = graph_model(edges);
        for path in model.paths(&root, depth) {
            prop_assert!(path.validate().is_ok(), "broken path {}", path);
            prop_assert!(path.len() <= depth);
            if let Some(start) = path.start_state() {
                prop_assert_eq!(*start, root);
            }
        }
    }

    #[test]
    fn short_paths_end_in_dead_ends(
        edges in arbitrary_edges(),
        root in 0..STATES,
        depth in 0usize..5
    ) {
        let model = graph_model(edges);
        let paths = model.paths(&root, depth);
        prop_assert!(!paths.is_empty());
        for path in &paths {
            if path.len() < depth {
                let end = path.end_state().copied().unwrap_or(root);
                prop_assert!(
                    model.steps_from(&end).is_empty(),
                    "{} stops early at {}",
                    path,
                    end
                );
            }
        }
    }

    #[test]
    fn streaming_and_visiting_agree(
        edges in arbitrary_edges(),
        root in 0..STATES,
        depth in 0usize..5
    ) {
        let model = graph_model(edges);
        let walker = Walker::new(&model);

        let mut visited = Vec::new();
        walker.visit_paths(&root, depth, |view| {
            visited.push(view.iter().map(|step| step.to_string()).collect::<Vec<_>>());
            ControlFlow::<()>::Continue(())
        });
        let streamed: Vec<Vec<String>> = walker
            .iter_paths(&root, depth)
            .map(|path| path.iter().map(|step| step.to_string()).collect())
            .collect();

        prop_assert_eq!(&visited, &streamed);
        prop_assert_eq!(walker.count_paths(&root, depth), visited.len());
    }

    #[test]
    fn breaking_stops_the_walk(
        edges in arbitrary_edges(),
        root in 0..STATES,
        depth in 1usize..5,
        limit in 1usize..6
    ) {
        let model = graph_model(edges);
        let walker = Walker::new(&model);
        let total = walker.count_paths(&root, depth);

        let mut visits = 0;
        let stopped = walker.visit_paths(&root, depth, |_| {
            visits += 1;
            if visits == limit {
                ControlFlow::Break(visits)
            } else {
                ControlFlow::Continue(())
            }
        });

        prop_assert_eq!(visits, limit.min(total));
        prop_assert_eq!(stopped.is_some(), total >= limit);
    }
}
