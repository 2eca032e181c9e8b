use std::collections::{HashMap, HashSet, VecDeque};

use super::Graph;

/// Depth reported for ids with no path to the root. Larger than any real path
/// length in graphs this viewer is meant for.
pub const UNCONNECTED_DISTANCE: u32 = 999;

/// Undirected projection of a graph's links.
pub struct Adjacency<'a> {
    graph: &'a Graph,
    neighbors: HashMap<&'a str, Vec<&'a str>>,
}

impl<'a> Adjacency<'a> {
    pub fn new(graph: &'a Graph) -> Self {
        let mut neighbors: HashMap<&str, Vec<&str>> = HashMap::with_capacity(graph.nodes.len());
        for id in graph.nodes.keys() {
            neighbors.entry(id.as_str()).or_default();
        }
        for link in &graph.links {
            neighbors
                .entry(link.source.as_str())
                .or_default()
                .push(link.target.as_str());
            neighbors
                .entry(link.target.as_str())
                .or_default()
                .push(link.source.as_str());
        }
        Self { graph, neighbors }
    }

    pub fn distance(&self, source_id: &str, target_id: &str) -> u32 {
        if source_id == target_id {
            return 0;
        }
        if !self.graph.contains(source_id) || !self.graph.contains(target_id) {
            return UNCONNECTED_DISTANCE;
        }

        let mut queue = VecDeque::from([(source_id, 0u32)]);
        let mut visited = HashSet::from([source_id]);

        while let Some((current, depth)) = queue.pop_front() {
            if current == target_id {
                return depth;
            }

            let Some(next_ids) = self.neighbors.get(current) else {
                continue;
            };
            for &next in next_ids {
                if visited.insert(next) {
                    queue.push_back((next, depth + 1));
                }
            }
        }

        UNCONNECTED_DISTANCE
    }

    /// Distance from `root_id` to every referenced id, in one traversal.
    ///
    /// Agrees with [`Adjacency::distance`] for every id: ids without a node
    /// record are unconnected even when a link reaches them.
    pub fn depths_from(&self, root_id: &str) -> HashMap<&'a str, u32> {
        let mut depths: HashMap<&str, u32> = self
            .neighbors
            .keys()
            .map(|&id| (id, UNCONNECTED_DISTANCE))
            .collect();

        let Some((&root, _)) = self.neighbors.get_key_value(root_id) else {
            return depths;
        };
        depths.insert(root, 0);
        if !self.graph.contains(root) {
            return depths;
        }

        let mut queue = VecDeque::from([(root, 0u32)]);
        let mut visited = HashSet::from([root]);
        while let Some((current, depth)) = queue.pop_front() {
            if self.graph.contains(current) {
                depths.insert(current, depth);
            }
            for &next in &self.neighbors[current] {
                if visited.insert(next) {
                    queue.push_back((next, depth + 1));
                }
            }
        }

        depths
    }
}

/// Breadth-first hop count between two ids, ignoring link direction.
pub fn distance(graph: &Graph, source_id: &str, target_id: &str) -> u32 {
    Adjacency::new(graph).distance(source_id, target_id)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::graph::GraphLink;

    fn tree() -> Graph {
        Graph::builder()
            .id("A")
            .to(["B", "C"])
            .id("B")
            .to(["D"])
            .id("D")
            .id("C")
            .to(["E"])
            .id("E")
            .build()
    }

    #[test]
    fn same_node_is_zero() {
        assert_eq!(distance(&tree(), "A", "A"), 0);
        assert_eq!(distance(&Graph::default(), "X", "X"), 0);
    }

    #[test]
    fn follows_links_in_both_directions() {
        let graph = tree();
        assert_eq!(distance(&graph, "A", "B"), 1);
        assert_eq!(distance(&graph, "A", "C"), 1);
        assert_eq!(distance(&graph, "A", "D"), 2);
        assert_eq!(distance(&graph, "A", "E"), 2);
        assert_eq!(distance(&graph, "B", "E"), 3);
        assert_eq!(distance(&graph, "D", "E"), 4);
        assert_eq!(distance(&graph, "E", "B"), 3);
    }

    #[test]
    fn missing_ids_are_unconnected() {
        let graph = tree();
        assert_eq!(distance(&graph, "X", "A"), UNCONNECTED_DISTANCE);
        assert_eq!(distance(&graph, "A", "X"), UNCONNECTED_DISTANCE);
        assert_eq!(
            distance(&Graph::default(), "A", "B"),
            UNCONNECTED_DISTANCE
        );
    }

    #[test]
    fn disconnected_components_are_unconnected() {
        let graph = Graph::builder()
            .id("A")
            .to(["B"])
            .id("B")
            .id("C")
            .to(["D"])
            .id("D")
            .build();
        assert_eq!(distance(&graph, "A", "C"), UNCONNECTED_DISTANCE);
        assert_eq!(distance(&graph, "B", "D"), UNCONNECTED_DISTANCE);
    }

    #[test]
    fn tolerates_self_links_and_parallel_links() {
        let graph = Graph::builder()
            .id("A")
            .to(["A", "B", "B"])
            .id("B")
            .to(["A"])
            .build();
        assert_eq!(distance(&graph, "A", "B"), 1);
    }

    #[test]
    fn paths_may_pass_through_wanted_ids() {
        let graph = Graph::builder()
            .id("start")
            .id("end")
            .link(GraphLink::new("start", "missing"))
            .link(GraphLink::new("missing", "end"))
            .build();
        assert_eq!(distance(&graph, "start", "end"), 2);
        assert_eq!(distance(&graph, "start", "missing"), UNCONNECTED_DISTANCE);
    }

    #[test]
    fn depths_from_matches_pairwise_distance() {
        let mut graph = tree();
        graph.links.push(GraphLink::new("E", "ghost"));
        graph.nodes.insert("island".to_owned(), Default::default());
        let adjacency = Adjacency::new(&graph);
        let depths = adjacency.depths_from("B");
        for id in graph.referenced_ids() {
            assert_eq!(depths[id], distance(&graph, "B", id), "depth of {id}");
        }
    }

    #[test]
    fn depths_from_unknown_root_leaves_everything_unconnected() {
        let graph = tree();
        let depths = Adjacency::new(&graph).depths_from("nowhere");
        assert!(depths.values().all(|&depth| depth == UNCONNECTED_DISTANCE));
    }

    fn arbitrary_graph() -> impl Strategy<Value = Graph> {
        prop::collection::vec((0u8..12, 0u8..12), 0..30).prop_map(|pairs| {
            let mut builder = Graph::builder();
            for id in 0..10u8 {
                builder = builder.id(format!("n{id}"));
            }
            for (source, target) in pairs {
                builder = builder.link(GraphLink::new(format!("n{source}"), format!("n{target}")));
            }
            builder.build()
        })
    }

    proptest! {
        #[test]
        fn prop_distance_is_symmetric(graph in arbitrary_graph(), a in 0u8..12, b in 0u8..12) {
            let (a, b) = (format!("n{a}"), format!("n{b}"));
            prop_assert_eq!(distance(&graph, &a, &b), distance(&graph, &b, &a));
        }

        #[test]
        fn prop_distance_to_self_is_zero(graph in arbitrary_graph(), a in 0u8..12) {
            let a = format!("n{a}");
            prop_assert_eq!(distance(&graph, &a, &a), 0);
        }

        #[test]
        fn prop_triangle_inequality(
            graph in arbitrary_graph(),
            a in 0u8..10,
            b in 0u8..10,
            c in 0u8..10,
        ) {
            let (a, b, c) = (format!("n{a}"), format!("n{b}"), format!("n{c}"));
            let ab = distance(&graph, &a, &b);
            let bc = distance(&graph, &b, &c);
            let ac = distance(&graph, &a, &c);
            prop_assume!(ab != UNCONNECTED_DISTANCE && bc != UNCONNECTED_DISTANCE);
            prop_assert!(ac <= ab + bc);
        }
    }
}
