use std::collections::HashMap;

use tracing::{debug, warn};

use crate::config::GraphConfig;
use crate::graph::{Adjacency, DEFAULT_WEIGHT, Graph, UNCONNECTED_DISTANCE};

use super::filter::{SearchParams, filter_display_graph_with_root};
use super::{DisplayGraph, DisplayLink, DisplayNode, InitialValueMap};

fn make_display_node(
    id: &str,
    graph: &Graph,
    depth: u32,
    is_root: bool,
    pin_root: bool,
) -> DisplayNode {
    let record = graph.nodes.get(id);
    let weight = record.and_then(|node| node.weight).unwrap_or(DEFAULT_WEIGHT);
    let fixed = (is_root && pin_root).then_some(0.0);

    DisplayNode {
        id: id.to_owned(),
        label: record
            .and_then(|node| node.label.clone())
            .unwrap_or_else(|| id.to_owned()),
        context: record.and_then(|node| node.context.clone()),
        depth,
        value: weight / (1.0 + depth as f32),
        wanted: record.is_none(),
        show_label: true,
        x: None,
        y: None,
        vx: 0.0,
        vy: 0.0,
        fx: fixed,
        fy: fixed,
    }
}

/// Depth-annotated, weighted view of `graph` around `root_id`, seeded with
/// prior kinematic state and narrowed by the configured search.
///
/// Never fails: a root missing from the graph simply leaves every other node
/// unconnected.
pub fn build_display_graph(
    root_id: &str,
    graph: &Graph,
    initial_values: &InitialValueMap,
    config: &GraphConfig,
) -> DisplayGraph {
    if !graph.nodes.is_empty() && !graph.contains(root_id) {
        warn!(root_id, "root is not a graph node, every other node is unconnected");
    }

    let ids = graph.referenced_ids();
    let adjacency = Adjacency::new(graph);
    let depths = adjacency.depths_from(root_id);

    let mut nodes = Vec::with_capacity(ids.len());
    let mut index_by_id = HashMap::with_capacity(ids.len());
    for id in ids {
        let depth = depths.get(id).copied().unwrap_or(UNCONNECTED_DISTANCE);
        let mut node = make_display_node(id, graph, depth, id == root_id, config.pin_root_node);
        if let Some(initial) = initial_values.get(id) {
            initial.merge_into(&mut node);
        }
        index_by_id.insert(id, nodes.len());
        nodes.push(node);
    }

    let links = graph
        .links
        .iter()
        .filter_map(|link| {
            let source = *index_by_id.get(link.source.as_str())?;
            let target = *index_by_id.get(link.target.as_str())?;
            let depth = nodes[source].depth.min(nodes[target].depth);
            let weight = link.weight.unwrap_or(DEFAULT_WEIGHT);
            Some(DisplayLink {
                source,
                target,
                weight,
                value: weight / (1.0 + depth as f32),
                depth,
            })
        })
        .collect::<Vec<_>>();

    debug!(
        root_id,
        nodes = nodes.len(),
        links = links.len(),
        "built display graph"
    );

    let display = DisplayGraph::new(nodes, links, root_id.to_owned());
    filter_display_graph_with_root(&display, &SearchParams::from(config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::NodeKinematics;
    use crate::graph::{GraphLink, GraphNode};

    fn family() -> Graph {
        Graph::builder()
            .node("root", GraphNode::labelled("Root Node").with_weight(1.0))
            .node("child1", GraphNode::labelled("Child 1").with_weight(0.8))
            .node("child2", GraphNode::labelled("Child 2").with_weight(0.6))
            .node("grandchild", GraphNode::labelled("Grandchild").with_weight(0.4))
            .link(GraphLink::new("root", "child1").with_weight(0.9))
            .link(GraphLink::new("root", "child2").with_weight(0.7))
            .link(GraphLink::new("child1", "grandchild").with_weight(0.5))
            .build()
    }

    fn build(root: &str, graph: &Graph) -> DisplayGraph {
        build_display_graph(root, graph, &InitialValueMap::new(), &GraphConfig::default())
    }

    #[test]
    fn single_node_graph() {
        let graph = Graph::builder()
            .node("single", GraphNode::labelled("Single Node"))
            .build();
        let display = build("single", &graph);

        assert_eq!(display.nodes.len(), 1);
        assert!(display.links.is_empty());
        assert_eq!(display.nodes[0].depth, 0);
        assert_eq!(display.nodes[0].value, DEFAULT_WEIGHT);
    }

    #[test]
    fn empty_graph_builds_empty() {
        let display = build("nonexistent", &Graph::default());
        assert!(display.is_empty());
        assert!(display.links.is_empty());
    }

    #[test]
    fn depths_labels_and_values() {
        let display = build("root", &family());

        let root = display.node("root").expect("root node");
        assert_eq!(root.label, "Root Node");
        assert_eq!(root.depth, 0);
        assert_eq!(root.value, 1.0);
        assert_eq!((root.fx, root.fy), (Some(0.0), Some(0.0)));

        let child = display.node("child1").expect("child node");
        assert_eq!(child.depth, 1);
        assert_eq!(child.value, 0.8 / 2.0);
        assert_eq!((child.fx, child.fy), (None, None));

        let grandchild = display.node("grandchild").expect("grandchild node");
        assert_eq!(grandchild.depth, 2);
        assert_eq!(grandchild.value, 0.4 / 3.0);
        assert!(display.nodes.iter().all(|node| !node.wanted && node.show_label));
    }

    #[test]
    fn label_falls_back_to_id() {
        let graph = Graph::builder().id("noLabel").build();
        assert_eq!(build("noLabel", &graph).nodes[0].label, "noLabel");
    }

    #[test]
    fn links_share_depth_and_weight() {
        let display = build("root", &family());
        assert_eq!(display.links.len(), 3);

        for link in &display.links {
            let (source, target) = display.link_endpoints(link);
            assert_eq!(link.depth, source.depth.min(target.depth));
        }

        let first = &display.links[0];
        let (source, target) = display.link_endpoints(first);
        assert_eq!((source.id.as_str(), target.id.as_str()), ("root", "child1"));
        assert_eq!(first.value, 0.9);

        let deep = display
            .links
            .iter()
            .find(|link| display.nodes[link.source].id == "child1")
            .expect("child1 link");
        assert_eq!(deep.depth, 1);
        assert_eq!(deep.value, 0.5 / 2.0);
    }

    #[test]
    fn missing_endpoint_becomes_wanted_node() {
        let graph = Graph::builder()
            .node("start", GraphNode::labelled("Start Node"))
            .node("end", GraphNode::labelled("End Node"))
            .link(GraphLink::new("start", "missing"))
            .link(GraphLink::new("missing", "end"))
            .build();
        let display = build("start", &graph);

        assert_eq!(display.nodes.len(), 3);
        assert_eq!(display.links.len(), 2);
        let missing = display.node("missing").expect("ghost node");
        assert!(missing.wanted);
        assert_eq!(missing.label, "missing");
        assert_eq!(missing.depth, UNCONNECTED_DISTANCE);
        assert!(!display.node("end").expect("end node").wanted);
    }

    #[test]
    fn disconnected_nodes_are_kept_unconnected() {
        let graph = Graph::builder()
            .id("root")
            .to(["connected"])
            .id("connected")
            .id("isolated")
            .build();
        let display = build("root", &graph);

        assert_eq!(display.nodes.len(), 3);
        assert_eq!(display.links.len(), 1);
        let isolated = display.node("isolated").expect("isolated node");
        assert_eq!(isolated.depth, UNCONNECTED_DISTANCE);
        assert!(isolated.value < 0.001);
    }

    #[test]
    fn circular_links_keep_both_links_and_nodes() {
        let graph = Graph::builder()
            .id("node1")
            .to(["node2"])
            .id("node2")
            .to(["node1"])
            .build();
        let display = build("node1", &graph);

        assert_eq!(display.nodes.len(), 2);
        assert_eq!(display.links.len(), 2);
        assert_eq!(display.node("node2").map(|node| node.depth), Some(1));
    }

    #[test]
    fn initial_values_win_over_defaults() {
        let mut initial = InitialValueMap::new();
        initial.insert(
            "child1".to_owned(),
            NodeKinematics {
                fx: Some(150.0),
                fy: Some(250.0),
                ..NodeKinematics::at(100.0, 200.0)
            },
        );
        initial.insert(
            "child2".to_owned(),
            NodeKinematics {
                vx: Some(10.0),
                vy: Some(20.0),
                ..NodeKinematics::default()
            },
        );
        initial.insert("root".to_owned(), NodeKinematics {
            fx: Some(5.0),
            ..NodeKinematics::default()
        });

        let display = build_display_graph("root", &family(), &initial, &GraphConfig::default());

        let child1 = display.node("child1").expect("child1");
        assert_eq!((child1.x, child1.y), (Some(100.0), Some(200.0)));
        assert_eq!((child1.fx, child1.fy), (Some(150.0), Some(250.0)));
        let child2 = display.node("child2").expect("child2");
        assert_eq!((child2.vx, child2.vy), (10.0, 20.0));
        let root = display.node("root").expect("root");
        assert_eq!((root.fx, root.fy), (Some(5.0), Some(0.0)));
    }

    #[test]
    fn unpinned_root_configuration() {
        let mut config = GraphConfig::default();
        config.pin_root_node = false;
        let display = build_display_graph("root", &family(), &InitialValueMap::new(), &config);
        assert!(!display.node("root").expect("root").is_fixed());
    }

    #[test]
    fn unknown_root_is_lenient() {
        let display = build("elsewhere", &family());
        assert_eq!(display.nodes.len(), 4);
        assert!(
            display
                .nodes
                .iter()
                .all(|node| node.depth == UNCONNECTED_DISTANCE && !node.is_fixed())
        );
    }

    #[test]
    fn rebuilding_is_idempotent() {
        let graph = family();
        let first = build("child1", &graph);
        let second = build("child1", &graph);
        assert_eq!(first, second);
    }

    #[test]
    fn applies_configured_search() {
        let mut config = GraphConfig::default();
        config.search_query = "grand".to_owned();
        config.search_depth = 0;
        let display = build_display_graph("root", &family(), &InitialValueMap::new(), &config);

        assert_eq!(display.nodes.len(), 1);
        assert_eq!(display.root_id, "grandchild");
    }
}
