use std::collections::HashSet;

use tracing::debug;

use super::DisplayGraph;

/// Caps the graph at `max_nodes`, keeping the root and then the shallowest
/// nodes. Node order is preserved. Zero disables the cap.
pub fn limit_display_graph(graph: &DisplayGraph, max_nodes: usize) -> DisplayGraph {
    if max_nodes == 0 || graph.nodes.len() <= max_nodes {
        return graph.clone();
    }

    let mut ranked = (0..graph.nodes.len()).collect::<Vec<_>>();
    ranked.sort_by_key(|&index| {
        let node = &graph.nodes[index];
        (node.id != graph.root_id, node.depth)
    });
    ranked.truncate(max_nodes);
    let kept = ranked.into_iter().collect::<HashSet<_>>();

    debug!(
        before = graph.nodes.len(),
        after = kept.len(),
        "limited display graph"
    );

    let mut index = 0;
    graph.retain_nodes(graph.root_id.clone(), |_| {
        let keep = kept.contains(&index);
        index += 1;
        keep
    })
}
