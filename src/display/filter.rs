use std::collections::HashSet;

use tracing::debug;

use crate::config::GraphConfig;

use super::{DisplayGraph, DisplayNode};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchParams {
    pub search_query: String,
    pub search_depth: usize,
}

impl SearchParams {
    pub fn new(search_query: impl Into<String>, search_depth: usize) -> Self {
        Self {
            search_query: search_query.into(),
            search_depth,
        }
    }
}

impl From<&GraphConfig> for SearchParams {
    fn from(config: &GraphConfig) -> Self {
        Self::new(config.search_query.clone(), config.search_depth)
    }
}

fn matches_query(node: &DisplayNode, query: &str) -> bool {
    node.label.to_lowercase().contains(query)
        || node.id.to_lowercase().contains(query)
        || node
            .context
            .as_deref()
            .is_some_and(|context| context.to_lowercase().contains(query))
}

fn matches_exactly(node: &DisplayNode, query: &str) -> bool {
    node.label.to_lowercase() == query || node.id.to_lowercase() == query
}

/// Grows `matched` by up to `depth` link hops, stopping once a hop adds
/// nothing.
fn expand_by_links(graph: &DisplayGraph, matched: HashSet<usize>, depth: usize) -> HashSet<usize> {
    let mut included = matched.clone();
    let mut frontier = matched;

    for _ in 0..depth {
        let mut next = HashSet::new();
        for link in &graph.links {
            if frontier.contains(&link.source) && included.insert(link.target) {
                next.insert(link.target);
            }
            if frontier.contains(&link.target) && included.insert(link.source) {
                next.insert(link.source);
            }
        }
        if next.is_empty() {
            break;
        }
        frontier = next;
    }

    included
}

/// Narrows `graph` to the nodes matching the search query plus their
/// neighbourhood up to the search depth.
///
/// A single exact label or id match, or failing that a single match of any
/// kind, becomes the root of the result. A blank query returns the graph
/// unchanged.
pub fn filter_display_graph_with_root(graph: &DisplayGraph, params: &SearchParams) -> DisplayGraph {
    let query = params.search_query.trim().to_lowercase();
    if query.is_empty() {
        return graph.clone();
    }

    let matched = graph
        .nodes
        .iter()
        .enumerate()
        .filter(|(_, node)| matches_query(node, &query))
        .map(|(index, _)| index)
        .collect::<Vec<_>>();

    let exact = matched
        .iter()
        .filter(|index| matches_exactly(&graph.nodes[**index], &query))
        .collect::<Vec<_>>();

    let suggested_root = match (exact.as_slice(), matched.as_slice()) {
        ([only], _) => Some(graph.nodes[**only].id.clone()),
        (_, [only]) => Some(graph.nodes[*only].id.clone()),
        _ => None,
    };

    let included = expand_by_links(graph, matched.iter().copied().collect(), params.search_depth);
    let root_id = suggested_root.unwrap_or_else(|| graph.root_id.clone());

    debug!(
        query = %query,
        matched = matched.len(),
        included = included.len(),
        root_id = %root_id,
        "filtered display graph"
    );

    let mut index = 0;
    graph.retain_nodes(root_id, |_| {
        let keep = included.contains(&index);
        index += 1;
        keep
    })
}
