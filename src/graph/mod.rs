mod distance;
mod suggest;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub use distance::{Adjacency, UNCONNECTED_DISTANCE, distance};
pub use suggest::{DEFAULT_SUGGESTION_LIMIT, Suggestion, suggest_nodes};

pub const DEFAULT_WEIGHT: f32 = 0.5;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub weight: Option<f32>,
    #[serde(default)]
    pub context: Option<String>,
}

impl GraphNode {
    pub fn labelled(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            ..Self::default()
        }
    }

    pub fn with_weight(mut self, weight: f32) -> Self {
        self.weight = Some(weight);
        self
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphLink {
    pub source: String,
    pub target: String,
    #[serde(default)]
    pub weight: Option<f32>,
}

impl GraphLink {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            weight: None,
        }
    }

    pub fn with_weight(mut self, weight: f32) -> Self {
        self.weight = Some(weight);
        self
    }
}

/// Raw knowledge graph handed to the layout core.
///
/// Links may name ids that have no entry in `nodes`; those ids are still
/// rendered, as "wanted" nodes.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    #[serde(default)]
    pub nodes: BTreeMap<String, GraphNode>,
    #[serde(default)]
    pub links: Vec<GraphLink>,
}

impl Graph {
    pub fn builder() -> GraphBuilder {
        GraphBuilder::default()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn first_id(&self) -> Option<&str> {
        self.nodes.keys().next().map(String::as_str)
    }

    /// Ids referenced as a node key or a link endpoint, each once, in order of
    /// first appearance (node keys first).
    pub fn referenced_ids(&self) -> Vec<&str> {
        let mut seen = std::collections::HashSet::with_capacity(self.nodes.len());
        let mut ids = Vec::with_capacity(self.nodes.len());
        let endpoints = self
            .links
            .iter()
            .flat_map(|link| [link.source.as_str(), link.target.as_str()]);
        for id in self.nodes.keys().map(String::as_str).chain(endpoints) {
            if seen.insert(id) {
                ids.push(id);
            }
        }
        ids
    }

    /// Deterministic synthetic graph: a ternary tree with a sparse set of
    /// cross links so that some nodes are reachable along several paths.
    pub fn many(count: usize) -> Self {
        let mut builder = Self::builder();
        for index in 0..count {
            let id = format!("node-{index}");
            builder = builder.node(
                id.clone(),
                GraphNode::labelled(format!("Node {index}"))
                    .with_weight(1.0 - (index % 5) as f32 * 0.15),
            );
            if index > 0 {
                builder = builder.to([format!("node-{}", (index - 1) / 3)]);
            }
            if index > 6 && index % 7 == 0 {
                builder = builder.to([format!("node-{}", index / 2)]);
            }
        }
        builder.build()
    }
}

/// Fluent graph construction: `id` declares a node and makes it current,
/// `to` links the current node to each target.
#[derive(Default)]
pub struct GraphBuilder {
    graph: Graph,
    current: Option<String>,
}

impl GraphBuilder {
    pub fn id(self, id: impl Into<String>) -> Self {
        self.node(id, GraphNode::default())
    }

    pub fn node(mut self, id: impl Into<String>, node: GraphNode) -> Self {
        let id = id.into();
        self.graph.nodes.insert(id.clone(), node);
        self.current = Some(id);
        self
    }

    pub fn to<I, S>(mut self, targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if let Some(source) = &self.current {
            for target in targets {
                self.graph.links.push(GraphLink::new(source.clone(), target));
            }
        }
        self
    }

    pub fn link(mut self, link: GraphLink) -> Self {
        self.graph.links.push(link);
        self
    }

    pub fn build(self) -> Graph {
        self.graph
    }
}

/// Resolves a composite `name + fragment` id when the graph knows it, falling
/// back to the plain name.
pub fn item_name(graph: &Graph, name: &str, fragment: &str) -> String {
    let composite = format!("{name}{fragment}");
    if graph.contains(&composite) {
        composite
    } else {
        name.to_owned()
    }
}
