mod build;
mod filter;
mod limit;

use std::collections::HashMap;

use eframe::egui::{Vec2, vec2};

pub use build::build_display_graph;
pub use filter::{SearchParams, filter_display_graph_with_root};
pub use limit::limit_display_graph;

/// Absolute values below this are layout noise and are not carried across
/// rebuilds.
pub const KINEMATIC_NOISE_THRESHOLD: f32 = 0.1;

#[derive(Clone, Debug, PartialEq)]
pub struct DisplayNode {
    pub id: String,
    pub label: String,
    pub context: Option<String>,
    pub depth: u32,
    pub value: f32,
    pub wanted: bool,
    pub show_label: bool,
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub vx: f32,
    pub vy: f32,
    pub fx: Option<f32>,
    pub fy: Option<f32>,
}

impl DisplayNode {
    pub fn position(&self) -> Vec2 {
        vec2(self.x.unwrap_or(0.0), self.y.unwrap_or(0.0))
    }

    pub fn velocity(&self) -> Vec2 {
        vec2(self.vx, self.vy)
    }

    pub fn is_placed(&self) -> bool {
        self.x.is_some() && self.y.is_some()
    }

    pub fn is_fixed(&self) -> bool {
        self.fx.is_some() || self.fy.is_some()
    }

    pub fn pin(&mut self, position: Vec2) {
        self.fx = Some(position.x);
        self.fy = Some(position.y);
    }

    pub fn unpin(&mut self) {
        self.fx = None;
        self.fy = None;
    }
}

/// Link between two nodes of the same [`DisplayGraph`], addressed by index.
#[derive(Clone, Debug, PartialEq)]
pub struct DisplayLink {
    pub source: usize,
    pub target: usize,
    pub weight: f32,
    pub value: f32,
    pub depth: u32,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DisplayGraph {
    pub nodes: Vec<DisplayNode>,
    pub links: Vec<DisplayLink>,
    pub root_id: String,
    index_by_id: HashMap<String, usize>,
}

impl DisplayGraph {
    /// Assembles a graph whose link indices already point into `nodes`.
    /// Later duplicates of an id are dropped together with their links.
    pub fn new(nodes: Vec<DisplayNode>, links: Vec<DisplayLink>, root_id: String) -> Self {
        let mut index_by_id = HashMap::with_capacity(nodes.len());
        let mut remap = Vec::with_capacity(nodes.len());
        let mut unique = Vec::with_capacity(nodes.len());
        for node in nodes {
            if index_by_id.contains_key(&node.id) {
                remap.push(None);
                continue;
            }
            index_by_id.insert(node.id.clone(), unique.len());
            remap.push(Some(unique.len()));
            unique.push(node);
        }

        let links = links
            .into_iter()
            .filter_map(|link| {
                let source = remap.get(link.source).copied().flatten()?;
                let target = remap.get(link.target).copied().flatten()?;
                Some(DisplayLink {
                    source,
                    target,
                    ..link
                })
            })
            .collect();

        Self {
            nodes: unique,
            links,
            root_id,
            index_by_id,
        }
    }

    pub fn empty(root_id: impl Into<String>) -> Self {
        Self::new(Vec::new(), Vec::new(), root_id.into())
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index_by_id.get(id).copied()
    }

    pub fn node(&self, id: &str) -> Option<&DisplayNode> {
        self.index_of(id).map(|index| &self.nodes[index])
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut DisplayNode> {
        self.index_of(id).map(|index| &mut self.nodes[index])
    }

    pub fn root_index(&self) -> Option<usize> {
        self.index_of(&self.root_id)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn link_endpoints(&self, link: &DisplayLink) -> (&DisplayNode, &DisplayNode) {
        (&self.nodes[link.source], &self.nodes[link.target])
    }

    /// Keeps the nodes accepted by `keep`, in order, and the links between
    /// them.
    pub fn retain_nodes(&self, root_id: String, mut keep: impl FnMut(&DisplayNode) -> bool) -> Self {
        let mut remap = vec![None; self.nodes.len()];
        let mut nodes = Vec::new();
        for (index, node) in self.nodes.iter().enumerate() {
            if keep(node) {
                remap[index] = Some(nodes.len());
                nodes.push(node.clone());
            }
        }

        let links = self
            .links
            .iter()
            .filter_map(|link| {
                Some(DisplayLink {
                    source: remap[link.source]?,
                    target: remap[link.target]?,
                    ..link.clone()
                })
            })
            .collect();

        Self::new(nodes, links, root_id)
    }

    /// Observed kinematic state of every node, noise removed.
    pub fn initial_values(&self) -> InitialValueMap {
        self.nodes
            .iter()
            .filter_map(|node| {
                let observed = NodeKinematics::observed(node);
                (!observed.is_empty()).then(|| (node.id.clone(), observed))
            })
            .collect()
    }
}

/// Previously observed kinematic state of one node.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct NodeKinematics {
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub vx: Option<f32>,
    pub vy: Option<f32>,
    pub fx: Option<f32>,
    pub fy: Option<f32>,
}

fn significant(value: Option<f32>) -> Option<f32> {
    value.filter(|value| value.is_finite() && value.abs() >= KINEMATIC_NOISE_THRESHOLD)
}

impl NodeKinematics {
    pub fn at(x: f32, y: f32) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Self::default()
        }
    }

    pub fn observed(node: &DisplayNode) -> Self {
        Self {
            x: significant(node.x),
            y: significant(node.y),
            vx: significant(Some(node.vx)),
            vy: significant(Some(node.vy)),
            fx: significant(node.fx),
            fy: significant(node.fy),
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Overwrites the node fields this record carries.
    pub fn merge_into(&self, node: &mut DisplayNode) {
        if let Some(x) = self.x {
            node.x = Some(x);
        }
        if let Some(y) = self.y {
            node.y = Some(y);
        }
        if let Some(vx) = self.vx {
            node.vx = vx;
        }
        if let Some(vy) = self.vy {
            node.vy = vy;
        }
        if let Some(fx) = self.fx {
            node.fx = Some(fx);
        }
        if let Some(fy) = self.fy {
            node.fy = Some(fy);
        }
    }
}

pub type InitialValueMap = HashMap<String, NodeKinematics>;
