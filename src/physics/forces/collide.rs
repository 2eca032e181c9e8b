use eframe::egui::Vec2;

use crate::config::{ConfigUpdate, GraphConfig};
use crate::display::{DisplayGraph, DisplayNode};
use crate::physics::Lcg;
use crate::physics::quadtree::QuadNode;

use super::{Force, nonzero};

/// Keeps node circles from overlapping, judged on where the nodes are about
/// to move this tick.
#[derive(Debug)]
pub struct CollideForce {
    radii: Vec<f32>,
    strength: f32,
    predicted: Vec<Vec2>,
    deltas: Vec<Vec2>,
}

struct CollisionPass<'a> {
    predicted: &'a [Vec2],
    radii: &'a [f32],
    strength: f32,
    max_reach_sq: f32,
    random: &'a mut Lcg,
    deltas: &'a mut [Vec2],
}

impl CollisionPass<'_> {
    fn resolve_pair(&mut self, from: usize, to: usize) {
        let reach = self.radii[from] + self.radii[to];
        let mut offset = self.predicted[from] - self.predicted[to];
        if offset.length_sq() >= reach * reach {
            return;
        }

        offset.x = nonzero(offset.x, self.random);
        offset.y = nonzero(offset.y, self.random);
        let length = offset.length();
        let push = offset * ((reach - length) / length * self.strength);

        let from_sq = self.radii[from] * self.radii[from];
        let to_sq = self.radii[to] * self.radii[to];
        let share = to_sq / (from_sq + to_sq);
        self.deltas[from] += push * share;
        self.deltas[to] -= push * (1.0 - share);
    }

    fn accumulate_pairs(&mut self, node_a: &QuadNode, node_b: &QuadNode, same_node: bool) {
        if node_a.bounds.gap_to(node_b.bounds).length_sq() > self.max_reach_sq {
            return;
        }

        if node_a.is_leaf() && node_b.is_leaf() {
            if same_node {
                for (position, &from) in node_a.indices.iter().enumerate() {
                    for &to in &node_a.indices[position + 1..] {
                        self.resolve_pair(from, to);
                    }
                }
            } else {
                for &from in &node_a.indices {
                    for &to in &node_b.indices {
                        self.resolve_pair(from, to);
                    }
                }
            }
            return;
        }

        if same_node {
            let children = node_a.children().collect::<Vec<_>>();
            for (position, child_a) in children.iter().enumerate() {
                self.accumulate_pairs(child_a, child_a, true);
                for child_b in &children[position + 1..] {
                    self.accumulate_pairs(child_a, child_b, false);
                }
            }
            return;
        }

        let split_a = if node_a.is_leaf() {
            false
        } else if node_b.is_leaf() {
            true
        } else {
            node_a.bounds.half_extent >= node_b.bounds.half_extent
        };

        if split_a {
            for child in node_a.children() {
                self.accumulate_pairs(child, node_b, false);
            }
        } else {
            for child in node_b.children() {
                self.accumulate_pairs(node_a, child, false);
            }
        }
    }
}

impl CollideForce {
    pub fn new() -> Self {
        Self {
            radii: Vec::new(),
            strength: 1.0,
            predicted: Vec::new(),
            deltas: Vec::new(),
        }
    }

    pub fn radii(&self) -> &[f32] {
        &self.radii
    }
}

impl Default for CollideForce {
    fn default() -> Self {
        Self::new()
    }
}

impl Force for CollideForce {
    fn name(&self) -> &'static str {
        "collide"
    }

    fn initialize(&mut self, graph: &DisplayGraph, config: &GraphConfig) {
        let policy = config.policy();
        self.radii = graph
            .nodes
            .iter()
            .map(|node| policy.radius_for(node.depth))
            .collect();
    }

    fn tracks(&self, update: &ConfigUpdate) -> bool {
        update.preset.is_some()
    }

    fn apply(&mut self, nodes: &mut [DisplayNode], _alpha: f32, random: &mut Lcg) {
        if nodes.len() < 2 || self.radii.len() != nodes.len() {
            return;
        }

        self.predicted.clear();
        self.predicted
            .extend(nodes.iter().map(|node| node.position() + node.velocity()));
        self.deltas.clear();
        self.deltas.resize(nodes.len(), Vec2::ZERO);

        let Some(tree) = QuadNode::build(&self.predicted, &[]) else {
            return;
        };
        let max_radius = self.radii.iter().copied().fold(0.0_f32, f32::max);
        let max_reach = max_radius * 2.0;

        let mut pass = CollisionPass {
            predicted: &self.predicted,
            radii: &self.radii,
            strength: self.strength,
            max_reach_sq: max_reach * max_reach,
            random,
            deltas: &mut self.deltas,
        };
        pass.accumulate_pairs(&tree, &tree, true);

        for (node, delta) in nodes.iter_mut().zip(&self.deltas) {
            node.vx += delta.x;
            node.vy += delta.y;
        }
    }
}
