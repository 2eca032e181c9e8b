use eframe::egui::Vec2;

use crate::config::{ConfigUpdate, GraphConfig};
use crate::display::{DisplayGraph, DisplayNode};
use crate::physics::Lcg;
use crate::physics::quadtree::QuadNode;

use super::{Force, nonzero};

const BARNES_HUT_THETA: f32 = 0.9;
const DISTANCE_MIN_SQ: f32 = 1.0;

/// Charge between every pair of nodes, approximated with a Barnes-Hut
/// quadtree. Negative charges repel.
#[derive(Debug, Default)]
pub struct ManyBodyForce {
    charges: Vec<f32>,
    positions: Vec<Vec2>,
}

struct ChargeParams<'a> {
    positions: &'a [Vec2],
    charges: &'a [f32],
    alpha: f32,
    theta_sq: f32,
}

fn scaled_distance_sq(offset: Vec2) -> f32 {
    let distance_sq = offset.length_sq();
    if distance_sq < DISTANCE_MIN_SQ {
        (DISTANCE_MIN_SQ * distance_sq).sqrt()
    } else {
        distance_sq
    }
}

fn accumulate_charge_for_node(
    node: &QuadNode,
    index: usize,
    params: &ChargeParams<'_>,
    random: &mut Lcg,
    velocity: &mut Vec2,
) {
    if node.charge == 0.0 {
        return;
    }

    let point = params.positions[index];
    let side = node.bounds.side_length();
    let mut offset = node.center_of_charge - point;

    let only_self = node.is_leaf() && node.indices == [index];
    if !only_self && side * side / params.theta_sq < offset.length_sq() {
        offset.x = nonzero(offset.x, random);
        offset.y = nonzero(offset.y, random);
        *velocity += offset * (node.charge * params.alpha / scaled_distance_sq(offset));
        return;
    }

    if node.is_leaf() {
        for &other in &node.indices {
            if other == index {
                continue;
            }
            let mut offset = params.positions[other] - point;
            offset.x = nonzero(offset.x, random);
            offset.y = nonzero(offset.y, random);
            *velocity += offset * (params.charges[other] * params.alpha / scaled_distance_sq(offset));
        }
        return;
    }

    for child in node.children() {
        accumulate_charge_for_node(child, index, params, random, velocity);
    }
}

impl ManyBodyForce {
    pub fn charges(&self) -> &[f32] {
        &self.charges
    }
}

impl Force for ManyBodyForce {
    fn name(&self) -> &'static str {
        "charge"
    }

    fn initialize(&mut self, graph: &DisplayGraph, config: &GraphConfig) {
        let policy = config.policy();
        self.charges = graph
            .nodes
            .iter()
            .map(|node| policy.charge_for(node.depth, config.charge_force_factor))
            .collect();
    }

    fn tracks(&self, update: &ConfigUpdate) -> bool {
        update.charge_force_factor.is_some() || update.preset.is_some()
    }

    fn apply(&mut self, nodes: &mut [DisplayNode], alpha: f32, random: &mut Lcg) {
        if nodes.len() < 2 || self.charges.len() != nodes.len() {
            return;
        }

        self.positions.clear();
        self.positions.extend(nodes.iter().map(DisplayNode::position));
        let Some(tree) = QuadNode::build(&self.positions, &self.charges) else {
            return;
        };

        let params = ChargeParams {
            positions: &self.positions,
            charges: &self.charges,
            alpha,
            theta_sq: BARNES_HUT_THETA * BARNES_HUT_THETA,
        };
        for (index, node) in nodes.iter_mut().enumerate() {
            let mut velocity = Vec2::ZERO;
            accumulate_charge_for_node(&tree, index, &params, random, &mut velocity);
            node.vx += velocity.x;
            node.vy += velocity.y;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::tests::node;

    fn placed(id: &str, depth: u32, x: f32, y: f32) -> DisplayNode {
        let mut node = node(id, depth);
        node.x = Some(x);
        node.y = Some(y);
        node
    }

    #[test]
    fn charges_follow_depth_policy() {
        let graph = DisplayGraph::new(
            vec![node("root", 0), node("leaf", 4)],
            Vec::new(),
            "root".to_owned(),
        );
        let mut force = ManyBodyForce::default();
        force.initialize(&graph, &GraphConfig::default());
        assert_eq!(force.charges(), &[-8000.0 * 1.2, -5.0 * 1.2]);
    }

    #[test]
    fn repels_pair_symmetrically() {
        let mut graph = DisplayGraph::new(
            vec![placed("a", 1, -10.0, 0.0), placed("b", 1, 10.0, 0.0)],
            Vec::new(),
            "a".to_owned(),
        );
        let mut force = ManyBodyForce::default();
        force.initialize(&graph, &GraphConfig::default());
        force.apply(&mut graph.nodes, 1.0, &mut Lcg::default());

        assert!(graph.nodes[0].vx < 0.0);
        assert!(graph.nodes[1].vx > 0.0);
        assert!((graph.nodes[0].vx + graph.nodes[1].vx).abs() < 1e-3);
        assert!(graph.nodes[0].vy.abs() < 1e-3);
    }

    #[test]
    fn approximation_stays_close_to_exact_sum() {
        let mut nodes = (0..64)
            .map(|index| {
                let x = (index % 8) as f32 * 12.0;
                let y = (index / 8) as f32 * 12.0;
                placed(&format!("n{index}"), 2, x, y)
            })
            .collect::<Vec<_>>();
        nodes.push(placed("probe", 2, 600.0, 50.0));
        let mut graph = DisplayGraph::new(nodes, Vec::new(), "n0".to_owned());
        let mut force = ManyBodyForce::default();
        force.initialize(&graph, &GraphConfig::default());

        let probe = 64;
        let point = graph.nodes[probe].position();
        let exact = graph
            .nodes
            .iter()
            .enumerate()
            .filter(|(index, _)| *index != probe)
            .fold(Vec2::ZERO, |sum, (index, other)| {
                let offset = other.position() - point;
                sum + offset * (force.charges()[index] / offset.length_sq())
            });

        force.apply(&mut graph.nodes, 1.0, &mut Lcg::default());
        let approximate = graph.nodes[probe].velocity();
        assert!((approximate - exact).length() < exact.length() * 0.2);
    }
}
