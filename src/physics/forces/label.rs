use eframe::egui::Vec2;

use crate::config::{ConfigUpdate, GraphConfig, LabelBox};
use crate::display::{DisplayGraph, DisplayNode};
use crate::physics::Lcg;
use crate::physics::quadtree::QuadNode;

use super::Force;

/// Horizontal separations count this many times over, so labels, which are
/// far wider than tall, are only pushed apart when nearly stacked.
const HORIZONTAL_SCALE: f32 = 4.0;
const HORIZONTAL_DAMPING: f32 = 0.000_05;

/// Separates overlapping label rectangles, mostly vertically so labels keep
/// their reading order.
#[derive(Debug)]
pub struct LabelCollideForce {
    label_box: LabelBox,
    strength: f32,
    iterations: usize,
    participants: Vec<usize>,
    centers: Vec<Vec2>,
}

struct LabelPass<'a> {
    centers: &'a [Vec2],
    participants: &'a [usize],
    size: Vec2,
    strength: f32,
    nodes: &'a mut [DisplayNode],
}

impl LabelPass<'_> {
    /// `a` and `b` index the participant list; the lower one is the node
    /// being visited.
    fn resolve_pair(&mut self, a: usize, b: usize) {
        let (visited, other) = if a < b { (a, b) } else { (b, a) };
        let between = self.centers[visited] - self.centers[other];
        let x_distance = between.x * HORIZONTAL_SCALE;
        let y_distance = between.y;
        let overlap_x = x_distance.abs() - self.size.x;
        let overlap_y = y_distance.abs() - self.size.y;
        if overlap_x >= 0.0 || overlap_y >= 0.0 {
            return;
        }

        let distance = x_distance.hypot(y_distance);
        if distance == 0.0 {
            return;
        }

        let delta_y = self.strength * y_distance * overlap_y / distance;
        let delta_x = HORIZONTAL_DAMPING * self.strength * x_distance * overlap_x / distance;

        let visited = &mut self.nodes[self.participants[visited]];
        visited.vx -= delta_x / 2.0;
        visited.vy -= delta_y / 2.0;
        let other = &mut self.nodes[self.participants[other]];
        other.vx += delta_x / 2.0;
        other.vy += delta_y / 2.0;
    }

    fn out_of_reach(&self, node_a: &QuadNode, node_b: &QuadNode) -> bool {
        let gap = node_a.bounds.gap_to(node_b.bounds);
        gap.x * HORIZONTAL_SCALE >= self.size.x || gap.y >= self.size.y
    }

    fn accumulate_pairs(&mut self, node_a: &QuadNode, node_b: &QuadNode, same_node: bool) {
        if self.out_of_reach(node_a, node_b) {
            return;
        }

        if node_a.is_leaf() && node_b.is_leaf() {
            if same_node {
                for (position, &a) in node_a.indices.iter().enumerate() {
                    for &b in &node_a.indices[position + 1..] {
                        self.resolve_pair(a, b);
                    }
                }
            } else {
                for &a in &node_a.indices {
                    for &b in &node_b.indices {
                        self.resolve_pair(a, b);
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

        let split_a = !node_a.is_leaf()
            && (node_b.is_leaf() || node_a.bounds.half_extent >= node_b.bounds.half_extent);
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

impl LabelCollideForce {
    pub fn new(label_box: LabelBox, strength: f32) -> Self {
        Self {
            label_box,
            strength,
            iterations: 1,
            participants: Vec::new(),
            centers: Vec::new(),
        }
    }

    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn strength(&self) -> f32 {
        self.strength
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }
}

impl Force for LabelCollideForce {
    fn name(&self) -> &'static str {
        "collideRectangle"
    }

    fn initialize(&mut self, graph: &DisplayGraph, config: &GraphConfig) {
        self.label_box = config.label_box;
        self.strength = config.label_collide_strength;
        self.iterations = config.label_collide_iterations;
        self.participants = graph
            .nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| node.show_label)
            .map(|(index, _)| index)
            .collect();
    }

    fn tracks(&self, update: &ConfigUpdate) -> bool {
        update.label_collide_strength.is_some() || update.label_collide_iterations.is_some()
    }

    fn apply(&mut self, nodes: &mut [DisplayNode], _alpha: f32, _random: &mut Lcg) {
        if self.participants.len() < 2 || self.participants.iter().any(|&index| index >= nodes.len()) {
            return;
        }

        self.centers.clear();
        self.centers.extend(
            self.participants
                .iter()
                .map(|&index| self.label_box.center_for(nodes[index].position())),
        );
        let Some(tree) = QuadNode::build(&self.centers, &[]) else {
            return;
        };

        let mut pass = LabelPass {
            centers: &self.centers,
            participants: &self.participants,
            size: self.label_box.size,
            strength: self.strength,
            nodes,
        };
        for _ in 0..self.iterations {
            pass.accumulate_pairs(&tree, &tree, true);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::tests::node;

    fn labelled_at(id: &str, x: f32, y: f32) -> DisplayNode {
        let mut node = node(id, 1);
        node.x = Some(x);
        node.y = Some(y);
        node
    }

    fn run(nodes: Vec<DisplayNode>, iterations: usize) -> DisplayGraph {
        let mut graph = DisplayGraph::new(nodes, Vec::new(), "a".to_owned());
        let mut config = GraphConfig::default();
        config.label_collide_iterations = iterations;
        let mut force = LabelCollideForce::new(config.label_box, config.label_collide_strength);
        force.initialize(&graph, &config);
        force.apply(&mut graph.nodes, 1.0, &mut Lcg::default());
        graph
    }

    #[test]
    fn stacked_labels_get_opposing_vertical_push() {
        let graph = run(vec![labelled_at("a", 0.0, 0.0), labelled_at("b", 10.0, 20.0)], 1);
        let (a, b) = (&graph.nodes[0], &graph.nodes[1]);

        assert!(a.vy < 0.0);
        assert!(b.vy > 0.0);
        assert!((a.vy + b.vy).abs() < 1e-4);
        assert!(a.vy.abs() > a.vx.abs() * 100.0);
    }

    #[test]
    fn separated_labels_are_untouched() {
        let graph = run(vec![labelled_at("a", 0.0, 0.0), labelled_at("b", 0.0, 300.0)], 1);
        assert!(graph.nodes.iter().all(|node| node.vx == 0.0 && node.vy == 0.0));

        let beside = run(vec![labelled_at("a", 0.0, 0.0), labelled_at("b", 400.0, 0.0)], 1);
        assert!(beside.nodes.iter().all(|node| node.vx == 0.0 && node.vy == 0.0));
    }

    #[test]
    fn hidden_labels_do_not_take_part() {
        let mut hidden = labelled_at("b", 0.0, 20.0);
        hidden.show_label = false;
        let graph = run(vec![labelled_at("a", 0.0, 0.0), hidden], 1);
        assert!(graph.nodes.iter().all(|node| node.vy == 0.0));
    }

    #[test]
    fn iterations_repeat_the_correction() {
        let once = run(vec![labelled_at("a", 0.0, 0.0), labelled_at("b", 0.0, 20.0)], 1);
        let twice = run(vec![labelled_at("a", 0.0, 0.0), labelled_at("b", 0.0, 20.0)], 2);
        assert!((twice.nodes[0].vy - once.nodes[0].vy * 2.0).abs() < 1e-4);
    }

    #[test]
    fn crowded_column_resolves_every_close_pair() {
        let nodes = (0..30)
            .map(|index| labelled_at(&format!("n{index}"), 0.0, index as f32 * 50.0))
            .collect::<Vec<_>>();
        let graph = run(nodes, 1);
        assert!(graph.nodes[0].vy < 0.0);
        assert!(graph.nodes[29].vy > 0.0);
        let total = graph.nodes.iter().map(|node| node.vy).sum::<f32>();
        assert!(total.abs() < 1e-2);
    }
}
