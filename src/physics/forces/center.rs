use crate::config::{ConfigUpdate, GraphConfig};
use crate::display::{DisplayGraph, DisplayNode};
use crate::physics::Lcg;

use super::Force;

/// Draws every node toward the origin on both axes. Strength scales with node
/// value so important nodes hold the middle.
#[derive(Debug, Default)]
pub struct CenterForce {
    strengths: Vec<f32>,
}

impl CenterForce {
    pub fn strengths(&self) -> &[f32] {
        &self.strengths
    }
}

impl Force for CenterForce {
    fn name(&self) -> &'static str {
        "center"
    }

    fn initialize(&mut self, graph: &DisplayGraph, config: &GraphConfig) {
        self.strengths = graph
            .nodes
            .iter()
            .map(|node| node.value * config.center_force_factor)
            .collect();
    }

    fn tracks(&self, update: &ConfigUpdate) -> bool {
        update.center_force_factor.is_some()
    }

    fn apply(&mut self, nodes: &mut [DisplayNode], alpha: f32, _random: &mut Lcg) {
        for (node, strength) in nodes.iter_mut().zip(&self.strengths) {
            let position = node.position();
            node.vx -= position.x * strength * alpha;
            node.vy -= position.y * strength * alpha;
        }
    }
}
