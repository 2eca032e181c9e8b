use crate::config::{ConfigUpdate, GraphConfig};
use crate::display::{DisplayGraph, DisplayNode};
use crate::physics::Lcg;

use super::{Force, nonzero};

pub const LINK_DISTANCE: f32 = 30.0;

#[derive(Clone, Copy, Debug, PartialEq)]
struct Spring {
    source: usize,
    target: usize,
    strength: f32,
    /// Share of the correction taken by the target; the better connected
    /// endpoint moves less.
    bias: f32,
}

/// Pulls linked nodes toward a fixed rest distance.
#[derive(Debug)]
pub struct LinkForce {
    springs: Vec<Spring>,
    distance: f32,
}

impl LinkForce {
    pub fn new() -> Self {
        Self {
            springs: Vec::new(),
            distance: LINK_DISTANCE,
        }
    }

    pub fn strengths(&self) -> impl Iterator<Item = f32> + '_ {
        self.springs.iter().map(|spring| spring.strength)
    }
}

impl Default for LinkForce {
    fn default() -> Self {
        Self::new()
    }
}

impl Force for LinkForce {
    fn name(&self) -> &'static str {
        "link"
    }

    fn initialize(&mut self, graph: &DisplayGraph, config: &GraphConfig) {
        let mut degree = vec![0usize; graph.nodes.len()];
        for link in &graph.links {
            degree[link.source] += 1;
            degree[link.target] += 1;
        }

        let policy = config.policy();
        self.springs = graph
            .links
            .iter()
            .map(|link| {
                let source = degree[link.source] as f32;
                let target = degree[link.target] as f32;
                Spring {
                    source: link.source,
                    target: link.target,
                    strength: policy.link_force_for(link.depth, link.weight, config.link_force_factor),
                    bias: source / (source + target),
                }
            })
            .collect();
    }

    fn tracks(&self, update: &ConfigUpdate) -> bool {
        update.link_force_factor.is_some() || update.preset.is_some()
    }

    fn apply(&mut self, nodes: &mut [DisplayNode], alpha: f32, random: &mut Lcg) {
        for spring in &self.springs {
            if spring.source == spring.target
                || spring.source >= nodes.len()
                || spring.target >= nodes.len()
            {
                continue;
            }

            let source = &nodes[spring.source];
            let target = &nodes[spring.target];
            let mut offset =
                (target.position() + target.velocity()) - (source.position() + source.velocity());
            offset.x = nonzero(offset.x, random);
            offset.y = nonzero(offset.y, random);

            let length = offset.length();
            let correction = offset * ((length - self.distance) / length * alpha * spring.strength);

            let target = &mut nodes[spring.target];
            target.vx -= correction.x * spring.bias;
            target.vy -= correction.y * spring.bias;
            let source = &mut nodes[spring.source];
            source.vx += correction.x * (1.0 - spring.bias);
            source.vy += correction.y * (1.0 - spring.bias);
        }
    }
}
