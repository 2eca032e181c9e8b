mod center;
mod collide;
mod label;
mod link;
mod many_body;

use std::fmt;

use crate::config::{ConfigUpdate, GraphConfig};
use crate::display::{DisplayGraph, DisplayNode};

use super::Lcg;

pub use center::CenterForce;
pub use collide::CollideForce;
pub use label::LabelCollideForce;
pub use link::LinkForce;
pub use many_body::ManyBodyForce;

/// One term of the simulation. `initialize` runs whenever the node set or the
/// configuration changes; `apply` runs once per tick and only touches
/// velocities.
pub trait Force: fmt::Debug + Send {
    fn name(&self) -> &'static str;

    fn initialize(&mut self, graph: &DisplayGraph, config: &GraphConfig);

    /// Whether a live configuration change touches this force's parameters.
    fn tracks(&self, update: &ConfigUpdate) -> bool;

    fn apply(&mut self, nodes: &mut [DisplayNode], alpha: f32, random: &mut Lcg);
}

/// Offset that replaces an exact zero so coincident nodes still separate.
fn nonzero(value: f32, random: &mut Lcg) -> f32 {
    if value == 0.0 { random.jiggle() } else { value }
}
