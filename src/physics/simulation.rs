use std::f32::consts::PI;

use eframe::egui::{Vec2, vec2};
use tracing::{info, trace};

use crate::config::{ConfigUpdate, GraphConfig};
use crate::display::{DisplayGraph, DisplayNode, InitialValueMap};
use crate::error::RenderError;

use super::Lcg;
use super::forces::{
    CenterForce, CollideForce, Force, LabelCollideForce, LinkForce, ManyBodyForce,
};

/// Ticks run synchronously on the very first build so the initial layout is
/// not shown mid-explosion.
pub const FIRST_BUILD_TICKS: usize = 100;
/// Energy given back to the layout on any disturbance.
pub const RESTART_ALPHA: f32 = 0.3;

const INITIAL_RADIUS: f32 = 10.0;

/// Receives the node set after every tick. The offset maps world space, where
/// the root sits at the origin, into the viewport.
pub trait RenderTarget {
    fn on_tick(&mut self, graph: &DisplayGraph, offset: Vec2);
}

impl<F> RenderTarget for F
where
    F: FnMut(&DisplayGraph, Vec2),
{
    fn on_tick(&mut self, graph: &DisplayGraph, offset: Vec2) {
        self(graph, offset);
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimulationPhase {
    /// Created, no tick taken yet.
    Built,
    Settling,
    /// Energy fell below `alpha_min`; idle until disturbed.
    Settled,
    /// Energy was just raised by an interaction or a rebuild.
    Disturbed,
}

impl SimulationPhase {
    pub fn is_active(self) -> bool {
        !matches!(self, Self::Settled)
    }
}

/// Force-directed layout over one [`DisplayGraph`] at a time.
#[derive(Debug)]
pub struct Simulation<R> {
    graph: DisplayGraph,
    forces: Vec<Box<dyn Force>>,
    alpha: f32,
    alpha_min: f32,
    alpha_decay: f32,
    alpha_target: f32,
    velocity_decay: f32,
    phase: SimulationPhase,
    random: Lcg,
    target: R,
    offset: Vec2,
    ticks: u64,
}

fn check_viewport(config: &GraphConfig) -> Result<(), RenderError> {
    let drawable = |extent: f32| extent.is_finite() && extent > 0.0;
    if drawable(config.view_width) && drawable(config.view_height) {
        Ok(())
    } else {
        Err(RenderError::EmptyViewport {
            width: config.view_width,
            height: config.view_height,
        })
    }
}

/// Phyllotaxis spiral, so fresh nodes start spread out and distinct.
fn initial_position(index: usize) -> Vec2 {
    let radius = INITIAL_RADIUS * (0.5 + index as f32).sqrt();
    let angle = index as f32 * PI * (3.0 - 5.0_f32.sqrt());
    vec2(radius * angle.cos(), radius * angle.sin())
}

fn place_node(node: &mut DisplayNode, index: usize) {
    if let Some(fx) = node.fx {
        node.x = Some(fx);
    }
    if let Some(fy) = node.fy {
        node.y = Some(fy);
    }
    if !node.is_placed() {
        let position = initial_position(index);
        node.x = Some(node.x.unwrap_or(position.x));
        node.y = Some(node.y.unwrap_or(position.y));
    }
    if !node.vx.is_finite() {
        node.vx = 0.0;
    }
    if !node.vy.is_finite() {
        node.vy = 0.0;
    }
}

fn integrate(node: &mut DisplayNode, retained: f32) {
    match node.fx {
        Some(fx) => {
            node.x = Some(fx);
            node.vx = 0.0;
        }
        None => {
            node.vx *= retained;
            node.x = Some(node.x.unwrap_or(0.0) + node.vx);
        }
    }
    match node.fy {
        Some(fy) => {
            node.y = Some(fy);
            node.vy = 0.0;
        }
        None => {
            node.vy *= retained;
            node.y = Some(node.y.unwrap_or(0.0) + node.vy);
        }
    }
}

impl<R: RenderTarget> Simulation<R> {
    /// Wires the forces up against `target`. Fails only when the target has
    /// nothing to draw on.
    pub fn create(config: &GraphConfig, target: R) -> Result<Self, RenderError> {
        check_viewport(config)?;

        let forces: Vec<Box<dyn Force>> = vec![
            Box::new(ManyBodyForce::default()),
            Box::new(CollideForce::new()),
            Box::new(
                LabelCollideForce::new(config.label_box, config.label_collide_strength)
                    .with_iterations(config.label_collide_iterations),
            ),
            Box::new(CenterForce::default()),
            Box::new(LinkForce::new()),
        ];

        Ok(Self {
            graph: DisplayGraph::default(),
            forces,
            alpha: 1.0,
            alpha_min: config.alpha_min,
            alpha_decay: config.alpha_decay,
            alpha_target: 0.0,
            velocity_decay: config.velocity_decay,
            phase: SimulationPhase::Built,
            random: Lcg::default(),
            target,
            offset: config.view_offset(),
            ticks: 0,
        })
    }

    /// Swaps in a new node set. Nodes keep whatever position and velocity
    /// they arrive with; unplaced ones are spread on a spiral.
    pub fn apply(&mut self, config: &GraphConfig, graph: DisplayGraph, first_build: bool) {
        self.graph = graph;
        for (index, node) in self.graph.nodes.iter_mut().enumerate() {
            place_node(node, index);
        }
        self.configure(config);

        if first_build {
            for _ in 0..FIRST_BUILD_TICKS {
                self.tick();
            }
        }

        info!(
            root_id = %self.graph.root_id,
            nodes = self.graph.nodes.len(),
            links = self.graph.links.len(),
            first_build,
            "applied display graph"
        );

        self.disturb(RESTART_ALPHA);
        self.target.on_tick(&self.graph, self.offset);
    }

    /// Pushes a live parameter change into the running layout without
    /// replacing the node set. Only the forces whose parameters `update`
    /// touches are re-initialized; their names are returned.
    pub fn update_forces(
        &mut self,
        config: &GraphConfig,
        update: &ConfigUpdate,
    ) -> Vec<&'static str> {
        self.configure_cooling(config);
        let mut touched = Vec::new();
        for force in &mut self.forces {
            if force.tracks(update) {
                force.initialize(&self.graph, config);
                touched.push(force.name());
            }
        }
        trace!(forces = ?touched, "forces updated");
        self.disturb(RESTART_ALPHA);
        touched
    }

    fn configure_cooling(&mut self, config: &GraphConfig) {
        self.alpha_min = config.alpha_min;
        self.alpha_decay = config.alpha_decay;
        self.velocity_decay = config.velocity_decay;
        self.offset = config.view_offset();
    }

    fn configure(&mut self, config: &GraphConfig) {
        self.configure_cooling(config);
        for force in &mut self.forces {
            force.initialize(&self.graph, config);
        }
    }

    fn tick(&mut self) {
        self.alpha += (self.alpha_target - self.alpha) * self.alpha_decay;
        for force in &mut self.forces {
            force.apply(&mut self.graph.nodes, self.alpha, &mut self.random);
        }

        let retained = 1.0 - self.velocity_decay;
        for node in &mut self.graph.nodes {
            integrate(node, retained);
        }
        self.ticks += 1;
    }

    /// Advances one frame unless settled. Returns whether a tick ran.
    pub fn step(&mut self) -> bool {
        if !self.phase.is_active() {
            return false;
        }

        self.tick();
        self.target.on_tick(&self.graph, self.offset);

        if self.alpha < self.alpha_min {
            self.phase = SimulationPhase::Settled;
            trace!(ticks = self.ticks, alpha = self.alpha, "layout settled");
        } else {
            self.phase = SimulationPhase::Settling;
        }
        true
    }

    /// Runs up to `count` frames, stopping early once settled.
    pub fn step_n(&mut self, count: usize) -> usize {
        (0..count).take_while(|_| self.step()).count()
    }

    /// Raises the energy so the layout moves again.
    pub fn disturb(&mut self, alpha: f32) {
        self.alpha = alpha;
        self.phase = SimulationPhase::Disturbed;
        trace!(alpha, "layout disturbed");
    }

    /// Pins `id` at `position`, clamped into the drag boundary.
    pub fn drag_to(&mut self, config: &GraphConfig, id: &str, position: Vec2) -> bool {
        let Some(node) = self.graph.node_mut(id) else {
            return false;
        };
        node.pin(config.clamp_to_boundary(position));
        self.disturb(RESTART_ALPHA);
        true
    }

    pub fn unpin(&mut self, id: &str) -> bool {
        let Some(node) = self.graph.node_mut(id) else {
            return false;
        };
        node.unpin();
        self.disturb(RESTART_ALPHA);
        true
    }

    /// Fixes the root at the origin and releases every other pinned node.
    pub fn pin_root_to_center(&mut self) -> bool {
        let Some(root) = self.graph.root_index() else {
            return false;
        };
        for (index, node) in self.graph.nodes.iter_mut().enumerate() {
            if index == root {
                node.pin(Vec2::ZERO);
            } else {
                node.unpin();
            }
        }
        self.disturb(RESTART_ALPHA);
        true
    }

    pub fn initial_values(&self) -> InitialValueMap {
        self.graph.initial_values()
    }

    pub fn graph(&self) -> &DisplayGraph {
        &self.graph
    }

    pub fn nodes(&self) -> &[DisplayNode] {
        &self.graph.nodes
    }

    pub fn target(&self) -> &R {
        &self.target
    }

    pub fn target_mut(&mut self) -> &mut R {
        &mut self.target
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn phase(&self) -> SimulationPhase {
        self.phase
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn force_names(&self) -> Vec<&'static str> {
        self.forces.iter().map(|force| force.name()).collect()
    }
}
