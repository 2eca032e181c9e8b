use eframe::egui::Vec2;
use tracing::info;

use crate::config::{ConfigUpdate, GraphConfig};
use crate::display::{build_display_graph, limit_display_graph};
use crate::error::RenderError;
use crate::graph::{Graph, Suggestion, suggest_nodes};

use super::simulation::{RenderTarget, Simulation};

/// Owns the raw graph, the configuration and the running layout, and turns
/// navigation, search and configuration edits into rebuilds or live force
/// updates.
#[derive(Debug)]
pub struct LayoutController<R> {
    graph: Graph,
    config: GraphConfig,
    simulation: Simulation<R>,
    root_id: String,
}

impl<R: RenderTarget> LayoutController<R> {
    /// Builds and lays out the first view. The root is the configured root
    /// node, else the first node of the graph.
    pub fn new(graph: Graph, config: GraphConfig, target: R) -> Result<Self, RenderError> {
        let root_id = config
            .root_node
            .clone()
            .or_else(|| graph.first_id().map(str::to_owned))
            .unwrap_or_default();
        let simulation = Simulation::create(&config, target)?;

        let mut controller = Self {
            graph,
            config,
            simulation,
            root_id,
        };
        controller.rebuild_with(true);
        Ok(controller)
    }

    fn rebuild_with(&mut self, first_build: bool) {
        let initial_values = self.simulation.initial_values();
        let built = build_display_graph(&self.root_id, &self.graph, &initial_values, &self.config);
        let view = limit_display_graph(&built, self.config.max_nodes);

        if view.root_id != self.root_id {
            info!(from = %self.root_id, to = %view.root_id, "search re-rooted graph");
            self.root_id = view.root_id.clone();
        }
        self.simulation.apply(&self.config, view, first_build);
    }

    /// Recomputes the display graph from the current root and search,
    /// carrying every node's observed position and pin across.
    pub fn rebuild(&mut self) {
        self.rebuild_with(false);
    }

    pub fn navigate(&mut self, root_id: &str) {
        info!(from = %self.root_id, to = root_id, "navigating");
        self.root_id = root_id.to_owned();
        self.rebuild();
    }

    /// Applies a partial configuration. Search and budget changes rebuild the
    /// graph; everything else is pushed into the live forces.
    pub fn update_config(&mut self, update: &ConfigUpdate) {
        if update.is_empty() {
            return;
        }
        update.apply_to(&mut self.config);
        if update.needs_rebuild() {
            self.rebuild();
        } else {
            self.simulation.update_forces(&self.config, update);
        }
    }

    pub fn set_search(&mut self, query: &str) {
        self.update_config(&ConfigUpdate {
            search_query: Some(query.to_owned()),
            ..ConfigUpdate::default()
        });
    }

    pub fn drag_to(&mut self, id: &str, position: Vec2) -> bool {
        self.simulation.drag_to(&self.config, id, position)
    }

    pub fn unpin(&mut self, id: &str) -> bool {
        self.simulation.unpin(id)
    }

    pub fn pin_root_to_center(&mut self) -> bool {
        self.simulation.pin_root_to_center()
    }

    pub fn step(&mut self) -> bool {
        self.simulation.step()
    }

    pub fn suggestions(&self, limit: usize) -> Vec<Suggestion> {
        suggest_nodes(&self.graph, &self.config.search_query, limit)
    }

    pub fn root_id(&self) -> &str {
        &self.root_id
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    pub fn simulation(&self) -> &Simulation<R> {
        &self.simulation
    }

    pub fn simulation_mut(&mut self) -> &mut Simulation<R> {
        &mut self.simulation
    }
}
