use eframe::egui::{self, Context, Rect, Vec2};
use tracing::error;

use crate::config::GraphConfig;
use crate::graph::Graph;
use crate::physics::LayoutController;

mod graph;
mod render_utils;
mod transforms;
mod ui;

use transforms::ScreenTransforms;

/// eframe shell around a [`LayoutController`]: paints every tick, turns
/// pointer input into drags and navigation, and binds the panels to
/// configuration updates.
pub struct LinkGraphApp {
    state: AppState,
}

enum AppState {
    Ready(Box<ViewModel>),
    Error(String),
}

struct ViewModel {
    controller: LayoutController<ScreenTransforms>,
    search: String,
    suggestions_open: bool,
    highlighted_suggestion: Option<usize>,
    pan: Vec2,
    zoom: f32,
    recenter: bool,
    dragging: Option<String>,
    label_hits: Vec<(String, Rect)>,
    show_debug: bool,
    show_quadtree_overlay: bool,
}

impl LinkGraphApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, graph: Graph, config: GraphConfig) -> Self {
        Self::with_graph(graph, config)
    }

    pub fn with_graph(graph: Graph, config: GraphConfig) -> Self {
        let state = match LayoutController::new(graph, config, ScreenTransforms::default()) {
            Ok(controller) => AppState::Ready(Box::new(ViewModel::new(controller))),
            Err(err) => {
                error!(%err, "layout could not start");
                AppState::Error(err.to_string())
            }
        };
        Self { state }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, AppState::Ready(_))
    }
}

impl eframe::App for LinkGraphApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        match &mut self.state {
            AppState::Ready(model) => model.show(ctx),
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to lay out graph");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                });
            }
        }
    }
}
