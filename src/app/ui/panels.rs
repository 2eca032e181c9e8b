use eframe::egui::{self, Align, Context, Layout, Vec2};

use crate::physics::{LayoutController, SimulationPhase};

use super::super::transforms::ScreenTransforms;
use super::super::ViewModel;

fn phase_label(phase: SimulationPhase) -> &'static str {
    match phase {
        SimulationPhase::Built => "built",
        SimulationPhase::Settling => "settling",
        SimulationPhase::Settled => "settled",
        SimulationPhase::Disturbed => "disturbed",
    }
}

impl ViewModel {
    pub(in crate::app) fn new(controller: LayoutController<ScreenTransforms>) -> Self {
        let config = controller.config();
        let search = config.search_query.clone();
        let show_debug = config.debug;

        Self {
            controller,
            search,
            suggestions_open: false,
            highlighted_suggestion: None,
            pan: Vec2::ZERO,
            zoom: 1.0,
            recenter: true,
            dragging: None,
            label_hits: Vec::new(),
            show_debug,
            show_quadtree_overlay: false,
        }
    }

    pub(in crate::app) fn show(&mut self, ctx: &Context) {
        let root_label = self
            .controller
            .simulation()
            .graph()
            .root_index()
            .map(|index| self.controller.simulation().nodes()[index].label.clone())
            .unwrap_or_else(|| self.controller.root_id().to_owned());

        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("linkgraph");
                    ui.separator();
                    ui.label(format!("root: {root_label}"));
                    ui.label(format!("nodes: {}", self.controller.simulation().nodes().len()));
                    ui.label(format!("links: {}", self.controller.simulation().graph().links.len()));
                    if ui.button("Recenter").clicked() {
                        self.recenter = true;
                    }
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        let simulation = self.controller.simulation();
                        ui.label(format!(
                            "{} (alpha {:.4})",
                            phase_label(simulation.phase()),
                            simulation.alpha()
                        ));
                    });
                });
            });

        if self.controller.config().config_panel {
            egui::SidePanel::left("controls")
                .resizable(true)
                .default_width(320.0)
                .show(ctx, |ui| self.draw_controls(ui));
        }

        if self.controller.config().search_panel {
            egui::SidePanel::right("search")
                .resizable(true)
                .default_width(280.0)
                .show(ctx, |ui| self.draw_search(ui));
        }

        egui::CentralPanel::default().show(ctx, |ui| self.draw_graph(ui));
    }
}
