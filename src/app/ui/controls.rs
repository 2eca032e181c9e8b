use std::ops::RangeInclusive;

use eframe::egui::{self, Ui};

use crate::config::{ConfigUpdate, LayoutPreset};

use super::super::ViewModel;

fn slider_f32(
    ui: &mut Ui,
    value: &mut f32,
    range: RangeInclusive<f32>,
    text: &str,
    hover: &str,
) -> bool {
    ui.add(
        egui::Slider::new(value, range)
            .text(text)
            .clamping(egui::SliderClamping::Always),
    )
    .on_hover_text(hover)
    .changed()
}

fn slider_usize(
    ui: &mut Ui,
    value: &mut usize,
    range: RangeInclusive<usize>,
    text: &str,
    hover: &str,
) -> bool {
    ui.add(egui::Slider::new(value, range).text(text))
        .on_hover_text(hover)
        .changed()
}

impl ViewModel {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        ui.heading("Layout Controls");
        ui.separator();
        ui.add_space(4.0);

        let config = self.controller.config();
        let mut link_force_factor = config.link_force_factor;
        let mut charge_force_factor = config.charge_force_factor;
        let mut center_force_factor = config.center_force_factor;
        let mut alpha_decay = config.alpha_decay;
        let mut alpha_min = config.alpha_min;
        let mut velocity_decay = config.velocity_decay;
        let mut label_collide_strength = config.label_collide_strength;
        let mut label_collide_iterations = config.label_collide_iterations;
        let mut search_depth = config.search_depth;
        let mut max_nodes = config.max_nodes;
        let mut pin_root_node = config.pin_root_node;
        let mut preset = config.preset;
        let max_nodes_limit = self.controller.graph().node_count().max(config.max_nodes).max(2);

        let mut update = ConfigUpdate::default();

        ui.collapsing("Forces", |ui| {
            if slider_f32(
                ui,
                &mut link_force_factor,
                0.0..=3.0,
                "Link",
                "How strongly linked nodes pull toward their rest distance.",
            ) {
                update.link_force_factor = Some(link_force_factor);
            }
            if slider_f32(
                ui,
                &mut charge_force_factor,
                0.0..=3.0,
                "Charge",
                "How strongly nodes push each other away.",
            ) {
                update.charge_force_factor = Some(charge_force_factor);
            }
            if slider_f32(
                ui,
                &mut center_force_factor,
                0.0..=1.0,
                "Center",
                "Pull toward the middle, scaled by node value.",
            ) {
                update.center_force_factor = Some(center_force_factor);
            }
            if slider_f32(
                ui,
                &mut label_collide_strength,
                0.0..=5.0,
                "Label push",
                "How hard overlapping labels push apart.",
            ) {
                update.label_collide_strength = Some(label_collide_strength);
            }
            if slider_usize(
                ui,
                &mut label_collide_iterations,
                1..=5,
                "Label passes",
                "Label collision passes per tick.",
            ) {
                update.label_collide_iterations = Some(label_collide_iterations);
            }

            egui::ComboBox::from_label("Preset")
                .selected_text(preset.label())
                .show_ui(ui, |ui| {
                    for candidate in [LayoutPreset::Tiered, LayoutPreset::Flat] {
                        if ui
                            .selectable_value(&mut preset, candidate, candidate.label())
                            .changed()
                        {
                            update.preset = Some(preset);
                        }
                    }
                });
        });

        ui.collapsing("Cooling", |ui| {
            if slider_f32(
                ui,
                &mut alpha_decay,
                0.001..=0.2,
                "Alpha decay",
                "How quickly the layout loses energy each tick.",
            ) {
                update.alpha_decay = Some(alpha_decay);
            }
            let alpha_min_changed = ui
                .add(
                    egui::Slider::new(&mut alpha_min, 0.00001..=0.1)
                        .logarithmic(true)
                        .text("Alpha min"),
                )
                .on_hover_text("Energy below which the layout stops.")
                .changed();
            if alpha_min_changed {
                update.alpha_min = Some(alpha_min);
            }
            if slider_f32(
                ui,
                &mut velocity_decay,
                0.0..=1.0,
                "Friction",
                "Share of velocity lost every tick.",
            ) {
                update.velocity_decay = Some(velocity_decay);
            }
        });

        ui.separator();

        if slider_usize(
            ui,
            &mut search_depth,
            0..=6,
            "Search depth",
            "Link hops kept around search matches.",
        ) {
            update.search_depth = Some(search_depth);
        }
        if slider_usize(
            ui,
            &mut max_nodes,
            0..=max_nodes_limit,
            "Max nodes",
            "Node budget after filtering; 0 shows everything.",
        ) {
            update.max_nodes = Some(max_nodes);
        }
        if ui
            .checkbox(&mut pin_root_node, "Pin root on rebuild")
            .on_hover_text("Fix the root at the center whenever the graph is rebuilt.")
            .changed()
        {
            update.pin_root_node = Some(pin_root_node);
        }
        if ui
            .button("Pin root now")
            .on_hover_text("Fix the root at the center and release every other pin.")
            .clicked()
        {
            self.controller.pin_root_to_center();
        }

        ui.separator();

        ui.checkbox(&mut self.show_debug, "Debug overlay")
            .on_hover_text("Show viewport size and force factors over the canvas.");
        ui.checkbox(&mut self.show_quadtree_overlay, "Show quadtree overlay")
            .on_hover_text("Draw the quadtree partitions over the graph canvas.");

        self.controller.update_config(&update);
    }
}
