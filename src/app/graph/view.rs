use eframe::egui::{Align2, Color32, FontId, Painter, Pos2, Rect, Sense, Stroke, Ui, vec2};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use crate::physics::quadtree_cells;

use super::super::ViewModel;
use super::super::render_utils::{
    LINK_COLOR, MATCH_COLOR, WANTED_COLOR, blend_color, circle_visible, depth_color, dim_color,
    draw_background, viewport_to_screen,
};
use super::interaction::node_under;

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_ascii_lowercase(), &query.to_ascii_lowercase()))
}

fn label_font_size(depth: u32) -> f32 {
    12.0 + (3 - depth.min(3)) as f32 * 2.0
}

impl ViewModel {
    /// Screen position and radius per node, indexed like the tick transforms.
    pub(in crate::app) fn screen_nodes(&self, rect: Rect) -> Vec<(Pos2, f32)> {
        let policy = self.controller.config().policy();
        let scale = self.zoom.powf(0.40);
        self.controller
            .simulation()
            .target()
            .nodes
            .iter()
            .map(|node| {
                (
                    viewport_to_screen(rect, self.pan, self.zoom, node.translate),
                    (policy.radius_for(node.depth) * scale).clamp(2.0, 46.0),
                )
            })
            .collect()
    }

    fn search_matches(&self) -> Vec<bool> {
        let query = self.controller.config().search_query.trim();
        let nodes = &self.controller.simulation().target().nodes;
        if query.is_empty() {
            return vec![false; nodes.len()];
        }

        let matcher = SkimMatcherV2::default();
        nodes
            .iter()
            .map(|node| {
                fuzzy_match_score(&matcher, &node.label, query).is_some()
                    || fuzzy_match_score(&matcher, &node.id, query).is_some()
            })
            .collect()
    }

    fn draw_quadtree_overlay(&self, painter: &Painter, rect: Rect) {
        let positions = self
            .controller
            .simulation()
            .nodes()
            .iter()
            .map(|node| node.position())
            .collect::<Vec<_>>();
        let offset = self.controller.config().view_offset();
        let to_screen = |x: f32, y: f32| viewport_to_screen(rect, self.pan, self.zoom, offset + vec2(x, y));

        for cell in quadtree_cells(&positions) {
            let min = cell.center - vec2(cell.half_extent, cell.half_extent);
            let max = cell.center + vec2(cell.half_extent, cell.half_extent);
            let top_left = to_screen(min.x, min.y);
            let top_right = to_screen(max.x, min.y);
            let bottom_right = to_screen(max.x, max.y);
            let bottom_left = to_screen(min.x, max.y);

            let alpha = if cell.is_leaf { 110 } else { 55 };
            let line_width = (1.4_f32 - (cell.depth as f32 * 0.09)).clamp(0.45, 1.4);
            let stroke = Stroke::new(line_width, Color32::from_rgba_unmultiplied(106, 198, 255, alpha));

            painter.line_segment([top_left, top_right], stroke);
            painter.line_segment([top_right, bottom_right], stroke);
            painter.line_segment([bottom_right, bottom_left], stroke);
            painter.line_segment([bottom_left, top_left], stroke);
        }
    }

    fn draw_debug_overlay(&self, painter: &Painter, rect: Rect) {
        let config = self.controller.config();
        let simulation = self.controller.simulation();
        let lines = [
            format!("view width: {}", config.view_width),
            format!("view height: {}", config.view_height),
            format!("link force factor: {:.3}", config.link_force_factor),
            format!("charge force factor: {:.3}", config.charge_force_factor),
            format!("center force factor: {:.3}", config.center_force_factor),
            format!("alpha: {:.4}", simulation.alpha()),
            format!("ticks: {}", simulation.ticks()),
            format!("forces: {}", simulation.force_names().join(", ")),
        ];

        for (row, line) in lines.iter().enumerate() {
            painter.text(
                rect.left_top() + vec2(10.0, 10.0 + row as f32 * 16.0),
                Align2::LEFT_TOP,
                line,
                FontId::monospace(12.0),
                Color32::from_rgb(140, 220, 140),
            );
        }
    }

    pub(in crate::app) fn draw_graph(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);

        if self.recenter {
            self.center_view(rect);
        }

        draw_background(&painter, rect, self.pan, self.zoom);

        self.handle_graph_zoom(ui, rect, &response);
        self.handle_graph_pan(&response);
        self.handle_node_pointer(ui, rect, &response);

        if self.controller.step() || self.dragging.is_some() {
            ui.ctx().request_repaint();
        }

        let screen_nodes = self.screen_nodes(rect);
        let matches = self.search_matches();
        let hovered = ui
            .input(|input| input.pointer.hover_pos())
            .and_then(|pointer| node_under(&screen_nodes, pointer));
        let transforms = self.controller.simulation().target();

        if transforms.nodes.is_empty() {
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                "No nodes matched the current search.",
                FontId::proportional(14.0),
                Color32::from_gray(160),
            );
            self.label_hits.clear();
            return;
        }

        if self.show_quadtree_overlay {
            self.draw_quadtree_overlay(&painter, rect);
        }

        let link_width = (1.2 * self.zoom.sqrt()).clamp(0.5, 2.5);
        for &(source, target) in &transforms.links {
            let (Some((start, _)), Some((end, _))) = (screen_nodes.get(source), screen_nodes.get(target))
            else {
                continue;
            };
            let depth = transforms.nodes[source].depth.min(transforms.nodes[target].depth);
            let color = dim_color(LINK_COLOR, 1.0 - 0.2 * depth.min(3) as f32);
            painter.line_segment([*start, *end], Stroke::new(link_width, color));
        }

        let mut label_hits = Vec::new();
        for (index, node) in transforms.nodes.iter().enumerate() {
            let (position, radius) = screen_nodes[index];
            if !circle_visible(rect, position, radius) && !node.show_label {
                continue;
            }

            let mut fill = depth_color(node.depth);
            if matches[index] {
                fill = blend_color(fill, MATCH_COLOR, 0.55);
            }
            if hovered == Some(index) {
                fill = blend_color(fill, Color32::WHITE, 0.25);
            }

            if node.wanted {
                painter.circle_stroke(position, radius, Stroke::new(1.5, WANTED_COLOR));
            } else {
                painter.circle_filled(position, radius, fill);
            }
            if node.fixed {
                painter.circle_stroke(position, radius + 2.0, Stroke::new(1.5, Color32::WHITE));
            }

            if !node.show_label {
                continue;
            }
            let font_size = label_font_size(node.depth);
            let label_color = if node.wanted {
                WANTED_COLOR
            } else if matches[index] {
                MATCH_COLOR
            } else {
                Color32::from_gray(220)
            };
            let label_rect = painter.text(
                position + vec2(radius + 5.0, 0.0),
                Align2::LEFT_CENTER,
                &node.label,
                FontId::proportional(font_size * self.zoom.sqrt().clamp(0.6, 1.6)),
                label_color,
            );
            label_hits.push((node.id.clone(), label_rect));

            if let Some(context) = &node.context {
                painter.text(
                    label_rect.left_bottom() + vec2(0.0, 2.0),
                    Align2::LEFT_TOP,
                    context,
                    FontId::proportional(10.0),
                    Color32::from_gray(150),
                );
            }
        }

        if self.show_debug {
            self.draw_debug_overlay(&painter, rect);
        }
        if response.hovered() && hovered.is_some() {
            ui.ctx().request_repaint();
        }

        self.label_hits = label_hits;
    }
}
