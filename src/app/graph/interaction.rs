use eframe::egui::{self, Pos2, Rect, Ui};
use tracing::{debug, info};

use super::super::ViewModel;
use super::super::render_utils::screen_to_viewport;

/// Closest node whose circle contains `pointer`.
pub(super) fn node_under(screen_nodes: &[(Pos2, f32)], pointer: Pos2) -> Option<usize> {
    screen_nodes
        .iter()
        .enumerate()
        .filter_map(|(index, (position, radius))| {
            let distance = position.distance(pointer);
            (distance <= *radius).then_some((index, distance))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(index, _)| index)
}

impl ViewModel {
    pub(in crate::app) fn handle_graph_zoom(
        &mut self,
        ui: &Ui,
        rect: Rect,
        response: &egui::Response,
    ) {
        if !response.hovered() {
            return;
        }

        let scroll = ui.input(|input| input.raw_scroll_delta.y);
        if scroll.abs() <= f32::EPSILON {
            return;
        }

        let pointer = ui
            .input(|input| input.pointer.hover_pos())
            .unwrap_or_else(|| rect.center());
        let viewport_before = screen_to_viewport(rect, self.pan, self.zoom, pointer);

        let zoom_factor = (1.0 + (scroll * 0.0018)).clamp(0.85, 1.15);
        self.zoom = (self.zoom * zoom_factor).clamp(0.05, 6.0);
        self.pan = pointer - rect.left_top() - (viewport_before * self.zoom);
    }

    pub(in crate::app) fn handle_graph_pan(&mut self, response: &egui::Response) {
        if response.dragged_by(egui::PointerButton::Secondary)
            || response.dragged_by(egui::PointerButton::Middle)
        {
            self.pan += response.drag_delta();
        }
    }

    /// Puts the layout origin in the middle of the canvas, whatever size the
    /// canvas ended up.
    pub(in crate::app) fn center_view(&mut self, rect: Rect) {
        let offset = self.controller.config().view_offset();
        self.pan = rect.center() - rect.left_top() - offset * self.zoom;
        self.recenter = false;
    }

    fn node_id(&self, index: usize) -> Option<String> {
        self.controller
            .simulation()
            .target()
            .nodes
            .get(index)
            .map(|node| node.id.clone())
    }

    fn label_under(&self, pointer: Pos2) -> Option<String> {
        self.label_hits
            .iter()
            .find(|(_, rect)| rect.contains(pointer))
            .map(|(id, _)| id.clone())
    }

    /// Primary drag pins a node under the pointer, a click on a circle
    /// releases it and a click on a label navigates there.
    pub(in crate::app) fn handle_node_pointer(
        &mut self,
        ui: &Ui,
        rect: Rect,
        response: &egui::Response,
    ) {
        let screen_nodes = self.screen_nodes(rect);

        if response.drag_started_by(egui::PointerButton::Primary) {
            self.dragging = response
                .interact_pointer_pos()
                .and_then(|pointer| node_under(&screen_nodes, pointer))
                .and_then(|index| self.node_id(index));
            if let Some(id) = &self.dragging {
                debug!(%id, "drag started");
            }
        }

        if let Some(id) = self.dragging.clone() {
            if response.dragged_by(egui::PointerButton::Primary)
                && let Some(pointer) = response.interact_pointer_pos()
            {
                let offset = self.controller.config().view_offset();
                let world = screen_to_viewport(rect, self.pan, self.zoom, pointer) - offset;
                self.controller.drag_to(&id, world);
            }
            if response.drag_stopped() {
                debug!(%id, "drag stopped");
                self.dragging = None;
            }
        }

        if response.clicked_by(egui::PointerButton::Primary)
            && let Some(pointer) = response.interact_pointer_pos()
        {
            if let Some(id) = node_under(&screen_nodes, pointer).and_then(|index| self.node_id(index))
            {
                self.controller.unpin(&id);
            } else if let Some(id) = self.label_under(pointer) {
                info!(%id, "label clicked");
                self.controller.navigate(&id);
            }
        }

        let hovering = ui.input(|input| input.pointer.hover_pos()).is_some_and(|pointer| {
            node_under(&screen_nodes, pointer).is_some() || self.label_under(pointer).is_some()
        });
        if hovering || self.dragging.is_some() {
            ui.output_mut(|output| output.cursor_icon = egui::CursorIcon::PointingHand);
        }
    }
}
