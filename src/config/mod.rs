mod policy;

use std::sync::Arc;

use eframe::egui::{Vec2, vec2};

pub use policy::{DepthTieredPolicy, LayoutPolicy, LayoutPreset};

const ROOT_RADIUS: f32 = 30.0;
const BOUNDARY_SIZE: f32 = ROOT_RADIUS * 4.0;

/// Rectangle a node's label occupies, relative to the node position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LabelBox {
    pub offset: Vec2,
    pub size: Vec2,
}

impl LabelBox {
    pub fn new(offset_x: f32, offset_y: f32, width: f32, height: f32) -> Self {
        Self {
            offset: vec2(offset_x, offset_y),
            size: vec2(width, height),
        }
    }

    pub fn center_for(&self, position: Vec2) -> Vec2 {
        position + self.offset + self.size * 0.5
    }
}

/// Layout and physics parameters shared by the builder, the simulation and
/// the viewer. Long lived; mutated field by field through [`ConfigUpdate`].
#[derive(Clone, Debug)]
pub struct GraphConfig {
    pub view_width: f32,
    pub view_height: f32,
    pub min_dimension: f32,
    pub x_offset: f32,
    pub y_offset: f32,
    pub boundary_size: f32,
    pub left_boundary: f32,
    pub right_boundary: f32,
    pub top_boundary: f32,
    pub bottom_boundary: f32,
    pub center_force_factor: f32,
    pub charge_force_factor: f32,
    pub link_force_factor: f32,
    pub alpha_decay: f32,
    pub alpha_min: f32,
    pub velocity_decay: f32,
    pub label_box: LabelBox,
    pub label_collide_strength: f32,
    pub label_collide_iterations: usize,
    pub search_query: String,
    pub search_depth: usize,
    pub max_nodes: usize,
    pub pin_root_node: bool,
    pub root_node: Option<String>,
    pub debug: bool,
    pub config_panel: bool,
    pub search_panel: bool,
    pub preset: LayoutPreset,
    policy: Arc<dyn LayoutPolicy>,
}

impl GraphConfig {
    pub fn for_viewport(view_width: f32, view_height: f32) -> Self {
        let min_dimension = view_width.min(view_height);
        let x_offset = view_width / 2.0;
        let y_offset = view_height / 2.0;
        let search_depth = if min_dimension < 600.0 { 1 } else { 2 };
        let preset = LayoutPreset::default();

        Self {
            view_width,
            view_height,
            min_dimension,
            x_offset,
            y_offset,
            boundary_size: BOUNDARY_SIZE,
            left_boundary: -view_width / 2.0 + BOUNDARY_SIZE,
            right_boundary: view_width / 2.0 - BOUNDARY_SIZE,
            top_boundary: -y_offset + BOUNDARY_SIZE,
            bottom_boundary: view_height - y_offset - BOUNDARY_SIZE,
            center_force_factor: (0.25 * (1100.0 / min_dimension).powi(2)).min(0.3),
            charge_force_factor: 1.2,
            link_force_factor: 1.2,
            alpha_decay: 1.0 - 0.001_f32.powf(1.0 / 300.0),
            alpha_min: 0.0002,
            velocity_decay: 0.4,
            label_box: LabelBox::new(-35.0, -10.0, 1500.0, 60.0),
            label_collide_strength: 2.0,
            label_collide_iterations: 1,
            search_query: String::new(),
            search_depth,
            max_nodes: 300,
            pin_root_node: true,
            root_node: None,
            debug: false,
            config_panel: true,
            search_panel: true,
            preset,
            policy: Arc::new(preset.policy()),
        }
    }

    pub fn policy(&self) -> &dyn LayoutPolicy {
        self.policy.as_ref()
    }

    pub fn set_preset(&mut self, preset: LayoutPreset) {
        self.preset = preset;
        self.policy = Arc::new(preset.policy());
    }

    pub fn view_offset(&self) -> Vec2 {
        vec2(self.x_offset, self.y_offset)
    }

    /// Clamps a world position into the drag boundary.
    pub fn clamp_to_boundary(&self, position: Vec2) -> Vec2 {
        vec2(
            clamp(position.x, self.left_boundary, self.right_boundary),
            clamp(position.y, self.top_boundary, self.bottom_boundary),
        )
    }
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self::for_viewport(1440.0, 920.0)
    }
}

// `f32::clamp` panics when the boundary collapses on small viewports.
fn clamp(value: f32, low: f32, high: f32) -> f32 {
    if value < low {
        low
    } else if value > high {
        high
    } else {
        value
    }
}

/// Partial configuration change. Unset fields keep their current value.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ConfigUpdate {
    pub link_force_factor: Option<f32>,
    pub charge_force_factor: Option<f32>,
    pub center_force_factor: Option<f32>,
    pub alpha_decay: Option<f32>,
    pub alpha_min: Option<f32>,
    pub velocity_decay: Option<f32>,
    pub label_collide_strength: Option<f32>,
    pub label_collide_iterations: Option<usize>,
    pub search_query: Option<String>,
    pub search_depth: Option<usize>,
    pub max_nodes: Option<usize>,
    pub pin_root_node: Option<bool>,
    pub preset: Option<LayoutPreset>,
}

impl ConfigUpdate {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Whether the change alters which nodes are displayed, as opposed to how
    /// the existing ones move.
    pub fn needs_rebuild(&self) -> bool {
        self.search_query.is_some()
            || self.search_depth.is_some()
            || self.max_nodes.is_some()
            || self.pin_root_node.is_some()
    }

    pub fn apply_to(&self, config: &mut GraphConfig) {
        if let Some(value) = self.link_force_factor {
            config.link_force_factor = value;
        }
        if let Some(value) = self.charge_force_factor {
            config.charge_force_factor = value;
        }
        if let Some(value) = self.center_force_factor {
            config.center_force_factor = value;
        }
        if let Some(value) = self.alpha_decay {
            config.alpha_decay = value;
        }
        if let Some(value) = self.alpha_min {
            config.alpha_min = value;
        }
        if let Some(value) = self.velocity_decay {
            config.velocity_decay = value;
        }
        if let Some(value) = self.label_collide_strength {
            config.label_collide_strength = value;
        }
        if let Some(value) = self.label_collide_iterations {
            config.label_collide_iterations = value;
        }
        if let Some(value) = &self.search_query {
            config.search_query = value.clone();
        }
        if let Some(value) = self.search_depth {
            config.search_depth = value;
        }
        if let Some(value) = self.max_nodes {
            config.max_nodes = value;
        }
        if let Some(value) = self.pin_root_node {
            config.pin_root_node = value;
        }
        if let Some(value) = self.preset {
            config.set_preset(value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewport_defaults() {
        let config = GraphConfig::for_viewport(800.0, 500.0);
        assert_eq!(config.min_dimension, 500.0);
        assert_eq!(config.search_depth, 1);
        assert_eq!(config.left_boundary, -280.0);
        assert_eq!(config.right_boundary, 280.0);
        assert_eq!(config.top_boundary, -130.0);
        assert_eq!(config.bottom_boundary, 130.0);
        assert_eq!(config.center_force_factor, 0.3);

        let large = GraphConfig::for_viewport(4000.0, 3000.0);
        assert_eq!(large.search_depth, 2);
        assert!(large.center_force_factor < 0.1);
    }

    #[test]
    fn clamps_into_boundary_even_when_inverted() {
        let config = GraphConfig::for_viewport(800.0, 500.0);
        assert_eq!(
            config.clamp_to_boundary(vec2(900.0, -900.0)),
            vec2(280.0, -130.0)
        );

        let tiny = GraphConfig::for_viewport(100.0, 100.0);
        let clamped = tiny.clamp_to_boundary(vec2(0.0, 0.0));
        assert!(clamped.x.is_finite() && clamped.y.is_finite());
    }

    #[test]
    fn update_touches_only_set_fields() {
        let mut config = GraphConfig::default();
        let before = config.clone();
        let update = ConfigUpdate {
            charge_force_factor: Some(3.0),
            ..ConfigUpdate::default()
        };
        update.apply_to(&mut config);

        assert_eq!(config.charge_force_factor, 3.0);
        assert_eq!(config.link_force_factor, before.link_force_factor);
        assert!(!update.needs_rebuild());
        assert!(
            ConfigUpdate {
                search_depth: Some(3),
                ..ConfigUpdate::default()
            }
            .needs_rebuild()
        );
        assert!(ConfigUpdate::default().is_empty());
    }

    #[test]
    fn preset_swaps_policy() {
        let mut config = GraphConfig::default();
        ConfigUpdate {
            preset: Some(LayoutPreset::Flat),
            ..ConfigUpdate::default()
        }
        .apply_to(&mut config);
        assert_eq!(config.preset, LayoutPreset::Flat);
        assert_eq!(config.policy().radius_for(0), 15.0);
    }
}
