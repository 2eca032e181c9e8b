use eframe::egui::Vec2;

use crate::display::DisplayGraph;
use crate::physics::RenderTarget;

/// Viewport placement of one node as of the latest tick.
#[derive(Clone, Debug, PartialEq)]
pub(in crate::app) struct NodeTransform {
    pub(in crate::app) id: String,
    pub(in crate::app) label: String,
    pub(in crate::app) context: Option<String>,
    pub(in crate::app) depth: u32,
    pub(in crate::app) wanted: bool,
    pub(in crate::app) show_label: bool,
    pub(in crate::app) fixed: bool,
    /// World position shifted by the view offset, so the origin lands in the
    /// middle of the viewport.
    pub(in crate::app) translate: Vec2,
}

/// Tick-side copy of the layout that the painter reads each frame.
#[derive(Debug, Default)]
pub(in crate::app) struct ScreenTransforms {
    pub(in crate::app) nodes: Vec<NodeTransform>,
    pub(in crate::app) links: Vec<(usize, usize)>,
    pub(in crate::app) offset: Vec2,
    pub(in crate::app) ticks: u64,
}

impl ScreenTransforms {
    fn same_node_set(&self, graph: &DisplayGraph) -> bool {
        self.nodes.len() == graph.nodes.len()
            && self.links.len() == graph.links.len()
            && self
                .nodes
                .iter()
                .zip(&graph.nodes)
                .all(|(transform, node)| transform.id == node.id)
            && self
                .links
                .iter()
                .zip(&graph.links)
                .all(|(&(source, target), link)| source == link.source && target == link.target)
    }

    fn rebuild(&mut self, graph: &DisplayGraph, offset: Vec2) {
        self.nodes.clear();
        self.nodes.extend(graph.nodes.iter().map(|node| NodeTransform {
            id: node.id.clone(),
            label: node.label.clone(),
            context: node.context.clone(),
            depth: node.depth,
            wanted: node.wanted,
            show_label: node.show_label,
            fixed: node.is_fixed(),
            translate: offset + node.position(),
        }));
        self.links.clear();
        self.links
            .extend(graph.links.iter().map(|link| (link.source, link.target)));
    }

    /// Same ids in the same order: positions move every tick, while depth and
    /// the label fields change when the root does.
    fn refresh(&mut self, graph: &DisplayGraph, offset: Vec2) {
        for (transform, node) in self.nodes.iter_mut().zip(&graph.nodes) {
            transform.translate = offset + node.position();
            transform.fixed = node.is_fixed();
            transform.depth = node.depth;
            transform.wanted = node.wanted;
            transform.show_label = node.show_label;
            if transform.label != node.label {
                transform.label.clone_from(&node.label);
            }
            if transform.context != node.context {
                transform.context.clone_from(&node.context);
            }
        }
    }

    pub(in crate::app) fn index_of(&self, id: &str) -> Option<usize> {
        self.nodes.iter().position(|node| node.id == id)
    }
}

impl RenderTarget for ScreenTransforms {
    fn on_tick(&mut self, graph: &DisplayGraph, offset: Vec2) {
        self.ticks += 1;
        if self.offset != offset || !self.same_node_set(graph) {
            self.offset = offset;
            self.rebuild(graph, offset);
            return;
        }

        self.refresh(graph, offset);
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::vec2;

    use super::*;
    use crate::config::GraphConfig;
    use crate::graph::Graph;
    use crate::physics::LayoutController;

    #[test]
    fn tick_places_nodes_around_view_offset() {
        let config = GraphConfig::for_viewport(800.0, 600.0);
        let graph = Graph::builder().id("hub").to(["spoke"]).build();
        let controller =
            LayoutController::new(graph, config, ScreenTransforms::default()).expect("viewport");

        let transforms = controller.simulation().target();
        assert_eq!(transforms.offset, vec2(400.0, 300.0));
        assert_eq!(transforms.nodes.len(), 2);
        assert_eq!(transforms.links, vec![(0, 1)]);

        let hub = &transforms.nodes[transforms.index_of("hub").expect("hub")];
        assert!(hub.fixed);
        assert_eq!(hub.translate, vec2(400.0, 300.0));
    }

    #[test]
    fn retick_updates_positions_in_place() {
        let graph = Graph::builder().id("hub").to(["spoke"]).build();
        let mut controller =
            LayoutController::new(graph, GraphConfig::default(), ScreenTransforms::default())
                .expect("viewport");
        let before = controller.simulation().target().ticks;

        assert!(controller.step());
        let transforms = controller.simulation().target();
        assert_eq!(transforms.ticks, before + 1);
        let spoke = &transforms.nodes[1];
        let world = controller.simulation().nodes()[1].position();
        assert_eq!(spoke.translate, transforms.offset + world);
    }

    #[test]
    fn navigation_refreshes_depths_of_kept_nodes() {
        let graph = Graph::builder()
            .id("home")
            .to(["kitchen"])
            .id("kitchen")
            .to(["pantry"])
            .id("pantry")
            .build();
        let mut config = GraphConfig::default();
        config.root_node = Some("home".to_owned());
        let mut controller =
            LayoutController::new(graph, config, ScreenTransforms::default()).expect("viewport");
        let depth_of = |controller: &LayoutController<ScreenTransforms>, id: &str| {
            let transforms = controller.simulation().target();
            transforms.nodes[transforms.index_of(id).expect("kept")].depth
        };
        assert_eq!(depth_of(&controller, "pantry"), 2);

        controller.navigate("pantry");
        for id in ["home", "kitchen", "pantry"] {
            let simulated = controller.simulation().graph().node(id).expect("kept").depth;
            assert_eq!(depth_of(&controller, id), simulated, "{id}");
        }
        assert_eq!(depth_of(&controller, "pantry"), 0);
        assert_eq!(depth_of(&controller, "home"), 2);
    }
}
