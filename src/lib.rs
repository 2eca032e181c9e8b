//! Force-directed layout for knowledge graphs: depth-aware display graphs,
//! search filtering and an alpha-cooled force simulation, plus an eframe viewer.

pub mod app;
pub mod config;
pub mod display;
pub mod error;
pub mod graph;
pub mod physics;

pub use config::{ConfigUpdate, GraphConfig, LayoutPreset};
pub use display::{DisplayGraph, DisplayNode, build_display_graph, filter_display_graph_with_root};
pub use error::RenderError;
pub use graph::{Graph, GraphLink, GraphNode};
pub use physics::{LayoutController, RenderTarget, Simulation, SimulationPhase};
