//! Interactive dependency graph visualization component.
//!
//! Renders a component dependency graph on an HTML canvas with:
//! - Three layout strategies: force simulation, layered tree, radial tree
//! - Click selection with dependency/dependent neighbor highlighting
//! - Pan, zoom, animated focus, and node dragging interactions
//! - Hover tooltips showing component metadata
//!
//! # Example
//!
//! ```ignore
//! use dep_graph_viz::{DependencyGraphCanvas, DependencyGraph, LayoutMode};
//!
//! let graph: DependencyGraph = serde_json::from_str(json)?;
//!
//! view! {
//!     <DependencyGraphCanvas
//!         data=Signal::derive(move || Some(graph.clone()))
//!         layout=Signal::derive(|| LayoutMode::Force)
//!         on_select=Callback::new(|info| log::info!("selected: {info:?}"))
//!         fullscreen=true
//!     />
//! }
//! ```

mod component;
mod hierarchy;
mod layout;
mod model;
mod render;
mod selection;
mod simulation;
mod state;
pub mod theme;
mod types;
mod viewport;

pub use component::{DependencyGraphCanvas, Request, ViewOp};
pub use layout::LayoutMode;
pub use theme::Theme;
pub use types::{ComponentInfo, DependencyGraph, DependencyLink};
