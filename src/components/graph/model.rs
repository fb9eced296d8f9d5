//! Render model derived from the input graph.
//!
//! [`GraphModel::normalize`] turns the immutable input graph into the mutable
//! node/edge records that layouts position and the renderer draws. The model
//! is rebuilt in full whenever the input graph is replaced; positions are
//! owned by whichever layout is currently active.

use std::collections::HashMap;
use std::f64::consts::PI;

use super::theme::{Color, NodePalette};
use super::types::DependencyGraph;

/// A positioned, renderable node.
#[derive(Clone, Debug)]
pub struct RenderNode {
	/// Component id (the input `itemId`).
	pub id: String,
	pub name: String,
	pub file_path: String,
	/// Base radius in world units. Emphasis multipliers are applied at
	/// render time, never stored.
	pub radius: f64,
	pub color: Color,
	pub metadata: Option<serde_json::Map<String, serde_json::Value>>,
	/// Layout-assigned position, the single source of truth for focusing
	/// and hit testing across all layouts.
	pub x: f64,
	pub y: f64,
	/// Velocity, used by the force simulation only.
	pub vx: f64,
	pub vy: f64,
	/// Pin position while the node is dragged (force layout only).
	pub fx: Option<f64>,
	pub fy: Option<f64>,
}

/// A renderable edge with endpoints resolved to node indices.
#[derive(Clone, Debug)]
pub struct RenderEdge {
	pub source: usize,
	pub target: usize,
	pub kind: String,
}

/// Nodes and edges ready for layout and rendering.
#[derive(Clone, Debug, Default)]
pub struct GraphModel {
	pub nodes: Vec<RenderNode>,
	pub edges: Vec<RenderEdge>,
	index: HashMap<String, usize>,
}

/// Assigns palette colors to name prefixes in order of first appearance, so
/// components sharing a first dot-separated name segment share a color.
#[derive(Debug, Default)]
struct ColorScale {
	assigned: HashMap<String, usize>,
}

impl ColorScale {
	fn color(&mut self, name: &str, palette: &NodePalette) -> Color {
		let prefix = name.split('.').next().unwrap_or(name);
		let next = self.assigned.len();
		let slot = *self.assigned.entry(prefix.to_string()).or_insert(next);
		palette.get(slot)
	}
}

impl GraphModel {
	/// Build the render model from an input graph.
	///
	/// Deterministic and order-preserving: node order matches input component
	/// order, edge order matches input dependency order. Dependencies whose
	/// endpoints are not both present are dropped. An absent graph yields an
	/// empty model (valid transient state during initial load, not an error).
	pub fn normalize(graph: Option<&DependencyGraph>, palette: &NodePalette) -> Self {
		let Some(graph) = graph else {
			return Self::default();
		};

		let mut scale = ColorScale::default();
		let mut index = HashMap::with_capacity(graph.components.len());
		let mut nodes = Vec::with_capacity(graph.components.len());

		for component in &graph.components {
			index.insert(component.item_id.clone(), nodes.len());
			nodes.push(RenderNode {
				id: component.item_id.clone(),
				name: component.name.clone(),
				file_path: component.file_path.clone(),
				radius: 5.0,
				color: scale.color(&component.name, palette),
				metadata: component.metadata.clone(),
				x: 0.0,
				y: 0.0,
				vx: 0.0,
				vy: 0.0,
				fx: None,
				fy: None,
			});
		}

		let edges = graph
			.dependencies
			.iter()
			.filter_map(|dep| {
				let source = *index.get(&dep.source_id)?;
				let target = *index.get(&dep.target_id)?;
				Some(RenderEdge {
					source,
					target,
					kind: dep.kind.clone(),
				})
			})
			.collect();

		Self {
			nodes,
			edges,
			index,
		}
	}

	/// Index of the node with the given id, if present.
	pub fn node_index(&self, id: &str) -> Option<usize> {
		self.index.get(id).copied()
	}

	/// Place nodes on a circle around the viewport center. Used to give the
	/// force simulation a non-degenerate starting state after a data load.
	pub fn seed_positions(&mut self, width: f64, height: f64) {
		let count = self.nodes.len().max(1) as f64;
		for (i, node) in self.nodes.iter_mut().enumerate() {
			let angle = (i as f64) * 2.0 * PI / count;
			node.x = width / 2.0 + 100.0 * angle.cos();
			node.y = height / 2.0 + 100.0 * angle.sin();
			node.vx = 0.0;
			node.vy = 0.0;
		}
	}
}

#[cfg(test)]
mod tests {
	use super::super::types::{ComponentInfo, DependencyLink};
	use super::*;

	fn component(id: &str, name: &str) -> ComponentInfo {
		ComponentInfo {
			item_id: id.to_string(),
			name: name.to_string(),
			file_path: format!("src/{id}.ts"),
			metadata: None,
		}
	}

	fn link(source: &str, target: &str) -> DependencyLink {
		DependencyLink {
			source_id: source.to_string(),
			target_id: target.to_string(),
			kind: "Standard".to_string(),
		}
	}

	fn sample() -> DependencyGraph {
		DependencyGraph {
			components: vec![
				component("a", "app.root"),
				component("b", "app.menu"),
				component("c", "lib.util"),
			],
			dependencies: vec![link("a", "b"), link("a", "c")],
		}
	}

	#[test]
	fn absent_graph_yields_empty_model() {
		let model = GraphModel::normalize(None, &NodePalette::category10());
		assert!(model.nodes.is_empty());
		assert!(model.edges.is_empty());
	}

	#[test]
	fn preserves_component_order() {
		let model = GraphModel::normalize(Some(&sample()), &NodePalette::category10());
		let ids: Vec<_> = model.nodes.iter().map(|n| n.id.as_str()).collect();
		assert_eq!(ids, ["a", "b", "c"]);
		assert_eq!(model.node_index("c"), Some(2));
	}

	#[test]
	fn shared_name_prefix_shares_color() {
		let model = GraphModel::normalize(Some(&sample()), &NodePalette::category10());
		assert_eq!(model.nodes[0].color, model.nodes[1].color);
		assert_ne!(model.nodes[0].color, model.nodes[2].color);
	}

	#[test]
	fn drops_edges_with_unknown_endpoints() {
		let mut graph = sample();
		graph.dependencies.push(link("a", "ghost"));
		graph.dependencies.push(link("ghost", "b"));
		let model = GraphModel::normalize(Some(&graph), &NodePalette::category10());
		assert_eq!(model.edges.len(), 2);
	}

	#[test]
	fn normalize_is_idempotent() {
		let graph = sample();
		let palette = NodePalette::category10();
		let first = GraphModel::normalize(Some(&graph), &palette);
		let second = GraphModel::normalize(Some(&graph), &palette);
		assert_eq!(first.nodes.len(), second.nodes.len());
		for (a, b) in first.nodes.iter().zip(&second.nodes) {
			assert_eq!(a.id, b.id);
			assert_eq!(a.color, b.color);
		}
		for (a, b) in first.edges.iter().zip(&second.edges) {
			assert_eq!((a.source, a.target), (b.source, b.target));
		}
	}

	#[test]
	fn seeding_spreads_nodes_around_center() {
		let mut model = GraphModel::normalize(Some(&sample()), &NodePalette::category10());
		model.seed_positions(800.0, 600.0);
		for node in &model.nodes {
			let dx = node.x - 400.0;
			let dy = node.y - 300.0;
			assert!(((dx * dx + dy * dy).sqrt() - 100.0).abs() < 1e-9);
		}
	}
}
