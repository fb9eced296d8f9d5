//! Single-selection state with neighborhood highlighting.
//!
//! The controller is a two-state machine: Idle (nothing selected) or Focused
//! on one node id. Entering Focused recomputes the directly-connected target
//! and source sets with one scan over the render edges; rendering derives
//! per-node and per-edge emphasis from those sets every frame, so no visual
//! state can go stale across re-layouts or layout switches.

use std::collections::HashSet;

use super::model::{GraphModel, RenderEdge};
use super::types::VIRTUAL_KIND;

/// Visual emphasis tier for a node, uniform across all layouts.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Emphasis {
	Base,
	/// Directly connected to the selected node.
	Neighbor,
	Selected,
}

impl Emphasis {
	/// Radius multiplier applied at render time.
	pub fn radius_multiplier(self) -> f64 {
		match self {
			Emphasis::Base => 1.0,
			Emphasis::Neighbor => 1.2,
			Emphasis::Selected => 1.5,
		}
	}
}

/// Tracks the selected node and its direct neighborhood.
#[derive(Clone, Debug, Default)]
pub struct Selection {
	selected: Option<String>,
	/// Ids the selection points to.
	targets: HashSet<String>,
	/// Ids pointing at the selection.
	sources: HashSet<String>,
}

impl Selection {
	/// Focus a node by id. Returns false (staying Idle) when the id does not
	/// exist in the current model, which also covers stale ids after a data
	/// replacement.
	pub fn select(&mut self, id: &str, model: &GraphModel) -> bool {
		if model.node_index(id).is_none() {
			self.clear();
			return false;
		}
		self.selected = Some(id.to_string());
		self.recompute(model);
		true
	}

	/// Return to Idle.
	pub fn clear(&mut self) {
		self.selected = None;
		self.targets.clear();
		self.sources.clear();
	}

	/// Re-derive the neighborhood against a rebuilt model. Drops the
	/// selection entirely when the id no longer resolves.
	pub fn revalidate(&mut self, model: &GraphModel) {
		match self.selected.take() {
			Some(id) => {
				self.select(&id, model);
			}
			None => self.clear(),
		}
	}

	fn recompute(&mut self, model: &GraphModel) {
		self.targets.clear();
		self.sources.clear();
		let Some(selected) = self.selected.as_deref() else {
			return;
		};
		for edge in &model.edges {
			if edge.kind == VIRTUAL_KIND {
				continue;
			}
			let source = &model.nodes[edge.source].id;
			let target = &model.nodes[edge.target].id;
			if source == selected {
				self.targets.insert(target.clone());
			}
			if target == selected {
				self.sources.insert(source.clone());
			}
		}
	}

	pub fn selected_id(&self) -> Option<&str> {
		self.selected.as_deref()
	}

	pub fn is_focused(&self) -> bool {
		self.selected.is_some()
	}

	/// Nodes the selection points to.
	pub fn connected_targets(&self) -> &HashSet<String> {
		&self.targets
	}

	/// Nodes pointing at the selection.
	pub fn connected_sources(&self) -> &HashSet<String> {
		&self.sources
	}

	/// Emphasis tier for a node id.
	pub fn node_emphasis(&self, id: &str) -> Emphasis {
		if self.selected.as_deref() == Some(id) {
			Emphasis::Selected
		} else if self.targets.contains(id) || self.sources.contains(id) {
			Emphasis::Neighbor
		} else {
			Emphasis::Base
		}
	}

	/// Whether an edge touches the selected node (virtual edges never do).
	pub fn edge_emphasized(&self, edge: &RenderEdge, model: &GraphModel) -> bool {
		let Some(selected) = self.selected.as_deref() else {
			return false;
		};
		if edge.kind == VIRTUAL_KIND {
			return false;
		}
		model.nodes[edge.source].id == selected || model.nodes[edge.target].id == selected
	}
}

#[cfg(test)]
mod tests {
	use super::super::theme::NodePalette;
	use super::super::types::{ComponentInfo, DependencyGraph, DependencyLink};
	use super::*;

	fn model(ids: &[&str], edges: &[(&str, &str)]) -> GraphModel {
		let input = DependencyGraph {
			components: ids
				.iter()
				.map(|id| ComponentInfo {
					item_id: id.to_string(),
					name: id.to_string(),
					file_path: String::new(),
					metadata: None,
				})
				.collect(),
			dependencies: edges
				.iter()
				.map(|(s, t)| DependencyLink {
					source_id: s.to_string(),
					target_id: t.to_string(),
					kind: "Standard".to_string(),
				})
				.collect(),
		};
		GraphModel::normalize(Some(&input), &NodePalette::category10())
	}

	#[test]
	fn selecting_computes_targets_and_sources() {
		let m = model(&["x", "y", "z"], &[("x", "y"), ("z", "x")]);
		let mut selection = Selection::default();
		assert!(selection.select("x", &m));

		assert_eq!(
			selection.connected_targets(),
			&HashSet::from(["y".to_string()])
		);
		assert_eq!(
			selection.connected_sources(),
			&HashSet::from(["z".to_string()])
		);
		assert_eq!(selection.node_emphasis("x"), Emphasis::Selected);
		assert_eq!(selection.node_emphasis("y"), Emphasis::Neighbor);
		assert_eq!(selection.node_emphasis("z"), Emphasis::Neighbor);
	}

	#[test]
	fn isolated_node_has_empty_neighborhood() {
		let m = model(&["x", "y"], &[]);
		let mut selection = Selection::default();
		selection.select("y", &m);
		assert!(selection.connected_targets().is_empty());
		assert!(selection.connected_sources().is_empty());
	}

	#[test]
	fn stale_id_behaves_as_idle() {
		let m = model(&["x"], &[]);
		let mut selection = Selection::default();
		assert!(!selection.select("gone", &m));
		assert!(!selection.is_focused());
		assert_eq!(selection.node_emphasis("x"), Emphasis::Base);
	}

	#[test]
	fn clearing_returns_to_idle() {
		let m = model(&["x", "y"], &[("x", "y")]);
		let mut selection = Selection::default();
		selection.select("x", &m);
		selection.clear();
		assert!(!selection.is_focused());
		assert!(selection.connected_targets().is_empty());
	}

	#[test]
	fn revalidate_drops_selection_missing_from_new_model() {
		let before = model(&["x", "y"], &[("x", "y")]);
		let after = model(&["y"], &[]);
		let mut selection = Selection::default();
		selection.select("x", &before);
		selection.revalidate(&after);
		assert!(!selection.is_focused());
	}

	#[test]
	fn revalidate_keeps_selection_still_present() {
		let before = model(&["x", "y"], &[("x", "y")]);
		let after = model(&["x", "y", "w"], &[("w", "x")]);
		let mut selection = Selection::default();
		selection.select("x", &before);
		selection.revalidate(&after);
		assert_eq!(selection.selected_id(), Some("x"));
		assert_eq!(
			selection.connected_sources(),
			&HashSet::from(["w".to_string()])
		);
		assert!(selection.connected_targets().is_empty());
	}

	#[test]
	fn edges_touching_the_selection_are_emphasized() {
		let m = model(&["x", "y", "z"], &[("x", "y"), ("y", "z")]);
		let mut selection = Selection::default();
		selection.select("x", &m);
		assert!(selection.edge_emphasized(&m.edges[0], &m));
		assert!(!selection.edge_emphasized(&m.edges[1], &m));
	}

	#[test]
	fn emphasis_scales_radius() {
		assert_eq!(Emphasis::Selected.radius_multiplier(), 1.5);
		assert_eq!(Emphasis::Neighbor.radius_multiplier(), 1.2);
		assert_eq!(Emphasis::Base.radius_multiplier(), 1.0);
	}
}
