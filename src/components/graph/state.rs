//! Central engine state and interaction dispatch.
//!
//! [`GraphState`] owns the render model, the active layout, the optional
//! force simulation, the selection, and the viewport. Pointer events from
//! the host component funnel through one layout-agnostic dispatch: hover,
//! click-to-select, background-click-to-deselect, node dragging, and
//! background panning behave identically under every layout; only the
//! pin-and-reheat step is specific to the force simulation.
//!
//! The simulation is owned here and replaced atomically when data or layout
//! changes, with an explicit `stop()` first, so a tick can never mutate a
//! model it does not belong to.

use log::{info, warn};

use super::hierarchy::Hierarchy;
use super::layout::{self, LayoutMode};
use super::model::GraphModel;
use super::selection::Selection;
use super::simulation::{DRAG_ALPHA_TARGET, Simulation};
use super::theme::Theme;
use super::types::{ComponentInfo, DependencyGraph};
use super::viewport::Viewport;

/// Squared pixel distance below which a press-release pair counts as a click.
const CLICK_SLOP_SQ: f64 = 9.0;

/// Emitted to the host whenever the selection changes.
#[derive(Clone, Debug, PartialEq)]
pub enum SelectionChange {
	/// A component was selected.
	Selected(ComponentInfo),
	/// The selection was cleared.
	Cleared,
}

/// An in-progress node drag.
#[derive(Clone, Debug, Default)]
struct DragState {
	node: Option<usize>,
	start_x: f64,
	start_y: f64,
	moved: bool,
}

/// An in-progress background pan.
#[derive(Clone, Debug, Default)]
struct PanState {
	active: bool,
	start_x: f64,
	start_y: f64,
	transform_start_x: f64,
	transform_start_y: f64,
	moved: bool,
}

/// Complete engine state for one canvas.
pub struct GraphState {
	/// The host-owned input graph, kept for selection emission.
	graph: Option<DependencyGraph>,
	pub model: GraphModel,
	pub layout: LayoutMode,
	/// Set when the requested hierarchical layout could not be built and
	/// this render pass is using the force layout instead.
	pub fell_back: bool,
	simulation: Option<Simulation>,
	pub selection: Selection,
	pub viewport: Viewport,
	pub theme: Theme,
	pub hovered: Option<usize>,
	/// Last pointer position in screen coordinates, for the tooltip.
	pub pointer: (f64, f64),
	drag: DragState,
	pan: PanState,
}

impl GraphState {
	pub fn new(width: f64, height: f64, theme: Theme) -> Self {
		Self {
			graph: None,
			model: GraphModel::default(),
			layout: LayoutMode::default(),
			fell_back: false,
			simulation: None,
			selection: Selection::default(),
			viewport: Viewport::new(width, height),
			theme,
			hovered: None,
			pointer: (0.0, 0.0),
			drag: DragState::default(),
			pan: PanState::default(),
		}
	}

	/// The layout actually positioning nodes right now.
	pub fn effective_layout(&self) -> LayoutMode {
		if self.fell_back {
			LayoutMode::Force
		} else {
			self.layout
		}
	}

	/// Replace the input graph and rebuild the render model. Returns a
	/// selection change when the replacement invalidated the selection.
	pub fn set_data(&mut self, graph: Option<DependencyGraph>) -> Option<SelectionChange> {
		// Stop the old simulation before its node array goes away.
		if let Some(sim) = self.simulation.as_mut() {
			sim.stop();
		}
		self.simulation = None;
		self.hovered = None;
		self.drag = DragState::default();
		self.pan = PanState::default();

		self.graph = graph;
		self.model = GraphModel::normalize(self.graph.as_ref(), &self.theme.palette);
		self.model
			.seed_positions(self.viewport.width, self.viewport.height);
		info!(
			"graph data replaced: {} nodes, {} edges",
			self.model.nodes.len(),
			self.model.edges.len()
		);

		let was_focused = self.selection.is_focused();
		self.selection.revalidate(&self.model);
		self.apply_layout();

		(was_focused && !self.selection.is_focused()).then_some(SelectionChange::Cleared)
	}

	/// Switch the layout algorithm. The selection is kept; positions carry
	/// over into the force layout and are recomputed by the static ones.
	pub fn set_layout(&mut self, layout: LayoutMode) {
		if self.layout == layout && !self.model.nodes.is_empty() {
			return;
		}
		self.layout = layout;
		self.apply_layout();
	}

	/// Run the active layout over the current model.
	fn apply_layout(&mut self) {
		if let Some(sim) = self.simulation.as_mut() {
			sim.stop();
		}
		self.simulation = None;
		self.fell_back = false;
		if self.model.nodes.is_empty() {
			return;
		}

		match self.layout {
			LayoutMode::Force => self.start_simulation(),
			LayoutMode::Tree | LayoutMode::Radial => {
				match Hierarchy::build(&self.model.nodes, &self.model.edges) {
					Ok(hierarchy) => {
						let (w, h) = (self.viewport.width, self.viewport.height);
						match self.layout {
							LayoutMode::Tree => layout::tree(&hierarchy, &mut self.model.nodes, w, h),
							_ => layout::radial(&hierarchy, &mut self.model.nodes, w, h),
						}
						// Static layouts leave no residual physics state.
						for node in &mut self.model.nodes {
							node.vx = 0.0;
							node.vy = 0.0;
							node.fx = None;
							node.fy = None;
						}
					}
					Err(error) => {
						warn!("{} layout unavailable ({error}), using force", self.layout);
						self.fell_back = true;
						self.start_simulation();
					}
				}
			}
		}
	}

	fn start_simulation(&mut self) {
		self.simulation = Some(Simulation::new(
			self.model.nodes.len(),
			&self.model.edges,
			self.viewport.width,
			self.viewport.height,
		));
	}

	/// React to a container resize: the force simulation re-anchors and
	/// reheats in place, static layouts recompute for the new dimensions.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.viewport.resize(width, height);
		match self.simulation.as_mut() {
			Some(sim) => {
				sim.set_center(width / 2.0, height / 2.0);
				sim.restart();
			}
			None => self.apply_layout(),
		}
	}

	/// One cooperative animation step: physics (if running) plus any camera
	/// transition. Linear in nodes + edges.
	pub fn tick(&mut self, dt: f64) {
		if let Some(sim) = self.simulation.as_mut() {
			sim.tick(&mut self.model.nodes, &self.model.edges);
		}
		self.viewport.tick(dt);
	}

	/// Node under a screen position, topmost (last drawn) first.
	pub fn node_at(&self, sx: f64, sy: f64) -> Option<usize> {
		let (wx, wy) = self.viewport.transform.invert(sx, sy);
		let hit = self.theme.node.hit_radius;
		self.model
			.nodes
			.iter()
			.enumerate()
			.rev()
			.find(|(_, node)| {
				let (dx, dy) = (node.x - wx, node.y - wy);
				(dx * dx + dy * dy).sqrt() < hit
			})
			.map(|(index, _)| index)
	}

	/// Pointer pressed: begin a node drag or a background pan.
	pub fn pointer_down(&mut self, sx: f64, sy: f64) {
		self.pointer = (sx, sy);
		if let Some(index) = self.node_at(sx, sy) {
			self.drag = DragState {
				node: Some(index),
				start_x: sx,
				start_y: sy,
				moved: false,
			};
			// Pin the node and keep the neighborhood reacting while it is
			// held (no-op outside the force layout).
			let node = &mut self.model.nodes[index];
			node.fx = Some(node.x);
			node.fy = Some(node.y);
			if let Some(sim) = self.simulation.as_mut() {
				sim.set_alpha_target(DRAG_ALPHA_TARGET);
				sim.restart();
			}
		} else {
			self.pan = PanState {
				active: true,
				start_x: sx,
				start_y: sy,
				transform_start_x: self.viewport.transform.x,
				transform_start_y: self.viewport.transform.y,
				moved: false,
			};
		}
	}

	/// Pointer moved: update hover, or advance the active drag/pan.
	pub fn pointer_move(&mut self, sx: f64, sy: f64) {
		self.pointer = (sx, sy);
		if let Some(index) = self.drag.node {
			let (dx, dy) = (sx - self.drag.start_x, sy - self.drag.start_y);
			if dx * dx + dy * dy > CLICK_SLOP_SQ {
				self.drag.moved = true;
			}
			if self.drag.moved {
				let (wx, wy) = self.viewport.transform.invert(sx, sy);
				let node = &mut self.model.nodes[index];
				node.fx = Some(wx);
				node.fy = Some(wy);
				node.x = wx;
				node.y = wy;
			}
		} else if self.pan.active {
			let (dx, dy) = (sx - self.pan.start_x, sy - self.pan.start_y);
			if dx * dx + dy * dy > CLICK_SLOP_SQ {
				self.pan.moved = true;
			}
			self.viewport
				.set_translation(self.pan.transform_start_x + dx, self.pan.transform_start_y + dy);
		} else {
			self.hovered = self.node_at(sx, sy);
		}
	}

	/// Pointer released: finish the drag or pan; a stationary release is a
	/// click (select) or background click (deselect).
	pub fn pointer_up(&mut self, sx: f64, sy: f64) -> Option<SelectionChange> {
		if let Some(index) = self.drag.node.take() {
			let clicked = !self.drag.moved;
			// Release the pin; the simulation cools back down on its own.
			let node = &mut self.model.nodes[index];
			node.fx = None;
			node.fy = None;
			if let Some(sim) = self.simulation.as_mut() {
				sim.set_alpha_target(0.0);
			}
			self.drag = DragState::default();
			if clicked {
				let id = self.model.nodes[index].id.clone();
				return self.select(&id);
			}
			return None;
		}
		if self.pan.active {
			let background_click = !self.pan.moved;
			self.pan = PanState::default();
			if background_click && self.node_at(sx, sy).is_none() {
				return self.deselect();
			}
		}
		None
	}

	/// Pointer left the canvas: abandon any gesture in progress.
	pub fn pointer_leave(&mut self) {
		if let Some(index) = self.drag.node.take() {
			self.model.nodes[index].fx = None;
			self.model.nodes[index].fy = None;
			if let Some(sim) = self.simulation.as_mut() {
				sim.set_alpha_target(0.0);
			}
		}
		self.drag = DragState::default();
		self.pan = PanState::default();
		self.hovered = None;
	}

	/// Wheel zoom about the cursor.
	pub fn wheel(&mut self, sx: f64, sy: f64, delta_y: f64) {
		let factor = if delta_y > 0.0 { 0.9 } else { 1.1 };
		self.viewport.zoom_at(sx, sy, factor);
	}

	/// Select a node by id, emitting its component from the input graph.
	/// A stale or unknown id clears the selection and emits nothing.
	pub fn select(&mut self, id: &str) -> Option<SelectionChange> {
		if !self.selection.select(id, &self.model) {
			return None;
		}
		self.graph
			.as_ref()
			.and_then(|g| g.component(id))
			.cloned()
			.map(SelectionChange::Selected)
	}

	/// Clear the selection, emitting the null signal.
	pub fn deselect(&mut self) -> Option<SelectionChange> {
		self.selection.clear();
		Some(SelectionChange::Cleared)
	}

	/// External focus request: select the node and fly the camera to its
	/// stored position at focus scale.
	pub fn focus_node(&mut self, id: &str) -> Option<SelectionChange> {
		let index = self.model.node_index(id)?;
		let change = self.select(id);
		self.viewport.focus_on(&self.model.nodes[index]);
		change
	}

	/// Whether the force simulation is currently advancing.
	pub fn simulation_running(&self) -> bool {
		self.simulation.as_ref().is_some_and(Simulation::running)
	}
}

#[cfg(test)]
mod tests {
	use super::super::types::DependencyLink;
	use super::*;

	fn graph(ids: &[&str], edges: &[(&str, &str)]) -> DependencyGraph {
		DependencyGraph {
			components: ids
				.iter()
				.map(|id| ComponentInfo {
					item_id: id.to_string(),
					name: format!("app.{id}"),
					file_path: format!("src/{id}.ts"),
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
		}
	}

	fn state_with(ids: &[&str], edges: &[(&str, &str)]) -> GraphState {
		let mut state = GraphState::new(800.0, 600.0, Theme::default());
		state.set_data(Some(graph(ids, edges)));
		state
	}

	#[test]
	fn operations_are_noops_without_data() {
		let mut state = GraphState::new(800.0, 600.0, Theme::default());
		assert!(state.set_data(None).is_none());
		state.set_layout(LayoutMode::Tree);
		state.resize(1024.0, 768.0);
		state.tick(0.016);
		assert!(state.model.nodes.is_empty());
		assert!(!state.simulation_running());
	}

	#[test]
	fn force_layout_starts_a_simulation() {
		let state = state_with(&["a", "b"], &[("a", "b")]);
		assert_eq!(state.effective_layout(), LayoutMode::Force);
		assert!(state.simulation_running());
	}

	#[test]
	fn tree_layout_stops_the_simulation_and_positions_nodes() {
		let mut state = state_with(&["a", "b", "c"], &[("a", "b"), ("a", "c")]);
		state.set_layout(LayoutMode::Tree);
		assert!(!state.simulation_running());
		assert!(!state.fell_back);
		for node in &state.model.nodes {
			assert!(node.x >= 50.0 && node.x <= 750.0);
			assert!(node.y >= 50.0 && node.y <= 550.0);
		}
	}

	#[test]
	fn cyclic_graph_falls_back_to_force() {
		let mut state = state_with(&["a", "b"], &[("a", "b"), ("b", "a")]);
		state.set_layout(LayoutMode::Radial);
		assert!(state.fell_back);
		assert_eq!(state.effective_layout(), LayoutMode::Force);
		assert!(state.simulation_running());
	}

	#[test]
	fn layout_round_trip_keeps_model_and_selection() {
		let mut state = state_with(&["a", "b"], &[("a", "b")]);
		state.select("a");
		state.set_layout(LayoutMode::Tree);
		state.set_layout(LayoutMode::Force);
		assert_eq!(state.model.nodes.len(), 2);
		assert_eq!(state.model.edges.len(), 1);
		assert_eq!(state.selection.selected_id(), Some("a"));
	}

	#[test]
	fn selecting_emits_the_original_component() {
		let mut state = state_with(&["a", "b"], &[("a", "b")]);
		let change = state.select("a").unwrap();
		match change {
			SelectionChange::Selected(component) => {
				assert_eq!(component.item_id, "a");
				assert_eq!(component.name, "app.a");
			}
			SelectionChange::Cleared => panic!("expected a selection"),
		}
	}

	#[test]
	fn selecting_a_stale_id_emits_nothing_and_stays_idle() {
		let mut state = state_with(&["a"], &[]);
		assert!(state.select("gone").is_none());
		assert!(!state.selection.is_focused());
	}

	#[test]
	fn data_replacement_invalidating_selection_emits_cleared() {
		let mut state = state_with(&["a", "b"], &[("a", "b")]);
		state.select("a");
		let change = state.set_data(Some(graph(&["b"], &[])));
		assert_eq!(change, Some(SelectionChange::Cleared));
		assert!(!state.selection.is_focused());
	}

	#[test]
	fn data_replacement_keeps_a_surviving_selection() {
		let mut state = state_with(&["a", "b"], &[("a", "b")]);
		state.select("a");
		let change = state.set_data(Some(graph(&["a", "c"], &[("c", "a")])));
		assert!(change.is_none());
		assert_eq!(state.selection.selected_id(), Some("a"));
	}

	#[test]
	fn click_on_a_node_selects_it() {
		let mut state = state_with(&["a", "b"], &[("a", "b")]);
		state.set_layout(LayoutMode::Tree);
		let node = state.model.nodes[0].clone();
		state.pointer_down(node.x, node.y);
		let change = state.pointer_up(node.x, node.y);
		assert!(matches!(change, Some(SelectionChange::Selected(_))));
		assert_eq!(state.selection.selected_id(), Some("a"));
	}

	#[test]
	fn background_click_clears_the_selection() {
		let mut state = state_with(&["a", "b"], &[("a", "b")]);
		state.set_layout(LayoutMode::Tree);
		state.select("a");
		// Far corner: no node within hit radius.
		state.pointer_down(1.0, 1.0);
		let change = state.pointer_up(1.0, 1.0);
		assert_eq!(change, Some(SelectionChange::Cleared));
		assert!(!state.selection.is_focused());
	}

	#[test]
	fn dragging_a_node_pins_it_and_release_unpins() {
		let mut state = state_with(&["a", "b"], &[("a", "b")]);
		let node = state.model.nodes[0].clone();
		state.pointer_down(node.x, node.y);
		assert!(state.model.nodes[0].fx.is_some());
		state.pointer_move(node.x + 40.0, node.y + 25.0);
		state.tick(0.016);
		assert_eq!(state.model.nodes[0].x, node.x + 40.0);
		assert_eq!(state.model.nodes[0].y, node.y + 25.0);
		let change = state.pointer_up(node.x + 40.0, node.y + 25.0);
		assert!(change.is_none(), "a real drag is not a click");
		assert!(state.model.nodes[0].fx.is_none());
	}

	#[test]
	fn background_drag_pans_the_viewport() {
		let mut state = state_with(&["a"], &[]);
		state.set_layout(LayoutMode::Tree);
		state.pointer_down(5.0, 5.0);
		state.pointer_move(45.0, 25.0);
		let change = state.pointer_up(45.0, 25.0);
		assert!(change.is_none(), "a pan is not a background click");
		assert_eq!(state.viewport.transform.x, 40.0);
		assert_eq!(state.viewport.transform.y, 20.0);
	}

	#[test]
	fn hover_tracks_the_node_under_the_pointer() {
		let mut state = state_with(&["a", "b"], &[]);
		state.set_layout(LayoutMode::Tree);
		let node = state.model.nodes[1].clone();
		state.pointer_move(node.x, node.y);
		assert_eq!(state.hovered, Some(1));
		state.pointer_move(1.0, 1.0);
		assert_eq!(state.hovered, None);
	}

	#[test]
	fn focus_request_selects_and_flies_to_the_node() {
		let mut state = state_with(&["a", "b"], &[("a", "b")]);
		state.set_layout(LayoutMode::Radial);
		let change = state.focus_node("b");
		assert!(matches!(change, Some(SelectionChange::Selected(_))));
		// Finish the camera transition and check the node is centered.
		while state.viewport.tick(0.1) {}
		let node = &state.model.nodes[state.model.node_index("b").unwrap()];
		let (sx, sy) = state.viewport.transform.apply(node.x, node.y);
		assert!((sx - 400.0).abs() < 1e-9);
		assert!((sy - 300.0).abs() < 1e-9);
		assert_eq!(state.viewport.transform.k, 1.5);
	}

	#[test]
	fn resize_reanchors_a_running_simulation() {
		let mut state = state_with(&["a", "b"], &[("a", "b")]);
		for _ in 0..600 {
			state.tick(0.016);
		}
		assert!(!state.simulation_running(), "simulation should have cooled");
		state.resize(1000.0, 400.0);
		assert!(state.simulation_running(), "resize restarts the simulation");
		for _ in 0..600 {
			state.tick(0.016);
		}
		let cx: f64 = state.model.nodes.iter().map(|n| n.x).sum::<f64>() / 2.0;
		assert!((cx - 500.0).abs() < 2.0);
	}

	#[test]
	fn resize_relays_static_layouts_into_the_new_bounds() {
		let mut state = state_with(&["a", "b", "c"], &[("a", "b"), ("b", "c")]);
		state.set_layout(LayoutMode::Tree);
		state.resize(400.0, 300.0);
		for node in &state.model.nodes {
			assert!(node.x >= 50.0 && node.x <= 350.0);
			assert!(node.y >= 50.0 && node.y <= 250.0);
		}
	}
}
