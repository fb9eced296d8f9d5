//! Static layout engines: tree and radial placement.
//!
//! Both consume a [`Hierarchy`] and write final screen-space positions onto
//! the render nodes, so focusing and hit testing read the same coordinates
//! in every layout. The virtual root is positioned implicitly (it anchors
//! depth 0) but has no render node and never appears on screen.

use std::fmt;
use std::str::FromStr;

use super::hierarchy::Hierarchy;
use super::model::RenderNode;

/// Which layout algorithm positions the nodes.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum LayoutMode {
	#[default]
	Force,
	Tree,
	Radial,
}

impl LayoutMode {
	pub const ALL: [LayoutMode; 3] = [LayoutMode::Force, LayoutMode::Tree, LayoutMode::Radial];

	pub fn label(self) -> &'static str {
		match self {
			LayoutMode::Force => "force",
			LayoutMode::Tree => "tree",
			LayoutMode::Radial => "radial",
		}
	}
}

impl fmt::Display for LayoutMode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.label())
	}
}

impl FromStr for LayoutMode {
	type Err = ();

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"force" => Ok(LayoutMode::Force),
			"tree" => Ok(LayoutMode::Tree),
			"radial" => Ok(LayoutMode::Radial),
			_ => Err(()),
		}
	}
}

/// Width/height inset keeping tree nodes off the viewport edges.
const TREE_MARGIN: f64 = 100.0;
/// Inset between the outermost radial ring and the nearest viewport edge.
const RADIAL_INSET: f64 = 80.0;

/// Place nodes left-to-right by depth, top-to-bottom by in-order leaf slot.
///
/// True roots (depth 1) sit at the left margin; the deepest nodes at the
/// right. The breadth axis spans the full inset height, which centers the
/// tree vertically without a separate render-time offset.
pub fn tree(hierarchy: &Hierarchy, nodes: &mut [RenderNode], width: f64, height: f64) {
	let span_x = (width - TREE_MARGIN).max(0.0);
	let span_y = (height - TREE_MARGIN).max(0.0);
	let depth_range = hierarchy.max_depth.saturating_sub(1).max(1) as f64;
	let breadth_range = hierarchy.leaf_count.saturating_sub(1).max(1) as f64;

	for (node_index, entry) in hierarchy.real_nodes() {
		// Depth 1 (true roots) maps to the left edge of the inset area.
		let dt = (entry.depth.saturating_sub(1)) as f64 / depth_range;
		let bt = if hierarchy.leaf_count > 1 {
			entry.breadth / breadth_range
		} else {
			0.5
		};
		nodes[node_index].x = TREE_MARGIN / 2.0 + dt * span_x;
		nodes[node_index].y = TREE_MARGIN / 2.0 + bt * span_y;
	}
}

/// Place nodes on concentric rings: depth maps to radius, in-order leaf slot
/// to angle. Angle 0 is straight up (the -90 degree offset), growing
/// clockwise through a full revolution.
pub fn radial(hierarchy: &Hierarchy, nodes: &mut [RenderNode], width: f64, height: f64) {
	let max_radius = (width.min(height) / 2.0 - RADIAL_INSET).max(0.0);
	let center = (width / 2.0, height / 2.0);
	let depth_range = hierarchy.max_depth.max(1) as f64;
	let leaves = hierarchy.leaf_count.max(1) as f64;

	for (node_index, entry) in hierarchy.real_nodes() {
		let radius = entry.depth as f64 / depth_range * max_radius;
		let angle_deg = entry.breadth / leaves * 360.0;
		let angle = (angle_deg - 90.0).to_radians();
		nodes[node_index].x = center.0 + radius * angle.cos();
		nodes[node_index].y = center.1 + radius * angle.sin();
	}
}
