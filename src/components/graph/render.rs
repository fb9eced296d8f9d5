//! Canvas rendering for the dependency graph.
//!
//! Drawing happens in passes for correct z-ordering: background (screen
//! space), then edges and nodes under the viewport transform (world space),
//! then the hover tooltip back in screen space. All emphasis styling is
//! derived from the selection on every frame, so highlight state can never
//! survive a re-layout it should not.

use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::layout::LayoutMode;
use super::model::{RenderEdge, RenderNode};
use super::selection::Emphasis;
use super::state::GraphState;

/// Arrowhead length in world units.
const ARROW_SIZE: f64 = 8.0;
/// Screen-space offset between the cursor and the tooltip box.
const TOOLTIP_OFFSET: (f64, f64) = (12.0, -24.0);

/// Render the complete scene.
pub fn render(state: &GraphState, ctx: &CanvasRenderingContext2d) {
	let theme = &state.theme;

	ctx.set_fill_style_str(&theme.background.to_css());
	ctx.fill_rect(0.0, 0.0, state.viewport.width, state.viewport.height);

	ctx.save();
	let transform = state.viewport.transform;
	let _ = ctx.translate(transform.x, transform.y);
	let _ = ctx.scale(transform.k, transform.k);

	let curved = state.effective_layout() == LayoutMode::Tree;
	for edge in &state.model.edges {
		draw_edge(state, ctx, edge, curved, transform.k);
	}
	for (index, node) in state.model.nodes.iter().enumerate() {
		draw_node(state, ctx, index, node, transform.k);
	}

	ctx.restore();

	if let Some(index) = state.hovered {
		draw_tooltip(state, ctx, &state.model.nodes[index]);
	}
}

fn draw_edge(
	state: &GraphState,
	ctx: &CanvasRenderingContext2d,
	edge: &RenderEdge,
	curved: bool,
	k: f64,
) {
	let theme = &state.theme;
	let source = &state.model.nodes[edge.source];
	let target = &state.model.nodes[edge.target];

	let (dx, dy) = (target.x - source.x, target.y - source.y);
	let dist = (dx * dx + dy * dy).sqrt();
	if dist < 0.001 {
		return;
	}

	let emphasized = state.selection.edge_emphasized(edge, &state.model);
	let (color, width) = if emphasized {
		(
			theme.edge.emphasis_color.to_css(),
			theme.edge.emphasis_width / k,
		)
	} else {
		(
			theme.edge.color.with_alpha(theme.edge.opacity).to_css(),
			theme.edge.width / k,
		)
	};
	ctx.set_stroke_style_str(&color);
	ctx.set_line_width(width);

	// Pull the endpoint back so the arrow tip rests on the node outline.
	let target_radius = node_radius(state, target) + ARROW_SIZE;
	let (ux, uy) = (dx / dist, dy / dist);

	let arrow_direction = if curved {
		// Horizontal cubic, control points at the midpoint x. The end
		// tangent runs from the second control point to the target.
		let mid_x = (source.x + target.x) / 2.0;
		let (end_x, end_y) = (target.x - ux * target_radius, target.y - uy * target_radius);
		ctx.begin_path();
		ctx.move_to(source.x, source.y);
		ctx.bezier_curve_to(mid_x, source.y, mid_x, target.y, end_x, end_y);
		ctx.stroke();

		let (tx, ty) = (end_x - mid_x, end_y - target.y);
		let len = (tx * tx + ty * ty).sqrt().max(0.001);
		(tx / len, ty / len)
	} else {
		ctx.begin_path();
		ctx.move_to(source.x, source.y);
		ctx.line_to(target.x - ux * target_radius, target.y - uy * target_radius);
		ctx.stroke();
		(ux, uy)
	};

	draw_arrowhead(state, ctx, target, arrow_direction, &color);
}

/// Filled triangle pointing along `direction` at the target node's rim.
fn draw_arrowhead(
	state: &GraphState,
	ctx: &CanvasRenderingContext2d,
	target: &RenderNode,
	direction: (f64, f64),
	color: &str,
) {
	let (ux, uy) = direction;
	let rim = node_radius(state, target);
	let (tip_x, tip_y) = (target.x - ux * rim, target.y - uy * rim);
	let (back_x, back_y) = (tip_x - ux * ARROW_SIZE, tip_y - uy * ARROW_SIZE);
	let (px, py) = (-uy * ARROW_SIZE * 0.5, ux * ARROW_SIZE * 0.5);

	ctx.set_fill_style_str(color);
	ctx.begin_path();
	ctx.move_to(tip_x, tip_y);
	ctx.line_to(back_x + px, back_y + py);
	ctx.line_to(back_x - px, back_y - py);
	ctx.close_path();
	ctx.fill();
}

/// Node radius with the selection emphasis multiplier applied.
fn node_radius(state: &GraphState, node: &RenderNode) -> f64 {
	node.radius * state.selection.node_emphasis(&node.id).radius_multiplier()
}

fn draw_node(
	state: &GraphState,
	ctx: &CanvasRenderingContext2d,
	index: usize,
	node: &RenderNode,
	k: f64,
) {
	let theme = &state.theme;
	let emphasis = state.selection.node_emphasis(&node.id);
	let radius = node.radius * emphasis.radius_multiplier();

	ctx.begin_path();
	let _ = ctx.arc(node.x, node.y, radius, 0.0, 2.0 * PI);
	ctx.set_fill_style_str(&node.color.to_css());
	ctx.fill();

	let (outline, outline_width) = match emphasis {
		Emphasis::Selected => (
			theme.node.selected_outline,
			theme.node.selected_outline_width,
		),
		Emphasis::Neighbor => (
			theme.node.neighbor_outline,
			theme.node.neighbor_outline_width,
		),
		Emphasis::Base => (theme.node.outline, theme.node.outline_width),
	};
	ctx.set_stroke_style_str(&outline.to_css());
	ctx.set_line_width(outline_width / k);
	ctx.stroke();

	// Hovered nodes get their label even at low zoom.
	let show_label = k > 0.4 || state.hovered == Some(index) || emphasis != Emphasis::Base;
	if show_label {
		ctx.set_fill_style_str(&theme.node.label_color.to_css());
		ctx.set_font(&format!("{}px sans-serif", theme.node.label_size / k));
		let _ = ctx.fill_text(&node.name, node.x + radius + 10.0, node.y + 4.0);
	}
}

/// Screen-space tooltip with the node's name, path, and metadata entries.
fn draw_tooltip(state: &GraphState, ctx: &CanvasRenderingContext2d, node: &RenderNode) {
	let theme = &state.theme;
	let mut lines = vec![node.name.clone(), format!("Path: {}", node.file_path)];
	if let Some(metadata) = &node.metadata {
		for (key, value) in metadata {
			let value = value.as_str().map_or_else(|| value.to_string(), str::to_string);
			lines.push(format!("{key}: {value}"));
		}
	}

	let font_size = 12.0;
	let line_height = font_size + 4.0;
	let padding = 10.0;
	ctx.set_font(&format!("{font_size}px sans-serif"));

	let mut width: f64 = 0.0;
	for line in &lines {
		if let Ok(metrics) = ctx.measure_text(line) {
			width = width.max(metrics.width());
		}
	}
	let box_width = width + padding * 2.0;
	let box_height = lines.len() as f64 * line_height + padding * 2.0 - 4.0;

	// Keep the box inside the canvas.
	let (px, py) = state.pointer;
	let x = (px + TOOLTIP_OFFSET.0).min(state.viewport.width - box_width - 4.0).max(4.0);
	let y = (py + TOOLTIP_OFFSET.1).min(state.viewport.height - box_height - 4.0).max(4.0);

	ctx.set_fill_style_str(&theme.tooltip_background.to_css());
	fill_rounded_rect(ctx, x, y, box_width, box_height, 4.0);

	ctx.set_fill_style_str(&theme.tooltip_text.to_css());
	for (i, line) in lines.iter().enumerate() {
		let _ = ctx.fill_text(line, x + padding, y + padding + font_size - 2.0 + i as f64 * line_height);
	}
}

fn fill_rounded_rect(
	ctx: &CanvasRenderingContext2d,
	x: f64,
	y: f64,
	w: f64,
	h: f64,
	r: f64,
) {
	ctx.begin_path();
	ctx.move_to(x + r, y);
	let _ = ctx.arc_to(x + w, y, x + w, y + h, r);
	let _ = ctx.arc_to(x + w, y + h, x, y + h, r);
	let _ = ctx.arc_to(x, y + h, x, y, r);
	let _ = ctx.arc_to(x, y, x + w, y, r);
	ctx.close_path();
	ctx.fill();
}
