//! Force-directed layout simulation.
//!
//! Four composed forces (link attraction toward a fixed separation,
//! pairwise many-body repulsion, viewport centering, and short-range
//! collision) are integrated over cooperative ticks driven by the host's
//! animation loop. The simulation cools along an alpha schedule and stops on
//! its own once alpha decays below the minimum; dragging a node raises the
//! alpha target so neighbors keep reacting while the node is pinned.
//!
//! The simulation owns no node storage: it mutates the render model's
//! position/velocity fields in place and is stopped explicitly before being
//! discarded, so a stale instance can never touch a rebuilt model.

use super::model::{RenderEdge, RenderNode};

/// Target separation for connected nodes, in world units.
const LINK_DISTANCE: f64 = 100.0;
/// Many-body strength; negative is repulsive.
const CHARGE_STRENGTH: f64 = -300.0;
/// Minimum separation enforced by the collision force.
const COLLIDE_RADIUS: f64 = 40.0;
/// Alpha below which a cooling simulation goes idle.
const ALPHA_MIN: f64 = 0.001;
/// Fraction of the remaining alpha gap closed per tick (~300 ticks to cool).
const ALPHA_DECAY: f64 = 0.0228;
/// Velocity retained per tick after integration.
const VELOCITY_DECAY: f64 = 0.6;
/// Alpha target applied while a node is dragged.
pub const DRAG_ALPHA_TARGET: f64 = 0.3;

/// The force simulation for one render model generation.
#[derive(Clone, Debug)]
pub struct Simulation {
	alpha: f64,
	alpha_target: f64,
	center: (f64, f64),
	/// Incident edge count per node, for link strength/bias.
	degree: Vec<usize>,
	running: bool,
}

impl Simulation {
	/// Create a hot simulation centered on the viewport.
	pub fn new(node_count: usize, edges: &[RenderEdge], width: f64, height: f64) -> Self {
		let mut degree = vec![0usize; node_count];
		for edge in edges {
			degree[edge.source] += 1;
			degree[edge.target] += 1;
		}
		Self {
			alpha: 1.0,
			alpha_target: 0.0,
			center: (width / 2.0, height / 2.0),
			degree,
			running: true,
		}
	}

	/// Whether ticks currently do any work.
	pub fn running(&self) -> bool {
		self.running
	}

	/// Current simulation temperature.
	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	/// Re-anchor the centering force, e.g. after a viewport resize.
	pub fn set_center(&mut self, x: f64, y: f64) {
		self.center = (x, y);
	}

	/// Reheat to full temperature without touching positions.
	pub fn restart(&mut self) {
		self.alpha = 1.0;
		self.running = true;
	}

	/// Raise or release the alpha floor. A non-zero target keeps the
	/// simulation warm (used during drags); zero lets it cool back down.
	pub fn set_alpha_target(&mut self, target: f64) {
		self.alpha_target = target;
		if target > 0.0 {
			self.running = true;
		}
	}

	/// Stop the simulation. Ticks become no-ops until restarted.
	pub fn stop(&mut self) {
		self.running = false;
	}

	/// Advance one step. Returns false when nothing was done, so a tick
	/// firing against a settled or stopped simulation is a no-op.
	pub fn tick(&mut self, nodes: &mut [RenderNode], edges: &[RenderEdge]) -> bool {
		if !self.running || nodes.is_empty() {
			return false;
		}

		self.alpha += (self.alpha_target - self.alpha) * ALPHA_DECAY;
		if self.alpha < ALPHA_MIN {
			self.running = false;
			return false;
		}

		self.apply_links(nodes, edges);
		self.apply_charge(nodes);
		self.apply_center(nodes);
		self.apply_collide(nodes);
		self.integrate(nodes);
		true
	}

	/// Pull connected nodes toward [`LINK_DISTANCE`] apart. Strength and
	/// bias favor the less-connected endpoint so hubs stay put.
	fn apply_links(&self, nodes: &mut [RenderNode], edges: &[RenderEdge]) {
		for edge in edges {
			if edge.source == edge.target {
				continue;
			}
			let (s, t) = (edge.source, edge.target);
			let dx = (nodes[t].x + nodes[t].vx) - (nodes[s].x + nodes[s].vx);
			let dy = (nodes[t].y + nodes[t].vy) - (nodes[s].y + nodes[s].vy);
			let dist = (dx * dx + dy * dy).sqrt().max(1e-6);

			let strength = 1.0 / self.degree[s].min(self.degree[t]).max(1) as f64;
			let pull = (dist - LINK_DISTANCE) / dist * self.alpha * strength;
			let bias = self.degree[s] as f64 / (self.degree[s] + self.degree[t]).max(1) as f64;

			nodes[t].vx -= dx * pull * bias;
			nodes[t].vy -= dy * pull * bias;
			nodes[s].vx += dx * pull * (1.0 - bias);
			nodes[s].vy += dy * pull * (1.0 - bias);
		}
	}

	/// Pairwise repulsion, linear falloff with squared distance.
	fn apply_charge(&self, nodes: &mut [RenderNode]) {
		for i in 0..nodes.len() {
			for j in (i + 1)..nodes.len() {
				let dx = nodes[j].x - nodes[i].x;
				let dy = nodes[j].y - nodes[i].y;
				// Softened to keep coincident nodes from exploding.
				let dist_sq = (dx * dx + dy * dy).max(1.0);
				let force = CHARGE_STRENGTH * self.alpha / dist_sq;
				let (fx, fy) = (dx * force, dy * force);
				nodes[i].vx += fx;
				nodes[i].vy += fy;
				nodes[j].vx -= fx;
				nodes[j].vy -= fy;
			}
		}
	}

	/// Translate the whole layout so its centroid sits on the center anchor.
	fn apply_center(&self, nodes: &mut [RenderNode]) {
		let count = nodes.len() as f64;
		let cx: f64 = nodes.iter().map(|n| n.x).sum::<f64>() / count;
		let cy: f64 = nodes.iter().map(|n| n.y).sum::<f64>() / count;
		let (dx, dy) = (self.center.0 - cx, self.center.1 - cy);
		for node in nodes.iter_mut() {
			node.x += dx;
			node.y += dy;
		}
	}

	/// Push overlapping pairs apart to at least [`COLLIDE_RADIUS`],
	/// overriding link/charge at short range by acting on positions.
	fn apply_collide(&self, nodes: &mut [RenderNode]) {
		for i in 0..nodes.len() {
			for j in (i + 1)..nodes.len() {
				let mut dx = nodes[j].x - nodes[i].x;
				let mut dy = nodes[j].y - nodes[i].y;
				let mut dist = (dx * dx + dy * dy).sqrt();
				if dist >= COLLIDE_RADIUS {
					continue;
				}
				if dist < 1e-6 {
					// Deterministic nudge for coincident nodes.
					dx = 1e-3;
					dy = 0.0;
					dist = 1e-3;
				}
				let push = (COLLIDE_RADIUS - dist) / dist * 0.5;
				let (px, py) = (dx * push, dy * push);
				if nodes[i].fx.is_none() {
					nodes[i].x -= px;
					nodes[i].y -= py;
				}
				if nodes[j].fx.is_none() {
					nodes[j].x += px;
					nodes[j].y += py;
				}
			}
		}
	}

	/// Apply velocities with decay; pinned nodes snap to their pin and
	/// carry no velocity.
	fn integrate(&self, nodes: &mut [RenderNode]) {
		for node in nodes.iter_mut() {
			if let (Some(fx), Some(fy)) = (node.fx, node.fy) {
				node.x = fx;
				node.y = fy;
				node.vx = 0.0;
				node.vy = 0.0;
				continue;
			}
			node.vx *= VELOCITY_DECAY;
			node.vy *= VELOCITY_DECAY;
			node.x += node.vx;
			node.y += node.vy;
		}
	}
}
