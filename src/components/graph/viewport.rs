//! Viewport transform: pan, zoom, and camera animations.
//!
//! A single translate-plus-uniform-scale transform is applied to the whole
//! scene, independent of the active layout. Discrete operations (zoom
//! buttons, reset, center, focus-on-node) animate toward their target over a
//! fixed duration; wheel zoom and drag panning apply immediately. A new
//! animation simply overrides the previous target.

use super::model::RenderNode;

/// Zoom scale bounds.
const MIN_SCALE: f64 = 0.1;
const MAX_SCALE: f64 = 5.0;
/// Step for the zoom-in/out operations (+20%, and its exact inverse going
/// out, so the two operations cancel).
const ZOOM_STEP: f64 = 1.2;
/// Scale applied when focusing on a node.
const FOCUS_SCALE: f64 = 1.5;
/// Seconds for zoom/reset/center animations.
const ZOOM_DURATION: f64 = 0.25;
/// Seconds for the focus-on-node animation.
const FOCUS_DURATION: f64 = 0.75;

/// Pan/zoom transform mapping world coordinates to screen coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	/// Uniform scale, clamped to [0.1, 5.0].
	pub k: f64,
}

impl ViewTransform {
	pub const IDENTITY: ViewTransform = ViewTransform {
		x: 0.0,
		y: 0.0,
		k: 1.0,
	};

	/// World position to screen position.
	pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
		(x * self.k + self.x, y * self.k + self.y)
	}

	/// Screen position back to world position.
	pub fn invert(&self, sx: f64, sy: f64) -> (f64, f64) {
		((sx - self.x) / self.k, (sy - self.y) / self.k)
	}

	fn lerp(a: &ViewTransform, b: &ViewTransform, t: f64) -> ViewTransform {
		ViewTransform {
			x: a.x + (b.x - a.x) * t,
			y: a.y + (b.y - a.y) * t,
			k: a.k + (b.k - a.k) * t,
		}
	}
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self::IDENTITY
	}
}

/// An in-flight camera animation. Time-bounded; not cancelable, only
/// overridable by a newer transition.
#[derive(Clone, Debug)]
struct Transition {
	from: ViewTransform,
	to: ViewTransform,
	elapsed: f64,
	duration: f64,
}

/// Cubic ease-in-out.
fn ease_cubic(t: f64) -> f64 {
	let t = t.clamp(0.0, 1.0) * 2.0;
	if t < 1.0 {
		t * t * t / 2.0
	} else {
		let t = t - 2.0;
		(t * t * t + 2.0) / 2.0
	}
}

/// Owns the scene transform and the viewport dimensions.
#[derive(Clone, Debug, Default)]
pub struct Viewport {
	pub transform: ViewTransform,
	pub width: f64,
	pub height: f64,
	transition: Option<Transition>,
}

impl Viewport {
	pub fn new(width: f64, height: f64) -> Self {
		Self {
			transform: ViewTransform::IDENTITY,
			width,
			height,
			transition: None,
		}
	}

	/// Update dimensions after a container resize.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}

	/// Advance any running animation. Returns true while one is active.
	pub fn tick(&mut self, dt: f64) -> bool {
		let Some(transition) = self.transition.as_mut() else {
			return false;
		};
		transition.elapsed += dt;
		let t = transition.elapsed / transition.duration;
		if t >= 1.0 {
			self.transform = transition.to;
			self.transition = None;
			false
		} else {
			self.transform = ViewTransform::lerp(&transition.from, &transition.to, ease_cubic(t));
			true
		}
	}

	fn animate_to(&mut self, to: ViewTransform, duration: f64) {
		self.transition = Some(Transition {
			from: self.transform,
			to,
			elapsed: 0.0,
			duration,
		});
	}

	/// Zoom in by one step around the viewport center.
	pub fn zoom_in(&mut self) {
		self.scale_by(ZOOM_STEP);
	}

	/// Zoom out by one step around the viewport center.
	pub fn zoom_out(&mut self) {
		self.scale_by(1.0 / ZOOM_STEP);
	}

	fn scale_by(&mut self, factor: f64) {
		let current = self.transform;
		let k = (current.k * factor).clamp(MIN_SCALE, MAX_SCALE);
		// Keep the world point under the viewport center fixed.
		let (cx, cy) = (self.width / 2.0, self.height / 2.0);
		let (wx, wy) = current.invert(cx, cy);
		self.animate_to(
			ViewTransform {
				x: cx - wx * k,
				y: cy - wy * k,
				k,
			},
			ZOOM_DURATION,
		);
	}

	/// Animate back to the identity transform.
	pub fn reset(&mut self) {
		self.animate_to(ViewTransform::IDENTITY, ZOOM_DURATION);
	}

	/// Animate so the world origin sits at the viewport center at scale 1.
	pub fn center(&mut self) {
		self.animate_to(
			ViewTransform {
				x: self.width / 2.0,
				y: self.height / 2.0,
				k: 1.0,
			},
			ZOOM_DURATION,
		);
	}

	/// Animate so the node's stored position lands on the viewport center at
	/// focus scale. Positions are authoritative on the node for every
	/// layout, so no render output is ever read back.
	pub fn focus_on(&mut self, node: &RenderNode) {
		self.animate_to(
			ViewTransform {
				x: self.width / 2.0 - node.x * FOCUS_SCALE,
				y: self.height / 2.0 - node.y * FOCUS_SCALE,
				k: FOCUS_SCALE,
			},
			FOCUS_DURATION,
		);
	}

	/// Immediate wheel zoom about a cursor position.
	pub fn zoom_at(&mut self, sx: f64, sy: f64, factor: f64) {
		let k = (self.transform.k * factor).clamp(MIN_SCALE, MAX_SCALE);
		let ratio = k / self.transform.k;
		self.transform.x = sx - (sx - self.transform.x) * ratio;
		self.transform.y = sy - (sy - self.transform.y) * ratio;
		self.transform.k = k;
		self.transition = None;
	}

	/// Immediate translation, used while panning.
	pub fn set_translation(&mut self, x: f64, y: f64) {
		self.transform.x = x;
		self.transform.y = y;
		self.transition = None;
	}
}

#[cfg(test)]
mod tests {
	use super::super::theme::Color;
	use super::*;

	fn settle(viewport: &mut Viewport) {
		while viewport.tick(0.1) {}
	}

	fn node_at(x: f64, y: f64) -> RenderNode {
		RenderNode {
			id: "n".to_string(),
			name: "n".to_string(),
			file_path: String::new(),
			radius: 5.0,
			color: Color::rgb(0, 0, 0),
			metadata: None,
			x,
			y,
			vx: 0.0,
			vy: 0.0,
			fx: None,
			fy: None,
		}
	}

	#[test]
	fn zoom_in_then_out_restores_scale() {
		let mut viewport = Viewport::new(800.0, 600.0);
		viewport.zoom_in();
		settle(&mut viewport);
		assert!((viewport.transform.k - 1.2).abs() < 1e-9);
		viewport.zoom_out();
		settle(&mut viewport);
		assert!((viewport.transform.k - 1.0).abs() < 1e-9);
	}

	#[test]
	fn scale_is_clamped_both_ways() {
		let mut viewport = Viewport::new(800.0, 600.0);
		for _ in 0..30 {
			viewport.zoom_in();
			settle(&mut viewport);
		}
		assert!(viewport.transform.k <= 5.0 + 1e-9);
		for _ in 0..60 {
			viewport.zoom_out();
			settle(&mut viewport);
		}
		assert!(viewport.transform.k >= 0.1 - 1e-9);
	}

	#[test]
	fn reset_returns_to_identity() {
		let mut viewport = Viewport::new(800.0, 600.0);
		viewport.zoom_at(100.0, 100.0, 2.0);
		viewport.reset();
		settle(&mut viewport);
		assert_eq!(viewport.transform, ViewTransform::IDENTITY);
	}

	#[test]
	fn center_puts_origin_at_viewport_center() {
		let mut viewport = Viewport::new(800.0, 600.0);
		viewport.center();
		settle(&mut viewport);
		assert_eq!(viewport.transform.apply(0.0, 0.0), (400.0, 300.0));
		assert_eq!(viewport.transform.k, 1.0);
	}

	#[test]
	fn focus_centers_the_node_at_focus_scale() {
		let mut viewport = Viewport::new(800.0, 600.0);
		let node = node_at(120.0, -40.0);
		viewport.focus_on(&node);
		settle(&mut viewport);
		assert_eq!(viewport.transform.k, 1.5);
		let (sx, sy) = viewport.transform.apply(node.x, node.y);
		assert!((sx - 400.0).abs() < 1e-9);
		assert!((sy - 300.0).abs() < 1e-9);
	}

	#[test]
	fn wheel_zoom_keeps_the_cursor_point_fixed() {
		let mut viewport = Viewport::new(800.0, 600.0);
		viewport.zoom_at(200.0, 150.0, 1.4);
		let before = viewport.transform.invert(200.0, 150.0);
		viewport.zoom_at(200.0, 150.0, 1.3);
		let after = viewport.transform.invert(200.0, 150.0);
		assert!((before.0 - after.0).abs() < 1e-9);
		assert!((before.1 - after.1).abs() < 1e-9);
	}

	#[test]
	fn a_new_transition_overrides_the_previous_target() {
		let mut viewport = Viewport::new(800.0, 600.0);
		let node = node_at(300.0, 300.0);
		viewport.focus_on(&node);
		viewport.tick(0.1);
		viewport.reset();
		settle(&mut viewport);
		assert_eq!(viewport.transform, ViewTransform::IDENTITY);
	}

	#[test]
	fn midway_through_a_transition_the_transform_is_between_endpoints() {
		let mut viewport = Viewport::new(800.0, 600.0);
		viewport.zoom_in();
		assert!(viewport.tick(0.125));
		assert!(viewport.transform.k > 1.0 && viewport.transform.k < 1.2);
	}
}
