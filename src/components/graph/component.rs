//! Leptos component wrapping the dependency graph canvas.
//!
//! The component creates an HTML canvas element and wires up mouse/wheel
//! event handlers for selection, node dragging, panning, and zooming. An
//! animation loop runs via `requestAnimationFrame`, advancing the active
//! layout (physics ticks and camera transitions) and redrawing each frame.
//!
//! Host inputs arrive as reactive signals: the graph data, the layout mode,
//! focus requests, and discrete view commands. The single output is the
//! selection-changed callback.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::layout::LayoutMode;
use super::render;
use super::state::{GraphState, SelectionChange};
use super::theme::Theme;
use super::types::{ComponentInfo, DependencyGraph};

/// A discrete viewport operation requested by the host.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ViewOp {
	ZoomIn,
	ZoomOut,
	Reset,
	Center,
}

/// A host request carrying a sequence number so repeating the same request
/// still registers as a signal change.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Request<T> {
	pub seq: u64,
	pub value: T,
}

impl<T> Request<T> {
	pub fn new(seq: u64, value: T) -> Self {
		Self { seq, value }
	}
}

fn emit(on_select: Callback<Option<ComponentInfo>>, change: Option<SelectionChange>) {
	match change {
		Some(SelectionChange::Selected(component)) => on_select.run(Some(component)),
		Some(SelectionChange::Cleared) => on_select.run(None),
		None => {}
	}
}

/// Renders an interactive dependency graph on a canvas element.
///
/// The component sizes itself to its parent container by default; set
/// `fullscreen = true` to fill the viewport and follow window resizes.
#[component]
pub fn DependencyGraphCanvas(
	/// The current graph; replacing it retriggers normalization and layout.
	#[prop(into)] data: Signal<Option<DependencyGraph>>,
	/// Which layout algorithm positions the nodes.
	#[prop(into)] layout: Signal<LayoutMode>,
	/// External focus-on-node request, e.g. from a search box.
	#[prop(into, default = Signal::derive(|| None))] focus: Signal<Option<Request<String>>>,
	/// Discrete viewport commands (zoom in/out, reset, center).
	#[prop(into, default = Signal::derive(|| None))] command: Signal<Option<Request<ViewOp>>>,
	/// Selection-changed output: the selected component, or `None` on
	/// deselection.
	#[prop(into)] on_select: Callback<Option<ComponentInfo>>,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: Rc<RefCell<Option<GraphState>>> = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (state_init, animate_init, resize_cb_init) =
		(state.clone(), animate.clone(), resize_cb.clone());

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		if state_init.borrow().is_some() {
			return;
		}
		let canvas: HtmlCanvasElement = canvas.into();
		let window: Window = web_sys::window().unwrap();

		let (w, h) = if fullscreen {
			(
				window.inner_width().unwrap().as_f64().unwrap(),
				window.inner_height().unwrap().as_f64().unwrap(),
			)
		} else {
			(
				width.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_width() as f64)
						.unwrap_or(800.0)
				}),
				height.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_height() as f64)
						.unwrap_or(600.0)
				}),
			)
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let ctx: CanvasRenderingContext2d = canvas
			.get_context("2d")
			.unwrap()
			.unwrap()
			.dyn_into()
			.unwrap();

		*state_init.borrow_mut() = Some(GraphState::new(w, h, Theme::default()));

		if fullscreen {
			let (state_resize, canvas_resize) = (state_init.clone(), canvas.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let win: Window = web_sys::window().unwrap();
				let (nw, nh) = (
					win.inner_width().unwrap().as_f64().unwrap(),
					win.inner_height().unwrap().as_f64().unwrap(),
				);
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				if let Some(ref mut s) = *state_resize.borrow_mut() {
					s.resize(nw, nh);
				}
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		let (state_anim, animate_inner) = (state_init.clone(), animate_init.clone());
		let mut last_frame = js_sys::Date::now();
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			let now = js_sys::Date::now();
			// Clamp so a backgrounded tab does not produce a giant step.
			let dt = ((now - last_frame) / 1000.0).clamp(0.0, 0.1);
			last_frame = now;
			if let Some(ref mut s) = *state_anim.borrow_mut() {
				s.tick(dt);
				render::render(s, &ctx);
			}
			if let Some(ref cb) = *animate_inner.borrow() {
				let _ = web_sys::window()
					.unwrap()
					.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	// Reactive inputs. Each effect tracks its signal and forwards into the
	// engine state once the canvas has mounted.
	let state_data = state.clone();
	Effect::new(move |_| {
		let graph = data.get();
		if let Some(ref mut s) = *state_data.borrow_mut() {
			emit(on_select, s.set_data(graph));
		}
	});

	let state_layout = state.clone();
	Effect::new(move |_| {
		let mode = layout.get();
		if let Some(ref mut s) = *state_layout.borrow_mut() {
			s.set_layout(mode);
		}
	});

	let state_focus = state.clone();
	Effect::new(move |_| {
		let Some(request) = focus.get() else {
			return;
		};
		if let Some(ref mut s) = *state_focus.borrow_mut() {
			emit(on_select, s.focus_node(&request.value));
		}
	});

	let state_command = state.clone();
	Effect::new(move |_| {
		let Some(request) = command.get() else {
			return;
		};
		if let Some(ref mut s) = *state_command.borrow_mut() {
			match request.value {
				ViewOp::ZoomIn => s.viewport.zoom_in(),
				ViewOp::ZoomOut => s.viewport.zoom_out(),
				ViewOp::Reset => s.viewport.reset(),
				ViewOp::Center => s.viewport.center(),
			}
		}
	});

	let cursor_position = move |ev: &MouseEvent, canvas_ref: NodeRef<leptos::html::Canvas>| {
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let rect = canvas.get_bounding_client_rect();
		(
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		)
	};

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let (x, y) = cursor_position(&ev, canvas_ref);
		if let Some(ref mut s) = *state_md.borrow_mut() {
			s.pointer_down(x, y);
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let (x, y) = cursor_position(&ev, canvas_ref);
		if let Some(ref mut s) = *state_mm.borrow_mut() {
			s.pointer_move(x, y);
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |ev: MouseEvent| {
		let (x, y) = cursor_position(&ev, canvas_ref);
		if let Some(ref mut s) = *state_mu.borrow_mut() {
			emit(on_select, s.pointer_up(x, y));
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			s.pointer_leave();
		}
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let (x, y) = cursor_position(&ev, canvas_ref);
		if let Some(ref mut s) = *state_wh.borrow_mut() {
			s.wheel(x, y, ev.delta_y());
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="dependency-graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			style="display: block; cursor: grab;"
		/>
	}
}
