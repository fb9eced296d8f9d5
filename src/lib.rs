//! dep-graph-viz: Interactive dependency graph visualization.
//!
//! This crate provides a WASM-based graph visualization component that renders
//! component dependency graphs with force, tree, and radial layouts, click
//! selection with neighbor highlighting, and pan/zoom/focus navigation.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{HtmlInputElement, HtmlScriptElement, Window};

pub mod components;

pub use components::graph::{
	ComponentInfo, DependencyGraph, DependencyGraphCanvas, DependencyLink, LayoutMode, Request,
	Theme, ViewOp,
};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("dep-graph-viz: logging initialized");
}

/// Load graph data from a script element with id="graph-data".
/// Expected format: JSON with { components: [...], dependencies: [...] }
fn load_graph_data() -> Option<DependencyGraph> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id("graph-data")?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	let json_text = script.text().ok()?;

	match serde_json::from_str::<DependencyGraph>(&json_text) {
		Ok(data) => {
			info!(
				"dep-graph-viz: loaded {} components, {} dependencies",
				data.components.len(),
				data.dependencies.len()
			);
			Some(data)
		}
		Err(e) => {
			warn!("dep-graph-viz: failed to parse graph data: {}", e);
			None
		}
	}
}

/// Main application component.
///
/// Loads graph data from the DOM, renders the graph canvas fullscreen, and
/// overlays a toolbar with layout switching, viewport controls, a focus
/// search field, and a readout of the current selection.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let graph_data = load_graph_data();
	let graph_signal = Signal::derive(move || graph_data.clone());

	let (layout, set_layout) = signal(LayoutMode::Force);
	let (focus, set_focus) = signal(None::<Request<String>>);
	let (command, set_command) = signal(None::<Request<ViewOp>>);
	let (selected, set_selected) = signal(None::<ComponentInfo>);
	let seq = StoredValue::new(0u64);

	let next_seq = move || {
		seq.update_value(|s| *s += 1);
		seq.get_value()
	};

	let send_command = move |op: ViewOp| {
		set_command.set(Some(Request::new(next_seq(), op)));
	};

	let on_focus_submit = move |ev: leptos::ev::SubmitEvent| {
		ev.prevent_default();
		let Some(document) = web_sys::window().and_then(|w| w.document()) else {
			return;
		};
		let Some(input) = document
			.get_element_by_id("focus-input")
			.and_then(|e| e.dyn_into::<HtmlInputElement>().ok())
		else {
			return;
		};
		let id = input.value();
		if !id.trim().is_empty() {
			set_focus.set(Some(Request::new(next_seq(), id.trim().to_string())));
		}
	};

	let on_select = Callback::new(move |info: Option<ComponentInfo>| {
		set_selected.set(info);
	});

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="light" />
		<Title text="Dependency Graph" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="fullscreen-graph">
			<DependencyGraphCanvas
				data=graph_signal
				layout=layout
				focus=focus
				command=command
				on_select=on_select
				fullscreen=true
			/>
			<div class="graph-toolbar">
				<div class="layout-buttons">
					{LayoutMode::ALL
						.iter()
						.map(|&mode| {
							view! {
								<button
									class:active=move || layout.get() == mode
									on:click=move |_| set_layout.set(mode)
								>
									{mode.label()}
								</button>
							}
						})
						.collect_view()}
				</div>
				<div class="view-buttons">
					<button on:click=move |_| send_command(ViewOp::ZoomIn)>"+"</button>
					<button on:click=move |_| send_command(ViewOp::ZoomOut)>"-"</button>
					<button on:click=move |_| send_command(ViewOp::Reset)>"Reset"</button>
					<button on:click=move |_| send_command(ViewOp::Center)>"Center"</button>
				</div>
				<form class="focus-form" on:submit=on_focus_submit>
					<input id="focus-input" type="text" placeholder="Focus component id" />
					<button type="submit">"Go"</button>
				</form>
			</div>
			{move || {
				selected
					.get()
					.map(|info| {
						view! {
							<div class="selection-readout">
								<h2>{info.name.clone()}</h2>
								<p class="file-path">{info.file_path.clone()}</p>
							</div>
						}
					})
			}}
			<div class="graph-overlay">
				<h1>"Dependency Graph"</h1>
				<p class="subtitle">
					"Click a node to highlight its dependencies. Drag nodes to reposition. Scroll to zoom."
				</p>
			</div>
		</div>
	}
}
