//! Input data model for the dependency graph viewer.
//!
//! These types mirror the JSON shape produced by the analysis backend. The
//! engine only ever reads them; all mutable render state lives in
//! [`super::model`].

use serde::Deserialize;

/// Dependency kind used for the synthetic edges that connect the virtual
/// root to true roots during hierarchy construction. Never rendered.
pub const VIRTUAL_KIND: &str = "virtual";

/// A component in the analyzed project.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ComponentInfo {
	/// Unique key. Dependencies reference components by this id.
	pub item_id: String,
	/// Display label, e.g. "app.sidebar.nav".
	pub name: String,
	/// Source file the component was found in.
	pub file_path: String,
	/// Optional analyzer-provided key/value details, in source order.
	#[serde(default)]
	pub metadata: Option<serde_json::Map<String, serde_json::Value>>,
}

/// A directed dependency between two components.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DependencyLink {
	/// Id of the depending component.
	pub source_id: String,
	/// Id of the component depended upon.
	pub target_id: String,
	/// Free-form kind tag (e.g. "Standard"). `"virtual"` is reserved.
	#[serde(rename = "type")]
	pub kind: String,
}

/// Complete input graph: components plus their dependencies.
///
/// Not required to be acyclic or single-rooted; duplicate id pairs and
/// self-loops are allowed.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct DependencyGraph {
	pub components: Vec<ComponentInfo>,
	pub dependencies: Vec<DependencyLink>,
}

impl DependencyGraph {
	/// Look up a component by id.
	pub fn component(&self, id: &str) -> Option<&ComponentInfo> {
		self.components.iter().find(|c| c.item_id == id)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn deserializes_backend_shape() {
		let json = r#"{
			"components": [
				{"itemId": "a", "name": "app.root", "filePath": "src/a.ts",
				 "metadata": {"kind": "container", "loc": "120"}},
				{"itemId": "b", "name": "app.child", "filePath": "src/b.ts"}
			],
			"dependencies": [
				{"sourceId": "a", "targetId": "b", "type": "Standard"}
			]
		}"#;

		let graph: DependencyGraph = serde_json::from_str(json).unwrap();
		assert_eq!(graph.components.len(), 2);
		assert_eq!(graph.dependencies.len(), 1);
		assert_eq!(graph.dependencies[0].kind, "Standard");
		assert_eq!(graph.component("b").unwrap().name, "app.child");

		// Metadata keeps source order.
		let meta = graph.components[0].metadata.as_ref().unwrap();
		let keys: Vec<_> = meta.keys().collect();
		assert_eq!(keys, ["kind", "loc"]);
	}

	#[test]
	fn component_lookup_misses_unknown_id() {
		let graph = DependencyGraph::default();
		assert!(graph.component("nope").is_none());
	}
}
