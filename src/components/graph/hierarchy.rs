//! Rooted hierarchy construction for the tree and radial layouts.
//!
//! The input graph is an arbitrary directed graph: it may have several
//! independent roots, cycles, or both. [`Hierarchy::build`] derives a
//! displayable tree from it by
//!
//! 1. assigning each node at most one parent: the source of the *first*
//!    edge (in edge-list order) that targets it, a deliberate tie-break that
//!    also prevents unbounded recursion on cyclic input, and
//! 2. introducing a synthetic root above every true root, so any number of
//!    independent subtrees still form a single connected tree.
//!
//! Construction fails with a tagged error when no tree can be derived; the
//! caller is expected to fall back to the force layout in that case.

use std::collections::VecDeque;

use thiserror::Error;

use super::model::{RenderEdge, RenderNode};

/// Why a hierarchy could not be derived from the graph.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum HierarchyError {
	/// Every node has an incoming edge, so the graph is fully cyclic (or
	/// empty) and has no place to hang a tree from.
	#[error("graph has no root nodes")]
	NoRoots,
	/// Some nodes sit on a cycle that is not reachable from any root and
	/// would be silently dropped by a tree traversal.
	#[error("{count} node(s) unreachable from the roots")]
	Unreachable { count: usize },
}

/// One entry in the hierarchy arena.
#[derive(Clone, Debug, PartialEq)]
pub struct HierarchyNode {
	/// Index into the render node array, or `None` for the virtual root.
	pub node: Option<usize>,
	/// Arena index of the parent. Only the virtual root has none.
	pub parent: Option<usize>,
	/// Arena indices of children, in discovery order.
	pub children: Vec<usize>,
	/// Distance from the virtual root (virtual root = 0, true roots = 1).
	pub depth: usize,
	/// In-order layout coordinate: leaves get consecutive slots, interior
	/// nodes sit at the mean of their children. Distinct from final (x, y).
	pub breadth: f64,
}

/// A rooted tree over the render nodes, arena index 0 being the virtual root.
#[derive(Clone, Debug, PartialEq)]
pub struct Hierarchy {
	pub nodes: Vec<HierarchyNode>,
	/// Maximum depth over all nodes (>= 1 whenever the graph is non-empty).
	pub max_depth: usize,
	/// Number of leaves, which is the number of breadth slots handed out.
	pub leaf_count: usize,
}

impl Hierarchy {
	/// Derive a hierarchy from the render model.
	pub fn build(nodes: &[RenderNode], edges: &[RenderEdge]) -> Result<Self, HierarchyError> {
		// First edge targeting a node wins; remember which edge it was so
		// children can be attached in edge-list order below.
		let mut parent_edge: Vec<Option<usize>> = vec![None; nodes.len()];
		for (edge_index, edge) in edges.iter().enumerate() {
			if parent_edge[edge.target].is_none() {
				parent_edge[edge.target] = Some(edge_index);
			}
		}

		let roots: Vec<usize> = (0..nodes.len())
			.filter(|&i| parent_edge[i].is_none())
			.collect();
		if roots.is_empty() {
			return Err(HierarchyError::NoRoots);
		}

		// Arena slot i + 1 holds render node i; slot 0 is the virtual root.
		let mut arena: Vec<HierarchyNode> = Vec::with_capacity(nodes.len() + 1);
		arena.push(HierarchyNode {
			node: None,
			parent: None,
			children: Vec::new(),
			depth: 0,
			breadth: 0.0,
		});
		for i in 0..nodes.len() {
			arena.push(HierarchyNode {
				node: Some(i),
				parent: None,
				children: Vec::new(),
				depth: 0,
				breadth: 0.0,
			});
		}

		for &root in &roots {
			arena[root + 1].parent = Some(0);
			arena[0].children.push(root + 1);
		}
		for (edge_index, edge) in edges.iter().enumerate() {
			if parent_edge[edge.target] == Some(edge_index) {
				arena[edge.target + 1].parent = Some(edge.source + 1);
				arena[edge.source + 1].children.push(edge.target + 1);
			}
		}

		// Depth assignment doubles as the reachability check: a cycle that
		// hangs off no root never gets visited.
		let mut reached = 0usize;
		let mut max_depth = 0usize;
		let mut queue = VecDeque::from([0usize]);
		while let Some(index) = queue.pop_front() {
			reached += 1;
			let depth = arena[index].depth;
			max_depth = max_depth.max(depth);
			let children = arena[index].children.clone();
			for child in children {
				arena[child].depth = depth + 1;
				queue.push_back(child);
			}
		}
		if reached != arena.len() {
			return Err(HierarchyError::Unreachable {
				count: arena.len() - reached,
			});
		}

		let leaf_count = Self::assign_breadth(&mut arena);

		Ok(Self {
			nodes: arena,
			max_depth,
			leaf_count,
		})
	}

	/// Post-order pass: leaves take consecutive slots, interior nodes the
	/// mean of their children. Returns the number of leaves.
	fn assign_breadth(arena: &mut [HierarchyNode]) -> usize {
		let mut next_leaf = 0usize;
		// (arena index, children visited so far)
		let mut stack: Vec<(usize, usize)> = vec![(0, 0)];
		while let Some((index, visited)) = stack.pop() {
			if arena[index].children.is_empty() {
				arena[index].breadth = next_leaf as f64;
				next_leaf += 1;
			} else if visited < arena[index].children.len() {
				let child = arena[index].children[visited];
				stack.push((index, visited + 1));
				stack.push((child, 0));
			} else {
				let sum: f64 = arena[index]
					.children
					.iter()
					.map(|&c| arena[c].breadth)
					.sum();
				arena[index].breadth = sum / arena[index].children.len() as f64;
			}
		}
		next_leaf
	}

	/// Iterate the real (non-virtual) entries as (render node index, entry).
	pub fn real_nodes(&self) -> impl Iterator<Item = (usize, &HierarchyNode)> {
		self.nodes
			.iter()
			.filter_map(|entry| entry.node.map(|i| (i, entry)))
	}
}
