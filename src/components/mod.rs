//! UI components for the dependency graph viewer.

pub mod graph;
