//! Concrete graphs, described by name.
//!
//! A [`GraphLiteral`] is the plain-data counterpart of a [`Graph`](super::Graph):
//! named nodes with label sets plus link and parent edges. It can be read from
//! JSON, built by hand, or derived from a [`Structure`] as the smallest graph
//! that contains that shape.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::structure::{Label, Shape, Structure};

/// A concrete site graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphLiteral {
    #[serde(default)]
    nodes: BTreeMap<String, BTreeSet<Label>>,
    #[serde(default)]
    links: BTreeSet<(String, String)>,
    #[serde(default)]
    parents: BTreeSet<(String, String)>,
}

impl GraphLiteral {
    pub fn new() -> Self {
        Self::default()
    }

    /// The smallest graph in which `structure` holds: every agent becomes a
    /// node, every bond a link, every site a parent edge, every label a node
    /// label.
    pub fn from_structure(structure: &Structure) -> Self {
        let mut literal = Self::new();
        literal.add_structure(structure);
        literal
    }

    /// Merge the shape of `structure` into this graph.
    pub fn add_structure(&mut self, structure: &Structure) {
        match structure.shape() {
            Shape::Agent(name) => self.add_node(name),
            Shape::Bound(a, b) => {
                self.add_structure(a);
                self.add_structure(b);
                self.add_link(a.central_node_label(), b.central_node_label());
            }
            Shape::WithSite(parent, site) => {
                self.add_structure(parent);
                self.add_structure(site);
                self.add_parent(parent.central_node_label(), site.central_node_label());
            }
            Shape::Labeled(inner, label) => {
                self.add_structure(inner);
                self.add_label(inner.central_node_label(), label.clone());
            }
        }
    }

    pub fn add_node(&mut self, name: &str) {
        self.nodes.entry(name.to_string()).or_default();
    }

    pub fn add_label(&mut self, name: &str, label: Label) {
        self.nodes.entry(name.to_string()).or_default().insert(label);
    }

    /// Add a link edge; both endpoints become nodes.
    pub fn add_link(&mut self, a: &str, b: &str) {
        self.add_node(a);
        self.add_node(b);
        self.links.insert((a.to_string(), b.to_string()));
    }

    /// Add a parent → site edge; both endpoints become nodes.
    pub fn add_parent(&mut self, parent: &str, site: &str) {
        self.add_node(parent);
        self.add_node(site);
        self.parents.insert((parent.to_string(), site.to_string()));
    }

    pub fn with_node(mut self, name: &str) -> Self {
        self.add_node(name);
        self
    }

    pub fn with_label(mut self, name: &str, label: Label) -> Self {
        self.add_label(name, label);
        self
    }

    pub fn with_link(mut self, a: &str, b: &str) -> Self {
        self.add_link(a, b);
        self
    }

    pub fn with_parent(mut self, parent: &str, site: &str) -> Self {
        self.add_parent(parent, site);
        self
    }

    /// Nodes with their label sets, in name order.
    pub fn nodes(&self) -> impl Iterator<Item = (&String, &BTreeSet<Label>)> {
        self.nodes.iter()
    }

    pub fn links(&self) -> impl Iterator<Item = (&str, &str)> {
        self.links.iter().map(|(a, b)| (a.as_str(), b.as_str()))
    }

    pub fn parents(&self) -> impl Iterator<Item = (&str, &str)> {
        self.parents.iter().map(|(a, b)| (a.as_str(), b.as_str()))
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
