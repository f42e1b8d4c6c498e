//! Structures: composable descriptions of a required shape inside a graph.
//!
//! A structure is built from agents and three combinators:
//!
//! ```no_run
//! use causeway::structure::{Label, Structure};
//!
//! let raf = Structure::agent("RAF");
//! let hras = Structure::agent("HRAS");
//! // RAF bound to HRAS, where HRAS carries GTP.
//! let complex = raf.bound(&hras.labeled(Label::new("GTP")));
//! assert_eq!(complex.central_node_label(), "RAF");
//! ```
//!
//! Structures are immutable and `Arc`-backed, so cloning and sharing a
//! sub-structure between several compositions is cheap. Lowering a
//! structure with [`Structure::holds_in`] produces a formula that is true
//! exactly when the shape is present in the given graph.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use z3::ast::Bool;

use crate::error::CausewayResult;
use crate::graph::{EdgeKind, Graph};
use crate::solver::Session;

const LABEL_PREFIX: &str = "label_";

/// A namespaced label token.
///
/// Stored with a `label_` prefix so label strings never collide with agent
/// names or other unprefixed identifiers in the same interner space. A name
/// that already carries the prefix is taken as is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Label(String);

impl Label {
    pub fn new(name: &str) -> Self {
        let bare = name.strip_prefix(LABEL_PREFIX).unwrap_or(name);
        Label(format!("{LABEL_PREFIX}{bare}"))
    }

    /// The prefixed token, as interned.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The bare label name.
    pub fn name(&self) -> &str {
        &self.0[LABEL_PREFIX.len()..]
    }
}

impl From<String> for Label {
    fn from(name: String) -> Self {
        Label::new(&name)
    }
}

impl From<Label> for String {
    fn from(label: Label) -> Self {
        label.name().to_string()
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The closed set of structure variants.
#[derive(Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Shape {
    /// A single named node.
    Agent(String),
    /// Two structures whose central nodes are linked.
    Bound(Structure, Structure),
    /// A structure (parent) owning another (site).
    WithSite(Structure, Structure),
    /// A structure whose central node carries a label.
    Labeled(Structure, Label),
}

/// A shareable handle to a [`Shape`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Structure(Arc<Shape>);

impl Structure {
    /// A single agent node.
    pub fn agent(name: impl Into<String>) -> Self {
        Self::from_shape(Shape::Agent(name.into()))
    }

    pub fn from_shape(shape: Shape) -> Self {
        Structure(Arc::new(shape))
    }

    pub fn shape(&self) -> &Shape {
        &self.0
    }

    /// This structure bound to another.
    pub fn bound(&self, other: &Structure) -> Structure {
        Self::from_shape(Shape::Bound(self.clone(), other.clone()))
    }

    /// This structure having another as a site.
    pub fn with_site(&self, site: &Structure) -> Structure {
        Self::from_shape(Shape::WithSite(self.clone(), site.clone()))
    }

    /// This structure with a label on its central node.
    pub fn labeled(&self, label: Label) -> Structure {
        Self::from_shape(Shape::Labeled(self.clone(), label))
    }

    /// Name of the node that represents this structure when it is composed
    /// further. Compositions anchor on their first operand.
    pub fn central_node_label(&self) -> &str {
        match self.shape() {
            Shape::Agent(name) => name,
            Shape::Bound(primary, _) | Shape::WithSite(primary, _) => primary.central_node_label(),
            Shape::Labeled(inner, _) => inner.central_node_label(),
        }
    }

    /// Formula that holds iff this shape is present in `graph`.
    ///
    /// Agent names and labels go through the session interners; under the
    /// strict name policy an undeclared name is an error.
    pub fn holds_in<'ctx>(
        &self,
        graph: &Graph<'ctx>,
        session: &Session<'ctx>,
    ) -> CausewayResult<Bool<'ctx>> {
        let ctx = session.ctx();
        match self.shape() {
            Shape::Agent(name) => graph.contains_node(ctx, session.node(name)?),
            Shape::Bound(a, b) => self.edge_holds(EdgeKind::Link, a, b, graph, session),
            Shape::WithSite(a, b) => self.edge_holds(EdgeKind::Parent, a, b, graph, session),
            Shape::Labeled(inner, label) => {
                let node = session.node(inner.central_node_label())?;
                let present = graph.node_has_label(ctx, node, session.label(label)?)?;
                let inner = inner.holds_in(graph, session)?;
                Ok(Bool::and(ctx, &[&present, &inner]))
            }
        }
    }

    fn edge_holds<'ctx>(
        &self,
        kind: EdgeKind,
        a: &Structure,
        b: &Structure,
        graph: &Graph<'ctx>,
        session: &Session<'ctx>,
    ) -> CausewayResult<Bool<'ctx>> {
        let node_a = session.node(a.central_node_label())?;
        let node_b = session.node(b.central_node_label())?;
        let edge = graph.contains_edge(session, kind, node_a, node_b)?;
        let left = a.holds_in(graph, session)?;
        let right = b.holds_in(graph, session)?;
        Ok(Bool::and(session.ctx(), &[&edge, &left, &right]))
    }

    /// Number of agent occurrences in the tree.
    pub fn agent_count(&self) -> usize {
        match self.shape() {
            Shape::Agent(_) => 1,
            Shape::Bound(a, b) | Shape::WithSite(a, b) => a.agent_count() + b.agent_count(),
            Shape::Labeled(inner, _) => inner.agent_count(),
        }
    }
}

impl fmt::Display for Structure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.shape() {
            Shape::Agent(name) => write!(f, "{name}"),
            Shape::Bound(a, b) => write!(f, "({a} - {b})"),
            Shape::WithSite(a, b) => write!(f, "{a}[{b}]"),
            Shape::Labeled(inner, label) => write!(f, "{inner}{{{label}}}"),
        }
    }
}
