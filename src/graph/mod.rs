//! Graph encoding: how a site graph is represented inside the solver.
//!
//! A [`Graph`] is four solver arrays:
//!
//! - `has`: node → bool (node membership)
//! - `links`: edge → bool (generic binding)
//! - `parents`: edge → bool (parent/site hierarchy)
//! - `labelmap`: node → (label id → bool) (per-node label sets)
//!
//! Nodes and label ids are integers issued by the session interners. Edges
//! are values of the `Edge` datatype built by [`EdgeEncoding`].

pub mod literal;

use std::fmt;

use z3::ast::{Array, Ast, Bool, Dynamic};
use z3::{Context, DatatypeAccessor, DatatypeBuilder, DatatypeSort, FuncDecl, Sort};

use crate::error::{CausewayResult, SolverError};
use crate::intern::{InternId, LabelId, NodeId};
use crate::solver::Session;

pub use literal::GraphLiteral;

/// Which relation an edge belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeKind {
    /// Generic binding between two agents.
    Link,
    /// Parent → site ownership.
    Parent,
}

/// The `Edge` datatype: `edge(src: Int, dst: Int)`.
pub struct EdgeEncoding<'ctx> {
    datatype: DatatypeSort<'ctx>,
    undirected_links: bool,
}

impl<'ctx> EdgeEncoding<'ctx> {
    /// Declare the edge datatype in `ctx`.
    pub fn new(ctx: &'ctx Context, undirected_links: bool) -> Self {
        let datatype = DatatypeBuilder::new(ctx, "Edge")
            .variant(
                "edge",
                vec![
                    ("src", DatatypeAccessor::Sort(Sort::int(ctx))),
                    ("dst", DatatypeAccessor::Sort(Sort::int(ctx))),
                ],
            )
            .finish();
        Self {
            datatype,
            undirected_links,
        }
    }

    /// The sort of edge terms.
    pub fn sort(&self) -> &Sort<'ctx> {
        &self.datatype.sort
    }

    fn constructor(&self) -> &FuncDecl<'ctx> {
        // `Edge` is declared with exactly one variant.
        &self.datatype.variants[0].constructor
    }

    /// The edge term joining two nodes.
    ///
    /// Link edges are canonicalized to `(min, max)` when links are
    /// undirected, so `edge(a, b)` and `edge(b, a)` are the same term.
    pub fn edge(&self, ctx: &'ctx Context, kind: EdgeKind, a: NodeId, b: NodeId) -> Dynamic<'ctx> {
        let (src, dst) = match kind {
            EdgeKind::Link if self.undirected_links && b < a => (b, a),
            _ => (a, b),
        };
        self.constructor().apply(&[&src.term(ctx), &dst.term(ctx)])
    }
}

impl fmt::Debug for EdgeEncoding<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EdgeEncoding")
            .field("undirected_links", &self.undirected_links)
            .finish()
    }
}

/// A site graph encoded as solver arrays.
#[derive(Debug, Clone)]
pub struct Graph<'ctx> {
    name: String,
    has: Array<'ctx>,
    links: Array<'ctx>,
    parents: Array<'ctx>,
    labelmap: Array<'ctx>,
}

impl<'ctx> Graph<'ctx> {
    /// A graph with unconstrained contents: fresh array constants named
    /// after `name`.
    pub fn symbolic(session: &Session<'ctx>, name: &str) -> Self {
        let ctx = session.ctx();
        let sorts = Sorts::new(session);
        Self {
            name: name.to_string(),
            has: Array::new_const(ctx, format!("{name}.has"), &sorts.node, &sorts.boolean),
            links: Array::new_const(ctx, format!("{name}.links"), sorts.edge, &sorts.boolean),
            parents: Array::new_const(ctx, format!("{name}.parents"), sorts.edge, &sorts.boolean),
            labelmap: Array::new_const(
                ctx,
                format!("{name}.labelmap"),
                &sorts.node,
                &sorts.labelset,
            ),
        }
    }

    /// A graph with no nodes, edges or labels.
    pub fn empty(session: &Session<'ctx>) -> Self {
        let ctx = session.ctx();
        let sorts = Sorts::new(session);
        let no = Bool::from_bool(ctx, false);
        let no_labels = Array::const_array(ctx, &sorts.label, &no);
        Self {
            name: "empty".to_string(),
            has: Array::const_array(ctx, &sorts.node, &no),
            links: Array::const_array(ctx, sorts.edge, &no),
            parents: Array::const_array(ctx, sorts.edge, &no),
            labelmap: Array::const_array(ctx, &sorts.node, &no_labels),
        }
    }

    /// A graph holding exactly the contents of `literal`.
    ///
    /// Every node and label of the literal is declared in the session, which
    /// makes them usable under the strict name policy.
    pub fn from_literal(session: &Session<'ctx>, literal: &GraphLiteral) -> Self {
        let ctx = session.ctx();
        let sorts = Sorts::new(session);
        let yes = Bool::from_bool(ctx, true);
        let no = Bool::from_bool(ctx, false);
        let mut graph = Self::empty(session);
        graph.name = "literal".to_string();

        for (name, labels) in literal.nodes() {
            let node = session.declare_agent(name);
            graph.has = graph.has.store(&node.term(ctx), &yes);
            if labels.is_empty() {
                continue;
            }
            let mut labelset = Array::const_array(ctx, &sorts.label, &no);
            for label in labels {
                let id = session.declare_label(label);
                labelset = labelset.store(&id.term(ctx), &yes);
            }
            graph.labelmap = graph.labelmap.store(&node.term(ctx), &labelset);
        }
        for (a, b) in literal.links() {
            let edge = session.edges().edge(
                ctx,
                EdgeKind::Link,
                session.declare_agent(a),
                session.declare_agent(b),
            );
            graph.links = graph.links.store(&edge, &yes);
        }
        for (parent, site) in literal.parents() {
            let edge = session.edges().edge(
                ctx,
                EdgeKind::Parent,
                session.declare_agent(parent),
                session.declare_agent(site),
            );
            graph.parents = graph.parents.store(&edge, &yes);
        }
        graph
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Node membership array.
    pub fn has(&self) -> &Array<'ctx> {
        &self.has
    }

    /// Link edge-set array.
    pub fn links(&self) -> &Array<'ctx> {
        &self.links
    }

    /// Parent edge-set array.
    pub fn parents(&self) -> &Array<'ctx> {
        &self.parents
    }

    /// Node → label-set array.
    pub fn labelmap(&self) -> &Array<'ctx> {
        &self.labelmap
    }

    /// `has[node]`.
    pub fn contains_node(&self, ctx: &'ctx Context, node: NodeId) -> CausewayResult<Bool<'ctx>> {
        as_bool(self.has.select(&node.term(ctx)), "node membership")
    }

    /// `links[edge]` or `parents[edge]`, by kind.
    pub fn contains_edge(
        &self,
        session: &Session<'ctx>,
        kind: EdgeKind,
        a: NodeId,
        b: NodeId,
    ) -> CausewayResult<Bool<'ctx>> {
        let edge = session.edges().edge(session.ctx(), kind, a, b);
        let set = match kind {
            EdgeKind::Link => &self.links,
            EdgeKind::Parent => &self.parents,
        };
        as_bool(set.select(&edge), "edge membership")
    }

    /// `labelmap[node][label]`.
    pub fn node_has_label(
        &self,
        ctx: &'ctx Context,
        node: NodeId,
        label: LabelId,
    ) -> CausewayResult<Bool<'ctx>> {
        let labelset = self
            .labelmap
            .select(&node.term(ctx))
            .as_array()
            .ok_or_else(|| SolverError::SortMismatch {
                what: "label set".into(),
            })?;
        as_bool(labelset.select(&label.term(ctx)), "label membership")
    }

    /// Formula stating that two graphs have identical contents.
    pub fn equals(&self, other: &Graph<'ctx>) -> Bool<'ctx> {
        let ctx = self.has.get_ctx();
        Bool::and(
            ctx,
            &[
                &self.has._eq(&other.has),
                &self.links._eq(&other.links),
                &self.parents._eq(&other.parents),
                &self.labelmap._eq(&other.labelmap),
            ],
        )
    }
}

struct Sorts<'a, 'ctx> {
    node: Sort<'ctx>,
    label: Sort<'ctx>,
    boolean: Sort<'ctx>,
    labelset: Sort<'ctx>,
    edge: &'a Sort<'ctx>,
}

impl<'a, 'ctx> Sorts<'a, 'ctx> {
    fn new(session: &'a Session<'ctx>) -> Self {
        let ctx = session.ctx();
        let node = Sort::int(ctx);
        let label = Sort::int(ctx);
        let boolean = Sort::bool(ctx);
        let labelset = Sort::array(ctx, &label, &boolean);
        Self {
            node,
            label,
            boolean,
            labelset,
            edge: session.edges().sort(),
        }
    }
}

fn as_bool<'ctx>(term: Dynamic<'ctx>, what: &str) -> CausewayResult<Bool<'ctx>> {
    Ok(term.as_bool().ok_or_else(|| SolverError::SortMismatch {
        what: what.to_string(),
    })?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SessionConfig;
    use crate::structure::Label;
    use z3::Config;

    fn with_session<F: FnOnce(&Session<'_>)>(config: SessionConfig, f: F) {
        let ctx = Context::new(&Config::new());
        let session = Session::new(&ctx, config).unwrap();
        f(&session);
    }

    #[test]
    fn literal_graph_contains_its_nodes() {
        with_session(SessionConfig::default(), |session| {
            let literal = GraphLiteral::new().with_node("MEK1");
            let graph = Graph::from_literal(session, &literal);
            let mek1 = session.nodes().get_node("MEK1");
            let erk1 = session.nodes().get_node("ERK1");
            let ctx = session.ctx();
            assert!(session.check_valid(&graph.contains_node(ctx, mek1).unwrap()).unwrap());
            assert!(!session.check_sat(&graph.contains_node(ctx, erk1).unwrap()).unwrap());
        });
    }

    #[test]
    fn empty_graph_has_nothing() {
        with_session(SessionConfig::default(), |session| {
            let graph = Graph::empty(session);
            let raf = session.nodes().get_node("RAF");
            let hras = session.nodes().get_node("HRAS");
            let ctx = session.ctx();
            assert!(!session.check_sat(&graph.contains_node(ctx, raf).unwrap()).unwrap());
            let link = graph.contains_edge(session, EdgeKind::Link, raf, hras).unwrap();
            assert!(!session.check_sat(&link).unwrap());
        });
    }

    #[test]
    fn undirected_links_are_symmetric() {
        with_session(SessionConfig::default(), |session| {
            let literal = GraphLiteral::new().with_link("RAF", "HRAS");
            let graph = Graph::from_literal(session, &literal);
            let raf = session.nodes().get_node("RAF");
            let hras = session.nodes().get_node("HRAS");
            let back = graph.contains_edge(session, EdgeKind::Link, hras, raf).unwrap();
            assert!(session.check_valid(&back).unwrap());
        });
    }

    #[test]
    fn directed_links_keep_orientation() {
        let config = SessionConfig {
            undirected_links: false,
            ..Default::default()
        };
        with_session(config, |session| {
            let literal = GraphLiteral::new().with_link("RAF", "HRAS");
            let graph = Graph::from_literal(session, &literal);
            let raf = session.nodes().get_node("RAF");
            let hras = session.nodes().get_node("HRAS");
            let forward = graph.contains_edge(session, EdgeKind::Link, raf, hras).unwrap();
            let back = graph.contains_edge(session, EdgeKind::Link, hras, raf).unwrap();
            assert!(session.check_valid(&forward).unwrap());
            assert!(!session.check_sat(&back).unwrap());
        });
    }

    #[test]
    fn parent_edges_are_ordered_and_separate_from_links() {
        with_session(SessionConfig::default(), |session| {
            let literal = GraphLiteral::new().with_parent("EGFR", "Y1068");
            let graph = Graph::from_literal(session, &literal);
            let egfr = session.nodes().get_node("EGFR");
            let site = session.nodes().get_node("Y1068");
            let parent = graph.contains_edge(session, EdgeKind::Parent, egfr, site).unwrap();
            let reversed = graph.contains_edge(session, EdgeKind::Parent, site, egfr).unwrap();
            let link = graph.contains_edge(session, EdgeKind::Link, egfr, site).unwrap();
            assert!(session.check_valid(&parent).unwrap());
            assert!(!session.check_sat(&reversed).unwrap());
            assert!(!session.check_sat(&link).unwrap());
        });
    }

    #[test]
    fn labels_are_per_node() {
        with_session(SessionConfig::default(), |session| {
            let phosphate = Label::new("phosphate");
            let literal = GraphLiteral::new()
                .with_label("MEK1", phosphate.clone())
                .with_node("ERK1");
            let graph = Graph::from_literal(session, &literal);
            let ctx = session.ctx();
            let label = session.labels().get_int_or_add(phosphate.as_str());
            let mek1 = session.nodes().get_node("MEK1");
            let erk1 = session.nodes().get_node("ERK1");
            let on_mek1 = graph.node_has_label(ctx, mek1, label).unwrap();
            let on_erk1 = graph.node_has_label(ctx, erk1, label).unwrap();
            assert!(session.check_valid(&on_mek1).unwrap());
            assert!(!session.check_sat(&on_erk1).unwrap());
        });
    }

    #[test]
    fn labeled_literal_matches_a_symbolic_graph() {
        with_session(SessionConfig::default(), |session| {
            let literal = GraphLiteral::new()
                .with_label("MEK1", Label::new("phosphate"))
                .with_node("ERK1");
            let concrete = Graph::from_literal(session, &literal);
            let open = Graph::symbolic(session, "g");
            assert!(session.check_sat(&open.equals(&concrete)).unwrap());
            assert!(session.check_valid(&concrete.equals(&concrete)).unwrap());
        });
    }

    #[test]
    fn symbolic_graph_can_equal_a_literal() {
        with_session(SessionConfig::default(), |session| {
            let literal = GraphLiteral::new().with_link("RAF", "HRAS");
            let concrete = Graph::from_literal(session, &literal);
            let open = Graph::symbolic(session, "g");
            assert_eq!(open.name(), "g");
            assert!(session.check_sat(&open.equals(&concrete)).unwrap());
        });
    }
}
