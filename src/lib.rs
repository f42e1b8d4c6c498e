// thiserror's #[error("...{field}...")] format strings reference struct fields,
// but the compiler doesn't see through the derive macro and reports false positives.
#![allow(unused_assignments)]

//! # causeway
//!
//! Causal inference over rule-based biochemical models, decided by an SMT
//! solver.
//!
//! Given a context `C`, a newly observed statement `S` and a candidate
//! inference `I`, causeway answers whether `I` is a *candidate inference*
//! for `S` (it explains `S`, is consistent, and adds information beyond `C`
//! or `S` alone) and whether it is the *unique* such inference.
//!
//! ## Architecture
//!
//! - **Structures** (`structure`): agents, bonds, sites and labels, lowered
//!   to formulas over a graph
//! - **Graph encoding** (`graph`): graphs as Z3 arrays, plus concrete
//!   graph literals
//! - **Sessions** (`solver`): solver, interners, and the scoped
//!   `check_sat` / `check_valid` primitives
//! - **Rule models** (`model`): bounded sets of pregraph/postgraph rules
//! - **Causal queries** (`causal`): candidate and candidate-unique inference
//!
//! ## Library usage
//!
//! ```no_run
//! use causeway::config::SessionConfig;
//! use causeway::graph::{Graph, GraphLiteral};
//! use causeway::solver::Session;
//! use causeway::structure::{Label, Structure};
//! use causeway::z3::{Config, Context};
//!
//! let ctx = Context::new(&Config::new());
//! let session = Session::new(&ctx, SessionConfig::default()).unwrap();
//!
//! let phosphate = Label::new("phosphate");
//! let mek1p = Structure::agent("MEK1").labeled(phosphate.clone());
//! let graph = Graph::from_literal(&session, &GraphLiteral::new().with_label("MEK1", phosphate));
//!
//! let formula = mek1p.holds_in(&graph, &session).unwrap();
//! assert!(session.check_sat(&formula).unwrap());
//! ```

pub mod causal;
pub mod config;
pub mod error;
pub mod graph;
pub mod input;
pub mod intern;
pub mod model;
pub mod scenario;
pub mod solver;
pub mod structure;

pub use z3;
