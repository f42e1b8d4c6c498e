//! Reasoning sessions and the two decision primitives.
//!
//! A [`Session`] owns one Z3 solver together with the interners and edge
//! datatype every structure and graph of that session is encoded against.
//! Sessions are explicit: nothing here is global, so independent sessions
//! (one per thread, since a Z3 context is not shared) never see each
//! other's names or assertions.
//!
//! Both primitives follow the same discipline: open a solver scope, assert,
//! check, and release the scope. The release is done by a drop guard, so it
//! runs on every exit path, including early returns.

use std::cell::Cell;
use std::fmt;

use serde::Serialize;
use z3::ast::Bool;
use z3::{Context, Params, SatResult, Solver};

use crate::config::{NamePolicy, SessionConfig, UnknownPolicy};
use crate::error::{CausewayResult, SolverError, StructureError};
use crate::graph::EdgeEncoding;
use crate::intern::{LabelId, NodeId, NodeInterner, StringInterner};
use crate::structure::Label;

/// Three-valued answer to a satisfiability or validity query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// The queried property (satisfiable, or valid) holds.
    Holds,
    /// The queried property does not hold.
    Fails,
    /// The solver gave up.
    Unknown { reason: String },
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Holds => write!(f, "holds"),
            Verdict::Fails => write!(f, "fails"),
            Verdict::Unknown { reason } => write!(f, "unknown ({reason})"),
        }
    }
}

/// Kind of primitive query, for diagnostics and unknown resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    Satisfiability,
    Validity,
}

impl fmt::Display for QueryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryKind::Satisfiability => write!(f, "satisfiability"),
            QueryKind::Validity => write!(f, "validity"),
        }
    }
}

/// A reasoning session: solver, interners and encoding state.
pub struct Session<'ctx> {
    ctx: &'ctx Context,
    solver: Solver<'ctx>,
    config: SessionConfig,
    nodes: NodeInterner,
    labels: StringInterner,
    edges: EdgeEncoding<'ctx>,
    open_scopes: Cell<u32>,
}

impl<'ctx> Session<'ctx> {
    /// Create a session over `ctx` with the given configuration.
    pub fn new(ctx: &'ctx Context, config: SessionConfig) -> CausewayResult<Self> {
        config.validate()?;

        let solver = Solver::new(ctx);
        if let Some(timeout_ms) = config.timeout_ms {
            let mut params = Params::new(ctx);
            params.set_u32("timeout", timeout_ms);
            solver.set_params(&params);
        }

        tracing::info!(
            timeout_ms = ?config.timeout_ms,
            unknown_policy = %config.unknown_policy,
            undirected_links = config.undirected_links,
            "opening reasoning session"
        );

        Ok(Self {
            ctx,
            solver,
            edges: EdgeEncoding::new(ctx, config.undirected_links),
            config,
            nodes: NodeInterner::new(),
            labels: StringInterner::new(),
            open_scopes: Cell::new(0),
        })
    }

    pub fn ctx(&self) -> &'ctx Context {
        self.ctx
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn nodes(&self) -> &NodeInterner {
        &self.nodes
    }

    pub fn labels(&self) -> &StringInterner {
        &self.labels
    }

    pub fn edges(&self) -> &EdgeEncoding<'ctx> {
        &self.edges
    }

    /// Number of solver scopes currently open. Zero between queries.
    pub fn open_scopes(&self) -> u32 {
        self.open_scopes.get()
    }

    // -----------------------------------------------------------------------
    // Names
    // -----------------------------------------------------------------------

    /// Register an agent name, returning its node.
    pub fn declare_agent(&self, name: &str) -> NodeId {
        self.nodes.get_node(name)
    }

    /// Register a label, returning its id.
    pub fn declare_label(&self, label: &Label) -> LabelId {
        self.labels.get_int_or_add(label.as_str())
    }

    /// Node for an agent name, subject to the name policy.
    pub fn node(&self, name: &str) -> CausewayResult<NodeId> {
        match self.config.name_policy {
            NamePolicy::AutoRegister => Ok(self.nodes.get_node(name)),
            NamePolicy::Strict => Ok(self.nodes.lookup(name).ok_or_else(|| {
                StructureError::UnknownAgent {
                    name: name.to_string(),
                }
            })?),
        }
    }

    /// Id for a label, subject to the name policy.
    pub fn label(&self, label: &Label) -> CausewayResult<LabelId> {
        match self.config.name_policy {
            NamePolicy::AutoRegister => Ok(self.declare_label(label)),
            NamePolicy::Strict => Ok(self.labels.lookup(label.as_str()).ok_or_else(|| {
                StructureError::UnknownLabel {
                    label: label.as_str().to_string(),
                }
            })?),
        }
    }

    // -----------------------------------------------------------------------
    // Background
    // -----------------------------------------------------------------------

    /// Add a permanent background assumption to the session.
    ///
    /// Background assumptions constrain every later query. If they are
    /// contradictory, every formula is valid and none is satisfiable.
    pub fn assume(&self, formula: &Bool<'ctx>) {
        tracing::debug!(formula = %formula, "adding background assumption");
        self.solver.assert(formula);
    }

    // -----------------------------------------------------------------------
    // Decision primitives
    // -----------------------------------------------------------------------

    /// Whether some assignment satisfies `formula` together with the
    /// background.
    pub fn sat_verdict(&self, formula: &Bool<'ctx>) -> Verdict {
        let _scope = Scope::open(self);
        self.solver.assert(formula);
        let verdict = self.check();
        tracing::debug!(query = "sat", %verdict, "solver query");
        verdict
    }

    /// Whether `formula` holds under every assignment consistent with the
    /// background. A contradictory background makes every formula valid.
    pub fn validity_verdict(&self, formula: &Bool<'ctx>) -> Verdict {
        let _scope = Scope::open(self);
        match self.check() {
            Verdict::Fails => {
                tracing::debug!(query = "valid", "background is unsatisfiable; vacuously valid");
                return Verdict::Holds;
            }
            unknown @ Verdict::Unknown { .. } => return unknown,
            Verdict::Holds => {}
        }
        self.solver.assert(&formula.not());
        let verdict = match self.check() {
            Verdict::Holds => Verdict::Fails,
            Verdict::Fails => Verdict::Holds,
            unknown => unknown,
        };
        tracing::debug!(query = "valid", %verdict, "solver query");
        verdict
    }

    /// Boolean satisfiability, resolving `unknown` through the session's
    /// [`UnknownPolicy`].
    pub fn check_sat(&self, formula: &Bool<'ctx>) -> CausewayResult<bool> {
        self.resolve(QueryKind::Satisfiability, self.sat_verdict(formula))
    }

    /// Boolean validity, resolving `unknown` through the session's
    /// [`UnknownPolicy`].
    pub fn check_valid(&self, formula: &Bool<'ctx>) -> CausewayResult<bool> {
        self.resolve(QueryKind::Validity, self.validity_verdict(formula))
    }

    fn check(&self) -> Verdict {
        match self.solver.check() {
            SatResult::Sat => Verdict::Holds,
            SatResult::Unsat => Verdict::Fails,
            SatResult::Unknown => Verdict::Unknown {
                reason: self
                    .solver
                    .get_reason_unknown()
                    .unwrap_or_else(|| "unknown".to_string()),
            },
        }
    }

    fn resolve(&self, kind: QueryKind, verdict: Verdict) -> CausewayResult<bool> {
        match verdict {
            Verdict::Holds => Ok(true),
            Verdict::Fails => Ok(false),
            Verdict::Unknown { reason } => match self.config.unknown_policy {
                UnknownPolicy::Fail => Err(SolverError::Unknown {
                    query: kind.to_string(),
                    reason,
                }
                .into()),
                UnknownPolicy::AssumeUnsat => {
                    // Unknown reads as "not sat": validity is decided on the
                    // negation, so it comes out true.
                    let answer = kind == QueryKind::Validity;
                    tracing::warn!(
                        query = %kind,
                        %reason,
                        answer,
                        "solver returned unknown; assuming unsat"
                    );
                    Ok(answer)
                }
            },
        }
    }
}

impl fmt::Debug for Session<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("config", &self.config)
            .field("nodes", &self.nodes.len())
            .field("labels", &self.labels.len())
            .field("open_scopes", &self.open_scopes.get())
            .finish()
    }
}

/// An open solver scope, popped on drop.
struct Scope<'s, 'ctx> {
    session: &'s Session<'ctx>,
}

impl<'s, 'ctx> Scope<'s, 'ctx> {
    fn open(session: &'s Session<'ctx>) -> Self {
        session.solver.push();
        session.open_scopes.set(session.open_scopes.get() + 1);
        Self { session }
    }
}

impl Drop for Scope<'_, '_> {
    fn drop(&mut self) {
        self.session.solver.pop(1);
        self.session
            .open_scopes
            .set(self.session.open_scopes.get().saturating_sub(1));
    }
}
