//! The RAF → MEK1 → ERK1 → SAF1 signaling cascade.
//!
//! A small, fixed model question used by the CLI `demo` command, the
//! integration tests and the benchmarks.
//!
//! - context: the model has a rule where RAF, bound to GTP-loaded HRAS,
//!   phosphorylates MEK1
//! - statement: the model has a rule that leaves ERK1 phosphorylated
//!
//! Each candidate inference proposes a rule that might account for the
//! statement.

use z3::ast::Bool;

use crate::causal::CausalQuery;
use crate::error::CausewayResult;
use crate::model::{Model, Rule};
use crate::solver::Session;
use crate::structure::{Label, Structure};

/// Agents and labels of the cascade.
#[derive(Debug, Clone)]
pub struct SignalingCascade {
    pub raf: Structure,
    pub hras: Structure,
    pub mek1: Structure,
    pub erk1: Structure,
    pub saf1: Structure,
    pub gtp: Label,
    pub phosphate: Label,
}

/// A candidate inference with a human-readable name.
#[derive(Debug, Clone)]
pub struct NamedQuery<'ctx> {
    pub name: &'static str,
    pub description: &'static str,
    pub query: CausalQuery<'ctx>,
}

impl Default for SignalingCascade {
    fn default() -> Self {
        Self::new()
    }
}

impl SignalingCascade {
    pub fn new() -> Self {
        Self {
            raf: Structure::agent("RAF"),
            hras: Structure::agent("HRAS"),
            mek1: Structure::agent("MEK1"),
            erk1: Structure::agent("ERK1"),
            saf1: Structure::agent("SAF1"),
            gtp: Label::new("GTP"),
            phosphate: Label::new("phosphate"),
        }
    }

    fn phosphorylated(&self, agent: &Structure) -> Structure {
        agent.labeled(self.phosphate.clone())
    }

    /// The model has a rule where `enzyme` (as found in the pregraph)
    /// phosphorylates `substrate`.
    pub fn phosphorylation<'ctx>(
        &self,
        session: &Session<'ctx>,
        model: &Model<'ctx>,
        enzyme: &Structure,
        substrate: &Structure,
    ) -> CausewayResult<Bool<'ctx>> {
        let product = self.phosphorylated(substrate);
        model.has_rule(session, |r: &Rule<'ctx>| {
            let pre_enzyme = r.pregraph_has(session, enzyme)?;
            let pre_substrate = r.pregraph_has(session, substrate)?;
            let post = r.postgraph_has(session, &product)?;
            Ok(Bool::and(session.ctx(), &[&pre_enzyme, &pre_substrate, &post]))
        })
    }

    /// Context: RAF bound to HRAS{GTP} phosphorylates MEK1.
    pub fn context<'ctx>(
        &self,
        session: &Session<'ctx>,
        model: &Model<'ctx>,
    ) -> CausewayResult<Bool<'ctx>> {
        let active_raf = self.raf.bound(&self.hras.labeled(self.gtp.clone()));
        self.phosphorylation(session, model, &active_raf, &self.mek1)
    }

    /// Statement: some rule leaves ERK1 phosphorylated.
    pub fn statement<'ctx>(
        &self,
        session: &Session<'ctx>,
        model: &Model<'ctx>,
    ) -> CausewayResult<Bool<'ctx>> {
        let erk1p = self.phosphorylated(&self.erk1);
        model.has_rule(session, |r| r.postgraph_has(session, &erk1p))
    }

    /// The candidate inferences, in presentation order.
    pub fn candidates<'ctx>(
        &self,
        session: &Session<'ctx>,
        model: &Model<'ctx>,
    ) -> CausewayResult<Vec<NamedQuery<'ctx>>> {
        let context = self.context(session, model)?;
        let statement = self.statement(session, model)?;
        let query = |inference: Bool<'ctx>| {
            CausalQuery::new(context.clone(), statement.clone(), inference)
        };

        let mek1p = self.phosphorylated(&self.mek1);
        let erk1p = self.phosphorylated(&self.erk1);
        let erk1_after = model.has_rule(session, |r| r.postgraph_has(session, &self.erk1))?;

        Ok(vec![
            NamedQuery {
                name: "mek1-phosphorylates-erk1",
                description: "a rule where phospho-MEK1 phosphorylates ERK1",
                query: query(self.phosphorylation(session, model, &mek1p, &self.erk1)?),
            },
            NamedQuery {
                name: "restatement",
                description: "the observed statement itself",
                query: query(statement.clone()),
            },
            NamedQuery {
                name: "erk1-present",
                description: "a rule whose postgraph contains ERK1",
                query: query(erk1_after),
            },
            NamedQuery {
                name: "erk1-phosphorylates-saf1",
                description: "a rule where phospho-ERK1 phosphorylates SAF1",
                query: query(self.phosphorylation(session, model, &erk1p, &self.saf1)?),
            },
        ])
    }
}
