//! Generalized causality: candidate and candidate-unique inferences.
//!
//! Inputs are three formulas over the same session:
//!
//! - **context** `C`: background knowledge assumed true
//! - **statement** `S`: the newly observed fact
//! - **inference** `I`: a proposed causal link meant to explain `S`
//!
//! `I` is a *candidate inference* when
//!
//! 1. it explains the statement: `C ∧ I ⇒ S` is valid,
//! 2. it is not simply false: `C ∧ I ∧ S` is satisfiable, and
//! 3. it is not vacuous: both `C ∧ ¬I` and `S ∧ ¬I` are satisfiable, so
//!    neither the context nor the statement already forces `I`.
//!
//! It is a *candidate unique inference* when, in addition, `C ∧ S ⇒ I` is
//! valid: every world consistent with context and statement satisfies `I`.
//!
//! The boolean functions evaluate their checks left to right and stop at
//! the first failing one. [`CausalQuery::report`] runs every check.

use serde::Serialize;
use z3::ast::Bool;

use crate::error::CausewayResult;
use crate::solver::Session;

/// `C ∧ I ⇒ S` is valid.
pub fn explains_statement<'ctx>(
    session: &Session<'ctx>,
    context: &Bool<'ctx>,
    statement: &Bool<'ctx>,
    inference: &Bool<'ctx>,
) -> CausewayResult<bool> {
    let ctx = session.ctx();
    let premise = Bool::and(ctx, &[context, inference]);
    session.check_valid(&premise.implies(statement))
}

/// `C ∧ I ∧ S` is satisfiable.
pub fn not_false<'ctx>(
    session: &Session<'ctx>,
    context: &Bool<'ctx>,
    statement: &Bool<'ctx>,
    inference: &Bool<'ctx>,
) -> CausewayResult<bool> {
    session.check_sat(&Bool::and(session.ctx(), &[context, inference, statement]))
}

/// `C ∧ ¬I` and `S ∧ ¬I` are both satisfiable.
pub fn not_vacuous<'ctx>(
    session: &Session<'ctx>,
    context: &Bool<'ctx>,
    statement: &Bool<'ctx>,
    inference: &Bool<'ctx>,
) -> CausewayResult<bool> {
    let ctx = session.ctx();
    let without = inference.not();
    Ok(session.check_sat(&Bool::and(ctx, &[context, &without]))?
        && session.check_sat(&Bool::and(ctx, &[statement, &without]))?)
}

/// `C ∧ S ⇒ I` is valid.
pub fn is_unique<'ctx>(
    session: &Session<'ctx>,
    context: &Bool<'ctx>,
    statement: &Bool<'ctx>,
    inference: &Bool<'ctx>,
) -> CausewayResult<bool> {
    let ctx = session.ctx();
    let known = Bool::and(ctx, &[context, statement]);
    session.check_valid(&known.implies(inference))
}

/// The inference explains the statement, is not false, and is not vacuous.
pub fn is_candidate_inference<'ctx>(
    session: &Session<'ctx>,
    context: &Bool<'ctx>,
    statement: &Bool<'ctx>,
    inference: &Bool<'ctx>,
) -> CausewayResult<bool> {
    Ok(explains_statement(session, context, statement, inference)?
        && not_false(session, context, statement, inference)?
        && not_vacuous(session, context, statement, inference)?)
}

/// A candidate inference that is also implied by context and statement.
pub fn is_candidate_unique_inference<'ctx>(
    session: &Session<'ctx>,
    context: &Bool<'ctx>,
    statement: &Bool<'ctx>,
    inference: &Bool<'ctx>,
) -> CausewayResult<bool> {
    Ok(is_unique(session, context, statement, inference)?
        && is_candidate_inference(session, context, statement, inference)?)
}

/// Outcome of every check for one `(C, S, I)` triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InferenceReport {
    pub explains: bool,
    pub not_false: bool,
    pub not_vacuous: bool,
    pub unique: bool,
}

impl InferenceReport {
    pub fn is_candidate(&self) -> bool {
        self.explains && self.not_false && self.not_vacuous
    }

    pub fn is_candidate_unique(&self) -> bool {
        self.unique && self.is_candidate()
    }
}

/// A context, statement and candidate inference, bundled.
#[derive(Debug, Clone)]
pub struct CausalQuery<'ctx> {
    pub context: Bool<'ctx>,
    pub statement: Bool<'ctx>,
    pub inference: Bool<'ctx>,
}

impl<'ctx> CausalQuery<'ctx> {
    pub fn new(context: Bool<'ctx>, statement: Bool<'ctx>, inference: Bool<'ctx>) -> Self {
        Self {
            context,
            statement,
            inference,
        }
    }

    pub fn explains_statement(&self, session: &Session<'ctx>) -> CausewayResult<bool> {
        explains_statement(session, &self.context, &self.statement, &self.inference)
    }

    pub fn is_candidate_inference(&self, session: &Session<'ctx>) -> CausewayResult<bool> {
        is_candidate_inference(session, &self.context, &self.statement, &self.inference)
    }

    pub fn is_candidate_unique_inference(&self, session: &Session<'ctx>) -> CausewayResult<bool> {
        is_candidate_unique_inference(session, &self.context, &self.statement, &self.inference)
    }

    /// Run every check without short-circuiting.
    pub fn report(&self, session: &Session<'ctx>) -> CausewayResult<InferenceReport> {
        let (c, s, i) = (&self.context, &self.statement, &self.inference);
        let report = InferenceReport {
            explains: explains_statement(session, c, s, i)?,
            not_false: not_false(session, c, s, i)?,
            not_vacuous: not_vacuous(session, c, s, i)?,
            unique: is_unique(session, c, s, i)?,
        };
        tracing::debug!(?report, "evaluated causal query");
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SessionConfig;
    use z3::ast::{Ast, Real};
    use z3::{Config, Context};

    fn with_session<F: FnOnce(&Session<'_>)>(f: F) {
        let ctx = Context::new(&Config::new());
        let session = Session::new(&ctx, SessionConfig::default()).unwrap();
        f(&session);
    }

    #[test]
    fn stronger_bound_is_a_candidate_but_not_unique() {
        with_session(|s| {
            let ctx = s.ctx();
            let x = Real::new_const(ctx, "x");
            let c = Bool::from_bool(ctx, true);
            let stmt = x.gt(&Real::from_real(ctx, 0, 1));
            let inf = x.gt(&Real::from_real(ctx, 1, 1));

            assert!(explains_statement(s, &c, &stmt, &inf).unwrap());
            assert!(not_false(s, &c, &stmt, &inf).unwrap());
            assert!(not_vacuous(s, &c, &stmt, &inf).unwrap());
            assert!(is_candidate_inference(s, &c, &stmt, &inf).unwrap());
            assert!(!is_unique(s, &c, &stmt, &inf).unwrap());
            assert!(!is_candidate_unique_inference(s, &c, &stmt, &inf).unwrap());
        });
    }

    #[test]
    fn restating_the_statement_is_vacuous() {
        with_session(|s| {
            let ctx = s.ctx();
            let x = Real::new_const(ctx, "x");
            let y = Real::new_const(ctx, "y");
            let c = y.gt(&Real::from_real(ctx, 0, 1));
            let stmt = x.gt(&Real::from_real(ctx, 0, 1));
            assert!(explains_statement(s, &c, &stmt, &stmt).unwrap());
            assert!(!not_vacuous(s, &c, &stmt, &stmt).unwrap());
            assert!(!is_candidate_inference(s, &c, &stmt, &stmt).unwrap());
        });
    }

    #[test]
    fn trivial_inference_is_vacuous() {
        with_session(|s| {
            let ctx = s.ctx();
            let p = Bool::new_const(ctx, "p");
            let q = Bool::new_const(ctx, "q");
            let truth = Bool::from_bool(ctx, true);
            assert!(!not_vacuous(s, &p, &q, &truth).unwrap());
            assert!(!is_candidate_inference(s, &p, &q, &truth).unwrap());
        });
    }

    #[test]
    fn inference_forced_by_context_is_vacuous() {
        with_session(|s| {
            let ctx = s.ctx();
            let p = Bool::new_const(ctx, "p");
            let q = Bool::new_const(ctx, "q");
            // I = C: the context already knows it.
            assert!(!not_vacuous(s, &p, &q, &p).unwrap());
        });
    }

    #[test]
    fn contradictory_inference_is_rejected_as_false() {
        with_session(|s| {
            let ctx = s.ctx();
            let p = Bool::new_const(ctx, "p");
            let q = Bool::new_const(ctx, "q");
            let falsity = Bool::from_bool(ctx, false);
            // `false` explains anything, but only vacuously.
            assert!(explains_statement(s, &p, &q, &falsity).unwrap());
            assert!(!not_false(s, &p, &q, &falsity).unwrap());
            assert!(!is_candidate_inference(s, &p, &q, &falsity).unwrap());
        });
    }

    #[test]
    fn link_forced_by_statement_is_vacuous() {
        with_session(|s| {
            let ctx = s.ctx();
            let a = Bool::new_const(ctx, "a");
            let b = Bool::new_const(ctx, "b");
            // The link `a ⇒ b` explains `b`, but `b` alone already forces it.
            let query = CausalQuery::new(a.clone(), b.clone(), a.implies(&b));
            let report = query.report(s).unwrap();
            assert!(report.explains);
            assert!(report.not_false);
            assert!(report.unique);
            assert!(!report.not_vacuous);
            assert!(!report.is_candidate());
        });
    }

    #[test]
    fn covarying_cause_is_a_unique_candidate() {
        with_session(|s| {
            let ctx = s.ctx();
            let a = Bool::new_const(ctx, "a");
            let b = Bool::new_const(ctx, "b");
            // Context: `a` and `b` co-vary. Observing `b`, `a` is the only
            // explanation, and neither fact alone already forces it.
            let query = CausalQuery::new(a._eq(&b), b.clone(), a.clone());
            let report = query.report(s).unwrap();
            assert!(report.is_candidate());
            assert!(report.is_candidate_unique());
            assert!(query.is_candidate_unique_inference(s).unwrap());
        });
    }

    #[test]
    fn uniqueness_never_adds_candidates() {
        with_session(|s| {
            let ctx = s.ctx();
            let a = Bool::new_const(ctx, "a");
            let b = Bool::new_const(ctx, "b");
            let atoms = [
                a.clone(),
                b.clone(),
                a.not(),
                a.implies(&b),
                Bool::and(ctx, &[&a, &b]),
                Bool::or(ctx, &[&a, &b]),
                Bool::from_bool(ctx, true),
                Bool::from_bool(ctx, false),
            ];
            for c in &atoms {
                for stmt in &atoms {
                    for inf in &atoms {
                        if is_candidate_unique_inference(s, c, stmt, inf).unwrap() {
                            assert!(is_candidate_inference(s, c, stmt, inf).unwrap());
                        }
                    }
                }
            }
            assert_eq!(s.open_scopes(), 0);
        });
    }

    #[test]
    fn report_agrees_with_short_circuit_functions() {
        with_session(|s| {
            let ctx = s.ctx();
            let x = Real::new_const(ctx, "x");
            let query = CausalQuery::new(
                Bool::from_bool(ctx, true),
                x.gt(&Real::from_real(ctx, 0, 1)),
                x.gt(&Real::from_real(ctx, 1, 1)),
            );
            let report = query.report(s).unwrap();
            assert_eq!(report.is_candidate(), query.is_candidate_inference(s).unwrap());
            assert_eq!(
                report.is_candidate_unique(),
                query.is_candidate_unique_inference(s).unwrap()
            );
            assert_eq!(report.explains, query.explains_statement(s).unwrap());
        });
    }
}
