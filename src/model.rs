//! Bounded rule models.
//!
//! A rule rewrites a pregraph into a postgraph. A symbolic [`Model`] is a
//! fixed number of rule slots, each with its own pregraph, postgraph and a
//! presence flag; "the model has a rule such that P" becomes the
//! disjunction over slots of "the slot is present and P holds of it".
//! Statements about a model are therefore ordinary formulas and can be fed
//! to the causal query layer as context, statement or inference.

use z3::ast::Bool;

use crate::error::CausewayResult;
use crate::graph::Graph;
use crate::solver::Session;
use crate::structure::Structure;

/// One rule slot of a model.
#[derive(Debug, Clone)]
pub struct Rule<'ctx> {
    pregraph: Graph<'ctx>,
    postgraph: Graph<'ctx>,
}

impl<'ctx> Rule<'ctx> {
    /// A rule with unconstrained pre- and postgraph.
    pub fn symbolic(session: &Session<'ctx>, model: &str, index: usize) -> Self {
        Self {
            pregraph: Graph::symbolic(session, &format!("{model}.rule{index}.pre")),
            postgraph: Graph::symbolic(session, &format!("{model}.rule{index}.post")),
        }
    }

    /// A rule with fixed graphs.
    pub fn new(pregraph: Graph<'ctx>, postgraph: Graph<'ctx>) -> Self {
        Self {
            pregraph,
            postgraph,
        }
    }

    pub fn pregraph(&self) -> &Graph<'ctx> {
        &self.pregraph
    }

    pub fn postgraph(&self) -> &Graph<'ctx> {
        &self.postgraph
    }

    /// `structure` is present in the rule's pregraph.
    pub fn pregraph_has(
        &self,
        session: &Session<'ctx>,
        structure: &Structure,
    ) -> CausewayResult<Bool<'ctx>> {
        structure.holds_in(&self.pregraph, session)
    }

    /// `structure` is present in the rule's postgraph.
    pub fn postgraph_has(
        &self,
        session: &Session<'ctx>,
        structure: &Structure,
    ) -> CausewayResult<Bool<'ctx>> {
        structure.holds_in(&self.postgraph, session)
    }
}

/// A model: a bounded set of rule slots.
#[derive(Debug, Clone)]
pub struct Model<'ctx> {
    name: String,
    rules: Vec<Rule<'ctx>>,
    present: Vec<Bool<'ctx>>,
}

impl<'ctx> Model<'ctx> {
    /// A model of `capacity` unconstrained rule slots.
    pub fn symbolic(session: &Session<'ctx>, name: &str, capacity: usize) -> Self {
        let ctx = session.ctx();
        let rules = (0..capacity)
            .map(|i| Rule::symbolic(session, name, i))
            .collect();
        let present = (0..capacity)
            .map(|i| Bool::new_const(ctx, format!("{name}.rule{i}.present")))
            .collect();
        tracing::debug!(model = name, capacity, "built symbolic model");
        Self {
            name: name.to_string(),
            rules,
            present,
        }
    }

    /// A symbolic model sized by the session's `model_capacity`.
    pub fn from_config(session: &Session<'ctx>, name: &str) -> Self {
        Self::symbolic(session, name, session.config().model_capacity)
    }

    /// A model made of exactly the given rules, all present.
    pub fn concrete(session: &Session<'ctx>, name: &str, rules: Vec<Rule<'ctx>>) -> Self {
        let present = rules
            .iter()
            .map(|_| Bool::from_bool(session.ctx(), true))
            .collect();
        Self {
            name: name.to_string(),
            rules,
            present,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn capacity(&self) -> usize {
        self.rules.len()
    }

    pub fn rules(&self) -> &[Rule<'ctx>] {
        &self.rules
    }

    /// Presence flag of slot `index`.
    pub fn is_present(&self, index: usize) -> Option<&Bool<'ctx>> {
        self.present.get(index)
    }

    /// The model has some rule satisfying `predicate`.
    ///
    /// An empty model has no rules, so the result is `false`.
    pub fn has_rule<F>(
        &self,
        session: &Session<'ctx>,
        mut predicate: F,
    ) -> CausewayResult<Bool<'ctx>>
    where
        F: FnMut(&Rule<'ctx>) -> CausewayResult<Bool<'ctx>>,
    {
        let ctx = session.ctx();
        let mut disjuncts = Vec::with_capacity(self.rules.len());
        for (rule, present) in self.rules.iter().zip(&self.present) {
            let holds = predicate(rule)?;
            disjuncts.push(Bool::and(ctx, &[present, &holds]));
        }
        let refs: Vec<&Bool<'ctx>> = disjuncts.iter().collect();
        Ok(Bool::or(ctx, &refs))
    }
}
