//! Translates elaborated reactive models into transition systems.
//!
//! The pipeline lowers an [`ElaboratedProgram`] into one
//! [`Document`](relay_tsl::Document) for the downstream checker:
//!
//! 1. **State type** — one slot per state variable, two per channel
//!    (payload + presence bit), plus the fault inputs of the configured
//!    policy.
//! 2. **Initial states** — one equality per slot, in declaration order.
//! 3. **Per-rule transitions** — shared subexpressions let-bound in
//!    topological order, assignments and channel effects on `next.*`,
//!    and a frame equality for every untouched slot.
//! 4. **Master transition** — the disjunction of the per-rule
//!    transitions; exactly one rule fires per step.
//! 5. **Queries** — one per asserted property, with the fault
//!    assumptions as antecedent.
//!
//! Translation is a pure batch transformation: it never mutates its
//! input and either produces a complete document or fails with a
//! [`TranslateError`]. There is no partial output.

#![deny(unsafe_code)]

mod config;
mod errors;
mod exprs;
mod faults;
mod names;
mod rules;
mod state;

use std::collections::BTreeSet;

use relay_model::ElaboratedProgram;
use relay_tsl::{Document, Expr, Name, Query, Transition, TransitionSystem};
use tracing::{debug, trace};

pub use config::TranslateConfig;
pub use errors::{TranslateError, TranslateResult};

use names::{
    initial_state_name, master_transition_name, path_name, state_type_name, system_decl_name,
    system_name,
};

/// Lower a program into the checker's AST.
pub fn translate(
    program: &ElaboratedProgram,
    config: &TranslateConfig,
) -> TranslateResult<Document> {
    program.validate()?;

    let sys = system_name(program);
    debug!(
        system = %sys,
        rules = program.rules.len(),
        channels = program.channels.len(),
        "translating model"
    );

    let slots = state::hierarchy_slots(program);
    let state_type = state::state_type(program, &config.fault_model, &sys);
    let init = state::initial_state(program, &sys);

    let var_leaves: BTreeSet<Name> = program
        .hierarchy
        .var_paths()
        .iter()
        .map(path_name)
        .collect();
    let framed: Vec<Name> = slots
        .iter()
        .map(|slot| slot.name.clone())
        .chain(state_type.inputs.iter().map(|decl| decl.name.clone()))
        .collect();

    let mut transitions: Vec<Transition> = Vec::with_capacity(program.rules.len() + 1);
    for rule in &program.rules {
        trace!(rule = %rule.name, id = %rule.id, "lowering rule");
        transitions.push(rules::rule_transition(
            program,
            rule,
            &sys,
            &var_leaves,
            &framed,
        )?);
    }
    transitions.push(rules::master_transition(program, &sys));

    let system = TransitionSystem {
        name: system_decl_name(&sys),
        state_type: state_type_name(&sys),
        init: initial_state_name(&sys),
        transition: master_transition_name(&sys),
    };

    let assumptions = faults::assumptions(program, &config.fault_model)?;
    let mut queries = Vec::with_capacity(program.assertions.len());
    for (name, pred) in &program.assertions {
        trace!(query = %name, "lowering property");
        queries.push(Query {
            name: name.clone(),
            system: system.name.clone(),
            pred: Expr::implies(assumptions.clone(), exprs::lower_inline(program, *pred)?),
        });
    }

    debug!(
        state_vars = state_type.vars.len(),
        inputs = state_type.inputs.len(),
        transitions = transitions.len(),
        queries = queries.len(),
        "translation complete"
    );

    Ok(Document {
        consts: Vec::new(),
        state_type,
        init,
        transitions,
        system,
        queries,
    })
}

/// Translate and render in one step.
pub fn compile(program: &ElaboratedProgram, config: &TranslateConfig) -> TranslateResult<String> {
    let doc = translate(program, config)?;
    Ok(relay_tsl::render(&doc, config.debug))
}

#[cfg(test)]
mod tests {
    use super::*;
    use relay_model::{Const, ModelBuilder, RuleBuilder};

    fn counter() -> ElaboratedProgram {
        let mut m = ModelBuilder::new("S");
        let n = m.node(m.root(), "n");
        let x = m.var(n, "x", Const::I8(0));
        let cur = m.state(x);
        let one = m.lit(Const::I8(1));
        let next = m.add(cur, one);
        m.add_rule(RuleBuilder::new(n, "bump").assign(x, next));
        m.finish().expect("valid model")
    }

    #[test]
    fn test_document_shape() {
        let doc = translate(&counter(), &TranslateConfig::default()).expect("translated");
        assert!(doc.consts.is_empty());
        assert_eq!(doc.state_type.name.to_string(), "S_state_type");
        assert_eq!(doc.transitions.len(), 2);
        assert_eq!(doc.system.name.to_string(), "S_transition_system");
        assert_eq!(doc.system.transition.to_string(), "S_transition");
    }

    #[test]
    fn test_input_is_not_mutated() {
        let program = counter();
        let before = format!("{:?}", program);
        let _ = translate(&program, &TranslateConfig::default()).expect("translated");
        assert_eq!(before, format!("{:?}", program));
    }

    #[test]
    fn test_compile_renders_all_forms() {
        let text = compile(&counter(), &TranslateConfig::default()).expect("compiled");
        assert!(text.contains("(define-state-type S_state_type"));
        assert!(text.contains("(define-states S_initial_state S_state_type"));
        assert!(text.contains("(define-transition S_transition_0 S_state_type"));
        assert!(text.contains("(define-transition S_transition S_state_type"));
        assert!(text.contains("(define-transition-system S_transition_system"));
    }
}
