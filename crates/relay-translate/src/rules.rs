//! Per-rule transitions and the master transition.
//!
//! A rule becomes one transition: its shared subexpressions are
//! let-bound up front, its assignments and channel effects constrain
//! `next.*`, and every slot the rule does not touch is framed —
//! explicitly held equal to its current value. The checker has no
//! implicit frame, so a missing frame equality would let untouched
//! state float.

use std::collections::BTreeSet;

use relay_model::{ElaboratedProgram, Rule};
use relay_tsl::{Expr, Name, Transition};

use crate::errors::{TranslateError, TranslateResult};
use crate::exprs::lower_bindings;
use crate::names::{
    chan_ready_name, chan_var_name, master_transition_name, next_ref, path_name,
    rule_transition_name, state_ref, state_type_name, temp_name,
};

/// Lower one rule. `var_leaves` is the set of assignable state
/// variables; `framed` is every latched slot and fault input, in
/// declaration order.
pub fn rule_transition(
    program: &ElaboratedProgram,
    rule: &Rule,
    sys: &Name,
    var_leaves: &BTreeSet<Name>,
    framed: &[Name],
) -> TranslateResult<Transition> {
    let bindings = lower_bindings(program, rule)?;

    let mut conjuncts = Vec::new();
    let mut assigned: BTreeSet<Name> = BTreeSet::new();

    if let Some(guard) = rule.guard {
        conjuncts.push(Expr::var(temp_name(guard)));
    }

    for (target, value) in &rule.assigns {
        let name = path_name(target);
        if !var_leaves.contains(&name) {
            return Err(TranslateError::UnknownTarget(target.clone()));
        }
        if !assigned.insert(name.clone()) {
            return Err(TranslateError::DuplicateTarget {
                rule: rule.id,
                target: target.clone(),
            });
        }
        conjuncts.push(Expr::eq(
            Expr::var(next_ref(&name)),
            Expr::var(temp_name(*value)),
        ));
    }

    for (chan, value) in &rule.writes {
        let descriptor = program
            .channel(*chan)
            .ok_or(TranslateError::UnknownChannel(*chan))?;
        let base = path_name(&descriptor.path);
        let payload = chan_var_name(&base);
        let ready = chan_ready_name(&base);
        if !assigned.insert(payload.clone()) {
            return Err(TranslateError::DuplicateTarget {
                rule: rule.id,
                target: descriptor.path.clone(),
            });
        }
        conjuncts.push(Expr::eq(
            Expr::var(next_ref(&payload)),
            Expr::var(temp_name(*value)),
        ));
        if !assigned.insert(ready.clone()) {
            return Err(TranslateError::DuplicateTarget {
                rule: rule.id,
                target: descriptor.path.clone(),
            });
        }
        conjuncts.push(Expr::eq(Expr::var(next_ref(&ready)), Expr::bool(true)));
    }

    for chan in &rule.consumes {
        let descriptor = program
            .channel(*chan)
            .ok_or(TranslateError::UnknownChannel(*chan))?;
        let ready = chan_ready_name(&path_name(&descriptor.path));
        if !assigned.insert(ready.clone()) {
            return Err(TranslateError::DuplicateTarget {
                rule: rule.id,
                target: descriptor.path.clone(),
            });
        }
        conjuncts.push(Expr::eq(Expr::var(next_ref(&ready)), Expr::bool(false)));
    }

    for name in framed {
        if !assigned.contains(name) {
            conjuncts.push(Expr::eq(
                Expr::var(next_ref(name)),
                Expr::var(state_ref(name)),
            ));
        }
    }

    Ok(Transition {
        name: rule_transition_name(sys, rule.id),
        state_type: state_type_name(sys),
        bindings,
        pred: Expr::and(conjuncts),
    })
}

/// The master transition: one step is exactly one rule firing. No rules
/// means no steps, i.e. `false`.
pub fn master_transition(program: &ElaboratedProgram, sys: &Name) -> Transition {
    let disjuncts = program
        .rules
        .iter()
        .map(|rule| Expr::var(rule_transition_name(sys, rule.id)))
        .collect();
    Transition {
        name: master_transition_name(sys),
        state_type: state_type_name(sys),
        bindings: Vec::new(),
        pred: Expr::or(disjuncts),
    }
}
