//! Fault-model instrumentation.
//!
//! Every translated system carries a baseline of fault inputs: one
//! Boolean corruption flag per channel and one Boolean faultiness flag
//! per rule's node. The hybrid and fixed policies additionally give
//! each node an integer fault-class input and constrain it through the
//! assumptions formula, which generated queries take as an antecedent.
//! None of this touches the per-rule transition predicates; the inputs
//! are latched by the frame conditions like any other slot.

use std::collections::{BTreeMap, BTreeSet};

use relay_model::{ElaboratedProgram, FaultClass, FaultConfig};
use relay_tsl::{BaseType, Expr, StateVarDecl};

use crate::errors::{TranslateError, TranslateResult};
use crate::names::{chan_fault_value_name, fault_class_name, faulty_node_name, path_name, state_ref};

/// The input section of the state type: channel corruption flags in
/// channel-id order, then node faultiness flags in rule-id order, then
/// the per-node class inputs the active policy adds.
pub fn fault_inputs(program: &ElaboratedProgram, config: &FaultConfig) -> Vec<StateVarDecl> {
    let mut inputs = Vec::new();
    for chan in &program.channels {
        inputs.push(StateVarDecl::new(
            chan_fault_value_name(&path_name(&chan.path), chan.id),
            BaseType::Bool,
        ));
    }
    for rule in &program.rules {
        inputs.push(StateVarDecl::new(
            faulty_node_name(&path_name(&rule.node), rule.id),
            BaseType::Bool,
        ));
    }
    match config {
        FaultConfig::NoFaults => {}
        FaultConfig::HybridFaults { .. } | FaultConfig::FixedFaults { .. } => {
            for rule in &program.rules {
                inputs.push(StateVarDecl::new(
                    fault_class_name(&path_name(&rule.node), rule.id),
                    BaseType::Int,
                ));
            }
        }
    }
    inputs
}

/// The assumptions formula of the configured policy.
pub fn assumptions(program: &ElaboratedProgram, config: &FaultConfig) -> TranslateResult<Expr> {
    match config {
        FaultConfig::NoFaults => Ok(Expr::bool(true)),
        FaultConfig::HybridFaults { weights, bound } => Ok(hybrid_assumptions(
            program, weights, *bound,
        )),
        FaultConfig::FixedFaults { map } => fixed_assumptions(program, map),
    }
}

/// Hybrid policy: each node's class ranges over the four classes, the
/// faultiness flag mirrors `class != NonFaulty`, and the weighted count
/// of classes stays within the configured bound.
fn hybrid_assumptions(
    program: &ElaboratedProgram,
    weights: &BTreeMap<FaultClass, u32>,
    bound: i64,
) -> Expr {
    let mut conjuncts = Vec::new();
    let mut weighted = Vec::new();
    for rule in &program.rules {
        let node = path_name(&rule.node);
        let class = Expr::var(state_ref(&fault_class_name(&node, rule.id)));
        let faulty = Expr::var(state_ref(&faulty_node_name(&node, rule.id)));
        conjuncts.push(Expr::le(Expr::int(0), class.clone()));
        conjuncts.push(Expr::le(
            class.clone(),
            Expr::int(FaultClass::ByzantineFaulty.encoding()),
        ));
        conjuncts.push(Expr::eq(
            faulty,
            Expr::not(Expr::eq(class.clone(), Expr::int(0))),
        ));
        weighted.push(weight_term(&class, weights));
    }
    if !weighted.is_empty() {
        conjuncts.push(Expr::le(Expr::add(weighted), Expr::int(bound)));
    }
    Expr::and(conjuncts)
}

/// Fixed policy: every node's class is pinned to its configured value,
/// defaulting to non-faulty. Unknown node names are a configuration
/// error.
fn fixed_assumptions(
    program: &ElaboratedProgram,
    map: &BTreeMap<String, FaultClass>,
) -> TranslateResult<Expr> {
    let known: BTreeSet<String> = program
        .rules
        .iter()
        .map(|rule| rule.node.to_string())
        .collect();
    for node in map.keys() {
        if !known.contains(node) {
            return Err(TranslateError::UnknownFaultNode(node.clone()));
        }
    }

    let mut conjuncts = Vec::new();
    for rule in &program.rules {
        let node = path_name(&rule.node);
        let class_var = Expr::var(state_ref(&fault_class_name(&node, rule.id)));
        let faulty = Expr::var(state_ref(&faulty_node_name(&node, rule.id)));
        let class = map
            .get(&rule.node.to_string())
            .copied()
            .unwrap_or(FaultClass::NonFaulty);
        conjuncts.push(Expr::eq(class_var, Expr::int(class.encoding())));
        conjuncts.push(Expr::eq(
            faulty,
            Expr::bool(class != FaultClass::NonFaulty),
        ));
    }
    Ok(Expr::and(conjuncts))
}

/// Selects the weight of the class a node's input currently encodes:
/// a nest of `ite`s over the class encodings.
fn weight_term(class_var: &Expr, weights: &BTreeMap<FaultClass, u32>) -> Expr {
    let weight_of = |class: FaultClass| {
        Expr::int(i64::from(weights.get(&class).copied().unwrap_or(0)))
    };
    let eq_code = |code: i64| Expr::eq(class_var.clone(), Expr::int(code));
    Expr::ite(
        eq_code(FaultClass::NonFaulty.encoding()),
        weight_of(FaultClass::NonFaulty),
        Expr::ite(
            eq_code(FaultClass::ManifestFaulty.encoding()),
            weight_of(FaultClass::ManifestFaulty),
            Expr::ite(
                eq_code(FaultClass::SymmetricFaulty.encoding()),
                weight_of(FaultClass::SymmetricFaulty),
                weight_of(FaultClass::ByzantineFaulty),
            ),
        ),
    )
}
