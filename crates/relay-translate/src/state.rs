//! State-type synthesis and the initial-state predicate.
//!
//! [`hierarchy_slots`] is the single source of truth for what the
//! latched state consists of and in what order: the state-type
//! declaration, the initial-state predicate, and the frame conditions
//! all enumerate exactly this list, so they can never disagree.

use relay_model::{ElaboratedProgram, FaultConfig, StateLeaf};
use relay_tsl::{BaseType, Expr, Literal, Name, StateFormula, StateType, StateVarDecl};

use crate::exprs::{default_literal, lower_const, lower_type};
use crate::faults;
use crate::names::{
    chan_ready_name, chan_var_name, initial_state_name, path_name, state_ref, state_type_name,
};

/// One latched state slot: its emitted name, base type, and initial
/// value.
#[derive(Clone, Debug, PartialEq)]
pub struct StateSlot {
    pub name: Name,
    pub ty: BaseType,
    pub init: Literal,
}

/// The latched slots of the system, in hierarchy pre-order. A variable
/// leaf contributes one slot; a channel leaf contributes its payload
/// slot followed by its presence bit.
pub fn hierarchy_slots(program: &ElaboratedProgram) -> Vec<StateSlot> {
    let mut slots = Vec::new();
    for leaf in program.hierarchy.leaves() {
        match leaf {
            StateLeaf::Var { path, init } => slots.push(StateSlot {
                name: path_name(&path),
                ty: lower_type(init.prim_type()),
                init: lower_const(&init),
            }),
            StateLeaf::Chan { path, ty } => {
                let chan = path_name(&path);
                slots.push(StateSlot {
                    name: chan_var_name(&chan),
                    ty: lower_type(ty),
                    init: default_literal(ty),
                });
                slots.push(StateSlot {
                    name: chan_ready_name(&chan),
                    ty: BaseType::Bool,
                    init: Literal::Bool(false),
                });
            }
        }
    }
    slots
}

/// The state-type declaration: latched slots plus the fault inputs the
/// active policy adds.
pub fn state_type(program: &ElaboratedProgram, fault: &FaultConfig, sys: &Name) -> StateType {
    StateType {
        name: state_type_name(sys),
        vars: hierarchy_slots(program)
            .into_iter()
            .map(|slot| StateVarDecl::new(slot.name, slot.ty))
            .collect(),
        inputs: faults::fault_inputs(program, fault),
    }
}

/// The initial-state predicate: one equality per latched slot, in the
/// same order the state type declares them. Fault inputs are left
/// unconstrained; the frame conditions latch them from the first step
/// on.
pub fn initial_state(program: &ElaboratedProgram, sys: &Name) -> StateFormula {
    let equalities = hierarchy_slots(program)
        .into_iter()
        .map(|slot| Expr::eq(Expr::var(state_ref(&slot.name)), Expr::Lit(slot.init)))
        .collect();
    StateFormula {
        name: initial_state_name(sys),
        state_type: state_type_name(sys),
        pred: Expr::and(equalities),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relay_model::{Const, ModelBuilder, PrimType};

    fn channel_model() -> ElaboratedProgram {
        let mut m = ModelBuilder::new("S");
        let hub = m.node(m.root(), "hub");
        let a = m.node(hub, "a");
        let b = m.node(hub, "b");
        m.var(a, "x", Const::I8(5));
        m.channel(hub, "link", PrimType::I64, a, b);
        m.finish().expect("valid model")
    }

    #[test]
    fn test_channel_contributes_payload_and_ready() {
        let slots = hierarchy_slots(&channel_model());
        let names: Vec<String> = slots.iter().map(|s| s.name.to_string()).collect();
        assert_eq!(
            names,
            vec!["S!hub!a!x", "S!hub!link!var", "S!hub!link!ready"]
        );
        assert_eq!(slots[1].ty, BaseType::Int);
        assert_eq!(slots[1].init, Literal::Int(0));
        assert_eq!(slots[2].ty, BaseType::Bool);
        assert_eq!(slots[2].init, Literal::Bool(false));
    }

    #[test]
    fn test_initial_state_follows_slot_order() {
        let program = channel_model();
        let sys = Name::segment("S");
        let init = initial_state(&program, &sys);
        assert_eq!(init.name.to_string(), "S_initial_state");
        match &init.pred {
            Expr::App(relay_tsl::Op::And, conjuncts) => {
                assert_eq!(conjuncts.len(), 3);
                assert_eq!(
                    conjuncts[0],
                    Expr::eq(
                        Expr::var(Name::access("state", &Name::segment("S!hub!a!x"))),
                        Expr::int(5)
                    )
                );
            }
            other => panic!("expected conjunction, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_hierarchy_initializes_to_true() {
        let m = ModelBuilder::new("Empty");
        let program = m.finish().expect("valid model");
        let init = initial_state(&program, &Name::segment("Empty"));
        assert!(init.pred.is_true());
    }

    #[test]
    fn test_state_type_and_init_agree_on_order() {
        let program = channel_model();
        let sys = Name::segment("S");
        let ty = state_type(&program, &FaultConfig::NoFaults, &sys);
        let init = initial_state(&program, &sys);
        let decl_names: Vec<&str> = ty.vars.iter().map(|d| d.name.as_str()).collect();
        let init_names: Vec<&str> = match &init.pred {
            Expr::App(relay_tsl::Op::And, conjuncts) => conjuncts
                .iter()
                .filter_map(|c| match c {
                    Expr::App(relay_tsl::Op::Eq, sides) => match &sides[0] {
                        Expr::Ref(name) => name.as_str().strip_prefix("state."),
                        _ => None,
                    },
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        };
        assert_eq!(decl_names, init_names);
    }
}
