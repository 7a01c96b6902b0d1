//! Derived identifier conventions of the emitted system.
//!
//! Every name the translator emits is derived here, from the system
//! name, a qualified model path, or an id. `path_name` is the boundary
//! where elaborator paths (dot-joined) enter the checker's name space
//! (bang-joined).

use relay_model::{ChanId, ElaboratedProgram, ExprId, RuleId, VarPath};
use relay_tsl::Name;

/// The system's root identifier.
pub fn system_name(program: &ElaboratedProgram) -> Name {
    Name::segment(&program.system)
}

/// A model-side qualified path, re-spelled for the checker.
pub fn path_name(path: &VarPath) -> Name {
    Name::segment(path.to_string())
}

pub fn state_type_name(sys: &Name) -> Name {
    sys.suffix("state_type")
}

pub fn initial_state_name(sys: &Name) -> Name {
    sys.suffix("initial_state")
}

pub fn master_transition_name(sys: &Name) -> Name {
    sys.suffix("transition")
}

pub fn rule_transition_name(sys: &Name, rule: RuleId) -> Name {
    master_transition_name(sys).suffix(rule.to_string())
}

pub fn system_decl_name(sys: &Name) -> Name {
    sys.suffix("transition_system")
}

/// The payload slot backing a channel.
pub fn chan_var_name(chan: &Name) -> Name {
    chan.scope(&Name::segment("var"))
}

/// The presence bit backing a channel.
pub fn chan_ready_name(chan: &Name) -> Name {
    chan.scope(&Name::segment("ready"))
}

/// The corruption input attached to a channel.
pub fn chan_fault_value_name(chan: &Name, id: ChanId) -> Name {
    chan.scope(&Name::segment("fault_value"))
        .scope(&Name::segment(id.to_string()))
}

/// The per-node faultiness flag, one per rule.
pub fn faulty_node_name(node: &Name, rule: RuleId) -> Name {
    node.scope(&Name::segment("faulty_node"))
        .scope(&Name::segment(rule.to_string()))
}

/// The per-node fault class input, one per rule, present under the
/// hybrid and fixed fault policies.
pub fn fault_class_name(node: &Name, rule: RuleId) -> Name {
    node.scope(&Name::segment("fault_class"))
        .scope(&Name::segment(rule.to_string()))
}

/// The let variable binding an interned expression in a transition.
pub fn temp_name(id: ExprId) -> Name {
    Name::segment("temp").scope(&Name::segment(id.to_string()))
}

/// Current-state accessor.
pub fn state_ref(name: &Name) -> Name {
    Name::access("state", name)
}

/// Next-state accessor.
pub fn next_ref(name: &Name) -> Name {
    Name::access("next", name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declaration_names() {
        let sys = Name::segment("A1");
        assert_eq!(state_type_name(&sys).to_string(), "A1_state_type");
        assert_eq!(initial_state_name(&sys).to_string(), "A1_initial_state");
        assert_eq!(master_transition_name(&sys).to_string(), "A1_transition");
        assert_eq!(
            rule_transition_name(&sys, RuleId(4)).to_string(),
            "A1_transition_4"
        );
        assert_eq!(
            system_decl_name(&sys).to_string(),
            "A1_transition_system"
        );
    }

    #[test]
    fn test_channel_and_fault_names() {
        let chan = Name::segment("A3.atom3.aTob");
        assert_eq!(chan_var_name(&chan).to_string(), "A3!atom3!aTob!var");
        assert_eq!(chan_ready_name(&chan).to_string(), "A3!atom3!aTob!ready");
        assert_eq!(
            chan_fault_value_name(&chan, ChanId(0)).to_string(),
            "A3!atom3!aTob!fault_value!0"
        );
        let node = Name::segment("A1.atom1");
        assert_eq!(
            faulty_node_name(&node, RuleId(0)).to_string(),
            "A1!atom1!faulty_node!0"
        );
        assert_eq!(
            fault_class_name(&node, RuleId(2)).to_string(),
            "A1!atom1!fault_class!2"
        );
    }

    #[test]
    fn test_temp_and_accessors() {
        assert_eq!(temp_name(ExprId(12)).to_string(), "temp!12");
        let x = Name::segment("A1.atom1.x");
        assert_eq!(state_ref(&x).to_string(), "state.A1!atom1!x");
        assert_eq!(next_ref(&x).to_string(), "next.A1!atom1!x");
    }
}
