//! Elaborated programs: the unit the translator consumes.

use std::collections::BTreeSet;

use crate::errors::{ElabError, ElabResult};
use crate::expr::{ExprId, ExprMap, ExprNode, VarRef};
use crate::hierarchy::{StateLeaf, StateNode, VarPath};
use crate::rule::{ChanId, ChannelDescriptor, Rule};

/// A fully elaborated model: canonical state hierarchy, interned
/// expression DAG, flat rule list, channel descriptors, and the named
/// Boolean properties to check.
///
/// Produced by elaboration, consumed read-only by the translator.
#[derive(Clone, Debug)]
pub struct ElaboratedProgram {
    /// The system name; root segment of every qualified path.
    pub system: String,
    pub hierarchy: StateNode,
    pub exprs: ExprMap,
    pub rules: Vec<Rule>,
    pub channels: Vec<ChannelDescriptor>,
    /// Named Boolean properties, in declaration order.
    pub assertions: Vec<(String, ExprId)>,
}

impl ElaboratedProgram {
    /// Look up a channel descriptor by id.
    pub fn channel(&self, id: ChanId) -> Option<&ChannelDescriptor> {
        self.channels.iter().find(|c| c.id == id)
    }

    /// Check the structural invariants the translator relies on:
    /// unique sibling names, assignment targets declared and unique per
    /// rule, channel ids declared and backed by hierarchy leaves, every
    /// referenced expression present, and every variable reference
    /// bound.
    pub fn validate(&self) -> ElabResult<()> {
        if let Some((parent, child)) = self.hierarchy.find_duplicate_sibling() {
            return Err(ElabError::DuplicateSibling { parent, child });
        }

        let var_paths = self.hierarchy.var_paths();
        let chan_ids: BTreeSet<ChanId> = self.channels.iter().map(|c| c.id).collect();
        let chan_leaves: BTreeSet<VarPath> = self
            .hierarchy
            .leaves()
            .into_iter()
            .filter_map(|leaf| match leaf {
                StateLeaf::Chan { path, .. } => Some(path),
                StateLeaf::Var { .. } => None,
            })
            .collect();

        for channel in &self.channels {
            if !chan_leaves.contains(&channel.path) {
                return Err(ElabError::MissingChannelLeaf(channel.path.to_string()));
            }
        }

        for index in 0..self.exprs.len() {
            let id = ExprId(index as u32);
            if let Some(ExprNode::Var(var_ref)) = self.exprs.lookup(id) {
                match var_ref {
                    VarRef::State(path) => {
                        if !var_paths.contains(path) {
                            return Err(ElabError::UnboundVarRef {
                                id,
                                path: path.to_string(),
                            });
                        }
                    }
                    VarRef::ChanValue(chan) | VarRef::ChanReady(chan) => {
                        if !chan_ids.contains(chan) {
                            return Err(ElabError::UnknownChannel(*chan));
                        }
                    }
                }
            }
        }

        for rule in &self.rules {
            let mut targets = BTreeSet::new();
            for (target, _) in &rule.assigns {
                if !var_paths.contains(target) {
                    return Err(ElabError::UnknownVariable {
                        rule: rule.name.clone(),
                        target: target.to_string(),
                    });
                }
                if !targets.insert(target.clone()) {
                    return Err(ElabError::DuplicateTarget {
                        rule: rule.name.clone(),
                        target: target.to_string(),
                    });
                }
            }
            for (chan, _) in &rule.writes {
                if !chan_ids.contains(chan) {
                    return Err(ElabError::UnknownChannel(*chan));
                }
            }
            for chan in &rule.consumes {
                if !chan_ids.contains(chan) {
                    return Err(ElabError::UnknownChannel(*chan));
                }
            }

            let closure = self.exprs.reachable(rule.expr_roots());
            for &id in &closure {
                if self.exprs.lookup(id).is_none() {
                    return Err(ElabError::MissingExpr(id));
                }
            }
            if rule.used_exprs != closure {
                return Err(ElabError::StaleExprSet {
                    rule: rule.name.clone(),
                });
            }
        }

        for (_, id) in &self.assertions {
            if self.exprs.lookup(*id).is_none() {
                return Err(ElabError::MissingExpr(*id));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{ModelBuilder, RuleBuilder};
    use crate::types::Const;

    fn tiny() -> ElaboratedProgram {
        let mut m = ModelBuilder::new("sys");
        let node = m.node(m.root(), "n");
        let x = m.var(node, "x", Const::I8(0));
        let g = m.state(x);
        let one = m.lit(Const::I8(1));
        let rhs = m.add(g, one);
        m.add_rule(RuleBuilder::new(node, "bump").assign(x, rhs));
        m.finish().expect("valid model")
    }

    #[test]
    fn test_valid_program_passes() {
        assert!(tiny().validate().is_ok());
    }

    #[test]
    fn test_dangling_assignment_target_rejected() {
        let mut program = tiny();
        program.rules[0].assigns[0].0 = VarPath::root("sys").child("ghost");
        assert!(matches!(
            program.validate(),
            Err(ElabError::UnknownVariable { .. })
        ));
    }

    #[test]
    fn test_duplicate_target_rejected() {
        let mut program = tiny();
        let duplicate = program.rules[0].assigns[0].clone();
        program.rules[0].assigns.push(duplicate);
        // The duplicated assignment reuses already-counted expressions,
        // so only the target check can fire.
        assert!(matches!(
            program.validate(),
            Err(ElabError::DuplicateTarget { .. })
        ));
    }

    #[test]
    fn test_stale_used_set_rejected() {
        let mut program = tiny();
        program.rules[0].used_exprs.clear();
        assert!(matches!(
            program.validate(),
            Err(ElabError::StaleExprSet { .. })
        ));
    }
}
