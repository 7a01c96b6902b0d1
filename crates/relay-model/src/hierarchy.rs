//! The canonical state hierarchy.
//!
//! Elaboration flattens the user-authored scope tree into a rose tree
//! whose leaves are state variables and channels. Interior nodes carry a
//! scope segment; joining the segments along a root-to-leaf path yields
//! the leaf's canonical qualified path.

use std::collections::BTreeSet;
use std::fmt;

use crate::types::{Const, PrimType};

/// A qualified path through the hierarchy, rendered dot-joined
/// (`system.node.var`). This is the elaborator-side name space; the
/// translator re-spells paths for the checker at its own boundary.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarPath(Vec<String>);

impl VarPath {
    /// A single-segment path.
    pub fn root(segment: impl Into<String>) -> Self {
        VarPath(vec![segment.into()])
    }

    /// A path from explicit segments. Must be non-empty.
    pub fn new(segments: Vec<String>) -> Self {
        debug_assert!(!segments.is_empty(), "paths have at least one segment");
        VarPath(segments)
    }

    /// This path extended by one segment.
    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment.into());
        VarPath(segments)
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for VarPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("."))
    }
}

/// One node of the state hierarchy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StateNode {
    /// A scope carrying nested declarations.
    Group {
        name: String,
        children: Vec<StateNode>,
    },
    /// A state variable with its initial value.
    Var { name: String, init: Const },
    /// A one-slot channel of the given element type.
    Chan { name: String, ty: PrimType },
}

/// A leaf of the hierarchy together with its canonical path.
#[derive(Clone, Debug, PartialEq)]
pub enum StateLeaf {
    Var { path: VarPath, init: Const },
    Chan { path: VarPath, ty: PrimType },
}

impl StateLeaf {
    pub fn path(&self) -> &VarPath {
        match self {
            StateLeaf::Var { path, .. } | StateLeaf::Chan { path, .. } => path,
        }
    }
}

impl StateNode {
    /// An empty scope.
    pub fn group(name: impl Into<String>) -> Self {
        StateNode::Group {
            name: name.into(),
            children: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            StateNode::Group { name, .. }
            | StateNode::Var { name, .. }
            | StateNode::Chan { name, .. } => name,
        }
    }

    /// All leaves in pre-order, with canonical paths rooted at this node.
    ///
    /// Pre-order is the one ordering the whole pipeline agrees on: the
    /// state type, the initial-state predicate, and the frame conditions
    /// all enumerate variables through this walk.
    pub fn leaves(&self) -> Vec<StateLeaf> {
        let mut out = Vec::new();
        self.collect_leaves(&[], &mut out);
        out
    }

    fn collect_leaves(&self, prefix: &[String], out: &mut Vec<StateLeaf>) {
        let mut segments = prefix.to_vec();
        segments.push(self.name().to_string());
        match self {
            StateNode::Group { children, .. } => {
                for child in children {
                    child.collect_leaves(&segments, out);
                }
            }
            StateNode::Var { init, .. } => out.push(StateLeaf::Var {
                path: VarPath::new(segments),
                init: *init,
            }),
            StateNode::Chan { ty, .. } => out.push(StateLeaf::Chan {
                path: VarPath::new(segments),
                ty: *ty,
            }),
        }
    }

    /// The paths of all state-variable leaves (channels excluded).
    pub fn var_paths(&self) -> BTreeSet<VarPath> {
        self.leaves()
            .into_iter()
            .filter_map(|leaf| match leaf {
                StateLeaf::Var { path, .. } => Some(path),
                StateLeaf::Chan { .. } => None,
            })
            .collect()
    }

    /// First pair of same-named siblings, as (parent name, child name).
    pub fn find_duplicate_sibling(&self) -> Option<(String, String)> {
        if let StateNode::Group { name, children } = self {
            let mut seen = BTreeSet::new();
            for child in children {
                if !seen.insert(child.name()) {
                    return Some((name.clone(), child.name().to_string()));
                }
            }
            for child in children {
                if let Some(found) = child.find_duplicate_sibling() {
                    return Some(found);
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> StateNode {
        StateNode::Group {
            name: "sys".into(),
            children: vec![
                StateNode::Var {
                    name: "flag".into(),
                    init: Const::Bool(false),
                },
                StateNode::Group {
                    name: "node".into(),
                    children: vec![
                        StateNode::Var {
                            name: "x".into(),
                            init: Const::I8(0),
                        },
                        StateNode::Chan {
                            name: "out".into(),
                            ty: PrimType::I64,
                        },
                    ],
                },
            ],
        }
    }

    #[test]
    fn test_leaves_are_preorder_with_full_paths() {
        let leaves = sample().leaves();
        let paths: Vec<String> = leaves.iter().map(|l| l.path().to_string()).collect();
        assert_eq!(paths, vec!["sys.flag", "sys.node.x", "sys.node.out"]);
    }

    #[test]
    fn test_var_paths_exclude_channels() {
        let vars = sample().var_paths();
        assert!(vars.contains(&VarPath::new(vec!["sys".into(), "node".into(), "x".into()])));
        assert_eq!(vars.len(), 2);
    }

    #[test]
    fn test_duplicate_siblings_detected() {
        let tree = StateNode::Group {
            name: "sys".into(),
            children: vec![
                StateNode::Var {
                    name: "x".into(),
                    init: Const::Bool(false),
                },
                StateNode::Chan {
                    name: "x".into(),
                    ty: PrimType::Bool,
                },
            ],
        };
        assert_eq!(
            tree.find_duplicate_sibling(),
            Some(("sys".to_string(), "x".to_string()))
        );
        assert_eq!(sample().find_duplicate_sibling(), None);
    }

    #[test]
    fn test_path_display_is_dot_joined() {
        let p = VarPath::root("a").child("b").child("c");
        assert_eq!(p.to_string(), "a.b.c");
        assert_eq!(p.segments().len(), 3);
    }
}
