//! Content-addressed expression DAG.
//!
//! Every arithmetic and boolean expression in a model is interned once
//! into an [`ExprMap`]; operands are stored as ids rather than nested
//! nodes, so shared subexpressions are shared structurally. The
//! translator later let-binds each node exactly once per transition, in
//! topological order.

use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet, BinaryHeap, HashMap};
use std::fmt;

use crate::hierarchy::VarPath;
use crate::rule::ChanId;
use crate::types::{Const, PrimType};

/// Content address of an interned expression node.
///
/// Ids are dense and allocated in interning order, which makes the
/// ascending-id tie-break of [`ExprMap::topological_sort`] stable
/// across runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExprId(pub u32);

impl fmt::Display for ExprId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A readable slot of the system state, as seen from expressions.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum VarRef {
    /// A state variable leaf of the hierarchy.
    State(VarPath),
    /// The payload slot of a channel. Meaningful only while the channel
    /// is ready.
    ChanValue(ChanId),
    /// The presence bit of a channel.
    ChanReady(ChanId),
}

/// Operators of the expression DAG.
///
/// `And` and `Or` are n-ary. Everything from `Div` down is
/// representable but has no sound lowering; the translator rejects it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExprOp {
    Not,
    And,
    Or,
    Implies,
    Eq,
    Lt,
    Le,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
}

/// One node of the DAG. Operands are ids into the owning map.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ExprNode {
    Var(VarRef),
    Lit(Const),
    App(ExprOp, Vec<ExprId>),
    /// Conditional: `Ite(cond, then, else)`.
    Ite(ExprId, ExprId, ExprId),
    /// An input sourced outside the model. Representable, never lowered.
    External(String, PrimType),
}

impl ExprNode {
    /// The operand ids of this node, in positional order.
    pub fn operands(&self) -> Vec<ExprId> {
        match self {
            ExprNode::Var(_) | ExprNode::Lit(_) | ExprNode::External(..) => Vec::new(),
            ExprNode::App(_, args) => args.clone(),
            ExprNode::Ite(c, t, e) => vec![*c, *t, *e],
        }
    }
}

/// The content-addressed expression store.
#[derive(Clone, Debug, Default)]
pub struct ExprMap {
    nodes: Vec<ExprNode>,
    interned: HashMap<ExprNode, ExprId>,
}

impl ExprMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern a node, returning the existing id when an identical node
    /// is already present.
    pub fn intern(&mut self, node: ExprNode) -> ExprId {
        if let Some(&id) = self.interned.get(&node) {
            return id;
        }
        let id = ExprId(self.nodes.len() as u32);
        self.interned.insert(node.clone(), id);
        self.nodes.push(node);
        id
    }

    pub fn lookup(&self, id: ExprId) -> Option<&ExprNode> {
        self.nodes.get(id.0 as usize)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The operand ids of `id`, or `None` when `id` is not in the map.
    pub fn upstream(&self, id: ExprId) -> Option<Vec<ExprId>> {
        self.lookup(id).map(ExprNode::operands)
    }

    /// All ids reachable from `roots`, including the roots themselves.
    ///
    /// Ids missing from the map are kept in the result (their absence is
    /// surfaced by the consumer's lookup) but not traversed.
    pub fn reachable(&self, roots: impl IntoIterator<Item = ExprId>) -> BTreeSet<ExprId> {
        let mut seen = BTreeSet::new();
        let mut work: Vec<ExprId> = roots.into_iter().collect();
        while let Some(id) = work.pop() {
            if !seen.insert(id) {
                continue;
            }
            if let Some(node) = self.lookup(id) {
                work.extend(node.operands());
            }
        }
        seen
    }

    /// Kahn's algorithm over the sub-DAG induced by `set`: operands
    /// precede their users, ties broken by ascending id. `Err` carries a
    /// member of a dependency cycle.
    pub fn topological_sort(&self, set: &BTreeSet<ExprId>) -> Result<Vec<ExprId>, ExprId> {
        let mut indegree: BTreeMap<ExprId, usize> = BTreeMap::new();
        let mut users: BTreeMap<ExprId, Vec<ExprId>> = BTreeMap::new();
        for &id in set {
            indegree.entry(id).or_insert(0);
            if let Some(node) = self.lookup(id) {
                for operand in node.operands() {
                    if set.contains(&operand) {
                        *indegree.entry(id).or_insert(0) += 1;
                        users.entry(operand).or_default().push(id);
                    }
                }
            }
        }

        let mut ready: BinaryHeap<Reverse<ExprId>> = indegree
            .iter()
            .filter(|(_, &degree)| degree == 0)
            .map(|(&id, _)| Reverse(id))
            .collect();

        let mut order = Vec::with_capacity(set.len());
        while let Some(Reverse(id)) = ready.pop() {
            order.push(id);
            for &user in users.get(&id).into_iter().flatten() {
                if let Some(degree) = indegree.get_mut(&user) {
                    *degree -= 1;
                    if *degree == 0 {
                        ready.push(Reverse(user));
                    }
                }
            }
        }

        if order.len() == set.len() {
            return Ok(order);
        }
        let done: BTreeSet<ExprId> = order.iter().copied().collect();
        let stuck = set
            .iter()
            .copied()
            .find(|id| !done.contains(id))
            .unwrap_or(ExprId(0));
        Err(stuck)
    }

    /// Build a map directly from raw nodes, bypassing interning.
    /// Intended for adversarial inputs in tests; the ordinary path is
    /// [`ExprMap::intern`].
    pub fn from_nodes(nodes: Vec<ExprNode>) -> Self {
        let mut interned = HashMap::new();
        for (index, node) in nodes.iter().enumerate() {
            interned
                .entry(node.clone())
                .or_insert(ExprId(index as u32));
        }
        ExprMap { nodes, interned }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(map: &mut ExprMap, v: i64) -> ExprId {
        map.intern(ExprNode::Lit(Const::I64(v)))
    }

    #[test]
    fn test_interning_deduplicates() {
        let mut map = ExprMap::new();
        let a = lit(&mut map, 1);
        let b = lit(&mut map, 1);
        let c = lit(&mut map, 2);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_upstream_returns_operands() {
        let mut map = ExprMap::new();
        let a = lit(&mut map, 1);
        let b = lit(&mut map, 2);
        let sum = map.intern(ExprNode::App(ExprOp::Add, vec![a, b]));
        assert_eq!(map.upstream(sum), Some(vec![a, b]));
        assert_eq!(map.upstream(a), Some(vec![]));
        assert_eq!(map.upstream(ExprId(99)), None);
    }

    #[test]
    fn test_reachable_is_transitive() {
        let mut map = ExprMap::new();
        let a = lit(&mut map, 1);
        let b = lit(&mut map, 2);
        let sum = map.intern(ExprNode::App(ExprOp::Add, vec![a, b]));
        let neg = map.intern(ExprNode::App(ExprOp::Sub, vec![sum, a]));
        let set = map.reachable([neg]);
        assert_eq!(set, [a, b, sum, neg].into_iter().collect());
    }

    #[test]
    fn test_topological_sort_operands_first() {
        let mut map = ExprMap::new();
        let a = lit(&mut map, 1);
        let b = lit(&mut map, 2);
        let sum = map.intern(ExprNode::App(ExprOp::Add, vec![a, b]));
        let prod = map.intern(ExprNode::App(ExprOp::Mul, vec![sum, b]));
        let set = map.reachable([prod]);
        let order = map.topological_sort(&set).expect("acyclic");
        let pos = |id: ExprId| order.iter().position(|&x| x == id).expect("present");
        assert!(pos(a) < pos(sum));
        assert!(pos(b) < pos(sum));
        assert!(pos(sum) < pos(prod));
        // Interned ids are already dense and operand-first, so the
        // stable tie-break makes this ascending.
        assert_eq!(order, vec![a, b, sum, prod]);
    }

    #[test]
    fn test_topological_sort_rejects_cycles() {
        let map = ExprMap::from_nodes(vec![
            ExprNode::App(ExprOp::Add, vec![ExprId(1)]),
            ExprNode::App(ExprOp::Add, vec![ExprId(0)]),
        ]);
        let set: BTreeSet<ExprId> = [ExprId(0), ExprId(1)].into_iter().collect();
        assert!(map.topological_sort(&set).is_err());
    }

    #[test]
    fn test_missing_ids_survive_reachability() {
        let map = ExprMap::new();
        let set = map.reachable([ExprId(7)]);
        assert!(set.contains(&ExprId(7)));
        // A missing id has no operands, so the sort still succeeds; the
        // consumer's lookup reports the absence.
        assert_eq!(map.topological_sort(&set), Ok(vec![ExprId(7)]));
    }
}
