//! Programmatic elaboration of reactive models.
//!
//! [`ModelBuilder`] plays the elaborator's role: callers declare a
//! scope tree of nodes, state variables, and channels, intern
//! expressions, and register rules; [`ModelBuilder::finish`] runs the
//! design-rule checks and produces the canonical
//! [`ElaboratedProgram`].
//!
//! Handles (`NodeId`, `VarId`, `ChanId`) are only meaningful with the
//! builder that issued them.

use crate::errors::ElabResult;
use crate::expr::{ExprId, ExprMap, ExprNode, ExprOp, VarRef};
use crate::hierarchy::{StateNode, VarPath};
use crate::program::ElaboratedProgram;
use crate::rule::{ChanId, ChannelDescriptor, NodeId, Rule, RuleId};
use crate::types::{Const, PrimType};

/// Handle to a declared state variable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VarId(u32);

enum Child {
    Node(NodeId),
    Var(VarId),
    Chan(ChanId),
}

struct NodeData {
    name: String,
    path: VarPath,
    children: Vec<Child>,
}

struct VarData {
    name: String,
    init: Const,
    path: VarPath,
}

struct ChanData {
    name: String,
    ty: PrimType,
    path: VarPath,
    writer: NodeId,
    reader: NodeId,
}

/// Accumulates one rule before it is registered with the builder.
#[derive(Clone, Debug)]
pub struct RuleBuilder {
    node: NodeId,
    name: String,
    guard: Option<ExprId>,
    assigns: Vec<(VarId, ExprId)>,
    writes: Vec<(ChanId, ExprId)>,
    consumes: Vec<ChanId>,
}

impl RuleBuilder {
    pub fn new(node: NodeId, name: impl Into<String>) -> Self {
        RuleBuilder {
            node,
            name: name.into(),
            guard: None,
            assigns: Vec::new(),
            writes: Vec::new(),
            consumes: Vec::new(),
        }
    }

    /// Set the firing condition. The last call wins.
    pub fn when(mut self, guard: ExprId) -> Self {
        self.guard = Some(guard);
        self
    }

    /// Assign `value` to `var` in the next state.
    pub fn assign(mut self, var: VarId, value: ExprId) -> Self {
        self.assigns.push((var, value));
        self
    }

    /// Send `value` on `chan`: sets the payload and raises the
    /// presence bit.
    pub fn write(mut self, chan: ChanId, value: ExprId) -> Self {
        self.writes.push((chan, value));
        self
    }

    /// Receive from `chan`: lowers the presence bit. Pair with a guard
    /// on the channel's ready flag.
    pub fn consume(mut self, chan: ChanId) -> Self {
        self.consumes.push(chan);
        self
    }
}

/// Builds an [`ElaboratedProgram`] declaration by declaration.
pub struct ModelBuilder {
    nodes: Vec<NodeData>,
    vars: Vec<VarData>,
    channels: Vec<ChanData>,
    exprs: ExprMap,
    rules: Vec<Rule>,
    assertions: Vec<(String, ExprId)>,
}

impl ModelBuilder {
    /// Start a model named `system`. The system name is the root scope.
    pub fn new(system: impl Into<String>) -> Self {
        let system = system.into();
        ModelBuilder {
            nodes: vec![NodeData {
                path: VarPath::root(system.clone()),
                name: system,
                children: Vec::new(),
            }],
            vars: Vec::new(),
            channels: Vec::new(),
            exprs: ExprMap::new(),
            rules: Vec::new(),
            assertions: Vec::new(),
        }
    }

    /// The root scope (the system itself).
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Declare a nested scope under `parent`.
    pub fn node(&mut self, parent: NodeId, name: impl Into<String>) -> NodeId {
        let name = name.into();
        let path = self.nodes[parent.0 as usize].path.child(name.clone());
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(NodeData {
            name,
            path,
            children: Vec::new(),
        });
        self.nodes[parent.0 as usize].children.push(Child::Node(id));
        id
    }

    /// Declare a state variable under `node` with its initial value.
    pub fn var(&mut self, node: NodeId, name: impl Into<String>, init: Const) -> VarId {
        let name = name.into();
        let path = self.nodes[node.0 as usize].path.child(name.clone());
        let id = VarId(self.vars.len() as u32);
        self.vars.push(VarData { name, init, path });
        self.nodes[node.0 as usize].children.push(Child::Var(id));
        id
    }

    /// Declare a channel under `node` from `writer` to `reader`.
    /// Channel ids are dense in declaration order.
    pub fn channel(
        &mut self,
        node: NodeId,
        name: impl Into<String>,
        ty: PrimType,
        writer: NodeId,
        reader: NodeId,
    ) -> ChanId {
        let name = name.into();
        let path = self.nodes[node.0 as usize].path.child(name.clone());
        let id = ChanId(self.channels.len() as u32);
        self.channels.push(ChanData {
            name,
            ty,
            path,
            writer,
            reader,
        });
        self.nodes[node.0 as usize].children.push(Child::Chan(id));
        id
    }

    /// The canonical path of a declared variable.
    pub fn var_path(&self, var: VarId) -> &VarPath {
        &self.vars[var.0 as usize].path
    }

    /// The canonical path of a declared node.
    pub fn node_path(&self, node: NodeId) -> &VarPath {
        &self.nodes[node.0 as usize].path
    }

    // ------------------------------------------------------------------
    // Expression interning
    // ------------------------------------------------------------------

    /// The current value of a state variable.
    pub fn state(&mut self, var: VarId) -> ExprId {
        let path = self.vars[var.0 as usize].path.clone();
        self.exprs.intern(ExprNode::Var(VarRef::State(path)))
    }

    /// The payload of a channel. Meaningful only while ready.
    pub fn chan_value(&mut self, chan: ChanId) -> ExprId {
        self.exprs.intern(ExprNode::Var(VarRef::ChanValue(chan)))
    }

    /// The presence bit of a channel.
    pub fn chan_ready(&mut self, chan: ChanId) -> ExprId {
        self.exprs.intern(ExprNode::Var(VarRef::ChanReady(chan)))
    }

    pub fn lit(&mut self, value: Const) -> ExprId {
        self.exprs.intern(ExprNode::Lit(value))
    }

    fn app(&mut self, op: ExprOp, args: Vec<ExprId>) -> ExprId {
        self.exprs.intern(ExprNode::App(op, args))
    }

    pub fn not(&mut self, a: ExprId) -> ExprId {
        self.app(ExprOp::Not, vec![a])
    }

    pub fn and(&mut self, args: Vec<ExprId>) -> ExprId {
        self.app(ExprOp::And, args)
    }

    pub fn or(&mut self, args: Vec<ExprId>) -> ExprId {
        self.app(ExprOp::Or, args)
    }

    pub fn implies(&mut self, a: ExprId, b: ExprId) -> ExprId {
        self.app(ExprOp::Implies, vec![a, b])
    }

    pub fn eq(&mut self, a: ExprId, b: ExprId) -> ExprId {
        self.app(ExprOp::Eq, vec![a, b])
    }

    pub fn lt(&mut self, a: ExprId, b: ExprId) -> ExprId {
        self.app(ExprOp::Lt, vec![a, b])
    }

    pub fn le(&mut self, a: ExprId, b: ExprId) -> ExprId {
        self.app(ExprOp::Le, vec![a, b])
    }

    /// `a > b`, desugared by operand swap.
    pub fn gt(&mut self, a: ExprId, b: ExprId) -> ExprId {
        self.lt(b, a)
    }

    /// `a >= b`, desugared by operand swap.
    pub fn ge(&mut self, a: ExprId, b: ExprId) -> ExprId {
        self.le(b, a)
    }

    pub fn add(&mut self, a: ExprId, b: ExprId) -> ExprId {
        self.app(ExprOp::Add, vec![a, b])
    }

    pub fn sub(&mut self, a: ExprId, b: ExprId) -> ExprId {
        self.app(ExprOp::Sub, vec![a, b])
    }

    pub fn mul(&mut self, a: ExprId, b: ExprId) -> ExprId {
        self.app(ExprOp::Mul, vec![a, b])
    }

    pub fn ite(&mut self, cond: ExprId, then: ExprId, els: ExprId) -> ExprId {
        self.exprs.intern(ExprNode::Ite(cond, then, els))
    }

    // Representable but never lowered; the translator rejects these.

    pub fn div(&mut self, a: ExprId, b: ExprId) -> ExprId {
        self.app(ExprOp::Div, vec![a, b])
    }

    pub fn modulo(&mut self, a: ExprId, b: ExprId) -> ExprId {
        self.app(ExprOp::Mod, vec![a, b])
    }

    pub fn bit_and(&mut self, a: ExprId, b: ExprId) -> ExprId {
        self.app(ExprOp::BitAnd, vec![a, b])
    }

    pub fn bit_or(&mut self, a: ExprId, b: ExprId) -> ExprId {
        self.app(ExprOp::BitOr, vec![a, b])
    }

    pub fn bit_xor(&mut self, a: ExprId, b: ExprId) -> ExprId {
        self.app(ExprOp::BitXor, vec![a, b])
    }

    pub fn shl(&mut self, a: ExprId, b: ExprId) -> ExprId {
        self.app(ExprOp::Shl, vec![a, b])
    }

    pub fn shr(&mut self, a: ExprId, b: ExprId) -> ExprId {
        self.app(ExprOp::Shr, vec![a, b])
    }

    pub fn external(&mut self, name: impl Into<String>, ty: PrimType) -> ExprId {
        self.exprs.intern(ExprNode::External(name.into(), ty))
    }

    // ------------------------------------------------------------------
    // Rules and properties
    // ------------------------------------------------------------------

    /// Register a rule. Rule ids are dense in declaration order.
    pub fn add_rule(&mut self, rule: RuleBuilder) -> RuleId {
        let id = RuleId(self.rules.len() as u32);
        let assigns: Vec<(VarPath, ExprId)> = rule
            .assigns
            .into_iter()
            .map(|(var, value)| (self.vars[var.0 as usize].path.clone(), value))
            .collect();
        let roots: Vec<ExprId> = rule
            .guard
            .iter()
            .copied()
            .chain(assigns.iter().map(|(_, value)| *value))
            .chain(rule.writes.iter().map(|(_, value)| *value))
            .collect();
        let used_exprs = self.exprs.reachable(roots);
        self.rules.push(Rule {
            id,
            node: self.nodes[rule.node.0 as usize].path.clone(),
            name: rule.name,
            guard: rule.guard,
            assigns,
            writes: rule.writes,
            consumes: rule.consumes,
            used_exprs,
        });
        id
    }

    /// Register a named Boolean property to be emitted as a query.
    pub fn assert_prop(&mut self, name: impl Into<String>, pred: ExprId) {
        self.assertions.push((name.into(), pred));
    }

    /// Run the design-rule checks and produce the elaborated program.
    pub fn finish(self) -> ElabResult<ElaboratedProgram> {
        let hierarchy = self.build_node(NodeId(0));
        let channels = self
            .channels
            .iter()
            .enumerate()
            .map(|(index, chan)| ChannelDescriptor {
                id: ChanId(index as u32),
                path: chan.path.clone(),
                ty: chan.ty,
                writer: chan.writer,
                reader: chan.reader,
            })
            .collect();
        let program = ElaboratedProgram {
            system: self.nodes[0].name.clone(),
            hierarchy,
            exprs: self.exprs,
            rules: self.rules,
            channels,
            assertions: self.assertions,
        };
        program.validate()?;
        Ok(program)
    }

    fn build_node(&self, node: NodeId) -> StateNode {
        let data = &self.nodes[node.0 as usize];
        let children = data
            .children
            .iter()
            .map(|child| match child {
                Child::Node(n) => self.build_node(*n),
                Child::Var(VarId(v)) => {
                    let var = &self.vars[*v as usize];
                    StateNode::Var {
                        name: var.name.clone(),
                        init: var.init,
                    }
                }
                Child::Chan(ChanId(c)) => {
                    let chan = &self.channels[*c as usize];
                    StateNode::Chan {
                        name: chan.name.clone(),
                        ty: chan.ty,
                    }
                }
            })
            .collect();
        StateNode::Group {
            name: data.name.clone(),
            children,
        }
    }
}
