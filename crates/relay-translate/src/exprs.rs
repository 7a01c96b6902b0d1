//! Type, constant, and expression lowering.
//!
//! Expressions lower in two modes. Transitions let-bind every interned
//! node once, in topological order, so shared subexpressions evaluate
//! once per step ([`lower_bindings`]). Queries have no let scope, so
//! their predicates expand to plain trees ([`lower_inline`]).

use relay_model::{Const, ElaboratedProgram, ExprId, ExprNode, ExprOp, PrimType, Rule, VarRef};
use relay_tsl::{BaseType, Expr, Literal, Name, Op};

use crate::errors::{TranslateError, TranslateResult};
use crate::names::{chan_ready_name, chan_var_name, path_name, state_ref, temp_name};

/// Model types collapse onto the checker's three base types. All
/// integer widths widen to unbounded Int; wrap-around and unsigned
/// comparison against the original domain are not preserved.
pub fn lower_type(ty: PrimType) -> BaseType {
    match ty {
        PrimType::Bool => BaseType::Bool,
        PrimType::I8
        | PrimType::I16
        | PrimType::I32
        | PrimType::I64
        | PrimType::W8
        | PrimType::W16
        | PrimType::W32
        | PrimType::W64 => BaseType::Int,
        PrimType::F32 | PrimType::F64 => BaseType::Real,
    }
}

pub fn lower_const(value: &Const) -> Literal {
    match value {
        Const::Bool(b) => Literal::Bool(*b),
        Const::I8(v) => Literal::Int(i64::from(*v)),
        Const::I16(v) => Literal::Int(i64::from(*v)),
        Const::I32(v) => Literal::Int(i64::from(*v)),
        Const::I64(v) => Literal::Int(*v),
        Const::W8(v) => Literal::Int(i64::from(*v)),
        Const::W16(v) => Literal::Int(i64::from(*v)),
        Const::W32(v) => Literal::Int(i64::from(*v)),
        Const::W64(v) => Literal::Int(*v as i64),
        Const::F32(v) => Literal::Real(f64::from(*v)),
        Const::F64(v) => Literal::Real(*v),
    }
}

/// The value a state slot holds before anything is assigned: false, 0,
/// or 0.0.
pub fn default_literal(ty: PrimType) -> Literal {
    match ty {
        PrimType::Bool => Literal::Bool(false),
        PrimType::F32 | PrimType::F64 => Literal::Real(0.0),
        _ => Literal::Int(0),
    }
}

fn lower_op(op: ExprOp) -> TranslateResult<Op> {
    match op {
        ExprOp::Not => Ok(Op::Not),
        ExprOp::And => Ok(Op::And),
        ExprOp::Or => Ok(Op::Or),
        ExprOp::Implies => Ok(Op::Implies),
        ExprOp::Eq => Ok(Op::Eq),
        ExprOp::Lt => Ok(Op::Lt),
        ExprOp::Le => Ok(Op::Le),
        ExprOp::Add => Ok(Op::Add),
        ExprOp::Sub => Ok(Op::Sub),
        ExprOp::Mul => Ok(Op::Mul),
        ExprOp::Div => Err(TranslateError::unsupported("division")),
        ExprOp::Mod => Err(TranslateError::unsupported("modulus")),
        ExprOp::BitAnd => Err(TranslateError::unsupported("bitwise and")),
        ExprOp::BitOr => Err(TranslateError::unsupported("bitwise or")),
        ExprOp::BitXor => Err(TranslateError::unsupported("bitwise xor")),
        ExprOp::Shl => Err(TranslateError::unsupported("left shift")),
        ExprOp::Shr => Err(TranslateError::unsupported("right shift")),
    }
}

fn var_ref_expr(program: &ElaboratedProgram, var_ref: &VarRef) -> TranslateResult<Expr> {
    match var_ref {
        VarRef::State(path) => Ok(Expr::var(state_ref(&path_name(path)))),
        VarRef::ChanValue(id) => {
            let chan = program
                .channel(*id)
                .ok_or(TranslateError::UnknownChannel(*id))?;
            Ok(Expr::var(state_ref(&chan_var_name(&path_name(&chan.path)))))
        }
        VarRef::ChanReady(id) => {
            let chan = program
                .channel(*id)
                .ok_or(TranslateError::UnknownChannel(*id))?;
            Ok(Expr::var(state_ref(&chan_ready_name(&path_name(
                &chan.path,
            )))))
        }
    }
}

fn lower_node(
    program: &ElaboratedProgram,
    node: &ExprNode,
    operand: &mut dyn FnMut(ExprId) -> TranslateResult<Expr>,
) -> TranslateResult<Expr> {
    match node {
        ExprNode::Var(var_ref) => var_ref_expr(program, var_ref),
        ExprNode::Lit(value) => Ok(Expr::Lit(lower_const(value))),
        ExprNode::App(op, args) => {
            let op = lower_op(*op)?;
            let mut lowered = Vec::with_capacity(args.len());
            for arg in args {
                lowered.push(operand(*arg)?);
            }
            Ok(Expr::App(op, lowered))
        }
        ExprNode::Ite(cond, then, els) => Ok(Expr::App(
            Op::Ite,
            vec![operand(*cond)?, operand(*then)?, operand(*els)?],
        )),
        ExprNode::External(name, _) => Err(TranslateError::unsupported(format!(
            "external variable '{}'",
            name
        ))),
    }
}

/// The ordered let-binding list for one rule: every expression the rule
/// reaches, bound as `temp!<id>`, operands before users, ties broken by
/// ascending id.
pub fn lower_bindings(
    program: &ElaboratedProgram,
    rule: &Rule,
) -> TranslateResult<Vec<(Name, Expr)>> {
    let set = program.exprs.reachable(rule.expr_roots());
    let order = program
        .exprs
        .topological_sort(&set)
        .map_err(TranslateError::CyclicExpr)?;
    let mut bindings = Vec::with_capacity(order.len());
    for id in order {
        let node = program
            .exprs
            .lookup(id)
            .ok_or(TranslateError::MissingExpr(id))?;
        let lowered = lower_node(program, node, &mut |operand| {
            Ok(Expr::var(temp_name(operand)))
        })?;
        bindings.push((temp_name(id), lowered));
    }
    Ok(bindings)
}

/// Expand an expression to a let-free tree. Cyclic inputs are rejected
/// up front, so the expansion terminates.
pub fn lower_inline(program: &ElaboratedProgram, id: ExprId) -> TranslateResult<Expr> {
    let set = program.exprs.reachable([id]);
    program
        .exprs
        .topological_sort(&set)
        .map_err(TranslateError::CyclicExpr)?;
    lower_inline_rec(program, id)
}

fn lower_inline_rec(program: &ElaboratedProgram, id: ExprId) -> TranslateResult<Expr> {
    let node = program
        .exprs
        .lookup(id)
        .ok_or(TranslateError::MissingExpr(id))?;
    lower_node(program, node, &mut |operand| {
        lower_inline_rec(program, operand)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use relay_model::{ModelBuilder, RuleBuilder};

    #[test]
    fn test_type_lowering_table() {
        assert_eq!(lower_type(PrimType::Bool), BaseType::Bool);
        for ty in [
            PrimType::I8,
            PrimType::I16,
            PrimType::I32,
            PrimType::I64,
            PrimType::W8,
            PrimType::W16,
            PrimType::W32,
            PrimType::W64,
        ] {
            assert_eq!(lower_type(ty), BaseType::Int);
        }
        assert_eq!(lower_type(PrimType::F32), BaseType::Real);
        assert_eq!(lower_type(PrimType::F64), BaseType::Real);
    }

    #[test]
    fn test_const_lowering() {
        assert_eq!(lower_const(&Const::I8(-3)), Literal::Int(-3));
        assert_eq!(lower_const(&Const::W16(9)), Literal::Int(9));
        assert_eq!(lower_const(&Const::Bool(true)), Literal::Bool(true));
        assert_eq!(lower_const(&Const::F32(0.5)), Literal::Real(0.5));
    }

    #[test]
    fn test_default_literals() {
        assert_eq!(default_literal(PrimType::Bool), Literal::Bool(false));
        assert_eq!(default_literal(PrimType::W32), Literal::Int(0));
        assert_eq!(default_literal(PrimType::F64), Literal::Real(0.0));
    }

    #[test]
    fn test_bindings_reference_earlier_temps() {
        let mut m = ModelBuilder::new("S");
        let n = m.node(m.root(), "n");
        let x = m.var(n, "x", Const::I8(0));
        let cur = m.state(x);
        let one = m.lit(Const::I8(1));
        let sum = m.add(cur, one);
        m.add_rule(RuleBuilder::new(n, "r").assign(x, sum));
        let program = m.finish().expect("valid model");

        let bindings = lower_bindings(&program, &program.rules[0]).expect("lowered");
        assert_eq!(bindings.len(), 3);
        assert_eq!(bindings[0].0, temp_name(cur));
        assert_eq!(bindings[0].1, Expr::var(state_ref(&Name::segment("S!n!x"))));
        assert_eq!(bindings[2].0, temp_name(sum));
        assert_eq!(
            bindings[2].1,
            Expr::App(
                Op::Add,
                vec![Expr::var(temp_name(cur)), Expr::var(temp_name(one))]
            )
        );
    }

    #[test]
    fn test_division_is_rejected_by_name() {
        let mut m = ModelBuilder::new("S");
        let n = m.node(m.root(), "n");
        let x = m.var(n, "x", Const::I8(4));
        let cur = m.state(x);
        let two = m.lit(Const::I8(2));
        let half = m.div(cur, two);
        m.add_rule(RuleBuilder::new(n, "r").assign(x, half));
        let program = m.finish().expect("valid model");

        let err = lower_bindings(&program, &program.rules[0]).expect_err("division");
        match err {
            TranslateError::Unsupported { feature } => assert_eq!(feature, "division"),
            other => panic!("expected unsupported feature, got {:?}", other),
        }
    }

    #[test]
    fn test_external_is_rejected_with_its_name() {
        let mut m = ModelBuilder::new("S");
        let n = m.node(m.root(), "n");
        let x = m.var(n, "x", Const::I8(0));
        let ext = m.external("sensor", PrimType::I8);
        m.add_rule(RuleBuilder::new(n, "r").assign(x, ext));
        let program = m.finish().expect("valid model");

        let err = lower_bindings(&program, &program.rules[0]).expect_err("external");
        match err {
            TranslateError::Unsupported { feature } => {
                assert!(feature.contains("external variable 'sensor'"));
            }
            other => panic!("expected unsupported feature, got {:?}", other),
        }
    }

    #[test]
    fn test_inline_expansion_duplicates_shared_nodes() {
        let mut m = ModelBuilder::new("S");
        let n = m.node(m.root(), "n");
        let x = m.var(n, "x", Const::I8(0));
        let cur = m.state(x);
        let doubled = m.add(cur, cur);
        let zero = m.lit(Const::I8(0));
        let prop = m.le(zero, doubled);
        m.add_rule(RuleBuilder::new(n, "r").assign(x, cur));
        m.assert_prop("nonneg", prop);
        let program = m.finish().expect("valid model");

        let expanded = lower_inline(&program, prop).expect("inline");
        let state_x = Expr::var(state_ref(&Name::segment("S!n!x")));
        assert_eq!(
            expanded,
            Expr::App(
                Op::Le,
                vec![
                    Expr::Lit(Literal::Int(0)),
                    Expr::App(Op::Add, vec![state_x.clone(), state_x]),
                ]
            )
        );
    }
}
