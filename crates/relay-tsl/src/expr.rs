//! Expressions of the transition-system language.
//!
//! The expression grammar is the SMT fragment the downstream checker
//! accepts: boolean connectives, linear-ish arithmetic over Int and
//! Real, equality and ordering, and `ite`. Conjunction and disjunction
//! go through smart constructors that keep emitted formulas flat.

use serde::{Deserialize, Serialize};

use crate::name::Name;

/// Base types of the checker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BaseType {
    Bool,
    Int,
    Real,
}

impl BaseType {
    pub fn symbol(&self) -> &'static str {
        match self {
            BaseType::Bool => "Bool",
            BaseType::Int => "Int",
            BaseType::Real => "Real",
        }
    }
}

/// A literal value.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Literal {
    Bool(bool),
    Int(i64),
    Real(f64),
}

/// Operators. `And`, `Or`, and `Add` are n-ary; the rest have fixed
/// arity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Op {
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
    Ite,
}

impl Op {
    pub fn symbol(&self) -> &'static str {
        match self {
            Op::Not => "not",
            Op::And => "and",
            Op::Or => "or",
            Op::Implies => "=>",
            Op::Eq => "=",
            Op::Lt => "<",
            Op::Le => "<=",
            Op::Add => "+",
            Op::Sub => "-",
            Op::Mul => "*",
            Op::Ite => "ite",
        }
    }
}

/// An expression tree.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    Lit(Literal),
    /// A reference to a state variable accessor, a let-bound variable,
    /// or a named transition.
    Ref(Name),
    App(Op, Vec<Expr>),
}

impl Expr {
    pub fn bool(value: bool) -> Expr {
        Expr::Lit(Literal::Bool(value))
    }

    pub fn int(value: i64) -> Expr {
        Expr::Lit(Literal::Int(value))
    }

    pub fn var(name: Name) -> Expr {
        Expr::Ref(name)
    }

    pub fn is_true(&self) -> bool {
        matches!(self, Expr::Lit(Literal::Bool(true)))
    }

    pub fn is_false(&self) -> bool {
        matches!(self, Expr::Lit(Literal::Bool(false)))
    }

    /// Flattened conjunction: nested `and`s are spliced, literal `true`
    /// is dropped, a singleton collapses, and the empty conjunction is
    /// `true`.
    pub fn and(conjuncts: Vec<Expr>) -> Expr {
        let mut flat = Vec::with_capacity(conjuncts.len());
        for conjunct in conjuncts {
            match conjunct {
                Expr::App(Op::And, inner) => flat.extend(inner),
                e if e.is_true() => {}
                e => flat.push(e),
            }
        }
        if flat.is_empty() {
            return Expr::bool(true);
        }
        if flat.len() == 1 {
            return flat.remove(0);
        }
        Expr::App(Op::And, flat)
    }

    /// Flattened disjunction: nested `or`s are spliced, literal `false`
    /// is dropped, a singleton collapses, and the empty disjunction is
    /// `false`.
    pub fn or(disjuncts: Vec<Expr>) -> Expr {
        let mut flat = Vec::with_capacity(disjuncts.len());
        for disjunct in disjuncts {
            match disjunct {
                Expr::App(Op::Or, inner) => flat.extend(inner),
                e if e.is_false() => {}
                e => flat.push(e),
            }
        }
        if flat.is_empty() {
            return Expr::bool(false);
        }
        if flat.len() == 1 {
            return flat.remove(0);
        }
        Expr::App(Op::Or, flat)
    }

    pub fn not(e: Expr) -> Expr {
        Expr::App(Op::Not, vec![e])
    }

    pub fn implies(antecedent: Expr, consequent: Expr) -> Expr {
        Expr::App(Op::Implies, vec![antecedent, consequent])
    }

    pub fn eq(a: Expr, b: Expr) -> Expr {
        Expr::App(Op::Eq, vec![a, b])
    }

    pub fn le(a: Expr, b: Expr) -> Expr {
        Expr::App(Op::Le, vec![a, b])
    }

    pub fn add(terms: Vec<Expr>) -> Expr {
        Expr::App(Op::Add, terms)
    }

    pub fn ite(cond: Expr, then: Expr, els: Expr) -> Expr {
        Expr::App(Op::Ite, vec![cond, then, els])
    }
}
