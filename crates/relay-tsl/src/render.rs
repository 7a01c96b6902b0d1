//! Text rendering of the transition-system surface syntax.
//!
//! The renderer is the only place [`Name`]s become text. Output is
//! deterministic: the same document renders to the same bytes. The
//! `debug` flag adds `;;` comments and nothing else.

use crate::ast::{Document, StateVarDecl, Transition};
use crate::expr::{Expr, Literal, Op};

/// Serialize a document to the concrete surface syntax.
pub fn render(doc: &Document, debug: bool) -> String {
    let mut out = String::new();

    for decl in &doc.consts {
        if debug {
            out.push_str(&format!(";; constant {}\n", decl.name));
        }
        out.push_str(&format!("(define-constant {} ", decl.name));
        render_inline(&mut out, &decl.value);
        out.push_str(")\n\n");
    }

    if debug {
        out.push_str(";; state type\n");
    }
    out.push_str(&format!("(define-state-type {}\n  (", doc.state_type.name));
    render_decls(&mut out, &doc.state_type.vars);
    out.push_str(")\n  (");
    render_decls(&mut out, &doc.state_type.inputs);
    out.push_str("))\n\n");

    if debug {
        out.push_str(";; initial states\n");
    }
    out.push_str(&format!(
        "(define-states {} {}\n  ",
        doc.init.name, doc.init.state_type
    ));
    render_expr(&mut out, &doc.init.pred, 2);
    out.push_str(")\n\n");

    for transition in &doc.transitions {
        if debug {
            out.push_str(&format!(";; transition {}\n", transition.name));
        }
        render_transition(&mut out, transition);
        out.push('\n');
    }

    if debug {
        out.push_str(";; system\n");
    }
    out.push_str(&format!(
        "(define-transition-system {}\n  {} {} {})\n",
        doc.system.name, doc.system.state_type, doc.system.init, doc.system.transition
    ));

    for query in &doc.queries {
        out.push('\n');
        if debug {
            out.push_str(&format!(";; query {}\n", query.name));
        }
        out.push_str(&format!("(query {}\n  ", query.system));
        render_expr(&mut out, &query.pred, 2);
        out.push_str(")\n");
    }

    out
}

fn render_decls(out: &mut String, decls: &[StateVarDecl]) {
    for (index, decl) in decls.iter().enumerate() {
        if index > 0 {
            out.push(' ');
        }
        out.push_str(&format!("({} {})", decl.name, decl.ty.symbol()));
    }
}

fn render_transition(out: &mut String, transition: &Transition) {
    out.push_str(&format!(
        "(define-transition {} {}\n",
        transition.name, transition.state_type
    ));
    if transition.bindings.is_empty() {
        out.push_str("  ");
        render_expr(out, &transition.pred, 2);
        out.push_str(")\n");
        return;
    }
    out.push_str("  (let (");
    for (index, (name, expr)) in transition.bindings.iter().enumerate() {
        if index > 0 {
            out.push('\n');
            push_indent(out, 8);
        }
        out.push_str(&format!("({} ", name));
        render_inline(out, expr);
        out.push(')');
    }
    out.push_str(")\n    ");
    render_expr(out, &transition.pred, 4);
    out.push_str("))\n");
}

/// Conjunctions and disjunctions break across lines; everything else
/// renders inline.
fn render_expr(out: &mut String, expr: &Expr, indent: usize) {
    match expr {
        Expr::App(op @ (Op::And | Op::Or), args) if args.len() > 1 => {
            out.push('(');
            out.push_str(op.symbol());
            for arg in args {
                out.push('\n');
                push_indent(out, indent + 2);
                render_expr(out, arg, indent + 2);
            }
            out.push(')');
        }
        _ => render_inline(out, expr),
    }
}

fn render_inline(out: &mut String, expr: &Expr) {
    match expr {
        Expr::Lit(literal) => render_literal(out, literal),
        Expr::Ref(name) => out.push_str(name.as_str()),
        Expr::App(op, args) => {
            out.push('(');
            out.push_str(op.symbol());
            for arg in args {
                out.push(' ');
                render_inline(out, arg);
            }
            out.push(')');
        }
    }
}

fn render_literal(out: &mut String, literal: &Literal) {
    match literal {
        Literal::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Literal::Int(i) => out.push_str(&i.to_string()),
        // {:?} keeps a decimal point on round values (0.0, not 0).
        Literal::Real(r) => out.push_str(&format!("{:?}", r)),
    }
}

fn push_indent(out: &mut String, indent: usize) {
    for _ in 0..indent {
        out.push(' ');
    }
}
