// src/frontend/path.rs
//! Positional lookup: the chain of nodes enclosing a byte offset.
//!
//! The stub synthesizer anchors a diagnostic at an offset and needs to know
//! what syntactic context surrounds it (a value declaration, a return
//! statement inside a function). `enclosing_path` returns that chain,
//! outermost first, innermost last.

use crate::frontend::ast::*;

/// A node on the enclosing-path chain.
#[derive(Debug, Clone, Copy)]
pub enum Node<'a> {
    File(&'a SourceFile),
    Type(&'a TypeDecl),
    Func(&'a FuncDecl),
    Var(&'a VarDecl),
    Return(&'a ReturnStmt),
    Expr(&'a Expr),
}

/// Compute the chain of nodes whose spans contain `offset`, outermost first.
/// The file node is always present.
pub fn enclosing_path(file: &SourceFile, offset: usize) -> Vec<Node<'_>> {
    let mut path = vec![Node::File(file)];
    for decl in &file.decls {
        if !decl.span().contains(offset) {
            continue;
        }
        match decl {
            Decl::Type(td) => path.push(Node::Type(td)),
            Decl::Func(fd) => {
                path.push(Node::Func(fd));
                if let Some(body) = &fd.body {
                    push_block(body, offset, &mut path);
                }
            }
            Decl::Var(vd) => {
                path.push(Node::Var(vd));
                for value in &vd.values {
                    push_expr(value, offset, &mut path);
                }
            }
        }
        break;
    }
    path
}

fn push_block<'a>(block: &'a Block, offset: usize, path: &mut Vec<Node<'a>>) {
    for stmt in &block.stmts {
        if !stmt.span().contains(offset) {
            continue;
        }
        match stmt {
            Stmt::Return(ret) => {
                path.push(Node::Return(ret));
                for result in &ret.results {
                    push_expr(result, offset, path);
                }
            }
            Stmt::Var(vd) => {
                path.push(Node::Var(vd));
                for value in &vd.values {
                    push_expr(value, offset, path);
                }
            }
            Stmt::Expr(e) => push_expr(e, offset, path),
        }
        return;
    }
}

fn push_expr<'a>(expr: &'a Expr, offset: usize, path: &mut Vec<Node<'a>>) {
    if !expr.span.contains(offset) {
        return;
    }
    path.push(Node::Expr(expr));
    match &expr.kind {
        ExprKind::Selector { expr: head, .. } => push_expr(head, offset, path),
        ExprKind::Call { callee, args } => {
            push_expr(callee, offset, path);
            for arg in args {
                push_expr(arg, offset, path);
            }
        }
        ExprKind::Composite { elems, .. } => {
            for elem in elems {
                push_expr(&elem.value, offset, path);
            }
        }
        ExprKind::AddrOf(inner) | ExprKind::Star(inner) | ExprKind::Paren(inner) => {
            push_expr(inner, offset, path)
        }
        ExprKind::Ident(_) | ExprKind::StringLit(_) | ExprKind::IntLit(_) | ExprKind::Nil => {}
    }
}

/// Walk an expression tree pre-order, stopping when `visit` returns false.
pub fn walk_expr<'a>(expr: &'a Expr, visit: &mut impl FnMut(&'a Expr) -> bool) {
    if !visit(expr) {
        return;
    }
    match &expr.kind {
        ExprKind::Selector { expr: head, .. } => walk_expr(head, visit),
        ExprKind::Call { callee, args } => {
            walk_expr(callee, visit);
            for arg in args {
                walk_expr(arg, visit);
            }
        }
        ExprKind::Composite { elems, .. } => {
            for elem in elems {
                walk_expr(&elem.value, visit);
            }
        }
        ExprKind::AddrOf(inner) | ExprKind::Star(inner) | ExprKind::Paren(inner) => {
            walk_expr(inner, visit)
        }
        ExprKind::Ident(_) | ExprKind::StringLit(_) | ExprKind::IntLit(_) | ExprKind::Nil => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::parser::Parser;

    fn parse(source: &str) -> SourceFile {
        Parser::new(source).parse_file().expect("parse failed")
    }

    #[test]
    fn path_into_var_value() {
        let src = "package p\n\nvar _ I = C{}\n";
        let file = parse(src);
        let offset = src.find("C{}").unwrap();
        let path = enclosing_path(&file, offset);
        assert!(matches!(path[0], Node::File(_)));
        assert!(matches!(path[1], Node::Var(_)));
        assert!(path.iter().any(|n| matches!(n, Node::Expr(_))));
    }

    #[test]
    fn path_into_return() {
        let src = "package p\n\nfunc F() I {\n    return C{}\n}\n";
        let file = parse(src);
        let offset = src.find("C{}").unwrap();
        let path = enclosing_path(&file, offset);
        assert!(matches!(path[1], Node::Func(_)));
        assert!(path.iter().any(|n| matches!(n, Node::Return(_))));
    }

    #[test]
    fn path_outside_decls() {
        let src = "package p\n\ntype C struct{}\n";
        let file = parse(src);
        let path = enclosing_path(&file, 0);
        assert_eq!(path.len(), 1);
    }
}
