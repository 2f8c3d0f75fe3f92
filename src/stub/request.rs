// src/stub/request.rs
//! Request extraction: decide, from the syntax surrounding a diagnostic,
//! which interface a concrete type should be made to implement.
//!
//! Two shapes are recognized, in order: a value binding
//! (`var x I = C{}`, including the conversion form `var _ = I(C{})`) and a
//! return statement inside a function whose result type names an
//! interface. Anything else — and any resolution failure — yields no
//! request, so the caller can ignore the diagnostic.

use tracing::debug;

use crate::frontend::{
    Expr, ExprKind, Node, TypeExpr, TypeExprKind, VarDecl, enclosing_path, walk_expr,
};
use crate::sema::{PackageId, TypeId, TypeRef, Workspace, resolve_ident, resolve_selector};
use crate::stub::errors::StubError;
use crate::stub::scope;

/// A recognized stub request: both type objects resolved, plus the
/// receiver spelling the request site implies.
#[derive(Debug, Clone, Copy)]
pub struct StubRequest {
    pub iface: TypeId,
    pub iface_pkg: PackageId,
    pub concrete: TypeId,
    pub concrete_pkg: PackageId,
    pub pointer: bool,
}

/// Extract a stub request for a diagnostic anchored at `offset` in file
/// `file_index` of `pkg`.
pub fn implement_request(
    ws: &Workspace,
    pkg: PackageId,
    file_index: u32,
    offset: usize,
) -> Result<Option<StubRequest>, StubError> {
    let ast = &ws.package(pkg).file(file_index).ast;
    let path = enclosing_path(ast, offset);

    if let Some(vd) = variable_declaration(&path) {
        return Ok(from_value_spec(ws, pkg, file_index, vd, offset));
    }
    let ret = path.iter().find_map(|n| match n {
        Node::Return(r) => Some(*r),
        _ => None,
    });
    if let Some(ret) = ret {
        return from_return(ws, pkg, file_index, &path, ret, offset);
    }
    Ok(None)
}

fn variable_declaration<'a>(path: &[Node<'a>]) -> Option<&'a VarDecl> {
    path.iter().find_map(|node| match node {
        Node::Var(vd) => Some(*vd),
        _ => None,
    })
}

fn from_value_spec(
    ws: &Workspace,
    pkg: PackageId,
    file_index: u32,
    vd: &VarDecl,
    offset: usize,
) -> Option<StubRequest> {
    let idx = vd
        .values
        .iter()
        .position(|v| v.span.contains(offset))
        .unwrap_or(0);
    let value = vd.values.get(idx)?;

    // The interface side: the explicit annotation when present, otherwise
    // the callee of a conversion-style initialiser.
    let (iface, conversion_args) = match &vd.ty {
        Some(annotation) => (type_name_in_type(ws, pkg, file_index, annotation)?, None),
        None => {
            let ExprKind::Call { callee, args } = &value.kind else {
                return None;
            };
            (
                type_name_in_expr(ws, pkg, file_index, callee)?,
                Some(args.as_slice()),
            )
        }
    };

    // The concrete side: scanned from the initialiser — for the conversion
    // form, from the conversion's arguments (scanning the whole call would
    // re-find the interface name itself).
    let concrete = match conversion_args {
        Some(args) => args
            .iter()
            .find_map(|arg| type_name_in_expr(ws, pkg, file_index, arg))?,
        None => type_name_in_expr(ws, pkg, file_index, value)?,
    };

    let pointer = has_pointer_construction(value);
    debug!(pointer, "recognized value-binding stub request");
    Some(StubRequest {
        iface,
        iface_pkg: ws.type_object(iface).pkg,
        concrete,
        concrete_pkg: ws.type_object(concrete).pkg,
        pointer,
    })
}

fn from_return(
    ws: &Workspace,
    pkg: PackageId,
    file_index: u32,
    path: &[Node<'_>],
    ret: &crate::frontend::ReturnStmt,
    offset: usize,
) -> Result<Option<StubRequest>, StubError> {
    let Some(idx) = ret.results.iter().position(|r| r.span.contains(offset)) else {
        return Err(StubError::ReturnIndexOutOfRange {
            offset,
            start: ret.span.start,
            end: ret.span.end,
        });
    };
    let result = &ret.results[idx];

    // Composite literals of map/array/slice type cannot satisfy an
    // interface position; ignore them.
    if let ExprKind::Composite { ty, .. } = &result.kind {
        if matches!(
            ty.kind,
            TypeExprKind::Map { .. } | TypeExprKind::Slice(_) | TypeExprKind::Array { .. }
        ) {
            return Ok(None);
        }
    }

    let Some(concrete) = type_name_in_expr(ws, pkg, file_index, result) else {
        return Ok(None);
    };

    let Some(func) = scope::enclosing_function(path) else {
        return Err(StubError::NoEnclosingFunction);
    };
    // The declared result at this position must be a named type; anonymous
    // interfaces are skipped.
    let Some(result_ty) = func.sig.result_at(idx) else {
        return Ok(None);
    };
    let iface = match &result_ty.kind {
        TypeExprKind::Named(sym) => {
            match resolve_ident(ws, pkg, file_index, *sym) {
                Some(TypeRef::Named(id)) => id,
                _ => return Ok(None),
            }
        }
        TypeExprKind::Qualified { qual, name } => {
            match resolve_selector(ws, pkg, file_index, qual.name, name.name) {
                Some(id) => id,
                None => return Ok(None),
            }
        }
        _ => return Ok(None),
    };

    debug!("recognized return-position stub request");
    Ok(Some(StubRequest {
        iface,
        iface_pkg: ws.type_object(iface).pkg,
        concrete,
        concrete_pkg: ws.type_object(concrete).pkg,
        pointer: false,
    }))
}

/// First named type reachable inside a type expression, resolved in the
/// given file's environment. Foreign types must be reachable through the
/// package's import graph or they are skipped.
fn type_name_in_type(
    ws: &Workspace,
    pkg: PackageId,
    file_index: u32,
    ty: &TypeExpr,
) -> Option<TypeId> {
    match &ty.kind {
        TypeExprKind::Named(sym) => {
            let id = resolve_ident(ws, pkg, file_index, *sym)?.named()?;
            reachable(ws, pkg, id)
        }
        TypeExprKind::Qualified { qual, name } => {
            let id = resolve_selector(ws, pkg, file_index, qual.name, name.name)?;
            reachable(ws, pkg, id)
        }
        TypeExprKind::Pointer(inner)
        | TypeExprKind::Slice(inner)
        | TypeExprKind::Chan(inner)
        | TypeExprKind::Variadic(inner) => type_name_in_type(ws, pkg, file_index, inner),
        TypeExprKind::Array { elem, .. } => type_name_in_type(ws, pkg, file_index, elem),
        TypeExprKind::Map { .. } | TypeExprKind::Func(_) => None,
    }
}

/// Scan an expression for the first reference to a named type: a composite
/// literal head, a bare type identifier, or a qualified type name.
fn type_name_in_expr(
    ws: &Workspace,
    pkg: PackageId,
    file_index: u32,
    expr: &Expr,
) -> Option<TypeId> {
    let mut found = None;
    walk_expr(expr, &mut |e| {
        if found.is_some() {
            return false;
        }
        match &e.kind {
            ExprKind::Composite { ty, .. } => {
                if let Some(id) = type_name_in_type(ws, pkg, file_index, ty) {
                    found = Some(id);
                    return false;
                }
                true
            }
            ExprKind::Selector { expr: head, sel } => {
                if let ExprKind::Ident(qual) = head.kind {
                    if let Some(id) = resolve_selector(ws, pkg, file_index, qual, sel.name) {
                        if let Some(id) = reachable(ws, pkg, id) {
                            found = Some(id);
                        }
                        return false;
                    }
                }
                true
            }
            ExprKind::Ident(sym) => {
                if let Some(TypeRef::Named(id)) = resolve_ident(ws, pkg, file_index, *sym) {
                    if let Some(id) = reachable(ws, pkg, id) {
                        found = Some(id);
                        return false;
                    }
                }
                true
            }
            _ => true,
        }
    });
    found
}

/// A type object in another package is only usable when that package is
/// reachable through the querying package's imports.
fn reachable(ws: &Workspace, from: PackageId, id: TypeId) -> Option<TypeId> {
    let owner = ws.type_object(id).pkg;
    if owner == from {
        return Some(id);
    }
    let owner_path = &ws.package(owner).path;
    ws.import_of(from, owner_path).map(|_| id)
}

/// True when the initialiser takes an address or constructs a pointer.
fn has_pointer_construction(expr: &Expr) -> bool {
    let mut pointer = false;
    walk_expr(expr, &mut |e| {
        if matches!(e.kind, ExprKind::AddrOf(_) | ExprKind::Star(_)) {
            pointer = true;
            return false;
        }
        true
    });
    pointer
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    fn workspace(concrete_file: &str) -> Workspace {
        let mut ws = Workspace::new();
        ws.add_package(
            "example.com/p",
            vec![(
                "p.go".to_string(),
                indoc! {r#"
                    package p

                    type I interface {
                        Do(x int) error
                    }
                "#}
                .to_string(),
            )],
        )
        .unwrap();
        ws.add_package(
            "example.com/q",
            vec![("q.go".to_string(), concrete_file.to_string())],
        )
        .unwrap();
        ws
    }

    fn request_at(ws: &Workspace, marker: &str) -> Option<StubRequest> {
        let q = ws.package_by_path("example.com/q").unwrap();
        let src = &ws.package(q).file(0).source;
        let offset = src.find(marker).unwrap();
        implement_request(ws, q, 0, offset).unwrap()
    }

    #[test]
    fn value_binding_with_annotation() {
        let ws = workspace(indoc! {r#"
            package q

            import "example.com/p"

            type C struct{}

            var _ p.I = C{}
        "#});
        let req = request_at(&ws, "C{}").unwrap();
        assert!(!req.pointer);
        assert_eq!(ws.package(req.iface_pkg).path, "example.com/p");
        assert_eq!(ws.package(req.concrete_pkg).path, "example.com/q");
    }

    #[test]
    fn value_binding_pointer_forms() {
        let ws = workspace(indoc! {r#"
            package q

            import "example.com/p"

            type C struct{}

            var _ p.I = &C{}

            var _ p.I = (*C)(nil)
        "#});
        let req = request_at(&ws, "&C{}").unwrap();
        assert!(req.pointer);
        let req = request_at(&ws, "(*C)(nil)").unwrap();
        assert!(req.pointer);
    }

    #[test]
    fn conversion_form_finds_argument_type() {
        let ws = workspace(indoc! {r#"
            package q

            import "example.com/p"

            type C struct{}

            var _ = p.I(C{})
        "#});
        let req = request_at(&ws, "C{}").unwrap();
        let iface = ws.type_object(req.iface);
        let concrete = ws.type_object(req.concrete);
        assert!(iface.is_interface());
        assert_ne!(iface.name, concrete.name);
    }

    #[test]
    fn return_form() {
        let ws = workspace(indoc! {r#"
            package q

            import "example.com/p"

            type C struct{}

            func New() p.I {
                return C{}
            }
        "#});
        let req = request_at(&ws, "C{}").unwrap();
        assert!(!req.pointer);
        assert!(ws.type_object(req.iface).is_interface());
    }

    #[test]
    fn return_of_map_literal_is_ignored() {
        let ws = workspace(indoc! {r#"
            package q

            import "example.com/p"

            func New() p.I {
                return map[string]int{}
            }
        "#});
        assert!(request_at(&ws, "map[string]int{}").is_none());
    }

    #[test]
    fn builtin_result_yields_nothing() {
        let ws = workspace(indoc! {r#"
            package q

            type C struct{}

            func New() error {
                return C{}
            }
        "#});
        assert!(request_at(&ws, "C{}").is_none());
    }

    #[test]
    fn diagnostic_outside_return_results_is_an_error() {
        let ws = workspace(indoc! {r#"
            package q

            import "example.com/p"

            type C struct{}

            func New() p.I {
                return C{}
            }
        "#});
        let q = ws.package_by_path("example.com/q").unwrap();
        let src = &ws.package(q).file(0).source;
        // Anchored at the `return` keyword, not inside a result expression.
        let offset = src.find("return").unwrap();
        let err = implement_request(&ws, q, 0, offset).unwrap_err();
        assert!(matches!(err, StubError::ReturnIndexOutOfRange { .. }));
    }

    #[test]
    fn unrelated_context_yields_nothing() {
        let ws = workspace(indoc! {r#"
            package q

            type C struct{}
        "#});
        let q = ws.package_by_path("example.com/q").unwrap();
        assert!(implement_request(&ws, q, 0, 0).unwrap().is_none());
    }

    #[test]
    fn unimported_interface_package_yields_nothing() {
        // The interface package exists but nothing in q imports it.
        let ws = workspace(indoc! {r#"
            package q

            type C struct{}

            var _ I = C{}
        "#});
        let q = ws.package_by_path("example.com/q").unwrap();
        let src = &ws.package(q).file(0).source;
        let offset = src.find("C{}").unwrap();
        assert!(implement_request(&ws, q, 0, offset).unwrap().is_none());
    }
}
