// src/sema/canon.rs
//! Canonical type forms.
//!
//! Two signatures are identical when their parameter and result types
//! reduce to the same canonical form — nominal identity for named types,
//! structural for the built-in compositions. Parameter names never matter.
//! Canonical forms also back the `have`/`want` rendering of mismatch
//! errors.

use crate::frontend::{FuncSig, Symbol, TypeExpr, TypeExprKind};
use crate::sema::object::PackageId;
use crate::sema::resolve::{self, TypeRef};
use crate::sema::workspace::Workspace;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CanonType {
    /// A predeclared name.
    Builtin(Symbol),
    /// A named type, identified by its owning package and name.
    Named { pkg: PackageId, name: Symbol },
    Pointer(Box<CanonType>),
    Slice(Box<CanonType>),
    Array(u64, Box<CanonType>),
    Map(Box<CanonType>, Box<CanonType>),
    Chan(Box<CanonType>),
    Func(Box<CanonSig>),
    Variadic(Box<CanonType>),
    /// A name that did not resolve; compared by spelling so that broken
    /// inputs degrade to textual identity instead of spurious mismatches.
    Opaque(Symbol),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonSig {
    pub params: Vec<CanonType>,
    pub results: Vec<CanonType>,
}

/// Reduce a type expression, as spelled in file `file_index` of `pkg`, to
/// canonical form.
pub fn canon_type(ws: &Workspace, pkg: PackageId, file_index: u32, ty: &TypeExpr) -> CanonType {
    match &ty.kind {
        TypeExprKind::Named(sym) => match resolve::resolve_ident(ws, pkg, file_index, *sym) {
            Some(TypeRef::Builtin(name)) => CanonType::Builtin(name),
            Some(TypeRef::Named(id)) => {
                let obj = ws.type_object(id);
                CanonType::Named { pkg: obj.pkg, name: obj.name }
            }
            None => CanonType::Opaque(*sym),
        },
        TypeExprKind::Qualified { qual, name } => {
            match resolve::resolve_selector(ws, pkg, file_index, qual.name, name.name) {
                Some(id) => {
                    let obj = ws.type_object(id);
                    CanonType::Named { pkg: obj.pkg, name: obj.name }
                }
                None => CanonType::Opaque(name.name),
            }
        }
        TypeExprKind::Pointer(inner) => {
            CanonType::Pointer(Box::new(canon_type(ws, pkg, file_index, inner)))
        }
        TypeExprKind::Slice(inner) => {
            CanonType::Slice(Box::new(canon_type(ws, pkg, file_index, inner)))
        }
        TypeExprKind::Array { len, elem } => {
            CanonType::Array(*len, Box::new(canon_type(ws, pkg, file_index, elem)))
        }
        TypeExprKind::Map { key, value } => CanonType::Map(
            Box::new(canon_type(ws, pkg, file_index, key)),
            Box::new(canon_type(ws, pkg, file_index, value)),
        ),
        TypeExprKind::Chan(inner) => {
            CanonType::Chan(Box::new(canon_type(ws, pkg, file_index, inner)))
        }
        TypeExprKind::Func(sig) => CanonType::Func(Box::new(canon_sig(ws, pkg, file_index, sig))),
        TypeExprKind::Variadic(inner) => {
            CanonType::Variadic(Box::new(canon_type(ws, pkg, file_index, inner)))
        }
    }
}

/// Reduce a signature to canonical form, flattening name groups: a group
/// `a, b T` contributes `T` twice.
pub fn canon_sig(ws: &Workspace, pkg: PackageId, file_index: u32, sig: &FuncSig) -> CanonSig {
    let flatten = |params: &[crate::frontend::Param]| {
        let mut out = Vec::new();
        for p in params {
            let ty = canon_type(ws, pkg, file_index, &p.ty);
            for _ in 0..p.names.len().max(1) {
                out.push(ty.clone());
            }
        }
        out
    };
    CanonSig {
        params: flatten(&sig.params),
        results: flatten(&sig.results),
    }
}

/// Render a canonical signature the way mismatch errors report it:
/// `func(int) error`, `func(string) (int, error)`.
pub fn render_sig(ws: &Workspace, sig: &CanonSig) -> String {
    let params: Vec<String> = sig.params.iter().map(|t| render_type(ws, t)).collect();
    let mut out = format!("func({})", params.join(", "));
    match sig.results.len() {
        0 => {}
        1 => {
            out.push(' ');
            out.push_str(&render_type(ws, &sig.results[0]));
        }
        _ => {
            let results: Vec<String> = sig.results.iter().map(|t| render_type(ws, t)).collect();
            out.push_str(&format!(" ({})", results.join(", ")));
        }
    }
    out
}

pub fn render_type(ws: &Workspace, ty: &CanonType) -> String {
    match ty {
        CanonType::Builtin(sym) | CanonType::Opaque(sym) => {
            ws.interner().resolve(*sym).to_string()
        }
        CanonType::Named { pkg, name } => format!(
            "{}.{}",
            ws.interner().resolve(ws.package(*pkg).name),
            ws.interner().resolve(*name)
        ),
        CanonType::Pointer(inner) => format!("*{}", render_type(ws, inner)),
        CanonType::Slice(inner) => format!("[]{}", render_type(ws, inner)),
        CanonType::Array(len, inner) => format!("[{}]{}", len, render_type(ws, inner)),
        CanonType::Map(key, value) => {
            format!("map[{}]{}", render_type(ws, key), render_type(ws, value))
        }
        CanonType::Chan(inner) => format!("chan {}", render_type(ws, inner)),
        CanonType::Func(sig) => render_sig(ws, sig),
        CanonType::Variadic(inner) => format!("...{}", render_type(ws, inner)),
    }
}
