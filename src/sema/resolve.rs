// src/sema/resolve.rs
//! Identifier and selector resolution.
//!
//! Every lookup names the package (and file) whose scope it queries; there
//! is no implicit current package. A bare identifier resolves against the
//! universe, then the package scope, then the file's dot imports. A
//! selector resolves its qualifier against the file's import table first.

use crate::frontend::{ImportSpec, SourceFile, Symbol, TypeExpr, TypeExprKind};
use crate::sema::object::{PackageId, TypeId};
use crate::sema::workspace::Workspace;

/// Predeclared type names. These resolve everywhere and belong to no
/// package, so signature rewriting leaves them untouched.
const UNIVERSE: &[&str] = &[
    "any", "bool", "byte", "complex64", "complex128", "error", "float32", "float64", "int",
    "int8", "int16", "int32", "int64", "rune", "string", "uint", "uint8", "uint16", "uint32",
    "uint64", "uintptr",
];

/// What a type name resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeRef {
    /// A predeclared name; owns no package.
    Builtin(Symbol),
    /// A named type object in the workspace.
    Named(TypeId),
}

impl TypeRef {
    pub fn named(self) -> Option<TypeId> {
        match self {
            TypeRef::Named(id) => Some(id),
            TypeRef::Builtin(_) => None,
        }
    }
}

/// Resolve a bare identifier in the scope of `pkg`, as seen from file
/// `file_index` (whose dot imports are in effect).
pub fn resolve_ident(
    ws: &Workspace,
    pkg: PackageId,
    file_index: u32,
    name: Symbol,
) -> Option<TypeRef> {
    if UNIVERSE.contains(&ws.interner().resolve(name)) {
        return Some(TypeRef::Builtin(name));
    }
    if let Some(id) = ws.package(pkg).lookup(name) {
        return Some(TypeRef::Named(id));
    }
    // Dot imports merge the imported package's scope into this file.
    let ast = &ws.package(pkg).file(file_index).ast;
    for imp in &ast.imports {
        if !is_dot_import(ws, imp) {
            continue;
        }
        if let Some(dep) = ws.package_by_path(&imp.path) {
            if let Some(id) = ws.package(dep).lookup(name) {
                return Some(TypeRef::Named(id));
            }
        }
    }
    None
}

/// Resolve `qual.name` through the import table of file `file_index` of
/// `pkg`. Blank and dot imports never bind a qualifier.
pub fn resolve_selector(
    ws: &Workspace,
    pkg: PackageId,
    file_index: u32,
    qual: Symbol,
    name: Symbol,
) -> Option<TypeId> {
    let ast = &ws.package(pkg).file(file_index).ast;
    for imp in &ast.imports {
        if effective_alias(ws, imp) == Some(qual) {
            let dep = ws.package_by_path(&imp.path)?;
            return ws.package(dep).lookup(name);
        }
    }
    None
}

/// Resolve the head of a named or qualified type expression.
pub fn resolve_type_expr(
    ws: &Workspace,
    pkg: PackageId,
    file_index: u32,
    ty: &TypeExpr,
) -> Option<TypeRef> {
    match &ty.kind {
        TypeExprKind::Named(sym) => resolve_ident(ws, pkg, file_index, *sym),
        TypeExprKind::Qualified { qual, name } => {
            resolve_selector(ws, pkg, file_index, qual.name, name.name).map(TypeRef::Named)
        }
        _ => None,
    }
}

/// The local name an import binds, or `None` for blank and dot imports
/// (and for plain imports of packages that are not loaded, whose short
/// name is unknowable).
pub fn effective_alias(ws: &Workspace, imp: &ImportSpec) -> Option<Symbol> {
    match &imp.alias {
        Some(alias) => {
            let text = ws.interner().resolve(alias.name);
            if text == "_" || text == "." {
                None
            } else {
                Some(alias.name)
            }
        }
        None => ws.package_by_path(&imp.path).map(|p| ws.package(p).name),
    }
}

pub fn is_blank_import(ws: &Workspace, imp: &ImportSpec) -> bool {
    matches!(&imp.alias, Some(a) if ws.interner().resolve(a.name) == "_")
}

pub fn is_dot_import(ws: &Workspace, imp: &ImportSpec) -> bool {
    matches!(&imp.alias, Some(a) if ws.interner().resolve(a.name) == ".")
}

/// Imports of a file that bind a usable qualifier, with the qualifier.
pub fn usable_imports<'a>(
    ws: &'a Workspace,
    ast: &'a SourceFile,
) -> impl Iterator<Item = (&'a ImportSpec, Symbol)> + 'a {
    ast.imports
        .iter()
        .filter_map(move |imp| effective_alias(ws, imp).map(|alias| (imp, alias)))
}

/// Find a usable (non-blank, non-dot) import of `path` in a file and
/// return its local qualifier.
pub fn lookup_import(ws: &Workspace, ast: &SourceFile, path: &str) -> Option<Symbol> {
    usable_imports(ws, ast)
        .find(|(imp, _)| imp.path == path)
        .map(|(_, alias)| alias)
}
