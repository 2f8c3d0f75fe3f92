// src/stub/rewrite.rs
//! Signature rewriting: relocate a method signature from the interface's
//! file into the concrete type's file so that every named type it mentions
//! still denotes the same type.
//!
//! The walk is a single pre-order pass over a deep copy of the signature.
//! A selector is decided before its parts are ever looked at, so a bare
//! identifier reaching the identifier rule is guaranteed not to be part of
//! a selector — which is exactly what makes the dot-import case
//! detectable. Rewritten nodes are not re-entered.
//!
//! Imports the destination file must gain are collected in a request-local
//! [`AddedImports`] builder, deduplicated by (path, required alias).

use smallvec::SmallVec;
use tracing::debug;

use crate::frontend::{FuncSig, Ident, Span, Symbol, TypeExpr, TypeExprKind};
use crate::sema::{PackageId, Workspace, resolve_ident, resolve_selector};
use crate::stub::scope;

/// A new import for the destination file. An empty alias means "use the
/// package's default name"; a set alias is required literally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddedImport {
    pub path: String,
    pub alias: Option<String>,
}

/// Request-local builder for imports the destination file must acquire.
/// Addition is idempotent by (path, alias).
#[derive(Debug, Default)]
pub struct AddedImports {
    list: SmallVec<[AddedImport; 4]>,
}

impl AddedImports {
    pub fn add(&mut self, alias: Option<String>, path: impl Into<String>) {
        let path = path.into();
        if self.list.iter().any(|i| i.path == path && i.alias == alias) {
            return;
        }
        debug!(%path, ?alias, "queueing import for destination file");
        self.list.push(AddedImport { path, alias });
    }

    pub fn iter(&self) -> impl Iterator<Item = &AddedImport> {
        self.list.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }
}

/// Where a signature comes from and where it is going. All lookups name
/// their environment explicitly; the rewriter holds no other state.
#[derive(Debug, Clone, Copy)]
pub struct RewriteContext<'ws> {
    pub ws: &'ws Workspace,
    /// Package owning the interface whose file the signature is spelled in.
    pub iface_pkg: PackageId,
    /// File (within `iface_pkg`) the signature is spelled in.
    pub iface_file: u32,
    /// Package owning the concrete type.
    pub dest_pkg: PackageId,
    /// File (within `dest_pkg`) the stubs will be spliced into.
    pub dest_file: u32,
}

/// Deep-copy `sig` and rewrite every named type reference for the
/// destination file, queueing any imports that file must gain.
pub fn rewrite_signature(
    ctx: &RewriteContext<'_>,
    sig: &FuncSig,
    imports: &mut AddedImports,
) -> FuncSig {
    let mut sig = sig.clone();
    rewrite_sig_in_place(ctx, &mut sig, imports);
    sig
}

fn rewrite_sig_in_place(ctx: &RewriteContext<'_>, sig: &mut FuncSig, imports: &mut AddedImports) {
    for param in sig.params.iter_mut().chain(sig.results.iter_mut()) {
        rewrite_type(ctx, &mut param.ty, imports);
    }
}

fn rewrite_type(ctx: &RewriteContext<'_>, ty: &mut TypeExpr, imports: &mut AddedImports) {
    match &mut ty.kind {
        TypeExprKind::Pointer(inner)
        | TypeExprKind::Slice(inner)
        | TypeExprKind::Chan(inner)
        | TypeExprKind::Variadic(inner) => {
            rewrite_type(ctx, inner, imports);
            return;
        }
        TypeExprKind::Array { elem, .. } => {
            rewrite_type(ctx, elem, imports);
            return;
        }
        TypeExprKind::Map { key, value } => {
            rewrite_type(ctx, key, imports);
            rewrite_type(ctx, value, imports);
            return;
        }
        TypeExprKind::Func(sig) => {
            rewrite_sig_in_place(ctx, sig, imports);
            return;
        }
        TypeExprKind::Named(_) | TypeExprKind::Qualified { .. } => {}
    }

    let replacement = match &ty.kind {
        TypeExprKind::Qualified { qual, name } => {
            rewrite_selector(ctx, qual.name, name.name, ty.span, imports)
        }
        TypeExprKind::Named(sym) => rewrite_ident(ctx, *sym, ty.span, imports),
        _ => unreachable!("compound kinds handled above"),
    };
    if let Some(kind) = replacement {
        ty.kind = kind;
    }
}

/// The selector rules. `qual.name` is resolved in the interface file's
/// environment:
/// - owner is the destination package → strip the qualifier ("remove");
/// - destination file already imports the owner → respell the qualifier
///   with that file's alias ("rename");
/// - otherwise → keep the spelling and queue an import, preserving a
///   rename the interface file made.
fn rewrite_selector(
    ctx: &RewriteContext<'_>,
    qual: Symbol,
    name: Symbol,
    span: Span,
    imports: &mut AddedImports,
) -> Option<TypeExprKind> {
    let ws = ctx.ws;
    let id = resolve_selector(ws, ctx.iface_pkg, ctx.iface_file, qual, name)?;
    let owner = ws.type_object(id).pkg;
    if owner == ctx.dest_pkg {
        return Some(TypeExprKind::Named(name));
    }

    let owner_path = ws.package(owner).path.clone();
    let dest_ast = &ws.package(ctx.dest_pkg).file(ctx.dest_file).ast;
    if let Some(alias) = scope::lookup_import(ws, dest_ast, &owner_path) {
        if alias == qual {
            return None;
        }
        return Some(TypeExprKind::Qualified {
            qual: Ident::new(alias, span),
            name: Ident::new(name, span),
        });
    }

    let owner_short = ws.package(owner).name;
    let required = if qual != owner_short {
        Some(ws.interner().resolve(qual).to_string())
    } else {
        None
    };
    imports.add(required, owner_path);
    None
}

/// The identifier rule. A bare `name` that resolves to a named type owned
/// by another package was visible in the interface file either as a local
/// declaration or through a dot import; in the destination file it must
/// become qualified, and the destination may need a new import.
fn rewrite_ident(
    ctx: &RewriteContext<'_>,
    name: Symbol,
    span: Span,
    imports: &mut AddedImports,
) -> Option<TypeExprKind> {
    let ws = ctx.ws;
    let id = resolve_ident(ws, ctx.iface_pkg, ctx.iface_file, name)?.named()?;
    let owner = ws.type_object(id).pkg;
    if owner == ctx.dest_pkg {
        return None;
    }

    let owner_path = ws.package(owner).path.clone();
    let dest_ast = &ws.package(ctx.dest_pkg).file(ctx.dest_file).ast;
    let existing = scope::lookup_import(ws, dest_ast, &owner_path);
    if existing.is_none() {
        imports.add(None, owner_path);
    }

    let qual = existing.unwrap_or(ws.package(owner).name);
    Some(TypeExprKind::Qualified {
        qual: Ident::new(qual, span),
        name: Ident::new(name, span),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fmt::signature_to_string;
    use crate::frontend::{Decl, InterfaceMember, TypeDeclKind};
    use indoc::indoc;

    struct Fixture {
        ws: Workspace,
    }

    impl Fixture {
        fn new(packages: &[(&str, &str)]) -> Self {
            let mut ws = Workspace::new();
            for &(path, src) in packages {
                let uri = format!("{}.go", path.rsplit('/').next().unwrap());
                ws.add_package(path, vec![(uri, src.to_string())]).unwrap();
            }
            Self { ws }
        }

        fn method_sig(&self, pkg_path: &str, method: &str) -> FuncSig {
            let pkg = self.ws.package_by_path(pkg_path).unwrap();
            let ast = &self.ws.package(pkg).file(0).ast;
            for decl in &ast.decls {
                let Decl::Type(td) = decl else { continue };
                let TypeDeclKind::Interface(iface) = &td.kind else { continue };
                for member in &iface.members {
                    let InterfaceMember::Method(m) = member else { continue };
                    if self.ws.interner().resolve(m.name.name) == method {
                        return m.sig.clone();
                    }
                }
            }
            panic!("method {method} not found in {pkg_path}");
        }

        fn rewrite(
            &self,
            iface_pkg: &str,
            dest_pkg: &str,
            method: &str,
        ) -> (String, Vec<AddedImport>) {
            let sig = self.method_sig(iface_pkg, method);
            let ctx = RewriteContext {
                ws: &self.ws,
                iface_pkg: self.ws.package_by_path(iface_pkg).unwrap(),
                iface_file: 0,
                dest_pkg: self.ws.package_by_path(dest_pkg).unwrap(),
                dest_file: 0,
            };
            let mut imports = AddedImports::default();
            let rewritten = rewrite_signature(&ctx, &sig, &mut imports);
            (
                signature_to_string(&rewritten, self.ws.interner()),
                imports.iter().cloned().collect(),
            )
        }
    }

    #[test]
    fn local_type_gains_qualifier_and_import() {
        let fx = Fixture::new(&[
            (
                "example.com/p",
                indoc! {r#"
                    package p

                    type Node struct{}

                    type Visitor interface {
                        Visit(n *Node) error
                    }
                "#},
            ),
            ("example.com/q", "package q\n\ntype C struct{}\n"),
        ]);
        let (sig, imports) = fx.rewrite("example.com/p", "example.com/q", "Visit");
        assert_eq!(sig, "(n *p.Node) error");
        assert_eq!(
            imports,
            vec![AddedImport { path: "example.com/p".to_string(), alias: None }]
        );
    }

    #[test]
    fn self_reference_loses_qualifier() {
        let fx = Fixture::new(&[
            ("example.com/q", "package q\n\ntype User struct{}\n\ntype C struct{}\n"),
            (
                "example.com/p",
                indoc! {r#"
                    package p

                    import "example.com/q"

                    type Saver interface {
                        Save(u *q.User) error
                    }
                "#},
            ),
        ]);
        let (sig, imports) = fx.rewrite("example.com/p", "example.com/q", "Save");
        assert_eq!(sig, "(u *User) error");
        assert!(imports.is_empty());
    }

    #[test]
    fn renamed_destination_import_is_reused() {
        let fx = Fixture::new(&[
            ("example.com/models", "package models\n\ntype User struct{}\n"),
            (
                "example.com/p",
                indoc! {r#"
                    package p

                    import "example.com/models"

                    type Saver interface {
                        Save(u *models.User) error
                    }
                "#},
            ),
            (
                "example.com/q",
                indoc! {r#"
                    package q

                    import m "example.com/models"

                    type C struct{}
                "#},
            ),
        ]);
        let (sig, imports) = fx.rewrite("example.com/p", "example.com/q", "Save");
        assert_eq!(sig, "(u *m.User) error");
        assert!(imports.is_empty());
    }

    #[test]
    fn interface_rename_is_preserved_when_adding() {
        let fx = Fixture::new(&[
            ("example.com/models", "package models\n\ntype User struct{}\n"),
            (
                "example.com/p",
                indoc! {r#"
                    package p

                    import mdl "example.com/models"

                    type Saver interface {
                        Save(u *mdl.User) error
                    }
                "#},
            ),
            ("example.com/q", "package q\n\ntype C struct{}\n"),
        ]);
        let (sig, imports) = fx.rewrite("example.com/p", "example.com/q", "Save");
        // The spelling keeps the interface file's alias; the added import
        // requires it.
        assert_eq!(sig, "(u *mdl.User) error");
        assert_eq!(
            imports,
            vec![AddedImport {
                path: "example.com/models".to_string(),
                alias: Some("mdl".to_string()),
            }]
        );
    }

    #[test]
    fn dot_imported_type_becomes_qualified() {
        let fx = Fixture::new(&[
            ("time", "package time\n\ntype Time struct{}\n"),
            (
                "example.com/p",
                indoc! {r#"
                    package p

                    import . "time"

                    type Clock interface {
                        At(t Time) bool
                    }
                "#},
            ),
            ("example.com/q", "package q\n\ntype C struct{}\n"),
        ]);
        let (sig, imports) = fx.rewrite("example.com/p", "example.com/q", "At");
        assert_eq!(sig, "(t time.Time) bool");
        assert_eq!(
            imports,
            vec![AddedImport { path: "time".to_string(), alias: None }]
        );
    }

    #[test]
    fn builtins_and_compounds_pass_through() {
        let fx = Fixture::new(&[
            (
                "example.com/p",
                indoc! {r#"
                    package p

                    type Codec interface {
                        Encode(m map[string][]byte, f func(int) error) (int, error)
                    }
                "#},
            ),
            ("example.com/q", "package q\n\ntype C struct{}\n"),
        ]);
        let (sig, imports) = fx.rewrite("example.com/p", "example.com/q", "Encode");
        assert_eq!(sig, "(m map[string][]byte, f func(int) error) (int, error)");
        assert!(imports.is_empty());
    }

    #[test]
    fn nested_function_types_are_rewritten() {
        let fx = Fixture::new(&[
            (
                "example.com/p",
                indoc! {r#"
                    package p

                    type Node struct{}

                    type Walker interface {
                        Walk(f func(*Node) error) error
                    }
                "#},
            ),
            ("example.com/q", "package q\n\ntype C struct{}\n"),
        ]);
        let (sig, imports) = fx.rewrite("example.com/p", "example.com/q", "Walk");
        assert_eq!(sig, "(f func(*p.Node) error) error");
        assert_eq!(imports.len(), 1);
    }

    #[test]
    fn added_imports_dedupe() {
        let mut imports = AddedImports::default();
        imports.add(None, "example.com/p");
        imports.add(None, "example.com/p");
        imports.add(Some("m".to_string()), "example.com/p");
        imports.add(Some("m".to_string()), "example.com/p");
        assert_eq!(imports.len(), 2);
    }
}
