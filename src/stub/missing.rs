// src/stub/missing.rs
//! Compute the interface methods a concrete type does not yet provide.
//!
//! Embedded interfaces are traversed depth-first, so an embedded
//! interface's entry precedes the embedding one. A name-visited set is
//! threaded through the recursion: a method two embedded interfaces both
//! require is emitted exactly once.

use rustc_hash::FxHashSet;
use tracing::debug;

use crate::frontend::{InterfaceMember, Symbol, TypeDeclKind};
use crate::sema::{
    FileId, MethodRef, MethodSets, PackageId, TypeId, Workspace, canon_sig, render_sig,
    resolve_type_expr,
};
use crate::stub::errors::StubError;

/// The destination type of a stub request, with its method sets.
#[derive(Debug, Clone, Copy)]
pub struct ConcreteType {
    pub obj: TypeId,
    pub pkg: PackageId,
    /// File defining the concrete type; stubs are spliced into it.
    pub file: FileId,
}

impl ConcreteType {
    pub fn new(ws: &Workspace, obj: TypeId) -> Self {
        let object = ws.type_object(obj);
        Self {
            obj,
            pkg: object.pkg,
            file: object.file,
        }
    }

    fn method_sets<'ws>(&self, ws: &'ws Workspace) -> MethodSets<'ws> {
        ws.package(self.pkg).method_sets(ws.type_object(self.obj).name)
    }
}

/// One interface with methods missing from the destination type: the
/// interface itself, its defining file (whose import environment the
/// signatures are written in), and the missing methods in declaration
/// order.
#[derive(Debug)]
pub struct MissingInterface<'ws> {
    pub iface: TypeId,
    pub pkg: PackageId,
    pub file: FileId,
    pub missing: Vec<MethodRef<'ws>>,
}

/// Walk `iface` (and, first, everything it embeds) and collect the methods
/// `ct` still lacks. A same-named method with a different signature aborts
/// with a mismatch error.
pub fn missing_methods<'ws>(
    ws: &'ws Workspace,
    ct: &ConcreteType,
    iface: TypeId,
    iface_pkg: PackageId,
    visited: &mut FxHashSet<Symbol>,
) -> Result<Vec<MissingInterface<'ws>>, StubError> {
    let obj = ws.type_object(iface);
    let decl = ws.type_decl(iface);
    let TypeDeclKind::Interface(body) = &decl.kind else {
        return Err(StubError::NotAnInterface {
            name: ws.interner().resolve(obj.name).to_string(),
            found: "struct".to_string(),
        });
    };

    let mut missing = Vec::new();

    // Embedded interfaces first, resolved in this interface's own file
    // environment; their owning package may differ from `iface_pkg`.
    for member in &body.members {
        let InterfaceMember::Embedded(ty) = member else {
            continue;
        };
        let embedded = resolve_type_expr(ws, obj.pkg, obj.file.index, ty)
            .and_then(|r| r.named())
            .ok_or_else(|| StubError::UnresolvedEmbedded {
                name: ty
                    .head_name()
                    .map(|s| ws.interner().resolve(s).to_string())
                    .unwrap_or_default(),
            })?;
        let embedded_pkg = ws.type_object(embedded).pkg;
        missing.extend(missing_methods(ws, ct, embedded, embedded_pkg, visited)?);
    }

    let sets = ct.method_sets(ws);
    let mut own = MissingInterface {
        iface,
        pkg: iface_pkg,
        file: obj.file,
        missing: Vec::new(),
    };

    for member in &body.members {
        let InterfaceMember::Method(spec) = member else {
            continue;
        };
        let name = spec.name.name;
        if sets.does_not_have(name) && !visited.contains(&name) {
            own.missing.push(MethodRef {
                name,
                sig: &spec.sig,
                span: spec.span,
            });
            visited.insert(name);
        }
        if let Some(existing) = sets.selection(name) {
            let have = canon_sig(ws, ct.pkg, existing.file.index, ws.method_sig(existing));
            let want = canon_sig(ws, obj.pkg, obj.file.index, &spec.sig);
            if have != want {
                return Err(StubError::SignatureMismatch {
                    name: ws.interner().resolve(name).to_string(),
                    have: render_sig(ws, &have),
                    want: render_sig(ws, &want),
                });
            }
        }
    }

    if !own.missing.is_empty() {
        debug!(
            iface = ws.interner().resolve(obj.name),
            count = own.missing.len(),
            "missing methods"
        );
        missing.push(own);
    }
    Ok(missing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    fn workspace(src: &str) -> Workspace {
        let mut ws = Workspace::new();
        ws.add_package("example.com/p", vec![("p.go".to_string(), src.to_string())])
            .unwrap();
        ws
    }

    fn compute(ws: &Workspace, iface: &str, concrete: &str) -> Result<Vec<String>, StubError> {
        let p = ws.package_by_path("example.com/p").unwrap();
        let pkg = ws.package(p);
        let iface_id = pkg.lookup(ws.interner().lookup(iface).unwrap()).unwrap();
        let concrete_id = pkg.lookup(ws.interner().lookup(concrete).unwrap()).unwrap();
        let ct = ConcreteType::new(ws, concrete_id);
        let mut visited = FxHashSet::default();
        let missing = missing_methods(ws, &ct, iface_id, p, &mut visited)?;
        Ok(missing
            .iter()
            .flat_map(|mi| mi.missing.iter())
            .map(|m| ws.interner().resolve(m.name).to_string())
            .collect())
    }

    #[test]
    fn reports_missing_methods_in_order() {
        let ws = workspace(indoc! {r#"
            package p

            type I interface {
                A()
                B(x int) error
                C()
            }

            type T struct{}

            func (T) B(x int) error {
                return nil
            }
        "#});
        assert_eq!(compute(&ws, "I", "T").unwrap(), vec!["A", "C"]);
    }

    #[test]
    fn pointer_receiver_methods_count() {
        let ws = workspace(indoc! {r#"
            package p

            type I interface {
                A()
            }

            type T struct{}

            func (t *T) A() {}
        "#});
        assert!(compute(&ws, "I", "T").unwrap().is_empty());
    }

    #[test]
    fn diamond_embedding_dedupes() {
        let ws = workspace(indoc! {r#"
            package p

            type A interface {
                F()
            }

            type B interface {
                A
                F()
            }

            type I interface {
                A
                B
            }

            type T struct{}
        "#});
        assert_eq!(compute(&ws, "I", "T").unwrap(), vec!["F"]);
    }

    #[test]
    fn mismatch_is_an_error() {
        let ws = workspace(indoc! {r#"
            package p

            type I interface {
                Do(int)
            }

            type C struct{}

            func (C) Do(s string) {}
        "#});
        let err = compute(&ws, "I", "C").unwrap_err();
        let StubError::SignatureMismatch { name, have, want } = err else {
            panic!("expected mismatch, got {err}");
        };
        assert_eq!(name, "Do");
        assert_eq!(have, "func(string)");
        assert_eq!(want, "func(int)");
    }

    #[test]
    fn concrete_type_is_not_an_interface() {
        let ws = workspace(indoc! {r#"
            package p

            type C struct{}

            type T struct{}
        "#});
        let err = compute(&ws, "C", "T").unwrap_err();
        assert!(matches!(err, StubError::NotAnInterface { .. }));
    }
}
