// src/stub/scope.rs
//! Scope inspection helpers shared by the synthesis passes: enclosing
//! function recovery, import lookups, and package-path visibility.
//!
//! Import iteration and lookup (skipping blank and dot imports) live in
//! [`crate::sema::resolve`]; they are re-exported here so the synthesis
//! passes have one place to reach for scope questions.

use crate::frontend::{FuncDecl, Node};

pub use crate::sema::resolve::{
    effective_alias, is_blank_import, is_dot_import, lookup_import, usable_imports,
};

/// The nearest function declaration on an enclosing-path chain, if any.
pub fn enclosing_function<'a>(path: &[Node<'a>]) -> Option<&'a FuncDecl> {
    path.iter().rev().find_map(|node| match node {
        Node::Func(fd) => Some(*fd),
        _ => None,
    })
}

/// Whether `import_path` may be imported from a package at `pkg_path`.
/// A path segment `internal` restricts importers to the subtree rooted at
/// the internal directory's parent.
pub fn is_valid_import(pkg_path: &str, import_path: &str) -> bool {
    let Some(i) = import_path.rfind("/internal/").or_else(|| {
        import_path
            .strip_suffix("/internal")
            .map(|prefix| prefix.len())
    }) else {
        return true;
    };
    pkg_path.starts_with(&import_path[..i])
}
