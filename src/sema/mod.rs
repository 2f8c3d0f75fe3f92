// src/sema/mod.rs
//! Package model and resolution: the read-only type graph stub synthesis
//! queries.

pub mod canon;
pub mod errors;
pub mod object;
pub mod resolve;
pub mod workspace;

pub use canon::{CanonSig, CanonType, canon_sig, canon_type, render_sig, render_type};
pub use errors::LoadError;
pub use object::{
    FileId, MethodInfo, MethodRef, MethodSets, PackageId, TypeForm, TypeId, TypeObject,
};
pub use resolve::{
    TypeRef, effective_alias, is_blank_import, is_dot_import, lookup_import, resolve_ident,
    resolve_selector, resolve_type_expr, usable_imports,
};
pub use workspace::{FileEntry, Package, Workspace};
