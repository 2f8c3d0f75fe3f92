// src/sema/errors.rs
//! Workspace loading errors (E2xxx).

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum LoadError {
    #[error("failed to parse {file}: {message}")]
    #[diagnostic(code(E2001))]
    Parse { file: String, message: String },

    #[error("duplicate type '{name}' in package {pkg}")]
    #[diagnostic(code(E2002))]
    DuplicateType { pkg: String, name: String },

    #[error("duplicate method '{name}' on type '{ty}' in package {pkg}")]
    #[diagnostic(code(E2003))]
    DuplicateMethod { pkg: String, ty: String, name: String },

    #[error("package {pkg}: file {file} declares package '{found}', expected '{expected}'")]
    #[diagnostic(code(E2004))]
    PackageNameMismatch {
        pkg: String,
        file: String,
        found: String,
        expected: String,
    },

    #[error("duplicate package path {path}")]
    #[diagnostic(code(E2005))]
    DuplicatePackage { path: String },
}
