// src/stub/errors.rs
//! Stub synthesis errors (E3xxx).
//!
//! "No action" outcomes are not errors; they are `None`/empty results.
//! Everything here is a real failure the caller may want to report.

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum StubError {
    #[error("expected '{name}' to be an interface, found a {found} type")]
    #[diagnostic(code(E3001))]
    NotAnInterface { name: String, found: String },

    #[error("mismatched '{name}' method signatures: have {have}, want {want}")]
    #[diagnostic(code(E3002))]
    SignatureMismatch {
        name: String,
        have: String,
        want: String,
    },

    #[error("could not reparse patched file {file}: {message}")]
    #[diagnostic(code(E3003))]
    Reparse { file: String, message: String },

    #[error("offset {offset} not within return statement bounds: [{start}-{end}]")]
    #[diagnostic(code(E3004))]
    ReturnIndexOutOfRange {
        offset: usize,
        start: usize,
        end: usize,
    },

    #[error("could not find a function enclosing the return statement")]
    #[diagnostic(code(E3005))]
    NoEnclosingFunction,

    #[error("could not resolve embedded interface '{name}'")]
    #[diagnostic(code(E3006))]
    UnresolvedEmbedded { name: String },
}
