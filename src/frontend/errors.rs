// src/frontend/errors.rs
//! Lexer (E0xxx) and parser (E1xxx) errors.

use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

use crate::frontend::Span;

impl From<Span> for SourceSpan {
    fn from(span: Span) -> Self {
        (span.start, span.end.saturating_sub(span.start)).into()
    }
}

#[derive(Error, Debug, Diagnostic, Clone)]
pub enum LexerError {
    #[error("unexpected character '{ch}'")]
    #[diagnostic(code(E0001))]
    UnexpectedCharacter {
        ch: char,
        #[label("not valid here")]
        span: SourceSpan,
    },

    #[error("unterminated string literal")]
    #[diagnostic(code(E0002))]
    UnterminatedString {
        #[label("string starts here")]
        span: SourceSpan,
    },

    #[error("unterminated block comment")]
    #[diagnostic(code(E0003))]
    UnterminatedComment {
        #[label("comment starts here")]
        span: SourceSpan,
    },
}

#[derive(Error, Debug, Diagnostic, Clone)]
pub enum ParserError {
    #[error("expected '{expected}', found '{found}'")]
    #[diagnostic(code(E1001))]
    ExpectedToken {
        expected: String,
        found: String,
        #[label("unexpected token")]
        span: SourceSpan,
    },

    #[error("expected identifier, found '{found}'")]
    #[diagnostic(code(E1002))]
    ExpectedIdentifier {
        found: String,
        #[label("expected identifier")]
        span: SourceSpan,
    },

    #[error("expected type, found '{found}'")]
    #[diagnostic(code(E1003))]
    ExpectedType {
        found: String,
        #[label("expected type")]
        span: SourceSpan,
    },

    #[error("expected declaration, found '{found}'")]
    #[diagnostic(code(E1004))]
    ExpectedDeclaration {
        found: String,
        #[label("declarations start with 'type', 'func', 'var' or 'import'")]
        span: SourceSpan,
    },

    #[error("expected expression, found '{found}'")]
    #[diagnostic(code(E1005))]
    ExpectedExpression {
        found: String,
        #[label("expected expression")]
        span: SourceSpan,
    },

    #[error("expected import path string")]
    #[diagnostic(code(E1006))]
    ExpectedImportPath {
        #[label("import paths are quoted strings")]
        span: SourceSpan,
    },
}

/// A parse error paired with the span the parser was looking at.
#[derive(Debug)]
pub struct ParseError {
    pub error: ParserError,
    pub span: Span,
}

impl ParseError {
    pub fn new(error: ParserError, span: Span) -> Self {
        Self { error, span }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}: {}", self.span.line, self.span.column, self.error)
    }
}

impl std::error::Error for ParseError {}
