// src/frontend/mod.rs
//! Front end: lexer, parser, AST, and positional lookup.

pub mod ast;
pub mod errors;
pub mod intern;
pub mod lexer;
pub mod parser;
pub mod path;
pub mod token;

pub use ast::{
    Block, CompositeElem, Decl, Expr, ExprKind, FieldDef, FuncDecl, FuncSig, Ident, ImportSpec,
    InterfaceDecl, InterfaceMember, MethodSpec, Param, Receiver, ReturnStmt, SourceFile, Stmt,
    StructDecl, Symbol, TypeDecl, TypeDeclKind, TypeExpr, TypeExprKind, VarDecl,
};
pub use errors::{LexerError, ParseError, ParserError};
pub use intern::Interner;
pub use lexer::Lexer;
pub use parser::Parser;
pub use path::{Node, enclosing_path, walk_expr};
pub use token::{Comment, Span, Token, TokenType};
