// src/frontend/ast.rs

use crate::frontend::Span;

/// Unique identifier for symbols (interned strings)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Symbol(u32);

impl Symbol {
    /// Create a Symbol from a raw index. Only the interner should use this.
    pub(crate) fn new(index: u32) -> Self {
        Self(index)
    }

    /// Return the underlying index.
    pub fn index(self) -> u32 {
        self.0
    }
}

/// An identifier occurrence with its location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ident {
    pub name: Symbol,
    pub span: Span,
}

impl Ident {
    pub fn new(name: Symbol, span: Span) -> Self {
        Self { name, span }
    }
}

/// One parsed source file: package clause, import table, declarations.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub package: Ident,
    pub imports: Vec<ImportSpec>,
    pub decls: Vec<Decl>,
    pub span: Span,
}

/// A single import. `alias` is absent for plain imports; blank (`_`) and dot
/// (`.`) aliases are recorded but never bind a usable qualifier.
#[derive(Debug, Clone)]
pub struct ImportSpec {
    pub alias: Option<Ident>,
    pub path: String,
    pub span: Span,
}

/// Top-level declarations
#[derive(Debug, Clone)]
pub enum Decl {
    Type(TypeDecl),
    Func(FuncDecl),
    Var(VarDecl),
}

impl Decl {
    pub fn span(&self) -> Span {
        match self {
            Decl::Type(d) => d.span,
            Decl::Func(d) => d.span,
            Decl::Var(d) => d.span,
        }
    }
}

/// `type Name struct{...}` or `type Name interface{...}`
#[derive(Debug, Clone)]
pub struct TypeDecl {
    pub doc: Vec<String>,
    pub name: Ident,
    pub kind: TypeDeclKind,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum TypeDeclKind {
    Struct(StructDecl),
    Interface(InterfaceDecl),
}

#[derive(Debug, Clone)]
pub struct StructDecl {
    pub fields: Vec<FieldDef>,
}

/// `a, b Type` inside a struct body.
#[derive(Debug, Clone)]
pub struct FieldDef {
    pub names: Vec<Ident>,
    pub ty: TypeExpr,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct InterfaceDecl {
    pub members: Vec<InterfaceMember>,
}

#[derive(Debug, Clone)]
pub enum InterfaceMember {
    /// An explicit method: `Do(x int) error`
    Method(MethodSpec),
    /// An embedded interface reference: `Closer` or `io.Reader`
    Embedded(TypeExpr),
}

#[derive(Debug, Clone)]
pub struct MethodSpec {
    pub name: Ident,
    pub sig: FuncSig,
    pub span: Span,
}

/// Parameter and result lists of a function type. Results keep their
/// parenthesization implicitly: zero, one unnamed, or a full group.
#[derive(Debug, Clone)]
pub struct FuncSig {
    pub params: Vec<Param>,
    pub results: Vec<Param>,
    pub span: Span,
}

impl FuncSig {
    /// Number of results after flattening name groups.
    pub fn result_count(&self) -> usize {
        self.results.iter().map(|p| p.names.len().max(1)).sum()
    }

    /// The type at flattened result position `idx`.
    pub fn result_at(&self, idx: usize) -> Option<&TypeExpr> {
        let mut i = 0;
        for p in &self.results {
            let width = p.names.len().max(1);
            if idx < i + width {
                return Some(&p.ty);
            }
            i += width;
        }
        None
    }
}

/// One parameter group: zero or more names sharing a type.
#[derive(Debug, Clone)]
pub struct Param {
    pub names: Vec<Ident>,
    pub ty: TypeExpr,
    pub span: Span,
}

/// `func (recv) Name(sig) { body }`; receiver absent for plain functions.
#[derive(Debug, Clone)]
pub struct FuncDecl {
    pub doc: Vec<String>,
    pub receiver: Option<Receiver>,
    pub name: Ident,
    pub sig: FuncSig,
    pub body: Option<Block>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct Receiver {
    pub name: Option<Ident>,
    pub pointer: bool,
    pub ty_name: Ident,
    pub span: Span,
}

/// `var names Type? = values?` — groups are flattened by the parser into one
/// `VarDecl` per spec line.
#[derive(Debug, Clone)]
pub struct VarDecl {
    pub doc: Vec<String>,
    pub names: Vec<Ident>,
    pub ty: Option<TypeExpr>,
    pub values: Vec<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct Block {
    pub stmts: Vec<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum Stmt {
    Return(ReturnStmt),
    Var(VarDecl),
    Expr(Expr),
}

impl Stmt {
    pub fn span(&self) -> Span {
        match self {
            Stmt::Return(s) => s.span,
            Stmt::Var(s) => s.span,
            Stmt::Expr(e) => e.span,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReturnStmt {
    pub results: Vec<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }
}

#[derive(Debug, Clone)]
pub enum ExprKind {
    Ident(Symbol),
    /// `expr.Sel`
    Selector {
        expr: Box<Expr>,
        sel: Ident,
    },
    /// `callee(args)`
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },
    /// `T{...}`, `[]T{...}`, `map[K]V{...}`
    Composite {
        ty: TypeExpr,
        elems: Vec<CompositeElem>,
    },
    /// `&expr`
    AddrOf(Box<Expr>),
    /// `*expr` (also covers pointer-type constructors like `(*C)(nil)`)
    Star(Box<Expr>),
    Paren(Box<Expr>),
    StringLit(String),
    IntLit(i64),
    Nil,
}

/// One element of a composite literal, with an optional `key:` prefix.
#[derive(Debug, Clone)]
pub struct CompositeElem {
    pub key: Option<Expr>,
    pub value: Expr,
}

#[derive(Debug, Clone)]
pub struct TypeExpr {
    pub kind: TypeExprKind,
    pub span: Span,
}

impl TypeExpr {
    pub fn new(kind: TypeExprKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// The head identifier of a named or qualified type, if any.
    pub fn head_name(&self) -> Option<Symbol> {
        match &self.kind {
            TypeExprKind::Named(sym) => Some(*sym),
            TypeExprKind::Qualified { name, .. } => Some(name.name),
            _ => None,
        }
    }
}

/// The kind of a type expression
#[derive(Debug, Clone)]
pub enum TypeExprKind {
    /// A bare type name: `Node`, `int`
    Named(Symbol),
    /// A package-qualified name: `io.Reader`
    Qualified { qual: Ident, name: Ident },
    Pointer(Box<TypeExpr>),
    Slice(Box<TypeExpr>),
    Array { len: u64, elem: Box<TypeExpr> },
    Map { key: Box<TypeExpr>, value: Box<TypeExpr> },
    Chan(Box<TypeExpr>),
    Func(Box<FuncSig>),
    /// `...T` in a final parameter
    Variadic(Box<TypeExpr>),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(index: u32) -> TypeExpr {
        TypeExpr::new(TypeExprKind::Named(Symbol::new(index)), Span::default())
    }

    #[test]
    fn result_flattening() {
        // (n int, err error) counts two results; (int, error) also two.
        let sig = FuncSig {
            params: vec![],
            results: vec![
                Param {
                    names: vec![
                        Ident::new(Symbol::new(1), Span::default()),
                        Ident::new(Symbol::new(2), Span::default()),
                    ],
                    ty: named(3),
                    span: Span::default(),
                },
                Param {
                    names: vec![],
                    ty: named(4),
                    span: Span::default(),
                },
            ],
            span: Span::default(),
        };
        assert_eq!(sig.result_count(), 3);
        assert!(matches!(
            sig.result_at(1).unwrap().kind,
            TypeExprKind::Named(s) if s.index() == 3
        ));
        assert!(matches!(
            sig.result_at(2).unwrap().kind,
            TypeExprKind::Named(s) if s.index() == 4
        ));
        assert!(sig.result_at(3).is_none());
    }

    #[test]
    fn head_name() {
        assert!(named(7).head_name().is_some());
        let ptr = TypeExpr::new(TypeExprKind::Pointer(Box::new(named(7))), Span::default());
        assert!(ptr.head_name().is_none());
    }
}
