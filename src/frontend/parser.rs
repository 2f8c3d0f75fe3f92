// src/frontend/parser.rs
//! Recursive-descent parser for the package-scoped source language.
//!
//! Produces the `SourceFile` tree consumed by resolution and by the stub
//! synthesizer. Newlines are significant declaration/statement terminators;
//! doc comments directly above a declaration are attached to it so that
//! reprinting a file keeps them.

use crate::frontend::ast::*;
use crate::frontend::errors::{ParseError, ParserError};
use crate::frontend::intern::Interner;
use crate::frontend::lexer::Lexer;
use crate::frontend::token::{Comment, Span, Token, TokenType};

pub struct Parser<'src> {
    lexer: Lexer<'src>,
    current: Token,
    previous: Token,
    interner: Interner,
    pending_comments: Vec<Comment>,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str) -> Self {
        Self::with_interner(source, Interner::new())
    }

    /// Create a parser that interns into an existing table, so symbols
    /// compare equal across files.
    pub fn with_interner(source: &'src str, interner: Interner) -> Self {
        let mut lexer = Lexer::new(source);
        let current = lexer.next_token();
        Self {
            lexer,
            current,
            previous: Token::new(TokenType::Eof, "", Span::default()),
            interner,
            pending_comments: Vec::new(),
        }
    }

    pub fn into_interner(self) -> Interner {
        self.interner
    }

    pub fn interner(&self) -> &Interner {
        &self.interner
    }

    /// Parse a whole source file: package clause, imports, declarations.
    pub fn parse_file(&mut self) -> Result<SourceFile, ParseError> {
        self.skip_newlines();
        let start = self.current.span;
        self.consume(TokenType::KwPackage)?;
        let package = self.ident()?;
        self.skip_newlines();

        let mut imports = Vec::new();
        while self.check(TokenType::KwImport) {
            self.advance();
            self.import_group(&mut imports)?;
            self.skip_newlines();
        }

        let mut decls = Vec::new();
        while !self.check(TokenType::Eof) {
            self.declaration(&mut decls)?;
            self.skip_newlines();
        }

        Ok(SourceFile {
            package,
            imports,
            decls,
            span: start.merge(self.previous.span),
        })
    }

    fn import_group(&mut self, imports: &mut Vec<ImportSpec>) -> Result<(), ParseError> {
        if self.match_token(TokenType::LParen) {
            self.skip_newlines();
            while !self.check(TokenType::RParen) {
                imports.push(self.import_spec()?);
                self.skip_newlines();
            }
            self.consume(TokenType::RParen)?;
        } else {
            imports.push(self.import_spec()?);
        }
        Ok(())
    }

    fn import_spec(&mut self) -> Result<ImportSpec, ParseError> {
        let start = self.current.span;
        let alias = match self.current.ty {
            TokenType::Identifier => {
                let id = self.ident()?;
                Some(id)
            }
            TokenType::Dot => {
                let span = self.current.span;
                self.advance();
                Some(Ident::new(self.interner.intern("."), span))
            }
            _ => None,
        };
        if !self.check(TokenType::StringLiteral) {
            return Err(ParseError::new(
                ParserError::ExpectedImportPath { span: self.current.span.into() },
                self.current.span,
            ));
        }
        let path = unquote(&self.current.lexeme);
        let span = start.merge(self.current.span);
        self.advance();
        Ok(ImportSpec { alias, path, span })
    }

    fn declaration(&mut self, decls: &mut Vec<Decl>) -> Result<(), ParseError> {
        let doc = self.take_doc();
        match self.current.ty {
            TokenType::KwType => {
                decls.push(Decl::Type(self.type_decl(doc)?));
                Ok(())
            }
            TokenType::KwFunc => {
                decls.push(Decl::Func(self.func_decl(doc)?));
                Ok(())
            }
            TokenType::KwVar => {
                self.var_decl_group(doc, decls)
            }
            _ => Err(ParseError::new(
                ParserError::ExpectedDeclaration {
                    found: self.current.ty.as_str().to_string(),
                    span: self.current.span.into(),
                },
                self.current.span,
            )),
        }
    }

    /// Pull captured comments and keep the contiguous run that ends on the
    /// line directly above the current token. Anything older is dropped.
    fn take_doc(&mut self) -> Vec<String> {
        self.pending_comments.extend(self.lexer.take_comments());
        let decl_line = self.current.span.line;
        let mut run_start = self.pending_comments.len();
        let mut expect = decl_line;
        for (i, c) in self.pending_comments.iter().enumerate().rev() {
            if c.line + 1 == expect {
                run_start = i;
                expect = c.line;
            } else {
                break;
            }
        }
        let doc = self.pending_comments.split_off(run_start);
        self.pending_comments.clear();
        doc.into_iter().map(|c| c.text).collect()
    }

    fn type_decl(&mut self, doc: Vec<String>) -> Result<TypeDecl, ParseError> {
        let start = self.current.span;
        self.advance(); // consume 'type'
        let name = self.ident()?;
        let kind = match self.current.ty {
            TokenType::KwStruct => TypeDeclKind::Struct(self.struct_body()?),
            TokenType::KwInterface => TypeDeclKind::Interface(self.interface_body()?),
            _ => {
                return Err(ParseError::new(
                    ParserError::ExpectedType {
                        found: self.current.ty.as_str().to_string(),
                        span: self.current.span.into(),
                    },
                    self.current.span,
                ));
            }
        };
        Ok(TypeDecl {
            doc,
            name,
            kind,
            span: start.merge(self.previous.span),
        })
    }

    fn struct_body(&mut self) -> Result<StructDecl, ParseError> {
        self.advance(); // consume 'struct'
        self.consume(TokenType::LBrace)?;
        let mut fields = Vec::new();
        self.skip_newlines();
        while !self.check(TokenType::RBrace) {
            let start = self.current.span;
            let mut names = vec![self.ident()?];
            while self.match_token(TokenType::Comma) {
                names.push(self.ident()?);
            }
            let ty = self.type_expr()?;
            fields.push(FieldDef {
                names,
                ty,
                span: start.merge(self.previous.span),
            });
            self.skip_newlines();
        }
        self.consume(TokenType::RBrace)?;
        Ok(StructDecl { fields })
    }

    fn interface_body(&mut self) -> Result<InterfaceDecl, ParseError> {
        self.advance(); // consume 'interface'
        self.consume(TokenType::LBrace)?;
        let mut members = Vec::new();
        self.skip_newlines();
        while !self.check(TokenType::RBrace) {
            let start = self.current.span;
            let name = self.ident()?;
            match self.current.ty {
                TokenType::LParen => {
                    let sig = self.signature()?;
                    members.push(InterfaceMember::Method(MethodSpec {
                        name,
                        sig,
                        span: start.merge(self.previous.span),
                    }));
                }
                TokenType::Dot => {
                    self.advance();
                    let sel = self.ident()?;
                    members.push(InterfaceMember::Embedded(TypeExpr::new(
                        TypeExprKind::Qualified { qual: name, name: sel },
                        start.merge(self.previous.span),
                    )));
                }
                _ => {
                    members.push(InterfaceMember::Embedded(TypeExpr::new(
                        TypeExprKind::Named(name.name),
                        name.span,
                    )));
                }
            }
            self.skip_newlines();
        }
        self.consume(TokenType::RBrace)?;
        Ok(InterfaceDecl { members })
    }

    fn func_decl(&mut self, doc: Vec<String>) -> Result<FuncDecl, ParseError> {
        let start = self.current.span;
        self.advance(); // consume 'func'

        // `func (` always opens a receiver; plain functions start with their
        // name.
        let receiver = if self.check(TokenType::LParen) {
            Some(self.receiver()?)
        } else {
            None
        };

        let name = self.ident()?;
        let sig = self.signature()?;
        let body = if self.check(TokenType::LBrace) {
            Some(self.block()?)
        } else {
            None
        };
        Ok(FuncDecl {
            doc,
            receiver,
            name,
            sig,
            body,
            span: start.merge(self.previous.span),
        })
    }

    fn receiver(&mut self) -> Result<Receiver, ParseError> {
        let start = self.current.span;
        self.consume(TokenType::LParen)?;
        let mut name = None;
        let mut pointer = false;
        if self.match_token(TokenType::Star) {
            pointer = true;
        }
        let mut ty_name = self.ident()?;
        if !pointer {
            match self.current.ty {
                TokenType::Star => {
                    // (x *T)
                    self.advance();
                    name = Some(ty_name);
                    pointer = true;
                    ty_name = self.ident()?;
                }
                TokenType::Identifier => {
                    // (x T)
                    name = Some(ty_name);
                    ty_name = self.ident()?;
                }
                _ => {}
            }
        }
        self.consume(TokenType::RParen)?;
        Ok(Receiver {
            name,
            pointer,
            ty_name,
            span: start.merge(self.previous.span),
        })
    }

    /// Parse `(params)` and optional results.
    pub fn signature(&mut self) -> Result<FuncSig, ParseError> {
        let start = self.current.span;
        self.consume(TokenType::LParen)?;
        let params = self.param_list(TokenType::RParen)?;
        self.consume(TokenType::RParen)?;

        let results = if self.check(TokenType::LParen) {
            self.advance();
            let list = self.param_list(TokenType::RParen)?;
            self.consume(TokenType::RParen)?;
            list
        } else if self.current.ty.starts_type() && self.current.ty != TokenType::Ellipsis {
            let ty = self.type_expr()?;
            let span = ty.span;
            vec![Param { names: vec![], ty, span }]
        } else {
            vec![]
        };

        Ok(FuncSig {
            params,
            results,
            span: start.merge(self.previous.span),
        })
    }

    /// Parse a comma-separated parameter list up to (not including) `end`.
    ///
    /// Grammar ambiguity: in `(a, b int)` the leading items are names, in
    /// `(int, error)` they are types. Items are parsed individually and bare
    /// identifiers are folded into the next named group, the way the
    /// language defines it.
    fn param_list(&mut self, end: TokenType) -> Result<Vec<Param>, ParseError> {
        #[derive(Debug)]
        enum Item {
            Bare(TypeExpr),
            Named(Ident, TypeExpr, Span),
        }

        let mut items = Vec::new();
        if !self.check(end) {
            loop {
                let start = self.current.span;
                if self.check(TokenType::Identifier) && {
                    let after = self.peek_after_ident();
                    after.starts_type()
                } {
                    let name = self.ident()?;
                    let ty = self.type_expr()?;
                    items.push(Item::Named(name, ty, start.merge(self.previous.span)));
                } else {
                    let ty = self.type_expr()?;
                    items.push(Item::Bare(ty));
                }
                if !self.match_token(TokenType::Comma) {
                    break;
                }
            }
        }

        // If any item carries a name, bare identifier items before it are
        // additional names of that group.
        let any_named = items.iter().any(|i| matches!(i, Item::Named(..)));
        let mut params = Vec::new();
        let mut carried: Vec<Ident> = Vec::new();
        for item in items {
            match item {
                Item::Named(name, ty, span) => {
                    let mut names = std::mem::take(&mut carried);
                    names.push(name);
                    let span = names.first().map(|n| n.span).unwrap_or(span).merge(span);
                    params.push(Param { names, ty, span });
                }
                Item::Bare(ty) => {
                    if any_named {
                        match bare_to_ident(&ty) {
                            Some(id) => carried.push(id),
                            None => {
                                let span = ty.span;
                                params.push(Param { names: vec![], ty, span });
                            }
                        }
                    } else {
                        let span = ty.span;
                        params.push(Param { names: vec![], ty, span });
                    }
                }
            }
        }
        // Trailing bare identifiers with no named group to join: they were
        // types all along.
        for id in carried {
            params.push(Param {
                names: vec![],
                ty: TypeExpr::new(TypeExprKind::Named(id.name), id.span),
                span: id.span,
            });
        }
        Ok(params)
    }

    /// Token type that follows the current identifier token, without
    /// consuming anything.
    fn peek_after_ident(&mut self) -> TokenType {
        let mut lexer = self.lexer.clone();
        lexer.next_token().ty
    }

    pub fn type_expr(&mut self) -> Result<TypeExpr, ParseError> {
        let start = self.current.span;
        match self.current.ty {
            TokenType::Star => {
                self.advance();
                let inner = self.type_expr()?;
                let span = start.merge(inner.span);
                Ok(TypeExpr::new(TypeExprKind::Pointer(Box::new(inner)), span))
            }
            TokenType::Ellipsis => {
                self.advance();
                let inner = self.type_expr()?;
                let span = start.merge(inner.span);
                Ok(TypeExpr::new(TypeExprKind::Variadic(Box::new(inner)), span))
            }
            TokenType::LBracket => {
                self.advance();
                if self.check(TokenType::IntLiteral) {
                    let len = self.current.lexeme.parse::<u64>().unwrap_or(0);
                    self.advance();
                    self.consume(TokenType::RBracket)?;
                    let elem = self.type_expr()?;
                    let span = start.merge(elem.span);
                    Ok(TypeExpr::new(
                        TypeExprKind::Array { len, elem: Box::new(elem) },
                        span,
                    ))
                } else {
                    self.consume(TokenType::RBracket)?;
                    let elem = self.type_expr()?;
                    let span = start.merge(elem.span);
                    Ok(TypeExpr::new(TypeExprKind::Slice(Box::new(elem)), span))
                }
            }
            TokenType::KwMap => {
                self.advance();
                self.consume(TokenType::LBracket)?;
                let key = self.type_expr()?;
                self.consume(TokenType::RBracket)?;
                let value = self.type_expr()?;
                let span = start.merge(value.span);
                Ok(TypeExpr::new(
                    TypeExprKind::Map { key: Box::new(key), value: Box::new(value) },
                    span,
                ))
            }
            TokenType::KwChan => {
                self.advance();
                let elem = self.type_expr()?;
                let span = start.merge(elem.span);
                Ok(TypeExpr::new(TypeExprKind::Chan(Box::new(elem)), span))
            }
            TokenType::KwFunc => {
                self.advance();
                let sig = self.signature()?;
                let span = start.merge(sig.span);
                Ok(TypeExpr::new(TypeExprKind::Func(Box::new(sig)), span))
            }
            TokenType::Identifier => {
                let head = self.ident()?;
                if self.check(TokenType::Dot) {
                    self.advance();
                    let name = self.ident()?;
                    let span = start.merge(name.span);
                    Ok(TypeExpr::new(TypeExprKind::Qualified { qual: head, name }, span))
                } else {
                    Ok(TypeExpr::new(TypeExprKind::Named(head.name), head.span))
                }
            }
            _ => Err(ParseError::new(
                ParserError::ExpectedType {
                    found: self.current.ty.as_str().to_string(),
                    span: self.current.span.into(),
                },
                self.current.span,
            )),
        }
    }

    fn var_decl_group(&mut self, doc: Vec<String>, decls: &mut Vec<Decl>) -> Result<(), ParseError> {
        self.advance(); // consume 'var'
        if self.match_token(TokenType::LParen) {
            self.skip_newlines();
            let mut first = true;
            while !self.check(TokenType::RParen) {
                let doc = if first { doc.clone() } else { self.take_doc() };
                first = false;
                decls.push(Decl::Var(self.var_spec(doc)?));
                self.skip_newlines();
            }
            self.consume(TokenType::RParen)?;
        } else {
            decls.push(Decl::Var(self.var_spec(doc)?));
        }
        Ok(())
    }

    fn var_spec(&mut self, doc: Vec<String>) -> Result<VarDecl, ParseError> {
        let start = self.current.span;
        let mut names = vec![self.ident()?];
        while self.match_token(TokenType::Comma) {
            names.push(self.ident()?);
        }
        let ty = if self.current.ty.starts_type() {
            Some(self.type_expr()?)
        } else {
            None
        };
        let mut values = Vec::new();
        if self.match_token(TokenType::Eq) {
            values.push(self.expression()?);
            while self.match_token(TokenType::Comma) {
                values.push(self.expression()?);
            }
        }
        Ok(VarDecl {
            doc,
            names,
            ty,
            values,
            span: start.merge(self.previous.span),
        })
    }

    fn block(&mut self) -> Result<Block, ParseError> {
        let start = self.current.span;
        self.consume(TokenType::LBrace)?;
        let mut stmts = Vec::new();
        self.skip_newlines();
        while !self.check(TokenType::RBrace) {
            stmts.push(self.statement()?);
            self.skip_newlines();
        }
        self.consume(TokenType::RBrace)?;
        Ok(Block {
            stmts,
            span: start.merge(self.previous.span),
        })
    }

    fn statement(&mut self) -> Result<Stmt, ParseError> {
        match self.current.ty {
            TokenType::KwReturn => {
                let start = self.current.span;
                self.advance();
                let mut results = Vec::new();
                if !self.check(TokenType::Newline)
                    && !self.check(TokenType::RBrace)
                    && !self.check(TokenType::Semicolon)
                {
                    results.push(self.expression()?);
                    while self.match_token(TokenType::Comma) {
                        results.push(self.expression()?);
                    }
                }
                Ok(Stmt::Return(ReturnStmt {
                    results,
                    span: start.merge(self.previous.span),
                }))
            }
            TokenType::KwVar => {
                let doc = self.take_doc();
                self.advance();
                Ok(Stmt::Var(self.var_spec(doc)?))
            }
            _ => Ok(Stmt::Expr(self.expression()?)),
        }
    }

    pub fn expression(&mut self) -> Result<Expr, ParseError> {
        let start = self.current.span;
        match self.current.ty {
            TokenType::Amp => {
                self.advance();
                let inner = self.expression()?;
                let span = start.merge(inner.span);
                Ok(Expr::new(ExprKind::AddrOf(Box::new(inner)), span))
            }
            TokenType::Star => {
                self.advance();
                let inner = self.expression()?;
                let span = start.merge(inner.span);
                Ok(Expr::new(ExprKind::Star(Box::new(inner)), span))
            }
            _ => {
                let primary = self.primary()?;
                self.postfix(primary)
            }
        }
    }

    fn primary(&mut self) -> Result<Expr, ParseError> {
        let start = self.current.span;
        match self.current.ty {
            TokenType::Identifier => {
                let id = self.ident()?;
                Ok(Expr::new(ExprKind::Ident(id.name), id.span))
            }
            TokenType::KwNil => {
                self.advance();
                Ok(Expr::new(ExprKind::Nil, start))
            }
            TokenType::StringLiteral => {
                let value = unquote(&self.current.lexeme);
                self.advance();
                Ok(Expr::new(ExprKind::StringLit(value), start))
            }
            TokenType::IntLiteral => {
                let value = self.current.lexeme.parse::<i64>().unwrap_or(0);
                self.advance();
                Ok(Expr::new(ExprKind::IntLit(value), start))
            }
            TokenType::LParen => {
                self.advance();
                let inner = self.expression()?;
                self.consume(TokenType::RParen)?;
                Ok(Expr::new(
                    ExprKind::Paren(Box::new(inner)),
                    start.merge(self.previous.span),
                ))
            }
            // Composite literals of slice/array/map type: []T{...}, map[K]V{...}
            TokenType::LBracket | TokenType::KwMap => {
                let ty = self.type_expr()?;
                self.composite_literal(ty)
            }
            _ => Err(ParseError::new(
                ParserError::ExpectedExpression {
                    found: self.current.ty.as_str().to_string(),
                    span: self.current.span.into(),
                },
                self.current.span,
            )),
        }
    }

    fn postfix(&mut self, mut expr: Expr) -> Result<Expr, ParseError> {
        loop {
            match self.current.ty {
                TokenType::Dot => {
                    self.advance();
                    let sel = self.ident()?;
                    let span = expr.span.merge(sel.span);
                    expr = Expr::new(
                        ExprKind::Selector { expr: Box::new(expr), sel },
                        span,
                    );
                }
                TokenType::LParen => {
                    self.advance();
                    let mut args = Vec::new();
                    if !self.check(TokenType::RParen) {
                        args.push(self.expression()?);
                        while self.match_token(TokenType::Comma) {
                            args.push(self.expression()?);
                        }
                    }
                    self.consume(TokenType::RParen)?;
                    let span = expr.span.merge(self.previous.span);
                    expr = Expr::new(
                        ExprKind::Call { callee: Box::new(expr), args },
                        span,
                    );
                }
                TokenType::LBrace => {
                    // Composite literal; only type-shaped heads qualify.
                    let ty = match expr_to_type(&expr) {
                        Some(ty) => ty,
                        None => return Ok(expr),
                    };
                    return self.composite_literal(ty);
                }
                _ => return Ok(expr),
            }
        }
    }

    fn composite_literal(&mut self, ty: TypeExpr) -> Result<Expr, ParseError> {
        let start = ty.span;
        self.consume(TokenType::LBrace)?;
        self.skip_newlines();
        let mut elems = Vec::new();
        while !self.check(TokenType::RBrace) {
            let value = self.expression()?;
            elems.push(CompositeElem { key: None, value });
            if !self.match_token(TokenType::Comma) {
                self.skip_newlines();
                break;
            }
            self.skip_newlines();
        }
        self.consume(TokenType::RBrace)?;
        Ok(Expr::new(
            ExprKind::Composite { ty, elems },
            start.merge(self.previous.span),
        ))
    }

    fn ident(&mut self) -> Result<Ident, ParseError> {
        if self.current.ty != TokenType::Identifier {
            return Err(ParseError::new(
                ParserError::ExpectedIdentifier {
                    found: self.current.ty.as_str().to_string(),
                    span: self.current.span.into(),
                },
                self.current.span,
            ));
        }
        let sym = self.interner.intern(&self.current.lexeme);
        let span = self.current.span;
        self.advance();
        Ok(Ident::new(sym, span))
    }

    fn skip_newlines(&mut self) {
        while matches!(self.current.ty, TokenType::Newline | TokenType::Semicolon) {
            self.advance();
        }
    }

    fn advance(&mut self) {
        self.previous = std::mem::replace(&mut self.current, self.lexer.next_token());
    }

    fn check(&self, ty: TokenType) -> bool {
        self.current.ty == ty
    }

    fn match_token(&mut self, ty: TokenType) -> bool {
        if self.check(ty) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn consume(&mut self, ty: TokenType) -> Result<(), ParseError> {
        if self.check(ty) {
            self.advance();
            return Ok(());
        }
        Err(ParseError::new(
            ParserError::ExpectedToken {
                expected: ty.as_str().to_string(),
                found: self.current.ty.as_str().to_string(),
                span: self.current.span.into(),
            },
            self.current.span,
        ))
    }
}

/// Strip surrounding quotes and unescape the minimal escapes the lexer
/// accepts.
fn unquote(lexeme: &str) -> String {
    let inner = lexeme
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(lexeme);
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some(other) => out.push(other),
                None => {}
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Reinterpret an already-parsed expression as the type of a composite
/// literal. Only identifiers and package-qualified names qualify.
fn expr_to_type(expr: &Expr) -> Option<TypeExpr> {
    match &expr.kind {
        ExprKind::Ident(sym) => Some(TypeExpr::new(TypeExprKind::Named(*sym), expr.span)),
        ExprKind::Selector { expr: head, sel } => match head.kind {
            ExprKind::Ident(qual) => Some(TypeExpr::new(
                TypeExprKind::Qualified {
                    qual: Ident::new(qual, head.span),
                    name: *sel,
                },
                expr.span,
            )),
            _ => None,
        },
        _ => None,
    }
}

/// A bare parameter item that is a plain identifier can act as a name for
/// the following named group.
fn bare_to_ident(ty: &TypeExpr) -> Option<Ident> {
    match ty.kind {
        TypeExprKind::Named(sym) => Some(Ident::new(sym, ty.span)),
        _ => None,
    }
}

#[cfg(test)]
mod tests;
