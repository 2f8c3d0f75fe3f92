// src/fmt/printer.rs
//! AST to pretty::Doc conversion for the canonical printer.

use pretty::{Arena, DocAllocator, DocBuilder};

use crate::frontend::Interner;
use crate::frontend::ast::*;

/// Indent width for formatting (4 spaces)
pub(super) const INDENT: isize = 4;

/// Pretty-print a whole source file to a Doc.
pub fn print_file<'a>(
    arena: &'a Arena<'a>,
    file: &SourceFile,
    interner: &Interner,
) -> DocBuilder<'a, Arena<'a>> {
    let mut sections: Vec<DocBuilder<'a, Arena<'a>>> = Vec::new();

    sections.push(
        arena
            .text("package ")
            .append(arena.text(interner.resolve(file.package.name).to_string())),
    );

    if !file.imports.is_empty() {
        sections.push(print_imports(arena, &file.imports, interner));
    }

    for decl in &file.decls {
        sections.push(print_decl(arena, decl, interner));
    }

    arena.intersperse(sections, arena.hardline().append(arena.hardline()))
}

fn print_imports<'a>(
    arena: &'a Arena<'a>,
    imports: &[ImportSpec],
    interner: &Interner,
) -> DocBuilder<'a, Arena<'a>> {
    if imports.len() == 1 {
        return arena
            .text("import ")
            .append(print_import_spec(arena, &imports[0], interner));
    }
    let specs: Vec<_> = imports
        .iter()
        .map(|imp| print_import_spec(arena, imp, interner))
        .collect();
    arena
        .text("import (")
        .append(
            arena
                .hardline()
                .append(arena.intersperse(specs, arena.hardline()))
                .nest(INDENT),
        )
        .append(arena.hardline())
        .append(arena.text(")"))
}

fn print_import_spec<'a>(
    arena: &'a Arena<'a>,
    imp: &ImportSpec,
    interner: &Interner,
) -> DocBuilder<'a, Arena<'a>> {
    let path = arena.text(format!("\"{}\"", imp.path));
    match &imp.alias {
        Some(alias) => arena
            .text(interner.resolve(alias.name).to_string())
            .append(arena.text(" "))
            .append(path),
        None => path,
    }
}

fn print_doc<'a>(arena: &'a Arena<'a>, doc: &[String]) -> DocBuilder<'a, Arena<'a>> {
    if doc.is_empty() {
        return arena.nil();
    }
    let lines: Vec<_> = doc
        .iter()
        .map(|line| {
            if line.is_empty() {
                arena.text("//")
            } else {
                arena.text(format!("// {line}"))
            }
        })
        .collect();
    arena
        .intersperse(lines, arena.hardline())
        .append(arena.hardline())
}

fn print_decl<'a>(
    arena: &'a Arena<'a>,
    decl: &Decl,
    interner: &Interner,
) -> DocBuilder<'a, Arena<'a>> {
    match decl {
        Decl::Type(td) => print_type_decl(arena, td, interner),
        Decl::Func(fd) => print_func_decl(arena, fd, interner),
        Decl::Var(vd) => print_var_decl(arena, vd, interner),
    }
}

fn print_type_decl<'a>(
    arena: &'a Arena<'a>,
    td: &TypeDecl,
    interner: &Interner,
) -> DocBuilder<'a, Arena<'a>> {
    let head = arena
        .text("type ")
        .append(arena.text(interner.resolve(td.name.name).to_string()));
    let body = match &td.kind {
        TypeDeclKind::Struct(s) => print_struct_body(arena, s, interner),
        TypeDeclKind::Interface(i) => print_interface_body(arena, i, interner),
    };
    print_doc(arena, &td.doc).append(head).append(body)
}

fn print_struct_body<'a>(
    arena: &'a Arena<'a>,
    s: &StructDecl,
    interner: &Interner,
) -> DocBuilder<'a, Arena<'a>> {
    if s.fields.is_empty() {
        return arena.text(" struct{}");
    }
    let fields: Vec<_> = s
        .fields
        .iter()
        .map(|f| {
            let names: Vec<_> = f
                .names
                .iter()
                .map(|n| arena.text(interner.resolve(n.name).to_string()))
                .collect();
            arena
                .intersperse(names, arena.text(", "))
                .append(arena.text(" "))
                .append(print_type_expr(arena, &f.ty, interner))
        })
        .collect();
    arena
        .text(" struct {")
        .append(
            arena
                .hardline()
                .append(arena.intersperse(fields, arena.hardline()))
                .nest(INDENT),
        )
        .append(arena.hardline())
        .append(arena.text("}"))
}

fn print_interface_body<'a>(
    arena: &'a Arena<'a>,
    iface: &InterfaceDecl,
    interner: &Interner,
) -> DocBuilder<'a, Arena<'a>> {
    if iface.members.is_empty() {
        return arena.text(" interface{}");
    }
    let members: Vec<_> = iface
        .members
        .iter()
        .map(|m| match m {
            InterfaceMember::Method(spec) => arena
                .text(interner.resolve(spec.name.name).to_string())
                .append(print_signature(arena, &spec.sig, interner)),
            InterfaceMember::Embedded(ty) => print_type_expr(arena, ty, interner),
        })
        .collect();
    arena
        .text(" interface {")
        .append(
            arena
                .hardline()
                .append(arena.intersperse(members, arena.hardline()))
                .nest(INDENT),
        )
        .append(arena.hardline())
        .append(arena.text("}"))
}

fn print_func_decl<'a>(
    arena: &'a Arena<'a>,
    fd: &FuncDecl,
    interner: &Interner,
) -> DocBuilder<'a, Arena<'a>> {
    let mut head = arena.text("func ");
    if let Some(recv) = &fd.receiver {
        let mut recv_doc = arena.text("(");
        if let Some(name) = &recv.name {
            recv_doc = recv_doc
                .append(arena.text(interner.resolve(name.name).to_string()))
                .append(arena.text(" "));
        }
        if recv.pointer {
            recv_doc = recv_doc.append(arena.text("*"));
        }
        recv_doc = recv_doc
            .append(arena.text(interner.resolve(recv.ty_name.name).to_string()))
            .append(arena.text(") "));
        head = head.append(recv_doc);
    }
    head = head
        .append(arena.text(interner.resolve(fd.name.name).to_string()))
        .append(print_signature(arena, &fd.sig, interner));
    let body = match &fd.body {
        Some(block) => arena.text(" ").append(print_block(arena, block, interner)),
        None => arena.nil(),
    };
    print_doc(arena, &fd.doc).append(head).append(body)
}

/// Print a signature without the `func` keyword: `(params) results`.
pub fn print_signature<'a>(
    arena: &'a Arena<'a>,
    sig: &FuncSig,
    interner: &Interner,
) -> DocBuilder<'a, Arena<'a>> {
    let params = print_param_list(arena, &sig.params, interner);
    let doc = arena.text("(").append(params).append(arena.text(")"));
    match sig.results.len() {
        0 => doc,
        1 if sig.results[0].names.is_empty() => doc
            .append(arena.text(" "))
            .append(print_type_expr(arena, &sig.results[0].ty, interner)),
        _ => doc
            .append(arena.text(" ("))
            .append(print_param_list(arena, &sig.results, interner))
            .append(arena.text(")")),
    }
}

fn print_param_list<'a>(
    arena: &'a Arena<'a>,
    params: &[Param],
    interner: &Interner,
) -> DocBuilder<'a, Arena<'a>> {
    let groups: Vec<_> = params
        .iter()
        .map(|p| {
            if p.names.is_empty() {
                print_type_expr(arena, &p.ty, interner)
            } else {
                let names: Vec<_> = p
                    .names
                    .iter()
                    .map(|n| arena.text(interner.resolve(n.name).to_string()))
                    .collect();
                arena
                    .intersperse(names, arena.text(", "))
                    .append(arena.text(" "))
                    .append(print_type_expr(arena, &p.ty, interner))
            }
        })
        .collect();
    arena.intersperse(groups, arena.text(", "))
}

pub fn print_type_expr<'a>(
    arena: &'a Arena<'a>,
    ty: &TypeExpr,
    interner: &Interner,
) -> DocBuilder<'a, Arena<'a>> {
    match &ty.kind {
        TypeExprKind::Named(sym) => arena.text(interner.resolve(*sym).to_string()),
        TypeExprKind::Qualified { qual, name } => arena.text(format!(
            "{}.{}",
            interner.resolve(qual.name),
            interner.resolve(name.name)
        )),
        TypeExprKind::Pointer(inner) => arena
            .text("*")
            .append(print_type_expr(arena, inner, interner)),
        TypeExprKind::Slice(inner) => arena
            .text("[]")
            .append(print_type_expr(arena, inner, interner)),
        TypeExprKind::Array { len, elem } => arena
            .text(format!("[{len}]"))
            .append(print_type_expr(arena, elem, interner)),
        TypeExprKind::Map { key, value } => arena
            .text("map[")
            .append(print_type_expr(arena, key, interner))
            .append(arena.text("]"))
            .append(print_type_expr(arena, value, interner)),
        TypeExprKind::Chan(inner) => arena
            .text("chan ")
            .append(print_type_expr(arena, inner, interner)),
        TypeExprKind::Func(sig) => arena
            .text("func")
            .append(print_signature(arena, sig, interner)),
        TypeExprKind::Variadic(inner) => arena
            .text("...")
            .append(print_type_expr(arena, inner, interner)),
    }
}

fn print_var_decl<'a>(
    arena: &'a Arena<'a>,
    vd: &VarDecl,
    interner: &Interner,
) -> DocBuilder<'a, Arena<'a>> {
    let names: Vec<_> = vd
        .names
        .iter()
        .map(|n| arena.text(interner.resolve(n.name).to_string()))
        .collect();
    let mut doc = print_doc(arena, &vd.doc)
        .append(arena.text("var "))
        .append(arena.intersperse(names, arena.text(", ")));
    if let Some(ty) = &vd.ty {
        doc = doc
            .append(arena.text(" "))
            .append(print_type_expr(arena, ty, interner));
    }
    if !vd.values.is_empty() {
        let values: Vec<_> = vd
            .values
            .iter()
            .map(|v| print_expr(arena, v, interner))
            .collect();
        doc = doc
            .append(arena.text(" = "))
            .append(arena.intersperse(values, arena.text(", ")));
    }
    doc
}

fn print_block<'a>(
    arena: &'a Arena<'a>,
    block: &Block,
    interner: &Interner,
) -> DocBuilder<'a, Arena<'a>> {
    if block.stmts.is_empty() {
        return arena.text("{}");
    }
    let stmts: Vec<_> = block
        .stmts
        .iter()
        .map(|s| print_stmt(arena, s, interner))
        .collect();
    arena
        .text("{")
        .append(
            arena
                .hardline()
                .append(arena.intersperse(stmts, arena.hardline()))
                .nest(INDENT),
        )
        .append(arena.hardline())
        .append(arena.text("}"))
}

fn print_stmt<'a>(
    arena: &'a Arena<'a>,
    stmt: &Stmt,
    interner: &Interner,
) -> DocBuilder<'a, Arena<'a>> {
    match stmt {
        Stmt::Return(ret) => {
            if ret.results.is_empty() {
                return arena.text("return");
            }
            let results: Vec<_> = ret
                .results
                .iter()
                .map(|e| print_expr(arena, e, interner))
                .collect();
            arena
                .text("return ")
                .append(arena.intersperse(results, arena.text(", ")))
        }
        Stmt::Var(vd) => print_var_decl(arena, vd, interner),
        Stmt::Expr(e) => print_expr(arena, e, interner),
    }
}

fn print_expr<'a>(
    arena: &'a Arena<'a>,
    expr: &Expr,
    interner: &Interner,
) -> DocBuilder<'a, Arena<'a>> {
    match &expr.kind {
        ExprKind::Ident(sym) => arena.text(interner.resolve(*sym).to_string()),
        ExprKind::Selector { expr: head, sel } => print_expr(arena, head, interner)
            .append(arena.text("."))
            .append(arena.text(interner.resolve(sel.name).to_string())),
        ExprKind::Call { callee, args } => {
            let args: Vec<_> = args
                .iter()
                .map(|a| print_expr(arena, a, interner))
                .collect();
            print_expr(arena, callee, interner)
                .append(arena.text("("))
                .append(arena.intersperse(args, arena.text(", ")))
                .append(arena.text(")"))
        }
        ExprKind::Composite { ty, elems } => {
            let elems: Vec<_> = elems
                .iter()
                .map(|e| print_expr(arena, &e.value, interner))
                .collect();
            print_type_expr(arena, ty, interner)
                .append(arena.text("{"))
                .append(arena.intersperse(elems, arena.text(", ")))
                .append(arena.text("}"))
        }
        ExprKind::AddrOf(inner) => arena.text("&").append(print_expr(arena, inner, interner)),
        ExprKind::Star(inner) => arena.text("*").append(print_expr(arena, inner, interner)),
        ExprKind::Paren(inner) => arena
            .text("(")
            .append(print_expr(arena, inner, interner))
            .append(arena.text(")")),
        ExprKind::StringLit(s) => arena.text(format!("\"{}\"", escape_string(s))),
        ExprKind::IntLit(n) => arena.text(n.to_string()),
        ExprKind::Nil => arena.text("nil"),
    }
}

fn escape_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out
}
