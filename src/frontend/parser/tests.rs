use super::*;

fn parse(source: &str) -> (SourceFile, Interner) {
    let mut parser = Parser::new(source);
    let file = match parser.parse_file() {
        Ok(f) => f,
        Err(e) => panic!("parse failed: {e}"),
    };
    (file, parser.into_interner())
}

#[test]
fn parse_package_clause() {
    let (file, interner) = parse("package p\n");
    assert_eq!(interner.resolve(file.package.name), "p");
    assert!(file.imports.is_empty());
    assert!(file.decls.is_empty());
}

#[test]
fn parse_import_forms() {
    let src = "package p\n\nimport (\n    m \"example.com/models\"\n    . \"time\"\n    _ \"side\"\n    \"io\"\n)\n";
    let (file, interner) = parse(src);
    assert_eq!(file.imports.len(), 4);
    let aliases: Vec<Option<&str>> = file
        .imports
        .iter()
        .map(|i| i.alias.as_ref().map(|a| interner.resolve(a.name)))
        .collect();
    assert_eq!(aliases, vec![Some("m"), Some("."), Some("_"), None]);
    assert_eq!(file.imports[0].path, "example.com/models");
    assert_eq!(file.imports[3].path, "io");
}

#[test]
fn parse_single_import() {
    let (file, _) = parse("package p\n\nimport \"io\"\n");
    assert_eq!(file.imports.len(), 1);
    assert_eq!(file.imports[0].path, "io");
}

#[test]
fn parse_struct_decl() {
    let (file, interner) = parse("package p\n\ntype C struct {\n    a, b int\n    n Node\n}\n");
    let Decl::Type(td) = &file.decls[0] else {
        panic!("expected type decl")
    };
    assert_eq!(interner.resolve(td.name.name), "C");
    let TypeDeclKind::Struct(s) = &td.kind else {
        panic!("expected struct")
    };
    assert_eq!(s.fields.len(), 2);
    assert_eq!(s.fields[0].names.len(), 2);
}

#[test]
fn parse_empty_struct() {
    let (file, _) = parse("package p\n\ntype C struct{}\n");
    let Decl::Type(td) = &file.decls[0] else {
        panic!("expected type decl")
    };
    assert!(matches!(&td.kind, TypeDeclKind::Struct(s) if s.fields.is_empty()));
    // The declaration span must cover the closing brace; the patcher
    // splices stubs at its end.
    assert_eq!(td.span.end, "package p\n\ntype C struct{}".len());
}

#[test]
fn parse_interface_with_methods_and_embeds() {
    let src = "package p\n\ntype I interface {\n    io.Reader\n    Closer\n    Do(x int) error\n}\n";
    let (file, interner) = parse(src);
    let Decl::Type(td) = &file.decls[0] else {
        panic!("expected type decl")
    };
    let TypeDeclKind::Interface(iface) = &td.kind else {
        panic!("expected interface")
    };
    assert_eq!(iface.members.len(), 3);
    assert!(matches!(
        &iface.members[0],
        InterfaceMember::Embedded(t) if matches!(t.kind, TypeExprKind::Qualified { .. })
    ));
    assert!(matches!(
        &iface.members[1],
        InterfaceMember::Embedded(t) if matches!(t.kind, TypeExprKind::Named(_))
    ));
    let InterfaceMember::Method(m) = &iface.members[2] else {
        panic!("expected method")
    };
    assert_eq!(interner.resolve(m.name.name), "Do");
    assert_eq!(m.sig.params.len(), 1);
    assert_eq!(m.sig.results.len(), 1);
}

#[test]
fn parse_method_decl_receivers() {
    let src = "package p\n\nfunc (C) A() {}\n\nfunc (c *C) B() {}\n\nfunc (x C) D() {}\n";
    let (file, _) = parse(src);
    let receivers: Vec<(bool, bool)> = file
        .decls
        .iter()
        .map(|d| {
            let Decl::Func(f) = d else { panic!("expected func") };
            let r = f.receiver.as_ref().unwrap();
            (r.pointer, r.name.is_some())
        })
        .collect();
    assert_eq!(receivers, vec![(false, false), (true, true), (false, true)]);
}

#[test]
fn parse_param_groups() {
    let (file, _) = parse("package p\n\nfunc F(a, b int, c string) (int, error) {}\n");
    let Decl::Func(f) = &file.decls[0] else {
        panic!("expected func")
    };
    assert_eq!(f.sig.params.len(), 2);
    assert_eq!(f.sig.params[0].names.len(), 2);
    assert_eq!(f.sig.params[1].names.len(), 1);
    assert_eq!(f.sig.results.len(), 2);
    assert!(f.sig.results.iter().all(|r| r.names.is_empty()));
}

#[test]
fn parse_unnamed_params() {
    let (file, _) = parse("package p\n\ntype I interface {\n    Do(int, error)\n}\n");
    let Decl::Type(td) = &file.decls[0] else {
        panic!("expected type decl")
    };
    let TypeDeclKind::Interface(iface) = &td.kind else {
        panic!("expected interface")
    };
    let InterfaceMember::Method(m) = &iface.members[0] else {
        panic!("expected method")
    };
    assert_eq!(m.sig.params.len(), 2);
    assert!(m.sig.params.iter().all(|p| p.names.is_empty()));
}

#[test]
fn parse_variadic_and_compound_types() {
    let src = "package p\n\nfunc F(xs ...int, m map[string][]byte, f func(*Node) error, c chan int, a [4]T) {}\n";
    let (file, _) = parse(src);
    let Decl::Func(f) = &file.decls[0] else {
        panic!("expected func")
    };
    assert!(matches!(f.sig.params[0].ty.kind, TypeExprKind::Variadic(_)));
    assert!(matches!(f.sig.params[1].ty.kind, TypeExprKind::Map { .. }));
    assert!(matches!(f.sig.params[2].ty.kind, TypeExprKind::Func(_)));
    assert!(matches!(f.sig.params[3].ty.kind, TypeExprKind::Chan(_)));
    assert!(matches!(f.sig.params[4].ty.kind, TypeExprKind::Array { len: 4, .. }));
}

#[test]
fn parse_var_forms() {
    let src = "package p\n\nvar _ I = C{}\n\nvar _ I = &C{}\n\nvar _ = I(C{})\n\nvar _ I = (*C)(nil)\n";
    let (file, _) = parse(src);
    assert_eq!(file.decls.len(), 4);
    let Decl::Var(v) = &file.decls[1] else {
        panic!("expected var")
    };
    assert!(v.ty.is_some());
    assert!(matches!(v.values[0].kind, ExprKind::AddrOf(_)));
    let Decl::Var(v) = &file.decls[2] else {
        panic!("expected var")
    };
    assert!(v.ty.is_none());
    assert!(matches!(v.values[0].kind, ExprKind::Call { .. }));
    let Decl::Var(v) = &file.decls[3] else {
        panic!("expected var")
    };
    let ExprKind::Call { callee, args } = &v.values[0].kind else {
        panic!("expected call")
    };
    assert!(matches!(&callee.kind, ExprKind::Paren(inner) if matches!(inner.kind, ExprKind::Star(_))));
    assert!(matches!(args[0].kind, ExprKind::Nil));
}

#[test]
fn parse_var_group_flattens() {
    let src = "package p\n\nvar (\n    _ = Time{}\n    _ I = C{}\n)\n";
    let (file, _) = parse(src);
    assert_eq!(file.decls.len(), 2);
    assert!(matches!(&file.decls[0], Decl::Var(_)));
    assert!(matches!(&file.decls[1], Decl::Var(_)));
}

#[test]
fn parse_return_statements() {
    let src = "package p\n\nfunc F() (I, error) {\n    return C{}, nil\n}\n";
    let (file, _) = parse(src);
    let Decl::Func(f) = &file.decls[0] else {
        panic!("expected func")
    };
    let body = f.body.as_ref().unwrap();
    let Stmt::Return(ret) = &body.stmts[0] else {
        panic!("expected return")
    };
    assert_eq!(ret.results.len(), 2);
    assert!(matches!(ret.results[0].kind, ExprKind::Composite { .. }));
    assert!(matches!(ret.results[1].kind, ExprKind::Nil));
}

#[test]
fn parse_panic_body() {
    let src = "package p\n\nfunc (C) Do(x int) error {\n    panic(\"unimplemented\")\n}\n";
    let (file, interner) = parse(src);
    let Decl::Func(f) = &file.decls[0] else {
        panic!("expected func")
    };
    let body = f.body.as_ref().unwrap();
    let Stmt::Expr(e) = &body.stmts[0] else {
        panic!("expected expr stmt")
    };
    let ExprKind::Call { callee, args } = &e.kind else {
        panic!("expected call")
    };
    assert!(matches!(&callee.kind, ExprKind::Ident(s) if interner.resolve(*s) == "panic"));
    assert!(matches!(&args[0].kind, ExprKind::StringLit(s) if s == "unimplemented"));
}

#[test]
fn doc_comments_attach_to_decl() {
    let src = "package p\n\n// stale\n\n// Do implements I\n// and more\nfunc (C) Do() {}\n";
    let (file, _) = parse(src);
    let Decl::Func(f) = &file.decls[0] else {
        panic!("expected func")
    };
    assert_eq!(f.doc, vec!["Do implements I", "and more"]);
}

#[test]
fn missing_package_clause_errors() {
    let mut parser = Parser::new("type C struct{}\n");
    assert!(parser.parse_file().is_err());
}
