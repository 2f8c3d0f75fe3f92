// src/sema/workspace.rs
//! The workspace: every loaded package, its parsed files, and the registry
//! of named type objects.
//!
//! All of this is read-only shared state once loading finishes; a stub
//! request only ever reads from it. Lookups that cross packages go through
//! the import tables of the querying package's files — there is no ambient
//! "current package".

use rustc_hash::FxHashMap;

use crate::frontend::{
    Decl, FuncSig, Interner, Parser, SourceFile, Symbol, TypeDeclKind,
};
use crate::sema::errors::LoadError;
use crate::sema::object::{
    FileId, MethodInfo, MethodSets, MethodVec, PackageId, TypeForm, TypeId, TypeObject,
};

/// One file of a package: its identity for edits plus source and AST.
#[derive(Debug)]
pub struct FileEntry {
    /// Document identifier handed back in edits (a path or URI).
    pub uri: String,
    pub version: i32,
    pub source: String,
    pub ast: SourceFile,
}

#[derive(Debug)]
pub struct Package {
    pub path: String,
    /// Short name from the package clause; the default qualifier importers
    /// use.
    pub name: Symbol,
    files: Vec<FileEntry>,
    scope: FxHashMap<Symbol, TypeId>,
    methods: FxHashMap<Symbol, MethodVec>,
}

impl Package {
    pub fn files(&self) -> &[FileEntry] {
        &self.files
    }

    pub fn file(&self, index: u32) -> &FileEntry {
        &self.files[index as usize]
    }

    /// Named type declared in this package.
    pub fn lookup(&self, name: Symbol) -> Option<TypeId> {
        self.scope.get(&name).copied()
    }

    /// The value/pointer method sets of a named type of this package.
    pub fn method_sets(&self, ty_name: Symbol) -> MethodSets<'_> {
        static EMPTY: &[MethodInfo] = &[];
        MethodSets::new(
            self.methods
                .get(&ty_name)
                .map(|v| v.as_slice())
                .unwrap_or(EMPTY),
        )
    }
}

#[derive(Debug, Default)]
pub struct Workspace {
    interner: Interner,
    packages: Vec<Package>,
    by_path: FxHashMap<String, PackageId>,
    types: Vec<TypeObject>,
}

impl Workspace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn interner(&self) -> &Interner {
        &self.interner
    }

    /// Parse and register a package from (uri, source) pairs. Files keep
    /// version 0; callers tracking document versions can bump them with
    /// [`Workspace::set_version`].
    pub fn add_package(
        &mut self,
        path: &str,
        files: Vec<(String, String)>,
    ) -> Result<PackageId, LoadError> {
        if self.by_path.contains_key(path) {
            return Err(LoadError::DuplicatePackage { path: path.to_string() });
        }
        let pkg_id = PackageId::new(self.packages.len() as u32);

        let mut entries = Vec::with_capacity(files.len());
        let mut pkg_name: Option<Symbol> = None;
        for (uri, source) in files {
            let mut parser = Parser::with_interner(&source, std::mem::take(&mut self.interner));
            let parsed = parser.parse_file();
            self.interner = parser.into_interner();
            let ast = parsed.map_err(|e| LoadError::Parse {
                file: uri.clone(),
                message: e.to_string(),
            })?;

            match pkg_name {
                None => pkg_name = Some(ast.package.name),
                Some(expected) if expected != ast.package.name => {
                    return Err(LoadError::PackageNameMismatch {
                        pkg: path.to_string(),
                        file: uri,
                        found: self.interner.resolve(ast.package.name).to_string(),
                        expected: self.interner.resolve(expected).to_string(),
                    });
                }
                Some(_) => {}
            }
            entries.push(FileEntry { uri, version: 0, source, ast });
        }

        let name = match pkg_name {
            Some(name) => name,
            // A package with no files still needs a short name; derive it
            // from the last path segment.
            None => {
                let short = path.rsplit('/').next().unwrap_or(path).to_string();
                self.interner.intern(&short)
            }
        };

        let mut pkg = Package {
            path: path.to_string(),
            name,
            files: entries,
            scope: FxHashMap::default(),
            methods: FxHashMap::default(),
        };
        self.register_decls(pkg_id, &mut pkg)?;

        self.by_path.insert(path.to_string(), pkg_id);
        self.packages.push(pkg);
        Ok(pkg_id)
    }

    fn register_decls(&mut self, pkg_id: PackageId, pkg: &mut Package) -> Result<(), LoadError> {
        for (file_index, entry) in pkg.files.iter().enumerate() {
            let file = FileId { pkg: pkg_id, index: file_index as u32 };
            for (decl_index, decl) in entry.ast.decls.iter().enumerate() {
                match decl {
                    Decl::Type(td) => {
                        let form = match td.kind {
                            TypeDeclKind::Struct(_) => TypeForm::Struct,
                            TypeDeclKind::Interface(_) => TypeForm::Interface,
                        };
                        let id = TypeId::new(self.types.len() as u32);
                        if pkg.scope.insert(td.name.name, id).is_some() {
                            return Err(LoadError::DuplicateType {
                                pkg: pkg.path.clone(),
                                name: self.interner.resolve(td.name.name).to_string(),
                            });
                        }
                        self.types.push(TypeObject {
                            name: td.name.name,
                            pkg: pkg_id,
                            file,
                            decl: decl_index as u32,
                            form,
                            span: td.span,
                        });
                    }
                    Decl::Func(fd) => {
                        let Some(recv) = &fd.receiver else { continue };
                        let methods = pkg.methods.entry(recv.ty_name.name).or_default();
                        if methods.iter().any(|m| m.name == fd.name.name) {
                            return Err(LoadError::DuplicateMethod {
                                pkg: pkg.path.clone(),
                                ty: self.interner.resolve(recv.ty_name.name).to_string(),
                                name: self.interner.resolve(fd.name.name).to_string(),
                            });
                        }
                        methods.push(MethodInfo {
                            name: fd.name.name,
                            file,
                            decl: decl_index as u32,
                            pointer_receiver: recv.pointer,
                        });
                    }
                    Decl::Var(_) => {}
                }
            }
        }
        Ok(())
    }

    pub fn set_version(&mut self, file: FileId, version: i32) {
        self.packages[file.pkg.index() as usize].files[file.index as usize].version = version;
    }

    pub fn package(&self, id: PackageId) -> &Package {
        &self.packages[id.index() as usize]
    }

    pub fn package_by_path(&self, path: &str) -> Option<PackageId> {
        self.by_path.get(path).copied()
    }

    pub fn file(&self, id: FileId) -> &FileEntry {
        self.package(id.pkg).file(id.index)
    }

    /// Find a file anywhere in the workspace by its document identifier.
    pub fn find_file(&self, uri: &str) -> Option<FileId> {
        for (pkg_index, pkg) in self.packages.iter().enumerate() {
            if let Some(file_index) = pkg.files.iter().position(|f| f.uri == uri) {
                return Some(FileId {
                    pkg: PackageId::new(pkg_index as u32),
                    index: file_index as u32,
                });
            }
        }
        None
    }

    pub fn type_object(&self, id: TypeId) -> &TypeObject {
        &self.types[id.index() as usize]
    }

    /// The import-lookup capability of a package: find an imported package
    /// by path, going through the import tables of the package's files.
    /// A package nothing in `from` imports is unreachable.
    pub fn import_of(&self, from: PackageId, path: &str) -> Option<PackageId> {
        let pkg = self.package(from);
        if pkg.path == path {
            return Some(from);
        }
        let imported = pkg
            .files
            .iter()
            .any(|f| f.ast.imports.iter().any(|imp| imp.path == path));
        if !imported {
            return None;
        }
        self.package_by_path(path)
    }

    /// The `type` declaration body backing a type object.
    pub fn type_decl(&self, id: TypeId) -> &crate::frontend::TypeDecl {
        let obj = self.type_object(id);
        let entry = self.file(obj.file);
        match &entry.ast.decls[obj.decl as usize] {
            Decl::Type(td) => td,
            _ => unreachable!("type object points at a non-type declaration"),
        }
    }

    /// The signature of a registered method declaration.
    pub fn method_sig(&self, info: &MethodInfo) -> &FuncSig {
        let entry = self.file(info.file);
        match &entry.ast.decls[info.decl as usize] {
            Decl::Func(fd) => &fd.sig,
            _ => unreachable!("method info points at a non-func declaration"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    fn load(files: &[(&str, &str, &str)]) -> Workspace {
        let mut ws = Workspace::new();
        let mut grouped: Vec<(&str, Vec<(String, String)>)> = Vec::new();
        for &(path, name, src) in files {
            match grouped.iter_mut().find(|(p, _)| *p == path) {
                Some((_, list)) => list.push((name.to_string(), src.to_string())),
                None => grouped.push((path, vec![(name.to_string(), src.to_string())])),
            }
        }
        for (path, files) in grouped {
            ws.add_package(path, files).expect("load failed");
        }
        ws
    }

    #[test]
    fn registers_types_and_methods() {
        let ws = load(&[(
            "example.com/p",
            "p.go",
            indoc! {r#"
                package p

                type I interface {
                    Do(x int) error
                }

                type C struct{}

                func (C) Do(x int) error {
                    return nil
                }

                func (c *C) Extra() {}
            "#},
        )]);
        let pkg_id = ws.package_by_path("example.com/p").unwrap();
        let pkg = ws.package(pkg_id);

        let i_sym = ws.interner().lookup("I").unwrap();
        let c_sym = ws.interner().lookup("C").unwrap();
        let iface = ws.type_object(pkg.lookup(i_sym).unwrap());
        assert!(iface.is_interface());
        let conc = ws.type_object(pkg.lookup(c_sym).unwrap());
        assert_eq!(conc.form, TypeForm::Struct);

        let do_sym = ws.interner().lookup("Do").unwrap();
        let extra_sym = ws.interner().lookup("Extra").unwrap();
        let sets = pkg.method_sets(c_sym);
        assert!(sets.value_lookup(do_sym).is_some());
        assert!(sets.value_lookup(extra_sym).is_none());
        assert!(sets.pointer_lookup(extra_sym).is_some());
    }

    #[test]
    fn import_of_requires_an_import() {
        let ws = load(&[
            ("example.com/p", "p.go", "package p\n\ntype T struct{}\n"),
            (
                "example.com/q",
                "q.go",
                "package q\n\nimport \"example.com/p\"\n\ntype U struct{}\n",
            ),
            ("example.com/r", "r.go", "package r\n"),
        ]);
        let q = ws.package_by_path("example.com/q").unwrap();
        assert!(ws.import_of(q, "example.com/p").is_some());
        assert!(ws.import_of(q, "example.com/r").is_none());
        assert_eq!(ws.import_of(q, "example.com/q"), Some(q));
    }

    #[test]
    fn duplicate_type_rejected() {
        let mut ws = Workspace::new();
        let err = ws.add_package(
            "example.com/p",
            vec![(
                "p.go".to_string(),
                "package p\n\ntype C struct{}\n\ntype C struct{}\n".to_string(),
            )],
        );
        assert!(matches!(err, Err(LoadError::DuplicateType { .. })));
    }

    #[test]
    fn workspace_is_shareable_read_only() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}
        assert_send::<Workspace>();
        assert_sync::<Workspace>();
    }

    #[test]
    fn package_name_mismatch_rejected() {
        let mut ws = Workspace::new();
        let err = ws.add_package(
            "example.com/p",
            vec![
                ("a.go".to_string(), "package p\n".to_string()),
                ("b.go".to_string(), "package q\n".to_string()),
            ],
        );
        assert!(matches!(err, Err(LoadError::PackageNameMismatch { .. })));
    }
}
