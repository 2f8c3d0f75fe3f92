// src/sema/object.rs
//
// Nominal identities: packages, named type objects, and method sets.
// Everything is an index into the workspace registries so the whole type
// graph can be shared read-only between requests.

use smallvec::SmallVec;

use crate::frontend::{FuncSig, Span, Symbol};

/// Index of a package in the workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PackageId(u32);

impl PackageId {
    pub fn new(index: u32) -> Self {
        Self(index)
    }

    pub fn index(self) -> u32 {
        self.0
    }
}

/// Index of a named type object in the workspace registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeId(u32);

impl TypeId {
    pub fn new(index: u32) -> Self {
        Self(index)
    }

    pub fn index(self) -> u32 {
        self.0
    }
}

/// A file within a package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileId {
    pub pkg: PackageId,
    pub index: u32,
}

/// Underlying form of a named type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeForm {
    Struct,
    Interface,
}

/// A named, package-owned type: the unit both sides of a stub request
/// resolve to. The declaration itself stays in the file's AST; the object
/// records where to find it.
#[derive(Debug, Clone)]
pub struct TypeObject {
    pub name: Symbol,
    pub pkg: PackageId,
    pub file: FileId,
    /// Index of the `type` declaration in its file's decl list.
    pub decl: u32,
    pub form: TypeForm,
    pub span: Span,
}

impl TypeObject {
    pub fn is_interface(&self) -> bool {
        self.form == TypeForm::Interface
    }
}

/// Inline list of methods declared on one named type. Most concrete types
/// carry only a handful.
pub type MethodVec = SmallVec<[MethodInfo; 4]>;

/// One method declaration attached to a named type.
#[derive(Debug, Clone)]
pub struct MethodInfo {
    pub name: Symbol,
    pub file: FileId,
    /// Index of the `func` declaration in its file's decl list.
    pub decl: u32,
    pub pointer_receiver: bool,
}

/// The value- and pointer-method sets of a concrete type, queried by name.
/// The pointer set contains every method; the value set only those with a
/// value receiver.
#[derive(Debug, Clone, Copy)]
pub struct MethodSets<'a> {
    methods: &'a [MethodInfo],
}

impl<'a> MethodSets<'a> {
    pub fn new(methods: &'a [MethodInfo]) -> Self {
        Self { methods }
    }

    /// Method visible on a value of the type.
    pub fn value_lookup(&self, name: Symbol) -> Option<&'a MethodInfo> {
        self.methods
            .iter()
            .find(|m| m.name == name && !m.pointer_receiver)
    }

    /// Method visible on a pointer to the type.
    pub fn pointer_lookup(&self, name: Symbol) -> Option<&'a MethodInfo> {
        self.methods.iter().find(|m| m.name == name)
    }

    /// True when neither method set contains `name`.
    pub fn does_not_have(&self, name: Symbol) -> bool {
        self.value_lookup(name).is_none() && self.pointer_lookup(name).is_none()
    }

    /// The declared method of this name, from whichever set has it.
    pub fn selection(&self, name: Symbol) -> Option<&'a MethodInfo> {
        self.value_lookup(name).or_else(|| self.pointer_lookup(name))
    }
}

/// Borrowed view of an interface method: its name plus signature AST.
#[derive(Debug, Clone, Copy)]
pub struct MethodRef<'a> {
    pub name: Symbol,
    pub sig: &'a FuncSig,
    pub span: Span,
}
