// src/stub/mod.rs
//! Method-stub synthesis: one-shot per diagnostic.
//!
//! `method_stub_actions` is the entry point the protocol layer calls with
//! the compiler diagnostics of one file. For each recognizable diagnostic
//! it extracts the request, computes the missing methods, rewrites their
//! signatures for the destination file, and patches that file — yielding
//! one quickfix action. Requests share no mutable state; everything
//! scratch is local to the call.

pub mod errors;
pub mod missing;
pub mod patch;
pub mod request;
pub mod rewrite;
pub mod scope;

use rustc_hash::FxHashSet;
use tracing::debug;

use crate::fmt;
use crate::protocol::{
    COMPILER_SOURCE, CodeAction, Diagnostic, QUICK_FIX, TextDocumentEdit,
    VersionedTextDocumentIdentifier, WorkspaceEdit,
};
use crate::sema::{FileId, PackageId, TypeId, Workspace};
use crate::util::position_to_offset;

pub use errors::StubError;
pub use missing::{ConcreteType, MissingInterface, missing_methods};
pub use patch::{MethodData, Patch, apply_edits, render_stub};
pub use request::{StubRequest, implement_request};
pub use rewrite::{AddedImport, AddedImports, RewriteContext, rewrite_signature};

/// Diagnostic predicate: an implementation gap reported as a missing
/// method. Isolated so the recognition taxonomy can evolve with compiler
/// wording.
pub fn is_missing_method_err(d: &Diagnostic) -> bool {
    d.source == COMPILER_SOURCE && d.message.contains("missing method")
}

/// Diagnostic predicate: a failed conversion to an interface type.
pub fn is_conversion_err(d: &Diagnostic) -> bool {
    d.source == COMPILER_SOURCE && d.message.starts_with("cannot convert")
}

/// Produce "Implement I" quickfix actions for the diagnostics of one file.
///
/// Irrelevant diagnostics and unextractable requests are skipped silently;
/// real failures (mismatched signatures, unparsable splices) abort with an
/// error.
pub fn method_stub_actions(
    ws: &Workspace,
    file: FileId,
    diagnostics: &[Diagnostic],
) -> Result<Vec<CodeAction>, StubError> {
    let mut actions = Vec::new();
    for d in diagnostics {
        if !is_missing_method_err(d) && !is_conversion_err(d) {
            continue;
        }
        let entry = ws.file(file);
        let Some(offset) = position_to_offset(&entry.source, d.range.start) else {
            continue;
        };
        let Some(request) = implement_request(ws, file.pkg, file.index, offset)? else {
            continue;
        };

        let ct = ConcreteType::new(ws, request.concrete);
        let mut visited = FxHashSet::default();
        let missing = missing_methods(ws, &ct, request.iface, request.iface_pkg, &mut visited)?;
        if missing.is_empty() {
            continue;
        }

        let iface_name = interface_display_name(ws, request.iface, ct.pkg);
        let concrete_name = ws
            .interner()
            .resolve(ws.type_object(request.concrete).name)
            .to_string();
        let receiver = if request.pointer {
            format!("*{concrete_name}")
        } else {
            concrete_name
        };

        let mut imports = AddedImports::default();
        let mut stubs = String::new();
        for mi in &missing {
            let ctx = RewriteContext {
                ws,
                iface_pkg: mi.pkg,
                iface_file: mi.file.index,
                dest_pkg: ct.pkg,
                dest_file: ct.file.index,
            };
            for method in &mi.missing {
                let sig = rewrite_signature(&ctx, method.sig, &mut imports);
                let md = MethodData {
                    method: ws.interner().resolve(method.name).to_string(),
                    interface: iface_name.clone(),
                    receiver: receiver.clone(),
                    signature: fmt::signature_to_string(&sig, ws.interner()),
                };
                stubs.push_str(&render_stub(&md));
                stubs.push('\n');
            }
        }

        let insert_offset = ws.type_object(request.concrete).span.end;
        let patch = patch::apply(ws, ct.file, insert_offset, &stubs, &imports)?;
        debug!(iface = %iface_name, "stub action ready");
        actions.push(CodeAction {
            title: format!("Implement {iface_name}"),
            kind: QUICK_FIX.to_string(),
            diagnostics: vec![d.clone()],
            edit: WorkspaceEdit {
                document_changes: vec![TextDocumentEdit {
                    text_document: VersionedTextDocumentIdentifier {
                        uri: patch.uri,
                        version: patch.version,
                    },
                    edits: patch.edits,
                }],
            },
        });
    }
    Ok(actions)
}

/// How the interface is spelled where the stubs land: bare when it shares
/// the concrete type's package, otherwise qualified with its package's
/// short name.
fn interface_display_name(ws: &Workspace, iface: TypeId, concrete_pkg: PackageId) -> String {
    let obj = ws.type_object(iface);
    let name = ws.interner().resolve(obj.name);
    if obj.pkg == concrete_pkg {
        name.to_string()
    } else {
        format!("{}.{}", ws.interner().resolve(ws.package(obj.pkg).name), name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{Position, Range};

    fn diag(source: &str, message: &str) -> Diagnostic {
        Diagnostic {
            source: source.to_string(),
            range: Range::new(
                Position { line: 0, character: 0 },
                Position { line: 0, character: 1 },
            ),
            message: message.to_string(),
        }
    }

    #[test]
    fn diagnostic_predicates() {
        assert!(is_missing_method_err(&diag(
            "compiler",
            "C does not implement I (missing method Do)"
        )));
        assert!(!is_missing_method_err(&diag(
            "vet",
            "C does not implement I (missing method Do)"
        )));
        assert!(is_conversion_err(&diag("compiler", "cannot convert C to I")));
        assert!(!is_conversion_err(&diag("compiler", "really cannot convert")));
    }
}
