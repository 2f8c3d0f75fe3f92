// src/protocol.rs
//! Wire records exchanged with the surrounding editor protocol.
//!
//! The core never performs I/O; these types only describe the diagnostics it
//! consumes and the workspace edits it produces. Positions are zero-based
//! lines with UTF-16 code-unit columns, per the protocol convention.

use serde::{Deserialize, Serialize};

/// Code-action kind emitted for stub synthesis.
pub const QUICK_FIX: &str = "quickfix";

/// Diagnostic source the matchers accept.
pub const COMPILER_SOURCE: &str = "compiler";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }
}

/// A compiler diagnostic as delivered by the protocol layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    pub source: String,
    pub range: Range,
    pub message: String,
}

/// A single text replacement against one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextEdit {
    pub range: Range,
    pub new_text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionedTextDocumentIdentifier {
    pub uri: String,
    pub version: i32,
}

/// Ordered edits against one versioned document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextDocumentEdit {
    pub text_document: VersionedTextDocumentIdentifier,
    pub edits: Vec<TextEdit>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceEdit {
    pub document_changes: Vec<TextDocumentEdit>,
}

/// A quickfix offered back to the editor. Exactly one edit list, targeting
/// the file that defines the concrete type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeAction {
    pub title: String,
    pub kind: String,
    pub diagnostics: Vec<Diagnostic>,
    pub edit: WorkspaceEdit,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_edit_serializes_camel_case() {
        let edit = TextEdit {
            range: Range::new(
                Position { line: 0, character: 0 },
                Position { line: 1, character: 0 },
            ),
            new_text: "x\n".to_string(),
        };
        let json = serde_json::to_string(&edit).unwrap();
        assert!(json.contains("newText"));
    }
}
