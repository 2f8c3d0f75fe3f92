// src/stub/patch.rs
//! Splice rendered stubs into the concrete type's file and turn the result
//! into text edits.
//!
//! The pipeline is: render stubs through the fixed template, splice them
//! one past the end of the type's declaration, reparse the spliced bytes,
//! add the queued imports, print canonically, and diff line-by-line
//! against the original bytes. Parse or print failures abort the request;
//! they are never swallowed.

use similar::{DiffTag, TextDiff};
use tracing::debug;

use crate::fmt;
use crate::frontend::{ImportSpec, Interner, Parser, SourceFile};
use crate::protocol::{Position, Range, TextEdit};
use crate::sema::{FileId, Workspace};
use crate::stub::errors::StubError;
use crate::stub::rewrite::AddedImports;

/// Template inputs for one stub.
#[derive(Debug, Clone)]
pub struct MethodData {
    pub method: String,
    pub interface: String,
    pub receiver: String,
    pub signature: String,
}

/// Render one stub through the fixed template (trailing newline included).
pub fn render_stub(md: &MethodData) -> String {
    format!(
        "// {method} implements {interface}\nfunc ({receiver}) {method}{signature} {{\n    panic(\"unimplemented\")\n}}\n",
        method = md.method,
        interface = md.interface,
        receiver = md.receiver,
        signature = md.signature,
    )
}

/// The edits for one document, as the protocol layer expects them.
#[derive(Debug)]
pub struct Patch {
    pub uri: String,
    pub version: i32,
    pub edits: Vec<TextEdit>,
}

/// Splice `stubs` into `dest` at `insert_offset`, apply `imports`, and
/// compute the line edits from the original bytes to the final form.
pub fn apply(
    ws: &Workspace,
    dest: FileId,
    insert_offset: usize,
    stubs: &str,
    imports: &AddedImports,
) -> Result<Patch, StubError> {
    let entry = ws.file(dest);
    let source = &entry.source;

    let mut spliced = String::with_capacity(source.len() + stubs.len() + 1);
    spliced.push_str(&source[..insert_offset]);
    spliced.push('\n');
    spliced.push_str(stubs);
    spliced.push_str(&source[insert_offset..]);

    // Reparse with a fresh interner so positions and symbols are
    // self-consistent in the spliced text.
    let mut parser = Parser::new(&spliced);
    let mut file = parser
        .parse_file()
        .map_err(|e| StubError::Reparse { file: entry.uri.clone(), message: e.to_string() })?;
    let mut interner = parser.into_interner();

    for imp in imports.iter() {
        add_import(&mut file, &mut interner, imp.alias.as_deref(), &imp.path);
    }

    let formatted = fmt::file_to_string(&file, &interner);
    let edits = compute_edits(source, &formatted);
    debug!(uri = %entry.uri, edits = edits.len(), "computed patch");
    Ok(Patch {
        uri: entry.uri.clone(),
        version: entry.version,
        edits,
    })
}

/// Ensure `file` imports `path`, under `alias` when one is required.
/// Blank and dot imports of the same path never satisfy the requirement;
/// a usable import does. New imports keep the block sorted by path.
pub fn add_import(
    file: &mut SourceFile,
    interner: &mut Interner,
    alias: Option<&str>,
    path: &str,
) {
    for imp in &file.imports {
        if imp.path != path {
            continue;
        }
        let existing = imp.alias.as_ref().map(|a| interner.resolve(a.name).to_string());
        match existing.as_deref() {
            Some("_") | Some(".") => continue,
            Some(name) => {
                if alias.is_none() || alias == Some(name) {
                    return;
                }
            }
            None => {
                if alias.is_none() {
                    return;
                }
            }
        }
    }

    let alias = alias.map(|a| {
        let sym = interner.intern(a);
        crate::frontend::Ident::new(sym, Default::default())
    });
    let spec = ImportSpec {
        alias,
        path: path.to_string(),
        span: Default::default(),
    };
    let at = file
        .imports
        .iter()
        .position(|imp| imp.path.as_str() > path)
        .unwrap_or(file.imports.len());
    file.imports.insert(at, spec);
}

/// Line-level minimal edits from `old` to `new`. Ranges are whole lines,
/// so columns are always zero.
pub fn compute_edits(old: &str, new: &str) -> Vec<TextEdit> {
    let new_lines: Vec<&str> = new.split_inclusive('\n').collect();
    let diff = TextDiff::from_lines(old, new);
    let mut edits = Vec::new();
    for op in diff.ops() {
        if op.tag() == DiffTag::Equal {
            continue;
        }
        let old_range = op.old_range();
        let new_text: String = new_lines[op.new_range()].concat();
        edits.push(TextEdit {
            range: Range::new(
                Position { line: old_range.start as u32, character: 0 },
                Position { line: old_range.end as u32, character: 0 },
            ),
            new_text,
        });
    }
    edits
}

/// Apply line edits to a source string. Used by tests to validate that the
/// edits reproduce the formatted output; the protocol layer does the same
/// on the editor side.
pub fn apply_edits(source: &str, edits: &[TextEdit]) -> String {
    let lines: Vec<&str> = source.split_inclusive('\n').collect();
    let mut out = String::new();
    let mut next_line = 0usize;
    for edit in edits {
        let start = edit.range.start.line as usize;
        let end = edit.range.end.line as usize;
        for line in &lines[next_line..start] {
            out.push_str(line);
        }
        out.push_str(&edit.new_text);
        next_line = end;
    }
    for line in &lines[next_line..] {
        out.push_str(line);
    }
    out
}
