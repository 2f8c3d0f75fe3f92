// src/fmt/mod.rs
//! Canonical rendering of source files and signatures.
//!
//! There is one true output style; the patcher depends on it being a fixed
//! point (reparsing and reprinting a printed file yields identical bytes).

mod printer;

use pretty::Arena;

use crate::frontend::{FuncSig, Interner, SourceFile};

/// Maximum render width. Everything structural uses hardlines, so this only
/// bounds pathological single-line constructs.
const MAX_WIDTH: usize = 100;

/// Render a file in canonical form, with a trailing newline.
pub fn file_to_string(file: &SourceFile, interner: &Interner) -> String {
    let arena = Arena::new();
    let doc = printer::print_file(&arena, file, interner);
    render(doc)
}

/// Render a signature without the `func` keyword, e.g. `(x int) error`.
pub fn signature_to_string(sig: &FuncSig, interner: &Interner) -> String {
    let arena = Arena::new();
    let doc = printer::print_signature(&arena, sig, interner);
    let mut out = String::new();
    doc.render_fmt(MAX_WIDTH, &mut out)
        .expect("render to string cannot fail");
    out
}

fn render<'a>(doc: pretty::DocBuilder<'a, Arena<'a>>) -> String {
    let mut output = String::new();
    doc.render_fmt(MAX_WIDTH, &mut output)
        .expect("render to string cannot fail");

    // Remove trailing whitespace from blank lines (artifact of nesting with
    // hardlines).
    let mut output = output
        .lines()
        .map(|line| line.trim_end())
        .collect::<Vec<_>>()
        .join("\n");

    if !output.ends_with('\n') {
        output.push('\n');
    }
    output
}
