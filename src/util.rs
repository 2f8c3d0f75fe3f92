// src/util.rs
//
// Shared position helpers.
//
// Protocol positions are zero-based lines with UTF-16 code-unit columns;
// everything internal works on byte offsets. The mapping between the two
// lives here and nowhere else.

use crate::protocol::Position;

/// Convert a protocol position to a byte offset into `source`.
///
/// Returns `None` when the line does not exist or the column lies past the
/// end of the line.
pub fn position_to_offset(source: &str, pos: Position) -> Option<usize> {
    let line_start = line_offset(source, pos.line)?;
    let line = &source[line_start..];
    let line_end = line.find('\n').unwrap_or(line.len());

    let mut units = 0u32;
    for (i, c) in line[..line_end].char_indices() {
        if units == pos.character {
            return Some(line_start + i);
        }
        units += c.len_utf16() as u32;
    }
    if units == pos.character {
        return Some(line_start + line_end);
    }
    None
}

/// Convert a byte offset into `source` to a protocol position.
pub fn offset_to_position(source: &str, offset: usize) -> Position {
    let mut line = 0u32;
    let mut line_start = 0usize;
    for (i, c) in source.char_indices() {
        if i >= offset {
            break;
        }
        if c == '\n' {
            line += 1;
            line_start = i + c.len_utf8();
        }
    }
    let character = source[line_start..offset.min(source.len())]
        .chars()
        .map(|c| c.len_utf16() as u32)
        .sum();
    Position { line, character }
}

/// Byte offset of the start of a zero-based line.
fn line_offset(source: &str, line: u32) -> Option<usize> {
    if line == 0 {
        return Some(0);
    }
    let mut remaining = line;
    for (i, c) in source.char_indices() {
        if c == '\n' {
            remaining -= 1;
            if remaining == 0 {
                return Some(i + 1);
            }
        }
    }
    None
}
