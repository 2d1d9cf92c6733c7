//! Paragraph-preserving word wrap.
//!
//! Wrapping operates on visual width (see [`crate::metrics`]), not byte or
//! char counts, so CJK and emoji text breaks at the same on-screen column as
//! ASCII. Explicit newlines delimit paragraphs and always survive; interior
//! runs of whitespace are kept verbatim instead of being collapsed, so
//! deliberate spacing (aligned tables, double spaces) renders as written.

use crate::metrics::{from_visual_column, visual_width};

/// Wrap `text` into lines of at most `max_columns` visual cells.
///
/// Algorithm:
/// 1. Split on `'\n'` into paragraphs; an empty paragraph (two consecutive
///    newlines) yields exactly one empty output line.
/// 2. Scan each paragraph as alternating runs of non-whitespace ("words")
///    and whitespace ("gaps"), treated as atomic chunks.
/// 3. Greedily append chunks while the line stays within `max_columns`.
/// 4. A word too wide even for an empty line is hard-split at
///    [`from_visual_column`] boundaries until the remainder fits.
/// 5. Flush the current line at paragraph end.
///
/// Lines are trimmed of trailing whitespace when flushed, and a gap that
/// does not fit at the end of a line is dropped rather than carried over —
/// continuation lines never begin with wrap-induced whitespace.
///
/// A `max_columns` of 0 or 1 still terminates: a chunk that cannot be cut
/// any smaller is emitted overlong instead of looping.
pub fn wrap(text: &str, max_columns: usize) -> Vec<String> {
    let mut lines = Vec::new();

    // Reading whole paragraphs first keeps explicit newlines working.
    for paragraph in text.split('\n') {
        if paragraph.is_empty() {
            lines.push(String::new());
            continue;
        }

        let mut current = String::new();
        let mut position = 0;

        for chunk in chunks(paragraph) {
            let chunk_width = visual_width(chunk);

            if position + chunk_width <= max_columns {
                current.push_str(chunk);
                position += chunk_width;
                continue;
            }

            flush(&mut lines, &mut current);
            position = 0;

            // Gaps never start a continuation line.
            if chunk.chars().all(char::is_whitespace) {
                continue;
            }

            // Hard-split a word that is wider than an entire line.
            let mut rest = chunk;
            while visual_width(rest) > max_columns {
                let cut = from_visual_column(rest, max_columns);
                if cut == 0 {
                    break;
                }

                lines.push(rest[..cut].to_string());
                rest = &rest[cut..];
            }

            current.push_str(rest);
            position = visual_width(rest);
        }

        flush(&mut lines, &mut current);
    }

    lines
}

fn flush(lines: &mut Vec<String>, current: &mut String) {
    let trimmed = current.trim_end();
    if !trimmed.is_empty() {
        lines.push(trimmed.to_string());
    }
    current.clear();
}

/// Iterate alternating word/gap runs of a paragraph.
fn chunks(paragraph: &str) -> impl Iterator<Item = &str> {
    let mut rest = paragraph;
    std::iter::from_fn(move || {
        let first = rest.chars().next()?;
        let first_is_gap = first.is_whitespace();
        let split = rest
            .char_indices()
            .find(|(_, c)| c.is_whitespace() != first_is_gap)
            .map(|(index, _)| index)
            .unwrap_or(rest.len());

        let (chunk, tail) = rest.split_at(split);
        rest = tail;
        Some(chunk)
    })
}
