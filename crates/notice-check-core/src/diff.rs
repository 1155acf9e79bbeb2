//! Line diff computation and ed-style rendering

use crate::delta::{Chunk, Delta, EditScript};
use crate::document::{trim_line_end, Document};
use similar::{Algorithm, DiffTag, TextDiff};
use std::fmt::{self, Write};
use std::ops::Range;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DiffError {
    #[error("Document has {lines} lines, more than the diff limit of {limit}")]
    TooLarge { lines: usize, limit: usize },
    #[error("Failed to format diff: {0}")]
    Format(#[from] fmt::Error),
}

/// Computes edit scripts between an expected and an existing document
///
/// The expected document is always the original side and the existing
/// document the revised side, so deletions are lines the reference file is
/// missing and insertions are lines it should not have.
#[derive(Debug, Clone, Default)]
pub struct DiffRenderer {
    /// Refuse to diff documents with more lines than this
    max_lines: Option<usize>,
}

impl DiffRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_lines(mut self, limit: Option<usize>) -> Self {
        self.max_lines = limit;
        self
    }

    /// Compute the edit script from `expected` to `existing`
    ///
    /// Lines are compared with their terminators, so a changed line ending
    /// or a missing final newline still shows up as a change.
    pub fn edit_script(
        &self,
        expected: &Document,
        existing: &Document,
    ) -> Result<EditScript, DiffError> {
        let old = expected.raw_lines();
        let new = existing.raw_lines();

        if let Some(limit) = self.max_lines {
            let lines = old.len().max(new.len());
            if lines > limit {
                return Err(DiffError::TooLarge { lines, limit });
            }
        }

        let text_diff = TextDiff::configure()
            .algorithm(Algorithm::Myers)
            .diff_slices(&old, &new);

        let mut deltas = Vec::new();
        let mut old_pos = 0usize;
        let mut new_pos = 0usize;
        // Start of the current run of non-equal ops
        let mut pending: Option<(usize, usize)> = None;

        // Only the range lengths are trusted; positions come from the cursors
        for op in text_diff.ops() {
            let (tag, old_range, new_range) = op.as_tag_tuple();
            if tag == DiffTag::Equal {
                if let Some((o, n)) = pending.take() {
                    deltas.push(build_delta(&old, &new, o..old_pos, n..new_pos));
                }
            } else if pending.is_none() {
                pending = Some((old_pos, new_pos));
            }
            old_pos += old_range.len();
            new_pos += new_range.len();
        }
        if let Some((o, n)) = pending {
            deltas.push(build_delta(&old, &new, o..old_pos, n..new_pos));
        }

        Ok(EditScript::new(deltas))
    }

    /// Render the ed-style diff from `expected` to `existing`
    pub fn render(&self, expected: &Document, existing: &Document) -> Result<String, DiffError> {
        let script = self.edit_script(expected, existing)?;
        let mut out = String::new();
        write_diff(&script, &mut out)?;
        Ok(out)
    }
}

fn build_delta(old: &[&str], new: &[&str], o: Range<usize>, n: Range<usize>) -> Delta {
    let strip = |lines: &[&str]| -> Vec<String> {
        lines.iter().map(|l| trim_line_end(l).to_string()).collect()
    };
    let removed = strip(&old[o.clone()]);
    let added = strip(&new[n.clone()]);

    match (removed.is_empty(), added.is_empty()) {
        (false, true) => Delta::delete(o.start, n.start, removed),
        (true, false) => Delta::insert(o.start, n.start, added),
        _ => Delta::change(Chunk::new(o.start, removed), Chunk::new(n.start, added)),
    }
}

/// Write `<origPos><tag><revPos>` headers followed by `< ` and `> ` lines
pub fn write_diff<W: Write>(script: &EditScript, out: &mut W) -> fmt::Result {
    for delta in &script.deltas {
        writeln!(
            out,
            "{}{}{}",
            delta.original.position,
            delta.kind.tag(),
            delta.revised.position
        )?;
        for (marker, line) in delta.marked_lines() {
            writeln!(out, "{} {}", marker, line)?;
        }
    }
    Ok(())
}
