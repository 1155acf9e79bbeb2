//! Edit script representation for line diffs

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The kind of a delta, rendered as the tag in the ed-style header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeltaKind {
    /// Lines present only in the original
    Delete,
    /// Lines present only in the revised
    Insert,
    /// Original lines replaced by different revised lines
    Change,
}

impl DeltaKind {
    pub fn tag(self) -> char {
        match self {
            DeltaKind::Delete => 'd',
            DeltaKind::Insert => 'a',
            DeltaKind::Change => 'c',
        }
    }
}

/// A contiguous run of lines at a zero-based position
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    pub position: usize,
    pub lines: Vec<String>,
}

impl Chunk {
    pub fn new(position: usize, lines: Vec<String>) -> Self {
        Self { position, lines }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// One localized difference between the original and revised lines
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delta {
    pub kind: DeltaKind,
    pub original: Chunk,
    pub revised: Chunk,
}

impl Delta {
    pub fn delete(position: usize, revised_position: usize, lines: Vec<String>) -> Self {
        Self {
            kind: DeltaKind::Delete,
            original: Chunk::new(position, lines),
            revised: Chunk::new(revised_position, Vec::new()),
        }
    }

    pub fn insert(original_position: usize, position: usize, lines: Vec<String>) -> Self {
        Self {
            kind: DeltaKind::Insert,
            original: Chunk::new(original_position, Vec::new()),
            revised: Chunk::new(position, lines),
        }
    }

    pub fn change(original: Chunk, revised: Chunk) -> Self {
        Self {
            kind: DeltaKind::Change,
            original,
            revised,
        }
    }

    /// Lines this delta prints, with the direction marker for each
    pub fn marked_lines(&self) -> impl Iterator<Item = (char, &str)> {
        let removed = self.original.lines.iter().map(|l| ('<', l.as_str()));
        let added = self.revised.lines.iter().map(|l| ('>', l.as_str()));
        removed.chain(added)
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum PatchError {
    #[error("Delta at original line {position} does not match the source")]
    Mismatch { position: usize },
    #[error("Delta at original line {position} is out of order or out of bounds")]
    OutOfRange { position: usize },
    #[error("Delta at original line {position} expects revised line {revised}, found {actual}")]
    RevisedPosition {
        position: usize,
        revised: usize,
        actual: usize,
    },
}

/// Ordered deltas turning the original lines into the revised lines
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EditScript {
    pub deltas: Vec<Delta>,
}

impl EditScript {
    pub fn new(deltas: Vec<Delta>) -> Self {
        Self { deltas }
    }

    pub fn is_empty(&self) -> bool {
        self.deltas.is_empty()
    }

    pub fn len(&self) -> usize {
        self.deltas.len()
    }

    /// Number of original lines removed
    pub fn deletions(&self) -> usize {
        self.deltas.iter().map(|d| d.original.len()).sum()
    }

    /// Number of revised lines added
    pub fn insertions(&self) -> usize {
        self.deltas.iter().map(|d| d.revised.len()).sum()
    }

    /// Replay the script over `original`, checking every removed line
    pub fn apply<S: AsRef<str>>(&self, original: &[S]) -> Result<Vec<String>, PatchError> {
        let mut out = Vec::with_capacity(original.len());
        let mut cursor = 0;

        for delta in &self.deltas {
            let position = delta.original.position;
            let end = position
                .checked_add(delta.original.len())
                .filter(|&end| position >= cursor && end <= original.len())
                .ok_or(PatchError::OutOfRange { position })?;

            out.extend(original[cursor..position].iter().map(|l| l.as_ref().to_string()));
            if delta.revised.position != out.len() {
                return Err(PatchError::RevisedPosition {
                    position,
                    revised: delta.revised.position,
                    actual: out.len(),
                });
            }
            let matches = original[position..end]
                .iter()
                .zip(&delta.original.lines)
                .all(|(have, want)| have.as_ref() == want);
            if !matches {
                return Err(PatchError::Mismatch { position });
            }
            out.extend(delta.revised.lines.iter().cloned());
            cursor = end;
        }
        out.extend(original[cursor..].iter().map(|l| l.as_ref().to_string()));

        Ok(out)
    }
}
