//! Notice Check Core - verify a generated NOTICE against the checked-in one
//!
//! This library compares freshly generated notice contents with the
//! reference file on disk and, when they differ, renders an ed-style line
//! diff describing how the reference file has drifted.

pub mod check;
pub mod compare;
pub mod delta;
pub mod diff;
pub mod document;
pub mod encoding;

pub use check::{CheckError, Mismatch, NoticeCheck};
pub use compare::{compare, CompareError, Comparison, NoticeComparator};
pub use delta::{Chunk, Delta, DeltaKind, EditScript, PatchError};
pub use diff::{write_diff, DiffError, DiffRenderer};
pub use document::{split_lines, split_lines_inclusive, trim_line_end, Document};
pub use encoding::{EncodingError, TextEncoding};
