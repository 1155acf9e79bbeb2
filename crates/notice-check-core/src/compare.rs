//! Comparing a generated notice against the file on disk

use crate::document::Document;
use crate::encoding::TextEncoding;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CompareError {
    #[error("No NOTICE file exists at: {}", .0.display())]
    MissingReferenceFile(PathBuf),
    #[error("Failed to read existing NOTICE File from: {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Outcome of comparing expected contents with the reference file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Comparison {
    Identical,
    /// Carries the decoded contents of the reference file
    Different(Document),
}

impl Comparison {
    pub fn is_identical(&self) -> bool {
        matches!(self, Comparison::Identical)
    }
}

/// Compares generated notice contents against a reference file
#[derive(Debug, Clone, Copy, Default)]
pub struct NoticeComparator {
    encoding: TextEncoding,
}

impl NoticeComparator {
    pub fn new(encoding: TextEncoding) -> Self {
        Self { encoding }
    }

    pub fn encoding(&self) -> TextEncoding {
        self.encoding
    }

    /// Read `existing_path` and compare its decoded text with `expected`
    pub fn compare(
        &self,
        expected: &Document,
        existing_path: &Path,
    ) -> Result<Comparison, CompareError> {
        if !existing_path.exists() {
            return Err(CompareError::MissingReferenceFile(existing_path.to_path_buf()));
        }

        let existing =
            Document::read(existing_path, self.encoding).map_err(|source| CompareError::Io {
                path: existing_path.to_path_buf(),
                source,
            })?;

        if existing == *expected {
            Ok(Comparison::Identical)
        } else {
            Ok(Comparison::Different(existing))
        }
    }
}

/// Compare with a one-off comparator
pub fn compare(
    expected: &Document,
    existing_path: &Path,
    encoding: TextEncoding,
) -> Result<Comparison, CompareError> {
    NoticeComparator::new(encoding).compare(expected, existing_path)
}
