//! The NOTICE check workflow: compare, diff, write the expected artifact

use crate::compare::{CompareError, Comparison, NoticeComparator};
use crate::delta::EditScript;
use crate::diff::{write_diff, DiffError, DiffRenderer};
use crate::document::Document;
use crate::encoding::TextEncoding;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, error, info, warn};

pub const DEFAULT_NOTICE_FILE: &str = "NOTICE";
pub const DEFAULT_BUILD_DIR: &str = "target";
pub const DEFAULT_EXPECTED_FILE_NAME: &str = "NOTICE.expected";

/// Details of a failed check
#[derive(Debug, Clone)]
pub struct Mismatch {
    /// The reference file that is out of date
    pub existing: PathBuf,
    /// Where the expected contents were written for inspection
    pub expected: PathBuf,
    /// Whether writing `expected` succeeded
    pub expected_written: bool,
    /// Rendered diff, empty if it could not be computed
    pub diff: String,
    pub script: Option<EditScript>,
}

#[derive(Error, Debug)]
pub enum CheckError {
    #[error("No NOTICE file exists at: {}", .0.display())]
    MissingReferenceFile(PathBuf),
    #[error("Failed to read existing NOTICE File from: {}", .path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(
        "Existing NOTICE file '{}' doesn't match expected NOTICE file: {}",
        .0.existing.display(),
        .0.expected.display()
    )]
    ContentMismatch(Box<Mismatch>),
}

impl From<CompareError> for CheckError {
    fn from(err: CompareError) -> Self {
        match err {
            CompareError::MissingReferenceFile(path) => CheckError::MissingReferenceFile(path),
            CompareError::Io { path, source } => CheckError::ReadFailed { path, source },
        }
    }
}

impl CheckError {
    pub fn mismatch(&self) -> Option<&Mismatch> {
        match self {
            CheckError::ContentMismatch(m) => Some(m),
            _ => None,
        }
    }
}

/// Checks a generated notice against the checked-in reference file
///
/// The reference file is only ever read. On mismatch the expected contents
/// are written next to the build output so they can be inspected or copied
/// over by hand.
#[derive(Debug, Clone)]
pub struct NoticeCheck {
    notice_file: PathBuf,
    build_dir: PathBuf,
    expected_file_name: String,
    encoding: TextEncoding,
    max_diff_lines: Option<usize>,
}

impl Default for NoticeCheck {
    fn default() -> Self {
        Self {
            notice_file: PathBuf::from(DEFAULT_NOTICE_FILE),
            build_dir: PathBuf::from(DEFAULT_BUILD_DIR),
            expected_file_name: DEFAULT_EXPECTED_FILE_NAME.to_string(),
            encoding: TextEncoding::default(),
            max_diff_lines: None,
        }
    }
}

impl NoticeCheck {
    pub fn new(notice_file: impl Into<PathBuf>) -> Self {
        Self {
            notice_file: notice_file.into(),
            ..Self::default()
        }
    }

    pub fn with_build_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.build_dir = dir.into();
        self
    }

    pub fn with_expected_file_name(mut self, name: impl Into<String>) -> Self {
        self.expected_file_name = name.into();
        self
    }

    pub fn with_encoding(mut self, encoding: TextEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn with_max_diff_lines(mut self, limit: Option<usize>) -> Self {
        self.max_diff_lines = limit;
        self
    }

    pub fn notice_file(&self) -> &Path {
        &self.notice_file
    }

    pub fn expected_file(&self) -> PathBuf {
        self.build_dir.join(&self.expected_file_name)
    }

    pub fn run(&self, expected: &Document) -> Result<(), CheckError> {
        debug!(
            notice = %self.notice_file.display(),
            encoding = %self.encoding,
            "checking NOTICE file"
        );

        let comparator = NoticeComparator::new(self.encoding);
        let existing = match comparator.compare(expected, &self.notice_file)? {
            Comparison::Identical => {
                info!("NOTICE file is up to date");
                return Ok(());
            }
            Comparison::Different(existing) => existing,
        };

        let (script, diff) = self.best_effort_diff(expected, &existing);

        let expected_file = self.expected_file();
        let expected_written = match expected.write(&expected_file, self.encoding) {
            Ok(()) => true,
            Err(e) => {
                warn!(
                    error = %e,
                    "Failed to write expected NOTICE File to: {}",
                    expected_file.display()
                );
                false
            }
        };

        let mismatch = Mismatch {
            existing: self.notice_file.clone(),
            expected: expected_file,
            expected_written,
            diff,
            script,
        };
        error!(
            "Existing NOTICE file '{}' doesn't match expected NOTICE file: {}\n{}",
            mismatch.existing.display(),
            mismatch.expected.display(),
            mismatch.diff
        );
        Err(CheckError::ContentMismatch(Box::new(mismatch)))
    }

    /// Diff failures are logged and degrade to an empty diff
    fn best_effort_diff(
        &self,
        expected: &Document,
        existing: &Document,
    ) -> (Option<EditScript>, String) {
        let renderer = DiffRenderer::new().with_max_lines(self.max_diff_lines);
        let rendered = renderer.edit_script(expected, existing).and_then(|script| {
            let mut text = String::new();
            write_diff(&script, &mut text).map_err(DiffError::from)?;
            Ok((script, text))
        });

        match rendered {
            Ok((script, text)) => (Some(script), text),
            Err(e) => {
                warn!(
                    error = %e,
                    "Failed to generate diff between existing and expected NOTICE files"
                );
                (None, String::new())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delta::DeltaKind;

    fn setup(existing: &str) -> (tempfile::TempDir, NoticeCheck) {
        let dir = tempfile::tempdir().unwrap();
        let notice = dir.path().join("NOTICE");
        std::fs::write(&notice, existing).unwrap();
        let check = NoticeCheck::new(notice).with_build_dir(dir.path().join("target"));
        (dir, check)
    }

    #[test]
    fn test_up_to_date_writes_nothing() {
        let (_dir, check) = setup("Same\n");

        check.run(&Document::new("Same\n")).unwrap();
        assert!(!check.expected_file().exists());
    }

    #[test]
    fn test_mismatch_writes_expected_and_reports_diff() {
        let (_dir, check) = setup("Line A\nLine C\n");

        let err = check.run(&Document::new("Line A\nLine B\n")).unwrap_err();
        let mismatch = err.mismatch().unwrap();

        assert_eq!(mismatch.diff, "1c1\n< Line B\n> Line C\n");
        assert!(mismatch.expected_written);
        assert_eq!(mismatch.expected, check.expected_file());
        assert_eq!(
            std::fs::read_to_string(&mismatch.expected).unwrap(),
            "Line A\nLine B\n"
        );
        let script = mismatch.script.as_ref().unwrap();
        assert_eq!(script.deltas[0].kind, DeltaKind::Change);
    }

    #[test]
    fn test_trailing_newline_mismatch_has_diff() {
        let (_dir, check) = setup("Line A\nLine B");

        let err = check.run(&Document::new("Line A\nLine B\n")).unwrap_err();
        assert_eq!(err.mismatch().unwrap().diff, "1c1\n< Line B\n> Line B\n");
    }

    #[test]
    fn test_mismatch_message_names_both_files() {
        let (_dir, check) = setup("old\n");

        let err = check.run(&Document::new("new\n")).unwrap_err();
        let msg = err.to_string();
        assert!(msg.starts_with("Existing NOTICE file '"));
        assert!(msg.contains(&check.notice_file().display().to_string()));
        assert!(msg.ends_with(&check.expected_file().display().to_string()));
    }

    #[test]
    fn test_reference_file_is_never_modified() {
        let (_dir, check) = setup("old\n");

        let _ = check.run(&Document::new("new\n"));
        assert_eq!(std::fs::read_to_string(check.notice_file()).unwrap(), "old\n");
    }

    #[test]
    fn test_missing_reference_fails_before_diff() {
        let dir = tempfile::tempdir().unwrap();
        let check = NoticeCheck::new(dir.path().join("NOTICE"))
            .with_build_dir(dir.path().join("target"));

        let err = check.run(&Document::new("x\n")).unwrap_err();
        assert!(matches!(err, CheckError::MissingReferenceFile(_)));
        assert!(!check.expected_file().exists());
    }

    #[test]
    fn test_expected_write_failure_still_reports_mismatch() {
        let (dir, _) = setup("old\n");
        // A regular file where the build directory should be
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();
        let check = NoticeCheck::new(dir.path().join("NOTICE")).with_build_dir(&blocker);

        let err = check.run(&Document::new("new\n")).unwrap_err();
        let mismatch = err.mismatch().unwrap();
        assert!(!mismatch.expected_written);
        assert_eq!(mismatch.diff, "0c0\n< new\n> old\n");
    }

    #[test]
    fn test_diff_failure_degrades_to_empty_diff() {
        let (_dir, check) = setup("a\nb\nc\n");
        let check = check.with_max_diff_lines(Some(1));

        let err = check.run(&Document::new("a\n")).unwrap_err();
        let mismatch = err.mismatch().unwrap();
        assert!(mismatch.diff.is_empty());
        assert!(mismatch.script.is_none());
        assert!(mismatch.expected_written);
    }

    #[test]
    fn test_custom_expected_name_and_encoding() {
        let (_dir, check) = setup("\u{FFFD}\n");
        let check = check
            .with_expected_file_name("NOTICE.generated")
            .with_encoding(TextEncoding::Latin1);

        let err = check.run(&Document::new("©\n")).unwrap_err();
        let mismatch = err.mismatch().unwrap();
        assert!(mismatch.expected.ends_with("NOTICE.generated"));
        assert_eq!(std::fs::read(&mismatch.expected).unwrap(), b"\xA9\n");
    }
}
