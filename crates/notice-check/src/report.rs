//! Machine-readable check report

use notice_check_core::{Delta, Mismatch};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    UpToDate,
    Mismatch,
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub status: Status,
    pub notice_file: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_file: Option<PathBuf>,
    pub expected_written: bool,
    pub deltas: Vec<Delta>,
}

impl Report {
    pub fn up_to_date(notice_file: &Path) -> Self {
        Self {
            status: Status::UpToDate,
            notice_file: notice_file.to_path_buf(),
            expected_file: None,
            expected_written: false,
            deltas: Vec::new(),
        }
    }

    pub fn from_mismatch(mismatch: &Mismatch) -> Self {
        Self {
            status: Status::Mismatch,
            notice_file: mismatch.existing.clone(),
            expected_file: Some(mismatch.expected.clone()),
            expected_written: mismatch.expected_written,
            deltas: mismatch
                .script
                .as_ref()
                .map(|s| s.deltas.clone())
                .unwrap_or_default(),
        }
    }
}
