//! Notice documents and line splitting

use crate::encoding::TextEncoding;
use std::io;
use std::path::Path;

/// The decoded contents of a notice file
///
/// Equality is on the raw decoded text, so two documents that differ only
/// in line endings are not equal even though their lines are.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Document {
    text: String,
}

impl Document {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn from_bytes(bytes: &[u8], encoding: TextEncoding) -> Self {
        Self::new(encoding.decode(bytes))
    }

    /// Read and decode a whole file
    pub fn read(path: &Path, encoding: TextEncoding) -> io::Result<Self> {
        let bytes = std::fs::read(path)?;
        Ok(Self::from_bytes(&bytes, encoding))
    }

    /// Encode and write the document, creating parent directories as needed
    pub fn write(&self, path: &Path, encoding: TextEncoding) -> io::Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, encoding.encode(&self.text))
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Lines without their terminators
    pub fn lines(&self) -> Vec<&str> {
        split_lines(&self.text)
    }

    /// Lines with their terminators; concatenated they give back the text
    pub fn raw_lines(&self) -> Vec<&str> {
        split_lines_inclusive(&self.text)
    }
}

impl From<String> for Document {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

impl From<&str> for Document {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

/// Split on `\n`, `\r\n` or a lone `\r`
///
/// A trailing terminator does not start an extra empty line.
pub fn split_lines(text: &str) -> Vec<&str> {
    split_lines_inclusive(text)
        .into_iter()
        .map(trim_line_end)
        .collect()
}

/// Like [`split_lines`] but each line keeps its terminator
pub fn split_lines_inclusive(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut lines = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\n' => {
                i += 1;
                lines.push(&text[start..i]);
                start = i;
            }
            b'\r' => {
                i += 1;
                if bytes.get(i) == Some(&b'\n') {
                    i += 1;
                }
                lines.push(&text[start..i]);
                start = i;
            }
            _ => i += 1,
        }
    }
    if start < bytes.len() {
        lines.push(&text[start..]);
    }

    lines
}

/// Strip one `\n`, `\r\n` or `\r` from the end of a line
pub fn trim_line_end(line: &str) -> &str {
    line.strip_suffix("\r\n")
        .or_else(|| line.strip_suffix('\n'))
        .or_else(|| line.strip_suffix('\r'))
        .unwrap_or(line)
}
