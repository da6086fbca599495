// SPDX-License-Identifier: PMPL-1.0-or-later

//! English template loading.
//!
//! Templates are returned as raw text. Nothing here understands HTML; every
//! later stage works on exact byte sequences.

use crate::error::TemplateError;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Read a template as UTF-8, dropping a leading byte-order mark.
pub fn load(path: &Path) -> Result<String, TemplateError> {
    let bytes = fs::read(path).map_err(|source| {
        if source.kind() == ErrorKind::NotFound {
            TemplateError::NotFound(path.to_path_buf())
        } else {
            TemplateError::Read {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;
    decode(&bytes).ok_or_else(|| TemplateError::Encoding(path.to_path_buf()))
}

/// Strict UTF-8 decode; any malformed sequence rejects the whole input.
pub fn decode(bytes: &[u8]) -> Option<String> {
    let (text, had_errors) = encoding_rs::UTF_8.decode_with_bom_removal(bytes);
    if had_errors {
        None
    } else {
        Some(text.into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn loads_plain_utf8() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("index.html");
        fs::write(&path, "<p>Choose your station…</p>").unwrap();
        assert_eq!(load(&path).unwrap(), "<p>Choose your station…</p>");
    }

    #[test]
    fn strips_byte_order_mark() {
        assert_eq!(decode(b"\xEF\xBB\xBF<html>").as_deref(), Some("<html>"));
    }

    #[test]
    fn rejects_invalid_utf8() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.html");
        fs::write(&path, b"<p>\xFF\xFE</p>").unwrap();
        assert!(matches!(load(&path), Err(TemplateError::Encoding(_))));
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = TempDir::new().unwrap();
        let err = load(&dir.path().join("gone.html")).unwrap_err();
        assert!(matches!(err, TemplateError::NotFound(_)));
    }
}
