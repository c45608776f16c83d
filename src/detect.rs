//! Input detection for document-model files.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

/// File extensions accepted as document models.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["json"];

/// Number of leading bytes inspected when sniffing content.
const SNIFF_LEN: usize = 64;

/// Check if a path has a supported extension.
pub fn has_supported_extension<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref()
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            let ext = ext.to_ascii_lowercase();
            SUPPORTED_EXTENSIONS.iter().any(|s| *s == ext)
        })
}

/// Check if bytes look like a JSON object (after a BOM and whitespace).
pub fn looks_like_model_bytes(data: &[u8]) -> bool {
    let data = data.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(data);
    data.iter()
        .find(|b| !b.is_ascii_whitespace())
        .is_some_and(|b| *b == b'{')
}

/// Check if a file is a supported document model.
///
/// The extension must match and the content must open a JSON object.
pub fn is_supported_file<P: AsRef<Path>>(path: P) -> bool {
    let path = path.as_ref();
    if !path.is_file() || !has_supported_extension(path) {
        return false;
    }
    let Ok(file) = File::open(path) else {
        return false;
    };
    let mut header = Vec::with_capacity(SNIFF_LEN);
    match BufReader::new(file).take(SNIFF_LEN as u64).read_to_end(&mut header) {
        Ok(_) => looks_like_model_bytes(&header),
        Err(_) => false,
    }
}

/// Resolve an input path to the model files it names.
///
/// A file resolves to itself; a directory to its supported files, sorted by
/// name and without descending into subdirectories.
pub fn collect_inputs<P: AsRef<Path>>(input: P) -> Result<Vec<PathBuf>> {
    let input = input.as_ref();
    if !input.exists() {
        return Err(Error::InputNotFound(input.to_path_buf()));
    }

    if input.is_file() {
        if !is_supported_file(input) {
            return Err(Error::UnsupportedInput(input.to_path_buf()));
        }
        return Ok(vec![input.to_path_buf()]);
    }

    let mut files = Vec::new();
    for entry in std::fs::read_dir(input)? {
        let path = entry?.path();
        if is_supported_file(&path) {
            files.push(path);
        } else if path.is_file() {
            log::debug!("Skipping unsupported file {}", path.display());
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_extension() {
        assert!(has_supported_extension("model.json"));
        assert!(has_supported_extension("MODEL.JSON"));
        assert!(!has_supported_extension("scan.pdf"));
        assert!(!has_supported_extension("noext"));
    }

    #[test]
    fn test_sniff_bytes() {
        assert!(looks_like_model_bytes(b"  \n{\"items\": []}"));
        assert!(looks_like_model_bytes(b"\xEF\xBB\xBF{}"));
        assert!(!looks_like_model_bytes(b"[1, 2]"));
        assert!(!looks_like_model_bytes(b""));
    }

    #[test]
    fn test_collect_inputs_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.json"), "{}").unwrap();
        fs::write(dir.path().join("a.json"), "{}").unwrap();
        fs::write(dir.path().join("list.json"), "[]").unwrap();
        fs::write(dir.path().join("notes.txt"), "{}").unwrap();
        fs::create_dir(dir.path().join("nested.json")).unwrap();

        let files = collect_inputs(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.json", "b.json"]);
    }

    #[test]
    fn test_collect_inputs_errors() {
        assert!(matches!(
            collect_inputs("/no/such/input"),
            Err(Error::InputNotFound(_))
        ));

        let dir = tempfile::tempdir().unwrap();
        let pdf = dir.path().join("scan.pdf");
        fs::write(&pdf, b"%PDF-1.7").unwrap();
        assert!(matches!(collect_inputs(&pdf), Err(Error::UnsupportedInput(_))));
    }
}
