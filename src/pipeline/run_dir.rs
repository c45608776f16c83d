//! Run directory naming.

use chrono::{DateTime, Local};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Timestamp format used in run directory names.
pub const RUN_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Name for a run of `stem` started at `started`: `<stem>_<YYYYmmdd_HHMMSS>`.
pub fn run_dir_name(stem: &str, started: &DateTime<Local>) -> String {
    format!("{}_{}", sanitize_stem(stem), started.format(RUN_TIMESTAMP_FORMAT))
}

/// Create a fresh run directory under `root`.
///
/// When the name is taken (two runs within the same second), a `_N` suffix
/// is appended. The directory is claimed with a non-recursive create so two
/// concurrent runs never share one.
pub fn create_run_dir(root: &Path, stem: &str, started: &DateTime<Local>) -> io::Result<PathBuf> {
    fs::create_dir_all(root)?;
    let base = run_dir_name(stem, started);

    let mut attempt = 0usize;
    loop {
        let name = if attempt == 0 {
            base.clone()
        } else {
            format!("{}_{}", base, attempt)
        };
        let candidate = root.join(name);
        match fs::create_dir(&candidate) {
            Ok(()) => return Ok(candidate),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => attempt += 1,
            Err(e) => return Err(e),
        }
    }
}

fn sanitize_stem(stem: &str) -> String {
    let cleaned: String = stem
        .chars()
        .map(|c| {
            if c == '/' || c == '\\' || c.is_control() {
                '_'
            } else {
                c
            }
        })
        .collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        "document".to_string()
    } else {
        cleaned.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap()
    }

    #[test]
    fn test_run_dir_name() {
        assert_eq!(run_dir_name("verbale", &fixed()), "verbale_20240309_140507");
        assert_eq!(run_dir_name("  ", &fixed()), "document_20240309_140507");
        assert_eq!(run_dir_name("a/b", &fixed()), "a_b_20240309_140507");
    }

    #[test]
    fn test_collision_gets_suffix() {
        let root = tempfile::tempdir().unwrap();
        let first = create_run_dir(root.path(), "doc", &fixed()).unwrap();
        let second = create_run_dir(root.path(), "doc", &fixed()).unwrap();
        let third = create_run_dir(root.path(), "doc", &fixed()).unwrap();

        assert!(first.ends_with("doc_20240309_140507"));
        assert!(second.ends_with("doc_20240309_140507_1"));
        assert!(third.ends_with("doc_20240309_140507_2"));
    }
}
