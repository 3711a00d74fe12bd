//! Workspace listing - flatten a directory tree into `RepositoryFiles`

use anyhow::{Context, Result};
use plc_lint_core::RepositoryFiles;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

/// Entries never listed, matched against the first path component
const IGNORED: &[&str] = &[".git"];

/// Slash-separated path of `path` relative to `root`
fn relative_path(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    (!parts.is_empty()).then(|| parts.join("/"))
}

/// Every file and directory below `root`. Directories carry a trailing `/`;
/// file contents that are not UTF-8 are decoded lossily.
pub fn list_files(root: &Path) -> Result<RepositoryFiles> {
    let mut files = RepositoryFiles::new();

    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            entry.depth() != 1 || !IGNORED.iter().any(|name| entry.file_name() == *name)
        });

    for entry in walker {
        let entry = entry.with_context(|| format!("Failed to walk {}", root.display()))?;
        let Some(path) = relative_path(root, entry.path()) else {
            continue;
        };

        if entry.file_type().is_dir() {
            files.insert_directory(path);
        } else if entry.file_type().is_file() {
            let bytes = fs::read(entry.path())
                .with_context(|| format!("Failed to read {}", entry.path().display()))?;
            files.insert_file(path, String::from_utf8_lossy(&bytes).into_owned());
        }
    }

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lists_files_and_directories() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("app")).unwrap();
        fs::create_dir_all(dir.path().join(".github/workflows")).unwrap();
        fs::write(dir.path().join("README.md"), "# Title\n").unwrap();
        fs::write(dir.path().join(".github/workflows/release.yml"), "on: push\n").unwrap();

        let files = list_files(dir.path()).unwrap();
        assert!(files.is_directory("app/"));
        assert!(files.is_directory(".github/"));
        assert!(files.is_directory(".github/workflows/"));
        assert_eq!(files.file("README.md"), Some("# Title\n"));
        assert_eq!(files.file(".github/workflows/release.yml"), Some("on: push\n"));
    }

    #[test]
    fn test_skips_git_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join(".git/objects")).unwrap();
        fs::write(dir.path().join(".git/HEAD"), "ref: refs/heads/main\n").unwrap();
        fs::write(dir.path().join(".gitignore"), "target\n").unwrap();

        let files = list_files(dir.path()).unwrap();
        assert_eq!(files.paths().collect::<Vec<_>>(), vec![".gitignore"]);
    }

    #[test]
    fn test_invalid_utf8_read_lossily() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("blob.bin"), [0x66, 0xff, 0x6f]).unwrap();

        let files = list_files(dir.path()).unwrap();
        assert_eq!(files.file("blob.bin"), Some("f\u{fffd}o"));
    }
}
