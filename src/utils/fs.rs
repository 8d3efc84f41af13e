use glob::glob;
use sha2::{Digest, Sha256};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::error::{map_io_err, SpliceError, SpliceResult};

/// Read a file's contents as UTF-8 text
pub fn read_file_to_string(path: impl AsRef<Path>) -> SpliceResult<String> {
    let path = path.as_ref();
    debug!("Reading file: {}", path.display());

    if !path.exists() {
        return Err(SpliceError::file_not_found(path));
    }
    if !path.is_file() {
        return Err(SpliceError::invalid_path(path.display().to_string()));
    }

    fs::read_to_string(path).map_err(map_io_err(path))
}

/// Write `content` to `path` through a temporary file in the same directory.
///
/// When `expected_hash` is given, the current file must still hash to it right
/// before the temporary file replaces it.
pub fn write_file_atomic(
    path: impl AsRef<Path>,
    content: &str,
    expected_hash: Option<&str>,
) -> SpliceResult<()> {
    let path = path.as_ref();
    debug!("Writing file atomically: {}", path.display());

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let mut temp_file = NamedTempFile::new_in(&parent).map_err(map_io_err(&parent))?;
    temp_file
        .write_all(content.as_bytes())
        .map_err(map_io_err(temp_file.path()))?;
    temp_file
        .as_file()
        .sync_all()
        .map_err(map_io_err(temp_file.path()))?;

    // Keep the original permissions, the temp file is created 0600
    if let Ok(metadata) = fs::metadata(path) {
        fs::set_permissions(temp_file.path(), metadata.permissions())
            .map_err(map_io_err(temp_file.path()))?;
    }

    if let Some(expected) = expected_hash {
        let current = calculate_file_hash(path)?;
        if current != expected {
            warn!(
                "File hash changed between read and write: {}",
                path.display()
            );
            return Err(SpliceError::ConcurrentModification {
                path: path.to_path_buf(),
            });
        }
    }

    temp_file
        .persist(path)
        .map_err(|e| SpliceError::io_error(e.error, Some(path)))?;

    debug!("Wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}

/// Copy `path` next to itself as `<name>.<timestamp>.bak`
pub fn backup_file(path: impl AsRef<Path>) -> SpliceResult<PathBuf> {
    let path = path.as_ref();
    let file_name = path
        .file_name()
        .ok_or_else(|| SpliceError::invalid_path(path.display().to_string()))?;

    let timestamp = chrono::Local::now().format("%Y%m%d%H%M%S");
    let backup_name = format!("{}.{}.bak", file_name.to_string_lossy(), timestamp);
    let backup_path = path.with_file_name(backup_name);

    fs::copy(path, &backup_path).map_err(map_io_err(&backup_path))?;
    debug!("Backed up {} to {}", path.display(), backup_path.display());

    Ok(backup_path)
}

/// Calculate a hash for file content
pub fn calculate_file_hash(path: impl AsRef<Path>) -> SpliceResult<String> {
    let path = path.as_ref();
    let content = fs::read(path).map_err(map_io_err(path))?;

    let mut hasher = Sha256::new();
    hasher.update(&content);
    Ok(format!("{:x}", hasher.finalize()))
}

/// Calculate a hash for a string
pub fn calculate_string_hash(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Find files matching a glob pattern
pub fn find_files(pattern: &str) -> SpliceResult<Vec<PathBuf>> {
    debug!("Finding files matching pattern: {}", pattern);

    let mut paths = glob(pattern)?
        .filter_map(Result::ok)
        .filter(|p| p.is_file())
        .collect::<Vec<_>>();
    paths.sort();

    debug!("Found {} files matching pattern", paths.len());
    Ok(paths)
}

/// Whether a path contains glob metacharacters
pub fn is_glob_pattern(path: &str) -> bool {
    path.contains(['*', '?', '['])
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_read_missing_file() {
        let dir = tempdir().unwrap();
        let result = read_file_to_string(dir.path().join("nope.ts"));
        assert!(matches!(result, Err(SpliceError::FileNotFound { .. })));
    }

    #[test]
    fn test_read_directory_is_invalid() {
        let dir = tempdir().unwrap();
        let result = read_file_to_string(dir.path());
        assert!(matches!(result, Err(SpliceError::InvalidPath { .. })));
    }

    #[test]
    fn test_atomic_write_roundtrip() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("test.txt");
        fs::write(&file_path, "old").unwrap();

        let hash = calculate_file_hash(&file_path).unwrap();
        write_file_atomic(&file_path, "Hello, world!", Some(&hash)).unwrap();

        assert_eq!(read_file_to_string(&file_path).unwrap(), "Hello, world!");
        // No temp files left behind
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_atomic_write_keeps_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let file_path = dir.path().join("script.ts");
        fs::write(&file_path, "old").unwrap();
        fs::set_permissions(&file_path, fs::Permissions::from_mode(0o644)).unwrap();

        write_file_atomic(&file_path, "new", None).unwrap();

        let mode = fs::metadata(&file_path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
        assert_eq!(fs::read_to_string(&file_path).unwrap(), "new");
    }

    #[test]
    fn test_read_non_utf8_is_invalid_data() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("binary.ts");
        fs::write(&file_path, [0xffu8, 0xfe]).unwrap();

        match read_file_to_string(&file_path) {
            Err(SpliceError::Io { source, path }) => {
                assert_eq!(source.kind(), std::io::ErrorKind::InvalidData);
                assert_eq!(path, Some(file_path));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_write_rejected_when_file_changed() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("test.txt");
        fs::write(&file_path, "original").unwrap();
        let hash = calculate_string_hash("original");

        fs::write(&file_path, "someone else").unwrap();
        let result = write_file_atomic(&file_path, "mine", Some(&hash));

        assert!(matches!(
            result,
            Err(SpliceError::ConcurrentModification { .. })
        ));
        assert_eq!(fs::read_to_string(&file_path).unwrap(), "someone else");
    }

    #[test]
    fn test_hashes_agree() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("a.txt");
        fs::write(&file_path, "same bytes").unwrap();
        assert_eq!(
            calculate_file_hash(&file_path).unwrap(),
            calculate_string_hash("same bytes")
        );
    }

    #[test]
    fn test_backup_file() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("api.test.ts");
        fs::write(&file_path, "original").unwrap();

        let backup = backup_file(&file_path).unwrap();
        let name = backup.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("api.test.ts."));
        assert!(name.ends_with(".bak"));
        assert_eq!(fs::read_to_string(backup).unwrap(), "original");
    }

    #[test]
    fn test_find_files() {
        let dir = tempdir().unwrap();

        fs::write(dir.path().join("test1.txt"), "").unwrap();
        fs::write(dir.path().join("test2.txt"), "").unwrap();
        fs::create_dir_all(dir.path().join("subdir")).unwrap();
        fs::write(dir.path().join("subdir").join("test3.txt"), "").unwrap();

        let pattern = dir.path().join("*.txt").to_string_lossy().to_string();
        let files = find_files(&pattern).unwrap();
        assert_eq!(files.len(), 2);

        let pattern = dir.path().join("**/*.txt").to_string_lossy().to_string();
        let files = find_files(&pattern).unwrap();
        assert_eq!(files.len(), 3);
    }

    #[test]
    fn test_is_glob_pattern() {
        assert!(is_glob_pattern("src/**/*.ts"));
        assert!(!is_glob_pattern("src/__tests__/api.test.ts"));
    }
}
