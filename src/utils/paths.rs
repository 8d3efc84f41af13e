use std::path::{Path, PathBuf};

/// Expand the tilde in a path to the home directory
pub fn expand_tilde(path: impl AsRef<Path>) -> PathBuf {
    let path_str = path.as_ref().to_string_lossy();

    match path_str.strip_prefix("~/") {
        Some(rest) => {
            let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
            home.join(rest)
        }
        None => path.as_ref().to_path_buf(),
    }
}

/// Resolve `path` against `base` unless it is already absolute
pub fn resolve_against(base: impl AsRef<Path>, path: impl AsRef<Path>) -> PathBuf {
    let expanded = expand_tilde(path);
    if expanded.is_absolute() {
        expanded
    } else {
        base.as_ref().join(expanded)
    }
}
