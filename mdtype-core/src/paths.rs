use pathdiff::diff_paths;
use std::path::Path;

/// Path of `target` relative to `base`, with forward slashes, as Typst expects it.
///
/// Falls back to `target` itself when no relative path exists (e.g. different prefixes).
pub fn relative_path(target: &Path, base: &Path) -> String {
    let candidate = diff_paths(target, base).unwrap_or_else(|| target.to_path_buf());
    to_forward_slashes(&candidate)
}

fn to_forward_slashes(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
