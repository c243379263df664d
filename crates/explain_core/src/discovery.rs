//! Source discovery: recursive walk of the run root for candidate files.
//!
//! Order is deterministic. Within a directory, files come before
//! subdirectories and both are sorted by name.

use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use crate::config::RunConfig;
use crate::error::Result;

/// A candidate file found under the run root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Path on disk (root joined with the relative path)
    pub path: PathBuf,
    /// Path relative to the root with `/` separators, used in prompts and the report
    pub display_name: String,
}

impl SourceFile {
    fn new(root: &Path, path: &Path) -> Self {
        let relative = path.strip_prefix(root).unwrap_or(path);
        let display_name = relative
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("/");
        Self {
            path: path.to_path_buf(),
            display_name,
        }
    }
}

/// Walk `config.root` and return every candidate file in traversal order.
pub fn discover(config: &RunConfig) -> Result<Vec<SourceFile>> {
    config.validate()?;

    let excluded: Vec<PathBuf> = config.excluded.iter().map(|p| resolve(p)).collect();

    let walker = WalkDir::new(&config.root)
        .follow_links(false)
        .sort_by(|a, b| {
            a.file_type()
                .is_dir()
                .cmp(&b.file_type().is_dir())
                .then_with(|| a.file_name().cmp(b.file_name()))
        })
        .into_iter()
        .filter_entry(|entry| !is_skipped_dir(entry, &config.skip_markers));

    let mut files = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                tracing::warn!(error = %err, "skipping unreadable path");
                continue;
            }
        };

        if !is_regular_or_linked_file(&entry) || !has_extension(entry.path(), &config.extensions) {
            continue;
        }

        if !excluded.is_empty() && excluded.contains(&resolve(entry.path())) {
            tracing::debug!(path = %entry.path().display(), "excluded from analysis");
            continue;
        }

        files.push(SourceFile::new(&config.root, entry.path()));
    }

    tracing::debug!(root = %config.root.display(), count = files.len(), "discovery finished");
    Ok(files)
}

fn is_skipped_dir(entry: &DirEntry, markers: &[String]) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    markers.iter().any(|marker| name.contains(marker.as_str()))
}

/// Symlinked directories are not descended, but a link to a file is a candidate.
fn is_regular_or_linked_file(entry: &DirEntry) -> bool {
    entry.file_type().is_file() || (entry.path_is_symlink() && entry.path().is_file())
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(OsStr::to_str)
        .is_some_and(|ext| extensions.iter().any(|e| e == ext))
}

/// Canonical form of `path` for comparison. Files that do not exist yet
/// (e.g. the report before its first write) resolve through their parent.
fn resolve(path: &Path) -> PathBuf {
    if let Ok(canonical) = path.canonicalize() {
        return canonical;
    }
    match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) => {
            let parent = if parent.as_os_str().is_empty() {
                Path::new(".")
            } else {
                parent
            };
            parent
                .canonicalize()
                .map(|p| p.join(name))
                .unwrap_or_else(|_| path.to_path_buf())
        }
        _ => path.to_path_buf(),
    }
}
