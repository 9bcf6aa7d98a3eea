//! Candidate document discovery.

use std::path::{Path, PathBuf};

use glob::Pattern;
use walkdir::WalkDir;

use crate::error::Result;
use crate::models::config::ScanConfig;

/// Whether the file name of `path` ends in `.<extension>`.
///
/// Case-sensitive, like the listing pattern used by [`list_documents`].
pub fn has_extension(path: &Path, extension: &str) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .and_then(|name| name.strip_suffix(extension))
        .is_some_and(|stem| stem.ends_with('.'))
}

/// Recursively walk `root` for candidate documents.
///
/// Entries are visited in file-name order so repeated runs see the same
/// sequence. Symlinks to regular files are always listed; `follow_links`
/// only controls descending into linked directories.
pub fn walk_documents<'a>(
    root: &Path,
    options: &'a ScanConfig,
) -> impl Iterator<Item = Result<PathBuf>> + 'a {
    WalkDir::new(root)
        .follow_links(options.follow_links)
        .sort_by_file_name()
        .into_iter()
        .filter_map(move |entry| match entry {
            Ok(entry) => (is_file_entry(&entry)
                && has_extension(entry.path(), &options.extension))
            .then(|| Ok(entry.into_path())),
            Err(e) => Some(Err(e.into())),
        })
}

fn is_file_entry(entry: &walkdir::DirEntry) -> bool {
    entry.file_type().is_file() || (entry.path_is_symlink() && entry.path().is_file())
}

/// List candidate documents directly inside `dir`.
pub fn list_documents(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let pattern = format!(
        "{}/*.{}",
        Pattern::escape(&dir.to_string_lossy()),
        Pattern::escape(extension)
    );
    let mut files = Vec::new();
    for entry in glob::glob(&pattern)? {
        let path = entry.map_err(glob::GlobError::into_error)?;
        if path.is_file() {
            files.push(path);
        }
    }
    Ok(files)
}
