//! File composition extractor

use crate::models::{FileAnalysis, LargeFile, TreeEntry, NO_EXTENSION};
use indexmap::IndexMap;

/// Number of entries kept in `largest_files`
pub const LARGEST_FILES_LIMIT: usize = 10;

/// Extension bucket for a path: the text after the last `.`.
///
/// Directory dots count (`a.d/Makefile` buckets as `d/Makefile`), which keeps
/// the grouping consistent with how the dashboard has always reported it.
pub fn extension_of(path: &str) -> &str {
    match path.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() => ext,
        _ => NO_EXTENSION,
    }
}

pub fn analyze_files(entries: &[TreeEntry]) -> FileAnalysis {
    let blobs: Vec<&TreeEntry> = entries.iter().filter(|e| e.is_blob()).collect();

    let mut files_by_extension: IndexMap<String, usize> = IndexMap::new();
    for blob in &blobs {
        *files_by_extension
            .entry(extension_of(&blob.path).to_string())
            .or_insert(0) += 1;
    }

    let mut sized: Vec<LargeFile> = blobs
        .iter()
        .filter_map(|b| match b.size {
            Some(size) if size > 0 => Some(LargeFile {
                path: b.path.clone(),
                size,
            }),
            _ => None,
        })
        .collect();
    // Stable: equal sizes keep tree order
    sized.sort_by(|a, b| b.size.cmp(&a.size));
    sized.truncate(LARGEST_FILES_LIMIT);

    FileAnalysis {
        total_files: blobs.len(),
        files_by_extension,
        total_lines: 0,
        largest_files: sized,
    }
}
