//! Topic discovery - scanning a directory for deck files.

use std::fs;
use std::path::{Path, PathBuf};

use super::Topic;
use super::deck::TopicFile;

/// Load every `*.json` deck in `dir`, sorted by file name.
///
/// Unreadable or invalid files are logged and skipped so one bad deck does
/// not hide the rest of the curriculum.
pub fn scan_topic_directory(dir: &Path) -> Vec<Topic> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!("Content directory {} not readable: {}", dir.display(), e);
            return Vec::new();
        }
    };

    let mut paths: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    paths.sort();

    let mut topics = Vec::with_capacity(paths.len());
    for path in paths {
        match TopicFile::load(&path) {
            Ok(file) => topics.push(file.into_topic()),
            Err(e) => tracing::warn!("Invalid topic deck: {}", e),
        }
    }
    topics
}
