//! Intake of user-selected paths: extension filtering, set semantics and
//! directory expansion.

use anyhow::Context;
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Accepts paths whose name ends with one of the configured extensions.
#[derive(Debug, Clone)]
pub struct VideoFilter {
    set: GlobSet,
}

impl VideoFilter {
    pub fn new(extensions: &[String]) -> anyhow::Result<Self> {
        let mut builder = GlobSetBuilder::new();
        for ext in extensions {
            let ext = ext.trim().trim_start_matches('.');
            if ext.is_empty() {
                continue;
            }
            let glob = Glob::new(&format!("*.{}", ext))
                .with_context(|| format!("invalid video extension '{}'", ext))?;
            builder.add(glob);
        }
        Ok(Self {
            set: builder.build()?,
        })
    }

    pub fn is_video(&self, path: &str) -> bool {
        self.set.is_match(path)
    }
}

impl Default for VideoFilter {
    fn default() -> Self {
        let mut builder = GlobSetBuilder::new();
        if let Ok(glob) = Glob::new("*.mp4") {
            builder.add(glob);
        }
        Self {
            set: builder.build().unwrap_or_else(|_| GlobSet::empty()),
        }
    }
}

/// Appends `incoming` to `existing`, keeping first-occurrence order and
/// dropping duplicates on both sides. Returns how many paths were new.
pub fn merge_unique(existing: &mut Vec<String>, incoming: impl IntoIterator<Item = String>) -> usize {
    let mut seen: HashSet<String> = HashSet::with_capacity(existing.len());
    existing.retain(|p| seen.insert(p.clone()));
    let before = existing.len();
    for path in incoming {
        if seen.insert(path.clone()) {
            existing.push(path);
        }
    }
    existing.len() - before
}

/// Expands user inputs into candidate video paths.
///
/// Files are kept as given (made absolute when possible). Directories are
/// walked recursively in file-name order and only matching files are kept.
pub fn expand_inputs(inputs: &[PathBuf], filter: &VideoFilter) -> Vec<String> {
    let mut out = Vec::new();
    for input in inputs {
        if input.is_dir() {
            for entry in WalkDir::new(input)
                .follow_links(true)
                .sort_by_file_name()
                .into_iter()
                .filter_map(Result::ok)
            {
                if !entry.file_type().is_file() {
                    continue;
                }
                let path = absolute(entry.path());
                if filter.is_video(&path) {
                    out.push(path);
                }
            }
        } else {
            out.push(absolute(input));
        }
    }
    out
}

fn absolute(path: &Path) -> String {
    std::fs::canonicalize(path)
        .unwrap_or_else(|_| path.to_path_buf())
        .to_string_lossy()
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_is_case_sensitive_mp4_suffix() {
        let filter = VideoFilter::default();
        assert!(filter.is_video("/footage/a.mp4"));
        assert!(filter.is_video("relative/dir/b.mp4"));
        assert!(!filter.is_video("/footage/a.MP4"));
        assert!(!filter.is_video("/footage/a.mov"));
        assert!(!filter.is_video("/footage/mp4"));
    }

    #[test]
    fn configured_extensions_accept_leading_dots() {
        let filter = VideoFilter::new(&[".mov".to_string(), "mp4".to_string()]).unwrap();
        assert!(filter.is_video("/a.mov"));
        assert!(filter.is_video("/a.mp4"));
        assert!(!filter.is_video("/a.avi"));
    }

    #[test]
    fn merge_keeps_first_occurrence_order() {
        let mut existing = vec!["/c.mp4".to_string()];
        let added = merge_unique(
            &mut existing,
            ["/a.mp4", "/a.mp4", "/b.mp4", "/c.mp4"].map(String::from),
        );
        assert_eq!(added, 2);
        assert_eq!(existing, vec!["/c.mp4", "/a.mp4", "/b.mp4"]);
    }

    #[test]
    fn expand_walks_directories_and_keeps_files() {
        let temp = tempfile::tempdir().unwrap();
        let nested = temp.path().join("day1");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(nested.join("b.mp4"), b"x").unwrap();
        std::fs::write(nested.join("a.mp4"), b"x").unwrap();
        std::fs::write(nested.join("notes.txt"), b"x").unwrap();
        let loose = temp.path().join("loose.mov");
        std::fs::write(&loose, b"x").unwrap();

        let found = expand_inputs(
            &[temp.path().to_path_buf(), loose.clone()],
            &VideoFilter::default(),
        );
        let names: Vec<String> = found
            .iter()
            .map(|p| Path::new(p).file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        // Explicit files pass through unfiltered; the registry filters later.
        assert_eq!(names, vec!["a.mp4", "b.mp4", "loose.mov"]);
        assert!(found.iter().all(|p| Path::new(p).is_absolute()));
    }
}
