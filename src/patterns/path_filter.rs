//! Candidate file discovery under the configured include directories
//!
//! Architectural Principle: Service Layer - PathFilter owns every file selection decision
//! - Include directories are walked recursively, missing ones are skipped
//! - Exclusions are plain path fragments, or glob patterns when they carry glob syntax
//! - Paths are matched relative to the checked root with '/' separators

use crate::config::StyleConfig;
use crate::domain::violations::{StyleError, StyleResult};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Selects the files a run checks
#[derive(Debug, Clone)]
pub struct PathFilter {
    include: Vec<String>,
    exclusions: Vec<Exclusion>,
    extensions: HashSet<String>,
}

/// A single exclusion entry
#[derive(Debug, Clone)]
enum Exclusion {
    /// Excludes every path containing the fragment
    Fragment(String),
    /// Excludes every path the glob matches
    Glob(glob::Pattern),
}

impl Exclusion {
    fn parse(entry: &str) -> StyleResult<Self> {
        if entry.contains(['*', '?', '[']) {
            let pattern = glob::Pattern::new(entry)
                .map_err(|e| StyleError::pattern(format!("Invalid pattern '{entry}': {e}")))?;
            Ok(Self::Glob(pattern))
        } else {
            Ok(Self::Fragment(entry.to_string()))
        }
    }

    fn matches(&self, relative: &str) -> bool {
        match self {
            Self::Fragment(fragment) => relative.contains(fragment.as_str()),
            Self::Glob(pattern) => pattern.matches(relative),
        }
    }
}

impl PathFilter {
    /// Create a filter from include directories, exclusion entries and extensions
    pub fn new(
        include: Vec<String>,
        exclude: &[String],
        extensions: Vec<String>,
    ) -> StyleResult<Self> {
        let exclusions = exclude
            .iter()
            .filter(|entry| !entry.is_empty())
            .map(|entry| Exclusion::parse(entry))
            .collect::<StyleResult<Vec<_>>>()?;

        Ok(Self {
            include,
            exclusions,
            extensions: extensions
                .into_iter()
                .map(|ext| ext.trim_start_matches('.').to_string())
                .collect(),
        })
    }

    /// Create the filter described by a configuration
    pub fn from_config(config: &StyleConfig) -> StyleResult<Self> {
        Self::new(config.include.clone(), &config.exclude, config.normalized_extensions())
    }

    /// Whether a path, relative to the root, passes extension and exclusion checks
    pub fn should_analyze<P: AsRef<Path>>(&self, relative: P) -> bool {
        let relative = relative.as_ref();

        let has_extension = relative
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.contains(ext));
        if !has_extension {
            return false;
        }

        let display = relative.to_string_lossy().replace('\\', "/");
        !self.exclusions.iter().any(|exclusion| exclusion.matches(&display))
    }

    /// All files under the include directories of `root` that should be
    /// checked, as absolute paths, without duplicates
    pub fn find_files<P: AsRef<Path>>(&self, root: P) -> StyleResult<Vec<PathBuf>> {
        let root = root.as_ref();
        let mut seen = HashSet::new();
        let mut files = Vec::new();

        for dir in &self.include {
            let base = root.join(dir);
            if !base.is_dir() {
                tracing::debug!("Include directory '{}' does not exist, skipping", base.display());
                continue;
            }

            let walker = WalkDir::new(&base).follow_links(false).sort_by_file_name();
            for entry in walker.into_iter().filter_map(|e| e.ok()) {
                if !entry.file_type().is_file() {
                    continue;
                }

                let path = entry.path();
                let relative = path.strip_prefix(root).unwrap_or(path);
                if self.should_analyze(relative) && seen.insert(path.to_path_buf()) {
                    files.push(path.to_path_buf());
                }
            }
        }

        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigBuilder;
    use std::fs;
    use tempfile::TempDir;

    fn relative_names(root: &Path, files: &[PathBuf]) -> Vec<String> {
        files
            .iter()
            .map(|f| f.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/"))
            .collect()
    }

    #[test]
    fn test_extension_and_fragment_filtering() {
        let filter = PathFilter::from_config(&StyleConfig::default()).unwrap();

        assert!(filter.should_analyze("src/main.cpp"));
        assert!(filter.should_analyze("include/api.h"));
        assert!(!filter.should_analyze("src/readme.md"));
        assert!(!filter.should_analyze("src/noext"));
        assert!(!filter.should_analyze("src/third_party/lib.c"));
        assert!(!filter.should_analyze("src/build/gen.c"));
    }

    #[test]
    fn test_glob_exclusions() {
        let config = ConfigBuilder::new().exclude("**/*_generated.*").build().unwrap();
        let filter = PathFilter::from_config(&config).unwrap();

        assert!(!filter.should_analyze("src/proto/msg_generated.h"));
        assert!(filter.should_analyze("src/proto/msg.h"));
    }

    #[test]
    fn test_invalid_glob_rejected() {
        let result = PathFilter::new(vec![], &["[oops".to_string()], vec!["c".to_string()]);
        assert!(result.unwrap_err().is_configuration());
    }

    #[test]
    fn test_find_files_walks_include_dirs_in_order() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::create_dir_all(root.join("src/core")).unwrap();
        fs::create_dir_all(root.join("src/vendor")).unwrap();
        fs::create_dir_all(root.join("include")).unwrap();
        fs::create_dir_all(root.join("docs")).unwrap();

        fs::write(root.join("src/b.cpp"), "").unwrap();
        fs::write(root.join("src/a.c"), "").unwrap();
        fs::write(root.join("src/core/z.hpp"), "").unwrap();
        fs::write(root.join("src/vendor/x.c"), "").unwrap();
        fs::write(root.join("src/notes.txt"), "").unwrap();
        fs::write(root.join("include/api.h"), "").unwrap();
        fs::write(root.join("docs/example.c"), "").unwrap();

        let filter = PathFilter::from_config(&StyleConfig::default()).unwrap();
        let files = filter.find_files(root).unwrap();

        assert_eq!(
            relative_names(root, &files),
            vec!["src/a.c", "src/b.cpp", "src/core/z.hpp", "include/api.h"]
        );
    }

    #[test]
    fn test_overlapping_include_dirs_deduplicated() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("src/sub")).unwrap();
        fs::write(root.join("src/sub/a.c"), "").unwrap();

        let config = ConfigBuilder::new().include_dirs(["src", "src/sub", "missing"]).build().unwrap();
        let filter = PathFilter::from_config(&config).unwrap();

        assert_eq!(filter.find_files(root).unwrap().len(), 1);
    }
}
