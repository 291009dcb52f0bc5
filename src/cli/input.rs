//! Input path resolution for CLI commands
//!
//! Arguments are taken literally unless they contain glob metacharacters, in
//! which case they are expanded and sorted. A literal path that does not exist
//! is passed through so the command reports it with file context.

use anyhow::{Context, Result, bail};
use std::path::PathBuf;
use tracing::debug;

/// Expand `patterns` into file paths, keeping argument order
pub fn expand_inputs(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();

    for pattern in patterns {
        if !is_glob(pattern) {
            paths.push(PathBuf::from(pattern));
            continue;
        }

        let mut matched = glob::glob(pattern)
            .with_context(|| format!("Invalid glob pattern '{}'", pattern))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .with_context(|| format!("Failed to expand '{}'", pattern))?;
        matched.retain(|path| path.is_file());

        if matched.is_empty() {
            bail!("No files match '{}'", pattern);
        }

        matched.sort();
        debug!("Pattern '{}' matched {} files", pattern, matched.len());
        paths.extend(matched);
    }

    Ok(paths)
}

fn is_glob(pattern: &str) -> bool {
    pattern.contains(['*', '?', '['])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_literal_paths_pass_through() {
        let inputs = vec!["missing.csv".to_string(), "b.csv".to_string()];
        assert_eq!(
            expand_inputs(&inputs).unwrap(),
            vec![PathBuf::from("missing.csv"), PathBuf::from("b.csv")]
        );
    }

    #[test]
    fn test_glob_is_expanded_and_sorted() {
        let temp_dir = TempDir::new().unwrap();
        for name in ["c.csv", "a.csv", "b.csv", "notes.txt"] {
            fs::write(temp_dir.path().join(name), "x\n").unwrap();
        }
        fs::create_dir(temp_dir.path().join("dir.csv")).unwrap();

        let pattern = format!("{}/*.csv", temp_dir.path().display());
        let paths = expand_inputs(&[pattern]).unwrap();

        let names: Vec<_> = paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.csv", "b.csv", "c.csv"]);
    }

    #[test]
    fn test_glob_without_matches_fails() {
        let temp_dir = TempDir::new().unwrap();
        let pattern = format!("{}/*.csv", temp_dir.path().display());

        let err = expand_inputs(&[pattern]).unwrap_err();
        assert!(err.to_string().starts_with("No files match"));
    }
}
