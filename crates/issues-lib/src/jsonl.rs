//! JSONL file I/O for project documents.
//!
//! Each line in the JSONL file is a complete Project with its embedded
//! issue array, matching the persisted layout of the store: one
//! collection of Project documents, no separate issue collection.

use std::fs;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use crate::error::{Error, Result};
use crate::model::Project;

/// Load projects from a JSONL file.
///
/// Blank lines are skipped. Issue order within each project is the
/// order in the file.
///
/// # Errors
///
/// Returns `FileNotFound` or `Io` if the file cannot be read, or
/// `JsonlParse` if any line is invalid.
pub fn load(path: &Path) -> Result<Vec<Project>> {
    let file = fs::File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::FileNotFound(path.to_path_buf())
        } else {
            Error::Io(e)
        }
    })?;
    let reader = BufReader::new(file);

    let mut projects = Vec::new();
    for (line_num, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let project: Project = serde_json::from_str(trimmed).map_err(|e| Error::JsonlParse {
            line: line_num + 1,
            reason: e.to_string(),
        })?;
        projects.push(project);
    }

    Ok(projects)
}

/// Save projects to a JSONL file with atomic write.
///
/// Uses write-to-temp + rename so a crash mid-save never leaves a
/// truncated file behind.
///
/// # Errors
///
/// Returns `Io` if the file cannot be written.
pub fn save(path: &Path, projects: &[Project]) -> Result<()> {
    let tmp_path = path.with_extension("jsonl.tmp");
    let mut file = fs::File::create(&tmp_path)?;

    for project in projects {
        let json = serde_json::to_string(project)?;
        writeln!(file, "{json}")?;
    }

    file.flush()?;
    drop(file);

    fs::rename(&tmp_path, path)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Issue;
    use chrono::Utc;

    fn sample_project() -> Project {
        let now = Utc::now();
        Project {
            name: "apitest".to_string(),
            issues: vec![Issue {
                id: "it-abc1".to_string(),
                issue_title: "Test issue".to_string(),
                issue_text: "Body".to_string(),
                created_on: now,
                updated_on: now,
                created_by: "alice".to_string(),
                assigned_to: String::new(),
                open: true,
                status_text: String::new(),
            }],
        }
    }

    #[test]
    fn test_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("projects.jsonl");

        save(&path, &[sample_project()]).unwrap();

        let loaded = load(&path).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].name, "apitest");
        assert_eq!(loaded[0].issues.len(), 1);
        assert_eq!(loaded[0].issues[0].id, "it-abc1");
    }

    #[test]
    fn test_load_missing_file() {
        let result = load(Path::new("/nonexistent/projects.jsonl"));
        assert!(matches!(result, Err(Error::FileNotFound(_))));
    }

    #[test]
    fn test_load_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.jsonl");
        fs::write(&path, "").unwrap();

        let loaded = load(&path).unwrap();
        assert!(loaded.is_empty());
    }

    #[test]
    fn test_load_skips_blank_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blanks.jsonl");
        let json = serde_json::to_string(&sample_project()).unwrap();
        fs::write(&path, format!("\n{json}\n\n")).unwrap();

        let loaded = load(&path).unwrap();
        assert_eq!(loaded.len(), 1);
    }

    #[test]
    fn test_load_reports_bad_line_number() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.jsonl");
        let json = serde_json::to_string(&sample_project()).unwrap();
        fs::write(&path, format!("{json}\nnot json\n")).unwrap();

        match load(&path) {
            Err(Error::JsonlParse { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected JsonlParse, got {other:?}"),
        }
    }
}
