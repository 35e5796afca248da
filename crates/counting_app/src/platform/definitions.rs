use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use counting_core::Task;
use engine_logging::engine_info;

const EMBEDDED_TASKS: &str = include_str!("../../tasks.ron");
const EMBEDDED_ORIGIN: &str = "built-in task list";

#[derive(Debug, thiserror::Error)]
pub enum DefinitionError {
    #[error("failed to read task definitions from {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse task definitions from {origin}: {message}")]
    Parse { origin: String, message: String },
    #[error("{origin} contains no tasks")]
    Empty { origin: String },
    #[error("{origin} defines task {id} more than once")]
    DuplicateId { origin: String, id: u64 },
}

/// Loads definitions from `path`, or the built-in set when no path is given.
pub fn load(path: Option<&Path>) -> Result<Vec<Task>, DefinitionError> {
    let tasks = match path {
        Some(path) => {
            let content = fs::read_to_string(path).map_err(|source| DefinitionError::Read {
                path: path.to_path_buf(),
                source,
            })?;
            parse(&content, &path.display().to_string())?
        }
        None => parse(EMBEDDED_TASKS, EMBEDDED_ORIGIN)?,
    };
    engine_info!(
        "Loaded {} task definition(s) from {}",
        tasks.len(),
        path.map_or_else(|| EMBEDDED_ORIGIN.to_string(), |p| p.display().to_string())
    );
    Ok(tasks)
}

fn parse(content: &str, origin: &str) -> Result<Vec<Task>, DefinitionError> {
    let tasks: Vec<Task> = ron::from_str(content).map_err(|err| DefinitionError::Parse {
        origin: origin.to_string(),
        message: err.to_string(),
    })?;
    if tasks.is_empty() {
        return Err(DefinitionError::Empty {
            origin: origin.to_string(),
        });
    }

    let mut seen = HashSet::new();
    if let Some(task) = tasks.iter().find(|task| !seen.insert(task.id)) {
        return Err(DefinitionError::DuplicateId {
            origin: origin.to_string(),
            id: task.id,
        });
    }
    Ok(tasks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use counting_core::{ExtractSpec, Reduce};

    #[test]
    fn built_in_tasks_count_from_one() {
        let tasks = load(None).unwrap();
        let ids: Vec<_> = tasks.iter().map(|task| task.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
        assert_eq!(
            tasks[3].extract,
            ExtractSpec::text(".PopUpActions-textPicker > input")
                .attribute("placeholder")
                .reduce(Reduce::WordCount)
        );
    }

    #[test]
    fn definitions_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.ron");
        fs::write(
            &path,
            r#"[(id: 7, url: "https://example.com", extract: (selector: "p", index: 1))]"#,
        )
        .unwrap();

        let tasks = load(Some(&path)).unwrap();
        assert_eq!(
            tasks,
            vec![Task::new(7, "https://example.com", ExtractSpec::text("p").nth(1))]
        );
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(Some(&dir.path().join("absent.ron"))).unwrap_err();
        assert!(matches!(err, DefinitionError::Read { .. }));
    }

    #[test]
    fn malformed_and_empty_files_are_rejected() {
        assert!(matches!(
            parse("[(id: 1)]", "test").unwrap_err(),
            DefinitionError::Parse { .. }
        ));
        assert!(matches!(
            parse("[]", "test").unwrap_err(),
            DefinitionError::Empty { .. }
        ));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let content = r#"[
            (id: 1, url: "https://a.example.com", extract: (selector: "p")),
            (id: 1, url: "https://b.example.com", extract: (selector: "p")),
        ]"#;
        assert!(matches!(
            parse(content, "test").unwrap_err(),
            DefinitionError::DuplicateId { id: 1, .. }
        ));
    }
}
