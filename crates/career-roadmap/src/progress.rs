/// Per-career task progress: seeding, point updates, stats, and JSON persistence.
///
/// The progress file is a JSON object keyed by career name. Saving rereads the file,
/// replaces one career's entry and writes the whole object back through a temp file
/// and rename. There is no locking: two processes saving at once can lose one
/// career's update (last writer wins).
use std::io::{ErrorKind, Write};
use std::path::Path;

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use tracing::{debug, info, warn};

use crate::error::AppError;
use crate::model::{PersistedProgress, ProgressMap, ProgressStats, TaskStatus};

#[derive(Debug, thiserror::Error)]
pub enum ProgressReadError {
    #[error("progress file does not exist")]
    Missing,

    #[error("failed to read progress file: {0}")]
    Io(#[from] std::io::Error),

    #[error("progress file is not valid JSON: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Seed a progress map for `tasks`, carrying over saved statuses.
///
/// Saved entries for tasks outside `tasks` are dropped.
pub fn initialize(tasks: &[String], saved: &ProgressMap) -> ProgressMap {
    tasks
        .iter()
        .map(|task| (task.clone(), saved.get(task).copied().unwrap_or_default()))
        .collect()
}

/// Union of `current` and `saved`; a task present in both takes the saved status.
pub fn merge(current: &ProgressMap, saved: &ProgressMap) -> ProgressMap {
    let mut merged = current.clone();
    merged.extend(saved.iter().map(|(task, status)| (task.clone(), *status)));
    merged
}

/// Set one task's status. Any transition is allowed.
pub fn set_status(map: &mut ProgressMap, task: &str, status: TaskStatus) -> Result<(), AppError> {
    let slot = map
        .get_mut(task)
        .ok_or_else(|| AppError::UnknownTask(task.to_string()))?;
    *slot = status;
    Ok(())
}

pub fn compute_stats(map: &ProgressMap) -> ProgressStats {
    let total = map.len();
    let completed = map.values().filter(|s| **s == TaskStatus::Completed).count();
    let in_progress = map.values().filter(|s| **s == TaskStatus::InProgress).count();
    let percent = if total == 0 {
        0.0
    } else {
        100.0 * completed as f64 / total as f64
    };
    ProgressStats {
        total,
        completed,
        in_progress,
        pending: total - completed - in_progress,
        percent,
        all_completed: total > 0 && completed == total,
    }
}

/// Read the whole progress file.
pub fn read_persisted(path: &Path) -> Result<PersistedProgress, ProgressReadError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Err(ProgressReadError::Missing),
        Err(e) => return Err(e.into()),
    };
    Ok(serde_json::from_str(&content)?)
}

/// Best-effort read of the progress file.
///
/// Falls back to an empty mapping when the file is missing, unreadable, or corrupt:
/// losing old progress is preferred over blocking the user.
pub fn load(path: &Path) -> PersistedProgress {
    match read_persisted(path) {
        Ok(progress) => progress,
        Err(ProgressReadError::Missing) => {
            debug!(path = %path.display(), "no progress file yet");
            PersistedProgress::new()
        }
        Err(e) => {
            warn!(error = %e, path = %path.display(), "ignoring unreadable progress file");
            PersistedProgress::new()
        }
    }
}

/// Store `map` as the progress of `career`, keeping every other career's entry.
pub fn save(career: &str, map: &ProgressMap, path: &Path) -> Result<(), AppError> {
    let mut existing = load(path);
    existing.insert(career.to_string(), map.clone());

    let write_error = |source: std::io::Error| AppError::PersistenceWrite {
        path: path.to_path_buf(),
        source,
    };

    let body = to_pretty_json(&existing).map_err(|e| write_error(e.into()))?;
    write_atomic(path, &body).map_err(write_error)?;

    info!(career, tasks = map.len(), path = %path.display(), "progress saved");
    Ok(())
}

fn to_pretty_json<T: Serialize>(value: &T) -> Result<Vec<u8>, serde_json::Error> {
    let mut out = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(b"    "));
    value.serialize(&mut serializer)?;
    Ok(out)
}

/// Write to a temporary file beside `path`, then rename it over `path`.
fn write_atomic(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let parent = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let mut temp = tempfile::NamedTempFile::new_in(parent)?;
    temp.write_all(content)?;
    temp.flush()?;
    temp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
