use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::ContextStore;
use crate::error::CoreError;
use crate::model::{Decision, Event, Memory, NewDecision};

const MEMORY_FILE: &str = "memory.json";
const DECISIONS_FILE: &str = "decisions.json";
const LOCK_FILE: &str = ".journal.lock";

/// Journal stored as two JSON documents in one directory.
///
/// Writers take an exclusive lock on a sidecar lock file for the whole
/// read-modify-write, then swap the document in with a rename. Readers never
/// lock: a rename is atomic, so they see either the old or the new document.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open (and create if needed) a store rooted at `dir`.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, CoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn memory_path(&self) -> PathBuf {
        self.dir.join(MEMORY_FILE)
    }

    fn decisions_path(&self) -> PathBuf {
        self.dir.join(DECISIONS_FILE)
    }

    /// Run `f` while holding the store's exclusive writer lock.
    fn with_write_lock<R>(
        &self,
        f: impl FnOnce() -> Result<R, CoreError>,
    ) -> Result<R, CoreError> {
        let file = fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(self.dir.join(LOCK_FILE))?;
        fs2::FileExt::lock_exclusive(&file).map_err(CoreError::Io)?;
        let result = f();
        fs2::FileExt::unlock(&file).map_err(CoreError::Io)?;
        result
    }
}

fn read_document<T: DeserializeOwned + Default>(path: &Path) -> Result<T, CoreError> {
    let data = match fs::read(path) {
        Ok(data) => data,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(T::default()),
        Err(e) => return Err(CoreError::Io(e)),
    };
    if data.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    Ok(serde_json::from_slice(&data)?)
}

fn write_document<T: Serialize>(path: &Path, value: &T) -> Result<(), CoreError> {
    let json = serde_json::to_vec_pretty(value)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

impl ContextStore for FileStore {
    fn get_memory(&self) -> Result<Memory, CoreError> {
        read_document(&self.memory_path())
    }

    fn get_decisions(&self) -> Result<Vec<Decision>, CoreError> {
        read_document(&self.decisions_path())
    }

    fn append_event(&self, event: Event) -> Result<(), CoreError> {
        let path = self.memory_path();
        self.with_write_lock(|| {
            let mut memory: Memory = read_document(&path)?;
            memory.append_event(event);
            write_document(&path, &memory)
        })?;
        tracing::debug!("Appended timeline event to {}", path.display());
        Ok(())
    }

    fn upsert_characters(&self, characters: &BTreeMap<String, String>) -> Result<(), CoreError> {
        if characters.is_empty() {
            return Ok(());
        }
        let path = self.memory_path();
        self.with_write_lock(|| {
            let mut memory: Memory = read_document(&path)?;
            let now = Utc::now();
            for (name, description) in characters {
                memory.upsert_character(name, description, now);
            }
            write_document(&path, &memory)
        })
    }

    fn append_decision(&self, decision: NewDecision) -> Result<Decision, CoreError> {
        let path = self.decisions_path();
        let stored = self.with_write_lock(|| {
            let mut log: Vec<Decision> = read_document(&path)?;
            let entry = decision.into_decision(&log, Utc::now());
            log.push(entry.clone());
            write_document(&path, &log)?;
            Ok(entry)
        })?;
        let preview: String = stored.dilemma.chars().take(30).collect();
        tracing::info!("Decision {} logged: {preview}...", stored.id);
        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DecisionTime;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn decision(dilemma: &str) -> NewDecision {
        NewDecision {
            dilemma: dilemma.into(),
            choice_made: "stay".into(),
            actual_outcome: "fine".into(),
            alternate_timeline: None,
        }
    }

    #[test]
    fn test_missing_documents_read_as_empty() {
        let tmp = TempDir::new().unwrap();
        let store = FileStore::open(tmp.path().join("brain")).unwrap();
        assert!(store.get_memory().unwrap().is_empty());
        assert!(store.get_decisions().unwrap().is_empty());
        assert!(!store.memory_path().exists());
    }

    #[test]
    fn test_event_and_character_persist_across_instances() {
        let tmp = TempDir::new().unwrap();
        let store = FileStore::open(tmp.path()).unwrap();
        store.append_event(Event::from("moved to Porto")).unwrap();
        store.upsert_character("Ana", "my sister").unwrap();
        store.upsert_character("Ana", "visits on Sundays").unwrap();

        let reopened = FileStore::open(tmp.path()).unwrap();
        let memory = reopened.get_memory().unwrap();
        assert_eq!(memory.timeline_events, vec![Event::from("moved to Porto")]);
        assert_eq!(
            memory.character_description("Ana").unwrap(),
            "my sister; visits on Sundays"
        );
    }

    #[test]
    fn test_decision_ids_sequential() {
        let tmp = TempDir::new().unwrap();
        let store = FileStore::open(tmp.path()).unwrap();
        let ids: Vec<u64> = ["a", "b", "c"]
            .iter()
            .map(|d| store.append_decision(decision(d)).unwrap().id)
            .collect();
        assert_eq!(ids, vec![1, 2, 3]);
        let log = store.get_decisions().unwrap();
        assert_eq!(log[2].dilemma, "c");
    }

    #[test]
    fn test_concurrent_appends_get_unique_ids() {
        let tmp = TempDir::new().unwrap();
        let store = Arc::new(FileStore::open(tmp.path()).unwrap());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    store.append_decision(decision(&format!("d{i}"))).unwrap().id
                })
            })
            .collect();
        let mut ids: Vec<u64> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        ids.sort_unstable();
        assert_eq!(ids, (1..=8).collect::<Vec<_>>());
        assert_eq!(store.get_decisions().unwrap().len(), 8);
    }

    #[test]
    fn test_corrupt_document_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let store = FileStore::open(tmp.path()).unwrap();
        fs::write(store.memory_path(), "{ not json").unwrap();
        assert!(matches!(
            store.get_memory(),
            Err(CoreError::InvalidDocument(_))
        ));
    }

    #[test]
    fn test_reads_flat_character_documents() {
        let tmp = TempDir::new().unwrap();
        let store = FileStore::open(tmp.path()).unwrap();
        fs::write(
            store.memory_path(),
            r#"{"timeline_events": [], "characters": {"Bo": "neighbor"}}"#,
        )
        .unwrap();
        store.upsert_character("Bo", "plays cello").unwrap();
        assert_eq!(
            store.get_memory().unwrap().character_description("Bo").unwrap(),
            "neighbor; plays cello"
        );
    }

    #[test]
    fn test_appends_to_log_with_free_form_timestamps() {
        let tmp = TempDir::new().unwrap();
        let store = FileStore::open(tmp.path()).unwrap();
        fs::write(
            store.decisions_path(),
            r#"[
    {
        "id": 1,
        "dilemma": "Take the Berlin offer?",
        "choice_made": "Stayed home",
        "actual_outcome": "Quieter year",
        "alternate_timeline": null,
        "timestamp": "posix.times_result(user=0.1, system=0.02, children_user=0.0, children_system=0.0, elapsed=17.0)"
    }
]"#,
        )
        .unwrap();

        let log = store.get_decisions().unwrap();
        assert_eq!(log.len(), 1);
        assert!(matches!(log[0].timestamp, DecisionTime::Legacy(_)));

        let appended = store.append_decision(decision("Adopt a dog?")).unwrap();
        assert_eq!(appended.id, 2);
        assert!(appended.timestamp.as_datetime().is_some());

        let log = store.get_decisions().unwrap();
        assert_eq!(log.len(), 2);
        assert!(log[0].timestamp.format("%Y").starts_with("posix.times_result"));
        assert_eq!(log[1].dilemma, "Adopt a dog?");
    }
}
