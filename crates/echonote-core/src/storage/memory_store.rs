use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;

use super::ContextStore;
use crate::error::CoreError;
use crate::model::{Decision, Event, Memory, NewDecision};

#[derive(Debug, Default)]
struct Journal {
    memory: Memory,
    decisions: Vec<Decision>,
}

/// Process-local journal behind a single mutex. Nothing is written to disk.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Journal>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Journal>, CoreError> {
        self.inner
            .lock()
            .map_err(|e| CoreError::Unavailable(format!("journal lock poisoned: {e}")))
    }
}

impl ContextStore for MemoryStore {
    fn get_memory(&self) -> Result<Memory, CoreError> {
        Ok(self.lock()?.memory.clone())
    }

    fn get_decisions(&self) -> Result<Vec<Decision>, CoreError> {
        Ok(self.lock()?.decisions.clone())
    }

    fn append_event(&self, event: Event) -> Result<(), CoreError> {
        self.lock()?.memory.append_event(event);
        Ok(())
    }

    fn upsert_characters(&self, characters: &BTreeMap<String, String>) -> Result<(), CoreError> {
        let mut journal = self.lock()?;
        let now = Utc::now();
        for (name, description) in characters {
            journal.memory.upsert_character(name, description, now);
        }
        Ok(())
    }

    fn append_decision(&self, decision: NewDecision) -> Result<Decision, CoreError> {
        let mut journal = self.lock()?;
        let entry = decision.into_decision(&journal.decisions, Utc::now());
        journal.decisions.push(entry.clone());
        Ok(entry)
    }
}
