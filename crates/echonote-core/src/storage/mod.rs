pub mod file_store;
pub mod memory_store;

use std::collections::BTreeMap;

use crate::error::CoreError;
use crate::model::{Decision, Event, Memory, NewDecision};

pub use file_store::FileStore;
pub use memory_store::MemoryStore;

/// Persistent life-journal state shared by every pipeline run.
///
/// Each mutating call is one atomic read-modify-write; implementations must
/// serialize writers so concurrent appends never lose updates or reuse ids.
pub trait ContextStore: Send + Sync {
    /// Current memory, empty if nothing has been stored yet.
    fn get_memory(&self) -> Result<Memory, CoreError>;

    /// The decision log in append order.
    fn get_decisions(&self) -> Result<Vec<Decision>, CoreError>;

    fn append_event(&self, event: Event) -> Result<(), CoreError>;

    /// Add one note per entry; existing characters keep their earlier notes.
    fn upsert_characters(&self, characters: &BTreeMap<String, String>) -> Result<(), CoreError>;

    /// Append a decision and return it with its assigned id.
    fn append_decision(&self, decision: NewDecision) -> Result<Decision, CoreError>;

    fn upsert_character(&self, name: &str, description: &str) -> Result<(), CoreError> {
        let mut characters = BTreeMap::new();
        characters.insert(name.to_string(), description.to_string());
        self.upsert_characters(&characters)
    }
}
