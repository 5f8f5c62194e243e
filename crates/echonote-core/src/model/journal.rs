use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Separator used when flattening a character's history into one description.
pub const CHARACTER_NOTE_SEPARATOR: &str = "; ";

/// A timeline entry. Stored verbatim; no schema is imposed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Event(pub serde_json::Value);

impl Event {
    pub fn text(text: impl Into<String>) -> Self {
        Self(serde_json::Value::String(text.into()))
    }
}

impl From<&str> for Event {
    fn from(s: &str) -> Self {
        Self::text(s)
    }
}

impl From<String> for Event {
    fn from(s: String) -> Self {
        Self::text(s)
    }
}

impl From<serde_json::Value> for Event {
    fn from(v: serde_json::Value) -> Self {
        Self(v)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            serde_json::Value::String(s) => f.write_str(s),
            other => write!(f, "{other}"),
        }
    }
}

/// One dated observation about a character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterNote {
    pub description: String,
    /// Absent for notes migrated from the flat-string format.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recorded_at: Option<DateTime<Utc>>,
}

/// A recurring person (or pet, or place) in the journal, with every note ever recorded.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "CharacterRepr")]
pub struct Character {
    pub history: Vec<CharacterNote>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CharacterRepr {
    Flat(String),
    Structured { history: Vec<CharacterNote> },
}

impl From<CharacterRepr> for Character {
    fn from(repr: CharacterRepr) -> Self {
        match repr {
            CharacterRepr::Flat(description) => Self {
                history: description
                    .split(CHARACTER_NOTE_SEPARATOR)
                    .filter(|part| !part.is_empty())
                    .map(|part| CharacterNote {
                        description: part.to_string(),
                        recorded_at: None,
                    })
                    .collect(),
            },
            CharacterRepr::Structured { history } => Self { history },
        }
    }
}

impl Character {
    /// All notes joined in recording order.
    pub fn description(&self) -> String {
        self.history
            .iter()
            .map(|n| n.description.as_str())
            .collect::<Vec<_>>()
            .join(CHARACTER_NOTE_SEPARATOR)
    }
}

/// The life-journal memory: timeline plus character sheet.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Memory {
    #[serde(default)]
    pub timeline_events: Vec<Event>,
    #[serde(default)]
    pub characters: BTreeMap<String, Character>,
}

impl Memory {
    pub fn is_empty(&self) -> bool {
        self.timeline_events.is_empty() && self.characters.is_empty()
    }

    pub fn append_event(&mut self, event: Event) {
        self.timeline_events.push(event);
    }

    /// Add a note for `name`, creating the character if it is new.
    pub fn upsert_character(&mut self, name: &str, description: &str, at: DateTime<Utc>) {
        self.characters
            .entry(name.to_string())
            .or_default()
            .history
            .push(CharacterNote {
                description: description.to_string(),
                recorded_at: Some(at),
            });
    }

    pub fn character_description(&self, name: &str) -> Option<String> {
        self.characters.get(name).map(Character::description)
    }

    /// Flat view handed to prompts: events as-is, characters as joined descriptions.
    pub fn to_context_json(&self) -> serde_json::Value {
        let characters: BTreeMap<&str, String> = self
            .characters
            .iter()
            .map(|(name, c)| (name.as_str(), c.description()))
            .collect();
        serde_json::json!({
            "timeline_events": self.timeline_events,
            "characters": characters,
        })
    }
}

/// A recorded life decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub id: u64,
    pub dilemma: String,
    pub choice_made: String,
    pub actual_outcome: String,
    #[serde(default)]
    pub alternate_timeline: Option<String>,
    pub timestamp: DecisionTime,
}

/// When a decision was logged.
///
/// Older logs carry free-form timestamp strings that are not dates; those are
/// kept verbatim so the log stays readable and appendable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DecisionTime {
    At(DateTime<Utc>),
    Legacy(String),
}

impl DecisionTime {
    pub fn as_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::At(at) => Some(*at),
            Self::Legacy(_) => None,
        }
    }

    /// Render with a chrono format string; legacy values are shown as stored.
    pub fn format(&self, fmt: &str) -> String {
        match self {
            Self::At(at) => at.format(fmt).to_string(),
            Self::Legacy(raw) => raw.clone(),
        }
    }
}

impl From<DateTime<Utc>> for DecisionTime {
    fn from(at: DateTime<Utc>) -> Self {
        Self::At(at)
    }
}

/// Fields supplied by the caller when logging a decision; the store assigns id and time.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NewDecision {
    pub dilemma: String,
    pub choice_made: String,
    pub actual_outcome: String,
    pub alternate_timeline: Option<String>,
}

impl NewDecision {
    /// Stamp this entry as the next one in `log`.
    pub fn into_decision(self, log: &[Decision], at: DateTime<Utc>) -> Decision {
        Decision {
            id: log.len() as u64 + 1,
            dilemma: self.dilemma,
            choice_made: self.choice_made,
            actual_outcome: self.actual_outcome,
            alternate_timeline: self.alternate_timeline,
            timestamp: DecisionTime::At(at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upsert_new_character_verbatim() {
        let mut memory = Memory::default();
        memory.upsert_character("Ana", "my sister", Utc::now());
        assert_eq!(memory.character_description("Ana").unwrap(), "my sister");
    }

    #[test]
    fn test_upsert_existing_character_concatenates() {
        let mut memory = Memory::default();
        memory.upsert_character("Ana", "my sister", Utc::now());
        memory.upsert_character("Ana", "moved to Lisbon", Utc::now());
        assert_eq!(
            memory.character_description("Ana").unwrap(),
            "my sister; moved to Lisbon"
        );
        assert_eq!(memory.characters["Ana"].history.len(), 2);
        assert_eq!(
            memory.characters["Ana"].history[1].description,
            "moved to Lisbon"
        );
    }

    #[test]
    fn test_flat_character_format_is_read_as_history() {
        let json = r#"{
            "timeline_events": ["first day at work", {"note": "structured"}],
            "characters": {"Bo": "neighbor; plays cello"}
        }"#;
        let memory: Memory = serde_json::from_str(json).unwrap();
        assert_eq!(memory.timeline_events.len(), 2);
        assert_eq!(memory.timeline_events[0].to_string(), "first day at work");
        let bo = &memory.characters["Bo"];
        assert_eq!(bo.history.len(), 2);
        assert!(bo.history.iter().all(|n| n.recorded_at.is_none()));
        assert_eq!(bo.description(), "neighbor; plays cello");
    }

    #[test]
    fn test_empty_document_is_empty_memory() {
        let memory: Memory = serde_json::from_str("{}").unwrap();
        assert!(memory.is_empty());
    }

    #[test]
    fn test_context_json_flattens_characters() {
        let mut memory = Memory::default();
        memory.append_event(Event::from("graduated"));
        memory.upsert_character("Ana", "my sister", Utc::now());
        let ctx = memory.to_context_json();
        assert_eq!(ctx["characters"]["Ana"], "my sister");
        assert_eq!(ctx["timeline_events"][0], "graduated");
    }

    #[test]
    fn test_decision_ids_follow_log_length() {
        let mut log = Vec::new();
        for i in 1..=3 {
            let d = NewDecision {
                dilemma: format!("dilemma {i}"),
                ..Default::default()
            }
            .into_decision(&log, Utc::now());
            log.push(d);
        }
        let ids: Vec<u64> = log.iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_decision_timestamp_forms() {
        let json = r#"[
            {"id": 1, "dilemma": "a", "choice_made": "b", "actual_outcome": "c",
             "alternate_timeline": null,
             "timestamp": "posix.times_result(user=0.1, system=0.02, children_user=0.0, children_system=0.0, elapsed=1234.5)"},
            {"id": 2, "dilemma": "d", "choice_made": "e", "actual_outcome": "f",
             "timestamp": "2026-03-01T12:00:00Z"}
        ]"#;
        let log: Vec<Decision> = serde_json::from_str(json).unwrap();
        assert!(matches!(log[0].timestamp, DecisionTime::Legacy(_)));
        assert!(log[0].timestamp.format("%Y-%m-%d").starts_with("posix.times_result"));
        assert_eq!(log[1].timestamp.format("%Y-%m-%d"), "2026-03-01");
        assert!(log[1].timestamp.as_datetime().is_some());

        let reread: Vec<Decision> =
            serde_json::from_str(&serde_json::to_string(&log).unwrap()).unwrap();
        assert_eq!(reread, log);
    }
}
