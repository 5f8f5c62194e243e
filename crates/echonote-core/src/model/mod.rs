pub mod journal;
pub mod mode;
pub mod transcript;

pub use journal::{
    Character, CharacterNote, Decision, DecisionTime, Event, Memory, NewDecision,
    CHARACTER_NOTE_SEPARATOR,
};
pub use mode::{Mode, ModeProfile, OutputClass, SectionSpec, TranscriptionFeatureSet};
pub use transcript::{Chapter, Transcript, TranscriptStatus, Utterance};
