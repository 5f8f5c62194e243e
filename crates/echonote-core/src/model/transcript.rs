use serde::{Deserialize, Serialize};

/// Outcome of a transcription job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum TranscriptStatus {
    Completed,
    Error { reason: String },
}

/// One speaker turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Utterance {
    pub speaker_id: String,
    pub text: String,
}

impl Utterance {
    pub fn new(speaker_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            speaker_id: speaker_id.into(),
            text: text.into(),
        }
    }
}

/// A topical section detected by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    pub start_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_ms: Option<u64>,
    pub headline: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gist: Option<String>,
}

impl Chapter {
    pub fn new(start_ms: u64, headline: impl Into<String>) -> Self {
        Self {
            start_ms,
            end_ms: None,
            headline: headline.into(),
            gist: None,
        }
    }

    /// Start offset in whole seconds, truncated.
    pub fn start_secs(&self) -> u64 {
        self.start_ms / 1000
    }
}

/// Result of speech analysis for one recording.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript {
    /// Provider-side identifier, when the provider has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub text: String,
    pub status: TranscriptStatus,
    #[serde(default)]
    pub utterances: Vec<Utterance>,
    #[serde(default)]
    pub chapters: Vec<Chapter>,
}

impl Transcript {
    /// A completed transcript with the given text and nothing else.
    pub fn completed(text: impl Into<String>) -> Self {
        Self {
            id: None,
            text: text.into(),
            status: TranscriptStatus::Completed,
            utterances: Vec::new(),
            chapters: Vec::new(),
        }
    }

    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            id: None,
            text: String::new(),
            status: TranscriptStatus::Error {
                reason: reason.into(),
            },
            utterances: Vec::new(),
            chapters: Vec::new(),
        }
    }

    pub fn with_utterances(mut self, utterances: Vec<Utterance>) -> Self {
        self.utterances = utterances;
        self
    }

    pub fn with_chapters(mut self, chapters: Vec<Chapter>) -> Self {
        self.chapters = chapters;
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// The provider's failure reason, if the job failed.
    pub fn error_reason(&self) -> Option<&str> {
        match &self.status {
            TranscriptStatus::Completed => None,
            TranscriptStatus::Error { reason } => Some(reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chapter_seconds_truncate() {
        assert_eq!(Chapter::new(61_999, "x").start_secs(), 61);
        assert_eq!(Chapter::new(999, "x").start_secs(), 0);
        assert_eq!(Chapter::new(120_000, "x").start_secs(), 120);
    }

    #[test]
    fn test_error_reason() {
        assert_eq!(Transcript::completed("hi").error_reason(), None);
        assert_eq!(
            Transcript::failed("audio too short").error_reason(),
            Some("audio too short")
        );
    }

    #[test]
    fn test_status_serde_shape() {
        let json = serde_json::to_value(&Transcript::failed("bad audio")).unwrap();
        assert_eq!(json["status"]["state"], "error");
        assert_eq!(json["status"]["reason"], "bad audio");
        assert!(json.get("id").is_none());
    }
}
