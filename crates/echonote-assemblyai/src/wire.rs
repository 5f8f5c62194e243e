//! JSON bodies exchanged with the AssemblyAI REST API.

use serde::{Deserialize, Serialize};

use echonote_core::model::{Chapter, Transcript, TranscriptionFeatureSet, Utterance};

#[derive(Debug, Deserialize)]
pub(crate) struct UploadResponse {
    pub upload_url: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct TranscriptRequest<'a> {
    pub audio_url: &'a str,
    pub speaker_labels: bool,
    pub auto_chapters: bool,
    pub entity_detection: bool,
    pub sentiment_analysis: bool,
}

impl<'a> TranscriptRequest<'a> {
    pub fn new(audio_url: &'a str, features: TranscriptionFeatureSet) -> Self {
        Self {
            audio_url,
            speaker_labels: features.speaker_labels,
            auto_chapters: features.auto_chapters,
            entity_detection: features.entity_detection,
            sentiment_analysis: features.sentiment_analysis,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum JobStatus {
    Queued,
    Processing,
    Completed,
    Error,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UtteranceBody {
    #[serde(default)]
    pub speaker: Option<String>,
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChapterBody {
    pub start: u64,
    #[serde(default)]
    pub end: Option<u64>,
    pub headline: String,
    #[serde(default)]
    pub gist: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TranscriptResponse {
    pub id: String,
    pub status: JobStatus,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub utterances: Option<Vec<UtteranceBody>>,
    #[serde(default)]
    pub chapters: Option<Vec<ChapterBody>>,
}

impl TranscriptResponse {
    pub fn is_finished(&self) -> bool {
        matches!(self.status, JobStatus::Completed | JobStatus::Error)
    }

    pub fn into_transcript(self) -> Transcript {
        if self.status != JobStatus::Completed {
            let reason = self
                .error
                .unwrap_or_else(|| format!("transcript ended in state {:?}", self.status));
            return Transcript::failed(reason).with_id(self.id);
        }

        let utterances = self
            .utterances
            .unwrap_or_default()
            .into_iter()
            .map(|u| Utterance::new(u.speaker.unwrap_or_else(|| "?".into()), u.text))
            .collect();
        let chapters = self
            .chapters
            .unwrap_or_default()
            .into_iter()
            .map(|c| Chapter {
                start_ms: c.start,
                end_ms: c.end,
                headline: c.headline,
                gist: c.gist,
            })
            .collect();

        Transcript::completed(self.text.unwrap_or_default())
            .with_id(self.id)
            .with_utterances(utterances)
            .with_chapters(chapters)
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct LemurTaskRequest<'a> {
    pub prompt: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcript_ids: Option<Vec<&'a str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_text: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_model: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LemurTaskResponse {
    pub response: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use echonote_core::model::{Mode, TranscriptStatus};

    #[test]
    fn test_completed_transcript_conversion() {
        let json = r#"{
            "id": "tx_1",
            "status": "completed",
            "text": "Morning everyone. Hi.",
            "utterances": [
                {"speaker": "A", "text": "Morning everyone.", "start": 0, "end": 900},
                {"speaker": "B", "text": "Hi.", "start": 1000, "end": 1300}
            ],
            "chapters": [
                {"start": 0, "end": 61999, "headline": "Greetings", "gist": "hello", "summary": "..."}
            ],
            "entities": []
        }"#;
        let response: TranscriptResponse = serde_json::from_str(json).unwrap();
        assert!(response.is_finished());
        let transcript = response.into_transcript();
        assert_eq!(transcript.id.as_deref(), Some("tx_1"));
        assert_eq!(transcript.status, TranscriptStatus::Completed);
        assert_eq!(transcript.utterances[1], Utterance::new("B", "Hi."));
        assert_eq!(transcript.chapters[0].headline, "Greetings");
        assert_eq!(transcript.chapters[0].end_ms, Some(61_999));
    }

    #[test]
    fn test_null_utterances_without_diarization() {
        let json = r#"{"id": "tx_2", "status": "completed", "text": "hello world",
                       "utterances": null, "chapters": null}"#;
        let transcript = serde_json::from_str::<TranscriptResponse>(json)
            .unwrap()
            .into_transcript();
        assert_eq!(transcript.text, "hello world");
        assert!(transcript.utterances.is_empty());
        assert!(transcript.chapters.is_empty());
    }

    #[test]
    fn test_error_status_carries_provider_reason() {
        let json = r#"{"id": "tx_3", "status": "error", "error": "Audio file is too short"}"#;
        let transcript = serde_json::from_str::<TranscriptResponse>(json)
            .unwrap()
            .into_transcript();
        assert_eq!(transcript.error_reason(), Some("Audio file is too short"));
    }

    #[test]
    fn test_pending_states() {
        for status in ["queued", "processing", "paused"] {
            let json = format!(r#"{{"id": "tx", "status": "{status}"}}"#);
            let response: TranscriptResponse = serde_json::from_str(&json).unwrap();
            assert!(!response.is_finished(), "{status}");
        }
    }

    #[test]
    fn test_request_flags_follow_mode() {
        let body = serde_json::to_value(TranscriptRequest::new(
            "https://cdn/upload/1",
            Mode::Meeting.features(),
        ))
        .unwrap();
        assert_eq!(body["audio_url"], "https://cdn/upload/1");
        assert_eq!(body["speaker_labels"], true);
        assert_eq!(body["auto_chapters"], false);
        assert_eq!(body["entity_detection"], true);
        assert_eq!(body["sentiment_analysis"], true);
    }

    #[test]
    fn test_lemur_request_omits_unset_fields() {
        let body = serde_json::to_value(LemurTaskRequest {
            prompt: "Summarize",
            transcript_ids: Some(vec!["tx_1"]),
            input_text: None,
            final_model: None,
        })
        .unwrap();
        assert_eq!(body["transcript_ids"][0], "tx_1");
        assert!(body.get("input_text").is_none());
        assert!(body.get("final_model").is_none());
    }
}
