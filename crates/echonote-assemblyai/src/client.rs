use std::time::{Duration, Instant};

use echonote_core::model::{Transcript, TranscriptionFeatureSet};
use echonote_pipeline::{Analyzer, AudioClip, GatewayError, Transcriber};

use crate::wire::{
    LemurTaskRequest, LemurTaskResponse, TranscriptRequest, TranscriptResponse, UploadResponse,
};

pub const DEFAULT_BASE_URL: &str = "https://api.assemblyai.com";

/// Connection settings for AssemblyAI.
#[derive(Debug, Clone)]
pub struct AssemblyAiConfig {
    /// Base URL without trailing slash.
    pub base_url: String,
    pub api_key: String,
    /// LeMUR `final_model`; the provider default when unset.
    pub lemur_model: Option<String>,
    pub poll_interval: Duration,
    /// Longest time to wait for a transcript job to finish.
    pub max_wait: Duration,
    /// Per-request HTTP timeout (uploads of long recordings need a generous one).
    pub request_timeout: Duration,
}

impl AssemblyAiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            lemur_model: None,
            poll_interval: Duration::from_secs(3),
            max_wait: Duration::from_secs(30 * 60),
            request_timeout: Duration::from_secs(120),
        }
    }

    /// Build from environment: `ASSEMBLYAI_API_KEY` (required), `ASSEMBLYAI_BASE_URL`,
    /// `ASSEMBLYAI_LEMUR_MODEL`, `ASSEMBLYAI_POLL_SECS`, `ASSEMBLYAI_MAX_WAIT_SECS`.
    pub fn from_env() -> Result<Self, GatewayError> {
        let api_key = std::env::var("ASSEMBLYAI_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| GatewayError::Config("ASSEMBLYAI_API_KEY is not set".to_string()))?;
        let mut config = Self::new(api_key);
        if let Ok(url) = std::env::var("ASSEMBLYAI_BASE_URL") {
            config.base_url = url.trim_end_matches('/').to_string();
        }
        config.lemur_model = std::env::var("ASSEMBLYAI_LEMUR_MODEL").ok();
        if let Some(secs) = env_secs("ASSEMBLYAI_POLL_SECS")? {
            config.poll_interval = secs;
        }
        if let Some(secs) = env_secs("ASSEMBLYAI_MAX_WAIT_SECS")? {
            config.max_wait = secs;
        }
        Ok(config)
    }
}

fn env_secs(key: &str) -> Result<Option<Duration>, GatewayError> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .map(|s| Some(Duration::from_secs(s)))
            .map_err(|e| GatewayError::Config(format!("{key}: {e}"))),
        Err(_) => Ok(None),
    }
}

/// Blocking client for upload, transcription and LeMUR tasks.
#[derive(Debug, Clone)]
pub struct AssemblyAiClient {
    config: AssemblyAiConfig,
    client: reqwest::blocking::Client,
}

impl AssemblyAiClient {
    pub fn new(config: AssemblyAiConfig) -> Result<Self, GatewayError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| GatewayError::Http(e.to_string()))?;
        Ok(Self { config, client })
    }

    pub fn from_env() -> Result<Self, GatewayError> {
        Self::new(AssemblyAiConfig::from_env()?)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url.trim_end_matches('/'))
    }

    fn check(
        res: reqwest::blocking::Response,
    ) -> Result<reqwest::blocking::Response, GatewayError> {
        if res.status().is_success() {
            return Ok(res);
        }
        let status = res.status().as_u16();
        let body = res.text().unwrap_or_default();
        Err(GatewayError::Api { status, body })
    }

    /// Upload raw audio, returning the private URL the transcript job reads from.
    fn upload(&self, bytes: &[u8]) -> Result<String, GatewayError> {
        let res = self
            .client
            .post(self.url("/v2/upload"))
            .header("authorization", &self.config.api_key)
            .body(bytes.to_vec())
            .send()
            .map_err(|e| GatewayError::Http(e.to_string()))?;
        let body: UploadResponse = Self::check(res)?
            .json()
            .map_err(|e| GatewayError::Provider(e.to_string()))?;
        Ok(body.upload_url)
    }

    fn submit(
        &self,
        audio_url: &str,
        features: TranscriptionFeatureSet,
    ) -> Result<TranscriptResponse, GatewayError> {
        let res = self
            .client
            .post(self.url("/v2/transcript"))
            .header("authorization", &self.config.api_key)
            .json(&TranscriptRequest::new(audio_url, features))
            .send()
            .map_err(|e| GatewayError::Http(e.to_string()))?;
        Self::check(res)?
            .json()
            .map_err(|e| GatewayError::Provider(e.to_string()))
    }

    fn fetch(&self, id: &str) -> Result<TranscriptResponse, GatewayError> {
        let res = self
            .client
            .get(self.url(&format!("/v2/transcript/{id}")))
            .header("authorization", &self.config.api_key)
            .send()
            .map_err(|e| GatewayError::Http(e.to_string()))?;
        Self::check(res)?
            .json()
            .map_err(|e| GatewayError::Provider(e.to_string()))
    }

    /// Poll until the job completes or fails.
    fn wait_for(&self, mut job: TranscriptResponse) -> Result<TranscriptResponse, GatewayError> {
        let started = Instant::now();
        while !job.is_finished() {
            if started.elapsed() >= self.config.max_wait {
                return Err(GatewayError::Timeout(self.config.max_wait.as_secs()));
            }
            tracing::debug!("Transcript {} is {:?}, polling", job.id, job.status);
            std::thread::sleep(self.config.poll_interval);
            job = self.fetch(&job.id)?;
        }
        Ok(job)
    }
}

impl Transcriber for AssemblyAiClient {
    fn transcribe(
        &self,
        clip: &AudioClip,
        features: TranscriptionFeatureSet,
    ) -> Result<Transcript, GatewayError> {
        let audio_url = self.upload(&clip.bytes)?;
        tracing::debug!("Uploaded {} ({} bytes)", clip.label(), clip.bytes.len());
        let job = self.submit(&audio_url, features)?;
        tracing::info!("Transcript job {} submitted", job.id);
        Ok(self.wait_for(job)?.into_transcript())
    }
}

impl Analyzer for AssemblyAiClient {
    fn analyze(&self, transcript: &Transcript, instruction: &str) -> Result<String, GatewayError> {
        let request = LemurTaskRequest {
            prompt: instruction,
            transcript_ids: transcript.id.as_deref().map(|id| vec![id]),
            input_text: match transcript.id {
                Some(_) => None,
                None => Some(transcript.text.as_str()),
            },
            final_model: self.config.lemur_model.as_deref(),
        };
        let res = self
            .client
            .post(self.url("/lemur/v3/generate/task"))
            .header("authorization", &self.config.api_key)
            .json(&request)
            .send()
            .map_err(|e| GatewayError::Http(e.to_string()))?;
        let body: LemurTaskResponse = Self::check(res)?
            .json()
            .map_err(|e| GatewayError::Provider(e.to_string()))?;
        Ok(body.response)
    }
}
