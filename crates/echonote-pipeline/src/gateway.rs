use echonote_core::model::{Transcript, TranscriptionFeatureSet};

use crate::error::GatewayError;
use crate::source::AudioClip;

/// Speech-to-text provider.
///
/// A job that the provider itself marks as failed comes back as `Ok` with an
/// error status; `Err` is for transport and protocol failures.
pub trait Transcriber {
    fn transcribe(
        &self,
        clip: &AudioClip,
        features: TranscriptionFeatureSet,
    ) -> Result<Transcript, GatewayError>;
}

/// Text-generation provider that answers an instruction about a transcript.
///
/// The returned text is opaque to the pipeline: it is embedded as-is.
pub trait Analyzer {
    fn analyze(&self, transcript: &Transcript, instruction: &str) -> Result<String, GatewayError>;
}
