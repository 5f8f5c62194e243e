//! AssemblyAI backend for the Echonote pipeline.
//!
//! [`AssemblyAiClient`] implements both gateway traits: transcription uploads
//! the recording, submits a job with the mode's feature flags and polls until
//! it finishes; analysis runs a LeMUR task against the finished transcript.

mod client;
mod wire;

pub use client::{AssemblyAiClient, AssemblyAiConfig, DEFAULT_BASE_URL};
