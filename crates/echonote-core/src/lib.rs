//! Core types for Echonote: report modes, transcripts, the life journal
//! (timeline, characters, decision log) and the stores that persist it.

pub mod config;
pub mod error;
pub mod model;
pub mod storage;

pub use config::EchoConfig;
pub use error::CoreError;
