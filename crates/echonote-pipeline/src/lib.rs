//! The mode-driven analysis pipeline: transcribe a recording, render the
//! mode's prompt (with journal context where the mode calls for it), run the
//! analysis, optionally simulate the path not taken, and write the report.
//!
//! # Example
//! ```no_run
//! use std::path::Path;
//! use echonote_core::model::Mode;
//! use echonote_core::storage::FileStore;
//! use echonote_core::EchoConfig;
//! use echonote_pipeline::{Analyzer, Pipeline, RunOptions, Transcriber};
//!
//! fn process(transcriber: &dyn Transcriber, analyzer: &dyn Analyzer) {
//!     let config = EchoConfig::load().unwrap();
//!     let store = FileStore::open(&config.brain_dir).unwrap();
//!     let outcome = Pipeline::new(transcriber, analyzer, &config)
//!         .with_store(&store)
//!         .run(Path::new("walk.m4a"), Mode::Decision, &RunOptions { ghost_ship: true })
//!         .unwrap();
//!     println!("Report: {}", outcome.report_path.display());
//! }
//! ```

pub mod error;
pub mod gateway;
pub mod ghost_ship;
pub mod output;
pub mod pipeline;
pub mod prompts;
pub mod report;
pub mod source;

pub use error::{GatewayError, PipelineError, PipelineWarning};
pub use gateway::{Analyzer, Transcriber};
pub use ghost_ship::{render_ghost_ship_prompt, summarize_past_decisions};
pub use pipeline::{Pipeline, RunOptions, RunOutcome};
pub use prompts::render_primary_prompt;
pub use report::{assemble, build_report, Report, ReportInput, SectionKind};
pub use source::{latest_recording, AudioClip};
