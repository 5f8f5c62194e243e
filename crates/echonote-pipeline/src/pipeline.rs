use std::io::Write as _;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

use echonote_core::config::EchoConfig;
use echonote_core::model::{Decision, Event, Memory, Mode, NewDecision, Transcript};
use echonote_core::storage::ContextStore;

use crate::error::{PipelineError, PipelineWarning};
use crate::gateway::{Analyzer, Transcriber};
use crate::ghost_ship::{render_ghost_ship_prompt, summarize_past_decisions};
use crate::output::create_report_file;
use crate::prompts::render_primary_prompt;
use crate::report::{assemble, ReportInput};
use crate::source::AudioClip;

/// Per-run switches. Unknown keys are ignored when deserializing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunOptions {
    /// Add a ghost ship simulation to decision reports.
    pub ghost_ship: bool,
}

/// What a successful run produced.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub report_path: PathBuf,
    pub mode: Mode,
    pub warnings: Vec<PipelineWarning>,
    /// Id of the decision logged by a decision-mode run.
    pub decision_id: Option<u64>,
    pub counterfactual_included: bool,
}

/// Runs one recording through transcription, analysis and report writing.
pub struct Pipeline<'a> {
    transcriber: &'a dyn Transcriber,
    analyzer: &'a dyn Analyzer,
    store: Option<&'a dyn ContextStore>,
    config: &'a EchoConfig,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        transcriber: &'a dyn Transcriber,
        analyzer: &'a dyn Analyzer,
        config: &'a EchoConfig,
    ) -> Self {
        Self {
            transcriber,
            analyzer,
            store: None,
            config,
        }
    }

    /// Attach the journal consulted by story and decision runs.
    pub fn with_store(mut self, store: &'a dyn ContextStore) -> Self {
        self.store = Some(store);
        self
    }

    /// Process `source` with the current local time as the report timestamp.
    pub fn run(
        &self,
        source: &Path,
        mode: Mode,
        options: &RunOptions,
    ) -> Result<RunOutcome, PipelineError> {
        self.run_at(source, mode, options, Local::now().naive_local())
    }

    /// Process `source`, stamping the report with `now`.
    pub fn run_at(
        &self,
        source: &Path,
        mode: Mode,
        options: &RunOptions,
        now: NaiveDateTime,
    ) -> Result<RunOutcome, PipelineError> {
        let profile = mode.profile();
        let clip = AudioClip::load(source)?;
        let label = clip.label();
        let mut warnings = Vec::new();

        tracing::info!("Transcribing {label} in {mode} mode");
        let features = profile.features;
        let transcript = self
            .transcriber
            .transcribe(&clip, features)
            .map_err(|e| PipelineError::TranscriptionFailed(e.to_string()))?;
        if let Some(reason) = transcript.error_reason() {
            return Err(PipelineError::TranscriptionFailed(reason.to_string()));
        }

        // Decision runs read only the decision log, and only for the ghost ship.
        let context = if profile.consults_context && profile.embeds_memory {
            Some(self.load_memory(&mut warnings))
        } else {
            None
        };

        let prompt = render_primary_prompt(mode, context.as_ref());
        let analysis = self
            .analyzer
            .analyze(&transcript, &prompt)
            .map_err(PipelineError::AnalysisFailed)?;

        let wants_ghost_ship = options.ghost_ship && mode == Mode::Decision;
        if options.ghost_ship && !wants_ghost_ship {
            tracing::debug!("ghost_ship only applies to decision mode; ignoring for {mode}");
        }
        let counterfactual = if wants_ghost_ship {
            let past = if profile.consults_context {
                self.load_decisions(&mut warnings)
            } else {
                Vec::new()
            };
            self.simulate_ghost_ship(&transcript, &past, &mut warnings)
        } else {
            None
        };

        let body = assemble(
            &ReportInput {
                mode,
                source_label: &label,
                analysis: &analysis,
                counterfactual: counterfactual.as_deref(),
                chapters: &transcript.chapters,
                utterances: &transcript.utterances,
                transcript_text: &transcript.text,
                speaker_labels: features.speaker_labels,
            },
            now,
        );
        let dir = self.config.output_dir(profile.output);
        let report_path = write_report(dir, &clip.base_name(), mode, now, &body)?;
        tracing::info!("Report written to {}", report_path.display());

        let decision_id = self.record_in_journal(
            mode,
            &label,
            &transcript,
            &analysis,
            counterfactual.as_deref(),
            &report_path,
            now,
            &mut warnings,
        );

        Ok(RunOutcome {
            report_path,
            mode,
            warnings,
            decision_id,
            counterfactual_included: counterfactual.is_some(),
        })
    }

    fn load_memory(&self, warnings: &mut Vec<PipelineWarning>) -> Memory {
        let Some(store) = self.store else {
            warn(warnings, PipelineWarning::StoreUnavailable("no journal store configured".into()));
            return Memory::default();
        };
        store.get_memory().unwrap_or_else(|e| {
            warn(warnings, PipelineWarning::StoreUnavailable(e.to_string()));
            Memory::default()
        })
    }

    fn load_decisions(&self, warnings: &mut Vec<PipelineWarning>) -> Vec<Decision> {
        let Some(store) = self.store else {
            return Vec::new();
        };
        store.get_decisions().unwrap_or_else(|e| {
            warn(warnings, PipelineWarning::StoreUnavailable(e.to_string()));
            Vec::new()
        })
    }

    /// Second analysis pass. A failure here costs the section, not the report.
    fn simulate_ghost_ship(
        &self,
        transcript: &Transcript,
        past: &[Decision],
        warnings: &mut Vec<PipelineWarning>,
    ) -> Option<String> {
        let history = summarize_past_decisions(past);
        let prompt = render_ghost_ship_prompt(&transcript.text, &history);
        match self.analyzer.analyze(transcript, &prompt) {
            Ok(text) => Some(text),
            Err(e) => {
                warn(warnings, PipelineWarning::CounterfactualFailed(e.to_string()));
                None
            }
        }
    }

    /// Story runs extend the timeline; decision runs extend the decision log.
    #[allow(clippy::too_many_arguments)]
    fn record_in_journal(
        &self,
        mode: Mode,
        label: &str,
        transcript: &Transcript,
        analysis: &str,
        counterfactual: Option<&str>,
        report_path: &Path,
        now: NaiveDateTime,
        warnings: &mut Vec<PipelineWarning>,
    ) -> Option<u64> {
        let store = self.store?;
        match mode {
            Mode::Story => {
                let event = Event::from(serde_json::json!({
                    "recorded_at": now.format("%Y-%m-%dT%H:%M:%S").to_string(),
                    "source": label,
                    "mode": mode,
                    "entry": analysis,
                }));
                if let Err(e) = store.append_event(event) {
                    warn(warnings, PipelineWarning::StoreUnavailable(e.to_string()));
                }
                None
            }
            Mode::Decision => {
                let entry = NewDecision {
                    dilemma: transcript.text.clone(),
                    choice_made: analysis.to_string(),
                    actual_outcome: format!("See report {}", report_path.display()),
                    alternate_timeline: counterfactual.map(String::from),
                };
                match store.append_decision(entry) {
                    Ok(decision) => Some(decision.id),
                    Err(e) => {
                        warn(warnings, PipelineWarning::StoreUnavailable(e.to_string()));
                        None
                    }
                }
            }
            Mode::Quick | Mode::Meeting | Mode::Lecture => None,
        }
    }
}

fn warn(warnings: &mut Vec<PipelineWarning>, warning: PipelineWarning) {
    tracing::warn!("{warning}");
    warnings.push(warning);
}

fn write_report(
    dir: &Path,
    base: &str,
    mode: Mode,
    now: NaiveDateTime,
    body: &str,
) -> Result<PathBuf, PipelineError> {
    let (path, mut file) =
        create_report_file(dir, base, mode, now).map_err(|source| {
            PipelineError::PersistenceFailed {
                path: dir.to_path_buf(),
                source,
            }
        })?;
    if let Err(source) = file.write_all(body.as_bytes()).and_then(|()| file.sync_all()) {
        let _ = std::fs::remove_file(&path);
        return Err(PipelineError::PersistenceFailed { path, source });
    }
    Ok(path)
}
