use std::collections::HashMap;

use chrono::NaiveDateTime;
use echonote_core::model::{Chapter, Mode, Utterance};

pub const ANALYSIS_TITLE: &str = "AI Analysis";
pub const COUNTERFACTUAL_TITLE: &str = "Ghost Ship";
pub const CHAPTERS_TITLE: &str = "Chapters";
pub const TRANSCRIPT_TITLE: &str = "Transcript";

const SEPARATOR: &str = "---";
const GENERIC_SPEAKER: &str = "Speaker";
const NO_SPEECH: &str = "_No speech detected._";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Analysis,
    Counterfactual,
    Chapters,
    Transcript,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSection {
    pub kind: SectionKind,
    pub title: &'static str,
    pub body: String,
}

/// A report before rendering: header plus ordered sections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub title: String,
    pub date: String,
    pub sections: Vec<ReportSection>,
}

impl Report {
    pub fn section_kinds(&self) -> Vec<SectionKind> {
        self.sections.iter().map(|s| s.kind).collect()
    }

    pub fn section(&self, kind: SectionKind) -> Option<&ReportSection> {
        self.sections.iter().find(|s| s.kind == kind)
    }

    /// Render as one Markdown document.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();
        md.push_str(&format!("# {}\n", self.title));
        md.push_str(&format!("**Date:** {}\n", self.date));

        for section in &self.sections {
            md.push('\n');
            match section.kind {
                // The simulation brings its own heading; fence it off instead.
                SectionKind::Counterfactual => {
                    md.push_str(SEPARATOR);
                    md.push_str("\n\n");
                    md.push_str(&section.body);
                    md.push_str("\n\n");
                    md.push_str(SEPARATOR);
                    md.push('\n');
                }
                _ => {
                    md.push_str(&format!("## {}\n", section.title));
                    md.push_str(&section.body);
                    md.push('\n');
                }
            }
        }
        md
    }
}

/// Everything the assembler needs from one pipeline run.
#[derive(Debug, Clone)]
pub struct ReportInput<'a> {
    pub mode: Mode,
    pub source_label: &'a str,
    pub analysis: &'a str,
    pub counterfactual: Option<&'a str>,
    pub chapters: &'a [Chapter],
    pub utterances: &'a [Utterance],
    /// Full transcript text, shown when the provider returned no utterances.
    pub transcript_text: &'a str,
    pub speaker_labels: bool,
}

/// Build the section list. Output depends only on `input` and `generated_at`.
pub fn build_report(input: &ReportInput<'_>, generated_at: NaiveDateTime) -> Report {
    let mut sections = vec![ReportSection {
        kind: SectionKind::Analysis,
        title: ANALYSIS_TITLE,
        body: input.analysis.to_string(),
    }];

    if let Some(text) = input.counterfactual {
        sections.push(ReportSection {
            kind: SectionKind::Counterfactual,
            title: COUNTERFACTUAL_TITLE,
            body: text.to_string(),
        });
    }

    if !input.chapters.is_empty() {
        sections.push(ReportSection {
            kind: SectionKind::Chapters,
            title: CHAPTERS_TITLE,
            body: render_chapters(input.chapters),
        });
    }

    sections.push(ReportSection {
        kind: SectionKind::Transcript,
        title: TRANSCRIPT_TITLE,
        body: render_transcript(input),
    });

    Report {
        title: format!("{} Report: {}", input.mode.title(), input.source_label),
        date: generated_at.format("%Y-%m-%d %H:%M").to_string(),
        sections,
    }
}

/// Build and render in one step.
pub fn assemble(input: &ReportInput<'_>, generated_at: NaiveDateTime) -> String {
    build_report(input, generated_at).to_markdown()
}

fn render_chapters(chapters: &[Chapter]) -> String {
    chapters
        .iter()
        .map(|c| format!("- **{}s**: {}", c.start_secs(), c.headline))
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_transcript(input: &ReportInput<'_>) -> String {
    if input.utterances.is_empty() {
        if input.transcript_text.trim().is_empty() {
            return NO_SPEECH.to_string();
        }
        return format!("**{GENERIC_SPEAKER}**: {}", input.transcript_text);
    }

    let mut numbers: HashMap<&str, usize> = HashMap::new();
    input
        .utterances
        .iter()
        .map(|u| {
            let tag = if input.speaker_labels {
                let next = numbers.len();
                let n = *numbers.entry(u.speaker_id.as_str()).or_insert(next);
                format!("{GENERIC_SPEAKER} {n}")
            } else {
                GENERIC_SPEAKER.to_string()
            };
            format!("**{tag}**: {}", u.text)
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 19)
            .unwrap()
            .and_hms_opt(9, 30, 15)
            .unwrap()
    }

    fn input<'a>(
        utterances: &'a [Utterance],
        chapters: &'a [Chapter],
        counterfactual: Option<&'a str>,
    ) -> ReportInput<'a> {
        ReportInput {
            mode: Mode::Decision,
            source_label: "walk.m4a",
            analysis: "# Dilemma\nStay or go",
            counterfactual,
            chapters,
            utterances,
            transcript_text: "",
            speaker_labels: false,
        }
    }

    #[test]
    fn test_section_order_for_all_optional_combinations() {
        let utterances = [Utterance::new("A", "hi")];
        let chapters = [Chapter::new(0, "Intro")];
        for with_cf in [false, true] {
            for with_chapters in [false, true] {
                let cf = with_cf.then_some("# The Ghost Ship Simulation");
                let ch: &[Chapter] = if with_chapters { &chapters } else { &[] };
                let report = build_report(&input(&utterances, ch, cf), at());

                let mut expected = vec![SectionKind::Analysis];
                if with_cf {
                    expected.push(SectionKind::Counterfactual);
                }
                if with_chapters {
                    expected.push(SectionKind::Chapters);
                }
                expected.push(SectionKind::Transcript);
                assert_eq!(report.section_kinds(), expected);

                let md = report.to_markdown();
                let analysis_at = md.find("## AI Analysis").unwrap();
                let transcript_at = md.find("## Transcript").unwrap();
                assert!(md.find("**Date:**").unwrap() < analysis_at);
                assert!(analysis_at < transcript_at);
                if let Some(cf_at) = md.find("# The Ghost Ship Simulation") {
                    assert!(analysis_at < cf_at && cf_at < transcript_at);
                }
                if let Some(ch_at) = md.find("## Chapters") {
                    assert!(ch_at < transcript_at);
                    if with_cf {
                        assert!(md.find("# The Ghost Ship Simulation").unwrap() < ch_at);
                    }
                }
            }
        }
    }

    #[test]
    fn test_header_lines() {
        let md = assemble(&input(&[], &[], None), at());
        let mut lines = md.lines();
        assert_eq!(lines.next(), Some("# Decision Report: walk.m4a"));
        assert_eq!(lines.next(), Some("**Date:** 2026-10-19 09:30"));
    }

    #[test]
    fn test_chapter_times_truncate_to_seconds() {
        let chapters = [
            Chapter::new(0, "Opening"),
            Chapter::new(61_999, "The hard part"),
            Chapter::new(125_000, "Wrap-up"),
        ];
        let report = build_report(&input(&[], &chapters, None), at());
        assert_eq!(
            report.section(SectionKind::Chapters).unwrap().body,
            "- **0s**: Opening\n- **61s**: The hard part\n- **125s**: Wrap-up"
        );
    }

    #[test]
    fn test_generic_speaker_when_labels_disabled() {
        let utterances = [
            Utterance::new("A", "first"),
            Utterance::new("B", "second"),
            Utterance::new("A", "third"),
        ];
        let report = build_report(&input(&utterances, &[], None), at());
        let body = &report.section(SectionKind::Transcript).unwrap().body;
        let lines: Vec<&str> = body.lines().filter(|l| !l.is_empty()).collect();
        assert_eq!(
            lines,
            vec!["**Speaker**: first", "**Speaker**: second", "**Speaker**: third"]
        );
    }

    #[test]
    fn test_numbered_speakers_by_first_appearance() {
        let utterances = [
            Utterance::new("B", "I'll start"),
            Utterance::new("A", "go ahead"),
            Utterance::new("B", "thanks"),
        ];
        let mut req = input(&utterances, &[], None);
        req.speaker_labels = true;
        let body = build_report(&req, at())
            .section(SectionKind::Transcript)
            .unwrap()
            .body
            .clone();
        let lines: Vec<&str> = body.lines().filter(|l| !l.is_empty()).collect();
        assert_eq!(
            lines,
            vec![
                "**Speaker 0**: I'll start",
                "**Speaker 1**: go ahead",
                "**Speaker 0**: thanks"
            ]
        );
    }

    #[test]
    fn test_text_fallback_without_utterances() {
        let mut req = input(&[], &[], None);
        req.transcript_text = "hello world";
        let md = assemble(&req, at());
        assert!(md.lines().any(|l| l == "**Speaker**: hello world"));

        req.transcript_text = "  ";
        assert!(assemble(&req, at()).contains(NO_SPEECH));
    }

    #[test]
    fn test_counterfactual_is_fenced_and_verbatim() {
        let cf = "# The Ghost Ship Simulation\n**The Choice:** left";
        let md = assemble(&input(&[], &[], Some(cf)), at());
        assert!(md.contains(&format!("---\n\n{cf}\n\n---\n")));
        assert!(!md.contains("## Ghost Ship"));
    }

    #[test]
    fn test_assemble_is_idempotent() {
        let utterances = [Utterance::new("0", "same input")];
        let chapters = [Chapter::new(1_500, "Only chapter")];
        let req = input(&utterances, &chapters, Some("alt"));
        assert_eq!(assemble(&req, at()), assemble(&req, at()));
    }
}
