use echonote_core::model::{Decision, Memory};
use echonote_pipeline::RunOutcome;

use super::OutputFormat;

pub fn format_outcome(outcome: &RunOutcome, fmt: OutputFormat) -> String {
    match fmt {
        OutputFormat::Json => {
            let warnings: Vec<String> = outcome.warnings.iter().map(|w| w.to_string()).collect();
            let value = serde_json::json!({
                "report_path": outcome.report_path,
                "mode": outcome.mode,
                "warnings": warnings,
                "decision_id": outcome.decision_id,
                "counterfactual_included": outcome.counterfactual_included,
            });
            serde_json::to_string_pretty(&value).unwrap_or_default()
        }
        OutputFormat::Text => format_outcome_text(outcome),
    }
}

fn format_outcome_text(outcome: &RunOutcome) -> String {
    let mut out = format!(
        "{} report written: {}",
        outcome.mode.title(),
        outcome.report_path.display()
    );
    if outcome.counterfactual_included {
        out.push_str("\nGhost ship simulation included.");
    }
    if let Some(id) = outcome.decision_id {
        out.push_str(&format!("\nDecision #{id} logged."));
    }
    for warning in &outcome.warnings {
        out.push_str(&format!("\nwarning: {warning}"));
    }
    out
}

pub fn format_memory(memory: &Memory, fmt: OutputFormat) -> String {
    match fmt {
        OutputFormat::Json => {
            serde_json::to_string_pretty(&memory.to_context_json()).unwrap_or_default()
        }
        OutputFormat::Text => format_memory_text(memory),
    }
}

fn format_memory_text(memory: &Memory) -> String {
    if memory.is_empty() {
        return "Journal is empty.".to_string();
    }

    let mut out = String::new();
    out.push_str(&format!("Timeline ({} events)\n", memory.timeline_events.len()));
    for event in &memory.timeline_events {
        out.push_str(&format!("  - {event}\n"));
    }
    out.push_str(&format!("Characters ({})\n", memory.characters.len()));
    for (name, character) in &memory.characters {
        out.push_str(&format!("  {name}: {}\n", character.description()));
    }
    out.trim_end().to_string()
}

pub fn format_decisions(decisions: &[Decision], fmt: OutputFormat) -> String {
    match fmt {
        OutputFormat::Json => serde_json::to_string_pretty(decisions).unwrap_or_default(),
        OutputFormat::Text => {
            if decisions.is_empty() {
                return "No decisions logged.".to_string();
            }
            decisions
                .iter()
                .map(format_decision_text)
                .collect::<Vec<_>>()
                .join("\n")
        }
    }
}

pub fn format_decision_logged(decision: &Decision, fmt: OutputFormat) -> String {
    match fmt {
        OutputFormat::Json => serde_json::to_string_pretty(decision).unwrap_or_default(),
        OutputFormat::Text => format!("Decision #{} logged.", decision.id),
    }
}

fn format_decision_text(d: &Decision) -> String {
    let mut out = format!(
        "\u{25c6} #{} {}  {}\n",
        d.id,
        first_line(&d.dilemma),
        d.timestamp.format("%Y-%m-%d %H:%M")
    );
    out.push_str(&format!("    Chose:   {}\n", first_line(&d.choice_made)));
    out.push_str(&format!("    Outcome: {}\n", first_line(&d.actual_outcome)));
    if let Some(alt) = &d.alternate_timeline {
        out.push_str(&format!("    Ghost:   {}\n", first_line(alt)));
    }
    out
}

fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or("").trim()
}
