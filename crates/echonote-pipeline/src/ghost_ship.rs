//! The "Ghost Ship": a second analysis pass that imagines the path not taken.

use echonote_core::model::Decision;

const FIELD_LIMIT: usize = 280;

/// Instruction asking for the alternate timeline of the decision in `transcript_text`.
pub fn render_ghost_ship_prompt(transcript_text: &str, past_decisions_summary: &str) -> String {
    format!(
        r#"You are the "Ghost Ship" Simulator, an engine that estimates the shape of unlived lives.

**Current Situation:**
The user has made a decision or experienced an outcome described in this transcript:
"{transcript_text}"

**Historical Context:**
Here are past decisions the user has made:
{past_decisions_summary}

**YOUR TASK:**
1. Identify the pivotal choice point in the current situation.
2. Extrapolate the "Path Not Taken": if they had chosen differently, where would they be right now?
3. Be brutally honest. Use probability and logic.
   - Would they be richer but lonelier?
   - Would they have failed faster?

**Format:**
# The Ghost Ship Simulation
**The Choice:** [What was the pivot point?]
**The Alternate Timeline:** [Detailed scenario of the unlived life]
**The Variance:** [Compare the actual outcome with the simulation, e.g. "Reality is happier but less wealthy than the simulation."]
"#
    )
}

/// Flatten the decision log into the prompt's history block.
///
/// The whole log is included; entries are not filtered by topic.
pub fn summarize_past_decisions(decisions: &[Decision]) -> String {
    if decisions.is_empty() {
        return "No past decisions recorded.".to_string();
    }

    let mut out = String::new();
    for d in decisions {
        out.push_str(&format!(
            "- #{} ({}): {}\n  Chose: {}\n  Outcome: {}\n",
            d.id,
            d.timestamp.format("%Y-%m-%d"),
            condense(&d.dilemma),
            condense(&d.choice_made),
            condense(&d.actual_outcome),
        ));
        if let Some(alt) = &d.alternate_timeline {
            out.push_str(&format!("  Ghost ship: {}\n", condense(alt)));
        }
    }
    out
}

/// Collapse whitespace and cap the length of one summary field.
fn condense(text: &str) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= FIELD_LIMIT {
        return flat;
    }
    let mut cut: String = flat.chars().take(FIELD_LIMIT).collect();
    cut.push_str("...");
    cut
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn decision(id: u64, dilemma: &str, alt: Option<&str>) -> Decision {
        Decision {
            id,
            dilemma: dilemma.into(),
            choice_made: "took the job".into(),
            actual_outcome: "busier, happier".into(),
            alternate_timeline: alt.map(String::from),
            timestamp: Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap().into(),
        }
    }

    #[test]
    fn test_prompt_carries_inputs_and_fields() {
        let prompt = render_ghost_ship_prompt("I quit my job to sail", "- #1 moved cities");
        assert!(prompt.contains("\"I quit my job to sail\""));
        assert!(prompt.contains("- #1 moved cities"));
        for field in [
            "**The Choice:**",
            "**The Alternate Timeline:**",
            "**The Variance:**",
        ] {
            assert!(prompt.contains(field), "missing {field}");
        }
        assert!(prompt.contains("pivotal choice point"));
    }

    #[test]
    fn test_empty_history() {
        assert_eq!(summarize_past_decisions(&[]), "No past decisions recorded.");
    }

    #[test]
    fn test_summary_lists_every_decision() {
        let log = vec![
            decision(1, "Move to Berlin?", Some("Stayed home, saved money")),
            decision(2, "Adopt a dog?", None),
        ];
        let summary = summarize_past_decisions(&log);
        assert!(summary.contains("- #1 (2025-03-01): Move to Berlin?"));
        assert!(summary.contains("Ghost ship: Stayed home, saved money"));
        assert!(summary.contains("- #2 (2025-03-01): Adopt a dog?"));
        assert_eq!(summary.matches("Ghost ship:").count(), 1);
    }

    #[test]
    fn test_long_fields_are_condensed() {
        let long = "word\n".repeat(200);
        let summary = summarize_past_decisions(&[decision(1, &long, None)]);
        let first_line = summary.lines().next().unwrap();
        assert!(first_line.ends_with("..."));
        assert!(!first_line.contains('\n'));
        assert!(first_line.len() < 400);
    }
}
