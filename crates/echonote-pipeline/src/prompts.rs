//! Instruction text for the primary analysis call.
//!
//! Every mode's template names the exact Markdown headings the analysis must
//! produce. The headings are an agreement with the provider; nothing in the
//! pipeline checks that the answer follows them.

use echonote_core::model::{Memory, Mode};

/// Render the analysis instruction for `mode`.
///
/// `context` is only used by modes whose profile embeds memory (story); a
/// missing context renders as an empty journal.
pub fn render_primary_prompt(mode: Mode, context: Option<&Memory>) -> String {
    let profile = mode.profile();
    let mut prompt = String::new();

    prompt.push_str(profile.persona);
    prompt.push_str("\n\n");

    if profile.embeds_memory {
        let memory_json = match context {
            Some(memory) => serde_json::to_string_pretty(memory).unwrap_or_default(),
            None => serde_json::to_string_pretty(&Memory::default()).unwrap_or_default(),
        };
        prompt.push_str("**Life context so far** (timeline events and characters):\n");
        prompt.push_str(&memory_json);
        prompt.push_str(
            "\n\nWeave this recording into that continuity. Reuse the names of known \
             characters and refer back to earlier events where they connect.\n\n",
        );
    }

    prompt.push_str("Please provide the output in the following Markdown format:\n");
    for section in profile.sections {
        prompt.push_str(&format!("# {}\n[{}]\n", section.heading, section.guidance));
    }
    prompt
}
