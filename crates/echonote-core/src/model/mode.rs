use std::fmt;

use serde::{Deserialize, Serialize};

/// The report variant requested for a recording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    #[default]
    Quick,
    Meeting,
    Lecture,
    Story,
    Decision,
}

impl Mode {
    pub const ALL: [Mode; 5] = [
        Mode::Quick,
        Mode::Meeting,
        Mode::Lecture,
        Mode::Story,
        Mode::Decision,
    ];

    /// Exact, case-insensitive lookup by name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "quick" => Some(Self::Quick),
            "meeting" => Some(Self::Meeting),
            "lecture" => Some(Self::Lecture),
            "story" => Some(Self::Story),
            "decision" => Some(Self::Decision),
            _ => None,
        }
    }

    /// Parse a mode name, falling back to [`Mode::Quick`] for anything unrecognized.
    pub fn parse_lenient(name: &str) -> Self {
        Self::from_name(name).unwrap_or_else(|| {
            tracing::debug!("Unknown mode {name:?}, using quick");
            Self::Quick
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Quick => "quick",
            Self::Meeting => "meeting",
            Self::Lecture => "lecture",
            Self::Story => "story",
            Self::Decision => "decision",
        }
    }

    /// Capitalized name used in report titles.
    pub fn title(self) -> &'static str {
        match self {
            Self::Quick => "Quick",
            Self::Meeting => "Meeting",
            Self::Lecture => "Lecture",
            Self::Story => "Story",
            Self::Decision => "Decision",
        }
    }

    pub fn profile(self) -> &'static ModeProfile {
        match self {
            Self::Quick => &QUICK,
            Self::Meeting => &MEETING,
            Self::Lecture => &LECTURE,
            Self::Story => &STORY,
            Self::Decision => &DECISION,
        }
    }

    pub fn features(self) -> TranscriptionFeatureSet {
        self.profile().features
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Flags requested from the transcription provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptionFeatureSet {
    pub speaker_labels: bool,
    pub auto_chapters: bool,
    pub entity_detection: bool,
    pub sentiment_analysis: bool,
}

impl TranscriptionFeatureSet {
    const fn with(speaker_labels: bool, auto_chapters: bool) -> Self {
        Self {
            speaker_labels,
            auto_chapters,
            entity_detection: true,
            sentiment_analysis: true,
        }
    }
}

/// Where a mode's reports are filed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputClass {
    /// Short-lived notes awaiting triage.
    Inbox,
    /// Long-lived narrative archive.
    Chronicle,
    DecisionArchive,
}

/// One heading the analysis is asked to produce, with a hint of what goes under it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionSpec {
    pub heading: &'static str,
    pub guidance: &'static str,
}

/// Everything a mode implies, kept in one place.
#[derive(Debug)]
pub struct ModeProfile {
    pub persona: &'static str,
    pub sections: &'static [SectionSpec],
    pub features: TranscriptionFeatureSet,
    pub output: OutputClass,
    /// Whether runs read the journal (memory or decision log) and write back to it.
    pub consults_context: bool,
    /// Whether the prompt carries the full journal memory.
    pub embeds_memory: bool,
}

impl ModeProfile {
    pub fn headings(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.sections.iter().map(|s| s.heading)
    }
}

const fn section(heading: &'static str, guidance: &'static str) -> SectionSpec {
    SectionSpec { heading, guidance }
}

static QUICK: ModeProfile = ModeProfile {
    persona: "You are a helpful assistant. Summarize this recording briefly.",
    sections: &[
        section("Summary", "Concise summary"),
        section("Main Points", "Bullet points"),
    ],
    features: TranscriptionFeatureSet::with(false, false),
    output: OutputClass::Inbox,
    consults_context: false,
    embeds_memory: false,
};

static MEETING: ModeProfile = ModeProfile {
    persona: "You are an expert executive assistant. Analyze the provided transcript and \
              generate a comprehensive meeting report.",
    sections: &[
        section(
            "Meeting Summary",
            "Provide a concise executive summary of the meeting",
        ),
        section("Key Takeaways", "List the main points discussed"),
        section(
            "Action Items",
            "List specific tasks, who is responsible (if mentioned), and deadlines",
        ),
        section(
            "Decisions Made",
            "List any concrete decisions or agreements reached",
        ),
        section(
            "Sentiment Analysis",
            "Briefly describe the overall tone and sentiment of the meeting",
        ),
    ],
    features: TranscriptionFeatureSet::with(true, false),
    output: OutputClass::Inbox,
    consults_context: false,
    embeds_memory: false,
};

static LECTURE: ModeProfile = ModeProfile {
    persona: "You are a diligent student. Analyze this lecture transcript and create a \
              study guide.",
    sections: &[
        section("Lecture Topic", "Brief summary of the main topic"),
        section("Core Concepts", "List and define the key concepts explained"),
        section(
            "Detailed Notes",
            "Summarize the lecture content chronologically",
        ),
        section(
            "Quiz Questions",
            "Generate 3-5 questions to test understanding of this material",
        ),
    ],
    features: TranscriptionFeatureSet::with(false, true),
    output: OutputClass::Inbox,
    consults_context: false,
    embeds_memory: false,
};

static STORY: ModeProfile = ModeProfile {
    persona: "You are the chronicler of the user's life story. Turn this recording into the \
              next chapter, keeping continuity with the timeline and characters you already know.",
    sections: &[
        section("Chapter Title", "A short, evocative title for this chapter"),
        section(
            "Narrative",
            "Retell the events as a narrative, referring to known characters by name",
        ),
        section(
            "Thematic Link",
            "Connect this chapter to earlier timeline events and recurring themes",
        ),
    ],
    features: TranscriptionFeatureSet::with(false, true),
    output: OutputClass::Chronicle,
    consults_context: true,
    embeds_memory: true,
};

static DECISION: ModeProfile = ModeProfile {
    persona: "You are a clear-eyed decision analyst. Build a decision matrix for the choice \
              described in this recording.",
    sections: &[
        section("Dilemma", "State the decision being faced"),
        section("Choice", "The option that was chosen, or is favored"),
        section("Outcome", "The actual or expected outcome of that choice"),
        section(
            "Analysis",
            "Weigh the options against each other: risks, trade-offs, and what would change the call",
        ),
    ],
    features: TranscriptionFeatureSet::with(false, false),
    output: OutputClass::DecisionArchive,
    consults_context: true,
    embeds_memory: false,
};
