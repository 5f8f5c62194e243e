use std::path::PathBuf;

use rmcp::model::{ServerCapabilities, ServerInfo};
use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    tool, tool_handler, tool_router, ServerHandler,
};
use schemars::JsonSchema;
use serde::Deserialize;

use echonote_core::model::{Event, NewDecision};
use echonote_core::storage::{ContextStore, FileStore};

/// MCP server exposing the life journal (memory and decision log) to AI agents.
///
/// Holds the brain directory rather than an open store; each tool call opens
/// a `FileStore`, whose lock file keeps it consistent with concurrent CLI runs.
#[derive(Debug, Clone)]
pub struct EchonoteMcpServer {
    brain_dir: PathBuf,
    tool_router: ToolRouter<Self>,
}

impl EchonoteMcpServer {
    /// Create a new MCP server for the journal stored in `brain_dir`.
    pub fn new(brain_dir: PathBuf) -> Self {
        Self {
            brain_dir,
            tool_router: Self::tool_router(),
        }
    }

    fn open_store(&self) -> Result<FileStore, String> {
        FileStore::open(&self.brain_dir).map_err(|e| format!("Failed to open journal: {e}"))
    }
}

// -- Tool parameter structs --

#[derive(Debug, Deserialize, JsonSchema)]
pub struct DecisionsParams {
    /// Only return the most recent N decisions (default: all)
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct AddEventParams {
    /// Timeline entry to append, stored as plain text
    pub entry: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct UpsertCharacterParams {
    /// Character name, used as the key in the character sheet
    pub name: String,
    /// New note about the character; earlier notes are kept
    pub description: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct LogDecisionParams {
    /// The dilemma that was faced
    pub dilemma: String,
    /// The option that was chosen
    pub choice_made: String,
    /// What actually happened afterwards
    pub actual_outcome: String,
    /// Simulated outcome of the path not taken (optional)
    pub alternate_timeline: Option<String>,
}

// -- Tool implementations --

#[tool_router]
impl EchonoteMcpServer {
    #[tool(
        description = "Return the life-journal memory as JSON: timeline events and characters with their accumulated descriptions."
    )]
    fn journal_memory(&self) -> Result<String, String> {
        let store = self.open_store()?;
        let memory = store
            .get_memory()
            .map_err(|e| format!("Failed to read memory: {e}"))?;
        serde_json::to_string_pretty(&memory.to_context_json())
            .map_err(|e| format!("Failed to encode memory: {e}"))
    }

    #[tool(description = "List logged life decisions, oldest first, with outcomes and ghost ship timelines.")]
    fn journal_decisions(
        &self,
        Parameters(params): Parameters<DecisionsParams>,
    ) -> Result<String, String> {
        let store = self.open_store()?;
        let decisions = store
            .get_decisions()
            .map_err(|e| format!("Failed to read decisions: {e}"))?;
        if decisions.is_empty() {
            return Ok("No decisions logged yet.".to_string());
        }

        let skip = params
            .limit
            .map_or(0, |limit| decisions.len().saturating_sub(limit));
        let mut out = format!("{} decision(s) logged\n\n", decisions.len());
        for d in &decisions[skip..] {
            out.push_str(&format!(
                "#{} ({})\n  Dilemma: {}\n  Chose: {}\n  Outcome: {}\n",
                d.id,
                d.timestamp.format("%Y-%m-%d %H:%M"),
                d.dilemma,
                d.choice_made,
                d.actual_outcome
            ));
            if let Some(alt) = &d.alternate_timeline {
                out.push_str(&format!("  Ghost ship: {alt}\n"));
            }
        }
        Ok(out)
    }

    #[tool(description = "Append an entry to the life-journal timeline.")]
    fn journal_add_event(
        &self,
        Parameters(params): Parameters<AddEventParams>,
    ) -> Result<String, String> {
        if params.entry.trim().is_empty() {
            return Err("Event entry must not be empty".to_string());
        }
        let store = self.open_store()?;
        store
            .append_event(Event::text(params.entry))
            .map_err(|e| format!("Failed to append event: {e}"))?;
        Ok("Event added to timeline.".to_string())
    }

    #[tool(
        description = "Add a note about a character. New characters are created; existing ones keep their earlier notes."
    )]
    fn journal_upsert_character(
        &self,
        Parameters(params): Parameters<UpsertCharacterParams>,
    ) -> Result<String, String> {
        if params.name.trim().is_empty() {
            return Err("Character name must not be empty".to_string());
        }
        let store = self.open_store()?;
        store
            .upsert_character(&params.name, &params.description)
            .map_err(|e| format!("Failed to update character: {e}"))?;
        let memory = store
            .get_memory()
            .map_err(|e| format!("Failed to read memory: {e}"))?;
        let description = memory
            .character_description(&params.name)
            .unwrap_or_default();
        Ok(format!("{}: {description}", params.name))
    }

    #[tool(description = "Log a life decision and return its assigned id.")]
    fn journal_log_decision(
        &self,
        Parameters(params): Parameters<LogDecisionParams>,
    ) -> Result<String, String> {
        let store = self.open_store()?;
        let decision = store
            .append_decision(NewDecision {
                dilemma: params.dilemma,
                choice_made: params.choice_made,
                actual_outcome: params.actual_outcome,
                alternate_timeline: params.alternate_timeline,
            })
            .map_err(|e| format!("Failed to log decision: {e}"))?;
        Ok(format!("Decision #{} logged.", decision.id))
    }
}

#[tool_handler]
impl ServerHandler for EchonoteMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Echonote MCP Server - Read and extend the life journal built from voice notes. \
                 Inspect memory and characters, log decisions, append timeline events."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

/// Start the MCP server on stdio transport.
pub async fn run_stdio(brain_dir: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    use rmcp::transport::stdio;
    use rmcp::ServiceExt;

    tracing::info!("Serving journal at {} over stdio", brain_dir.display());
    let server = EchonoteMcpServer::new(brain_dir);
    let service = server.serve(stdio()).await?;
    service.waiting().await?;
    Ok(())
}
