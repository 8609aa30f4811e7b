//! Per-stage conversation transcripts.
//!
//! Each non-terminal stage keeps its own role-tagged transcript. Growth
//! is unbounded; only a sliding window of the most recent entries is
//! sent to the model per call.

use crate::state::Stage;
use openrouter::Message;
use serde::{Deserialize, Serialize};

/// How many stored entries accompany each generation request.
pub const CONTEXT_WINDOW: usize = 5;

/// How many entries the `history` command shows.
const DISPLAY_LIMIT: usize = 6;

/// Entries longer than this are truncated with an ellipsis for display.
const SNIPPET_CHARS: usize = 150;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryRole {
    User,
    Assistant,
}

/// One transcript entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub role: EntryRole,
    pub content: String,
}

impl Entry {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: EntryRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: EntryRole::Assistant,
            content: content.into(),
        }
    }

    /// Convert to a wire message for the completion request.
    pub fn to_message(&self) -> Message {
        match self.role {
            EntryRole::User => Message::user(&self.content),
            EntryRole::Assistant => Message::assistant(&self.content),
        }
    }
}

/// Conversation transcripts keyed by stage. GameOver has no transcript.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationHistory {
    story: Vec<Entry>,
    combat: Vec<Entry>,
    item: Vec<Entry>,
}

impl ConversationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self, stage: Stage) -> &[Entry] {
        match stage {
            Stage::Story => &self.story,
            Stage::Combat => &self.combat,
            Stage::Item => &self.item,
            Stage::GameOver => &[],
        }
    }

    fn entries_mut(&mut self, stage: Stage) -> Option<&mut Vec<Entry>> {
        match stage {
            Stage::Story => Some(&mut self.story),
            Stage::Combat => Some(&mut self.combat),
            Stage::Item => Some(&mut self.item),
            Stage::GameOver => None,
        }
    }

    /// Append a request/response pair to a stage's transcript.
    pub fn record(&mut self, stage: Stage, request: &str, reply: &str) {
        if let Some(log) = self.entries_mut(stage) {
            log.push(Entry::user(request));
            log.push(Entry::assistant(reply));
        }
    }

    /// The most recent `CONTEXT_WINDOW` entries as wire messages.
    pub fn window(&self, stage: Stage) -> Vec<Message> {
        let entries = self.entries(stage);
        let start = entries.len().saturating_sub(CONTEXT_WINDOW);
        entries[start..].iter().map(Entry::to_message).collect()
    }

    /// The full transcript as wire messages (pass-through mode).
    pub fn full(&self, stage: Stage) -> Vec<Message> {
        self.entries(stage).iter().map(Entry::to_message).collect()
    }

    /// Clear every stage's transcript (the `restart` command).
    pub fn clear(&mut self) {
        self.story.clear();
        self.combat.clear();
        self.item.clear();
    }

    /// Render the `history` command output for a stage: up to the last
    /// six entries, each truncated to 150 characters.
    pub fn render_recent(&self, stage: Stage) -> String {
        let mut out = format!("**Conversation history for {stage}:**\n\n");

        let entries = self.entries(stage);
        let start = entries.len().saturating_sub(DISPLAY_LIMIT);
        for (i, entry) in entries[start..].iter().enumerate() {
            let speaker = match entry.role {
                EntryRole::User => "You",
                EntryRole::Assistant => "AI",
            };
            out.push_str(&format!(
                "{}. **{}:** {}\n\n",
                i + 1,
                speaker,
                snippet(&entry.content)
            ));
        }

        out
    }
}

fn snippet(content: &str) -> String {
    if content.chars().count() > SNIPPET_CHARS {
        let truncated: String = content.chars().take(SNIPPET_CHARS).collect();
        format!("{truncated}...")
    } else {
        content.to_string()
    }
}
