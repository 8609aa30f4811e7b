//! GameSession — the session boundary for the transport layer.
//!
//! A chat transport creates one `GameSession` per connection, shows
//! `welcome()` on session start, and feeds every player message through
//! `player_input()`. Sessions are plain owned values; nothing here is
//! process-global, so independent sessions never share state.

use crate::generate::TextGenerator;
use crate::history::ConversationHistory;
use crate::router::StageRouter;
use crate::stages::EngineError;
use crate::state::{GameState, Stage};
use openrouter::Client;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// One player's game: state, transcripts, dice, and the model handle.
pub struct GameSession<G: TextGenerator> {
    generator: G,
    router: StageRouter,
    state: GameState,
    history: ConversationHistory,
    rng: StdRng,
}

impl GameSession<Client> {
    /// Create a session from the OPENROUTER_API_KEY environment variable.
    pub fn from_env() -> Result<Self, EngineError> {
        let client = Client::from_env().map_err(|_| EngineError::NoApiKey)?;
        Ok(Self::new(client))
    }
}

impl<G: TextGenerator> GameSession<G> {
    pub fn new(generator: G) -> Self {
        Self::with_rng(generator, StdRng::from_entropy())
    }

    /// Create a session with a specific RNG (useful for testing).
    pub fn with_rng(generator: G, rng: StdRng) -> Self {
        Self {
            generator,
            router: StageRouter::new(),
            state: GameState::new(),
            history: ConversationHistory::new(),
            rng,
        }
    }

    /// The session-start rendering: how to play, plus an initial status line.
    pub fn welcome(&self) -> String {
        format!(
            "# Welcome to Fantasy Adventure!\n\n\
             ## How to Play:\n\
             - Type your actions naturally (e.g., \"I explore the forest\", \"I attack the goblin\")\n\
             - **status** - Show current game state\n\
             - **history** - Show conversation history\n\
             - **restart** - Start a new game\n\
             - **prompt: [message]** - Send a custom prompt straight to the AI\n\n\
             **Your adventure begins in a peaceful village...**\n\n{}",
            self.state.render_status_line()
        )
    }

    /// Process one player input and return the display text. Never fails:
    /// generation errors come back as a diagnostic message and leave the
    /// session untouched.
    pub async fn player_input(&mut self, text: &str) -> String {
        self.router
            .dispatch(
                text,
                &mut self.state,
                &mut self.history,
                &mut self.rng,
                &self.generator,
            )
            .await
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Direct state access, bypassing the stage rules. Test setup only.
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut ConversationHistory {
        &mut self.history
    }

    pub fn current_stage(&self) -> Stage {
        self.state.current_stage
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }
}
