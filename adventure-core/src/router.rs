//! Stage router: out-of-band commands, the terminal-state gate, and
//! dispatch to the active stage's resolver.
//!
//! This is the single place where generation failures become player-
//! visible text. A failed turn changes nothing; the player retries.

use crate::generate::TextGenerator;
use crate::history::ConversationHistory;
use crate::stages::{CombatResolver, EngineError, ItemResolver, StageResolver, StoryResolver};
use crate::state::{GameState, Stage};
use rand::RngCore;
use std::collections::HashMap;

/// Fixed message for gameplay input after the game has ended.
pub const GAME_OVER_MESSAGE: &str = "**Game Over!** Type `restart` to play again.";

const RESTART_MESSAGE: &str =
    "**Game restarted!** Your adventure begins anew in the village.";

/// Maps each non-terminal stage to its resolver.
pub struct StageRouter {
    resolvers: HashMap<Stage, Box<dyn StageResolver>>,
}

impl StageRouter {
    pub fn new() -> Self {
        let mut resolvers: HashMap<Stage, Box<dyn StageResolver>> = HashMap::new();
        resolvers.insert(Stage::Story, Box::new(StoryResolver));
        resolvers.insert(Stage::Combat, Box::new(CombatResolver));
        resolvers.insert(Stage::Item, Box::new(ItemResolver));
        Self { resolvers }
    }

    /// Process one player input against the session's state.
    ///
    /// Commands (`status`, `history`, `restart`) are handled before the
    /// GameOver gate so a finished game can still be inspected and
    /// restarted. Always returns display text; errors from the
    /// generation call are converted to a diagnostic here and mutate
    /// nothing.
    pub async fn dispatch(
        &self,
        input: &str,
        state: &mut GameState,
        history: &mut ConversationHistory,
        rng: &mut (dyn RngCore + Send),
        generator: &dyn TextGenerator,
    ) -> String {
        let input = input.trim();

        match input.to_ascii_lowercase().as_str() {
            "status" => return state.render_status(),
            "history" => return history.render_recent(state.current_stage),
            "restart" => {
                state.reset();
                history.clear();
                return RESTART_MESSAGE.to_string();
            }
            _ => {}
        }

        if state.current_stage == Stage::GameOver {
            return GAME_OVER_MESSAGE.to_string();
        }

        let Some(resolver) = self.resolvers.get(&state.current_stage) else {
            return GAME_OVER_MESSAGE.to_string();
        };

        match resolver.resolve(input, state, history, rng, generator).await {
            Ok(turn) => {
                state.current_stage = turn.next;
                turn.display
            }
            Err(err) => diagnostic(&err),
        }
    }
}

impl Default for StageRouter {
    fn default() -> Self {
        Self::new()
    }
}

fn diagnostic(err: &EngineError) -> String {
    format!(
        "**Error:** {err}\n\n\
         Make sure your OPENROUTER_API_KEY is set correctly, then try your action again."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_router_registers_all_gameplay_stages() {
        let router = StageRouter::new();
        assert!(router.resolvers.contains_key(&Stage::Story));
        assert!(router.resolvers.contains_key(&Stage::Combat));
        assert!(router.resolvers.contains_key(&Stage::Item));
        assert!(!router.resolvers.contains_key(&Stage::GameOver));
    }

    #[test]
    fn test_diagnostic_mentions_credentials() {
        let message = diagnostic(&EngineError::NoApiKey);
        assert!(message.contains("OPENROUTER_API_KEY"));
    }
}
