//! Stage resolvers — the turn-based state machine core.
//!
//! One resolver per non-terminal stage. Every resolver follows the same
//! ordering: build the prompt, make the generation call, and only then
//! touch state or history. A failed call therefore leaves the session
//! exactly as it was, so the player can resend the same input.

use crate::dice::roll_d20_with_rng;
use crate::events::Event;
use crate::generate::TextGenerator;
use crate::history::ConversationHistory;
use crate::prompts;
use crate::state::{GameState, Stage};
use async_trait::async_trait;
use openrouter::{Message, Request};
use rand::RngCore;
use thiserror::Error;

/// Temperature used for every narrative generation call.
pub const GENERATION_TEMPERATURE: f32 = 0.7;

/// Input prefix that bypasses game rules and talks to the model directly.
const PASS_THROUGH_PREFIX: &str = "prompt:";

/// Errors from the game engine.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Text generation failed: {0}")]
    Generation(#[from] openrouter::Error),

    #[error("No API key configured - set OPENROUTER_API_KEY environment variable")]
    NoApiKey,
}

/// A resolved turn: what to display and where the session goes next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub display: String,
    pub next: Stage,
}

/// One stage's resolution rules.
#[async_trait]
pub trait StageResolver: Send + Sync {
    async fn resolve(
        &self,
        input: &str,
        state: &mut GameState,
        history: &mut ConversationHistory,
        rng: &mut (dyn RngCore + Send),
        generator: &dyn TextGenerator,
    ) -> Result<Turn, EngineError>;
}

/// Strip the pass-through prefix, case-insensitively.
fn pass_through(input: &str) -> Option<&str> {
    let head = input.get(..PASS_THROUGH_PREFIX.len())?;
    if head.eq_ignore_ascii_case(PASS_THROUGH_PREFIX) {
        Some(input[PASS_THROUGH_PREFIX.len()..].trim())
    } else {
        None
    }
}

/// Pass-through mode: send the raw message with the stage's full
/// transcript, record the exchange, stay on the current stage.
async fn resolve_pass_through(
    stage: Stage,
    raw: &str,
    history: &mut ConversationHistory,
    generator: &dyn TextGenerator,
) -> Result<Turn, EngineError> {
    let mut messages = history.full(stage);
    messages.push(Message::user(raw));

    let request = Request::new(messages).with_temperature(GENERATION_TEMPERATURE);
    let reply = generator.generate(request).await?;
    history.record(stage, raw, &reply);

    Ok(Turn {
        display: format!("**AI Response:** {reply}"),
        next: stage,
    })
}

/// Send a stage prompt with the windowed transcript and record it.
async fn generate_for_stage(
    stage: Stage,
    prompt: &str,
    history: &mut ConversationHistory,
    generator: &dyn TextGenerator,
) -> Result<String, EngineError> {
    let mut messages = history.window(stage);
    messages.push(Message::user(prompt));

    let request = Request::new(messages).with_temperature(GENERATION_TEMPERATURE);
    let reply = generator.generate(request).await?;
    history.record(stage, prompt, &reply);
    Ok(reply)
}

/// Handles story and exploration.
pub struct StoryResolver;

#[async_trait]
impl StageResolver for StoryResolver {
    async fn resolve(
        &self,
        input: &str,
        state: &mut GameState,
        history: &mut ConversationHistory,
        rng: &mut (dyn RngCore + Send),
        generator: &dyn TextGenerator,
    ) -> Result<Turn, EngineError> {
        if let Some(raw) = pass_through(input) {
            return resolve_pass_through(Stage::Story, raw, history, generator).await;
        }

        let event = Event::draw_with_rng(rng);
        let prompt = prompts::story_prompt(state, input, event.description());
        let reply = generate_for_stage(Stage::Story, &prompt, history, generator).await?;

        let mut display = format!(
            "**Event:** {}\n\n**Story:** {}",
            event.description(),
            reply
        );

        let next = state.apply_event(&event);
        match (&event, next) {
            (_, Stage::Combat) => display.push_str("\n\n**Combat initiated!**"),
            (Event::Treasure { item, .. }, Stage::Item) => {
                display.push_str(&format!("\n\n**Added {item} to inventory!**"));
            }
            _ => {}
        }

        Ok(Turn { display, next })
    }
}

/// Handles fighting monsters.
pub struct CombatResolver;

#[async_trait]
impl StageResolver for CombatResolver {
    async fn resolve(
        &self,
        input: &str,
        state: &mut GameState,
        history: &mut ConversationHistory,
        rng: &mut (dyn RngCore + Send),
        generator: &dyn TextGenerator,
    ) -> Result<Turn, EngineError> {
        if let Some(raw) = pass_through(input) {
            return resolve_pass_through(Stage::Combat, raw, history, generator).await;
        }

        let player_roll = roll_d20_with_rng(rng);
        let enemy_roll = roll_d20_with_rng(rng);

        let prompt = prompts::combat_prompt(state, input, player_roll, enemy_roll);
        let reply = generate_for_stage(Stage::Combat, &prompt, history, generator).await?;

        let mut display = format!(
            "**Your roll:** {player_roll} | **Enemy roll:** {enemy_roll}\n\n**Combat:** {reply}"
        );

        let next = state.apply_combat_round(player_roll, enemy_roll);
        match next {
            Stage::Story => display.push_str("\n\n**You won the fight!**"),
            Stage::Combat => {
                display.push_str(&format!("\n\n**You took damage! Health: {}**", state.health));
            }
            Stage::GameOver => {
                display.push_str(&format!(
                    "\n\n**You took damage! Health: {}**\n\n**Game Over!**",
                    state.health
                ));
            }
            Stage::Item => {}
        }

        Ok(Turn { display, next })
    }
}

/// Handles items and inventory.
pub struct ItemResolver;

#[async_trait]
impl StageResolver for ItemResolver {
    async fn resolve(
        &self,
        input: &str,
        state: &mut GameState,
        history: &mut ConversationHistory,
        rng: &mut (dyn RngCore + Send),
        generator: &dyn TextGenerator,
    ) -> Result<Turn, EngineError> {
        if let Some(raw) = pass_through(input) {
            return resolve_pass_through(Stage::Item, raw, history, generator).await;
        }

        let roll = roll_d20_with_rng(rng);
        let prompt = prompts::item_prompt(state, input, roll);
        let reply = generate_for_stage(Stage::Item, &prompt, history, generator).await?;

        let mut display = format!("**Item roll:** {roll}\n\n**Item Discovery:** {reply}");

        let health_before = state.health;
        let next = state.apply_item_roll(roll);
        if state.health != health_before {
            display.push_str(&format!("\n\n**You feel better! Health: {}**", state.health));
        }

        Ok(Turn { display, next })
    }
}
