//! Persona handoff variant.
//!
//! Instead of the stage state machine, this mode runs a small party of
//! named personas, each bound to its own model and instructions. A fixed
//! directed graph says who may take over from whom; the active-persona
//! pointer moves along its edges. A handoff produces an explicit
//! [`HandoffEvent`] returned to the caller — the "X takes over!"
//! notification is the event's rendering, never background work.

use crate::generate::TextGenerator;
use crate::history::Entry;
use crate::stages::GENERATION_TEMPERATURE;
use openrouter::{Message, Request};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

const NARRATIVE_MODEL: &str = "openai/gpt-4o-mini";
const MECHANICS_MODEL: &str = "mistralai/mistral-small-3.2-24b-instruct";

/// A named role bound to a specific model configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Persona {
    GameMaster,
    Narrator,
    Monster,
    Item,
}

impl Persona {
    pub fn name(&self) -> &'static str {
        match self {
            Persona::GameMaster => "GameMaster",
            Persona::Narrator => "Narrator",
            Persona::Monster => "Monster",
            Persona::Item => "Item",
        }
    }

    /// The model this persona runs on. Storytelling personas get the
    /// creative model, mechanics personas the precise one.
    pub fn model(&self) -> &'static str {
        match self {
            Persona::GameMaster | Persona::Narrator => NARRATIVE_MODEL,
            Persona::Monster | Persona::Item => MECHANICS_MODEL,
        }
    }

    /// System instructions for this persona.
    pub fn instructions(&self) -> &'static str {
        match self {
            Persona::GameMaster => {
                "You coordinate a fantasy adventure. Welcome the player, track the game \
                 state embedded in each message, and decide whether the Narrator, Monster, \
                 or Item persona should handle what happens next. Keep responses short and \
                 always offer 2-3 clear choices."
            }
            Persona::Narrator => {
                "You narrate a fantasy adventure, creating vivid scenes and progressing \
                 the story based on player choices. Use random events to keep the world \
                 alive. Keep responses to a few sentences and offer 2-3 clear choices."
            }
            Persona::Monster => {
                "You manage combat. Use dice rolls for attacks and damage, describe \
                 battles vividly, and offer 2-3 choices such as attacking, using a \
                 potion, or fleeing."
            }
            Persona::Item => {
                "You manage inventory and rewards. Use dice rolls for loot, describe the \
                 items found, and offer 2-3 choices for what to take or do next."
            }
        }
    }

    /// The fixed handoff graph: the GameMaster delegates to the
    /// specialists; specialists keep control once they have it.
    pub fn handoff_targets(&self) -> &'static [Persona] {
        match self {
            Persona::GameMaster => &[Persona::Narrator, Persona::Monster, Persona::Item],
            _ => &[],
        }
    }
}

impl fmt::Display for Persona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HandoffError {
    #[error("{from} cannot hand off to {to}")]
    IllegalHandoff { from: Persona, to: Persona },
}

/// Notification that control moved between personas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandoffEvent {
    pub from: Persona,
    pub to: Persona,
}

impl HandoffEvent {
    /// The one-line notification shown to the player.
    pub fn announcement(&self) -> String {
        format!("**{}** takes over!", self.to)
    }
}

/// Holds the handoff graph's active-node pointer.
#[derive(Debug, Clone)]
pub struct HandoffRouter {
    active: Persona,
}

impl HandoffRouter {
    pub fn new() -> Self {
        Self {
            active: Persona::GameMaster,
        }
    }

    pub fn active(&self) -> Persona {
        self.active
    }

    /// Move control to `to`, if the graph allows it.
    pub fn hand_off(&mut self, to: Persona) -> Result<HandoffEvent, HandoffError> {
        if !self.active.handoff_targets().contains(&to) {
            return Err(HandoffError::IllegalHandoff {
                from: self.active,
                to,
            });
        }
        let event = HandoffEvent {
            from: self.active,
            to,
        };
        self.active = to;
        Ok(event)
    }
}

impl Default for HandoffRouter {
    fn default() -> Self {
        Self::new()
    }
}

/// Player stats for the party variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerInfo {
    pub name: String,
    pub health: i32,
    pub gold: i32,
}

/// Game state for the party variant, embedded as JSON into each message
/// so every persona sees the same numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartyState {
    pub player: PlayerInfo,
    pub inventory: Vec<String>,
    pub location: String,
    pub quest: String,
}

impl PartyState {
    pub fn new() -> Self {
        Self {
            player: PlayerInfo {
                name: "Adventurer".to_string(),
                health: 50,
                gold: 20,
            },
            inventory: vec![
                "Sword".to_string(),
                "Armor".to_string(),
                "Potion".to_string(),
            ],
            location: "Village".to_string(),
            quest: "Find the Lost Gem".to_string(),
        }
    }
}

impl Default for PartyState {
    fn default() -> Self {
        Self::new()
    }
}

/// A party-variant session: one shared transcript, one active persona.
pub struct PartySession<G: TextGenerator> {
    generator: G,
    router: HandoffRouter,
    state: PartyState,
    transcript: Vec<Entry>,
}

impl<G: TextGenerator> PartySession<G> {
    pub fn new(generator: G) -> Self {
        Self {
            generator,
            router: HandoffRouter::new(),
            state: PartyState::new(),
            transcript: Vec::new(),
        }
    }

    /// The session-start rendering with the character block.
    pub fn welcome(&self) -> String {
        format!(
            "# Fantasy Adventure\n\n\
             **Features:**\n\
             - Immersive story\n\
             - Dice-based combat\n\
             - Inventory & rewards\n\n\
             **Character:**\n\
             - **Name:** {}\n\
             - **Health:** {}\n\
             - **Gold:** {}\n\
             - **Location:** {}\n\
             - **Quest:** {}\n\n\
             **Ready?** Type \"start\" to begin!",
            self.state.player.name,
            self.state.player.health,
            self.state.player.gold,
            self.state.location,
            self.state.quest
        )
    }

    pub fn active_persona(&self) -> Persona {
        self.router.active()
    }

    /// Hand control to another persona. The returned event carries the
    /// "takes over" notification for the transport to display.
    pub fn hand_off(&mut self, to: Persona) -> Result<HandoffEvent, HandoffError> {
        self.router.hand_off(to)
    }

    /// Process one player input through the active persona. Never fails;
    /// a generation error returns a retry diagnostic and mutates nothing.
    pub async fn player_input(&mut self, text: &str) -> String {
        let persona = self.router.active();

        let state_json = match serde_json::to_string(&self.state) {
            Ok(json) => json,
            Err(err) => return format!("**Error:** {err}"),
        };
        let entry_content = format!("Action: {text}\nState: {state_json}");

        let mut messages = Vec::with_capacity(self.transcript.len() + 2);
        messages.push(Message::system(persona.instructions()));
        messages.extend(self.transcript.iter().map(Entry::to_message));
        messages.push(Message::user(&entry_content));

        let request = Request::new(messages)
            .with_model(persona.model())
            .with_temperature(GENERATION_TEMPERATURE);

        match self.generator.generate(request).await {
            Ok(reply) => {
                self.transcript.push(Entry::user(entry_content));
                self.transcript.push(Entry::assistant(&reply));
                reply
            }
            Err(err) => format!(
                "**Something went wrong!** {err}\n\n\
                 Check your OPENROUTER_API_KEY and type your action again."
            ),
        }
    }

    pub fn state(&self) -> &PartyState {
        &self.state
    }

    pub fn transcript(&self) -> &[Entry] {
        &self.transcript
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }
}
