//! Game state and the fixed stage-transition rules.
//!
//! The rules that move the state machine are deliberately independent of
//! model output: the LLM narrates, the numbers here decide. Each rule is
//! a plain method so the numeric contracts are testable without any
//! generator in the loop.

use crate::events::Event;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const STARTING_HEALTH: i32 = 100;
pub const MAX_HEALTH: i32 = 100;
pub const COMBAT_DAMAGE: i32 = 20;
pub const ITEM_HEAL: i32 = 30;
pub const ITEM_HEAL_THRESHOLD: u32 = 15;
pub const STARTING_LOCATION: &str = "village";

/// The phase of a game session, determining which resolution rules apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage {
    Story,
    Combat,
    Item,
    GameOver,
}

impl Stage {
    pub fn name(&self) -> &'static str {
        match self {
            Stage::Story => "story",
            Stage::Combat => "combat",
            Stage::Item => "item",
            Stage::GameOver => "game over",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Per-session game state. Owned by exactly one session and mutated only
/// by the resolver active for that session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub health: i32,
    pub inventory: Vec<String>,
    pub location: String,
    pub in_combat: bool,
    pub current_enemy: Option<String>,
    pub current_stage: Stage,
}

impl GameState {
    pub fn new() -> Self {
        Self {
            health: STARTING_HEALTH,
            inventory: vec!["sword".to_string(), "potion".to_string()],
            location: STARTING_LOCATION.to_string(),
            in_combat: false,
            current_enemy: None,
            current_stage: Stage::Story,
        }
    }

    /// Reset to the starting state (the `restart` command).
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Apply a drawn story event and return the stage it leads to.
    pub fn apply_event(&mut self, event: &Event) -> Stage {
        match event {
            Event::Monster { name, .. } => {
                self.in_combat = true;
                self.current_enemy = Some(name.clone());
                Stage::Combat
            }
            Event::Treasure { item, .. } => {
                self.inventory.push(item.clone());
                Stage::Item
            }
            Event::Story { .. } => Stage::Story,
        }
    }

    /// Apply one round of combat. Ties favor the enemy.
    ///
    /// Damage is not clamped; health may go negative internally and is
    /// treated as dead at zero or below.
    pub fn apply_combat_round(&mut self, player_roll: u32, enemy_roll: u32) -> Stage {
        if player_roll > enemy_roll {
            self.in_combat = false;
            self.current_enemy = None;
            Stage::Story
        } else {
            self.health -= COMBAT_DAMAGE;
            if self.health <= 0 {
                Stage::GameOver
            } else {
                Stage::Combat
            }
        }
    }

    /// Apply an item roll. Healing is capped at `MAX_HEALTH`; the item
    /// event is single-turn, so the next stage is always Story.
    pub fn apply_item_roll(&mut self, roll: u32) -> Stage {
        if roll > ITEM_HEAL_THRESHOLD {
            self.health = (self.health + ITEM_HEAL).min(MAX_HEALTH);
        }
        Stage::Story
    }

    pub fn inventory_display(&self) -> String {
        self.inventory.join(", ")
    }

    /// Render the `status` command output.
    pub fn render_status(&self) -> String {
        format!(
            "**Current Status:**\n\
             **Health:** {}\n\
             **Inventory:** {}\n\
             **Location:** {}\n\
             **Stage:** {}\n\
             **In Combat:** {}",
            self.health,
            self.inventory_display(),
            self.location,
            self.current_stage,
            if self.in_combat { "Yes" } else { "No" }
        )
    }

    /// The one-line status summary shown after the welcome message.
    pub fn render_status_line(&self) -> String {
        format!(
            "**Health:** {} | **Inventory:** {} | **Location:** {}",
            self.health,
            self.inventory_display(),
            self.location
        )
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}
