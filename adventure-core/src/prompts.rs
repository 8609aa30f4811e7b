//! Prompt construction for the stage resolvers.
//!
//! Each prompt embeds the live game state so the model narrates from the
//! same numbers the rules act on.

use crate::state::GameState;

pub fn story_prompt(state: &GameState, player_input: &str, event_description: &str) -> String {
    format!(
        "You are telling a fantasy story. The player is in a {} with {} health.\n\
         Player inventory: {}\n\
         The player said: \"{}\"\n\
         A new event happened: {}\n\n\
         Write 2-3 sentences about what happens next. Keep it simple and fun!",
        state.location,
        state.health,
        state.inventory_display(),
        player_input,
        event_description
    )
}

pub fn combat_prompt(
    state: &GameState,
    player_input: &str,
    player_roll: u32,
    enemy_roll: u32,
) -> String {
    format!(
        "The player is fighting a {}!\n\
         Player action: \"{}\"\n\
         Player rolled: {}\n\
         Enemy rolled: {}\n\
         Player health: {}\n\n\
         Write 2-3 sentences about the fight. If the player's roll is higher, the player wins.\n\
         If the enemy's roll is higher, the player takes damage.",
        state.current_enemy.as_deref().unwrap_or("monster"),
        player_input,
        player_roll,
        enemy_roll,
        state.health
    )
}

pub fn item_prompt(state: &GameState, player_input: &str, roll: u32) -> String {
    format!(
        "The player found an item! Their inventory has: {}\n\
         Player action: \"{}\"\n\
         Item roll: {}\n\
         Player health: {}\n\n\
         Write 2-3 sentences about the item they found. If the roll is above 10, it's a great item!",
        state.inventory_display(),
        player_input,
        roll,
        state.health
    )
}
