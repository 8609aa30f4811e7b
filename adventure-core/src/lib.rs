//! LLM-driven fantasy adventure engine.
//!
//! This crate provides:
//! - A turn-based stage state machine (story, combat, item, game over)
//!   whose narration comes from hosted model completions while the
//!   numeric rules stay local and deterministic
//! - Dice and random-event generators with silent-fallback parameters
//! - A persona handoff variant with a fixed delegation graph
//! - Per-session state with no process-global sharing
//!
//! # Quick Start
//!
//! ```ignore
//! use adventure_core::GameSession;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut session = GameSession::from_env()?;
//!     println!("{}", session.welcome());
//!
//!     let reply = session.player_input("I explore the forest").await;
//!     println!("{reply}");
//!     Ok(())
//! }
//! ```

pub mod dice;
pub mod events;
pub mod generate;
pub mod handoff;
pub mod history;
pub mod prompts;
pub mod router;
pub mod session;
pub mod stages;
pub mod state;
pub mod testing;

// Primary public API
pub use generate::TextGenerator;
pub use handoff::{HandoffError, HandoffEvent, HandoffRouter, PartySession, PartyState, Persona};
pub use history::{ConversationHistory, Entry, EntryRole};
pub use router::{StageRouter, GAME_OVER_MESSAGE};
pub use session::GameSession;
pub use stages::{EngineError, StageResolver, Turn};
pub use state::{GameState, Stage};
pub use testing::{MockGenerator, MockReply, TestHarness};
