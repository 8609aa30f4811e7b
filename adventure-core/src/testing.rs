//! Testing utilities.
//!
//! This module provides tools for integration testing:
//! - `MockGenerator` for deterministic testing without API calls
//! - `TestHarness` for scripted game scenarios
//! - Assertion helpers for verifying game state

use crate::generate::TextGenerator;
use crate::session::GameSession;
use crate::state::Stage;
use async_trait::async_trait;
use openrouter::Request;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::VecDeque;
use std::sync::Mutex;

/// One scripted outcome for a generation call.
#[derive(Debug, Clone)]
pub enum MockReply {
    Text(String),
    Failure { status: u16, message: String },
}

/// A text generator that returns scripted replies in order and records
/// every request it receives.
pub struct MockGenerator {
    replies: Mutex<VecDeque<MockReply>>,
    requests: Mutex<Vec<Request>>,
}

impl MockGenerator {
    pub fn new() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_replies(replies: Vec<MockReply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queue a successful text reply.
    pub fn queue_text(&self, text: impl Into<String>) {
        self.replies
            .lock()
            .unwrap()
            .push_back(MockReply::Text(text.into()));
    }

    /// Queue a simulated API failure.
    pub fn queue_failure(&self, status: u16, message: impl Into<String>) {
        self.replies.lock().unwrap().push_back(MockReply::Failure {
            status,
            message: message.into(),
        });
    }

    /// All requests received so far.
    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// The most recent request, if any.
    pub fn last_request(&self) -> Option<Request> {
        self.requests.lock().unwrap().last().cloned()
    }
}

impl Default for MockGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TextGenerator for MockGenerator {
    async fn generate(&self, request: Request) -> Result<String, openrouter::Error> {
        self.requests.lock().unwrap().push(request);

        match self.replies.lock().unwrap().pop_front() {
            Some(MockReply::Text(text)) => Ok(text),
            Some(MockReply::Failure { status, message }) => {
                Err(openrouter::Error::Api { status, message })
            }
            None => Ok("The story continues.".to_string()),
        }
    }
}

/// Test harness for running scripted game scenarios with a seeded RNG.
pub struct TestHarness {
    pub session: GameSession<MockGenerator>,
}

impl TestHarness {
    pub fn new() -> Self {
        Self::with_seed(0)
    }

    /// Create a harness with a specific dice seed.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            session: GameSession::with_rng(MockGenerator::new(), StdRng::seed_from_u64(seed)),
        }
    }

    /// Queue a narrative reply for the next generation call.
    pub fn expect_text(&mut self, text: impl Into<String>) -> &mut Self {
        self.session.generator().queue_text(text);
        self
    }

    /// Queue a simulated API failure for the next generation call.
    pub fn expect_failure(&mut self, status: u16, message: impl Into<String>) -> &mut Self {
        self.session.generator().queue_failure(status, message);
        self
    }

    /// Send player input and get the display text.
    pub async fn input(&mut self, text: &str) -> String {
        self.session.player_input(text).await
    }

    pub fn stage(&self) -> Stage {
        self.session.current_stage()
    }

    pub fn health(&self) -> i32 {
        self.session.state().health
    }

    pub fn inventory(&self) -> &[String] {
        &self.session.state().inventory
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Assertion Helpers
// ============================================================================

/// Assert the session is on the expected stage.
#[track_caller]
pub fn assert_stage(harness: &TestHarness, expected: Stage) {
    let actual = harness.stage();
    assert_eq!(actual, expected, "Expected stage {expected}, got {actual}");
}

/// Assert player health is at the expected value.
#[track_caller]
pub fn assert_health(harness: &TestHarness, expected: i32) {
    let actual = harness.health();
    assert_eq!(actual, expected, "Expected health {expected}, got {actual}");
}
