//! End-to-end tests for the stage state machine using the mock generator.
//!
//! These run without any API key: every generation call is scripted, and
//! dice come from a seeded per-session RNG.

use adventure_core::testing::{assert_health, assert_stage, TestHarness};
use adventure_core::{Stage, GAME_OVER_MESSAGE};
use openrouter::Role;

#[tokio::test]
async fn test_story_turn_transitions_match_state() {
    for seed in 0..10 {
        let mut harness = TestHarness::with_seed(seed);
        harness.expect_text("The forest whispers.");

        let display = harness.input("I explore the forest").await;
        assert!(display.contains("**Event:**"));
        assert!(display.contains("The forest whispers."));

        match harness.stage() {
            Stage::Combat => {
                assert!(harness.session.state().in_combat);
                assert!(harness.session.state().current_enemy.is_some());
                assert!(display.contains("**Combat initiated!**"));
            }
            Stage::Item => {
                assert_eq!(harness.inventory().len(), 3);
                assert!(display.contains("to inventory!"));
            }
            Stage::Story => {
                assert!(!harness.session.state().in_combat);
                assert_eq!(harness.inventory().len(), 2);
            }
            Stage::GameOver => panic!("story turn cannot end the game"),
        }

        // The request/response pair lands in the story transcript.
        let entries = harness.session.history().entries(Stage::Story);
        assert_eq!(entries.len(), 2);
    }
}

#[tokio::test]
async fn test_combat_runs_until_decided() {
    for seed in 0..10 {
        let mut harness = TestHarness::with_seed(seed);
        {
            let state = harness.session.state_mut();
            state.current_stage = Stage::Combat;
            state.in_combat = true;
            state.current_enemy = Some("orc".to_string());
        }

        let mut losses = 0;
        for _ in 0..100 {
            if harness.stage() != Stage::Combat {
                break;
            }
            harness.expect_text("Steel rings against steel.");
            let display = harness.input("I attack with my sword").await;
            assert!(display.contains("**Your roll:**"));

            if display.contains("You took damage!") {
                losses += 1;
            }
        }

        assert_health(&harness, 100 - 20 * losses);
        match harness.stage() {
            Stage::Story => {
                assert!(!harness.session.state().in_combat);
                assert!(harness.session.state().current_enemy.is_none());
                assert!(harness.health() > 0);
            }
            Stage::GameOver => {
                assert!(harness.health() <= 0);
                assert_eq!(losses, 5);
            }
            other => panic!("combat ended on unexpected stage {other}"),
        }
    }
}

#[tokio::test]
async fn test_item_turn_always_returns_to_story() {
    for seed in 0..10 {
        let mut harness = TestHarness::with_seed(seed);
        harness.session.state_mut().current_stage = Stage::Item;
        harness.session.state_mut().health = 80;
        harness.expect_text("A gleaming blade.");

        let display = harness.input("I inspect the item").await;
        assert_stage(&harness, Stage::Story);
        assert!(display.contains("**Item roll:**"));

        if display.contains("You feel better!") {
            assert_health(&harness, 100);
        } else {
            assert_health(&harness, 80);
        }
    }
}

#[tokio::test]
async fn test_pass_through_mutates_nothing_but_the_transcript() {
    let mut harness = TestHarness::new();
    let state_before = harness.session.state().clone();

    harness.expect_text("Certainly, here is a poem.");
    let display = harness.input("prompt: write me a poem").await;

    assert!(display.contains("**AI Response:** Certainly, here is a poem."));
    assert_eq!(harness.session.state(), &state_before);
    assert_stage(&harness, Stage::Story);

    let entries = harness.session.history().entries(Stage::Story);
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].content, "write me a poem");
}

#[tokio::test]
async fn test_pass_through_sends_full_history() {
    let mut harness = TestHarness::new();
    for i in 0..4 {
        harness
            .session
            .history_mut()
            .record(Stage::Story, &format!("q{i}"), &format!("a{i}"));
    }

    harness.expect_text("ok");
    harness.input("prompt: hello").await;

    let request = harness.session.generator().last_request().unwrap();
    // 8 stored entries plus the new message, no windowing.
    assert_eq!(request.messages.len(), 9);
    assert_eq!(request.messages[8].content, "hello");
}

#[tokio::test]
async fn test_normal_turn_sends_windowed_history() {
    let mut harness = TestHarness::new();
    for i in 0..4 {
        harness
            .session
            .history_mut()
            .record(Stage::Story, &format!("q{i}"), &format!("a{i}"));
    }

    harness.expect_text("onward");
    harness.input("I keep walking").await;

    let request = harness.session.generator().last_request().unwrap();
    // 5-entry window plus the new prompt.
    assert_eq!(request.messages.len(), 6);
    assert_eq!(request.messages[5].role, Role::User);
    assert!(request.messages[5].content.contains("I keep walking"));
}

#[tokio::test]
async fn test_status_and_history_commands_are_readonly() {
    let mut harness = TestHarness::new();
    harness.expect_text("You wander.");
    harness.input("I wander around").await;

    let state_before = harness.session.state().clone();
    let history_before = harness.session.history().clone();
    let calls_before = harness.session.generator().request_count();

    let status = harness.input("STATUS").await;
    assert!(status.contains("**Health:**"));

    let history = harness.input("History").await;
    assert!(history.contains("Conversation history"));

    assert_eq!(harness.session.state(), &state_before);
    assert_eq!(harness.session.history(), &history_before);
    // Commands never hit the model.
    assert_eq!(harness.session.generator().request_count(), calls_before);
}

#[tokio::test]
async fn test_restart_resets_everything() {
    let mut harness = TestHarness::new();
    {
        let state = harness.session.state_mut();
        state.health = 40;
        state.inventory.push("magic ring".to_string());
        state.current_stage = Stage::Combat;
        state.in_combat = true;
        state.current_enemy = Some("orc".to_string());
    }
    harness
        .session
        .history_mut()
        .record(Stage::Combat, "swing", "clang");

    let display = harness.input("restart").await;
    assert!(display.contains("restarted"));
    assert_stage(&harness, Stage::Story);
    assert_health(&harness, 100);
    assert_eq!(harness.inventory(), ["sword", "potion"]);
    assert!(harness.session.history().entries(Stage::Combat).is_empty());
    assert!(harness.session.history().entries(Stage::Story).is_empty());
}

#[tokio::test]
async fn test_generation_failure_leaves_session_untouched() {
    for stage in [Stage::Story, Stage::Combat, Stage::Item] {
        let mut harness = TestHarness::new();
        {
            let state = harness.session.state_mut();
            state.current_stage = stage;
            if stage == Stage::Combat {
                state.in_combat = true;
                state.current_enemy = Some("goblin".to_string());
            }
        }
        harness
            .session
            .history_mut()
            .record(stage, "earlier", "context");

        let state_before = harness.session.state().clone();
        let history_before = harness.session.history().clone();

        harness.expect_failure(401, "invalid key");
        let display = harness.input("I press on").await;

        assert!(display.contains("**Error:**"), "no diagnostic for {stage}");
        assert!(display.contains("OPENROUTER_API_KEY"));
        assert_eq!(harness.session.state(), &state_before);
        assert_eq!(harness.session.history(), &history_before);
        assert_eq!(harness.stage(), stage);
    }
}

#[tokio::test]
async fn test_failed_turn_can_be_retried() {
    let mut harness = TestHarness::new();
    harness.expect_failure(500, "upstream timeout");
    harness.input("I explore").await;

    harness.expect_text("Second time lucky.");
    let display = harness.input("I explore").await;
    assert!(display.contains("Second time lucky."));
}

#[tokio::test]
async fn test_game_over_is_terminal_for_gameplay() {
    let mut harness = TestHarness::new();
    harness.session.state_mut().current_stage = Stage::GameOver;
    harness.session.state_mut().health = 0;

    let display = harness.input("I attack the goblin").await;
    assert_eq!(display, GAME_OVER_MESSAGE);
    assert_stage(&harness, Stage::GameOver);
    // The resolver is never invoked.
    assert_eq!(harness.session.generator().request_count(), 0);
}

#[tokio::test]
async fn test_commands_still_work_after_game_over() {
    let mut harness = TestHarness::new();
    harness.session.state_mut().current_stage = Stage::GameOver;
    harness.session.state_mut().health = -10;

    let status = harness.input("status").await;
    assert!(status.contains("game over"));

    let display = harness.input("restart").await;
    assert!(display.contains("restarted"));
    assert_stage(&harness, Stage::Story);
    assert_health(&harness, 100);
}

#[tokio::test]
async fn test_pass_through_during_combat_stays_in_combat() {
    let mut harness = TestHarness::new();
    {
        let state = harness.session.state_mut();
        state.current_stage = Stage::Combat;
        state.in_combat = true;
        state.current_enemy = Some("orc".to_string());
        state.health = 60;
    }

    harness.expect_text("The orc waits impatiently.");
    harness.input("prompt: describe the orc").await;

    assert_stage(&harness, Stage::Combat);
    assert_health(&harness, 60);
    assert!(harness.session.state().in_combat);
    // Recorded under the combat transcript, not the story one.
    assert_eq!(harness.session.history().entries(Stage::Combat).len(), 2);
    assert!(harness.session.history().entries(Stage::Story).is_empty());
}
