//! Terminal front-end for the adventure engine.
//!
//! ```bash
//! export OPENROUTER_API_KEY=your_key_here
//! cargo run -p adventure-core --example play
//! cargo run -p adventure-core --example play -- --party
//! ```
//!
//! The default mode runs the stage state machine; `--party` runs the
//! persona handoff variant instead. Type `quit` to exit.

use adventure_core::{GameSession, PartySession};
use openrouter::Client;
use std::io::{self, BufRead, Write};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    if std::env::var("OPENROUTER_API_KEY").is_err() {
        eprintln!("Error: OPENROUTER_API_KEY environment variable not set.");
        eprintln!("Please set it in .env file or with: export OPENROUTER_API_KEY=your_key_here");
        std::process::exit(1);
    }

    let party = std::env::args().any(|a| a == "--party");
    if party {
        run_party().await
    } else {
        run_stages().await
    }
}

async fn run_stages() -> Result<(), Box<dyn std::error::Error>> {
    let mut session = GameSession::from_env()?;
    println!("{}\n", session.welcome());

    let stdin = io::stdin();
    loop {
        let Some(line) = prompt_line(&stdin)? else {
            break;
        };
        if line.eq_ignore_ascii_case("quit") {
            break;
        }
        let reply = session.player_input(&line).await;
        println!("\n{reply}\n");
    }
    Ok(())
}

async fn run_party() -> Result<(), Box<dyn std::error::Error>> {
    let client = Client::from_env()?;
    let mut session = PartySession::new(client);
    println!("{}\n", session.welcome());

    let stdin = io::stdin();
    loop {
        let Some(line) = prompt_line(&stdin)? else {
            break;
        };
        if line.eq_ignore_ascii_case("quit") {
            break;
        }
        let reply = session.player_input(&line).await;
        println!("\n[{}] {reply}\n", session.active_persona());
    }
    Ok(())
}

/// Read one trimmed line, or None on EOF.
fn prompt_line(stdin: &io::Stdin) -> io::Result<Option<String>> {
    print!("> ");
    io::stdout().flush()?;

    let mut line = String::new();
    if stdin.lock().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}
