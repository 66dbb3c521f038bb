//! Command-line harness: one line in, one reply out.
//!
//! Usage:
//!   cargo run --bin repl
//!
//! Each non-empty line is dispatched as one turn; `quit`, `exit` or
//! `sair` leaves the loop.

use dotenv::dotenv;
use std::io::{BufRead, Write};
use std::sync::Arc;

use tabletalk_backend::channels::{ChannelType, NormalizedMessage};
use tabletalk_backend::config::Config;

const EXIT_KEYWORDS: &[&str] = &["quit", "exit", "sair"];

#[tokio::main]
async fn main() {
    dotenv().ok();
    env_logger::init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    let dispatcher = match tabletalk_backend::build_dispatcher(&config) {
        Ok(dispatcher) => Arc::new(dispatcher),
        Err(e) => {
            eprintln!("Failed to initialize the assistant: {}", e);
            std::process::exit(1);
        }
    };

    println!("TableTalk REPL - type 'quit' or 'exit' to leave.");

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    loop {
        print!("> ");
        stdout.flush().ok();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                eprintln!("stdin error: {}", e);
                break;
            }
        }

        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if EXIT_KEYWORDS.contains(&line.to_lowercase().as_str()) {
            break;
        }

        let result = dispatcher
            .dispatch(NormalizedMessage {
                channel: ChannelType::Cli,
                user_name: "cli".to_string(),
                text: line.to_string(),
            })
            .await;

        if let Some(sql) = &result.executed_sql {
            println!("Generated query: {}", sql);
        }
        println!("{}", result.reply);
    }
}
