use dotenv::dotenv;
use std::sync::Arc;

use tabletalk_backend::channels::telegram;
use tabletalk_backend::config::Config;
use tabletalk_backend::transcribe::Transcriber;

#[tokio::main]
async fn main() {
    dotenv().ok();
    env_logger::init();

    log::info!("Starting TableTalk database assistant");

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    log::info!(
        "Initializing database at {} (policy: {})",
        config.database_url,
        config.policy.as_str()
    );
    let dispatcher = match tabletalk_backend::build_dispatcher(&config) {
        Ok(dispatcher) => Arc::new(dispatcher),
        Err(e) => {
            log::error!("Failed to initialize the assistant: {}", e);
            std::process::exit(1);
        }
    };

    let transcriber = match &config.transcription {
        Some(transcription) => match Transcriber::new(transcription) {
            Ok(t) => Some(Arc::new(t)),
            Err(e) => {
                log::warn!("Voice transcription disabled: {}", e);
                None
            }
        },
        None => {
            log::info!("Voice transcription not configured");
            None
        }
    };

    let Some(bot_token) = config.bot_token.as_deref() else {
        log::error!("BOT_TOKEN is not set; run the 'repl' binary for the command-line harness");
        std::process::exit(1);
    };

    if let Err(e) = telegram::start_telegram_listener(bot_token, dispatcher, transcriber).await {
        log::error!("Telegram listener error: {}", e);
        std::process::exit(1);
    }
}
