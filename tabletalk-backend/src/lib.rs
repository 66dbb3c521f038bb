//! TableTalk - a conversational assistant that turns natural-language
//! requests into SQL against a small product database, executes them
//! under a query-safety policy, and explains the result back in plain
//! language.

pub mod ai;
pub mod channels;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod policy;
pub mod transcribe;

use std::sync::Arc;

use crate::ai::{AiClient, PromptStore, TextGenerator};
use crate::channels::MessageDispatcher;
use crate::config::Config;
use crate::db::Database;
use crate::error::Result;

/// Build the per-process context: database, prompt store, model
/// client, and the dispatcher tying them together. Shared by the bot
/// and the REPL binaries; every failure here is a fatal `Config` or
/// `Storage` error.
pub fn build_dispatcher(config: &Config) -> Result<MessageDispatcher> {
    let schema = db::load_schema(&config.schema_file)?;
    let database = Arc::new(Database::new(&config.database_url, &schema)?);
    let prompts = Arc::new(PromptStore::load(
        &config.classify_prompt_file,
        &config.summarize_prompt_file,
    )?);
    let model: Arc<dyn TextGenerator> = Arc::new(AiClient::from_config(config)?);

    Ok(MessageDispatcher::new(database, model, prompts, config.policy))
}
