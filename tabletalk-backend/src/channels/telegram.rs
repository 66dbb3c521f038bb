//! Telegram listener. Text messages and transcribed voice messages
//! both flow into the shared dispatcher; commands short-circuit.

use std::sync::Arc;

use teloxide::net::Download;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;

use crate::channels::{ChannelType, MessageDispatcher, NormalizedMessage};
use crate::error::Result;
use crate::transcribe::Transcriber;

const WELCOME_TEXT: &str =
    "Hello! I'm the database assistant. Send me your question about the products.";

#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase", description = "Database assistant commands")]
enum Command {
    #[command(description = "show this help message")]
    Help,
    #[command(description = "run a SQL statement directly")]
    Sql(String),
}

/// Run the Telegram long-polling loop until the process is stopped.
pub async fn start_telegram_listener(
    bot_token: &str,
    dispatcher: Arc<MessageDispatcher>,
    transcriber: Option<Arc<Transcriber>>,
) -> Result<()> {
    let bot = Bot::new(bot_token);
    log::info!("Starting Telegram listener");

    let handler = Update::filter_message()
        .branch(
            dptree::entry()
                .filter_command::<Command>()
                .endpoint(handle_command),
        )
        .branch(
            dptree::filter(|msg: Message| msg.voice().is_some()).endpoint(handle_voice),
        )
        .branch(
            dptree::filter_map(|msg: Message| msg.text().map(ToOwned::to_owned))
                .endpoint(handle_text),
        );

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![dispatcher, transcriber])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    log::info!("Telegram listener stopped");
    Ok(())
}

async fn handle_command(
    bot: Bot,
    msg: Message,
    cmd: Command,
    dispatcher: Arc<MessageDispatcher>,
) -> ResponseResult<()> {
    match cmd {
        Command::Help => {
            let text = format!("{}\n\n{}", WELCOME_TEXT, Command::descriptions());
            bot.send_message(msg.chat.id, text).await?;
        }
        Command::Sql(statement) => {
            let result = dispatcher.dispatch_sql(statement.trim()).await;
            bot.send_message(msg.chat.id, result.reply).await?;
        }
    }
    Ok(())
}

async fn handle_text(
    bot: Bot,
    msg: Message,
    text: String,
    dispatcher: Arc<MessageDispatcher>,
) -> ResponseResult<()> {
    // Unknown slash commands are echoed rather than classified.
    if text.starts_with('/') {
        bot.send_message(msg.chat.id, format!("echo: {}", text)).await?;
        return Ok(());
    }

    respond(&bot, &msg, &dispatcher, text).await
}

async fn handle_voice(
    bot: Bot,
    msg: Message,
    dispatcher: Arc<MessageDispatcher>,
    transcriber: Option<Arc<Transcriber>>,
) -> ResponseResult<()> {
    let Some(transcriber) = transcriber else {
        bot.send_message(msg.chat.id, "Voice messages are not enabled.")
            .await?;
        return Ok(());
    };
    let Some(voice) = msg.voice() else {
        return Ok(());
    };

    let file = bot.get_file(voice.file.id.clone()).await?;
    let mut audio: Vec<u8> = Vec::new();
    if let Err(e) = bot.download_file(&file.path, &mut audio).await {
        log::error!("Voice download failed: {}", e);
        bot.send_message(msg.chat.id, "Sorry, I could not fetch the audio.")
            .await?;
        return Ok(());
    }

    let text = match transcriber.transcribe("voice.ogg", audio).await {
        Ok(text) if !text.is_empty() => text,
        Ok(_) => {
            bot.send_message(msg.chat.id, "Sorry, I could not understand the audio.")
                .await?;
            return Ok(());
        }
        Err(e) => {
            log::error!("Transcription failed: {}", e);
            bot.send_message(msg.chat.id, "Sorry, I could not understand the audio.")
                .await?;
            return Ok(());
        }
    };

    respond(&bot, &msg, &dispatcher, text).await
}

async fn respond(
    bot: &Bot,
    msg: &Message,
    dispatcher: &MessageDispatcher,
    text: String,
) -> ResponseResult<()> {
    let user_name = msg
        .from()
        .map(|user| user.full_name())
        .unwrap_or_else(|| "unknown".to_string());

    let result = dispatcher
        .dispatch(NormalizedMessage {
            channel: ChannelType::Telegram,
            user_name,
            text,
        })
        .await;

    if let Some(sql) = &result.executed_sql {
        bot.send_message(msg.chat.id, format!("Generated query: {}", sql))
            .await?;
    }
    if !result.reply.is_empty() {
        bot.send_message(msg.chat.id, result.reply).await?;
    }
    Ok(())
}
