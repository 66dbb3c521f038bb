pub mod dispatcher;
pub mod telegram;

pub use dispatcher::MessageDispatcher;

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelType {
    Telegram,
    Cli,
}

impl ChannelType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChannelType::Telegram => "telegram",
            ChannelType::Cli => "cli",
        }
    }
}

impl fmt::Display for ChannelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A transport-agnostic inbound message: one turn's input.
#[derive(Debug, Clone)]
pub struct NormalizedMessage {
    pub channel: ChannelType,
    pub user_name: String,
    pub text: String,
}

/// The outcome of one dispatched turn. `executed_sql` is set when a
/// query ran, so transports can echo the generated statement.
#[derive(Debug, Clone)]
pub struct DispatchResult {
    pub reply: String,
    pub executed_sql: Option<String>,
}

impl DispatchResult {
    pub fn reply(text: impl Into<String>) -> Self {
        Self {
            reply: text.into(),
            executed_sql: None,
        }
    }

    pub fn with_sql(text: impl Into<String>, sql: impl Into<String>) -> Self {
        Self {
            reply: text.into(),
            executed_sql: Some(sql.into()),
        }
    }
}
