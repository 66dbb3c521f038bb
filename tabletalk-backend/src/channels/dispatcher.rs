//! Dispatcher - the per-turn orchestrator.
//!
//! One turn is strictly serial: fetch entity context, classify,
//! then either execute-and-summarize or reply directly. Every
//! failure past startup is converted into a reply here; nothing
//! escapes to the transport as an error.

use std::sync::Arc;
use uuid::Uuid;

use crate::ai::{ActionClassifier, PromptStore, Summarizer, TextGenerator};
use crate::channels::{DispatchResult, NormalizedMessage};
use crate::db::Database;
use crate::error::{Error, Result};
use crate::models::{Action, QueryOutcome};
use crate::policy::ExecutionPolicy;

/// Context string injected when the products table is empty.
pub const EMPTY_PRODUCT_CONTEXT: &str = "No products found.";

/// Routes one user turn through classify -> policy -> run -> summarize.
pub struct MessageDispatcher {
    db: Arc<Database>,
    classifier: ActionClassifier,
    summarizer: Summarizer,
    policy: ExecutionPolicy,
}

impl MessageDispatcher {
    pub fn new(
        db: Arc<Database>,
        model: Arc<dyn TextGenerator>,
        prompts: Arc<PromptStore>,
        policy: ExecutionPolicy,
    ) -> Self {
        Self {
            db,
            classifier: ActionClassifier::new(model.clone(), prompts.clone()),
            summarizer: Summarizer::new(model, prompts),
            policy,
        }
    }

    /// Dispatch one normalized message and produce the reply for it.
    pub async fn dispatch(&self, message: NormalizedMessage) -> DispatchResult {
        let turn_id = Uuid::new_v4().to_string();
        log::info!(
            "[{}] {} turn from {}: {}",
            turn_id,
            message.channel,
            message.user_name,
            message.text
        );

        let product_context = match self.db.product_names() {
            Ok(names) if names.is_empty() => EMPTY_PRODUCT_CONTEXT.to_string(),
            Ok(names) => names.join(", "),
            Err(e) => {
                log::error!("[{}] Failed to load product context: {}", turn_id, e);
                EMPTY_PRODUCT_CONTEXT.to_string()
            }
        };
        log::debug!("[{}] Injecting context: [{}]", turn_id, product_context);

        match self.classifier.classify(&message.text, &product_context).await {
            Action::DatabaseQuery(sql) => {
                log::info!("[{}] Model action: execute query -> {}", turn_id, sql);
                match self.execute_policied(&turn_id, &sql) {
                    Ok(outcome) => {
                        let summary = self.summarizer.summarize(&sql, &outcome).await;
                        DispatchResult::with_sql(summary, sql)
                    }
                    Err(e) => rejection_reply(&turn_id, e),
                }
            }
            Action::UserMessage(text) => {
                log::info!("[{}] Model action: user message", turn_id);
                DispatchResult::reply(text)
            }
        }
    }

    /// Direct SQL path for the `/sql` power-user command. The policy
    /// still applies; only the summarizer is skipped.
    pub async fn dispatch_sql(&self, sql: &str) -> DispatchResult {
        let turn_id = Uuid::new_v4().to_string();
        log::info!("[{}] Direct query: {}", turn_id, sql);

        match self.execute_policied(&turn_id, sql) {
            Ok(outcome) => DispatchResult::with_sql(
                format!("Query result: {}", outcome.render()),
                sql.to_string(),
            ),
            Err(e) => rejection_reply(&turn_id, e),
        }
    }

    /// Policy check, execution, and audit. The policy runs before any
    /// storage access: rejected statements never open a connection.
    fn execute_policied(&self, turn_id: &str, sql: &str) -> Result<QueryOutcome> {
        self.policy.check(sql)?;

        match self.db.run_query(sql) {
            Ok(outcome) => {
                if let Err(e) =
                    self.db
                        .record_query(turn_id, sql, true, Some(outcome.row_count()), None)
                {
                    log::error!("[{}] Failed to write audit log: {}", turn_id, e);
                }
                Ok(outcome)
            }
            Err(e) => {
                if let Err(log_err) =
                    self.db
                        .record_query(turn_id, sql, false, None, Some(&e.to_string()))
                {
                    log::error!("[{}] Failed to write audit log: {}", turn_id, log_err);
                }
                Err(e)
            }
        }
    }
}

fn rejection_reply(turn_id: &str, error: Error) -> DispatchResult {
    match error {
        e @ Error::PolicyRejection(_) => {
            log::warn!("[{}] {}", turn_id, e);
            DispatchResult::reply(e.to_string())
        }
        e => {
            log::warn!("[{}] Query failed: {}", turn_id, e);
            DispatchResult::reply(format!("The query failed: {}", e))
        }
    }
}
