use serde::Deserialize;

/// The classifier's structured decision for one turn: either run this
/// SQL, or say this text. Decoded from the model's
/// `{"action": ..., "payload": ...}` contract and consumed immediately
/// by the dispatcher; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "action", content = "payload", rename_all = "snake_case")]
pub enum Action {
    DatabaseQuery(String),
    UserMessage(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_database_query() {
        let action: Action =
            serde_json::from_str(r#"{"action": "database_query", "payload": "SELECT 1"}"#)
                .unwrap();
        assert_eq!(action, Action::DatabaseQuery("SELECT 1".to_string()));
    }

    #[test]
    fn test_decode_user_message() {
        let action: Action =
            serde_json::from_str(r#"{"action": "user_message", "payload": "hello"}"#).unwrap();
        assert_eq!(action, Action::UserMessage("hello".to_string()));
    }

    #[test]
    fn test_decode_unknown_tag_fails() {
        let result = serde_json::from_str::<Action>(r#"{"action": "reboot", "payload": "x"}"#);
        assert!(result.is_err());
    }
}
