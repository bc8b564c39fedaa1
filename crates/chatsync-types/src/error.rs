use thiserror::Error;

/// Errors from document store operations (used by the trait definitions in
/// chatsync-core).
///
/// Store failures are propagated to the hosting infrastructure, which
/// redelivers the event; handlers never catch and retry these themselves.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("invalid document at '{path}': {reason}")]
    InvalidDocument { path: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_display() {
        let err = StoreError::Query("syntax error".to_string());
        assert_eq!(err.to_string(), "query error: syntax error");
    }

    #[test]
    fn test_invalid_document_display() {
        let err = StoreError::InvalidDocument {
            path: "chats/c1_p1".to_string(),
            reason: "not valid JSON".to_string(),
        };
        assert!(err.to_string().contains("chats/c1_p1"));
        assert!(err.to_string().contains("not valid JSON"));
    }
}
