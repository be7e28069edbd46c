use async_trait::async_trait;

use crate::domain::message::Message;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistorySourceError {
    /// Non-OK HTTP response with its reason phrase.
    Status { code: u16, reason: String },
    Network(String),
    InvalidData(String),
}

#[async_trait]
pub trait HistorySource: Send + Sync {
    async fn fetch_history(&self, peer: &str) -> Result<Vec<Message>, HistorySourceError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadHistoryError {
    Rejected { reason: String },
    Unreachable,
    DataContractViolation,
}

impl LoadHistoryError {
    /// Text rendered in the message pane in place of the conversation.
    pub fn user_message(&self) -> String {
        match self {
            Self::Rejected { reason } => format!("Failed to load messages: {reason}"),
            Self::Unreachable => "Failed to load messages: server unreachable".to_owned(),
            Self::DataContractViolation => {
                "Failed to load messages: unexpected server response".to_owned()
            }
        }
    }
}

pub async fn load_history(
    source: &dyn HistorySource,
    peer: &str,
) -> Result<Vec<Message>, LoadHistoryError> {
    source.fetch_history(peer).await.map_err(|error| {
        tracing::warn!(peer, error = ?error, "history fetch failed");
        map_source_error(error)
    })
}

fn map_source_error(error: HistorySourceError) -> LoadHistoryError {
    match error {
        HistorySourceError::Status { reason, .. } => LoadHistoryError::Rejected { reason },
        HistorySourceError::Network(_) => LoadHistoryError::Unreachable,
        HistorySourceError::InvalidData(_) => LoadHistoryError::DataContractViolation,
    }
}
