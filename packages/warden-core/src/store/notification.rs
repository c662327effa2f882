use serde::{Deserialize, Serialize};

use super::RequestId;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// a transaction landed, the message is its hash
    TxHash,
    /// a transaction failed, the message is the chain's raw log or the local fault
    Error,
    /// a request that never reached the network (e.g. an unsupported exec kind)
    Alert,
}

/// One user-visible message
///
/// Notifications queue up instead of overwriting each other, the newest is the one to show.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    pub request_id: Option<RequestId>,
    pub kind: NotificationKind,
    pub message: String,
}

impl Notification {
    pub fn tx_hash(request_id: RequestId, hash: impl Into<String>) -> Self {
        Self {
            request_id: Some(request_id),
            kind: NotificationKind::TxHash,
            message: hash.into(),
        }
    }

    pub fn error(request_id: RequestId, message: impl Into<String>) -> Self {
        Self {
            request_id: Some(request_id),
            kind: NotificationKind::Error,
            message: message.into(),
        }
    }

    pub fn alert(message: impl Into<String>) -> Self {
        Self {
            request_id: None,
            kind: NotificationKind::Alert,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Notification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self.kind {
            NotificationKind::TxHash => "tx",
            NotificationKind::Error => "error",
            NotificationKind::Alert => "alert",
        };

        match self.request_id {
            Some(id) => write!(f, "[{label} {id}] {}", self.message),
            None => write!(f, "[{label}] {}", self.message),
        }
    }
}
