use std::fmt;

use serde::{Deserialize, Serialize};

/// Queue URL as handed out by the backend. Passed back verbatim.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct QueueRef(pub String);

impl QueueRef {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QueueRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for QueueRef {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for QueueRef {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Token identifying one delivered message instance.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct ReceiptHandle(pub String);

impl ReceiptHandle {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ReceiptHandle {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GiftCard {
    pub user_name: String,
    pub gift_card_type: String,
    /// `None` when the form amount did not parse; sent as `null`.
    pub amount: Option<f64>,
    pub date: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReceivedMessage {
    pub message_id: String,
    pub receipt_handle: ReceiptHandle,
    pub gift_card: GiftCard,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CreateQueueResponse {
    pub message: String,
    #[serde(default)]
    pub queue_url: Option<QueueRef>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct QueueUrlResponse {
    pub queue_url: QueueRef,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest<'a> {
    pub queue_url: &'a QueueRef,
    pub gift_card: &'a GiftCard,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageResponse {
    pub message: String,
    pub message_id: String,
}
