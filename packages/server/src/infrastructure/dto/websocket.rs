//! WebSocket frame DTOs.
//!
//! Inbound frames are JSON objects tagged by `type`; the remaining fields are the
//! payload for that kind. Outbound frames carry a destination and a string body.

use serde::{Deserialize, Deserializer, Serialize};

/// Kind of an inbound frame, used as the dispatch key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InboundKind {
    Subscribe,
    Unsubscribe,
    Join,
    Send,
}

/// Inbound frame before its payload is decoded.
#[derive(Debug, Deserialize)]
pub struct InboundFrame {
    #[serde(rename = "type")]
    pub kind: InboundKind,
    #[serde(flatten)]
    pub payload: serde_json::Value,
}

/// `subscribe` / `unsubscribe` payload
#[derive(Debug, Clone, Deserialize)]
pub struct SubscriptionRequest {
    pub destination: String,
}

/// `join` payload
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinRequest {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(alias = "chatRoomId", deserialize_with = "number_or_numeric_string")]
    pub room_id: i64,
    pub screen_name: String,
    /// Accepted for compatibility; the server stamps users with its own clock.
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// `send` payload, relayed to the room's message topic as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendRequest {
    pub id: String,
    #[serde(alias = "chatRoomId", deserialize_with = "number_or_numeric_string")]
    pub room_id: i64,
    pub sender: String,
    pub message: String,
}

/// Every frame pushed to a client.
#[derive(Debug, Serialize)]
pub struct OutboundFrame<'a> {
    pub destination: String,
    pub body: &'a str,
}

/// Browser forms submit numbers as strings ("5"), so accept both.
fn number_or_numeric_string<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(i64),
        String(String),
    }

    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => Ok(n),
        NumberOrString::String(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}
