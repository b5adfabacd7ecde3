//! Webhook wire types (API.AI / Dialogflow v1 fulfillment request and response).
//!
//! The request side is decoded loosely: every field is optional, the
//! platform-specific `originalRequest` stays untyped, and unknown keys are kept
//! in `extra`. Only `result.parameters` drives the reply.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// Incoming webhook call: `{ "id", "sessionId", "lang", "timestamp", "status", "result", "originalRequest" }`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomingRequest {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub lang: Option<String>,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: Option<RequestStatus>,
    #[serde(default)]
    pub result: Option<DialogResult>,
    /// Surface payload (user profile, device location, conversation token). Not interpreted.
    #[serde(default)]
    pub original_request: Option<serde_json::Value>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl IncomingRequest {
    /// Value of a dialog parameter, if the platform sent it.
    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.result
            .as_ref()
            .and_then(|r| r.parameters.as_ref())
            .and_then(|p| p.get(name))
            .map(String::as_str)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestStatus {
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub error_type: Option<String>,
}

/// The `result` block: matched intent, slot values, and input contexts.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogResult {
    /// Slot name to string value. `null` and absent are both "no parameters";
    /// a `null` slot value reads as `""`.
    #[serde(default, deserialize_with = "nullable_slot_values")]
    pub parameters: Option<HashMap<String, String>>,
    #[serde(default)]
    pub contexts: Option<Vec<serde_json::Value>>,
    #[serde(default)]
    pub resolved_query: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub action_incomplete: Option<bool>,
    #[serde(default)]
    pub metadata: Option<IntentMetadata>,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

fn nullable_slot_values<'de, D>(deserializer: D) -> Result<Option<HashMap<String, String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<HashMap<String, Option<String>>> = Option::deserialize(deserializer)?;
    Ok(raw.map(|slots| {
        slots
            .into_iter()
            .map(|(name, value)| (name, value.unwrap_or_default()))
            .collect()
    }))
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentMetadata {
    #[serde(default)]
    pub intent_id: Option<String>,
    #[serde(default)]
    pub intent_name: Option<String>,
    #[serde(default)]
    pub webhook_used: Option<String>,
    #[serde(default)]
    pub webhook_for_slot_filling_used: Option<String>,
}

/// Reply to the platform. Every block is always serialized, zero-valued when unused.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutgoingResponse {
    pub speech: String,
    pub display_text: String,
    pub data: ResponseData,
    pub context_out: Vec<Context>,
    pub source: String,
    pub followup_event: FollowupEvent,
}

impl OutgoingResponse {
    /// Reply carrying `text` for both the speech and the display surface.
    pub fn text(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            speech: text.clone(),
            display_text: text,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ResponseData {
    pub google: GooglePayload,
}

/// Actions on Google surface metadata (snake_case on the wire).
#[derive(Debug, Clone, Default, Serialize)]
pub struct GooglePayload {
    pub expect_user_response: bool,
    pub is_ssml: bool,
    pub permissions_request: PermissionsRequest,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PermissionsRequest {
    pub opt_context: String,
    pub permissions: Vec<String>,
}

/// Output context: `{ "name", "lifespan", "parameters" }`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Context {
    pub name: String,
    pub lifespan: u32,
    pub parameters: HashMap<String, String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct FollowupEvent {
    pub name: String,
    pub data: HashMap<String, String>,
}
