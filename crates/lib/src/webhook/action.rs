//! POST /action: decode the dialog request, pick a canned reply, answer in the platform's format.

use crate::webhook::protocol::{IncomingRequest, OutgoingResponse};
use axum::{
    body::Bytes,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

/// Dialog parameter carrying the user's question to the mirror.
pub const MIRROR_PARAMETER: &str = "mirror-response";

pub const FAIREST_REPLY: &str = "My Queen, you are the fairest in the land";
pub const SNOW_WHITE_REPLY: &str = "Snow White is a thousand times more beautiful than you";
pub const NOT_UNDERSTOOD_REPLY: &str = "I don't quite understand";

/// Failures that end an action request before a reply is produced.
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    #[error("request body required")]
    MissingBody,
    /// Body present but not a valid request document. Reported as 500 with the decoder message.
    #[error("{0}")]
    MalformedPayload(#[from] serde_json::Error),
}

impl ActionError {
    pub fn status(&self) -> StatusCode {
        match self {
            ActionError::MissingBody => StatusCode::BAD_REQUEST,
            ActionError::MalformedPayload(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ActionError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}

/// Reply text for a `mirror-response` value (None when the platform did not fill the slot).
pub fn decide_reply(mirror_response: Option<&str>) -> &'static str {
    match mirror_response {
        Some("fair") => FAIREST_REPLY,
        Some(_) => SNOW_WHITE_REPLY,
        None => NOT_UNDERSTOOD_REPLY,
    }
}

/// Decode a raw request body and build the reply.
pub fn respond(body: &[u8]) -> Result<OutgoingResponse, ActionError> {
    if body.is_empty() {
        return Err(ActionError::MissingBody);
    }
    let request: IncomingRequest = serde_json::from_slice(body)?;
    let choice = request.parameter(MIRROR_PARAMETER);
    let reply = decide_reply(choice);
    log::debug!(
        "action: session={} lang={} {}={:?} -> {:?}",
        request.session_id.as_deref().unwrap_or("-"),
        request.lang.as_deref().unwrap_or("-"),
        MIRROR_PARAMETER,
        choice,
        reply
    );
    Ok(OutgoingResponse::text(reply))
}

/// Axum handler for POST /action. Runs behind the Basic auth middleware.
pub async fn handle_action(body: Bytes) -> Result<Json<OutgoingResponse>, ActionError> {
    respond(&body).map(Json).map_err(|e| {
        log::warn!("action: {} ({})", e, e.status());
        e
    })
}
