//! Webhook: landing page plus the authenticated dialog action endpoint.
//!
//! `POST /action` is wrapped by Basic auth; the handler maps the
//! `mirror-response` dialog parameter to one of the mirror's canned replies.

mod action;
mod auth;
mod landing;
mod protocol;
mod server;

pub use action::{
    decide_reply, respond, ActionError, FAIREST_REPLY, MIRROR_PARAMETER, NOT_UNDERSTOOD_REPLY,
    SNOW_WHITE_REPLY,
};
pub use auth::{parse_basic_auth, Credentials};
pub use protocol::{Context, IncomingRequest, OutgoingResponse};
pub use server::{credentials_from_config, router, run_server};
