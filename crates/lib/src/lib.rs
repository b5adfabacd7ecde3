//! Magic Mirror core library: configuration and the webhook server
//! used by the CLI.

pub mod config;
pub mod init;
pub mod webhook;
