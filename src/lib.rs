//! mdshell - an interactive command shell for a messaging client.
//!
//! Lines typed at the prompt are tokenized, resolved through a command
//! registry, validated, and executed against a [`client::Client`].

pub mod client;
pub mod config;
pub mod core;
pub mod models;
pub mod repl;
