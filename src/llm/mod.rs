//! OpenAI-compatible chat client and reasoning-block parsing.

pub(crate) mod client;
pub(crate) mod think;
pub(crate) mod types;
