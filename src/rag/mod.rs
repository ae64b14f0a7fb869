//! Two-pass retrieval-augmented answering: query generation, search fan-out, grounded answer, and rendering.

pub(crate) mod engine;
pub(crate) mod prompts;
pub(crate) mod queries;
pub(crate) mod report;
