//! Splits reasoning-model output into its `<think>` block and the final answer.
//!
//! The marker convention is first-match and non-nested: the first `<think>`
//! anchors the parse and the first `</think>` after it closes the block.
//! Anything before the opening marker is discarded. There is no escaping.

use super::types::ParsedResponse;

const OPEN: &str = "<think>";
const CLOSE: &str = "</think>";

pub fn parse_response(text: &str) -> ParsedResponse {
    let Some(start) = text.find(OPEN) else {
        return unparsed(text);
    };
    let body_start = start + OPEN.len();
    let Some(len) = text[body_start..].find(CLOSE) else {
        return unparsed(text);
    };
    let body_end = body_start + len;

    ParsedResponse {
        reasoning: text[body_start..body_end].trim().to_string(),
        answer: text[body_end + CLOSE.len()..].trim().to_string(),
    }
}

fn unparsed(text: &str) -> ParsedResponse {
    ParsedResponse {
        reasoning: String::new(),
        answer: text.trim().to_string(),
    }
}
