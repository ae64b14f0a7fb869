use super::engine::{RagError, RagReport};

const BANNER: &str = "========================";

/// Renders the console output: final prompt, reasoning, answer, then sources when there are any.
pub fn render(report: &RagReport) -> String {
    let mut output = String::new();

    section(&mut output, "Final Prompt Sent to LLM:", &report.final_prompt);
    section(&mut output, "CoT Reasoning:", &report.reasoning);
    section(&mut output, "Final Answer:", &report.answer);

    if !report.source_links.is_empty() {
        section(&mut output, "Sources Used:", &report.source_links.join("\n"));
    }

    output
}

/// Console text for a finished run; a model failure renders as a single error line.
pub fn render_outcome(outcome: &Result<RagReport, RagError>) -> String {
    match outcome {
        Ok(report) => render(report),
        Err(e) => format!("Error: {e}\n"),
    }
}

fn section(output: &mut String, heading: &str, body: &str) {
    output.push_str(&format!("\n{BANNER}\n{heading}\n{BANNER}\n\n{body}\n"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::client::LlmError;

    fn report(links: &[&str]) -> RagReport {
        RagReport {
            query_reasoning: String::new(),
            queries: vec![],
            results: vec![],
            source_links: links.iter().map(|l| l.to_string()).collect(),
            final_prompt: "THE PROMPT".into(),
            reasoning: "THE REASONING".into(),
            answer: "THE ANSWER".into(),
        }
    }

    #[test]
    fn sections_appear_in_fixed_order() {
        let text = render(&report(&["https://a.com", "https://b.com"]));

        let positions: Vec<usize> = [
            "Final Prompt Sent to LLM:",
            "THE PROMPT",
            "CoT Reasoning:",
            "THE REASONING",
            "Final Answer:",
            "THE ANSWER",
            "Sources Used:",
            "https://a.com\nhttps://b.com",
        ]
        .iter()
        .map(|needle| text.find(needle).unwrap_or_else(|| panic!("missing {needle:?}")))
        .collect();

        assert!(positions.windows(2).all(|w| w[0] < w[1]), "got: {text}");
    }

    #[test]
    fn sources_section_omitted_without_links() {
        let text = render(&report(&[]));
        assert!(text.contains("Final Answer:"));
        assert!(!text.contains("Sources Used:"));
    }

    #[test]
    fn outcome_error_renders_single_error_line() {
        let err = RagError::QueryGeneration(LlmError::Api {
            code: 500,
            message: "boom".into(),
        });

        let text = render_outcome(&Err(err));

        assert_eq!(
            text,
            "Error: query generation failed: API call failed with status code 500: boom\n"
        );
    }

    #[test]
    fn outcome_ok_renders_full_report() {
        let text = render_outcome(&Ok(report(&["https://a.com"])));
        assert_eq!(text, render(&report(&["https://a.com"])));
        assert!(!text.contains("Error:"));
    }

    #[test]
    fn duplicate_links_are_all_printed() {
        let text = render(&report(&["https://a.com", "https://a.com"]));
        assert_eq!(text.matches("https://a.com").count(), 2);
    }
}
