mod llm;
mod rag;
mod search;

pub const USER_AGENT: &str = concat!("groundwork/", env!("CARGO_PKG_VERSION"));

use std::io::Write;
use std::time::Duration;

use clap::Parser;
use reqwest::Client;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};

use llm::client::ChatClient;
use rag::engine::{self, RagRequest};
use search::DuckDuckGo;

/// TCP connection establishment timeout.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const MAX_RESULTS_PER_QUERY: usize = 10;

/// Answer a question with an LLM grounded in live DuckDuckGo results.
///
/// The model endpoint is configured through GROUNDWORK_BASE_URL,
/// GROUNDWORK_API_KEY, GROUNDWORK_MODEL and GROUNDWORK_TIMEOUT_SECS.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Question to answer (prompted for on stdin when omitted)
    question: Option<String>,

    /// Search results kept per generated query (1-10)
    #[arg(short = 'n', long, default_value_t = engine::DEFAULT_RESULTS_PER_QUERY)]
    results: usize,

    /// Searches run in parallel; output order is unaffected
    #[arg(short, long, default_value_t = 1)]
    concurrency: usize,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("groundwork=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    let question = match cli.question {
        Some(q) => q,
        None => read_question().await?,
    };
    let question = question.trim();
    if question.is_empty() {
        return Err("question must not be empty".into());
    }

    let http = Client::builder().connect_timeout(CONNECT_TIMEOUT).build()?;
    let model = ChatClient::from_env(http.clone())?;
    let search = DuckDuckGo::new(http);

    info!(model = model.model(), "starting groundwork");

    let req = RagRequest {
        results_per_query: cli.results.clamp(1, MAX_RESULTS_PER_QUERY),
        concurrency: cli.concurrency,
        ..RagRequest::new(question)
    };

    // Model failures end the run early but are not a process failure.
    let outcome = engine::run(&model, &search, req).await;
    if let Ok(report) = &outcome {
        debug!(reasoning = %report.query_reasoning, "query generation reasoning");
        info!(
            queries = report.queries.len(),
            results = report.results.len(),
            "run complete"
        );
    }
    print!("{}", rag::report::render_outcome(&outcome));

    Ok(())
}

async fn read_question() -> std::io::Result<String> {
    print!("Enter your prompt: ");
    std::io::stdout().flush()?;

    let mut line = String::new();
    BufReader::new(tokio::io::stdin())
        .read_line(&mut line)
        .await?;
    Ok(line)
}
