//! `ask` subcommand.

use tracing::debug;

use quizlens_config::Config;
use quizlens_protocols::{AnalyzeRequest, Analyzer};
use quizlens_session::AnalysisClient;

/// Query the proxy once and print the result as JSON.
///
/// With `deep`, the fast result is sent back as context for the deep pass
/// and both are merged, as the engine does for the current question.
pub(crate) async fn run(
    config: &Config,
    question: String,
    answers: Vec<String>,
    deep: bool,
    proxy_url: Option<String>,
) -> anyhow::Result<()> {
    let client = AnalysisClient::new(proxy_url.or_else(|| config.client.proxy_url.clone()))?;

    let fast = client
        .analyze(AnalyzeRequest::fast(question.clone(), answers.clone()))
        .await?;
    debug!("Fast result: choice={} confidence={}", fast.choice_index, fast.confidence);

    let result = if deep {
        let count = answers.len();
        let detailed = client
            .analyze(AnalyzeRequest::deep(question, answers, fast.choice_index, fast.confidence))
            .await?;
        fast.merge(detailed, count)
    } else {
        fast
    };

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
