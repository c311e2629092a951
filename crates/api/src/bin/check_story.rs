//! Offline check of a saved story.
//!
//! Usage: `check_story <story.txt> <keyword>`
//!
//! Segments the story and prints the length, keyword and similarity
//! reports as pretty JSON. Similarity uses the stub scorer unless
//! `SIMILARITY_API_URL` is set.

use anyhow::{bail, Context, Result};
use serde::Serialize;
use std::sync::Arc;

use segment::Document;
use similarity::{
    CheckerConfig, HttpScorer, SimilarityChecker, SimilarityReport, SimilarityScorer, StubScorer,
};
use validate::{ValidationReport, Validator};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StoryCheck {
    document: Document,
    #[serde(flatten)]
    report: ValidationReport,
    similarity: SimilarityReport,
    annotated: Document,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let [path, keyword] = args.as_slice() else {
        bail!("usage: check_story <story.txt> <keyword>");
    };

    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read story from {}", path))?;

    let scorer: Arc<dyn SimilarityScorer> = match std::env::var("SIMILARITY_API_URL") {
        Ok(endpoint) if !endpoint.trim().is_empty() => Arc::new(HttpScorer::new(endpoint)),
        _ => Arc::new(StubScorer),
    };
    let checker = SimilarityChecker::new(scorer, CheckerConfig::default());
    let validator = Validator::default();

    let document = segment::segment(&raw);
    let report = validator.validate(&document, keyword);
    let similarity = checker.check_text(&document.body_text(), keyword).await;
    let annotated = validator.keyword_analyzer().annotate(&document, keyword);

    let check = StoryCheck {
        document,
        report,
        similarity,
        annotated,
    };
    println!("{}", serde_json::to_string_pretty(&check)?);

    Ok(())
}
