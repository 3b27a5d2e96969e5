use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use letterbox::config::{Config, LogFormat};
use letterbox::links::{self, ExtractedLink};
use letterbox::mailbox::{self, GmailClient};
use letterbox::oracle::HttpOracle;
use letterbox::parsing::ParseContext;
use letterbox::patterns::PatternTables;
use letterbox::preferences::{JsonFilePreferenceStore, PreferenceStore};
use letterbox::relevance::RelevanceFilter;

#[derive(Debug, Serialize)]
struct DigestEntry {
    id: String,
    subject: String,
    from: String,
    date: DateTime<Utc>,
    links: Vec<ExtractedLink>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize tracing
    let filter = EnvFilter::from_default_env();
    match config.log_format() {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init(),
        LogFormat::Pretty => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init(),
    }

    let tables = PatternTables::load(config.patterns_path())?;
    let profile = JsonFilePreferenceStore::new(config.preferences_path())
        .load()
        .await?;
    if profile.is_empty() {
        info!(path = %config.preferences_path().display(), "Reader profile is empty");
    }

    let token = config
        .gmail_token()
        .context("LETTERBOX_GMAIL_TOKEN must be set")?;
    let gmail = GmailClient::new(config.gmail_url(), token)?;
    let emails = mailbox::fetch_emails(&gmail, config.gmail_query(), config.max_emails()).await?;

    let oracle = HttpOracle::new(config.oracle_settings())?;
    let filter = RelevanceFilter::new(Arc::new(oracle), Arc::clone(&tables))
        .with_retry(config.retry_policy())
        .with_parser(ParseContext::new(config.parser_concurrency()))
        .with_snippet_words(config.snippet_words());
    let kept = filter.filter(emails, &profile).await;

    let digest: Vec<DigestEntry> = kept
        .into_iter()
        .map(|email| DigestEntry {
            links: links::enrich(&email.body, None, &tables),
            id: email.id,
            subject: email.subject,
            from: email.from,
            date: email.date,
        })
        .collect();

    info!(emails = digest.len(), "Digest ready");
    println!("{}", serde_json::to_string_pretty(&digest)?);
    Ok(())
}
