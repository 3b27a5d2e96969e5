//! Batch relevance filtering of newsletter emails.
//!
//! Pipeline:
//! 1. Extract, clean and sample each email body concurrently
//! 2. Build one prompt with every snippet and the reader's profile
//! 3. Ask the oracle once for the whole batch, retrying transient failures
//! 4. Keep the emails whose id was marked `include: true`
//!
//! The filter fails open: when the oracle cannot be reached or its answer
//! is unusable, every email is passed through.

pub mod decisions;
pub mod prompt;
pub mod snippet;

pub use decisions::{Decision, DecisionError, parse_decisions};
pub use prompt::build_prompt;
pub use snippet::{DEFAULT_SNIPPET_WORDS, EmailSnippet, build_snippets};

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::mailbox::RawEmail;
use crate::oracle::{CompletionOracle, OracleError, ResponseFormat, RetryPolicy, complete_with_retry};
use crate::parsing::ParseContext;
use crate::patterns::PatternTables;
use crate::preferences::UserProfile;

#[derive(Error, Debug)]
pub enum FilterError {
    #[error("oracle call failed: {0}")]
    Oracle(#[from] OracleError),

    #[error("unusable oracle response: {0}")]
    Decisions(#[from] DecisionError),

    #[error("no decision matches a submitted email")]
    NoMatchingIds,
}

pub struct RelevanceFilter {
    oracle: Arc<dyn CompletionOracle>,
    tables: Arc<PatternTables>,
    parser: ParseContext,
    retry: RetryPolicy,
    snippet_words: usize,
}

impl RelevanceFilter {
    pub fn new(oracle: Arc<dyn CompletionOracle>, tables: Arc<PatternTables>) -> Self {
        Self {
            oracle,
            tables,
            parser: ParseContext::default(),
            retry: RetryPolicy::default(),
            snippet_words: DEFAULT_SNIPPET_WORDS,
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_parser(mut self, parser: ParseContext) -> Self {
        self.parser = parser;
        self
    }

    pub fn with_snippet_words(mut self, words: usize) -> Self {
        self.snippet_words = words;
        self
    }

    /// The subset of `emails` relevant to `profile`, in input order.
    ///
    /// Emails missing from a usable decision list are dropped. If the
    /// oracle fails or answers with nothing usable, `emails` comes back
    /// unchanged.
    #[instrument(skip_all, fields(emails = emails.len()))]
    pub async fn filter(&self, emails: Vec<RawEmail>, profile: &UserProfile) -> Vec<RawEmail> {
        if emails.is_empty() {
            return emails;
        }

        let decisions = match self.decide(&emails, profile).await {
            Ok(decisions) => decisions,
            Err(e) => {
                warn!(error = %e, "Relevance filter unavailable, passing all emails through");
                return emails;
            }
        };

        let total = emails.len();
        let kept: Vec<RawEmail> = emails
            .into_iter()
            .filter(|email| match decisions.get(&email.id) {
                Some(decision) => {
                    if !decision.include {
                        debug!(id = %email.id, reason = %decision.reason, "Excluded email");
                    }
                    decision.include
                }
                None => {
                    debug!(id = %email.id, "No decision for email, excluding");
                    false
                }
            })
            .collect();

        info!(total, kept = kept.len(), "Relevance filter completed");
        kept
    }

    /// Ask the oracle about the whole batch.
    pub async fn decide(
        &self,
        emails: &[RawEmail],
        profile: &UserProfile,
    ) -> Result<HashMap<String, Decision>, FilterError> {
        let snippets =
            build_snippets(emails, &self.tables, &self.parser, self.snippet_words).await;
        let prompt = build_prompt(&snippets, profile);

        info!(
            emails = emails.len(),
            prompt_chars = prompt.len(),
            "Evaluating emails against reader profile"
        );

        let response =
            complete_with_retry(self.oracle.as_ref(), &prompt, ResponseFormat::Json, &self.retry)
                .await?;
        let decisions = parse_decisions(&response)?;

        if !emails.iter().any(|email| decisions.contains_key(&email.id)) {
            return Err(FilterError::NoMatchingIds);
        }
        Ok(decisions)
    }
}
