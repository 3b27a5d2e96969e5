use std::sync::Arc;

use futures::future::join_all;
use serde::Serialize;

use crate::boilerplate::remove_boilerplate;
use crate::extractor::model::normalize_whitespace;
use crate::mailbox::RawEmail;
use crate::parsing::ParseContext;
use crate::patterns::PatternTables;
use crate::sampler::{SampleShape, sample_with};

pub const DEFAULT_SNIPPET_WORDS: usize = 100;

/// Words of the subject kept in front of the body sample.
const SUBJECT_WORDS: usize = 20;

/// What the oracle sees of one email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailSnippet {
    pub id: String,
    pub snippet: String,
}

/// Extract, clean and sample every email body concurrently.
///
/// All extractions share one parse pool, which is torn down once the whole
/// batch is done. Output order matches `emails`.
pub async fn build_snippets(
    emails: &[RawEmail],
    tables: &Arc<PatternTables>,
    parser: &ParseContext,
    budget: usize,
) -> Vec<EmailSnippet> {
    parser
        .with_session(|pool| async move {
            join_all(emails.iter().map(|email| {
                let pool = Arc::clone(&pool);
                let tables = Arc::clone(tables);
                async move {
                    let content = pool.extract(email.body.clone(), Arc::clone(&tables)).await;
                    let cleaned = remove_boilerplate(&content.text, &tables);
                    EmailSnippet {
                        id: email.id.clone(),
                        snippet: snippet_for(email, &cleaned, budget),
                    }
                }
            }))
            .await
        })
        .await
}

/// `Subject: <subject> | <body sample>`. An email whose body cleans down to
/// nothing is represented by the mailbox's own preview.
pub fn snippet_for(email: &RawEmail, cleaned_body: &str, budget: usize) -> String {
    let body = if cleaned_body.trim().is_empty() {
        normalize_whitespace(&email.snippet)
    } else {
        cleaned_body.to_string()
    };
    compose(&email.subject, &body, budget)
}

fn compose(subject: &str, body: &str, budget: usize) -> String {
    let subject: Vec<&str> = subject.split_whitespace().take(SUBJECT_WORDS).collect();
    let body: Vec<&str> = body.split_whitespace().collect();
    let body_budget = budget.saturating_sub(subject.len());

    format!(
        "Subject: {} | {}",
        subject.join(" "),
        sample_with(&body, body_budget, SampleShape::SNIPPET)
    )
}
