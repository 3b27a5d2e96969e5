//! The mailbox that newsletters are fetched from.
//!
//! Errors here always reach the caller: without the source mailbox there is
//! nothing to process.

pub mod client;
pub mod decode;
pub mod errors;
pub mod types;

pub use client::GmailClient;
pub use errors::MailboxError;
pub use types::{MessageList, MessagePart, MessageRef, RawEmail, RawMessage};

use async_trait::async_trait;
use futures::stream::{self, StreamExt, TryStreamExt};
use tracing::{info, instrument};

/// Largest page `messages.list` accepts.
const MAX_PAGE_SIZE: usize = 500;
const MAX_CONCURRENT_FETCHES: usize = 8;

#[async_trait]
pub trait Mailbox: Send + Sync {
    async fn list_messages(
        &self,
        query: &str,
        max_results: u32,
        page_token: Option<&str>,
    ) -> Result<MessageList, MailboxError>;

    async fn get_message(&self, id: &str) -> Result<RawMessage, MailboxError>;
}

/// Fetch up to `limit` messages matching `query`, in listing order.
#[instrument(skip_all, fields(query = %query, limit = limit))]
pub async fn fetch_emails(
    mailbox: &dyn Mailbox,
    query: &str,
    limit: usize,
) -> Result<Vec<RawEmail>, MailboxError> {
    let mut ids: Vec<String> = Vec::new();
    let mut page_token: Option<String> = None;

    while ids.len() < limit {
        let page_size = (limit - ids.len()).min(MAX_PAGE_SIZE) as u32;
        let page = mailbox
            .list_messages(query, page_size, page_token.as_deref())
            .await?;

        ids.extend(page.messages.into_iter().map(|m| m.id));
        page_token = page.next_page_token;
        if page_token.is_none() {
            break;
        }
    }
    ids.truncate(limit);

    let emails: Vec<RawEmail> = stream::iter(ids)
        .map(|id| async move {
            let message = mailbox.get_message(&id).await?;
            decode::to_raw_email(message)
        })
        .buffered(MAX_CONCURRENT_FETCHES)
        .try_collect()
        .await?;

    info!(emails = emails.len(), "Fetched emails");
    Ok(emails)
}
