use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use crate::mailbox::types::{MessageList, RawMessage};
use crate::mailbox::{Mailbox, MailboxError};

const USER_AGENT: &str = "letterbox/0.1";

/// Gmail v1 REST client for a single user.
#[derive(Debug, Clone)]
pub struct GmailClient {
    client: Client,
    /// e.g. `https://gmail.googleapis.com/gmail/v1/users/me`
    base_url: Url,
    token: String,
}

impl GmailClient {
    pub fn new(base_url: &str, token: impl Into<String>) -> Result<Self, MailboxError> {
        let mut base_url = Url::parse(base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = ClientBuilder::new()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(30))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| MailboxError::Network(e.to_string()))?;

        Ok(Self {
            client,
            base_url,
            token: token.into(),
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        query: &[(&str, String)],
    ) -> Result<T, MailboxError> {
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.token)
            .query(query)
            .send()
            .await
            .map_err(MailboxError::from_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(MailboxError::Http {
                status,
                retriable: status.is_server_error(),
            });
        }

        response
            .json()
            .await
            .map_err(|e| MailboxError::Decode(e.to_string()))
    }
}

#[async_trait]
impl Mailbox for GmailClient {
    #[instrument(skip_all, fields(query = %query, max_results = max_results))]
    async fn list_messages(
        &self,
        query: &str,
        max_results: u32,
        page_token: Option<&str>,
    ) -> Result<MessageList, MailboxError> {
        let url = self.base_url.join("messages")?;
        let mut params = vec![
            ("q", query.to_string()),
            ("maxResults", max_results.to_string()),
        ];
        if let Some(token) = page_token {
            params.push(("pageToken", token.to_string()));
        }

        let page: MessageList = self.get_json(url, &params).await?;
        debug!(
            count = page.messages.len(),
            has_next = page.next_page_token.is_some(),
            "Listed messages"
        );
        Ok(page)
    }

    #[instrument(skip_all, fields(id = %id))]
    async fn get_message(&self, id: &str) -> Result<RawMessage, MailboxError> {
        let url = self.base_url.join("messages/")?.join(id)?;
        self.get_json(url, &[("format", "full".to_string())]).await
    }
}
