use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An email as handed to the processing pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEmail {
    pub id: String,
    pub subject: String,
    pub from: String,
    pub date: DateTime<Utc>,
    /// HTML body, or plain text when the message has no HTML part.
    pub body: String,
    /// Short preview supplied by the mailbox.
    pub snippet: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageRef {
    pub id: String,
    #[serde(default)]
    pub thread_id: Option<String>,
}

/// One page of `messages.list`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageList {
    #[serde(default)]
    pub messages: Vec<MessageRef>,
    #[serde(default)]
    pub next_page_token: Option<String>,
    #[serde(default)]
    pub result_size_estimate: Option<u32>,
}

/// A message as returned by `messages.get` with `format=full`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMessage {
    pub id: String,
    #[serde(default)]
    pub thread_id: Option<String>,
    #[serde(default)]
    pub snippet: String,
    /// Milliseconds since the epoch, as a decimal string.
    #[serde(default)]
    pub internal_date: Option<String>,
    #[serde(default)]
    pub label_ids: Vec<String>,
    #[serde(default)]
    pub payload: Option<MessagePart>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagePart {
    #[serde(default)]
    pub part_id: Option<String>,
    #[serde(default)]
    pub mime_type: String,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub headers: Vec<Header>,
    #[serde(default)]
    pub body: Option<PartBody>,
    #[serde(default)]
    pub parts: Vec<MessagePart>,
}

impl MessagePart {
    /// First header named `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|h| h.name.eq_ignore_ascii_case(name))
            .map(|h| h.value.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartBody {
    #[serde(default)]
    pub size: u64,
    /// Base64url-encoded content.
    #[serde(default)]
    pub data: Option<String>,
    #[serde(default)]
    pub attachment_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_gmail_message() {
        let json = r#"{
            "id": "18c1",
            "threadId": "18c0",
            "labelIds": ["INBOX", "CATEGORY_UPDATES"],
            "snippet": "This week in AI",
            "internalDate": "1700000000000",
            "payload": {
                "mimeType": "multipart/alternative",
                "headers": [{"name": "Subject", "value": "Weekly"}],
                "body": {"size": 0},
                "parts": [
                    {"partId": "0", "mimeType": "text/plain", "body": {"size": 5, "data": "aGVsbG8"}}
                ]
            }
        }"#;
        let message: RawMessage = serde_json::from_str(json).unwrap();
        assert_eq!(message.thread_id.as_deref(), Some("18c0"));
        assert_eq!(message.label_ids.len(), 2);

        let payload = message.payload.unwrap();
        assert_eq!(payload.header("subject"), Some("Weekly"));
        assert_eq!(payload.parts[0].body.as_ref().unwrap().data.as_deref(), Some("aGVsbG8"));
    }

    #[test]
    fn test_empty_list_page() {
        let page: MessageList = serde_json::from_str(r#"{"resultSizeEstimate": 0}"#).unwrap();
        assert!(page.messages.is_empty());
        assert!(page.next_page_token.is_none());
    }
}
