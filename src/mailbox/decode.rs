use std::sync::LazyLock;

use base64::Engine as _;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use chrono::{DateTime, Utc};
use encoding_rs::Encoding;
use regex::Regex;

use crate::mailbox::MailboxError;
use crate::mailbox::types::{MessagePart, RawEmail, RawMessage};

/// Gmail bodies are base64url and may or may not carry padding.
const BODY_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

static CHARSET_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)charset\s*=\s*["']?([^"'\s;]+)"#).unwrap());

/// Convert a fetched message into the pipeline's email type.
pub fn to_raw_email(message: RawMessage) -> Result<RawEmail, MailboxError> {
    let payload = message
        .payload
        .as_ref()
        .ok_or_else(|| MailboxError::MissingPayload(message.id.clone()))?;

    let subject = payload.header("Subject").unwrap_or_default().trim().to_string();
    let from = payload.header("From").unwrap_or_default().trim().to_string();
    let date = message_date(message.internal_date.as_deref(), payload.header("Date"));
    let body = decode_body(payload)?;

    Ok(RawEmail {
        id: message.id,
        subject,
        from,
        date,
        body,
        snippet: message.snippet,
    })
}

/// Decoded text of the best body part: the first `text/html` part in
/// depth-first order, else the first `text/plain` part, else empty.
pub fn decode_body(payload: &MessagePart) -> Result<String, MailboxError> {
    let part = find_part(payload, "text/html").or_else(|| find_part(payload, "text/plain"));
    let Some(part) = part else {
        return Ok(String::new());
    };
    let Some(data) = part.body.as_ref().and_then(|b| b.data.as_deref()) else {
        return Ok(String::new());
    };

    let bytes = decode_base64url(data)?;
    Ok(decode_text(&bytes, part.header("Content-Type")))
}

fn find_part<'a>(part: &'a MessagePart, mime_type: &str) -> Option<&'a MessagePart> {
    let has_data = part
        .body
        .as_ref()
        .is_some_and(|b| b.data.as_deref().is_some_and(|d| !d.is_empty()));
    if part.mime_type.eq_ignore_ascii_case(mime_type) && has_data {
        return Some(part);
    }
    part.parts.iter().find_map(|child| find_part(child, mime_type))
}

pub fn decode_base64url(data: &str) -> Result<Vec<u8>, MailboxError> {
    let compact: String = data.chars().filter(|c| !c.is_whitespace()).collect();
    BODY_ENGINE
        .decode(compact.as_bytes())
        .map_err(|e| MailboxError::Decode(e.to_string()))
}

/// Decode body bytes: the declared charset when it is known, else UTF-8 when
/// the bytes are valid UTF-8, else whatever `chardetng` guesses.
pub fn decode_text(bytes: &[u8], content_type: Option<&str>) -> String {
    let declared = content_type
        .and_then(|ct| CHARSET_REGEX.captures(ct))
        .and_then(|caps| caps.get(1))
        .and_then(|label| Encoding::for_label(label.as_str().trim().as_bytes()));

    if let Some(encoding) = declared {
        let (text, _, _) = encoding.decode(bytes);
        return text.into_owned();
    }

    if let Ok(text) = std::str::from_utf8(bytes) {
        return text.to_string();
    }

    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(bytes, true);
    let (text, _, _) = detector.guess(None, true).decode(bytes);
    text.into_owned()
}

fn message_date(internal_date: Option<&str>, date_header: Option<&str>) -> DateTime<Utc> {
    internal_date
        .and_then(|ms| ms.trim().parse::<i64>().ok())
        .and_then(DateTime::from_timestamp_millis)
        .or_else(|| {
            date_header
                .and_then(|d| DateTime::parse_from_rfc2822(d.trim()).ok())
                .map(|d| d.with_timezone(&Utc))
        })
        .unwrap_or_default()
}
