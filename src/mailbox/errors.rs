use thiserror::Error;

#[derive(Error, Debug)]
pub enum MailboxError {
    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("http error {status}")]
    Http {
        status: reqwest::StatusCode,
        retriable: bool,
    },

    #[error("network error: {0}")]
    Network(String),

    #[error("decode error: {0}")]
    Decode(String),

    #[error("message {0} has no payload")]
    MissingPayload(String),
}

impl MailboxError {
    pub fn from_reqwest_error(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            Self::Http {
                status,
                retriable: status.is_server_error(),
            }
        } else if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}
