use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Unable to perform REST call. Status {status}. Message: {body}")]
    Status { status: StatusCode, body: String },

    #[error("Response field `{0}` missing")]
    MissingField(&'static str),

    #[error("Deserialization failed: {0}")]
    Decode(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ClientError>;
