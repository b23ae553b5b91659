use reqwest::{header::HeaderMap, StatusCode};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResponseError {
    #[error("Failed to parse JSON: {0}")]
    JsonParseError(#[from] serde_json::Error),
}

#[derive(Clone, Debug)]
pub struct Response {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub text: String,
}

impl Response {
    pub fn json(&self) -> Result<Value, ResponseError> {
        serde_json::from_str::<Value>(&self.text).map_err(ResponseError::from)
    }

    /// `200 OK` style status line.
    pub fn status_line(&self) -> String {
        match self.status.canonical_reason() {
            Some(reason) => format!("{} {}", self.status.as_str(), reason),
            None => self.status.as_str().to_string(),
        }
    }
}
