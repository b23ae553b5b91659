use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Headers, query parameters, and optional JSON body for one request.
///
/// Also the `options` payload persisted inside a history record, so every
/// field defaults on deserialization to stay readable against old files.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RequestOptions {
    #[serde(default)]
    pub headers: HashMap<String, String>,
    #[serde(default)]
    pub query: HashMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

#[derive(Clone, Debug)]
pub struct Request {
    pub method: Method,
    pub url: String,
    pub options: RequestOptions,
}

impl Request {
    pub fn new(method: Method, url: String, options: RequestOptions) -> Self {
        Self {
            method,
            url,
            options,
        }
    }
}
