use crate::request::Request;
use crate::response::Response;
use bat::PrettyPrinter;
use console::style;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error("Invalid header `{name}`")]
    InvalidHeader { name: String },
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Failed to render output: {0}")]
    Render(String),
}

/// Dispatches requests through a shared HTTP client and renders responses.
///
/// A remote error status is not an error here: the server answered, so the
/// response comes back as `Ok` and callers tell the two failure kinds apart
/// by construction (`Err` means the transport gave out).
#[derive(Debug)]
pub struct Executor {
    http: Client,
}

impl Executor {
    pub fn new() -> Self {
        Self {
            http: Client::new(),
        }
    }

    #[tracing::instrument(skip(self, request), fields(method = %request.method, url = %request.url))]
    pub async fn execute(&self, request: &Request) -> Result<Response, ExecutionError> {
        let mut headers = HeaderMap::new();
        for (key, value) in &request.options.headers {
            let name = HeaderName::from_bytes(key.as_bytes()).map_err(|_| {
                ExecutionError::InvalidHeader { name: key.clone() }
            })?;
            let value = HeaderValue::from_str(value).map_err(|_| {
                ExecutionError::InvalidHeader { name: key.clone() }
            })?;
            headers.insert(name, value);
        }
        debug!(?headers);

        let mut builder = self
            .http
            .request(request.method.clone(), &request.url)
            .headers(headers);

        if !request.options.query.is_empty() {
            builder = builder.query(&request.options.query);
        }

        if let Some(data) = &request.options.data {
            builder = builder.json(data);
        }
        debug!("{:?}", builder);

        let response = builder.send().await?;

        let status = response.status();
        let headers = response.headers().clone();
        let text = response.text().await?;
        debug!(%status, body_bytes = text.len());

        Ok(Response {
            status,
            headers,
            text,
        })
    }

    /// Print one response: colored status, highlighted headers and body for
    /// successful responses, a red error block otherwise.
    pub fn render_output(&self, response: &Response) -> Result<(), ExecutionError> {
        if !response.status.is_success() {
            println!("{}", style("Error:").red().bold());
            match response.json() {
                Ok(body) => self.print_highlighted(
                    &serde_json::to_string_pretty(&body)
                        .map_err(|error| ExecutionError::Render(error.to_string()))?,
                    "json",
                )?,
                Err(_) if !response.text.is_empty() => println!("{}", response.text),
                Err(_) => println!("{}", response.status_line()),
            }
            return Ok(());
        }

        println!(
            "{}",
            style(format!("Status: {}", response.status_line())).green()
        );

        println!("{}", style("Headers:").blue());
        let mut headers_formatted = String::new();
        for (key, value) in &response.headers {
            let value = value.to_str().unwrap_or("");
            headers_formatted.push_str(&format!("{}: {}\n", key.as_str(), value));
        }
        self.print_highlighted(&headers_formatted, "yaml")?;

        println!("{}", style("Body:").blue());
        match response.json() {
            Ok(body) => self.print_highlighted(
                &serde_json::to_string_pretty(&body)
                    .map_err(|error| ExecutionError::Render(error.to_string()))?,
                "json",
            )?,
            Err(_) => self.print_highlighted(&response.text, "plain")?,
        }

        Ok(())
    }

    fn print_highlighted(&self, content: &str, language: &str) -> Result<(), ExecutionError> {
        PrettyPrinter::new()
            .input_from_bytes(content.as_bytes())
            .language(language)
            .print()
            .map_err(|error| ExecutionError::Render(error.to_string()))?;
        println!();
        Ok(())
    }
}

impl Default for Executor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::RequestOptions;
    use reqwest::Method;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn get_forwards_query_parameters() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/foo"))
            .and(query_param("id", "1"))
            .and(query_param("name", "bar"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .expect(1)
            .mount(&server)
            .await;

        let options = RequestOptions {
            query: [
                ("id".to_string(), "1".to_string()),
                ("name".to_string(), "bar".to_string()),
            ]
            .into(),
            ..Default::default()
        };
        let request = Request::new(Method::GET, format!("{}/foo", server.uri()), options);

        let response = Executor::new().execute(&request).await.unwrap();

        assert_eq!(response.status.as_u16(), 200);
        assert_eq!(response.json().unwrap(), json!({"ok": true}));
    }

    #[tokio::test]
    async fn custom_headers_are_sent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(header("x-api-key", "secret"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let options = RequestOptions {
            headers: [("x-api-key".to_string(), "secret".to_string())].into(),
            ..Default::default()
        };
        let request = Request::new(Method::GET, server.uri(), options);

        let response = Executor::new().execute(&request).await.unwrap();

        assert!(response.status.is_success());
    }

    #[tokio::test]
    async fn post_sends_json_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_json(json!({"a": 1})))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        let options = RequestOptions {
            data: Some(json!({"a": 1})),
            ..Default::default()
        };
        let request = Request::new(Method::POST, server.uri(), options);

        let response = Executor::new().execute(&request).await.unwrap();

        assert_eq!(response.status.as_u16(), 201);
    }

    #[tokio::test]
    async fn remote_error_status_is_still_a_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(json!({"error": "not found"})),
            )
            .mount(&server)
            .await;

        let request = Request::new(Method::GET, server.uri(), RequestOptions::default());

        let response = Executor::new().execute(&request).await.unwrap();

        assert_eq!(response.status.as_u16(), 404);
        assert_eq!(response.json().unwrap(), json!({"error": "not found"}));
    }

    #[tokio::test]
    async fn unreachable_server_is_a_transport_error() {
        // A pooled server from `MockServer::start` outlives `drop`; a
        // builder-made server shuts down with it, freeing the port for real.
        let server = MockServer::builder().start().await;
        let dead_uri = server.uri();
        drop(server);

        let request = Request::new(Method::GET, dead_uri, RequestOptions::default());

        let result = Executor::new().execute(&request).await;

        assert!(matches!(result, Err(ExecutionError::Transport(_))));
    }

    #[tokio::test]
    async fn invalid_header_fails_before_send() {
        let options = RequestOptions {
            headers: [("bad header".to_string(), "x".to_string())].into(),
            ..Default::default()
        };
        let request = Request::new(
            Method::GET,
            "http://localhost:1".to_string(),
            options,
        );

        let result = Executor::new().execute(&request).await;

        assert!(matches!(
            result,
            Err(ExecutionError::InvalidHeader { name }) if name == "bad header"
        ));
    }
}
