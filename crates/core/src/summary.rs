use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::{config::DigestConfig, error::SummaryError, types::SummaryResult};

#[derive(Debug, Serialize)]
struct SummaryRequest<'a> {
    video_id: &'a str,
}

#[derive(Debug, Deserialize)]
struct SummaryReply {
    summary: Option<String>,
    error: Option<String>,
}

/// Client for the summarization backend.
pub struct SummaryClient {
    client: Client,
    endpoint: String,
}

impl SummaryClient {
    pub fn new(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    pub fn from_config(config: &DigestConfig) -> Result<Self, SummaryError> {
        let client = config.http_client().map_err(SummaryError::Client)?;
        Ok(Self::new(client, config.backend_url.clone()))
    }

    pub async fn summarize(&self, video_id: &str) -> Result<String, SummaryError> {
        tracing::info!(%video_id, endpoint = %self.endpoint, "requesting summary");

        let response = self
            .client
            .post(&self.endpoint)
            .json(&SummaryRequest { video_id })
            .send()
            .await?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SummaryError::InvalidResponse {
                reason: format!("could not read body: {e}"),
            })?;
        let reply: Option<SummaryReply> = serde_json::from_str(&body).ok();

        if !status.is_success() {
            let message = reply
                .and_then(|r| r.error)
                .unwrap_or_else(|| format!("HTTP error! status: {}", status.as_u16()));
            tracing::warn!(status = status.as_u16(), %message, "backend refused summary");
            return Err(SummaryError::Backend { message });
        }

        reply
            .and_then(|r| r.summary)
            .ok_or_else(|| SummaryError::InvalidResponse {
                reason: format!("missing `summary` in {body:?}"),
            })
    }

    pub async fn summary_result(&self, video_id: &str) -> SummaryResult {
        self.summarize(video_id).await.into()
    }
}

#[cfg(test)]
mod tests {
    use std::{
        io::{Read, Write},
        net::TcpListener,
        thread,
    };

    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{body_json, method, path},
    };

    use super::*;

    async fn client_for(server: &MockServer) -> SummaryClient {
        SummaryClient::new(Client::new(), format!("{}/api/summarize", server.uri()))
    }

    #[tokio::test]
    async fn posts_video_id_and_returns_summary() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/summarize"))
            .and(body_json(serde_json::json!({ "video_id": "abc123" })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "summary": "**Title**\n* point" })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let summary = client_for(&server).await.summarize("abc123").await.unwrap();
        assert_eq!(summary, "**Title**\n* point");
    }

    #[tokio::test]
    async fn backend_error_message_is_surfaced() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(500).set_body_json(
                    serde_json::json!({ "error": "Transcript not available for this video." }),
                ),
            )
            .mount(&server)
            .await;

        let result = client_for(&server).await.summary_result("abc123").await;
        assert_eq!(
            result,
            SummaryResult::Failed("Transcript not available for this video.".to_string())
        );
    }

    #[tokio::test]
    async fn status_is_reported_when_error_body_is_missing() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .mount(&server)
            .await;

        let err = client_for(&server).await.summarize("abc123").await.unwrap_err();
        assert_eq!(err.to_string(), "HTTP error! status: 502");
    }

    #[tokio::test]
    async fn success_without_summary_is_invalid() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;

        let err = client_for(&server).await.summarize("abc123").await.unwrap_err();
        assert!(matches!(err, SummaryError::InvalidResponse { .. }));
    }

    #[tokio::test]
    async fn unreachable_backend_is_connect_error() {
        let client = SummaryClient::new(Client::new(), "http://127.0.0.1:9/api/summarize");
        let err = client.summarize("abc123").await.unwrap_err();

        assert!(matches!(err, SummaryError::Connect(_)));
        assert!(err.to_string().starts_with("Failed to connect to the backend server"));
    }

    #[tokio::test]
    async fn truncated_reply_body_is_invalid_response() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let server = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.ends_with(b"}") {
                let n = stream.read(&mut buf).unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            stream
                .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 100\r\n\r\n{\"summ")
                .unwrap();
        });

        let client = SummaryClient::new(Client::new(), format!("http://{addr}/api/summarize"));
        let err = client.summarize("abc123").await.unwrap_err();
        server.join().unwrap();

        assert!(matches!(err, SummaryError::InvalidResponse { .. }), "{err:?}");
    }

    #[test]
    fn client_setup_failure_is_not_a_connect_error() {
        let config = DigestConfig {
            user_agent: "broken\nagent".to_string(),
            ..DigestConfig::default()
        };
        let err = SummaryClient::from_config(&config).err().unwrap();

        assert!(matches!(err, SummaryError::Client(_)), "{err:?}");
        assert!(err.to_string().starts_with("Failed to set up the HTTP client"));
    }
}
