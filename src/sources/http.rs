use crate::config::SourceConfig;
use crate::sources::error::FetchError;
use log::{info, warn};
use reqwest::Client;

/// Thin GET wrapper shared by the fetchers. Cloning is cheap; the underlying
/// connection pool is shared.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
}

impl HttpSource {
    pub fn new(config: &SourceConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout)
            .build()
            .map_err(FetchError::ClientBuild)?;
        Ok(Self { client })
    }

    /// GETs `url` with the given query pairs and returns the decoded body.
    pub async fn get_text(&self, url: &str, query: &[(&str, &str)]) -> Result<String, FetchError> {
        info!("Requesting {} {:?}", url, query);

        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| FetchError::SourceUnavailable {
                url: url.to_string(),
                status: e.status(),
                source: e,
            })?;

        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                warn!("HTTP error for {}: {:?}", url, e);
                return Err(FetchError::SourceUnavailable {
                    url: url.to_string(),
                    status: e.status(),
                    source: e,
                });
            }
        };

        response
            .text()
            .await
            .map_err(|e| FetchError::SourceUnavailable {
                url: url.to_string(),
                status: None,
                source: e,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn source() -> HttpSource {
        let config = SourceConfig::builder()
            .timeout(Duration::from_secs(5))
            .build();
        HttpSource::new(&config).unwrap()
    }

    /// Answers a single request with `status_line` and an empty body.
    async fn serve_once(status_line: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 1024];
            let _ = stream.read(&mut buf).await;
            let response = format!("{status_line}\r\ncontent-length: 0\r\nconnection: close\r\n\r\n");
            stream.write_all(response.as_bytes()).await.unwrap();
            stream.shutdown().await.unwrap();
        });
        format!("http://{addr}/history")
    }

    #[tokio::test]
    async fn test_connection_refused_is_source_unavailable() {
        let err = source()
            .get_text("http://127.0.0.1:9/regions", &[])
            .await
            .unwrap_err();
        match err {
            FetchError::SourceUnavailable { url, status, .. } => {
                assert_eq!(url, "http://127.0.0.1:9/regions");
                assert_eq!(status, None);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_error_status_is_source_unavailable() {
        let url = serve_once("HTTP/1.1 500 Internal Server Error").await;
        let err = source().get_text(&url, &[("id", "10554")]).await.unwrap_err();
        match err {
            FetchError::SourceUnavailable { status, .. } => {
                assert_eq!(status.map(|s| s.as_u16()), Some(500));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_success_returns_body_text() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 1024];
            let _ = stream.read(&mut buf).await;
            let body = "<table></table>";
            let response = format!(
                "HTTP/1.1 200 OK\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).await.unwrap();
            stream.shutdown().await.unwrap();
        });
        let text = source()
            .get_text(&format!("http://{addr}/"), &[])
            .await
            .unwrap();
        assert_eq!(text, "<table></table>");
    }
}
