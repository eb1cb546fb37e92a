//! HTTP source for `/god-mode` scanner snapshots

use async_trait::async_trait;
use chrono::Utc;
use ngta_breakout::Snapshot;
use reqwest::Client;
use tracing::debug;
use url::Url;

use super::{config::FeedConfig, error::FeedError};

/// Anything the feed can pull a complete [`Snapshot`] from.
#[async_trait]
pub trait SnapshotSource: Send + Sync + 'static {
    async fn fetch(&self) -> Result<Snapshot, FeedError>;
}

/// Polls the market data service over HTTP.
#[derive(Debug, Clone)]
pub struct HttpSnapshotSource {
    client: Client,
    url: Url,
}

impl HttpSnapshotSource {
    pub fn new(config: &FeedConfig) -> Result<Self, FeedError> {
        let url = config.snapshot_url()?;
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self { client, url })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl SnapshotSource for HttpSnapshotSource {
    async fn fetch(&self) -> Result<Snapshot, FeedError> {
        let response = self.client.get(self.url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        debug!(url = %self.url, bytes = body.len(), "received snapshot payload");

        Ok(Snapshot::from_json(&body, Utc::now())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ngta_breakout::SnapshotError;
    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::TcpListener,
    };

    /// Serve one canned HTTP response on a local port; requests off `/god-mode` get a 404.
    async fn serve_once(status: &'static str, body: &'static str) -> FeedConfig {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut request = [0u8; 2048];
            let read = stream.read(&mut request).await.unwrap();

            let (status, body) = if request[..read].starts_with(b"GET /god-mode ") {
                (status, body)
            } else {
                ("404 Not Found", "")
            };
            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );

            stream.write_all(response.as_bytes()).await.unwrap();
            stream.shutdown().await.unwrap();
        });

        FeedConfig::new(format!("http://{address}"))
    }

    async fn fetch(status: &'static str, body: &'static str) -> Result<Snapshot, FeedError> {
        let config = serve_once(status, body).await;
        HttpSnapshotSource::new(&config).unwrap().fetch().await
    }

    #[tokio::test]
    async fn test_fetch_decodes_success_payload() {
        let body = r#"{"status": "success", "scanner_status": "Running", "data": [
            {"symbol": "ABC", "token": "1", "ltp": 100.0, "change_pct": 5.0}
        ]}"#;

        let snapshot = fetch("200 OK", body).await.unwrap();

        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.instruments()[0].symbol, "ABC");
    }

    #[tokio::test]
    async fn test_fetch_non_success_status() {
        let actual = fetch("503 Service Unavailable", "").await;
        assert_eq!(actual.unwrap_err(), FeedError::Status(503));
    }

    #[tokio::test]
    async fn test_fetch_undecodable_body() {
        let actual = fetch("200 OK", "<html>gateway error</html>").await;
        assert!(matches!(
            actual,
            Err(FeedError::Snapshot(SnapshotError::Json(_)))
        ));
    }

    #[tokio::test]
    async fn test_fetch_rejected_envelope() {
        let actual = fetch("200 OK", r#"{"status": "error", "message": "Session expired"}"#).await;

        let error = actual.unwrap_err();
        assert!(error.is_transient());
        assert_eq!(
            error,
            FeedError::Snapshot(SnapshotError::Rejected {
                status: "error".to_string(),
                message: Some("Session expired".to_string()),
            })
        );
    }

    #[tokio::test]
    async fn test_fetch_unreachable_service() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        drop(listener);

        let config = FeedConfig::new(format!("http://{address}"));
        let actual = HttpSnapshotSource::new(&config).unwrap().fetch().await;

        assert!(matches!(actual, Err(FeedError::Http(_))));
    }

    #[test]
    fn test_http_source_targets_snapshot_endpoint() {
        let source = HttpSnapshotSource::new(&FeedConfig::new("http://127.0.0.1:8000")).unwrap();
        assert_eq!(source.url().as_str(), "http://127.0.0.1:8000/god-mode");
    }

    #[test]
    fn test_http_source_rejects_invalid_url() {
        let actual = HttpSnapshotSource::new(&FeedConfig::new("not a url"));
        assert!(matches!(actual, Err(FeedError::InvalidUrl(_))));
    }
}
