//! Fetching snapshots and history from the price service.
//!
//! `PriceSource` is the transport seam: the controller only sees typed results,
//! so tests swap the HTTP implementation for an in-memory one. Any non-2xx
//! status, transport failure or undecodable body is an error.
use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use price_common::net::{HISTORY_SEGMENT, PRICES_PATH, history_key};
use price_common::{DashboardError, HistoricalEntry, Quote, Result};
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;

/// Read side of the price service.
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// `GET /api/prices`: the latest quote of every commodity.
    async fn fetch_prices(&self) -> Result<Vec<Quote>>;

    /// `GET /history/{key}`: every stored point of `commodity`.
    async fn fetch_history(&self, commodity: &str) -> Result<Vec<HistoricalEntry>>;
}

/// `PriceSource` over HTTP with `reqwest`.
#[derive(Clone)]
pub struct HttpPriceSource {
    client: Client,
    base: Url,
}

fn transport(e: reqwest::Error) -> DashboardError {
    DashboardError::Transport(e.to_string())
}

impl HttpPriceSource {
    /// Create a source rooted at `base_url`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base = Url::parse(base_url.trim())
            .map_err(|e| DashboardError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        if base.cannot_be_a_base() {
            return Err(DashboardError::InvalidUrl(base_url.to_string()));
        }
        let client = Client::builder().timeout(timeout).build().map_err(transport)?;
        Ok(Self { client, base })
    }

    /// Snapshot endpoint.
    pub fn prices_url(&self) -> Result<Url> {
        self.endpoint(PRICES_PATH)
    }

    /// History endpoint of `commodity`. The key is lowercased and
    /// percent-encoded as a single path segment.
    pub fn history_url(&self, commodity: &str) -> Result<Url> {
        let key = history_key(commodity);
        self.endpoint([HISTORY_SEGMENT, key.as_str()])
    }

    fn endpoint<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| DashboardError::InvalidUrl(self.base.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        debug!("GET {}", url);
        let response = self.client.get(url.clone()).send().await.map_err(transport)?;
        let status = response.status();
        if !status.is_success() {
            return Err(DashboardError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        let text = response.text().await.map_err(transport)?;
        Ok(serde_json::from_str(&text)?)
    }
}

#[async_trait]
impl PriceSource for HttpPriceSource {
    async fn fetch_prices(&self) -> Result<Vec<Quote>> {
        let url = self.prices_url()?;
        self.get_json(url).await
    }

    async fn fetch_history(&self, commodity: &str) -> Result<Vec<HistoricalEntry>> {
        let url = self.history_url(commodity)?;
        self.get_json(url).await
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn source(base: &str) -> HttpPriceSource {
        HttpPriceSource::new(base, Duration::from_secs(5)).unwrap()
    }

    /// Serve one canned HTTP response and hand back the request line.
    async fn serve_once(status: &str, body: &'static str) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        let status = status.to_string();
        let handle = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 4096];
            let n = stream.read(&mut buf).await.unwrap();
            let request = String::from_utf8_lossy(&buf[..n]).to_string();
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            stream.write_all(response.as_bytes()).await.unwrap();
            request.lines().next().unwrap_or_default().to_string()
        });
        (base, handle)
    }

    #[test]
    fn builds_endpoint_urls() {
        let src = source("http://localhost:8000");
        assert_eq!(src.prices_url().unwrap().as_str(), "http://localhost:8000/api/prices");
        assert_eq!(
            src.history_url("Cotton (Cotton H24)").unwrap().as_str(),
            "http://localhost:8000/history/cotton%20(cotton%20h24)"
        );
    }

    #[test]
    fn history_key_is_a_single_segment() {
        let src = source("http://example.com/dash/");
        assert_eq!(
            src.history_url("Beef/Veal #1").unwrap().as_str(),
            "http://example.com/dash/history/beef%2Fveal%20%231"
        );
    }

    #[test]
    fn rejects_unusable_base_urls() {
        for base in ["not a url", "mailto:prices@example.com"] {
            assert!(matches!(
                HttpPriceSource::new(base, Duration::from_secs(1)),
                Err(DashboardError::InvalidUrl(_))
            ));
        }
    }

    #[tokio::test]
    async fn decodes_snapshot() {
        let (base, server) = serve_once(
            "200 OK",
            r#"[{"commodity":"Wheat (H2)","price":300,"change":"-1.5%","unit":"$/tonne","timestamp":"2024-05-01T10:00:00"}]"#,
        )
        .await;
        let quotes = source(&base).fetch_prices().await.unwrap();
        assert_eq!(quotes.len(), 1);
        assert_eq!(quotes[0].commodity, "Wheat (H2)");
        assert_eq!(server.await.unwrap(), "GET /api/prices HTTP/1.1");
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let (base, server) = serve_once("500 Internal Server Error", "").await;
        let err = source(&base).fetch_history("Wheat (H2)").await.unwrap_err();
        assert!(matches!(err, DashboardError::HttpStatus { status: 500, .. }));
        assert!(err.is_transport());
        assert_eq!(server.await.unwrap(), "GET /history/wheat%20(h2) HTTP/1.1");
    }

    #[tokio::test]
    async fn undecodable_body_is_an_error() {
        let (base, _server) = serve_once("200 OK", r#"{"error":"No prices available yet"}"#).await;
        let err = source(&base).fetch_prices().await.unwrap_err();
        assert!(matches!(err, DashboardError::SerdeJson(_)));
    }
}
