//! Page fetching for titles and archive snapshots.

use std::time::Duration;

use anchor_core::scrape;
use anyhow::{Context, Result};
use reqwest::Client;

/// HTTP client shared by the commands.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

/// A fetched document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub title: Option<String>,
    pub html: String,
}

impl Page {
    /// Readable part of the document, for archiving.
    pub fn content(&self) -> String {
        scrape::simplify(&self.html)
    }
}

impl Fetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("anchor/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { client })
    }

    pub async fn page(&self, url: &str) -> Result<Page> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to fetch {url}"))?
            .error_for_status()
            .with_context(|| format!("Failed to fetch {url}"))?;

        let html = response
            .text()
            .await
            .with_context(|| format!("Failed to read response body from {url}"))?;

        Ok(Page {
            title: scrape::extract_title(&html),
            html,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serves a single HTTP response on a local port.
    async fn serve_once(status: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = [0u8; 1024];
            let _ = socket.read(&mut request).await;

            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
        });

        format!("http://{addr}/")
    }

    #[tokio::test]
    async fn test_fetch_page() {
        let url = serve_once(
            "200 OK",
            "<html><head><title>Go by Example</title></head><body><main>hello</main></body></html>",
        )
        .await;
        let fetcher = Fetcher::new(Duration::from_secs(3)).unwrap();

        let page = fetcher.page(&url).await.unwrap();

        assert_eq!(page.title.as_deref(), Some("Go by Example"));
        assert_eq!(page.content(), "hello");
    }

    #[tokio::test]
    async fn test_page_on_error_status() {
        let url = serve_once("404 Not Found", "<title>missing</title>").await;
        let fetcher = Fetcher::new(Duration::from_secs(3)).unwrap();

        let err = fetcher.page(&url).await.unwrap_err();
        assert!(err.to_string().starts_with("Failed to fetch"));
    }
}
