use crate::scrapers::traits::PageFetcher;
use crate::scrapers::types::{FetchedPage, RetryPolicy};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, error, warn};

/// HTTP page fetcher with per-request timeout and exponential backoff
pub struct HttpFetcher {
    client: Client,
    timeout: Duration,
    retry: RetryPolicy,
}

impl HttpFetcher {
    pub fn new(user_agent: &str, timeout: Duration, retry: RetryPolicy) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            timeout,
            retry,
        })
    }

    async fn attempt(&self, url: &str) -> reqwest::Result<FetchedPage> {
        let response = self.client.get(url).timeout(self.timeout).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(FetchedPage {
            url: url.to_string(),
            status,
            body,
        })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Option<FetchedPage> {
        let max_attempts = self.retry.max_attempts.max(1);

        for attempt in 1..=max_attempts {
            match self.attempt(url).await {
                Ok(page) => {
                    if !page.is_success() {
                        // Listing markup sometimes arrives on non-2xx answers; keep the body.
                        warn!(url, status = page.status, attempt, "Non-success status");
                    } else {
                        debug!(url, bytes = page.body.len(), "Fetched page");
                    }
                    return Some(page);
                }
                Err(e) => {
                    warn!(url, attempt, max_attempts, error = %e, "Request failed");
                    if attempt < max_attempts {
                        tokio::time::sleep(self.retry.delay_after(attempt)).await;
                    }
                }
            }
        }

        error!(url, max_attempts, "Giving up after repeated failures");
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn quick_retry(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            base_delay: Duration::from_millis(1),
            factor: 1.5,
        }
    }

    /// Serves `script` on a loopback port, one connection per entry.
    /// `None` hangs up without answering. Returns the URL and an accept counter.
    async fn serve(script: Vec<Option<&'static str>>) -> (String, Arc<AtomicUsize>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let accepted = Arc::new(AtomicUsize::new(0));
        let counter = accepted.clone();
        tokio::spawn(async move {
            for response in script {
                let (mut socket, _) = listener.accept().await.unwrap();
                counter.fetch_add(1, Ordering::SeqCst);
                let mut buf = [0u8; 4096];
                let _ = socket.read(&mut buf).await;
                if let Some(response) = response {
                    socket.write_all(response.as_bytes()).await.unwrap();
                    socket.shutdown().await.unwrap();
                }
            }
        });
        (format!("http://{}/en/search/house/for-sale?page=1", addr), accepted)
    }

    #[tokio::test]
    async fn returns_body_on_success() {
        let (url, _) = serve(vec![Some(
            "HTTP/1.1 200 OK\r\nContent-Length: 11\r\nConnection: close\r\n\r\n<ul></ul>\r\n",
        )])
        .await;
        let fetcher = HttpFetcher::new("test", Duration::from_secs(5), quick_retry(3)).unwrap();

        let page = fetcher.fetch(&url).await.expect("page");
        assert_eq!(page.status, 200);
        assert_eq!(page.body, "<ul></ul>\r\n");
        assert!(page.is_success());
    }

    #[tokio::test]
    async fn keeps_body_of_non_success_response() {
        let (url, accepted) = serve(vec![Some(
            "HTTP/1.1 404 Not Found\r\nContent-Length: 9\r\nConnection: close\r\n\r\n<article>",
        )])
        .await;
        let fetcher = HttpFetcher::new("test", Duration::from_secs(5), quick_retry(3)).unwrap();

        let page = fetcher.fetch(&url).await.expect("body is kept on 404");
        assert_eq!(page.status, 404);
        assert_eq!(page.body, "<article>");
        assert!(!page.is_success());
        assert_eq!(accepted.load(Ordering::SeqCst), 1, "non-2xx is not retried");
    }

    #[tokio::test]
    async fn retries_after_dropped_connection() {
        let (url, accepted) = serve(vec![
            None,
            Some("HTTP/1.1 200 OK\r\nContent-Length: 9\r\nConnection: close\r\n\r\n<article>"),
        ])
        .await;
        let fetcher = HttpFetcher::new("test", Duration::from_secs(5), quick_retry(3)).unwrap();

        let page = fetcher.fetch(&url).await.expect("second attempt succeeds");
        assert_eq!(page.status, 200);
        assert_eq!(page.body, "<article>");
        assert_eq!(accepted.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn stops_after_max_attempts() {
        let (url, accepted) = serve(vec![None, None, None]).await;
        let fetcher = HttpFetcher::new("test", Duration::from_secs(5), quick_retry(3)).unwrap();

        assert!(fetcher.fetch(&url).await.is_none());
        assert_eq!(accepted.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn gives_up_when_transport_keeps_failing() {
        // Bind then drop to get a port nobody listens on.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let fetcher = HttpFetcher::new("test", Duration::from_secs(2), quick_retry(2)).unwrap();
        assert!(fetcher.fetch(&format!("http://{}/", addr)).await.is_none());
    }
}
