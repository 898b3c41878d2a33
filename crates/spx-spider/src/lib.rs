pub mod config;
pub mod constituents;
pub mod error;
pub mod finnhub;
pub mod fs;
pub mod pipeline;

mod tui;

pub use config::Config;
pub use constituents::CompanyListing;
pub use error::{Error, Result};
pub use finnhub::{FinnhubClient, StatisticsRecord};
pub use pipeline::RunSummary;

/// Shortcut for required API elements.
pub mod http {
    use crate::error::{Error, Result};
    use tracing::trace;

    pub use dotenv::var;
    pub use reqwest::Client as HttpClient;

    /// Fallback user agent; Wikipedia rejects requests without one.
    pub const DEFAULT_USER_AGENT: &str = "spx-spider/0.1 (constituent scraper)";

    /// A GET request that returns the response body as text.
    ///
    /// Every outbound call in the crate goes through this trait, so a run can be
    /// replayed against canned responses.
    #[allow(async_fn_in_trait)]
    pub trait Fetch {
        async fn get(&self, url: &str, query: &[(&str, &str)]) -> Result<String>;
    }

    impl<T: Fetch> Fetch for &T {
        async fn get(&self, url: &str, query: &[(&str, &str)]) -> Result<String> {
            (**self).get(url, query).await
        }
    }

    /// [`Fetch`] backed by a [`reqwest`] client.
    #[derive(Clone, Debug)]
    pub struct ReqwestFetch {
        client: HttpClient,
    }

    impl ReqwestFetch {
        pub fn new(client: HttpClient) -> Self {
            Self { client }
        }
    }

    impl Fetch for ReqwestFetch {
        async fn get(&self, url: &str, query: &[(&str, &str)]) -> Result<String> {
            trace!("GET {url}");
            let response = self
                .client
                .get(url)
                .query(query)
                .send()
                .await
                .map_err(|source| Error::Network {
                    url: url.to_string(),
                    source,
                })?;

            let status = response.status();
            let body = response.text().await.map_err(|source| Error::Network {
                url: url.to_string(),
                source,
            })?;

            if !status.is_success() {
                return Err(Error::api(url, status.as_u16(), &body));
            }

            Ok(body)
        }
    }
}

/// Build the standard [`reqwest`] client, identified by `USER_AGENT` when set.
pub fn std_client_build() -> Result<http::HttpClient> {
    let user_agent =
        http::var("USER_AGENT").unwrap_or_else(|_| http::DEFAULT_USER_AGENT.to_string());

    reqwest::ClientBuilder::new()
        .user_agent(user_agent)
        .timeout(std::time::Duration::from_secs(30))
        .build()
        .map_err(Error::Client)
}

/// Format the time elapsed since `time`, for log lines.
pub fn time_elapsed(time: std::time::Instant) -> String {
    format!("time elapsed: {:.2?}", time.elapsed())
}

#[cfg(test)]
mod tests {
    use super::http::{Fetch, ReqwestFetch};
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    // serve a single canned HTTP response on a local port, returning the base url
    // and the request line the client sent
    async fn serve_once(
        response: &'static str,
    ) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();

            String::from_utf8_lossy(&request)
                .lines()
                .next()
                .unwrap_or_default()
                .to_string()
        });

        (format!("http://{addr}"), handle)
    }

    fn fetcher() -> ReqwestFetch {
        ReqwestFetch::new(reqwest::Client::new())
    }

    #[tokio::test]
    async fn returns_body_and_sends_query() {
        let (base, server) = serve_once(
            "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: 10\r\nconnection: close\r\n\r\n{\"c\":10.5}",
        )
        .await;

        let body = fetcher()
            .get(&format!("{base}/quote"), &[("symbol", "AAA"), ("token", "t")])
            .await
            .unwrap();
        assert_eq!(body, r#"{"c":10.5}"#);
        assert_eq!(
            server.await.unwrap(),
            "GET /quote?symbol=AAA&token=t HTTP/1.1"
        );
    }

    #[tokio::test]
    async fn rate_limited_response_is_api_error() {
        let (base, _server) = serve_once(
            "HTTP/1.1 429 Too Many Requests\r\ncontent-type: application/json\r\ncontent-length: 54\r\nconnection: close\r\n\r\n{\"error\":\"API limit reached. Please try again later.\"}",
        )
        .await;

        let err = fetcher()
            .get(&format!("{base}/quote"), &[("symbol", "AAA")])
            .await
            .unwrap_err();
        match err {
            Error::Api {
                url,
                status,
                message,
            } => {
                assert_eq!(url, format!("{base}/quote"));
                assert_eq!(status, 429);
                assert_eq!(message, "API limit reached. Please try again later.");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[tokio::test]
    async fn closed_port_is_network_error() {
        // bind then drop, so nothing is listening on the port
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let url = format!("http://{addr}/quote");
        let err = fetcher().get(&url, &[]).await.unwrap_err();
        assert!(matches!(err, Error::Network { url: ref failed, .. } if *failed == url));
    }
}
