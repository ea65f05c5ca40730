use async_trait::async_trait;
use reqwest::{RequestBuilder, StatusCode, Url};
use std::time::Duration;
use tracing::{debug, info};

use crate::{
    backend::{client::BackendConfig, ContestBackend, Session},
    models::{LeaderboardError, Result, WinnerRecord, WinnersEnvelope},
};

const CODECHEF_PATH: [&str; 3] = ["api", "contests", "codechef"];

/// REST client for the contest backend. Every request carries the bearer
/// credential of the injected [`Session`], if one is set.
pub struct HttpBackend {
    http_client: reqwest::Client,
    base_url: Url,
    session: Session,
}

impl HttpBackend {
    pub fn new(config: BackendConfig, session: Session) -> Result<Self> {
        let base_url = Url::parse(&config.base_url).map_err(|e| LeaderboardError::InvalidUrl {
            url: config.base_url.clone(),
            message: e.to_string(),
        })?;

        if base_url.cannot_be_a_base() {
            return Err(LeaderboardError::InvalidUrl {
                url: config.base_url,
                message: "URL cannot carry a path".to_string(),
            });
        }

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            http_client,
            base_url,
            session,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// `{base}/api/contests/codechef/{segments...}`, each segment
    /// percent-encoded on its own.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| LeaderboardError::InvalidUrl {
                url: self.base_url.to_string(),
                message: "URL cannot carry a path".to_string(),
            })?
            .pop_if_empty()
            .extend(CODECHEF_PATH)
            .extend(segments);
        Ok(url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.session.bearer() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder, endpoint: &Url) -> Result<reqwest::Response> {
        debug!("Requesting {}", endpoint);
        let response = self.authorize(request).send().await?;

        if response.status() != StatusCode::OK {
            return Err(LeaderboardError::UnexpectedStatus {
                status: response.status().as_u16(),
                endpoint: endpoint.to_string(),
            });
        }

        Ok(response)
    }
}

#[async_trait]
impl ContestBackend for HttpBackend {
    async fn fetch_winners(&self, contest_name: &str) -> Result<Vec<WinnerRecord>> {
        let url = self.endpoint(&["get", "allwinners", contest_name])?;
        let response = self.send(self.http_client.get(url.clone()), &url).await?;

        let envelope: WinnersEnvelope = response.json().await?;
        let records = envelope.into_records();
        info!("Received {} winner records for {}", records.len(), contest_name);
        Ok(records)
    }

    async fn generate_results(&self, contest_name: &str) -> Result<()> {
        let url = self.endpoint(&["generate", "allwinners", contest_name])?;
        self.send(self.http_client.get(url.clone()), &url).await?;
        info!("Result generated for {}", contest_name);
        Ok(())
    }

    async fn reset_users(&self) -> Result<()> {
        let url = self.endpoint(&["update", "allusers"])?;
        let request = self.http_client.put(url.clone()).json(&serde_json::json!({}));
        self.send(request, &url).await?;
        info!("Contest users reset");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leaderboard::LeaderboardFetcher;
    use std::sync::Arc;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    fn backend(base_url: &str) -> HttpBackend {
        backend_with_session(base_url, Session::new())
    }

    fn backend_with_session(base_url: &str, session: Session) -> HttpBackend {
        HttpBackend::new(
            BackendConfig {
                base_url: base_url.to_string(),
                timeout_seconds: 5,
            },
            session,
        )
        .unwrap()
    }

    /// Answers a single request with `status` and a JSON `body`, and hands
    /// back the raw request, lowercased.
    async fn serve_once(status: &str, body: &str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let reply = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];

            loop {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
                if request_complete(&request) {
                    break;
                }
            }

            socket.write_all(reply.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            String::from_utf8_lossy(&request).to_lowercase()
        });

        (base_url, handle)
    }

    fn request_complete(raw: &[u8]) -> bool {
        let text = String::from_utf8_lossy(raw).to_lowercase();
        let Some(header_end) = text.find("\r\n\r\n") else {
            return false;
        };
        let content_length = text[..header_end]
            .lines()
            .find_map(|line| line.strip_prefix("content-length:"))
            .and_then(|value| value.trim().parse::<usize>().ok())
            .unwrap_or(0);
        raw.len() >= header_end + 4 + content_length
    }

    #[tokio::test]
    async fn test_fetch_sends_bearer_and_reads_flat_payload() {
        let (base_url, server) = serve_once(
            "200 OK",
            r#"{"data":[{"username":"asha","contestGlobalRank":4},{"username":"ravi"}]}"#,
        )
        .await;
        let session = Session::new();
        session.login("secret");

        let records = backend_with_session(&base_url, session)
            .fetch_winners("start101")
            .await
            .unwrap();
        let request = server.await.unwrap();

        assert!(request.starts_with("get /api/contests/codechef/get/allwinners/start101 http/1.1"));
        assert!(request.contains("authorization: bearer secret"));
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].username, "asha");
        assert_eq!(records[0].contest_global_rank, Some(4));
    }

    #[tokio::test]
    async fn test_logout_drops_authorization_and_reads_nested_payload() {
        let (base_url, server) = serve_once(
            "200 OK",
            r#"{"data":{"winners":[{"username":"asha","stars":"3"}]}}"#,
        )
        .await;
        let session = Session::new();
        session.login("secret");
        let backend = backend_with_session(&base_url, session.clone());
        session.logout();

        let records = backend.fetch_winners("start101").await.unwrap();
        let request = server.await.unwrap();

        assert!(!request.contains("authorization:"));
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].stars_label(), Some("3"));
    }

    #[tokio::test]
    async fn test_non_ok_status_is_an_error() {
        let (base_url, server) = serve_once("403 Forbidden", r#"{"message":"forbidden"}"#).await;

        let result = backend(&base_url).fetch_winners("start101").await;
        server.await.unwrap();

        assert!(matches!(
            result,
            Err(LeaderboardError::UnexpectedStatus { status: 403, .. })
        ));
    }

    #[tokio::test]
    async fn test_fetcher_returns_empty_list_on_forbidden() {
        let (base_url, server) = serve_once("403 Forbidden", r#"{"message":"forbidden"}"#).await;

        let fetcher = LeaderboardFetcher::new(Arc::new(backend(&base_url)));
        let records = fetcher.fetch("start101").await;
        server.await.unwrap();

        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn test_reset_users_puts_empty_json() {
        let (base_url, server) = serve_once("200 OK", r#"{"message":"ok"}"#).await;
        let session = Session::new();
        session.login("admin-token");

        backend_with_session(&base_url, session).reset_users().await.unwrap();
        let request = server.await.unwrap();

        assert!(request.starts_with("put /api/contests/codechef/update/allusers http/1.1"));
        assert!(request.contains("authorization: bearer admin-token"));
        assert!(request.ends_with("\r\n\r\n{}"));
    }

    #[test]
    fn test_winners_endpoint() {
        let url = backend("http://localhost:5001")
            .endpoint(&["get", "allwinners", "start101"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:5001/api/contests/codechef/get/allwinners/start101"
        );
    }

    #[test]
    fn test_endpoint_keeps_base_prefix_and_encodes_names() {
        let url = backend("https://club.example/backend/")
            .endpoint(&["get", "allwinners", "Starters 101/B"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://club.example/backend/api/contests/codechef/get/allwinners/Starters%20101%2FB"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let result = HttpBackend::new(
            BackendConfig {
                base_url: "not a url".to_string(),
                timeout_seconds: 5,
            },
            Session::new(),
        );
        assert!(matches!(result, Err(LeaderboardError::InvalidUrl { .. })));

        let result = HttpBackend::new(
            BackendConfig {
                base_url: "mailto:club@example.com".to_string(),
                timeout_seconds: 5,
            },
            Session::new(),
        );
        assert!(matches!(result, Err(LeaderboardError::InvalidUrl { .. })));
    }

    #[test]
    fn test_session_is_shared_with_caller() {
        let session = Session::new();
        let backend = HttpBackend::new(
            BackendConfig {
                base_url: "http://localhost:5001".to_string(),
                timeout_seconds: 5,
            },
            session.clone(),
        )
        .unwrap();

        session.login("token");
        assert_eq!(backend.session().bearer().as_deref(), Some("token"));
    }
}
