use std::time::Duration;

use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue, ORIGIN, REFERER};
use serde_json::Value;

use crate::error::{FetchError, format_api_error};

pub const STATS_BASE_URL: &str = "https://stats.nba.com/stats";
pub const LIVE_BASE_URL: &str = "https://cdn.nba.com/static/json/liveData";
pub const STATIC_BASE_URL: &str = "https://cdn.nba.com/static/json/staticData";

const USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36";
const MAX_BODY: usize = 16 * 1024 * 1024;

/// Base URLs of the three NBA feeds, without trailing slashes.
#[derive(Clone, Debug)]
pub struct Endpoints {
    pub stats: String,
    pub live: String,
    pub static_data: String,
}

#[derive(Clone)]
pub struct NbaClient {
    http: reqwest::Client,
    endpoints: Endpoints,
    max_body: usize,
}

impl NbaClient {
    pub fn new(endpoints: Endpoints, timeout: Duration) -> Result<Self, FetchError> {
        Self::with_body_limit(endpoints, timeout, MAX_BODY)
    }

    /// Like [`NbaClient::new`] with a custom response body cap in bytes.
    pub(crate) fn with_body_limit(
        endpoints: Endpoints,
        timeout: Duration,
        max_body: usize,
    ) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
        headers.insert(REFERER, HeaderValue::from_static("https://www.nba.com/"));
        headers.insert(ORIGIN, HeaderValue::from_static("https://www.nba.com"));

        let http = reqwest::ClientBuilder::new()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .use_rustls_tls()
            .build()?;
        Ok(Self {
            http,
            endpoints,
            max_body,
        })
    }

    /// `GET {stats}/{endpoint}?query`
    pub async fn stats(&self, endpoint: &str, query: &[(&str, &str)]) -> Result<Value, FetchError> {
        let url = format!("{}/{endpoint}", self.endpoints.stats);
        self.get_json(url, query).await
    }

    /// `GET {live}/{path}`
    pub async fn live(&self, path: &str) -> Result<Value, FetchError> {
        let url = format!("{}/{path}", self.endpoints.live);
        self.get_json(url, &[]).await
    }

    /// `GET {static}/{path}`
    pub async fn static_data(&self, path: &str) -> Result<Value, FetchError> {
        let url = format!("{}/{path}", self.endpoints.static_data);
        self.get_json(url, &[]).await
    }

    async fn get_json(&self, url: String, query: &[(&str, &str)]) -> Result<Value, FetchError> {
        tracing::debug!(url = %url, ?query, "GET");
        let result = self.fetch(&url, query).await;
        if let Err(e) = &result {
            tracing::error!(url = %url, status = ?e.status(), error = %e, "NBA API request failed");
        }
        result
    }

    async fn fetch(&self, url: &str, query: &[(&str, &str)]) -> Result<Value, FetchError> {
        let mut resp = self.http.get(url).query(query).send().await?;
        let status = resp.status();

        let mut buf = Vec::with_capacity(8192);
        while let Some(chunk) = resp.chunk().await? {
            if buf.len() + chunk.len() > self.max_body {
                return Err(FetchError::TooLarge {
                    limit: self.max_body,
                });
            }
            buf.extend_from_slice(&chunk);
        }

        if !status.is_success() {
            let body = String::from_utf8_lossy(&buf);
            return Err(FetchError::Status {
                status: status.as_u16(),
                message: format_api_error(status.as_u16(), &body),
            });
        }
        Ok(serde_json::from_slice(&buf)?)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn mock_endpoints(server: &MockServer) -> Endpoints {
        Endpoints {
            stats: server.url("/stats"),
            live: server.url("/live"),
            static_data: server.url("/static"),
        }
    }

    pub(crate) fn mock_client(server: &MockServer) -> NbaClient {
        NbaClient::new(mock_endpoints(server), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn stats_request_sends_query_and_headers() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/stats/commonplayerinfo")
                    .query_param("PlayerID", "2544")
                    .header("referer", "https://www.nba.com/")
                    .header("origin", "https://www.nba.com");
                then.status(200).json_body(json!({"resultSets": []}));
            })
            .await;

        let client = mock_client(&server);
        let data = client
            .stats("commonplayerinfo", &[("PlayerID", "2544")])
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(data, json!({"resultSets": []}));
    }

    #[tokio::test]
    async fn live_and_static_paths() {
        let server = MockServer::start_async().await;
        let live = server
            .mock_async(|when, then| {
                when.method(GET).path("/live/scoreboard/todaysScoreboard_00.json");
                then.status(200).json_body(json!({"scoreboard": {}}));
            })
            .await;
        let schedule = server
            .mock_async(|when, then| {
                when.method(GET).path("/static/scheduleLeagueV2.json");
                then.status(200).json_body(json!({"leagueSchedule": {}}));
            })
            .await;

        let client = mock_client(&server);
        client.live("scoreboard/todaysScoreboard_00.json").await.unwrap();
        client.static_data("scheduleLeagueV2.json").await.unwrap();

        live.assert_async().await;
        schedule.assert_async().await;
    }

    #[tokio::test]
    async fn http_error_status_is_reported() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/stats/leaguestandingsv3");
                then.status(500).body("upstream exploded");
            })
            .await;

        let err = mock_client(&server)
            .stats("leaguestandingsv3", &[])
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(500));
        assert_eq!(err.to_string(), "[500] upstream exploded");
    }

    #[tokio::test]
    async fn oversized_body_is_rejected() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/static/scheduleLeagueV2.json");
                then.status(200).body("x".repeat(4096));
            })
            .await;

        let client =
            NbaClient::with_body_limit(mock_endpoints(&server), Duration::from_secs(5), 1024)
                .unwrap();
        let err = client
            .static_data("scheduleLeagueV2.json")
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::TooLarge { limit: 1024 }));
        assert_eq!(err.status(), None);
    }

    #[tokio::test]
    async fn invalid_json_is_a_decode_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/live/boxscore/boxscore_1.json");
                then.status(200).body("<html>not json</html>");
            })
            .await;

        let err = mock_client(&server)
            .live("boxscore/boxscore_1.json")
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::Decode(_)));
        assert_eq!(err.status(), None);
    }
}
