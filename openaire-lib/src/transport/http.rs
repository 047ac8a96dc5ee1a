//! reqwest-backed transport for the OpenAIRE Graph API.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::header::ACCEPT;
use reqwest::header::AUTHORIZATION;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use crate::api::query::PageResult;
use crate::api::query::QuerySpec;
use crate::api::query::Record;
use crate::auth::TokenProvider;
use crate::error::Error;
use crate::error::TransportError;

use super::Transport;

/// Sends queries to the Graph API over HTTP.
///
/// Requests are `GET {base_url}/{entity}` with the spec's wire parameters;
/// a configured [`TokenProvider`] adds an `Authorization: Bearer` header.
/// Connections are pooled by the underlying `reqwest::Client`, so opening and
/// releasing a page sequence only marks its boundaries in the log.
pub struct HttpTransport {
    base_url: Url,
    http_client: Client,
    token_provider: Option<Arc<dyn TokenProvider>>,
    timeout: Option<Duration>,
}

impl HttpTransport {
    /// Creates a transport rooted at `base_url`.
    pub fn new(base_url: &str, http_client: Client) -> Result<Self, Error> {
        let mut base_url = Url::parse(base_url)
            .map_err(|e| Error::Client(format!("invalid base URL '{base_url}': {e}")))?;
        // Url::join drops the last segment unless the path ends in '/'.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self {
            base_url,
            http_client,
            token_provider: None,
            timeout: None,
        })
    }

    /// Sets the provider used to authenticate requests.
    pub fn with_token_provider(mut self, provider: Arc<dyn TokenProvider>) -> Self {
        self.token_provider = Some(provider);
        self
    }

    /// Sets the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint_url(
        &self,
        endpoint: &str,
        params: &[(String, String)],
    ) -> Result<Url, TransportError> {
        let mut url = self
            .base_url
            .join(endpoint.trim_start_matches('/'))
            .map_err(|e| TransportError::permanent(format!("invalid endpoint '{endpoint}': {e}")))?;
        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params);
        }
        Ok(url)
    }

    pub(crate) fn page_url(&self, spec: &QuerySpec) -> Result<Url, TransportError> {
        self.endpoint_url(spec.entity().path(), &spec.to_params())
    }

    async fn get(&self, url: Url) -> Result<String, TransportError> {
        let mut request = self
            .http_client
            .get(url.clone())
            .header(ACCEPT, "application/json");

        if let Some(provider) = &self.token_provider {
            let token = provider.get_token().await?;
            request = request.header(AUTHORIZATION, token.as_bearer());
        }

        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        debug!("GET {url}");
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = match body.trim() {
                "" => status.canonical_reason().unwrap_or("request failed").to_string(),
                text => text.to_string(),
            };
            return Err(TransportError::from_status(status.as_u16(), message));
        }
        Ok(body)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, spec: &QuerySpec) -> Result<PageResult, TransportError> {
        let url = self.page_url(spec)?;
        let body = self.get(url).await?;
        decode_page(&body)
    }

    async fn get_raw(
        &self,
        endpoint: &str,
        params: &[(String, String)],
    ) -> Result<serde_json::Value, TransportError> {
        let url = self.endpoint_url(endpoint, params)?;
        let body = self.get(url).await?;
        serde_json::from_str(&body).map_err(|e| TransportError::Malformed {
            message: e.to_string(),
            body: Some(body),
        })
    }

    fn open(&self) {
        debug!("Page sequence opened against {}", self.base_url);
    }

    fn release(&self) {
        debug!("Page sequence released against {}", self.base_url);
    }
}

/// Search response envelope.
#[derive(Debug, Deserialize)]
struct SearchResponse {
    header: Option<ResponseHeader>,
    /// The records in this page; `null` or absent once results run out.
    results: Option<Vec<Record>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponseHeader {
    num_found: Option<u64>,
    next_cursor: Option<String>,
}

/// Decodes a search response body into a page.
///
/// An empty result list ends the cursor chain even if the header still
/// carries a cursor.
pub(crate) fn decode_page(body: &str) -> Result<PageResult, TransportError> {
    let response: SearchResponse =
        serde_json::from_str(body).map_err(|e| TransportError::Malformed {
            message: e.to_string(),
            body: Some(body.to_string()),
        })?;

    let header = response.header.ok_or_else(|| TransportError::Malformed {
        message: "response has no header object".to_string(),
        body: Some(body.to_string()),
    })?;

    let items = response.results.unwrap_or_default();
    let total = header.num_found.unwrap_or(items.len() as u64);
    let mut page = PageResult::new(items).with_total_found(total);

    if let Some(cursor) = header.next_cursor.filter(|c| !c.is_empty()) {
        if !page.is_empty() {
            page = page.with_next_cursor(cursor);
        }
    }
    Ok(page)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::query::CursorToken;
    use crate::api::query::EntityType;
    use crate::api::query::Operator;
    use crate::auth::AccessToken;
    use crate::auth::StaticTokenProvider;
    use crate::error::AuthError;
    use crate::error::TransportErrorKind;

    fn transport(base: &str) -> HttpTransport {
        HttpTransport::new(base, Client::new()).unwrap()
    }

    #[test]
    fn test_page_url() {
        let mut spec = QuerySpec::new(EntityType::ResearchProducts);
        spec.filters_mut().add("search", Operator::Eq, "climate change").unwrap();

        let url = transport("https://api.openaire.eu/graph/v1/").page_url(&spec).unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.openaire.eu/graph/v1/researchProducts?pageSize=10&search=climate+change&cursor=*"
        );
    }

    #[test]
    fn test_page_url_with_cursor_and_bare_base() {
        let spec = QuerySpec::new(EntityType::Projects).with_cursor(CursorToken::new("c1"));
        let url = transport("http://localhost:8080/graph/v1").page_url(&spec).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/graph/v1/projects?pageSize=10&cursor=c1");
    }

    #[tokio::test]
    async fn test_expired_token_fails_before_sending() {
        let expired = AccessToken::with_expiry("key", chrono::Utc::now() - chrono::Duration::minutes(1));
        // Port 9 is never contacted; the token check fails first.
        let transport = transport("http://127.0.0.1:9/graph/v1")
            .with_token_provider(Arc::new(StaticTokenProvider::from_token(expired)));

        let err = transport
            .send(&QuerySpec::new(EntityType::Projects))
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::Auth(AuthError::TokenExpired { .. })));
        assert_eq!(err.kind(), TransportErrorKind::Permanent);
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            HttpTransport::new("not a url", Client::new()),
            Err(Error::Client(_))
        ));
    }

    #[test]
    fn test_decode_page() {
        let body = r#"{
            "header": {"numFound": 42, "maxScore": 1.0, "queryTime": 12, "pageSize": 2, "nextCursor": "AoE="},
            "results": [{"id": "a"}, {"id": "b"}]
        }"#;
        let page = decode_page(body).unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(page.total_found(), 42);
        assert_eq!(page.next_cursor().map(CursorToken::as_str), Some("AoE="));
        assert_eq!(page.items()[1]["id"], "b");
    }

    #[test]
    fn test_decode_last_page() {
        let page = decode_page(r#"{"header": {"numFound": 1}, "results": [{"id": "a"}]}"#).unwrap();
        assert!(!page.has_more());
    }

    #[test]
    fn test_empty_results_end_chain() {
        let page = decode_page(r#"{"header": {"numFound": 0, "nextCursor": "x"}, "results": null}"#)
            .unwrap();
        assert!(page.is_empty());
        assert!(!page.has_more());
    }

    #[test]
    fn test_decode_malformed() {
        let err = decode_page("<html>").unwrap_err();
        assert_eq!(err.kind(), TransportErrorKind::Malformed);

        let err = decode_page(r#"{"results": []}"#).unwrap_err();
        assert_eq!(err.kind(), TransportErrorKind::Malformed);
    }
}
