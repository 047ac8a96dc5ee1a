//! Main OpenAireClient

use std::sync::Arc;
use std::time::Duration;

use log::debug;
use reqwest::Client;

use crate::api::query::DataSourcesQuery;
use crate::api::query::EntityKind;
use crate::api::query::OrganizationsQuery;
use crate::api::query::ProjectsQuery;
use crate::api::query::QueryBuilder;
use crate::api::query::ResearchProductsQuery;
use crate::auth::StaticTokenProvider;
use crate::auth::TokenProvider;
use crate::error::Error;
use crate::retry::RetryConfig;
use crate::transport::HttpTransport;
use crate::transport::Transport;

/// Public Graph API v1 endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.openaire.eu/graph/v1/";

/// The main client for searching the OpenAIRE Graph.
///
/// This client is cheap to clone (uses `Arc` internally) and can be shared
/// across tasks. Every query built from it shares its transport and retry
/// policy.
///
/// # Example
///
/// ```ignore
/// use openaire_lib::OpenAireClient;
///
/// let client = OpenAireClient::builder()
///     .api_key(std::env::var("OPENAIRE_API_KEY")?)
///     .build()?;
///
/// let first = client.research_products().search("climate change")?.execute().await?;
/// ```
#[derive(Clone)]
pub struct OpenAireClient {
    inner: Arc<OpenAireClientInner>,
}

struct OpenAireClientInner {
    transport: Arc<dyn Transport>,
    retry: RetryConfig,
}

impl OpenAireClient {
    /// Creates a new builder for constructing a client.
    pub fn builder() -> OpenAireClientBuilder {
        OpenAireClientBuilder::new()
    }

    /// Creates an anonymous client against the public endpoint.
    pub fn new() -> Result<Self, Error> {
        Self::builder().build()
    }

    /// Starts a query on any entity collection.
    pub fn query<E: EntityKind>(&self) -> QueryBuilder<E> {
        QueryBuilder::new(self.clone())
    }

    pub fn research_products(&self) -> ResearchProductsQuery {
        self.query()
    }

    pub fn organizations(&self) -> OrganizationsQuery {
        self.query()
    }

    pub fn data_sources(&self) -> DataSourcesQuery {
        self.query()
    }

    pub fn projects(&self) -> ProjectsQuery {
        self.query()
    }

    /// Issues a GET against an arbitrary endpoint relative to the base URL
    /// and returns the decoded JSON body.
    ///
    /// No validation, pagination or retry is applied.
    pub async fn raw_query(
        &self,
        endpoint: &str,
        params: &[(String, String)],
    ) -> Result<serde_json::Value, Error> {
        debug!("Raw query on {endpoint} with {} parameter(s)", params.len());
        self.inner
            .transport
            .get_raw(endpoint, params)
            .await
            .map_err(|source| Error::RawQuery {
                endpoint: endpoint.to_string(),
                source,
            })
    }

    /// Returns the retry policy applied to page fetches.
    pub fn retry_config(&self) -> &RetryConfig {
        &self.inner.retry
    }

    pub(crate) fn transport(&self) -> Arc<dyn Transport> {
        self.inner.transport.clone()
    }
}

// =============================================================================
// Builder
// =============================================================================

/// Builder for constructing an [`OpenAireClient`].
///
/// Everything is optional: without credentials the client runs anonymous
/// requests against [`DEFAULT_BASE_URL`].
///
/// # Example
///
/// ```ignore
/// let client = OpenAireClient::builder()
///     .api_key("my-token")
///     .timeout(Duration::from_secs(30))
///     .retry(RetryConfig::default().max_attempts(6))
///     .build()?;
/// ```
pub struct OpenAireClientBuilder {
    base_url: String,
    token_provider: Option<Arc<dyn TokenProvider>>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    http_client: Option<Client>,
    retry: RetryConfig,
    transport: Option<Arc<dyn Transport>>,
}

impl OpenAireClientBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            token_provider: None,
            timeout: None,
            connect_timeout: None,
            http_client: None,
            retry: RetryConfig::default(),
            transport: None,
        }
    }

    /// Authenticates with a static API key sent as a bearer token.
    pub fn api_key(self, api_key: impl Into<String>) -> Self {
        self.token_provider(StaticTokenProvider::new(api_key))
    }

    /// Sets the token provider for authentication.
    pub fn token_provider<T: TokenProvider + 'static>(mut self, provider: T) -> Self {
        self.token_provider = Some(Arc::new(provider));
        self
    }

    /// Sets the API root.
    ///
    /// Defaults to [`DEFAULT_BASE_URL`].
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the connection timeout.
    ///
    /// This is applied when building the HTTP client.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Sets a custom HTTP client.
    ///
    /// If not set, a default client will be created.
    pub fn http_client(mut self, client: Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Sets the retry policy for page fetches.
    pub fn retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Replaces the HTTP transport entirely.
    ///
    /// Base URL, credentials and HTTP settings are ignored when set.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Builds the [`OpenAireClient`].
    pub fn build(self) -> Result<OpenAireClient, Error> {
        let transport = match self.transport {
            Some(transport) => transport,
            None => {
                let http_client = match self.http_client {
                    Some(client) => client,
                    None => {
                        let mut builder = Client::builder();
                        if let Some(timeout) = self.connect_timeout {
                            builder = builder.connect_timeout(timeout);
                        }
                        builder
                            .build()
                            .map_err(|e| Error::Client(format!("failed to build HTTP client: {e}")))?
                    }
                };

                let mut http = HttpTransport::new(&self.base_url, http_client)?;
                if let Some(provider) = self.token_provider {
                    http = http.with_token_provider(provider);
                }
                if let Some(timeout) = self.timeout {
                    http = http.with_timeout(timeout);
                }
                Arc::new(http) as Arc<dyn Transport>
            }
        };

        Ok(OpenAireClient {
            inner: Arc::new(OpenAireClientInner {
                transport,
                retry: self.retry,
            }),
        })
    }
}

impl Default for OpenAireClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
