// # StatusCake API Client
//
// This crate provides the HTTP implementation of `StatusCakeApi` against the
// StatusCake v1 REST API.
//
// ## Behaviour
//
// - One HTTP request per trait method
// - Request bodies are `application/x-www-form-urlencoded`
// - Responses are JSON envelopes (`{"data": ...}`)
// - Non-2xx responses become `Error::Api` carrying the status, the message
//   and the field → messages map from the body
// - Connection failures and timeouts become `Error::Http`
// - No retries, backoff or caching; the request timeout is the only policy
//
// ## Security Requirements
//
// - API key NEVER appears in logs or `Debug` output
// - Form parameter values are never logged (they may carry `basic_password`)
// - Client construction fails fast if the key is missing
//
// ## API Reference
//
// - StatusCake API v1: https://developers.statuscake.com/api/
// - Contact groups: `/contact-groups`, `/contact-groups/{id}`
// - Uptime tests: `/uptime`, `/uptime/{id}`

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use statuscake_core::api::{
    ApiResponse, ContactGroupData, CreateContactGroupRequest, CreateUptimeTestRequest, FormEncode,
    FormParams, NewId, Page, UpdateContactGroupRequest, UpdateUptimeTestRequest, UptimeTestData,
    UptimeTestOverview,
};
use statuscake_core::config::ProviderConfig;
use statuscake_core::traits::{ApiClientFactory, StatusCakeApi};
use statuscake_core::{ApiError, Error, ResourceRegistry, Result};
use std::time::Duration;

/// Name under which the HTTP client registers itself
pub const CLIENT_NAME: &str = "http";

/// User agent sent with every request
const USER_AGENT: &str = concat!("statuscake-provider/", env!("CARGO_PKG_VERSION"));

/// HTTP client for the StatusCake v1 API
///
/// Holds no state beyond the connection pool; it is safe to share one client
/// across concurrently reconciled resources.
pub struct StatusCakeClient {
    /// StatusCake API key
    /// ⚠️ NEVER log this value
    api_key: String,

    /// Base URL without trailing slash
    base_url: String,

    /// HTTP client for API requests
    client: reqwest::Client,
}

// Custom Debug implementation that hides the API key
impl std::fmt::Debug for StatusCakeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatusCakeClient")
            .field("api_key", &"<REDACTED>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl StatusCakeClient {
    /// Create a client from validated provider configuration
    ///
    /// # Errors
    ///
    /// - `Error::Config("Missing api_key")` when no key is configured
    /// - `Error::Config` for an unusable URL or timeout
    /// - `Error::Http` if the HTTP client cannot be built
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        config.validate()?;
        let api_key = config.api_key()?.to_string();

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| Error::http(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            api_key,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build the URL for a resource path
    ///
    /// Each segment is percent-encoded on its own, so an identifier can never
    /// add path segments or a query string.
    fn url(&self, path: &ApiPath<'_>) -> Result<Url> {
        if let Some(id) = path.id {
            if id.is_empty() || id == "." || id == ".." {
                return Err(Error::invalid_input(format!("Invalid resource id: {:?}", id)));
            }
        }

        let mut url = Url::parse(&self.base_url)
            .map_err(|e| Error::config(format!("Invalid api_url: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| Error::config("Invalid api_url: cannot hold a path"))?
            .pop_if_empty()
            .push(path.collection)
            .extend(path.id);
        Ok(url)
    }

    fn request(&self, method: Method, path: &ApiPath<'_>) -> Result<RequestBuilder> {
        Ok(self
            .client
            .request(method, self.url(path)?)
            .bearer_auth(&self.api_key)
            .header("Accept", "application/json"))
    }

    fn form_request(&self, method: Method, path: &ApiPath<'_>, params: &FormParams) -> Result<RequestBuilder> {
        tracing::debug!(
            "{} {} with parameters {:?}",
            method,
            path,
            params.iter().map(|(name, _)| *name).collect::<Vec<_>>()
        );
        Ok(self.request(method, path)?.form(params))
    }

    /// Send a request and turn non-2xx responses into `Error::Api`
    async fn send(&self, builder: RequestBuilder, path: &ApiPath<'_>) -> Result<Response> {
        let response = builder
            .send()
            .await
            .map_err(|e| Error::http(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        tracing::debug!(status = status.as_u16(), "StatusCake response for {}", path);

        if status.is_success() {
            return Ok(response);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read error response".to_string());

        Err(api_error(status, &body).into())
    }

    async fn json<T: DeserializeOwned>(response: Response) -> Result<T> {
        let body = response
            .bytes()
            .await
            .map_err(|e| Error::http(format!("Failed to read response: {}", e)))?;

        serde_json::from_slice(&body).map_err(Error::from)
    }

    async fn create(&self, path: &ApiPath<'_>, params: FormParams) -> Result<String> {
        let builder = self.form_request(Method::POST, path, &params)?;
        let response = self.send(builder, path).await?;
        let created: ApiResponse<NewId> = Self::json(response).await?;

        tracing::info!("Created {} (id: {})", path, created.data.new_id);
        Ok(created.data.new_id)
    }

    async fn get<T: DeserializeOwned>(&self, path: &ApiPath<'_>) -> Result<T> {
        let builder = self.request(Method::GET, path)?;
        let response = self.send(builder, path).await?;
        let body: ApiResponse<T> = Self::json(response).await?;
        Ok(body.data)
    }

    async fn update(&self, path: &ApiPath<'_>, params: FormParams) -> Result<()> {
        let builder = self.form_request(Method::PUT, path, &params)?;
        self.send(builder, path).await?;
        Ok(())
    }

    async fn delete(&self, path: &ApiPath<'_>) -> Result<()> {
        let builder = self.request(Method::DELETE, path)?;
        self.send(builder, path).await?;
        Ok(())
    }

    async fn list<T: DeserializeOwned>(&self, path: &ApiPath<'_>, page: u32) -> Result<Page<T>> {
        let builder = self.request(Method::GET, path)?.query(&[("page", page)]);
        let response = self.send(builder, path).await?;
        Self::json(response).await
    }
}

/// Parse an error response body
///
/// The API answers failures with `{"message": "...", "errors": {"field":
/// ["..."]}}`. Bodies that are not in that shape keep their raw text as the
/// message.
fn api_error(status: StatusCode, body: &str) -> ApiError {
    let mut error = match serde_json::from_str::<ApiError>(body) {
        Ok(error) => error,
        Err(_) => {
            let message = if body.trim().is_empty() {
                status.canonical_reason().unwrap_or_default().to_string()
            } else {
                body.trim().to_string()
            };
            ApiError::new(status.as_u16(), message)
        }
    };
    error.status = status.as_u16();
    error
}

const CONTACT_GROUPS: &str = "contact-groups";
const UPTIME: &str = "uptime";

/// A collection endpoint, optionally narrowed to one resource
#[derive(Debug, Clone, Copy)]
struct ApiPath<'a> {
    collection: &'static str,
    id: Option<&'a str>,
}

impl<'a> ApiPath<'a> {
    fn collection(collection: &'static str) -> Self {
        Self { collection, id: None }
    }

    fn resource(collection: &'static str, id: &'a str) -> Self {
        Self {
            collection,
            id: Some(id),
        }
    }
}

impl std::fmt::Display for ApiPath<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.id {
            Some(id) => write!(f, "{}/{}", self.collection, id),
            None => f.write_str(self.collection),
        }
    }
}

#[async_trait]
impl StatusCakeApi for StatusCakeClient {
    async fn create_contact_group(&self, request: &CreateContactGroupRequest) -> Result<String> {
        self.create(&ApiPath::collection(CONTACT_GROUPS), request.form_params()).await
    }

    async fn get_contact_group(&self, id: &str) -> Result<ContactGroupData> {
        self.get(&ApiPath::resource(CONTACT_GROUPS, id)).await
    }

    async fn update_contact_group(&self, id: &str, request: &UpdateContactGroupRequest) -> Result<()> {
        self.update(&ApiPath::resource(CONTACT_GROUPS, id), request.form_params()).await
    }

    async fn delete_contact_group(&self, id: &str) -> Result<()> {
        self.delete(&ApiPath::resource(CONTACT_GROUPS, id)).await
    }

    async fn list_contact_groups(&self, page: u32) -> Result<Page<ContactGroupData>> {
        self.list(&ApiPath::collection(CONTACT_GROUPS), page).await
    }

    async fn create_uptime_test(&self, request: &CreateUptimeTestRequest) -> Result<String> {
        self.create(&ApiPath::collection(UPTIME), request.form_params()).await
    }

    async fn get_uptime_test(&self, id: &str) -> Result<UptimeTestData> {
        self.get(&ApiPath::resource(UPTIME, id)).await
    }

    async fn update_uptime_test(&self, id: &str, request: &UpdateUptimeTestRequest) -> Result<()> {
        self.update(&ApiPath::resource(UPTIME, id), request.form_params()).await
    }

    async fn delete_uptime_test(&self, id: &str) -> Result<()> {
        self.delete(&ApiPath::resource(UPTIME, id)).await
    }

    async fn list_uptime_tests(&self, page: u32) -> Result<Page<UptimeTestOverview>> {
        self.list(&ApiPath::collection(UPTIME), page).await
    }
}

/// Factory for creating StatusCake HTTP clients
pub struct StatusCakeClientFactory;

impl ApiClientFactory for StatusCakeClientFactory {
    fn create(&self, config: &ProviderConfig) -> Result<Box<dyn StatusCakeApi>> {
        Ok(Box::new(StatusCakeClient::new(config)?))
    }
}

/// Register the HTTP client with a registry
///
/// # Example
///
/// ```rust
/// use statuscake_core::ResourceRegistry;
///
/// let registry = ResourceRegistry::with_builtin_resources();
/// statuscake_client::register(&registry);
/// assert!(registry.has_client(statuscake_client::CLIENT_NAME));
/// ```
pub fn register(registry: &ResourceRegistry) {
    registry.register_client(CLIENT_NAME, Box::new(StatusCakeClientFactory));
}
