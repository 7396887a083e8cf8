// # StatusCake API Trait
//
// Defines the remote API the reconcilers consume.
//
// ## Implementations
//
// - HTTP: `statuscake-client` crate
// - Tests: in-memory fakes under `tests/common`
//
// ## Usage
//
// ```rust,ignore
// use statuscake_core::traits::StatusCakeApi;
// use statuscake_core::api::CreateContactGroupRequest;
//
// async fn run(api: &dyn StatusCakeApi) -> statuscake_core::Result<()> {
//     let id = api
//         .create_contact_group(&CreateContactGroupRequest::new("Operations"))
//         .await?;
//     let group = api.get_contact_group(&id).await?;
//     assert_eq!(group.name, "Operations");
//     Ok(())
// }
// ```

use async_trait::async_trait;

use crate::api::{
    ContactGroupData, CreateContactGroupRequest, CreateUptimeTestRequest, Page,
    UpdateContactGroupRequest, UpdateUptimeTestRequest, UptimeTestData, UptimeTestOverview,
};
use crate::config::ProviderConfig;
use crate::error::Result;

/// Remote StatusCake API consumed by the reconcilers
///
/// Every method performs exactly one remote request. Failures carry the
/// remote status and field messages as [`crate::error::ApiError`] wrapped in
/// [`crate::Error::Api`]; transport failures are [`crate::Error::Http`].
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`: the host may reconcile independent
/// resources concurrently against one shared client.
///
/// # Retries
///
/// Implementations must not retry, back off or cache. Each call is a fresh
/// remote request and its outcome is returned as-is.
#[async_trait]
pub trait StatusCakeApi: Send + Sync {
    /// `POST /contact-groups`, returning the newly assigned identifier
    async fn create_contact_group(&self, request: &CreateContactGroupRequest) -> Result<String>;

    /// `GET /contact-groups/{id}`
    async fn get_contact_group(&self, id: &str) -> Result<ContactGroupData>;

    /// `PUT /contact-groups/{id}`
    async fn update_contact_group(&self, id: &str, request: &UpdateContactGroupRequest) -> Result<()>;

    /// `DELETE /contact-groups/{id}`
    async fn delete_contact_group(&self, id: &str) -> Result<()>;

    /// `GET /contact-groups?page={page}`
    async fn list_contact_groups(&self, page: u32) -> Result<Page<ContactGroupData>>;

    /// `POST /uptime`, returning the newly assigned identifier
    async fn create_uptime_test(&self, request: &CreateUptimeTestRequest) -> Result<String>;

    /// `GET /uptime/{id}`
    async fn get_uptime_test(&self, id: &str) -> Result<UptimeTestData>;

    /// `PUT /uptime/{id}`
    async fn update_uptime_test(&self, id: &str, request: &UpdateUptimeTestRequest) -> Result<()>;

    /// `DELETE /uptime/{id}`
    async fn delete_uptime_test(&self, id: &str) -> Result<()>;

    /// `GET /uptime?page={page}`
    async fn list_uptime_tests(&self, page: u32) -> Result<Page<UptimeTestOverview>>;
}

/// Helper trait for constructing API clients from provider configuration
pub trait ApiClientFactory: Send + Sync {
    /// Create a client, failing if the configuration is unusable
    fn create(&self, config: &ProviderConfig) -> Result<Box<dyn StatusCakeApi>>;
}

/// Fetch every contact group across all pages
pub async fn list_all_contact_groups(api: &dyn StatusCakeApi) -> Result<Vec<ContactGroupData>> {
    let mut groups = Vec::new();
    let mut page = 1;

    loop {
        let res = api.list_contact_groups(page).await?;
        let has_next = res.has_after(page);
        groups.extend(res.data);

        if !has_next {
            return Ok(groups);
        }
        page += 1;
    }
}

/// Fetch every uptime test across all pages
pub async fn list_all_uptime_tests(api: &dyn StatusCakeApi) -> Result<Vec<UptimeTestOverview>> {
    let mut tests = Vec::new();
    let mut page = 1;

    loop {
        let res = api.list_uptime_tests(page).await?;
        let has_next = res.has_after(page);
        tests.extend(res.data);

        if !has_next {
            return Ok(tests);
        }
        page += 1;
    }
}
