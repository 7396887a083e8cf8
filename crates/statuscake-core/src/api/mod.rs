//! StatusCake v1 API models
//!
//! Request builders and response payloads for the two resource families the
//! provider manages. Requests are sent form-encoded; list fields travel as a
//! single comma-separated `<field>_csv` parameter so that an empty list can
//! be expressed. Responses are JSON envelopes of the form `{"data": ...}`.

pub mod contact_group;

pub use contact_group::{ContactGroupData, CreateContactGroupRequest, UpdateContactGroupRequest};
pub use uptime_test::{
    CheckRate, CreateUptimeTestRequest, UpdateUptimeTestRequest, UptimeTestData,
    UptimeTestOverview, UptimeTestType,
};

use serde::{Deserialize, Deserializer, Serialize};

/// Form parameters of a request, in the order they were added
pub type FormParams = Vec<(&'static str, String)>;

/// A request that is sent as `application/x-www-form-urlencoded`
pub trait FormEncode {
    /// Encode the fields present on this request
    fn form_params(&self) -> FormParams;
}

/// Standard `{"data": ...}` response envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub data: T,
}

/// Payload returned by every create endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewId {
    pub new_id: String,
}

/// Pagination metadata of list responses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMetadata {
    #[serde(default = "first_page")]
    pub page: u32,
    #[serde(default)]
    pub per_page: u32,
    #[serde(default = "first_page")]
    pub page_count: u32,
    #[serde(default)]
    pub total_count: u32,
}

fn first_page() -> u32 {
    1
}

/// One page of a list response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Page<T> {
    #[serde(default = "Vec::new", deserialize_with = "null_as_default")]
    pub data: Vec<T>,
    pub metadata: PageMetadata,
}

impl<T> Page<T> {
    /// Whether another page follows `requested`
    ///
    /// Only `page_count` is trusted; the echoed `page` may be missing.
    pub fn has_after(&self, requested: u32) -> bool {
        requested < self.metadata.page_count
    }
}

/// Deserialize `null` as the type's default value
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Deserialize a string, mapping `null` and `""` to `None`
pub(crate) fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.filter(|s| !s.is_empty()))
}

pub(crate) fn push_str(params: &mut FormParams, key: &'static str, value: &Option<String>) {
    if let Some(value) = value {
        params.push((key, value.clone()));
    }
}

pub(crate) fn push_csv(params: &mut FormParams, key: &'static str, value: &Option<Vec<String>>) {
    if let Some(values) = value {
        params.push((key, values.join(",")));
    }
}

pub(crate) fn push_display<T: ToString>(params: &mut FormParams, key: &'static str, value: &Option<T>) {
    if let Some(value) = value {
        params.push((key, value.to_string()));
    }
}
