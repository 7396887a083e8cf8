//! Contact group endpoints: `/contact-groups`

use serde::{Deserialize, Serialize};

use super::{empty_as_none, null_as_default, push_csv, push_str, FormEncode, FormParams};

/// Contact group as returned by `GET /contact-groups/{id}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactGroupData {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub ping_url: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email_addresses: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub mobile_numbers: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub integrations: Vec<String>,
}

/// `POST /contact-groups`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateContactGroupRequest {
    pub name: String,
    pub ping_url: Option<String>,
    pub email_addresses: Option<Vec<String>>,
    pub mobile_numbers: Option<Vec<String>>,
    pub integrations: Option<Vec<String>>,
}

impl CreateContactGroupRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn ping_url(mut self, ping_url: impl Into<String>) -> Self {
        self.ping_url = Some(ping_url.into());
        self
    }

    pub fn email_addresses(mut self, email_addresses: Vec<String>) -> Self {
        self.email_addresses = Some(email_addresses);
        self
    }

    pub fn mobile_numbers(mut self, mobile_numbers: Vec<String>) -> Self {
        self.mobile_numbers = Some(mobile_numbers);
        self
    }

    pub fn integrations(mut self, integrations: Vec<String>) -> Self {
        self.integrations = Some(integrations);
        self
    }
}

impl FormEncode for CreateContactGroupRequest {
    fn form_params(&self) -> FormParams {
        let mut params = vec![("name", self.name.clone())];
        push_str(&mut params, "ping_url", &self.ping_url);
        push_csv(&mut params, "email_addresses_csv", &self.email_addresses);
        push_csv(&mut params, "mobile_numbers_csv", &self.mobile_numbers);
        push_csv(&mut params, "integrations_csv", &self.integrations);
        params
    }
}

/// `PUT /contact-groups/{id}`
///
/// Only the fields that are `Some` are sent; everything else is left as the
/// remote has it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateContactGroupRequest {
    pub name: Option<String>,
    pub ping_url: Option<String>,
    pub email_addresses: Option<Vec<String>>,
    pub mobile_numbers: Option<Vec<String>>,
    pub integrations: Option<Vec<String>>,
}

impl UpdateContactGroupRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn ping_url(mut self, ping_url: impl Into<String>) -> Self {
        self.ping_url = Some(ping_url.into());
        self
    }

    pub fn email_addresses(mut self, email_addresses: Vec<String>) -> Self {
        self.email_addresses = Some(email_addresses);
        self
    }

    pub fn mobile_numbers(mut self, mobile_numbers: Vec<String>) -> Self {
        self.mobile_numbers = Some(mobile_numbers);
        self
    }

    pub fn integrations(mut self, integrations: Vec<String>) -> Self {
        self.integrations = Some(integrations);
        self
    }
}

impl FormEncode for UpdateContactGroupRequest {
    fn form_params(&self) -> FormParams {
        let mut params = FormParams::new();
        push_str(&mut params, "name", &self.name);
        push_str(&mut params, "ping_url", &self.ping_url);
        push_csv(&mut params, "email_addresses_csv", &self.email_addresses);
        push_csv(&mut params, "mobile_numbers_csv", &self.mobile_numbers);
        push_csv(&mut params, "integrations_csv", &self.integrations);
        params
    }
}
