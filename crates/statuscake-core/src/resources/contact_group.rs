//! `statuscake_contact_group`
//!
//! A named set of people and integrations to notify when an uptime test
//! changes state.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{differs_str, non_empty_list, non_empty_str, validate_required, validate_url};
use crate::api::{ContactGroupData, CreateContactGroupRequest, UpdateContactGroupRequest};
use crate::diagnostics::Diagnostics;
use crate::error::Result;
use crate::schema::Attribute;
use crate::traits::{Resource, ResourceField, StatusCakeApi};

/// Contact group record (desired configuration and last known state)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactGroup {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub name: String,

    #[serde(default)]
    pub ping_url: Option<String>,

    #[serde(default)]
    pub email_addresses: Vec<String>,

    #[serde(default)]
    pub mobile_numbers: Vec<String>,

    #[serde(default)]
    pub integrations: Vec<String>,
}

impl ContactGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub(crate) fn create_request(&self) -> CreateContactGroupRequest {
        let mut req = CreateContactGroupRequest::new(&self.name);
        if let Some(ping_url) = non_empty_str(&self.ping_url) {
            req = req.ping_url(ping_url);
        }
        if let Some(emails) = non_empty_list(&self.email_addresses) {
            req = req.email_addresses(emails);
        }
        if let Some(numbers) = non_empty_list(&self.mobile_numbers) {
            req = req.mobile_numbers(numbers);
        }
        if let Some(integrations) = non_empty_list(&self.integrations) {
            req = req.integrations(integrations);
        }
        req
    }

    pub(crate) fn update_request(&self, changes: &[ContactGroupField]) -> UpdateContactGroupRequest {
        let mut req = UpdateContactGroupRequest::new();
        for field in changes {
            req = match field {
                ContactGroupField::Name => req.name(&self.name),
                ContactGroupField::PingUrl => req.ping_url(self.ping_url.clone().unwrap_or_default()),
                ContactGroupField::EmailAddresses => req.email_addresses(self.email_addresses.clone()),
                ContactGroupField::MobileNumbers => req.mobile_numbers(self.mobile_numbers.clone()),
                ContactGroupField::Integrations => req.integrations(self.integrations.clone()),
            };
        }
        req
    }
}

impl From<ContactGroupData> for ContactGroup {
    fn from(data: ContactGroupData) -> Self {
        Self {
            id: Some(data.id),
            name: data.name,
            ping_url: data.ping_url,
            email_addresses: data.email_addresses,
            mobile_numbers: data.mobile_numbers,
            integrations: data.integrations,
        }
    }
}

/// Attributes of a contact group
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ContactGroupField {
    Name,
    PingUrl,
    EmailAddresses,
    MobileNumbers,
    Integrations,
}

impl ResourceField for ContactGroupField {
    const ALL: &'static [Self] = &[
        ContactGroupField::Name,
        ContactGroupField::PingUrl,
        ContactGroupField::EmailAddresses,
        ContactGroupField::MobileNumbers,
        ContactGroupField::Integrations,
    ];

    fn attribute(&self) -> Attribute {
        match self {
            ContactGroupField::Name => {
                Attribute::required_string("name", "Name of the contact group")
            }
            ContactGroupField::PingUrl => Attribute::optional_string(
                "ping_url",
                "URL or IP address of an endpoint to push uptime events. Currently this only supports HTTP GET endpoints",
            )
            .url(),
            ContactGroupField::EmailAddresses => {
                Attribute::string_list("email_addresses", "List of email addresses")
            }
            ContactGroupField::MobileNumbers => Attribute::string_list(
                "mobile_numbers",
                "List of international format mobile phone numbers",
            ),
            ContactGroupField::Integrations => {
                Attribute::string_list("integrations", "List of integration IDs")
            }
        }
    }
}

#[async_trait]
impl Resource for ContactGroup {
    type Field = ContactGroupField;

    const TYPE_NAME: &'static str = "statuscake_contact_group";
    const DISPLAY_NAME: &'static str = "Contact group";
    const DESCRIPTION: &'static str = "Manages a StatusCake contact group";

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn set_id(&mut self, id: Option<String>) {
        self.id = id;
    }

    fn validate(&self) -> Diagnostics {
        let mut diags = Diagnostics::new();
        validate_required(&mut diags, "name", &self.name);
        validate_url(&mut diags, "ping_url", &self.ping_url);
        diags
    }

    fn field_differs(&self, other: &Self, field: ContactGroupField) -> bool {
        match field {
            ContactGroupField::Name => self.name != other.name,
            ContactGroupField::PingUrl => differs_str(&self.ping_url, &other.ping_url),
            ContactGroupField::EmailAddresses => self.email_addresses != other.email_addresses,
            ContactGroupField::MobileNumbers => self.mobile_numbers != other.mobile_numbers,
            ContactGroupField::Integrations => self.integrations != other.integrations,
        }
    }

    async fn create_remote(&self, api: &dyn StatusCakeApi) -> Result<String> {
        api.create_contact_group(&self.create_request()).await
    }

    async fn fetch(api: &dyn StatusCakeApi, id: &str) -> Result<Self> {
        api.get_contact_group(id).await.map(Self::from)
    }

    async fn update_remote(
        &self,
        api: &dyn StatusCakeApi,
        id: &str,
        changes: &[ContactGroupField],
    ) -> Result<()> {
        api.update_contact_group(id, &self.update_request(changes)).await
    }

    async fn delete_remote(api: &dyn StatusCakeApi, id: &str) -> Result<()> {
        api.delete_contact_group(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconciler::ChangeSet;

    #[test]
    fn test_create_request_includes_only_set_fields() {
        let mut group = ContactGroup::new("Operations");
        group.ping_url = Some(String::new());
        group.mobile_numbers = vec!["+447700900000".into()];

        let req = group.create_request();
        assert_eq!(req.name, "Operations");
        assert_eq!(req.ping_url, None);
        assert_eq!(req.email_addresses, None);
        assert_eq!(req.mobile_numbers, Some(vec!["+447700900000".to_string()]));
        assert_eq!(req.integrations, None);
    }

    #[test]
    fn test_update_request_contains_exactly_changed_fields() {
        let prior = ContactGroup {
            id: Some("1".into()),
            name: "Operations".into(),
            ping_url: Some("https://hooks.example.com/ping".into()),
            email_addresses: vec!["ops@example.com".into()],
            ..ContactGroup::default()
        };
        let mut desired = prior.clone();
        desired.ping_url = None;
        desired.email_addresses.push("oncall@example.com".into());

        let changes = ChangeSet::between(&prior, &desired);
        assert_eq!(
            changes.fields(),
            vec![ContactGroupField::PingUrl, ContactGroupField::EmailAddresses]
        );

        let req = desired.update_request(&changes.fields());
        assert_eq!(
            req,
            UpdateContactGroupRequest::new()
                .ping_url("")
                .email_addresses(vec!["ops@example.com".into(), "oncall@example.com".into()])
        );
    }

    #[test]
    fn test_empty_ping_url_is_not_drift() {
        let prior = ContactGroup {
            ping_url: None,
            ..ContactGroup::new("Ops")
        };
        let desired = ContactGroup {
            ping_url: Some(String::new()),
            ..ContactGroup::new("Ops")
        };
        assert!(ChangeSet::between(&prior, &desired).is_empty());
    }

    #[test]
    fn test_validate_rejects_bad_ping_url_and_empty_name() {
        let group = ContactGroup {
            ping_url: Some("not a url".into()),
            ..ContactGroup::new("")
        };

        let diags = group.validate();
        assert_eq!(diags.len(), 2);
        assert!(diags.has_errors());
        let attrs: Vec<_> = diags.iter().filter_map(|d| d.attribute.as_deref()).collect();
        assert_eq!(attrs, vec!["name", "ping_url"]);
    }

    #[test]
    fn test_no_contact_group_field_is_immutable() {
        assert!(ContactGroupField::ALL.iter().all(|f| !f.is_immutable()));
        assert_eq!(ContactGroup::schema().attributes.len(), ContactGroupField::ALL.len() + 1);
    }
}
