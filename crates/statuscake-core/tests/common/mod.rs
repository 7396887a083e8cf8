//! Test doubles and common utilities for reconciliation contract tests
//!
//! [`FakeStatusCake`] is an in-memory stand-in for the remote API. It keeps
//! resources in maps, records every call with the form parameters that
//! would have been sent, and mimics the few server-side behaviours the
//! reconcilers depend on (remote defaults, 404s, field validation errors).

#![allow(dead_code)]

use async_trait::async_trait;
use statuscake_core::api::{
    ContactGroupData, CreateContactGroupRequest, CreateUptimeTestRequest, FormEncode, FormParams,
    Page, PageMetadata, UpdateContactGroupRequest, UpdateUptimeTestRequest, UptimeTestData,
    UptimeTestOverview,
};
use statuscake_core::error::{ApiError, Error, Result};
use statuscake_core::traits::StatusCakeApi;
use std::collections::BTreeMap;
use std::sync::Mutex;

/// Status codes the remote alerts on when a test is created without any
pub const REMOTE_DEFAULT_STATUS_CODES: [&str; 3] = ["500", "502", "503"];

/// One recorded API call
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CreateContactGroup(FormParams),
    GetContactGroup(String),
    UpdateContactGroup(String, FormParams),
    DeleteContactGroup(String),
    ListContactGroups(u32),
    CreateUptimeTest(FormParams),
    GetUptimeTest(String),
    UpdateUptimeTest(String, FormParams),
    DeleteUptimeTest(String),
    ListUptimeTests(u32),
}

impl Call {
    pub fn is_update(&self) -> bool {
        matches!(self, Call::UpdateContactGroup(..) | Call::UpdateUptimeTest(..))
    }

    pub fn is_get(&self) -> bool {
        matches!(self, Call::GetContactGroup(_) | Call::GetUptimeTest(_))
    }
}

#[derive(Default)]
struct FakeState {
    next_id: u64,
    contact_groups: BTreeMap<String, ContactGroupData>,
    uptime_tests: BTreeMap<String, UptimeTestData>,
    calls: Vec<Call>,
    fail_with: Option<ApiError>,
    transport_down: bool,
}

/// In-memory StatusCake API
pub struct FakeStatusCake {
    state: Mutex<FakeState>,
    per_page: u32,
    echo_page: bool,
}

impl Default for FakeStatusCake {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeStatusCake {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(FakeState {
                next_id: 1000,
                ..FakeState::default()
            }),
            per_page: 25,
            echo_page: true,
        }
    }

    /// Fake that paginates listings with `per_page` items per page
    pub fn with_page_size(per_page: u32) -> Self {
        Self {
            per_page,
            ..Self::new()
        }
    }

    /// Fake whose list metadata leaves out the current page number
    pub fn without_page_echo(per_page: u32) -> Self {
        Self {
            echo_page: false,
            ..Self::with_page_size(per_page)
        }
    }

    /// Every call made so far
    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    /// Number of update requests made so far
    pub fn update_count(&self) -> usize {
        self.calls().iter().filter(|c| c.is_update()).count()
    }

    /// Form parameters of the most recent update request
    pub fn last_update_params(&self) -> Option<FormParams> {
        self.calls().into_iter().rev().find_map(|call| match call {
            Call::UpdateContactGroup(_, params) | Call::UpdateUptimeTest(_, params) => Some(params),
            _ => None,
        })
    }

    /// Make the next call fail with this API error
    pub fn fail_next(&self, error: ApiError) {
        self.state.lock().unwrap().fail_with = Some(error);
    }

    /// Make every call fail at the transport level
    pub fn set_transport_down(&self, down: bool) {
        self.state.lock().unwrap().transport_down = down;
    }

    pub fn contact_group(&self, id: &str) -> Option<ContactGroupData> {
        self.state.lock().unwrap().contact_groups.get(id).cloned()
    }

    pub fn uptime_test(&self, id: &str) -> Option<UptimeTestData> {
        self.state.lock().unwrap().uptime_tests.get(id).cloned()
    }

    /// Change a stored uptime test behind the provider's back
    pub fn tamper_uptime_test(&self, id: &str, f: impl FnOnce(&mut UptimeTestData)) {
        if let Some(test) = self.state.lock().unwrap().uptime_tests.get_mut(id) {
            f(test);
        }
    }

    /// Remove a stored resource behind the provider's back
    pub fn forget(&self, id: &str) {
        let mut state = self.state.lock().unwrap();
        state.contact_groups.remove(id);
        state.uptime_tests.remove(id);
    }

    /// Record a call and apply any injected failure
    fn begin(&self, call: Call) -> Result<std::sync::MutexGuard<'_, FakeState>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call);

        if state.transport_down {
            return Err(Error::http("connection refused"));
        }
        if let Some(err) = state.fail_with.take() {
            return Err(err.into());
        }
        Ok(state)
    }

    fn next_id(state: &mut FakeState) -> String {
        state.next_id += 1;
        state.next_id.to_string()
    }

    fn page<T: Clone>(&self, items: Vec<T>, page: u32) -> Page<T> {
        let total = items.len() as u32;
        let page_count = total.div_ceil(self.per_page).max(1);
        let start = ((page.max(1) - 1) * self.per_page) as usize;

        Page {
            data: items
                .into_iter()
                .skip(start)
                .take(self.per_page as usize)
                .collect(),
            metadata: if self.echo_page {
                PageMetadata {
                    page,
                    per_page: self.per_page,
                    page_count,
                    total_count: total,
                }
            } else {
                serde_json::from_value(serde_json::json!({
                    "per_page": self.per_page,
                    "page_count": page_count,
                    "total_count": total,
                }))
                .unwrap()
            },
        }
    }
}

fn not_found() -> Error {
    ApiError::new(404, "No results found").into()
}

fn check_confirmation(confirmation: Option<u32>) -> Result<()> {
    match confirmation {
        Some(n) if n > 3 => Err(ApiError::new(400, "The provided parameters are invalid. Check the errors output for detailed information.")
            .with_field_error("confirmation", "Confirmation must be no more than 3")
            .into()),
        _ => Ok(()),
    }
}

#[async_trait]
impl StatusCakeApi for FakeStatusCake {
    async fn create_contact_group(&self, request: &CreateContactGroupRequest) -> Result<String> {
        let mut state = self.begin(Call::CreateContactGroup(request.form_params()))?;
        let id = Self::next_id(&mut state);

        let group = ContactGroupData {
            id: id.clone(),
            name: request.name.clone(),
            ping_url: request.ping_url.clone(),
            email_addresses: request.email_addresses.clone().unwrap_or_default(),
            mobile_numbers: request.mobile_numbers.clone().unwrap_or_default(),
            integrations: request.integrations.clone().unwrap_or_default(),
        };
        state.contact_groups.insert(id.clone(), group);
        Ok(id)
    }

    async fn get_contact_group(&self, id: &str) -> Result<ContactGroupData> {
        let state = self.begin(Call::GetContactGroup(id.to_string()))?;
        state.contact_groups.get(id).cloned().ok_or_else(not_found)
    }

    async fn update_contact_group(&self, id: &str, request: &UpdateContactGroupRequest) -> Result<()> {
        let mut state = self.begin(Call::UpdateContactGroup(id.to_string(), request.form_params()))?;
        let group = state.contact_groups.get_mut(id).ok_or_else(not_found)?;

        if let Some(name) = &request.name {
            group.name = name.clone();
        }
        if let Some(ping_url) = &request.ping_url {
            group.ping_url = Some(ping_url.clone()).filter(|s| !s.is_empty());
        }
        if let Some(emails) = &request.email_addresses {
            group.email_addresses = emails.clone();
        }
        if let Some(numbers) = &request.mobile_numbers {
            group.mobile_numbers = numbers.clone();
        }
        if let Some(integrations) = &request.integrations {
            group.integrations = integrations.clone();
        }
        Ok(())
    }

    async fn delete_contact_group(&self, id: &str) -> Result<()> {
        let mut state = self.begin(Call::DeleteContactGroup(id.to_string()))?;
        state.contact_groups.remove(id).map(|_| ()).ok_or_else(not_found)
    }

    async fn list_contact_groups(&self, page: u32) -> Result<Page<ContactGroupData>> {
        let state = self.begin(Call::ListContactGroups(page))?;
        let items = state.contact_groups.values().cloned().collect();
        drop(state);
        Ok(self.page(items, page))
    }

    async fn create_uptime_test(&self, request: &CreateUptimeTestRequest) -> Result<String> {
        let mut state = self.begin(Call::CreateUptimeTest(request.form_params()))?;
        check_confirmation(request.confirmation)?;
        let id = Self::next_id(&mut state);

        let test = UptimeTestData {
            id: id.clone(),
            name: request.name.clone(),
            test_type: request.test_type,
            website_url: request.website_url.clone(),
            check_rate: request.check_rate,
            confirmation: request.confirmation.unwrap_or(2),
            contact_groups: request.contact_groups.clone().unwrap_or_default(),
            custom_header: request.custom_header.clone(),
            do_not_find: request.do_not_find.unwrap_or_default(),
            dns_ips: request.dns_ips.clone().unwrap_or_default(),
            dns_server: request.dns_server.clone(),
            enable_ssl_alert: request.enable_ssl_alert.unwrap_or_default(),
            final_endpoint: request.final_endpoint.clone(),
            find_string: request.find_string.clone(),
            follow_redirects: request.follow_redirects.unwrap_or_default(),
            host: request.host.clone(),
            include_header: request.include_header.unwrap_or_default(),
            paused: request.paused.unwrap_or_default(),
            port: request.port.unwrap_or_default(),
            post_body: request.post_body.clone(),
            post_raw: request.post_raw.clone(),
            regions: request.regions.clone().unwrap_or_default(),
            status_codes: request.status_codes.clone().unwrap_or_else(|| {
                REMOTE_DEFAULT_STATUS_CODES.iter().map(|s| s.to_string()).collect()
            }),
            tags: request.tags.clone().unwrap_or_default(),
            timeout: request.timeout.unwrap_or(40),
            trigger_rate: request.trigger_rate.unwrap_or(4),
            use_jar: request.use_jar.unwrap_or_default(),
            user_agent: request.user_agent.clone(),
        };
        state.uptime_tests.insert(id.clone(), test);
        Ok(id)
    }

    async fn get_uptime_test(&self, id: &str) -> Result<UptimeTestData> {
        let state = self.begin(Call::GetUptimeTest(id.to_string()))?;
        state.uptime_tests.get(id).cloned().ok_or_else(not_found)
    }

    async fn update_uptime_test(&self, id: &str, request: &UpdateUptimeTestRequest) -> Result<()> {
        let mut state = self.begin(Call::UpdateUptimeTest(id.to_string(), request.form_params()))?;
        check_confirmation(request.confirmation)?;
        let test = state.uptime_tests.get_mut(id).ok_or_else(not_found)?;

        fn set<T: Clone>(target: &mut T, value: &Option<T>) {
            if let Some(value) = value {
                *target = value.clone();
            }
        }
        fn set_text(target: &mut Option<String>, value: &Option<String>) {
            if let Some(value) = value {
                *target = Some(value.clone()).filter(|s| !s.is_empty());
            }
        }

        set(&mut test.name, &request.name);
        set(&mut test.check_rate, &request.check_rate);
        set(&mut test.confirmation, &request.confirmation);
        set(&mut test.contact_groups, &request.contact_groups);
        set_text(&mut test.custom_header, &request.custom_header);
        set(&mut test.do_not_find, &request.do_not_find);
        set(&mut test.dns_ips, &request.dns_ips);
        set_text(&mut test.dns_server, &request.dns_server);
        set(&mut test.enable_ssl_alert, &request.enable_ssl_alert);
        set_text(&mut test.final_endpoint, &request.final_endpoint);
        set_text(&mut test.find_string, &request.find_string);
        set(&mut test.follow_redirects, &request.follow_redirects);
        set_text(&mut test.host, &request.host);
        set(&mut test.include_header, &request.include_header);
        set(&mut test.paused, &request.paused);
        set(&mut test.port, &request.port);
        set_text(&mut test.post_body, &request.post_body);
        set_text(&mut test.post_raw, &request.post_raw);
        set(&mut test.regions, &request.regions);
        set(&mut test.status_codes, &request.status_codes);
        set(&mut test.tags, &request.tags);
        set(&mut test.timeout, &request.timeout);
        set(&mut test.trigger_rate, &request.trigger_rate);
        set(&mut test.use_jar, &request.use_jar);
        set_text(&mut test.user_agent, &request.user_agent);
        Ok(())
    }

    async fn delete_uptime_test(&self, id: &str) -> Result<()> {
        let mut state = self.begin(Call::DeleteUptimeTest(id.to_string()))?;
        state.uptime_tests.remove(id).map(|_| ()).ok_or_else(not_found)
    }

    async fn list_uptime_tests(&self, page: u32) -> Result<Page<UptimeTestOverview>> {
        let state = self.begin(Call::ListUptimeTests(page))?;
        let items = state
            .uptime_tests
            .values()
            .map(|t| UptimeTestOverview {
                id: t.id.clone(),
                name: t.name.clone(),
                test_type: t.test_type.to_string(),
                website_url: t.website_url.clone(),
                check_rate: t.check_rate.as_secs(),
                paused: t.paused,
                tags: t.tags.clone(),
            })
            .collect();
        drop(state);
        Ok(self.page(items, page))
    }
}

/// Form parameter names, in order
pub fn param_names(params: &FormParams) -> Vec<&'static str> {
    params.iter().map(|(name, _)| *name).collect()
}

/// Value of one form parameter
pub fn param<'a>(params: &'a FormParams, name: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.as_str())
}
