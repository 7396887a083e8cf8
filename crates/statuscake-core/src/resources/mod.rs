// # Resource Types
//
// The two StatusCake resources exposed to the host:
//
// - `statuscake_contact_group`: [`ContactGroup`]
// - `statuscake_uptime_test`: [`UptimeTest`]
//
// ## Field Presence
//
// Optional scalars are `Option<T>`. An optional value is sent on create only
// when it is "set": a non-empty string, a non-empty list, a `true` flag or a
// non-zero number. Unset values are omitted so the remote service applies
// its own defaults.

pub mod contact_group;

pub use contact_group::{ContactGroup, ContactGroupField};
pub use uptime_test::{UptimeTest, UptimeTestField};

use crate::diagnostics::{Diagnostic, Diagnostics};

pub(crate) fn non_empty_str(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|s| !s.is_empty()).cloned()
}

pub(crate) fn non_empty_list(values: &[String]) -> Option<Vec<String>> {
    (!values.is_empty()).then(|| values.to_vec())
}

pub(crate) fn set_flag(value: bool) -> Option<bool> {
    value.then_some(true)
}

pub(crate) fn non_zero(value: u32) -> Option<u32> {
    (value != 0).then_some(value)
}

/// Compare optional strings, treating `""` as absent
pub(crate) fn differs_str(a: &Option<String>, b: &Option<String>) -> bool {
    non_empty_str(a) != non_empty_str(b)
}

pub(crate) fn validate_required(diags: &mut Diagnostics, attribute: &str, value: &str) {
    if value.trim().is_empty() {
        diags.push(
            Diagnostic::error(format!("{} is required and cannot be empty", attribute))
                .with_attribute(attribute),
        );
    }
}

pub(crate) fn validate_url(diags: &mut Diagnostics, attribute: &str, value: &Option<String>) {
    let Some(value) = non_empty_str(value) else {
        return;
    };

    if let Err(e) = reqwest::Url::parse(&value) {
        diags.push(
            Diagnostic::error(format!("{} is not a valid URL", attribute))
                .with_detail(format!("{}: {}", value, e))
                .with_attribute(attribute),
        );
    }
}
