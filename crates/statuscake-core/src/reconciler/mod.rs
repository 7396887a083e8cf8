//! Generic CRUD reconciler
//!
//! The reconciler applies the same lifecycle contract to every
//! [`Resource`]:
//!
//! - **create**: validate → `POST` → store id → follow-up requests → read
//! - **read**: `GET` and overwrite every field; not found is a silent no-op
//! - **update**: diff prior vs desired → refuse immutable changes → `PUT`
//!   only the changed fields (or nothing) → read
//! - **delete**: `DELETE` and clear state; not found is a warning
//! - **import**: `GET` by id alone; not found is an error
//!
//! ## Event Flow
//!
//! ```text
//! host ──create──▶ create_remote ──▶ after_create ──▶ read ──▶ state
//! host ──update──▶ diff ──▶ update_remote (if any) ──▶ read ──▶ state
//! host ──read────▶ fetch ──▶ state (unchanged on 404)
//! host ──delete──▶ delete_remote ──▶ cleared state (warning on 404)
//! ```
//!
//! Every operation returns [`Diagnostics`]; an empty list is success.

pub mod handler;

pub use handler::TypedHandler;

use std::collections::BTreeSet;
use tracing::{debug, info, warn};

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::traits::{Resource, ResourceField, StatusCakeApi};

/// Summary reported when importing an identifier the remote does not know
pub const IMPORT_NOT_FOUND_SUMMARY: &str = "Cannot import non-existent remote object";

/// Fields that differ between a prior and a desired record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeSet<F: ResourceField> {
    fields: BTreeSet<F>,
}

impl<F: ResourceField> ChangeSet<F> {
    /// Compute the explicit diff between two records
    pub fn between<R: Resource<Field = F>>(prior: &R, desired: &R) -> Self {
        let fields = F::ALL
            .iter()
            .copied()
            .filter(|field| prior.field_differs(desired, *field))
            .collect();

        Self { fields }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn contains(&self, field: F) -> bool {
        self.fields.contains(&field)
    }

    pub fn fields(&self) -> Vec<F> {
        self.fields.iter().copied().collect()
    }

    /// Changed fields that can only change through replacement
    pub fn immutable(&self) -> Vec<F> {
        self.fields
            .iter()
            .copied()
            .filter(ResourceField::is_immutable)
            .collect()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.fields.iter().map(ResourceField::name).collect()
    }
}

/// What the host has to do to move from prior to desired state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Plan<F: ResourceField> {
    NoOp,
    /// In-place update of these mutable fields
    Update(Vec<F>),
    /// Delete + create; these immutable fields changed
    Replace(Vec<F>),
}

/// Classify the change from `prior` to `desired`
pub fn plan<R: Resource>(prior: &R, desired: &R) -> Plan<R::Field> {
    let changes = ChangeSet::between(prior, desired);
    let immutable = changes.immutable();

    if !immutable.is_empty() {
        Plan::Replace(immutable)
    } else if changes.is_empty() {
        Plan::NoOp
    } else {
        Plan::Update(changes.fields())
    }
}

/// Create the resource remotely, then read it back
///
/// On success the record holds the remote-assigned id and the authoritative
/// remote values. A failed `POST` leaves the id empty.
pub async fn create<R: Resource>(api: &dyn StatusCakeApi, data: &mut R) -> Diagnostics {
    let mut diags = data.validate();
    if diags.has_errors() {
        return diags;
    }

    info!("Creating {} via StatusCake API", R::DISPLAY_NAME);

    let id = match data.create_remote(api).await {
        Ok(id) => id,
        Err(e) => {
            warn!("Failed to create {}: {}", R::DISPLAY_NAME, e);
            diags.extend(Diagnostics::from_api_error(&e));
            return diags;
        }
    };

    info!(id = %id, "{} created", R::DISPLAY_NAME);
    data.set_id(Some(id.clone()));

    if let Err(e) = data.after_create(api, &id).await {
        warn!(id = %id, "Follow-up request after creating {} failed: {}", R::DISPLAY_NAME, e);
        diags.extend(Diagnostics::from_api_error(&e));
        return diags;
    }

    diags.extend(read(api, data).await);
    diags
}

/// Refresh every field from the remote service
///
/// A remote "not found" leaves the record untouched and reports nothing: the
/// identifier is kept and no deletion is signalled.
pub async fn read<R: Resource>(api: &dyn StatusCakeApi, data: &mut R) -> Diagnostics {
    let Some(id) = data.id().map(str::to_owned) else {
        return Diagnostic::error(format!(
            "{} has no identifier; create or import it first",
            R::DISPLAY_NAME
        ))
        .into();
    };

    match R::fetch(api, &id).await {
        Ok(remote) => {
            debug!(id = %id, "Refreshed {} from StatusCake", R::DISPLAY_NAME);
            data.overwrite_with(remote);
            Diagnostics::new()
        }
        Err(e) if e.is_not_found() => {
            warn!(id = %id, "{} not found remotely; state left unchanged", R::DISPLAY_NAME);
            Diagnostics::new()
        }
        Err(e) => {
            warn!(id = %id, "Failed to read {}: {}", R::DISPLAY_NAME, e);
            Diagnostics::from_err(&e)
        }
    }
}

/// Send only the changed, mutable fields, then read back
///
/// `prior` is the last known state (it supplies the identifier); `data` is
/// the desired record and receives the refreshed state.
pub async fn update<R: Resource>(api: &dyn StatusCakeApi, prior: &R, data: &mut R) -> Diagnostics {
    let Some(id) = prior.id().or(data.id()).map(str::to_owned) else {
        return Diagnostic::error(format!(
            "{} has no identifier; it cannot be updated before it is created",
            R::DISPLAY_NAME
        ))
        .into();
    };
    data.set_id(Some(id.clone()));

    let mut diags = data.validate();
    if diags.has_errors() {
        return diags;
    }

    let changes = ChangeSet::between(prior, data);

    let immutable = changes.immutable();
    if !immutable.is_empty() {
        for field in immutable {
            diags.push(
                Diagnostic::error(format!(
                    "{} cannot be changed in place; the {} must be replaced",
                    field.name(),
                    R::DISPLAY_NAME.to_lowercase()
                ))
                .with_attribute(field.name()),
            );
        }
        return diags;
    }

    if changes.is_empty() {
        debug!(id = %id, "No changes to {}; skipping update request", R::DISPLAY_NAME);
    } else {
        info!(id = %id, fields = ?changes.names(), "Updating {}", R::DISPLAY_NAME);

        if let Err(e) = data.update_remote(api, &id, &changes.fields()).await {
            warn!(id = %id, "Failed to update {}: {}", R::DISPLAY_NAME, e);
            diags.extend(Diagnostics::from_api_error(&e));
            return diags;
        }
    }

    diags.extend(read(api, data).await);
    diags
}

/// Delete the remote resource and clear local state
///
/// Deleting something that is already gone succeeds with a warning.
pub async fn delete<R: Resource>(api: &dyn StatusCakeApi, data: &mut R) -> Diagnostics {
    let Some(id) = data.id().map(str::to_owned) else {
        debug!("{} was never created; nothing to delete", R::DISPLAY_NAME);
        *data = R::default();
        return Diagnostics::new();
    };

    match R::delete_remote(api, &id).await {
        Ok(()) => {
            info!(id = %id, "{} deleted", R::DISPLAY_NAME);
            *data = R::default();
            Diagnostics::new()
        }
        Err(e) if e.is_not_found() => {
            warn!(id = %id, "{} already deleted", R::DISPLAY_NAME);
            *data = R::default();
            Diagnostic::warning(format!("{} has already been deleted", R::DISPLAY_NAME)).into()
        }
        Err(e) => {
            warn!(id = %id, "Failed to delete {}: {}", R::DISPLAY_NAME, e);
            Diagnostics::from_err(&e)
        }
    }
}

/// Adopt an existing remote resource by identifier
pub async fn import<R: Resource>(api: &dyn StatusCakeApi, id: &str) -> (Option<R>, Diagnostics) {
    let mut data = R::default();
    data.set_id(Some(id.to_string()));

    match R::fetch(api, id).await {
        Ok(remote) => {
            info!(id = %id, "Imported {}", R::DISPLAY_NAME);
            data.overwrite_with(remote);
            (Some(data), Diagnostics::new())
        }
        Err(e) if e.is_not_found() => (
            None,
            Diagnostic::error(IMPORT_NOT_FOUND_SUMMARY)
                .with_detail(format!("{} {} does not exist", R::DISPLAY_NAME, id))
                .into(),
        ),
        Err(e) => (None, Diagnostics::from_err(&e)),
    }
}
