// # Resource Traits
//
// A resource type plugs into the generic reconciler by implementing
// [`Resource`]: how to build the create request, how to fetch the remote
// state, how to send an update for a set of changed fields and how to
// delete. The reconciler owns everything else (validation order,
// diff, not-found handling, diagnostics).
//
// [`ResourceHandler`] is the JSON-facing view of a resource type that the
// registry hands to host drivers.

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;

use crate::diagnostics::Diagnostics;
use crate::error::Result;
use crate::schema::{Attribute, ResourceSchema};
use crate::traits::StatusCakeApi;

/// One attribute of a resource, as used by change detection
pub trait ResourceField: Copy + Ord + fmt::Debug + Send + Sync + 'static {
    /// Every field, in schema order
    const ALL: &'static [Self];

    /// Declarative schema of this field
    fn attribute(&self) -> Attribute;

    /// Attribute name as seen by the host
    fn name(&self) -> &'static str {
        self.attribute().name
    }

    /// Whether a change to this field forces replacement
    fn is_immutable(&self) -> bool {
        self.attribute().force_new
    }
}

/// A StatusCake resource type managed by the provider
///
/// Implementors are plain records holding both desired configuration and
/// the last known remote state; the identifier is `None` until the remote
/// service assigns one.
#[async_trait]
pub trait Resource:
    Serialize + DeserializeOwned + Clone + Default + PartialEq + fmt::Debug + Send + Sync + 'static
{
    type Field: ResourceField;

    /// Host-facing type name (e.g. `statuscake_contact_group`)
    const TYPE_NAME: &'static str;

    /// Human-readable noun used in diagnostics (e.g. `Contact group`)
    const DISPLAY_NAME: &'static str;

    /// One-line description for the schema
    const DESCRIPTION: &'static str;

    fn id(&self) -> Option<&str>;

    fn set_id(&mut self, id: Option<String>);

    /// Local checks performed before any remote call
    fn validate(&self) -> Diagnostics;

    /// Whether `field` holds a different value in `other`
    ///
    /// Empty optional strings compare equal to absent ones.
    fn field_differs(&self, other: &Self, field: Self::Field) -> bool;

    /// Replace local state with freshly fetched remote state
    ///
    /// Resources with write-only fields (never returned by the API) override
    /// this to carry those fields over.
    fn overwrite_with(&mut self, remote: Self) {
        *self = remote;
    }

    /// `POST` the record, returning the new identifier
    async fn create_remote(&self, api: &dyn StatusCakeApi) -> Result<String>;

    /// Follow-up requests needed right after a successful create
    async fn after_create(&self, _api: &dyn StatusCakeApi, _id: &str) -> Result<()> {
        Ok(())
    }

    /// `GET` the remote state as a fresh record
    async fn fetch(api: &dyn StatusCakeApi, id: &str) -> Result<Self>;

    /// `PUT` exactly the given fields of this record
    async fn update_remote(
        &self,
        api: &dyn StatusCakeApi,
        id: &str,
        changes: &[Self::Field],
    ) -> Result<()>;

    /// `DELETE` the remote resource
    async fn delete_remote(api: &dyn StatusCakeApi, id: &str) -> Result<()>;

    fn schema() -> ResourceSchema {
        ResourceSchema::from_fields::<Self::Field>(Self::TYPE_NAME, Self::DESCRIPTION)
    }
}

/// Outcome of a JSON-level resource operation
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HandlerOutcome {
    /// Resulting state; `None` when the resource no longer exists locally
    pub state: Option<Value>,
    pub diagnostics: Diagnostics,
}

/// Outcome of planning a change
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum PlanOutcome {
    NoOp,
    Update { fields: Vec<&'static str> },
    Replace { fields: Vec<&'static str> },
    Invalid { diagnostics: Diagnostics },
}

/// JSON-facing operations of one resource type
///
/// Every operation takes the API client explicitly; handlers hold no
/// client or credential of their own.
#[async_trait]
pub trait ResourceHandler: Send + Sync {
    fn type_name(&self) -> &'static str;

    fn schema(&self) -> ResourceSchema;

    fn plan(&self, prior: &Value, config: &Value) -> PlanOutcome;

    async fn create(&self, api: &dyn StatusCakeApi, config: Value) -> HandlerOutcome;

    async fn read(&self, api: &dyn StatusCakeApi, state: Value) -> HandlerOutcome;

    async fn update(&self, api: &dyn StatusCakeApi, prior: Value, config: Value) -> HandlerOutcome;

    async fn delete(&self, api: &dyn StatusCakeApi, state: Value) -> HandlerOutcome;

    async fn import(&self, api: &dyn StatusCakeApi, id: &str) -> HandlerOutcome;
}
