// # statuscake-core
//
// Core library for the StatusCake infrastructure provider.
//
// ## Architecture Overview
//
// This library provides the reconciliation contract between declarative
// configuration and remote StatusCake resources:
// - **StatusCakeApi**: Trait for the remote API consumed by the reconcilers
// - **Resource**: Trait a resource type implements to plug into the reconciler
// - **reconciler**: Generic create/read/update/delete/import/plan
// - **Diagnostics**: Structured result of every operation (empty = success)
// - **ResourceRegistry**: Plugin-based registry of resource handlers and clients
//
// ## Resource Types
//
// - `statuscake_contact_group` ([`ContactGroup`])
// - `statuscake_uptime_test` ([`UptimeTest`])
//
// ## Design Principles
//
// 1. **Remote is authoritative**: every create and update ends with a read
//    that overwrites local state
// 2. **Explicit diff**: updates send exactly the changed mutable fields
// 3. **Client passed explicitly**: no global client or credentials
// 4. **Library-First**: the binary is a thin driver over this crate

pub mod api;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod reconciler;
pub mod registry;
pub mod resources;
pub mod schema;
pub mod traits;

// Re-export core types for convenience
pub use config::ProviderConfig;
pub use diagnostics::{Diagnostic, Diagnostics, Severity};
pub use error::{ApiError, Error, Result};
pub use reconciler::{ChangeSet, Plan, TypedHandler};
pub use registry::ResourceRegistry;
pub use resources::{ContactGroup, ContactGroupField, UptimeTest, UptimeTestField};
pub use schema::{Attribute, AttributeType, ResourceSchema};
pub use traits::{
    ApiClientFactory, HandlerOutcome, PlanOutcome, Resource, ResourceField, ResourceHandler,
    StatusCakeApi,
};
