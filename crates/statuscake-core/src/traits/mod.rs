//! Core traits for the StatusCake provider
//!
//! This module defines the abstract interfaces that all implementations must follow.
//!
//! - [`StatusCakeApi`]: Remote API consumed by the reconcilers
//! - [`Resource`]: A resource type the generic reconciler can manage
//! - [`ResourceHandler`]: JSON-facing operations exposed to host drivers

pub mod api_client;
pub mod resource;

pub use api_client::{ApiClientFactory, StatusCakeApi, list_all_contact_groups, list_all_uptime_tests};
pub use resource::{HandlerOutcome, PlanOutcome, Resource, ResourceField, ResourceHandler};
