//! Plugin-based resource registry
//!
//! The registry maps resource type names to JSON-level handlers and client
//! names to API client factories, so a host driver can dispatch requests by
//! name without hardcoded if-else chains.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use statuscake_core::registry::ResourceRegistry;
//! use statuscake_core::config::ProviderConfig;
//!
//! // Both StatusCake resource types are registered up front
//! let registry = ResourceRegistry::with_builtin_resources();
//!
//! // Clients register themselves (see `statuscake_client::register`)
//! statuscake_client::register(&registry);
//!
//! let client = registry.create_client("http", &ProviderConfig::from_env()?)?;
//! let handler = registry.resource("statuscake_uptime_test")?;
//! let outcome = handler.read(client.as_ref(), state).await;
//! ```

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::config::ProviderConfig;
use crate::error::{Error, Result};
use crate::reconciler::TypedHandler;
use crate::resources::{ContactGroup, UptimeTest};
use crate::schema::ResourceSchema;
use crate::traits::{ApiClientFactory, ResourceHandler, StatusCakeApi};

/// Registry of resource handlers and API client factories
///
/// ## Thread Safety
///
/// The registry uses interior mutability with RwLock, allowing concurrent
/// reads and exclusive writes. Registration never fails; a poisoned lock
/// still holds a consistent map since every write is a single insert.
#[derive(Default)]
pub struct ResourceRegistry {
    /// Registered resource handlers by type name
    resources: RwLock<HashMap<&'static str, Arc<dyn ResourceHandler>>>,

    /// Registered API client factories by name
    clients: RwLock<HashMap<String, Box<dyn ApiClientFactory>>>,
}

impl ResourceRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding both StatusCake resource types
    pub fn with_builtin_resources() -> Self {
        let registry = Self::new();
        registry.register_resource(Arc::new(TypedHandler::<ContactGroup>::new()));
        registry.register_resource(Arc::new(TypedHandler::<UptimeTest>::new()));
        registry
    }

    /// Register a resource handler under its own type name
    ///
    /// A handler registered under an existing name replaces the old one.
    pub fn register_resource(&self, handler: Arc<dyn ResourceHandler>) {
        let mut resources = self
            .resources
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        resources.insert(handler.type_name(), handler);
    }

    /// Register an API client factory
    ///
    /// # Parameters
    ///
    /// - `name`: Client name (e.g., "http")
    /// - `factory`: Factory object for creating client instances
    pub fn register_client(&self, name: impl Into<String>, factory: Box<dyn ApiClientFactory>) {
        let mut clients = self.clients.write().unwrap_or_else(PoisonError::into_inner);
        clients.insert(name.into(), factory);
    }

    /// Look up the handler for a resource type
    pub fn resource(&self, type_name: &str) -> Result<Arc<dyn ResourceHandler>> {
        let resources = self.resources.read().unwrap_or_else(PoisonError::into_inner);

        resources
            .get(type_name)
            .cloned()
            .ok_or_else(|| Error::config(format!("Unknown resource type: {}", type_name)))
    }

    /// Create an API client from configuration
    ///
    /// # Returns
    ///
    /// - `Ok(Box<dyn StatusCakeApi>)`: Created client
    /// - `Err(Error)`: If the client is not registered or the configuration
    ///   is unusable (e.g. "Missing api_key")
    pub fn create_client(&self, name: &str, config: &ProviderConfig) -> Result<Box<dyn StatusCakeApi>> {
        let clients = self.clients.read().unwrap_or_else(PoisonError::into_inner);

        let factory = clients
            .get(name)
            .ok_or_else(|| Error::config(format!("Unknown API client: {}", name)))?;

        factory.create(config)
    }

    /// List all registered resource type names, sorted
    pub fn list_resources(&self) -> Vec<&'static str> {
        let resources = self.resources.read().unwrap_or_else(PoisonError::into_inner);
        let mut names: Vec<_> = resources.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// List all registered API client names, sorted
    pub fn list_clients(&self) -> Vec<String> {
        let clients = self.clients.read().unwrap_or_else(PoisonError::into_inner);
        let mut names: Vec<_> = clients.keys().cloned().collect();
        names.sort_unstable();
        names
    }

    pub fn has_resource(&self, type_name: &str) -> bool {
        let resources = self.resources.read().unwrap_or_else(PoisonError::into_inner);
        resources.contains_key(type_name)
    }

    pub fn has_client(&self, name: &str) -> bool {
        let clients = self.clients.read().unwrap_or_else(PoisonError::into_inner);
        clients.contains_key(name)
    }

    /// Schemas of every registered resource type, sorted by type name
    pub fn schemas(&self) -> Vec<ResourceSchema> {
        let resources = self.resources.read().unwrap_or_else(PoisonError::into_inner);
        let mut schemas: Vec<_> = resources.values().map(|handler| handler.schema()).collect();
        schemas.sort_by_key(|schema| schema.type_name);
        schemas
    }
}
