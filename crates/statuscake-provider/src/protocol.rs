//! Line-delimited JSON request/response protocol
//!
//! Each input line is one request naming a resource type and an operation;
//! each output line is the matching response. Requests never fail at the
//! protocol level: malformed input is answered with error diagnostics.
//!
//! ```text
//! {"resource_type":"statuscake_contact_group","operation":"create","config":{"name":"Ops"}}
//! {"state":{"id":"123","name":"Ops",...},"diagnostics":[]}
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use statuscake_core::schema::ResourceSchema;
use statuscake_core::traits::{HandlerOutcome, PlanOutcome, StatusCakeApi};
use statuscake_core::{Diagnostic, Diagnostics, Error, ResourceRegistry};
use tracing::debug;

/// Operation requested by the host
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "operation", rename_all = "snake_case")]
pub enum Operation {
    /// Describe one resource type, or all of them
    Schema,
    Plan { prior: Value, config: Value },
    Create { config: Value },
    Read { state: Value },
    Update { prior: Value, config: Value },
    Delete { state: Value },
    Import { id: String },
}

impl Operation {
    fn name(&self) -> &'static str {
        match self {
            Operation::Schema => "schema",
            Operation::Plan { .. } => "plan",
            Operation::Create { .. } => "create",
            Operation::Read { .. } => "read",
            Operation::Update { .. } => "update",
            Operation::Delete { .. } => "delete",
            Operation::Import { .. } => "import",
        }
    }
}

/// One request line
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Request {
    /// Required for every operation except `schema`
    #[serde(default)]
    pub resource_type: Option<String>,

    #[serde(flatten)]
    pub operation: Operation,
}

/// One response line
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Response {
    Outcome(HandlerOutcome),
    Plan(PlanOutcome),
    Schema { schemas: Vec<ResourceSchema> },
    Rejected { diagnostics: Diagnostics },
}

impl Response {
    fn rejected(summary: impl Into<String>, detail: Option<String>) -> Self {
        let mut diagnostic = Diagnostic::error(summary);
        if let Some(detail) = detail {
            diagnostic = diagnostic.with_detail(detail);
        }
        Response::Rejected {
            diagnostics: diagnostic.into(),
        }
    }
}

/// Response announcing that the provider could not start
///
/// Configuration errors are reported by their message alone, e.g.
/// `Missing api_key`.
pub fn startup_failure(err: &anyhow::Error) -> Response {
    let summary = match err.downcast_ref::<Error>() {
        Some(Error::Config(message)) => message.clone(),
        _ => err.to_string(),
    };
    Response::rejected(summary, None)
}

/// Parse and serve one request line
pub async fn handle_line(registry: &ResourceRegistry, api: &dyn StatusCakeApi, line: &str) -> Response {
    match serde_json::from_str::<Request>(line) {
        Ok(request) => handle(registry, api, request).await,
        Err(e) => Response::rejected("Malformed request", Some(e.to_string())),
    }
}

/// Serve one decoded request
pub async fn handle(registry: &ResourceRegistry, api: &dyn StatusCakeApi, request: Request) -> Response {
    debug!(
        resource_type = request.resource_type.as_deref().unwrap_or("*"),
        "Handling {} request",
        request.operation.name()
    );

    if request.operation == Operation::Schema {
        return match request.resource_type.as_deref() {
            None => Response::Schema {
                schemas: registry.schemas(),
            },
            Some(type_name) => match registry.resource(type_name) {
                Ok(handler) => Response::Schema {
                    schemas: vec![handler.schema()],
                },
                Err(e) => Response::rejected(e.to_string(), None),
            },
        };
    }

    let Some(type_name) = request.resource_type.as_deref() else {
        return Response::rejected(
            format!("resource_type is required for {}", request.operation.name()),
            None,
        );
    };

    let handler = match registry.resource(type_name) {
        Ok(handler) => handler,
        Err(e) => return Response::rejected(e.to_string(), None),
    };

    match request.operation {
        Operation::Schema => Response::Schema {
            schemas: vec![handler.schema()],
        },
        Operation::Plan { prior, config } => Response::Plan(handler.plan(&prior, &config)),
        Operation::Create { config } => Response::Outcome(handler.create(api, config).await),
        Operation::Read { state } => Response::Outcome(handler.read(api, state).await),
        Operation::Update { prior, config } => {
            Response::Outcome(handler.update(api, prior, config).await)
        }
        Operation::Delete { state } => Response::Outcome(handler.delete(api, state).await),
        Operation::Import { id } => Response::Outcome(handler.import(api, &id).await),
    }
}
