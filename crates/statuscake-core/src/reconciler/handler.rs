//! JSON adapter from [`ResourceHandler`] to the typed reconciler

use async_trait::async_trait;
use serde_json::Value;
use std::marker::PhantomData;

use super::Plan;
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::schema::ResourceSchema;
use crate::traits::{HandlerOutcome, PlanOutcome, Resource, ResourceField, ResourceHandler, StatusCakeApi};

/// [`ResourceHandler`] for any [`Resource`]
///
/// Decoding failures (missing required fields, values outside an
/// enumeration) are reported as diagnostics before any remote call is made.
pub struct TypedHandler<R> {
    _resource: PhantomData<fn() -> R>,
}

impl<R: Resource> TypedHandler<R> {
    pub fn new() -> Self {
        Self {
            _resource: PhantomData,
        }
    }

    fn decode(value: Value) -> Result<R, Diagnostics> {
        serde_json::from_value(value).map_err(|e| {
            Diagnostic::error(format!("Invalid {} configuration", R::TYPE_NAME))
                .with_detail(e.to_string())
                .into()
        })
    }

    fn outcome(data: &R, mut diagnostics: Diagnostics) -> HandlerOutcome {
        match serde_json::to_value(data) {
            Ok(state) => HandlerOutcome {
                state: Some(state),
                diagnostics,
            },
            Err(e) => {
                diagnostics.push(
                    Diagnostic::error(format!("Failed to encode {} state", R::TYPE_NAME))
                        .with_detail(e.to_string()),
                );
                HandlerOutcome {
                    state: None,
                    diagnostics,
                }
            }
        }
    }

    fn rejected(diagnostics: Diagnostics) -> HandlerOutcome {
        HandlerOutcome {
            state: None,
            diagnostics,
        }
    }
}

impl<R: Resource> Default for TypedHandler<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<R: Resource> ResourceHandler for TypedHandler<R> {
    fn type_name(&self) -> &'static str {
        R::TYPE_NAME
    }

    fn schema(&self) -> ResourceSchema {
        R::schema()
    }

    fn plan(&self, prior: &Value, config: &Value) -> PlanOutcome {
        let prior = match Self::decode(prior.clone()) {
            Ok(prior) => prior,
            Err(diagnostics) => return PlanOutcome::Invalid { diagnostics },
        };
        let desired = match Self::decode(config.clone()) {
            Ok(desired) => desired,
            Err(diagnostics) => return PlanOutcome::Invalid { diagnostics },
        };

        let diagnostics = desired.validate();
        if diagnostics.has_errors() {
            return PlanOutcome::Invalid { diagnostics };
        }

        match super::plan(&prior, &desired) {
            Plan::NoOp => PlanOutcome::NoOp,
            Plan::Update(fields) => PlanOutcome::Update {
                fields: fields.iter().map(ResourceField::name).collect(),
            },
            Plan::Replace(fields) => PlanOutcome::Replace {
                fields: fields.iter().map(ResourceField::name).collect(),
            },
        }
    }

    async fn create(&self, api: &dyn StatusCakeApi, config: Value) -> HandlerOutcome {
        let mut data = match Self::decode(config) {
            Ok(data) => data,
            Err(diagnostics) => return Self::rejected(diagnostics),
        };

        let diagnostics = super::create(api, &mut data).await;
        if data.id().is_none() {
            return Self::rejected(diagnostics);
        }
        Self::outcome(&data, diagnostics)
    }

    async fn read(&self, api: &dyn StatusCakeApi, state: Value) -> HandlerOutcome {
        let mut data = match Self::decode(state) {
            Ok(data) => data,
            Err(diagnostics) => return Self::rejected(diagnostics),
        };

        let diagnostics = super::read(api, &mut data).await;
        Self::outcome(&data, diagnostics)
    }

    async fn update(&self, api: &dyn StatusCakeApi, prior: Value, config: Value) -> HandlerOutcome {
        let prior = match Self::decode(prior) {
            Ok(prior) => prior,
            Err(diagnostics) => return Self::rejected(diagnostics),
        };
        let mut data = match Self::decode(config) {
            Ok(data) => data,
            Err(diagnostics) => return Self::rejected(diagnostics),
        };

        let diagnostics = super::update(api, &prior, &mut data).await;
        if diagnostics.has_errors() {
            // The remote was not (fully) changed; the prior state still stands.
            return Self::outcome(&prior, diagnostics);
        }
        Self::outcome(&data, diagnostics)
    }

    async fn delete(&self, api: &dyn StatusCakeApi, state: Value) -> HandlerOutcome {
        let mut data = match Self::decode(state) {
            Ok(data) => data,
            Err(diagnostics) => return Self::rejected(diagnostics),
        };

        let diagnostics = super::delete(api, &mut data).await;
        if diagnostics.has_errors() {
            return Self::outcome(&data, diagnostics);
        }
        HandlerOutcome {
            state: None,
            diagnostics,
        }
    }

    async fn import(&self, api: &dyn StatusCakeApi, id: &str) -> HandlerOutcome {
        match super::import::<R>(api, id).await {
            (Some(data), diagnostics) => Self::outcome(&data, diagnostics),
            (None, diagnostics) => Self::rejected(diagnostics),
        }
    }
}
