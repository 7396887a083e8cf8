//! Contract Test: Local Validation & JSON Handlers
//!
//! Constraints verified:
//! - Values outside an enumeration are rejected before any remote call
//! - Missing required fields are rejected before any remote call
//! - Registry handlers drive the same reconcilers from JSON state
//! - Plans distinguish in-place updates from replacements
//!
//! If this test fails, invalid configuration can reach the remote API.

mod common;

use common::*;
use serde_json::json;
use statuscake_core::traits::PlanOutcome;
use statuscake_core::ResourceRegistry;

fn uptime_config(check_rate: u32) -> serde_json::Value {
    json!({
        "name": "My Site",
        "website_url": "https://www.example.com",
        "test_type": "HTTP",
        "check_rate": check_rate
    })
}

#[tokio::test]
async fn check_rate_outside_enumeration_is_rejected_locally() {
    let api = FakeStatusCake::new();
    let registry = ResourceRegistry::with_builtin_resources();
    let handler = registry.resource("statuscake_uptime_test").unwrap();

    let outcome = handler.create(&api, uptime_config(120)).await;

    assert!(outcome.state.is_none());
    assert!(outcome.diagnostics.has_errors());
    let diag = outcome.diagnostics.iter().next().unwrap();
    assert_eq!(diag.summary, "Invalid statuscake_uptime_test configuration");
    assert!(diag.detail.as_deref().unwrap().contains("check_rate"));
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn lowercase_test_type_is_rejected_locally() {
    let api = FakeStatusCake::new();
    let registry = ResourceRegistry::with_builtin_resources();
    let handler = registry.resource("statuscake_uptime_test").unwrap();

    let mut config = uptime_config(300);
    config["test_type"] = json!("http");
    let outcome = handler.create(&api, config).await;

    assert!(outcome.diagnostics.has_errors());
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn empty_required_name_is_rejected_locally() {
    let api = FakeStatusCake::new();
    let registry = ResourceRegistry::with_builtin_resources();
    let handler = registry.resource("statuscake_contact_group").unwrap();

    let outcome = handler
        .create(&api, json!({ "name": "", "ping_url": "not a url" }))
        .await;

    assert!(outcome.state.is_none());
    assert_eq!(outcome.diagnostics.len(), 2);
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn handler_lifecycle_over_json_state() {
    let api = FakeStatusCake::new();
    let registry = ResourceRegistry::with_builtin_resources();
    let handler = registry.resource("statuscake_uptime_test").unwrap();

    let created = handler.create(&api, uptime_config(300)).await;
    assert!(created.diagnostics.is_empty());
    let state = created.state.unwrap();
    assert_eq!(state["name"], "My Site");
    assert_eq!(state["check_rate"], 300);
    assert_eq!(state["confirmation"], 2);
    let id = state["id"].as_str().unwrap().to_string();

    let mut desired = state.clone();
    desired["paused"] = json!(true);
    let updated = handler.update(&api, state.clone(), desired).await;
    assert!(updated.diagnostics.is_empty());
    assert_eq!(updated.state.as_ref().unwrap()["paused"], true);

    let imported = handler.import(&api, &id).await;
    assert_eq!(imported.state.as_ref().unwrap()["paused"], true);

    let deleted = handler.delete(&api, updated.state.unwrap()).await;
    assert!(deleted.diagnostics.is_empty());
    assert!(deleted.state.is_none());
}

#[tokio::test]
async fn refused_update_returns_prior_state() {
    let api = FakeStatusCake::new();
    let registry = ResourceRegistry::with_builtin_resources();
    let handler = registry.resource("statuscake_uptime_test").unwrap();

    let prior = handler.create(&api, uptime_config(300)).await.state.unwrap();
    let mut desired = prior.clone();
    desired["website_url"] = json!("https://www.example.org");

    let outcome = handler.update(&api, prior.clone(), desired).await;

    assert!(outcome.diagnostics.has_errors());
    assert_eq!(outcome.state, Some(prior));
}

#[test]
fn plan_classifies_changes() {
    let registry = ResourceRegistry::with_builtin_resources();
    let handler = registry.resource("statuscake_uptime_test").unwrap();

    let prior = uptime_config(300);
    assert_eq!(handler.plan(&prior, &prior), PlanOutcome::NoOp);

    let mut desired = prior.clone();
    desired["check_rate"] = json!(60);
    desired["tags"] = json!(["web"]);
    assert_eq!(
        handler.plan(&prior, &desired),
        PlanOutcome::Update {
            fields: vec!["check_rate", "tags"]
        }
    );

    desired["test_type"] = json!("TCP");
    assert_eq!(
        handler.plan(&prior, &desired),
        PlanOutcome::Replace {
            fields: vec!["test_type"]
        }
    );

    desired["check_rate"] = json!(45);
    assert!(matches!(
        handler.plan(&prior, &desired),
        PlanOutcome::Invalid { .. }
    ));
}
