// # StatusCake Provider Real Environment Validation Tool
//
// Runs the full resource lifecycle against the real StatusCake API:
// contact group + uptime test create, read, list, update and delete.
//
// ## Usage
//
// ```bash
// STATUSCAKE_API_KEY=your_key \
// STATUSCAKE_DEMO_URL=https://www.example.com \
// cargo run -p statuscake-demos --bin uptime_validation
// ```
//
// ## Environment Variables
//
// Required:
// - `STATUSCAKE_API_KEY`: StatusCake API key
//
// Optional:
// - `STATUSCAKE_API_URL`: API base URL (default: public v1 endpoint)
// - `STATUSCAKE_DEMO_URL`: Website to monitor (default: https://www.example.com)
// - `STATUSCAKE_DEMO_EMAIL`: Email address for the contact group
//
// Every resource created here is deleted again before exit, also on failure.

use anyhow::{Context, Result, bail};
use statuscake_client::StatusCakeClient;
use statuscake_core::api::{CheckRate, UptimeTestType};
use statuscake_core::traits::list_all_uptime_tests;
use statuscake_core::{ContactGroup, Diagnostics, ProviderConfig, Resource, UptimeTest, reconciler};
use std::env;

fn ensure_ok(step: &str, diags: Diagnostics) -> Result<()> {
    for diag in &diags {
        if diag.is_error() {
            tracing::error!("  {} [{}]: {:?}", diag.summary, step, diag.detail);
        } else {
            tracing::warn!("  {} [{}]", diag.summary, step);
        }
    }
    if diags.has_errors() {
        bail!("{} failed with {} diagnostic(s)", step, diags.len());
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    tracing::info!("=== StatusCake Provider Real Environment Validation ===");

    let config = ProviderConfig::from_env()?;
    let website_url =
        env::var("STATUSCAKE_DEMO_URL").unwrap_or_else(|_| "https://www.example.com".to_string());
    let email = env::var("STATUSCAKE_DEMO_EMAIL").ok();

    tracing::info!("Configuration: {:?}", config);

    tracing::info!("--- Step 1: Creating API client ---");
    let client = StatusCakeClient::new(&config).context("creating StatusCake client")?;
    tracing::info!("✓ Client created (API key not shown)");

    let mut group = ContactGroup::new("statuscake-provider validation");
    group.email_addresses = email.into_iter().collect();

    tracing::info!("--- Step 2: Creating {} ---", ContactGroup::TYPE_NAME);
    ensure_ok("create contact group", reconciler::create(&client, &mut group).await)?;
    let group_id = group.id.clone().context("contact group has no id after create")?;
    tracing::info!("✓ Contact group created (id: {})", group_id);

    let result = validate_uptime_test(&client, &website_url, &group_id).await;

    tracing::info!("--- Cleanup: Deleting contact group ---");
    ensure_ok("delete contact group", reconciler::delete(&client, &mut group).await)?;
    tracing::info!("✓ Contact group deleted");

    result?;

    tracing::info!("=== Validation Summary ===");
    tracing::info!("✓ Create + read: OK");
    tracing::info!("✓ Listing: OK");
    tracing::info!("✓ Partial update: OK");
    tracing::info!("✓ Delete idempotency: OK");
    Ok(())
}

async fn validate_uptime_test(client: &StatusCakeClient, website_url: &str, group_id: &str) -> Result<()> {
    let mut test = UptimeTest::new(
        "My Site",
        UptimeTestType::Http,
        website_url,
        CheckRate::FiveMinutes,
    );
    test.contact_groups = vec![group_id.to_string()];

    tracing::info!("--- Step 3: Creating {} ---", UptimeTest::TYPE_NAME);
    ensure_ok("create uptime test", reconciler::create(client, &mut test).await)?;
    let id = test.id.clone().context("uptime test has no id after create")?;
    tracing::info!("✓ Uptime test created (id: {})", id);

    let outcome = check_uptime_test(client, &mut test, &id, website_url).await;

    tracing::info!("--- Cleanup: Deleting uptime test ---");
    let mut stale = test.clone();
    ensure_ok("delete uptime test", reconciler::delete(client, &mut test).await)?;
    let diags = reconciler::delete(client, &mut stale).await;
    if diags.has_errors() || diags.is_empty() {
        tracing::warn!("⚠ Second delete did not report the resource as already deleted");
    } else {
        tracing::info!("✓ Second delete reported: {}", diags.iter().map(|d| d.summary.as_str()).collect::<Vec<_>>().join("; "));
    }

    outcome
}

async fn check_uptime_test(
    client: &StatusCakeClient,
    test: &mut UptimeTest,
    id: &str,
    website_url: &str,
) -> Result<()> {
    tracing::info!("--- Step 4: Reading back ---");
    ensure_ok("read uptime test", reconciler::read(client, test).await)?;
    if test.name != "My Site" || test.website_url != website_url || test.check_rate != CheckRate::FiveMinutes {
        bail!("remote state does not match the created test: {:?}", test);
    }
    tracing::info!("✓ Remote state matches configuration");

    tracing::info!("--- Step 5: Listing ---");
    let listed = list_all_uptime_tests(client).await?;
    if !listed.iter().any(|t| t.id == id) {
        bail!("uptime test {} missing from listing", id);
    }
    tracing::info!("✓ Uptime test found among {} test(s)", listed.len());

    tracing::info!("--- Step 6: Pausing ---");
    let prior = test.clone();
    test.paused = true;
    ensure_ok("update uptime test", reconciler::update(client, &prior, test).await)?;
    if !test.paused {
        bail!("uptime test {} is not paused after update", id);
    }
    tracing::info!("✓ Uptime test paused");

    Ok(())
}
