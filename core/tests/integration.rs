//! Resource lifecycles against the live AWX mock server.
//!
//! # Design
//! Each test starts its own mock on a random port and drives the public
//! client over real HTTP, so path normalization, credentials, status
//! handling and decoding are all exercised end to end. Server state is
//! inspected through the shared store handle where the API reply alone does
//! not show the effect.

mod support;

use std::time::Duration;

use awx_core::{
    wait_for_success_job_finish_with, ApiError, Client, Context, JobStatus, Poller, QueryParams,
};
use serde_json::json;
use support::{mock_client, payload, spawn_mock, with_store};

fn name_filter(name: &str) -> QueryParams {
    QueryParams::from([("name".to_string(), name.to_string())])
}

fn fast_poller() -> Poller {
    Poller::new().interval(Duration::from_millis(20))
}

// ---------------------------------------------------------------------------
// Inventories, hosts, groups
// ---------------------------------------------------------------------------

#[test]
fn inventory_lifecycle() {
    let (base, db) = spawn_mock();
    let client = mock_client(&base);
    let ctx = Context::background();

    // Step 1: the seeded organization is listed.
    let orgs = client
        .organizations()
        .list_organizations(&ctx, &QueryParams::new())
        .unwrap();
    assert_eq!(orgs.count, 1);
    let org = orgs.results[0].id;

    // Step 2: create and read back an inventory.
    let inventory = client
        .inventories()
        .create_inventory(&ctx, &payload(json!({"name": "prod", "organization": org})))
        .unwrap();
    assert_eq!(inventory.name, "prod");
    assert_eq!(inventory.organization, org);

    let fetched = client.inventories().get_inventory(&ctx, inventory.id).unwrap();
    assert_eq!(fetched.id, inventory.id);
    assert_eq!(fetched.total_hosts, 0);

    // Step 3: partial update.
    let updated = client
        .inventories()
        .update_inventory(&ctx, inventory.id, &payload(json!({"description": "production"})))
        .unwrap();
    assert_eq!(updated.description, "production");
    assert_eq!(updated.name, "prod");

    // Step 4: filtered list.
    let listed = client
        .inventories()
        .list_inventories(&ctx, &name_filter("prod"))
        .unwrap();
    assert_eq!(listed.count, 1);
    let none = client
        .inventories()
        .list_inventories(&ctx, &name_filter("staging"))
        .unwrap();
    assert!(none.results.is_empty());

    // Step 5: syncing sources starts one update per source.
    let updates = client
        .inventories()
        .sync_inventory_sources(&ctx, inventory.id)
        .unwrap();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].status, "pending");

    // Step 6: delete, then the inventory is gone.
    client.inventories().delete_inventory(&ctx, inventory.id).unwrap();
    let err = client.inventories().get_inventory(&ctx, inventory.id).unwrap_err();
    assert!(err.is_not_found(), "{err}");
    assert!(with_store(&db, |s| s.inventories.is_empty()));
}

#[test]
fn host_and_group_membership() {
    let (base, db) = spawn_mock();
    let client = mock_client(&base);
    let ctx = Context::background();

    let inventory = client
        .inventories()
        .create_inventory(&ctx, &payload(json!({"name": "prod", "organization": 1})))
        .unwrap();

    // Hosts.
    let host = client
        .hosts()
        .create_host(&ctx, &payload(json!({"name": "web1", "inventory": inventory.id})))
        .unwrap();
    assert_eq!(host.name, "web1");
    assert!(host.enabled);

    let host = client
        .hosts()
        .update_host(&ctx, host.id, &payload(json!({"enabled": false})))
        .unwrap();
    assert!(!host.enabled);

    let hosts = client.hosts().list_hosts(&ctx, &name_filter("web1")).unwrap();
    assert_eq!(hosts.count, 1);

    // A duplicate name in the same inventory is refused by the server.
    let err = client
        .hosts()
        .create_host(&ctx, &payload(json!({"name": "web1", "inventory": inventory.id})))
        .unwrap_err();
    assert_eq!(err.status_code(), Some(400));

    // Groups.
    let web = client
        .groups()
        .create_group(&ctx, &payload(json!({"name": "web", "inventory": inventory.id})))
        .unwrap();
    let frontend = client
        .groups()
        .create_group(&ctx, &payload(json!({"name": "frontend", "inventory": inventory.id})))
        .unwrap();
    let web = client
        .groups()
        .update_group(&ctx, web.id, &payload(json!({"description": "web tier"})))
        .unwrap();
    assert_eq!(web.description, "web tier");

    let groups = client.groups().list_groups(&ctx, &QueryParams::new()).unwrap();
    assert_eq!(groups.count, 2);
    let by_inventory = client
        .groups()
        .list_groups_by_inventory(&ctx, inventory.id)
        .unwrap();
    assert_eq!(by_inventory.count, 2);

    // Associate and disassociate answer 204, which decodes to a default host.
    client
        .hosts()
        .associate_group(&ctx, host.id, &payload(json!({"id": web.id})))
        .unwrap();
    assert!(with_store(&db, |s| s.group_hosts[&web.id].contains(&host.id)));

    client
        .hosts()
        .disassociate_group(&ctx, host.id, &payload(json!({"id": web.id})))
        .unwrap();
    assert!(with_store(&db, |s| !s.group_hosts[&web.id].contains(&host.id)));

    // Creating a host through a group also makes it a member.
    client
        .groups()
        .add_host_to_group(&ctx, web.id, inventory.id, "web2")
        .unwrap();
    let web2 = client.hosts().list_hosts(&ctx, &name_filter("web2")).unwrap();
    assert_eq!(web2.count, 1);
    assert!(with_store(&db, |s| s.group_hosts[&web.id].contains(&web2.results[0].id)));

    client
        .groups()
        .add_child_to_group(&ctx, frontend.id, web.id)
        .unwrap();
    assert!(with_store(&db, |s| s.group_children[&frontend.id].contains(&web.id)));

    // Teardown.
    client.hosts().delete_host(&ctx, host.id).unwrap();
    client.groups().delete_group(&ctx, web.id).unwrap();
    let remaining = client.groups().list_groups(&ctx, &QueryParams::new()).unwrap();
    assert_eq!(remaining.count, 1);
    assert_eq!(remaining.results[0].name, "frontend");
}

// ---------------------------------------------------------------------------
// Job templates and jobs
// ---------------------------------------------------------------------------

#[test]
fn job_template_launch_and_job_details() {
    let (base, db) = spawn_mock();
    let client = mock_client(&base);
    let ctx = Context::background();

    let inventory = client
        .inventories()
        .create_inventory(&ctx, &payload(json!({"name": "prod", "organization": 1})))
        .unwrap();
    client
        .hosts()
        .create_host(&ctx, &payload(json!({"name": "web1", "inventory": inventory.id})))
        .unwrap();

    let template = client
        .job_templates()
        .create_job_template(
            &ctx,
            &payload(json!({
                "name": "deploy",
                "job_type": "run",
                "inventory": inventory.id,
                "project": 3,
                "playbook": "site.yml",
            })),
        )
        .unwrap();
    assert_eq!(template.name, "deploy");
    assert_eq!(template.inventory, Some(inventory.id));

    let template = client
        .job_templates()
        .update_job_template(&ctx, template.id, &payload(json!({"limit": "all"})))
        .unwrap();
    assert_eq!(template.limit, "all");

    let templates = client
        .job_templates()
        .list_job_templates(&ctx, &name_filter("deploy"))
        .unwrap();
    assert_eq!(templates.count, 1);

    // Launch with an override.
    let launch = client
        .job_templates()
        .launch(&ctx, template.id, &payload(json!({"limit": "web1"})))
        .unwrap();
    assert!(launch.job > 0);
    assert_eq!(launch.status, Some(JobStatus::Pending));

    let job = client.jobs().get_job(&ctx, launch.job, &QueryParams::new()).unwrap();
    assert_eq!(job.id, launch.job);
    assert_eq!(job.status, JobStatus::New);
    assert_eq!(job.limit, "web1");
    assert_eq!(job.job_template, Some(template.id));

    let summaries = client
        .jobs()
        .get_host_summaries(&ctx, launch.job, &QueryParams::new())
        .unwrap();
    assert_eq!(summaries.count, 1);
    assert_eq!(summaries.results[0].host_name, "web1");

    let events = client
        .jobs()
        .get_job_events(&ctx, launch.job, &QueryParams::new())
        .unwrap();
    assert_eq!(events.results.last().map(|e| e.event.as_str()), Some("playbook_on_stats"));

    // Cancel answers 202 with no body.
    let cancel = client
        .jobs()
        .cancel_job(&ctx, launch.job, &awx_core::Payload::new())
        .unwrap();
    assert!(!cancel.can_cancel);
    assert_eq!(with_store(&db, |s| s.jobs[&launch.job].status.clone()), "canceled");

    // Cancelling again is refused.
    let err = client
        .jobs()
        .cancel_job(&ctx, launch.job, &awx_core::Payload::new())
        .unwrap_err();
    assert_eq!(err.status_code(), Some(405));

    let relaunch = client
        .jobs()
        .relaunch_job(&ctx, launch.job, &awx_core::Payload::new())
        .unwrap();
    assert!(relaunch.job > launch.job);

    client.job_templates().delete_job_template(&ctx, template.id).unwrap();
    let err = client
        .job_templates()
        .launch(&ctx, template.id, &awx_core::Payload::new())
        .unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn waits_for_launched_job_to_succeed() {
    let (base, db) = spawn_mock();
    let client = mock_client(&base);
    let ctx = Context::background();

    let inventory = client
        .inventories()
        .create_inventory(&ctx, &payload(json!({"name": "prod", "organization": 1})))
        .unwrap();
    let template = client
        .job_templates()
        .create_job_template(
            &ctx,
            &payload(json!({"name": "deploy", "job_type": "run", "inventory": inventory.id, "project": 3})),
        )
        .unwrap();
    let launch = client
        .job_templates()
        .launch(&ctx, template.id, &awx_core::Payload::new())
        .unwrap();

    // new -> pending -> running -> successful
    wait_for_success_job_finish_with(
        &fast_poller(),
        &ctx,
        &client,
        launch.job,
        Some(Duration::from_secs(10)),
    )
    .unwrap();
    assert_eq!(with_store(&db, |s| s.jobs[&launch.job].status.clone()), "successful");
    assert_eq!(with_store(&db, |s| s.job_polls[&launch.job]), 4);
}

#[test]
fn failed_job_is_reported_with_its_status() {
    let (base, db) = spawn_mock();
    let client = mock_client(&base);
    let id = with_store(&db, |s| {
        let id = s.insert_job("deploy", "new");
        s.script_job(id, &["pending", "failed"]);
        id
    });

    let err = wait_for_success_job_finish_with(
        &fast_poller(),
        &Context::background(),
        &client,
        id,
        Some(Duration::from_secs(10)),
    )
    .unwrap_err();
    assert!(matches!(err, ApiError::JobFailed(JobStatus::Failed)), "{err}");
    assert_eq!(err.to_string(), "task finished with bad status: failed");
    assert_eq!(with_store(&db, |s| s.job_polls[&id]), 3);
}

#[test]
fn missing_job_stops_the_wait_with_the_http_error() {
    let (base, _db) = spawn_mock();
    let client = mock_client(&base);

    let err = wait_for_success_job_finish_with(
        &fast_poller(),
        &Context::background(),
        &client,
        12345,
        Some(Duration::from_secs(10)),
    )
    .unwrap_err();
    assert!(err.is_not_found(), "{err}");
}

// ---------------------------------------------------------------------------
// Credentials and validation
// ---------------------------------------------------------------------------

#[test]
fn token_credentials_are_accepted() {
    let (base, _db) = spawn_mock();
    let client = Client::with_token(&base, mock_server::DEFAULT_TOKEN).unwrap();
    let orgs = client
        .organizations()
        .list_organizations(&Context::background(), &QueryParams::new())
        .unwrap();
    assert_eq!(orgs.results[0].name, "Default");
}

#[test]
fn wrong_password_surfaces_401_with_raw_body() {
    let (base, _db) = spawn_mock();
    let client = Client::new(&base, "admin", "nope").unwrap();
    let err = client
        .organizations()
        .list_organizations(&Context::background(), &QueryParams::new())
        .unwrap_err();
    match err {
        ApiError::HttpError { status, body } => {
            assert_eq!(status, 401);
            assert!(body.contains("Authentication credentials were not provided."));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn validation_fails_before_any_request() {
    // Nothing listens on the discard port; reaching the network would fail
    // with a different error.
    let client = Client::new("http://127.0.0.1:9", "admin", "password").unwrap();
    let ctx = Context::background();

    let err = client
        .job_templates()
        .create_job_template(&ctx, &payload(json!({"name": "deploy", "inventory": 1})))
        .unwrap_err();
    match err {
        ApiError::ValidationError { missing } => assert_eq!(missing, vec!["job_type", "project"]),
        other => panic!("unexpected error: {other:?}"),
    }

    let err = client
        .hosts()
        .create_host(&ctx, &payload(json!({"inventory": 1})))
        .unwrap_err();
    assert!(matches!(err, ApiError::ValidationError { .. }));

    let err = client
        .hosts()
        .associate_group(&ctx, 5, &awx_core::Payload::new())
        .unwrap_err();
    match err {
        ApiError::ValidationError { missing } => assert_eq!(missing, vec!["id"]),
        other => panic!("unexpected error: {other:?}"),
    }
}
