//! In-memory imitation of the AWX `/api/v2/` API.
//!
//! Covers the job template, job, inventory, host, group and organization
//! routes the client uses, with the same trailing-slash routing, list
//! envelope, error bodies and authentication checks. Job status progression
//! is scripted: every GET of a job returns its current status and then
//! advances it one step along the job's script.

use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};
use std::sync::Arc;

use axum::{
    extract::{Path, Query, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};

pub const DEFAULT_USERNAME: &str = "admin";
pub const DEFAULT_PASSWORD: &str = "password";
pub const DEFAULT_TOKEN: &str = "test-token";

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct JobTemplate {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub job_type: String,
    pub inventory: i64,
    pub project: i64,
    pub playbook: String,
    pub limit: String,
    pub extra_vars: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Job {
    pub id: i64,
    pub name: String,
    pub status: String,
    pub failed: bool,
    pub job_template: i64,
    pub inventory: i64,
    pub limit: String,
    pub extra_vars: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Inventory {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub organization: i64,
    pub kind: String,
    pub variables: String,
    pub total_hosts: i64,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Host {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub inventory: i64,
    pub enabled: bool,
    pub instance_id: String,
    pub variables: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Group {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub inventory: i64,
    pub variables: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Organization {
    pub id: i64,
    pub name: String,
    pub description: String,
}

/// Server-side state shared by all handlers.
#[derive(Debug)]
pub struct Store {
    next_id: i64,
    /// Authorization header values that are let through.
    pub accepted_auth: Vec<String>,
    /// Statuses a freshly launched job walks through after `new`.
    pub launch_script: Vec<String>,
    pub job_templates: BTreeMap<i64, JobTemplate>,
    pub jobs: BTreeMap<i64, Job>,
    pub job_scripts: HashMap<i64, VecDeque<String>>,
    /// Number of GETs served per job.
    pub job_polls: HashMap<i64, u32>,
    pub inventories: BTreeMap<i64, Inventory>,
    pub hosts: BTreeMap<i64, Host>,
    pub groups: BTreeMap<i64, Group>,
    pub group_hosts: BTreeMap<i64, BTreeSet<i64>>,
    pub group_children: BTreeMap<i64, BTreeSet<i64>>,
    pub organizations: BTreeMap<i64, Organization>,
}

impl Default for Store {
    fn default() -> Self {
        Self::with_credentials(DEFAULT_USERNAME, DEFAULT_PASSWORD, DEFAULT_TOKEN)
    }
}

impl Store {
    pub fn with_credentials(username: &str, password: &str, token: &str) -> Self {
        let basic = STANDARD.encode(format!("{username}:{password}"));
        let mut organizations = BTreeMap::new();
        organizations.insert(
            1,
            Organization {
                id: 1,
                name: "Default".to_string(),
                description: String::new(),
            },
        );
        Self {
            next_id: 100,
            accepted_auth: vec![format!("Basic {basic}"), format!("Bearer {token}")],
            launch_script: ["pending", "running", "successful"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            job_templates: BTreeMap::new(),
            jobs: BTreeMap::new(),
            job_scripts: HashMap::new(),
            job_polls: HashMap::new(),
            inventories: BTreeMap::new(),
            hosts: BTreeMap::new(),
            groups: BTreeMap::new(),
            group_hosts: BTreeMap::new(),
            group_children: BTreeMap::new(),
            organizations,
        }
    }

    fn allocate_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    /// Replace the statuses job `id` will move through on subsequent GETs.
    pub fn script_job(&mut self, id: i64, statuses: &[&str]) {
        self.job_scripts
            .insert(id, statuses.iter().map(|s| s.to_string()).collect());
    }

    /// Insert a job directly, bypassing launch.
    pub fn insert_job(&mut self, name: &str, status: &str) -> i64 {
        let id = self.allocate_id();
        self.jobs.insert(
            id,
            Job {
                id,
                name: name.to_string(),
                status: status.to_string(),
                ..Job::default()
            },
        );
        id
    }
}

pub type Db = Arc<RwLock<Store>>;

type Failure = (StatusCode, Json<Value>);
type Reply = Result<Response, Failure>;

pub fn app() -> Router {
    app_with_state(Arc::new(RwLock::new(Store::default())))
}

pub fn app_with_state(db: Db) -> Router {
    Router::new()
        .route(
            "/api/v2/job_templates/",
            get(list_job_templates).post(create_job_template),
        )
        .route(
            "/api/v2/job_templates/{id}/",
            get(get_job_template)
                .patch(update_job_template)
                .delete(delete_job_template),
        )
        .route("/api/v2/job_templates/{id}/launch/", post(launch_job_template))
        .route("/api/v2/jobs/{id}/", get(get_job))
        .route("/api/v2/jobs/{id}/cancel/", post(cancel_job))
        .route("/api/v2/jobs/{id}/relaunch/", post(relaunch_job))
        .route("/api/v2/jobs/{id}/job_host_summaries/", get(job_host_summaries))
        .route("/api/v2/jobs/{id}/job_events/", get(job_events))
        .route(
            "/api/v2/inventories/",
            get(list_inventories).post(create_inventory),
        )
        .route(
            "/api/v2/inventories/{id}/",
            get(get_inventory)
                .patch(update_inventory)
                .delete(delete_inventory),
        )
        .route(
            "/api/v2/inventories/{id}/update_inventory_sources/",
            post(update_inventory_sources),
        )
        .route("/api/v2/inventories/{id}/groups/", get(inventory_groups))
        .route("/api/v2/hosts/", get(list_hosts).post(create_host))
        .route(
            "/api/v2/hosts/{id}/",
            get(get_host).patch(update_host).delete(delete_host),
        )
        .route("/api/v2/hosts/{id}/groups/", post(host_groups))
        .route("/api/v2/groups/", get(list_groups).post(create_group))
        .route(
            "/api/v2/groups/{id}/",
            get(get_group).patch(update_group).delete(delete_group),
        )
        .route("/api/v2/groups/{id}/hosts/", post(group_add_host))
        .route("/api/v2/groups/{id}/children/", post(group_add_child))
        .route("/api/v2/organizations/", get(list_organizations))
        .layer(middleware::from_fn_with_state(db.clone(), require_auth))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

pub async fn run_with_state(listener: TcpListener, db: Db) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_state(db)).await
}

async fn require_auth(State(db): State<Db>, request: Request, next: Next) -> Response {
    let presented = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let allowed = match presented {
        Some(value) => db.read().await.accepted_auth.contains(&value),
        None => false,
    };
    if !allowed {
        tracing::debug!(uri = %request.uri(), "rejecting unauthenticated request");
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"detail": "Authentication credentials were not provided."})),
        )
            .into_response();
    }
    next.run(request).await
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn not_found() -> Failure {
    (StatusCode::NOT_FOUND, Json(json!({"detail": "Not found."})))
}

fn bad_request(body: Value) -> Failure {
    (StatusCode::BAD_REQUEST, Json(body))
}

fn reply<T: Serialize>(status: StatusCode, value: &T) -> Reply {
    Ok((status, Json(value)).into_response())
}

#[derive(Serialize)]
struct PageBody<T> {
    count: usize,
    next: Option<String>,
    previous: Option<String>,
    results: Vec<T>,
}

fn page<T: Serialize>(results: Vec<T>) -> Reply {
    reply(
        StatusCode::OK,
        &PageBody {
            count: results.len(),
            next: None,
            previous: None,
            results,
        },
    )
}

fn require_fields(body: &Value, fields: &[&str]) -> Result<(), Failure> {
    let missing: serde_json::Map<String, Value> = fields
        .iter()
        .filter(|f| body.get(**f).is_none())
        .map(|f| (f.to_string(), json!(["This field is required."])))
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(bad_request(Value::Object(missing)))
    }
}

/// Copy known fields of `patch` over `current`. `id` is only taken from
/// `id`, never from the request.
fn overlay<T: Serialize + DeserializeOwned>(current: &T, patch: &Value, id: i64) -> Result<T, Failure> {
    let mut value = serde_json::to_value(current)
        .map_err(|e| bad_request(json!({"detail": e.to_string()})))?;
    if let (Some(target), Some(fields)) = (value.as_object_mut(), patch.as_object()) {
        for (key, field) in fields {
            if key != "id" && target.contains_key(key) {
                target.insert(key.clone(), field.clone());
            }
        }
        target.insert("id".to_string(), json!(id));
    }
    serde_json::from_value(value).map_err(|e| bad_request(json!({"detail": e.to_string()})))
}

fn name_filter<'a, T, F>(items: impl Iterator<Item = &'a T>, query: &HashMap<String, String>, name: F) -> Vec<T>
where
    T: Clone + 'a,
    F: Fn(&T) -> &str,
{
    items
        .filter(|item| query.get("name").map_or(true, |wanted| name(item) == wanted.as_str()))
        .cloned()
        .collect()
}

// ---------------------------------------------------------------------------
// Job templates
// ---------------------------------------------------------------------------

async fn list_job_templates(
    State(db): State<Db>,
    Query(query): Query<HashMap<String, String>>,
) -> Reply {
    let store = db.read().await;
    page(name_filter(store.job_templates.values(), &query, |t| t.name.as_str()))
}

async fn create_job_template(State(db): State<Db>, Json(body): Json<Value>) -> Reply {
    require_fields(&body, &["name", "job_type", "inventory", "project"])?;
    let mut store = db.write().await;
    let id = store.allocate_id();
    let template: JobTemplate = overlay(&JobTemplate::default(), &body, id)?;
    store.job_templates.insert(id, template.clone());
    reply(StatusCode::CREATED, &template)
}

async fn get_job_template(State(db): State<Db>, Path(id): Path<i64>) -> Reply {
    let store = db.read().await;
    let template = store.job_templates.get(&id).ok_or_else(not_found)?;
    reply(StatusCode::OK, template)
}

async fn update_job_template(
    State(db): State<Db>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Reply {
    let mut store = db.write().await;
    let current = store.job_templates.get(&id).ok_or_else(not_found)?;
    let updated = overlay(current, &body, id)?;
    store.job_templates.insert(id, updated.clone());
    reply(StatusCode::OK, &updated)
}

async fn delete_job_template(State(db): State<Db>, Path(id): Path<i64>) -> Reply {
    let mut store = db.write().await;
    store.job_templates.remove(&id).ok_or_else(not_found)?;
    Ok(StatusCode::NO_CONTENT.into_response())
}

async fn launch_job_template(
    State(db): State<Db>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Reply {
    let mut store = db.write().await;
    let template = store.job_templates.get(&id).cloned().ok_or_else(not_found)?;
    let job_id = store.allocate_id();
    let limit = body
        .get("limit")
        .and_then(Value::as_str)
        .map_or(template.limit.clone(), str::to_string);
    store.jobs.insert(
        job_id,
        Job {
            id: job_id,
            name: template.name.clone(),
            status: "new".to_string(),
            failed: false,
            job_template: id,
            inventory: template.inventory,
            limit,
            extra_vars: template.extra_vars.clone(),
        },
    );
    let script = store.launch_script.clone();
    store.job_scripts.insert(job_id, script.into());
    tracing::info!(template = id, job = job_id, "launched job");
    reply(
        StatusCode::CREATED,
        &json!({"job": job_id, "id": job_id, "status": "pending", "ignored_fields": {}}),
    )
}

// ---------------------------------------------------------------------------
// Jobs
// ---------------------------------------------------------------------------

async fn get_job(State(db): State<Db>, Path(id): Path<i64>) -> Reply {
    let mut store = db.write().await;
    let job = store.jobs.get(&id).cloned().ok_or_else(not_found)?;
    *store.job_polls.entry(id).or_default() += 1;
    if let Some(next) = store.job_scripts.get_mut(&id).and_then(VecDeque::pop_front) {
        if let Some(stored) = store.jobs.get_mut(&id) {
            stored.failed = matches!(next.as_str(), "failed" | "error");
            stored.status = next;
        }
    }
    reply(StatusCode::OK, &job)
}

async fn cancel_job(State(db): State<Db>, Path(id): Path<i64>) -> Reply {
    let mut store = db.write().await;
    let job = store.jobs.get_mut(&id).ok_or_else(not_found)?;
    if matches!(job.status.as_str(), "successful" | "failed" | "error" | "canceled") {
        return Err((
            StatusCode::METHOD_NOT_ALLOWED,
            Json(json!({"error": "Not allowed to cancel this job."})),
        ));
    }
    job.status = "canceled".to_string();
    store.job_scripts.remove(&id);
    Ok(StatusCode::ACCEPTED.into_response())
}

async fn relaunch_job(State(db): State<Db>, Path(id): Path<i64>) -> Reply {
    let mut store = db.write().await;
    let original = store.jobs.get(&id).cloned().ok_or_else(not_found)?;
    let job_id = store.allocate_id();
    store.jobs.insert(
        job_id,
        Job {
            id: job_id,
            status: "pending".to_string(),
            failed: false,
            ..original
        },
    );
    reply(
        StatusCode::CREATED,
        &json!({"job": job_id, "id": job_id, "status": "pending"}),
    )
}

async fn job_host_summaries(State(db): State<Db>, Path(id): Path<i64>) -> Reply {
    let store = db.read().await;
    let job = store.jobs.get(&id).ok_or_else(not_found)?;
    let failed = job.failed;
    let summaries: Vec<Value> = store
        .hosts
        .values()
        .filter(|h| h.inventory == job.inventory)
        .map(|h| {
            json!({
                "id": h.id * 1000 + id,
                "job": id,
                "host": h.id,
                "host_name": h.name,
                "ok": if failed { 0 } else { 1 },
                "failures": if failed { 1 } else { 0 },
                "changed": 0,
                "dark": 0,
                "skipped": 0,
                "processed": 1,
                "failed": failed,
            })
        })
        .collect();
    page(summaries)
}

async fn job_events(State(db): State<Db>, Path(id): Path<i64>) -> Reply {
    let store = db.read().await;
    let job = store.jobs.get(&id).ok_or_else(not_found)?;
    page(vec![
        json!({"id": id * 10 + 1, "job": id, "counter": 1, "event": "playbook_on_start",
               "event_display": "Playbook Started", "stdout": ""}),
        json!({"id": id * 10 + 2, "job": id, "counter": 2, "event": "playbook_on_stats",
               "event_display": "Playbook Complete", "stdout": "",
               "failed": job.failed}),
    ])
}

// ---------------------------------------------------------------------------
// Inventories
// ---------------------------------------------------------------------------

async fn list_inventories(
    State(db): State<Db>,
    Query(query): Query<HashMap<String, String>>,
) -> Reply {
    let store = db.read().await;
    page(name_filter(store.inventories.values(), &query, |i| i.name.as_str()))
}

async fn create_inventory(State(db): State<Db>, Json(body): Json<Value>) -> Reply {
    require_fields(&body, &["name", "organization"])?;
    let mut store = db.write().await;
    let id = store.allocate_id();
    let mut inventory: Inventory = overlay(&Inventory::default(), &body, id)?;
    if !store.organizations.contains_key(&inventory.organization) {
        return Err(bad_request(
            json!({"organization": ["Invalid pk - object does not exist."]}),
        ));
    }
    inventory.total_hosts = 0;
    store.inventories.insert(id, inventory.clone());
    reply(StatusCode::CREATED, &inventory)
}

async fn get_inventory(State(db): State<Db>, Path(id): Path<i64>) -> Reply {
    let store = db.read().await;
    let mut inventory = store.inventories.get(&id).cloned().ok_or_else(not_found)?;
    inventory.total_hosts = store.hosts.values().filter(|h| h.inventory == id).count() as i64;
    reply(StatusCode::OK, &inventory)
}

async fn update_inventory(
    State(db): State<Db>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Reply {
    let mut store = db.write().await;
    let current = store.inventories.get(&id).ok_or_else(not_found)?;
    let updated = overlay(current, &body, id)?;
    store.inventories.insert(id, updated.clone());
    reply(StatusCode::OK, &updated)
}

async fn delete_inventory(State(db): State<Db>, Path(id): Path<i64>) -> Reply {
    let mut store = db.write().await;
    store.inventories.remove(&id).ok_or_else(not_found)?;
    store.hosts.retain(|_, h| h.inventory != id);
    store.groups.retain(|_, g| g.inventory != id);
    Ok(StatusCode::NO_CONTENT.into_response())
}

async fn update_inventory_sources(State(db): State<Db>, Path(id): Path<i64>) -> Reply {
    let mut store = db.write().await;
    if !store.inventories.contains_key(&id) {
        return Err(not_found());
    }
    let update = store.allocate_id();
    reply(
        StatusCode::ACCEPTED,
        &json!([{
            "id": update,
            "inventory_update": update,
            "inventory_source": id * 10,
            "status": "pending",
        }]),
    )
}

async fn inventory_groups(State(db): State<Db>, Path(id): Path<i64>) -> Reply {
    let store = db.read().await;
    if !store.inventories.contains_key(&id) {
        return Err(not_found());
    }
    page(
        store
            .groups
            .values()
            .filter(|g| g.inventory == id)
            .cloned()
            .collect(),
    )
}

// ---------------------------------------------------------------------------
// Hosts
// ---------------------------------------------------------------------------

async fn list_hosts(
    State(db): State<Db>,
    Query(query): Query<HashMap<String, String>>,
) -> Reply {
    let store = db.read().await;
    page(name_filter(store.hosts.values(), &query, |h| h.name.as_str()))
}

fn insert_host(store: &mut Store, body: &Value) -> Result<Host, Failure> {
    require_fields(body, &["name", "inventory"])?;
    let id = store.allocate_id();
    let mut host: Host = overlay(
        &Host {
            enabled: true,
            ..Host::default()
        },
        body,
        id,
    )?;
    if !store.inventories.contains_key(&host.inventory) {
        return Err(bad_request(
            json!({"inventory": ["Invalid pk - object does not exist."]}),
        ));
    }
    if store
        .hosts
        .values()
        .any(|h| h.inventory == host.inventory && h.name == host.name)
    {
        return Err(bad_request(
            json!({"__all__": ["Host with this Name and Inventory already exists."]}),
        ));
    }
    host.id = id;
    store.hosts.insert(id, host.clone());
    Ok(host)
}

async fn create_host(State(db): State<Db>, Json(body): Json<Value>) -> Reply {
    let mut store = db.write().await;
    let host = insert_host(&mut store, &body)?;
    reply(StatusCode::CREATED, &host)
}

async fn get_host(State(db): State<Db>, Path(id): Path<i64>) -> Reply {
    let store = db.read().await;
    let host = store.hosts.get(&id).ok_or_else(not_found)?;
    reply(StatusCode::OK, host)
}

async fn update_host(State(db): State<Db>, Path(id): Path<i64>, Json(body): Json<Value>) -> Reply {
    let mut store = db.write().await;
    let current = store.hosts.get(&id).ok_or_else(not_found)?;
    let updated = overlay(current, &body, id)?;
    store.hosts.insert(id, updated.clone());
    reply(StatusCode::OK, &updated)
}

async fn delete_host(State(db): State<Db>, Path(id): Path<i64>) -> Reply {
    let mut store = db.write().await;
    store.hosts.remove(&id).ok_or_else(not_found)?;
    for members in store.group_hosts.values_mut() {
        members.remove(&id);
    }
    Ok(StatusCode::NO_CONTENT.into_response())
}

async fn host_groups(State(db): State<Db>, Path(id): Path<i64>, Json(body): Json<Value>) -> Reply {
    let mut store = db.write().await;
    if !store.hosts.contains_key(&id) {
        return Err(not_found());
    }
    let group = body
        .get("id")
        .and_then(Value::as_i64)
        .ok_or_else(|| bad_request(json!({"msg": "\"id\" is required to disassociate"})))?;
    if !store.groups.contains_key(&group) {
        return Err(bad_request(json!({"msg": "Object with id does not exist."})));
    }
    let flag = |name: &str| body.get(name).and_then(Value::as_bool).unwrap_or(false);
    let members = store.group_hosts.entry(group).or_default();
    if flag("disassociate") {
        members.remove(&id);
    } else {
        members.insert(id);
    }
    Ok(StatusCode::NO_CONTENT.into_response())
}

// ---------------------------------------------------------------------------
// Groups
// ---------------------------------------------------------------------------

async fn list_groups(
    State(db): State<Db>,
    Query(query): Query<HashMap<String, String>>,
) -> Reply {
    let store = db.read().await;
    page(name_filter(store.groups.values(), &query, |g| g.name.as_str()))
}

async fn create_group(State(db): State<Db>, Json(body): Json<Value>) -> Reply {
    require_fields(&body, &["name", "inventory"])?;
    let mut store = db.write().await;
    let id = store.allocate_id();
    let group: Group = overlay(&Group::default(), &body, id)?;
    if !store.inventories.contains_key(&group.inventory) {
        return Err(bad_request(
            json!({"inventory": ["Invalid pk - object does not exist."]}),
        ));
    }
    store.groups.insert(id, group.clone());
    reply(StatusCode::CREATED, &group)
}

async fn get_group(State(db): State<Db>, Path(id): Path<i64>) -> Reply {
    let store = db.read().await;
    let group = store.groups.get(&id).ok_or_else(not_found)?;
    reply(StatusCode::OK, group)
}

async fn update_group(State(db): State<Db>, Path(id): Path<i64>, Json(body): Json<Value>) -> Reply {
    let mut store = db.write().await;
    let current = store.groups.get(&id).ok_or_else(not_found)?;
    let updated = overlay(current, &body, id)?;
    store.groups.insert(id, updated.clone());
    reply(StatusCode::OK, &updated)
}

async fn delete_group(State(db): State<Db>, Path(id): Path<i64>) -> Reply {
    let mut store = db.write().await;
    store.groups.remove(&id).ok_or_else(not_found)?;
    store.group_hosts.remove(&id);
    store.group_children.remove(&id);
    Ok(StatusCode::NO_CONTENT.into_response())
}

async fn group_add_host(State(db): State<Db>, Path(id): Path<i64>, Json(body): Json<Value>) -> Reply {
    let mut store = db.write().await;
    if !store.groups.contains_key(&id) {
        return Err(not_found());
    }
    let host = insert_host(&mut store, &body)?;
    store.group_hosts.entry(id).or_default().insert(host.id);
    reply(StatusCode::CREATED, &host)
}

async fn group_add_child(State(db): State<Db>, Path(id): Path<i64>, Json(body): Json<Value>) -> Reply {
    let mut store = db.write().await;
    if !store.groups.contains_key(&id) {
        return Err(not_found());
    }
    let child = body
        .get("id")
        .and_then(Value::as_i64)
        .filter(|child| store.groups.contains_key(child))
        .ok_or_else(|| bad_request(json!({"msg": "Object with id does not exist."})))?;
    if child == id {
        return Err(bad_request(json!({"error": "Cyclical Group association."})));
    }
    store.group_children.entry(id).or_default().insert(child);
    Ok(StatusCode::NO_CONTENT.into_response())
}

// ---------------------------------------------------------------------------
// Organizations
// ---------------------------------------------------------------------------

async fn list_organizations(
    State(db): State<Db>,
    Query(query): Query<HashMap<String, String>>,
) -> Reply {
    let store = db.read().await;
    page(name_filter(store.organizations.values(), &query, |o| o.name.as_str()))
}
