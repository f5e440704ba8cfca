//! Domain DTOs for the AWX API.
//!
//! # Design
//! Response types mirror the fields AWX returns that callers commonly need.
//! Every struct is `#[serde(default)]` so a sparse or older server reply
//! still decodes, and unknown fields are ignored. Request bodies stay
//! free-form (`Payload`) because AWX accepts dozens of optional fields per
//! resource; required keys are checked by `validation::validate_params`.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Free-form JSON object sent as a create/update/launch body.
pub type Payload = serde_json::Map<String, serde_json::Value>;

/// Query-string parameters (filters, paging).
pub type QueryParams = BTreeMap<String, String>;

/// Lifecycle status of a job.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    #[default]
    New,
    Pending,
    Waiting,
    Running,
    Successful,
    Failed,
    Error,
    Canceled,
    /// Any status this client does not know. Treated as still in flight.
    #[serde(other)]
    Unknown,
}

impl JobStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::New => "new",
            JobStatus::Pending => "pending",
            JobStatus::Waiting => "waiting",
            JobStatus::Running => "running",
            JobStatus::Successful => "successful",
            JobStatus::Failed => "failed",
            JobStatus::Error => "error",
            JobStatus::Canceled => "canceled",
            JobStatus::Unknown => "unknown",
        }
    }

    /// A terminal job never changes status again.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            JobStatus::Successful | JobStatus::Failed | JobStatus::Error | JobStatus::Canceled
        )
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Paginated list envelope used by every AWX collection endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Page<T> {
    pub count: u64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            count: 0,
            next: None,
            previous: None,
            results: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobTemplate {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub job_type: String,
    pub inventory: Option<i64>,
    pub project: Option<i64>,
    pub playbook: String,
    pub limit: String,
    pub forks: i64,
    pub verbosity: i64,
    pub extra_vars: String,
    pub job_tags: String,
    pub skip_tags: String,
    pub timeout: i64,
    pub ask_limit_on_launch: bool,
    pub ask_variables_on_launch: bool,
    pub ask_inventory_on_launch: bool,
    pub survey_enabled: bool,
    pub allow_simultaneous: bool,
    pub status: String,
}

/// Reply to a launch or relaunch. `job` is the id of the spawned job.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobLaunch {
    pub job: i64,
    pub id: i64,
    pub status: Option<JobStatus>,
    pub ignored_fields: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Job {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub status: JobStatus,
    pub failed: bool,
    pub job_type: String,
    pub job_template: Option<i64>,
    pub inventory: Option<i64>,
    pub project: Option<i64>,
    pub limit: String,
    pub extra_vars: String,
    pub started: Option<String>,
    pub finished: Option<String>,
    pub elapsed: f64,
    pub job_explanation: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CancelJobResponse {
    pub can_cancel: bool,
}

/// Per-host outcome counters of a job run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostSummary {
    pub id: i64,
    pub job: i64,
    pub host: Option<i64>,
    pub host_name: String,
    pub changed: i64,
    pub dark: i64,
    pub failures: i64,
    pub ok: i64,
    pub processed: i64,
    pub skipped: i64,
    pub ignored: i64,
    pub rescued: i64,
    pub failed: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobEvent {
    pub id: i64,
    pub job: i64,
    pub event: String,
    pub counter: i64,
    pub event_display: String,
    pub stdout: String,
    pub host: Option<i64>,
    pub host_name: String,
    pub play: String,
    pub task: String,
    pub role: String,
    pub failed: bool,
    pub changed: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Inventory {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub organization: i64,
    pub kind: String,
    pub host_filter: Option<String>,
    pub variables: String,
    pub total_hosts: i64,
    pub total_groups: i64,
    pub has_inventory_sources: bool,
}

/// One inventory-source sync started by `update_inventory_sources`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryUpdate {
    pub id: i64,
    pub inventory_update: i64,
    pub inventory_source: i64,
    pub project_update: Option<i64>,
    pub status: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
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

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Group {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub inventory: i64,
    pub variables: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Organization {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub max_hosts: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_uses_lowercase_wire_names() {
        let status: JobStatus = serde_json::from_str(r#""canceled""#).unwrap();
        assert_eq!(status, JobStatus::Canceled);
        assert_eq!(serde_json::to_string(&JobStatus::Successful).unwrap(), r#""successful""#);
    }

    #[test]
    fn terminal_statuses() {
        let terminal: Vec<JobStatus> = [
            JobStatus::New,
            JobStatus::Pending,
            JobStatus::Waiting,
            JobStatus::Running,
            JobStatus::Successful,
            JobStatus::Failed,
            JobStatus::Error,
            JobStatus::Canceled,
        ]
        .into_iter()
        .filter(|s| s.is_terminal())
        .collect();
        assert_eq!(
            terminal,
            vec![
                JobStatus::Successful,
                JobStatus::Failed,
                JobStatus::Error,
                JobStatus::Canceled
            ]
        );
    }

    #[test]
    fn job_decodes_sparse_reply() {
        let job: Job = serde_json::from_str(r#"{"id": 3, "status": "running", "url": "/x"}"#).unwrap();
        assert_eq!(job.id, 3);
        assert_eq!(job.status, JobStatus::Running);
        assert!(job.finished.is_none());
    }

    #[test]
    fn page_decodes_results() {
        let page: Page<Host> = serde_json::from_str(
            r#"{"count": 1, "next": null, "previous": null,
                "results": [{"id": 9, "name": "web1", "inventory": 2, "enabled": true}]}"#,
        )
        .unwrap();
        assert_eq!(page.count, 1);
        assert_eq!(page.results[0].name, "web1");
        assert!(page.results[0].enabled);
    }

    #[test]
    fn unrecognised_status_decodes_as_unknown() {
        let job: Job = serde_json::from_str(r#"{"id": 1, "status": "exploded"}"#).unwrap();
        assert_eq!(job.status, JobStatus::Unknown);
        assert!(!job.status.is_terminal());
    }
}
