//! Job endpoints and the job-completion waiter.

use std::time::Duration;

use crate::client::Client;
use crate::context::Context;
use crate::error::{ApiError, Result};
use crate::poll::Poller;
use crate::transport::Transport;
use crate::types::{
    CancelJobResponse, HostSummary, Job, JobEvent, JobLaunch, JobStatus, Page, Payload,
    QueryParams,
};

#[derive(Debug, Clone, Copy)]
pub struct JobService<'a> {
    transport: &'a Transport,
}

impl<'a> JobService<'a> {
    pub(crate) fn new(transport: &'a Transport) -> Self {
        Self { transport }
    }

    pub fn get_job(&self, ctx: &Context, id: i64, params: &QueryParams) -> Result<Job> {
        let endpoint = format!("/api/v2/jobs/{id}/");
        Ok(self.transport.get(ctx, &endpoint, params)?.unwrap_or_default())
    }

    /// Request cancellation. AWX answers 202 with an empty body, so the
    /// returned value is usually the default.
    pub fn cancel_job(&self, ctx: &Context, id: i64, data: &Payload) -> Result<CancelJobResponse> {
        let endpoint = format!("/api/v2/jobs/{id}/cancel/");
        Ok(self
            .transport
            .post(ctx, &endpoint, Some(data))?
            .unwrap_or_default())
    }

    pub fn relaunch_job(&self, ctx: &Context, id: i64, data: &Payload) -> Result<JobLaunch> {
        let endpoint = format!("/api/v2/jobs/{id}/relaunch/");
        Ok(self
            .transport
            .post(ctx, &endpoint, Some(data))?
            .unwrap_or_default())
    }

    pub fn get_host_summaries(
        &self,
        ctx: &Context,
        id: i64,
        params: &QueryParams,
    ) -> Result<Page<HostSummary>> {
        let endpoint = format!("/api/v2/jobs/{id}/job_host_summaries/");
        Ok(self.transport.get(ctx, &endpoint, params)?.unwrap_or_default())
    }

    pub fn get_job_events(
        &self,
        ctx: &Context,
        id: i64,
        params: &QueryParams,
    ) -> Result<Page<JobEvent>> {
        let endpoint = format!("/api/v2/jobs/{id}/job_events/");
        Ok(self.transport.get(ctx, &endpoint, params)?.unwrap_or_default())
    }
}

/// Map a job status onto the poll outcome: done, keep waiting, or failed.
pub fn check_job_status(status: JobStatus) -> Result<bool> {
    match status {
        JobStatus::Successful => Ok(true),
        JobStatus::Failed | JobStatus::Error | JobStatus::Canceled => {
            Err(ApiError::JobFailed(status))
        }
        JobStatus::New
        | JobStatus::Pending
        | JobStatus::Waiting
        | JobStatus::Running
        | JobStatus::Unknown => Ok(false),
    }
}

/// Block until job `id` finishes successfully.
///
/// Fails with `JobFailed` when the job ends `failed`, `error` or `canceled`,
/// and with `Timeout` when `timeout` elapses first. `None` waits until the
/// job reaches a terminal status.
pub fn wait_for_success_job_finish(
    client: &Client,
    id: i64,
    timeout: Option<Duration>,
) -> Result<()> {
    wait_for_success_job_finish_with(&Poller::new(), &Context::background(), client, id, timeout)
}

/// [`wait_for_success_job_finish`] with an explicit poller and parent context.
pub fn wait_for_success_job_finish_with(
    poller: &Poller,
    ctx: &Context,
    client: &Client,
    id: i64,
    timeout: Option<Duration>,
) -> Result<()> {
    let client = client.clone();
    poller.wait(ctx, timeout, move |tick| {
        let job = client.jobs().get_job(tick, id, &QueryParams::new())?;
        check_job_status(job.status)
    })
}
