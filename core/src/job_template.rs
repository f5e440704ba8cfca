//! Job template endpoints.

use crate::context::Context;
use crate::error::{ApiError, Result};
use crate::transport::Transport;
use crate::types::{JobLaunch, JobTemplate, Page, Payload, QueryParams};
use crate::validation::validate_params;

const ENDPOINT: &str = "/api/v2/job_templates/";

#[derive(Debug, Clone, Copy)]
pub struct JobTemplateService<'a> {
    transport: &'a Transport,
}

impl<'a> JobTemplateService<'a> {
    pub(crate) fn new(transport: &'a Transport) -> Self {
        Self { transport }
    }

    pub fn list_job_templates(
        &self,
        ctx: &Context,
        params: &QueryParams,
    ) -> Result<Page<JobTemplate>> {
        Ok(self.transport.get(ctx, ENDPOINT, params)?.unwrap_or_default())
    }

    /// Launch a job from template `id`.
    ///
    /// `data` may carry launch-time overrides such as `limit`, `extra_vars`,
    /// `inventory`, `job_tags` or `verbosity`, provided the template prompts
    /// for them. A reply without a job id is treated as a failed launch.
    pub fn launch(&self, ctx: &Context, id: i64, data: &Payload) -> Result<JobLaunch> {
        let endpoint = format!("{ENDPOINT}{id}/launch/");
        let launch: JobLaunch = self
            .transport
            .post(ctx, &endpoint, Some(data))?
            .unwrap_or_default();
        if launch.job == 0 {
            return Err(ApiError::InvalidJobId(launch.job));
        }
        Ok(launch)
    }

    /// Create a job template. `name`, `job_type`, `inventory` and `project`
    /// are required.
    pub fn create_job_template(&self, ctx: &Context, data: &Payload) -> Result<JobTemplate> {
        validate_params(data, &["name", "job_type", "inventory", "project"])?;
        Ok(self
            .transport
            .post(ctx, ENDPOINT, Some(data))?
            .unwrap_or_default())
    }

    pub fn update_job_template(&self, ctx: &Context, id: i64, data: &Payload) -> Result<JobTemplate> {
        let endpoint = format!("{ENDPOINT}{id}");
        Ok(self
            .transport
            .patch(ctx, &endpoint, Some(data))?
            .unwrap_or_default())
    }

    pub fn delete_job_template(&self, ctx: &Context, id: i64) -> Result<()> {
        self.transport.delete(ctx, &format!("{ENDPOINT}{id}"))
    }
}
