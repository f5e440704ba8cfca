//! Host endpoints.

use serde_json::Value;

use crate::context::Context;
use crate::error::Result;
use crate::transport::Transport;
use crate::types::{Host, Page, Payload, QueryParams};
use crate::validation::validate_params;

const ENDPOINT: &str = "/api/v2/hosts/";

#[derive(Debug, Clone, Copy)]
pub struct HostService<'a> {
    transport: &'a Transport,
}

impl<'a> HostService<'a> {
    pub(crate) fn new(transport: &'a Transport) -> Self {
        Self { transport }
    }

    pub fn list_hosts(&self, ctx: &Context, params: &QueryParams) -> Result<Page<Host>> {
        Ok(self.transport.get(ctx, ENDPOINT, params)?.unwrap_or_default())
    }

    /// Create a host. `name` and `inventory` are required; `description`,
    /// `enabled`, `instance_id` and `variables` are optional.
    pub fn create_host(&self, ctx: &Context, data: &Payload) -> Result<Host> {
        validate_params(data, &["name", "inventory"])?;
        Ok(self
            .transport
            .post(ctx, ENDPOINT, Some(data))?
            .unwrap_or_default())
    }

    pub fn update_host(&self, ctx: &Context, id: i64, data: &Payload) -> Result<Host> {
        let endpoint = format!("{ENDPOINT}{id}");
        Ok(self
            .transport
            .patch(ctx, &endpoint, Some(data))?
            .unwrap_or_default())
    }

    pub fn delete_host(&self, ctx: &Context, id: i64) -> Result<()> {
        self.transport.delete(ctx, &format!("{ENDPOINT}{id}"))
    }

    /// Add host `id` to the group named by `data["id"]`.
    pub fn associate_group(&self, ctx: &Context, id: i64, data: &Payload) -> Result<Host> {
        self.change_group(ctx, id, data, "associate")
    }

    /// Remove host `id` from the group named by `data["id"]`.
    pub fn disassociate_group(&self, ctx: &Context, id: i64, data: &Payload) -> Result<Host> {
        self.change_group(ctx, id, data, "disassociate")
    }

    fn change_group(&self, ctx: &Context, id: i64, data: &Payload, flag: &str) -> Result<Host> {
        validate_params(data, &["id"])?;
        let mut body = data.clone();
        body.insert(flag.to_string(), Value::Bool(true));
        let endpoint = format!("{ENDPOINT}{id}/groups/");
        Ok(self
            .transport
            .post(ctx, &endpoint, Some(&body))?
            .unwrap_or_default())
    }
}
