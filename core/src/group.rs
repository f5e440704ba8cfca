//! Group endpoints.

use serde::de::IgnoredAny;
use serde_json::json;

use crate::context::Context;
use crate::error::Result;
use crate::transport::Transport;
use crate::types::{Group, Page, Payload, QueryParams};
use crate::validation::validate_params;

const ENDPOINT: &str = "/api/v2/groups/";

#[derive(Debug, Clone, Copy)]
pub struct GroupService<'a> {
    transport: &'a Transport,
}

impl<'a> GroupService<'a> {
    pub(crate) fn new(transport: &'a Transport) -> Self {
        Self { transport }
    }

    pub fn list_groups(&self, ctx: &Context, params: &QueryParams) -> Result<Page<Group>> {
        Ok(self.transport.get(ctx, ENDPOINT, params)?.unwrap_or_default())
    }

    /// Groups defined in inventory `inventory_id`.
    pub fn list_groups_by_inventory(&self, ctx: &Context, inventory_id: i64) -> Result<Page<Group>> {
        let endpoint = format!("/api/v2/inventories/{inventory_id}/groups/");
        Ok(self
            .transport
            .get(ctx, &endpoint, &QueryParams::new())?
            .unwrap_or_default())
    }

    pub fn create_group(&self, ctx: &Context, data: &Payload) -> Result<Group> {
        validate_params(data, &["name", "inventory"])?;
        Ok(self
            .transport
            .post(ctx, ENDPOINT, Some(data))?
            .unwrap_or_default())
    }

    pub fn update_group(&self, ctx: &Context, id: i64, data: &Payload) -> Result<Group> {
        let endpoint = format!("{ENDPOINT}{id}");
        Ok(self
            .transport
            .patch(ctx, &endpoint, Some(data))?
            .unwrap_or_default())
    }

    pub fn delete_group(&self, ctx: &Context, id: i64) -> Result<()> {
        self.transport.delete(ctx, &format!("{ENDPOINT}{id}"))
    }

    /// Create host `name` in `inventory_id` as a member of group `id`.
    pub fn add_host_to_group(
        &self,
        ctx: &Context,
        id: i64,
        inventory_id: i64,
        name: &str,
    ) -> Result<()> {
        let endpoint = format!("{ENDPOINT}{id}/hosts/");
        let payload = json!({ "inventory": inventory_id, "name": name });
        self.transport
            .post::<_, IgnoredAny>(ctx, &endpoint, Some(&payload))?;
        Ok(())
    }

    /// Nest group `child_id` under group `id`.
    pub fn add_child_to_group(&self, ctx: &Context, id: i64, child_id: i64) -> Result<Group> {
        let endpoint = format!("{ENDPOINT}{id}/children/");
        let payload = json!({ "id": child_id });
        Ok(self
            .transport
            .post(ctx, &endpoint, Some(&payload))?
            .unwrap_or_default())
    }
}
