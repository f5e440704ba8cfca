use crate::context::Context;
use crate::error::Result;
use crate::transport::Transport;
use crate::types::{Inventory, InventoryUpdate, Page, Payload, QueryParams};
use crate::validation::validate_params;

const ENDPOINT: &str = "/api/v2/inventories/";

#[derive(Debug, Clone, Copy)]
pub struct InventoryService<'a> {
    transport: &'a Transport,
}

impl<'a> InventoryService<'a> {
    pub(crate) fn new(transport: &'a Transport) -> Self {
        Self { transport }
    }

    pub fn list_inventories(&self, ctx: &Context, params: &QueryParams) -> Result<Page<Inventory>> {
        Ok(self.transport.get(ctx, ENDPOINT, params)?.unwrap_or_default())
    }

    pub fn get_inventory(&self, ctx: &Context, id: i64) -> Result<Inventory> {
        let endpoint = format!("{ENDPOINT}{id}");
        Ok(self
            .transport
            .get(ctx, &endpoint, &QueryParams::new())?
            .unwrap_or_default())
    }

    /// Create an inventory. `name` and `organization` are required.
    pub fn create_inventory(&self, ctx: &Context, data: &Payload) -> Result<Inventory> {
        validate_params(data, &["name", "organization"])?;
        Ok(self
            .transport
            .post(ctx, ENDPOINT, Some(data))?
            .unwrap_or_default())
    }

    pub fn update_inventory(&self, ctx: &Context, id: i64, data: &Payload) -> Result<Inventory> {
        let endpoint = format!("{ENDPOINT}{id}");
        Ok(self
            .transport
            .patch(ctx, &endpoint, Some(data))?
            .unwrap_or_default())
    }

    pub fn delete_inventory(&self, ctx: &Context, id: i64) -> Result<()> {
        self.transport.delete(ctx, &format!("{ENDPOINT}{id}"))
    }

    /// Start a sync of every source attached to inventory `id`.
    pub fn sync_inventory_sources(&self, ctx: &Context, id: i64) -> Result<Vec<InventoryUpdate>> {
        let endpoint = format!("{ENDPOINT}{id}/update_inventory_sources/");
        Ok(self
            .transport
            .post::<Payload, _>(ctx, &endpoint, None)?
            .unwrap_or_default())
    }
}
