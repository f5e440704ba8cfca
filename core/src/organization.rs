use crate::context::Context;
use crate::error::Result;
use crate::transport::Transport;
use crate::types::{Organization, Page, QueryParams};

#[derive(Debug, Clone, Copy)]
pub struct OrganizationService<'a> {
    transport: &'a Transport,
}

impl<'a> OrganizationService<'a> {
    pub(crate) fn new(transport: &'a Transport) -> Self {
        Self { transport }
    }

    pub fn list_organizations(
        &self,
        ctx: &Context,
        params: &QueryParams,
    ) -> Result<Page<Organization>> {
        Ok(self
            .transport
            .get(ctx, "/api/v2/organizations/", params)?
            .unwrap_or_default())
    }
}
