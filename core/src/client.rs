//! Entry point tying the transport to the resource services.
//!
//! # Design
//! `Client` owns a single `Transport`; every service borrows it, so all
//! calls share one connection pool and one set of credentials. Cloning a
//! client is cheap and the clone talks through the same agent, which is how
//! the job waiter hands the client to its predicate thread.

use crate::config::ClientConfig;
use crate::error::Result;
use crate::group::GroupService;
use crate::host::HostService;
use crate::inventory::InventoryService;
use crate::job::JobService;
use crate::job_template::JobTemplateService;
use crate::organization::OrganizationService;
use crate::transport::Transport;

#[derive(Debug, Clone)]
pub struct Client {
    transport: Transport,
}

impl Client {
    /// Client using HTTP Basic authentication.
    pub fn new(base_url: &str, username: &str, password: &str) -> Result<Self> {
        let config = ClientConfig::builder()
            .base_url(base_url)
            .basic_auth(username, password)
            .build()?;
        Ok(Self::from_config(&config))
    }

    /// Client using a bearer token.
    pub fn with_token(base_url: &str, token: &str) -> Result<Self> {
        let config = ClientConfig::builder()
            .base_url(base_url)
            .token(token)
            .build()?;
        Ok(Self::from_config(&config))
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self {
            transport: Transport::new(config),
        }
    }

    pub fn from_transport(transport: Transport) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    pub fn job_templates(&self) -> JobTemplateService<'_> {
        JobTemplateService::new(&self.transport)
    }

    pub fn jobs(&self) -> JobService<'_> {
        JobService::new(&self.transport)
    }

    pub fn inventories(&self) -> InventoryService<'_> {
        InventoryService::new(&self.transport)
    }

    pub fn hosts(&self) -> HostService<'_> {
        HostService::new(&self.transport)
    }

    pub fn groups(&self) -> GroupService<'_> {
        GroupService::new(&self.transport)
    }

    pub fn organizations(&self) -> OrganizationService<'_> {
        OrganizationService::new(&self.transport)
    }
}
