//! `state` command
//!
//! Loads the portal configuration and a JSON fixture, assembles the billing
//! portal payload on a tokio runtime and prints it as pretty JSON.

use crate::cli::StateArgs;
use crate::command::PortalCommand;
use crate::config::PortalConfig;
use crate::core::FrontendStateAssembler;
use crate::io::{write_json, PortalFixture, StaticRoutes};
use crate::types::PortalError;
use serde_json::Value;
use std::io::Write;
use std::sync::Arc;

#[derive(Debug)]
pub struct StateCommand {
    args: StateArgs,
}

impl StateCommand {
    pub fn new(args: StateArgs) -> Self {
        Self { args }
    }
}

impl PortalCommand for StateCommand {
    fn run(&self, output: &mut dyn Write) -> Result<(), PortalError> {
        let config = PortalConfig::load(&self.args.config)?.with_env_overrides();
        let (billable, viewer, provider) = PortalFixture::load(&self.args.fixture)?.into_parts();
        let routes = StaticRoutes::new(config.routes.clone());
        let request = self.args.to_request();

        let mut assembler =
            FrontendStateAssembler::new(Arc::new(config), Arc::new(provider), Arc::new(routes));
        if let Some(now) = self.args.now {
            assembler = assembler.at(now);
        }

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .build()
            .map_err(|e| PortalError::IoError {
                message: format!("Failed to create tokio runtime: {}", e),
            })?;

        let props = runtime.block_on(assembler.props(
            &self.args.billable_type,
            &billable,
            &request,
            &viewer,
        ))?;

        write_json(&Value::Object(props), output)
    }
}
