pub mod months;
pub mod resolve;
pub mod season;

use anyhow::Result;
use colored::*;

use crate::catalog::INaturalistClient;
use crate::cli::output::create_spinner;
use crate::config::{Config, OutputFormat};
use crate::resolver::{ProximityResolver, Resolution, SpeciesQuery};
use crate::types::Coordinate;

/// Settings shared by every subcommand
pub struct CommandContext {
    pub config: Config,
    pub format: OutputFormat,
}

impl CommandContext {
    pub fn new(config: Config, format_override: Option<OutputFormat>) -> Self {
        let format = format_override.unwrap_or(config.output.format);
        Self { config, format }
    }

    pub fn precision(&self) -> usize {
        self.config.output.precision
    }

    fn resolver(&self) -> Result<ProximityResolver<INaturalistClient>> {
        let client = INaturalistClient::from_config(&self.config.catalog)?;
        Ok(ProximityResolver::with_policy(client, self.config.search.clone())?)
    }

    /// Run one resolution on a fresh runtime with a spinner on stderr
    pub fn resolve(&self, query: &SpeciesQuery, origin: Coordinate) -> Result<Resolution> {
        let resolver = self.resolver()?;
        let runtime = tokio::runtime::Runtime::new()?;

        let spinner = create_spinner(&format!(
            "Searching observations for {} species within {} km of {}...",
            query.len(),
            resolver.policy().max_radius_km,
            origin
        ));
        let resolution = runtime.block_on(resolver.resolve(query, origin));
        spinner.finish_and_clear();

        if let Some(err) = &resolution.aborted {
            eprintln!(
                "{} search stopped early ({}); remaining species are marked unknown",
                "Warning:".yellow().bold(),
                err
            );
        }

        Ok(resolution)
    }
}
