//! Resolution of command-line flags, config file and defaults into one run

use dbdrift_catalog::{ConnectionString, ConnectorRegistry};
use dbdrift_core::{Config, FilterRules};
use std::path::PathBuf;

use crate::exit_code::CliError;
use crate::render::OutputFormat;
use crate::Cli;

/// Fully validated settings of a single comparison
#[derive(Debug, Clone, PartialEq)]
pub struct RunOptions {
    pub dbms: String,
    pub source: String,
    pub target: String,
    pub output: PathBuf,
    pub format: OutputFormat,
    pub filter: FilterRules,
}

impl RunOptions {
    /// Merge flags over the config file and validate the connection pair
    ///
    /// Flags win over config values, config values over defaults.
    pub fn resolve(cli: &Cli, config: Config, registry: &ConnectorRegistry) -> Result<Self, CliError> {
        let dbms = cli.dbms.clone().unwrap_or(config.dbms).to_ascii_lowercase();
        if !registry.contains(&dbms) {
            return Err(CliError::Usage(format!(
                "Unsupported DBMS '{}'. Supported: {}",
                dbms,
                registry.supported().join(", ")
            )));
        }

        let source = cli.source.trim().to_string();
        let target = cli.target.trim().to_string();
        if source.is_empty() || target.is_empty() {
            return Err(CliError::Usage(
                "Both --source and --target connection strings are required".to_string(),
            ));
        }
        if source == target {
            return Err(CliError::Usage(
                "Source and target connection strings must differ".to_string(),
            ));
        }

        let source_scheme = ConnectionString::parse(&source).scheme().map(str::to_string);
        let target_scheme = ConnectionString::parse(&target).scheme().map(str::to_string);
        if source_scheme != target_scheme {
            return Err(CliError::Usage(format!(
                "Source and target must use the same DBMS scheme (got '{}' and '{}')",
                source_scheme.as_deref().unwrap_or("<none>"),
                target_scheme.as_deref().unwrap_or("<none>")
            )));
        }
        if let Some(scheme) = &source_scheme {
            if !registry.accepts_scheme(&dbms, scheme) {
                return Err(CliError::Usage(format!(
                    "Connection scheme '{}' does not match --dbms {}",
                    scheme, dbms
                )));
            }
        }

        let output = cli.output.clone().unwrap_or(config.output);
        let format = cli.format.unwrap_or_else(|| OutputFormat::from_path(&output));

        Ok(Self {
            dbms,
            source,
            target,
            output,
            format,
            filter: config.filter,
        })
    }
}
