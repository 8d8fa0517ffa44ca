//! The one command: load, resolve, materialize.

use std::path::{Path, PathBuf};

use crate::app::AppContext;
use crate::domain::config::{RawConfig, ResolvedConfig};
use crate::domain::error::AppError;
use crate::domain::role::TEMPLATE_DIR_NAME;
use crate::ports::AddressLookup;
use crate::services::{MaterializationResult, materializer};

#[derive(Debug, Default, Clone)]
pub struct GenerateOptions {
    /// Template root override. Defaults to the literal
    /// `{client_name}-odoo-17-setup` directory next to the working directory.
    pub template_root: Option<PathBuf>,
}

/// Outcome of a materialization run, carried back to the presentation layer.
#[derive(Debug)]
pub struct GenerateOutcome {
    pub config: ResolvedConfig,
    pub result: MaterializationResult,
}

/// Execute the generate command.
pub fn execute<L: AddressLookup>(
    ctx: &AppContext<L>,
    config_file: &Path,
    options: &GenerateOptions,
) -> Result<GenerateOutcome, AppError> {
    let raw = RawConfig::load(config_file)?;
    let config = ResolvedConfig::resolve(&raw, ctx.lookup())?;

    let template_root = match &options.template_root {
        Some(root) => root.clone(),
        None => std::env::current_dir()?.join(TEMPLATE_DIR_NAME),
    };

    println!("Customizing setup for client: {}", config.client_name);
    let result = materializer::materialize(&template_root, &config)?;

    Ok(GenerateOutcome { config, result })
}
