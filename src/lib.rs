//! odosetup: Materialize parameterized Odoo 17 client deployment bundles.
//!
//! Loads a flat `key=value` configuration, validates and derives a
//! [`domain::ResolvedConfig`], then copies a template tree into a
//! client-specific directory while resolving `{name}` placeholder tokens and
//! applying role-specific post-processing.

pub mod app;
pub mod domain;
pub mod ports;
pub mod services;

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::json;

use app::AppContext;
use app::commands::generate::GenerateOptions;
use domain::config::{CONFIG_FILE_CANDIDATES, SAMPLE_CONFIG};
use services::HttpAddressLookup;

pub use app::commands::generate::GenerateOutcome;
pub use domain::AppError;
pub use ports::{AddressLookup, FixedAddress};

/// Summary output format for a successful run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SummaryFormat {
    #[default]
    Plain,
    Json,
}

/// Materialize a client setup from a configuration file.
///
/// On success, prints the resolved-configuration summary, per-file warnings,
/// and next-step instructions.
pub fn generate(
    config_file: &Path,
    template_root: Option<&Path>,
    format: SummaryFormat,
) -> Result<GenerateOutcome, AppError> {
    let ctx = AppContext::new(HttpAddressLookup::new());
    let options = GenerateOptions { template_root: template_root.map(Path::to_path_buf) };
    let outcome = app::commands::generate::execute(&ctx, config_file, &options)?;

    match format {
        SummaryFormat::Json => print_json_summary(&outcome)?,
        SummaryFormat::Plain => print_plain_summary(&outcome),
    }
    Ok(outcome)
}

/// Locate a configuration file by its conventional names in `dir`.
pub fn find_existing_config(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILE_CANDIDATES
        .iter()
        .map(|candidate| dir.join(candidate))
        .find(|candidate| candidate.is_file())
}

/// Write the commented sample configuration for the operator to fill in.
pub fn write_sample_config(path: &Path) -> Result<(), AppError> {
    fs::write(path, SAMPLE_CONFIG)?;
    Ok(())
}

fn print_plain_summary(outcome: &GenerateOutcome) {
    println!("\nConfiguration values that will be used:");
    for (key, value) in outcome.config.summary() {
        println!("  {key} = {value}");
    }

    if !outcome.result.unresolved.is_empty() {
        println!("\nFiles needing manual review (unresolved placeholders):");
        for entry in &outcome.result.unresolved {
            println!("  {}", entry.file.display());
        }
    }

    println!("\nParameterization completed successfully!");
    println!("The setup is now customized for client: {}", outcome.config.client_name);
    println!("\nNext steps:");
    println!("1. Review the generated files in {}", outcome.result.target_dir.display());
    println!(
        "2. Place the enterprise DEB file (odoo_17.0+e.latest_all.deb) in: {}",
        outcome.config.path_to_install.display()
    );
    println!("3. Deploy the instance:");
    println!(
        "   cd {} && chmod +x install.sh && sudo -E ./install.sh",
        outcome.result.target_dir.display()
    );
    println!("\nOdoo will be installed in: {}", outcome.config.install_dir.display());
}

fn print_json_summary(outcome: &GenerateOutcome) -> Result<(), AppError> {
    let summary = json!({
        "config": outcome.config,
        "target_dir": outcome.result.target_dir,
        "files_processed": outcome.result.files_processed,
        "unresolved": outcome.result.unresolved,
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
