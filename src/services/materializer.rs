//! Template tree materialization.
//!
//! Strictly sequential: each file is fully read, transformed, and written
//! before the next one is touched. Any failure aborts the run; files already
//! written are left in place for operator inspection.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::domain::config::ResolvedConfig;
use crate::domain::error::AppError;
use crate::domain::role::{
    ENTERPRISE_DEB, FileRole, PathStrategy, REQUIRED_DIRS, SKIPPED_ENTRIES, skeleton_roots,
};
use crate::services::{guard, postprocess, substitution};

/// Synthesized service configuration, rendered through the substitution
/// engine when the template did not ship a `config/odoo.conf`.
const ODOO_CONF_TEMPLATE: &str = "\
[options]
admin_passwd = {client_password}
db_host = db
db_port = {db_port}
db_user = {db_user}
db_password = {client_password}
db_name = {odoo_db_name}
dbfilter = {odoo_db_name}
addons_path = /mnt/enterprise,/mnt/extra-addons,/usr/lib/python3/dist-packages/odoo/addons
data_dir = /var/lib/odoo
session_dir = /var/lib/odoo/sessions
logfile = /var/log/odoo/odoo.log
log_level = info
max_cron_threads = 2
workers = 4
limit_memory_hard = 2684354560
limit_memory_soft = 2147483648
limit_request = 8192
limit_time_cpu = 600
limit_time_real = 1200
proxy_mode = True
";

/// Placeholders left in one materialized file. The sole non-fatal defect.
#[derive(Debug, Clone, Serialize)]
pub struct UnresolvedTokens {
    pub file: PathBuf,
    pub names: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct MaterializationResult {
    pub target_dir: PathBuf,
    pub files_processed: usize,
    pub unresolved: Vec<UnresolvedTokens>,
}

/// Materialize the template tree into `config.target_setup_dir`.
///
/// The template is checked before the target is created, so a missing
/// template never leaves an empty target behind. A pre-existing target root
/// is a fatal conflict, never a merge.
pub fn materialize(
    template_root: &Path,
    config: &ResolvedConfig,
) -> Result<MaterializationResult, AppError> {
    if !template_root.is_dir() {
        return Err(AppError::TemplateMissing(template_root.to_path_buf()));
    }
    let target_root = &config.target_setup_dir;
    if target_root.exists() {
        return Err(AppError::TargetExists(target_root.clone()));
    }

    fs::create_dir_all(target_root)?;
    create_skeleton(target_root)?;

    let mut result = MaterializationResult {
        target_dir: target_root.clone(),
        files_processed: 0,
        unresolved: Vec::new(),
    };

    let skeleton = skeleton_roots();
    for entry in sorted_entries(template_root)? {
        let name = entry_name(&entry)?;
        if SKIPPED_ENTRIES.contains(&name.as_str()) {
            continue;
        }
        if entry.is_dir() {
            // Skeleton collisions were pre-created above; copying over them
            // would merge template state into the fixed shape.
            if skeleton.contains(&name.as_str()) {
                continue;
            }
            copy_dir(&entry, &target_root.join(&name), Path::new(&name), config, &mut result)?;
        } else {
            process_file(&entry, &target_root.join(&name), Path::new(&name), config, &mut result)?;
        }
    }

    // The template's own service config is the one deliberate exception to
    // the skeleton-collision skip.
    let template_conf = template_root.join("config").join("odoo.conf");
    if template_conf.is_file() {
        process_file(
            &template_conf,
            &target_root.join("config").join("odoo.conf"),
            Path::new("config/odoo.conf"),
            config,
            &mut result,
        )?;
    }

    copy_enterprise_artifact(template_root, target_root)?;
    synthesize_service_config(target_root, config, &mut result)?;

    Ok(result)
}

fn create_skeleton(target_root: &Path) -> Result<(), AppError> {
    for dir in REQUIRED_DIRS {
        let path = target_root.join(dir);
        fs::create_dir_all(&path)?;
        println!("  Created directory: {}", path.display());
    }
    Ok(())
}

/// File name of a template entry. A non-UTF-8 name cannot flow through the
/// substitution pipeline and would otherwise resolve to the target root
/// itself, so it is rejected up front.
fn entry_name(entry: &Path) -> Result<String, AppError> {
    entry
        .file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .ok_or_else(|| AppError::UnsupportedFileName(entry.to_path_buf()))
}

fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>, AppError> {
    let mut entries: Vec<PathBuf> =
        fs::read_dir(dir)?.collect::<Result<Vec<_>, _>>()?.into_iter().map(|e| e.path()).collect();
    entries.sort();
    Ok(entries)
}

fn copy_dir(
    source: &Path,
    target: &Path,
    rel: &Path,
    config: &ResolvedConfig,
    result: &mut MaterializationResult,
) -> Result<(), AppError> {
    fs::create_dir_all(target)?;
    for entry in sorted_entries(source)? {
        let name = entry_name(&entry)?;
        let rel = rel.join(&name);
        if entry.is_dir() {
            copy_dir(&entry, &target.join(&name), &rel, config, result)?;
        } else {
            process_file(&entry, &target.join(&name), &rel, config, result)?;
        }
    }
    Ok(())
}

/// Copy one regular file through the substitution pipeline. Binary payloads
/// (the `.deb` installer, anything non-UTF-8) pass through byte-for-byte.
fn process_file(
    source: &Path,
    target: &Path,
    rel: &Path,
    config: &ResolvedConfig,
    result: &mut MaterializationResult,
) -> Result<(), AppError> {
    let bytes = fs::read(source)
        .map_err(|source_err| AppError::CopyFailure { path: source.to_path_buf(), source: source_err })?;

    let is_deb = rel.extension().is_some_and(|ext| ext == "deb");
    let text = if is_deb { None } else { std::str::from_utf8(&bytes).ok() };

    match text {
        None => {
            fs::write(target, &bytes).map_err(|source_err| AppError::CopyFailure {
                path: target.to_path_buf(),
                source: source_err,
            })?;
            println!("  Copied: {}", rel.display());
        }
        Some(content) => {
            let role = FileRole::for_path(rel);
            let outcome = substitution::substitute(&content, config);
            let content = match role.path_strategy() {
                PathStrategy::WholeFile => {
                    substitution::rewrite_path_fragments(&outcome.content, config)
                }
                PathStrategy::LinePatch => outcome.content,
            };
            let content = postprocess::apply(role, content, config);

            if role.guarded() {
                guard::verify(&content, &config.install_dir, rel)?;
            }

            fs::write(target, content).map_err(|source_err| AppError::CopyFailure {
                path: target.to_path_buf(),
                source: source_err,
            })?;
            println!("  Modified: {}", rel.display());

            if !outcome.unresolved.is_empty() {
                eprintln!(
                    "Warning: unresolved placeholders in {}: {}",
                    rel.display(),
                    outcome
                        .unresolved
                        .iter()
                        .map(|name| format!("{{{name}}}"))
                        .collect::<Vec<_>>()
                        .join(", ")
                );
                result
                    .unresolved
                    .push(UnresolvedTokens { file: rel.to_path_buf(), names: outcome.unresolved });
            }
        }
    }

    result.files_processed += 1;
    Ok(())
}

/// A packaged installer next to the template root is carried over untouched.
fn copy_enterprise_artifact(template_root: &Path, target_root: &Path) -> Result<(), AppError> {
    let Some(parent) = template_root.parent() else {
        return Ok(());
    };
    let artifact = parent.join(ENTERPRISE_DEB);
    if artifact.is_file() {
        fs::copy(&artifact, target_root.join(ENTERPRISE_DEB)).map_err(|source_err| {
            AppError::CopyFailure { path: artifact.clone(), source: source_err }
        })?;
        println!("  Copied: {ENTERPRISE_DEB}");
    }
    Ok(())
}

/// Write the default `config/odoo.conf` unless the template already provided
/// one (in which case it has been routed through the pipeline above and must
/// not be overwritten wholesale).
fn synthesize_service_config(
    target_root: &Path,
    config: &ResolvedConfig,
    result: &mut MaterializationResult,
) -> Result<(), AppError> {
    let conf_path = target_root.join("config").join("odoo.conf");
    if conf_path.exists() {
        println!("  Service configuration already present: {}", conf_path.display());
        return Ok(());
    }
    let outcome = substitution::substitute(ODOO_CONF_TEMPLATE, config);
    fs::write(&conf_path, outcome.content)?;
    println!("  Created service configuration: {}", conf_path.display());
    result.files_processed += 1;
    Ok(())
}
