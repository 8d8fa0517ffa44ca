//! Placeholder token registry.
//!
//! Each active `{name}` token maps to one pre-resolved configuration value.
//! The identity token is special-cased: its three case-variant spellings are
//! boundary-guarded by the substitution engine.

use crate::domain::config::ResolvedConfig;

/// Resolve an active placeholder name to its replacement value.
///
/// Returns `None` for names outside the registry (including the identity
/// variants, which the engine handles separately).
pub fn replacement_for(name: &str, config: &ResolvedConfig) -> Option<String> {
    let value = match name {
        "client_password" | "password" | "template_password" => config.client_password.clone(),
        "ip" => config.ip.clone(),
        "user" => config.user.clone(),
        "odoo_port" => config.odoo_port.clone(),
        "gevent_port" => config.gevent_port.clone(),
        "db_port" => config.db_port.clone(),
        "db_user" => config.db_user.clone(),
        "odoo_db_name" => config.odoo_db_name.clone(),
        "odoo_container_name" => config.odoo_container_name.clone(),
        "db_container_name" => config.db_container_name.clone(),
        "path_to_install" => config.path_to_install.display().to_string(),
        "install_dir" => config.install_dir.display().to_string(),
        _ => return None,
    };
    Some(value)
}

/// Resolve the literal constructs that embed the identity token next to a
/// word character: container names, the `postgres_` database name, and the
/// display-title phrases. These must run before the generic pass, whose
/// boundary check would otherwise leave them untouched.
pub fn resolve_literal_constructs(content: &str, config: &ResolvedConfig) -> String {
    let name = &config.client_name;
    let title = &config.client_title;
    content
        .replace("odoo17-{client_name}", &config.odoo_container_name)
        .replace("db-{client_name}", &config.db_container_name)
        .replace("postgres_{client_name}", &format!("postgres_{name}"))
        .replace(
            "Odoo 17 Enterprise - {client_name}",
            &format!("Odoo 17 Enterprise - {title}"),
        )
        .replace(
            "Installation Script for {client_name}",
            &format!("Installation Script for {title}"),
        )
        .replace(
            "installation of Odoo 17 Enterprise for {client_name}",
            &format!("installation of Odoo 17 Enterprise for {title}"),
        )
}

/// Identity token spellings, in fixed precedence: lowercase, title-case,
/// uppercase.
pub fn identity_replacement(name: &str, config: &ResolvedConfig) -> Option<String> {
    match name {
        "client_name" => Some(config.client_name.clone()),
        "Client_name" => Some(config.client_title.clone()),
        "CLIENT_NAME" => Some(config.client_name.to_uppercase()),
        _ => None,
    }
}

/// Tokens that belong to the target scripts' own runtime (color codes,
/// shell variables) and are deliberately left untouched.
pub const IGNORED_PLACEHOLDERS: [&str; 35] = [
    // Color codes
    "WHITE", "RED", "YELLOW", "GREEN", "CYAN", "MAGENTA", "BLACK", "BLUE", "NC",
    // Background colors
    "BG_RED", "BG_BLUE", "BG_GREEN", "BG_CYAN", "BG_MAGENTA", "BG_YELLOW",
    // Text formatting
    "BOLD", "DIM", "UNDERLINE", "RESET",
    // Other shell script variables
    "level_color", "http_code", "TIMESTAMP", "DB_NAME", "docker_compose_file",
    "odoo_conf_file", "file_name", "container_name", "module_name", "insertions",
    "deletions", "win_archive", "win_target", "INSTALL_DIR", "enterprise_path", "i",
];

pub fn is_ignored(name: &str) -> bool {
    IGNORED_PLACEHOLDERS.contains(&name)
}
