//! Role-specific transformations layered after generic substitution.
//!
//! Each role gets at most one post-processor, operating on the file's own
//! structure (line spans, assignment lines, compose fields) rather than on
//! generic tokens.

use std::sync::LazyLock;

use regex::{NoExpand, Regex};

use crate::domain::config::{DEFAULT_DB_PORT, DEFAULT_DB_USER, ResolvedConfig};
use crate::domain::role::{ENTERPRISE_DEB, FileRole};

/// Internal service port the container always listens on.
const INTERNAL_ODOO_PORT: &str = "8069";

const ODOO_DATA_VOLUME: &str = "./volumes/odoo-data:/var/lib/odoo";

/// Span of the README install instructions, from the clone step through the
/// closing fence of the enterprise-artifact step. `(?s)` because the block
/// spans multiple lines with inconsistent wrapping.
static README_STEPS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?s)1\. Clone this repository to `[^`\n]+`:\s*```bash.*?cd [^\n]+\s*```\s*2\. Place the Odoo Enterprise \.deb file:\s*```bash.*?```",
    )
    .expect("valid readme span pattern")
});

static PORTS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"ports:\s+- "0\.0\.0\.0:\d+:\d+""#).expect("valid ports pattern")
});

/// Run the post-processor registered for `role`, if any.
pub fn apply(role: FileRole, content: String, config: &ResolvedConfig) -> String {
    match role {
        FileRole::Readme => fix_readme_install_steps(&content, config),
        FileRole::Compose => patch_compose(&content, config),
        FileRole::Staging => patch_staging(&content, config),
        FileRole::Install => patch_install(&content, config),
        FileRole::Generic | FileRole::ServiceConfig => content,
    }
}

/// Replace the whole clone/place-artifact instruction block with a freshly
/// generated one. Token substitution cannot fix this block: the original
/// spans multiple lines with line-wrapping drift.
fn fix_readme_install_steps(content: &str, config: &ResolvedConfig) -> String {
    let install = config.install_dir.display();
    let user = &config.user;
    let ip = &config.ip;
    let steps = format!(
        "1. Clone this repository to `{install}`:\n   \
         ```bash\n   \
         scp -r \"<path to local install>/*\" {user}@{ip}:{install}\n   \
         cd {install}\n   \
         ```\n\n\
         2. Place the Odoo Enterprise .deb file:\n   \
         ```bash\n   \
         scp -r \"<path to enterprise .deb file>/{ENTERPRISE_DEB}\" {user}@{ip}:{install}\n   \
         ```"
    );
    README_STEPS_RE.replace(content, NoExpand(&steps)).into_owned()
}

/// Rewrite the published port mapping, conditionally patch database
/// settings, and make sure the persistent-storage volume is mapped.
fn patch_compose(content: &str, config: &ResolvedConfig) -> String {
    let ports = format!("ports:\n      - \"0.0.0.0:{}:{INTERNAL_ODOO_PORT}\"", config.odoo_port);
    let mut content = PORTS_RE.replace(content, NoExpand(&ports)).into_owned();

    if config.db_port != DEFAULT_DB_PORT {
        content = content.replace("PORT=5432", &format!("PORT={}", config.db_port));
    }
    if config.db_user != DEFAULT_DB_USER {
        // POSTGRES_USER first: the bare USER pattern is a substring of it.
        content = content
            .replace("POSTGRES_USER=odoo", &format!("POSTGRES_USER={}", config.db_user))
            .replace("USER=odoo", &format!("USER={}", config.db_user));
    }

    if !content.contains(ODOO_DATA_VOLUME) {
        content = inject_volume_mapping(&content);
    }
    content
}

/// Insert the odoo-data mapping into the `volumes:` block of the `odoo`
/// service (the db service carries its own volumes block and must not get
/// the mount). Detection is by exact substring absence, so re-running is a
/// no-op. A manifest without an `odoo` service is left alone.
fn inject_volume_mapping(content: &str) -> String {
    let mut out: Vec<String> = Vec::new();
    let mut odoo_indent: Option<usize> = None;
    let mut injected = false;

    for line in content.lines() {
        let trimmed = line.trim();
        let indent = line.len() - line.trim_start().len();

        if let Some(service_indent) = odoo_indent
            && !trimmed.is_empty()
            && indent <= service_indent
        {
            odoo_indent = None;
        }
        if trimmed == "odoo:" && indent > 0 {
            odoo_indent = Some(indent);
        }

        out.push(line.to_string());
        if !injected && odoo_indent.is_some() && trimmed == "volumes:" {
            let pad: String = line.chars().take_while(|c| c.is_whitespace()).collect();
            out.push(format!("{pad}  - {ODOO_DATA_VOLUME}"));
            injected = true;
        }
    }

    let mut result = out.join("\n");
    if content.ends_with('\n') {
        result.push('\n');
    }
    result
}

fn patch_staging(content: &str, config: &ResolvedConfig) -> String {
    let rules = [
        ("INSTALL_DIR=", format!("INSTALL_DIR=\"{}\"", config.install_dir.display())),
        ("SERVER_IP=", format!("SERVER_IP={}", config.ip)),
        ("BASE_PORT=", format!("BASE_PORT={}", config.odoo_port)),
        ("POSTGRES_PORT=", format!("POSTGRES_PORT={}", config.db_port)),
    ];
    patch_assignments(content, &rules)
}

fn patch_install(content: &str, config: &ResolvedConfig) -> String {
    let mut rules =
        vec![("INSTALL_DIR=", format!("INSTALL_DIR=\"{}\"", config.install_dir.display()))];
    if config.db_user != DEFAULT_DB_USER {
        rules.push(("DB_USER=", format!("DB_USER=\"{}\"", config.db_user)));
    }
    patch_assignments(content, &rules)
}

/// Replace whole assignment lines matching a fixed prefix. When the line
/// directly after a patched assignment reassigns the same variable (a
/// derived recomputation in the original scripts), that follow-up line is
/// suppressed so two conflicting assignments never coexist.
fn patch_assignments(content: &str, rules: &[(&str, String)]) -> String {
    let mut out: Vec<String> = Vec::new();
    let mut suppress: Option<&str> = None;
    for line in content.lines() {
        if let Some(prefix) = suppress.take()
            && line.starts_with(prefix)
        {
            continue;
        }
        match rules.iter().find(|(prefix, _)| line.starts_with(prefix)) {
            Some((prefix, replacement)) => {
                out.push(replacement.clone());
                suppress = Some(prefix);
            }
            None => out.push(line.to_string()),
        }
    }
    let mut result = out.join("\n");
    if content.ends_with('\n') {
        result.push('\n');
    }
    result
}
