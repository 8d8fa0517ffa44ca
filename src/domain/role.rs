//! Template file roles and the fixed shape of a materialized bundle.

use std::path::Path;

/// Role tag for a file in the template set. The role decides which
/// post-processor runs and which path-rewrite strategy applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileRole {
    Generic,
    Readme,
    Compose,
    Staging,
    Install,
    ServiceConfig,
}

/// How the resolved install path is written into a file of this role.
///
/// Exactly one strategy per role: whole-file substring rewriting and
/// line-prefix patching must never both touch the same file, which is the
/// collision the consistency guard exists to catch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathStrategy {
    /// Generic token substitution plus the `/odoo17` path-fragment rewrite.
    WholeFile,
    /// Fixed-prefix assignment lines are replaced; path fragments are left
    /// alone.
    LinePatch,
}

impl FileRole {
    /// Classify a template file by its file name.
    pub fn for_path(path: &Path) -> Self {
        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
        match name {
            "README.md" => FileRole::Readme,
            "docker-compose.yml" => FileRole::Compose,
            "staging.sh" => FileRole::Staging,
            "install.sh" | "backup.sh" | "git_panel.sh" | "fix-permissions.sh"
            | "ssl-setup.sh" => FileRole::Install,
            "odoo.conf" => FileRole::ServiceConfig,
            _ => FileRole::Generic,
        }
    }

    pub fn path_strategy(self) -> PathStrategy {
        match self {
            FileRole::Staging | FileRole::Install => PathStrategy::LinePatch,
            _ => PathStrategy::WholeFile,
        }
    }

    /// Whether the consistency guard verifies this role's final content.
    /// Only meaningful for line-patch roles; whole-file roles (README in
    /// particular) legitimately repeat the install path.
    pub fn guarded(self) -> bool {
        self.path_strategy() == PathStrategy::LinePatch
    }
}

/// Subdirectories created in every target, whatever the template contains.
pub const REQUIRED_DIRS: [&str; 8] = [
    "config",
    "volumes/odoo-data/filestore",
    "volumes/postgres-data",
    "backups/daily",
    "backups/monthly",
    "logs",
    "enterprise",
    "addons",
];

/// Template entries never copied into the target.
pub const SKIPPED_ENTRIES: [&str; 3] = [".git", ".github", ".vscode"];

/// Packaged enterprise installer, copied byte-for-byte when present.
pub const ENTERPRISE_DEB: &str = "odoo_17.0+e.latest_all.deb";

/// Default template directory name. The template tree itself is named with
/// the un-substituted identity placeholder.
pub const TEMPLATE_DIR_NAME: &str = "{client_name}-odoo-17-setup";

/// Top-level names of the required skeleton (copy collisions are skipped).
pub fn skeleton_roots() -> Vec<&'static str> {
    let mut roots: Vec<&str> =
        REQUIRED_DIRS.iter().copied().map(|dir| dir.split('/').next().unwrap_or(dir)).collect();
    roots.dedup();
    roots
}
