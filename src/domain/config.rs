//! Configuration parsing, validation, and derivation.
//!
//! A raw `key=value` file is merged over declared defaults, validated, and
//! frozen into a [`ResolvedConfig`]. Every derived field is computed exactly
//! once here; nothing downstream re-derives a value.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::domain::error::{AppError, MIN_PASSWORD_LEN};
use crate::ports::AddressLookup;

/// Sentinel address used when every lookup provider fails.
pub const FALLBACK_ADDRESS: &str = "localhost";

pub const DEFAULT_ODOO_PORT: &str = "8069";
pub const DEFAULT_GEVENT_PORT: &str = "8072";
pub const DEFAULT_DB_PORT: &str = "5432";
pub const DEFAULT_DB_USER: &str = "odoo";

/// File names probed, in order, when no configuration path is given.
pub const CONFIG_FILE_CANDIDATES: [&str; 3] =
    ["odoo-setup.conf", "odoo-17-setup.conf", "odoo.conf"];

/// Commented sample written when no configuration can be found.
pub const SAMPLE_CONFIG: &str = "\
# Odoo 17 Setup Configuration
# Required parameters
client_name=acme
client_password=acme2025

# Optional parameters (leave blank for auto-detection)
user=
ip=
odoo_port=8069
gevent_port=8072
db_port=5432
db_user=odoo
path_to_install=
";

/// Raw configuration values as read from the `key=value` file.
///
/// Empty values are dropped at parse time so that a blank assignment never
/// overrides a declared default.
#[derive(Debug, Clone, Default)]
pub struct RawConfig {
    values: BTreeMap<String, String>,
}

impl RawConfig {
    /// Parse `key=value` lines. Blank lines and `#` comments are ignored;
    /// the first `=` splits key from value; both sides are trimmed.
    pub fn parse(content: &str) -> Self {
        let mut values = BTreeMap::new();
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some((key, value)) = line.split_once('=') {
                let key = key.trim();
                let value = value.trim();
                if !key.is_empty() && !value.is_empty() {
                    values.insert(key.to_string(), value.to_string());
                }
            }
        }
        Self { values }
    }

    /// Read and parse a configuration file.
    pub fn load(path: &Path) -> Result<Self, AppError> {
        if !path.exists() {
            return Err(AppError::ConfigMissing(path.to_path_buf()));
        }
        let content = fs::read_to_string(path)?;
        Ok(Self::parse(&content))
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    #[cfg(test)]
    pub fn set<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V) {
        self.values.insert(key.into(), value.into());
    }
}

/// Fully resolved parameter set for one materialization run.
///
/// Immutable once constructed; the single source of truth shared by the
/// substitution engine, the post-processors, and the consistency guard.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedConfig {
    pub client_name: String,
    /// Title-case display variant of the client name. Never used for paths
    /// or identifiers.
    pub client_title: String,
    pub client_password: String,
    pub user: String,
    pub ip: String,
    pub odoo_port: String,
    pub gevent_port: String,
    pub db_port: String,
    pub db_user: String,
    pub odoo_db_name: String,
    pub path_to_install: PathBuf,
    /// Canonical install path: `path_to_install/{client_name}-odoo-17`.
    pub install_dir: PathBuf,
    /// Where the materialized template lands.
    pub target_setup_dir: PathBuf,
    pub odoo_container_name: String,
    pub db_container_name: String,
}

impl ResolvedConfig {
    /// Merge, validate, and derive a full configuration.
    ///
    /// Validation order: required fields, name charset, password length,
    /// port ranges, install base path. All derived fields are computed only
    /// after every validation has passed.
    pub fn resolve<L: AddressLookup>(raw: &RawConfig, lookup: &L) -> Result<Self, AppError> {
        let client_name = raw.get("client_name").ok_or(AppError::MissingField("client_name"))?;
        let client_password =
            raw.get("client_password").ok_or(AppError::MissingField("client_password"))?;

        if client_name.is_empty() || !client_name.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(AppError::InvalidClientName(client_name.to_string()));
        }
        let client_name = client_name.to_lowercase();

        if client_password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AppError::WeakPassword);
        }

        let odoo_port = validated_port(raw, "odoo_port", DEFAULT_ODOO_PORT)?;
        let gevent_port = validated_port(raw, "gevent_port", DEFAULT_GEVENT_PORT)?;
        let db_port = validated_port(raw, "db_port", DEFAULT_DB_PORT)?;

        let path_to_install = match raw.get("path_to_install") {
            Some(path) => PathBuf::from(path),
            None => std::env::current_dir()?,
        };
        if !is_writable_dir(&path_to_install) {
            return Err(AppError::PathUnavailable(path_to_install));
        }

        let user = match raw.get("user") {
            Some(user) => user.to_string(),
            None => detect_user(),
        };

        let ip = match raw.get("ip") {
            Some(ip) => ip.to_string(),
            None => lookup.public_address().unwrap_or_else(|| {
                eprintln!(
                    "Warning: Could not determine public IP. Using '{FALLBACK_ADDRESS}'; \
                     specify it manually in the config file if needed."
                );
                FALLBACK_ADDRESS.to_string()
            }),
        };

        let db_user = raw.get("db_user").unwrap_or(DEFAULT_DB_USER).to_string();
        let odoo_db_name = raw.get("odoo_db_name").unwrap_or(&client_name).to_string();

        let install_dir = derive_install_path(&path_to_install, &client_name);
        let target_setup_dir = path_to_install.join(format!("{client_name}-odoo17-setup"));

        Ok(Self {
            client_title: title_case(&client_name),
            odoo_container_name: format!("odoo17-{client_name}"),
            db_container_name: format!("db-{client_name}"),
            client_name,
            client_password: client_password.to_string(),
            user,
            ip,
            odoo_port,
            gevent_port,
            db_port,
            db_user,
            odoo_db_name,
            path_to_install,
            install_dir,
            target_setup_dir,
        })
    }

    /// Directory name component of the canonical install path, used by the
    /// whole-file path-fragment rewrite.
    pub fn install_dir_name(&self) -> String {
        format!("{}-odoo-17", self.client_name)
    }

    /// Key/value pairs for the resolved-configuration summary.
    pub fn summary(&self) -> Vec<(&'static str, String)> {
        vec![
            ("client_name", self.client_name.clone()),
            ("client_password", self.client_password.clone()),
            ("user", self.user.clone()),
            ("ip", self.ip.clone()),
            ("odoo_port", self.odoo_port.clone()),
            ("gevent_port", self.gevent_port.clone()),
            ("db_port", self.db_port.clone()),
            ("db_user", self.db_user.clone()),
            ("odoo_db_name", self.odoo_db_name.clone()),
            ("path_to_install", self.path_to_install.display().to_string()),
            ("install_dir", self.install_dir.display().to_string()),
            ("target_setup_dir", self.target_setup_dir.display().to_string()),
            ("odoo_container_name", self.odoo_container_name.clone()),
            ("db_container_name", self.db_container_name.clone()),
        ]
    }
}

/// Join the client install directory name onto `base`, unless `base`
/// already ends with it. Appending twice must be a no-op.
pub fn derive_install_path(base: &Path, client_name: &str) -> PathBuf {
    let suffix = format!("{client_name}-odoo-17");
    if base.file_name().is_some_and(|name| name == suffix.as_str()) {
        base.to_path_buf()
    } else {
        base.join(suffix)
    }
}

/// First character uppercased, rest lowercased ("acme" -> "Acme").
pub fn title_case(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}

fn validated_port(raw: &RawConfig, key: &'static str, default: &str) -> Result<String, AppError> {
    let value = raw.get(key).unwrap_or(default);
    match value.parse::<u32>() {
        Ok(port) if (1..=65535).contains(&port) => Ok(value.to_string()),
        _ => Err(AppError::InvalidPort { key, value: value.to_string() }),
    }
}

fn detect_user() -> String {
    std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "root".to_string())
}

/// Probe the base path by creating and removing a hidden marker file.
fn is_writable_dir(path: &Path) -> bool {
    if !path.is_dir() {
        return false;
    }
    let probe = path.join(".odosetup-write-probe");
    match fs::OpenOptions::new().write(true).create(true).truncate(true).open(&probe) {
        Ok(_) => {
            let _ = fs::remove_file(&probe);
            true
        }
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::FixedAddress;
    use tempfile::TempDir;

    fn raw_with_base(base: &Path) -> RawConfig {
        let mut raw = RawConfig::default();
        raw.set("client_name", "acme");
        raw.set("client_password", "acme2025ok");
        raw.set("ip", "203.0.113.7");
        raw.set("user", "ubuntu");
        raw.set("path_to_install", base.to_string_lossy());
        raw
    }

    #[test]
    fn parse_skips_comments_blanks_and_empty_values() {
        let raw = RawConfig::parse(
            "# comment\n\nclient_name=acme\nip=\nodoo_port = 9000\nno_equals_line\n",
        );
        assert_eq!(raw.get("client_name"), Some("acme"));
        assert_eq!(raw.get("odoo_port"), Some("9000"));
        assert_eq!(raw.get("ip"), None, "empty value must not override a default");
    }

    #[test]
    fn parse_splits_on_first_equals_only() {
        let raw = RawConfig::parse("client_password=a=b=c\n");
        assert_eq!(raw.get("client_password"), Some("a=b=c"));
    }

    #[test]
    fn resolve_applies_defaults_and_derivations() {
        let base = TempDir::new().unwrap();
        let raw = raw_with_base(base.path());
        let config = ResolvedConfig::resolve(&raw, &FixedAddress::unavailable()).unwrap();

        assert_eq!(config.odoo_port, DEFAULT_ODOO_PORT);
        assert_eq!(config.gevent_port, DEFAULT_GEVENT_PORT);
        assert_eq!(config.db_port, DEFAULT_DB_PORT);
        assert_eq!(config.db_user, DEFAULT_DB_USER);
        assert_eq!(config.odoo_db_name, "acme");
        assert_eq!(config.client_title, "Acme");
        assert_eq!(config.odoo_container_name, "odoo17-acme");
        assert_eq!(config.db_container_name, "db-acme");
        assert_eq!(config.install_dir, base.path().join("acme-odoo-17"));
        assert_eq!(config.target_setup_dir, base.path().join("acme-odoo17-setup"));
    }

    #[test]
    fn resolve_folds_client_name_to_lowercase() {
        let base = TempDir::new().unwrap();
        let mut raw = raw_with_base(base.path());
        raw.set("client_name", "AcmeCorp");
        let config = ResolvedConfig::resolve(&raw, &FixedAddress::unavailable()).unwrap();
        assert_eq!(config.client_name, "acmecorp");
        assert_eq!(config.client_title, "Acmecorp");
    }

    #[test]
    fn resolve_rejects_missing_required_fields() {
        let base = TempDir::new().unwrap();
        let mut raw = RawConfig::default();
        raw.set("path_to_install", base.path().to_string_lossy());
        let err = ResolvedConfig::resolve(&raw, &FixedAddress::unavailable()).unwrap_err();
        assert!(matches!(err, AppError::MissingField("client_name")));
    }

    #[test]
    fn resolve_rejects_non_alphanumeric_name() {
        let base = TempDir::new().unwrap();
        let mut raw = raw_with_base(base.path());
        raw.set("client_name", "acme-corp");
        let err = ResolvedConfig::resolve(&raw, &FixedAddress::unavailable()).unwrap_err();
        assert!(matches!(err, AppError::InvalidClientName(name) if name == "acme-corp"));
    }

    #[test]
    fn resolve_rejects_weak_password() {
        let base = TempDir::new().unwrap();
        let mut raw = raw_with_base(base.path());
        raw.set("client_password", "short");
        let err = ResolvedConfig::resolve(&raw, &FixedAddress::unavailable()).unwrap_err();
        assert!(matches!(err, AppError::WeakPassword));
    }

    #[test]
    fn resolve_rejects_out_of_range_port() {
        let base = TempDir::new().unwrap();
        let mut raw = raw_with_base(base.path());
        raw.set("odoo_port", "70000");
        let err = ResolvedConfig::resolve(&raw, &FixedAddress::unavailable()).unwrap_err();
        assert!(matches!(err, AppError::InvalidPort { key: "odoo_port", .. }));

        let mut raw = raw_with_base(base.path());
        raw.set("db_port", "not-a-port");
        let err = ResolvedConfig::resolve(&raw, &FixedAddress::unavailable()).unwrap_err();
        assert!(matches!(err, AppError::InvalidPort { key: "db_port", .. }));
    }

    #[test]
    fn resolve_rejects_missing_install_base() {
        let base = TempDir::new().unwrap();
        let mut raw = raw_with_base(base.path());
        raw.set("path_to_install", base.path().join("nope").to_string_lossy());
        let err = ResolvedConfig::resolve(&raw, &FixedAddress::unavailable()).unwrap_err();
        assert!(matches!(err, AppError::PathUnavailable(_)));
    }

    #[test]
    fn resolve_uses_lookup_when_ip_blank() {
        let base = TempDir::new().unwrap();
        let raw = RawConfig::parse(&format!(
            "client_name=acme\nclient_password=acme2025ok\nuser=ubuntu\nip=\npath_to_install={}\n",
            base.path().display()
        ));
        let config = ResolvedConfig::resolve(&raw, &FixedAddress::new("198.51.100.4")).unwrap();
        assert_eq!(config.ip, "198.51.100.4");

        let config = ResolvedConfig::resolve(&raw, &FixedAddress::unavailable()).unwrap();
        assert_eq!(config.ip, FALLBACK_ADDRESS);
    }

    #[test]
    fn resolve_is_deterministic() {
        let base = TempDir::new().unwrap();
        let raw = raw_with_base(base.path());
        let lookup = FixedAddress::new("198.51.100.4");
        let first = ResolvedConfig::resolve(&raw, &lookup).unwrap();
        let second = ResolvedConfig::resolve(&raw, &lookup).unwrap();
        assert_eq!(format!("{first:?}"), format!("{second:?}"));
    }

    #[test]
    fn derive_install_path_is_idempotent() {
        let base = Path::new("/opt");
        let once = derive_install_path(base, "acme");
        let twice = derive_install_path(&once, "acme");
        assert_eq!(once, Path::new("/opt/acme-odoo-17"));
        assert_eq!(once, twice);
    }

    #[test]
    fn derive_install_path_appends_for_other_suffixes() {
        let base = Path::new("/opt/acme-odoo-17");
        assert_eq!(derive_install_path(base, "globex"), base.join("globex-odoo-17"));
    }

    #[test]
    fn title_case_handles_short_names() {
        assert_eq!(title_case("acme"), "Acme");
        assert_eq!(title_case("x"), "X");
        assert_eq!(title_case(""), "");
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn derive_install_path_idempotent(name in "[a-z0-9]{1,12}", base in "/[a-z]{1,8}") {
                let once = derive_install_path(Path::new(&base), &name);
                let twice = derive_install_path(&once, &name);
                prop_assert_eq!(once, twice);
            }
        }
    }
}
