pub mod config;
pub mod error;
pub mod role;
pub mod tokens;

pub use config::{FALLBACK_ADDRESS, RawConfig, ResolvedConfig, derive_install_path, title_case};
pub use error::{AppError, MIN_PASSWORD_LEN};
pub use role::{ENTERPRISE_DEB, FileRole, PathStrategy, REQUIRED_DIRS, SKIPPED_ENTRIES};
