//! Consistency guard: per-file duplicate-path detection.
//!
//! On line-patch roles the canonical install path is written exactly once.
//! A second occurrence means two rewrite passes collided (typically a token
//! substitution and the assignment patch both wrote the path), and the run
//! must halt before a bundle that may deploy to the wrong location is
//! emitted.

use std::path::Path;

use crate::domain::error::AppError;

/// Verify that `canonical_path` occurs at most once in `content`.
///
/// Fails with [`AppError::DuplicatePath`] listing every offending line.
pub fn verify(content: &str, canonical_path: &Path, file: &Path) -> Result<(), AppError> {
    let needle = canonical_path.display().to_string();
    let count = content.matches(&needle).count();
    if count <= 1 {
        return Ok(());
    }

    let lines = content
        .lines()
        .enumerate()
        .filter(|(_, line)| line.contains(&needle))
        .map(|(index, line)| format!("  {}: {}", index + 1, line))
        .collect::<Vec<_>>()
        .join("\n");

    Err(AppError::DuplicatePath { file: file.to_path_buf(), count, lines })
}
