//! Placeholder substitution engine.
//!
//! Literal constructs (container names, title phrases) are resolved first;
//! then one pass over the content: every `{name}` lookup uses the
//! pre-resolved configuration value, and replacement text is written
//! verbatim, never re-expanded. Identity tokens additionally require a clear
//! word boundary around the braces so a token embedded in a longer
//! identifier is never partially rewritten.

use std::sync::LazyLock;

use regex::Regex;

use crate::domain::config::ResolvedConfig;
use crate::domain::tokens;

static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{[A-Za-z_]+\}").expect("valid token pattern"));

/// Result of substituting one file's content.
#[derive(Debug, Clone)]
pub struct SubstitutionOutcome {
    pub content: String,
    /// Placeholder names still present after substitution and not covered
    /// by the ignore list. Reported as warnings, never fatal.
    pub unresolved: Vec<String>,
}

/// Apply the token registry to `content`.
///
/// Substituting already-substituted content is a no-op for every active
/// token, since the placeholder literal no longer appears.
pub fn substitute(content: &str, config: &ResolvedConfig) -> SubstitutionOutcome {
    // Literal constructs first: their embedded identity token sits next to a
    // word character and would fail the boundary check below.
    let content = tokens::resolve_literal_constructs(content, config);
    let content = content.as_str();

    let mut out = String::with_capacity(content.len());
    let mut last = 0;

    for found in TOKEN_RE.find_iter(content) {
        let name = &content[found.start() + 1..found.end() - 1];
        let replacement = match tokens::identity_replacement(name, config) {
            Some(value) if clear_boundary(content, found.start(), found.end()) => Some(value),
            Some(_) => None,
            None => tokens::replacement_for(name, config),
        };

        out.push_str(&content[last..found.start()]);
        match replacement {
            Some(value) => out.push_str(&value),
            None => out.push_str(found.as_str()),
        }
        last = found.end();
    }
    out.push_str(&content[last..]);

    let unresolved = scan_unresolved(&out);
    SubstitutionOutcome { content: out, unresolved }
}

/// Rewrite the template's `/odoo17` path fragments to the client install
/// directory name. Only whole-file roles get this pass; line-patch roles
/// write the path through assignment patching instead.
pub fn rewrite_path_fragments(content: &str, config: &ResolvedConfig) -> String {
    let dir_name = config.install_dir_name();
    content
        .replace("/odoo17/", &format!("/{dir_name}/"))
        .replace("/odoo17\"", &format!("/{dir_name}\""))
        .replace("/odoo17 ", &format!("/{dir_name} "))
}

/// Collect remaining `{name}` tokens not covered by the ignore list,
/// deduplicated in first-seen order.
fn scan_unresolved(content: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for found in TOKEN_RE.find_iter(content) {
        let name = &content[found.start() + 1..found.end() - 1];
        if !tokens::is_ignored(name) && !names.iter().any(|seen| seen == name) {
            names.push(name.to_string());
        }
    }
    names
}

/// The characters adjacent to the braces must not be alphanumeric, `-`,
/// or `_`.
fn clear_boundary(content: &str, start: usize, end: usize) -> bool {
    let before = content[..start].chars().next_back();
    let after = content[end..].chars().next();
    !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}
