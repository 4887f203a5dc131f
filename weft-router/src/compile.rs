//! Path-to-regex compilation.
//!
//! Route paths are plain strings with two token forms: `:name` for a
//! single-segment capture and `*`/`*name` for a greedy remainder capture.
//! Compilation escapes everything else, substitutes the tokens, and anchors
//! the result. Escaping runs before substitution so the substituted regex
//! syntax survives intact.

use crate::error::RouterError;
use once_cell::sync::Lazy;
use regex::Regex;

/// `:name` tokens (single path segment)
static NAMED_PARAM: Lazy<Regex> = Lazy::new(|| Regex::new(r":\w+").expect("literal regex"));

/// `*` / `*name` tokens (arbitrary remainder)
static SPLAT_PARAM: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\w*").expect("literal regex"));

/// Regex metacharacters and whitespace that must be escaped in literals
static ESCAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[-\[\]{}()+?.,\\^$|#\s]").expect("literal regex"));

/// Compile a route path into an anchored matcher.
///
/// A single leading `/` is stripped first, so `/posts/:id` and `posts/:id`
/// compile identically. `:name` becomes `([^/]+)` and `*`/`*name` becomes
/// `(.*?)`, in that order, after literal escaping.
pub fn compile_path(path: &str) -> Result<Regex, RouterError> {
    let trimmed = path.strip_prefix('/').unwrap_or(path);
    let escaped = ESCAPE.replace_all(trimmed, r"\$0");
    let with_named = NAMED_PARAM.replace_all(&escaped, "([^/]+)");
    let with_splats = SPLAT_PARAM.replace_all(&with_named, "(.*?)");
    Regex::new(&format!("^{with_splats}$")).map_err(|source| RouterError::Pattern {
        path: path.to_string(),
        source,
    })
}

/// Collect parameter names from a raw (uncompiled) route path.
///
/// Named parameters come first in order of appearance, then splats as
/// `splat`, `splat2`, `splat3`, ... This scan uses the same token regexes as
/// [`compile_path`], keeping names positionally aligned with the capture
/// groups the compiled pattern produces.
pub fn path_param_names(path: &str) -> Vec<String> {
    let mut names: Vec<String> = NAMED_PARAM
        .find_iter(path)
        .map(|m| m.as_str()[1..].to_string())
        .collect();
    for (i, _) in SPLAT_PARAM.find_iter(path).enumerate() {
        if i == 0 {
            names.push("splat".to_string());
        } else {
            names.push(format!("splat{}", i + 1));
        }
    }
    names
}
