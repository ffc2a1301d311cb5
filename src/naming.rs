//! File name sanitizing for stored uploads and exported documents.

use regex::Regex;
use std::sync::OnceLock;

fn unsafe_run() -> &'static Regex {
    static UNSAFE: OnceLock<Regex> = OnceLock::new();
    UNSAFE.get_or_init(|| Regex::new(r"[^A-Za-z0-9._@+-]+").expect("constant pattern"))
}

/// Reduce `name` to a single safe path component.
///
/// Directory parts are discarded, unsafe runs become `_`, and leading dots
/// are stripped so the result can never escape or hide in its directory.
pub fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let cleaned = unsafe_run().replace_all(base, "_");
    let trimmed = cleaned.trim_start_matches('.').trim_matches('_');
    if trimmed.is_empty() {
        "upload".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Check that `name` is a single path component without traversal.
pub fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\', '\0'])
}
