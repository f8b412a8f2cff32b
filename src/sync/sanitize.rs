//! Workflow name to filename mapping.

use super::manifest::MANIFEST_FILE;

/// Longest filename stem produced, in characters.
pub const MAX_FILENAME_LEN: usize = 200;

/// Stem used when nothing usable is left of the name.
pub const FALLBACK_FILENAME: &str = "workflow";

const FORBIDDEN: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Convert a workflow name into a safe filename stem.
///
/// Spaces become underscores, characters Windows or Unix reject in paths are
/// dropped, leading and trailing dots are trimmed and the result is capped at
/// [`MAX_FILENAME_LEN`] characters. Sanitizing a sanitized name is a no-op.
pub fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| if c == ' ' { '_' } else { c })
        .filter(|c| !FORBIDDEN.contains(c))
        .collect();

    let trimmed = trim_dots_and_spaces(&cleaned);
    let truncated: String = trimmed.chars().take(MAX_FILENAME_LEN).collect();
    // Truncation can expose a trailing dot.
    let result = trim_dots_and_spaces(&truncated);

    if result.is_empty() {
        FALLBACK_FILENAME.to_string()
    } else {
        result.to_string()
    }
}

/// Filename for a workflow: sanitized name plus `.json`.
pub fn workflow_filename(name: &str) -> String {
    format!("{}.json", sanitize_filename(name))
}

/// Filename for a workflow that `is_taken` does not reject.
///
/// Tries `<name>.json`, then `<name>_<id>.json`, then `<name>_<id>_2.json`
/// and so on. [`MANIFEST_FILE`] is always taken, compared without case.
pub fn unique_workflow_filename(name: &str, id: &str, is_taken: impl Fn(&str) -> bool) -> String {
    let taken = |filename: &str| filename.eq_ignore_ascii_case(MANIFEST_FILE) || is_taken(filename);

    let filename = workflow_filename(name);
    if !taken(&filename) {
        return filename;
    }

    let stem = format!("{}_{}", sanitize_filename(name), sanitize_filename(id));
    let mut candidate = format!("{}.json", stem);
    let mut suffix = 2;
    while taken(&candidate) {
        candidate = format!("{}_{}.json", stem, suffix);
        suffix += 1;
    }
    candidate
}

fn trim_dots_and_spaces(s: &str) -> &str {
    s.trim_matches(|c| c == '.' || c == ' ')
}
