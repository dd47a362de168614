// * On-disk naming for downloaded documents.
// * Remote labels are untrusted; only word characters, spaces and hyphens survive.

use regex::Regex;
use std::sync::LazyLock;

use crate::config::constants::FALLBACK_EXTENSION;

static PATTERN_EXCLUDED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s-]").expect("Invalid excluded-char regex"));
static PATTERN_SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-\s]+").expect("Invalid separator regex"));

// * Stem used when sanitization leaves nothing behind
const EMPTY_NAME: &str = "document";

// * Suffixes trusted verbatim when the URL, or its path, ends with them
const SUFFIX_EXTENSIONS: &[&str] = &[".pdf", ".zip", ".html"];

// * Provider defaults, first case-insensitive substring hit wins
pub const PROVIDER_EXTENSIONS: &[(&str, &str)] = &[
    ("bseindia.com", ".pdf"),
    ("nseindia.com", ".pdf"),
    ("nsearchives", ".pdf"),
    ("icra.in", ".html"),
    ("crisil.com", ".html"),
    ("careratings.com", ".html"),
    ("careedge.in", ".html"),
    ("indiaratings.co.in", ".html"),
    ("brickworkratings.com", ".html"),
    ("acuite.in", ".html"),
    ("youtube.com", ".html"),
    ("youtu.be", ".html"),
];

/// Turns free text into a single safe path component.
///
/// Characters outside {word, whitespace, hyphen} are removed, then each run of
/// hyphens/whitespace becomes one underscore.
pub fn sanitize_component(text: &str) -> String {
    let stripped = PATTERN_EXCLUDED.replace_all(text, "");
    // * Edge separators are dropped before collapsing; underscores from the text itself stay
    let trimmed = stripped.trim_matches(|c: char| c.is_whitespace() || c == '-');
    let name = PATTERN_SEPARATORS.replace_all(trimmed, "_");
    if name.is_empty() {
        EMPTY_NAME.to_string()
    } else {
        name.to_string()
    }
}

/// File extension for a remote document (leading dot included)
pub fn infer_extension(url: &str) -> &'static str {
    let lower = url.to_lowercase();
    let path = lower.split(&['?', '#'][..]).next().unwrap_or_default();

    if let Some(ext) = SUFFIX_EXTENSIONS
        .iter()
        .copied()
        .find(|ext| lower.ends_with(ext) || path.ends_with(ext))
    {
        return ext;
    }

    PROVIDER_EXTENSIONS
        .iter()
        .find(|(needle, _)| lower.contains(*needle))
        .map(|(_, ext)| *ext)
        .unwrap_or(FALLBACK_EXTENSION)
}
