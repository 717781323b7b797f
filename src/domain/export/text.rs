//! Text helpers shared by the Markdown and HTML exporters.

use chrono::Datelike;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::foundation::Timestamp;

/// Fallback for absent dates and authors.
pub const NOT_SPECIFIED: &str = "No especificado";

const MONTHS: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

static NON_SLUG_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-zA-Z0-9_\s-]").expect("slug pattern is valid"));
static WHITESPACE_RUNS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));
static HYPHEN_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"--+").expect("hyphen pattern is valid"));

/// Heading-to-link slug.
///
/// Deterministic but not collision-free: equal headings give equal anchors.
pub fn generate_anchor(text: &str) -> String {
    let lowered = text.to_lowercase();
    let stripped = NON_SLUG_CHARS.replace_all(&lowered, "");
    let hyphenated = WHITESPACE_RUNS.replace_all(&stripped, "-");
    HYPHEN_RUNS.replace_all(&hyphenated, "-").trim().to_string()
}

/// Turns a camelCase key into a heading: `codeBlocks` becomes `Code Blocks`.
pub fn humanize_key(key: &str) -> String {
    let mut spaced = String::with_capacity(key.len() + 4);
    for c in key.chars() {
        if c.is_ascii_uppercase() {
            spaced.push(' ');
        }
        spaced.push(c);
    }

    let mut chars = spaced.chars();
    let capitalized = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
        None => String::new(),
    };
    capitalized.trim().to_string()
}

/// Long Spanish date, e.g. `15 de enero de 2024`, in UTC.
pub fn format_date(timestamp: Option<&Timestamp>) -> String {
    match timestamp {
        Some(ts) => {
            let date = ts.as_datetime().date_naive();
            format!(
                "{} de {} de {}",
                date.day(),
                MONTHS[date.month0() as usize],
                date.year()
            )
        }
        None => NOT_SPECIFIED.to_string(),
    }
}

/// Escape HTML special characters.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    // ───────────────────────────────────────────────────────────────
    // Anchors
    // ───────────────────────────────────────────────────────────────

    #[test]
    fn anchor_lowercases_and_hyphenates() {
        assert_eq!(generate_anchor("Core Features"), "core-features");
        assert_eq!(generate_anchor("RAG  System"), "rag-system");
    }

    #[test]
    fn anchor_strips_punctuation_and_collapses_hyphens() {
        assert_eq!(generate_anchor("Export & History"), "export-history");
        assert_eq!(generate_anchor("a - b"), "a-b");
        assert_eq!(generate_anchor("Tools (v2)!"), "tools-v2");
    }

    #[test]
    fn anchor_drops_non_ascii_letters() {
        assert_eq!(generate_anchor("Configuración"), "configuracin");
        assert_eq!(generate_anchor("🎨 UI"), "-ui");
    }

    #[test]
    fn duplicate_headings_share_anchor() {
        assert_eq!(generate_anchor("Intro"), generate_anchor("Intro"));
    }

    // ───────────────────────────────────────────────────────────────
    // Keys and dates
    // ───────────────────────────────────────────────────────────────

    #[test]
    fn humanize_splits_camel_case() {
        assert_eq!(humanize_key("codeBlocks"), "Code Blocks");
        assert_eq!(humanize_key("features"), "Features");
        assert_eq!(humanize_key("ragDescription"), "Rag Description");
        assert_eq!(humanize_key("URL"), "U R L");
        assert_eq!(humanize_key(""), "");
    }

    #[test]
    fn date_is_long_spanish_form() {
        let ts = Timestamp::from_datetime(Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap());
        assert_eq!(format_date(Some(&ts)), "15 de enero de 2024");
    }

    #[test]
    fn absent_date_is_not_specified() {
        assert_eq!(format_date(None), "No especificado");
    }

    #[test]
    fn escape_covers_markup_characters() {
        assert_eq!(html_escape("<a href=\"x\">&</a>"), "&lt;a href=&quot;x&quot;&gt;&amp;&lt;/a&gt;");
    }
}
