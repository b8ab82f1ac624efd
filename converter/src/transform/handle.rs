//! URL handle generation.
//!
//! Handles are derived from the title (plus the variant label for variant
//! rows). Nothing here guarantees uniqueness: two different titles can
//! produce the same handle. Only SKUs are deduplicated.

use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));
static NOT_HANDLE_CHAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9\-]").expect("valid handle charset regex"));
static HYPHEN_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"-+").expect("valid hyphen regex"));

/// Lowercase, hyphenate whitespace, drop everything outside `[a-z0-9-]`.
fn sanitize(part: &str) -> String {
    let lower = part.trim().to_lowercase();
    let hyphenated = WHITESPACE.replace_all(&lower, "-");
    let filtered = NOT_HANDLE_CHAR.replace_all(&hyphenated, "");
    HYPHEN_RUN
        .replace_all(&filtered, "-")
        .trim_matches('-')
        .to_string()
}

/// Build a Shopify handle from a title and an optional variant label.
///
/// ```
/// use matrixify::transform::handle::generate_handle;
///
/// assert_eq!(generate_handle("Blue Mug", ""), "blue-mug");
/// assert_eq!(generate_handle("Desk Lamp", "Warm White"), "desk-lamp-warm-white");
/// ```
pub fn generate_handle(title: &str, variant: &str) -> String {
    if title.trim().is_empty() {
        return String::new();
    }

    let base = sanitize(title);
    let suffix = sanitize(variant);

    match (base.is_empty(), suffix.is_empty()) {
        (_, true) => base,
        (true, false) => suffix,
        (false, false) => format!("{}-{}", base, suffix),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_only() {
        assert_eq!(generate_handle("Blue Mug", ""), "blue-mug");
        assert_eq!(generate_handle("  Blue   Mug  ", ""), "blue-mug");
    }

    #[test]
    fn test_empty_title() {
        assert_eq!(generate_handle("", "Red"), "");
        assert_eq!(generate_handle("   ", "Red"), "");
    }

    #[test]
    fn test_punctuation_removed_and_hyphens_collapsed() {
        assert_eq!(generate_handle("Mug (12oz) - Blue!", ""), "mug-12oz-blue");
        assert_eq!(generate_handle("--Edge--Case--", ""), "edge-case");
        assert_eq!(generate_handle("Crème Brûlée Set", ""), "crme-brle-set");
    }

    #[test]
    fn test_variant_suffix() {
        assert_eq!(generate_handle("Lamp", "Red"), "lamp-red");
        assert_eq!(generate_handle("Lamp", "Size: XL / Tall"), "lamp-size-xl-tall");
    }

    #[test]
    fn test_suffix_that_sanitizes_away() {
        assert_eq!(generate_handle("Lamp", "★★"), "lamp");
        assert_eq!(generate_handle("★", "Red"), "red");
    }

    #[test]
    fn test_deterministic() {
        let a = generate_handle("Garden Hose 15m", "Green");
        let b = generate_handle("Garden Hose 15m", "Green");
        assert_eq!(a, b);
    }
}
