//! File names for saved PDFs.

use url::Url;

/// Name used when no better one can be derived.
pub const DEFAULT_FILENAME: &str = "download.pdf";

/// Longest title-derived stem, in characters, before the `.pdf` suffix.
pub const MAX_STEM_CHARS: usize = 100;

const FORBIDDEN: &[char] = &['/', '\\', '?', '%', '*', ':', '|', '"', '<', '>'];

/// Derive a file name from a document title.
///
/// Each forbidden character is replaced by `-`, the result is trimmed and
/// cut to [`MAX_STEM_CHARS`], and `.pdf` is appended when missing. With
/// `auto_rename` off, or without a title, the name is [`DEFAULT_FILENAME`].
pub fn sanitize_title(title: Option<&str>, auto_rename: bool) -> String {
    let title = match title {
        Some(t) if auto_rename && !t.trim().is_empty() => t,
        _ => return DEFAULT_FILENAME.to_string(),
    };

    let replaced: String = title
        .chars()
        .map(|c| if FORBIDDEN.contains(&c) { '-' } else { c })
        .collect();
    let mut name: String = replaced.trim().chars().take(MAX_STEM_CHARS).collect();

    if !name.ends_with(".pdf") {
        name.push_str(".pdf");
    }
    name
}

/// Derive a file name from a download address.
///
/// Takes the last path segment without query or fragment. Falls back to
/// [`DEFAULT_FILENAME`] and always ends in `.pdf`.
pub fn filename_from_url(url: &str) -> String {
    let segment = match Url::parse(url) {
        Ok(parsed) => parsed
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .map(str::to_string)
            .unwrap_or_default(),
        Err(_) => url
            .split(['#', '?'])
            .next()
            .and_then(|path| path.rsplit('/').next())
            .unwrap_or_default()
            .to_string(),
    };

    let mut name = if segment.is_empty() {
        DEFAULT_FILENAME.to_string()
    } else {
        segment
    };
    if !name.ends_with(".pdf") {
        name.push_str(".pdf");
    }
    name
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_replaces_each_forbidden_char() {
        assert_eq!(
            sanitize_title(Some("My/Report: Final*2024"), true),
            "My-Report- Final-2024.pdf"
        );
        assert_eq!(
            sanitize_title(Some(r#"a\b?c%d|e"f<g>h"#), true),
            "a-b-c-d-e-f-g-h.pdf"
        );
    }

    #[test]
    fn test_sanitize_keeps_existing_suffix() {
        assert_eq!(sanitize_title(Some(" paper.pdf "), true), "paper.pdf");
    }

    #[test]
    fn test_sanitize_truncates_before_suffix() {
        let title = "x".repeat(250);
        let name = sanitize_title(Some(&title), true);
        assert_eq!(name.len(), MAX_STEM_CHARS + 4);
        assert!(name.ends_with(".pdf"));
    }

    #[test]
    fn test_sanitize_truncates_by_chars() {
        let title = "가".repeat(120);
        let name = sanitize_title(Some(&title), true);
        assert_eq!(name.chars().count(), MAX_STEM_CHARS + 4);
    }

    #[test]
    fn test_sanitize_defaults() {
        assert_eq!(sanitize_title(Some("Report"), false), DEFAULT_FILENAME);
        assert_eq!(sanitize_title(None, true), DEFAULT_FILENAME);
        assert_eq!(sanitize_title(Some("   "), true), DEFAULT_FILENAME);
    }

    #[test]
    fn test_filename_from_url() {
        assert_eq!(
            filename_from_url("https://x.example/a/b/report.pdf?x=1#y"),
            "report.pdf"
        );
        assert_eq!(
            filename_from_url("https://x.example/download/12345"),
            "12345.pdf"
        );
        assert_eq!(filename_from_url("https://x.example/"), DEFAULT_FILENAME);
        assert_eq!(filename_from_url("/files/thesis.pdf?dl=1"), "thesis.pdf");
    }
}
