//! Domain exclusion gate for automatic runs.

/// Check whether `hostname` is excluded by a newline-separated domain list.
///
/// Entries are trimmed and blank ones ignored. A host is excluded when it
/// contains any entry as a substring, so `google.com` also excludes
/// `docs.google.com` (and `notgoogle.com`).
pub fn is_excluded(hostname: &str, exclusion_list: &str) -> bool {
    exclusion_list
        .lines()
        .map(str::trim)
        .filter(|domain| !domain.is_empty())
        .any(|domain| hostname.contains(domain))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substring_match() {
        assert!(is_excluded("docs.google.com", "google.com"));
        assert!(is_excluded("notgoogle.com", "google.com"));
        assert!(!is_excluded("example.org", "google.com"));
    }

    #[test]
    fn test_list_parsing() {
        let list = "  example.org  \n\n\r\nreader.example.com\n";
        assert!(is_excluded("example.org", list));
        assert!(is_excluded("reader.example.com", list));
        assert!(!is_excluded("other.net", list));
    }

    #[test]
    fn test_empty_list_never_excludes() {
        assert!(!is_excluded("example.org", ""));
        assert!(!is_excluded("example.org", "   \n  \n"));
        assert!(!is_excluded("", ""));
    }
}
