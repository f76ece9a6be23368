/// Normalizes a cover image reference taken from markup
///
/// # Normalization Rules
///
/// | Input | Result |
/// |-------|--------|
/// | `//host/x.jpg` | `https://host/x.jpg` |
/// | `/path/x.jpg` | `<origin>/path/x.jpg` |
/// | anything else | unchanged |
///
/// # Examples
///
/// ```
/// use tadu_crawler::url::normalize_image_url;
///
/// let origin = "https://www.tadu.com";
/// assert_eq!(
///     normalize_image_url("//media3.tadu.com/a.jpg", origin),
///     "https://media3.tadu.com/a.jpg"
/// );
/// assert_eq!(normalize_image_url("/img/a.jpg", origin), "https://www.tadu.com/img/a.jpg");
/// ```
pub fn normalize_image_url(raw: &str, origin: &str) -> String {
    if raw.starts_with("//") {
        format!("https:{}", raw)
    } else if raw.starts_with('/') {
        format!("{}{}", origin.trim_end_matches('/'), raw)
    } else {
        raw.to_string()
    }
}

/// Resolves a next-chapter href against the store origin
///
/// The store renders next links as root-relative paths, so the trimmed href
/// is appended to the origin. Returns None for a blank href.
pub fn resolve_next_link(href: &str, origin: &str) -> Option<String> {
    let href = href.trim();

    if href.is_empty() {
        return None;
    }

    if href.starts_with("http://") || href.starts_with("https://") {
        return Some(href.to_string());
    }

    Some(format!("{}{}", origin.trim_end_matches('/'), href))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORIGIN: &str = "https://www.tadu.com";

    #[test]
    fn test_protocol_relative() {
        assert_eq!(
            normalize_image_url("//host/x.jpg", ORIGIN),
            "https://host/x.jpg"
        );
    }

    #[test]
    fn test_root_relative() {
        assert_eq!(
            normalize_image_url("/path/x.jpg", ORIGIN),
            "https://www.tadu.com/path/x.jpg"
        );
    }

    #[test]
    fn test_absolute_unchanged() {
        assert_eq!(
            normalize_image_url("https://media3.tadu.com/x.jpg", ORIGIN),
            "https://media3.tadu.com/x.jpg"
        );
    }

    #[test]
    fn test_empty_unchanged() {
        assert_eq!(normalize_image_url("", ORIGIN), "");
    }

    #[test]
    fn test_origin_trailing_slash() {
        assert_eq!(
            normalize_image_url("/x.jpg", "https://www.tadu.com/"),
            "https://www.tadu.com/x.jpg"
        );
    }

    #[test]
    fn test_resolve_next_link() {
        assert_eq!(
            resolve_next_link(" /book/5/2/ ", ORIGIN),
            Some("https://www.tadu.com/book/5/2/".to_string())
        );
    }

    #[test]
    fn test_resolve_blank_next_link() {
        assert_eq!(resolve_next_link("   ", ORIGIN), None);
    }

    #[test]
    fn test_resolve_absolute_next_link() {
        assert_eq!(
            resolve_next_link("https://www.tadu.com/book/5/3/", ORIGIN),
            Some("https://www.tadu.com/book/5/3/".to_string())
        );
    }
}
