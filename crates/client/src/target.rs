//! Parsing of user-supplied URLs.
//!
//! Callers paste links with or without a scheme (`youtu.be/abc`,
//! `example.com/article`). Classification only needs a best-effort [`Url`];
//! fetching needs an http(s) one and rejects everything else.

use std::borrow::Cow;

use synthese_core::Error;
use url::Url;

/// `input` trimmed, with `https://` prepended when it names no scheme.
pub fn with_default_scheme(input: &str) -> Cow<'_, str> {
    let trimmed = input.trim();
    if trimmed.contains("://") { Cow::Borrowed(trimmed) } else { Cow::Owned(format!("https://{trimmed}")) }
}

/// Best-effort parse for classification. Any scheme is accepted.
pub fn parse_lenient(input: &str) -> Option<Url> {
    if input.trim().is_empty() {
        return None;
    }
    Url::parse(&with_default_scheme(input)).ok()
}

/// Whether `url`'s host is `domain` or one of its subdomains.
pub fn host_is(url: &Url, domain: &str) -> bool {
    url.host_str().is_some_and(|host| {
        let host = host.to_ascii_lowercase();
        host == domain || host.strip_suffix(domain).is_some_and(|rest| rest.ends_with('.'))
    })
}

/// URL the fetcher may request.
///
/// The scheme defaults to https, only http and https are accepted, and the
/// fragment is dropped since it never reaches the server.
///
/// # Errors
///
/// `InvalidUrl` for blank input, unparseable text or another scheme.
pub fn fetch_target(input: &str) -> Result<Url, Error> {
    if input.trim().is_empty() {
        return Err(Error::InvalidUrl("empty URL".into()));
    }

    let mut url = Url::parse(&with_default_scheme(input)).map_err(|e| Error::InvalidUrl(format!("{input:?}: {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::InvalidUrl(format!("unsupported scheme {:?}", url.scheme())));
    }
    url.set_fragment(None);
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scheme() {
        assert_eq!(with_default_scheme("  youtu.be/abc "), "https://youtu.be/abc");
        assert_eq!(with_default_scheme("http://example.com"), "http://example.com");
        assert!(matches!(with_default_scheme("ftp://example.com"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_parse_lenient() {
        let url = parse_lenient("WWW.YouTube.com/watch?v=abc").unwrap();
        assert_eq!(url.host_str(), Some("www.youtube.com"));
        assert!(parse_lenient("   ").is_none());
        assert!(parse_lenient("youtube.com watch v=abc").is_none());
        assert_eq!(parse_lenient("ftp://youtube.com/x").unwrap().scheme(), "ftp");
    }

    #[test]
    fn test_host_is() {
        let url = parse_lenient("https://m.youtu.be/abc").unwrap();
        assert!(host_is(&url, "youtu.be"));
        assert!(!host_is(&url, "be"));
        assert!(host_is(&parse_lenient("YOUTU.BE/abc").unwrap(), "youtu.be"));
        assert!(!host_is(&parse_lenient("https://notyoutu.be/abc").unwrap(), "youtu.be"));
    }

    #[test]
    fn test_fetch_target_keeps_query_and_drops_fragment() {
        let url = fetch_target("https://www.youtube.com/watch?v=xyz789&t=30#comments").unwrap();
        assert_eq!(url.as_str(), "https://www.youtube.com/watch?v=xyz789&t=30");

        let url = fetch_target("http://127.0.0.1:8080/page").unwrap();
        assert_eq!(url.port(), Some(8080));
    }

    #[test]
    fn test_fetch_target_rejects() {
        for input in ["", "  ", "file:///etc/passwd", "ftp://example.com/a", "https://"] {
            let err = fetch_target(input).unwrap_err();
            assert!(matches!(err, Error::InvalidUrl(_)), "input {input:?}");
        }
    }
}
