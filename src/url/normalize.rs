use url::Url;

/// Resolves a possibly-relative link into an absolute URL
///
/// If `link` already carries both a scheme and a host it is returned
/// unchanged. Otherwise it is resolved against `base` (scheme + host,
/// possibly with a path) per standard relative-URL resolution.
///
/// This function never fails: input that cannot be resolved is returned
/// as-is, since the link grammars never feed free-text strings here.
///
/// # Examples
///
/// ```
/// use arxiv_trawler::url::ensure_absolute;
///
/// assert_eq!(
///     ensure_absolute("/abs/1234.5678", "https://arxiv.org"),
///     "https://arxiv.org/abs/1234.5678"
/// );
/// assert_eq!(
///     ensure_absolute("https://x.org/y", "https://arxiv.org"),
///     "https://x.org/y"
/// );
/// ```
pub fn ensure_absolute(link: &str, base: &str) -> String {
    // Already absolute: scheme and host both present
    if let Ok(parsed) = Url::parse(link) {
        if parsed.has_host() {
            return link.to_string();
        }
    }

    match Url::parse(base).and_then(|base_url| base_url.join(link)) {
        Ok(joined) => joined.to_string(),
        // Best effort: the caller deals in grammar-matched links, so a
        // failure here means a broken base rather than a broken link
        Err(_) => link.to_string(),
    }
}
