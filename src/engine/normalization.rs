use url::Url;

// * Resolves an href found on a provider page into an absolute URL.
// *
// * Logic:
// * 1. Join href with base_url (relative and root-relative links).
// * 2. Strip Fragment (#).
// * 3. Lowercase Hostname.
// * The query string is kept verbatim; document hosts sign their download links.
pub fn resolve_href(href: &str, base_url: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }

    // * Step 1: Parse Base and Join
    let base = Url::parse(base_url).ok()?;
    let mut url = base.join(href).ok()?;

    // * Only fetchable schemes survive (drops javascript:, mailto:)
    if url.scheme() != "http" && url.scheme() != "https" {
        return None;
    }

    // * Step 2: Strip Fragment
    url.set_fragment(None);

    // * Step 3: Lowercase Hostname
    if let Some(host) = url.host_str() {
        let lower_host = host.to_lowercase();
        if url.set_host(Some(&lower_host)).is_err() {
            return None;
        }
    }

    Some(url.to_string())
}
