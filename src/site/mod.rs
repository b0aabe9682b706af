//! Site identity extraction and top-N ranking for the stats path.

use std::collections::HashMap;

use url::Url;

/// Derive the grouping identity for a URL.
///
/// Recognized scheme prefixes (`http://`, `https://`) are stripped and the
/// remainder is truncated at the first path slash. Other strings keep their
/// scheme; only the path part is dropped. No case folding or `www.`
/// stripping happens here — see [`normalize_host`].
pub fn extract_site(url: &str) -> &str {
    if let Some(rest) = url
        .strip_prefix("http://")
        .or_else(|| url.strip_prefix("https://"))
    {
        return match rest.find('/') {
            Some(slash) => &rest[..slash],
            None => rest,
        };
    }

    let authority = url.find("://").map(|i| i + 3).unwrap_or(0);
    match url[authority..].find('/') {
        Some(slash) => &url[..authority + slash],
        None => url,
    }
}

/// General-purpose host normalization: the lower-cased host with a leading
/// `www.` stripped, or `None` for strings that don't parse as URLs.
///
/// The stats ranking groups on raw [`extract_site`] output instead, so
/// `www.a.com` and `a.com` stay distinct there.
pub fn normalize_host(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?.to_ascii_lowercase();
    Some(host.strip_prefix("www.").unwrap_or(&host).to_owned())
}

/// Rank sites by summed visit weight, descending, truncated to `limit`.
/// Only the identities are returned. The order among sites with equal sums
/// is unspecified.
pub fn top_sites<'a, I>(records: I, limit: usize) -> Vec<String>
where
    I: IntoIterator<Item = (&'a str, i64)>,
{
    let mut weights: HashMap<String, i64> = HashMap::new();
    for (url, visits) in records {
        *weights.entry(extract_site(url).to_owned()).or_insert(0) += visits;
    }

    let mut ranked: Vec<(String, i64)> = weights.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(limit);
    ranked.into_iter().map(|(site, _)| site).collect()
}
