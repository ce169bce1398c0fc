//! URL sanitization for redirect consumption
//!
//! External redirects (OAuth, payment checkout) carry one-shot state in
//! query parameters. After consuming them the shell must install a
//! path-only URL so reload or back-navigation cannot replay the redirect.

use std::collections::HashMap;
use url::Url;

/// Strip the query string and fragment from a URL, keeping everything up
/// to and including the path.
///
/// Accepts absolute URLs (`https://host/path?x=1`) and bare
/// path-plus-query strings (`/path?x=1`); malformed input falls back to
/// truncating at the first `?` or `#`.
pub fn path_only(raw: &str) -> String {
    if let Ok(parsed) = Url::parse(raw) {
        let mut sanitized = parsed.clone();
        sanitized.set_query(None);
        sanitized.set_fragment(None);
        return sanitized.to_string();
    }
    // Relative URL: truncate manually
    let end = raw.find(['?', '#']).unwrap_or(raw.len());
    raw[..end].to_string()
}

/// Extract the query parameters of a URL as a map.
///
/// Repeated keys keep the last value. Returns an empty map when the URL
/// carries no query string or cannot be parsed.
pub fn query_params(raw: &str) -> HashMap<String, String> {
    let query = match Url::parse(raw) {
        Ok(parsed) => parsed.query().map(|q| q.to_string()),
        Err(_) => raw.split_once('?').map(|(_, q)| {
            q.split_once('#').map(|(q, _)| q).unwrap_or(q).to_string()
        }),
    };

    match query {
        Some(q) => url::form_urlencoded::parse(q.as_bytes())
            .into_owned()
            .collect(),
        None => HashMap::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_only_absolute() {
        assert_eq!(
            path_only("https://app.example.com/jobs?token=abc&refresh=def#frag"),
            "https://app.example.com/jobs"
        );
    }

    #[test]
    fn test_path_only_relative() {
        assert_eq!(path_only("/jobs?checkout=success"), "/jobs");
        assert_eq!(path_only("/jobs"), "/jobs");
    }

    #[test]
    fn test_query_params_decoding() {
        let params = query_params("https://app.example.com/?user=%7B%22id%22%3A1%7D&error=denied");
        assert_eq!(params.get("user").unwrap(), "{\"id\":1}");
        assert_eq!(params.get("error").unwrap(), "denied");
    }

    #[test]
    fn test_query_params_relative_and_empty() {
        let params = query_params("/return?checkout=success&role=candidate");
        assert_eq!(params.get("checkout").unwrap(), "success");
        assert_eq!(params.get("role").unwrap(), "candidate");
        assert!(query_params("/return").is_empty());
    }
}
