//! Share-link derivation for publicly shared shopping lists.
//!
//! A list's `guid` is a bearer credential: anyone holding it can read (and,
//! for shared lists, edit) the list without authenticating. The guid is a
//! random UUID v4, regenerated whenever sharing is disabled so previously
//! distributed links stop working.

use serde::Serialize;
use uuid::Uuid;

/// Generate a fresh share guid.
pub fn new_share_guid() -> Uuid {
    Uuid::new_v4()
}

/// URLs a client can use to reach a shared list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShareUrls {
    pub api_url: String,
    pub web_url: String,
    pub full_api_url: String,
    pub full_web_url: String,
}

/// Derive the share URLs for a guid. Pure; no state change.
pub fn share_urls(base_url: &str, guid: &Uuid) -> ShareUrls {
    let api_url = format!("/api/v1/shared/{guid}");
    let web_url = format!("/shared/{guid}");
    let base = base_url.trim_end_matches('/');
    ShareUrls {
        full_api_url: format!("{base}{api_url}"),
        full_web_url: format!("{base}{web_url}"),
        api_url,
        web_url,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_share_urls_strip_trailing_slash() {
        let guid = new_share_guid();
        let urls = share_urls("https://example.test/", &guid);
        assert_eq!(urls.full_api_url, format!("https://example.test/api/v1/shared/{guid}"));
        assert_eq!(urls.full_web_url, format!("https://example.test/shared/{guid}"));
    }

    #[test]
    fn test_fresh_guids_differ() {
        assert_ne!(new_share_guid(), new_share_guid());
    }
}
