//! Region names and service endpoints.
//!
//! A service endpoint is derived from a template such as
//! `https://iaas.{region}.{secondLevelDomain}`. The region may be given by its full
//! name (`us-phoenix-1`) or its airport short code (`phx`); the second-level domain
//! depends on the realm the region belongs to.

use crate::{Error, Result};
use url::Url;

/// Second-level domain of the commercial realm.
pub const DEFAULT_SECOND_LEVEL_DOMAIN: &str = "oraclecloud.com";

const SHORT_CODES: &[(&str, &str)] = &[
    ("phx", "us-phoenix-1"),
    ("iad", "us-ashburn-1"),
    ("sjc", "us-sanjose-1"),
    ("fra", "eu-frankfurt-1"),
    ("zrh", "eu-zurich-1"),
    ("ams", "eu-amsterdam-1"),
    ("lhr", "uk-london-1"),
    ("yyz", "ca-toronto-1"),
    ("yul", "ca-montreal-1"),
    ("nrt", "ap-tokyo-1"),
    ("kix", "ap-osaka-1"),
    ("icn", "ap-seoul-1"),
    ("bom", "ap-mumbai-1"),
    ("syd", "ap-sydney-1"),
    ("mel", "ap-melbourne-1"),
    ("gru", "sa-saopaulo-1"),
    ("jed", "me-jeddah-1"),
    ("lfi", "us-langley-1"),
    ("luf", "us-luke-1"),
    ("ric", "us-gov-ashburn-1"),
    ("pia", "us-gov-chicago-1"),
    ("tus", "us-gov-phoenix-1"),
    ("ltn", "uk-gov-london-1"),
];

const REALM_DOMAINS: &[(&[&str], &str)] = &[
    (
        &["us-langley-1", "us-luke-1", "us-gov-ashburn-1", "us-gov-chicago-1", "us-gov-phoenix-1"],
        "oraclegovcloud.com",
    ),
    (&["uk-gov-london-1"], "oraclegovcloud.uk"),
];

/// Normalizes a region name: trims, lowercases and expands short codes.
///
/// Names this table does not know pass through, so new regions work without a release.
///
/// # Examples
///
/// ```
/// use coreservices::region::canonical_region;
///
/// assert_eq!(canonical_region("PHX"), "us-phoenix-1");
/// assert_eq!(canonical_region("ap-hyderabad-1"), "ap-hyderabad-1");
/// ```
pub fn canonical_region(region: &str) -> String {
    let region = region.trim().to_ascii_lowercase();
    SHORT_CODES
        .iter()
        .find(|(code, _)| *code == region)
        .map(|(_, name)| (*name).to_string())
        .unwrap_or(region)
}

/// The second-level domain of the realm `region` belongs to.
pub fn second_level_domain(region: &str) -> &'static str {
    REALM_DOMAINS
        .iter()
        .find(|(regions, _)| regions.contains(&region))
        .map(|(_, domain)| *domain)
        .unwrap_or(DEFAULT_SECOND_LEVEL_DOMAIN)
}

/// Resolves the service endpoint for `region` from an endpoint template.
pub fn endpoint_for(template: &str, region: &str) -> Result<Url> {
    let region = canonical_region(region);
    if region.is_empty() {
        return Err(Error::InvalidConfiguration("region is empty".to_string()));
    }
    if !region.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(Error::InvalidConfiguration(format!("invalid region `{}`", region)));
    }

    let host = template
        .replace("{region}", &region)
        .replace("{secondLevelDomain}", second_level_domain(&region));
    Ok(Url::parse(&host)?)
}
