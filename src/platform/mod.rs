//! The fixed enumeration of storefront platforms and their signatures.

use anyhow::Result;
use serde::Serialize;
use serde_json::json;

use crate::extract::Rule;
use crate::telemetry::{self};
use crate::telemetry::ops::platforms::Phase;

pub mod signature;

pub use signature::classify;

/// Storefront platform reported for a page. `Unknown` means no signature
/// matched; `Error` is only used when the page could not be fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Platform {
    Salla,
    Zid,
    Shopify,
    WooCommerce,
    Unknown,
    Error,
}

impl Platform {
    /// Every recognizable platform, in classifier priority order.
    pub const KNOWN: [Platform; 4] = [Platform::Salla, Platform::Zid, Platform::Shopify, Platform::WooCommerce];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Salla => "Salla",
            Platform::Zid => "Zid",
            Platform::Shopify => "Shopify",
            Platform::WooCommerce => "WooCommerce",
            Platform::Unknown => "Unknown",
            Platform::Error => "Error",
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Platform::Unknown | Platform::Error)
    }

    /// Whether an identifier waterfall exists for this platform.
    pub fn supports_extraction(&self) -> bool {
        !crate::extract::waterfall(*self).is_empty()
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Serialize)]
struct PlatformEntry {
    platform: Platform,
    extracts: bool,
    rules: Vec<&'static str>,
}

fn entries() -> Vec<PlatformEntry> {
    Platform::KNOWN
        .iter()
        .map(|&platform| PlatformEntry {
            platform,
            extracts: platform.supports_extraction(),
            rules: crate::extract::waterfall(platform).iter().map(Rule::name).collect(),
        })
        .collect()
}

/// `sleuth platforms`: the enumeration in classifier order with each waterfall.
pub fn list() -> Result<()> {
    let log = telemetry::platforms();
    let _root = log.root_span_kv([("count", Platform::KNOWN.len().to_string())]).entered();
    let _s = log.span(&Phase::List).entered();
    log.result(&json!({ "platforms": entries() }), None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinels_are_not_known() {
        assert!(!Platform::Unknown.is_known());
        assert!(!Platform::Error.is_known());
        assert!(Platform::KNOWN.iter().all(Platform::is_known));
    }

    #[test]
    fn extraction_support_follows_catalog() {
        assert!(Platform::Salla.supports_extraction());
        assert!(Platform::Zid.supports_extraction());
        assert!(Platform::Shopify.supports_extraction());
        assert!(!Platform::WooCommerce.supports_extraction());
        assert!(!Platform::Unknown.supports_extraction());
    }

    #[test]
    fn serializes_as_display_name() {
        assert_eq!(serde_json::to_string(&Platform::Salla).unwrap(), "\"Salla\"");
        assert_eq!(serde_json::to_string(&Platform::WooCommerce).unwrap(), "\"WooCommerce\"");
    }

    #[test]
    fn listing_follows_priority_and_catalog() {
        let list = entries();
        let names: Vec<Platform> = list.iter().map(|e| e.platform).collect();
        assert_eq!(names, Platform::KNOWN.to_vec());
        assert_eq!(list[0].rules.first().copied(), Some("meta store:id"));
        assert!(list[3].rules.is_empty());
        assert!(!list[3].extracts);
    }
}
