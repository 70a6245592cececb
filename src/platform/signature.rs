use crate::document::Document;

use super::Platform;

/// One piece of evidence that a page belongs to a platform.
#[derive(Debug, Clone, Copy)]
pub enum Probe {
    /// `<meta name="generator">` names the product.
    Generator(&'static str),
    /// Lower-cased page text contains a global object or config marker.
    Marker(&'static str),
    /// Lower-cased page text references a CDN hostname.
    Cdn(&'static str),
    /// Lower-cased page text references a theme asset path.
    Asset(&'static str),
    /// At least one element matches the selector.
    Element(&'static str),
}

impl Probe {
    fn holds(&self, doc: &Document<'_>) -> bool {
        match *self {
            Probe::Generator(name) => doc.generator_is(name),
            Probe::Marker(s) | Probe::Cdn(s) | Probe::Asset(s) => doc.lower().contains(s),
            Probe::Element(sel) => doc.exists(sel),
        }
    }
}

/// A platform and the probes of which any one identifies it.
#[derive(Debug, Clone, Copy)]
pub struct Signature {
    pub platform: Platform,
    pub probes: &'static [Probe],
}

impl Signature {
    pub fn matches(&self, doc: &Document<'_>) -> bool {
        self.probes.iter().any(|p| p.holds(doc))
    }
}

/// Evaluated top to bottom; the first match wins. Platforms whose markers can
/// appear inside another platform's pages must come first.
pub const SIGNATURES: &[Signature] = &[
    Signature {
        platform: Platform::Salla,
        probes: &[
            Probe::Generator("salla"),
            Probe::Marker("window.salla"),
            Probe::Marker("salla.config"),
            Probe::Marker("salla.app"),
            Probe::Cdn("cdn.salla.sa"),
            Probe::Asset("/assets/themes/salla"),
        ],
    },
    Signature {
        platform: Platform::Zid,
        probes: &[
            Probe::Generator("zid"),
            Probe::Marker("window.zid"),
            Probe::Marker("window.__store__"),
            Probe::Marker("zid.behaviors"),
            Probe::Cdn("cdn.zid.store"),
            Probe::Cdn("assets.zid.store"),
            Probe::Element("#zid-app"),
            Probe::Element("zid-app-entry"),
        ],
    },
    Signature {
        platform: Platform::Shopify,
        probes: &[
            Probe::Marker("shopify.theme"),
            Probe::Marker("shopify.shop"),
            Probe::Marker("shopifyanalytics"),
            Probe::Cdn("cdn.shopify.com"),
            Probe::Element(r#"link[href*="cdn.shopify.com"]"#),
        ],
    },
    Signature {
        platform: Platform::WooCommerce,
        probes: &[
            Probe::Generator("woocommerce"),
            Probe::Marker("wc_add_to_cart_params"),
            Probe::Asset("/wp-content/plugins/woocommerce/"),
            Probe::Element("body.woocommerce"),
        ],
    },
];

/// Platform of the first signature in [`SIGNATURES`] that matches, or
/// `Platform::Unknown`.
pub fn classify(doc: &Document<'_>) -> Platform {
    classify_with(SIGNATURES, doc)
}

pub fn classify_with(signatures: &[Signature], doc: &Document<'_>) -> Platform {
    signatures
        .iter()
        .find(|s| s.matches(doc))
        .map(|s| s.platform)
        .unwrap_or(Platform::Unknown)
}
