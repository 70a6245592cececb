//! Per-platform extraction waterfalls, most trusted source first.
//!
//! Candidates are captured as whole tokens (`[\w-]*`) so that a value like
//! `"12a"` is rejected by validation instead of yielding its digit prefix.

use crate::platform::Platform;

use super::rules::{NamedPattern, Rule};
use super::validate::IdFormat::{Numeric, NumericOrUuid};

const SALLA: &[Rule] = &[
    Rule::MetaTag { name: "meta store:id", attr: "property", key: "store:id", format: Numeric },
    Rule::MetaTag { name: "meta store-id", attr: "name", key: "store-id", format: Numeric },
    Rule::MetaTag { name: "meta salla:store:id", attr: "name", key: "salla:store:id", format: Numeric },
    Rule::Attribute { name: "salla-app[store-id]", selector: "salla-app", attr: "store-id", format: Numeric },
    Rule::Attribute { name: "salla-apps[store]", selector: "salla-apps", attr: "store", format: Numeric },
    Rule::DocumentRegex {
        name: "twilight::init payload",
        pattern: r#"(?is)salla\.event\.dispatchEvents\(\s*\{[^}]*?"twilight::init"\s*:\s*\{[^}]*?"store"\s*:\s*\{[^}]*?"id"\s*:\s*"?([\w-]*)"#,
        format: Numeric,
    },
    Rule::ScriptObject {
        name: "window.__INITIAL_STATE__",
        marker: "window.__initial_state__",
        assignment: r"(?is)window\.__INITIAL_STATE__\s*=\s*(\{.+?\});",
        paths: &[&["store", "id"]],
        fallback: &[r#"(?is)["']?store["']?\s*:\s*\{[^{}]*?["']?id["']?\s*:\s*["']?([\w-]*)"#],
        format: Numeric,
    },
    Rule::ScriptRegex { name: "salla script sweep", patterns: SALLA_SCRIPT_PATTERNS },
    Rule::DataAttribute { name: "data-store-id", names: &["data-store-id"], format: Numeric },
];

const SALLA_SCRIPT_PATTERNS: &[NamedPattern] = &[
    NamedPattern { name: "salla.config.store.id", pattern: r#"(?i)salla\.config\.store\.id\s*=\s*["']?([\w-]*)"#, format: Numeric },
    NamedPattern { name: "Salla.Store.id", pattern: r#"(?i)Salla\.Store\.id\s*=\s*["']?([\w-]*)"#, format: Numeric },
    NamedPattern {
        name: "appManager store.id",
        pattern: r#"(?i)appManager\.getState\(\)\.store\.id\s*:\s*["']?([\w-]*)"#,
        format: Numeric,
    },
    NamedPattern { name: "\"store_id\" field", pattern: r#"(?i)"store_id"\s*:\s*"?([\w-]*)"#, format: Numeric },
    NamedPattern { name: "storeId key", pattern: r#"(?i)storeId["']?\s*:\s*["']?([\w-]*)"#, format: Numeric },
    NamedPattern {
        name: "sallaTagManager dataLayer",
        pattern: r#"(?is)sallaTagManager\.dataLayer\.push\(\s*\{[^}]*?"store_id"\s*:\s*"([\w-]*)""#,
        format: Numeric,
    },
    NamedPattern {
        name: "store config object",
        pattern: r#"(?is)(?:salla\.config\.store|Salla\.storeData)\s*=\s*\{[^{}]*?"id"\s*:\s*"?([\w-]*)"#,
        format: Numeric,
    },
];

const ZID: &[Rule] = &[
    Rule::MetaTag { name: "meta store_id", attr: "name", key: "store_id", format: NumericOrUuid },
    Rule::MetaTag { name: "meta merchant_id", attr: "name", key: "merchant_id", format: NumericOrUuid },
    Rule::MetaJson { name: "meta zid-config", key: "zid-config", path: &["store_id"], format: NumericOrUuid },
    Rule::ScriptObject {
        name: "window.__STORE__",
        marker: "window.__store__",
        assignment: r"(?is)window\.__STORE__\s*=\s*(\{.+?\});",
        paths: &[&["id"], &["store", "id"]],
        fallback: &[r#"(?i)"id"\s*:\s*"?([\w-]*)"#],
        format: NumericOrUuid,
    },
    Rule::ScriptRegex { name: "zid script sweep", patterns: ZID_SCRIPT_PATTERNS },
    Rule::DataAttribute {
        name: "data-store-id / data-zid-store-id",
        names: &["data-store-id", "data-zid-store-id"],
        format: NumericOrUuid,
    },
];

const ZID_SCRIPT_PATTERNS: &[NamedPattern] = &[
    NamedPattern { name: "store_uuid", pattern: r#"(?i)store_uuid["']?\s*[:=]\s*["']?([\w-]*)"#, format: NumericOrUuid },
    NamedPattern { name: "ZID_STORE_ID", pattern: r#"(?i)ZID_STORE_ID\s*=\s*["']?([\w-]*)"#, format: Numeric },
    NamedPattern { name: "zidApi.store.id", pattern: r#"(?i)zidApi\.store\.id\s*=\s*["']?([\w-]*)"#, format: Numeric },
    NamedPattern { name: "zid.store.id", pattern: r#"(?i)zid\.store\.id\s*=\s*["']?([\w-]*)"#, format: Numeric },
    NamedPattern {
        name: "window.zid.store object",
        pattern: r#"(?is)window\.zid\.store\s*=\s*\{[^{}]*?"id"\s*:\s*"?([\w-]*)"#,
        format: Numeric,
    },
    NamedPattern { name: "\"store_id\" field", pattern: r#"(?i)"store_id"\s*:\s*"?([\w-]*)"#, format: Numeric },
    NamedPattern { name: "\"merchant_id\" field", pattern: r#"(?i)"merchant_id"\s*:\s*"?([\w-]*)"#, format: Numeric },
    NamedPattern { name: "storeId key", pattern: r#"(?i)storeId["']?\s*:\s*["']?([\w-]*)"#, format: Numeric },
    NamedPattern { name: "sku store segment", pattern: r#"(?i)"sku"\s*:\s*"Z\.([\w-]*)\."#, format: Numeric },
];

const SHOPIFY: &[Rule] = &[
    Rule::ScriptRegex { name: "shopify script sweep", patterns: SHOPIFY_SCRIPT_PATTERNS },
    Rule::DataAttribute { name: "data-shop-id", names: &["data-shop-id"], format: Numeric },
];

const SHOPIFY_SCRIPT_PATTERNS: &[NamedPattern] = &[
    NamedPattern { name: "Shopify.shopId", pattern: r#"Shopify\.shopId\s*=\s*["']?([\w-]*)"#, format: Numeric },
    NamedPattern { name: "\"shopId\" field", pattern: r#""shopId"\s*:\s*"?([\w-]*)"#, format: Numeric },
    NamedPattern { name: "\"shop_id\" field", pattern: r#""shop_id"\s*:\s*"?([\w-]*)"#, format: Numeric },
];

/// Waterfall for `platform`; empty when identifiers are not extracted for it.
pub fn waterfall(platform: Platform) -> &'static [Rule] {
    match platform {
        Platform::Salla => SALLA,
        Platform::Zid => ZID,
        Platform::Shopify => SHOPIFY,
        Platform::WooCommerce | Platform::Unknown | Platform::Error => &[],
    }
}
