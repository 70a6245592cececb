//! Store identifier extraction: per-platform waterfalls of [`Rule`]s run by
//! one generic, lazy, first-success search.

use crate::document::Document;
use crate::platform::Platform;

pub mod catalog;
pub mod rules;
pub mod script;
pub mod validate;

pub use catalog::waterfall;
pub use rules::{Hit, Rule};

/// First validated identifier from `platform`'s waterfall.
pub fn extract_id(doc: &Document<'_>, platform: Platform) -> Option<Hit> {
    run(waterfall(platform), doc)
}

/// Rules are consulted in order; nothing after the first hit is evaluated.
pub fn run(rules: &[Rule], doc: &Document<'_>) -> Option<Hit> {
    rules.iter().find_map(|rule| rule.apply(doc))
}
