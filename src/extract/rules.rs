use regex::Regex;

use crate::document::Document;

use super::script;
use super::validate::IdFormat;

/// A regex whose group 1 is an identifier candidate.
#[derive(Debug, Clone, Copy)]
pub struct NamedPattern {
    pub name: &'static str,
    pub pattern: &'static str,
    pub format: IdFormat,
}

/// One extraction strategy. Each yields at most one validated identifier.
#[derive(Debug, Clone, Copy)]
pub enum Rule {
    /// `content` of `<meta {attr}="{key}">`.
    MetaTag { name: &'static str, attr: &'static str, key: &'static str, format: IdFormat },
    /// `<meta name="{key}">` whose `content` is a JSON object, read at `path`.
    MetaJson { name: &'static str, key: &'static str, path: &'static [&'static str], format: IdFormat },
    /// Attribute `attr` of the first element matching `selector`.
    Attribute { name: &'static str, selector: &'static str, attr: &'static str, format: IdFormat },
    /// Regex over the whole raw page, for payloads that may sit outside `<script>`.
    DocumentRegex { name: &'static str, pattern: &'static str, format: IdFormat },
    /// Object literal assigned in a script containing `marker` (lower-case).
    /// Parsed and read at each of `paths`; if it will not parse, `fallback`
    /// regexes run over the literal text instead.
    ScriptObject {
        name: &'static str,
        marker: &'static str,
        assignment: &'static str,
        paths: &'static [&'static [&'static str]],
        fallback: &'static [&'static str],
        format: IdFormat,
    },
    /// Every script, in document order, against every pattern, in list order.
    ScriptRegex { name: &'static str, patterns: &'static [NamedPattern] },
    /// Any element carrying one of `names`, in document order.
    DataAttribute { name: &'static str, names: &'static [&'static str], format: IdFormat },
}

/// A validated identifier and the rule (or pattern) that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hit {
    pub value: String,
    pub source: &'static str,
}

impl Rule {
    pub fn name(&self) -> &'static str {
        match *self {
            Rule::MetaTag { name, .. }
            | Rule::MetaJson { name, .. }
            | Rule::Attribute { name, .. }
            | Rule::DocumentRegex { name, .. }
            | Rule::ScriptObject { name, .. }
            | Rule::ScriptRegex { name, .. }
            | Rule::DataAttribute { name, .. } => name,
        }
    }

    pub fn apply(&self, doc: &Document<'_>) -> Option<Hit> {
        match *self {
            Rule::MetaTag { name, attr, key, format } => {
                let value = format.check(&doc.meta_content(attr, key)?)?;
                Some(Hit { value, source: name })
            }
            Rule::MetaJson { name, key, path, format } => {
                let raw = doc.meta_content("name", key)?;
                let json = serde_json::from_str::<serde_json::Value>(&raw).ok()?;
                let value = format.check(&script::field(&json, path)?)?;
                Some(Hit { value, source: name })
            }
            Rule::Attribute { name, selector, attr, format } => {
                let value = format.check(&doc.first_attr(selector, attr)?)?;
                Some(Hit { value, source: name })
            }
            Rule::DocumentRegex { name, pattern, format } => {
                let re = Regex::new(pattern).ok()?;
                let value = first_valid_capture(&re, doc.raw(), format)?;
                Some(Hit { value, source: name })
            }
            Rule::ScriptObject { name, marker, assignment, paths, fallback, format } => {
                let re = Regex::new(assignment).ok()?;
                let fallback: Vec<Regex> = fallback.iter().filter_map(|p| Regex::new(p).ok()).collect();
                let value = doc
                    .scripts()
                    .filter(|s| s.to_lowercase().contains(marker))
                    .find_map(|s| read_object(s, &re, paths, &fallback, format))?;
                Some(Hit { value, source: name })
            }
            Rule::ScriptRegex { patterns, .. } => {
                let compiled: Vec<(&NamedPattern, Regex)> = patterns
                    .iter()
                    .filter_map(|p| Regex::new(p.pattern).ok().map(|re| (p, re)))
                    .collect();
                doc.scripts().find_map(|s| {
                    compiled.iter().find_map(|(p, re)| {
                        first_valid_capture(re, s, p.format).map(|value| Hit { value, source: p.name })
                    })
                })
            }
            Rule::DataAttribute { name, names, format } => {
                let value = doc.attribute_sweep(names).iter().find_map(|v| format.check(v))?;
                Some(Hit { value, source: name })
            }
        }
    }
}

fn first_valid_capture(re: &Regex, text: &str, format: IdFormat) -> Option<String> {
    re.captures_iter(text)
        .find_map(|c| c.get(1).and_then(|m| format.check(m.as_str())))
}

fn read_object(
    script: &str,
    assignment: &Regex,
    paths: &[&[&str]],
    fallback: &[Regex],
    format: IdFormat,
) -> Option<String> {
    let literal = script::capture_literal(script, assignment)?;
    match script::parse_literal(literal) {
        Some(json) => paths
            .iter()
            .find_map(|path| script::field(&json, path).and_then(|v| format.check(&v))),
        None => fallback.iter().find_map(|re| first_valid_capture(re, literal, format)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STORE_OBJECT: Rule = Rule::ScriptObject {
        name: "store object",
        marker: "window.__store__",
        assignment: r"(?is)window\.__STORE__\s*=\s*(\{.+?\});",
        paths: &[&["id"], &["store", "id"]],
        fallback: &[r#"(?i)"id"\s*:\s*"?([\w-]*)"#],
        format: IdFormat::Numeric,
    };

    fn apply(rule: &Rule, html: &str) -> Option<String> {
        rule.apply(&Document::parse(html)).map(|h| h.value)
    }

    #[test]
    fn meta_tag_rejects_non_numeric() {
        let rule = Rule::MetaTag { name: "m", attr: "name", key: "store-id", format: IdFormat::Numeric };
        assert_eq!(apply(&rule, r#"<meta name="store-id" content="123">"#).as_deref(), Some("123"));
        assert_eq!(apply(&rule, r#"<meta name="store-id" content="my-shop">"#), None);
        assert_eq!(apply(&rule, r#"<meta name="store-id" content="">"#), None);
    }

    #[test]
    fn meta_json_reads_path() {
        let rule = Rule::MetaJson { name: "cfg", key: "zid-config", path: &["store_id"], format: IdFormat::Numeric };
        let html = r#"<meta name="zid-config" content='{"store_id": 3001, "lang": "ar"}'>"#;
        assert_eq!(apply(&rule, html).as_deref(), Some("3001"));
        assert_eq!(apply(&rule, r#"<meta name="zid-config" content="not json">"#), None);
    }

    #[test]
    fn script_object_reads_nested_store() {
        let html = r#"<script>window.__STORE__ = {"name": "x", "store": {"id": "515"}};</script>"#;
        assert_eq!(apply(&STORE_OBJECT, html).as_deref(), Some("515"));
    }

    #[test]
    fn script_object_survives_trailing_comma() {
        let html = r#"<script>window.__STORE__ = {"id": 88, "name": "Shop",};</script>"#;
        assert_eq!(apply(&STORE_OBJECT, html).as_deref(), Some("88"));
    }

    #[test]
    fn script_object_falls_back_to_regex_when_unparseable() {
        let html = r#"<script>window.__STORE__ = {"id": "640", "onLoad": function () { go() }};</script>"#;
        assert_eq!(apply(&STORE_OBJECT, html).as_deref(), Some("640"));
    }

    #[test]
    fn script_object_ignores_scripts_without_marker() {
        let html = r#"<script>var s = {"id": 5};</script>"#;
        assert_eq!(apply(&STORE_OBJECT, html), None);
    }

    #[test]
    fn script_regex_reports_pattern_name() {
        let rule = Rule::ScriptRegex {
            name: "sweep",
            patterns: &[
                NamedPattern { name: "first", pattern: r#"alpha\s*=\s*"?([\w-]*)"#, format: IdFormat::Numeric },
                NamedPattern { name: "second", pattern: r#"beta\s*=\s*"?([\w-]*)"#, format: IdFormat::Numeric },
            ],
        };
        let hit = rule
            .apply(&Document::parse(r#"<script>alpha = "x1"; beta = 22;</script>"#))
            .unwrap();
        assert_eq!(hit, Hit { value: "22".to_string(), source: "second" });
    }

    #[test]
    fn script_regex_stops_at_first_script_with_a_valid_match() {
        let rule = Rule::ScriptRegex {
            name: "sweep",
            patterns: &[
                NamedPattern { name: "first", pattern: r#"alpha\s*=\s*([\w-]*)"#, format: IdFormat::Numeric },
                NamedPattern { name: "second", pattern: r#"beta\s*=\s*([\w-]*)"#, format: IdFormat::Numeric },
            ],
        };
        let html = r#"<script>beta = 1;</script><script>alpha = 2;</script>"#;
        let hit = rule.apply(&Document::parse(html)).unwrap();
        assert_eq!(hit.value, "1");
        assert_eq!(hit.source, "second");
    }

    #[test]
    fn data_attribute_takes_first_valid_element() {
        let rule = Rule::DataAttribute { name: "d", names: &["data-store-id"], format: IdFormat::Numeric };
        let html = r#"<div data-store-id="abc"></div><div data-store-id="909"></div>"#;
        assert_eq!(apply(&rule, html).as_deref(), Some("909"));
    }
}
