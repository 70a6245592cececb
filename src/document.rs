use regex::Regex;
use scraper::{Html, Selector};

/// A fetched page prepared for the classifier and the extractor: the parsed
/// tree, the raw text lower-cased once, and every script body.
pub struct Document<'a> {
    raw: &'a str,
    lower: String,
    html: Html,
    scripts: Vec<String>,
}

impl<'a> Document<'a> {
    pub fn parse(raw: &'a str) -> Self {
        let html = Html::parse_document(raw);
        let scripts = collect_scripts(&html);
        Document { raw, lower: raw.to_lowercase(), html, scripts }
    }

    pub fn raw(&self) -> &str { self.raw }

    pub fn lower(&self) -> &str { &self.lower }

    pub fn scripts(&self) -> impl Iterator<Item = &str> {
        self.scripts.iter().map(String::as_str)
    }

    /// True when a `<meta name="generator">` names `product`, either exactly or
    /// followed by a version ("WooCommerce 8.2.1"). Case-insensitive.
    pub fn generator_is(&self, product: &str) -> bool {
        let Ok(sel) = Selector::parse("meta[content]") else { return false };
        self.html.select(&sel).any(|el| {
            let v = el.value();
            let is_generator = v.attr("name").is_some_and(|n| n.eq_ignore_ascii_case("generator"));
            is_generator && v.attr("content").is_some_and(|c| names_product(c, product))
        })
    }

    /// `content` of the first `<meta {attr}="{key}">`.
    pub fn meta_content(&self, attr: &str, key: &str) -> Option<String> {
        let sel = Selector::parse(&format!(r#"meta[{attr}="{key}"]"#)).ok()?;
        let node = self.html.select(&sel).next()?;
        node.value().attr("content").map(str::to_string)
    }

    pub fn exists(&self, selector: &str) -> bool {
        match Selector::parse(selector) {
            Ok(sel) => self.html.select(&sel).next().is_some(),
            Err(_) => false,
        }
    }

    /// Attribute `attr` of the first element matching `selector`.
    pub fn first_attr(&self, selector: &str, attr: &str) -> Option<String> {
        let sel = Selector::parse(selector).ok()?;
        let node = self.html.select(&sel).next()?;
        node.value().attr(attr).map(str::to_string)
    }

    /// For every element carrying at least one of `names`, in document order,
    /// the first of those attributes with a non-empty value.
    pub fn attribute_sweep(&self, names: &[&str]) -> Vec<String> {
        let query = names.iter().map(|n| format!("[{n}]")).collect::<Vec<_>>().join(", ");
        let Ok(sel) = Selector::parse(&query) else { return Vec::new() };
        self.html
            .select(&sel)
            .filter_map(|el| {
                names.iter().find_map(|n| el.value().attr(n).filter(|v| !v.is_empty()))
            })
            .map(str::to_string)
            .collect()
    }
}

fn collect_scripts(html: &Html) -> Vec<String> {
    let Ok(sel) = Selector::parse("script") else { return Vec::new() };
    html.select(&sel)
        .map(|el| el.text().collect::<String>())
        .filter(|s| !s.trim().is_empty())
        .collect()
}

// Exact name, or name plus a single version token ("WooCommerce 8.2.1").
fn names_product(content: &str, product: &str) -> bool {
    let content = content.trim();
    if content.eq_ignore_ascii_case(product) { return true; }
    let Some((head, tail)) = content.split_once(char::is_whitespace) else { return false };
    let Ok(version) = Regex::new(r"^\d[\w.]*$") else { return false };
    head.eq_ignore_ascii_case(product) && version.is_match(tail.trim())
}
