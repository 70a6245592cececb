use std::env;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub pretty: bool,
}

impl OutputConfig {
    /// `--json` wins; otherwise `SLEUTH_OUTPUT_FORMAT` picks the presenter.
    pub fn from_env(json_flag: bool) -> Self {
        let format = match env::var("SLEUTH_OUTPUT_FORMAT").ok().as_deref() {
            _ if json_flag => OutputFormat::Json,
            Some(v) if v.eq_ignore_ascii_case("json") => OutputFormat::Json,
            _ => OutputFormat::Text,
        };
        let pretty = env::var("SLEUTH_OUTPUT_PRETTY").ok().as_deref().is_some_and(is_truthy);
        OutputConfig { format, pretty }
    }
}

fn is_truthy(v: &str) -> bool {
    v == "1" || v.eq_ignore_ascii_case("true") || v.eq_ignore_ascii_case("yes")
}
