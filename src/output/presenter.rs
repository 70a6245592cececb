use std::io::{self, Write};

use serde_json::Value;

use super::config::{OutputConfig, OutputFormat};
use super::types::Envelope;

pub trait Presenter: Send + Sync {
    fn emit(&self, env: &Envelope, w: &mut dyn Write) -> io::Result<()>;
}

pub struct JsonPresenter { pub pretty: bool }
impl Presenter for JsonPresenter {
    fn emit(&self, env: &Envelope, w: &mut dyn Write) -> io::Result<()> {
        if self.pretty { serde_json::to_writer_pretty(&mut *w, env).map_err(to_io)? } else { serde_json::to_writer(&mut *w, env).map_err(to_io)? }
        writeln!(w)
    }
}

/// `Result: <op>` followed by one `key: value` line per top-level field.
/// Arrays of objects print one indented line per element.
pub struct TextPresenter { pub pretty: bool }
impl Presenter for TextPresenter {
    fn emit(&self, env: &Envelope, w: &mut dyn Write) -> io::Result<()> {
        writeln!(w, "Result: {}", env.op)?;
        match &env.result {
            Some(Value::Object(map)) => {
                for (k, v) in map {
                    match v {
                        Value::Array(items) => {
                            writeln!(w, "{k}:")?;
                            for item in items { writeln!(w, "  - {}", scalar(item))?; }
                        }
                        _ => writeln!(w, "{k}: {}", scalar(v))?,
                    }
                }
            }
            Some(other) => writeln!(w, "{}", scalar(other))?,
            None => {}
        }
        if self.pretty {
            if let Some(meta) = &env.meta {
                if let Some(ms) = meta.duration_ms { writeln!(w, "took: {ms}ms")?; }
            }
        }
        Ok(())
    }
}

fn scalar(v: &Value) -> String {
    match v {
        Value::Null => "-".to_string(),
        Value::String(s) => s.clone(),
        Value::Object(map) => map
            .iter()
            .map(|(k, v)| format!("{k}={}", scalar(v)))
            .collect::<Vec<_>>()
            .join(" "),
        Value::Array(items) => items.iter().map(scalar).collect::<Vec<_>>().join(", "),
        other => other.to_string(),
    }
}

pub struct Emitter {
    presenter: Box<dyn Presenter>,
}

impl Emitter {
    pub fn from_config(cfg: OutputConfig) -> Self {
        let presenter: Box<dyn Presenter> = match cfg.format {
            OutputFormat::Json => Box::new(JsonPresenter { pretty: cfg.pretty }),
            OutputFormat::Text => Box::new(TextPresenter { pretty: cfg.pretty }),
        };
        Emitter { presenter }
    }

    pub fn emit(&self, env: &Envelope) -> io::Result<()> {
        let mut out = io::stdout();
        self.presenter.emit(env, &mut out)?;
        out.flush()
    }
}

fn to_io(e: serde_json::Error) -> io::Error { io::Error::other(e) }

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn render(p: &dyn Presenter, env: &Envelope) -> String {
        let mut buf = Vec::new();
        p.emit(env, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn text_shows_fields_and_null_as_dash() {
        let env = Envelope::result("detect", &json!({"platform": "Unknown", "storeId": null}), None).unwrap();
        let out = render(&TextPresenter { pretty: false }, &env);
        assert!(out.starts_with("Result: detect\n"));
        assert!(out.contains("platform: Unknown\n"));
        assert!(out.contains("storeId: -\n"));
    }

    #[test]
    fn text_lists_array_items() {
        let env = Envelope::result(
            "platforms",
            &json!({"platforms": [{"platform": "Salla", "extracts": true}]}),
            None,
        )
        .unwrap();
        let out = render(&TextPresenter { pretty: false }, &env);
        assert!(out.contains("platforms:\n  - platform=Salla extracts=true\n"));
    }

    #[test]
    fn text_follows_struct_field_order() {
        #[derive(serde::Serialize)]
        struct Report { file: &'static str, platform: &'static str, rule: Option<&'static str> }
        let report = Report { file: "page.html", platform: "Zid", rule: None };
        let env = Envelope::result("inspect", &report, None).unwrap();
        let out = render(&TextPresenter { pretty: false }, &env);
        assert_eq!(out, "Result: inspect\nfile: page.html\nplatform: Zid\nrule: -\n");
    }

    #[test]
    fn json_is_one_line_envelope() {
        let env = Envelope::result("detect", &json!({"platform": "Zid"}), None).unwrap();
        let out = render(&JsonPresenter { pretty: false }, &env);
        assert_eq!(out.lines().count(), 1);
        let v: Value = serde_json::from_str(out.trim()).unwrap();
        assert_eq!(v["result"]["platform"], "Zid");
        assert_eq!(v["schema_version"], "sleuth.v1");
    }
}
