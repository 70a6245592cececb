use tracing::Instrument;

use crate::document::Document;
use crate::error::DetectError;
use crate::extract::{self, Hit};
use crate::fetch::{normalize_url, Fetcher};
use crate::platform::{self, Platform};
use crate::telemetry::ctx::LogCtx;
use crate::telemetry::ops::detect::{Detect, Phase};

use super::types::{DetectionRequest, DetectionResult};

/// Classifier verdict plus the identifier hit, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Analysis {
    pub platform: Platform,
    pub hit: Option<Hit>,
}

/// Final result and its HTTP-equivalent status.
#[derive(Debug, Clone)]
pub struct DetectionOutcome {
    pub status: u16,
    pub result: DetectionResult,
}

/// Pure classify + extract over raw HTML. The parsed tree lives only for the
/// duration of this call.
pub fn analyze(html: &str, log: &LogCtx<Detect>) -> Analysis {
    let doc = {
        let _s = log.span(&Phase::Parse).entered();
        Document::parse(html)
    };
    let platform = {
        let _s = log.span(&Phase::Classify).entered();
        platform::classify(&doc)
    };
    if !platform.supports_extraction() {
        return Analysis { platform, hit: None };
    }

    let _s = log.span(&Phase::Extract).entered();
    let hit = extract::extract_id(&doc, platform);
    match &hit {
        Some(h) => log.debug_kv("store id matched", [("rule", h.source.to_string()), ("value", h.value.clone())]),
        None => log.debug_kv("no rule produced a store id", [("platform", platform.to_string())]),
    }
    Analysis { platform, hit }
}

pub fn assemble(outcome: &Result<Analysis, DetectError>) -> DetectionResult {
    match outcome {
        Ok(a) => DetectionResult::detected(a.platform, a.hit.as_ref().map(|h| h.value.clone())),
        Err(e) => DetectionResult::failed(e),
    }
}

/// Normalize, fetch once, analyze. Input errors return before any network call.
pub async fn execute(fetcher: &Fetcher, req: &DetectionRequest, log: &LogCtx<Detect>) -> Result<Analysis, DetectError> {
    let url = {
        let _s = log.span(&Phase::Normalize).entered();
        normalize_url(&req.url)?
    };
    let fetch_span = log.span_kv(
        &Phase::Fetch,
        [("url", url.to_string()), ("timeout_ms", fetcher.config().timeout.as_millis().to_string())],
    );
    let page = fetcher.fetch(&url).instrument(fetch_span).await?;
    log.debug_kv("fetched", [("status", page.status.to_string()), ("bytes", page.html.len().to_string())]);
    Ok(analyze(&page.html, log))
}

/// Full pipeline for one request, errors folded into the result.
pub async fn detect(fetcher: &Fetcher, req: &DetectionRequest, log: &LogCtx<Detect>) -> DetectionOutcome {
    let outcome = execute(fetcher, req, log).await;
    let _s = log.span(&Phase::Assemble).entered();
    let status = match &outcome {
        Ok(_) => 200,
        Err(e) => {
            log.warn_kv("detect failed", failure_fields(e));
            e.status_code()
        }
    };
    let result = assemble(&outcome);
    log.outcome(&result);
    DetectionOutcome { status, result }
}

fn failure_fields(e: &DetectError) -> Vec<(&'static str, String)> {
    let mut kv = vec![("kind", e.kind().to_string()), ("status", e.status_code().to_string())];
    if let Some(detail) = e.detail() {
        kv.push(("detail", detail.to_string()));
    }
    kv
}
