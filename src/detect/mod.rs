//! Detection pipeline and its CLI entry points.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use tracing::Instrument;

use crate::fetch::{FetchConfig, Fetcher};
use crate::output::types::Meta;
use crate::telemetry::{self};
use crate::telemetry::ops::detect::Phase;

mod service;
mod types;

pub use service::{analyze, assemble, detect};
pub use types::{DetectionRequest, DetectionResult};

#[derive(Args, Debug)]
pub struct DetectCmd {
    /// Storefront URL; `https://` is assumed when no scheme is given
    url: String,
    #[arg(long)] timeout_secs: Option<u64>, // overrides SLEUTH_FETCH_TIMEOUT_SECS
}

#[derive(Args, Debug)]
pub struct InspectCmd {
    /// Saved HTML page to analyze offline
    file: PathBuf,
}

/// Returns whether detection succeeded (no error in the result).
pub async fn run(args: DetectCmd) -> Result<bool> {
    let log = telemetry::detect();
    let started = Instant::now();
    let config = FetchConfig::resolve(args.timeout_secs);
    let root = log.root_span_kv([("url", args.url.clone()), ("timeout_secs", config.timeout.as_secs().to_string())]);

    let fetcher = Fetcher::new(config).context("building HTTP client")?;
    let outcome = detect(&fetcher, &DetectionRequest { url: args.url }, &log)
        .instrument(root.clone())
        .await;
    let _root = root.entered();
    log.result(&outcome.result, Some(Meta::took(started)))?;
    Ok(outcome.result.error.is_none())
}

#[derive(Debug, Serialize)]
struct InspectReport<'a> {
    file: String,
    #[serde(flatten)]
    result: DetectionResult,
    rule: Option<&'a str>,
}

pub fn inspect(args: InspectCmd) -> Result<()> {
    let log = telemetry::detect();
    let started = Instant::now();
    let _root = log.root_span_kv([("file", args.file.display().to_string())]).entered();

    let html = std::fs::read_to_string(&args.file)
        .with_context(|| format!("reading {}", args.file.display()))?;
    let analysis = analyze(&html, &log);
    let rule = analysis.hit.as_ref().map(|h| h.source);
    let result = {
        let _s = log.span(&Phase::Assemble).entered();
        assemble(&Ok(analysis))
    };
    log.outcome(&result);
    let report = InspectReport { file: args.file.display().to_string(), result, rule };
    log.result(&report, Some(Meta::took(started)))
}
