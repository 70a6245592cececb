use tracing::Span;
use tracing::info_span;

use crate::telemetry::ctx::{OpMarker, PhaseSpan};

#[derive(Copy, Clone, Debug)]
pub struct Detect;

#[derive(Copy, Clone, Debug)]
pub enum Phase { Normalize, Fetch, Parse, Classify, Extract, Assemble }

impl PhaseSpan for Phase {
    fn name(&self) -> &'static str { match self {
        Phase::Normalize => "normalize",
        Phase::Fetch => "fetch",
        Phase::Parse => "parse",
        Phase::Classify => "classify",
        Phase::Extract => "extract",
        Phase::Assemble => "assemble",
    }}
    fn span(&self) -> Span { match self {
        Phase::Normalize => info_span!("normalize"),
        Phase::Fetch => info_span!("fetch"),
        Phase::Parse => info_span!("parse"),
        Phase::Classify => info_span!("classify"),
        Phase::Extract => info_span!("extract"),
        Phase::Assemble => info_span!("assemble"),
    }}
}

impl OpMarker for Detect {
    const NAME: &'static str = "detect";
    type Phase = Phase;
    fn root_span() -> Span { info_span!("detect") }
}
