use uuid::Uuid;

/// Which identifier shapes a rule accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdFormat {
    /// ASCII digits only, at least one.
    Numeric,
    /// Digits, or a hyphenated 8-4-4-4-12 hex UUID in any letter case.
    NumericOrUuid,
}

impl IdFormat {
    pub fn accepts(self, candidate: &str) -> bool {
        match self {
            IdFormat::Numeric => is_numeric(candidate),
            IdFormat::NumericOrUuid => is_numeric(candidate) || is_canonical_uuid(candidate),
        }
    }

    /// The candidate as an owned identifier when it passes.
    pub fn check(self, candidate: &str) -> Option<String> {
        self.accepts(candidate).then(|| candidate.to_string())
    }
}

fn is_numeric(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

// Uuid::parse_str also takes simple, braced and urn forms; only the 36-char
// hyphenated form counts here.
fn is_canonical_uuid(s: &str) -> bool {
    s.len() == 36 && s.as_bytes()[8] == b'-' && Uuid::parse_str(s).is_ok()
}
