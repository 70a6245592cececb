/// Categorized pipeline failures. Classification and extraction never produce
/// these; only input validation and the fetch do.
#[derive(Debug, thiserror::Error)]
pub enum DetectError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("Could not resolve the store URL. Please check the domain name.")]
    DnsFailure,

    #[error("Failed to fetch URL. Server responded with status: {status} {reason}")]
    UpstreamHttp { status: u16, reason: String },

    #[error("Request timed out while trying to fetch the store URL. The store might be slow or temporarily unavailable.")]
    Timeout,

    #[error("Failed to analyze URL. The store might be protected, inaccessible, or the URL is incorrect.")]
    Unhandled(String),
}

impl DetectError {
    pub fn missing_url() -> Self {
        DetectError::InvalidInput("Missing or invalid URL".to_string())
    }

    pub fn malformed_url() -> Self {
        DetectError::InvalidInput(
            "Invalid URL format. Please include http:// or https:// or provide a valid domain.".to_string(),
        )
    }

    /// HTTP-equivalent status for this failure.
    pub fn status_code(&self) -> u16 {
        match self {
            DetectError::InvalidInput(_) | DetectError::DnsFailure => 400,
            DetectError::UpstreamHttp { status, .. } => *status,
            DetectError::Timeout => 504,
            DetectError::Unhandled(_) => 500,
        }
    }

    /// Underlying fault text for unclassified failures; never shown to callers.
    pub fn detail(&self) -> Option<&str> {
        match self {
            DetectError::Unhandled(detail) => Some(detail),
            _ => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            DetectError::InvalidInput(_) => "invalid_input",
            DetectError::DnsFailure => "dns_failure",
            DetectError::UpstreamHttp { .. } => "upstream_http",
            DetectError::Timeout => "timeout",
            DetectError::Unhandled(_) => "unhandled",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_error_kind() {
        assert_eq!(DetectError::malformed_url().status_code(), 400);
        assert_eq!(DetectError::DnsFailure.status_code(), 400);
        assert_eq!(DetectError::UpstreamHttp { status: 403, reason: "Forbidden".into() }.status_code(), 403);
        assert_eq!(DetectError::Timeout.status_code(), 504);
        assert_eq!(DetectError::Unhandled("boom".into()).status_code(), 500);
    }

    #[test]
    fn upstream_message_carries_status() {
        let e = DetectError::UpstreamHttp { status: 404, reason: "Not Found".into() };
        assert_eq!(e.to_string(), "Failed to fetch URL. Server responded with status: 404 Not Found");
    }

    #[test]
    fn unhandled_hides_internal_detail() {
        let e = DetectError::Unhandled("tls handshake eof".into());
        assert!(!e.to_string().contains("tls"));
        assert_eq!(e.kind(), "unhandled");
        assert_eq!(e.detail(), Some("tls handshake eof"));
        assert_eq!(DetectError::Timeout.detail(), None);
    }
}
