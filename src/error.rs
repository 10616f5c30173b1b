use rmcp::model::{CallToolResult, Content};

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("{message}")]
    Status { status: u16, message: String },
    #[error("response body exceeds {limit} bytes")]
    TooLarge { limit: usize },
    #[error("invalid JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

impl FetchError {
    /// HTTP status behind the failure, when there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Status { status, .. } => Some(*status),
            FetchError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

pub fn format_api_error(status_code: u16, body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        return format!("[{status_code}] empty response");
    }
    let truncated: String = body.chars().take(500).collect();
    format!("[{status_code}] {truncated}")
}

pub fn domain_error(msg: impl Into<String>) -> CallToolResult {
    CallToolResult::error(vec![Content::text(msg.into())])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_truncates_body() {
        let body = "x".repeat(900);
        let msg = format_api_error(503, &body);
        assert!(msg.starts_with("[503] "));
        assert_eq!(msg.len(), "[503] ".len() + 500);
    }

    #[test]
    fn api_error_empty_body() {
        assert_eq!(format_api_error(404, "  "), "[404] empty response");
    }

    #[test]
    fn status_error_display() {
        let err = FetchError::Status {
            status: 429,
            message: format_api_error(429, "Too Many Requests"),
        };
        assert_eq!(err.to_string(), "[429] Too Many Requests");
        assert_eq!(err.status(), Some(429));
    }

    #[test]
    fn non_http_failures_have_no_status() {
        let err = FetchError::TooLarge { limit: 8 };
        assert_eq!(err.status(), None);
        assert_eq!(err.to_string(), "response body exceeds 8 bytes");
    }

    #[test]
    fn domain_error_is_flagged() {
        let result = domain_error("boom");
        assert_eq!(result.is_error, Some(true));
    }
}
