use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

/// Failure of a single proxy request. Nothing here is fatal to the process.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProxyError {
    /// Malformed local input, such as an empty search query.
    #[error("{0}")]
    InvalidRequest(String),

    /// The upstream API does not know the requested identifier.
    #[error("{0}")]
    UpstreamNotFound(String),

    /// Timeout, transport failure, or an upstream error status.
    #[error("{message}")]
    UpstreamUnavailable { status: u16, message: String },
}

impl ProxyError {
    pub fn timed_out() -> Self {
        ProxyError::UpstreamUnavailable {
            status: 504,
            message: "Request timed out".to_string(),
        }
    }

    pub fn transport(detail: impl std::fmt::Display) -> Self {
        ProxyError::UpstreamUnavailable {
            status: 502,
            message: format!("API request failed: {}", detail),
        }
    }
}

impl ResponseError for ProxyError {
    fn status_code(&self) -> StatusCode {
        match self {
            ProxyError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ProxyError::UpstreamNotFound(_) => StatusCode::NOT_FOUND,
            ProxyError::UpstreamUnavailable { status, .. } => StatusCode::from_u16(*status)
                .ok()
                .filter(|code| code.is_client_error() || code.is_server_error())
                .unwrap_or(StatusCode::BAD_GATEWAY),
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": self.to_string()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_code_mapping() {
        assert_eq!(
            ProxyError::InvalidRequest("Query parameter is required".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ProxyError::UpstreamNotFound("coin not found".to_string()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(ProxyError::timed_out().status_code(), StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(
            ProxyError::UpstreamUnavailable { status: 429, message: "rate limited".to_string() }.status_code(),
            StatusCode::TOO_MANY_REQUESTS
        );
    }

    #[test]
    fn test_non_error_status_falls_back_to_bad_gateway() {
        let odd = ProxyError::UpstreamUnavailable { status: 302, message: "redirect".to_string() };
        assert_eq!(odd.status_code(), StatusCode::BAD_GATEWAY);

        let invalid = ProxyError::UpstreamUnavailable { status: 42, message: "bogus".to_string() };
        assert_eq!(invalid.status_code(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_display_carries_message_verbatim() {
        let error = ProxyError::UpstreamUnavailable {
            status: 500,
            message: r#"{"error":"internal"}"#.to_string(),
        };
        assert_eq!(error.to_string(), r#"{"error":"internal"}"#);
        assert_eq!(ProxyError::transport("connection refused").to_string(), "API request failed: connection refused");
    }

    #[actix_web::test]
    async fn test_error_response_body() {
        let response = ProxyError::InvalidRequest("Query parameter is required".to_string()).error_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = actix_web::body::to_bytes(response.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "Query parameter is required");
    }
}
