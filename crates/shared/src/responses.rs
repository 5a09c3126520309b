//! Response types returned to the host
//!
//! Every request produces exactly one [`ComputeResponse`]: a success or error
//! [`ResponseResult`] plus whatever the intake and the resolver had to paper over.

use serde::{Deserialize, Serialize};

use armory_domain::{DomainError, Outcome, ResolutionIssue, ValidationError};

// =============================================================================
// Response Result
// =============================================================================

/// Result of a request operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ResponseResult {
    /// Operation succeeded
    Success {
        /// Derived statistics (shape varies by request kind)
        #[serde(default, skip_serializing_if = "Option::is_none")]
        data: Option<serde_json::Value>,
    },
    /// Operation failed
    Error {
        /// Error classification code
        code: ErrorCode,
        /// Human-readable error message
        message: String,
        /// Additional error details (optional)
        #[serde(default, skip_serializing_if = "Option::is_none")]
        details: Option<serde_json::Value>,
    },
    /// Unknown response type for forward compatibility
    #[serde(other)]
    Unknown,
}

impl ResponseResult {
    /// Create a success response with data
    pub fn success<T: Serialize>(data: T) -> Self {
        ResponseResult::Success {
            data: Some(serde_json::to_value(data).unwrap_or_default()),
        }
    }

    /// Create an error response
    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        ResponseResult::Error {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Create an error response with details
    pub fn error_with_details<T: Serialize>(
        code: ErrorCode,
        message: impl Into<String>,
        details: T,
    ) -> Self {
        ResponseResult::Error {
            code,
            message: message.into(),
            details: Some(serde_json::to_value(details).unwrap_or_default()),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ResponseResult::Success { .. })
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ResponseResult::Error { .. })
    }

    /// The error code, if this is an error.
    pub fn error_code(&self) -> Option<ErrorCode> {
        match self {
            ResponseResult::Error { code, .. } => Some(*code),
            _ => None,
        }
    }
}

// =============================================================================
// Error Codes
// =============================================================================

/// Error classification codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Request was malformed, or named an unknown code
    BadRequest,
    /// Strict-mode numeric validation failed
    ValidationError,
    /// A load-bearing reference (material) is missing
    NotFound,
    /// Inputs are well-formed but physically or logically impossible
    UnprocessableInput,
    /// Response could not be encoded
    InternalError,

    /// Unknown variant for forward compatibility
    #[serde(other)]
    Unknown,
}

impl From<&DomainError> for ErrorCode {
    fn from(err: &DomainError) -> Self {
        match err {
            DomainError::Validation(_) => ErrorCode::ValidationError,
            DomainError::Unrecognized { .. } | DomainError::Parse(_) => ErrorCode::BadRequest,
            DomainError::Resolution { .. } => ErrorCode::NotFound,
            DomainError::Computation { .. } | DomainError::CircularDefault { .. } => {
                ErrorCode::UnprocessableInput
            }
        }
    }
}

// =============================================================================
// Compute Response
// =============================================================================

/// Response to one compute request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComputeResponse {
    pub result: ResponseResult,
    /// Inputs that were coerced (lenient mode)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<ValidationError>,
    /// References that could not be followed; they contributed zero
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unresolved: Vec<ResolutionIssue>,
}

impl ComputeResponse {
    /// Wrap a resolver outcome, putting intake issues ahead of the resolver's own.
    pub fn from_outcome<T: Serialize>(mut intake_issues: Vec<ValidationError>, outcome: Outcome<T>) -> Self {
        intake_issues.extend(outcome.issues);
        Self {
            result: ResponseResult::success(outcome.value),
            issues: intake_issues,
            unresolved: outcome.unresolved,
        }
    }

    pub fn failure(err: &DomainError) -> Self {
        let code = ErrorCode::from(err);
        let result = match err {
            DomainError::Validation(issues) => {
                ResponseResult::error_with_details(code, err.to_string(), issues)
            }
            DomainError::CircularDefault { chain } => {
                ResponseResult::error_with_details(code, err.to_string(), chain)
            }
            _ => ResponseResult::error(code, err.to_string()),
        };
        Self {
            result,
            issues: Vec::new(),
            unresolved: Vec::new(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            result: ResponseResult::error(ErrorCode::BadRequest, message),
            issues: Vec::new(),
            unresolved: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn success_serializes_with_status_tag() {
        let response = ComputeResponse::from_outcome(Vec::new(), Outcome::clean(json!({"st": 10})));
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value, json!({"result": {"status": "success", "data": {"st": 10}}}));
    }

    #[test]
    fn error_codes_follow_domain_errors() {
        assert_eq!(
            ErrorCode::from(&DomainError::unrecognized("beam type", "phaser")),
            ErrorCode::BadRequest
        );
        assert_eq!(
            ErrorCode::from(&DomainError::resolution("material", "Mithril")),
            ErrorCode::NotFound
        );
        assert_eq!(
            ErrorCode::from(&DomainError::computation("density", "zero")),
            ErrorCode::UnprocessableInput
        );
    }

    #[test]
    fn circular_default_carries_chain() {
        let err = DomainError::CircularDefault {
            chain: vec!["A".into(), "B".into(), "A".into()],
        };
        let response = ComputeResponse::failure(&err);
        match response.result {
            ResponseResult::Error { code, details, .. } => {
                assert_eq!(code, ErrorCode::UnprocessableInput);
                assert_eq!(details, Some(json!(["A", "B", "A"])));
            }
            other => panic!("expected error, got {other:?}"),
        }
    }

    #[test]
    fn unknown_codes_deserialize() {
        let code: ErrorCode = serde_json::from_value(json!("teapot")).unwrap();
        assert_eq!(code, ErrorCode::Unknown);
    }
}
