//! EC2 client error types.
//!
//! Failed calls surface as [`Ec2Error`].  Service-side failures carry the
//! code and message from the AWS `<Response><Errors><Error>` document so
//! callers can match on `InvalidInstanceID.NotFound` and friends.

use http::StatusCode;
use thiserror::Error;

use crate::auth::SigningError;
use crate::handlers::error::parse_error_document;
use crate::xml::XmlError;

/// Error codes that mean "try again later".
const RETRYABLE_CODES: &[&str] = &[
    "RequestLimitExceeded",
    "Throttling",
    "PriorRequestNotComplete",
    "RequestTimeTooSkewed",
];

/// Errors returned by the EC2 client.
#[derive(Debug, Error)]
pub enum Ec2Error {
    /// The endpoint answered with a non-2xx status.
    #[error("{code}: {message}")]
    Api {
        status: StatusCode,
        code: String,
        message: String,
        request_id: Option<String>,
    },

    /// The request never produced a response.
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body could not be mapped to a domain value.
    #[error("could not parse response: {0}")]
    Xml(#[from] XmlError),

    /// The request could not be signed.
    #[error("could not sign request: {0}")]
    Signing(#[from] SigningError),

    /// A caller-supplied argument is unusable.
    #[error("{0}")]
    InvalidArgument(String),

    /// The client configuration is unusable.
    #[error("configuration error: {0}")]
    Config(String),
}

impl Ec2Error {
    /// Build an [`Ec2Error::Api`] from an error response.
    ///
    /// Bodies that are not AWS error documents keep the HTTP reason as the
    /// code and the raw body as the message.
    pub fn from_response(status: StatusCode, body: &[u8]) -> Self {
        match parse_error_document(body) {
            Ok(Some(doc)) => Ec2Error::Api {
                status,
                code: doc.code,
                message: doc.message,
                request_id: doc.request_id,
            },
            _ => Ec2Error::Api {
                status,
                code: status
                    .canonical_reason()
                    .unwrap_or("Unknown")
                    .replace(' ', ""),
                message: String::from_utf8_lossy(body).trim().to_string(),
                request_id: None,
            },
        }
    }

    /// The AWS error code, or a synthetic one for client-side failures.
    pub fn code(&self) -> &str {
        match self {
            Ec2Error::Api { code, .. } => code,
            Ec2Error::Http(_) => "HttpError",
            Ec2Error::Xml(_) => "MalformedResponse",
            Ec2Error::Signing(_) => "SigningError",
            Ec2Error::InvalidArgument(_) => "InvalidArgument",
            Ec2Error::Config(_) => "ConfigError",
        }
    }

    /// HTTP status of the failed response, when there was one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Ec2Error::Api { status, .. } => Some(*status),
            Ec2Error::Http(e) => e.status(),
            _ => None,
        }
    }

    /// HTTP 404, or any `*.NotFound` error code.
    pub fn is_not_found(&self) -> bool {
        match self {
            Ec2Error::Api { status, code, .. } => {
                *status == StatusCode::NOT_FOUND || code.ends_with(".NotFound")
            }
            _ => false,
        }
    }

    /// Server faults, throttling and clock skew are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            Ec2Error::Api { status, code, .. } => {
                status.is_server_error() || RETRYABLE_CODES.contains(&code.as_str())
            }
            Ec2Error::Http(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }

    /// DetachVolume against a volume that is already detached.
    pub fn is_volume_available(&self) -> bool {
        match self {
            Ec2Error::Api { code, message, .. } => {
                code == "IncorrectState" && message.contains("available")
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(status: u16, code: &str) -> Ec2Error {
        Ec2Error::Api {
            status: StatusCode::from_u16(status).unwrap(),
            code: code.to_string(),
            message: "message".to_string(),
            request_id: None,
        }
    }

    #[test]
    fn test_from_response_parses_error_document() {
        let body = br#"<?xml version="1.0" encoding="UTF-8"?>
<Response><Errors><Error><Code>InvalidInstanceID.NotFound</Code><Message>The instance ID 'i-1' does not exist</Message></Error></Errors><RequestID>req-9</RequestID></Response>"#;
        let err = Ec2Error::from_response(StatusCode::BAD_REQUEST, body);
        match &err {
            Ec2Error::Api {
                status,
                code,
                message,
                request_id,
            } => {
                assert_eq!(*status, StatusCode::BAD_REQUEST);
                assert_eq!(code, "InvalidInstanceID.NotFound");
                assert_eq!(message, "The instance ID 'i-1' does not exist");
                assert_eq!(request_id.as_deref(), Some("req-9"));
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(err.is_not_found());
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_from_response_non_xml_body() {
        let err = Ec2Error::from_response(StatusCode::SERVICE_UNAVAILABLE, b"try later");
        assert_eq!(err.code(), "ServiceUnavailable");
        assert_eq!(err.to_string(), "ServiceUnavailable: try later");
        assert!(err.is_retryable());
    }

    #[test]
    fn test_is_not_found() {
        assert!(api(404, "Whatever").is_not_found());
        assert!(api(400, "InvalidVolume.NotFound").is_not_found());
        assert!(!api(400, "InvalidParameterValue").is_not_found());
        assert!(!Ec2Error::InvalidArgument("x".into()).is_not_found());
    }

    #[test]
    fn test_is_retryable() {
        assert!(api(500, "InternalError").is_retryable());
        assert!(api(503, "Unavailable").is_retryable());
        assert!(api(400, "RequestLimitExceeded").is_retryable());
        assert!(api(400, "Throttling").is_retryable());
        assert!(api(400, "RequestTimeTooSkewed").is_retryable());
        assert!(!api(400, "AuthFailure").is_retryable());
        assert!(!api(404, "InvalidAMIID.NotFound").is_retryable());
    }

    #[test]
    fn test_is_volume_available() {
        let err = Ec2Error::Api {
            status: StatusCode::BAD_REQUEST,
            code: "IncorrectState".into(),
            message: "Volume 'vol-1' is in the 'available' state.".into(),
            request_id: None,
        };
        assert!(err.is_volume_available());
        assert!(!api(400, "IncorrectState").is_volume_available());
    }

    #[test]
    fn test_code_and_status() {
        assert_eq!(api(400, "AuthFailure").code(), "AuthFailure");
        assert_eq!(
            api(401, "AuthFailure").status(),
            Some(StatusCode::UNAUTHORIZED)
        );
        assert_eq!(Ec2Error::Config("x".into()).code(), "ConfigError");
        assert_eq!(
            Ec2Error::from(SigningError::MissingAction).code(),
            "SigningError"
        );
        assert_eq!(Ec2Error::InvalidArgument("bad".into()).status(), None);
    }
}
