//! Custom error types for aws-commands.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while scanning IAM/EC2 or patching the hosts file.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("[{0}] {1}")]
    AwsSdk(String, String),

    #[error("[{0}] AWS credentials error: {1}")]
    AwsCredentials(String, String),

    #[error("Failed to scan region {region}: {message}")]
    Region { region: String, message: String },

    #[error("Invalid policy document: {0}")]
    PolicyDocument(String),

    #[error("Missing field {field} in {context}")]
    MissingField {
        field: &'static str,
        context: String,
    },

    #[error("Hosts file {}: {source}", path.display())]
    HostsFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Lowercased error codes and messages that point at the caller's identity
/// rather than the request: credential chain, IAM/STS signing and EC2 authorization.
const CREDENTIAL_ERROR_MARKERS: &[&str] = &[
    "no credentials",
    "credentials not found",
    "expiredtoken",
    "invalidclienttokenid",
    "signaturedoesnotmatch",
    "the security token included in the request is",
    "accessdenied",
    "access denied",
    "is not authorized to perform",
    "unauthorizedoperation",
    "you are not authorized to perform this operation",
    "authfailure",
];

impl AppError {
    /// Create an AWS SDK error from any error type.
    /// Credential and authorization failures get their own variant.
    pub fn aws<E: std::fmt::Debug + std::fmt::Display>(component: &str, err: E) -> Self {
        let err_debug = format!("{:?}", err);
        let err_display = err.to_string();
        let details = Self::extract_error_details(&err_debug, &err_display);

        let combined_lower = format!("{} {}", err_display, err_debug).to_lowercase();
        if CREDENTIAL_ERROR_MARKERS
            .iter()
            .any(|marker| combined_lower.contains(marker))
        {
            return AppError::AwsCredentials(component.to_string(), details);
        }

        AppError::AwsSdk(component.to_string(), details)
    }

    /// Wrap an error raised while scanning a single region.
    pub fn region<E: std::fmt::Display>(region: &str, err: E) -> Self {
        AppError::Region {
            region: region.to_string(),
            message: err.to_string(),
        }
    }

    /// Extract a single-line message from an AWS SDK error.
    fn extract_error_details(debug_str: &str, display_str: &str) -> String {
        // Pattern: message: Some("actual error message")
        if let Some(pos) = debug_str.find("message: Some(\"") {
            let start = pos + "message: Some(\"".len();
            let rest = &debug_str[start..];
            if let Some(end) = rest.find('"') {
                return rest[..end].to_string();
            }
        }

        if !display_str.to_lowercase().contains("service error") {
            return display_str.to_string();
        }

        "AWS API request failed".to_string()
    }
}

/// Result type alias for this crate.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_aws_helper_generic() {
        let err = AppError::aws("ec2::instances", "connection failed");
        assert!(matches!(err, AppError::AwsSdk(_, _)));
        assert_eq!(err.to_string(), "[ec2::instances] connection failed");
    }

    #[test]
    fn test_error_aws_credentials_expired() {
        let err = AppError::aws(
            "iam::roles",
            "The security token included in the request is expired",
        );
        assert!(matches!(err, AppError::AwsCredentials(_, _)));
        assert!(err.to_string().contains("AWS credentials error"));
    }

    #[test]
    fn test_error_aws_access_denied() {
        let err = AppError::aws("aws::sts", "AccessDenied: not allowed to assume");
        assert!(matches!(err, AppError::AwsCredentials(_, _)));
        assert!(err.to_string().starts_with("[aws::sts]"));
    }

    #[test]
    fn test_error_aws_ec2_unauthorized_operation() {
        let err = AppError::aws(
            "ec2::instances",
            r#"ServiceError { code: Some("UnauthorizedOperation"), message: Some("You are not authorized to perform this operation.") }"#,
        );
        assert!(matches!(err, AppError::AwsCredentials(_, _)));
    }

    #[test]
    fn test_error_aws_ec2_auth_failure() {
        let err = AppError::aws("ec2::regions", "AuthFailure: AWS was not able to validate the provided access credentials");
        assert!(matches!(err, AppError::AwsCredentials(_, _)));
    }

    #[test]
    fn test_error_aws_iam_not_authorized() {
        let err = AppError::aws(
            "iam::roles",
            "User: arn:aws:iam::123456789012:user/alice is not authorized to perform: iam:GetUser",
        );
        assert!(matches!(err, AppError::AwsCredentials(_, _)));
    }

    #[test]
    fn test_error_aws_throttling_is_not_credentials() {
        let err = AppError::aws("iam::roles", "Throttling: Rate exceeded");
        assert!(matches!(err, AppError::AwsSdk(_, _)));
    }

    #[test]
    fn test_extract_error_details_from_debug_message() {
        let debug = r#"ServiceError { message: Some("Rate exceeded"), code: Some("Throttling") }"#;
        let details = AppError::extract_error_details(debug, "service error");
        assert_eq!(details, "Rate exceeded");
    }

    #[test]
    fn test_extract_error_details_fallback() {
        let details = AppError::extract_error_details("opaque", "service error");
        assert_eq!(details, "AWS API request failed");
    }

    #[test]
    fn test_error_display_region() {
        let err = AppError::region("eu-west-1", "dispatch failure");
        assert_eq!(
            err.to_string(),
            "Failed to scan region eu-west-1: dispatch failure"
        );
    }

    #[test]
    fn test_error_display_missing_field() {
        let err = AppError::MissingField {
            field: "DefaultVersionId",
            context: "policy arn:aws:iam::123456789012:policy/Ops".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Missing field DefaultVersionId in policy arn:aws:iam::123456789012:policy/Ops"
        );
    }
}
