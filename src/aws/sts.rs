//! Temporary credentials for assumed cross-account roles.

use std::time::SystemTime;

use anyhow::Result;
use aws_sdk_ec2::config::Credentials;
use aws_sdk_sts::Client as StsClient;
use tracing::{debug, info};

use crate::error::AppError;
use crate::iam::policy::AssumedRole;

/// Session name recorded in CloudTrail for every assumed role.
pub const SESSION_NAME: &str = "aws-commands";

/// Short-lived credential set obtained via STS AssumeRole.
#[derive(Clone)]
pub struct TemporaryCredentials {
    pub role: AssumedRole,
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: String,
    pub expiration: Option<SystemTime>,
}

impl std::fmt::Debug for TemporaryCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemporaryCredentials")
            .field("role", &self.role)
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"** redacted **")
            .field("session_token", &"** redacted **")
            .field("expiration", &self.expiration)
            .finish()
    }
}

impl TemporaryCredentials {
    /// Credentials usable as an SDK credentials provider.
    pub fn to_sdk_credentials(&self) -> Credentials {
        Credentials::new(
            self.access_key_id.clone(),
            self.secret_access_key.clone(),
            Some(self.session_token.clone()),
            self.expiration,
            "aws-commands-assume-role",
        )
    }
}

/// Assume `role` with the caller's default credentials.
pub async fn assume_role(client: &StsClient, role: &AssumedRole) -> Result<TemporaryCredentials> {
    let role_arn = role.role_arn();
    info!("Assuming role {}", role_arn);

    let response = client
        .assume_role()
        .role_arn(&role_arn)
        .role_session_name(SESSION_NAME)
        .send()
        .await
        .map_err(|e| AppError::aws(module_path!(), e))?;

    let creds = response
        .credentials()
        .ok_or_else(|| AppError::MissingField {
            field: "Credentials",
            context: format!("AssumeRole response for {}", role_arn),
        })?;

    debug!("Assumed role {} (access key {})", role_arn, creds.access_key_id());

    Ok(TemporaryCredentials {
        role: role.clone(),
        access_key_id: creds.access_key_id().to_string(),
        secret_access_key: creds.secret_access_key().to_string(),
        session_token: creds.session_token().to_string(),
        expiration: SystemTime::try_from(*creds.expiration()).ok(),
    })
}
