//! Assumed-role enumeration through the caller's IAM groups.

use anyhow::{Context, Result};
use aws_sdk_iam::Client as IamClient;
use tracing::{debug, info};

use super::policy::{AssumedRole, decode_policy_document, extract_assumed_roles};
use crate::error::AppError;

/// Walks user -> groups -> attached policies -> default policy versions.
pub struct RoleEnumerator<'a> {
    client: &'a IamClient,
}

impl<'a> RoleEnumerator<'a> {
    pub fn new(client: &'a IamClient) -> Self {
        Self { client }
    }

    /// All roles the caller may assume according to its group policies.
    ///
    /// Roles are returned in policy discovery order, duplicates included.
    pub async fn list_assumed_roles(&self) -> Result<Vec<AssumedRole>> {
        let user_name = self.current_user_name().await?;
        let groups = self.list_groups(&user_name).await?;

        let mut policy_arns = Vec::new();
        for group in &groups {
            policy_arns.extend(self.list_attached_policies(group).await?);
        }
        debug!(
            "User {} has {} group(s) with {} attached policies",
            user_name,
            groups.len(),
            policy_arns.len()
        );

        let mut roles = Vec::new();
        for policy_arn in &policy_arns {
            let document = self.default_policy_document(policy_arn).await?;
            let found = extract_assumed_roles(&document)
                .with_context(|| format!("Failed to scan policy {}", policy_arn))?;
            debug!("Policy {} grants {} assumable role(s)", policy_arn, found.len());
            roles.extend(found);
        }

        info!("Found {} assumable role(s)", roles.len());
        Ok(roles)
    }

    async fn current_user_name(&self) -> Result<String> {
        let response = self
            .client
            .get_user()
            .send()
            .await
            .map_err(|e| AppError::aws(module_path!(), e))?;

        let user = response.user().ok_or_else(|| AppError::MissingField {
            field: "User",
            context: "GetUser response".to_string(),
        })?;

        Ok(user.user_name().to_string())
    }

    async fn list_groups(&self, user_name: &str) -> Result<Vec<String>> {
        let mut groups = Vec::new();
        let mut marker: Option<String> = None;

        loop {
            let response = self
                .client
                .list_groups_for_user()
                .user_name(user_name)
                .set_marker(marker.take())
                .send()
                .await
                .map_err(|e| AppError::aws(module_path!(), e))?;

            groups.extend(response.groups().iter().map(|g| g.group_name().to_string()));

            marker = response.marker().map(|s| s.to_string());
            if !response.is_truncated() || marker.is_none() {
                break;
            }
        }

        Ok(groups)
    }

    async fn list_attached_policies(&self, group_name: &str) -> Result<Vec<String>> {
        let mut policies = Vec::new();
        let mut marker: Option<String> = None;

        loop {
            let response = self
                .client
                .list_attached_group_policies()
                .group_name(group_name)
                .set_marker(marker.take())
                .send()
                .await
                .map_err(|e| AppError::aws(module_path!(), e))?;

            policies.extend(
                response
                    .attached_policies()
                    .iter()
                    .filter_map(|p| p.policy_arn())
                    .map(|arn| arn.to_string()),
            );

            marker = response.marker().map(|s| s.to_string());
            if !response.is_truncated() || marker.is_none() {
                break;
            }
        }

        Ok(policies)
    }

    /// URL-decoded document of the policy's default version.
    async fn default_policy_document(&self, policy_arn: &str) -> Result<String> {
        let policy = self
            .client
            .get_policy()
            .policy_arn(policy_arn)
            .send()
            .await
            .map_err(|e| AppError::aws(module_path!(), e))?;

        let version_id = policy
            .policy()
            .and_then(|p| p.default_version_id())
            .ok_or_else(|| AppError::MissingField {
                field: "DefaultVersionId",
                context: format!("policy {}", policy_arn),
            })?;

        let version = self
            .client
            .get_policy_version()
            .policy_arn(policy_arn)
            .version_id(version_id)
            .send()
            .await
            .map_err(|e| AppError::aws(module_path!(), e))?;

        let raw = version
            .policy_version()
            .and_then(|v| v.document())
            .ok_or_else(|| AppError::MissingField {
                field: "Document",
                context: format!("policy {} version {}", policy_arn, version_id),
            })?;

        Ok(decode_policy_document(raw)?)
    }
}
