//! Assume-role discovery in IAM policy documents.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Action granting permission to obtain temporary credentials for a role.
pub const ASSUME_ROLE_ACTION: &str = "sts:AssumeRole";

/// Role ARN pattern, e.g. `arn:aws:iam::012345678901:role/Deployer`.
/// Role names are word characters only, so `role/deploy-bot` and path-qualified roles never match.
/// A single trailing newline is tolerated after the role name.
static ROLE_ARN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)arn:aws:iam::(\d{12}):role/([A-Za-z0-9_]+)\n?$")
        .expect("role ARN pattern is valid")
});

/// Cross-account role referenced by an assume-role statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssumedRole {
    pub account: String,
    pub role: String,
}

impl AssumedRole {
    pub fn new(account: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            account: account.into(),
            role: role.into(),
        }
    }

    /// ARN passed to STS AssumeRole.
    pub fn role_arn(&self) -> String {
        format!("arn:aws:iam::{}:role/{}", self.account, self.role)
    }
}

impl std::fmt::Display for AssumedRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.account, self.role)
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    fn as_slice(&self) -> &[T] {
        match self {
            OneOrMany::One(item) => std::slice::from_ref(item),
            OneOrMany::Many(items) => items,
        }
    }
}

impl<T> Default for OneOrMany<T> {
    fn default() -> Self {
        OneOrMany::Many(Vec::new())
    }
}

#[derive(Debug, Deserialize)]
struct PolicyDocument {
    #[serde(rename = "Statement")]
    statement: OneOrMany<PolicyStatement>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
enum Effect {
    Allow,
    Deny,
}

#[derive(Debug, Deserialize)]
struct PolicyStatement {
    #[serde(rename = "Effect")]
    effect: Effect,
    #[serde(rename = "Action", default)]
    actions: OneOrMany<String>,
    #[serde(rename = "Resource", default)]
    resource: Option<serde_json::Value>,
}

impl PolicyStatement {
    fn allows_assume_role(&self) -> bool {
        self.effect == Effect::Allow
            && self
                .actions
                .as_slice()
                .iter()
                .any(|action| action == ASSUME_ROLE_ACTION)
    }

    /// Only a single string resource is considered; resource lists are ignored.
    fn assumed_role(&self) -> Option<AssumedRole> {
        let resource = self.resource.as_ref()?.as_str()?;
        parse_role_arn(resource)
    }
}

/// Match a resource ARN against the role pattern.
pub fn parse_role_arn(resource: &str) -> Option<AssumedRole> {
    let captures = ROLE_ARN_PATTERN.captures(resource)?;
    Some(AssumedRole::new(&captures[1], &captures[2]))
}

/// URL-decode a policy document as returned by `GetPolicyVersion`.
pub fn decode_policy_document(raw: &str) -> Result<String> {
    urlencoding::decode(raw)
        .map(|doc| doc.into_owned())
        .map_err(|e| AppError::PolicyDocument(format!("URL decoding failed: {}", e)))
}

/// Extract every role granted through an `Allow` + `sts:AssumeRole` statement.
///
/// Results follow statement order and are not de-duplicated.
pub fn extract_assumed_roles(policy_document: &str) -> Result<Vec<AssumedRole>> {
    let document: PolicyDocument = serde_json::from_str(policy_document)
        .map_err(|e| AppError::PolicyDocument(e.to_string()))?;

    Ok(document
        .statement
        .as_slice()
        .iter()
        .filter(|statement| statement.allows_assume_role())
        .filter_map(PolicyStatement::assumed_role)
        .collect())
}
