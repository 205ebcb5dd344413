//! EC2 instance inventory across regions.

use aws_sdk_ec2::Client as Ec2Client;
use aws_types::SdkConfig;
use tracing::{debug, info};

use crate::aws::client::ec2_client;
use crate::aws::sts::TemporaryCredentials;
use crate::error::{AppError, Result};
use crate::output::progress::Progress;

/// EC2 instance as rendered into hosts records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instance {
    pub id: String,
    pub name: Option<String>,
    pub state: String,
    pub ip: Option<String>,
}

impl Instance {
    pub fn new(
        id: impl Into<String>,
        name: Option<&str>,
        state: impl Into<String>,
        ip: Option<&str>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.map(String::from),
            state: state.into(),
            ip: ip.map(String::from),
        }
    }

    /// Public IP, treating an empty address as absent.
    pub fn public_ip(&self) -> Option<&str> {
        self.ip.as_deref().filter(|ip| !ip.is_empty())
    }

    /// Name tag value, empty when the instance is untagged.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }
}

impl From<&aws_sdk_ec2::types::Instance> for Instance {
    fn from(instance: &aws_sdk_ec2::types::Instance) -> Self {
        let name = extract_name_tag(instance);
        let state = instance
            .state()
            .and_then(|s| s.name())
            .map(|n| n.as_str())
            .unwrap_or("unknown");

        Self::new(
            instance.instance_id().unwrap_or_default(),
            name.as_deref(),
            state,
            instance.public_ip_address(),
        )
    }
}

/// Value of the first `Name` tag.
fn extract_name_tag(instance: &aws_sdk_ec2::types::Instance) -> Option<String> {
    instance
        .tags()
        .iter()
        .find(|tag| tag.key() == Some("Name"))
        .and_then(|tag| tag.value())
        .map(|s| s.to_string())
}

/// Collects instances region by region with default or assumed credentials.
pub struct InstanceCollector<'a> {
    sdk_config: &'a SdkConfig,
    progress: &'a Progress,
}

impl<'a> InstanceCollector<'a> {
    pub fn new(sdk_config: &'a SdkConfig, progress: &'a Progress) -> Self {
        Self {
            sdk_config,
            progress,
        }
    }

    /// Instances of every region, concatenated in region order.
    ///
    /// The first failing region aborts the scan.
    pub async fn list_instances(
        &self,
        regions: &[String],
        credentials: Option<&TemporaryCredentials>,
    ) -> Result<Vec<Instance>> {
        let identity = credentials
            .map(|c| c.role.to_string())
            .unwrap_or_else(|| "default credentials".to_string());

        let mut instances = Vec::new();
        for region in regions {
            self.progress
                .set_message(format!("Fetching instances from {}...", region));

            let client = ec2_client(
                self.sdk_config,
                region,
                credentials.map(TemporaryCredentials::to_sdk_credentials),
            );
            let found = describe_region(&client)
                .await
                .map_err(|e| AppError::region(region, format!("{} (as {})", e, identity)))?;

            debug!("Region {}: {} instance(s) as {}", region, found.len(), identity);
            instances.extend(found);
        }

        info!(
            "Collected {} instance(s) from {} region(s) as {}",
            instances.len(),
            regions.len(),
            identity
        );
        Ok(instances)
    }
}

async fn describe_region(client: &Ec2Client) -> Result<Vec<Instance>> {
    let mut instances = Vec::new();
    let mut next_token: Option<String> = None;

    loop {
        let response = client
            .describe_instances()
            .set_next_token(next_token.take())
            .send()
            .await
            .map_err(|e| AppError::aws(module_path!(), e))?;

        instances.extend(
            response
                .reservations()
                .iter()
                .flat_map(|r| r.instances())
                .map(Instance::from),
        );

        next_token = response.next_token().map(|s| s.to_string());
        if next_token.is_none() {
            break;
        }
    }

    Ok(instances)
}
