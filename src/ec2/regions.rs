//! Region discovery.

use anyhow::Result;
use aws_sdk_ec2::Client as Ec2Client;
use tracing::debug;

use crate::error::AppError;

/// Names of the regions enabled for the account, in API order.
pub async fn list_regions(client: &Ec2Client) -> Result<Vec<String>> {
    let response = client
        .describe_regions()
        .send()
        .await
        .map_err(|e| AppError::aws(module_path!(), e))?;

    let regions: Vec<String> = response
        .regions()
        .iter()
        .filter_map(|r| r.region_name())
        .map(|name| name.to_string())
        .collect();

    debug!("Found {} regions", regions.len());
    Ok(regions)
}
