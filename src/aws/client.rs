//! Shared SDK configuration and per-service client construction.

use aws_config::{BehaviorVersion, Region};
use aws_sdk_ec2::config::Credentials;
use aws_types::SdkConfig;
use tracing::debug;

/// IAM and STS are called through their `us-east-1` endpoints.
pub const GLOBAL_REGION: &str = "us-east-1";

/// Load the base SDK configuration from the default credential chain.
pub async fn load_sdk_config(profile: Option<&str>, region: Option<&str>) -> SdkConfig {
    let mut config_loader = aws_config::defaults(BehaviorVersion::latest());

    if let Some(profile) = profile {
        debug!("Using AWS profile: {}", profile);
        config_loader = config_loader.profile_name(profile);
    }

    if let Some(region) = region {
        debug!("Using AWS region: {}", region);
        config_loader = config_loader.region(Region::new(region.to_string()));
    }

    config_loader.load().await
}

/// Region of the base configuration, `us-east-1` when nothing is configured.
pub fn home_region(sdk_config: &SdkConfig) -> Region {
    sdk_config
        .region()
        .cloned()
        .unwrap_or_else(|| Region::new(GLOBAL_REGION))
}

/// IAM client pinned to the global endpoint.
pub fn iam_client(sdk_config: &SdkConfig) -> aws_sdk_iam::Client {
    let config = aws_sdk_iam::config::Builder::from(sdk_config)
        .region(Region::new(GLOBAL_REGION))
        .build();
    aws_sdk_iam::Client::from_conf(config)
}

/// STS client pinned to the global endpoint.
pub fn sts_client(sdk_config: &SdkConfig) -> aws_sdk_sts::Client {
    let config = aws_sdk_sts::config::Builder::from(sdk_config)
        .region(Region::new(GLOBAL_REGION))
        .build();
    aws_sdk_sts::Client::from_conf(config)
}

/// EC2 client for one region, optionally signing with temporary credentials.
pub fn ec2_client(
    sdk_config: &SdkConfig,
    region: &str,
    credentials: Option<Credentials>,
) -> aws_sdk_ec2::Client {
    let mut builder =
        aws_sdk_ec2::config::Builder::from(sdk_config).region(Region::new(region.to_string()));

    if let Some(credentials) = credentials {
        builder = builder.credentials_provider(credentials);
    }

    aws_sdk_ec2::Client::from_conf(builder.build())
}
