//! aws-commands - cross-account IAM role discovery and EC2 hosts records.
//!
//! Commands:
//! - `iam:assumed-roles`: roles the caller may assume according to its group policies
//! - `ec2:hosts-info`: `/etc/hosts` records for every EC2 instance reachable with the
//!   default credentials and each assumed role

mod aws;
mod config;
mod ec2;
mod error;
mod hosts;
mod iam;
mod output;
#[cfg(test)]
mod test_util;

use std::path::Path;

use anyhow::{Context, Result};
use aws_types::SdkConfig;
use clap::Parser;
use colored::Colorize;
use tracing::{debug, error, info};

use aws::client::{ec2_client, home_region, iam_client, load_sdk_config, sts_client};
use aws::sts::assume_role;
use config::{Args, Command, Config, OutputFormat};
use ec2::instances::{Instance, InstanceCollector};
use ec2::regions::list_regions;
use iam::roles::RoleEnumerator;
use output::progress::Progress;

#[tokio::main]
async fn main() {
    let args = Args::parse();
    let config = Config::from_args(args);

    if let Err(e) = init_tracing(&config.log_level) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    debug!("Starting aws-commands");

    if let Err(e) = run(&config).await {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

/// Main application logic.
async fn run(config: &Config) -> Result<()> {
    let sdk_config = load_sdk_config(config.profile.as_deref(), config.region.as_deref()).await;

    match &config.command {
        Command::AssumedRoles { output } => run_assumed_roles(&sdk_config, config, *output).await,
        Command::HostsInfo {
            file,
            regions,
            skip_assumed_roles,
        } => {
            run_hosts_info(
                &sdk_config,
                config,
                file.as_deref(),
                regions,
                *skip_assumed_roles,
            )
            .await
        }
    }
}

/// Initialize tracing subscriber.
fn init_tracing(log_level: &str) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .map_err(|e| anyhow::anyhow!("Failed to initialize log filter: {}", e))?;

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();

    Ok(())
}

/// `iam:assumed-roles`
async fn run_assumed_roles(
    sdk_config: &SdkConfig,
    config: &Config,
    output: OutputFormat,
) -> Result<()> {
    let iam = iam_client(sdk_config);
    let roles = RoleEnumerator::new(&iam)
        .list_assumed_roles()
        .await
        .context("Failed to list assumed roles")?;

    if config.quiet {
        return Ok(());
    }

    match output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&roles)?),
        OutputFormat::Table if roles.is_empty() => {
            println!("{}", "No assumable roles found.".yellow());
        }
        OutputFormat::Table => println!("{}", output::render_roles_table(&roles)),
    }

    Ok(())
}

/// `ec2:hosts-info`
async fn run_hosts_info(
    sdk_config: &SdkConfig,
    config: &Config,
    file: Option<&Path>,
    regions: &[String],
    skip_assumed_roles: bool,
) -> Result<()> {
    let progress = Progress::new(config.quiet);
    let instances = collect_instances(sdk_config, &progress, regions, skip_assumed_roles).await?;
    progress.finish();

    match file {
        Some(path) => write_records(path, &instances, config.quiet),
        None => {
            let table = output::render_hosts_table(&instances);
            if !config.quiet && !table.is_empty() {
                println!("{}", table);
            }
            Ok(())
        }
    }
}

/// Instances visible to the default credentials, then to each assumed role in discovery order.
async fn collect_instances(
    sdk_config: &SdkConfig,
    progress: &Progress,
    regions: &[String],
    skip_assumed_roles: bool,
) -> Result<Vec<Instance>> {
    let roles = if skip_assumed_roles {
        Vec::new()
    } else {
        progress.set_message("Fetching assumed roles...");
        let iam = iam_client(sdk_config);
        RoleEnumerator::new(&iam)
            .list_assumed_roles()
            .await
            .context("Failed to list assumed roles")?
    };

    let regions = if regions.is_empty() {
        progress.set_message("Fetching regions...");
        let home = home_region(sdk_config);
        list_regions(&ec2_client(sdk_config, home.as_ref(), None))
            .await
            .with_context(|| format!("Failed to list regions from {}", home))?
    } else {
        regions.to_vec()
    };

    let collector = InstanceCollector::new(sdk_config, progress);
    let mut instances = collector.list_instances(&regions, None).await?;

    let sts = sts_client(sdk_config);
    for role in &roles {
        progress.set_message(format!("Assuming role {}...", role));
        let credentials = assume_role(&sts, role)
            .await
            .with_context(|| format!("Failed to assume role {}", role.role_arn()))?;
        instances.extend(collector.list_instances(&regions, Some(&credentials)).await?);
    }

    info!(
        "Collected {} instance(s) from {} region(s) with {} assumed role(s)",
        instances.len(),
        regions.len(),
        roles.len()
    );
    Ok(instances)
}

fn write_records(path: &Path, instances: &[Instance], quiet: bool) -> Result<()> {
    hosts::write_hosts_block(path, instances)?;

    if !quiet {
        let written = instances.iter().filter(|i| i.public_ip().is_some()).count();
        println!(
            "{} {} records to {}",
            "Wrote".bright_blue().bold(),
            written.to_string().bright_yellow().bold(),
            path.display().to_string().bright_cyan()
        );
    }

    Ok(())
}
