//! CLI configuration and argument parsing.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const COMMIT: &str = env!("BUILD_COMMIT");
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Cross-account IAM role discovery and EC2 hosts records.
///
/// Lists the roles your group policies allow you to assume and turns the
/// EC2 inventory of every region into `/etc/hosts` records.
#[derive(Parser, Debug, Clone)]
#[command(name = "aws-commands")]
#[command(about = "Cross-account IAM role discovery and EC2 hosts records")]
#[command(version = const_format::formatcp!(
    "{} (commit: {}, build date: {})",
    VERSION, COMMIT, BUILD_DATE
))]
pub struct Args {
    /// AWS profile to use
    #[arg(short, long, global = true, env = "AWS_PROFILE")]
    pub profile: Option<String>,

    /// AWS region used to list regions (IAM and STS always use us-east-1)
    #[arg(short, long, global = true, env = "AWS_DEFAULT_REGION")]
    pub region: Option<String>,

    /// Suppress progress and command output
    #[arg(short, long, global = true, default_value = "false")]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn", env = "AWS_COMMANDS_LOG_LEVEL")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Lists assumed roles from group policies
    #[command(name = "iam:assumed-roles")]
    AssumedRoles {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        output: OutputFormat,
    },

    /// Creating `/etc/hosts` records from all EC2 instances (name and IP)
    #[command(name = "ec2:hosts-info")]
    #[command(after_help = r#"Examples:
  aws-commands ec2:hosts-info                      Print records as a table
  sudo aws-commands ec2:hosts-info --file /etc/hosts   Write records into /etc/hosts"#)]
    HostsInfo {
        /// File to write hosts records (e.g. /etc/hosts)
        #[arg(long, value_name = "PATH")]
        file: Option<PathBuf>,

        /// Scan only these regions instead of every enabled region
        #[arg(long, value_delimiter = ',', value_name = "REGION,...")]
        regions: Vec<String>,

        /// Only scan with the default credentials
        #[arg(long, default_value = "false")]
        skip_assumed_roles: bool,
    },
}

/// Output format of `iam:assumed-roles`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

/// Application configuration derived from CLI args.
#[derive(Debug, Clone)]
pub struct Config {
    pub profile: Option<String>,
    pub region: Option<String>,
    pub quiet: bool,
    pub log_level: String,
    pub command: Command,
}

impl Config {
    /// Create config from CLI arguments.
    pub fn from_args(args: Args) -> Self {
        let command = match args.command {
            Command::HostsInfo {
                file,
                regions,
                skip_assumed_roles,
            } => Command::HostsInfo {
                file,
                regions: normalize_regions(regions),
                skip_assumed_roles,
            },
            other => other,
        };

        Self {
            profile: args.profile,
            region: args.region.filter(|r| !r.is_empty()),
            quiet: args.quiet,
            log_level: args.log_level,
            command,
        }
    }
}

/// Trim region names and drop empty entries, keeping the given order.
fn normalize_regions(regions: Vec<String>) -> Vec<String> {
    regions
        .into_iter()
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty())
        .collect()
}
