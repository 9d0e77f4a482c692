//! cloudapi: command-line access to the EC2 and GleSYS read operations.
//!
//! Results are printed to stdout as pretty JSON; logs go to stderr.

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;

use cloudapi::config::{Config, LoggingConfig};
use cloudapi::options::{
    DescribeAvailabilityZonesOptions, DescribeImagesOptions, DescribeRegionsOptions,
    DescribeSnapshotsOptions, FilterOptions,
};
use cloudapi::{Ec2Client, GlesysClient};

/// Command-line arguments for cloudapi.
#[derive(Parser, Debug)]
#[command(name = "cloudapi", version, about = "EC2 and GleSYS API client")]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short, long, default_value = "cloudapi.example.yaml")]
    config: String,

    /// Region to query; the configured default when omitted.
    #[arg(short, long, global = true)]
    region: Option<String>,

    /// Print Prometheus metrics for the calls made to stderr on exit.
    #[arg(long, global = true)]
    metrics: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// EC2 query API.
    #[command(subcommand)]
    Ec2(Ec2Command),
    /// GleSYS API.
    #[command(subcommand)]
    Glesys(GlesysCommand),
}

#[derive(Subcommand, Debug)]
enum Ec2Command {
    DescribeImages {
        /// Owner filter, e.g. `self` or `amazon`.
        #[arg(long)]
        owner: Vec<String>,
        #[arg(long = "image-id")]
        image_ids: Vec<String>,
    },
    DescribeInstances {
        instance_ids: Vec<String>,
    },
    DescribeVolumes {
        volume_ids: Vec<String>,
    },
    DescribeSnapshots {
        #[arg(long)]
        owner: Vec<String>,
    },
    DescribeSecurityGroups {
        group_names: Vec<String>,
    },
    DescribeKeyPairs {
        key_names: Vec<String>,
    },
    DescribeAvailabilityZones {
        zones: Vec<String>,
    },
    DescribeRegions {
        regions: Vec<String>,
    },
    DescribeTags {
        /// `name=value` filters.
        #[arg(long, value_parser = parse_filter)]
        filter: Vec<(String, String)>,
    },
    DescribeSubnets {
        #[arg(long, value_parser = parse_filter)]
        filter: Vec<(String, String)>,
    },
    DescribeSpotInstanceRequests {
        request_ids: Vec<String>,
    },
    GetConsoleOutput {
        instance_id: String,
    },
}

#[derive(Subcommand, Debug)]
enum GlesysCommand {
    ListServers,
    ServerDetails { server_id: String },
    ListIps,
    ListDomains,
    ListRecords { domain: String },
    ListTemplates,
    ListEmailAccounts { domain: String },
}

fn parse_filter(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .ok_or_else(|| format!("expected name=value, got {s}"))
}

fn filter_options(filters: &[(String, String)]) -> FilterOptions {
    filters
        .iter()
        .fold(FilterOptions::new(), |options, (name, value)| {
            options.filter(name.clone(), value.clone())
        })
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&logging.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if logging.format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn strings(values: &[String]) -> Vec<&str> {
    values.iter().map(String::as_str).collect()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cloudapi::config::load_config(&cli.config)?;
    init_tracing(&config.logging);
    info!("Loaded configuration from {}", cli.config);

    if cli.metrics || config.observability.metrics {
        cloudapi::metrics::init_metrics();
        cloudapi::metrics::describe_metrics();
    }

    let region = cli.region.as_deref();
    match &cli.command {
        Command::Ec2(command) => run_ec2(&config, region, command).await?,
        Command::Glesys(command) => run_glesys(&config, command).await?,
    }

    if let Some(text) = cloudapi::metrics::render() {
        eprintln!("{text}");
    }
    Ok(())
}

async fn run_ec2(config: &Config, region: Option<&str>, command: &Ec2Command) -> anyhow::Result<()> {
    let client = Ec2Client::new(config)?;
    info!(
        region = region.unwrap_or(client.default_region()),
        endpoint = %client.endpoint(region)?,
        "EC2 target"
    );
    match command {
        Ec2Command::DescribeImages { owner, image_ids } => {
            let options = DescribeImagesOptions::new()
                .owners(owner.iter().cloned())
                .image_ids(image_ids.iter().cloned());
            print_json(&client.ami().describe_images(region, &options).await?)
        }
        Ec2Command::DescribeInstances { instance_ids } => print_json(
            &client
                .instances()
                .describe_instances_in_region(region, &strings(instance_ids))
                .await?,
        ),
        Ec2Command::DescribeVolumes { volume_ids } => print_json(
            &client
                .ebs()
                .describe_volumes_in_region(region, &strings(volume_ids))
                .await?,
        ),
        Ec2Command::DescribeSnapshots { owner } => {
            let options = DescribeSnapshotsOptions::new().owned_by(owner.iter().cloned());
            print_json(&client.ebs().describe_snapshots_in_region(region, &options).await?)
        }
        Ec2Command::DescribeSecurityGroups { group_names } => print_json(
            &client
                .security_groups()
                .describe_security_groups_in_region(region, &strings(group_names))
                .await?,
        ),
        Ec2Command::DescribeKeyPairs { key_names } => print_json(
            &client
                .key_pairs()
                .describe_key_pairs_in_region(region, &strings(key_names))
                .await?,
        ),
        Ec2Command::DescribeAvailabilityZones { zones } => {
            let options = DescribeAvailabilityZonesOptions::new().zones(zones.iter().cloned());
            print_json(
                &client
                    .availability_zones()
                    .describe_availability_zones_in_region(region, &options)
                    .await?,
            )
        }
        Ec2Command::DescribeRegions { regions } => {
            let options = DescribeRegionsOptions::new().regions(regions.iter().cloned());
            print_json(&client.availability_zones().describe_regions(&options).await?)
        }
        Ec2Command::DescribeTags { filter } => print_json(
            &client
                .tags()
                .describe_tags_in_region(region, &filter_options(filter))
                .await?,
        ),
        Ec2Command::DescribeSubnets { filter } => print_json(
            &client
                .subnets()
                .describe_subnets_in_region(region, &filter_options(filter))
                .await?,
        ),
        Ec2Command::DescribeSpotInstanceRequests { request_ids } => print_json(
            &client
                .spot_instances()
                .describe_spot_instance_requests_in_region(region, &strings(request_ids))
                .await?,
        ),
        Ec2Command::GetConsoleOutput { instance_id } => {
            let output = client
                .instances()
                .get_console_output_for_instance_in_region(region, instance_id)
                .await?;
            println!("{output}");
            Ok(())
        }
    }
}

async fn run_glesys(config: &Config, command: &GlesysCommand) -> anyhow::Result<()> {
    let client = GlesysClient::new(config)?;
    match command {
        GlesysCommand::ListServers => print_json(&client.servers().list_servers().await?),
        GlesysCommand::ServerDetails { server_id } => {
            print_json(&client.servers().get_server_details(server_id).await?)
        }
        GlesysCommand::ListIps => print_json(&client.ips().list_ips().await?),
        GlesysCommand::ListDomains => print_json(&client.domains().list_domains().await?),
        GlesysCommand::ListRecords { domain } => {
            print_json(&client.domains().list_records(domain).await?)
        }
        GlesysCommand::ListTemplates => print_json(&client.servers().list_templates().await?),
        GlesysCommand::ListEmailAccounts { domain } => {
            print_json(&client.email().list_accounts(domain).await?)
        }
    }
}
