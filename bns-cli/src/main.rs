//! BNS CLI
//!
//! Command-line interface for deploying the BNS contracts and managing their
//! artifacts.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use bns_core::constants::{DEFAULT_IPFS_API_URL, DEFAULT_IPFS_GATEWAY, DEFAULT_LOCAL_RPC_URL};
use bns_core::{ExportTarget, FactSet, PathParams, Status, StatusKind};
use bns_deploy::{DeployConfig, NetworkRegistry, Orchestrator, RecordDeployer, RunSummary};
use bns_export::{ArtifactExporter, CorruptDocumentPolicy, ExportReport};
use bns_http::HttpClient;
use bns_ipfs::{IpfsClient, IpfsConfig};

/// BNS - deploy toolkit for the BNS name service contracts
#[derive(Parser)]
#[command(name = "bns")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Deploy the contract set and export its artifacts
    Deploy {
        /// Network to deploy to
        #[arg(short, long)]
        network: String,
        /// Deploy config file
        #[arg(short, long, default_value = ".secrets.json")]
        config: PathBuf,
        /// Directory of extra network profiles (JSON)
        #[arg(long)]
        profiles: Option<PathBuf>,
        /// Chain id, when the deployments have no `.chainId` file
        #[arg(long)]
        chain_id: Option<u64>,
    },

    /// Merge a facts file into artifact targets
    Export {
        /// JSON object of facts to merge
        #[arg(long)]
        facts: PathBuf,
        /// Fixed target file (repeatable)
        #[arg(long = "file")]
        files: Vec<PathBuf>,
        /// Target directory receiving `<chainId>.json` (repeatable)
        #[arg(long = "dir")]
        dirs: Vec<PathBuf>,
        /// Chain id used for directory targets
        #[arg(long)]
        chain_id: u64,
        /// Fail targets whose existing document is not a JSON object
        #[arg(long)]
        strict: bool,
    },

    /// IPFS content operations
    Ipfs {
        /// Node RPC API URL
        #[arg(long, env = "IPFS_API_URL", default_value = DEFAULT_IPFS_API_URL)]
        api_url: String,
        /// Gateway endpoint
        #[arg(long, env = "IPFS_GATEWAY_ENDPOINT", default_value = DEFAULT_IPFS_GATEWAY)]
        gateway: String,
        /// Authorization header for the node API
        #[arg(long, env = "IPFS_AUTH_HEADER")]
        auth: Option<String>,

        #[command(subcommand)]
        action: IpfsCommand,
    },

    /// Send a JSON-RPC request
    Rpc {
        /// Method name, e.g. eth_chainId
        method: String,
        /// Params as a JSON array
        #[arg(default_value = "[]")]
        params: String,
        /// Node URL
        #[arg(long, env = "BNS_RPC_URL", default_value = DEFAULT_LOCAL_RPC_URL)]
        url: String,
    },

    /// List network profiles
    Networks {
        /// Directory of extra network profiles (JSON)
        #[arg(long)]
        profiles: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum IpfsCommand {
    /// Add a file
    Add {
        /// File to add
        path: PathBuf,
        /// Name to store it under
        #[arg(long)]
        name: Option<String>,
    },
    /// Add text content
    AddText {
        /// Text to add
        text: String,
        /// Name to store it under
        #[arg(long)]
        name: Option<String>,
    },
    /// Fetch content through the gateway
    Fetch {
        /// Content id (with or without ipfs://)
        cid: String,
    },
    /// Unpin content
    Unpin {
        /// Content id (with or without ipfs://)
        cid: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "bns=debug,info"
    } else {
        "bns=info,warn"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::Deploy {
            network,
            config,
            profiles,
            chain_id,
        } => cmd_deploy(&network, &config, profiles.as_deref(), chain_id).await,
        Commands::Export {
            facts,
            files,
            dirs,
            chain_id,
            strict,
        } => cmd_export(&facts, files, dirs, chain_id, strict).await,
        Commands::Ipfs {
            api_url,
            gateway,
            auth,
            action,
        } => {
            let mut config = IpfsConfig::new(api_url, gateway);
            if let Some(header) = auth {
                config = config.with_auth(header);
            }
            cmd_ipfs(config, action).await
        }
        Commands::Rpc {
            method,
            params,
            url,
        } => cmd_rpc(&url, &method, &params).await,
        Commands::Networks { profiles } => cmd_networks(profiles.as_deref()).await,
    }
}

async fn load_registry(profiles: Option<&Path>) -> Result<NetworkRegistry> {
    let mut registry = NetworkRegistry::with_builtins();
    if let Some(dir) = profiles {
        registry
            .load_dir(dir)
            .await
            .with_context(|| format!("Failed to load profiles from {}", dir.display()))?;
    }
    Ok(registry)
}

/// Deploy the contract set
async fn cmd_deploy(
    network: &str,
    config_path: &Path,
    profiles: Option<&Path>,
    chain_id: Option<u64>,
) -> Result<()> {
    println!("{} {}", "🚀 Deploying to:".cyan().bold(), network);

    let config = DeployConfig::load(config_path)
        .await
        .context("Failed to load deploy config")?;
    debug!(config = %config_path.display(), "Deploy config loaded");

    let profile = load_registry(profiles)
        .await?
        .resolve(network)
        .context("Failed to resolve network profile")?;
    let accounts = config.accounts().context("Invalid deploy accounts")?;

    let deployer = match chain_id {
        Some(id) => RecordDeployer::with_chain_id(&config.deployments_dir, network, id, accounts),
        None => RecordDeployer::open(&config.deployments_dir, network, accounts)
            .await
            .context("Failed to open deployment records")?,
    };

    let ipfs = match (&config.ipfs_config, config.publish_to_ipfs) {
        (Some(ipfs_config), true) => Some(
            IpfsClient::with_config(ipfs_config.clone()).context("Invalid IPFS config")?,
        ),
        _ => None,
    };

    let mut orchestrator = Orchestrator::new(deployer, config);
    if let Some(client) = ipfs {
        orchestrator = orchestrator.with_ipfs(client);
    }

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    spinner.set_message(format!("Running deployment on {}...", network));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let result = orchestrator.run(&profile).await;
    spinner.finish_and_clear();

    let summary = result.context("Deployment failed")?;
    print_summary(&summary)?;

    if !summary.is_success() {
        bail!("{} export step(s) failed", summary.export_failures().max(1));
    }
    Ok(())
}

fn print_summary(summary: &RunSummary) -> Result<()> {
    println!("\n{}", "✅ Deployment complete:".green().bold());
    println!("   {} {}", "Network:".dimmed(), summary.network);
    println!("   {} {}", "Chain id:".dimmed(), summary.chain_id);
    println!("   {} {}", "Owner:".dimmed(), summary.accounts.owner);
    println!("   {} {}", "Stablecoin:".dimmed(), summary.stablecoin);

    println!("\n{}", "📋 Contracts (JSON):".yellow().bold());
    println!("{}", serde_json::to_string_pretty(&summary.facts)?);

    match &summary.multicall_tx {
        Some(hash) => println!("\n   {} {}", "addTLD multicall:".green(), hash),
        None => println!("\n   {}", "addTLD multicall queued for submission".yellow()),
    }

    print_report("TLDs", &summary.tld_export);
    print_report("Contract info", &summary.contract_export);
    print_report("ABIs", &summary.abi_export);

    if let Some(published) = &summary.published {
        print_status(published)?;
    }
    Ok(())
}

fn print_report(label: &str, report: &ExportReport) {
    if report.is_empty() {
        println!("   {} {}", format!("{}:", label).dimmed(), "no targets configured".dimmed());
        return;
    }

    for outcome in &report.outcomes {
        match &outcome.result {
            Ok(()) => println!("   {} {}", "✓".green(), outcome.path.display()),
            Err(e) => println!("   {} {}: {}", "✗".red(), outcome.path.display(), e),
        }
    }
}

/// Merge a facts file into targets
async fn cmd_export(
    facts_path: &Path,
    files: Vec<PathBuf>,
    dirs: Vec<PathBuf>,
    chain_id: u64,
    strict: bool,
) -> Result<()> {
    println!("{} {}", "📦 Exporting facts from:".cyan().bold(), facts_path.display());

    let contents = tokio::fs::read_to_string(facts_path)
        .await
        .context("Failed to read facts file")?;
    let value: serde_json::Value =
        serde_json::from_str(&contents).context("Facts file is not valid JSON")?;
    let facts = FactSet::try_from(value).context("Facts file must hold a JSON object")?;

    let targets: Vec<ExportTarget> = files
        .into_iter()
        .map(ExportTarget::File)
        .chain(dirs.into_iter().map(ExportTarget::Directory))
        .collect();

    if targets.is_empty() {
        println!("\n{}", "⚠️  No targets given (use --file or --dir).".yellow());
        return Ok(());
    }

    let policy = if strict {
        CorruptDocumentPolicy::Fail
    } else {
        CorruptDocumentPolicy::TreatAsEmpty
    };
    let exporter = ArtifactExporter::with_config(policy);
    let report = exporter
        .export_facts(&facts, &targets, &PathParams::new(chain_id))
        .await;

    print_report("Targets", &report);
    print_status(&report.into_status())
}

/// IPFS operations
async fn cmd_ipfs(config: IpfsConfig, action: IpfsCommand) -> Result<()> {
    let client = IpfsClient::with_config(config).context("Invalid IPFS config")?;

    match action {
        IpfsCommand::Add { path, name } => {
            println!("{} {}", "📤 Adding:".cyan().bold(), path.display());
            print_status(&client.add_file_by_path(&path, name.as_deref()).await)
        }
        IpfsCommand::AddText { text, name } => {
            println!("{}", "📤 Adding text content...".cyan().bold());
            print_status(&client.add_text_content(&text, name.as_deref()).await)
        }
        IpfsCommand::Fetch { cid } => {
            println!("{} {}", "📥 Fetching:".cyan().bold(), client.file_url(&cid));
            print_status(&client.fetch(&cid).await)
        }
        IpfsCommand::Unpin { cid } => {
            println!("{} {}", "📌 Unpinning:".cyan().bold(), cid);
            print_status(&client.unpin(&cid).await)
        }
    }
}

/// Send a JSON-RPC request
async fn cmd_rpc(url: &str, method: &str, params: &str) -> Result<()> {
    println!("{} {} {}", "🔗 RPC:".cyan().bold(), method, url.dimmed());

    let params: serde_json::Value =
        serde_json::from_str(params).context("Params must be valid JSON")?;
    let client = HttpClient::new().context("Failed to create HTTP client")?;

    print_status(&client.json_rpc(url, method, params).await)
}

/// List network profiles
async fn cmd_networks(profiles: Option<&Path>) -> Result<()> {
    let registry = load_registry(profiles).await?;

    println!("{}", "🌐 Networks:".cyan().bold());
    for name in registry.names() {
        match registry.resolve(name) {
            Ok(profile) => {
                let chain = profile
                    .chain_id
                    .map(|id| id.to_string())
                    .unwrap_or_else(|| "local".into());
                let tlds: Vec<&str> = profile.tlds.iter().map(|t| t.tld_name.as_str()).collect();
                println!(
                    "   {} {} {}",
                    name.green(),
                    format!("(chain {})", chain).dimmed(),
                    tlds.join(", ")
                );
                for token in profile.payment.enabled_tokens() {
                    println!(
                        "      {} {} {}",
                        token.symbol.as_deref().unwrap_or("token").yellow(),
                        token.token_address,
                        format!("feed {}", token.price_feed_contract).dimmed()
                    );
                }
            }
            Err(e) => println!("   {} {}", name.red(), e),
        }
    }
    Ok(())
}

/// Prints a status and turns an error status into a failing exit code.
fn print_status<T: Serialize>(status: &Status<T>) -> Result<()> {
    let message = if status.message().is_empty() {
        status.kind().to_string()
    } else {
        status.message().to_string()
    };

    let headline = match status.kind() {
        StatusKind::Success => format!("✅ {}", message).green().bold(),
        StatusKind::Error => format!("❌ {}", message).red().bold(),
        StatusKind::Info => format!("ℹ️  {}", message).cyan().bold(),
        StatusKind::Neutral => message.normal(),
    };
    println!("\n{}", headline);

    if let Some(data) = status.data() {
        println!("{}", serde_json::to_string_pretty(data)?);
    }

    if status.is_error() {
        bail!("{}", status.message());
    }
    Ok(())
}
