#![recursion_limit = "256"]

use anyhow::{Context, Result};
use aws_config::{BehaviorVersion, Region, SdkConfig};
use clap::{Parser, Subcommand};
use colored::Colorize;
use lambda_runtime::{service_fn, LambdaEvent};
use serde_json::Value;
use std::path::PathBuf;

use commit_relay::logging::setup_logger;
use commit_relay::{CodeCommitSource, CommitNotifier, Config, SnsNotifier};

type Notifier = CommitNotifier<CodeCommitSource, SnsNotifier>;

#[derive(Parser)]
#[command(name = "commit-relay")]
#[command(about = "Publish the latest CodeCommit branch commit to an SNS topic")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// TOML config file (default: read the environment)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve Lambda invocations (default)
    Serve,

    /// Run the relay once and publish the report
    Run {
        #[command(flatten)]
        target: Target,
    },

    /// Print the report without publishing it
    Preview {
        #[command(flatten)]
        target: Target,
    },
}

#[derive(clap::Args)]
struct Target {
    /// Repository to report on (overrides configuration)
    #[arg(short, long)]
    repository: Option<String>,

    /// Branch to report on (overrides configuration)
    #[arg(short, long)]
    branch: Option<String>,
}

impl Target {
    fn apply(self, config: &mut Config) {
        if let Some(repository) = self.repository {
            config.repository_name = repository;
        }
        if let Some(branch) = self.branch {
            config.main_branch = Some(branch);
        }
    }
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Serve);

    setup_logger(!matches!(command, Commands::Serve));

    let mut config = match cli.config {
        Some(ref path) => Config::load(path)
            .with_context(|| format!("Could not load {}", path.display()))?,
        None => Config::from_env(),
    };

    match command {
        Commands::Serve => cmd_serve(config).await,
        Commands::Run { target } => {
            target.apply(&mut config);
            cmd_run(config).await
        }
        Commands::Preview { target } => {
            target.apply(&mut config);
            cmd_preview(config).await
        }
    }
}

async fn load_sdk_config(config: &Config) -> SdkConfig {
    let mut loader = aws_config::defaults(BehaviorVersion::latest());
    if let Some(ref region) = config.region {
        loader = loader.region(Region::new(region.clone()));
    }
    loader.load().await
}

/// Clients are built once here and shared by every invocation
async fn build_notifier(config: Config) -> Notifier {
    let sdk_config = load_sdk_config(&config).await;
    let source = CodeCommitSource::from_conf(&sdk_config);
    let sink = SnsNotifier::from_conf(&sdk_config, config.sns_topic_arn.clone());
    CommitNotifier::new(config, source, sink)
}

async fn cmd_serve(config: Config) -> Result<()> {
    let notifier = build_notifier(config).await;
    let notifier = &notifier;

    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| async move {
        notifier
            .handle(&event.payload)
            .await
            .map_err(lambda_runtime::Error::from)
    }))
    .await
    .map_err(|e| anyhow::anyhow!(e))
    .context("Lambda runtime stopped")
}

async fn cmd_run(config: Config) -> Result<()> {
    let notifier = build_notifier(config).await;
    let receipt = notifier.handle(&Value::Null).await?;

    println!(
        "{} Published update for {} ({})",
        "✓".green(),
        notifier.config().repository_name.cyan(),
        receipt.message_id.as_deref().unwrap_or("no message id").dimmed()
    );

    Ok(())
}

async fn cmd_preview(config: Config) -> Result<()> {
    let notifier = build_notifier(config).await;
    let preview = notifier.preview().await?;

    println!("{}", "━".repeat(50).dimmed());
    println!(
        "  {} {} @ {}",
        "Preview".bold().cyan(),
        preview.repository.bold(),
        preview.commit.short_id().yellow()
    );
    println!(
        "  {} {}",
        "files changed:".dimmed(),
        preview.differences.len()
    );
    println!("{}", "━".repeat(50).dimmed());
    print!("{}", preview.text);

    Ok(())
}
