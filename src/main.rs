use anyhow::{bail, Context, Result};
use std::sync::Arc;
use tracing::{error, Level};
use tracing_subscriber::FmtSubscriber;
use wp_provision::cli::commands::{CheckCommand, ConfigOverrides, RunCommand, ValidateCommand};
use wp_provision::cli::output::*;
use wp_provision::cli::{Cli, Command};
use wp_provision::database::MySqlConnector;
use wp_provision::{
    resolve_wp_cli, Console, InstallerChannel, ProvisionConfig, SetupContext, SetupPipeline,
    TerminalConsole, Workspace, WpCli,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::from_args();

    // Initialize logging; stdout carries prompts and wp-cli output
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set logging subscriber")?;

    // Execute command
    let result = match &cli.command {
        Command::Run(cmd) => run_pipeline(&cli, cmd).await,
        Command::Check(cmd) => check_installed(&cli, cmd).await,
        Command::Validate(cmd) => validate_config(&cli, cmd),
    };

    if let Err(e) = result {
        error!("{:#}", e);
        println!("\n{} {}", CROSS, style(format!("{:#}", e)).red());
        std::process::exit(1);
    }

    Ok(())
}

fn load_config(cli: &Cli, overrides: &ConfigOverrides) -> Result<ProvisionConfig> {
    let mut config = ProvisionConfig::load(cli.config.as_deref())
        .context("Failed to load provisioning config")?;
    overrides
        .apply(&mut config)
        .context("Invalid command-line override")?;
    config.validate().context("Invalid command-line override")?;
    Ok(config)
}

async fn open_channel(
    cli: &Cli,
    config: &ProvisionConfig,
    console: Arc<dyn Console>,
) -> Result<Arc<WpCli>> {
    if !cli.path.is_dir() {
        bail!("{} is not a directory", cli.path.display());
    }

    let prefix = resolve_wp_cli(config, &cli.path)
        .await
        .context("Failed to locate wp-cli")?;
    Ok(Arc::new(WpCli::new(prefix, cli.path.clone(), console)))
}

async fn run_pipeline(cli: &Cli, cmd: &RunCommand) -> Result<()> {
    let config = load_config(cli, &cmd.overrides)?;
    let console: Arc<dyn Console> = Arc::new(TerminalConsole::new());
    let channel = open_channel(cli, &config, console.clone()).await?;

    let mut connector = MySqlConnector::new();
    if let Some(socket) = &config.mysql_socket {
        connector = connector.with_socket(socket);
    }

    let workspace = Workspace::from_config(&cli.path, &config);
    let pipeline = SetupPipeline::new(channel, Arc::new(connector), console, workspace)
        .with_config(&config);

    // Set up event handler for console output
    pipeline.add_event_handler(|event| {
        println!("{}", format_pipeline_event(&event));
    });

    println!(
        "{} Provisioning WordPress in {}",
        INFO,
        style(cli.path.display()).bold()
    );

    let mut ctx = SetupContext::new();
    let result = pipeline.run(&mut ctx).await;

    if cmd.summary {
        println!("\n{}", style("Summary").bold());
        for record in ctx.records() {
            println!("{}", format_step_record(record));
        }
    }

    result?;
    Ok(())
}

async fn check_installed(cli: &Cli, cmd: &CheckCommand) -> Result<()> {
    let config = load_config(cli, &cmd.overrides)?;
    let console: Arc<dyn Console> = Arc::new(TerminalConsole::new());
    let channel = open_channel(cli, &config, console).await?;

    if channel.is_installed().await? {
        println!(
            "{} WordPress is installed in {}",
            CHECK,
            style(cli.path.display()).bold()
        );
        Ok(())
    } else {
        println!(
            "{} WordPress is not installed in {}",
            WARN,
            style(cli.path.display()).bold()
        );
        std::process::exit(1);
    }
}

fn validate_config(cli: &Cli, cmd: &ValidateCommand) -> Result<()> {
    println!("{} Validating configuration...", INFO);

    let source = cli
        .config
        .clone()
        .or_else(|| ProvisionConfig::default_path().filter(|path| path.is_file()));

    match ProvisionConfig::load(cli.config.as_deref()) {
        Ok(config) => {
            println!("{} Configuration is valid!", CHECK);
            match &source {
                Some(path) => println!("  File: {}", style(path.display()).bold()),
                None => println!("  File: {}", style("(built-in defaults)").dim()),
            }
            println!("  Locale: {}", style(&config.locale).cyan());
            match &config.wp_cli {
                Some(prefix) => println!("  wp-cli: {}", style(prefix.join(" ")).cyan()),
                None => println!("  wp-cli: {}", style("auto").dim()),
            }
            println!(
                "  Files: {} / {}",
                style(&config.loader_file).cyan(),
                style(&config.config_file).cyan()
            );

            if cmd.json {
                let json = serde_json::to_string_pretty(&config)?;
                println!("\n{}", json);
            }
            Ok(())
        }
        Err(e) => {
            println!("{} Validation failed:", CROSS);
            println!("  {}", style(format!("{:#}", e)).red());
            std::process::exit(1);
        }
    }
}
