mod cli;
mod commands;
mod config;
mod observability;
mod output;

use accessdesk_client::HttpPolicyClient;
use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;

use cli::{Cli, Commands};
use output::print_error;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    observability::init_tracing_with_level(&cli.log_level);
    if let Err(e) = run(cli).await {
        print_error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let profile = &cli.profile;
    let cfg = config::load_profile(profile)?;

    // Config must work even when the stored server URL is broken.
    if let Commands::Config(args) = &cli.command {
        return run_config(args, profile, cfg);
    }

    let format = config::resolve_format(cli.format, &cfg)?;
    let server = config::resolve_server(&cli.server, &cfg);
    let client = HttpPolicyClient::new(&server)
        .with_context(|| format!("Invalid server URL: {server}"))?;
    tracing::debug!(%server, profile = %profile, "using policy backend");

    match &cli.command {
        Commands::List => {
            commands::policy::list(&client, cli.acting_as.as_deref(), cfg.admin_email(), format)
                .await?;
        }
        Commands::Show(args) => {
            commands::policy::show(&client, &args.id, format).await?;
        }
        Commands::Create(args) => {
            commands::policy::create(&client, &args.fields, format).await?;
        }
        Commands::Edit(args) => {
            commands::policy::edit(&client, &args.id, &args.fields, format).await?;
        }
        Commands::Delete(args) => {
            commands::policy::delete(&client, &args.id, args.yes).await?;
        }
        Commands::Users => {
            commands::directory::users(&client, format).await?;
        }
        Commands::Groups => {
            commands::directory::groups(&client, format).await?;
        }
        Commands::Apps => {
            commands::directory::apps(&client, format).await?;
        }
        Commands::Catalog(args) => {
            commands::catalog::show(args.kind.map(Into::into), format)?;
        }
        Commands::TestIntegration(args) => {
            commands::integration::test(&client, args, format).await?;
        }
        Commands::Config(_) => {}
    }

    Ok(())
}

fn run_config(args: &cli::ConfigArgs, profile: &str, mut cfg: config::ProfileConfig) -> Result<()> {
    match &args.command {
        cli::ConfigCommands::Show => {
            println!("{}: {}", "Profile".cyan(), profile);
            println!(
                "{}: {}",
                "Server".cyan(),
                cfg.server.as_deref().unwrap_or("(not set)")
            );
            println!(
                "{}: {}",
                "Format".cyan(),
                cfg.format.as_deref().unwrap_or("json")
            );
            println!("{}: {}", "Admin email".cyan(), cfg.admin_email());
        }
        cli::ConfigCommands::Set(set_args) => {
            cfg.set(&set_args.key, &set_args.value)?;
            config::save_profile(profile, &cfg)?;
            output::print_success(&format!("Set {} = {}", set_args.key, set_args.value));
        }
    }
    Ok(())
}
