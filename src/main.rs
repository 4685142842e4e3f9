// src/main.rs

use anyhow::Result;
use clap::Parser;
use repofetch::cli::{Cli, Commands};
use repofetch::config::ResolverConfigBuilder;
use repofetch::errors::Error;
use repofetch::http::redact_url;
#[cfg(feature = "progress")]
use repofetch::progress::IndicatifProgress;
use repofetch::progress::ProgressReporter;
use repofetch::signal::setup_signal_handler;
use repofetch::{CallContext, CloneOptions, FetchOptions, RemoteProvider, Resolver};
use std::io::Write;
use std::sync::Arc;

fn main() -> Result<()> {
    // Initialize logging. Default to 'info' if RUST_LOG is not set.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(
                if cfg!(debug_assertions) {
                    "repofetch=debug".parse()?
                } else {
                    "repofetch=info".parse()?
                },
            ),
        )
        .init();

    log::debug!("Starting repofetch v{}...", env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();
    log::debug!("Target repository: {}", redact_url(cli.command.url()));

    // Show a progress bar for downloads only when stderr is a TTY.
    let progress_reporter: Option<Arc<dyn ProgressReporter>> = {
        #[cfg(feature = "progress")]
        {
            if atty::is(atty::Stream::Stderr) {
                Some(Arc::new(IndicatifProgress::new()))
            } else {
                None
            }
        }
        #[cfg(not(feature = "progress"))]
        {
            None
        }
    };

    // --- Configuration & Execution ---
    let config = ResolverConfigBuilder::from_cli(&cli).build()?;
    log::debug!("Configuration built successfully: {:?}", config);
    let resolver = Resolver::with_defaults(&config, progress_reporter)?;

    let token = setup_signal_handler()?;
    let ctx = CallContext::with_token(token);

    let rt = tokio::runtime::Runtime::new()?;
    let result = rt.block_on(run_command(&resolver, &ctx, &cli));

    // --- Error Handling ---
    if let Err(e) = result {
        match e {
            Error::Cancelled => {
                eprintln!("\nOperation cancelled.");
                std::process::exit(130);
            }
            _ => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

async fn run_command(resolver: &Resolver, ctx: &CallContext, cli: &Cli) -> repofetch::Result<()> {
    let username = cli.username.clone().unwrap_or_default();
    let password = cli.password.clone().unwrap_or_default();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match &cli.command {
        Commands::LsRemote { url } => {
            let opts = CloneOptions::new(url.as_str()).with_credentials(username, password);
            for reference in resolver.list_remote(ctx, &opts).await? {
                print_line(&mut out, &reference)?;
            }
        }
        Commands::Tree {
            url,
            reference,
            extensions,
        } => {
            let opts = FetchOptions::new(url.as_str(), reference.as_str())
                .with_credentials(username, password)
                .extensions(extensions.iter().cloned());
            for path in resolver.list_tree(ctx, &opts).await? {
                print_line(&mut out, &path)?;
            }
        }
        Commands::Commit { url, reference } => {
            let opts = FetchOptions::new(url.as_str(), reference.as_str())
                .with_credentials(username, password);
            let commit = resolver.latest_commit_id(ctx, &opts).await?;
            print_line(&mut out, &commit)?;
        }
        Commands::Download {
            url,
            destination,
            reference,
        } => {
            let opts = CloneOptions::new(url.as_str())
                .reference_name(reference.clone().unwrap_or_default())
                .with_credentials(username, password);
            resolver.download(ctx, destination, &opts).await?;
        }
    }
    Ok(())
}

fn print_line(out: &mut impl Write, line: &str) -> repofetch::Result<()> {
    writeln!(out, "{}", line).map_err(|e| repofetch::errors::io_error(e, "write output"))
}
