use std::path::Path;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use oauth_token_agent::client::AuthenticationEngine;
use oauth_token_agent::config::loader::file_to_config;
use oauth_token_agent::grants::{AuthenticationCodeInfo, GrantRequest};
use oauth_token_agent::observability::metrics::Metrics;
use oauth_token_agent::utils::logging::{self, LogLevel};
use reqwest::Client;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, env = "CONFIG", default_value = "oauth-token-agent.yaml")]
    config: String,
    #[arg(long, env = "LOG_LEVEL", value_enum)]
    log_level: Option<LogLevel>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Acquire a token for the configured grant and print it as JSON
    Token {
        /// Overrides `client.grant_type` from the config
        #[arg(long)]
        grant_type: Option<String>,
        /// Authorization code, for `authorization_code`
        #[arg(long)]
        code: Option<String>,
        #[arg(long)]
        redirect_uri: Option<String>,
        /// Print prometheus metrics after the token
        #[arg(long)]
        metrics: bool,
    },
    /// Print the authorization-code redirect URL
    AuthorizeUrl {
        #[arg(long)]
        redirect_uri: String,
        #[arg(long)]
        state: Option<String>,
        #[arg(long = "scope")]
        scopes: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // -------------------------------
    // 1. Load YAML config
    // -------------------------------

    let args = Args::parse();
    let config = file_to_config(Path::new(&args.config)).await?;
    logging::run(&config, args.log_level);

    // -------------------------------
    // 2. Build the engine
    // -------------------------------

    let metrics = Metrics::new().context("cannot register metrics")?;
    let engine = AuthenticationEngine::new(Client::new(), config.client.clone()).with_metrics(metrics.clone());

    // -------------------------------
    // 3. Ctrl-C cancels an in-flight exchange
    // -------------------------------

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            debug!("interrupt received, cancelling");
            on_signal.cancel();
        }
    });

    match args.command {
        Command::Token { grant_type, code, redirect_uri, metrics: print_metrics } => {
            let mut options = config.client.clone();
            if let Some(grant_type) = grant_type {
                options.grant_type = Some(grant_type);
            }
            let request = GrantRequest::from_options(&options, code.as_deref(), redirect_uri.as_deref())?;
            let token = engine.acquire(&request, &cancel).await?;
            info!("token acquired");
            println!("{}", serde_json::to_string_pretty(&token)?);
            if print_metrics {
                println!("{}", metrics.render()?);
            }
        }
        Command::AuthorizeUrl { redirect_uri, state, scopes } => {
            let mut info = AuthenticationCodeInfo::new(
                config.client.client_id.clone().unwrap_or_default(),
                &redirect_uri,
            )?
            .with_scopes(scopes);
            if let Some(state) = state {
                info = info.with_state(state);
            }
            println!("{}", engine.authorization_url(&info)?);
        }
    }

    Ok(())
}
