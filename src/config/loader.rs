use std::path::Path;

use anyhow::{bail, Context, Result};
use regex::Regex;
use tracing::{debug, error};
use url::Url;

use crate::config::settings::{AgentConfig, LoggingConfig};

/// Load and validate config from YAML file
pub async fn file_to_config(path: &Path) -> Result<AgentConfig> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("cannot read config '{}'", path.display()))?;
    parse_config(&content)
}

pub fn parse_config(content: &str) -> Result<AgentConfig> {
    let expanded = expand_env_vars(content)?;
    let mut config: AgentConfig = serde_yaml::from_str(&expanded).inspect_err(|e| {
        error!("parse config error: {}", e);
    })?;

    // Apply defaults
    if config.settings.logging.is_none() {
        config.settings.logging = Some(LoggingConfig::default());
    }
    debug!("validation config ...");
    validate_config(&config)?;

    Ok(config)
}

pub fn validate_config(config: &AgentConfig) -> Result<()> {
    let client = &config.client;
    Url::parse(&client.token_url).with_context(|| format!("client.token_url '{}' is not a valid url", client.token_url))?;
    if let Some(authorize_url) = &client.authorize_url {
        Url::parse(authorize_url)
            .with_context(|| format!("client.authorize_url '{}' is not a valid url", authorize_url))?;
    }
    if client.default_token_expiration == 0 {
        bail!("client.default_token_expiration must be greater than zero");
    }
    Ok(())
}

/// Replace `${VAR}` and `${VAR:default}` with the environment value.
fn expand_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{(\w+)(?::([^\}]+))?\}")?;
    let expanded = re.replace_all(input, |caps: &regex::Captures| {
        let var = &caps[1];
        let default = caps.get(2).map(|m| m.as_str()).unwrap_or("");
        std::env::var(var).unwrap_or_else(|_| default.to_string())
    });
    Ok(expanded.into_owned())
}
