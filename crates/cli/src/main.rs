//! `gowa-node` CLI entry-point: a small host harness for the GOWA node.
//!
//! Available sub-commands:
//! - `describe`         — print the node and credential descriptions as JSON.
//! - `run`              — execute a JSON array of input items.
//! - `test-credentials` — send the credential test request.
//!
//! Logs go to stderr (filtered by `RUST_LOG`); stdout carries JSON only.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use engine::{ExecutorConfig, ItemExecutor};
use gateway::{Credentials, GatewayClient, HttpGateway, HttpGatewayConfig};
use nodes::{GowaNode, Item};
use serde_json::json;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "gowa-node",
    about = "Run GOWA WhatsApp gateway operations from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the node and credential descriptions.
    Describe,
    /// Execute input items against the gateway.
    Run {
        /// Path to a JSON array of `{parameters, binary}` items.
        #[arg(long)]
        items: PathBuf,
        /// Record failing items as `{error}` instead of aborting.
        #[arg(long)]
        continue_on_fail: bool,
        #[command(flatten)]
        connection: ConnectionArgs,
    },
    /// Check that the gateway accepts the credentials.
    TestCredentials {
        #[command(flatten)]
        connection: ConnectionArgs,
    },
}

/// Credential and transport options shared by the networked commands.
///
/// A `--credentials` file is read first; any flag or environment value
/// given on top of it wins.
#[derive(Args, Debug)]
struct ConnectionArgs {
    /// JSON file with `{hostUrl, username, password, deviceId}`.
    #[arg(long)]
    credentials: Option<PathBuf>,
    #[arg(long, env = "GOWA_HOST_URL")]
    host_url: Option<String>,
    #[arg(long, env = "GOWA_USERNAME")]
    username: Option<String>,
    #[arg(long, env = "GOWA_PASSWORD", hide_env_values = true)]
    password: Option<String>,
    #[arg(long, env = "GOWA_DEVICE_ID")]
    device_id: Option<String>,
    /// Per-request timeout in seconds.
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,
}

impl ConnectionArgs {
    fn credentials(&self) -> Result<Credentials> {
        let mut credentials = match &self.credentials {
            Some(path) => read_json::<Credentials>(path)?,
            None => Credentials::new(gateway::DEFAULT_HOST_URL, "", ""),
        };
        if let Some(host_url) = &self.host_url {
            credentials.host_url = host_url.clone();
        }
        if let Some(username) = &self.username {
            credentials.username = username.clone();
        }
        if let Some(password) = &self.password {
            credentials = credentials.with_password(password.clone());
        }
        if let Some(device_id) = &self.device_id {
            credentials = credentials.with_device_id(device_id.clone());
        }
        Ok(credentials)
    }

    fn gateway(&self) -> Result<HttpGateway> {
        let config = HttpGatewayConfig {
            timeout: Duration::from_secs(self.timeout_secs),
            ..HttpGatewayConfig::default()
        };
        HttpGateway::new(config).context("failed to build HTTP client")
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read file {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("invalid JSON in {}", path.display()))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Describe => {
            let description = json!({
                "node": GowaNode::description(),
                "credentials": gateway::credential_description(),
            });
            println!("{}", serde_json::to_string_pretty(&description)?);
        }
        Command::Run {
            items,
            continue_on_fail,
            connection,
        } => {
            let batch: Vec<Item> = read_json(&items)?;
            let credentials = connection.credentials()?;
            let node = Arc::new(GowaNode::new(Arc::new(connection.gateway()?)));
            let executor = ItemExecutor::new(node, ExecutorConfig { continue_on_fail });

            info!(items = batch.len(), host = credentials.base_url(), "running items");
            let result = executor
                .run(&batch, credentials)
                .await
                .context("execution aborted")?;
            println!("{}", serde_json::to_string_pretty(&result.items)?);
        }
        Command::TestCredentials { connection } => {
            let credentials = connection.credentials()?;
            let request = credentials.test_request();
            info!(url = %request.url, "testing credentials");

            let response = connection
                .gateway()?
                .send(&request, &credentials)
                .await
                .context("credential test failed")?;
            println!(
                "{}",
                json!({ "status": "OK", "statusCode": response.status, "url": request.url })
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn flags_build_credentials() {
        let cli = Cli::try_parse_from([
            "gowa-node",
            "test-credentials",
            "--host-url",
            "http://gw:3000/",
            "--username",
            "admin",
            "--password",
            "secret",
            "--device-id",
            "dev1",
        ])
        .unwrap();

        let Command::TestCredentials { connection } = cli.command else {
            panic!("expected test-credentials");
        };
        let credentials = connection.credentials().unwrap();
        assert_eq!(credentials.base_url(), "http://gw:3000");
        assert_eq!(credentials.username, "admin");
        assert_eq!(credentials.device_id(), Some("dev1"));
        assert_eq!(credentials.authorization(), Credentials::new("", "admin", "secret").authorization());
    }

    #[test]
    fn run_requires_an_items_file() {
        assert!(Cli::try_parse_from(["gowa-node", "run"]).is_err());

        let cli = Cli::try_parse_from(["gowa-node", "run", "--items", "in.json", "--continue-on-fail"])
            .unwrap();
        assert!(matches!(
            cli.command,
            Command::Run { continue_on_fail: true, .. }
        ));
    }
}
