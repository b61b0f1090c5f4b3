mod commands;
mod config;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use xcap_client::{HttpXCapClient, XCapClient};

use config::*;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    #[clap(subcommand)]
    command: Command,

    #[clap(short, long, env = "XCAPCTL_CONFIG", default_value = "xcapctl.toml")]
    /// Path to the xcapctl configuration file
    config_file: PathBuf,

    /// Password of the XCAP account, wins over the configuration file
    #[clap(long, env = "XCAP_PASSWORD", hide_env_values = true)]
    password: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show what the XCAP server supports
    Caps,
    /// Print a resource
    Get {
        /// Document selector, relative to the XCAP root
        document: String,
        /// Node selector inside the document
        #[clap(short, long)]
        node: Option<String>,
    },
    /// Create or replace a resource with the content of a file
    Put {
        document: String,
        #[clap(short, long)]
        node: Option<String>,
        #[clap(short = 't', long)]
        content_type: String,
        #[clap(short, long)]
        file: PathBuf,
        /// Only replace the resource if its entity tag still matches
        #[clap(long)]
        if_match: Option<String>,
    },
    /// Delete a resource
    Delete {
        document: String,
        #[clap(short, long)]
        node: Option<String>,
    },

    #[clap(subcommand)]
    /// The contact lists of the user
    ResourceLists(ResourceListsCommand),

    #[clap(subcommand)]
    /// Who may watch the presence of the user
    PresRules(PresRulesCommand),

    #[clap(subcommand)]
    /// The status icon of the user
    PresContent(PresContentCommand),
}

#[derive(Subcommand, Debug)]
enum ResourceListsCommand {
    Show,
    /// Add a contact to a list, the list is created if needed
    Add {
        uri: String,
        #[clap(short, long, default_value = "buddies")]
        list: String,
        #[clap(short, long)]
        display_name: Option<String>,
    },
    /// Remove a contact from every list
    Remove { uri: String },
}

#[derive(Subcommand, Debug)]
enum PresRulesCommand {
    Show,
    /// Accept the subscriptions of this SIP address
    Allow { uri: String },
    /// Reject the subscriptions of this SIP address
    Block { uri: String },
    /// Accept the subscriptions of this SIP address but send no presence
    PoliteBlock { uri: String },
    /// Remove this SIP address from every rule
    Forget { uri: String },
}

#[derive(Subcommand, Debug)]
enum PresContentCommand {
    Show {
        #[clap(default_value = "avatar")]
        name: String,
    },
    /// Download an image from an absolute URI
    FetchImage {
        uri: String,
        #[clap(short, long)]
        output: PathBuf,
    },
}

fn tracer() {
    tracing_subscriber::fmt::init();
}

#[tokio::main]
async fn main() -> Result<()> {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "main=info,xcapctl=info,xcap_client=info")
    }

    tracer();

    let args = Args::parse();
    let config = read_config(args.config_file.clone())
        .with_context(|| format!("unable to read {}", args.config_file.display()))?;
    let password = args
        .password
        .clone()
        .or_else(|| config.password.clone())
        .context("no password, set XCAP_PASSWORD or add one to the configuration file")?;

    let mut client = XCapClient::new();
    client.set_timeout(Duration::from_millis(config.timeout_ms));
    client
        .connect(
            &config.server_uri,
            &config.user_address,
            &config.username,
            &password,
        )
        .await
        .context("unable to connect to the XCAP server")?;

    let res = commands::run(&mut client, &args.command).await;
    client.disconnect();
    res
}
