use std::io::Read;
use std::path::PathBuf;

use anyhow::Result;
use serde::Deserialize;

#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    /// XCAP root, eg. `https://xcap.example.com/xcap-root`
    pub server_uri: String,
    /// SIP address owning the documents, eg. `sip:alice@example.com`
    pub user_address: String,
    pub username: String,
    pub password: Option<String>,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

pub fn read_config(config_file: PathBuf) -> Result<Config> {
    let mut file = std::fs::OpenOptions::new()
        .read(true)
        .open(config_file.as_path())?;

    let mut config = String::new();
    file.read_to_string(&mut config)?;

    Ok(toml::from_str(&config)?)
}

fn default_timeout_ms() -> u64 {
    10_000
}
