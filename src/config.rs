use std::path::PathBuf;

use color_eyre::{Result, eyre::Context};
use serde::Deserialize;
use thiserror::Error;
use url::Url;

const DEFAULT_URL: &str = "https://www.hermes.com/us/en/category/women/bags-and-small-leather-goods/bags-and-clutches/#|";
const DEFAULT_SNAPSHOT_FILE: &str = "snapshot.txt";
const DEFAULT_SMTP_SERVER: &str = "smtp.gmail.com";
const DEFAULT_SMTP_PORT: u16 = 587;

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".into()
}

/// Raw environment, before defaults and validation.
#[derive(Deserialize)]
struct Env {
    hermes_url: Option<String>,
    snapshot_file: Option<String>,
    user_agent: Option<String>,
    smtp_user: Option<String>,
    smtp_pass: Option<String>,
    email_to: Option<String>,
    smtp_server: Option<String>,
    smtp_port: Option<String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("HERMES_URL is not a valid url")]
    Url(#[from] url::ParseError),
    #[error("SMTP_PORT is not a valid port")]
    Port(#[from] std::num::ParseIntError),
}

/// Everything needed to log in to the relay and address the message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailCredentials {
    pub sender: String,
    pub secret: String,
    pub recipient: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "Env")]
pub struct Config {
    pub url: Url,
    pub snapshot_file: PathBuf,
    pub user_agent: String,
    pub smtp_server: String,
    pub smtp_port: u16,
    /// `None` unless sender, secret and recipient are all set.
    pub credentials: Option<MailCredentials>,
}

// blank variables count as unset
fn present(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl TryFrom<Env> for Config {
    type Error = ConfigError;

    fn try_from(env: Env) -> Result<Self, Self::Error> {
        let url = Url::parse(present(env.hermes_url).as_deref().unwrap_or(DEFAULT_URL))?;
        let smtp_port = match present(env.smtp_port) {
            Some(port) => port.parse::<u16>()?,
            None => DEFAULT_SMTP_PORT,
        };

        let sender = present(env.smtp_user);
        let recipient = present(env.email_to).or_else(|| sender.clone());
        let credentials = match (sender, present(env.smtp_pass), recipient) {
            (Some(sender), Some(secret), Some(recipient)) => Some(MailCredentials {
                sender,
                secret,
                recipient,
            }),
            _ => None,
        };

        Ok(Self {
            url,
            snapshot_file: present(env.snapshot_file)
                .unwrap_or_else(|| DEFAULT_SNAPSHOT_FILE.into())
                .into(),
            user_agent: present(env.user_agent).unwrap_or_else(default_user_agent),
            smtp_server: present(env.smtp_server).unwrap_or_else(|| DEFAULT_SMTP_SERVER.into()),
            smtp_port,
            credentials,
        })
    }
}

impl Config {
    /// Reads `.env` if there is one, then the process environment.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Self>().wrap_err("failed to load config")
    }
}
