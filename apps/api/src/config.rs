use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::models::page::Contact;

/// Application configuration loaded from environment variables.
/// Every setting has a default, so an empty environment starts a local server.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// Directory holding the page table file.
    pub data_dir: PathBuf,
    /// Built client bundle and SPA `index.html`.
    pub static_dir: PathBuf,
    pub rust_log: String,
    /// Copied into pages whose creation payload has no contact block.
    pub default_contact: Option<Contact>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let port = match lookup("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .with_context(|| format!("PORT must be a valid port number, got '{raw}'"))?,
            None => 3000,
        };

        let data_dir = lookup("DATA_DIR")
            .or_else(|| lookup("AZURE_APP_DATA_DIR"))
            .unwrap_or_else(|| ".".to_string());

        let default_contact = match (
            lookup("CONTACT_EMAIL"),
            lookup("CONTACT_LINKEDIN"),
            lookup("CONTACT_RESUME_URL"),
        ) {
            (Some(email), Some(linkedin), Some(resume_url)) => Some(Contact {
                email,
                linkedin,
                resume_url,
            }),
            _ => None,
        };

        Ok(Config {
            port,
            data_dir: PathBuf::from(data_dir),
            static_dir: PathBuf::from(lookup("STATIC_DIR").unwrap_or_else(|| "build".to_string())),
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            default_contact,
        })
    }
}
