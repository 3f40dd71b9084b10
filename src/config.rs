use std::env;
use anyhow::{Context, Result};
use zeroize::{Zeroize, Zeroizing};

/// Default generateContent endpoint for the chatbot upstream.
const DEFAULT_GENAI_API_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash:generateContent";

/// The application's configuration.
#[derive(Clone)]
pub struct Config {
    /// Base URL of the primary REST backend.
    pub backend_url: String,
    /// Base URL of the plant-catalog REST API.
    pub catalog_url: String,
    /// URL of the generative-AI completion endpoint.
    pub genai_api_url: String,
    /// API key for the generative-AI endpoint. Only the chatbot route needs it.
    pub genai_api_key: Option<String>,
    /// The duration of a session in days.
    pub session_duration_days: i64,
    /// The master key used to encrypt session cookies.
    pub master_key: Zeroizing<Vec<u8>>,
}

impl Config {
    /// Creates a new `Config` from environment variables.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `Config`.
    pub fn from_env() -> Result<Self> {
        let mut master_key_hex = env::var("MASTER_KEY")
            .context("MASTER_KEY must be set (generate with: openssl rand -hex 32)")?;

        let master_key_bytes = hex::decode(&master_key_hex)
            .context("MASTER_KEY must be valid hexadecimal")?;

        master_key_hex.zeroize();

        if master_key_bytes.len() != 32 {
            anyhow::bail!("MASTER_KEY must be exactly 32 bytes (64 hex characters)");
        }

        Ok(Self {
            backend_url: env::var("BACKEND_URL")
                .unwrap_or_else(|_| "http://localhost:8081".to_string()),
            catalog_url: env::var("CATALOG_URL")
                .unwrap_or_else(|_| "http://127.0.0.1:8000".to_string()),
            genai_api_url: env::var("GENAI_API_URL")
                .unwrap_or_else(|_| DEFAULT_GENAI_API_URL.to_string()),
            genai_api_key: env::var("GENAI_API_KEY").ok(),
            session_duration_days: env::var("SESSION_DURATION_DAYS")
                .unwrap_or_else(|_| "7".to_string())
                .parse()
                .context("Invalid SESSION_DURATION_DAYS")?,
            master_key: Zeroizing::new(master_key_bytes),
        })
    }
}
