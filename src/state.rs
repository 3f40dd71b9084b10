use crate::config::Config;
use crate::error::Result;
use crate::services::backend::BackendClient;
use crate::services::genai::GenAiClient;

/// The application's state.
///
/// Everything here is built once at startup and read-only afterwards; request
/// handlers share it by cheap clone (the HTTP clients are pooled internally).
#[derive(Clone)]
pub struct AppState {
    /// The application's configuration.
    pub config: Config,
    /// Client for the primary REST backend.
    pub backend: BackendClient,
    /// Client for the plant-catalog REST API.
    pub catalog: BackendClient,
    /// Client for the generative-AI chatbot upstream.
    pub genai: GenAiClient,
}

impl AppState {
    /// Creates a new `AppState`.
    ///
    /// # Arguments
    ///
    /// * `config` - The application's configuration.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `AppState`.
    pub fn new(config: &Config) -> Result<Self> {
        let backend = BackendClient::new(&config.backend_url)?;
        tracing::info!("✅ Backend client initialized for {}", config.backend_url);

        let catalog = BackendClient::new(&config.catalog_url)?;
        tracing::info!("✅ Catalog client initialized for {}", config.catalog_url);

        let genai = GenAiClient::new(
            &config.genai_api_url,
            config.genai_api_key.clone(),
        )?;
        tracing::info!("✅ GenAI client initialized");

        Ok(AppState {
            config: config.clone(),
            backend,
            catalog,
            genai,
        })
    }
}
