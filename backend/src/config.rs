use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub static_config: StaticConfig,
    pub generation: GenerationConfig,
    pub cors: CorsConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StaticConfig {
    pub enabled: bool,
    pub web_root: String,
}

/// Text-generation backend the tutor relays prompts to
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Full URL of the generate endpoint (Ollama-compatible)
    pub endpoint: String,
    /// Model identifier sent with every request
    pub model: String,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct CorsConfig {
    /// Allowed origins; empty means any origin
    pub allow_origins: Vec<String>,
}

impl Config {
    /// Load configuration with environment variable override support
    ///
    /// Loading order:
    /// 1. Load from the explicit path, or the first config.toml found
    /// 2. Override with environment variables (prefixed with APP_)
    /// 3. Validate the final configuration
    pub fn load(explicit_path: Option<&str>) -> Result<Self, anyhow::Error> {
        let mut config = match explicit_path {
            Some(path) => Self::from_toml(path)?,
            None => match Self::find_config_file() {
                Some(config_path) => Self::from_toml(&config_path)?,
                None => {
                    tracing::warn!("Configuration file not found, using defaults");
                    Config::default()
                },
            },
        };

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Load configuration before global logging is installed
    ///
    /// Events raised while loading (env overrides, missing files, web root
    /// warnings) go to `subscriber` for the duration of the call.
    pub fn load_with_subscriber<S>(explicit_path: Option<&str>, subscriber: S) -> Result<Self, anyhow::Error>
    where
        S: tracing::Subscriber + Send + Sync + 'static,
    {
        tracing::subscriber::with_default(subscriber, || Self::load(explicit_path))
    }

    /// Apply environment variable overrides
    ///
    /// Supported environment variables:
    /// - APP_SERVER_HOST: Server host (default: 0.0.0.0)
    /// - APP_SERVER_PORT: Server port (default: 8080)
    /// - APP_LOG_LEVEL: Logging level (e.g., "info,kwanqa_tutor=debug")
    /// - APP_GENERATION_ENDPOINT: Generate endpoint URL
    /// - APP_GENERATION_MODEL: Model identifier
    /// - APP_STATIC_ENABLED: Serve the static site (true/false)
    /// - APP_WEB_ROOT: Directory holding the exported site
    fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("APP_SERVER_HOST") {
            self.server.host = host;
            tracing::info!("Override server.host from env: {}", self.server.host);
        }

        if let Some(port) = lookup("APP_SERVER_PORT") {
            match port.parse() {
                Ok(port) => {
                    self.server.port = port;
                    tracing::info!("Override server.port from env: {}", self.server.port);
                },
                Err(e) => tracing::warn!(
                    "Invalid APP_SERVER_PORT '{}': {} (keep {})",
                    port,
                    e,
                    self.server.port
                ),
            }
        }

        if let Some(level) = lookup("APP_LOG_LEVEL") {
            self.logging.level = level;
            tracing::info!("Override logging.level from env: {}", self.logging.level);
        }

        if let Some(endpoint) = lookup("APP_GENERATION_ENDPOINT") {
            self.generation.endpoint = endpoint;
            tracing::info!("Override generation.endpoint from env: {}", self.generation.endpoint);
        }

        if let Some(model) = lookup("APP_GENERATION_MODEL") {
            self.generation.model = model;
            tracing::info!("Override generation.model from env: {}", self.generation.model);
        }

        if let Some(enabled) = lookup("APP_STATIC_ENABLED")
            && let Ok(val) = enabled.parse()
        {
            self.static_config.enabled = val;
            tracing::info!("Override static_config.enabled from env: {}", val);
        }

        if let Some(web_root) = lookup("APP_WEB_ROOT") {
            self.static_config.web_root = web_root;
            tracing::info!(
                "Override static_config.web_root from env: {}",
                self.static_config.web_root
            );
        }
    }

    /// Validate configuration
    fn validate(&self) -> Result<(), anyhow::Error> {
        if self.server.port == 0 {
            anyhow::bail!("Server port cannot be 0");
        }

        if self.generation.model.trim().is_empty() {
            anyhow::bail!("generation.model cannot be empty");
        }

        let endpoint = reqwest::Url::parse(&self.generation.endpoint).map_err(|e| {
            anyhow::anyhow!("generation.endpoint '{}' is not a valid URL: {}", self.generation.endpoint, e)
        })?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            anyhow::bail!("generation.endpoint must use http or https");
        }

        if self.static_config.enabled && !Path::new(&self.static_config.web_root).exists() {
            tracing::warn!(
                "Static site enabled but web root '{}' does not exist; only the API will be served",
                self.static_config.web_root
            );
        }

        Ok(())
    }

    fn find_config_file() -> Option<String> {
        let possible_paths =
            ["conf/config.toml", "config.toml", "backend/conf/config.toml"];

        for path in &possible_paths {
            if Path::new(path).exists() {
                return Some(path.to_string());
            }
        }
        None
    }

    fn from_toml(path: &str) -> Result<Self, anyhow::Error> {
        let content = fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read config file '{}': {}", path, e))?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "0.0.0.0".to_string(), port: 8080 }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info,kwanqa_tutor=debug".to_string(), file: None }
    }
}

impl Default for StaticConfig {
    fn default() -> Self {
        Self { enabled: false, web_root: "web".to_string() }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:11434/api/generate".to_string(),
            model: "llama3:latest".to_string(),
        }
    }
}
