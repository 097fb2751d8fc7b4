use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub mongo_uri: String,
    pub mongo_database: String,
    pub generator_base_url: String,
    pub generator_api_key: Option<String>,
    pub generator_model: String,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        // Load environment variables from root .env file (two levels up)
        // Try root .env first, then fallback to local .env
        let skip_root_env = env::var("SKIP_ROOT_ENV").is_ok();
        if skip_root_env {
            dotenvy::dotenv().ok();
        } else if dotenvy::from_path("../../.env").is_err() {
            // Fallback to current directory .env for backward compatibility
            dotenvy::dotenv().ok();
        }

        // Determine environment (defaults to dev)
        let env = env::var("APP_ENV").unwrap_or_else(|_| "dev".to_string());

        // Build configuration from config/*.toml + ENV overrides
        let config_builder = config::Config::builder()
            .add_source(
                config::File::with_name(&format!("config/{}", env)).required(false), // Allow missing config file, fallback to ENV
            )
            // Override with environment variables (prefix: APP_)
            .add_source(config::Environment::with_prefix("APP").separator("__"));

        let settings = config_builder.build()?;

        let mongo_uri = settings
            .get_string("database.mongo_uri")
            .or_else(|_| env::var("MONGO_URI"))
            .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());

        let mongo_database = settings
            .get_string("database.mongo_database")
            .or_else(|_| env::var("MONGO_DATABASE"))
            .unwrap_or_else(|_| "quizforge".to_string());

        let generator_base_url = settings
            .get_string("generator.base_url")
            .or_else(|_| env::var("GENERATOR_BASE_URL"))
            .unwrap_or_else(|_| "https://openrouter.ai/api/v1".to_string());

        // A missing key is not fatal at startup; generation requests answer
        // 503 until one is configured.
        let generator_api_key = settings
            .get_string("generator.api_key")
            .or_else(|_| env::var("OPENROUTER_API_KEY"))
            .ok()
            .filter(|key| !key.is_empty());

        if generator_api_key.is_none() {
            eprintln!("WARNING: No generator API key configured, quiz generation will be unavailable");
        }

        let generator_model = settings
            .get_string("generator.model")
            .or_else(|_| env::var("GENERATOR_MODEL"))
            .unwrap_or_else(|_| "mistralai/mistral-7b-instruct:free".to_string());

        Ok(Config {
            mongo_uri,
            mongo_database,
            generator_base_url,
            generator_api_key,
            generator_model,
        })
    }
}
