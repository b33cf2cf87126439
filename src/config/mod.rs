use crate::error::AppError;
use config::{Config as Cfg, File};
use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct ProductConfig {
    #[serde(flatten)]
    pub common: CommonConfig,
    pub mongodb: MongoConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommonConfig {
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MongoConfig {
    pub uri: String,
    pub database: String,
}

fn default_port() -> u16 {
    3000
}

impl CommonConfig {
    fn load() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let config = Cfg::builder()
            .add_source(File::with_name("configuration").required(false))
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()?;

        Ok(config.try_deserialize()?)
    }
}

impl ProductConfig {
    pub fn load() -> Result<Self, AppError> {
        let common = CommonConfig::load()?;

        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        Ok(ProductConfig {
            common,
            mongodb: MongoConfig {
                uri: get_env("MONGODB_URI", Some("mongodb://localhost:27017"), is_prod)?,
                database: get_env("MONGODB_DATABASE", Some("productsdb"), is_prod)?,
            },
        })
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(format!(
                    "{} is required in production but not set",
                    key
                ))))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(format!(
                    "{} is required but not set",
                    key
                ))))
            }
        }
    }
}
