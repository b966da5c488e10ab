use std::path::PathBuf;

use atelier_cloud::S3Settings;
use atelier_core::catalog::DEFAULT_MAX_UPLOAD_BYTES;
use atelier_core::language::{LanguageCode, DEFAULT_LANGUAGE};

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Upper bound on draining the database pool after the listener stops.
    pub shutdown_timeout_secs: u64,
    /// Language used when neither the request nor the artist names one.
    pub default_language: LanguageCode,
    /// Largest accepted image upload in bytes.
    pub max_upload_bytes: usize,
    pub jwt: JwtConfig,
    pub storage: StorageConfig,
    pub processing: ProcessingConfig,
}

/// Where uploaded images are written.
#[derive(Debug, Clone)]
pub enum StorageBackend {
    Local { root: PathBuf },
    S3(S3Settings),
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Prefix joined with object keys to form public image URLs.
    pub public_base_url: String,
}

#[derive(Debug, Clone)]
pub struct ProcessingConfig {
    /// Image-processing webhook. `None` disables notification.
    pub webhook_url: Option<String>,
    pub timeout_secs: u64,
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.into())
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                    |
    /// |-------------------------|----------------------------|
    /// | `HOST`                  | `0.0.0.0`                  |
    /// | `PORT`                  | `3000`                     |
    /// | `CORS_ORIGINS`          | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`                       |
    /// | `SHUTDOWN_TIMEOUT_SECS` | `30`                       |
    /// | `DEFAULT_LANGUAGE`      | `en`                       |
    /// | `MAX_UPLOAD_BYTES`      | `26214400` (25 MiB)        |
    ///
    /// Storage, processing and JWT settings are read by
    /// [`StorageConfig::from_env`], [`ProcessingConfig::from_env`] and
    /// [`JwtConfig::from_env`].
    pub fn from_env() -> Self {
        let host = env_or("HOST", "0.0.0.0");

        let port: u16 = env_or("PORT", "3000")
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = env_or("CORS_ORIGINS", "http://localhost:5173")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = env_or("REQUEST_TIMEOUT_SECS", "30")
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = env_or("SHUTDOWN_TIMEOUT_SECS", "30")
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let default_language = LanguageCode::parse(&env_or("DEFAULT_LANGUAGE", DEFAULT_LANGUAGE))
            .expect("DEFAULT_LANGUAGE must be a language code such as 'en'");

        let max_upload_bytes: usize = env_or("MAX_UPLOAD_BYTES", &DEFAULT_MAX_UPLOAD_BYTES.to_string())
            .parse()
            .expect("MAX_UPLOAD_BYTES must be a valid usize");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            default_language,
            max_upload_bytes,
            jwt: JwtConfig::from_env(),
            storage: StorageConfig::from_env(),
            processing: ProcessingConfig::from_env(),
        }
    }
}

impl StorageConfig {
    /// | Env Var                   | Default                          |
    /// |---------------------------|----------------------------------|
    /// | `STORAGE_BACKEND`         | `local` (`local` or `s3`)        |
    /// | `STORAGE_LOCAL_ROOT`      | `storage`                        |
    /// | `STORAGE_PUBLIC_BASE_URL` | `/media`                         |
    /// | `S3_BUCKET`               | required when backend is `s3`    |
    /// | `S3_REGION`               | `us-east-1`                      |
    /// | `S3_ENDPOINT`             | unset                            |
    pub fn from_env() -> Self {
        let public_base_url = env_or("STORAGE_PUBLIC_BASE_URL", "/media");

        let backend = match env_or("STORAGE_BACKEND", "local").as_str() {
            "local" => StorageBackend::Local {
                root: PathBuf::from(env_or("STORAGE_LOCAL_ROOT", "storage")),
            },
            "s3" => StorageBackend::S3(S3Settings {
                bucket: std::env::var("S3_BUCKET")
                    .expect("S3_BUCKET must be set when STORAGE_BACKEND=s3"),
                region: env_or("S3_REGION", "us-east-1"),
                endpoint: std::env::var("S3_ENDPOINT").ok().filter(|s| !s.is_empty()),
                public_base_url: public_base_url.clone(),
            }),
            other => panic!("STORAGE_BACKEND must be 'local' or 's3', got '{other}'"),
        };

        Self {
            backend,
            public_base_url,
        }
    }
}

impl ProcessingConfig {
    /// | Env Var                   | Default |
    /// |---------------------------|---------|
    /// | `PROCESSING_WEBHOOK_URL`  | unset   |
    /// | `PROCESSING_TIMEOUT_SECS` | `10`    |
    pub fn from_env() -> Self {
        let webhook_url = std::env::var("PROCESSING_WEBHOOK_URL")
            .ok()
            .filter(|s| !s.trim().is_empty());

        let timeout_secs: u64 = env_or("PROCESSING_TIMEOUT_SECS", "10")
            .parse()
            .expect("PROCESSING_TIMEOUT_SECS must be a valid u64");

        Self {
            webhook_url,
            timeout_secs,
        }
    }
}
