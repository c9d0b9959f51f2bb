use std::path::PathBuf;

use office_pipeline::generator::DEFAULT_RENDER_CONCURRENCY;
use office_pipeline::renderer::{DEFAULT_IMAGE_DIR, DEFAULT_IMAGE_SIZE};
use office_pipeline::GeneratorConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
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
    /// Upper bound on draining connections after a shutdown signal (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// Postgres URL. When unset the server keeps records in memory.
    pub database_url: Option<String>,
    /// QR image rendering settings.
    pub qr: QrConfig,
}

/// Settings for QR image rendering and batch generation.
#[derive(Debug, Clone)]
pub struct QrConfig {
    /// Directory rendered PNGs are written to.
    pub image_dir: PathBuf,
    /// Width and height of rendered images, in pixels.
    pub image_size: u32,
    /// Base URL for item content when a batch has no URL template.
    pub fallback_base_url: String,
    /// Maximum number of images rendered at once per batch.
    pub render_concurrency: usize,
}

impl Default for QrConfig {
    fn default() -> Self {
        let generator = GeneratorConfig::default();
        Self {
            image_dir: PathBuf::from(DEFAULT_IMAGE_DIR),
            image_size: DEFAULT_IMAGE_SIZE,
            fallback_base_url: generator.fallback_base_url,
            render_concurrency: DEFAULT_RENDER_CONCURRENCY,
        }
    }
}

impl QrConfig {
    pub fn generator_config(&self) -> GeneratorConfig {
        GeneratorConfig {
            fallback_base_url: self.fallback_base_url.clone(),
            render_concurrency: self.render_concurrency,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                 |
    /// |-------------------------|-------------------------|
    /// | `HOST`                  | `0.0.0.0`               |
    /// | `PORT`                  | `3000`                  |
    /// | `CORS_ORIGINS`          | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`                    |
    /// | `SHUTDOWN_TIMEOUT_SECS` | `30`                    |
    /// | `DATABASE_URL`          | unset (in-memory store) |
    /// | `QR_IMAGE_DIR`          | `/tmp/qrcodes`          |
    /// | `QR_IMAGE_SIZE`         | `256`                   |
    /// | `QR_FALLBACK_BASE_URL`  | `https://example.com`   |
    /// | `QR_RENDER_CONCURRENCY` | `8`                     |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let database_url = std::env::var("DATABASE_URL")
            .ok()
            .filter(|url| !url.trim().is_empty());

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            database_url,
            qr: QrConfig::from_env(),
        }
    }
}

impl QrConfig {
    fn from_env() -> Self {
        let defaults = Self::default();

        let image_dir = std::env::var("QR_IMAGE_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.image_dir);

        let image_size: u32 = std::env::var("QR_IMAGE_SIZE")
            .map(|v| v.parse().expect("QR_IMAGE_SIZE must be a valid u32"))
            .unwrap_or(defaults.image_size);
        assert!(image_size > 0, "QR_IMAGE_SIZE must be positive");

        let fallback_base_url =
            std::env::var("QR_FALLBACK_BASE_URL").unwrap_or(defaults.fallback_base_url);

        let render_concurrency: usize = std::env::var("QR_RENDER_CONCURRENCY")
            .map(|v| v.parse().expect("QR_RENDER_CONCURRENCY must be a valid usize"))
            .unwrap_or(defaults.render_concurrency);

        Self {
            image_dir,
            image_size,
            fallback_base_url,
            render_concurrency: render_concurrency.max(1),
        }
    }
}
