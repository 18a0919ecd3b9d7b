use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, ValueEnum};

use crate::media::SftpConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StoreBackend {
    Mysql,
    Memory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AppEnv {
    Development,
    Production,
}

/// Server settings. Every flag falls back to an environment variable, and `.env` is loaded first.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[arg(short, long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    #[arg(long, env = "WORKERS", default_value_t = 1)]
    pub workers: usize,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Browser origin allowed to call the API with credentials
    #[arg(long, env = "CORS_ORIGIN", default_value = "http://localhost:5173")]
    pub cors_origin: String,

    #[arg(long, env = "STORE_BACKEND", value_enum, default_value_t = StoreBackend::Mysql)]
    pub store: StoreBackend,

    #[arg(long, env = "DATABASE_URL", required_if_eq("store", "mysql"))]
    pub database_url: Option<String>,

    #[arg(long, env = "DATABASE_POOL_SIZE", default_value_t = 8)]
    pub pool_size: u32,

    #[arg(long, env = "CLERK_API_URL", default_value = "https://api.clerk.com/v1")]
    pub clerk_api_url: String,

    #[arg(long, env = "CLERK_SECRET_KEY", hide_env_values = true)]
    pub clerk_secret_key: String,

    /// Users signing up with this primary email start out as admins
    #[arg(long, env = "ADMIN_EMAIL")]
    pub admin_email: Option<String>,

    #[arg(long, env = "APP_ENV", value_enum, default_value_t = AppEnv::Development)]
    pub app_env: AppEnv,

    #[arg(long, env = "UPLOAD_TEMP_DIR", default_value = "tmp")]
    pub upload_dir: PathBuf,

    #[arg(long, env = "UPLOAD_MAX_BYTES", default_value_t = 10 * 1024 * 1024)]
    pub upload_max_bytes: usize,

    /// Staged uploads older than this are removed, checked at the same period
    #[arg(long, env = "UPLOAD_SWEEP_SECS", default_value_t = 3600)]
    pub upload_sweep_secs: u64,

    #[command(flatten)]
    pub sftp: SftpArgs,
}

#[derive(Args, Debug, Clone, Default)]
pub struct SftpArgs {
    #[arg(long = "sftp-host", env = "VM_SFTP_HOST")]
    pub host: Option<String>,

    #[arg(long = "sftp-port", env = "VM_SFTP_PORT", default_value_t = 22)]
    pub port: u16,

    #[arg(long = "sftp-user", env = "VM_SFTP_USER")]
    pub username: Option<String>,

    #[arg(long = "sftp-private-key", env = "VM_SFTP_PRIVATE_KEY", hide_env_values = true)]
    pub private_key: Option<String>,

    #[arg(long = "sftp-key-passphrase", env = "VM_SFTP_KEY_PASSPHRASE", hide_env_values = true)]
    pub passphrase: Option<String>,

    #[arg(long = "media-remote-root", env = "MEDIA_REMOTE_ROOT", default_value = "/var/www/media")]
    pub remote_root: String,

    #[arg(long = "media-public-base-url", env = "MEDIA_PUBLIC_BASE_URL")]
    pub public_base_url: Option<String>,
}

impl SftpArgs {
    /// `None` unless host, user, key and public URL are all present.
    pub fn to_config(&self) -> Option<SftpConfig> {
        Some(SftpConfig {
            host: self.host.clone()?,
            port: self.port,
            username: self.username.clone()?,
            private_key: self.private_key.clone()?,
            passphrase: self.passphrase.clone(),
            remote_root: self.remote_root.clone(),
            public_base_url: self.public_base_url.clone()?,
        })
    }
}

impl Config {
    pub fn is_production(&self) -> bool {
        self.app_env == AppEnv::Production
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.upload_sweep_secs.max(1))
    }
}
