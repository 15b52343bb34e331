use std::path::PathBuf;

use clap::Parser;

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
pub struct Args {
    #[clap(long, default_value = "0.0.0.0:8787", env = "BIND_ADDRESS")]
    pub bind_address: String,

    /// Base URL of the day-ahead price API.
    #[clap(
        long = "upstream-url",
        default_value = "https://api.porssisahko.net/v2",
        env = "UPSTREAM_URL"
    )]
    pub upstream_url: String,

    /// Feedback and premium activation storage.
    #[clap(long = "db-path", default_value = "price-proxy.sqlite3", env = "DB_PATH")]
    pub db_path: PathBuf,

    /// Allowed CORS origins. The first one is echoed to unmatched origins.
    #[clap(
        long = "allowed-origin",
        env = "ALLOWED_ORIGINS",
        value_delimiter = ',',
        default_value = "http://localhost:5500,http://127.0.0.1:5500"
    )]
    pub allowed_origins: Vec<String>,

    /// Premium key allow-list. Never echoed to clients.
    #[clap(long = "premium-key", env = "PREMIUM_KEYS", value_delimiter = ',', hide_env_values = true)]
    pub premium_keys: Vec<String>,
}
