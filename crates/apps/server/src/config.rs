use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Portfolio site server: static site plus content API")]
pub struct Config {
    /// Listen address
    #[arg(long, env = "SITE_ADDR", default_value = "127.0.0.1:8080")]
    pub addr: SocketAddr,

    /// Directory holding the built site (index.html, wasm bundle, assets)
    #[arg(long, env = "SITE_ROOT", default_value = "dist")]
    pub site_root: PathBuf,

    /// Hosted backend base URL; without it content lives in memory
    #[arg(long, env = "BAAS_URL")]
    pub baas_url: Option<String>,

    /// Service key sent to the hosted backend
    #[arg(long, env = "BAAS_KEY", default_value = "", hide_env_values = true)]
    pub baas_key: String,

    /// Storage bucket for uploaded images
    #[arg(long, env = "BAAS_BUCKET", default_value = "portfolio")]
    pub baas_bucket: String,

    /// Shared admin password; empty disables sign-in
    #[arg(long, env = "ADMIN_PASSWORD", default_value = "", hide_env_values = true)]
    pub admin_password: String,

    /// JSON file of initial rows for the in-memory store, keyed by collection
    #[arg(long, env = "SITE_SEED")]
    pub seed: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_memory_backend() {
        let cfg = Config::try_parse_from(["server"]).unwrap();
        assert_eq!(cfg.addr.port(), 8080);
        assert_eq!(cfg.baas_bucket, "portfolio");
        assert!(cfg.baas_url.is_none());
    }

    #[test]
    fn flags_override_defaults() {
        let cfg = Config::try_parse_from([
            "server",
            "--addr",
            "0.0.0.0:9000",
            "--baas-url",
            "https://example.supabase.co",
            "--admin-password",
            "pw",
        ])
        .unwrap();
        assert_eq!(cfg.addr.port(), 9000);
        assert_eq!(cfg.baas_url.as_deref(), Some("https://example.supabase.co"));
        assert_eq!(cfg.admin_password, "pw");
    }
}
