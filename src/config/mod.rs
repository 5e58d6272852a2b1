// Configuration module entry point
// Loads and validates the server configuration

mod types;

use std::net::SocketAddr;

// Re-export public types
pub use types::{Config, LoggingConfig, PerformanceConfig, ServeConfig, ServerConfig};

impl Config {
    /// Load configuration from the default `config.toml`
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from specified file path (without extension)
    ///
    /// Missing files are fine; `STATICD_*` environment variables override
    /// file values, which override the built-in defaults.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix("STATICD"))
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("serve.root", ".")?
            .set_default(
                "serve.index_files",
                vec!["index.html".to_string(), "index.htm".to_string()],
            )?
            .set_default("serve.gzip", false)?
            .set_default("serve.deflate", false)?
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}
