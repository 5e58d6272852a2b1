// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub serve: ServeConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
    /// Access log file path (optional, stdout if not set)
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    pub error_log_file: Option<String>,
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive_timeout: u64,
    pub read_timeout: u64,
    pub write_timeout: u64,
    pub max_connections: Option<u64>,
}

/// File serving configuration
///
/// `root` bounds all path resolution, `index_files` controls the
/// directory-to-file fallback order, and the flags gate whether gzip/deflate
/// are ever negotiated regardless of client capability.
#[derive(Debug, Deserialize, Clone)]
pub struct ServeConfig {
    pub root: PathBuf,
    pub index_files: Vec<String>,
    pub gzip: bool,
    pub deflate: bool,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            index_files: vec!["index.html".to_string(), "index.htm".to_string()],
            gzip: false,
            deflate: false,
        }
    }
}
