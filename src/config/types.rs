// Configuration types module
// Defines all configuration-related data structures

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::handler::Context;

/// Main configuration structure
///
/// Unknown keys are ignored.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    #[serde(default)]
    pub router: RouterOptions,
    /// Ordered route list; declaration order is dispatch order
    #[serde(default = "default_routes")]
    pub routes: Vec<RouteSpec>,
    /// Initial contents of the shared handler context
    #[serde(default)]
    pub context: Context,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Seconds a connection may stay open; 0 disables the limit
    pub connection_timeout: u64,
}

/// Logging configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
    /// Access log format (combined, common or json)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "combined".to_string()
}

/// Dispatch behaviour switches
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct RouterOptions {
    /// Put error, backtrace, request, response and context into 500 bodies
    #[serde(default)]
    pub debug: bool,
    /// Redirect `/path` to `/path/` when only the latter matches a route
    #[serde(default = "default_append_slashes")]
    pub append_slashes: bool,
}

const fn default_append_slashes() -> bool {
    true
}

impl Default for RouterOptions {
    fn default() -> Self {
        Self {
            debug: false,
            append_slashes: default_append_slashes(),
        }
    }
}

/// A configured route
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RouteSpec {
    /// Serve files below `root`, named by the first capture group
    Static { pattern: String, root: PathBuf },
    /// Fixed body
    Text {
        pattern: String,
        body: String,
        #[serde(default = "default_text_content_type")]
        content_type: String,
    },
    /// HTTP redirect; `$1`..`$9` in `target` expand to capture groups
    Redirect {
        pattern: String,
        target: String,
        #[serde(default = "default_redirect_code")]
        code: u16,
    },
}

impl RouteSpec {
    pub fn pattern(&self) -> &str {
        match self {
            Self::Static { pattern, .. }
            | Self::Text { pattern, .. }
            | Self::Redirect { pattern, .. } => pattern,
        }
    }
}

#[allow(clippy::missing_const_for_fn)]
fn default_text_content_type() -> String {
    "text/plain".to_string()
}

const fn default_redirect_code() -> u16 {
    302
}

const LANDING_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>rxroute</title></head>
<body><h1>rxroute is running</h1><p>Add <code>[[routes]]</code> to config.toml to serve content.</p></body>
</html>"#;

fn default_routes() -> Vec<RouteSpec> {
    vec![RouteSpec::Text {
        pattern: "^/$".to_string(),
        body: LANDING_PAGE.to_string(),
        content_type: "text/html; charset=utf-8".to_string(),
    }]
}
