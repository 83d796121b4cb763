// Configuration module entry point
// Loads the server configuration from file, environment and defaults

mod types;

use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, Environment, File, FileFormat};
use std::net::SocketAddr;

pub use types::{Config, LoggingConfig, RouteSpec, RouterOptions, ServerConfig};

/// Default config file name (without extension)
pub const DEFAULT_CONFIG_PATH: &str = "config";

impl Config {
    /// Load configuration from specified file path (without extension)
    /// Missing files are not an error; environment variables prefixed with
    /// `RXROUTE` (nested keys separated by `__`) override file values.
    pub fn load_from(config_path: &str) -> Result<Self, ConfigError> {
        with_defaults(config::Config::builder())?
            .add_source(File::with_name(config_path).required(false))
            .add_source(Environment::with_prefix("RXROUTE").separator("__"))
            .build()?
            .try_deserialize()
    }

    /// Parse configuration from TOML text, applying defaults
    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        with_defaults(config::Config::builder())?
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

fn with_defaults(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    builder
        .set_default("server.host", "127.0.0.1")?
        .set_default("server.port", 8080)?
        .set_default("server.connection_timeout", 30)?
        .set_default("logging.level", "info")?
        .set_default("logging.access_log", true)?
        .set_default("logging.access_log_format", "combined")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_defaults() {
        let cfg = Config::from_toml_str("").unwrap();
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.server.connection_timeout, 30);
        assert_eq!(cfg.logging.level, "info");
        assert!(cfg.logging.access_log);
        assert_eq!(cfg.router, RouterOptions::default());
        assert!(!cfg.router.debug);
        assert!(cfg.router.append_slashes);
        assert_eq!(cfg.routes.len(), 1);
        assert_eq!(cfg.routes[0].pattern(), "^/$");
        assert!(cfg.context.is_empty());
    }

    #[test]
    fn test_full_config() {
        let cfg = Config::from_toml_str(
            r#"
            [server]
            port = 9000

            [router]
            debug = true
            append_slashes = false

            [context]
            greeting = "hi"

            [[routes]]
            type = "static"
            pattern = "^/static/(.*)$"
            root = "public"

            [[routes]]
            type = "redirect"
            pattern = "^/old/(.*)$"
            target = "/new/$1"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.server.port, 9000);
        assert!(cfg.router.debug);
        assert!(!cfg.router.append_slashes);
        assert_eq!(cfg.context["greeting"], "hi");
        assert_eq!(
            cfg.routes,
            vec![
                RouteSpec::Static {
                    pattern: "^/static/(.*)$".to_string(),
                    root: PathBuf::from("public"),
                },
                RouteSpec::Redirect {
                    pattern: "^/old/(.*)$".to_string(),
                    target: "/new/$1".to_string(),
                    code: 302,
                },
            ]
        );
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let cfg = Config::from_toml_str(
            r#"
            [router]
            debug = true
            no_such_option = 1

            [mystery]
            value = "x"
            "#,
        )
        .unwrap();
        assert!(cfg.router.debug);
    }

    #[test]
    fn test_socket_addr() {
        let cfg = Config::from_toml_str("[server]\nhost = \"0.0.0.0\"\nport = 1234").unwrap();
        assert_eq!(cfg.get_socket_addr().unwrap().port(), 1234);

        let cfg = Config::from_toml_str("[server]\nhost = \"not a host\"").unwrap();
        assert!(cfg.get_socket_addr().is_err());
    }
}
