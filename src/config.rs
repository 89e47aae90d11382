//! Configuration management

use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub services: ServicesConfig,
    pub highlight: HighlightConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Endpoints of the consumed extraction and matching services.
#[derive(Debug, Clone)]
pub struct ServicesConfig {
    pub extraction_url: String,
    pub matching_url: String,
}

#[derive(Debug, Clone)]
pub struct HighlightConfig {
    /// Fill opacity for composited highlights.
    pub alpha: f32,
    /// Strip clause-index tokens ("a.", bare ".") when locating matched
    /// text. Heuristic for clause-numbered documents; off by default.
    pub strip_index_markers: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8000,
            },
            services: ServicesConfig {
                extraction_url: "http://localhost:8100/api/extract".to_string(),
                matching_url: "http://localhost:8100/api/match".to_string(),
            },
            highlight: HighlightConfig {
                alpha: 0.4,
                strip_index_markers: false,
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Config::default();
        Config {
            server: ServerConfig {
                host: env::var("SERVER_HOST").unwrap_or(defaults.server.host),
                port: env::var("SERVER_PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(defaults.server.port),
            },
            services: ServicesConfig {
                extraction_url: env::var("EXTRACTION_SERVICE_URL")
                    .unwrap_or(defaults.services.extraction_url),
                matching_url: env::var("MATCHING_SERVICE_URL")
                    .unwrap_or(defaults.services.matching_url),
            },
            highlight: HighlightConfig {
                alpha: env::var("HIGHLIGHT_ALPHA")
                    .ok()
                    .and_then(|a| a.parse().ok())
                    .map(|a: f32| a.clamp(0.0, 1.0))
                    .unwrap_or(defaults.highlight.alpha),
                strip_index_markers: env::var("STRIP_INDEX_MARKERS")
                    .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                    .unwrap_or(defaults.highlight.strip_index_markers),
            },
        }
    }
}
