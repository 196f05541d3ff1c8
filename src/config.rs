//! Client configuration with layered loading.
//!
//! Precedence (highest wins):
//! 1. Environment variables (WELL_REPORT_*)
//! 2. TOML config file (if WELL_REPORT_CONFIG_FILE is set)
//! 3. Built-in defaults

use crate::error::Error;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use reqwest::Url;
use serde::{Deserialize, Serialize};

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000/api";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Origin and path prefix of the reporting service API.
    ///
    /// Set via WELL_REPORT_API_BASE_URL.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Title of the desktop window.
    ///
    /// Set via WELL_REPORT_WINDOW_TITLE.
    #[serde(default = "default_window_title")]
    pub window_title: String,
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.into()
}

fn default_window_title() -> String {
    "Well Report Uploader".into()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            window_title: default_window_title(),
        }
    }
}

impl ClientConfig {
    pub fn load() -> Result<Self, Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("WELL_REPORT_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("WELL_REPORT_")
                .ignore(&["CONFIG_FILE"])
                .map(|key| key.as_str().to_lowercase().into()),
        );

        let config: Self = figment
            .extract()
            .map_err(|e| Error::Config(e.to_string()))?;
        config.base_url()?;

        Ok(config)
    }

    /// The base URL, parsed. Only http and https are accepted.
    pub fn base_url(&self) -> Result<Url, Error> {
        let url = Url::parse(&self.api_base_url)
            .map_err(|e| Error::Config(format!("api_base_url {:?}: {}", self.api_base_url, e)))?;

        match url.scheme() {
            "http" | "https" => {}
            other => {
                return Err(Error::Config(format!(
                    "api_base_url must use http or https, got {}",
                    other
                )))
            }
        }
        if url.cannot_be_a_base() {
            return Err(Error::Config(format!(
                "api_base_url {:?} cannot be a base",
                self.api_base_url
            )));
        }

        Ok(url)
    }
}
