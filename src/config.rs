use crate::detection::lexicon::{default_lexicons, prepare_lexicons, IndicatorLexicon};
use crate::sentiment::DEFAULT_SENTIMENT_ENDPOINT;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use url::Url;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_listen_address")]
    pub listen_address: String,
    #[serde(default)]
    pub sentiment: SentimentConfig,
    /// Replaces the built-in lexicon table when set.
    #[serde(default)]
    pub lexicons: Option<Vec<IndicatorLexicon>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default)]
    pub api_token: Option<String>,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

fn default_listen_address() -> String {
    "0.0.0.0:5000".to_string()
}

fn default_true() -> bool {
    true
}

fn default_endpoint() -> String {
    DEFAULT_SENTIMENT_ENDPOINT.to_string()
}

fn default_timeout_seconds() -> u64 {
    8
}

impl Default for SentimentConfig {
    fn default() -> Self {
        SentimentConfig {
            enabled: true,
            endpoint: default_endpoint(),
            api_token: None,
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            listen_address: default_listen_address(),
            sentiment: SentimentConfig::default(),
            lexicons: None,
        }
    }
}

impl Config {
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file '{path}'"))?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> anyhow::Result<Self> {
        let config: Config = serde_yaml::from_str(content)?;
        Ok(config)
    }

    pub fn to_file(&self, path: &str) -> anyhow::Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Applies `PORT` and `HF_TOKEN` from the process environment.
    pub fn apply_env(&mut self) -> anyhow::Result<()> {
        self.apply_overrides(std::env::var("PORT").ok(), std::env::var("HF_TOKEN").ok())
    }

    pub fn apply_overrides(
        &mut self,
        port: Option<String>,
        api_token: Option<String>,
    ) -> anyhow::Result<()> {
        if let Some(port) = port {
            let port: u16 = port
                .trim()
                .parse()
                .with_context(|| format!("Invalid PORT value '{port}'"))?;
            let mut addr = self.listen_addr()?;
            addr.set_port(port);
            self.listen_address = addr.to_string();
        }

        if let Some(token) = api_token.filter(|t| !t.trim().is_empty()) {
            self.sentiment.api_token = Some(token);
        }

        Ok(())
    }

    pub fn listen_addr(&self) -> anyhow::Result<SocketAddr> {
        self.listen_address
            .parse()
            .with_context(|| format!("Invalid listen address '{}'", self.listen_address))
    }

    pub fn lexicons(&self) -> Vec<IndicatorLexicon> {
        self.lexicons.clone().unwrap_or_else(default_lexicons)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        self.listen_addr()?;

        let endpoint = Url::parse(&self.sentiment.endpoint)
            .with_context(|| format!("Invalid sentiment endpoint '{}'", self.sentiment.endpoint))?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            anyhow::bail!(
                "Sentiment endpoint must use http or https, got '{}'",
                endpoint.scheme()
            );
        }

        if self.sentiment.timeout_seconds == 0 {
            anyhow::bail!("Sentiment timeout must be greater than zero");
        }

        prepare_lexicons(&self.lexicons())?;
        Ok(())
    }
}
