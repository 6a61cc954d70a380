use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;
use serde_yaml;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable holding the shared webhook secret when no config file is present.
pub const SECRET_ENV: &str = "WORDPRESS_WEBHOOK_SECRET";

#[derive(Parser, Debug)]
#[command(name = "wp-revalidate")]
#[command(about = "Receives WordPress change webhooks and revalidates front-end caches", long_about = None)]
pub struct Cli {
    #[arg(short = 'c', long = "config")]
    pub config_path: Option<String>,

    #[arg(short = 'p', long = "port")]
    pub port: Option<u16>,
}

pub fn default_config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".wp-revalidate")
}

pub fn default_config_path() -> PathBuf {
    default_config_dir().join("config.yaml")
}

#[derive(Debug, Deserialize, Clone)]
pub struct App {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_max_duration")]
    pub max_duration_seconds: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_max_duration() -> u64 {
    30
}

impl Default for App {
    fn default() -> Self {
        App {
            host: default_host(),
            port: default_port(),
            max_duration_seconds: default_max_duration(),
        }
    }
}

impl App {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct Webhook {
    #[serde(default = "default_webhook_path")]
    path: String,
    #[serde(default)]
    secret: Option<String>,
}

fn default_webhook_path() -> String {
    "/api/revalidate".to_string()
}

impl Default for Webhook {
    fn default() -> Self {
        Webhook {
            path: default_webhook_path(),
            secret: None,
        }
    }
}

impl Webhook {
    /// The configured secret. An empty value counts as unset.
    pub fn secret(&self) -> Option<&str> {
        self.secret.as_deref().filter(|s| !s.is_empty())
    }

    /// Route path for the webhook, always rooted at `/`.
    pub fn route_path(&self) -> String {
        if self.path.starts_with('/') {
            self.path.clone()
        } else {
            format!("/{}", self.path)
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum InvalidatorKind {
    #[default]
    Log,
    Http,
}

#[derive(Debug, Deserialize, Clone)]
pub struct InvalidatorConfig {
    #[serde(default)]
    pub kind: InvalidatorKind,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_tag_path")]
    pub tag_path: String,
    #[serde(default = "default_path_path")]
    pub path_path: String,
    #[serde(default)]
    token: Option<String>,
    #[serde(default = "default_invalidator_timeout")]
    pub timeout_seconds: u64,
}

fn default_tag_path() -> String {
    "/api/cache/tag".to_string()
}

fn default_path_path() -> String {
    "/api/cache/path".to_string()
}

fn default_invalidator_timeout() -> u64 {
    10
}

impl Default for InvalidatorConfig {
    fn default() -> Self {
        InvalidatorConfig {
            kind: InvalidatorKind::default(),
            base_url: None,
            tag_path: default_tag_path(),
            path_path: default_path_path(),
            token: None,
            timeout_seconds: default_invalidator_timeout(),
        }
    }
}

impl InvalidatorConfig {
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref().filter(|t| !t.is_empty())
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct Config {
    #[serde(default)]
    pub app: App,
    #[serde(default)]
    pub webhook: Webhook,
    #[serde(default)]
    pub invalidator: InvalidatorConfig,
}

impl Config {
    pub fn new(path: &str) -> Result<Self> {
        let cfg = Config::load_config(path)?;
        Ok(cfg)
    }

    /// Loads the config file when it exists, otherwise falls back to defaults
    /// with the secret taken from [`SECRET_ENV`].
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            let path_str = path
                .to_str()
                .with_context(|| format!("config path {:?} is not valid UTF-8", path))?;
            return Config::new(path_str);
        }

        tracing::info!(path = ?path, "no config file found, using defaults and environment");
        Ok(Config::from_env())
    }

    pub fn from_env() -> Self {
        let mut cfg = Config::default();
        cfg.webhook.secret = env::var(SECRET_ENV).ok();
        cfg
    }

    pub fn from_yaml_str(yaml_str: &str) -> Result<Self> {
        let yaml_with_env = Config::substitute_env_vars(yaml_str)?;
        let config: Config = serde_yaml::from_str(&yaml_with_env)?;
        Ok(config)
    }

    fn load_config(path: &str) -> Result<Config> {
        let yaml_str = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path))?;
        Config::from_yaml_str(&yaml_str)
    }

    fn substitute_env_vars(yaml_str: &str) -> Result<String> {
        let mut result = yaml_str.to_string();
        let mut offset = 0;

        while let Some(start) = result[offset..].find("${") {
            let actual_start = offset + start;
            if let Some(end) = result[actual_start..].find('}') {
                let var_name = &result[actual_start + 2..actual_start + end];

                // ${VAR:-default}
                let env_value = if let Some(default_start) = var_name.find(":-") {
                    let actual_var = &var_name[..default_start];
                    let default_val = &var_name[default_start + 2..];
                    env::var(actual_var).unwrap_or_else(|_| default_val.to_string())
                } else {
                    env::var(var_name).unwrap_or_else(|_| {
                        tracing::warn!(var = %var_name, "environment variable not found");
                        String::new()
                    })
                };

                result.replace_range(actual_start..actual_start + end + 1, &env_value);
                offset = actual_start + env_value.len();
            } else {
                break;
            }
        }

        Ok(result)
    }
}
