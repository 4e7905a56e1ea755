//! Configuration types for convset.
//!
//! [`Config::load`] reads `~/.config/convset/config.toml`, creating it with
//! the built-in defaults if it does not yet exist. [`Config::load_from`]
//! layers an explicit file over the defaults instead. [`Config::defaults`]
//! returns the defaults without touching the filesystem (useful in tests).

use crate::types::DatasetSpec;
use anyhow::Context;
use serde::Deserialize;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Embedded defaults
// ---------------------------------------------------------------------------

const DEFAULT_CONFIG: &str = r#"
[output]
dir    = "./datasets"
indent = 2

[hub]
endpoint     = "https://datasets-server.huggingface.co"
page_size    = 100
timeout_secs = 60
token_env    = "HF_TOKEN"

[[datasets]]
name        = "lmsys_chat_1m_sample"
id          = "lmsys/lmsys-chat-1m"
max_records = 1000
description = "Real conversations from 210K users with 25 different LLMs"

[[datasets]]
name        = "locomo_dataset"
id          = "Aman279/Locomo"
description = "Very long multi-session conversations (300+ turns)"

[[datasets]]
name        = "chatbot_arena_conversations"
id          = "lmsys/chatbot_arena_conversations"
description = "Chatbot Arena conversations with human preferences"

[[datasets]]
name        = "wildchat_10k_sample"
id          = "allenai/WildChat-1M"
max_records = 10000
streaming   = true
description = "In-the-wild conversations covering diverse topics"

[[datasets]]
name        = "sharegpt_sample"
id          = "anon8231489123/ShareGPT_Vicuna_unfiltered"
max_records = 10000
description = "ChatGPT conversations shared by users"

[[datasets]]
name        = "ultrachat_10k_sample"
id          = "HuggingFaceH4/ultrachat_200k"
split       = "train_sft"
max_records = 10000
description = "Synthetic multi-turn conversations across diverse domains"

[[datasets]]
name        = "openassistant_conversations"
id          = "OpenAssistant/oasst1"
description = "Human-written assistant conversation trees"

[[datasets]]
name        = "anthropic_hh_rlhf_10k_sample"
id          = "Anthropic/hh-rlhf"
max_records = 10000
description = "Helpful and harmless preference pairs"
"#;

// ---------------------------------------------------------------------------
// Public config types
// ---------------------------------------------------------------------------

/// Top-level application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub hub: HubConfig,
    #[serde(default)]
    pub datasets: Vec<DatasetSpec>,
}

/// `[output]` section of `config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory both the download and the inspection pass work in.
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
    #[serde(default = "default_indent")]
    pub indent: usize,
}

fn default_output_dir() -> PathBuf { PathBuf::from("./datasets") }
fn default_indent() -> usize { 2 }

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            indent: default_indent(),
        }
    }
}

/// `[hub]` section of `config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct HubConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Rows requested per page; the rows API caps this at 100.
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Environment variable holding the access token for gated datasets.
    #[serde(default = "default_token_env")]
    pub token_env: String,
}

fn default_endpoint() -> String { "https://datasets-server.huggingface.co".to_string() }
fn default_page_size() -> usize { 100 }
fn default_timeout_secs() -> u64 { 60 }
fn default_token_env() -> String { "HF_TOKEN".to_string() }

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            page_size: default_page_size(),
            timeout_secs: default_timeout_secs(),
            token_env: default_token_env(),
        }
    }
}

impl HubConfig {
    /// Token from the configured environment variable, if set and non-empty.
    pub fn token(&self) -> Option<String> {
        std::env::var(&self.token_env).ok().filter(|t| !t.trim().is_empty())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::defaults()
    }
}

impl Config {
    /// Load from `~/.config/convset/config.toml`, layered on top of the
    /// built-in defaults. Creates the file with defaults if it does not exist.
    pub fn load() -> anyhow::Result<Self> {
        let path = config_path();

        if !path.exists() {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("creating {}", parent.display()))?;
            }
            std::fs::write(&path, DEFAULT_CONFIG.trim_start())
                .with_context(|| format!("writing default config to {}", path.display()))?;
            tracing::info!(path = %path.display(), "wrote default config");
        }

        Self::layered(&path, false)
    }

    /// Load an explicit config file, layered on top of the built-in defaults.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        Self::layered(path, true)
    }

    /// Return the built-in defaults without touching the filesystem.
    pub fn defaults() -> Self {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .build()
            .expect("built-in default config must be valid TOML")
            .try_deserialize()
            .expect("built-in default config must deserialize correctly")
    }

    /// Catalog entries whose name is in `names`; every entry when `names` is
    /// empty. Unknown names are returned as the error.
    pub fn select(&self, names: &[String]) -> Result<Vec<DatasetSpec>, Vec<String>> {
        if names.is_empty() {
            return Ok(self.datasets.clone());
        }
        let unknown: Vec<String> = names
            .iter()
            .filter(|n| !self.datasets.iter().any(|d| &d.name == *n))
            .cloned()
            .collect();
        if !unknown.is_empty() {
            return Err(unknown);
        }
        Ok(self
            .datasets
            .iter()
            .filter(|d| names.contains(&d.name))
            .cloned()
            .collect())
    }

    fn layered(path: &Path, required: bool) -> anyhow::Result<Self> {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(config::File::from(path).required(required))
            .build()
            .with_context(|| format!("reading config {}", path.display()))?
            .try_deserialize()
            .with_context(|| format!("invalid config {}", path.display()))
    }
}

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

fn config_path() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".to_string()))
                .join(".config")
        })
        .join("convset")
        .join("config.toml")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
