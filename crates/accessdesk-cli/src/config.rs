use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use accessdesk_client::DEFAULT_BASE_URL;
use accessdesk_core::DEFAULT_ADMIN_EMAIL;
use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::cli::OutputFormat;

pub const VALID_KEYS: &str = "server, format, admin_email";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ProfileConfig {
    pub server: Option<String>,
    pub format: Option<String>,
    pub admin_email: Option<String>,
}

impl ProfileConfig {
    /// Sets one key, validating values that have a fixed vocabulary.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "server" => self.server = Some(value.to_string()),
            "format" => {
                parse_format(value)?;
                self.format = Some(value.to_string());
            }
            "admin_email" => self.admin_email = Some(value.to_string()),
            other => anyhow::bail!("Unknown config key: {other}. Valid keys: {VALID_KEYS}"),
        }
        Ok(())
    }

    pub fn admin_email(&self) -> &str {
        self.admin_email.as_deref().unwrap_or(DEFAULT_ADMIN_EMAIL)
    }
}

pub type ConfigFile = HashMap<String, ProfileConfig>;

fn config_path() -> Result<PathBuf> {
    Ok(dirs::home_dir()
        .context("Cannot determine home directory")?
        .join(".accessdesk")
        .join("config.toml"))
}

pub fn load_all_from(path: &Path) -> Result<ConfigFile> {
    if !path.exists() {
        return Ok(ConfigFile::new());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("Invalid config: {}", path.display()))
}

pub fn save_profile_to(path: &Path, profile: &str, config: &ProfileConfig) -> Result<()> {
    let mut all = load_all_from(path)?;
    all.insert(profile.to_string(), config.clone());
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    fs::write(path, toml::to_string_pretty(&all)?)?;
    Ok(())
}

pub fn load_profile(profile: &str) -> Result<ProfileConfig> {
    let mut all = load_all_from(&config_path()?)?;
    Ok(all.remove(profile).unwrap_or_default())
}

pub fn save_profile(profile: &str, config: &ProfileConfig) -> Result<()> {
    save_profile_to(&config_path()?, profile, config)
}

pub fn resolve_server(cli_server: &Option<String>, cfg: &ProfileConfig) -> String {
    // 1. --server flag / ACCESSDESK_URL env
    if let Some(s) = cli_server {
        return s.clone();
    }
    // 2. config.toml profile, 3. local development backend
    cfg.server
        .clone()
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
}

pub fn resolve_format(cli_format: Option<OutputFormat>, cfg: &ProfileConfig) -> Result<OutputFormat> {
    match (cli_format, cfg.format.as_deref()) {
        (Some(format), _) => Ok(format),
        (None, Some(stored)) => parse_format(stored),
        (None, None) => Ok(OutputFormat::default()),
    }
}

fn parse_format(value: &str) -> Result<OutputFormat> {
    OutputFormat::from_str(value, true)
        .map_err(|_| anyhow::anyhow!("Unknown format: {value}. Valid formats: json, yaml, table"))
}
