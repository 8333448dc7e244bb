use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;

use crate::error::{RelayError, RelayResult};

pub const DEFAULT_BRANCH: &str = "master";

/// Relay settings, read once per process
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Config {
    /// AWS region; the SDK's default chain is used when unset
    #[serde(default)]
    pub region: Option<String>,
    /// Branch whose tip is reported (default: master)
    #[serde(default)]
    pub main_branch: Option<String>,
    #[serde(default)]
    pub repository_name: String,
    #[serde(default)]
    pub sns_topic_arn: String,
}

impl Config {
    /// Read `AWS_REGION`, `MAIN_BRANCH_NAME`, `REPOSITORY_NAME` and `SNS_TOPIC_ARN`
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            region: lookup("AWS_REGION").filter(|v| !v.is_empty()),
            main_branch: lookup("MAIN_BRANCH_NAME").filter(|v| !v.is_empty()),
            repository_name: lookup("REPOSITORY_NAME").unwrap_or_default(),
            sns_topic_arn: lookup("SNS_TOPIC_ARN").unwrap_or_default(),
        }
    }

    /// Load a TOML config file. String values may reference environment
    /// variables as `${VAR}`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let mut config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        config.expand_env()?;

        Ok(config)
    }

    fn expand_env(&mut self) -> Result<()> {
        fn expand(value: &str) -> Result<String> {
            shellexpand::env(value)
                .map(|v| v.into_owned())
                .with_context(|| format!("Failed to expand '{}'", value))
        }

        if let Some(ref region) = self.region {
            self.region = Some(expand(region)?);
        }
        if let Some(ref branch) = self.main_branch {
            self.main_branch = Some(expand(branch)?);
        }
        self.repository_name = expand(&self.repository_name)?;
        self.sns_topic_arn = expand(&self.sns_topic_arn)?;

        Ok(())
    }

    /// Branch to report on, falling back to `master`
    pub fn branch(&self) -> &str {
        self.main_branch.as_deref().unwrap_or(DEFAULT_BRANCH)
    }

    /// Repository name; an empty value is only reported when a run needs it
    pub fn repository(&self) -> RelayResult<&str> {
        if self.repository_name.is_empty() {
            return Err(RelayError::Configuration(
                "REPOSITORY_NAME is not set".to_string(),
            ));
        }
        Ok(&self.repository_name)
    }
}
