//! Replay configuration from environment variables

use std::env;

use anyhow::bail;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// Final snapshot only
    Tps,
    /// Every intermediate snapshot as a JSON array
    Json,
}

#[derive(Clone, Debug)]
pub struct ReplayConfig {
    /// Output format (`TAK_OUTPUT`, default `tps`)
    pub output: OutputFormat,

    /// Reject illegal moves instead of playing them (`TAK_VALIDATE`)
    pub validate: bool,
}

impl ReplayConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let output = match get("TAK_OUTPUT").as_deref().map(str::trim) {
            None | Some("") | Some("tps") => OutputFormat::Tps,
            Some("json") => OutputFormat::Json,
            Some(other) => bail!("TAK_OUTPUT must be `tps` or `json`, got `{other}`"),
        };

        let validate = get("TAK_VALIDATE")
            .map(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Ok(Self { output, validate })
    }
}
