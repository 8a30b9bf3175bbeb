/// `load_config` module: reads the static YAML config and injects secrets from the environment.
///
/// This is the only place where the user-supplied YAML is parsed and turned into
/// strongly-typed settings for the CLI.
///
/// # Responsibilities
/// - Parse the config file (blog, post tags, cursor store, endpoints, timeout, chambers)
/// - Fill in the public Parliament and Tumblr endpoints when not overridden
/// - Read the Tumblr token from `TUMBLR_TOKEN`; the YAML never holds secrets
///
/// # Example
/// ```yaml
/// blog: wankerwatch
/// tags: [uk politics, parliament]
/// cursor:
///   type: post
///   post_id: 712345678901234567
/// request_timeout_secs: 30
/// chambers: [commons, lords]
/// ```
///
/// # Errors
/// Every failure is an `anyhow::Error` whose message names the file, the YAML
/// problem, or the missing environment variable.
use anyhow::{anyhow, bail, Result};
use division_bot_core::Chamber;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{error, info};

/// Environment variable holding the Tumblr OAuth2 access token.
pub const TUMBLR_TOKEN_VAR: &str = "TUMBLR_TOKEN";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Where the per-chamber cursors are persisted.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CursorConfig {
    /// YAML stored in the first text block of a dedicated blog post.
    Post { post_id: i64 },
    /// YAML stored in a local file.
    File { path: PathBuf },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub commons_votes: String,
    pub lords_votes: String,
    pub members: String,
    pub bills: String,
    pub tumblr: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            commons_votes: "https://commonsvotes-api.parliament.uk".to_string(),
            lords_votes: "https://lordsvotes-api.parliament.uk".to_string(),
            members: "https://members-api.parliament.uk".to_string(),
            bills: "https://bills-api.parliament.uk".to_string(),
            tumblr: "https://api.tumblr.com".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub blog: String,
    pub tags: Vec<String>,
    pub cursor: CursorConfig,
    pub endpoints: Endpoints,
    /// Applied to the division and member clients.
    pub request_timeout: Duration,
    /// Enabled chambers, in sync order.
    pub chambers: Vec<Chamber>,
    pub tumblr_token: String,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_chambers() -> Vec<Chamber> {
    Chamber::ALL.to_vec()
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    blog: String,
    #[serde(default)]
    tags: Vec<String>,
    cursor: CursorConfig,
    #[serde(default)]
    endpoints: Endpoints,
    #[serde(default = "default_timeout_secs")]
    request_timeout_secs: u64,
    #[serde(default = "default_chambers")]
    chambers: Vec<Chamber>,
}

/// Loads the YAML config at `path` and reads the Tumblr token from the environment.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let path_ref = path.as_ref();
    info!(config_path = ?path_ref, "Loading configuration from file");

    let config_content = fs::read_to_string(path_ref).map_err(|e| {
        error!(error = ?e, config_path = ?path_ref, "Failed to read config file");
        anyhow!("Failed to read config file {:?}: {}", path_ref, e)
    })?;

    let raw: RawConfig = serde_yaml::from_str(&config_content).map_err(|e| {
        error!(error = ?e, config_path = ?path_ref, "Failed to parse config YAML");
        anyhow!("Failed to parse config YAML: {e}")
    })?;
    info!(config_path = ?path_ref, blog = %raw.blog, "Parsed config YAML successfully");

    if raw.blog.trim().is_empty() {
        bail!("Config field `blog` must not be empty");
    }
    if raw.chambers.is_empty() {
        bail!("Config field `chambers` must list at least one chamber");
    }
    let mut chambers: Vec<Chamber> = Vec::with_capacity(raw.chambers.len());
    for chamber in raw.chambers {
        if chambers.contains(&chamber) {
            bail!("Chamber `{chamber}` is listed more than once in `chambers`");
        }
        chambers.push(chamber);
    }

    let tumblr_token = match env::var(TUMBLR_TOKEN_VAR) {
        Ok(token) if !token.trim().is_empty() => token,
        Ok(_) => {
            error!("{TUMBLR_TOKEN_VAR} is empty");
            bail!("{TUMBLR_TOKEN_VAR} is set but empty");
        }
        Err(e) => {
            error!(error = ?e, "{TUMBLR_TOKEN_VAR} missing in environment");
            bail!("{TUMBLR_TOKEN_VAR} missing in environment: {e}");
        }
    };

    Ok(Config {
        blog: raw.blog,
        tags: raw.tags,
        cursor: raw.cursor,
        endpoints: raw.endpoints,
        request_timeout: Duration::from_secs(raw.request_timeout_secs),
        chambers,
        tumblr_token,
    })
}
