use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::identity::IdentityMap;

/// On-disk layout of the user mapping file:
///
/// ```toml
/// [users]
/// "5b10ac8d82e05b22cc7d4ef5" = "octocat"
/// "jane@example.com" = "jane-gh"
/// ```
#[derive(Debug, Deserialize, Default)]
struct UserMapFile {
    #[serde(default)]
    users: HashMap<String, String>,
}

pub fn data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".jira2gh")
}

fn default_user_map_path() -> PathBuf {
    data_dir().join("users.toml")
}

/// Load the identity map. An explicit path must exist; the default one may be absent.
pub fn load_identity_map(explicit: Option<&Path>) -> Result<IdentityMap> {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => {
            let path = default_user_map_path();
            if !path.exists() {
                return Ok(IdentityMap::default());
            }
            path
        }
    };
    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read user map from {}", path.display()))?;
    parse_identity_map(&contents)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

pub fn parse_identity_map(contents: &str) -> Result<IdentityMap> {
    let file: UserMapFile = toml::from_str(contents)?;
    Ok(IdentityMap::new(file.users))
}
