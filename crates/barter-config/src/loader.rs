// SPDX-FileCopyrightText: 2026 Barter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Lookup order: `./barter.toml` > `~/.config/barter/barter.toml` >
//! `/etc/barter/barter.toml`, with `BARTER_*` environment overrides on top.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::BarterConfig;

/// Section names that env keys are split on.
const SECTIONS: &[&str] = &["api", "sync", "auth", "logging"];

/// Paths searched for `barter.toml`, lowest precedence first.
pub fn config_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from("/etc/barter/barter.toml")];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("barter").join("barter.toml"));
    }
    paths.push(PathBuf::from("barter.toml"));
    paths
}

/// Builds the full layered Figment: defaults, config files, then env vars.
pub fn build_figment() -> Figment {
    let mut figment = Figment::new().merge(Serialized::defaults(BarterConfig::default()));
    for path in config_paths() {
        figment = figment.merge(Toml::file(path));
    }
    figment.merge(env_provider())
}

/// Loads configuration from the standard hierarchy with env var overrides.
pub fn load_config() -> Result<BarterConfig, figment::Error> {
    build_figment().extract()
}

/// Loads configuration from an inline TOML string only (no files, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<BarterConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(BarterConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Loads configuration from one explicit file, with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<BarterConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(BarterConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// `BARTER_<SECTION>_<KEY>` maps to `<section>.<key>`.
///
/// Uses `Env::map()` rather than `Env::split("_")` because keys themselves
/// contain underscores: `BARTER_SYNC_POLL_INTERVAL_MS` must become
/// `sync.poll_interval_ms`.
pub(crate) fn env_provider() -> Env {
    Env::prefixed("BARTER_").map(|key| map_env_key(key.as_str()).into())
}

pub(crate) fn map_env_key(key: &str) -> String {
    let key = key.to_ascii_lowercase();
    for section in SECTIONS {
        if let Some(rest) = key.strip_prefix(section).and_then(|r| r.strip_prefix('_')) {
            return format!("{section}.{rest}");
        }
    }
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_keys_map_to_sections() {
        assert_eq!(map_env_key("sync_poll_interval_ms"), "sync.poll_interval_ms");
        assert_eq!(map_env_key("auth_token"), "auth.token");
        assert_eq!(map_env_key("api_base_url"), "api.base_url");
        assert_eq!(map_env_key("logging_level"), "logging.level");
    }

    #[test]
    fn unknown_env_section_is_left_alone() {
        assert_eq!(map_env_key("PROFILE_NAME"), "profile_name");
    }

    #[test]
    fn local_file_has_highest_file_precedence() {
        let paths = config_paths();
        assert_eq!(paths.first(), Some(&PathBuf::from("/etc/barter/barter.toml")));
        assert_eq!(paths.last(), Some(&PathBuf::from("barter.toml")));
    }
}
