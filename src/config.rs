use std::{env, path::PathBuf};

use derive_builder::Builder;

use crate::wikitext::{Result, WtError};

pub const DEFAULT_CACHE_DIR: &str = "cache";
pub const CACHE_DIR_VAR: &str = "EQUIPMENT_CACHE_DIR";
pub const DUMP_PATH_VAR: &str = "EQUIPMENT_DUMP";

/// Runtime settings. Environment (and `.env`) values come first, command line
/// flags are applied on top.
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
#[builder(setter(into))]
pub struct Config {
    /// Directory holding the exported pages.
    #[builder(default = "PathBuf::from(DEFAULT_CACHE_DIR)")]
    pub cache_dir: PathBuf,
    /// Where to write the compiled items as JSON, if anywhere.
    #[builder(setter(into, strip_option), default)]
    pub dump_path: Option<PathBuf>,
}

impl Config {
    /// Builder pre-filled from the environment.
    pub fn builder_from_env() -> ConfigBuilder {
        let mut builder = ConfigBuilder::default();
        if let Ok(dir) = env::var(CACHE_DIR_VAR) {
            builder.cache_dir(dir);
        }
        if let Ok(path) = env::var(DUMP_PATH_VAR) {
            builder.dump_path(path);
        }
        builder
    }

    pub fn finish(builder: &ConfigBuilder) -> Result<Config> {
        builder
            .build()
            .map_err(|e| WtError::other_with_source("invalid configuration", Some(e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::finish(&ConfigBuilder::default()).unwrap();
        assert_eq!(config.cache_dir, PathBuf::from("cache"));
        assert_eq!(config.dump_path, None);
    }

    #[test]
    fn overrides() {
        let mut builder = ConfigBuilder::default();
        builder.cache_dir("pages").dump_path("items.json");
        let config = Config::finish(&builder).unwrap();
        assert_eq!(config.cache_dir, PathBuf::from("pages"));
        assert_eq!(config.dump_path, Some(PathBuf::from("items.json")));
    }
}
