use std::path::PathBuf;

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::parser::locate::ScanPolicy;
use crate::parser::QueueSelection;

const CONFIG_FILE: &str = "lp_history";
const ENV_PREFIX: &str = "LP_HISTORY";

/// Defaults for the command line, read from `lp_history.toml` and `LP_HISTORY_*`
/// environment variables (environment wins). Flags override both.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub out_dir: PathBuf,
    pub queue: QueueSelection,
    pub scan: ScanPolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            out_dir: PathBuf::from("out"),
            queue: QueueSelection::Auto,
            scan: ScanPolicy::FastPath,
        }
    }
}

pub fn load() -> Settings {
    let builder = Config::builder()
        .add_source(File::with_name(CONFIG_FILE).required(false))
        .add_source(Environment::with_prefix(ENV_PREFIX));

    match deserialize(builder) {
        Ok(settings) => {
            debug!(?settings, "settings loaded");
            settings
        }
        Err(e) => {
            warn!(error = %e, "invalid configuration, using defaults");
            Settings::default()
        }
    }
}

fn deserialize(builder: ConfigBuilder<DefaultState>) -> Result<Settings, ConfigError> {
    builder.build()?.try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    fn from_toml(text: &str) -> Result<Settings, ConfigError> {
        deserialize(Config::builder().add_source(File::from_str(text, FileFormat::Toml)))
    }

    #[test]
    fn empty_uses_defaults() {
        assert_eq!(from_toml("").unwrap(), Settings::default());
    }

    #[test]
    fn partial_file() {
        let s = from_toml("queue = \"flex\"\nscan = \"balanced_only\"").unwrap();
        assert_eq!(s.queue, QueueSelection::Flex);
        assert_eq!(s.scan, ScanPolicy::BalancedOnly);
        assert_eq!(s.out_dir, PathBuf::from("out"));
    }

    #[test]
    fn unknown_queue_is_an_error() {
        assert!(from_toml("queue = \"ranked\"").is_err());
    }
}
