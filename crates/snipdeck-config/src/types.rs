use serde::{Deserialize, Serialize};
use snipdeck_core::{PagePriorities, PageScope};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

/// Dashboard configuration.
///
/// Every field has a default, so a missing or partial config file always
/// yields a working setup. Paths left unset resolve under `~/.snipdeck`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Public URL prefix the published assets are served from
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Directory the publisher writes into (default: ~/.snipdeck/publish)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publish_root: Option<PathBuf>,

    /// Location of the snippet store file (default: ~/.snipdeck/store.json)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_path: Option<PathBuf>,

    /// Pause between items in a batch deploy
    #[serde(default = "default_deploy_delay_ms")]
    pub deploy_delay_ms: u64,

    /// Deadline for a single publish operation
    #[serde(default = "default_publish_timeout_secs")]
    pub publish_timeout_secs: u64,

    /// Poll interval of `snipdeck watch`
    #[serde(default = "default_watch_interval_secs")]
    pub watch_interval_secs: u64,

    /// Minify assets at publish time; disable to deploy content verbatim
    #[serde(default = "default_true")]
    pub auto_minify: bool,

    /// Per-page priority overrides for group ordering, keyed by page
    /// name (`all`, `home`, `product`, ...)
    #[serde(default)]
    pub page_priorities: BTreeMap<String, u8>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            publish_root: None,
            store_path: None,
            deploy_delay_ms: default_deploy_delay_ms(),
            publish_timeout_secs: default_publish_timeout_secs(),
            watch_interval_secs: default_watch_interval_secs(),
            auto_minify: default_true(),
            page_priorities: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Page priorities with this config's overrides applied.
    ///
    /// Unknown page names are skipped with a warning rather than
    /// rejected, so a config written by a newer version still loads.
    pub fn priorities(&self) -> PagePriorities {
        let overrides = self.page_priorities.iter().filter_map(|(name, priority)| {
            match PageScope::from_cli_name(name) {
                Some(page) => Some((page, *priority)),
                None => {
                    tracing::warn!(page = %name, "unknown page in page_priorities, ignoring");
                    None
                }
            }
        });

        PagePriorities::with_overrides(overrides)
    }

    pub fn deploy_delay(&self) -> Duration {
        Duration::from_millis(self.deploy_delay_ms)
    }

    pub fn publish_timeout(&self) -> Duration {
        Duration::from_secs(self.publish_timeout_secs)
    }

    pub fn watch_interval(&self) -> Duration {
        Duration::from_secs(self.watch_interval_secs)
    }
}

// Default value functions
fn default_base_url() -> String {
    "https://snipdeck.github.io/assets".to_string()
}

fn default_deploy_delay_ms() -> u64 {
    1000
}

fn default_publish_timeout_secs() -> u64 {
    30
}

fn default_watch_interval_secs() -> u64 {
    2
}

fn default_true() -> bool {
    true
}
