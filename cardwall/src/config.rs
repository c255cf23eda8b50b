//! Engine configuration loaded with figment
//!
//! Sources, later ones overriding earlier ones:
//! 1. Built-in defaults
//! 2. `cardwall.toml`, `cardwall.yaml`/`cardwall.yml`, `cardwall.json` in the
//!    configuration directory
//! 3. `CARDWALL_`-prefixed environment variables (`CARDWALL_FAVORITES_LIMIT=3`)

use crate::error::Result;
use figment::{
    providers::{Env, Format, Json, Serialized, Toml, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Base name of configuration files
pub const CONFIG_FILE_STEM: &str = "cardwall";

/// Prefix of configuration environment variables
pub const ENV_PREFIX: &str = "CARDWALL_";

/// Engine settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardwallConfig {
    /// Storage root directory
    pub root: PathBuf,
    /// How many users a card's favorites suggest
    pub favorites_limit: usize,
    /// Members rendered on a card before collapsing into "+N"
    pub max_shown_members: usize,
    /// Columns of a new board, in order
    pub default_columns: Vec<String>,
    /// Title of every board's archive column
    pub archive_column_title: String,
    /// Labels of a new board, colored by position
    pub default_labels: Vec<String>,
}

impl Default for CardwallConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from(".cardwall"),
            favorites_limit: 5,
            max_shown_members: 3,
            default_columns: vec!["To Do".into(), "Doing".into(), "Done".into()],
            archive_column_title: "Archive".into(),
            default_labels: vec![
                "Green".into(),
                "Yellow".into(),
                "Orange".into(),
                "Red".into(),
                "Purple".into(),
                "Blue".into(),
            ],
        }
    }
}

impl CardwallConfig {
    /// Load configuration from files in `dir` and the environment
    pub fn load(dir: impl AsRef<Path>) -> Result<Self> {
        let config: Self = Self::figment(dir.as_ref()).extract()?;
        debug!(
            root = %config.root.display(),
            favorites_limit = config.favorites_limit,
            "loaded configuration"
        );
        Ok(config)
    }

    /// The figment with every source merged in precedence order
    pub fn figment(dir: &Path) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        for (ext, kind) in [
            ("toml", FileKind::Toml),
            ("yaml", FileKind::Yaml),
            ("yml", FileKind::Yaml),
            ("json", FileKind::Json),
        ] {
            let path = dir.join(format!("{}.{}", CONFIG_FILE_STEM, ext));
            if path.is_file() {
                trace!(path = %path.display(), "merging config file");
                figment = match kind {
                    FileKind::Toml => figment.merge(Toml::file(&path)),
                    FileKind::Yaml => figment.merge(Yaml::file(&path)),
                    FileKind::Json => figment.merge(Json::file(&path)),
                };
            }
        }

        figment.merge(Env::prefixed(ENV_PREFIX))
    }
}

#[derive(Clone, Copy)]
enum FileKind {
    Toml,
    Yaml,
    Json,
}
