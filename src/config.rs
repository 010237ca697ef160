//! Catalog finder configuration, persisted as TOML.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use catalog_search::SearchConfig;
use serde::{Deserialize, Serialize};

use crate::error::{FinderError, Result};

/// Top-level configuration for the catalog finder.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FinderConfig {
    /// Where the precomputed snapshot lives.
    pub snapshot: SnapshotConfig,
    /// Ranking settings handed to the search core.
    pub search: SearchConfig,
    /// Result link generation.
    pub links: LinkConfig,
}

/// Location and file names of the snapshot artifacts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotConfig {
    /// Snapshot directory. `None` means [`crate::finder_dirs::snapshot_dir`].
    pub dir: Option<PathBuf>,
    /// Entry metadata file.
    pub metadata_file: String,
    /// Document embedding file.
    pub embeddings_file: String,
    /// Keyword (TF-IDF) model and matrix file.
    pub keywords_file: String,
    /// Query encoder projection file.
    pub projection_file: String,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            dir: None,
            metadata_file: "metadata.json".to_owned(),
            embeddings_file: "embeddings.json".to_owned(),
            keywords_file: "keywords.json".to_owned(),
            projection_file: "projection.json".to_owned(),
        }
    }
}

impl SnapshotConfig {
    /// The snapshot directory, falling back to the platform data dir.
    #[must_use]
    pub fn resolved_dir(&self) -> PathBuf {
        self.dir
            .clone()
            .unwrap_or_else(crate::finder_dirs::snapshot_dir)
    }
}

/// Default site all result links point into.
pub const DEFAULT_BASE_URL: &str = "https://dt4si.com";

/// How result URLs are built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkConfig {
    /// Site root, without a trailing slash.
    pub base_url: String,
    /// Known case-study pages keyed by lowercase title fragment.
    pub case_studies: BTreeMap<String, String>,
}

impl Default for LinkConfig {
    fn default() -> Self {
        let known = [
            ("learning link foundation", "learning-link-foundation"),
            ("farmers for forest", "farmer-for-forest"),
            ("i-saksham", "i-saksham"),
            ("vipla foundation", "vipla-foundation"),
            (
                "educate girls predictive targeting to enroll girls",
                "educate-girls-predictive-targeting-to-enroll-girls",
            ),
            ("the akshaya patra foundation", "the-akshaya-patra-foundation"),
            ("armman", "armman"),
            ("lend a hand india", "lend-a-hand-india"),
            ("anudip", "anudip"),
            ("fmch", "fmch"),
            ("educate girls", "educate-girls"),
        ];
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            case_studies: known
                .into_iter()
                .map(|(title, slug)| {
                    (
                        title.to_owned(),
                        format!("{DEFAULT_BASE_URL}/case-studies/{slug}"),
                    )
                })
                .collect(),
        }
    }
}

impl FinderConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| FinderError::Config(e.to_string()))
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| FinderError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Returns the default config file path: `~/.config/catalog-finder/config.toml`.
    pub fn default_config_path() -> PathBuf {
        if let Some(dir) = std::env::var_os("CATALOG_FINDER_CONFIG_DIR") {
            PathBuf::from(dir).join("config.toml")
        } else if let Some(config) = std::env::var_os("XDG_CONFIG_HOME") {
            PathBuf::from(config)
                .join("catalog-finder")
                .join("config.toml")
        } else {
            crate::finder_dirs::config_file()
        }
    }

    /// Validates this configuration.
    ///
    /// Checks:
    /// - the search section passes [`SearchConfig::validate`]
    /// - `links.base_url` is an absolute http(s) URL
    /// - every snapshot file name is non-empty
    pub fn validate(&self) -> Result<()> {
        self.search.validate()?;

        let base = url::Url::parse(&self.links.base_url)
            .map_err(|e| FinderError::Config(format!("links.base_url is not a URL: {e}")))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(FinderError::Config(
                "links.base_url must use http or https".into(),
            ));
        }

        let files = [
            ("metadata_file", &self.snapshot.metadata_file),
            ("embeddings_file", &self.snapshot.embeddings_file),
            ("keywords_file", &self.snapshot.keywords_file),
            ("projection_file", &self.snapshot.projection_file),
        ];
        if let Some((name, _)) = files.iter().find(|(_, file)| file.trim().is_empty()) {
            return Err(FinderError::Config(format!(
                "snapshot.{name} must not be empty"
            )));
        }
        Ok(())
    }
}
