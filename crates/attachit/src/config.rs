//! Configuration for stores, transforms, and styles.
//!
//! The configuration system supports:
//! - Bundled defaults (include_str! from attachit.toml)
//! - User overrides (./attachit.toml or ~/.config/attachit/attachit.toml)
//! - Automatic merging with user values taking precedence

use attachit_core::Styles;
use attachit_error::{AttachItError, AttachItResult, ConfigError};
use attachit_storage::{ContentStore, FileSystemStore, MemoryStore, StorageAdapter};
use attachit_transform::{Geometry, ImageTransform};
use config::{Config, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Adapter type built from configuration.
pub type ConfiguredAdapter = StorageAdapter<dyn ContentStore, ImageTransform>;

/// Content-store backend selection.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Backend {
    /// Blobs under a root directory
    #[default]
    FileSystem,
    /// Blobs in process memory
    Memory,
}

/// Where blobs are kept.
///
/// ```toml
/// [storage]
/// backend = "filesystem"
/// root = "/var/lib/attachit"
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, derive_getters::Getters)]
pub struct StorageConfig {
    /// Backend to use
    #[serde(default)]
    backend: Backend,

    /// Root directory for the filesystem backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    root: Option<PathBuf>,
}

/// How styles are rendered.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, derive_getters::Getters)]
pub struct TransformConfig {
    /// Output format when the source format is unknown, by file extension
    #[serde(default = "default_fallback_format")]
    fallback_format: String,
}

fn default_fallback_format() -> String {
    "png".to_string()
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            fallback_format: default_fallback_format(),
        }
    }
}

/// One configured style.
///
/// ```toml
/// [[styles]]
/// name = "thumb"
/// geometry = "64x64#"
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, derive_getters::Getters)]
pub struct StyleConfig {
    /// Style name
    name: String,
    /// Target geometry
    geometry: Geometry,
}

/// Top-level AttachIt configuration.
///
/// Loads from TOML files with a precedence system:
/// 1. Bundled defaults (include_str! from attachit.toml)
/// 2. User override (~/.config/attachit/attachit.toml, then ./attachit.toml)
///
/// # Example
///
/// ```no_run
/// use attachit::AttachItConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = AttachItConfig::load()?;
/// let adapter = config.adapter()?;
/// let styles = config.styles()?;
/// println!("{} styles on {}", styles.len(), adapter.store().backend());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, derive_getters::Getters)]
pub struct AttachItConfig {
    /// Storage backend settings
    storage: StorageConfig,

    /// Transform settings
    #[serde(default)]
    transform: TransformConfig,

    /// Styles in render order
    #[serde(default, rename = "styles")]
    style_list: Vec<StyleConfig>,
}

impl AttachItConfig {
    /// Load configuration from a specific file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<std::path::Path>) -> AttachItResult<Self> {
        debug!("Loading configuration from file");

        Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .map_err(|e| {
                AttachItError::from(ConfigError::new(format!(
                    "Failed to read configuration from {}: {}",
                    path.as_ref().display(),
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                AttachItError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })
    }

    /// Load configuration with precedence: user override > bundled default.
    ///
    /// Configuration sources in order of precedence (later sources override earlier):
    /// 1. Bundled defaults (attachit.toml shipped with the library)
    /// 2. User config in home directory (~/.config/attachit/attachit.toml)
    /// 3. User config in current directory (./attachit.toml)
    ///
    /// User config files are optional and will be silently skipped if not found.
    #[instrument]
    pub fn load() -> AttachItResult<Self> {
        debug!("Loading configuration with precedence: current dir > home dir > bundled defaults");

        // Bundled default configuration
        const DEFAULT_CONFIG: &str = include_str!("../../../attachit.toml");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/attachit/attachit.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder.add_source(File::with_name("attachit").required(false));

        builder
            .build()
            .map_err(|e| {
                AttachItError::from(ConfigError::new(format!(
                    "Failed to build configuration: {}",
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                AttachItError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })
    }

    /// Configured styles in render order.
    ///
    /// # Errors
    ///
    /// Returns an error if a style uses the reserved `original` name.
    pub fn styles(&self) -> AttachItResult<Styles<Geometry>> {
        Ok(Styles::from_pairs(
            self.style_list
                .iter()
                .map(|s| (s.name.clone(), s.geometry)),
        )?)
    }

    /// Open the configured content store.
    ///
    /// # Errors
    ///
    /// Returns an error if the filesystem backend has no root or the root
    /// cannot be created.
    #[instrument(skip(self), fields(backend = %self.storage.backend))]
    pub fn open_store(&self) -> AttachItResult<Arc<dyn ContentStore>> {
        match self.storage.backend {
            Backend::Memory => Ok(Arc::new(MemoryStore::new())),
            Backend::FileSystem => {
                let root = self.storage.root.as_ref().ok_or_else(|| {
                    ConfigError::new("storage.root is required for the filesystem backend")
                })?;
                Ok(Arc::new(FileSystemStore::new(root)?))
            }
        }
    }

    /// Build the configured image transform.
    ///
    /// # Errors
    ///
    /// Returns an error if the fallback format is unknown.
    pub fn image_transform(&self) -> AttachItResult<ImageTransform> {
        Ok(ImageTransform::with_fallback_extension(
            &self.transform.fallback_format,
        )?)
    }

    /// Build an adapter over the configured store and transform.
    ///
    /// # Errors
    ///
    /// Returns an error if the store or transform cannot be built.
    pub fn adapter(&self) -> AttachItResult<ConfiguredAdapter> {
        Ok(StorageAdapter::new(self.open_store()?, self.image_transform()?))
    }
}
