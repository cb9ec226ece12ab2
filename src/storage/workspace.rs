use std::path::{Path, PathBuf};

use crate::{
    domain::Config,
    storage::{Dataset, DatasetError},
};

/// Name of the directory holding a workspace's settings.
const DIR: &str = ".travel";

/// A directory holding travel dashboard settings and, optionally, a dataset.
///
/// ```text
/// <root>/
///   .travel/
///     config.toml
///     dataset.yaml
/// ```
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    /// Opens the workspace rooted at `root`. Nothing is read yet.
    #[must_use]
    pub fn open(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The workspace root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the configuration file.
    #[must_use]
    pub fn config_path(&self) -> PathBuf {
        self.root.join(DIR).join("config.toml")
    }

    /// Path of the workspace dataset.
    #[must_use]
    pub fn dataset_path(&self) -> PathBuf {
        self.root.join(DIR).join("dataset.yaml")
    }

    /// Whether the workspace has been initialized.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.root.join(DIR).exists()
    }

    /// Loads the configuration, falling back to the defaults if the file is
    /// missing or unreadable.
    #[must_use]
    pub fn load_config(&self) -> Config {
        let path = self.config_path();
        Config::load(&path).unwrap_or_else(|e| {
            tracing::debug!("Failed to load config: {e}");
            Config::default()
        })
    }

    /// Loads the dataset.
    ///
    /// An explicit path wins. Otherwise the workspace dataset is used if it
    /// exists, and the built-in sample data if it does not.
    ///
    /// # Errors
    ///
    /// Fails if the selected file cannot be loaded.
    pub fn load_dataset(&self, explicit: Option<&Path>) -> Result<Dataset, DatasetError> {
        if let Some(path) = explicit {
            return Dataset::load(path);
        }
        let path = self.dataset_path();
        if path.exists() {
            Dataset::load(&path)
        } else {
            tracing::debug!("No dataset at {}, using sample data", path.display());
            Ok(Dataset::sample())
        }
    }

    /// Creates the settings directory with a default configuration and a copy
    /// of the sample dataset.
    ///
    /// Returns the paths of the files written.
    ///
    /// # Errors
    ///
    /// Fails if the workspace is already initialized or a file cannot be
    /// written.
    pub fn init(&self) -> Result<Vec<PathBuf>, InitError> {
        let dir = self.root.join(DIR);
        if dir.exists() {
            return Err(InitError::AlreadyInitialized(dir));
        }
        std::fs::create_dir_all(&dir).map_err(|source| InitError::Io {
            path: dir.clone(),
            source,
        })?;

        let config_path = self.config_path();
        Config::default()
            .save(&config_path)
            .map_err(InitError::Config)?;

        let dataset_path = self.dataset_path();
        let yaml = serde_yaml::to_string(&Dataset::sample())?;
        std::fs::write(&dataset_path, yaml).map_err(|source| InitError::Io {
            path: dataset_path.clone(),
            source,
        })?;

        tracing::info!("Initialized workspace in {}", self.root.display());
        Ok(vec![config_path, dataset_path])
    }
}

/// Errors initializing a [`Workspace`].
#[derive(Debug, thiserror::Error)]
pub enum InitError {
    /// The settings directory already exists.
    #[error("workspace already initialized (found existing {})", .0.display())]
    AlreadyInitialized(PathBuf),

    /// A file or directory could not be created.
    #[error("failed to create {}: {source}", path.display())]
    Io {
        /// What could not be created.
        path: PathBuf,
        /// The underlying error.
        source: std::io::Error,
    },

    /// The default configuration could not be written.
    #[error("failed to create config.toml: {0}")]
    Config(String),

    /// The sample dataset could not be serialized.
    #[error("failed to serialize the sample dataset: {0}")]
    Dataset(#[from] serde_yaml::Error),
}
