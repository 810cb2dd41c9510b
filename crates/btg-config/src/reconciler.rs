//! Load/save reconciliation of the configuration file
//!
//! The `ConfigReconciler` owns one configuration path. Every call starts from
//! a freshly computed default configuration, so a change in the detected
//! parallelism between calls is picked up.
//!
//! The reconciler does no locking: concurrent `load_config`/`save_config`
//! calls against the same path must be serialized by the caller.

use std::path::{Path, PathBuf};

use crate::defaults::{DEFAULT_CONFIG_FILENAME, ParallelismProvider, SystemParallelism};
use crate::model::Configuration;
use crate::{Error, Mapping, Result, reconcile};

/// Reconciles the persisted configuration document with the defaults.
#[derive(Debug, Clone)]
pub struct ConfigReconciler<P = SystemParallelism> {
    /// Configuration file location, fixed at construction
    path: PathBuf,

    /// Where the default worker count comes from
    parallelism: P,
}

impl ConfigReconciler<SystemParallelism> {
    /// Create a reconciler for `path`, or `config.json` in the working
    /// directory when `None`.
    pub fn new(path: Option<PathBuf>) -> Self {
        Self::with_parallelism(path, SystemParallelism)
    }
}

impl Default for ConfigReconciler<SystemParallelism> {
    fn default() -> Self {
        Self::new(None)
    }
}

impl<P: ParallelismProvider> ConfigReconciler<P> {
    /// Create a reconciler whose default worker count comes from
    /// `parallelism` instead of the operating system.
    pub fn with_parallelism(path: Option<PathBuf>, parallelism: P) -> Self {
        Self {
            path: path.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILENAME)),
            parallelism,
        }
    }

    /// The configuration file this reconciler reads and writes.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Worker count substituted for missing or invalid `max_workers`.
    pub fn default_worker_count(&self) -> usize {
        self.parallelism.default_worker_count()
    }

    /// A fresh copy of the complete default configuration.
    pub fn get_default_config(&self) -> Configuration {
        Configuration::with_worker_count(self.default_worker_count())
    }

    /// Load the effective configuration.
    ///
    /// Persisted fields override the defaults one by one, then the key-sync
    /// and worker-count rules are applied.
    ///
    /// A known field holding a value of the wrong type keeps its default;
    /// the other persisted fields are still applied.
    ///
    /// With `use_default_if_missing` set, a missing, unreadable or unparsable
    /// file yields the default configuration and this never returns `Err`.
    /// Without it those conditions are returned as errors:
    /// [`Error::NotFound`] for a missing file and [`Error::Fs`] for read and
    /// parse failures.
    pub fn load_config(&self, use_default_if_missing: bool) -> Result<Configuration> {
        if !self.path.exists() {
            if use_default_if_missing {
                tracing::info!(path = %self.path.display(), "Config file not found, using defaults");
                return Ok(self.get_default_config());
            }
            return Err(Error::NotFound {
                path: self.path.clone(),
            });
        }

        match self.read_effective() {
            Ok(config) => Ok(config),
            Err(e) if use_default_if_missing => {
                if e.is_parse() {
                    tracing::warn!(path = %self.path.display(), error = %e, "Config file is malformed, using defaults");
                } else {
                    tracing::warn!(path = %self.path.display(), error = %e, "Config file could not be read, using defaults");
                }
                Ok(self.get_default_config())
            }
            Err(e) => Err(e),
        }
    }

    /// Lenient load: the effective configuration, or the defaults when the
    /// file is missing or unusable.
    pub fn load_or_default(&self) -> Configuration {
        self.load_config(true)
            .unwrap_or_else(|_| self.get_default_config())
    }

    /// Save `config`, returning `false` (after logging the cause) on failure.
    pub fn save_config(&self, config: &Configuration) -> bool {
        self.report_save(self.try_save_config(config))
    }

    /// Save a raw document, returning `false` (after logging the cause) on
    /// failure. Unlike [`save_config`](Self::save_config) the document may
    /// hold values the typed model cannot, such as a textual `max_workers`.
    pub fn save_document(&self, document: Mapping) -> bool {
        self.report_save(self.try_save_document(document))
    }

    /// [`save_config`](Self::save_config), reporting the failure cause.
    pub fn try_save_config(&self, config: &Configuration) -> Result<()> {
        let document = config.to_document().map_err(Error::Encode)?;
        self.try_save_document(document)
    }

    /// [`save_document`](Self::save_document), reporting the failure cause.
    ///
    /// Applies, in order: `prompts` flattening, key sync (the list wins) and
    /// `max_workers` coercion. The document is written pretty-printed with
    /// fields in sorted order.
    pub fn try_save_document(&self, mut document: Mapping) -> Result<()> {
        reconcile::normalize_prompts(&mut document);
        reconcile::sync_keys_on_save(&mut document);
        reconcile::normalize_workers_on_save(&mut document, self.default_worker_count());

        btg_fs::write_structured_file(&self.path, &document, true)?;
        Ok(())
    }

    fn read_effective(&self) -> Result<Configuration> {
        let persisted = btg_fs::read_structured_file(&self.path)?;
        let default_workers = self.default_worker_count();

        let defaults = Configuration::with_worker_count(default_workers)
            .to_document()
            .map_err(Error::Encode)?;
        let mut document = defaults.clone();
        reconcile::overlay(&mut document, persisted);
        reconcile::restore_mistyped_fields(&mut document, &defaults);
        reconcile::sync_keys_on_load(&mut document);
        reconcile::normalize_workers_on_load(&mut document, default_workers);

        let config = Configuration::from_document(document).map_err(|source| Error::Schema {
            path: self.path.clone(),
            source,
        })?;
        tracing::debug!(path = %self.path.display(), "Loaded configuration");
        Ok(config)
    }

    fn report_save(&self, outcome: Result<()>) -> bool {
        match outcome {
            Ok(()) => {
                tracing::info!(path = %self.path.display(), "Configuration saved");
                true
            }
            Err(e) => {
                tracing::error!(path = %self.path.display(), error = %e, "Failed to save configuration");
                false
            }
        }
    }
}
