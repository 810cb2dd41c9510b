//! Configuration persistence for the BTG translator
//!
//! The [`ConfigReconciler`] owns one JSON configuration file. Loading merges
//! whatever is on disk over a complete default configuration and repairs the
//! two cross-field invariants (API key list/singular key sync and a positive
//! worker count). Saving applies the same repairs before writing.
//!
//! # Example
//!
//! ```ignore
//! use btg_config::{ConfigReconciler, logging};
//!
//! // Print fallback and save diagnostics; BTG_LOG=debug shows every step
//! logging::init()?;
//!
//! let reconciler = ConfigReconciler::new(Some("config.json".into()));
//! let mut config = reconciler.load_config(true)?;
//! config.api_keys = vec!["key-1".into(), "key-2".into()];
//! assert!(reconciler.save_config(&config));
//! ```

pub mod defaults;
pub mod error;
pub mod logging;
pub mod model;
pub mod reconcile;
pub mod reconciler;

pub use btg_fs::Mapping;
pub use defaults::{
    DEFAULT_CONFIG_FILENAME, DEFAULT_MODEL_NAME, DEFAULT_PROMPT, FixedParallelism,
    ParallelismProvider, PROMPT_SLOT, SystemParallelism,
};
pub use error::{Error, Result};
pub use model::Configuration;
pub use reconciler::ConfigReconciler;
