//! Filesystem module.
//!
//! Provides:
//! - Path and directory management
//! - Filename generation
//! - Persisting an aggregate and sweeping the staging directory

pub mod naming;
pub mod paths;
pub mod persist;
pub mod sweep;

pub use naming::{asset_stem, highlight_asset_stem, sanitize_path_component};
pub use paths::{ensure_dir, profile_dir};
pub use persist::{persist_aggregate, PersistReport};
pub use sweep::sweep_stray_assets;
