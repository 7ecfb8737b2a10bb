//! Vitalis - On-device insights engine for personal health tracking data
//!
//! Vitalis turns daily health records (steps, water, sleep, weight) into
//! derived insights through a deterministic recompute-on-read pipeline:
//! record store → validation → derived metrics → achievement evaluation
//! → dashboard snapshot.
//!
//! ## Modules
//!
//! - **Metrics**: pure derived-metric functions (progress, streaks, consistency, trends)
//! - **Engine**: stateful orchestrator over a record store, with change notifications

pub mod achievements;
pub mod engine;
pub mod error;
pub mod events;
pub mod metrics;
pub mod snapshot;
pub mod store;
pub mod types;
pub mod validate;

pub use engine::TrackerEngine;
pub use error::TrackerError;
pub use events::{ChangeEvent, ChangeNotifier};
pub use snapshot::SnapshotEncoder;
pub use store::{MemoryStore, RecordStore};
pub use types::{Computed, DashboardSnapshot, UserPreferences};

/// Vitalis version embedded in all snapshot payloads
pub const VITALIS_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for snapshot payloads
pub const PRODUCER_NAME: &str = "vitalis";
