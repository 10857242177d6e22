//! Persistence for the scale monitor.
//!
//! - [`StateStore`] — the JSON scale-state record, with serialized
//!   read-modify-write and atomic file replacement.
//! - [`MeasurementLog`] — the append-only measurement log.
//!
//! Both live on the local file system; durability is whatever the file
//! system provides.

pub mod log;
pub mod state;

pub use log::MeasurementLog;
pub use state::{StateStore, StoreError};
