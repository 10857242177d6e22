//! Background tasks.
//!
//! Each submodule provides a long-running async function intended to be
//! spawned via `tokio::spawn`, accepting a `CancellationToken` for graceful
//! shutdown.

pub mod level_check;
