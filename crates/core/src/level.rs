//! Well-known level constants and the notification flag.
//!
//! Label strings come from the threshold table in the monitor configuration;
//! only one of them is special to the state machine.

use serde::{Deserialize, Serialize};

/// The one level that means "no alarm": the scale holds enough salt.
pub const LEVEL_NORMAL: &str = "Normal";

/// Whether an alarm has been mailed out and not yet cleared.
///
/// Persisted as lowercase strings. The field is absent until the scale goes
/// through its first alarm cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Notified {
    Yes,
    No,
}
