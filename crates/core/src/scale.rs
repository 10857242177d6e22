//! The persisted scale state record.

use serde::{Deserialize, Serialize};

use crate::level::Notified;

/// Last-known weight, classification, and notification flag for the scale.
///
/// This record is the sole durable memory of "have we already told someone".
/// It round-trips through the JSON state file; `notified` stays absent until
/// the first alarm has been sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaleState {
    /// Latest measurement, in kilograms.
    pub weight: f64,
    /// Current classification label from the threshold table. Empty on a
    /// freshly provisioned scale.
    #[serde(default)]
    pub status: String,
    /// Alarm-sent flag; `None` until the first notification goes out.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notified: Option<Notified>,
}
