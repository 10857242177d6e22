//! The notification state machine.
//!
//! Two transition policies share the (status, notified) pair:
//!
//! - [`apply_measurement`] runs on every reading the scale submits. It never
//!   raises an alarm; its only mail is the all-clear when an active alarm
//!   ends.
//! - [`periodic_check`] runs on a timer and (re)raises the alarm for as long
//!   as the level is abnormal.
//!
//! Both are pure: they compute the successor state and an optional
//! notification, and leave persistence and delivery to the caller.

use crate::level::{Notified, LEVEL_NORMAL};
use crate::scale::ScaleState;

// ---------------------------------------------------------------------------
// Notification
// ---------------------------------------------------------------------------

/// A composed notification ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub subject: String,
    pub body: String,
}

impl Notification {
    /// Compose the level message for the given label and weight.
    fn for_level(label: &str, weight: f64) -> Self {
        Self {
            subject: format!("Salt level is {label}"),
            body: format!("The current total weight is {weight}kg."),
        }
    }
}

// ---------------------------------------------------------------------------
// Submit measurement
// ---------------------------------------------------------------------------

/// Outcome of applying one measurement.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementOutcome {
    /// Successor state; always carries the new weight and label.
    pub state: ScaleState,
    /// All-clear notification, present only when an active alarm ends.
    pub all_clear: Option<Notification>,
}

/// Apply a new measurement and its classification to the current state.
///
/// The all-clear fires iff an alarm was previously mailed
/// (`notified == yes`), the new level is [`LEVEL_NORMAL`], and the stored
/// status was something else; on that path `notified` flips to `no`. The
/// weight and status are updated unconditionally. Raising the initial alarm
/// is [`periodic_check`]'s job.
pub fn apply_measurement(state: &ScaleState, weight: f64, new_label: &str) -> MeasurementOutcome {
    let clearing = state.notified == Some(Notified::Yes)
        && new_label == LEVEL_NORMAL
        && state.status != new_label;

    let mut next = ScaleState {
        weight,
        status: new_label.to_string(),
        notified: state.notified,
    };

    let all_clear = if clearing {
        next.notified = Some(Notified::No);
        Some(Notification::for_level(new_label, weight))
    } else {
        None
    };

    MeasurementOutcome { state: next, all_clear }
}

// ---------------------------------------------------------------------------
// Periodic check
// ---------------------------------------------------------------------------

/// Outcome of one periodic level check.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckOutcome {
    /// Successor state to persist; `None` means nothing is written.
    pub state: Option<ScaleState>,
    /// Alarm describing the current status and weight.
    pub alarm: Option<Notification>,
}

/// Decide whether the periodic check should (re)raise the alarm.
///
/// Any status other than [`LEVEL_NORMAL`] — including the empty status of a
/// freshly provisioned scale — produces an alarm and sets `notified = yes`.
/// The flag is not consulted first: every abnormal check sends again, and
/// only the submission path ever clears it.
pub fn periodic_check(state: &ScaleState) -> CheckOutcome {
    if state.status == LEVEL_NORMAL {
        return CheckOutcome {
            state: None,
            alarm: None,
        };
    }

    let alarm = Notification::for_level(&state.status, state.weight);
    let next = ScaleState {
        notified: Some(Notified::Yes),
        ..state.clone()
    };

    CheckOutcome {
        state: Some(next),
        alarm: Some(alarm),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
