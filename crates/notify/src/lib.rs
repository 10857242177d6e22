//! Notification delivery for the scale monitor.
//!
//! [`Notifier`] is the delivery seam: callers hand over a composed
//! [`Notification`] and a recipient, and get fire-and-forget semantics — no
//! delivery confirmation is consumed. [`SmtpNotifier`] is the production
//! implementation over SMTP; tests substitute their own.

pub mod email;

use async_trait::async_trait;

use saltwatch_core::Notification;

pub use email::{EmailConfig, NotifyError, SmtpNotifier};

/// Delivery seam for composed notifications.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver `notification` to the address `to`.
    async fn deliver(&self, to: &str, notification: &Notification) -> Result<(), NotifyError>;
}
